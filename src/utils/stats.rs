use crate::models::{Course, GradeBand, GradeSummary};

const PASS_MARK: f64 = 4.0;
const STEP: f64 = 0.5;
const PENALTY: f64 = 1.0;

// +0.5 for every full half point above 4.0, -1 for any average below it.
// Courses without an average do not count.
pub fn calculate_plus_points(courses: &[Course]) -> f64 {
    courses
        .iter()
        .filter_map(|course| course.average)
        .map(plus_points_for)
        .sum()
}

pub fn plus_points_for(average: f64) -> f64 {
    if average >= PASS_MARK {
        ((average - PASS_MARK) / STEP).floor() * STEP
    } else {
        -PENALTY
    }
}

pub fn summarize(courses: &[Course]) -> GradeSummary {
    let averages = || courses.iter().filter_map(|course| course.average);
    GradeSummary {
        plus_points: calculate_plus_points(courses),
        courses_above_4: averages().filter(|average| *average >= PASS_MARK).count(),
        courses_below_4: averages().filter(|average| *average < PASS_MARK).count(),
    }
}

impl GradeBand {
    pub fn of(average: Option<f64>) -> Self {
        match average {
            None => GradeBand::Missing,
            Some(a) if a >= 5.5 => GradeBand::Excellent,
            Some(a) if a >= 4.5 => GradeBand::Good,
            Some(a) if a >= PASS_MARK => GradeBand::Sufficient,
            Some(_) => GradeBand::Insufficient,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GradeBand::Excellent => "excellent",
            GradeBand::Good => "good",
            GradeBand::Sufficient => "sufficient",
            GradeBand::Insufficient => "insufficient",
            GradeBand::Missing => "no grade",
        }
    }
}
