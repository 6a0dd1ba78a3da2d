use crate::models::{GradeBand, GradeRecord, GradeSummary};

// "+1.5" / "-1.0": always signed, one decimal.
pub fn format_plus_points(points: f64) -> String {
    if points >= 0.0 {
        format!("+{:.1}", points)
    } else {
        format!("{:.1}", points)
    }
}

pub fn format_average(average: Option<f64>) -> String {
    average.map_or_else(|| "--".to_string(), |a| format!("{:.2}", a))
}

// Builds the console overview: plus points, pass/fail counts, then one line per course.
pub fn render_summary(record: &GradeRecord, summary: &GradeSummary) -> String {
    let mut message = String::from("Grade Statistics\n");
    if !record.student.is_empty() {
        message.push_str(&format!("{}\n", record.student));
    }

    message.push_str(&format!("\nPlus points: {}\n", format_plus_points(summary.plus_points)));
    message.push_str(&format!("Grades >= 4.0: {}\n", summary.courses_above_4));
    message.push_str(&format!("Grades <  4.0: {}\n", summary.courses_below_4));

    if !record.courses.is_empty() {
        message.push_str("\nSubject averages\n");
        let width = record.courses.iter().map(|c| c.code.chars().count()).max().unwrap_or(0);
        for course in &record.courses {
            message.push_str(&format!(
                "  {:<width$}  {:>5}  {:<12}  {}\n",
                course.code,
                format_average(course.average),
                GradeBand::of(course.average).label(),
                course.name,
                width = width,
            ));
        }
    }

    message += "\nRules: +0.5 for every 0.5 above 4.0, -1.0 for each grade below 4.0\n";
    message
}
