pub mod actions;
pub mod cli;
pub mod models;
pub mod utils;

pub use models::{Assessment, Course, GradeBand, GradeRecord, GradeSummary};
pub use utils::extract::{extract_grades, extract_grades_at, is_grades_page};
pub use utils::stats::{calculate_plus_points, summarize};
