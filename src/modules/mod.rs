pub mod academic_years;
pub mod content;
pub mod questions;
pub mod students;
pub mod submissions;
