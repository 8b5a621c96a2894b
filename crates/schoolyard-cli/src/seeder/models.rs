//! Data models for database seeding configuration.

use schoolyard_models::UserRole;

/// Seed data for one `users` row.
#[derive(Debug, Clone)]
pub struct UserSeed {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub student_number: Option<String>,
    pub grade: Option<String>,
    pub section: Option<String>,
}

/// How many users of each kind to create.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub students: usize,
    pub admins: usize,
    pub teachers: usize,
    /// Grades students are spread over, round robin
    pub grades: Vec<String>,
    /// Sections within each grade, round robin
    pub sections: Vec<String>,
}

impl SeedConfig {
    pub fn new(students: usize) -> Self {
        Self {
            students,
            admins: 1,
            teachers: 4,
            grades: (1..=6).map(|g| format!("grade{}", g)).collect(),
            sections: vec!["a".to_string(), "b".to_string()],
        }
    }

    pub fn with_staff(mut self, admins: usize, teachers: usize) -> Self {
        self.admins = admins;
        self.teachers = teachers;
        self
    }

    pub fn with_groups(mut self, grades: Vec<String>, sections: Vec<String>) -> Self {
        self.grades = grades;
        self.sections = sections;
        self
    }
}
