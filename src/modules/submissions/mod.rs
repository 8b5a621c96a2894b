//! Submissions, quiz auto-grading and manual grading.

pub mod controller;
pub mod grader;
pub mod model;
pub mod router;
pub mod service;
pub mod store;
