//! Student directory.
//!
//! Students are users with the `student` role, a grade, a section and a
//! sequential student number. Staff read the directory; only admins change it.

pub mod controller;
pub mod directory;
pub mod model;
pub mod router;
pub mod service;
