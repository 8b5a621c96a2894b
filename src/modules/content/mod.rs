//! Announcements, assignments and quizzes.
//!
//! Publishing resolves the item's targeting to a fixed recipient set (see
//! [`audience`]). Quiz questions and submissions hang off a content item and
//! live in their own modules.

pub mod audience;
pub mod controller;
pub mod model;
pub mod router;
pub mod service;
