//! Quiz questions.

pub mod controller;
pub mod model;
pub mod service;
