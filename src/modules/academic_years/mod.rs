//! Academic years and their term calendars.
//!
//! Years own an ordered set of terms stored by month name. The
//! [`calendar`] module resolves those to dates and decides which term is
//! current; the service persists years and keeps exactly one of them current.

pub mod calendar;
pub mod controller;
pub mod model;
pub mod router;
pub mod service;
