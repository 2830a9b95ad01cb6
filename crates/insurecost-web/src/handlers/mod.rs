//! HTTP handlers for all web routes.

pub mod api;
pub mod page;
pub mod system;
