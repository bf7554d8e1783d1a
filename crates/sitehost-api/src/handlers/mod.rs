//! HTTP request handlers, organized by domain.

pub mod deployment;
pub mod health;
pub mod site;
