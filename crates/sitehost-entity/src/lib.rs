//! # sitehost-entity
//!
//! Domain entity models for SiteHost. Every struct in this crate
//! represents a database table row. All entities derive `Debug`, `Clone`,
//! `Serialize`, `Deserialize`, and `sqlx::FromRow`.

pub mod deployment;

pub use deployment::Deployment;
