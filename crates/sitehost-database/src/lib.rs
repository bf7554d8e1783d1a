//! # sitehost-database
//!
//! SQLite connection management, embedded migrations, and the concrete
//! repository implementation for deployment metadata.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use repositories::DeploymentRepository;
