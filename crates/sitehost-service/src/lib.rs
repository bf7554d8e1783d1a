//! # sitehost-service
//!
//! Business logic for SiteHost: the deployment lifecycle manager that
//! keeps the on-disk file tree and the metadata record of each
//! deployment mutually consistent.

pub mod deployment;

pub use deployment::DeploymentService;
