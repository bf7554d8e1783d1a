//! # sitehost-storage
//!
//! Filesystem side of the deployment lifecycle: safe archive extraction
//! into per-deployment directories, path confinement shared between
//! extraction and resolution, permission-preserving directory copies for
//! rollback, and resolution of public URLs to files on disk.

pub mod copy;
pub mod extractor;
pub mod resolver;
pub mod sandbox;

pub use resolver::{ResolvedFile, StaticResolver};
