//! Repository implementations.

pub mod deployment;

pub use deployment::DeploymentRepository;
