pub mod cluster;
pub mod config;
pub mod controller;
pub mod crd;
pub mod deployment;
pub mod error;
pub mod owner;
pub mod reconcile;
pub mod service;
pub mod status;
pub mod store;

pub use error::Error;
