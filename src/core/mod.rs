//! Configuration, policy documents, and request/response models

pub mod config;
pub mod models;
pub mod policy;
