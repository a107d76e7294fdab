//! AI services opt-out policy operations

pub mod manager;
pub mod naming;

pub use manager::{PolicyManager, build_account_policy};
