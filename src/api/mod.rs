//! Lambda entry point and response envelope

pub mod handler;
pub mod helpers;

pub use handler::{dispatch, handler};
