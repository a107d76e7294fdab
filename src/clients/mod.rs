//! Client modules for external API interactions

pub mod organizations;

pub use organizations::{OrganizationsApi, OrganizationsClient};
