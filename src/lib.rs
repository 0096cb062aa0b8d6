//! # Admin Workbench
//!
//! Multi-tenant admin back office: a tenant-scoped user directory, the
//! server-side state of the admin users page and tenant-checked access to
//! document e-signature sessions.
//!
//! ## Architecture
//!
//! - **domain**: entities, value objects, repository and port traits
//! - **application**: use cases (identity, e-sign, workbench)
//! - **infrastructure**: SeaORM persistence, crypto, signing service and CMS clients
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime bootstrap shared by the CLI

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{default_config_path, AppConfig};
pub use infrastructure::{init_database, DatabaseConfig};
pub use interfaces::http::create_api_router;
