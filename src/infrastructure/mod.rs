//! Infrastructure layer - external concerns

pub mod cms;
pub mod crypto;
pub mod database;
pub mod esign;

pub use cms::{CmsClient, CmsConfig, CmsError};
pub use database::repositories::SeaOrmRepositoryProvider;
pub use database::{init_database, run_migrations, DatabaseConfig};
pub use esign::{ESignClientConfig, HttpESignClient};
