pub mod auth;
pub mod cms;
pub mod documents;
pub mod health;
pub mod metrics;
pub mod request_id;
pub mod users;
pub mod workbench;
