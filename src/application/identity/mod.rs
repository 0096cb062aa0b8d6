//! Identity module: login and the tenant user directory

pub mod service;

pub use service::{Actor, AuthResult, DefaultAdmin, UserService, UsersOverview};
