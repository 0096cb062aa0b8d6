//! User aggregate
//!
//! Contains the user entity, the directory filter record and the
//! repository interface.

pub mod filters;
pub mod model;
pub mod repository;

pub use filters::{DateRange, FilterChange, UserFilters};
pub use model::{UserAccount, UserItem, UserRole, UserStatus};
pub use repository::{CreateUserDto, UserQuery, UserRepository};
