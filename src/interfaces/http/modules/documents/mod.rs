//! E-signature session of a stored document

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
