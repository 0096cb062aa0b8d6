//! CMS slot content

pub mod handlers;

pub use handlers::*;
