//! Mounted admin users workbenches
//!
//! Every command answers with a full [`WorkbenchSnapshot`](crate::application::workbench::WorkbenchSnapshot).

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
