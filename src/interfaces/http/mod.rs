//! HTTP REST API
//!
//! - `common`: response envelopes, `ApiError`, `ValidatedJson`
//! - `middleware`: session authentication and tenant resolution
//! - `modules`: handlers grouped by resource
//! - `router`: route table and OpenAPI document

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, AppState};
