pub mod client;

pub use client::{CmsClient, CmsConfig, CmsError, SLOT_MODELS};
