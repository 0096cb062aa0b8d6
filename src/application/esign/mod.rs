//! Document e-signature use-cases

pub mod service;

pub use service::{DocumentSigningService, SignedDownload, SigningContext, SigningFlowError};
