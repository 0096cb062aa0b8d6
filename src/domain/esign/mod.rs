//! E-signature domain
//!
//! Signing sessions are owned by an external signing service; this crate
//! only observes them and requests cancellation through [`ESignService`].

pub mod model;
pub mod port;

pub use model::{Signer, SignerStatus, SigningSession, SigningStatus};
pub use port::{ESignError, ESignService};
