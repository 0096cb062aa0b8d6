//! Application layer: use-cases orchestrating the domain and its ports

pub mod esign;
pub mod identity;
pub mod workbench;

pub use esign::{DocumentSigningService, SignedDownload, SigningContext, SigningFlowError};
pub use identity::{Actor, AuthResult, DefaultAdmin, UserService, UsersOverview};
pub use workbench::{
    start_idle_sweeper, SharedWorkbenchRegistry, Viewer, WorkbenchRegistry, WorkbenchService,
};
