//! Admin users workbench
//!
//! Server-side state of the admin users page: selection, filters, saved
//! views, the virtualized users table, per-row role changes and the CMS
//! driven section layout.

pub mod layout;
pub mod metrics;
pub mod registry;
pub mod role_change;
pub mod selection;
pub mod service;
pub mod table;
pub mod viewport;
pub mod views;

pub use layout::{
    ActionOutcome, QuickAction, Section, SectionSource, SelectionCommand, Workbench,
    WorkbenchSnapshot,
};
pub use metrics::{OverviewMetrics, QuickStats};
pub use registry::{start_idle_sweeper, SharedWorkbenchRegistry, Viewer, WorkbenchRegistry};
pub use role_change::{RoleChangeState, RoleChangeTracker};
pub use selection::{SelectAllState, SelectionSet};
pub use service::{WorkbenchError, WorkbenchResult, WorkbenchService};
pub use table::{UsersTable, UsersTableView};
pub use viewport::{Viewport, VirtualWindow};
pub use views::{SavedView, ViewCounts};
