//! # Arbor Reconciler
//!
//! Incremental, interruptible reconciliation of [`arbor_vdom`] trees into a
//! mutable host tree.
//!
//! ## Model
//!
//! Every render builds a new *work-in-progress* generation of fibers next to
//! the *current* (last committed) one. Each fiber of the new generation keeps
//! an `alternate` index to the fiber that held its position in the current
//! tree. Work is split into units, one fiber each:
//!
//! 1. expand the fiber (call a component, or create its host node),
//! 2. reconcile its children by position and type,
//! 3. move on in depth-first pre-order.
//!
//! Reconciliation tags every new fiber `Placement` or `Update` and every
//! discarded old fiber `Deletion`. Nothing touches the attached host tree
//! until the traversal is complete. The commit then applies deletions,
//! placements and updates in one go, and the work-in-progress tree becomes
//! current.
//!
//! ## Scheduling Contract
//!
//! The [`Scheduler`] never drives itself. A scheduling source calls
//! [`Scheduler::drive_work_loop`] with a [`Deadline`]; the loop checks the
//! deadline before each unit and yields once it drops below
//! `yield_threshold`. A traversal may span any number of calls and always
//! visits fibers in the same order. A commit never spans calls.
//!
//! Calling [`Scheduler::render`] mid-traversal discards the traversal and
//! starts over from the new root.
//!
//! ## Failure
//!
//! Host operations are infallible. A failing component aborts the current
//! quantum with [`ReconcileError::Component`]; nothing is rolled back, and
//! the failing fiber remains the next unit of work.
//!
//! ## Usage
//!
//! ```rust
//! use arbor_reconciler::{HostBinding, MemoryHost, Scheduler, UnitBudget, WorkStatus};
//! use arbor_vdom::{create_element, props, Child};
//!
//! let mut host = MemoryHost::new();
//! let container = host.create_node("body");
//! let mut scheduler = Scheduler::new(host);
//!
//! let app = create_element(
//!     "div",
//!     props([("id", "root")]),
//!     [
//!         Child::from(create_element("a", None, ["x"])),
//!         Child::from(create_element("p", None, ["y"])),
//!     ],
//! );
//! scheduler.render(app, container);
//!
//! // Two units per quantum, as an idle-callback source would drive it.
//! while scheduler.has_pending_work() {
//!     scheduler.drive_work_loop(&UnitBudget::new(2)).unwrap();
//! }
//!
//! assert_eq!(
//!     scheduler.host().inner_markup(container),
//!     "<div id=\"root\"><a>x</a><p>y</p></div>"
//! );
//! ```

pub mod commit;
pub mod config;
pub mod deadline;
pub mod error;
pub mod fiber;
pub mod host;
mod reconcile;
pub mod scheduler;
mod work;

#[cfg(test)]
mod tests_scheduler;

pub use commit::CommitSummary;
pub use config::{ReconcilerConfig, StaleAttributes, DEFAULT_CONFIG_NAME};
pub use deadline::{Deadline, TimeSlice, UnitBudget, Unbounded};
pub use error::{ConfigError, ConfigResult, ReconcileError, ReconcileResult};
pub use fiber::{Effect, Fiber, FiberId, FiberTree};
pub use host::{
    update_host_props, HostBinding, HostNodeKind, HostOp, HostSnapshot, MemoryHost, NodeId,
};
pub use scheduler::{Scheduler, WorkStatus};
