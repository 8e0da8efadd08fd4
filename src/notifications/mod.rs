//! Store alert notifications
//!
//! Keeps a store's unread alerts fresh without wasting requests: a liveness
//! poller that adapts to page visibility and connectivity drives the inbox.

mod environment;
mod inbox;
mod poller;

pub use environment::{PageEnvironment, PageSignals, Visibility};
pub use inbox::{AckOutcome, AlertInbox, GoneReason, Notice};
pub use poller::{LivenessPoller, PollerHandle};
