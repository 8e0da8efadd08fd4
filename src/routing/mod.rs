//! Route table and route guard

mod guard;
mod table;

pub use guard::{GuardState, GuardedView, RouteGuard};
pub use table::{Access, Route, RouteTable};
pub(crate) use table::normalize_path;
