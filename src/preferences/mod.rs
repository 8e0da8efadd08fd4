//! Persisted sidebar preferences
//!
//! Two booleans survive reloads: whether the sidebar is open and whether it is
//! collapsed to icons. Values never written fall back to a default derived from
//! the viewport width.

mod sidebar;
mod store;

pub use sidebar::{Sidebar, SidebarState};
pub use store::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, SidebarPreferences};
