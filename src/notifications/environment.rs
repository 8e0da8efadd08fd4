//! Page visibility, connectivity and focus signals

use tokio::sync::{broadcast, watch};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Runtime state reported by the host page.
///
/// The host feeds visibility, network and focus events in; pollers subscribe.
#[derive(Debug)]
pub struct PageEnvironment {
    visibility: watch::Sender<Visibility>,
    online: watch::Sender<bool>,
    focus: broadcast::Sender<()>,
}

/// Receiving side handed to a single subscriber
#[derive(Debug)]
pub struct PageSignals {
    pub(super) visibility: watch::Receiver<Visibility>,
    pub(super) online: watch::Receiver<bool>,
    pub(super) focus: broadcast::Receiver<()>,
}

impl PageEnvironment {
    pub fn new(visibility: Visibility, online: bool) -> Self {
        let (visibility, _) = watch::channel(visibility);
        let (online, _) = watch::channel(online);
        let (focus, _) = broadcast::channel(8);
        Self {
            visibility,
            online,
            focus,
        }
    }

    pub fn set_visibility(&self, visibility: Visibility) {
        let changed = self.visibility.send_if_modified(|current| {
            let changed = *current != visibility;
            *current = visibility;
            changed
        });
        if changed {
            debug!("Page visibility now {:?}", visibility);
        }
    }

    pub fn set_online(&self, online: bool) {
        let changed = self.online.send_if_modified(|current| {
            let changed = *current != online;
            *current = online;
            changed
        });
        if changed {
            debug!("Network {}", if online { "online" } else { "offline" });
        }
    }

    /// Window regained input focus
    pub fn focus(&self) {
        let _ = self.focus.send(());
    }

    pub fn visibility(&self) -> Visibility {
        *self.visibility.borrow()
    }

    pub fn is_online(&self) -> bool {
        *self.online.borrow()
    }

    pub fn signals(&self) -> PageSignals {
        PageSignals {
            visibility: self.visibility.subscribe(),
            online: self.online.subscribe(),
            focus: self.focus.subscribe(),
        }
    }
}

impl Default for PageEnvironment {
    fn default() -> Self {
        Self::new(Visibility::Visible, true)
    }
}
