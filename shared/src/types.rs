//! Service identity shared by every binary in the fleet

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Global service ID singleton - set once at startup
static SERVICE_ID: OnceLock<ServiceId> = OnceLock::new();

static UNSET: ServiceId = ServiceId::Unset;

/// Identifier of the binary emitting logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceId {
    /// Launcher process supervising bots on one host
    Launcher,
    /// Central panel backend aggregating host reports
    Panel,
    /// Library code running before any `init_*` call (tests, tools)
    Unset,
}

impl ServiceId {
    /// Initialize the global service ID for the launcher
    pub fn init_launcher() -> &'static ServiceId {
        SERVICE_ID.get_or_init(|| ServiceId::Launcher)
    }

    /// Initialize the global service ID for the panel
    pub fn init_panel() -> &'static ServiceId {
        SERVICE_ID.get_or_init(|| ServiceId::Panel)
    }

    /// Get the global service ID, `Unset` when no binary initialized it
    pub fn current() -> &'static ServiceId {
        SERVICE_ID.get().unwrap_or(&UNSET)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceId::Launcher => write!(f, "launcher"),
            ServiceId::Panel => write!(f, "panel"),
            ServiceId::Unset => write!(f, "unset"),
        }
    }
}
