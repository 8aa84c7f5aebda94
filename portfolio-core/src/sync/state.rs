use serde::Serialize;
use std::time::Duration;

use crate::models::Portfolio;

/// How long the mirror reports loading when the profile never arrives.
pub const DEFAULT_LOADING_GRACE: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Time after start at which `is_loading` is cleared.
    pub loading_grace: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            loading_grace: DEFAULT_LOADING_GRACE,
        }
    }
}

/// Everything readers observe: session flag, loading flag and the mirror.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    pub is_authenticated: bool,
    pub is_loading: bool,
    #[serde(flatten)]
    pub portfolio: Portfolio,
}
