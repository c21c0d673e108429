use serde::{de::Error as _, Deserialize, Serialize};

use crate::error::ToastResult;

/// Identifier of the element the page provides to stack toasts in
pub const DEFAULT_CONTAINER_ID: &str = "toast-container";
/// Time a toast stays fully visible before its exit transition starts
pub const DEFAULT_DISPLAY_MS: u32 = 5000;
/// Time allowed for the exit transition before the toast is removed regardless. Matches the
/// `duration-300` transition class with some slack.
pub const DEFAULT_EXIT_FALLBACK_MS: u32 = 600;

/// Runtime options for a [Notifier][crate::Notifier]. Every field has a default so a partial JSON
/// document (or an empty object) is a valid configuration.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(default)]
pub struct ToastConfig {
    /// Id of the container element looked up when no container handle was injected
    pub container_id: String,
    /// Delay between showing a toast and starting its exit transition
    pub display_ms: u32,
    /// Removal deadline once the exit transition has started. [None] waits on the
    /// `transitionend` signal alone, which leaves the toast in place if transitions never fire.
    pub exit_fallback_ms: Option<u32>,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            container_id: DEFAULT_CONTAINER_ID.to_owned(),
            display_ms: DEFAULT_DISPLAY_MS,
            exit_fallback_ms: Some(DEFAULT_EXIT_FALLBACK_MS),
        }
    }
}

impl ToastConfig {
    /// Read a configuration from a JSON object. Missing fields take their default value.
    /// # Errors
    /// This function will return an error if the `json` is not a valid configuration object
    pub fn from_json(json: &str) -> ToastResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            let error = serde_json::Error::custom("toast configuration must be a JSON object");
            return Err(error.into());
        }
        Ok(serde_json::from_value(value)?)
    }
}
