//! Inbound messages from the settings popup.
//!
//! Only `updateTheme` is understood; other action tags belong to other
//! listeners on the same channel and are ignored.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ChannelError;
use crate::types::ThemeConfig;

/// Action tag carrying a new theme configuration.
pub const UPDATE_THEME_ACTION: &str = "updateTheme";

#[derive(Debug, Deserialize)]
struct Envelope {
    action: String,
    #[serde(default)]
    config: Option<Value>,
}

/// Decode one message. `Ok(None)` means "not for us".
pub fn parse_message(raw: &str) -> Result<Option<ThemeConfig>, ChannelError> {
    let envelope: Envelope = serde_json::from_str(raw)?;
    if envelope.action != UPDATE_THEME_ACTION {
        tracing::debug!(action = %envelope.action, "ignoring message");
        return Ok(None);
    }
    let config = envelope.config.ok_or(ChannelError::MissingConfig)?;
    Ok(Some(serde_json::from_value(config)?))
}

/// Build the wire form of an `updateTheme` message.
pub fn update_theme_message(config: &ThemeConfig) -> Value {
    serde_json::json!({
        "action": UPDATE_THEME_ACTION,
        "config": config,
    })
}
