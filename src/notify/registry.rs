//! Lookup table mapping channel-type keys to registered handlers.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::NotifyConfig;
use crate::notify::messages::{ChangeAlert, StateAlert};
use crate::notify::{ChannelHandler, NotifyError, NotifyResult};

/// Registry of notification channel handlers.
///
/// Populated once at startup and treated as read-only afterwards, so
/// concurrent [`resolve`](NotificationRegistry::resolve) calls need no
/// locking. Holds no per-dispatch state.
#[derive(Default)]
pub struct NotificationRegistry {
    handlers: HashMap<&'static str, Arc<dyn ChannelHandler>>,
}

impl NotificationRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler under its own channel type.
    ///
    /// Re-registering a channel replaces the previous handler.
    pub fn register(&mut self, handler: Arc<dyn ChannelHandler>) {
        self.handlers.insert(handler.channel_type(), handler);
    }

    /// Look up the handler for a channel type.
    pub fn resolve(&self, channel: &str) -> NotifyResult<Arc<dyn ChannelHandler>> {
        self.handlers
            .get(channel)
            .cloned()
            .ok_or_else(|| NotifyError::UnknownChannel(channel.to_string()))
    }

    /// Resolve the handler for `config.channel` and deliver a state alarm.
    ///
    /// The only error is an unregistered channel; delivery itself is
    /// best-effort inside the handler.
    pub async fn send_state_alert(
        &self,
        config: &NotifyConfig,
        alert: &StateAlert,
    ) -> NotifyResult<()> {
        let handler = self.resolve(&config.channel)?;
        handler.send_state_alert(config, alert).await;
        Ok(())
    }

    /// Resolve the handler for `config.channel` and deliver a change notice.
    pub async fn send_change_alert(
        &self,
        config: &NotifyConfig,
        change: &ChangeAlert,
    ) -> NotifyResult<()> {
        let handler = self.resolve(&config.channel)?;
        handler.send_change_alert(config, change).await;
        Ok(())
    }
}
