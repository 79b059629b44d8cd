//! Alert dispatch: payload types, the channel handler contract, the handler
//! registry and the concrete channels.

pub mod messages;
pub mod registry;
pub mod template;
pub mod wechat;

use std::fmt;

use async_trait::async_trait;

use crate::config::NotifyConfig;
use crate::notify::messages::{ChangeAlert, StateAlert};

/// Result type alias for dispatch operations
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Errors that can occur while dispatching an alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// No handler is registered for the requested channel type
    UnknownChannel(String),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::UnknownChannel(channel) => {
                write!(f, "no notification handler registered for channel `{}`", channel)
            }
        }
    }
}

impl std::error::Error for NotifyError {}

/// A notification channel. Each implementation owns its wire format and
/// transport.
///
/// Delivery is best-effort: implementations log transport and serialization
/// failures and never surface them, so a notification-channel outage can
/// never destabilize the monitored system. Rendering is kept separate from
/// sending so it stays unit-testable without a transport.
#[async_trait]
pub trait ChannelHandler: Send + Sync {
    /// Registry key for this channel.
    fn channel_type(&self) -> &'static str;

    /// Render and deliver a threshold-breach alarm.
    async fn send_state_alert(&self, config: &NotifyConfig, alert: &StateAlert);

    /// Render and deliver a parameter-change notice.
    async fn send_change_alert(&self, config: &NotifyConfig, change: &ChangeAlert);
}
