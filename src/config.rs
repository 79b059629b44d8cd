use tracing::trace;

/// Notification channel configuration, supplied per dispatch call.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct NotifyConfig {
    /// Key into the notification registry (e.g. "WECHAT")
    pub channel: String,

    /// Opaque webhook key or credential for the channel endpoint
    pub secret: String,

    /// Recipient tokens, in mention order
    #[serde(default)]
    pub receives: Vec<String>,

    /// Minimum seconds between repeated alarms; a throttle hint for the
    /// caller, never enforced here
    #[serde(default = "default_interval")]
    pub interval: u64,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// Application name rendered into alert messages
    pub app_name: String,

    /// Active environment label (e.g. "PROD")
    #[serde(default = "default_active")]
    pub active: String,

    pub notifies: Option<Vec<NotifyConfig>>,
}

fn default_interval() -> u64 {
    120
}

fn default_active() -> String {
    String::from("UNKNOWN")
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    serde_json::from_str(&file_content)
        .map_err(|_| anyhow::anyhow!("Invalid configuration file provided!"))
        .inspect(|config| trace!("loaded config: {config:?}"))
}
