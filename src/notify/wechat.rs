//! WeChat Work group-robot channel: markdown messages over a webhook POST.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::config::NotifyConfig;
use crate::notify::messages::{AlertKind, ChangeAlert, StateAlert};
use crate::notify::{ChannelHandler, template};

const WE_CHAT_SERVER_URL: &str = "https://qyapi.weixin.qq.com/cgi-bin/webhook/send?key=";

/// Delimiter between mention tokens inside a WeChat markdown body. Joined
/// tokens are wrapped `<@...>` by the templates.
pub const MENTION_DELIMITER: &str = "><@";

const ALARM_TEMPLATE: &str = "\
<font color=\"#FF0000\">[ALERT]</font> {active} worker pool overload
> Alarm kind: {kind}
> Pool id: <font color=\"#778899\">{pool_id}</font>
> App: {app_name}
> Instance: {identify}
> Core size: {core_size}
> Maximum size: {maximum_size}
> Current size: {pool_size}
> Active count: {active_size}
> Largest size: {largest_pool_size}
> Completed tasks: {completed_task_count}
> Queue type: {queue_type}
> Queue capacity: {queue_capacity}
> Queued tasks: {queue_size}
> Queue remaining: {queue_remaining_capacity}
> Rejection policy: {rejected_handler_name}
> Rejected tasks: {reject_count}
{timeout_block}> Receivers: <@{receives}>
> Alarm interval: every {interval} s
> Sent at: {sent_at}
";

const ALARM_TIMEOUT_BLOCK: &str = "\
> Execution time: {execute_time} ms
> Execution timeout: {execute_timeout} ms
{trace_block}";

const ALARM_TRACE_BLOCK: &str = "> Trace: {execute_timeout_trace}\n";

const CHANGE_TEMPLATE: &str = "\
<font color=\"#2A9D8F\">[NOTICE]</font> {active} worker pool parameter change
> Pool id: <font color=\"#778899\">{pool_id}</font>
> App: {app_name}
> Instance: {identify}
> Core size: {core_size}
> Maximum size: {maximum_size}
> Core thread timeout: {allow_core_thread_timeout}
> Keep-alive: {keep_alive_seconds} s
> Execution timeout: {execute_timeout_millis} ms
> Queue type: {queue_type}
> Queue capacity: {queue_capacity}
> Rejection policy: {rejected_handler_name}
> Receivers: <@{receives}>
> Sent at: {sent_at}
";

/// Sends markdown alarm and change messages to a WeChat Work group robot.
pub struct WeChatHandler {
    client: Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Clone, Serialize)]
struct MarkdownMessage {
    msgtype: &'static str,
    markdown: MarkdownContent,
}

#[derive(Debug, Clone, Serialize)]
struct MarkdownContent {
    content: String,
}

impl WeChatHandler {
    pub fn new() -> Self {
        Self::with_base_url(WE_CHAT_SERVER_URL.to_string())
    }

    /// Point the handler at a different endpoint, e.g. an egress proxy or a
    /// test server. The config secret is appended to form the full URL.
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            timeout: Duration::from_secs(10),
        }
    }

    /// Bound each delivery attempt. A timed-out request is treated like any
    /// other transport failure: logged and swallowed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Render the markdown body for a state alarm. Pure; exposed so message
    /// formatting can be tested without a transport.
    pub fn render_state_alert(&self, config: &NotifyConfig, alert: &StateAlert) -> String {
        let timeout_block = if alert.kind == AlertKind::Timeout {
            let trace_block = match alert.execute_timeout_trace.as_deref() {
                Some(trace) if !trace.trim().is_empty() => template::render(
                    ALARM_TRACE_BLOCK,
                    &[("execute_timeout_trace", trace.to_string())],
                ),
                _ => String::new(),
            };
            template::render(
                ALARM_TIMEOUT_BLOCK,
                &[
                    ("execute_time", display_opt(alert.execute_time)),
                    ("execute_timeout", display_opt(alert.execute_timeout)),
                    ("trace_block", trace_block),
                ],
            )
        } else {
            String::new()
        };

        let fields = [
            ("active", alert.active.clone()),
            ("kind", alert.kind.to_string()),
            ("pool_id", alert.pool_id.clone()),
            ("app_name", alert.app_name.clone()),
            ("identify", alert.identify.clone()),
            ("core_size", alert.core_size.to_string()),
            ("maximum_size", alert.maximum_size.to_string()),
            ("pool_size", alert.pool_size.to_string()),
            ("active_size", alert.active_size.to_string()),
            ("largest_pool_size", alert.largest_pool_size.to_string()),
            (
                "completed_task_count",
                alert.completed_task_count.to_string(),
            ),
            ("queue_type", alert.queue_type.clone()),
            ("queue_capacity", alert.queue_capacity.to_string()),
            ("queue_size", alert.queue_size.to_string()),
            (
                "queue_remaining_capacity",
                alert.queue_remaining_capacity.to_string(),
            ),
            (
                "rejected_handler_name",
                alert.rejected_handler_name.clone(),
            ),
            ("reject_count", alert.reject_count.to_string()),
            ("timeout_block", timeout_block),
            (
                "receives",
                template::join_mentions(&config.receives, MENTION_DELIMITER),
            ),
            ("interval", config.interval.to_string()),
            ("sent_at", now_stamp()),
        ];
        template::render(ALARM_TEMPLATE, &fields)
    }

    /// Render the markdown body for a parameter-change notice. Pure.
    pub fn render_change_alert(&self, config: &NotifyConfig, change: &ChangeAlert) -> String {
        let fields = [
            ("active", change.active.clone()),
            ("pool_id", change.pool_id.clone()),
            ("app_name", change.app_name.clone()),
            ("identify", change.identify.clone()),
            ("core_size", change.core_size.to_string()),
            ("maximum_size", change.maximum_size.to_string()),
            (
                "allow_core_thread_timeout",
                change.allow_core_thread_timeout.to_string(),
            ),
            ("keep_alive_seconds", change.keep_alive_seconds.to_string()),
            (
                "execute_timeout_millis",
                change.execute_timeout_millis.to_string(),
            ),
            ("queue_type", change.queue_type.clone()),
            ("queue_capacity", change.queue_capacity.to_string()),
            (
                "rejected_handler_name",
                change.rejected_handler_name.to_string(),
            ),
            (
                "receives",
                template::join_mentions(&config.receives, MENTION_DELIMITER),
            ),
            ("sent_at", now_stamp()),
        ];
        template::render(CHANGE_TEMPLATE, &fields)
    }

    #[instrument(skip_all)]
    async fn execute(&self, secret: &str, content: String) {
        let url = format!("{}{}", self.base_url, secret);
        let message = MarkdownMessage {
            msgtype: "markdown",
            markdown: MarkdownContent { content },
        };

        match self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&message)
            .send()
            .await
        {
            Ok(response) => {
                if response.status().is_success() {
                    info!("successfully sent WeChat alert");
                } else {
                    error!("WeChat alert failed with status: {}", response.status());
                }
            }
            Err(e) => {
                error!("failed to send WeChat alert: {e}");
            }
        }
    }
}

impl Default for WeChatHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn now_stamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn display_opt(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[async_trait]
impl ChannelHandler for WeChatHandler {
    fn channel_type(&self) -> &'static str {
        "WECHAT"
    }

    #[instrument(skip(self, config, alert), fields(pool_id = %alert.pool_id, kind = %alert.kind))]
    async fn send_state_alert(&self, config: &NotifyConfig, alert: &StateAlert) {
        let content = self.render_state_alert(config, alert);
        self.execute(&config.secret, content).await;
    }

    #[instrument(skip(self, config, change), fields(pool_id = %change.pool_id))]
    async fn send_change_alert(&self, config: &NotifyConfig, change: &ChangeAlert) {
        let content = self.render_change_alert(config, change);
        self.execute(&config.secret, content).await;
    }
}
