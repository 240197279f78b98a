//! Browser backend: forwards capability calls to an automation bridge.
//!
//! The bridge is a small external script wrapping the real browser-driver
//! API. It reads one JSON command per line on stdin and answers one JSON
//! line per command. The process starts lazily on the first command, so
//! constructing the driver never fails; registered mocks are pushed to
//! the bridge before every navigation-sensitive command so its network
//! interception stays current.

use std::process::Stdio;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info};

use async_trait::async_trait;

use understudy_core::backend::Backend;
use understudy_core::driver::{ContextBinding, UiDriver};
use understudy_core::error::{Error, Result};
use understudy_core::locator::{Locator, UrlMatch};
use understudy_core::router::Router;

/// Command line used to start the bridge process.
pub const BRIDGE_CMD_ENV: &str = "UNDERSTUDY_BRIDGE_CMD";

/// Base URL the bridge resolves visits against.
pub const BASE_URL_ENV: &str = "UNDERSTUDY_BASE_URL";

/// Configuration for the browser bridge.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Program and arguments of the bridge process.
    pub bridge_cmd: Vec<String>,

    /// Base URL visits are resolved against.
    pub base_url: String,

    /// Per-command reply deadline.
    pub command_timeout: Duration,
}

impl Default for BrowserConfig {
    fn default() -> BrowserConfig {
        BrowserConfig {
            bridge_cmd: std::env::var(BRIDGE_CMD_ENV)
                .map(|raw| parse_bridge_cmd(&raw))
                .unwrap_or_else(|_| {
                    vec!["node".to_string(), "bridge/understudy-bridge.js".to_string()]
                }),
            base_url: std::env::var(BASE_URL_ENV)
                .unwrap_or_else(|_| "http://127.0.0.1:3000".to_string()),
            command_timeout: Duration::from_secs(10),
        }
    }
}

fn parse_bridge_cmd(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

/// One command sent to the bridge as a JSON line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
enum BridgeCommand {
    Init { base_url: String, timeout_ms: u64 },
    SyncMocks { handlers: Vec<MockRule> },
    Visit { path: String },
    Fill { target: Locator, value: String },
    Click { target: Locator },
    ExpectPresent { target: Locator },
    ExpectAbsent { target: Locator },
    ExpectText { target: Locator, needle: String },
    ExpectUrl { matcher: UrlMatch },
    CurrentPath,
}

/// Interception rule mirrored into the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MockRule {
    pattern: String,
    status: u16,
    body: Value,
}

/// One JSON-line reply from the bridge.
#[derive(Debug, Clone, Deserialize)]
struct BridgeReply {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    value: Option<Value>,
}

struct Bridge {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    synced_mocks: u64,
}

/// Driver forwarding capability calls to the external bridge process.
pub struct BrowserDriver {
    config: BrowserConfig,
    bridge: AsyncMutex<Option<Bridge>>,
    binding: Mutex<Option<ContextBinding>>,
}

impl BrowserDriver {
    pub fn new(config: BrowserConfig) -> BrowserDriver {
        BrowserDriver {
            config,
            bridge: AsyncMutex::new(None),
            binding: Mutex::new(None),
        }
    }

    fn bound_router(&self) -> Option<Router> {
        self.binding
            .lock()
            .as_ref()
            .map(|binding| binding.router.clone())
    }

    /// Commands after which the bridge's interception must be current.
    fn needs_mock_sync(command: &BridgeCommand) -> bool {
        matches!(
            command,
            BridgeCommand::Visit { .. } | BridgeCommand::Fill { .. } | BridgeCommand::Click { .. }
        )
    }

    async fn spawn_bridge(&self) -> Result<Bridge> {
        let (program, args) = self.config.bridge_cmd.split_first().ok_or_else(|| {
            Error::Bridge(format!(
                "{} is empty; set it to the bridge command line",
                BRIDGE_CMD_ENV
            ))
        })?;

        info!("Spawning browser bridge: {}", self.config.bridge_cmd.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::Bridge(format!("failed to spawn bridge '{}': {}", program, e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Bridge("bridge stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Bridge("bridge stdout unavailable".to_string()))?;

        let mut bridge = Bridge {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            synced_mocks: 0,
        };

        let init = BridgeCommand::Init {
            base_url: self.config.base_url.clone(),
            timeout_ms: self.config.command_timeout.as_millis() as u64,
        };
        let reply = self.roundtrip(&mut bridge, &init).await?;
        if !reply.ok {
            return Err(Error::Bridge(
                reply
                    .error
                    .unwrap_or_else(|| "bridge rejected init".to_string()),
            ));
        }

        Ok(bridge)
    }

    async fn roundtrip(&self, bridge: &mut Bridge, command: &BridgeCommand) -> Result<BridgeReply> {
        let mut line = serde_json::to_string(command)?;
        debug!("bridge <- {}", line);
        line.push('\n');

        bridge
            .stdin
            .write_all(line.as_bytes())
            .await
            .map_err(|e| Error::Bridge(format!("bridge write failed: {}", e)))?;
        bridge
            .stdin
            .flush()
            .await
            .map_err(|e| Error::Bridge(format!("bridge flush failed: {}", e)))?;

        let reply_line = timeout(self.config.command_timeout, bridge.stdout.next_line())
            .await
            .map_err(|_| {
                Error::Bridge(format!(
                    "bridge reply timed out after {} ms",
                    self.config.command_timeout.as_millis()
                ))
            })?
            .map_err(|e| Error::Bridge(format!("bridge read failed: {}", e)))?
            .ok_or_else(|| Error::Bridge("bridge closed its output stream".to_string()))?;

        debug!("bridge -> {}", reply_line);
        Ok(serde_json::from_str(&reply_line)?)
    }

    async fn sync_mocks(&self, bridge: &mut Bridge) -> Result<()> {
        let mocks = {
            let binding = self.binding.lock();
            match binding.as_ref() {
                Some(binding) => binding.mocks.clone(),
                None => return Ok(()),
            }
        };
        let version = mocks.version();
        if version == bridge.synced_mocks {
            return Ok(());
        }

        let handlers = mocks
            .snapshot()
            .into_iter()
            .map(|(pattern, handler)| MockRule {
                pattern,
                status: handler.status,
                body: handler.body,
            })
            .collect();
        let reply = self
            .roundtrip(bridge, &BridgeCommand::SyncMocks { handlers })
            .await?;
        if !reply.ok {
            return Err(Error::Bridge(
                reply
                    .error
                    .unwrap_or_else(|| "bridge rejected mock sync".to_string()),
            ));
        }
        bridge.synced_mocks = version;
        Ok(())
    }

    async fn send(&self, command: BridgeCommand) -> Result<BridgeReply> {
        let mut slot = self.bridge.lock().await;
        if slot.is_none() {
            *slot = Some(self.spawn_bridge().await?);
        }
        let bridge = slot
            .as_mut()
            .ok_or_else(|| Error::Bridge("bridge process unavailable".to_string()))?;

        if Self::needs_mock_sync(&command) {
            self.sync_mocks(bridge).await?;
        }
        self.roundtrip(bridge, &command).await
    }

    /// Run a command whose failure means the assertion did not hold.
    async fn send_assertion(&self, command: BridgeCommand, describe: &str) -> Result<()> {
        let reply = self.send(command).await?;
        if reply.ok {
            return Ok(());
        }
        Err(Error::AssertionFailed(
            reply.error.unwrap_or_else(|| describe.to_string()),
        ))
    }

    /// Run a command whose failure means the driver could not act.
    async fn send_interaction(&self, command: BridgeCommand, describe: &str) -> Result<()> {
        let reply = self.send(command).await?;
        if reply.ok {
            return Ok(());
        }
        Err(Error::Driver(
            reply.error.unwrap_or_else(|| describe.to_string()),
        ))
    }
}

#[async_trait]
impl UiDriver for BrowserDriver {
    fn backend(&self) -> Backend {
        Backend::Browser
    }

    fn bind(&self, binding: ContextBinding) {
        *self.binding.lock() = Some(binding);
    }

    async fn visit(&self, path: &str) -> Result<()> {
        self.send_interaction(
            BridgeCommand::Visit {
                path: path.to_string(),
            },
            "visit failed",
        )
        .await?;
        // Mirror the real location into the simulated one.
        if let Some(router) = self.bound_router() {
            router.navigate(path);
        }
        Ok(())
    }

    async fn fill(&self, target: &Locator, value: &str) -> Result<()> {
        self.send_interaction(
            BridgeCommand::Fill {
                target: target.clone(),
                value: value.to_string(),
            },
            "fill failed",
        )
        .await
    }

    async fn click(&self, target: &Locator) -> Result<()> {
        self.send_interaction(
            BridgeCommand::Click {
                target: target.clone(),
            },
            "click failed",
        )
        .await
    }

    async fn expect_present(&self, target: &Locator) -> Result<()> {
        self.send_assertion(
            BridgeCommand::ExpectPresent {
                target: target.clone(),
            },
            "expected element not present",
        )
        .await
    }

    async fn expect_absent(&self, target: &Locator) -> Result<()> {
        self.send_assertion(
            BridgeCommand::ExpectAbsent {
                target: target.clone(),
            },
            "unexpected element present",
        )
        .await
    }

    async fn expect_text(&self, target: &Locator, needle: &str) -> Result<()> {
        self.send_assertion(
            BridgeCommand::ExpectText {
                target: target.clone(),
                needle: needle.to_string(),
            },
            "expected text not found",
        )
        .await
    }

    async fn expect_url(&self, matcher: &UrlMatch) -> Result<()> {
        self.send_assertion(
            BridgeCommand::ExpectUrl {
                matcher: matcher.clone(),
            },
            "url expectation not met",
        )
        .await
    }

    async fn current_path(&self) -> Result<String> {
        let reply = self.send(BridgeCommand::CurrentPath).await?;
        if !reply.ok {
            return Err(Error::Driver(
                reply
                    .error
                    .unwrap_or_else(|| "current_path failed".to_string()),
            ));
        }
        reply
            .value
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::Bridge("current_path reply missing value".to_string()))
    }

    async fn wait_until(
        &self,
        what: &str,
        probe: &(dyn Fn() -> bool + Send + Sync),
    ) -> Result<()> {
        // Probes observe context-side state, so polling stays local.
        let deadline = Instant::now() + self.config.command_timeout;
        loop {
            if probe() {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(Error::WaitTimeout {
                    what: what.to_string(),
                    waited_ms: self.config.command_timeout.as_millis() as u64,
                });
            }
            sleep(Duration::from_millis(50)).await;
        }
    }
}

impl Drop for BrowserDriver {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.bridge.try_lock() {
            if let Some(bridge) = slot.as_mut() {
                debug!("stopping browser bridge");
                let _ = bridge.child.start_kill();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use understudy_core::locator::TextMatch;

    use super::*;

    #[test]
    fn commands_serialize_as_tagged_json_lines() {
        let fill = BridgeCommand::Fill {
            target: Locator::label(TextMatch::contains("email")),
            value: "test@example.com".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&fill).unwrap(),
            json!({
                "cmd": "fill",
                "target": { "by": "label", "text": { "mode": "contains", "value": "email" } },
                "value": "test@example.com",
            })
        );

        assert_eq!(
            serde_json::to_value(BridgeCommand::CurrentPath).unwrap(),
            json!({ "cmd": "current_path" })
        );
    }

    #[test]
    fn replies_tolerate_missing_fields() {
        let reply: BridgeReply = serde_json::from_str(r#"{"ok":true}"#).unwrap();
        assert!(reply.ok);
        assert!(reply.error.is_none());
        assert!(reply.value.is_none());

        let reply: BridgeReply =
            serde_json::from_str(r#"{"ok":false,"error":"no such element"}"#).unwrap();
        assert_eq!(reply.error.as_deref(), Some("no such element"));
    }

    #[test]
    fn bridge_cmd_splits_on_whitespace() {
        assert_eq!(
            parse_bridge_cmd("node bridge.js --headless"),
            vec!["node", "bridge.js", "--headless"]
        );
        assert!(parse_bridge_cmd("  ").is_empty());
    }

    #[test]
    fn navigation_sensitive_commands_trigger_mock_sync() {
        assert!(BrowserDriver::needs_mock_sync(&BridgeCommand::Visit {
            path: "/login".to_string()
        }));
        assert!(BrowserDriver::needs_mock_sync(&BridgeCommand::Click {
            target: Locator::role("button")
        }));
        assert!(!BrowserDriver::needs_mock_sync(&BridgeCommand::CurrentPath));
        assert!(!BrowserDriver::needs_mock_sync(&BridgeCommand::ExpectUrl {
            matcher: UrlMatch::contains("/dashboard")
        }));
    }
}
