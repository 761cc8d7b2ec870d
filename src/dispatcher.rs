//! Command dispatcher
//!
//! Resolves a command name against the [`CommandTable`], runs the command
//! with the invocation's context and payload, and decides which failures
//! reach the caller.
//!
//! Toggle commands sharing a target are queued behind a per-target async
//! mutex when `serialize_toggles` is on.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

use crate::commands::utils::current_timestamp;
use crate::commands::{Action, CommandContext, TargetKey};
use crate::config::Config;
use crate::error::{ActionError, Result};
use crate::host::BrowserHost;
use crate::registry::CommandTable;
use crate::types::{ExecutionContext, Payload};

type TargetLock = Arc<tokio::sync::Mutex<()>>;

pub struct Dispatcher {
    table: CommandTable,
    host: Arc<dyn BrowserHost>,
    config: Config,
    locks: Mutex<HashMap<TargetKey, TargetLock>>,
}

impl Dispatcher {
    /// Dispatcher over every built-in command
    pub fn new(host: Arc<dyn BrowserHost>, config: Config) -> Result<Self> {
        Ok(Self::with_table(CommandTable::builtin()?, host, config))
    }

    pub fn with_table(table: CommandTable, host: Arc<dyn BrowserHost>, config: Config) -> Self {
        Self {
            table,
            host,
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the command registered under `name`.
    ///
    /// Unknown names fail before any host call. A missing payload is handed
    /// to the command as an empty one.
    pub async fn dispatch(
        &self,
        name: &str,
        ctx: &ExecutionContext,
        payload: Option<&Payload>,
    ) -> Result<()> {
        let Some(action) = self.table.get(name) else {
            warn!(command = name, "unknown command");
            return Err(ActionError::UnknownCommand(name.to_string()));
        };

        let span = info_span!(
            "dispatch",
            command = action.name(),
            invocation = %Uuid::new_v4(),
            at = %current_timestamp(),
            tab_id = ctx.id,
        );

        let empty = Payload::default();
        let payload = payload.unwrap_or(&empty);

        self.run(action.as_ref(), ctx, payload)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        action: &dyn Action,
        ctx: &ExecutionContext,
        payload: &Payload,
    ) -> Result<()> {
        let target = action.toggle_target(ctx);
        let is_toggle = target.is_some();
        let cx = CommandContext::new(self.host.as_ref(), &self.config);

        let result = match target.filter(|_| self.config.serialize_toggles) {
            Some(key) => {
                let lock = self.target_lock(&key);
                let outcome = {
                    let _guard = lock.lock().await;
                    action.execute(&cx, ctx, payload).await
                };
                drop(lock);
                self.release_idle_locks();
                outcome
            }
            None => action.execute(&cx, ctx, payload).await,
        };

        match result {
            Ok(()) => {
                debug!("command completed");
                Ok(())
            }
            Err(err) if err.is_reportable(is_toggle) => {
                warn!(code = err.code(), error = %err, "command failed");
                Err(err)
            }
            Err(err) => {
                warn!(code = err.code(), error = %err, "command failure ignored");
                Ok(())
            }
        }
    }

    fn target_lock(&self, key: &TargetKey) -> TargetLock {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(key.clone()).or_default().clone()
    }

    /// Drop queue entries no invocation is holding or waiting on
    fn release_idle_locks(&self) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    #[cfg(test)]
    fn pending_targets(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HostError;
    use crate::host::{BrowserHost, HostCall, MAX_ZOOM, MIN_ZOOM, MemoryHost};
    use crate::types::TabUpdate;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    }

    fn setup(urls: &[&str], config: Config) -> (Arc<MemoryHost>, Dispatcher) {
        init_tracing();
        let host = Arc::new(MemoryHost::with_tabs(1, urls));
        let dispatcher = Dispatcher::new(host.clone(), config).unwrap();
        (host, dispatcher)
    }

    fn context(host: &MemoryHost, position: usize) -> ExecutionContext {
        let id = host.tabs(1)[position].id;
        host.context(id).unwrap()
    }

    #[tokio::test]
    async fn unknown_command_is_reported_without_host_calls() {
        let (host, dispatcher) = setup(&["a"], Config::default());
        let ctx = context(&host, 0);

        let err = dispatcher.dispatch("Teleport", &ctx, None).await.unwrap_err();

        assert!(matches!(err, ActionError::UnknownCommand(ref name) if name == "Teleport"));
        assert_eq!(err.code(), "UNKNOWN_COMMAND");
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn vanished_tab_is_swallowed() {
        let (host, dispatcher) = setup(&["a", "b"], Config::default());
        let ctx = context(&host, 1);
        host.remove_tab(ctx.id).await.unwrap();
        host.clear_calls();

        dispatcher.dispatch("Remove", &ctx, None).await.unwrap();
        dispatcher.dispatch("Pin", &ctx, None).await.unwrap();
        dispatcher.dispatch("Reload", &ctx, None).await.unwrap();
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn host_failure_is_swallowed_for_plain_commands() {
        let (host, dispatcher) = setup(&["a"], Config::default());
        host.fail("reload_tab", HostError::Rejected("busy".to_string()));

        dispatcher
            .dispatch("Reload", &context(&host, 0), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn host_failure_is_surfaced_for_toggles() {
        let (host, dispatcher) = setup(&["a"], Config::default());
        host.fail("update_tab", HostError::Rejected("denied".to_string()));

        let err = dispatcher
            .dispatch("Mute", &context(&host, 0), None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "HOST_OPERATION_FAILED");
    }

    #[tokio::test]
    async fn concurrent_toggles_on_one_tab_net_out() {
        let (host, dispatcher) = setup(&["a"], Config::default());
        let ctx = context(&host, 0);

        let (first, second) = tokio::join!(
            dispatcher.dispatch("Pin", &ctx, None),
            dispatcher.dispatch("Pin", &ctx, None),
        );
        first.unwrap();
        second.unwrap();

        assert!(!host.tab(ctx.id).unwrap().pinned);
        assert_eq!(dispatcher.pending_targets(), 0);
    }

    #[tokio::test]
    async fn unserialized_toggles_race() {
        let config = Config {
            serialize_toggles: false,
            ..Config::default()
        };
        let (host, dispatcher) = setup(&["a"], config);
        let ctx = context(&host, 0);

        let (first, second) = tokio::join!(
            dispatcher.dispatch("Pin", &ctx, None),
            dispatcher.dispatch("Pin", &ctx, None),
        );
        first.unwrap();
        second.unwrap();

        // Both invocations read "unpinned" before either wrote
        let pin = TabUpdate {
            pinned: Some(true),
            ..Default::default()
        };
        assert_eq!(
            host.calls(),
            vec![
                HostCall::UpdateTab(ctx.id, pin.clone()),
                HostCall::UpdateTab(ctx.id, pin),
            ]
        );
        assert!(host.tab(ctx.id).unwrap().pinned);
    }

    #[tokio::test]
    async fn toggles_on_different_tabs_do_not_block_each_other() {
        let (host, dispatcher) = setup(&["a", "b"], Config::default());
        let a = context(&host, 0);
        let b = context(&host, 1);

        let (first, second) = tokio::join!(
            dispatcher.dispatch("Mute", &a, None),
            dispatcher.dispatch("Mute", &b, None),
        );
        first.unwrap();
        second.unwrap();

        assert!(host.tab(a.id).unwrap().muted);
        assert!(host.tab(b.id).unwrap().muted);
    }

    #[tokio::test]
    async fn payload_less_link_commands_open_nothing() {
        let (host, dispatcher) = setup(&["a"], Config::default());
        let ctx = context(&host, 0);

        for name in ["LinkToForegroundTab", "LinkToBackgroundTab", "ImageToTab"] {
            dispatcher.dispatch(name, &ctx, None).await.unwrap();
        }

        assert!(host.calls().is_empty());
        assert_eq!(host.tabs(1).len(), 1);
    }

    #[tokio::test]
    async fn zoom_stays_within_bounds() {
        let (host, dispatcher) = setup(&["a"], Config::default());
        let ctx = context(&host, 0);

        for _ in 0..5 {
            dispatcher.dispatch("ZoomIn", &ctx, None).await.unwrap();
        }
        assert_eq!(host.zoom(ctx.id), MAX_ZOOM);

        for _ in 0..5 {
            dispatcher.dispatch("ZoomOut", &ctx, None).await.unwrap();
        }
        assert_eq!(host.zoom(ctx.id), MIN_ZOOM);

        dispatcher.dispatch("ZoomReset", &ctx, None).await.unwrap();
        assert_eq!(host.zoom(ctx.id), 1.0);
    }

    #[tokio::test]
    async fn next_wraps_through_dispatch() {
        let (host, dispatcher) = setup(&["a", "b", "c"], Config::default());
        let last = context(&host, 2);

        dispatcher.dispatch("Next", &last, None).await.unwrap();

        assert!(host.tabs(1)[0].active);
    }
}
