//! Window commands

use async_trait::async_trait;

use crate::commands::{Action, CommandContext};
use crate::error::Result;
use crate::types::{CreateWindow, ExecutionContext, Payload, WindowState};

/// Puts the invoking window into a fixed state
pub struct SetWindowStateCommand {
    pub state: WindowState,
}

impl SetWindowStateCommand {
    pub fn new(state: WindowState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Action for SetWindowStateCommand {
    fn name(&self) -> &'static str {
        match self.state {
            WindowState::Normal => "NormalWindow",
            WindowState::Minimized => "Minimize",
            WindowState::Maximized => "Maximize",
            WindowState::Fullscreen => "FullscreenWindow",
        }
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        _payload: &Payload,
    ) -> Result<()> {
        cx.host.update_window_state(ctx.window_id, self.state).await?;
        Ok(())
    }
}

pub struct NewWindowCommand {
    pub incognito: bool,
}

impl NewWindowCommand {
    pub fn new(incognito: bool) -> Self {
        Self { incognito }
    }
}

#[async_trait]
impl Action for NewWindowCommand {
    fn name(&self) -> &'static str {
        if self.incognito {
            "NewPrivateWindow"
        } else {
            "NewWindow"
        }
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        _ctx: &ExecutionContext,
        _payload: &Payload,
    ) -> Result<()> {
        cx.host
            .create_window(CreateWindow {
                incognito: self.incognito,
                tab_id: None,
            })
            .await?;
        Ok(())
    }
}

/// Moves the invoking tab into a window of its own
pub struct TabToWindowCommand;

#[async_trait]
impl Action for TabToWindowCommand {
    fn name(&self) -> &'static str {
        "TabToWindow"
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        _payload: &Payload,
    ) -> Result<()> {
        cx.host
            .create_window(CreateWindow {
                incognito: false,
                tab_id: Some(ctx.id),
            })
            .await?;
        Ok(())
    }
}

pub struct CloseWindowCommand;

#[async_trait]
impl Action for CloseWindowCommand {
    fn name(&self) -> &'static str {
        "CloseWindow"
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        _payload: &Payload,
    ) -> Result<()> {
        cx.host.remove_window(ctx.window_id).await?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context_at;
    use crate::config::Config;
    use crate::host::{HostCall, MemoryHost};

    async fn run(action: &dyn Action, host: &MemoryHost, ctx: &ExecutionContext) -> Result<()> {
        let config = Config::default();
        let cx = CommandContext::new(host, &config);
        action.execute(&cx, ctx, &Payload::default()).await
    }

    #[tokio::test]
    async fn maximize_and_minimize_set_window_state() {
        let host = MemoryHost::with_tabs(1, &["a"]);
        let ctx = context_at(&host, 0);

        run(&SetWindowStateCommand::new(WindowState::Maximized), &host, &ctx)
            .await
            .unwrap();
        assert_eq!(host.window(1).unwrap().state, WindowState::Maximized);

        run(&SetWindowStateCommand::new(WindowState::Minimized), &host, &ctx)
            .await
            .unwrap();
        assert_eq!(host.window(1).unwrap().state, WindowState::Minimized);
    }

    #[tokio::test]
    async fn new_private_window_is_incognito() {
        let host = MemoryHost::with_tabs(1, &["a"]);
        run(&NewWindowCommand::new(true), &host, &context_at(&host, 0))
            .await
            .unwrap();

        let windows = host.windows();
        assert_eq!(windows.len(), 2);
        assert!(windows[1].incognito);
        assert_eq!(host.tabs(windows[1].id).len(), 1);
    }

    #[tokio::test]
    async fn tab_to_window_moves_invoking_tab() {
        let host = MemoryHost::with_tabs(1, &["a", "b"]);
        let ctx = context_at(&host, 1);

        run(&TabToWindowCommand, &host, &ctx).await.unwrap();

        let moved = host.tab(ctx.id).unwrap();
        assert_ne!(moved.window_id, 1);
        assert_eq!(host.tabs(1).len(), 1);
        assert_eq!(
            host.calls(),
            vec![HostCall::CreateWindow(CreateWindow {
                incognito: false,
                tab_id: Some(ctx.id),
            })]
        );
    }

    #[tokio::test]
    async fn close_window_removes_window_and_tabs() {
        let host = MemoryHost::with_tabs(1, &["a", "b"]);
        run(&CloseWindowCommand, &host, &context_at(&host, 0))
            .await
            .unwrap();

        assert!(host.window(1).is_none());
        assert!(host.tabs(1).is_empty());
    }
}
