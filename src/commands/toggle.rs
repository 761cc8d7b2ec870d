//! Toggle commands
//!
//! Each toggle reads the current state from the host and then applies the
//! opposite. Read and write are two separate host calls; the dispatcher
//! queues toggles per [`TargetKey`] so two invocations on the same target
//! cannot both observe the same starting state.

use async_trait::async_trait;
use tracing::debug;

use crate::commands::{Action, CommandContext, TargetKey};
use crate::error::Result;
use crate::types::{ExecutionContext, Payload, TabUpdate, WindowState};

/// Removes the bookmark of the page if there is one, else bookmarks it
pub struct BookmarkCommand;

#[async_trait]
impl Action for BookmarkCommand {
    fn name(&self) -> &'static str {
        "Bookmark"
    }

    fn toggle_target(&self, ctx: &ExecutionContext) -> Option<TargetKey> {
        Some(TargetKey::Bookmark(ctx.url.clone()))
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        _payload: &Payload,
    ) -> Result<()> {
        if ctx.url.is_empty() {
            debug!(tab_id = ctx.id, "tab has no URL to bookmark");
            return Ok(());
        }

        let existing = cx.host.search_bookmarks(&ctx.url).await?;
        match existing.first() {
            Some(bookmark) => {
                cx.host.remove_bookmark(&bookmark.id).await?;
                debug!(url = %ctx.url, "bookmark removed");
            }
            None => {
                cx.host.create_bookmark(&ctx.url, &ctx.title).await?;
                debug!(url = %ctx.url, "bookmark created");
            }
        }
        Ok(())
    }
}

pub struct PinCommand;

#[async_trait]
impl Action for PinCommand {
    fn name(&self) -> &'static str {
        "Pin"
    }

    fn toggle_target(&self, ctx: &ExecutionContext) -> Option<TargetKey> {
        Some(TargetKey::Tab(ctx.id))
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        _payload: &Payload,
    ) -> Result<()> {
        let tab = cx.host.get_tab(ctx.id).await?;
        cx.host
            .update_tab(
                ctx.id,
                TabUpdate {
                    pinned: Some(!tab.pinned),
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }
}

pub struct MuteCommand;

#[async_trait]
impl Action for MuteCommand {
    fn name(&self) -> &'static str {
        "Mute"
    }

    fn toggle_target(&self, ctx: &ExecutionContext) -> Option<TargetKey> {
        Some(TargetKey::Tab(ctx.id))
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        _payload: &Payload,
    ) -> Result<()> {
        let tab = cx.host.get_tab(ctx.id).await?;
        cx.host
            .update_tab(
                ctx.id,
                TabUpdate {
                    muted: Some(!tab.muted),
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }
}

/// Enters fullscreen, or drops back to maximized when already fullscreen
pub struct FullscreenCommand;

#[async_trait]
impl Action for FullscreenCommand {
    fn name(&self) -> &'static str {
        "Fullscreen"
    }

    fn toggle_target(&self, ctx: &ExecutionContext) -> Option<TargetKey> {
        Some(TargetKey::Window(ctx.window_id))
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        _payload: &Payload,
    ) -> Result<()> {
        let window = cx.host.get_window(ctx.window_id).await?;
        let next = if window.state == WindowState::Fullscreen {
            WindowState::Maximized
        } else {
            WindowState::Fullscreen
        };
        cx.host.update_window_state(ctx.window_id, next).await?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
