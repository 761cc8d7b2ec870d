//! Browser history navigation commands
//!
//! Commands for navigating from inside the page:
//! - Back: go back in history
//! - Forth: go forward in history
//! - URLLevelUp: navigate to the parent path of the current URL
//!
//! All three are delivered to the in-page agent of the frame the gesture
//! started in.

use async_trait::async_trait;

use crate::agent::PageMessage;
use crate::commands::{Action, CommandContext};
use crate::error::Result;
use crate::types::{ExecutionContext, Payload};

async fn send(
    cx: &CommandContext<'_>,
    ctx: &ExecutionContext,
    payload: &Payload,
    message: PageMessage,
) -> Result<()> {
    cx.host
        .send_page_message(ctx.id, payload.frame(), message)
        .await?;
    Ok(())
}

/// Navigate back in browser history
pub struct BackCommand;

#[async_trait]
impl Action for BackCommand {
    fn name(&self) -> &'static str {
        "Back"
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        payload: &Payload,
    ) -> Result<()> {
        send(cx, ctx, payload, PageMessage::HistoryBack).await
    }
}

/// Navigate forward in browser history
pub struct ForthCommand;

#[async_trait]
impl Action for ForthCommand {
    fn name(&self) -> &'static str {
        "Forth"
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        payload: &Payload,
    ) -> Result<()> {
        send(cx, ctx, payload, PageMessage::HistoryForward).await
    }
}

pub struct UrlLevelUpCommand;

#[async_trait]
impl Action for UrlLevelUpCommand {
    fn name(&self) -> &'static str {
        "URLLevelUp"
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        payload: &Payload,
    ) -> Result<()> {
        send(cx, ctx, payload, PageMessage::UrlLevelUp).await
    }
}

// =============================================================================
// Tests
// =============================================================================
