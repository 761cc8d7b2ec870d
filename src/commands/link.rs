//! Commands that open gesture content in a new tab
//!
//! New tabs go right after the invoking tab. A command whose payload lacks
//! the field it needs does nothing.

use async_trait::async_trait;
use tracing::debug;

use crate::commands::utils::{is_url, search_url};
use crate::commands::{Action, CommandContext};
use crate::error::Result;
use crate::types::{CreateTab, ExecutionContext, Payload};

async fn open_next_to(
    cx: &CommandContext<'_>,
    ctx: &ExecutionContext,
    url: String,
    active: bool,
) -> Result<()> {
    cx.host
        .create_tab(CreateTab {
            url: Some(url),
            active,
            index: Some(ctx.index + 1),
            window_id: Some(ctx.window_id),
        })
        .await?;
    Ok(())
}

pub struct ImageToTabCommand;

#[async_trait]
impl Action for ImageToTabCommand {
    fn name(&self) -> &'static str {
        "ImageToTab"
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        payload: &Payload,
    ) -> Result<()> {
        let Some(src) = payload.image_source() else {
            debug!("no image under gesture");
            return Ok(());
        };
        open_next_to(cx, ctx, src.to_string(), true).await
    }
}

/// Opens the gesture link, or a selected URL, in a new tab
pub struct LinkToTabCommand {
    pub active: bool,
}

impl LinkToTabCommand {
    pub fn new(active: bool) -> Self {
        Self { active }
    }
}

#[async_trait]
impl Action for LinkToTabCommand {
    fn name(&self) -> &'static str {
        if self.active {
            "LinkToForegroundTab"
        } else {
            "LinkToBackgroundTab"
        }
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        payload: &Payload,
    ) -> Result<()> {
        // A selection that is itself a URL wins over the link under the pointer
        let target = payload
            .selection_text()
            .filter(|text| is_url(text))
            .or_else(|| payload.link());

        let Some(url) = target else {
            debug!("no link under gesture");
            return Ok(());
        };
        open_next_to(cx, ctx, url.to_string(), self.active).await
    }
}

pub struct SearchSelectionCommand;

#[async_trait]
impl Action for SearchSelectionCommand {
    fn name(&self) -> &'static str {
        "SearchSelection"
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        payload: &Payload,
    ) -> Result<()> {
        let Some(selection) = payload.selection_text() else {
            debug!("nothing selected");
            return Ok(());
        };
        let url = search_url(&cx.config.search_url, selection);
        open_next_to(cx, ctx, url, true).await
    }
}

// =============================================================================
// Tests
// =============================================================================
