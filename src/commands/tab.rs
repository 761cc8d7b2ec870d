//! Tab management commands
//!
//! Commands for managing browser tabs:
//! - NewTab / NewTabAfter / NewTabBefore: open a blank tab
//! - Duplicate: copy the invoking tab
//! - Reload / ReloadCache / ReloadAll / ReloadAllCaches
//! - Remove: close the invoking tab
//! - Restore: reopen the most recently closed tab or window

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::commands::{Action, CommandContext};
use crate::error::Result;
use crate::types::{CreateTab, ExecutionContext, Payload, TabQuery};

/// Where a new blank tab is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewTabPlacement {
    /// Wherever the host appends new tabs
    End,
    /// Right after the invoking tab
    After,
    /// Right before the invoking tab
    Before,
}

pub struct NewTabCommand {
    pub placement: NewTabPlacement,
}

impl NewTabCommand {
    pub fn new(placement: NewTabPlacement) -> Self {
        Self { placement }
    }
}

#[async_trait]
impl Action for NewTabCommand {
    fn name(&self) -> &'static str {
        match self.placement {
            NewTabPlacement::End => "NewTab",
            NewTabPlacement::After => "NewTabAfter",
            NewTabPlacement::Before => "NewTabBefore",
        }
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        _payload: &Payload,
    ) -> Result<()> {
        let index = match self.placement {
            NewTabPlacement::End => None,
            NewTabPlacement::After => Some(ctx.index + 1),
            NewTabPlacement::Before => Some(ctx.index),
        };

        cx.host
            .create_tab(CreateTab {
                url: None,
                active: true,
                index,
                window_id: Some(ctx.window_id),
            })
            .await?;
        Ok(())
    }
}

pub struct DuplicateCommand;

#[async_trait]
impl Action for DuplicateCommand {
    fn name(&self) -> &'static str {
        "Duplicate"
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        _payload: &Payload,
    ) -> Result<()> {
        cx.host.duplicate_tab(ctx.id).await?;
        Ok(())
    }
}

pub struct ReloadCommand {
    pub bypass_cache: bool,
}

impl ReloadCommand {
    pub fn new(bypass_cache: bool) -> Self {
        Self { bypass_cache }
    }
}

#[async_trait]
impl Action for ReloadCommand {
    fn name(&self) -> &'static str {
        if self.bypass_cache {
            "ReloadCache"
        } else {
            "Reload"
        }
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        _payload: &Payload,
    ) -> Result<()> {
        cx.host.reload_tab(ctx.id, self.bypass_cache).await?;
        Ok(())
    }
}

/// Reload every tab of the invoking tab's window
pub struct ReloadAllCommand {
    pub bypass_cache: bool,
}

impl ReloadAllCommand {
    pub fn new(bypass_cache: bool) -> Self {
        Self { bypass_cache }
    }
}

#[async_trait]
impl Action for ReloadAllCommand {
    fn name(&self) -> &'static str {
        if self.bypass_cache {
            "ReloadAllCaches"
        } else {
            "ReloadAll"
        }
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        _payload: &Payload,
    ) -> Result<()> {
        let tabs = cx.host.query_tabs(&TabQuery::window(ctx.window_id)).await?;
        for tab in tabs {
            if let Err(err) = cx.host.reload_tab(tab.id, self.bypass_cache).await {
                warn!(tab_id = tab.id, error = %err, "tab reload failed");
            }
        }
        Ok(())
    }
}

pub struct RemoveCommand;

#[async_trait]
impl Action for RemoveCommand {
    fn name(&self) -> &'static str {
        "Remove"
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        _payload: &Payload,
    ) -> Result<()> {
        cx.host.remove_tab(ctx.id).await?;
        Ok(())
    }
}

pub struct RestoreCommand;

#[async_trait]
impl Action for RestoreCommand {
    fn name(&self) -> &'static str {
        "Restore"
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        _ctx: &ExecutionContext,
        _payload: &Payload,
    ) -> Result<()> {
        let sessions = cx.host.recently_closed().await?;
        match sessions.first() {
            Some(latest) => cx.host.restore_session(&latest.session_id).await?,
            None => debug!("nothing to restore"),
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
