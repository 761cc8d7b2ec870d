//! Command implementations for the gesture dispatcher
//!
//! Each command module handles:
//! - Reading fresh host state where the command needs it
//! - Deciding what to change from the context and payload
//! - Issuing the host calls

pub mod history;
pub mod link;
pub mod page;
pub mod relative;
pub mod scroll;
pub mod tab;
pub mod toggle;
pub mod utils;
pub mod window;
pub mod zoom;

pub use history::{BackCommand, ForthCommand, UrlLevelUpCommand};
pub use link::{ImageToTabCommand, LinkToTabCommand, SearchSelectionCommand};
pub use page::{PageOutput, PageOutputCommand};
pub use relative::{NextCommand, PreviousCommand, RemoveSide, RemoveSideCommand};
pub use scroll::ScrollCommand;
pub use tab::{
    DuplicateCommand, NewTabCommand, NewTabPlacement, ReloadAllCommand, ReloadCommand,
    RemoveCommand, RestoreCommand,
};
pub use toggle::{BookmarkCommand, FullscreenCommand, MuteCommand, PinCommand};
pub use window::{
    CloseWindowCommand, NewWindowCommand, SetWindowStateCommand, TabToWindowCommand,
};
pub use zoom::{ZoomInCommand, ZoomOutCommand, ZoomResetCommand};

use std::sync::Arc;

use async_trait::async_trait;

use crate::agent::ScrollTarget;
use crate::config::Config;
use crate::error::Result;
use crate::host::BrowserHost;
use crate::types::{ExecutionContext, Payload, TabId, WindowId, WindowState};

/// Everything a command may reach besides its own arguments
pub struct CommandContext<'a> {
    pub host: &'a dyn BrowserHost,
    pub config: &'a Config,
}

impl<'a> CommandContext<'a> {
    pub fn new(host: &'a dyn BrowserHost, config: &'a Config) -> Self {
        Self { host, config }
    }
}

/// Host object whose state a toggle command reads and then flips
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetKey {
    Tab(TabId),
    Window(WindowId),
    Bookmark(String),
}

/// A named command
#[async_trait]
pub trait Action: Send + Sync {
    /// Name the command is registered under
    fn name(&self) -> &'static str;

    /// Toggle commands return the object they flip.
    ///
    /// The dispatcher serializes invocations sharing a key and returns host
    /// failures of these commands to the caller instead of swallowing them.
    fn toggle_target(&self, _ctx: &ExecutionContext) -> Option<TargetKey> {
        None
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        payload: &Payload,
    ) -> Result<()>;
}

/// Every built-in command
pub fn builtin() -> Vec<Arc<dyn Action>> {
    vec![
        Arc::new(BookmarkCommand),
        Arc::new(DuplicateCommand),
        Arc::new(NewTabCommand::new(NewTabPlacement::End)),
        Arc::new(NewTabCommand::new(NewTabPlacement::After)),
        Arc::new(NewTabCommand::new(NewTabPlacement::Before)),
        Arc::new(ReloadCommand::new(false)),
        Arc::new(ReloadCommand::new(true)),
        Arc::new(RemoveCommand),
        Arc::new(RemoveSideCommand::new(RemoveSide::Right)),
        Arc::new(RemoveSideCommand::new(RemoveSide::Left)),
        Arc::new(RemoveSideCommand::new(RemoveSide::Other)),
        Arc::new(RestoreCommand),
        Arc::new(ZoomInCommand),
        Arc::new(ZoomOutCommand),
        Arc::new(ZoomResetCommand),
        Arc::new(BackCommand),
        Arc::new(ForthCommand),
        Arc::new(PinCommand),
        Arc::new(MuteCommand),
        Arc::new(ScrollCommand::new(ScrollTarget::Top)),
        Arc::new(ScrollCommand::new(ScrollTarget::Bottom)),
        Arc::new(ScrollCommand::new(ScrollTarget::PageDown)),
        Arc::new(ScrollCommand::new(ScrollTarget::PageUp)),
        Arc::new(NextCommand),
        Arc::new(PreviousCommand),
        Arc::new(SetWindowStateCommand::new(WindowState::Maximized)),
        Arc::new(SetWindowStateCommand::new(WindowState::Minimized)),
        Arc::new(FullscreenCommand),
        Arc::new(NewWindowCommand::new(false)),
        Arc::new(NewWindowCommand::new(true)),
        Arc::new(TabToWindowCommand),
        Arc::new(CloseWindowCommand),
        Arc::new(ReloadAllCommand::new(false)),
        Arc::new(ReloadAllCommand::new(true)),
        Arc::new(UrlLevelUpCommand),
        Arc::new(ImageToTabCommand),
        Arc::new(LinkToTabCommand::new(true)),
        Arc::new(LinkToTabCommand::new(false)),
        Arc::new(SearchSelectionCommand),
        Arc::new(PageOutputCommand::new(PageOutput::Pdf)),
        Arc::new(PageOutputCommand::new(PageOutput::Print)),
        Arc::new(PageOutputCommand::new(PageOutput::PrintPreview)),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::host::MemoryHost;
    use crate::types::{ExecutionContext, TabId};

    /// Context of the tab at `position` in window 1
    pub fn context_at(host: &MemoryHost, position: usize) -> ExecutionContext {
        let id: TabId = host.tabs(1)[position].id;
        host.context(id).unwrap()
    }
}
