//! Scroll command implementation
//!
//! Asks the in-page agent to animate the scroll position of the gesture's
//! frame. The animation itself runs in the page.

use async_trait::async_trait;

use crate::agent::{PageMessage, ScrollTarget};
use crate::commands::{Action, CommandContext};
use crate::error::Result;
use crate::types::{ExecutionContext, Payload};

pub struct ScrollCommand {
    pub target: ScrollTarget,
}

impl ScrollCommand {
    pub fn new(target: ScrollTarget) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Action for ScrollCommand {
    fn name(&self) -> &'static str {
        match self.target {
            ScrollTarget::Top => "ScrollTop",
            ScrollTarget::Bottom => "ScrollBottom",
            ScrollTarget::PageDown => "ScrollPageDown",
            ScrollTarget::PageUp => "ScrollPageUp",
        }
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        payload: &Payload,
    ) -> Result<()> {
        cx.host
            .send_page_message(ctx.id, payload.frame(), PageMessage::scroll(self.target))
            .await?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Easing;
    use crate::commands::test_support::context_at;
    use crate::config::Config;
    use crate::host::{HostCall, MemoryHost};

    #[tokio::test]
    async fn scroll_bottom_sends_linear_message_to_frame() {
        let host = MemoryHost::with_tabs(1, &["a"]);
        let ctx = context_at(&host, 0);
        let config = Config::default();
        let cx = CommandContext::new(&host, &config);
        let payload = Payload {
            frame_id: Some(3),
            ..Default::default()
        };

        ScrollCommand::new(ScrollTarget::Bottom)
            .execute(&cx, &ctx, &payload)
            .await
            .unwrap();

        let calls = host.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            HostCall::PageMessage {
                frame_id,
                message: PageMessage::Scroll { target, easing, .. },
                ..
            } => {
                assert_eq!(*frame_id, 3);
                assert_eq!(*target, ScrollTarget::Bottom);
                assert_eq!(*easing, Easing::Linear);
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn names_follow_targets() {
        assert_eq!(ScrollCommand::new(ScrollTarget::Top).name(), "ScrollTop");
        assert_eq!(ScrollCommand::new(ScrollTarget::PageUp).name(), "ScrollPageUp");
    }
}
