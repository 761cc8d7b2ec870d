//! Zoom commands
//!
//! Zooming in doubles the factor and zooming out halves it, clamped to the
//! range the host accepts.

use async_trait::async_trait;

use crate::commands::{Action, CommandContext};
use crate::error::Result;
use crate::host::{DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM};
use crate::types::{ExecutionContext, Payload};

pub fn zoom_in(factor: f64) -> f64 {
    (factor * 2.0).min(MAX_ZOOM)
}

pub fn zoom_out(factor: f64) -> f64 {
    (factor / 2.0).max(MIN_ZOOM)
}

pub struct ZoomInCommand;

#[async_trait]
impl Action for ZoomInCommand {
    fn name(&self) -> &'static str {
        "ZoomIn"
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        _payload: &Payload,
    ) -> Result<()> {
        let current = cx.host.get_zoom(ctx.id).await?;
        cx.host.set_zoom(ctx.id, zoom_in(current)).await?;
        Ok(())
    }
}

pub struct ZoomOutCommand;

#[async_trait]
impl Action for ZoomOutCommand {
    fn name(&self) -> &'static str {
        "ZoomOut"
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        _payload: &Payload,
    ) -> Result<()> {
        let current = cx.host.get_zoom(ctx.id).await?;
        cx.host.set_zoom(ctx.id, zoom_out(current)).await?;
        Ok(())
    }
}

pub struct ZoomResetCommand;

#[async_trait]
impl Action for ZoomResetCommand {
    fn name(&self) -> &'static str {
        "ZoomReset"
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        _payload: &Payload,
    ) -> Result<()> {
        cx.host.set_zoom(ctx.id, DEFAULT_ZOOM).await?;
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
    use crate::host::MemoryHost;

    async fn run(action: &dyn Action, host: &MemoryHost, ctx: &ExecutionContext) -> Result<()> {
        let config = Config::default();
        let cx = CommandContext::new(host, &config);
        action.execute(&cx, ctx, &Payload::default()).await
    }

    #[test]
    fn zoom_steps_double_and_halve() {
        assert_eq!(zoom_in(1.0), 2.0);
        assert_eq!(zoom_out(1.0), 0.5);
    }

    #[test]
    fn zoom_steps_clamp_to_host_range() {
        assert_eq!(zoom_in(2.0), MAX_ZOOM);
        assert_eq!(zoom_in(MAX_ZOOM), MAX_ZOOM);
        assert_eq!(zoom_out(0.5), MIN_ZOOM);
        assert_eq!(zoom_out(MIN_ZOOM), MIN_ZOOM);
    }

    #[tokio::test]
    async fn repeated_zoom_in_saturates() {
        let host = MemoryHost::with_tabs(1, &["a"]);
        let ctx = context_at(&host, 0);

        for _ in 0..4 {
            run(&ZoomInCommand, &host, &ctx).await.unwrap();
        }
        assert_eq!(host.zoom(ctx.id), MAX_ZOOM);
    }

    #[tokio::test]
    async fn repeated_zoom_out_saturates() {
        let host = MemoryHost::with_tabs(1, &["a"]);
        let ctx = context_at(&host, 0);

        for _ in 0..4 {
            run(&ZoomOutCommand, &host, &ctx).await.unwrap();
        }
        assert_eq!(host.zoom(ctx.id), MIN_ZOOM);
    }

    #[tokio::test]
    async fn zoom_reset_returns_to_default() {
        let host = MemoryHost::with_tabs(1, &["a"]);
        let ctx = context_at(&host, 0);

        run(&ZoomInCommand, &host, &ctx).await.unwrap();
        run(&ZoomResetCommand, &host, &ctx).await.unwrap();
        assert_eq!(host.zoom(ctx.id), DEFAULT_ZOOM);
    }
}
