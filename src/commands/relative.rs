//! Relative tab commands
//!
//! Commands that pick targets by position relative to the invoking tab:
//! - Next / Previous: activate the neighbouring tab, wrapping around
//! - RemoveRight / RemoveLeft / RemoveOther: close unpinned tabs on one side
//!
//! The window is always queried fresh. The anchor position is the invoking
//! tab's index in that snapshot, not the possibly stale context index.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::commands::{Action, CommandContext};
use crate::error::{ActionError, Result};
use crate::types::{ExecutionContext, Payload, Tab, TabId, TabQuery, TabUpdate};

// =============================================================================
// Selection
// =============================================================================

/// Step direction for wrap-around selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Forward,
    Backward,
}

/// Neighbouring position of `index` in a collection of `len` entries.
///
/// Wraps past either end; `len` must be non-zero.
pub fn wrap_index(index: usize, len: usize, step: Step) -> usize {
    let index = index % len;
    match step {
        Step::Forward => (index + 1) % len,
        Step::Backward => (index + len - 1) % len,
    }
}

async fn select_relative(
    cx: &CommandContext<'_>,
    ctx: &ExecutionContext,
    step: Step,
) -> Result<()> {
    let tabs = cx.host.query_tabs(&TabQuery::window(ctx.window_id)).await?;
    if tabs.is_empty() {
        return Err(ActionError::TargetGone(format!("window {}", ctx.window_id)));
    }

    let current = tabs
        .iter()
        .position(|t| t.id == ctx.id)
        .unwrap_or(ctx.index);
    let target = &tabs[wrap_index(current, tabs.len(), step)];

    debug!(from = current, to = target.index, "selecting tab");
    cx.host
        .update_tab(
            target.id,
            TabUpdate {
                active: Some(true),
                ..Default::default()
            },
        )
        .await?;
    Ok(())
}

pub struct NextCommand;

#[async_trait]
impl Action for NextCommand {
    fn name(&self) -> &'static str {
        "Next"
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        _payload: &Payload,
    ) -> Result<()> {
        select_relative(cx, ctx, Step::Forward).await
    }
}

pub struct PreviousCommand;

#[async_trait]
impl Action for PreviousCommand {
    fn name(&self) -> &'static str {
        "Previous"
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        _payload: &Payload,
    ) -> Result<()> {
        select_relative(cx, ctx, Step::Backward).await
    }
}

// =============================================================================
// Bulk removal
// =============================================================================

/// Which tabs a bulk removal closes, relative to the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveSide {
    Right,
    Left,
    Other,
}

/// Whether indices strictly increase along the slice
pub fn is_sorted_by_index(tabs: &[Tab]) -> bool {
    tabs.windows(2).all(|pair| pair[0].index < pair[1].index)
}

/// Tabs to close, in the order they should be closed.
///
/// Right scans from the end and Left from the start, each stopping at the
/// first tab on the wrong side of the anchor. The early stop is only taken
/// when the snapshot is sorted by index; otherwise every tab is checked.
/// Other always checks every tab.
pub fn removal_targets(tabs: &[Tab], anchor: usize, side: RemoveSide) -> Vec<TabId> {
    let sorted = is_sorted_by_index(tabs);

    match side {
        RemoveSide::Right if sorted => tabs
            .iter()
            .rev()
            .take_while(|t| t.index > anchor)
            .map(|t| t.id)
            .collect(),
        RemoveSide::Left if sorted => tabs
            .iter()
            .take_while(|t| t.index < anchor)
            .map(|t| t.id)
            .collect(),
        RemoveSide::Right => tabs
            .iter()
            .rev()
            .filter(|t| t.index > anchor)
            .map(|t| t.id)
            .collect(),
        RemoveSide::Left => tabs
            .iter()
            .filter(|t| t.index < anchor)
            .map(|t| t.id)
            .collect(),
        RemoveSide::Other => tabs
            .iter()
            .filter(|t| t.index != anchor)
            .map(|t| t.id)
            .collect(),
    }
}

pub struct RemoveSideCommand {
    pub side: RemoveSide,
}

impl RemoveSideCommand {
    pub fn new(side: RemoveSide) -> Self {
        Self { side }
    }
}

#[async_trait]
impl Action for RemoveSideCommand {
    fn name(&self) -> &'static str {
        match self.side {
            RemoveSide::Right => "RemoveRight",
            RemoveSide::Left => "RemoveLeft",
            RemoveSide::Other => "RemoveOther",
        }
    }

    async fn execute(
        &self,
        cx: &CommandContext<'_>,
        ctx: &ExecutionContext,
        _payload: &Payload,
    ) -> Result<()> {
        // One snapshot provides both the anchor and the candidates.
        let tabs = cx.host.query_tabs(&TabQuery::window(ctx.window_id)).await?;
        let anchor = tabs
            .iter()
            .find(|t| t.id == ctx.id)
            .map(|t| t.index)
            .ok_or_else(|| ActionError::TargetGone(format!("tab {}", ctx.id)))?;

        let unpinned: Vec<Tab> = tabs.into_iter().filter(|t| !t.pinned).collect();
        let targets = removal_targets(&unpinned, anchor, self.side);
        debug!(side = ?self.side, anchor, count = targets.len(), "removing tabs");

        for tab_id in targets {
            if let Err(err) = cx.host.remove_tab(tab_id).await {
                warn!(tab_id, error = %err, "tab removal failed");
            }
        }
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
    use crate::error::HostError;
    use crate::host::{BrowserHost, HostCall, MemoryHost};

    const FIVE: [&str; 5] = ["t0", "t1", "t2", "t3", "t4"];

    fn tab(id: TabId, index: usize) -> Tab {
        Tab {
            id,
            index,
            window_id: 1,
            pinned: false,
            muted: false,
            active: false,
            url: String::new(),
            title: String::new(),
        }
    }

    fn urls(host: &MemoryHost) -> Vec<String> {
        host.tabs(1).into_iter().map(|t| t.url).collect()
    }

    fn active_url(host: &MemoryHost) -> String {
        host.tabs(1).into_iter().find(|t| t.active).unwrap().url
    }

    async fn run(action: &dyn Action, host: &MemoryHost, ctx: &ExecutionContext) -> Result<()> {
        let config = Config::default();
        let cx = CommandContext::new(host, &config);
        action.execute(&cx, ctx, &Payload::default()).await
    }

    #[test]
    fn wrap_index_steps_and_wraps() {
        for len in 1..6 {
            for i in 0..len {
                assert_eq!(wrap_index(i, len, Step::Forward), (i + 1) % len);
                assert_eq!(wrap_index(i, len, Step::Backward), (i + len - 1) % len);
            }
        }
    }

    #[test]
    fn wrap_index_single_entry_stays_put() {
        assert_eq!(wrap_index(0, 1, Step::Forward), 0);
        assert_eq!(wrap_index(0, 1, Step::Backward), 0);
    }

    #[test]
    fn wrap_index_tolerates_out_of_range_index() {
        assert_eq!(wrap_index(7, 3, Step::Forward), 2);
    }

    #[test]
    fn removal_targets_right_scans_from_the_end() {
        let tabs: Vec<Tab> = (0..5).map(|i| tab(i as TabId + 10, i)).collect();
        assert_eq!(removal_targets(&tabs, 2, RemoveSide::Right), vec![14, 13]);
        assert_eq!(removal_targets(&tabs, 2, RemoveSide::Left), vec![10, 11]);
        assert_eq!(
            removal_targets(&tabs, 2, RemoveSide::Other),
            vec![10, 11, 13, 14]
        );
    }

    #[test]
    fn removal_targets_unsorted_falls_back_to_full_scan() {
        let tabs = vec![tab(1, 4), tab(2, 0), tab(3, 3), tab(4, 2), tab(5, 1)];
        assert!(!is_sorted_by_index(&tabs));

        let mut right = removal_targets(&tabs, 2, RemoveSide::Right);
        right.sort();
        assert_eq!(right, vec![1, 3]);

        let mut left = removal_targets(&tabs, 2, RemoveSide::Left);
        left.sort();
        assert_eq!(left, vec![2, 5]);
    }

    #[test]
    fn removal_targets_sparse_indices() {
        let tabs = vec![tab(1, 0), tab(2, 3), tab(3, 7), tab(4, 9)];
        assert_eq!(removal_targets(&tabs, 7, RemoveSide::Other), vec![1, 2, 4]);
        assert_eq!(removal_targets(&tabs, 7, RemoveSide::Right), vec![4]);
        assert_eq!(removal_targets(&tabs, 7, RemoveSide::Left), vec![1, 2]);
    }

    #[tokio::test]
    async fn next_and_previous_wrap_around() {
        let host = MemoryHost::with_tabs(1, &FIVE);

        run(&NextCommand, &host, &context_at(&host, 4)).await.unwrap();
        assert_eq!(active_url(&host), "t0");

        run(&PreviousCommand, &host, &context_at(&host, 0)).await.unwrap();
        assert_eq!(active_url(&host), "t4");

        run(&NextCommand, &host, &context_at(&host, 2)).await.unwrap();
        assert_eq!(active_url(&host), "t3");

        run(&PreviousCommand, &host, &context_at(&host, 2)).await.unwrap();
        assert_eq!(active_url(&host), "t1");
    }

    #[tokio::test]
    async fn next_with_single_tab_reselects_it() {
        let host = MemoryHost::with_tabs(1, &["only"]);
        let ctx = context_at(&host, 0);

        run(&NextCommand, &host, &ctx).await.unwrap();
        run(&PreviousCommand, &host, &ctx).await.unwrap();

        assert_eq!(
            host.calls(),
            vec![
                HostCall::UpdateTab(ctx.id, TabUpdate { active: Some(true), ..Default::default() }),
                HostCall::UpdateTab(ctx.id, TabUpdate { active: Some(true), ..Default::default() }),
            ]
        );
    }

    #[tokio::test]
    async fn next_uses_fresh_position_over_stale_context() {
        let host = MemoryHost::with_tabs(1, &FIVE);
        let mut ctx = context_at(&host, 3);
        let first = host.tabs(1)[0].id;
        host.remove_tab(first).await.unwrap();
        ctx.index = 3; // stale: t3 now sits at index 2

        run(&NextCommand, &host, &ctx).await.unwrap();
        assert_eq!(active_url(&host), "t4");
    }

    #[tokio::test]
    async fn remove_right_keeps_left_side() {
        let host = MemoryHost::with_tabs(1, &FIVE);
        run(&RemoveSideCommand::new(RemoveSide::Right), &host, &context_at(&host, 2))
            .await
            .unwrap();
        assert_eq!(urls(&host), vec!["t0", "t1", "t2"]);
    }

    #[tokio::test]
    async fn remove_left_keeps_right_side() {
        let host = MemoryHost::with_tabs(1, &FIVE);
        run(&RemoveSideCommand::new(RemoveSide::Left), &host, &context_at(&host, 2))
            .await
            .unwrap();
        assert_eq!(urls(&host), vec!["t2", "t3", "t4"]);
    }

    #[tokio::test]
    async fn remove_other_keeps_only_anchor() {
        let host = MemoryHost::with_tabs(1, &FIVE);
        run(&RemoveSideCommand::new(RemoveSide::Other), &host, &context_at(&host, 2))
            .await
            .unwrap();
        assert_eq!(urls(&host), vec!["t2"]);
    }

    #[tokio::test]
    async fn remove_other_handles_sparse_indices() {
        let host = MemoryHost::new();
        for (index, url) in [(0, "a"), (2, "b"), (5, "c"), (6, "d"), (9, "e")] {
            host.add_tab(1, index, false, url);
        }
        let anchor = host.tabs(1)[2].id;
        let ctx = host.context(anchor).unwrap();

        run(&RemoveSideCommand::new(RemoveSide::Other), &host, &ctx)
            .await
            .unwrap();
        assert_eq!(urls(&host), vec!["c"]);
    }

    #[tokio::test]
    async fn bulk_removal_spares_pinned_tabs() {
        let host = MemoryHost::new();
        host.add_tab(1, 0, true, "pinned-0");
        host.add_tab(1, 1, false, "a");
        host.add_tab(1, 2, false, "anchor");
        host.add_tab(1, 3, false, "b");
        let ctx = context_at(&host, 2);

        run(&RemoveSideCommand::new(RemoveSide::Other), &host, &ctx)
            .await
            .unwrap();
        assert_eq!(urls(&host), vec!["pinned-0", "anchor"]);
    }

    #[tokio::test]
    async fn single_tab_removes_nothing() {
        let host = MemoryHost::with_tabs(1, &["only"]);
        let ctx = context_at(&host, 0);
        for side in [RemoveSide::Right, RemoveSide::Left, RemoveSide::Other] {
            run(&RemoveSideCommand::new(side), &host, &ctx).await.unwrap();
        }
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn removal_with_vanished_anchor_is_target_gone() {
        let host = MemoryHost::with_tabs(1, &FIVE);
        let ctx = context_at(&host, 2);
        host.remove_tab(ctx.id).await.unwrap();
        host.clear_calls();

        let err = run(&RemoveSideCommand::new(RemoveSide::Right), &host, &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::TargetGone(_)));
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_removal_does_not_stop_the_rest() {
        let host = MemoryHost::with_tabs(1, &FIVE);
        host.fail("remove_tab", HostError::Rejected("busy".to_string()));

        run(&RemoveSideCommand::new(RemoveSide::Other), &host, &context_at(&host, 0))
            .await
            .unwrap();
        assert_eq!(urls(&host).len(), 5);
    }
}
