//! Type definitions shared by commands and the browser host
//!
//! Field names serialize in camelCase to line up with the extension host's
//! own records.

use serde::{Deserialize, Serialize};

// =============================================================================
// Identifiers
// =============================================================================

/// Opaque tab identifier assigned by the host
pub type TabId = i32;

/// Opaque window identifier assigned by the host
pub type WindowId = i32;

/// Frame identifier within a tab; `0` is the top frame
pub type FrameId = i32;

/// Frame targeted when a payload does not name one
pub const TOP_FRAME_ID: FrameId = 0;

// =============================================================================
// Invocation Types
// =============================================================================

/// The tab a command acts upon, resolved by the gesture recognizer.
///
/// Values reflect host state at resolution time and may be stale when the
/// command executes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionContext {
    pub id: TabId,
    pub index: usize,
    pub window_id: WindowId,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default, rename = "mutedState")]
    pub muted: bool,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
}

/// Optional per-invocation data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<FrameId>,
}

impl Payload {
    /// Target frame, defaulting to the top frame
    pub fn frame(&self) -> FrameId {
        self.frame_id.unwrap_or(TOP_FRAME_ID)
    }

    /// Selection text, `None` when absent or blank
    pub fn selection_text(&self) -> Option<&str> {
        non_blank(self.selection.as_deref())
    }

    /// Link target, `None` when absent or blank
    pub fn link(&self) -> Option<&str> {
        non_blank(self.href.as_deref())
    }

    /// Image source, `None` when absent or blank
    pub fn image_source(&self) -> Option<&str> {
        non_blank(self.src.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// =============================================================================
// Host Records
// =============================================================================

/// A tab as reported by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: TabId,
    pub index: usize,
    pub window_id: WindowId,
    pub pinned: bool,
    pub muted: bool,
    pub active: bool,
    pub url: String,
    pub title: String,
}

/// Window display states
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
    Fullscreen,
}

/// A window as reported by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    pub id: WindowId,
    pub state: WindowState,
    pub incognito: bool,
}

/// A bookmark node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub url: String,
    pub title: String,
}

/// A recently closed tab or window that can be restored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosedSession {
    pub session_id: String,
}

// =============================================================================
// Host Requests
// =============================================================================

/// Filters for a tab query. Results are ordered by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_id: Option<WindowId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
}

impl TabQuery {
    /// Every tab of a window
    pub fn window(window_id: WindowId) -> Self {
        Self {
            window_id: Some(window_id),
            pinned: None,
        }
    }

    /// Restrict to pinned or unpinned tabs
    pub fn pinned(mut self, pinned: bool) -> Self {
        self.pinned = Some(pinned);
        self
    }

    /// Whether a tab satisfies this query
    pub fn matches(&self, tab: &Tab) -> bool {
        self.window_id.is_none_or(|w| w == tab.window_id)
            && self.pinned.is_none_or(|p| p == tab.pinned)
    }
}

/// Properties for a new tab
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTab {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_id: Option<WindowId>,
}

/// Tab properties to change; `None` leaves a property untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,
}

/// Properties for a new window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWindow {
    pub incognito: bool,
    /// Move this tab into the new window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<TabId>,
}

// =============================================================================
// Tests
// =============================================================================
