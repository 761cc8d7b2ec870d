//! Browser host capabilities
//!
//! Commands never touch the browser directly. Everything they read or change
//! goes through [`BrowserHost`], which the embedding extension implements on
//! top of its tab, window, bookmark and session APIs.
//!
//! Every call is a suspension point: other invocations may run between a
//! command's query and its follow-up mutation.

pub mod memory;

pub use memory::{HostCall, MemoryHost};

use async_trait::async_trait;

use crate::agent::PageMessage;
use crate::error::HostResult;
use crate::types::{
    Bookmark, ClosedSession, CreateTab, CreateWindow, FrameId, Tab, TabId, TabQuery, TabUpdate,
    Window, WindowId, WindowState,
};

/// Smallest zoom factor a tab accepts
pub const MIN_ZOOM: f64 = 0.3;

/// Largest zoom factor a tab accepts
pub const MAX_ZOOM: f64 = 3.0;

/// Default zoom factor
pub const DEFAULT_ZOOM: f64 = 1.0;

#[async_trait]
pub trait BrowserHost: Send + Sync {
    // -------------------------------------------------------------------------
    // Tabs
    // -------------------------------------------------------------------------

    /// Tabs matching `query`, ordered by window then index
    async fn query_tabs(&self, query: &TabQuery) -> HostResult<Vec<Tab>>;

    async fn get_tab(&self, tab_id: TabId) -> HostResult<Tab>;

    async fn create_tab(&self, props: CreateTab) -> HostResult<Tab>;

    async fn update_tab(&self, tab_id: TabId, update: TabUpdate) -> HostResult<Tab>;

    async fn remove_tab(&self, tab_id: TabId) -> HostResult<()>;

    async fn duplicate_tab(&self, tab_id: TabId) -> HostResult<Tab>;

    async fn reload_tab(&self, tab_id: TabId, bypass_cache: bool) -> HostResult<()>;

    async fn get_zoom(&self, tab_id: TabId) -> HostResult<f64>;

    async fn set_zoom(&self, tab_id: TabId, factor: f64) -> HostResult<()>;

    /// Deliver a message to the in-page agent of one frame
    async fn send_page_message(
        &self,
        tab_id: TabId,
        frame_id: FrameId,
        message: PageMessage,
    ) -> HostResult<()>;

    // -------------------------------------------------------------------------
    // Windows
    // -------------------------------------------------------------------------

    async fn get_window(&self, window_id: WindowId) -> HostResult<Window>;

    async fn create_window(&self, props: CreateWindow) -> HostResult<Window>;

    async fn update_window_state(&self, window_id: WindowId, state: WindowState)
    -> HostResult<()>;

    async fn remove_window(&self, window_id: WindowId) -> HostResult<()>;

    // -------------------------------------------------------------------------
    // Bookmarks
    // -------------------------------------------------------------------------

    async fn search_bookmarks(&self, url: &str) -> HostResult<Vec<Bookmark>>;

    async fn create_bookmark(&self, url: &str, title: &str) -> HostResult<Bookmark>;

    async fn remove_bookmark(&self, bookmark_id: &str) -> HostResult<()>;

    // -------------------------------------------------------------------------
    // Sessions
    // -------------------------------------------------------------------------

    /// Recently closed tabs and windows, most recent first
    async fn recently_closed(&self) -> HostResult<Vec<ClosedSession>>;

    async fn restore_session(&self, session_id: &str) -> HostResult<()>;

    // -------------------------------------------------------------------------
    // Page output
    // -------------------------------------------------------------------------

    async fn save_as_pdf(&self, tab_id: TabId) -> HostResult<()>;

    async fn print(&self, tab_id: TabId) -> HostResult<()>;

    async fn print_preview(&self, tab_id: TabId) -> HostResult<()>;
}
