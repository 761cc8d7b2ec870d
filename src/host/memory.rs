//! In-memory browser host
//!
//! A [`BrowserHost`] backed by plain collections. Used to exercise commands
//! without a browser: every mutating call is recorded as a [`HostCall`], and
//! failures can be injected per operation.
//!
//! Each call yields to the scheduler before touching state, so concurrent
//! invocations interleave at host calls the way they do against a real
//! browser.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::agent::PageMessage;
use crate::error::{HostError, HostResult};
use crate::host::{BrowserHost, DEFAULT_ZOOM, MAX_ZOOM, MIN_ZOOM};
use crate::types::{
    Bookmark, ClosedSession, CreateTab, CreateWindow, ExecutionContext, FrameId, Tab, TabId,
    TabQuery, TabUpdate, Window, WindowId, WindowState,
};

/// URL given to tabs created without one
pub const NEW_TAB_URL: &str = "about:newtab";

/// A mutating call observed by [`MemoryHost`]
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    CreateTab(CreateTab),
    UpdateTab(TabId, TabUpdate),
    RemoveTab(TabId),
    DuplicateTab(TabId),
    ReloadTab { tab_id: TabId, bypass_cache: bool },
    SetZoom(TabId, f64),
    PageMessage {
        tab_id: TabId,
        frame_id: FrameId,
        message: PageMessage,
    },
    CreateWindow(CreateWindow),
    UpdateWindowState(WindowId, WindowState),
    RemoveWindow(WindowId),
    CreateBookmark { url: String, title: String },
    RemoveBookmark(String),
    RestoreSession(String),
    SaveAsPdf(TabId),
    Print(TabId),
    PrintPreview(TabId),
}

#[derive(Debug, Default)]
struct State {
    tabs: Vec<Tab>,
    windows: Vec<Window>,
    bookmarks: Vec<Bookmark>,
    closed: Vec<ClosedSession>,
    zoom: HashMap<TabId, f64>,
    calls: Vec<HostCall>,
    failures: HashMap<String, HostError>,
    next_id: i32,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn check(&self, operation: &str) -> HostResult<()> {
        match self.failures.get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn tab(&self, tab_id: TabId) -> HostResult<&Tab> {
        self.tabs
            .iter()
            .find(|t| t.id == tab_id)
            .ok_or_else(|| HostError::NotFound(format!("tab {}", tab_id)))
    }

    fn tab_mut(&mut self, tab_id: TabId) -> HostResult<&mut Tab> {
        self.tabs
            .iter_mut()
            .find(|t| t.id == tab_id)
            .ok_or_else(|| HostError::NotFound(format!("tab {}", tab_id)))
    }

    fn window_mut(&mut self, window_id: WindowId) -> HostResult<&mut Window> {
        self.windows
            .iter_mut()
            .find(|w| w.id == window_id)
            .ok_or_else(|| HostError::NotFound(format!("window {}", window_id)))
    }

    fn ensure_window(&mut self, window_id: WindowId) {
        if !self.windows.iter().any(|w| w.id == window_id) {
            self.windows.push(Window {
                id: window_id,
                state: WindowState::Normal,
                incognito: false,
            });
        }
        self.next_id = self.next_id.max(window_id);
    }

    /// Reassign contiguous indices in a window, keeping relative order
    fn renumber(&mut self, window_id: WindowId) {
        let mut order: Vec<(usize, TabId)> = self
            .tabs
            .iter()
            .filter(|t| t.window_id == window_id)
            .map(|t| (t.index, t.id))
            .collect();
        order.sort();
        for (new_index, (_, id)) in order.into_iter().enumerate() {
            if let Ok(tab) = self.tab_mut(id) {
                tab.index = new_index;
            }
        }
    }

    fn activate(&mut self, tab_id: TabId, window_id: WindowId) {
        for tab in self.tabs.iter_mut().filter(|t| t.window_id == window_id) {
            tab.active = tab.id == tab_id;
        }
    }

    /// Insert `tab` at `index` (appending when `None`), shifting later tabs
    fn insert_tab(&mut self, mut tab: Tab, index: Option<usize>) -> Tab {
        let window_id = tab.window_id;
        let len = self.tabs.iter().filter(|t| t.window_id == window_id).count();
        let index = index.unwrap_or(len).min(len);

        self.renumber(window_id);
        for other in self
            .tabs
            .iter_mut()
            .filter(|t| t.window_id == window_id && t.index >= index)
        {
            other.index += 1;
        }

        tab.index = index;
        if tab.active {
            self.activate(tab.id, window_id);
        }
        self.tabs.push(tab.clone());
        tab
    }

    fn remove_tab(&mut self, tab_id: TabId) -> HostResult<Tab> {
        let position = self
            .tabs
            .iter()
            .position(|t| t.id == tab_id)
            .ok_or_else(|| HostError::NotFound(format!("tab {}", tab_id)))?;
        let tab = self.tabs.remove(position);
        self.zoom.remove(&tab_id);
        self.renumber(tab.window_id);
        Ok(tab)
    }
}

/// In-memory [`BrowserHost`]
#[derive(Debug, Default)]
pub struct MemoryHost {
    state: Mutex<State>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host with one window holding one tab per URL, the first one active
    pub fn with_tabs(window_id: WindowId, urls: &[&str]) -> Self {
        let host = Self::new();
        for (index, url) in urls.iter().enumerate() {
            host.add_tab(window_id, index, false, url);
        }
        let first = host.tabs(window_id).first().map(|t| t.id);
        if let Some(first) = first {
            host.lock().activate(first, window_id);
        }
        host
    }

    /// Add a tab at an exact index without renumbering its window.
    ///
    /// Lets tests build windows whose indices are sparse.
    pub fn add_tab(&self, window_id: WindowId, index: usize, pinned: bool, url: &str) -> TabId {
        let mut state = self.lock();
        state.ensure_window(window_id);
        let id = state.next_id();
        state.tabs.push(Tab {
            id,
            index,
            window_id,
            pinned,
            muted: false,
            active: false,
            url: url.to_string(),
            title: url.to_string(),
        });
        id
    }

    pub fn add_window(&self, window: Window) {
        let mut state = self.lock();
        state.next_id = state.next_id.max(window.id);
        state.windows.retain(|w| w.id != window.id);
        state.windows.push(window);
    }

    pub fn add_bookmark(&self, url: &str, title: &str) -> String {
        let mut state = self.lock();
        let id = format!("bookmark-{}", state.next_id());
        state.bookmarks.push(Bookmark {
            id: id.clone(),
            url: url.to_string(),
            title: title.to_string(),
        });
        id
    }

    /// Push a closed session; the latest one pushed is the most recent
    pub fn add_closed_session(&self, session_id: &str) {
        self.lock().closed.insert(
            0,
            ClosedSession {
                session_id: session_id.to_string(),
            },
        );
    }

    /// Make every call of `operation` (a [`BrowserHost`] method name) fail
    pub fn fail(&self, operation: &str, err: HostError) {
        self.lock().failures.insert(operation.to_string(), err);
    }

    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Tabs of a window ordered by index
    pub fn tabs(&self, window_id: WindowId) -> Vec<Tab> {
        let mut tabs: Vec<Tab> = self
            .lock()
            .tabs
            .iter()
            .filter(|t| t.window_id == window_id)
            .cloned()
            .collect();
        tabs.sort_by_key(|t| t.index);
        tabs
    }

    pub fn tab(&self, tab_id: TabId) -> Option<Tab> {
        self.lock().tab(tab_id).ok().cloned()
    }

    pub fn window(&self, window_id: WindowId) -> Option<Window> {
        self.lock().windows.iter().find(|w| w.id == window_id).cloned()
    }

    pub fn windows(&self) -> Vec<Window> {
        self.lock().windows.clone()
    }

    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.lock().bookmarks.clone()
    }

    pub fn closed_sessions(&self) -> Vec<ClosedSession> {
        self.lock().closed.clone()
    }

    pub fn zoom(&self, tab_id: TabId) -> f64 {
        self.lock().zoom.get(&tab_id).copied().unwrap_or(DEFAULT_ZOOM)
    }

    /// Every mutating call made so far
    pub fn calls(&self) -> Vec<HostCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Context for `tab_id` as a gesture recognizer would resolve it now
    pub fn context(&self, tab_id: TabId) -> Option<ExecutionContext> {
        self.tab(tab_id).map(|tab| ExecutionContext {
            id: tab.id,
            index: tab.index,
            window_id: tab.window_id,
            pinned: tab.pinned,
            muted: tab.muted,
            url: tab.url,
            title: tab.title,
        })
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl BrowserHost for MemoryHost {
    async fn query_tabs(&self, query: &TabQuery) -> HostResult<Vec<Tab>> {
        tokio::task::yield_now().await;
        let state = self.lock();
        state.check("query_tabs")?;
        let mut tabs: Vec<Tab> = state
            .tabs
            .iter()
            .filter(|t| query.matches(t))
            .cloned()
            .collect();
        tabs.sort_by_key(|t| (t.window_id, t.index));
        Ok(tabs)
    }

    async fn get_tab(&self, tab_id: TabId) -> HostResult<Tab> {
        tokio::task::yield_now().await;
        let state = self.lock();
        state.check("get_tab")?;
        state.tab(tab_id).cloned()
    }

    async fn create_tab(&self, props: CreateTab) -> HostResult<Tab> {
        tokio::task::yield_now().await;
        let mut state = self.lock();
        state.check("create_tab")?;
        let window_id = match props.window_id {
            Some(id) => state.window_mut(id)?.id,
            None => state
                .windows
                .first()
                .map(|w| w.id)
                .ok_or_else(|| HostError::NotFound("window".to_string()))?,
        };
        state.calls.push(HostCall::CreateTab(props.clone()));

        let id = state.next_id();
        let url = props.url.unwrap_or_else(|| NEW_TAB_URL.to_string());
        let tab = Tab {
            id,
            index: 0,
            window_id,
            pinned: false,
            muted: false,
            active: props.active,
            title: url.clone(),
            url,
        };
        Ok(state.insert_tab(tab, props.index))
    }

    async fn update_tab(&self, tab_id: TabId, update: TabUpdate) -> HostResult<Tab> {
        tokio::task::yield_now().await;
        let mut state = self.lock();
        state.check("update_tab")?;
        let window_id = state.tab(tab_id)?.window_id;
        state.calls.push(HostCall::UpdateTab(tab_id, update.clone()));

        if update.active == Some(true) {
            state.activate(tab_id, window_id);
        }
        let tab = state.tab_mut(tab_id)?;
        if let Some(active) = update.active {
            tab.active = active;
        }
        if let Some(pinned) = update.pinned {
            tab.pinned = pinned;
        }
        if let Some(muted) = update.muted {
            tab.muted = muted;
        }
        Ok(tab.clone())
    }

    async fn remove_tab(&self, tab_id: TabId) -> HostResult<()> {
        tokio::task::yield_now().await;
        let mut state = self.lock();
        state.check("remove_tab")?;
        let tab = state.remove_tab(tab_id)?;
        state.calls.push(HostCall::RemoveTab(tab_id));
        state.closed.insert(
            0,
            ClosedSession {
                session_id: format!("tab-{}", tab.id),
            },
        );
        Ok(())
    }

    async fn duplicate_tab(&self, tab_id: TabId) -> HostResult<Tab> {
        tokio::task::yield_now().await;
        let mut state = self.lock();
        state.check("duplicate_tab")?;
        let source = state.tab(tab_id)?.clone();
        state.calls.push(HostCall::DuplicateTab(tab_id));

        let id = state.next_id();
        let copy = Tab {
            id,
            active: true,
            pinned: false,
            ..source.clone()
        };
        Ok(state.insert_tab(copy, Some(source.index + 1)))
    }

    async fn reload_tab(&self, tab_id: TabId, bypass_cache: bool) -> HostResult<()> {
        tokio::task::yield_now().await;
        let mut state = self.lock();
        state.check("reload_tab")?;
        state.tab(tab_id)?;
        state.calls.push(HostCall::ReloadTab {
            tab_id,
            bypass_cache,
        });
        Ok(())
    }

    async fn get_zoom(&self, tab_id: TabId) -> HostResult<f64> {
        tokio::task::yield_now().await;
        let state = self.lock();
        state.check("get_zoom")?;
        state.tab(tab_id)?;
        Ok(state.zoom.get(&tab_id).copied().unwrap_or(DEFAULT_ZOOM))
    }

    async fn set_zoom(&self, tab_id: TabId, factor: f64) -> HostResult<()> {
        tokio::task::yield_now().await;
        let mut state = self.lock();
        state.check("set_zoom")?;
        state.tab(tab_id)?;
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&factor) {
            return Err(HostError::Rejected(format!(
                "zoom factor {} outside [{}, {}]",
                factor, MIN_ZOOM, MAX_ZOOM
            )));
        }
        state.calls.push(HostCall::SetZoom(tab_id, factor));
        state.zoom.insert(tab_id, factor);
        Ok(())
    }

    async fn send_page_message(
        &self,
        tab_id: TabId,
        frame_id: FrameId,
        message: PageMessage,
    ) -> HostResult<()> {
        tokio::task::yield_now().await;
        let mut state = self.lock();
        state.check("send_page_message")?;
        state.tab(tab_id)?;
        state.calls.push(HostCall::PageMessage {
            tab_id,
            frame_id,
            message,
        });
        Ok(())
    }

    async fn get_window(&self, window_id: WindowId) -> HostResult<Window> {
        tokio::task::yield_now().await;
        let mut state = self.lock();
        state.check("get_window")?;
        state.window_mut(window_id).map(|w| w.clone())
    }

    async fn create_window(&self, props: CreateWindow) -> HostResult<Window> {
        tokio::task::yield_now().await;
        let mut state = self.lock();
        state.check("create_window")?;
        let moved_from = match props.tab_id {
            Some(tab_id) => Some(state.tab(tab_id)?.window_id),
            None => None,
        };
        state.calls.push(HostCall::CreateWindow(props.clone()));

        let window = Window {
            id: state.next_id(),
            state: WindowState::Normal,
            incognito: props.incognito,
        };
        state.windows.push(window.clone());

        match (props.tab_id, moved_from) {
            (Some(tab_id), Some(old_window)) => {
                let tab = state.tab_mut(tab_id)?;
                tab.window_id = window.id;
                tab.index = 0;
                tab.active = true;
                state.renumber(old_window);
            }
            _ => {
                let id = state.next_id();
                state.tabs.push(Tab {
                    id,
                    index: 0,
                    window_id: window.id,
                    pinned: false,
                    muted: false,
                    active: true,
                    url: NEW_TAB_URL.to_string(),
                    title: NEW_TAB_URL.to_string(),
                });
            }
        }
        Ok(window)
    }

    async fn update_window_state(
        &self,
        window_id: WindowId,
        window_state: WindowState,
    ) -> HostResult<()> {
        tokio::task::yield_now().await;
        let mut state = self.lock();
        state.check("update_window_state")?;
        state.window_mut(window_id)?.state = window_state;
        state
            .calls
            .push(HostCall::UpdateWindowState(window_id, window_state));
        Ok(())
    }

    async fn remove_window(&self, window_id: WindowId) -> HostResult<()> {
        tokio::task::yield_now().await;
        let mut state = self.lock();
        state.check("remove_window")?;
        state.window_mut(window_id)?;
        state.calls.push(HostCall::RemoveWindow(window_id));
        state.windows.retain(|w| w.id != window_id);
        state.tabs.retain(|t| t.window_id != window_id);
        Ok(())
    }

    async fn search_bookmarks(&self, url: &str) -> HostResult<Vec<Bookmark>> {
        tokio::task::yield_now().await;
        let state = self.lock();
        state.check("search_bookmarks")?;
        Ok(state
            .bookmarks
            .iter()
            .filter(|b| b.url == url)
            .cloned()
            .collect())
    }

    async fn create_bookmark(&self, url: &str, title: &str) -> HostResult<Bookmark> {
        tokio::task::yield_now().await;
        let mut state = self.lock();
        state.check("create_bookmark")?;
        state.calls.push(HostCall::CreateBookmark {
            url: url.to_string(),
            title: title.to_string(),
        });
        let bookmark = Bookmark {
            id: format!("bookmark-{}", state.next_id()),
            url: url.to_string(),
            title: title.to_string(),
        };
        state.bookmarks.push(bookmark.clone());
        Ok(bookmark)
    }

    async fn remove_bookmark(&self, bookmark_id: &str) -> HostResult<()> {
        tokio::task::yield_now().await;
        let mut state = self.lock();
        state.check("remove_bookmark")?;
        let position = state
            .bookmarks
            .iter()
            .position(|b| b.id == bookmark_id)
            .ok_or_else(|| HostError::NotFound(format!("bookmark {}", bookmark_id)))?;
        state.bookmarks.remove(position);
        state
            .calls
            .push(HostCall::RemoveBookmark(bookmark_id.to_string()));
        Ok(())
    }

    async fn recently_closed(&self) -> HostResult<Vec<ClosedSession>> {
        tokio::task::yield_now().await;
        let state = self.lock();
        state.check("recently_closed")?;
        Ok(state.closed.clone())
    }

    async fn restore_session(&self, session_id: &str) -> HostResult<()> {
        tokio::task::yield_now().await;
        let mut state = self.lock();
        state.check("restore_session")?;
        let position = state
            .closed
            .iter()
            .position(|s| s.session_id == session_id)
            .ok_or_else(|| HostError::NotFound(format!("session {}", session_id)))?;
        state.closed.remove(position);
        state
            .calls
            .push(HostCall::RestoreSession(session_id.to_string()));
        Ok(())
    }

    async fn save_as_pdf(&self, tab_id: TabId) -> HostResult<()> {
        tokio::task::yield_now().await;
        let mut state = self.lock();
        state.check("save_as_pdf")?;
        state.tab(tab_id)?;
        state.calls.push(HostCall::SaveAsPdf(tab_id));
        Ok(())
    }

    async fn print(&self, tab_id: TabId) -> HostResult<()> {
        tokio::task::yield_now().await;
        let mut state = self.lock();
        state.check("print")?;
        state.tab(tab_id)?;
        state.calls.push(HostCall::Print(tab_id));
        Ok(())
    }

    async fn print_preview(&self, tab_id: TabId) -> HostResult<()> {
        tokio::task::yield_now().await;
        let mut state = self.lock();
        state.check("print_preview")?;
        state.tab(tab_id)?;
        state.calls.push(HostCall::PrintPreview(tab_id));
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
