//! In-page agent
//!
//! Commands that act on page content (scrolling, session history, location)
//! do not ship code into the page. They send a [`PageMessage`] through the
//! host, and a small fixed agent running in the page interprets it against a
//! [`PageEnvironment`].

pub mod scroll;

pub use scroll::{
    COSINE_WINDOW_MS, Easing, Frame, LINEAR_WINDOW_MS, ScrollAnimation, ScrollMetrics,
    ScrollTarget, Viewport,
};

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{ActionError, Result};

// =============================================================================
// Messages
// =============================================================================

/// Structured request delivered to the in-page agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageMessage {
    /// Animate the vertical scroll position
    Scroll {
        target: ScrollTarget,
        easing: Easing,
        window_ms: f64,
    },
    /// Go back one entry in session history
    HistoryBack,
    /// Go forward one entry in session history
    HistoryForward,
    /// Navigate one path level up from the current location
    UrlLevelUp,
}

impl PageMessage {
    /// Scroll message with the target's own easing family and fixed window
    pub fn scroll(target: ScrollTarget) -> Self {
        PageMessage::Scroll {
            target,
            easing: target.easing(),
            window_ms: target.window_ms(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }
}

// =============================================================================
// Page Environment
// =============================================================================

/// What the agent can touch inside a page
pub trait PageEnvironment: Viewport {
    fn history_back(&mut self);
    fn history_forward(&mut self);
    fn location(&self) -> String;
    fn navigate(&mut self, href: &str);
}

// =============================================================================
// Agent
// =============================================================================

/// Interpreter for [`PageMessage`]s
#[derive(Debug, Default, Clone, Copy)]
pub struct PageAgent;

impl PageAgent {
    pub fn new() -> Self {
        Self
    }

    /// Apply a message to the page.
    ///
    /// Scroll messages return the started animation; the caller steps it from
    /// its frame callback until it reports [`Frame::Done`]. Every other
    /// message takes effect immediately and returns `None`.
    pub fn handle<P: PageEnvironment + ?Sized>(
        &self,
        message: &PageMessage,
        page: &mut P,
        now: f64,
    ) -> Result<Option<ScrollAnimation>> {
        match message {
            PageMessage::Scroll {
                target,
                easing,
                window_ms,
            } => {
                let animation = ScrollAnimation::start(*target, *easing, *window_ms, now, &*page)?;
                debug!(
                    ?target,
                    from = animation.start_offset(),
                    to = animation.target_offset(),
                    "scroll animation started"
                );
                Ok(Some(animation))
            }
            PageMessage::HistoryBack => {
                page.history_back();
                Ok(None)
            }
            PageMessage::HistoryForward => {
                page.history_forward();
                Ok(None)
            }
            PageMessage::UrlLevelUp => {
                let next = level_up(&page.location())?;
                page.navigate(&next);
                Ok(None)
            }
        }
    }
}

/// Location one path level above `href`.
///
/// A trailing slash means the current document is a directory, so the parent
/// is `../`; otherwise the containing directory `./` is the level up.
pub fn level_up(href: &str) -> Result<String> {
    let base = Url::parse(href)
        .map_err(|e| ActionError::InvalidArguments(format!("invalid page URL {:?}: {}", href, e)))?;
    let relative = if href.ends_with('/') { "../" } else { "./" };
    let next = base
        .join(relative)
        .map_err(|e| ActionError::InvalidArguments(format!("cannot resolve {}: {}", relative, e)))?;
    Ok(next.into())
}

// =============================================================================
// Tests
// =============================================================================
