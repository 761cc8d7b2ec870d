//! Scroll animator
//!
//! Runs inside the page. A [`ScrollAnimation`] is created when the agent
//! receives a scroll message and is then stepped once per animation frame
//! until [`Frame::Done`]. Two easing families exist:
//!
//! - linear-distance (top/bottom): a race between reaching the boundary and a
//!   wall-clock deadline. Slow frames may end the run before the boundary is
//!   reached; the remainder is left in place.
//! - cosine (page up/down): half a cosine period driven by real elapsed time,
//!   snapped exactly onto the target on the last frame.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{ActionError, Result};

/// Wall-clock window of a linear-distance run, in milliseconds
pub const LINEAR_WINDOW_MS: f64 = 100.0;

/// Nominal half-period of a cosine-eased run, in milliseconds
pub const COSINE_WINDOW_MS: f64 = 300.0;

/// Where a scroll should end up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollTarget {
    Top,
    Bottom,
    PageDown,
    PageUp,
}

/// Time-to-offset curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    Cosine,
}

impl ScrollTarget {
    /// Easing family this target animates with
    pub fn easing(self) -> Easing {
        match self {
            ScrollTarget::Top | ScrollTarget::Bottom => Easing::Linear,
            ScrollTarget::PageDown | ScrollTarget::PageUp => Easing::Cosine,
        }
    }

    /// Fixed window for this target's easing family
    pub fn window_ms(self) -> f64 {
        match self.easing() {
            Easing::Linear => LINEAR_WINDOW_MS,
            Easing::Cosine => COSINE_WINDOW_MS,
        }
    }

    /// Final offset for this target given the current page metrics
    pub fn resolve(self, metrics: &ScrollMetrics) -> f64 {
        let max = metrics.max_offset();
        match self {
            ScrollTarget::Top => 0.0,
            ScrollTarget::Bottom => max,
            ScrollTarget::PageDown => (metrics.offset + metrics.viewport_height).clamp(0.0, max),
            ScrollTarget::PageUp => (metrics.offset - metrics.viewport_height).clamp(0.0, max),
        }
    }
}

/// Vertical scroll state of a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    /// Current scroll offset
    pub offset: f64,
    /// Height of the visible viewport
    pub viewport_height: f64,
    /// Total scrollable document height
    pub scroll_height: f64,
}

impl ScrollMetrics {
    /// Largest reachable scroll offset
    pub fn max_offset(&self) -> f64 {
        (self.scroll_height - self.viewport_height).max(0.0)
    }
}

/// The scrollable surface an animation drives.
///
/// Implementations clamp `scroll_to` into `[0, max_offset]` the way a
/// browser does.
pub trait Viewport {
    fn metrics(&self) -> ScrollMetrics;
    fn scroll_to(&mut self, offset: f64);
}

/// Outcome of one animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Schedule another frame
    Continue,
    /// Stop predicate held; do not schedule again
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Curve {
    Linear { step_per_ms: f64, tracks_bottom: bool },
    Cosine { amplitude: f64, phase: f64 },
}

/// One in-flight scroll animation
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollAnimation {
    start_offset: f64,
    target_offset: f64,
    start_timestamp: f64,
    window_ms: f64,
    previous_timestamp: f64,
    curve: Curve,
}

impl ScrollAnimation {
    /// Start a run at `now` (milliseconds, same clock as frame timestamps)
    pub fn start<V: Viewport + ?Sized>(
        target: ScrollTarget,
        easing: Easing,
        window_ms: f64,
        now: f64,
        viewport: &V,
    ) -> Result<Self> {
        if !window_ms.is_finite() || window_ms <= 0.0 {
            return Err(ActionError::InvalidArguments(format!(
                "scroll window must be a positive duration, got {}",
                window_ms
            )));
        }

        let metrics = viewport.metrics();
        let start_offset = metrics.offset;
        let target_offset = target.resolve(&metrics);

        let curve = match easing {
            Easing::Linear => {
                let distance = target_offset - start_offset;
                Curve::Linear {
                    step_per_ms: distance / window_ms,
                    tracks_bottom: target == ScrollTarget::Bottom,
                }
            }
            Easing::Cosine => Curve::Cosine {
                amplitude: (start_offset - target_offset) / 2.0,
                phase: 0.0,
            },
        };

        Ok(Self {
            start_offset,
            target_offset,
            start_timestamp: now,
            window_ms,
            previous_timestamp: now,
            curve,
        })
    }

    pub fn start_offset(&self) -> f64 {
        self.start_offset
    }

    pub fn target_offset(&self) -> f64 {
        self.target_offset
    }

    /// Timestamp after which a linear run stops regardless of position
    pub fn deadline(&self) -> f64 {
        self.start_timestamp + self.window_ms
    }

    /// Advance by one frame. Elapsed time is clamped at zero so a frame
    /// timestamp older than the previous one never rewinds the run.
    pub fn step<V: Viewport + ?Sized>(&mut self, now: f64, viewport: &mut V) -> Frame {
        let elapsed = (now - self.previous_timestamp).max(0.0);
        let deadline = self.deadline();

        match &mut self.curve {
            Curve::Linear {
                step_per_ms,
                tracks_bottom,
            } => {
                let offset = viewport.metrics().offset;
                viewport.scroll_to(offset + *step_per_ms * elapsed);
                self.previous_timestamp = now;

                // The document may grow while scrolling down; follow its end.
                let metrics = viewport.metrics();
                let goal = if *tracks_bottom {
                    metrics.max_offset()
                } else {
                    self.target_offset
                };
                let at_boundary = if *step_per_ms < 0.0 {
                    metrics.offset.floor() <= goal
                } else if *step_per_ms > 0.0 {
                    metrics.offset.ceil() >= goal
                } else {
                    true
                };

                if at_boundary || now > deadline {
                    Frame::Done
                } else {
                    Frame::Continue
                }
            }
            Curve::Cosine { amplitude, phase } => {
                *phase += PI * elapsed / self.window_ms;
                let target = self.target_offset;

                if *phase >= PI || viewport.metrics().offset == target {
                    viewport.scroll_to(target);
                    return Frame::Done;
                }

                viewport.scroll_to(target + *amplitude + *amplitude * phase.cos());
                self.previous_timestamp = now;
                Frame::Continue
            }
        }
    }

    /// Step through `frames` until the run finishes.
    ///
    /// Returns the number of frames consumed, or `None` when the frame source
    /// ran dry first.
    pub fn run<V, I>(&mut self, viewport: &mut V, frames: I) -> Option<usize>
    where
        V: Viewport + ?Sized,
        I: IntoIterator<Item = f64>,
    {
        for (count, now) in frames.into_iter().enumerate() {
            if self.step(now, viewport) == Frame::Done {
                return Some(count + 1);
            }
        }
        None
    }
}

// =============================================================================
// Tests
// =============================================================================
