//! Video walkthrough with a click zone
//!
//! Clip one plays to the end, then waits for a click. A click inside the
//! target zone starts clip two; anywhere else shows a miss hint that the
//! caller hides after [`FEEDBACK_DURATION`].

use std::time::Duration;

/// How long the miss hint stays visible
pub const FEEDBACK_DURATION: Duration = Duration::from_secs(3);

/// Which clip is playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clip {
    /// Introduction, ends waiting for a click
    #[default]
    First,
    /// Continuation after a correct click
    Second,
}

/// Open rectangle in percent of the video surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetZone {
    /// Left edge (exclusive)
    pub min_x: f64,
    /// Right edge (exclusive)
    pub max_x: f64,
    /// Top edge (exclusive)
    pub min_y: f64,
    /// Bottom edge (exclusive)
    pub max_y: f64,
}

impl TargetZone {
    /// Whether the point lies strictly inside the zone
    #[inline]
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x > self.min_x && x < self.max_x && y > self.min_y && y < self.max_y
    }
}

impl Default for TargetZone {
    /// Bottom-right area, roughly a third in from both edges
    fn default() -> Self {
        Self {
            min_x: 60.0,
            max_x: 90.0,
            min_y: 60.0,
            max_y: 90.0,
        }
    }
}

/// Result of a click on the video surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Click not accepted in the current state
    Ignored,
    /// Hit the zone; clip two starts
    Advanced,
    /// Missed; show the hint
    Missed,
}

/// Walkthrough demo state
#[derive(Debug, Clone, Default)]
pub struct WalkthroughDemo {
    clip: Clip,
    first_clip_ended: bool,
    feedback_visible: bool,
    zone: TargetZone,
}

impl WalkthroughDemo {
    /// Create demo with the default target zone
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create demo with a custom target zone
    #[inline]
    #[must_use]
    pub fn with_zone(zone: TargetZone) -> Self {
        Self {
            zone,
            ..Self::default()
        }
    }

    /// Clip one reached its end
    pub fn first_clip_ended(&mut self) {
        if self.clip == Clip::First {
            self.first_clip_ended = true;
        }
    }

    /// Handle a click given in percent of the video surface
    pub fn click(&mut self, x: f64, y: f64) -> ClickOutcome {
        if !self.first_clip_ended || self.clip == Clip::Second {
            return ClickOutcome::Ignored;
        }

        if self.zone.contains(x, y) {
            self.clip = Clip::Second;
            self.first_clip_ended = false;
            self.feedback_visible = false;
            ClickOutcome::Advanced
        } else {
            self.feedback_visible = true;
            ClickOutcome::Missed
        }
    }

    /// Convert a click in surface pixels and handle it
    pub fn click_in_rect(&mut self, offset_x: f64, offset_y: f64, width: f64, height: f64) -> ClickOutcome {
        if width <= 0.0 || height <= 0.0 {
            return ClickOutcome::Ignored;
        }
        self.click(offset_x / width * 100.0, offset_y / height * 100.0)
    }

    /// Hide the miss hint (called when the feedback timer fires)
    pub fn hide_feedback(&mut self) {
        self.feedback_visible = false;
    }

    /// Clip currently playing
    #[inline]
    #[must_use]
    pub fn clip(&self) -> Clip {
        self.clip
    }

    /// Whether the demo waits for a click
    #[inline]
    #[must_use]
    pub fn awaiting_click(&self) -> bool {
        self.first_clip_ended && self.clip == Clip::First
    }

    /// Whether the miss hint is visible
    #[inline]
    #[must_use]
    pub fn feedback_visible(&self) -> bool {
        self.feedback_visible
    }
}
