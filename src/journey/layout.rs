use std::time::Duration;

use crate::{
    foundation::{
        core::Point,
        error::{TrailError, TrailResult},
    },
    geometry::{
        curve::{ArclenPath, Curve},
        hops::PathGeometry,
    },
};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Static description of a journey.
///
/// A layout is plain data: it can be loaded from JSON, validated, and handed to a
/// [`crate::JourneyController`].
pub struct JourneyLayout {
    /// Nominal checkpoint positions in path-container coordinates. Index 0 is the origin.
    ///
    /// Positions for indices `1..` are only estimates; each is replaced by the marker's actual
    /// landing point the first time the checkpoint is reached.
    pub checkpoints: Vec<Point>,
    /// Number of narrative cards.
    pub card_count: usize,
    /// Hops animated between two consecutive checkpoints.
    #[serde(default = "default_hops_per_segment")]
    pub hops_per_segment: usize,
    /// SVG path data for the travel curve. Derived from `checkpoints` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_d: Option<String>,
    /// Animation and transition delays.
    #[serde(default)]
    pub timings: Timings,
    /// Rendered width of a reopen marker, used for edge anchoring.
    #[serde(default = "default_reopen_marker_width")]
    pub reopen_marker_width: f64,
    /// Viewport width at or below which reopen markers are kept inside the container.
    #[serde(default = "default_mobile_breakpoint")]
    pub mobile_breakpoint: f64,
}

fn default_hops_per_segment() -> usize {
    10
}

fn default_reopen_marker_width() -> f64 {
    44.0
}

fn default_mobile_breakpoint() -> f64 {
    500.0
}

impl Default for JourneyLayout {
    fn default() -> Self {
        let checkpoints = [
            (200.0, 100.0),
            (57.0, 400.0),
            (285.0, 700.0),
            (114.0, 1000.0),
            (342.0, 1300.0),
            (171.0, 1600.0),
            (228.0, 1900.0),
            (360.0, 2200.0),
            (40.0, 2500.0),
        ]
        .into_iter()
        .map(|(x, y)| Point::new(x, y))
        .collect();

        Self {
            checkpoints,
            card_count: 8,
            hops_per_segment: default_hops_per_segment(),
            path_d: None,
            timings: Timings::default(),
            reopen_marker_width: default_reopen_marker_width(),
            mobile_breakpoint: default_mobile_breakpoint(),
        }
    }
}

impl JourneyLayout {
    /// Parse a layout from JSON and validate it.
    pub fn from_json(s: &str) -> TrailResult<Self> {
        let layout: Self = serde_json::from_str(s)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Check structural invariants.
    pub fn validate(&self) -> TrailResult<()> {
        if self.checkpoints.len() < 2 {
            return Err(TrailError::validation(
                "layout needs at least two checkpoints",
            ));
        }
        for (i, p) in self.checkpoints.iter().enumerate() {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(TrailError::validation(format!(
                    "checkpoint {i} has a non-finite coordinate"
                )));
            }
        }
        if self.hops_per_segment == 0 {
            return Err(TrailError::validation("hops_per_segment must be > 0"));
        }
        if self.card_count == 0 {
            return Err(TrailError::validation("card_count must be > 0"));
        }
        if !self.reopen_marker_width.is_finite() || self.reopen_marker_width < 0.0 {
            return Err(TrailError::validation(
                "reopen_marker_width must be finite and >= 0",
            ));
        }
        if !self.mobile_breakpoint.is_finite() {
            return Err(TrailError::validation("mobile_breakpoint must be finite"));
        }
        if let Some(d) = &self.path_d {
            ArclenPath::from_svg(d)?;
        }
        self.timings.validate()
    }

    /// Index of the final checkpoint.
    pub fn last_checkpoint(&self) -> usize {
        self.checkpoints.len().saturating_sub(1)
    }

    /// Build the travel curve.
    pub fn build_curve(&self) -> TrailResult<Box<dyn Curve>> {
        let path = match &self.path_d {
            Some(d) => ArclenPath::from_svg(d)?,
            None => ArclenPath::through(&self.checkpoints)?,
        };
        Ok(Box::new(path))
    }

    /// Build the hop geometry for this layout.
    pub fn build_geometry(&self) -> TrailResult<PathGeometry> {
        Ok(PathGeometry::new(
            Some(self.build_curve()?),
            self.checkpoints.len(),
            self.hops_per_segment,
        ))
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Fixed delays, in milliseconds, used by every suspension point of the journey.
pub struct Timings {
    /// Trail marker placed -> trail marker fully visible.
    pub trail_fade_in_ms: u64,
    /// Trail marker placed -> hop step settled. Includes `trail_fade_in_ms`.
    pub trail_settle_ms: u64,
    /// Landing animation of the traveling marker.
    pub landing_ms: u64,
    /// Pause between two hops.
    pub hop_pause_ms: u64,
    /// "Reached" animation at a checkpoint.
    pub checkpoint_reached_ms: u64,
    /// Card fade-out before the next card or hop.
    pub card_fade_ms: u64,
    /// Path container reveal at journey start.
    pub path_reveal_ms: u64,
    /// Wait for layout to settle after a reveal.
    pub layout_settle_ms: u64,
    /// Pause after re-centering, before hopping.
    pub pre_hop_pause_ms: u64,
    /// Delay before centering the start prompt at init.
    pub start_prompt_delay_ms: u64,
    /// Delay between attempts to center the active card.
    pub center_retry_ms: u64,
    /// Attempts to center the active card.
    pub center_attempts: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            trail_fade_in_ms: 50,
            trail_settle_ms: 350,
            landing_ms: 250,
            hop_pause_ms: 100,
            checkpoint_reached_ms: 500,
            card_fade_ms: 600,
            path_reveal_ms: 600,
            layout_settle_ms: 50,
            pre_hop_pause_ms: 100,
            start_prompt_delay_ms: 100,
            center_retry_ms: 250,
            center_attempts: 4,
        }
    }
}

impl Timings {
    /// Every delay set to zero; ordering is unchanged.
    pub fn instant() -> Self {
        Self {
            trail_fade_in_ms: 0,
            trail_settle_ms: 0,
            landing_ms: 0,
            hop_pause_ms: 0,
            checkpoint_reached_ms: 0,
            card_fade_ms: 0,
            path_reveal_ms: 0,
            layout_settle_ms: 0,
            pre_hop_pause_ms: 0,
            start_prompt_delay_ms: 0,
            center_retry_ms: 0,
            ..Self::default()
        }
    }

    /// Check invariants between related delays.
    pub fn validate(&self) -> TrailResult<()> {
        if self.trail_fade_in_ms > self.trail_settle_ms {
            return Err(TrailError::validation(
                "trail_fade_in_ms must be <= trail_settle_ms",
            ));
        }
        if self.center_attempts == 0 {
            return Err(TrailError::validation("center_attempts must be > 0"));
        }
        Ok(())
    }
}

/// Suspend for `ms` milliseconds. Zero does not yield.
pub(crate) async fn pause(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/journey/layout.rs"]
mod tests;
