//! Preload gate
//!
//! Counts image completions, drives the loader bar, and opens exactly once
//! when every image has reported in.

use super::timeline::{Choreography, Hsl, Position, Props, Target, Tween};
use crate::error::{CarouselError, Result};
use crate::settings::Timing;

/// Loader hue at 0% (red) and 100% (green)
const HUE_EMPTY: f32 = 0.0;
const HUE_FULL: f32 = 120.0;

/// What one asset report changed
#[derive(Debug, Clone, PartialEq)]
pub struct AssetProgress {
    /// Loader animation for the new progress, if the count moved
    pub loader: Option<Choreography>,
    /// True for the single report that completed the set
    pub opened: bool,
}

#[derive(Debug, Clone)]
pub struct PreloadGate {
    loaded: Vec<bool>,
    count: usize,
    opened: bool,
}

impl PreloadGate {
    pub fn new(total: usize) -> Self {
        Self {
            loaded: vec![false; total],
            count: 0,
            opened: false,
        }
    }

    pub fn total(&self) -> usize {
        self.loaded.len()
    }

    pub fn loaded(&self) -> usize {
        self.count
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }

    /// Fraction loaded. A page without images counts as fully loaded.
    pub fn progress(&self) -> f32 {
        if self.loaded.is_empty() {
            1.0
        } else {
            self.count as f32 / self.loaded.len() as f32
        }
    }

    /// Loader color, red to green along the hue wheel
    pub fn color(&self) -> Hsl {
        Hsl {
            hue: HUE_EMPTY + self.progress() * (HUE_FULL - HUE_EMPTY),
            saturation: 100.0,
            lightness: 50.0,
        }
    }

    /// Open immediately when there is nothing to wait for.
    /// Returns true if the gate opened.
    pub fn start(&mut self) -> bool {
        if self.loaded.is_empty() && !self.opened {
            self.opened = true;
            return true;
        }
        false
    }

    /// Record a load report for the asset at `index`.
    ///
    /// Incomplete reports and repeats for an asset already counted change
    /// nothing, so reports may arrive in any order and at most once opens the
    /// gate.
    pub fn on_asset(&mut self, index: usize, is_complete: bool, timing: &Timing) -> Result<AssetProgress> {
        let total = self.loaded.len();
        let seen = self
            .loaded
            .get_mut(index)
            .ok_or(CarouselError::UnknownAsset { index, total })?;

        if !is_complete || *seen {
            return Ok(AssetProgress {
                loader: None,
                opened: false,
            });
        }
        *seen = true;
        self.count += 1;

        let opened = self.count == total && !self.opened;
        if opened {
            self.opened = true;
        }
        Ok(AssetProgress {
            loader: Some(self.loader_choreography(timing)),
            opened,
        })
    }

    fn loader_choreography(&self, timing: &Timing) -> Choreography {
        let tween = Tween::to(
            Target::LoaderBar,
            1,
            Props {
                scale_x: Some(self.progress()),
                background: Some(self.color()),
                ..Default::default()
            },
        )
        .duration(timing.loader);
        Choreography::new().tween(tween, Position::At(0.0))
    }

    /// Fade the loading overlay away; the entrance follows it
    pub fn overlay_choreography(timing: &Timing) -> Choreography {
        let tween = Tween::to(
            Target::LoadingOverlay,
            1,
            Props {
                opacity: Some(0.0),
                pointer_events: Some(false),
                ..Default::default()
            },
        )
        .duration(timing.overlay_fade);
        Choreography::new().tween(tween, Position::Sequential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::timeline::Step;

    fn loader_props(progress: &AssetProgress) -> Props {
        match &progress.loader.as_ref().unwrap().steps()[0] {
            Step::Tween { tween, .. } => tween.to,
            Step::Cue { .. } => panic!("loader should be a tween"),
        }
    }

    #[test]
    fn test_out_of_order_completion_opens_once() {
        let timing = Timing::default();
        let mut gate = PreloadGate::new(3);
        assert!(!gate.start());

        let a = gate.on_asset(2, true, &timing).unwrap();
        assert!(!a.opened);
        let b = gate.on_asset(0, true, &timing).unwrap();
        assert!(!b.opened);
        let c = gate.on_asset(1, true, &timing).unwrap();
        assert!(c.opened);
        assert_eq!(loader_props(&c).scale_x, Some(1.0));
        assert_eq!(gate.progress(), 1.0);
        assert_eq!(gate.color().hue, 120.0);

        // Repeats never open again
        let again = gate.on_asset(1, true, &timing).unwrap();
        assert!(!again.opened);
        assert!(again.loader.is_none());
    }

    #[test]
    fn test_incomplete_report_ignored() {
        let mut gate = PreloadGate::new(2);
        let p = gate.on_asset(0, false, &Timing::default()).unwrap();
        assert!(p.loader.is_none());
        assert_eq!(gate.loaded(), 0);
    }

    #[test]
    fn test_progress_color_midway() {
        let mut gate = PreloadGate::new(2);
        let p = gate.on_asset(1, true, &Timing::default()).unwrap();
        let props = loader_props(&p);
        assert_eq!(props.scale_x, Some(0.5));
        assert_eq!(props.background.unwrap().hue, 60.0);
    }

    #[test]
    fn test_zero_assets_open_immediately() {
        let mut gate = PreloadGate::new(0);
        assert_eq!(gate.progress(), 1.0);
        assert!(gate.start());
        assert!(gate.is_open());
        assert!(!gate.start());
    }

    #[test]
    fn test_unknown_asset() {
        let mut gate = PreloadGate::new(1);
        assert_eq!(
            gate.on_asset(4, true, &Timing::default()),
            Err(CarouselError::UnknownAsset { index: 4, total: 1 })
        );
    }
}
