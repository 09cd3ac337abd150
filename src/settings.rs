//! Carousel settings and preferences
//!
//! Persisted in LocalStorage so a page can tune timings without a rebuild.

use serde::{Deserialize, Serialize};

use crate::consts::TILT_FACTOR;

/// What to do with a swap requested while another is still playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OverlapPolicy {
    /// Drop the request
    #[default]
    Reject,
    /// Remember the latest request and run it once the current one finishes
    Queue,
}

impl OverlapPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlapPolicy::Reject => "Reject",
            OverlapPolicy::Queue => "Queue",
        }
    }
}

/// Durations (seconds), offsets (px) and staggers for every choreography
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    // === Swap ===
    /// Nav controls dim / restore
    pub nav_fade: f32,
    /// Opacity of the nav controls while a swap plays
    pub nav_dim_opacity: f32,
    /// How far the text fade-out starts before the nav dim ends
    pub text_overlap: f32,
    pub text_out: f32,
    pub text_in: f32,
    /// Gap between consecutive `.text` children
    pub text_stagger: f32,
    /// Vertical travel of outgoing text (negative is up)
    pub text_out_offset: f32,
    /// Vertical offset incoming text starts from
    pub text_in_offset: f32,

    // === Preload / entrance ===
    pub loader: f32,
    pub overlay_fade: f32,
    /// Card offset held until the entrance plays
    pub card_rest_offset: f32,
    pub entrance_cards_delay: f32,
    pub entrance_cards: f32,
    /// Total stagger spread across all cards
    pub entrance_cards_stagger: f32,
    pub entrance_text_delay: f32,
    pub entrance_text: f32,
    pub entrance_nav: f32,
    /// How far the nav reveal overlaps the text reveal
    pub entrance_nav_overlap: f32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            nav_fade: 0.2,
            nav_dim_opacity: 0.5,
            text_overlap: 0.1,
            text_out: 0.4,
            text_in: 0.4,
            text_stagger: 0.1,
            text_out_offset: -120.0,
            text_in_offset: 40.0,

            loader: 1.0,
            overlay_fade: 0.8,
            card_rest_offset: 30.0,
            entrance_cards_delay: 0.15,
            entrance_cards: 0.5,
            entrance_cards_stagger: 0.1,
            entrance_text_delay: 0.5,
            entrance_text: 0.4,
            entrance_nav: 0.4,
            entrance_nav_overlap: 0.4,
        }
    }
}

impl Timing {
    /// Same offsets, zero time
    pub fn instant(&self) -> Self {
        Self {
            nav_fade: 0.0,
            text_overlap: 0.0,
            text_out: 0.0,
            text_in: 0.0,
            text_stagger: 0.0,
            loader: 0.0,
            overlay_fade: 0.0,
            entrance_cards_delay: 0.0,
            entrance_cards: 0.0,
            entrance_cards_stagger: 0.0,
            entrance_text_delay: 0.0,
            entrance_text: 0.0,
            entrance_nav: 0.0,
            entrance_nav_overlap: 0.0,
            ..*self
        }
    }
}

/// Carousel settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub timing: Timing,
    /// Degrees of card tilt per radian of pointer angle, over π
    pub tilt_factor: f32,
    pub overlap_policy: OverlapPolicy,

    // === Accessibility ===
    /// Reduced motion (instant transitions, no tilt)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            tilt_factor: TILT_FACTOR,
            overlap_policy: OverlapPolicy::Reject,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Timing with reduced motion applied
    pub fn effective_timing(&self) -> Timing {
        if self.reduced_motion {
            self.timing.instant()
        } else {
            self.timing
        }
    }

    /// Effective tilt (respects reduced_motion)
    pub fn effective_tilt(&self) -> bool {
        !self.reduced_motion && self.tilt_factor != 0.0
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "card_carousel_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
