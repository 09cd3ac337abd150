//! Card Carousel - an image-card carousel for the browser
//!
//! Core modules:
//! - `carousel`: Role rings, swap choreography, tilt and preload (pure, testable)
//! - `platform`: Browser bindings (DOM projection, GSAP and imagesLoaded)
//! - `settings`: Timings and preferences
//! - `error`: Error taxonomy

pub mod carousel;
pub mod error;
pub mod platform;
pub mod settings;

pub use carousel::{Carousel, CarouselState, Direction, Effect};
pub use error::{CarouselError, Result};
pub use settings::{OverlapPolicy, Settings, Timing};

/// Carousel configuration constants
pub mod consts {
    /// Tilt scale: degrees per radian of pointer angle, times π
    pub const TILT_FACTOR: f32 = 35.0;

    /// Card stacking order
    pub const CARD_Z_CURRENT: i32 = 50;
    pub const CARD_Z_OUTGOING: i32 = 30;
    pub const CARD_Z_OTHER: i32 = 20;

    /// Background stacking order (only the two cross-fading images)
    pub const BG_Z_CURRENT: i32 = -1;
    pub const BG_Z_OUTGOING: i32 = -2;
}
