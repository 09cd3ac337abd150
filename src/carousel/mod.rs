//! Carousel core
//!
//! Everything here is pure and backend-free: the rings and their role
//! rotation, the choreography timelines, the transition state machine, the
//! tilt math and the preload gate. The browser layer only projects the result.

pub mod preload;
pub mod ring;
pub mod sequencer;
pub mod state;
pub mod tagger;
pub mod tilt;
pub mod timeline;

pub use preload::{AssetProgress, PreloadGate};
pub use ring::{Neighbors, Ring, RingKind, Role, Slot};
pub use sequencer::{CueOutcome, SwapOutcome, TransitionPhase, TransitionSequencer};
pub use state::{Carousel, CarouselState, Effect};
pub use tagger::{Direction, Rotation, ZTiers, apply_rotation};
pub use tilt::{Bounds, TiltController, TiltUpdate, tilt_angle};
pub use timeline::{
    Choreography, Ease, Hsl, Length, Position, Props, Scheduled, Stagger, StaggerFrom, Step,
    Target, Tween,
};
