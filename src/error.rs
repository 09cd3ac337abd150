//! Error types for the carousel

use thiserror::Error;

use crate::carousel::{RingKind, Role, TransitionPhase};

/// Carousel errors
///
/// None of these are fatal to the page: the browser layer logs them and leaves
/// the carousel in whatever recoverable state it was in.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CarouselError {
    // Construction errors
    #[error("{0} ring is empty")]
    EmptyRing(RingKind),

    #[error("{kind} ring has {actual} elements, expected {expected}")]
    RingLengthMismatch {
        kind: RingKind,
        expected: usize,
        actual: usize,
    },

    // Transition errors
    #[error("{ring} ring has no element with role {role}")]
    MissingRoleElement { ring: RingKind, role: Role },

    #[error("transition already in flight (phase {phase:?})")]
    ConcurrentTransition { phase: TransitionPhase },

    #[error("cue out of order: expected {expected:?}, got {got:?}")]
    OutOfOrderCue {
        expected: TransitionPhase,
        got: TransitionPhase,
    },

    #[error("carousel has not entered yet")]
    NotReady,

    #[error("entrance choreography already played")]
    EntranceAlreadyPlayed,

    // Preload errors
    #[error("unknown asset {index} (page has {total})")]
    UnknownAsset { index: usize, total: usize },

    // Page errors
    #[error("missing page element: {0}")]
    MissingElement(&'static str),

    #[error("script error: {0}")]
    Script(String),
}

pub type Result<T> = std::result::Result<T, CarouselError>;
