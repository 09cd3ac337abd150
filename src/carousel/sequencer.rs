//! Transition sequencer
//!
//! Builds the choreography for one swap (or the one-time entrance) and walks
//! a small state machine as the timeline fires its cues:
//!
//! `Dormant -> Entering -> Idle -> Disabling -> TextOut -> Rotating -> TextIn -> Enabling -> Idle`
//!
//! Card and background roles rotate as soon as a swap is accepted. Info panel
//! roles rotate only when the `Rotating` cue fires, between the text fading out
//! and the new text fading in. Anything but `Idle` counts as busy.

use super::ring::Role;
use super::state::CarouselState;
use super::tagger::{Direction, apply_rotation, incoming_index};
use super::timeline::{Choreography, Ease, Length, Position, Props, Stagger, StaggerFrom, Target, Tween};
use crate::error::{CarouselError, Result};
use crate::settings::{OverlapPolicy, Timing};

/// Where the carousel is in its transition lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    /// Assets still loading; no entrance yet
    Dormant,
    /// Entrance choreography playing
    Entering,
    /// Ready for a swap
    Idle,
    /// Nav controls dimming
    Disabling,
    /// Outgoing info text fading out
    TextOut,
    /// Info roles rotating, tilt rebinding
    Rotating,
    /// Incoming info text fading in
    TextIn,
    /// Nav controls restoring
    Enabling,
}

impl TransitionPhase {
    /// Phase the next cue must announce
    pub fn next(&self) -> Option<Self> {
        use TransitionPhase::*;
        match self {
            Dormant | Idle => None,
            Entering => Some(Idle),
            Disabling => Some(TextOut),
            TextOut => Some(Rotating),
            Rotating => Some(TextIn),
            TextIn => Some(Enabling),
            Enabling => Some(Idle),
        }
    }

    /// Stable numeric code used to pass cues through the JS timeline
    pub fn code(&self) -> u32 {
        use TransitionPhase::*;
        match self {
            Dormant => 0,
            Entering => 1,
            Idle => 2,
            Disabling => 3,
            TextOut => 4,
            Rotating => 5,
            TextIn => 6,
            Enabling => 7,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        use TransitionPhase::*;
        Some(match code {
            0 => Dormant,
            1 => Entering,
            2 => Idle,
            3 => Disabling,
            4 => TextOut,
            5 => Rotating,
            6 => TextIn,
            7 => Enabling,
            _ => return None,
        })
    }
}

/// Result of a swap request
#[derive(Debug, Clone, PartialEq)]
pub enum SwapOutcome {
    /// Roles rotated; play this choreography
    Started(Choreography),
    /// Another swap is playing; this one runs when it finishes
    Queued,
}

/// Result of a timeline cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueOutcome {
    Continue,
    /// Info roles rotated; tilt belongs to this card now
    Rotated { card: usize, info: usize },
    /// Back to idle, with any swap that was queued meanwhile
    Finished { queued: Option<Direction> },
}

/// Single-flight choreography driver
#[derive(Debug, Clone)]
pub struct TransitionSequencer {
    phase: TransitionPhase,
    policy: OverlapPolicy,
    timing: Timing,
    in_flight: Option<Direction>,
    queued: Option<Direction>,
}

impl TransitionSequencer {
    pub fn new(timing: Timing, policy: OverlapPolicy) -> Self {
        Self {
            phase: TransitionPhase::Dormant,
            policy,
            timing,
            in_flight: None,
            queued: None,
        }
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase != TransitionPhase::Idle
    }

    pub fn queued(&self) -> Option<Direction> {
        self.queued
    }

    /// Accept a swap, rotate card and background roles, and return the
    /// choreography to play. Nothing is mutated when the request fails.
    pub fn swap(&mut self, state: &mut CarouselState, direction: Direction) -> Result<SwapOutcome> {
        match self.phase {
            TransitionPhase::Idle => {}
            TransitionPhase::Dormant => return Err(CarouselError::NotReady),
            phase => {
                return match self.policy {
                    OverlapPolicy::Reject => Err(CarouselError::ConcurrentTransition { phase }),
                    OverlapPolicy::Queue => {
                        // Coalesce: only the latest request survives
                        self.queued = Some(direction);
                        Ok(SwapOutcome::Queued)
                    }
                };
            }
        }

        let outgoing = state.infos.require(Role::Current)?;
        if state.infos.len() >= 3 {
            state.infos.require(Role::Previous)?;
            state.infos.require(Role::Next)?;
        }
        let incoming = incoming_index(&state.infos, direction);

        apply_rotation(&mut state.cards, direction)?;
        apply_rotation(&mut state.backgrounds, direction)?;

        self.phase = TransitionPhase::Disabling;
        self.in_flight = Some(direction);
        Ok(SwapOutcome::Started(self.swap_choreography(state, outgoing, incoming)))
    }

    fn swap_choreography(&self, state: &CarouselState, outgoing: usize, incoming: usize) -> Choreography {
        let t = &self.timing;
        let dim = Tween::to(
            Target::NavControls,
            2,
            Props {
                opacity: Some(t.nav_dim_opacity),
                pointer_events: Some(false),
                ..Default::default()
            },
        )
        .duration(t.nav_fade);
        let text_out = Tween::to(
            Target::InfoText(outgoing),
            state.text_count(outgoing),
            Props {
                translate_y: Some(Length::Px(t.text_out_offset)),
                opacity: Some(0.0),
                ..Default::default()
            },
        )
        .duration(t.text_out)
        .stagger(Stagger::Each(t.text_stagger));
        let text_in = Tween::to(
            Target::InfoText(incoming),
            state.text_count(incoming),
            Props {
                translate_y: Some(Length::Px(0.0)),
                opacity: Some(1.0),
                ..Default::default()
            },
        )
        .from(Props {
            opacity: Some(0.0),
            translate_y: Some(Length::Px(t.text_in_offset)),
            ..Default::default()
        })
        .duration(t.text_in)
        .stagger(Stagger::Each(t.text_stagger));
        let restore = Tween::to(
            Target::NavControls,
            2,
            Props {
                opacity: Some(1.0),
                pointer_events: Some(true),
                ..Default::default()
            },
        )
        .duration(t.nav_fade);

        Choreography::new()
            .tween(dim, Position::Sequential)
            .cue(TransitionPhase::TextOut, Position::Overlap(t.text_overlap))
            .tween(text_out, Position::Overlap(t.text_overlap))
            .cue(TransitionPhase::Rotating, Position::Sequential)
            .cue(TransitionPhase::TextIn, Position::Sequential)
            .tween(text_in, Position::Sequential)
            .cue(TransitionPhase::Enabling, Position::Sequential)
            .tween(restore, Position::Sequential)
            .cue(TransitionPhase::Idle, Position::Sequential)
    }

    /// Resting pose held until the entrance plays
    pub fn pose(&self, state: &CarouselState) -> Result<Vec<(Target, Props)>> {
        let current = state.infos.require(Role::Current)?;
        Ok(vec![
            (
                Target::AllCards,
                Props {
                    card_offset: Some(Length::Px(self.timing.card_rest_offset)),
                    ..Default::default()
                },
            ),
            (
                Target::InfoText(current),
                Props {
                    translate_y: Some(Length::Px(self.timing.text_in_offset)),
                    opacity: Some(1.0),
                    ..Default::default()
                },
            ),
            (
                Target::NavControls,
                Props {
                    pointer_events: Some(false),
                    opacity: Some(0.0),
                    ..Default::default()
                },
            ),
        ])
    }

    /// One-time entrance: cards rise in from the right, then the current
    /// info text and the nav controls appear.
    pub fn entrance(&mut self, state: &CarouselState) -> Result<Choreography> {
        if self.phase != TransitionPhase::Dormant {
            return Err(CarouselError::EntranceAlreadyPlayed);
        }
        let current = state.infos.require(Role::Current)?;
        let t = &self.timing;

        let cards = Tween::to(
            Target::AllCards,
            state.len(),
            Props {
                card_offset: Some(Length::Percent(0.0)),
                ..Default::default()
            },
        )
        .delay(t.entrance_cards_delay)
        .duration(t.entrance_cards)
        .stagger(Stagger::Amount {
            amount: t.entrance_cards_stagger,
            from: StaggerFrom::End,
            ease: Ease::Power4InOut,
        });
        let text = Tween::to(
            Target::InfoText(current),
            state.text_count(current),
            Props {
                opacity: Some(1.0),
                translate_y: Some(Length::Px(0.0)),
                ..Default::default()
            },
        )
        .delay(t.entrance_text_delay)
        .duration(t.entrance_text)
        .stagger(Stagger::Each(t.text_stagger));
        let nav = Tween::to(
            Target::NavControls,
            2,
            Props {
                opacity: Some(1.0),
                pointer_events: Some(true),
                ..Default::default()
            },
        )
        .duration(t.entrance_nav);

        let choreography = Choreography::new()
            .tween(cards, Position::Sequential)
            .tween(text, Position::Sequential)
            .tween(nav, Position::Overlap(t.entrance_nav_overlap))
            .cue(TransitionPhase::Idle, Position::Sequential);

        self.phase = TransitionPhase::Entering;
        Ok(choreography)
    }

    /// Drop whatever transition is playing and return to `Idle`. Returns the
    /// phase that was interrupted, or `None` if nothing was in flight.
    pub fn abort(&mut self) -> Option<TransitionPhase> {
        match self.phase {
            TransitionPhase::Dormant | TransitionPhase::Idle => None,
            phase => {
                self.phase = TransitionPhase::Idle;
                self.in_flight = None;
                self.queued = None;
                Some(phase)
            }
        }
    }

    /// End pose of any choreography: cards in place, current text shown,
    /// nav controls enabled
    pub fn settled(&self, state: &CarouselState) -> Vec<(Target, Props)> {
        vec![
            (
                Target::AllCards,
                Props {
                    card_offset: Some(Length::Percent(0.0)),
                    ..Default::default()
                },
            ),
            (
                Target::InfoText(state.infos.current_index()),
                Props {
                    opacity: Some(1.0),
                    translate_y: Some(Length::Px(0.0)),
                    ..Default::default()
                },
            ),
            (
                Target::NavControls,
                Props {
                    opacity: Some(1.0),
                    pointer_events: Some(true),
                    ..Default::default()
                },
            ),
        ]
    }

    /// Advance the state machine for a cue fired by the timeline
    pub fn on_cue(&mut self, cue: TransitionPhase, state: &mut CarouselState) -> Result<CueOutcome> {
        let expected = self.phase.next().unwrap_or(self.phase);
        if self.phase.next() != Some(cue) {
            return Err(CarouselError::OutOfOrderCue { expected, got: cue });
        }
        self.phase = cue;

        match cue {
            TransitionPhase::Rotating => {
                let direction = self.in_flight.unwrap_or(Direction::Right);
                let rotation = apply_rotation(&mut state.infos, direction)?;
                Ok(CueOutcome::Rotated {
                    card: state.cards.current_index(),
                    info: rotation.incoming,
                })
            }
            TransitionPhase::Idle => {
                self.in_flight = None;
                Ok(CueOutcome::Finished {
                    queued: self.queued.take(),
                })
            }
            _ => Ok(CueOutcome::Continue),
        }
    }
}
