//! Carousel state and the controller that owns it
//!
//! [`CarouselState`] is the source of truth for every role and z-order on the
//! page. [`Carousel`] ties the rings to the sequencer, the tilt controller and
//! the preload gate, and answers each page event with a list of [`Effect`]s for
//! the browser layer to apply in order.

use super::preload::PreloadGate;
use super::ring::{Ring, RingKind, Role};
use super::sequencer::{CueOutcome, SwapOutcome, TransitionPhase, TransitionSequencer};
use super::tagger::Direction;
use super::tilt::{Bounds, TiltController, TiltUpdate};
use super::timeline::{Choreography, Props, Target};
use crate::error::{CarouselError, Result};
use crate::settings::Settings;

/// The three parallel rings plus per-panel text counts
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselState {
    pub cards: Ring,
    pub backgrounds: Ring,
    pub infos: Ring,
    text_counts: Vec<usize>,
}

impl CarouselState {
    /// Build from the roles found in the markup. Rings must be the same size.
    pub fn from_markup(
        cards: Vec<Option<Role>>,
        backgrounds: Vec<Option<Role>>,
        infos: Vec<Option<Role>>,
        text_counts: Vec<usize>,
    ) -> Result<Self> {
        let cards = Ring::from_roles(RingKind::Card, cards)?;
        let backgrounds = Ring::from_roles(RingKind::Background, backgrounds)?;
        let infos = Ring::from_roles(RingKind::Info, infos)?;

        let expected = cards.len();
        for ring in [&backgrounds, &infos] {
            if ring.len() != expected {
                return Err(CarouselError::RingLengthMismatch {
                    kind: ring.kind(),
                    expected,
                    actual: ring.len(),
                });
            }
        }

        let mut text_counts = text_counts;
        text_counts.resize(expected, 0);

        Ok(Self {
            cards,
            backgrounds,
            infos,
            text_counts,
        })
    }

    /// `len` items in the conventional starting layout, each info panel with
    /// `texts` text children
    pub fn with_len(len: usize, texts: usize) -> Result<Self> {
        Ok(Self {
            cards: Ring::with_len(RingKind::Card, len)?,
            backgrounds: Ring::with_len(RingKind::Background, len)?,
            infos: Ring::with_len(RingKind::Info, len)?,
            text_counts: vec![texts; len],
        })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Always false; construction rejects empty rings
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of `.text` children of info panel `index`
    pub fn text_count(&self, index: usize) -> usize {
        self.text_counts.get(index).copied().unwrap_or(0)
    }

    /// True when every index holds the same role in all three rings
    pub fn in_sync(&self) -> bool {
        self.cards.roles() == self.backgrounds.roles() && self.cards.roles() == self.infos.roles()
    }
}

/// Instruction for the browser layer
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Write ring roles and z-order to the markup
    Project,
    /// Set properties immediately
    Set(Target, Props),
    /// Play a choreography, reporting its cues back through [`Carousel::handle_cue`]
    Play(Choreography),
    AttachTilt(usize),
    DetachTilt(usize),
    /// Stop the running transition timeline; its remaining cues never fire
    Halt,
}

/// Carousel controller
#[derive(Debug, Clone)]
pub struct Carousel {
    state: CarouselState,
    sequencer: TransitionSequencer,
    tilt: TiltController,
    gate: PreloadGate,
    settings: Settings,
    /// Rings as they were before the transition in flight
    checkpoint: Option<CarouselState>,
}

impl Carousel {
    /// `assets` is the number of images the preload gate waits for
    pub fn new(state: CarouselState, settings: Settings, assets: usize) -> Self {
        let timing = settings.effective_timing();
        Self {
            sequencer: TransitionSequencer::new(timing, settings.overlap_policy),
            tilt: TiltController::new(settings.tilt_factor, settings.effective_tilt()),
            gate: PreloadGate::new(assets),
            state,
            settings,
            checkpoint: None,
        }
    }

    pub fn state(&self) -> &CarouselState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> TransitionPhase {
        self.sequencer.phase()
    }

    pub fn is_busy(&self) -> bool {
        self.sequencer.is_busy()
    }

    pub fn gate(&self) -> &PreloadGate {
        &self.gate
    }

    /// Card the tilt listeners are bound to
    pub fn tilt_card(&self) -> Option<usize> {
        self.tilt.attached()
    }

    /// Hold the pre-entrance pose, bind tilt to the current card, and open
    /// the gate right away if there are no images to wait for.
    pub fn start(&mut self) -> Result<Vec<Effect>> {
        let mut effects: Vec<Effect> = self
            .sequencer
            .pose(&self.state)?
            .into_iter()
            .map(|(target, props)| Effect::Set(target, props))
            .collect();

        let card = self.state.cards.current_index();
        self.tilt.attach(card);
        effects.push(Effect::AttachTilt(card));

        log::info!(
            "Carousel started: {} items, waiting for {} images",
            self.state.len(),
            self.gate.total()
        );
        if self.gate.start() {
            effects.push(Effect::Play(self.open()?));
        }
        Ok(effects)
    }

    /// An image finished (or failed) loading
    pub fn asset_ready(&mut self, index: usize, is_complete: bool) -> Result<Vec<Effect>> {
        let timing = self.settings.effective_timing();
        let progress = self.gate.on_asset(index, is_complete, &timing)?;

        let mut effects = Vec::new();
        if let Some(loader) = progress.loader {
            log::debug!("Loaded {}/{} images", self.gate.loaded(), self.gate.total());
            effects.push(Effect::Play(loader));
        }
        if progress.opened {
            effects.push(Effect::Play(self.open()?));
        }
        Ok(effects)
    }

    fn open(&mut self) -> Result<Choreography> {
        log::info!("All images loaded, playing entrance");
        let overlay = PreloadGate::overlay_choreography(&self.settings.effective_timing());
        let entrance = self.sequencer.entrance(&self.state)?;
        self.checkpoint = Some(self.state.clone());
        Ok(overlay.then(entrance))
    }

    /// Navigation trigger
    pub fn request_swap(&mut self, direction: Direction) -> Result<Vec<Effect>> {
        let before = self.state.clone();
        match self.sequencer.swap(&mut self.state, direction)? {
            SwapOutcome::Started(choreography) => {
                self.checkpoint = Some(before);
                log::info!(
                    "Swap {}: card {} is current",
                    direction.as_str(),
                    self.state.cards.current_index()
                );
                let mut effects = Vec::with_capacity(5);
                if let Some(card) = self.tilt.detach() {
                    effects.push(Effect::DetachTilt(card));
                    // Info roles have not rotated yet, so this is the outgoing panel
                    let reset = TiltUpdate {
                        card,
                        info: self.state.infos.current_index(),
                        angle: 0.0,
                    };
                    effects.extend(reset.sets().into_iter().map(|(t, p)| Effect::Set(t, p)));
                }
                effects.push(Effect::Project);
                effects.push(Effect::Play(choreography));
                Ok(effects)
            }
            SwapOutcome::Queued => {
                log::debug!("Swap {} queued behind {:?}", direction.as_str(), self.phase());
                Ok(Vec::new())
            }
        }
    }

    /// A cue fired on a playing choreography
    pub fn handle_cue(&mut self, cue: TransitionPhase) -> Result<Vec<Effect>> {
        match self.sequencer.on_cue(cue, &mut self.state)? {
            CueOutcome::Continue => Ok(Vec::new()),
            CueOutcome::Rotated { card, .. } => {
                let mut effects = vec![Effect::Project];
                if let Some(old) = self.tilt.attach(card) {
                    effects.push(Effect::DetachTilt(old));
                }
                effects.push(Effect::AttachTilt(card));
                Ok(effects)
            }
            CueOutcome::Finished { queued } => {
                self.checkpoint = None;
                match queued {
                    Some(direction) => self.request_swap(direction),
                    None => Ok(Vec::new()),
                }
            }
        }
    }

    /// Give up on the transition in flight after the page failed to carry
    /// out one of its effects. Rings go back to where they were before it
    /// started, the page is settled in its resting pose, and tilt is bound
    /// to the current card again.
    pub fn abort_transition(&mut self) -> Vec<Effect> {
        let Some(phase) = self.sequencer.abort() else {
            return Vec::new();
        };
        if let Some(state) = self.checkpoint.take() {
            self.state = state;
        }
        log::warn!(
            "Transition aborted during {:?}; card {} is current",
            phase,
            self.state.cards.current_index()
        );

        let mut effects = vec![Effect::Halt, Effect::Project];
        effects.extend(
            self.sequencer
                .settled(&self.state)
                .into_iter()
                .map(|(target, props)| Effect::Set(target, props)),
        );
        if phase == TransitionPhase::Entering {
            effects.push(Effect::Set(
                Target::LoadingOverlay,
                Props {
                    opacity: Some(0.0),
                    pointer_events: Some(false),
                    ..Default::default()
                },
            ));
        }
        let card = self.state.cards.current_index();
        if let Some(old) = self.tilt.attach(card) {
            effects.push(Effect::DetachTilt(old));
        }
        effects.push(Effect::AttachTilt(card));
        effects
    }

    /// Pointer moved over `card` at horizontal client position `pointer_x`
    pub fn pointer_move(&self, card: usize, pointer_x: f32, bounds: &Bounds) -> Vec<Effect> {
        let info = self.state.infos.current_index();
        self.tilt
            .on_move(card, info, pointer_x, bounds)
            .map(|update| update.sets().into_iter().map(|(t, p)| Effect::Set(t, p)).collect())
            .unwrap_or_default()
    }

    /// Pointer left `card`
    pub fn pointer_leave(&self, card: usize) -> Vec<Effect> {
        let info = self.state.infos.current_index();
        self.tilt
            .on_leave(card, info)
            .map(|update| update.sets().into_iter().map(|(t, p)| Effect::Set(t, p)).collect())
            .unwrap_or_default()
    }
}
