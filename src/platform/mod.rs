//! Platform abstraction layer
//!
//! The carousel core answers page events with [`Effect`]s; a [`Host`] carries
//! them out. In the browser that means:
//! - `dom`: element lookup, role projection (classes and z-index), listeners
//! - `gsap`: GSAP timelines and imagesLoaded, bound through inline JS

use crate::carousel::{Carousel, CarouselState, Choreography, Effect, Props, Target};
use crate::error::Result;

pub mod gsap;

#[cfg(target_arch = "wasm32")]
pub mod dom;

/// Something that can render carousel effects
pub trait Host {
    /// Write ring roles and z-order to the page
    fn project(&mut self, state: &CarouselState) -> Result<()>;
    /// Set properties without animating
    fn set(&mut self, target: Target, props: &Props) -> Result<()>;
    /// Start a choreography; cues are reported back asynchronously
    fn play(&mut self, choreography: &Choreography) -> Result<()>;
    fn attach_tilt(&mut self, card: usize) -> Result<()>;
    fn detach_tilt(&mut self, card: usize) -> Result<()>;
    /// Stop the transition timeline started by the last `play`, if any
    fn halt(&mut self) -> Result<()>;
}

/// Apply `effects` in order, stopping at the first failure
pub fn apply<H: Host + ?Sized>(host: &mut H, state: &CarouselState, effects: Vec<Effect>) -> Result<()> {
    for effect in effects {
        match effect {
            Effect::Project => host.project(state)?,
            Effect::Set(target, props) => host.set(target, &props)?,
            Effect::Play(choreography) => host.play(&choreography)?,
            Effect::AttachTilt(card) => host.attach_tilt(card)?,
            Effect::DetachTilt(card) => host.detach_tilt(card)?,
            Effect::Halt => host.halt()?,
        }
    }
    Ok(())
}

/// Apply `effects`; if one fails, abort the transition in flight and apply
/// the recovery so the carousel stays usable. Returns the original failure.
pub fn apply_or_recover<H: Host + ?Sized>(host: &mut H, carousel: &mut Carousel, effects: Vec<Effect>) -> Result<()> {
    let Err(err) = apply(host, carousel.state(), effects) else {
        return Ok(());
    };
    let recovery = carousel.abort_transition();
    if let Err(e) = apply(host, carousel.state(), recovery) {
        log::error!("Carousel recovery failed: {}", e);
    }
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::{Direction, Role, TransitionPhase};
    use crate::error::CarouselError;
    use crate::settings::Settings;

    /// Records what the carousel asked for
    #[derive(Default)]
    struct Recorder {
        log: Vec<String>,
        projected: Vec<Vec<Option<Role>>>,
        fail_play: bool,
    }

    impl Host for Recorder {
        fn project(&mut self, state: &CarouselState) -> Result<()> {
            self.projected.push(state.cards.roles());
            self.log.push("project".into());
            Ok(())
        }

        fn set(&mut self, target: Target, _props: &Props) -> Result<()> {
            self.log.push(format!("set {target:?}"));
            Ok(())
        }

        fn play(&mut self, choreography: &Choreography) -> Result<()> {
            if self.fail_play {
                return Err(CarouselError::Script("gsap missing".into()));
            }
            self.log.push(format!("play {}", choreography.steps().len()));
            Ok(())
        }

        fn attach_tilt(&mut self, card: usize) -> Result<()> {
            self.log.push(format!("attach {card}"));
            Ok(())
        }

        fn detach_tilt(&mut self, card: usize) -> Result<()> {
            self.log.push(format!("detach {card}"));
            Ok(())
        }

        fn halt(&mut self) -> Result<()> {
            self.log.push("halt".into());
            Ok(())
        }
    }

    fn entered() -> Carousel {
        let mut carousel = Carousel::new(CarouselState::with_len(3, 2).unwrap(), Settings::default(), 0);
        let effects = carousel.start().unwrap();
        for effect in effects {
            if let Effect::Play(c) = effect {
                for cue in c.cues() {
                    carousel.handle_cue(cue).unwrap();
                }
            }
        }
        carousel
    }

    #[test]
    fn test_swap_projects_before_playing() {
        let mut carousel = entered();
        let effects = carousel.request_swap(Direction::Right).unwrap();
        let mut host = Recorder::default();
        apply(&mut host, carousel.state(), effects).unwrap();

        assert_eq!(
            host.log,
            vec!["detach 0", "set Card(0)", "set InfoPanel(0)", "project", "play 9"]
        );
        // Cards already rotated when projected
        assert_eq!(host.projected[0][1], Some(Role::Current));
    }

    #[test]
    fn test_start_sets_pose_then_plays() {
        let mut carousel = Carousel::new(CarouselState::with_len(3, 2).unwrap(), Settings::default(), 0);
        let effects = carousel.start().unwrap();
        let mut host = Recorder::default();
        apply(&mut host, carousel.state(), effects).unwrap();
        assert_eq!(
            host.log,
            vec![
                "set AllCards",
                "set InfoText(0)",
                "set NavControls",
                "attach 0",
                "play 5",
            ]
        );
    }

    #[test]
    fn test_apply_stops_at_failure() {
        let mut carousel = entered();
        let effects = carousel.request_swap(Direction::Left).unwrap();
        let mut host = Recorder {
            fail_play: true,
            ..Default::default()
        };
        let err = apply(&mut host, carousel.state(), effects).unwrap_err();
        assert_eq!(err, CarouselError::Script("gsap missing".into()));
        assert_eq!(
            host.log,
            vec!["detach 0", "set Card(0)", "set InfoPanel(0)", "project"]
        );
        // Plain apply leaves the transition hanging
        assert!(carousel.is_busy());
    }

    #[test]
    fn test_failed_play_recovers_carousel() {
        let mut carousel = entered();
        let before = carousel.state().clone();
        let effects = carousel.request_swap(Direction::Left).unwrap();
        let mut host = Recorder {
            fail_play: true,
            ..Default::default()
        };
        let err = apply_or_recover(&mut host, &mut carousel, effects).unwrap_err();
        assert_eq!(err, CarouselError::Script("gsap missing".into()));

        assert!(!carousel.is_busy());
        assert!(carousel.state().in_sync());
        assert_eq!(carousel.state(), &before);
        assert_eq!(carousel.tilt_card(), Some(0));
        assert_eq!(host.log[4], "halt");
        assert_eq!(host.log.last().map(String::as_str), Some("attach 0"));
        // Cards projected rotated, then put back
        assert_eq!(host.projected.len(), 2);
        assert_eq!(host.projected[1][0], Some(Role::Current));

        host.fail_play = false;
        let effects = carousel.request_swap(Direction::Left).unwrap();
        assert!(apply_or_recover(&mut host, &mut carousel, effects).is_ok());
        assert!(carousel.is_busy());
    }

    #[test]
    fn test_failed_entrance_recovers_carousel() {
        let mut carousel = Carousel::new(CarouselState::with_len(3, 2).unwrap(), Settings::default(), 0);
        let effects = carousel.start().unwrap();
        let mut host = Recorder {
            fail_play: true,
            ..Default::default()
        };
        assert!(apply_or_recover(&mut host, &mut carousel, effects).is_err());
        assert_eq!(carousel.phase(), TransitionPhase::Idle);
        assert!(host.log.contains(&"set LoadingOverlay".to_string()));
        assert!(carousel.request_swap(Direction::Right).is_ok());
    }
}
