//! GSAP and imagesLoaded bindings
//!
//! A choreography crosses into JS as a JSON array of steps plus a parallel
//! array of resolved targets. Cue steps become `timeline.call` entries that
//! report the phase code back to Rust.

use serde_json::{Value, json};

use crate::carousel::{Choreography, Step};

/// JSON description of every step, in order
pub fn steps_json(choreography: &Choreography) -> Value {
    Value::Array(
        choreography
            .steps()
            .iter()
            .map(|step| match step {
                Step::Tween { tween, position } => json!({
                    "kind": "tween",
                    "vars": tween.to_vars(),
                    "from": tween.from.map(|from| from.to_vars()),
                    "position": position.to_value(),
                }),
                Step::Cue { phase, position } => json!({
                    "kind": "cue",
                    "cue": phase.code(),
                    "position": position.to_value(),
                }),
            })
            .collect(),
    )
}

#[cfg(target_arch = "wasm32")]
mod bindings {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen(inline_js = "
        export function gsap_set(targets, vars) {
            window.gsap.set(targets, JSON.parse(vars));
        }

        export function gsap_play(targets, steps, on_cue) {
            const tl = window.gsap.timeline();
            JSON.parse(steps).forEach((step, i) => {
                const position = step.position === null ? undefined : step.position;
                if (step.kind === 'cue') {
                    tl.call(on_cue, [step.cue], position);
                } else if (step.from) {
                    tl.fromTo(targets[i], step.from, step.vars, position);
                } else {
                    tl.to(targets[i], step.vars, position);
                }
            });
            return tl;
        }

        export function gsap_kill(tl) {
            tl.kill();
        }

        export function images_loaded(image, on_done) {
            window.imagesLoaded(image, (instance) => on_done(instance.isComplete));
        }
    ")]
    extern "C" {
        #[wasm_bindgen(catch)]
        pub fn gsap_set(targets: &JsValue, vars: &str) -> Result<(), JsValue>;

        #[wasm_bindgen(catch)]
        pub fn gsap_play(
            targets: &js_sys::Array,
            steps: &str,
            on_cue: &js_sys::Function,
        ) -> Result<JsValue, JsValue>;

        #[wasm_bindgen(catch)]
        pub fn gsap_kill(timeline: &JsValue) -> Result<(), JsValue>;

        #[wasm_bindgen(catch)]
        pub fn images_loaded(image: &web_sys::Element, on_done: &js_sys::Function) -> Result<(), JsValue>;
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{kill, play, set, watch_image};

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::JsValue;

    use super::{bindings, steps_json};
    use crate::carousel::{Choreography, Props, Step};
    use crate::error::{CarouselError, Result};
    use crate::platform::dom::Page;

    fn script_error(err: JsValue) -> CarouselError {
        CarouselError::Script(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
    }

    /// `gsap.set` on already-resolved targets
    pub fn set(targets: &JsValue, props: &Props) -> Result<()> {
        let vars = serde_json::Value::Object(props.to_vars()).to_string();
        bindings::gsap_set(targets, &vars).map_err(script_error)
    }

    /// Build and start a GSAP timeline for `choreography`, skipping tweens on
    /// optional elements the page does not have. Returns the timeline.
    pub fn play(page: &Page, choreography: &Choreography, on_cue: &js_sys::Function) -> Result<JsValue> {
        let choreography = choreography.filter_tweens(|target| page.has(target));
        let targets = js_sys::Array::new();
        for step in choreography.steps() {
            match step {
                Step::Tween { tween, .. } => targets.push(&page.resolve(tween.target)?),
                Step::Cue { .. } => targets.push(&JsValue::NULL),
            };
        }
        let steps = steps_json(&choreography).to_string();
        bindings::gsap_play(&targets, &steps, on_cue).map_err(script_error)
    }

    /// Stop a timeline returned by [`play`]
    pub fn kill(timeline: &JsValue) -> Result<()> {
        bindings::gsap_kill(timeline).map_err(script_error)
    }

    /// Report when `image` finishes loading (or fails)
    pub fn watch_image(image: &web_sys::Element, on_done: &js_sys::Function) -> Result<()> {
        bindings::images_loaded(image, on_done).map_err(script_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::{CarouselState, Direction, Position, Props, Target, TransitionSequencer, Tween};
    use crate::carousel::TransitionPhase;
    use crate::settings::{OverlapPolicy, Timing};

    #[test]
    fn test_cue_and_tween_steps() {
        let c = Choreography::new()
            .tween(
                Tween::to(
                    Target::LoaderBar,
                    1,
                    Props {
                        scale_x: Some(0.5),
                        ..Default::default()
                    },
                )
                .duration(1.0),
                Position::At(0.0),
            )
            .cue(TransitionPhase::Idle, Position::Sequential);
        let json = steps_json(&c);
        assert_eq!(json[0]["kind"], "tween");
        assert_eq!(json[0]["vars"]["scaleX"], json!(0.5));
        assert_eq!(json[0]["vars"]["duration"], json!(1.0));
        assert!(json[0]["from"].is_null());
        assert_eq!(json[1]["kind"], "cue");
        assert_eq!(json[1]["cue"], json!(TransitionPhase::Idle.code()));
        assert!(json[1]["position"].is_null());
    }

    #[test]
    fn test_swap_text_in_is_from_to() {
        let mut state = CarouselState::with_len(3, 2).unwrap();
        let mut seq = TransitionSequencer::new(Timing::default(), OverlapPolicy::Reject);
        let entrance = seq.entrance(&state).unwrap();
        for cue in entrance.cues() {
            seq.on_cue(cue, &mut state).unwrap();
        }
        let swap = match seq.swap(&mut state, Direction::Right).unwrap() {
            crate::carousel::SwapOutcome::Started(c) => c,
            crate::carousel::SwapOutcome::Queued => unreachable!(),
        };
        let json = steps_json(&swap);
        let from_to: Vec<&Value> = json
            .as_array()
            .unwrap()
            .iter()
            .filter(|s| !s["from"].is_null())
            .collect();
        assert_eq!(from_to.len(), 1);
        assert_eq!(from_to[0]["from"]["translateY"], "40px");
        assert_eq!(from_to[0]["vars"]["stagger"], json!(0.1f32));
        // Text fade-out overlaps the nav dim
        assert_eq!(json[2]["position"], "-=0.1");
    }
}
