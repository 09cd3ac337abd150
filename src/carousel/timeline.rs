//! Backend-independent animation timeline
//!
//! A [`Choreography`] is an ordered list of tweens and cues with relative start
//! positions. The browser layer turns it into a GSAP timeline; tests resolve it
//! with [`Choreography::schedule`] and replay the cues by hand.

use serde_json::{Map, Value, json};

use super::sequencer::TransitionPhase;

/// CSS length used by the tweened properties
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f32),
    Percent(f32),
}

impl Length {
    pub fn css(&self) -> String {
        match self {
            Length::Px(v) => format!("{v}px"),
            Length::Percent(v) => format!("{v}%"),
        }
    }
}

/// HSL color (hue in degrees, saturation and lightness in percent)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Hsl {
    pub fn css(&self) -> String {
        format!("hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}

/// Animatable properties. Unset fields are not touched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Props {
    pub opacity: Option<f32>,
    pub translate_y: Option<Length>,
    pub pointer_events: Option<bool>,
    pub scale_x: Option<f32>,
    pub background: Option<Hsl>,
    /// `--card-translateY-offset` custom property
    pub card_offset: Option<Length>,
    /// `--current-card-rotation-offset` custom property, degrees
    pub card_rotation: Option<f32>,
    /// Y-axis rotation, degrees
    pub rotate_y: Option<f32>,
}

impl Props {
    /// GSAP vars object for these properties
    pub fn to_vars(&self) -> Map<String, Value> {
        let mut vars = Map::new();
        if let Some(v) = self.opacity {
            vars.insert("opacity".into(), json!(v));
        }
        if let Some(v) = self.translate_y {
            vars.insert("translateY".into(), json!(v.css()));
        }
        if let Some(v) = self.pointer_events {
            vars.insert("pointerEvents".into(), json!(if v { "all" } else { "none" }));
        }
        if let Some(v) = self.scale_x {
            vars.insert("scaleX".into(), json!(v));
        }
        if let Some(v) = self.background {
            vars.insert("backgroundColor".into(), json!(v.css()));
        }
        if let Some(v) = self.card_offset {
            vars.insert("--card-translateY-offset".into(), json!(v.css()));
        }
        if let Some(v) = self.card_rotation {
            vars.insert("--current-card-rotation-offset".into(), json!(format!("{v}deg")));
        }
        if let Some(v) = self.rotate_y {
            vars.insert("rotateY".into(), json!(format!("{v}deg")));
        }
        vars
    }
}

/// What a tween animates. Indices refer to ring slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Both direction buttons
    NavControls,
    /// Every card, in document order
    AllCards,
    Card(usize),
    InfoPanel(usize),
    /// The `.text` children of one info panel
    InfoText(usize),
    LoaderBar,
    LoadingOverlay,
}

/// Easing curves used by the carousel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Power4InOut,
}

impl Ease {
    pub fn gsap_name(&self) -> &'static str {
        match self {
            Ease::Power4InOut => "power4.inOut",
        }
    }

    /// Eased progress for `t` in `[0, 1]`
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Power4InOut => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
        }
    }
}

/// Which end of the target list a stagger starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaggerFrom {
    #[default]
    Start,
    End,
}

/// Per-target start offsets
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stagger {
    /// Fixed gap between consecutive targets
    Each(f32),
    /// Total spread distributed over all targets
    Amount {
        amount: f32,
        from: StaggerFrom,
        ease: Ease,
    },
}

impl Stagger {
    /// Start offset of each of `count` targets, in target order
    pub fn offsets(&self, count: usize) -> Vec<f32> {
        match *self {
            Stagger::Each(gap) => (0..count).map(|i| i as f32 * gap).collect(),
            Stagger::Amount { amount, from, ease } => {
                if count < 2 {
                    return vec![0.0; count];
                }
                let last = (count - 1) as f32;
                (0..count)
                    .map(|i| {
                        let rank = match from {
                            StaggerFrom::Start => i as f32,
                            StaggerFrom::End => last - i as f32,
                        };
                        ease.apply(rank / last) * amount
                    })
                    .collect()
            }
        }
    }

    /// Offset of the last target to start
    pub fn span(&self, count: usize) -> f32 {
        self.offsets(count).into_iter().fold(0.0, f32::max)
    }

    fn to_value(self) -> Value {
        match self {
            Stagger::Each(gap) => json!(gap),
            Stagger::Amount { amount, from, ease } => json!({
                "amount": amount,
                "from": match from {
                    StaggerFrom::Start => "start",
                    StaggerFrom::End => "end",
                },
                "ease": ease.gsap_name(),
            }),
        }
    }
}

/// Start position of a step relative to the timeline built so far
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Position {
    /// At the current end of the timeline
    #[default]
    Sequential,
    /// This many seconds before the current end (never before 0)
    Overlap(f32),
    /// Absolute time
    At(f32),
}

impl Position {
    fn resolve(&self, end: f32) -> f32 {
        match *self {
            Position::Sequential => end,
            Position::Overlap(s) => (end - s).max(0.0),
            Position::At(t) => t.max(0.0),
        }
    }

    /// GSAP position parameter; `null` appends at the end of the timeline
    pub fn to_value(&self) -> Value {
        match *self {
            Position::Sequential => Value::Null,
            Position::Overlap(s) => json!(format!("-={s}")),
            Position::At(t) => json!(t),
        }
    }
}

/// One animated property change on a set of elements
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub target: Target,
    /// Number of elements `target` resolves to
    pub count: usize,
    pub from: Option<Props>,
    pub to: Props,
    pub duration: f32,
    pub delay: f32,
    pub stagger: Option<Stagger>,
}

impl Tween {
    pub fn to(target: Target, count: usize, to: Props) -> Self {
        Self {
            target,
            count,
            from: None,
            to,
            duration: 0.0,
            delay: 0.0,
            stagger: None,
        }
    }

    pub fn from(mut self, from: Props) -> Self {
        self.from = Some(from);
        self
    }

    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    pub fn delay(mut self, seconds: f32) -> Self {
        self.delay = seconds;
        self
    }

    pub fn stagger(mut self, stagger: Stagger) -> Self {
        self.stagger = Some(stagger);
        self
    }

    /// Time from the first target starting to the last one finishing
    pub fn span(&self) -> f32 {
        let stagger = self.stagger.map(|s| s.span(self.count)).unwrap_or(0.0);
        self.duration + stagger
    }

    /// GSAP vars object for the destination of this tween
    pub fn to_vars(&self) -> Map<String, Value> {
        let mut vars = self.to.to_vars();
        vars.insert("duration".into(), json!(self.duration));
        if self.delay > 0.0 {
            vars.insert("delay".into(), json!(self.delay));
        }
        if let Some(stagger) = self.stagger {
            vars.insert("stagger".into(), stagger.to_value());
        }
        vars
    }
}

/// One entry of a choreography
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Tween { tween: Tween, position: Position },
    /// Zero-length marker that fires when the timeline reaches it
    Cue {
        phase: TransitionPhase,
        position: Position,
    },
}

impl Step {
    pub fn position(&self) -> Position {
        match self {
            Step::Tween { position, .. } | Step::Cue { position, .. } => *position,
        }
    }
}

/// Resolved `[start, end)` of a step, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scheduled {
    pub start: f32,
    pub end: f32,
}

/// Ordered list of steps played as one timeline
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Choreography {
    steps: Vec<Step>,
}

impl Choreography {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tween(mut self, tween: Tween, position: Position) -> Self {
        self.steps.push(Step::Tween { tween, position });
        self
    }

    pub fn cue(mut self, phase: TransitionPhase, position: Position) -> Self {
        self.steps.push(Step::Cue { phase, position });
        self
    }

    /// Append another choreography after this one
    pub fn then(mut self, other: Choreography) -> Self {
        self.steps.extend(other.steps);
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Copy without the tweens whose target fails `keep`. Cues always stay.
    pub fn filter_tweens(&self, keep: impl Fn(Target) -> bool) -> Choreography {
        Choreography {
            steps: self
                .steps
                .iter()
                .filter(|step| match step {
                    Step::Tween { tween, .. } => keep(tween.target),
                    Step::Cue { .. } => true,
                })
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Absolute timing of every step, in step order
    pub fn schedule(&self) -> Vec<Scheduled> {
        let mut end = 0.0f32;
        self.steps
            .iter()
            .map(|step| {
                let at = step.position().resolve(end);
                let scheduled = match step {
                    Step::Tween { tween, .. } => {
                        let start = at + tween.delay;
                        Scheduled {
                            start,
                            end: start + tween.span(),
                        }
                    }
                    Step::Cue { .. } => Scheduled { start: at, end: at },
                };
                end = end.max(scheduled.end);
                scheduled
            })
            .collect()
    }

    /// Total length in seconds
    pub fn duration(&self) -> f32 {
        self.schedule().iter().fold(0.0, |acc, s| acc.max(s.end))
    }

    /// Cues in the order the timeline fires them
    pub fn cues(&self) -> Vec<TransitionPhase> {
        let schedule = self.schedule();
        let mut cues: Vec<(f32, TransitionPhase)> = self
            .steps
            .iter()
            .zip(schedule)
            .filter_map(|(step, at)| match step {
                Step::Cue { phase, .. } => Some((at.start, *phase)),
                Step::Tween { .. } => None,
            })
            .collect();
        // Stable: cues at the same time keep step order
        cues.sort_by(|a, b| a.0.total_cmp(&b.0));
        cues.into_iter().map(|(_, phase)| phase).collect()
    }

    /// Start time of the first tween on `target`
    pub fn start_of(&self, target: Target) -> Option<f32> {
        self.steps
            .iter()
            .zip(self.schedule())
            .find_map(|(step, at)| match step {
                Step::Tween { tween, .. } if tween.target == target => Some(at.start),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn fade(target: Target, duration: f32) -> Tween {
        Tween::to(
            target,
            1,
            Props {
                opacity: Some(0.0),
                ..Default::default()
            },
        )
        .duration(duration)
    }

    #[test]
    fn test_sequential_and_overlap() {
        let c = Choreography::new()
            .tween(fade(Target::NavControls, 0.2), Position::Sequential)
            .tween(fade(Target::LoaderBar, 0.4), Position::Overlap(0.1))
            .cue(TransitionPhase::Idle, Position::Sequential);
        let s = c.schedule();
        assert!(approx(s[1].start, 0.1));
        assert!(approx(s[1].end, 0.5));
        assert!(approx(s[2].start, 0.5));
        assert!(approx(c.duration(), 0.5));
    }

    #[test]
    fn test_overlap_clamped_at_zero() {
        let c = Choreography::new().tween(fade(Target::LoaderBar, 1.0), Position::Overlap(3.0));
        assert!(approx(c.schedule()[0].start, 0.0));
    }

    #[test]
    fn test_delay_and_stagger_span() {
        let tween = fade(Target::InfoText(0), 0.4)
            .delay(0.5)
            .stagger(Stagger::Each(0.1));
        let tween = Tween { count: 3, ..tween };
        let c = Choreography::new().tween(tween, Position::At(1.0));
        let s = c.schedule()[0];
        assert!(approx(s.start, 1.5));
        assert!(approx(s.end, 2.1));
    }

    #[test]
    fn test_stagger_from_end() {
        let stagger = Stagger::Amount {
            amount: 0.1,
            from: StaggerFrom::End,
            ease: Ease::Power4InOut,
        };
        let offsets = stagger.offsets(3);
        assert!(approx(offsets[0], 0.1));
        assert!(approx(offsets[1], 0.05));
        assert!(approx(offsets[2], 0.0));
        assert!(approx(stagger.span(3), 0.1));
        assert_eq!(stagger.offsets(1), vec![0.0]);
    }

    #[test]
    fn test_power4_endpoints() {
        assert!(approx(Ease::Power4InOut.apply(0.0), 0.0));
        assert!(approx(Ease::Power4InOut.apply(0.5), 0.5));
        assert!(approx(Ease::Power4InOut.apply(1.0), 1.0));
    }

    #[test]
    fn test_filter_tweens_keeps_cues() {
        let c = Choreography::new()
            .tween(fade(Target::LoadingOverlay, 0.8), Position::Sequential)
            .tween(fade(Target::AllCards, 0.5), Position::Sequential)
            .cue(TransitionPhase::Idle, Position::Sequential);
        let kept = c.filter_tweens(|target| target != Target::LoadingOverlay);
        assert_eq!(kept.steps().len(), 2);
        assert_eq!(kept.start_of(Target::AllCards), Some(0.0));
        assert_eq!(kept.cues(), vec![TransitionPhase::Idle]);
        assert!(approx(kept.duration(), 0.5));
    }

    #[test]
    fn test_cues_in_time_order() {
        let c = Choreography::new()
            .tween(fade(Target::NavControls, 1.0), Position::Sequential)
            .cue(TransitionPhase::Idle, Position::Sequential)
            .cue(TransitionPhase::Disabling, Position::At(0.0));
        assert_eq!(
            c.cues(),
            vec![TransitionPhase::Disabling, TransitionPhase::Idle]
        );
    }

    #[test]
    fn test_props_to_gsap_vars() {
        let props = Props {
            opacity: Some(0.5),
            translate_y: Some(Length::Px(-120.0)),
            pointer_events: Some(false),
            background: Some(Hsl {
                hue: 60.0,
                saturation: 100.0,
                lightness: 50.0,
            }),
            card_offset: Some(Length::Percent(0.0)),
            ..Default::default()
        };
        let vars = props.to_vars();
        assert_eq!(vars["opacity"], json!(0.5));
        assert_eq!(vars["translateY"], json!("-120px"));
        assert_eq!(vars["pointerEvents"], json!("none"));
        assert_eq!(vars["backgroundColor"], json!("hsl(60, 100%, 50%)"));
        assert_eq!(vars["--card-translateY-offset"], json!("0%"));
        assert!(!vars.contains_key("scaleX"));
    }

    #[test]
    fn test_tween_vars_include_timing() {
        let tween = fade(Target::AllCards, 0.5)
            .delay(0.15)
            .stagger(Stagger::Amount {
                amount: 0.1,
                from: StaggerFrom::End,
                ease: Ease::Power4InOut,
            });
        let vars = tween.to_vars();
        assert_eq!(vars["duration"], json!(0.5));
        assert_eq!(vars["delay"], json!(0.15f32));
        assert!(!vars.contains_key("ease"));
        assert_eq!(vars["stagger"]["from"], json!("end"));
        assert_eq!(vars["stagger"]["ease"], json!("power4.inOut"));
    }

    #[test]
    fn test_position_params() {
        assert_eq!(Position::Sequential.to_value(), Value::Null);
        assert_eq!(Position::Overlap(0.4).to_value(), json!("-=0.4"));
        assert_eq!(Position::At(0.0).to_value(), json!(0.0f32));
    }
}
