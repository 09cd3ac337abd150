//! Card Carousel entry point
//!
//! Wires page events to the carousel controller and carries out its effects.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{MouseEvent, PointerEvent};

    use card_carousel::carousel::{CarouselState, Choreography, Props, Target, TransitionPhase};
    use card_carousel::platform::dom::Page;
    use card_carousel::platform::{Host, apply_or_recover, gsap};
    use card_carousel::{Carousel, CarouselError, Direction, Effect, Result, Settings};

    /// Pointer listeners for one card
    struct TiltListeners {
        on_move: Closure<dyn FnMut(PointerEvent)>,
        on_leave: Closure<dyn FnMut(PointerEvent)>,
    }

    /// Browser side of the carousel
    struct BrowserHost {
        page: Page,
        on_cue: Option<Closure<dyn FnMut(u32)>>,
        tilt: Vec<TiltListeners>,
        /// Timeline of the transition playing now
        timeline: Option<JsValue>,
    }

    impl Host for BrowserHost {
        fn project(&mut self, state: &CarouselState) -> Result<()> {
            self.page.project(state)
        }

        fn set(&mut self, target: Target, props: &Props) -> Result<()> {
            if !self.page.has(target) {
                return Ok(());
            }
            gsap::set(&self.page.resolve(target)?, props)
        }

        fn play(&mut self, choreography: &Choreography) -> Result<()> {
            let on_cue = self
                .on_cue
                .as_ref()
                .ok_or_else(|| CarouselError::Script("cue handler not installed".into()))?;
            let timeline = gsap::play(&self.page, choreography, on_cue.as_ref().unchecked_ref())?;
            if !choreography.cues().is_empty() {
                self.timeline = Some(timeline);
            }
            Ok(())
        }

        fn halt(&mut self) -> Result<()> {
            match self.timeline.take() {
                Some(timeline) => gsap::kill(&timeline),
                None => Ok(()),
            }
        }

        fn attach_tilt(&mut self, card: usize) -> Result<()> {
            let (Some(el), Some(listeners)) = (self.page.card(card), self.tilt.get(card)) else {
                return Ok(());
            };
            let _ = el.add_event_listener_with_callback(
                "pointermove",
                listeners.on_move.as_ref().unchecked_ref(),
            );
            let _ = el.add_event_listener_with_callback(
                "pointerleave",
                listeners.on_leave.as_ref().unchecked_ref(),
            );
            Ok(())
        }

        fn detach_tilt(&mut self, card: usize) -> Result<()> {
            let (Some(el), Some(listeners)) = (self.page.card(card), self.tilt.get(card)) else {
                return Ok(());
            };
            let _ = el.remove_event_listener_with_callback(
                "pointermove",
                listeners.on_move.as_ref().unchecked_ref(),
            );
            let _ = el.remove_event_listener_with_callback(
                "pointerleave",
                listeners.on_leave.as_ref().unchecked_ref(),
            );
            Ok(())
        }
    }

    /// Carousel instance holding all state
    struct App {
        carousel: Carousel,
        host: BrowserHost,
    }

    impl App {
        /// Carry out effects; failures are logged, never raised. A page
        /// failure aborts the transition in flight.
        fn apply(&mut self, effects: Result<Vec<Effect>>) {
            let result = effects.and_then(|effects| apply_or_recover(&mut self.host, &mut self.carousel, effects));
            if let Err(e) = result {
                log::warn!("Carousel: {}", e);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Card carousel starting...");

        if let Err(e) = start() {
            log::error!("Card carousel failed to start: {}", e);
        }
    }

    fn start() -> Result<()> {
        let window = web_sys::window().ok_or(CarouselError::MissingElement("window"))?;
        let document = window.document().ok_or(CarouselError::MissingElement("document"))?;

        let page = Page::query(&document)?;
        let state = page.read_state()?;
        let images = page.images().to_vec();
        let settings = Settings::load();
        log::info!(
            "Overlap policy: {}, reduced motion: {}",
            settings.overlap_policy.as_str(),
            settings.reduced_motion
        );

        let carousel = Carousel::new(state, settings, images.len());
        let app = Rc::new(RefCell::new(App {
            carousel,
            host: BrowserHost {
                page,
                on_cue: None,
                tilt: Vec::new(),
                timeline: None,
            },
        }));

        setup_cue_handler(app.clone());
        setup_tilt_listeners(app.clone());
        setup_nav_buttons(app.clone());

        {
            let mut a = app.borrow_mut();
            let effects = a.carousel.start();
            a.apply(effects);
        }

        watch_images(app, &images);

        log::info!("Card carousel running!");
        Ok(())
    }

    fn setup_cue_handler(app: Rc<RefCell<App>>) {
        let handle = app.clone();
        let closure = Closure::<dyn FnMut(u32)>::new(move |code: u32| {
            let Some(cue) = TransitionPhase::from_code(code) else {
                log::warn!("Unknown cue code {}", code);
                return;
            };
            let mut a = handle.borrow_mut();
            let effects = a.carousel.handle_cue(cue);
            a.apply(effects);
        });
        app.borrow_mut().host.on_cue = Some(closure);
    }

    fn setup_tilt_listeners(app: Rc<RefCell<App>>) {
        let count = app.borrow().carousel.state().len();
        let listeners = (0..count)
            .map(|card| {
                let handle = app.clone();
                let on_move = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                    let mut a = handle.borrow_mut();
                    let Some(bounds) = a.host.page.card_bounds(card) else {
                        return;
                    };
                    let effects = a.carousel.pointer_move(card, event.client_x() as f32, &bounds);
                    a.apply(Ok(effects));
                });
                let handle = app.clone();
                let on_leave = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                    let mut a = handle.borrow_mut();
                    let effects = a.carousel.pointer_leave(card);
                    a.apply(Ok(effects));
                });
                TiltListeners { on_move, on_leave }
            })
            .collect();
        app.borrow_mut().host.tilt = listeners;
    }

    fn setup_nav_buttons(app: Rc<RefCell<App>>) {
        let nav = app.borrow().host.page.nav().clone();
        for (button, direction) in nav.iter().zip([Direction::Left, Direction::Right]) {
            let handle = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = handle.borrow_mut();
                match a.carousel.request_swap(direction) {
                    Err(CarouselError::ConcurrentTransition { phase }) => {
                        log::debug!("Ignoring {} swap during {:?}", direction.as_str(), phase);
                    }
                    effects => a.apply(effects),
                }
            });
            let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn watch_images(app: Rc<RefCell<App>>, images: &[web_sys::Element]) {
        for (index, image) in images.iter().enumerate() {
            let handle = app.clone();
            let closure = Closure::<dyn FnMut(bool)>::new(move |is_complete: bool| {
                let mut a = handle.borrow_mut();
                let effects = a.carousel.asset_ready(index, is_complete);
                a.apply(effects);
            });
            if let Err(e) = gsap::watch_image(image, closure.as_ref().unchecked_ref()) {
                log::warn!("Cannot watch image {}: {}", index, e);
            }
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Card carousel (native) starting...");
    log::info!("The carousel needs a browser page - run with `trunk serve` for the web version");

    println!("\nRunning carousel walkthrough...");
    if let Err(e) = walkthrough() {
        eprintln!("walkthrough failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Enter a five-card carousel and swap through it, playing every cue in order
#[cfg(not(target_arch = "wasm32"))]
fn walkthrough() -> card_carousel::Result<()> {
    use card_carousel::carousel::Role;
    use card_carousel::{Carousel, CarouselState, Direction, Effect, Settings};

    fn play(carousel: &mut Carousel, effects: Vec<Effect>) -> card_carousel::Result<()> {
        for effect in effects {
            if let Effect::Play(choreography) = effect {
                for cue in choreography.cues() {
                    let more = carousel.handle_cue(cue)?;
                    play(carousel, more)?;
                }
            }
        }
        Ok(())
    }

    fn label(role: Option<Role>) -> &'static str {
        role.map(|r| r.as_str()).unwrap_or("-")
    }

    let mut carousel = Carousel::new(CarouselState::with_len(5, 3)?, Settings::default(), 0);
    let effects = carousel.start()?;
    play(&mut carousel, effects)?;

    for direction in [Direction::Right, Direction::Right, Direction::Left] {
        let effects = carousel.request_swap(direction)?;
        play(&mut carousel, effects)?;
        let roles: Vec<&str> = carousel.state().cards.roles().into_iter().map(label).collect();
        println!("{:>5}: {:?}", direction.as_str(), roles);
    }

    assert!(carousel.state().in_sync(), "rings out of sync");
    println!("✓ Carousel walkthrough passed!");
    Ok(())
}
