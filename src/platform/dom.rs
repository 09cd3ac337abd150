//! Page elements and role projection
//!
//! Markup classes are read once at startup to seed the rings. After that they
//! are write-only: [`Page::project`] renders the rings, nothing reads them back.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, NodeList};

use crate::carousel::{Bounds, CarouselState, Ring, RingKind, Role, Target};
use crate::error::{CarouselError, Result};

pub const PREV_BUTTON: &str = ".btn--left";
pub const NEXT_BUTTON: &str = ".btn--right";
pub const CARDS: &str = ".cards__wrapper .card";
pub const BACKGROUNDS: &str = ".app__bg .app__bg__image";
pub const INFOS: &str = ".info__wrapper .info";
pub const TEXT: &str = ".text";
pub const LOADER_BAR: &str = ".loader span";
pub const LOADING_OVERLAY: &str = ".loading__wrapper";
pub const IMAGES: &str = "img";

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn html_elements(list: NodeList) -> Vec<HtmlElement> {
    elements(list)
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .collect()
}

fn query_one(document: &Document, selector: &'static str) -> Result<Element> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .ok_or(CarouselError::MissingElement(selector))
}

fn query_all(document: &Document, selector: &'static str) -> Vec<Element> {
    document
        .query_selector_all(selector)
        .map(elements)
        .unwrap_or_default()
}

fn array<T: AsRef<JsValue>>(items: &[T]) -> JsValue {
    items.iter().map(|item| item.as_ref().clone()).collect::<js_sys::Array>().into()
}

fn one<T: AsRef<JsValue>>(item: Option<&T>, selector: &'static str) -> Result<JsValue> {
    item.map(|item| item.as_ref().clone())
        .ok_or(CarouselError::MissingElement(selector))
}

fn ring_roles(elements: &[HtmlElement], kind: RingKind) -> Vec<Option<Role>> {
    elements.iter().map(|el| read_role(el, kind)).collect()
}

fn read_role(element: &Element, kind: RingKind) -> Option<Role> {
    let classes = element.class_list();
    Role::ALL
        .into_iter()
        .find(|role| classes.contains(&role.class_name(kind)))
}

/// Handles to every element the carousel touches
pub struct Page {
    nav: [Element; 2],
    cards: Vec<HtmlElement>,
    backgrounds: Vec<HtmlElement>,
    infos: Vec<HtmlElement>,
    texts: Vec<Vec<Element>>,
    loader: Option<Element>,
    overlay: Option<Element>,
    images: Vec<Element>,
}

impl Page {
    /// Look up all carousel elements. Nav buttons are required; the loader
    /// and overlay are optional.
    pub fn query(document: &Document) -> Result<Self> {
        let nav = [query_one(document, PREV_BUTTON)?, query_one(document, NEXT_BUTTON)?];
        let select = |selector: &'static str| {
            document
                .query_selector_all(selector)
                .map(html_elements)
                .unwrap_or_default()
        };
        let cards = select(CARDS);
        let backgrounds = select(BACKGROUNDS);
        let infos = select(INFOS);
        let texts = infos
            .iter()
            .map(|info| info.query_selector_all(TEXT).map(elements).unwrap_or_default())
            .collect();

        log::info!(
            "Found {} cards, {} backgrounds, {} info panels",
            cards.len(),
            backgrounds.len(),
            infos.len()
        );

        Ok(Self {
            nav,
            cards,
            backgrounds,
            infos,
            texts,
            loader: query_one(document, LOADER_BAR).ok(),
            overlay: query_one(document, LOADING_OVERLAY).ok(),
            images: query_all(document, IMAGES),
        })
    }

    /// Seed the rings from the role classes in the markup
    pub fn read_state(&self) -> Result<CarouselState> {
        CarouselState::from_markup(
            ring_roles(&self.cards, RingKind::Card),
            ring_roles(&self.backgrounds, RingKind::Background),
            ring_roles(&self.infos, RingKind::Info),
            self.texts.iter().map(Vec::len).collect(),
        )
    }

    pub fn nav(&self) -> &[Element; 2] {
        &self.nav
    }

    pub fn images(&self) -> &[Element] {
        &self.images
    }

    pub fn card(&self, index: usize) -> Option<&HtmlElement> {
        self.cards.get(index)
    }

    pub fn card_bounds(&self, index: usize) -> Option<Bounds> {
        let rect = self.cards.get(index)?.get_bounding_client_rect();
        Some(Bounds::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        ))
    }

    /// Render role classes and z-order for all three rings
    pub fn project(&self, state: &CarouselState) -> Result<()> {
        project_ring(&self.cards, &state.cards)?;
        project_ring(&self.backgrounds, &state.backgrounds)?;
        project_ring(&self.infos, &state.infos)
    }

    /// False only for the optional loader bar and overlay when the page
    /// has none
    pub fn has(&self, target: Target) -> bool {
        match target {
            Target::LoaderBar => self.loader.is_some(),
            Target::LoadingOverlay => self.overlay.is_some(),
            _ => true,
        }
    }

    /// Elements a tween target refers to
    pub fn resolve(&self, target: Target) -> Result<JsValue> {
        match target {
            Target::NavControls => Ok(array(&self.nav)),
            Target::AllCards => Ok(array(&self.cards)),
            Target::Card(i) => one(self.cards.get(i), CARDS),
            Target::InfoPanel(i) => one(self.infos.get(i), INFOS),
            Target::InfoText(i) => self
                .texts
                .get(i)
                .map(|texts| array(texts))
                .ok_or(CarouselError::MissingElement(TEXT)),
            Target::LoaderBar => one(self.loader.as_ref(), LOADER_BAR),
            Target::LoadingOverlay => one(self.overlay.as_ref(), LOADING_OVERLAY),
        }
    }
}

fn project_ring(elements: &[HtmlElement], ring: &Ring) -> Result<()> {
    let kind = ring.kind();
    for (element, slot) in elements.iter().zip(ring.slots()) {
        let classes = element.class_list();
        for role in Role::ALL {
            classes
                .remove_1(&role.class_name(kind))
                .map_err(|e| CarouselError::Script(format!("{:?}", e)))?;
        }
        if let Some(role) = slot.role {
            classes
                .add_1(&role.class_name(kind))
                .map_err(|e| CarouselError::Script(format!("{:?}", e)))?;
        }
        if let Some(z) = slot.z_order {
            element
                .style()
                .set_property("z-index", &z.to_string())
                .map_err(|e| CarouselError::Script(format!("{:?}", e)))?;
        }
    }
    Ok(())
}
