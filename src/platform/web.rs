//! Browser bindings
//!
//! Exported to JavaScript:
//! - `mount_game(id, element)` paints one arcade game into `element`
//! - `mount_gravity()` starts the gravity stage over the viewport
//! - `mount_theme()` exposes the light/dark toggle

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use glam::Vec2;
use gloo_events::{EventListener, EventListenerOptions};
use gloo_render::{AnimationFrame, request_animation_frame};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlTextAreaElement, KeyboardEvent, PointerEvent,
    Window,
};

use crate::arcade::{Arcade, Frame, GameInput, GameKind};
use crate::physics::{
    BodyOptions, ElementId, ElementRect, ElementTransform, GravityStage, LayoutPin, PhysicsTile,
    RenderTarget, Viewport,
};
use crate::settings::Settings;
use crate::theme::{ThemeMode, ThemeProvider};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        return;
    }
    log::info!("Folio arcade loaded");
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn viewport(window: &Window) -> Viewport {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    Viewport::new(dim(window.inner_width()), dim(window.inner_height()))
}

fn rect_of(element: &Element) -> ElementRect {
    let r = element.get_bounding_client_rect();
    ElementRect::new(
        r.left() as f32,
        r.top() as f32,
        r.width() as f32,
        r.height() as f32,
    )
}

fn seed() -> u64 {
    js_sys::Date::now() as u64
}

/// State driven by `requestAnimationFrame` while its frame slot is filled
trait Animated: 'static {
    fn frame_slot(&mut self) -> &mut Option<AnimationFrame>;
    fn on_frame(&mut self, time: f64);
}

/// Queue the next frame. Emptying the slot cancels the loop.
fn schedule_frame<T: Animated>(state: &Rc<RefCell<T>>) {
    let next = Rc::clone(state);
    let handle = request_animation_frame(move |time| {
        {
            let mut s = next.borrow_mut();
            if s.frame_slot().take().is_none() {
                return;
            }
            s.on_frame(time);
        }
        schedule_frame(&next);
    });
    *state.borrow_mut().frame_slot() = Some(handle);
}

/// Frame timestamps to whole milliseconds, carrying the remainder
#[derive(Default)]
struct Clock {
    last: Option<f64>,
    carry: f64,
}

impl Clock {
    fn tick(&mut self, time: f64) -> u64 {
        let dt = self.last.map_or(0.0, |last| (time - last).max(0.0));
        self.last = Some(time);
        self.carry += dt;
        let whole = self.carry.floor();
        self.carry -= whole;
        whole as u64
    }
}

// === Games ===

struct GameView {
    title: Element,
    status: Element,
    prompt: Element,
    grid: HtmlElement,
    text: HtmlTextAreaElement,
    actions: Element,
}

impl GameView {
    fn build(root: &HtmlElement) -> Result<Self, JsValue> {
        let doc = document()?;
        root.set_inner_html("");
        root.class_list().add_1("game")?;

        let make = |tag: &str, class: &str| -> Result<Element, JsValue> {
            let el = doc.create_element(tag)?;
            el.set_class_name(class);
            root.append_child(&el)?;
            Ok(el)
        };
        let title = make("h3", "game__title")?;
        let status = make("p", "game__status")?;
        let prompt = make("p", "game__prompt")?;
        let grid: HtmlElement = make("div", "game__grid")?.dyn_into()?;
        let text: HtmlTextAreaElement = make("textarea", "game__input")?.dyn_into()?;
        text.set_placeholder("Start typing here...");
        let actions = make("div", "game__actions")?;

        Ok(Self {
            title,
            status,
            prompt,
            grid,
            text,
            actions,
        })
    }

    fn paint(&self, frame: &Frame, previous: Option<&Frame>) -> Result<(), JsValue> {
        let doc = document()?;
        self.title.set_text_content(Some(frame.title));
        self.status.set_text_content(Some(&frame.status));
        self.prompt
            .set_text_content(Some(frame.prompt.as_deref().unwrap_or("")));

        if previous.map(|p| &p.cells) != Some(&frame.cells) {
            self.grid.set_inner_html("");
            self.grid.style().set_property(
                "grid-template-columns",
                &format!("repeat({}, 1fr)", frame.columns.max(1)),
            )?;
            for (i, cell) in frame.cells.iter().enumerate() {
                let el = doc.create_element("button")?;
                el.set_class_name(&format!("cell cell--{}", cell.class));
                el.set_attribute("data-cell", &i.to_string())?;
                el.set_text_content(Some(&cell.label));
                self.grid.append_child(&el)?;
            }
        }

        let was_entry = previous.is_some_and(|p| p.text_entry);
        if frame.text_entry && !was_entry {
            self.text.set_value("");
        }
        self.text
            .style()
            .set_property("display", if frame.text_entry { "block" } else { "none" })?;

        if previous.map(|p| &p.actions) != Some(&frame.actions) {
            self.actions.set_inner_html("");
            for (i, action) in frame.actions.iter().enumerate() {
                let el = doc.create_element("button")?;
                el.set_class_name("game__action");
                el.set_attribute("data-action", &i.to_string())?;
                el.set_text_content(Some(action.label));
                self.actions.append_child(&el)?;
            }
        }
        Ok(())
    }
}

struct MountState {
    arcade: Arcade,
    view: GameView,
    painted: Option<Frame>,
    clock: Clock,
    frame: Option<AnimationFrame>,
}

impl Animated for MountState {
    fn frame_slot(&mut self) -> &mut Option<AnimationFrame> {
        &mut self.frame
    }

    fn on_frame(&mut self, time: f64) {
        let dt = self.clock.tick(time);
        let animating = self.arcade.is_animating();
        self.arcade.advance(dt);
        if animating {
            self.repaint();
        }
    }
}

impl MountState {
    fn repaint(&mut self) {
        let Some(frame) = self.arcade.frame() else {
            return;
        };
        if self.painted.as_ref() == Some(&frame) {
            return;
        }
        if let Err(e) = self.view.paint(&frame, self.painted.as_ref()) {
            log::warn!("Failed to paint game: {e:?}");
        }
        self.painted = Some(frame);
    }

    fn input(&mut self, input: GameInput) {
        if self.arcade.handle(input) {
            self.repaint();
        }
    }

    /// Page hidden or unfocused
    fn suspend(&mut self) {
        if self.arcade.suspend() {
            self.repaint();
        }
    }

    /// Resolve a click inside the game root to an input
    fn click_target(&self, target: &Element) -> Option<GameInput> {
        if let Ok(Some(cell)) = target.closest("[data-cell]") {
            let index = cell.get_attribute("data-cell")?.parse().ok()?;
            return Some(GameInput::Cell(index));
        }
        let action = target.closest("[data-action]").ok()??;
        let index: usize = action.get_attribute("data-action")?.parse().ok()?;
        self.painted.as_ref()?.actions.get(index).map(|a| a.input.clone())
    }
}

/// A game painted into a host element
#[wasm_bindgen]
pub struct GameMount {
    state: Rc<RefCell<MountState>>,
    listeners: Vec<EventListener>,
}

#[wasm_bindgen]
impl GameMount {
    pub fn unmount(&mut self) {
        self.listeners.clear();
        let mut state = self.state.borrow_mut();
        state.frame = None;
        state.arcade.close();
        state.painted = None;
    }
}

/// Mount the game with catalog id `id` into `element`
#[wasm_bindgen]
pub fn mount_game(id: &str, element: HtmlElement) -> Result<GameMount, JsValue> {
    let kind =
        GameKind::from_id(id).ok_or_else(|| JsValue::from_str(&format!("unknown game: {id}")))?;
    let view = GameView::build(&element)?;

    let mut arcade = Arcade::new();
    arcade.launch(kind, seed());
    let state = Rc::new(RefCell::new(MountState {
        arcade,
        view,
        painted: None,
        clock: Clock::default(),
        frame: None,
    }));
    state.borrow_mut().repaint();

    let window = window()?;
    let doc = document()?;
    let mut listeners = Vec::new();
    {
        let state = state.clone();
        listeners.push(EventListener::new(&element, "click", move |event: &Event| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let mut s = state.borrow_mut();
            if let Some(input) = s.click_target(&target) {
                s.input(input);
            }
        }));
    }
    {
        let state = state.clone();
        listeners.push(EventListener::new_with_options(
            &window,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let key = event.key();
                let mut s = state.borrow_mut();
                let captured = s.arcade.game().is_some_and(|g| g.captures_key(&key));
                if captured {
                    event.prevent_default();
                    s.input(GameInput::Key(key));
                }
            },
        ));
    }
    {
        let state = state.clone();
        let field = state.borrow().view.text.clone();
        let text = field.clone();
        listeners.push(EventListener::new(&field, "input", move |_event: &Event| {
            state.borrow_mut().input(GameInput::Text(text.value()));
        }));
    }
    {
        let state = state.clone();
        let page = doc.clone();
        listeners.push(EventListener::new(&doc, "visibilitychange", move |_event: &Event| {
            if page.hidden() {
                state.borrow_mut().suspend();
            }
        }));
    }
    {
        let state = state.clone();
        listeners.push(EventListener::new(&window, "blur", move |_event: &Event| {
            state.borrow_mut().suspend();
        }));
    }

    schedule_frame(&state);

    log::info!("Mounted {}", kind.as_str());
    Ok(GameMount { state, listeners })
}

// === Gravity ===

/// Writes pins and transforms to the tracked DOM elements
struct DomTarget<'a> {
    elements: &'a BTreeMap<ElementId, HtmlElement>,
}

impl RenderTarget for DomTarget<'_> {
    fn pin(&mut self, id: &ElementId, pin: &LayoutPin) {
        let Some(el) = self.elements.get(id) else {
            return;
        };
        let style = el.style();
        let result = [
            ("top", format!("{}px", pin.top)),
            ("left", format!("{}px", pin.left)),
            ("position", "fixed".to_string()),
            ("margin", "0".to_string()),
            ("width", format!("{}px", pin.width)),
            ("will-change", "transform".to_string()),
            ("z-index", "100".to_string()),
        ]
        .iter()
        .try_for_each(|(name, value)| style.set_property(name, value));
        if let Err(e) = result {
            log::warn!("Failed to pin {:?}: {e:?}", id.0);
        }
    }

    fn apply_transform(&mut self, id: &ElementId, transform: &ElementTransform) {
        if let Some(el) = self.elements.get(id) {
            if let Err(e) = el.style().set_property("transform", &transform.to_css()) {
                log::warn!("Failed to move {:?}: {e:?}", id.0);
            }
        }
    }
}

struct GravityState {
    stage: GravityStage,
    tiles: Vec<PhysicsTile>,
    elements: BTreeMap<ElementId, HtmlElement>,
    clock: Clock,
    frame: Option<AnimationFrame>,
}

impl Animated for GravityState {
    fn frame_slot(&mut self) -> &mut Option<AnimationFrame> {
        &mut self.frame
    }

    fn on_frame(&mut self, time: f64) {
        let GravityState {
            stage,
            tiles,
            elements,
            clock,
            ..
        } = self;
        let dt_ms = clock.tick(time);

        let mut target = DomTarget { elements };
        // Tiles that could not join yet try again every frame
        for tile in tiles.iter_mut().filter(|t| !t.is_pinned()) {
            let rect = target.elements.get(&tile.id).map(|el| rect_of(el));
            tile.sync(stage, rect, &mut target);
        }

        if stage.frame(dt_ms as f32 / 1000.0) > 0 {
            stage.render(&mut target);
        }
    }
}

/// JavaScript handle to the gravity stage
#[wasm_bindgen]
pub struct GravityHandle {
    state: Rc<RefCell<GravityState>>,
    listeners: Vec<EventListener>,
}

fn parse_options(json: Option<String>) -> Option<BodyOptions> {
    let json = json?;
    match serde_json::from_str(&json) {
        Ok(options) => Some(options),
        Err(e) => {
            log::warn!("Ignoring body options {json:?}: {e}");
            None
        }
    }
}

#[wasm_bindgen]
impl GravityHandle {
    pub fn is_ready(&self) -> bool {
        self.state.borrow().stage.is_ready()
    }

    pub fn gravity_enabled(&self) -> bool {
        self.state.borrow().stage.gravity_enabled()
    }

    pub fn toggle_gravity(&self) -> bool {
        self.state.borrow_mut().stage.toggle_gravity()
    }

    /// Wrap a tile: it joins the world the first frame gravity is on
    ///
    /// `options` is optional JSON for `BodyOptions`.
    pub fn track_element(&self, id: String, element: HtmlElement, options: Option<String>) {
        let mut state = self.state.borrow_mut();
        let id = ElementId(id);
        if state.elements.contains_key(&id) {
            return;
        }
        state.elements.insert(id.clone(), element);
        state
            .tiles
            .push(PhysicsTile::new(id, parse_options(options)));
    }

    /// Give `element` a body now. Returns the body id, or nothing when the
    /// stage is not ready or the element has no box.
    pub fn register_element(
        &self,
        id: String,
        element: HtmlElement,
        options: Option<String>,
    ) -> Option<u32> {
        let mut guard = self.state.borrow_mut();
        let GravityState {
            stage, elements, ..
        } = &mut *guard;
        let id = ElementId(id);
        let rect = rect_of(&element);
        let fresh = !stage.is_registered(&id);
        let body = stage.register_element(id.clone(), rect, parse_options(options))?;
        if fresh {
            elements.insert(id.clone(), element);
            DomTarget { elements }.pin(&id, &LayoutPin::from(rect));
        }
        Some(body.0)
    }

    pub fn teardown(&mut self) {
        self.listeners.clear();
        let mut state = self.state.borrow_mut();
        state.frame = None;
        state.stage.teardown();
    }
}

/// Start the gravity stage over the current viewport
#[wasm_bindgen]
pub fn mount_gravity() -> Result<GravityHandle, JsValue> {
    let window = window()?;
    let settings = Settings::load();
    let mut stage = GravityStage::new(&settings);
    stage.init(viewport(&window));

    let state = Rc::new(RefCell::new(GravityState {
        stage,
        tiles: Vec::new(),
        elements: BTreeMap::new(),
        clock: Clock::default(),
        frame: None,
    }));

    let mut listeners = Vec::new();
    {
        let state = state.clone();
        let win = window.clone();
        listeners.push(EventListener::new(&window, "resize", move |_event: &Event| {
            state.borrow_mut().stage.resize(viewport(&win));
        }));
    }
    {
        let state = state.clone();
        listeners.push(EventListener::new_with_options(
            &window,
            "pointerdown",
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                let pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                let mut s = state.borrow_mut();
                if s.stage.gravity_enabled() && s.stage.pointer_down(pos).is_some() {
                    event.prevent_default();
                }
            },
        ));
    }
    {
        let state = state.clone();
        listeners.push(EventListener::new(&window, "pointermove", move |event: &Event| {
            if let Some(event) = event.dyn_ref::<PointerEvent>() {
                let pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                state.borrow_mut().stage.pointer_move(pos);
            }
        }));
    }
    {
        let state = state.clone();
        listeners.push(EventListener::new(&window, "pointerup", move |_event: &Event| {
            state.borrow_mut().stage.pointer_up();
        }));
    }

    schedule_frame(&state);

    Ok(GravityHandle { state, listeners })
}

// === Theme ===

fn apply_palette(mode: ThemeMode) {
    let Ok(doc) = document() else {
        return;
    };
    let Some(root) = doc
        .document_element()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    let palette = mode.palette();
    let style = root.style();
    let result = [
        ("--color-background", palette.background),
        ("--color-paper", palette.paper),
        ("--color-text", palette.text_primary),
    ]
    .iter()
    .try_for_each(|(name, value)| style.set_property(name, value))
    .and_then(|_| root.set_attribute("data-theme", mode.as_str()));
    if let Err(e) = result {
        log::warn!("Failed to apply theme: {e:?}");
    }
}

/// JavaScript handle to the theme provider
#[wasm_bindgen]
pub struct ThemeHandle {
    provider: ThemeProvider,
}

#[wasm_bindgen]
impl ThemeHandle {
    pub fn mode(&self) -> String {
        self.provider.mode().as_str().to_string()
    }

    pub fn toggle(&self) -> String {
        self.provider.toggle().as_str().to_string()
    }
}

/// Apply the saved theme and keep the page in sync with toggles
#[wasm_bindgen]
pub fn mount_theme() -> ThemeHandle {
    let settings = Settings::load();
    let provider = ThemeProvider::new(settings.theme);
    apply_palette(provider.mode());
    provider.subscribe(move |mode| {
        apply_palette(*mode);
        let mut saved = Settings::load();
        saved.theme = *mode;
        saved.save();
    });
    ThemeHandle { provider }
}
