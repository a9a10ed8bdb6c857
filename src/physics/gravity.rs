//! Gravity stage: page tiles bolted to the rigid-body world
//!
//! The stage owns the world, the walls around the viewport and the registry
//! of tiles. The platform layer feeds it element boxes, pointer positions
//! and frame times; it hands back a pure transform per tile which a
//! `RenderTarget` writes to wherever the tiles live.

use std::collections::BTreeMap;

use glam::Vec2;

use super::body::{BodyId, BodyOptions};
use super::world::World;
use crate::consts::{MAX_SUBSTEPS, PHYSICS_DT};
use crate::settings::{PhysicsTuning, Settings};
use crate::store::{Store, SubscriptionId};

/// Caller-chosen key for a page element
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub String);

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Rendered bounding box, viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ElementRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Collapsed or unrendered elements have nothing to simulate
    pub fn is_measurable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.left.is_finite() && self.top.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The four static walls
#[derive(Debug, Clone)]
pub struct Enclosure {
    top: BodyId,
    bottom: BodyId,
    right: BodyId,
    left: BodyId,
    thickness: f32,
}

impl Enclosure {
    pub fn build(world: &mut World, viewport: Viewport, thickness: f32) -> Self {
        let (w, h, t) = (viewport.width, viewport.height, thickness);
        let wall = BodyOptions::fixed();
        Self {
            // Raised well above the top edge so tiles can be flung off-screen and fall back
            top: world.add_rectangle(Vec2::new(w / 2.0, -2.0 * t), Vec2::new(2.0 * w, t), &wall),
            bottom: world.add_rectangle(
                Self::bottom_center(viewport, t),
                Vec2::new(2.0 * w, t),
                &wall,
            ),
            right: world.add_rectangle(
                Self::right_center(viewport, t),
                Vec2::new(t, 2.0 * h),
                &wall,
            ),
            left: world.add_rectangle(Vec2::new(-t / 2.0, h / 2.0), Vec2::new(t, 2.0 * h), &wall),
            thickness,
        }
    }

    fn bottom_center(viewport: Viewport, t: f32) -> Vec2 {
        Vec2::new(viewport.width / 2.0, viewport.height + t / 2.0)
    }

    fn right_center(viewport: Viewport, t: f32) -> Vec2 {
        Vec2::new(viewport.width + t / 2.0, viewport.height / 2.0)
    }

    /// Move the bottom and right walls to the new viewport edges
    pub fn resize(&self, world: &mut World, viewport: Viewport) {
        world.set_position(self.bottom, Self::bottom_center(viewport, self.thickness));
        world.set_position(self.right, Self::right_center(viewport, self.thickness));
    }

    pub fn walls(&self) -> [BodyId; 4] {
        [self.top, self.bottom, self.right, self.left]
    }
}

/// Where a tile was frozen when it joined the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutPin {
    pub top: f32,
    pub left: f32,
    pub width: f32,
}

impl From<ElementRect> for LayoutPin {
    fn from(rect: ElementRect) -> Self {
        Self {
            top: rect.top,
            left: rect.left,
            width: rect.width,
        }
    }
}

/// Offset of a tile from its pinned origin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementTransform {
    pub translate: Vec2,
    /// Radians, clockwise on screen
    pub rotate: f32,
}

impl ElementTransform {
    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) rotate({}rad)",
            self.translate.x, self.translate.y, self.rotate
        )
    }
}

/// Anything that can host pinned, transformed tiles
pub trait RenderTarget {
    /// Freeze the element's layout at `pin`
    fn pin(&mut self, id: &ElementId, pin: &LayoutPin);

    fn apply_transform(&mut self, id: &ElementId, transform: &ElementTransform);
}

#[derive(Debug, Clone)]
struct Registration {
    body: BodyId,
    origin: Vec2,
    size: Vec2,
}

pub struct GravityStage {
    world: World,
    tuning: PhysicsTuning,
    reduced_motion: bool,
    enclosure: Option<Enclosure>,
    registry: BTreeMap<ElementId, Registration>,
    gravity_enabled: Store<bool>,
    running: bool,
    accumulator: f32,
}

impl GravityStage {
    pub fn new(settings: &Settings) -> Self {
        let tuning = settings.physics;
        let enabled = settings.effective_gravity_on_start();
        let mut world = World::new(Vec2::ZERO, tuning.pointer_stiffness);
        if enabled {
            world.gravity = Vec2::new(0.0, tuning.gravity);
        }
        Self {
            world,
            tuning,
            reduced_motion: settings.reduced_motion,
            enclosure: None,
            registry: BTreeMap::new(),
            gravity_enabled: Store::new(enabled),
            running: false,
            accumulator: 0.0,
        }
    }

    /// Build the walls and start stepping
    pub fn init(&mut self, viewport: Viewport) {
        if self.enclosure.is_some() {
            return;
        }
        self.enclosure = Some(Enclosure::build(
            &mut self.world,
            viewport,
            self.tuning.wall_thickness,
        ));
        self.running = true;
        log::info!(
            "Gravity stage ready ({}x{})",
            viewport.width,
            viewport.height
        );
    }

    pub fn is_ready(&self) -> bool {
        self.running && self.enclosure.is_some()
    }

    pub fn gravity_enabled(&self) -> bool {
        self.gravity_enabled.get()
    }

    pub fn subscribe_gravity(&self, listener: impl FnMut(&bool) + 'static) -> SubscriptionId {
        self.gravity_enabled.subscribe(listener)
    }

    pub fn unsubscribe_gravity(&self, id: SubscriptionId) -> bool {
        self.gravity_enabled.unsubscribe(id)
    }

    pub fn toggle_gravity(&mut self) -> bool {
        let enable = !self.gravity_enabled.get();
        if enable && self.reduced_motion {
            log::debug!("Gravity toggle ignored: reduced motion");
            return false;
        }
        self.world.gravity = if enable {
            Vec2::new(0.0, self.tuning.gravity)
        } else {
            Vec2::ZERO
        };
        self.gravity_enabled.set(enable);
        log::info!("Gravity {}", if enable { "on" } else { "off" });
        enable
    }

    /// Give an element a body. Registering an id twice returns the first body.
    pub fn register_element(
        &mut self,
        id: ElementId,
        rect: ElementRect,
        options: Option<BodyOptions>,
    ) -> Option<BodyId> {
        if let Some(existing) = self.registry.get(&id) {
            return Some(existing.body);
        }
        if !self.is_ready() {
            log::debug!("Skipping {:?}: stage not ready", id.0);
            return None;
        }
        if !rect.is_measurable() {
            log::debug!("Skipping {:?}: no box", id.0);
            return None;
        }

        let options = options.unwrap_or(self.tuning.body);
        let body = self
            .world
            .add_rectangle(rect.center(), rect.size(), &options);
        self.registry.insert(
            id,
            Registration {
                body,
                origin: Vec2::new(rect.left, rect.top),
                size: rect.size(),
            },
        );
        Some(body)
    }

    pub fn is_registered(&self, id: &ElementId) -> bool {
        self.registry.contains_key(id)
    }

    pub fn registered(&self) -> usize {
        self.registry.len()
    }

    /// Run as many fixed steps as `dt_secs` covers; returns the step count
    pub fn frame(&mut self, dt_secs: f32) -> u32 {
        if !self.running {
            return 0;
        }
        // Clamp long pauses (background tabs) to avoid a burst of steps
        self.accumulator += dt_secs.clamp(0.0, 0.1);

        let mut steps = 0;
        while self.accumulator >= PHYSICS_DT && steps < MAX_SUBSTEPS {
            self.world.step(PHYSICS_DT);
            self.accumulator -= PHYSICS_DT;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(PHYSICS_DT);
        }
        steps
    }

    pub fn transform(&self, id: &ElementId) -> Option<ElementTransform> {
        let reg = self.registry.get(id)?;
        let body = self.world.body(reg.body)?;
        Some(ElementTransform {
            translate: body.pos - reg.size / 2.0 - reg.origin,
            rotate: body.angle,
        })
    }

    pub fn transforms(&self) -> Vec<(ElementId, ElementTransform)> {
        self.registry
            .keys()
            .filter_map(|id| Some((id.clone(), self.transform(id)?)))
            .collect()
    }

    /// Write every tile's transform to `target`
    pub fn render(&self, target: &mut impl RenderTarget) {
        for (id, transform) in self.transforms() {
            target.apply_transform(&id, &transform);
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if let Some(enclosure) = &self.enclosure {
            enclosure.resize(&mut self.world, viewport);
        }
    }

    pub fn pointer_down(&mut self, pos: Vec2) -> Option<BodyId> {
        if !self.running {
            return None;
        }
        self.world.pointer_down(pos)
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        self.world.pointer_move(pos);
    }

    pub fn pointer_up(&mut self) {
        self.world.pointer_up();
    }

    /// Stop stepping; the stage accepts no new tiles afterwards
    pub fn teardown(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.accumulator = 0.0;
        self.world.pointer_up();
        log::info!("Gravity stage stopped");
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn enclosure(&self) -> Option<&Enclosure> {
        self.enclosure.as_ref()
    }
}

/// Wrapper around one page tile
///
/// Call `sync` every frame; the tile joins the world the first time gravity
/// is on, the stage is ready and the element has a box.
#[derive(Debug, Clone)]
pub struct PhysicsTile {
    pub id: ElementId,
    pub options: Option<BodyOptions>,
    pinned: bool,
}

impl PhysicsTile {
    pub fn new(id: impl Into<ElementId>, options: Option<BodyOptions>) -> Self {
        Self {
            id: id.into(),
            options,
            pinned: false,
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn sync(
        &mut self,
        stage: &mut GravityStage,
        rect: Option<ElementRect>,
        target: &mut impl RenderTarget,
    ) -> bool {
        if self.pinned {
            return true;
        }
        // Registered directly, so its element is already pinned
        if stage.is_registered(&self.id) {
            self.pinned = true;
            return true;
        }
        if !stage.gravity_enabled() {
            return false;
        }
        let Some(rect) = rect else {
            return false;
        };
        if stage
            .register_element(self.id.clone(), rect, self.options)
            .is_none()
        {
            return false;
        }
        target.pin(&self.id, &LayoutPin::from(rect));
        self.pinned = true;
        true
    }
}
