use std::collections::HashMap;

use glam::{Vec2, Vec3};

use super::camera::{screen_ray, Camera3D, Viewport};
use super::input::{ActionStates, InputAction, PointerEvent};
use super::picking::{Aabb, Ray};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKey {
    Room,
    Victory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    SwitchTo(SceneKey),
    Quit,
}

/// Mouse cursor shape requested by the active scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorAffordance {
    #[default]
    Default,
    Grab,
    Pointer,
    Grabbing,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    actions: ActionStates,
    cursor_position_px: Option<Vec2>,
    pointer_events: Vec<PointerEvent>,
    typed_text: String,
    backspace_presses: u32,
    submit_pressed: bool,
    cancel_pressed: bool,
    dump_state_pressed: bool,
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        actions: ActionStates,
        cursor_position_px: Option<Vec2>,
        pointer_events: Vec<PointerEvent>,
        typed_text: String,
        backspace_presses: u32,
        submit_pressed: bool,
        cancel_pressed: bool,
        dump_state_pressed: bool,
        window_size: (u32, u32),
    ) -> Self {
        Self {
            actions,
            cursor_position_px,
            pointer_events,
            typed_text,
            backspace_presses,
            submit_pressed,
            cancel_pressed,
            dump_state_pressed,
            window_width: window_size.0,
            window_height: window_size.1,
        }
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_cursor_position_px(mut self, cursor_position_px: Option<Vec2>) -> Self {
        self.cursor_position_px = cursor_position_px;
        self
    }

    pub fn with_pointer_event(mut self, event: PointerEvent) -> Self {
        self.pointer_events.push(event);
        self
    }

    pub fn with_typed_text(mut self, text: &str) -> Self {
        self.typed_text.push_str(text);
        self
    }

    pub fn with_backspace_presses(mut self, presses: u32) -> Self {
        self.backspace_presses = presses;
        self
    }

    pub fn with_submit_pressed(mut self, submit_pressed: bool) -> Self {
        self.submit_pressed = submit_pressed;
        self
    }

    pub fn with_cancel_pressed(mut self, cancel_pressed: bool) -> Self {
        self.cancel_pressed = cancel_pressed;
        self
    }

    pub fn with_dump_state_pressed(mut self, dump_state_pressed: bool) -> Self {
        self.dump_state_pressed = dump_state_pressed;
        self
    }

    pub fn with_window_size(mut self, window_size: (u32, u32)) -> Self {
        self.window_width = window_size.0;
        self.window_height = window_size.1;
        self
    }

    pub fn cursor_position_px(&self) -> Option<Vec2> {
        self.cursor_position_px
    }

    /// Button edges in the order they arrived during the frame.
    pub fn pointer_events(&self) -> &[PointerEvent] {
        &self.pointer_events
    }

    pub fn typed_text(&self) -> &str {
        &self.typed_text
    }

    pub fn backspace_presses(&self) -> u32 {
        self.backspace_presses
    }

    pub fn submit_pressed(&self) -> bool {
        self.submit_pressed
    }

    pub fn cancel_pressed(&self) -> bool {
        self.cancel_pressed
    }

    pub fn dump_state_pressed(&self) -> bool {
        self.dump_state_pressed
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.window_width,
            height: self.window_height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitivePose {
    pub offset: Vec3,
    pub scale: Vec3,
    pub brightness: f32,
}

impl Default for PrimitivePose {
    fn default() -> Self {
        Self {
            offset: Vec3::ZERO,
            scale: Vec3::ONE,
            brightness: 1.0,
        }
    }
}

/// Axis-aligned box drawn by the renderer. Owned primitives are the hit
/// regions of an entity; unowned ones are scenery and are never picked.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub id: PrimitiveId,
    pub owner: Option<EntityId>,
    pub base_bounds: Aabb,
    pub pose: PrimitivePose,
    pub color: [u8; 4],
}

impl Primitive {
    pub fn world_bounds(&self) -> Aabb {
        self.base_bounds
            .scaled_about_center(self.pose.scale)
            .translated(self.pose.offset)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: EntityId,
    pub debug_name: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub entity: EntityId,
    pub primitive: PrimitiveId,
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneVisualState {
    pub hovered_entity: Option<EntityId>,
}

#[derive(Debug, Default)]
struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    fn allocate_primitive(&mut self) -> PrimitiveId {
        let id = PrimitiveId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

pub const DEFAULT_CLEAR_COLOR: [u8; 4] = [10, 10, 10, 255];

#[derive(Debug)]
pub struct SceneWorld {
    allocator: EntityIdAllocator,
    entities: Vec<Entity>,
    primitives: Vec<Primitive>,
    owner_by_primitive: HashMap<PrimitiveId, EntityId>,
    particles: Vec<Vec3>,
    camera: Camera3D,
    clear_color: [u8; 4],
    visual_state: SceneVisualState,
}

impl Default for SceneWorld {
    fn default() -> Self {
        Self {
            allocator: EntityIdAllocator::default(),
            entities: Vec::new(),
            primitives: Vec::new(),
            owner_by_primitive: HashMap::new(),
            particles: Vec::new(),
            camera: Camera3D::default(),
            clear_color: DEFAULT_CLEAR_COLOR,
            visual_state: SceneVisualState::default(),
        }
    }
}

impl SceneWorld {
    pub fn spawn_entity(&mut self, debug_name: &'static str) -> EntityId {
        let id = self.allocator.allocate();
        self.entities.push(Entity {
            id,
            debug_name,
            active: true,
        });
        id
    }

    /// Registers a pickable box for `owner` and records it in the owner index.
    /// Returns `None` if `owner` does not exist.
    pub fn attach_hit_region(
        &mut self,
        owner: EntityId,
        bounds: Aabb,
        color: [u8; 4],
    ) -> Option<PrimitiveId> {
        self.find_entity(owner)?;
        let id = self.allocator.allocate_primitive();
        self.primitives.push(Primitive {
            id,
            owner: Some(owner),
            base_bounds: bounds,
            pose: PrimitivePose::default(),
            color,
        });
        self.owner_by_primitive.insert(id, owner);
        Some(id)
    }

    pub fn spawn_scenery(&mut self, bounds: Aabb, color: [u8; 4]) -> PrimitiveId {
        let id = self.allocator.allocate_primitive();
        self.primitives.push(Primitive {
            id,
            owner: None,
            base_bounds: bounds,
            pose: PrimitivePose::default(),
            color,
        });
        id
    }

    pub fn owner_of(&self, primitive: PrimitiveId) -> Option<EntityId> {
        self.owner_by_primitive.get(&primitive).copied()
    }

    pub fn set_entity_active(&mut self, id: EntityId, active: bool) -> bool {
        match self.find_entity_mut(id) {
            Some(entity) => {
                entity.active = active;
                true
            }
            None => false,
        }
    }

    pub fn is_entity_active(&self, id: EntityId) -> bool {
        self.find_entity(id).is_some_and(|entity| entity.active)
    }

    pub fn set_primitive_pose(&mut self, id: PrimitiveId, pose: PrimitivePose) -> bool {
        match self.primitives.iter_mut().find(|primitive| primitive.id == id) {
            Some(primitive) => {
                primitive.pose = pose;
                true
            }
            None => false,
        }
    }

    pub fn primitive(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.iter().find(|primitive| primitive.id == id)
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Primitives the renderer should draw: scenery plus parts of active entities.
    pub fn visible_primitives(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter().filter(|primitive| match primitive.owner {
            Some(owner) => self.is_entity_active(owner),
            None => true,
        })
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn find_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    fn find_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    /// Nearest hit among the hit regions of active entities. The hit primitive
    /// is folded to its owner through the owner index.
    pub fn pick_nearest(&self, ray: &Ray) -> Option<PickHit> {
        let mut best: Option<PickHit> = None;
        for primitive in &self.primitives {
            let Some(owner) = self.owner_of(primitive.id) else {
                continue;
            };
            if !self.is_entity_active(owner) {
                continue;
            }
            let Some(distance) = primitive.world_bounds().intersect_ray(ray) else {
                continue;
            };
            match best {
                Some(current) if current.distance <= distance => {}
                _ => {
                    best = Some(PickHit {
                        entity: owner,
                        primitive: primitive.id,
                        distance,
                    })
                }
            }
        }
        best
    }

    pub fn pick_at_cursor(&self, cursor_position_px: Vec2, viewport: Viewport) -> Option<PickHit> {
        let ray = screen_ray(&self.camera, viewport, cursor_position_px)?;
        self.pick_nearest(&ray)
    }

    pub fn set_particles(&mut self, particles: &[Vec3]) {
        self.particles.clear();
        self.particles.extend_from_slice(particles);
    }

    pub fn particles(&self) -> &[Vec3] {
        &self.particles
    }

    pub fn camera(&self) -> &Camera3D {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera3D {
        &mut self.camera
    }

    pub fn set_clear_color(&mut self, color: [u8; 4]) {
        self.clear_color = color;
    }

    pub fn clear_color(&self) -> [u8; 4] {
        self.clear_color
    }

    pub fn set_hovered_visual(&mut self, hovered: Option<EntityId>) {
        self.visual_state.hovered_entity = hovered;
    }

    pub fn visual_state(&self) -> &SceneVisualState {
        &self.visual_state
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.primitives.clear();
        self.owner_by_primitive.clear();
        self.particles.clear();
        self.camera = Camera3D::default();
        self.clear_color = DEFAULT_CLEAR_COLOR;
        self.visual_state = SceneVisualState::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudTone {
    Title,
    Body,
    Accent,
    Dim,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudLine {
    pub text: String,
    pub tone: HudTone,
}

impl HudLine {
    pub fn new(text: impl Into<String>, tone: HudTone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Text panels the renderer lays out over the world view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HudData {
    pub top_left: Vec<HudLine>,
    pub top_right: Vec<HudLine>,
    pub progress: Vec<bool>,
    pub banner: Option<String>,
    pub modal: Vec<HudLine>,
}

pub trait Scene {
    fn load(&mut self, world: &mut SceneWorld);
    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand;
    fn unload(&mut self, world: &mut SceneWorld);
    fn cursor_affordance(&self) -> CursorAffordance {
        CursorAffordance::Default
    }
    fn hud(&self, _world: &SceneWorld) -> Option<HudData> {
        None
    }
    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        None
    }
}

struct SceneRuntime {
    scene: Box<dyn Scene>,
    world: SceneWorld,
    is_loaded: bool,
}

impl SceneRuntime {
    fn new(scene: Box<dyn Scene>) -> Self {
        Self {
            scene,
            world: SceneWorld::default(),
            is_loaded: false,
        }
    }

    fn load(&mut self) {
        if self.is_loaded {
            return;
        }
        self.scene.load(&mut self.world);
        self.is_loaded = true;
    }

    fn teardown(&mut self) {
        if !self.is_loaded {
            return;
        }
        self.scene.unload(&mut self.world);
        self.world.clear();
        self.is_loaded = false;
    }
}

/// Owns both scenes. Only the active scene is loaded; switching tears the
/// previous one down first, and dropping the machine tears down whatever is
/// still loaded.
pub(crate) struct SceneMachine {
    room: SceneRuntime,
    victory: SceneRuntime,
    active_scene: SceneKey,
}

impl SceneMachine {
    pub(crate) fn new(
        room: Box<dyn Scene>,
        victory: Box<dyn Scene>,
        active_scene: SceneKey,
    ) -> Self {
        Self {
            room: SceneRuntime::new(room),
            victory: SceneRuntime::new(victory),
            active_scene,
        }
    }

    pub(crate) fn active_scene(&self) -> SceneKey {
        self.active_scene
    }

    pub(crate) fn load_active(&mut self) {
        self.active_runtime_mut().load();
    }

    pub(crate) fn update_active(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
    ) -> SceneCommand {
        let runtime = self.active_runtime_mut();
        if !runtime.is_loaded {
            return SceneCommand::None;
        }
        let (scene, world) = (&mut runtime.scene, &mut runtime.world);
        scene.update(fixed_dt_seconds, input, world)
    }

    pub(crate) fn active_world(&self) -> &SceneWorld {
        &self.active_runtime_ref().world
    }

    pub(crate) fn cursor_affordance_active(&self) -> CursorAffordance {
        self.active_runtime_ref().scene.cursor_affordance()
    }

    pub(crate) fn hud_active(&self) -> Option<HudData> {
        let runtime = self.active_runtime_ref();
        runtime.scene.hud(&runtime.world)
    }

    pub(crate) fn debug_title_active(&self) -> Option<String> {
        let runtime = self.active_runtime_ref();
        runtime.scene.debug_title(&runtime.world)
    }

    pub(crate) fn switch_to(&mut self, next_scene: SceneKey) -> bool {
        if self.active_scene == next_scene {
            return false;
        }
        self.active_runtime_mut().teardown();
        self.active_scene = next_scene;
        self.active_runtime_mut().load();
        true
    }

    pub(crate) fn shutdown_all(&mut self) {
        self.room.teardown();
        self.victory.teardown();
    }

    fn active_runtime_mut(&mut self) -> &mut SceneRuntime {
        match self.active_scene {
            SceneKey::Room => &mut self.room,
            SceneKey::Victory => &mut self.victory,
        }
    }

    fn active_runtime_ref(&self) -> &SceneRuntime {
        match self.active_scene {
            SceneKey::Room => &self.room,
            SceneKey::Victory => &self.victory,
        }
    }
}

impl Drop for SceneMachine {
    fn drop(&mut self) {
        self.shutdown_all();
    }
}
