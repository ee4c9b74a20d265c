mod camera;
mod input;
mod loop_runner;
mod metrics;
mod picking;
mod rendering;
mod scene;

pub use camera::{
    screen_ray, world_to_screen, Camera3D, Viewport, DEFAULT_NEAR_PLANE,
    DEFAULT_VERTICAL_FOV_RADIANS,
};
pub use glam::{Vec2, Vec3};
pub use input::{InputAction, PointerButton, PointerEvent};
pub use loop_runner::{run_app, run_app_with_metrics, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
pub use picking::{Aabb, Ray};
pub use rendering::Renderer;
pub use scene::{
    CursorAffordance, Entity, EntityId, HudData, HudLine, HudTone, InputSnapshot, PickHit,
    Primitive, PrimitiveId, PrimitivePose, Scene, SceneCommand, SceneKey, SceneVisualState,
    SceneWorld,
};
