pub mod app;

pub use app::{
    run_app, run_app_with_metrics, screen_ray, world_to_screen, Aabb, AppError, Camera3D,
    CursorAffordance, Entity, EntityId, HudData, HudLine, HudTone, InputAction, InputSnapshot,
    LoopConfig, LoopMetricsSnapshot, MetricsHandle, PickHit, PointerButton, PointerEvent,
    Primitive, PrimitiveId, PrimitivePose, Ray, Renderer, Scene, SceneCommand, SceneKey,
    SceneVisualState, SceneWorld, Vec2, Vec3, Viewport, SLOW_FRAME_ENV_VAR,
};
