use glam::{EulerRot, Quat, Vec2, Vec3};

use super::picking::Ray;

pub const DEFAULT_VERTICAL_FOV_RADIANS: f32 = 75.0 * std::f32::consts::PI / 180.0;
pub const DEFAULT_NEAR_PLANE: f32 = 0.1;

/// First-person camera. Rotation order is yaw about +Y, then pitch about the
/// yawed X axis; yaw 0 looks down -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera3D {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub vertical_fov_radians: f32,
    pub near: f32,
}

impl Default for Camera3D {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            vertical_fov_radians: DEFAULT_VERTICAL_FOV_RADIANS,
            near: DEFAULT_NEAR_PLANE,
        }
    }
}

impl Camera3D {
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.orientation() * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.orientation() * Vec3::Y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }
}

/// Ray from the camera through a window pixel (origin top-left).
pub fn screen_ray(camera: &Camera3D, viewport: Viewport, cursor_px: Vec2) -> Option<Ray> {
    if viewport.is_empty() || !cursor_px.is_finite() {
        return None;
    }
    let ndc_x = cursor_px.x / viewport.width as f32 * 2.0 - 1.0;
    let ndc_y = 1.0 - cursor_px.y / viewport.height as f32 * 2.0;
    let tan_half = (camera.vertical_fov_radians * 0.5).tan();
    let direction = camera.forward()
        + camera.right() * (ndc_x * tan_half * viewport.aspect())
        + camera.up() * (ndc_y * tan_half);
    Ray::new(camera.position, direction)
}

/// Projects a world point to window pixels. `None` when the point is behind
/// the near plane.
pub fn world_to_screen(world: Vec3, camera: &Camera3D, viewport: Viewport) -> Option<Vec2> {
    if viewport.is_empty() {
        return None;
    }
    let relative = world - camera.position;
    let depth = relative.dot(camera.forward());
    if depth < camera.near {
        return None;
    }
    let tan_half = (camera.vertical_fov_radians * 0.5).tan();
    let ndc_x = relative.dot(camera.right()) / (depth * tan_half * viewport.aspect());
    let ndc_y = relative.dot(camera.up()) / (depth * tan_half);
    Some(Vec2::new(
        (ndc_x + 1.0) * 0.5 * viewport.width as f32,
        (1.0 - ndc_y) * 0.5 * viewport.height as f32,
    ))
}
