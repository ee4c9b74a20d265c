use room_engine::{Camera3D, CursorAffordance, InputAction, Vec2, Vec3};

/// Tuning for the first-person view. Defaults reproduce the shipped room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RoomTuning {
    pub(crate) start_position: Vec3,
    pub(crate) look_sensitivity: f32,
    pub(crate) pitch_limit: f32,
    /// Units per second.
    pub(crate) move_speed: f32,
    pub(crate) position_bound: f32,
    pub(crate) click_slop_px: f32,
}

impl Default for RoomTuning {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(0.0, 1.7, 8.0),
            look_sensitivity: 0.003,
            pitch_limit: std::f32::consts::PI / 2.5,
            move_speed: 7.5,
            position_bound: 9.5,
            click_slop_px: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LookRelease {
    /// The pointer travelled past the click slop while held.
    pub(crate) was_drag: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PointerDrag {
    origin: Vec2,
    last: Vec2,
    travelled: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct MoveKeys {
    forward: bool,
    back: bool,
    left: bool,
    right: bool,
}

/// Player position and orientation. Eye height never changes; x and z stay
/// inside the bound and pitch inside the limit after every operation.
#[derive(Debug, Clone)]
pub(crate) struct ViewpointController {
    tuning: RoomTuning,
    position: Vec3,
    yaw: f32,
    pitch: f32,
    keys: MoveKeys,
    drag: Option<PointerDrag>,
}

impl Default for ViewpointController {
    fn default() -> Self {
        Self::new(RoomTuning::default())
    }
}

impl ViewpointController {
    pub(crate) fn new(tuning: RoomTuning) -> Self {
        Self {
            tuning,
            position: tuning.start_position,
            yaw: 0.0,
            pitch: 0.0,
            keys: MoveKeys::default(),
            drag: None,
        }
    }

    pub(crate) fn position(&self) -> Vec3 {
        self.position
    }

    pub(crate) fn yaw(&self) -> f32 {
        self.yaw
    }

    pub(crate) fn pitch(&self) -> f32 {
        self.pitch
    }

    #[cfg(test)]
    pub(crate) fn tuning(&self) -> &RoomTuning {
        &self.tuning
    }

    pub(crate) fn begin_look(&mut self, x: f32, y: f32) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        let at = Vec2::new(x, y);
        self.drag = Some(PointerDrag {
            origin: at,
            last: at,
            travelled: false,
        });
    }

    pub(crate) fn update_look(&mut self, x: f32, y: f32) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let at = Vec2::new(x, y);
        let delta = at - drag.last;
        drag.last = at;
        if at.distance(drag.origin) > self.tuning.click_slop_px {
            drag.travelled = true;
        }

        self.yaw -= delta.x * self.tuning.look_sensitivity;
        self.pitch = (self.pitch - delta.y * self.tuning.look_sensitivity)
            .clamp(-self.tuning.pitch_limit, self.tuning.pitch_limit);
    }

    pub(crate) fn end_look(&mut self) -> LookRelease {
        let was_drag = self.drag.take().is_some_and(|drag| drag.travelled);
        LookRelease { was_drag }
    }

    pub(crate) fn is_pointer_held(&self) -> bool {
        self.drag.is_some()
    }

    pub(crate) fn is_dragging(&self) -> bool {
        self.drag.is_some_and(|drag| drag.travelled)
    }

    pub(crate) fn set_key_state(&mut self, action: InputAction, down: bool) {
        let slot = match action {
            InputAction::MoveForward => &mut self.keys.forward,
            InputAction::MoveBack => &mut self.keys.back,
            InputAction::MoveLeft => &mut self.keys.left,
            InputAction::MoveRight => &mut self.keys.right,
        };
        *slot = down;
    }

    pub(crate) fn release_keys(&mut self) {
        self.keys = MoveKeys::default();
    }

    pub(crate) fn tick(&mut self, dt_seconds: f32) {
        if !dt_seconds.is_finite() || dt_seconds <= 0.0 {
            return;
        }
        let mut input = Vec2::ZERO;
        if self.keys.forward {
            input.y += 1.0;
        }
        if self.keys.back {
            input.y -= 1.0;
        }
        if self.keys.right {
            input.x += 1.0;
        }
        if self.keys.left {
            input.x -= 1.0;
        }
        if input == Vec2::ZERO {
            return;
        }
        let input = input.normalize();

        let (sin, cos) = self.yaw.sin_cos();
        let forward = Vec3::new(-sin, 0.0, -cos);
        let right = Vec3::new(cos, 0.0, -sin);
        let step = (forward * input.y + right * input.x) * self.tuning.move_speed * dt_seconds;

        let bound = self.tuning.position_bound;
        self.position.x = (self.position.x + step.x).clamp(-bound, bound);
        self.position.z = (self.position.z + step.z).clamp(-bound, bound);
    }

    pub(crate) fn affordance(&self, hovering_interactable: bool) -> CursorAffordance {
        if self.is_pointer_held() {
            CursorAffordance::Grabbing
        } else if hovering_interactable {
            CursorAffordance::Pointer
        } else {
            CursorAffordance::Grab
        }
    }

    pub(crate) fn write_camera(&self, camera: &mut Camera3D) {
        camera.position = self.position;
        camera.yaw = self.yaw;
        camera.pitch = self.pitch;
    }
}
