use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use room_engine::{EntityId, PrimitivePose, SceneWorld, Vec3};

use super::layout::TORCH_COUNT;
use super::puzzles::FEATHER_COUNT;
use super::registry::{AnimatedPart, AnimatedParts};

pub(crate) const DUST_PARTICLE_COUNT: usize = 1000;
const DUST_HALF_EXTENT: f32 = 11.0;
const DUST_CEILING: f32 = 9.0;
/// Units per second.
const DUST_FALL_SPEED: f32 = 0.18;

const FEATHER_REST_HEIGHT: f32 = 0.2;
const FEATHER_BOB_AMPLITUDE: f32 = 0.05;
/// Radians per second.
const FEATHER_SPIN_SPEED: f32 = 0.6;
const BALL_DRIFT: f32 = 0.35;
const BALL_SPIN_SPEED: f32 = 1.5;

const LOCK_IDLE_SCALE: f32 = 1.0;
const LOCK_IDLE_EMISSIVE: f32 = 0.5;
const LOCK_IDLE_GLOW: f32 = 0.15;
/// Glow opacity that maps to neutral brightness.
const GLOW_REFERENCE: f32 = 0.3;
/// Torch intensity that maps to neutral brightness.
const TORCH_REFERENCE: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AnimationInputs {
    pub(crate) all_solved: bool,
    pub(crate) dragging: bool,
    pub(crate) hovered: Option<EntityId>,
    pub(crate) feather_active: [bool; FEATHER_COUNT],
}

impl Default for AnimationInputs {
    fn default() -> Self {
        Self {
            all_solved: false,
            dragging: false,
            hovered: None,
            feather_active: [true; FEATHER_COUNT],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct TorchPose {
    pub(crate) intensity: f32,
    pub(crate) flame_scale: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct FeatherPose {
    pub(crate) height: f32,
    pub(crate) spin: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct BallPose {
    pub(crate) offset_x: f32,
    pub(crate) offset_z: f32,
    pub(crate) spin: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LockPose {
    pub(crate) scale: f32,
    pub(crate) emissive: f32,
    pub(crate) glow_opacity: f32,
}

impl Default for LockPose {
    fn default() -> Self {
        Self {
            scale: LOCK_IDLE_SCALE,
            emissive: LOCK_IDLE_EMISSIVE,
            glow_opacity: LOCK_IDLE_GLOW,
        }
    }
}

/// Everything the presentation needs for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct AnimationFrame {
    pub(crate) torches: [TorchPose; TORCH_COUNT],
    /// `None` for collected feathers.
    pub(crate) feathers: [Option<FeatherPose>; FEATHER_COUNT],
    pub(crate) ball: BallPose,
    pub(crate) lock: LockPose,
    pub(crate) hover_highlight: f32,
    pub(crate) hovered: Option<EntityId>,
}

/// Per-tick decorative motion. Reads puzzle state through
/// [`AnimationInputs`] and never writes it.
#[derive(Debug)]
pub(crate) struct AnimationScheduler {
    elapsed: f32,
    feather_spin: [f32; FEATHER_COUNT],
    ball_spin: f32,
    dust: Vec<Vec3>,
    rng: StdRng,
}

impl AnimationScheduler {
    pub(crate) fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let dust = (0..DUST_PARTICLE_COUNT)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-DUST_HALF_EXTENT..DUST_HALF_EXTENT),
                    rng.gen_range(0.0..DUST_CEILING),
                    rng.gen_range(-DUST_HALF_EXTENT..DUST_HALF_EXTENT),
                )
            })
            .collect();
        Self {
            elapsed: 0.0,
            feather_spin: [0.0; FEATHER_COUNT],
            ball_spin: 0.0,
            dust,
            rng,
        }
    }

    #[cfg(test)]
    pub(crate) fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[cfg(test)]
    pub(crate) fn dust(&self) -> &[Vec3] {
        &self.dust
    }

    pub(crate) fn tick(&mut self, dt_seconds: f32, inputs: &AnimationInputs) -> AnimationFrame {
        let dt = if dt_seconds.is_finite() {
            dt_seconds.max(0.0)
        } else {
            0.0
        };
        self.elapsed += dt;
        let t = self.elapsed;

        let mut torches = [TorchPose::default(); TORCH_COUNT];
        for (i, torch) in torches.iter_mut().enumerate() {
            let phase = i as f32;
            *torch = TorchPose {
                intensity: 2.0 + (5.0 * t + phase).sin() * 0.5,
                flame_scale: 1.0 + (6.0 * t + phase).sin() * 0.2,
            };
        }

        let mut feathers = [None; FEATHER_COUNT];
        for (i, pose) in feathers.iter_mut().enumerate() {
            if !inputs.feather_active[i] {
                continue;
            }
            self.feather_spin[i] += FEATHER_SPIN_SPEED * dt;
            *pose = Some(FeatherPose {
                height: FEATHER_REST_HEIGHT + (2.0 * t + i as f32).sin() * FEATHER_BOB_AMPLITUDE,
                spin: self.feather_spin[i],
            });
        }

        self.ball_spin += BALL_SPIN_SPEED * dt;
        let ball = BallPose {
            offset_x: BALL_DRIFT * (0.7 * t).sin(),
            offset_z: BALL_DRIFT * (1.1 * t + 0.5).sin(),
            spin: self.ball_spin,
        };

        let lock = if inputs.all_solved {
            let pulse = (4.0 * t).sin();
            LockPose {
                scale: 1.0 + 0.3 * pulse,
                emissive: 1.0 + 0.5 * pulse,
                glow_opacity: 0.3 + 0.2 * pulse,
            }
        } else {
            LockPose::default()
        };

        self.settle_dust(dt);

        let highlighted = inputs.hovered.is_some() && !inputs.dragging;
        AnimationFrame {
            torches,
            feathers,
            ball,
            lock,
            hover_highlight: if highlighted { 1.0 } else { 0.0 },
            hovered: inputs.hovered,
        }
    }

    fn settle_dust(&mut self, dt: f32) {
        let fall = DUST_FALL_SPEED * dt;
        for particle in &mut self.dust {
            particle.y -= fall;
            if particle.y < 0.0 {
                particle.y = DUST_CEILING;
                particle.x = self.rng.gen_range(-DUST_HALF_EXTENT..DUST_HALF_EXTENT);
                particle.z = self.rng.gen_range(-DUST_HALF_EXTENT..DUST_HALF_EXTENT);
            }
        }
    }

    /// Writes a frame into the world's primitive poses.
    pub(crate) fn apply(&self, frame: &AnimationFrame, parts: &AnimatedParts, world: &mut SceneWorld) {
        for (torch, flame) in frame.torches.iter().zip(&parts.torch_flames) {
            set_pose(
                world,
                *flame,
                PrimitivePose {
                    scale: Vec3::splat(torch.flame_scale),
                    brightness: torch.intensity / TORCH_REFERENCE,
                    ..PrimitivePose::default()
                },
            );
        }

        for (feather, part) in frame.feathers.iter().zip(&parts.feathers) {
            let (Some(feather), Some(part)) = (feather, part) else {
                continue;
            };
            set_pose(
                world,
                Some(*part),
                PrimitivePose {
                    offset: Vec3::new(0.0, feather.height - FEATHER_REST_HEIGHT, 0.0),
                    scale: spun_footprint(part.base_size, feather.spin),
                    ..PrimitivePose::default()
                },
            );
        }

        if let Some(ball) = parts.maze_ball {
            set_pose(
                world,
                Some(ball),
                PrimitivePose {
                    offset: Vec3::new(frame.ball.offset_x, 0.0, frame.ball.offset_z),
                    scale: spun_footprint(ball.base_size, frame.ball.spin),
                    ..PrimitivePose::default()
                },
            );
        }

        set_pose(
            world,
            parts.door_lock,
            PrimitivePose {
                scale: Vec3::splat(frame.lock.scale),
                brightness: frame.lock.emissive,
                ..PrimitivePose::default()
            },
        );
        set_pose(
            world,
            parts.door_glow,
            PrimitivePose {
                brightness: frame.lock.glow_opacity / GLOW_REFERENCE,
                ..PrimitivePose::default()
            },
        );

        world.set_particles(&self.dust);
        let highlighted = frame.hover_highlight > 0.0;
        world.set_hovered_visual(frame.hovered.filter(|_| highlighted));
    }
}

fn set_pose(world: &mut SceneWorld, part: Option<AnimatedPart>, pose: PrimitivePose) {
    if let Some(part) = part {
        world.set_primitive_pose(part.primitive, pose);
    }
}

/// Scale that makes an axis-aligned box cover the footprint of `size` turned
/// by `angle` around +Y.
fn spun_footprint(size: Vec3, angle: f32) -> Vec3 {
    if size.x <= 0.0 || size.z <= 0.0 {
        return Vec3::ONE;
    }
    let (sin, cos) = angle.sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    Vec3::new(
        (cos * size.x + sin * size.z) / size.x,
        1.0,
        (sin * size.x + cos * size.z) / size.z,
    )
}
