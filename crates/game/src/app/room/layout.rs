use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use room_engine::Vec3;

use super::puzzles::FEATHER_COUNT;
use super::registry::InteractableKind;

pub(crate) const ROOM_HALF_EXTENT: f32 = 10.0;
pub(crate) const CEILING_HEIGHT: f32 = 8.0;
pub(crate) const TORCH_COUNT: usize = 4;
pub(crate) const TORCH_POSITIONS: [Vec3; TORCH_COUNT] = [
    Vec3::new(-7.0, 3.3, -7.0),
    Vec3::new(7.0, 3.3, -7.0),
    Vec3::new(-7.0, 3.3, 7.0),
    Vec3::new(7.0, 3.3, 7.0),
];

const DOOR_CENTER: Vec3 = Vec3::new(0.0, 4.0, 9.8);
const MANUSCRIPT_CENTER: Vec3 = Vec3::new(-6.5, 1.5, -6.0);
const STAR_MAP_CENTER: Vec3 = Vec3::new(0.0, 3.5, -9.8);
const LABYRINTH_CENTER: Vec3 = Vec3::new(6.5, 1.25, -6.0);
const COMPASS_CENTER: Vec3 = Vec3::new(6.5, 1.7, 6.0);
const FEATHER_HEIGHT: f32 = 0.2;
const FEATHER_SIZE: Vec3 = Vec3::new(0.3, 0.16, 0.16);
const LABYRINTH_WALL_COUNT: usize = 8;
const STAR_COUNT: usize = 15;

const COLOR_DOOR: [u8; 4] = [0x5c, 0x3a, 0x24, 255];
const COLOR_GOLD: [u8; 4] = [0xff, 0xd7, 0x00, 255];
const COLOR_GLOW: [u8; 4] = [0xff, 0xdd, 0x00, 255];
const COLOR_PARCHMENT: [u8; 4] = [0xf4, 0xe4, 0xc1, 255];
const COLOR_NIGHT: [u8; 4] = [0x3a, 0x3a, 0x7a, 255];
const COLOR_STAR: [u8; 4] = [0xff, 0xff, 0xee, 255];
const COLOR_WOOD: [u8; 4] = [0x6b, 0x34, 0x10, 255];
const COLOR_MAZE_WALL: [u8; 4] = [0x7a, 0x7a, 0x7a, 255];
const COLOR_BALL: [u8; 4] = [0xc0, 0xc0, 0xc0, 255];
const COLOR_BRASS: [u8; 4] = [0x8b, 0x69, 0x14, 255];
const COLOR_NEEDLE: [u8; 4] = [0xff, 0x00, 0x00, 255];
const COLOR_FLOOR: [u8; 4] = [0x3d, 0x3d, 0x3d, 255];
const COLOR_WALL: [u8; 4] = [0x4a, 0x4a, 0x4a, 255];
const COLOR_FLAME: [u8; 4] = [0xff, 0x88, 0x00, 255];

/// What a part is animated as, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PartRole {
    Static,
    DoorLock,
    DoorGlow,
    MazeBall,
    Feather { index: usize },
    TorchFlame { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PartSpec {
    pub(crate) center: Vec3,
    pub(crate) size: Vec3,
    pub(crate) color: [u8; 4],
    pub(crate) role: PartRole,
}

impl PartSpec {
    fn fixed(center: Vec3, size: Vec3, color: [u8; 4]) -> Self {
        Self {
            center,
            size,
            color,
            role: PartRole::Static,
        }
    }

    fn animated(center: Vec3, size: Vec3, color: [u8; 4], role: PartRole) -> Self {
        Self {
            center,
            size,
            color,
            role,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct InteractableSpec {
    pub(crate) kind: InteractableKind,
    pub(crate) parts: Vec<PartSpec>,
}

/// Fixed room contents. Only the decorative scatter (feather radii, maze
/// walls, stars) comes from the seeded generator.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RoomLayout {
    pub(crate) interactables: Vec<InteractableSpec>,
    pub(crate) scenery: Vec<PartSpec>,
}

impl RoomLayout {
    pub(crate) fn build(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut interactables = vec![
            door(),
            manuscript(),
            star_map(),
            labyrinth(&mut rng),
            compass(),
        ];
        interactables.extend((0..FEATHER_COUNT).map(|index| feather(index, &mut rng)));

        let mut scenery = shell();
        scenery.extend(stars(&mut rng));
        scenery.extend(TORCH_POSITIONS.iter().enumerate().map(|(index, at)| {
            PartSpec::animated(
                *at,
                Vec3::new(0.5, 0.8, 0.5),
                COLOR_FLAME,
                PartRole::TorchFlame { index },
            )
        }));

        Self {
            interactables,
            scenery,
        }
    }
}

fn door() -> InteractableSpec {
    // The lock sits on the room-facing side of the door.
    let lock_center = DOOR_CENTER + Vec3::new(0.0, 0.0, -0.3);
    InteractableSpec {
        kind: InteractableKind::Door,
        parts: vec![
            PartSpec::fixed(DOOR_CENTER, Vec3::new(4.0, 6.0, 0.4), COLOR_DOOR),
            PartSpec::animated(
                lock_center,
                Vec3::new(0.8, 1.0, 0.3),
                COLOR_GOLD,
                PartRole::DoorLock,
            ),
            PartSpec::animated(lock_center, Vec3::splat(1.4), COLOR_GLOW, PartRole::DoorGlow),
        ],
    }
}

fn manuscript() -> InteractableSpec {
    InteractableSpec {
        kind: InteractableKind::Manuscript,
        parts: vec![PartSpec::fixed(
            MANUSCRIPT_CENTER,
            Vec3::new(0.7, 0.12, 0.9),
            COLOR_PARCHMENT,
        )],
    }
}

fn star_map() -> InteractableSpec {
    InteractableSpec {
        kind: InteractableKind::Constellation,
        parts: vec![PartSpec::fixed(
            STAR_MAP_CENTER,
            Vec3::new(2.4, 2.4, 0.05),
            COLOR_NIGHT,
        )],
    }
}

fn labyrinth(rng: &mut StdRng) -> InteractableSpec {
    let mut parts = vec![PartSpec::fixed(
        LABYRINTH_CENTER,
        Vec3::new(1.3, 0.3, 1.3),
        COLOR_WOOD,
    )];
    for _ in 0..LABYRINTH_WALL_COUNT {
        let offset = Vec3::new(rng.gen_range(-0.5..0.5), 0.25, rng.gen_range(-0.5..0.5));
        let length = rng.gen_range(0.3..0.7);
        let size = if rng.gen_bool(0.5) {
            Vec3::new(0.08, 0.35, length)
        } else {
            Vec3::new(length, 0.35, 0.08)
        };
        parts.push(PartSpec::fixed(LABYRINTH_CENTER + offset, size, COLOR_MAZE_WALL));
    }
    parts.push(PartSpec::animated(
        LABYRINTH_CENTER + Vec3::new(0.0, 0.23, 0.0),
        Vec3::splat(0.16),
        COLOR_BALL,
        PartRole::MazeBall,
    ));
    InteractableSpec {
        kind: InteractableKind::Labyrinth,
        parts,
    }
}

fn compass() -> InteractableSpec {
    InteractableSpec {
        kind: InteractableKind::Compass,
        parts: vec![
            PartSpec::fixed(COMPASS_CENTER, Vec3::new(1.0, 0.15, 1.0), COLOR_BRASS),
            PartSpec::fixed(
                COMPASS_CENTER + Vec3::new(0.0, 0.3, 0.0),
                Vec3::new(0.06, 0.06, 0.5),
                COLOR_NEEDLE,
            ),
        ],
    }
}

pub(crate) fn feather_angle(index: usize) -> f32 {
    index as f32 / FEATHER_COUNT as f32 * std::f32::consts::TAU
}

fn feather(index: usize, rng: &mut StdRng) -> InteractableSpec {
    let angle = feather_angle(index);
    let radius = 2.5 + rng.gen::<f32>() * 2.0;
    let center = Vec3::new(angle.cos() * radius, FEATHER_HEIGHT, angle.sin() * radius);
    InteractableSpec {
        kind: InteractableKind::Feather { index },
        parts: vec![PartSpec::animated(
            center,
            FEATHER_SIZE,
            COLOR_GOLD,
            PartRole::Feather { index },
        )],
    }
}

fn shell() -> Vec<PartSpec> {
    let h = ROOM_HALF_EXTENT;
    let mid = CEILING_HEIGHT * 0.5;
    vec![
        PartSpec::fixed(Vec3::new(0.0, -0.05, 0.0), Vec3::new(2.0 * h, 0.1, 2.0 * h), COLOR_FLOOR),
        PartSpec::fixed(
            Vec3::new(0.0, CEILING_HEIGHT + 0.05, 0.0),
            Vec3::new(2.0 * h, 0.1, 2.0 * h),
            COLOR_FLOOR,
        ),
        PartSpec::fixed(Vec3::new(0.0, mid, -h), Vec3::new(2.0 * h, CEILING_HEIGHT, 0.1), COLOR_WALL),
        PartSpec::fixed(Vec3::new(-h, mid, 0.0), Vec3::new(0.1, CEILING_HEIGHT, 2.0 * h), COLOR_WALL),
        PartSpec::fixed(Vec3::new(h, mid, 0.0), Vec3::new(0.1, CEILING_HEIGHT, 2.0 * h), COLOR_WALL),
        PartSpec::fixed(Vec3::new(-7.0, mid, h), Vec3::new(6.0, CEILING_HEIGHT, 0.1), COLOR_WALL),
        PartSpec::fixed(Vec3::new(7.0, mid, h), Vec3::new(6.0, CEILING_HEIGHT, 0.1), COLOR_WALL),
    ]
}

fn stars(rng: &mut StdRng) -> Vec<PartSpec> {
    (0..STAR_COUNT)
        .map(|_| {
            let center = Vec3::new(
                rng.gen_range(-1.0..1.0),
                STAR_MAP_CENTER.y + rng.gen_range(-1.0..1.0),
                -9.7,
            );
            PartSpec::fixed(center, Vec3::splat(0.08), COLOR_STAR)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_deterministic_per_seed() {
        assert_eq!(RoomLayout::build(7), RoomLayout::build(7));
        assert_ne!(RoomLayout::build(7), RoomLayout::build(8));
    }

    #[test]
    fn every_kind_is_present_once_with_twelve_feathers() {
        let layout = RoomLayout::build(1);
        let count = |wanted: fn(&InteractableKind) -> bool| {
            layout
                .interactables
                .iter()
                .filter(|entry| wanted(&entry.kind))
                .count()
        };
        assert_eq!(count(|kind| *kind == InteractableKind::Door), 1);
        assert_eq!(count(|kind| *kind == InteractableKind::Compass), 1);
        assert_eq!(
            count(|kind| matches!(kind, InteractableKind::Feather { .. })),
            FEATHER_COUNT
        );
        assert!(layout.interactables.iter().all(|entry| !entry.parts.is_empty()));
    }

    #[test]
    fn feathers_lie_on_their_ring() {
        let layout = RoomLayout::build(3);
        for entry in &layout.interactables {
            let InteractableKind::Feather { index } = entry.kind else {
                continue;
            };
            let center = entry.parts[0].center;
            let radius = Vec3::new(center.x, 0.0, center.z).length();
            assert!((2.5..=4.5).contains(&radius), "radius {radius}");
            assert!((center.y - FEATHER_HEIGHT).abs() < 1.0e-6);
            let angle = center.z.atan2(center.x).rem_euclid(std::f32::consts::TAU);
            assert!((angle - feather_angle(index)).abs() < 1.0e-3);
        }
    }

    #[test]
    fn door_lock_faces_the_room() {
        let layout = RoomLayout::build(0);
        let door = &layout.interactables[0];
        let lock = door
            .parts
            .iter()
            .find(|part| part.role == PartRole::DoorLock)
            .expect("lock");
        assert!(lock.center.z < door.parts[0].center.z);
    }

    #[test]
    fn scenery_has_one_flame_per_torch() {
        let layout = RoomLayout::build(0);
        let flames = layout
            .scenery
            .iter()
            .filter(|part| matches!(part.role, PartRole::TorchFlame { .. }))
            .count();
        assert_eq!(flames, TORCH_COUNT);
    }
}
