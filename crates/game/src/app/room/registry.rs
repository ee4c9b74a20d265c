use std::collections::HashMap;

use room_engine::{Aabb, EntityId, PrimitiveId, SceneWorld, Vec3};
use serde::Serialize;
use tracing::warn;

use super::layout::{PartRole, PartSpec, RoomLayout, TORCH_COUNT};
use super::puzzles::{RiddleKey, FEATHER_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub(crate) enum InteractableKind {
    Door,
    Manuscript,
    Constellation,
    Labyrinth,
    Feather { index: usize },
    Compass,
}

impl InteractableKind {
    pub(crate) fn display_name(self) -> &'static str {
        match self {
            InteractableKind::Door => "Porta d'Uscita",
            InteractableKind::Manuscript => "Manoscritto di Omero",
            InteractableKind::Constellation => "Mappa Stellare",
            InteractableKind::Labyrinth => "Labirinto di Cnosso",
            InteractableKind::Feather { .. } => "Piuma Dorata",
            InteractableKind::Compass => "Bussola di Ulisse",
        }
    }

    /// The dialog this object opens when examined, if it opens one.
    pub(crate) fn riddle(self) -> Option<RiddleKey> {
        match self {
            InteractableKind::Manuscript => Some(RiddleKey::Manuscript),
            InteractableKind::Constellation => Some(RiddleKey::Constellation),
            InteractableKind::Labyrinth => Some(RiddleKey::Labyrinth),
            InteractableKind::Compass => Some(RiddleKey::Compass),
            InteractableKind::Door | InteractableKind::Feather { .. } => None,
        }
    }

    fn debug_name(self) -> &'static str {
        match self {
            InteractableKind::Door => "door",
            InteractableKind::Manuscript => "manuscript",
            InteractableKind::Constellation => "constellation",
            InteractableKind::Labyrinth => "labyrinth",
            InteractableKind::Feather { .. } => "feather",
            InteractableKind::Compass => "compass",
        }
    }
}

/// A primitive the animation scheduler re-poses every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AnimatedPart {
    pub(crate) primitive: PrimitiveId,
    pub(crate) base_size: Vec3,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct AnimatedParts {
    pub(crate) door_lock: Option<AnimatedPart>,
    pub(crate) door_glow: Option<AnimatedPart>,
    pub(crate) maze_ball: Option<AnimatedPart>,
    pub(crate) feathers: [Option<AnimatedPart>; FEATHER_COUNT],
    pub(crate) torch_flames: [Option<AnimatedPart>; TORCH_COUNT],
}

impl AnimatedParts {
    fn record(&mut self, role: PartRole, part: AnimatedPart) {
        let slot = match role {
            PartRole::Static => return,
            PartRole::DoorLock => &mut self.door_lock,
            PartRole::DoorGlow => &mut self.door_glow,
            PartRole::MazeBall => &mut self.maze_ball,
            PartRole::Feather { index } => match self.feathers.get_mut(index) {
                Some(slot) => slot,
                None => return,
            },
            PartRole::TorchFlame { index } => match self.torch_flames.get_mut(index) {
                Some(slot) => slot,
                None => return,
            },
        };
        *slot = Some(part);
    }
}

/// Room objects by entity id. Built once on load from the layout; every hit
/// region is registered with the world's owner index so a pick on any part
/// folds back to the object that owns it.
#[derive(Debug, Default)]
pub(crate) struct InteractableRegistry {
    kinds: HashMap<EntityId, InteractableKind>,
    entities: HashMap<InteractableKind, EntityId>,
    animated: AnimatedParts,
}

impl InteractableRegistry {
    pub(crate) fn populate(world: &mut SceneWorld, layout: &RoomLayout) -> Self {
        let mut registry = Self::default();
        for entry in &layout.interactables {
            let entity = world.spawn_entity(entry.kind.debug_name());
            for part in &entry.parts {
                let bounds = Aabb::from_center_size(part.center, part.size);
                match world.attach_hit_region(entity, bounds, part.color) {
                    Some(primitive) => registry.record_part(part, primitive),
                    None => warn!(kind = ?entry.kind, "hit_region_rejected"),
                }
            }
            registry.kinds.insert(entity, entry.kind);
            registry.entities.insert(entry.kind, entity);
        }
        for part in &layout.scenery {
            let primitive =
                world.spawn_scenery(Aabb::from_center_size(part.center, part.size), part.color);
            registry.record_part(part, primitive);
        }
        registry
    }

    fn record_part(&mut self, part: &PartSpec, primitive: PrimitiveId) {
        self.animated.record(
            part.role,
            AnimatedPart {
                primitive,
                base_size: part.size,
            },
        );
    }

    pub(crate) fn kind_of(&self, entity: EntityId) -> Option<InteractableKind> {
        self.kinds.get(&entity).copied()
    }

    pub(crate) fn entity_for(&self, kind: InteractableKind) -> Option<EntityId> {
        self.entities.get(&kind).copied()
    }

    pub(crate) fn animated(&self) -> &AnimatedParts {
        &self.animated
    }

    pub(crate) fn len(&self) -> usize {
        self.kinds.len()
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}
