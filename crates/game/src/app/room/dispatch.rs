use room_engine::{EntityId, SceneWorld, Vec2, Viewport};
use tracing::debug;

use super::puzzles::{DoorOutcome, FeatherOutcome, PuzzleStateMachine, RiddleKey};
use super::registry::{InteractableKind, InteractableRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Picked {
    pub(crate) entity: EntityId,
    pub(crate) kind: InteractableKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClickOutcome {
    Missed,
    IgnoredWhileExamining,
    Door(DoorOutcome),
    Feather(FeatherOutcome),
    Examined(RiddleKey),
}

/// Nearest active interactable under the pointer.
pub(crate) fn pick(
    world: &SceneWorld,
    registry: &InteractableRegistry,
    cursor_position_px: Vec2,
    viewport: Viewport,
) -> Option<Picked> {
    let hit = world.pick_at_cursor(cursor_position_px, viewport)?;
    let kind = registry.kind_of(hit.entity)?;
    Some(Picked {
        entity: hit.entity,
        kind,
    })
}

/// Routes a confirmed click to the state machine. The caller has already
/// filtered out releases that ended a look-drag.
pub(crate) fn resolve_click(
    world: &mut SceneWorld,
    registry: &InteractableRegistry,
    machine: &mut PuzzleStateMachine,
    cursor_position_px: Vec2,
    viewport: Viewport,
    now: f64,
) -> ClickOutcome {
    if machine.is_examining() {
        return ClickOutcome::IgnoredWhileExamining;
    }
    let Some(picked) = pick(world, registry, cursor_position_px, viewport) else {
        return ClickOutcome::Missed;
    };
    debug!(kind = ?picked.kind, entity = picked.entity.0, "interactable_clicked");

    match picked.kind {
        InteractableKind::Door => ClickOutcome::Door(machine.activate_door(now)),
        InteractableKind::Feather { index } => {
            let outcome = machine.collect_feather(index, now);
            if outcome.removes_feather() {
                world.set_entity_active(picked.entity, false);
            }
            ClickOutcome::Feather(outcome)
        }
        kind => match kind.riddle() {
            Some(riddle) => {
                machine.examine(riddle, kind.display_name(), now);
                ClickOutcome::Examined(riddle)
            }
            None => ClickOutcome::Missed,
        },
    }
}
