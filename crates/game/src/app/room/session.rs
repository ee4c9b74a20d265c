use room_engine::{
    CursorAffordance, HudData, HudLine, HudTone, InputAction, InputSnapshot, PointerButton,
    PointerEvent, SceneWorld, Vec2, Viewport,
};
use serde::Serialize;
use tracing::{info, warn};

use super::animation::{AnimationInputs, AnimationScheduler};
use super::dispatch::{self, ClickOutcome, Picked};
use super::layout::RoomLayout;
use super::puzzles::{
    Examination, Inventory, PuzzleKey, PuzzleState, PuzzleStateMachine, FEATHER_COUNT,
    PUZZLE_COUNT,
};
use super::registry::{InteractableKind, InteractableRegistry};
use super::victory::VictoryHandle;
use super::viewpoint::{RoomTuning, ViewpointController};

pub(crate) const ROOM_TITLE: &str = "Il Laboratorio di Dedalo";
const ROOM_BACKDROP: [u8; 4] = [0x1a, 0x14, 0x10, 255];
const CONTROLS_HELP: [&str; 3] = [
    "WASD / Frecce: Movimento",
    "Trascina: Guarda intorno",
    "Click: Interagisci",
];

/// Read-only view of the room for presentation and the F1 dump.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct RoomSnapshot {
    pub(crate) puzzles: PuzzleState,
    pub(crate) solved: usize,
    pub(crate) inventory: Inventory,
    pub(crate) feathers_collected: usize,
    /// Only present while the feather hunt is in progress.
    pub(crate) feather_counter: Option<usize>,
    pub(crate) notification: Option<String>,
    pub(crate) notification_expires_at: Option<f64>,
    pub(crate) examination: Option<Examination>,
    pub(crate) escaped: bool,
    pub(crate) victory_stage: u8,
    pub(crate) hovered: Option<InteractableKind>,
}

impl RoomSnapshot {
    pub(crate) fn build_hud(&self) -> HudData {
        let mut top_left = vec![HudLine::new(ROOM_TITLE, HudTone::Title)];
        top_left.extend(
            CONTROLS_HELP
                .iter()
                .map(|line| HudLine::new(*line, HudTone::Dim)),
        );
        top_left.push(HudLine::new(
            format!("Enigmi: {}/{}", self.solved, PUZZLE_COUNT),
            HudTone::Accent,
        ));
        if let Some(count) = self.feather_counter {
            top_left.push(HudLine::new(
                format!("Piume: {count}/{FEATHER_COUNT}"),
                HudTone::Accent,
            ));
        }

        let mut top_right = vec![HudLine::new("Inventario", HudTone::Title)];
        if self.inventory.is_empty() {
            top_right.push(HudLine::new("Vuoto", HudTone::Dim));
        } else {
            top_right.extend(
                self.inventory
                    .items()
                    .iter()
                    .map(|item| HudLine::new(*item, HudTone::Body)),
            );
        }

        let modal = match &self.examination {
            Some(examination) => examination_lines(examination),
            None => Vec::new(),
        };

        HudData {
            top_left,
            top_right,
            progress: PuzzleKey::ALL
                .iter()
                .map(|key| self.puzzles.is_solved(*key))
                .collect(),
            banner: self.notification.clone(),
            modal,
        }
    }
}

fn examination_lines(examination: &Examination) -> Vec<HudLine> {
    let riddle = examination.riddle;
    let mut lines = vec![HudLine::new(riddle.title(), HudTone::Title)];
    lines.extend(
        riddle
            .prompt()
            .iter()
            .map(|line| HudLine::new(*line, HudTone::Body)),
    );
    lines.push(HudLine::new(riddle.hint(), HudTone::Accent));
    lines.push(HudLine::new(
        format!("> {}_", examination.input_buffer),
        HudTone::Success,
    ));
    lines.push(HudLine::new("[Invio] Conferma   [Esc] Chiudi", HudTone::Dim));
    lines
}

/// What a single tick did, for the scene adapter and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct StepReport {
    pub(crate) clicks: Vec<ClickOutcome>,
    pub(crate) escaped_this_step: bool,
}

/// The whole room: puzzle state, interactables, the player's view and the
/// decorative animation, advanced together on one game clock.
#[derive(Debug)]
pub(crate) struct RoomSession {
    machine: PuzzleStateMachine,
    registry: InteractableRegistry,
    viewpoint: ViewpointController,
    animation: AnimationScheduler,
    victory: VictoryHandle,
    clock: f64,
    hovered: Option<Picked>,
}

impl RoomSession {
    /// Starts a fresh run; any sequence left in `victory` from an earlier run
    /// is reset.
    pub(crate) fn new(tuning: RoomTuning, seed: u64, victory: VictoryHandle) -> Self {
        victory.reset();
        Self {
            machine: PuzzleStateMachine::default(),
            registry: InteractableRegistry::default(),
            viewpoint: ViewpointController::new(tuning),
            animation: AnimationScheduler::new(seed),
            victory,
            clock: 0.0,
            hovered: None,
        }
    }

    /// Spawns the room into `world` and places the camera at the start.
    pub(crate) fn populate(&mut self, world: &mut SceneWorld, layout: &RoomLayout) {
        self.registry = InteractableRegistry::populate(world, layout);
        world.set_clear_color(ROOM_BACKDROP);
        self.viewpoint.write_camera(world.camera_mut());
        let inputs = self.animation_inputs(world);
        let frame = self.animation.tick(0.0, &inputs);
        self.animation.apply(&frame, self.registry.animated(), world);
    }

    pub(crate) fn machine(&self) -> &PuzzleStateMachine {
        &self.machine
    }

    pub(crate) fn registry(&self) -> &InteractableRegistry {
        &self.registry
    }

    pub(crate) fn viewpoint(&self) -> &ViewpointController {
        &self.viewpoint
    }

    #[cfg(test)]
    pub(crate) fn victory(&self) -> super::victory::VictorySequence {
        self.victory.get()
    }

    pub(crate) fn hovered(&self) -> Option<InteractableKind> {
        self.hovered.map(|picked| picked.kind)
    }

    pub(crate) fn cursor_affordance(&self) -> CursorAffordance {
        self.viewpoint.affordance(self.hovered.is_some())
    }

    pub(crate) fn step(
        &mut self,
        dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> StepReport {
        if dt_seconds.is_finite() && dt_seconds > 0.0 {
            self.clock += f64::from(dt_seconds);
        }
        let now = self.clock;
        let viewport = input.viewport();
        let cursor = input.cursor_position_px();
        let was_escaped = self.machine.escaped();
        let mut report = StepReport::default();

        if let Some(at) = cursor {
            self.viewpoint.update_look(at.x, at.y);
        }
        for event in input.pointer_events() {
            if let Some(outcome) = self.handle_pointer(*event, cursor, viewport, world, now) {
                report.clicks.push(outcome);
            }
        }

        self.handle_examination_keys(input, now);

        if self.machine.is_examining() || self.machine.escaped() {
            self.viewpoint.release_keys();
        } else {
            for action in InputAction::ALL {
                self.viewpoint.set_key_state(action, input.is_down(action));
            }
        }
        self.viewpoint.tick(dt_seconds);
        self.viewpoint.write_camera(world.camera_mut());

        self.hovered = match cursor {
            Some(at) if !self.machine.is_examining() => {
                dispatch::pick(world, &self.registry, at, viewport)
            }
            _ => None,
        };

        self.machine.tick(now);
        if self.machine.escaped() && !was_escaped {
            self.victory.start(now);
            report.escaped_this_step = true;
        }
        self.victory.tick(now);

        let inputs = self.animation_inputs(world);
        let frame = self.animation.tick(dt_seconds, &inputs);
        self.animation.apply(&frame, self.registry.animated(), world);

        if input.dump_state_pressed() {
            self.dump_state();
        }
        report
    }

    fn handle_pointer(
        &mut self,
        event: PointerEvent,
        cursor: Option<Vec2>,
        viewport: Viewport,
        world: &mut SceneWorld,
        now: f64,
    ) -> Option<ClickOutcome> {
        match event {
            PointerEvent::Pressed(_) => {
                // The dialog covers the room.
                if self.machine.is_examining() {
                    return None;
                }
                if let Some(at) = cursor {
                    self.viewpoint.begin_look(at.x, at.y);
                }
                None
            }
            PointerEvent::Released(button) => {
                let held = self.viewpoint.is_pointer_held();
                let release = self.viewpoint.end_look();
                if button != PointerButton::Primary
                    || !held
                    || release.was_drag
                    || self.machine.escaped()
                {
                    return None;
                }
                let at = cursor?;
                Some(dispatch::resolve_click(
                    world,
                    &self.registry,
                    &mut self.machine,
                    at,
                    viewport,
                    now,
                ))
            }
        }
    }

    fn handle_examination_keys(&mut self, input: &InputSnapshot, now: f64) {
        if !self.machine.is_examining() {
            return;
        }
        self.machine.push_text(input.typed_text());
        self.machine.backspace(input.backspace_presses());
        if input.submit_pressed() {
            self.machine.submit_examination(now);
        }
        if input.cancel_pressed() {
            self.machine.close_examination();
        }
    }

    fn animation_inputs(&self, world: &SceneWorld) -> AnimationInputs {
        let mut feather_active = [false; FEATHER_COUNT];
        for (index, active) in feather_active.iter_mut().enumerate() {
            *active = self
                .registry
                .entity_for(InteractableKind::Feather { index })
                .is_some_and(|entity| world.is_entity_active(entity));
        }
        AnimationInputs {
            all_solved: self.machine.all_solved(),
            dragging: self.viewpoint.is_dragging(),
            hovered: self.hovered.map(|picked| picked.entity),
            feather_active,
        }
    }

    pub(crate) fn snapshot(&self) -> RoomSnapshot {
        let state = *self.machine.state();
        let feathers_collected = self.machine.feather_count();
        RoomSnapshot {
            puzzles: state,
            solved: state.solved_count(),
            inventory: self.machine.inventory().clone(),
            feathers_collected,
            feather_counter: (feathers_collected > 0 && !state.wings)
                .then_some(feathers_collected),
            notification: self.machine.notifications().current().map(str::to_owned),
            notification_expires_at: self.machine.notifications().expires_at(),
            examination: self.machine.examination().cloned(),
            escaped: self.machine.escaped(),
            victory_stage: self.victory.get().stage(),
            hovered: self.hovered(),
        }
    }

    fn dump_state(&self) {
        match serde_json::to_string_pretty(&self.snapshot()) {
            Ok(json) => info!(now = self.clock, snapshot = %json, "room_state_dump"),
            Err(err) => warn!(error = %err, "room_state_dump_failed"),
        }
    }

    /// Drops everything the room spawned. The machine keeps its flags so a
    /// late read still reflects the final state.
    pub(crate) fn teardown(&mut self) {
        self.registry.clear();
        self.viewpoint.end_look();
        self.viewpoint.release_keys();
        self.hovered = None;
    }
}
