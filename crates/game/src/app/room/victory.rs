use std::cell::Cell;
use std::rc::Rc;

use room_engine::{
    HudData, HudLine, HudTone, InputSnapshot, Scene, SceneCommand, SceneWorld,
};
use tracing::info;

/// Seconds after the escape at which each stage begins; stage `n` starts at
/// `VICTORY_THRESHOLDS[n - 1]`.
pub(crate) const VICTORY_THRESHOLDS: [f64; 5] = [0.1, 3.0, 6.0, 9.0, 10.0];
pub(crate) const FINAL_STAGE: u8 = VICTORY_THRESHOLDS.len() as u8;

pub(crate) const VICTORY_TITLE: &str = "LIBERTÀ!";
pub(crate) const VICTORY_SUBTITLE: &str = "Hai risolto tutti gli enigmi di Dedalo!";
pub(crate) const VICTORY_VERSE: [&str; 3] = [
    "Come Ulisse che ritornò ad Itaca,",
    "come Dedalo che fuggì con le ali,",
    "anche tu hai dimostrato saggezza e ingegno.",
];
const EXIT_HINT: &str = "Esc per uscire";
const VICTORY_BACKDROP: [u8; 4] = [0x78, 0x35, 0x0f, 255];

/// Post-escape stage clock. Stages only move forward, one per threshold, and
/// stop at [`FINAL_STAGE`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct VictorySequence {
    started_at: Option<f64>,
    stage: u8,
}

impl VictorySequence {
    /// Returns false if the sequence was already running.
    pub(crate) fn start(&mut self, now: f64) -> bool {
        if self.started_at.is_some() || !now.is_finite() {
            return false;
        }
        self.started_at = Some(now);
        true
    }

    pub(crate) fn started_at(&self) -> Option<f64> {
        self.started_at
    }

    pub(crate) fn stage(&self) -> u8 {
        self.stage
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.stage == FINAL_STAGE
    }

    /// Applies every threshold crossed by `now`, in order. Returns how many
    /// stages were entered.
    pub(crate) fn tick(&mut self, now: f64) -> u8 {
        let Some(started_at) = self.started_at else {
            return 0;
        };
        let elapsed = now - started_at;
        let mut entered = 0;
        while let Some(threshold) = VICTORY_THRESHOLDS.get(usize::from(self.stage)) {
            if elapsed < *threshold {
                break;
            }
            self.stage += 1;
            entered += 1;
            info!(stage = self.stage, elapsed_s = elapsed, "victory_stage");
        }
        entered
    }

    /// Lines shown at the current stage. Earlier lines stay on screen.
    pub(crate) fn captions(&self) -> Vec<HudLine> {
        let mut lines = Vec::new();
        if self.stage >= 2 {
            lines.push(HudLine::new(VICTORY_TITLE, HudTone::Title));
        }
        if self.stage >= 3 {
            lines.push(HudLine::new(VICTORY_SUBTITLE, HudTone::Body));
        }
        if self.stage >= 4 {
            lines.extend(
                VICTORY_VERSE
                    .iter()
                    .map(|line| HudLine::new(*line, HudTone::Accent)),
            );
        }
        if self.stage >= FINAL_STAGE {
            lines.push(HudLine::new(EXIT_HINT, HudTone::Dim));
        }
        lines
    }
}

/// The one sequence of a run. The room starts it on the escape tick and the
/// victory scene keeps ticking it on the same clock.
#[derive(Debug, Clone, Default)]
pub(crate) struct VictoryHandle(Rc<Cell<VictorySequence>>);

impl VictoryHandle {
    pub(crate) fn get(&self) -> VictorySequence {
        self.0.get()
    }

    pub(crate) fn reset(&self) {
        self.0.set(VictorySequence::default());
    }

    pub(crate) fn start(&self, now: f64) -> bool {
        self.update(|sequence| sequence.start(now))
    }

    pub(crate) fn tick(&self, now: f64) -> u8 {
        self.update(|sequence| sequence.tick(now))
    }

    fn update<R>(&self, apply: impl FnOnce(&mut VictorySequence) -> R) -> R {
        let mut sequence = self.0.get();
        let result = apply(&mut sequence);
        self.0.set(sequence);
        result
    }
}

/// Shown after the room is escaped. Resumes the shared sequence from the
/// escape moment; loaded on its own it starts one at zero.
#[derive(Debug, Default)]
pub(crate) struct VictoryScene {
    victory: VictoryHandle,
    clock: f64,
}

impl VictoryScene {
    pub(crate) fn new(victory: VictoryHandle) -> Self {
        Self {
            victory,
            clock: 0.0,
        }
    }

    pub(crate) fn sequence(&self) -> VictorySequence {
        self.victory.get()
    }
}

impl Scene for VictoryScene {
    fn load(&mut self, world: &mut SceneWorld) {
        self.victory.start(0.0);
        self.clock = self.victory.get().started_at().unwrap_or_default();
        world.set_clear_color(VICTORY_BACKDROP);
        info!(scene = "victory", escaped_at = self.clock, "scene_loaded");
    }

    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        _world: &mut SceneWorld,
    ) -> SceneCommand {
        if fixed_dt_seconds.is_finite() && fixed_dt_seconds > 0.0 {
            self.clock += f64::from(fixed_dt_seconds);
        }
        self.victory.tick(self.clock);

        if self.victory.get().is_complete() && input.cancel_pressed() {
            info!(reason = "victory_dismissed", "shutdown_requested");
            return SceneCommand::Quit;
        }
        SceneCommand::None
    }

    fn unload(&mut self, _world: &mut SceneWorld) {
        info!(stage = self.victory.get().stage(), "victory_unloaded");
    }

    fn hud(&self, _world: &SceneWorld) -> Option<HudData> {
        let sequence = self.victory.get();
        if sequence.stage() == 0 {
            return None;
        }
        Some(HudData {
            modal: sequence.captions(),
            ..HudData::default()
        })
    }

    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        Some(format!("victory stage {}/{}", self.victory.get().stage(), FINAL_STAGE))
    }
}
