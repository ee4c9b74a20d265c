use room_engine::{
    CursorAffordance, HudData, InputSnapshot, Scene, SceneCommand, SceneKey, SceneWorld,
};
use tracing::info;

use super::layout::RoomLayout;
use super::session::RoomSession;
use super::victory::VictoryHandle;
use super::viewpoint::RoomTuning;

/// The playable room. Owns a fresh [`RoomSession`] per load; the session is
/// dropped on unload so nothing survives a scene switch.
#[derive(Debug)]
pub(crate) struct RoomScene {
    tuning: RoomTuning,
    seed: u64,
    victory: VictoryHandle,
    session: Option<RoomSession>,
}

impl RoomScene {
    pub(crate) fn new(tuning: RoomTuning, seed: u64, victory: VictoryHandle) -> Self {
        Self {
            tuning,
            seed,
            victory,
            session: None,
        }
    }

    pub(crate) fn session(&self) -> Option<&RoomSession> {
        self.session.as_ref()
    }
}

impl Scene for RoomScene {
    fn load(&mut self, world: &mut SceneWorld) {
        let mut session = RoomSession::new(self.tuning, self.seed, self.victory.clone());
        session.populate(world, &RoomLayout::build(self.seed));
        info!(
            scene = "room",
            seed = self.seed,
            interactables = session.registry().len(),
            primitive_count = world.primitives().len(),
            "scene_loaded"
        );
        self.session = Some(session);
    }

    fn update(
        &mut self,
        fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand {
        let Some(session) = self.session.as_mut() else {
            return SceneCommand::None;
        };
        let report = session.step(fixed_dt_seconds, input, world);
        if report.escaped_this_step {
            return SceneCommand::SwitchTo(SceneKey::Victory);
        }
        SceneCommand::None
    }

    fn unload(&mut self, _world: &mut SceneWorld) {
        if let Some(mut session) = self.session.take() {
            session.teardown();
            info!(
                scene = "room",
                solved = session.machine().solved_count(),
                escaped = session.machine().escaped(),
                "scene_unloaded"
            );
        }
    }

    fn cursor_affordance(&self) -> CursorAffordance {
        self.session
            .as_ref()
            .map_or(CursorAffordance::Default, RoomSession::cursor_affordance)
    }

    fn hud(&self, _world: &SceneWorld) -> Option<HudData> {
        self.session
            .as_ref()
            .map(|session| session.snapshot().build_hud())
    }

    fn debug_title(&self, _world: &SceneWorld) -> Option<String> {
        let session = self.session.as_ref()?;
        let view = session.viewpoint();
        let position = view.position();
        Some(format!(
            "{} | enigmi {}/5 | pos ({:.1}, {:.1}) yaw {:.0} pitch {:.0}",
            super::session::ROOM_TITLE,
            session.machine().solved_count(),
            position.x,
            position.z,
            view.yaw().to_degrees(),
            view.pitch().to_degrees()
        ))
    }
}
