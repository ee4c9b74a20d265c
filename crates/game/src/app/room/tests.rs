    use super::*;
    use room_engine::{
        CursorAffordance, InputAction, InputSnapshot, PointerButton, PointerEvent, SceneCommand,
        SceneWorld, Vec2, Vec3,
    };

    use super::dispatch::ClickOutcome;
    use super::layout::RoomLayout;
    use super::puzzles::{DoorOutcome, FeatherOutcome, FEATHER_COUNT, PUZZLE_COUNT};
    use super::registry::InteractableKind;
    use super::victory::{VictoryHandle, FINAL_STAGE};

    const SEED: u64 = 17;
    const WINDOW: (u32, u32) = (1280, 720);
    const CENTER: Vec2 = Vec2::new(640.0, 360.0);
    const DT: f32 = 1.0 / 60.0;

    fn frame() -> InputSnapshot {
        InputSnapshot::empty().with_window_size(WINDOW)
    }

    fn snapshot_from_actions(actions: &[InputAction]) -> InputSnapshot {
        let mut snapshot = frame();
        for action in actions {
            snapshot = snapshot.with_action_down(*action, true);
        }
        snapshot
    }

    fn click_snapshot(cursor_px: Vec2) -> InputSnapshot {
        frame()
            .with_cursor_position_px(Some(cursor_px))
            .with_pointer_event(PointerEvent::Pressed(PointerButton::Primary))
            .with_pointer_event(PointerEvent::Released(PointerButton::Primary))
    }

    fn loaded_room() -> (RoomScene, SceneWorld) {
        let mut scene = RoomScene::new(RoomTuning::default(), SEED, VictoryHandle::default());
        let mut world = SceneWorld::default();
        scene.load(&mut world);
        (scene, world)
    }

    fn session(scene: &RoomScene) -> &session::RoomSession {
        scene.session().expect("room loaded")
    }

    fn part_center(kind: InteractableKind) -> Vec3 {
        RoomLayout::build(SEED)
            .interactables
            .into_iter()
            .find(|entry| entry.kind == kind)
            .map(|entry| entry.parts[0].center)
            .expect("kind in layout")
    }

    fn advance(scene: &mut RoomScene, world: &mut SceneWorld, steps: usize) -> SceneCommand {
        let mut last = SceneCommand::None;
        for _ in 0..steps {
            last = scene.update(DT, &frame(), world);
        }
        last
    }

    /// Drags the view so the screen center looks at `target`.
    fn look_at(scene: &mut RoomScene, world: &mut SceneWorld, target: Vec3) {
        let camera = *world.camera();
        let to = target - camera.position;
        let wanted_yaw = (-to.x).atan2(-to.z);
        let wanted_pitch = (to.y / to.length()).asin();
        let yaw_delta = (wanted_yaw - camera.yaw + std::f32::consts::PI)
            .rem_euclid(std::f32::consts::TAU)
            - std::f32::consts::PI;
        let pitch_delta = wanted_pitch - camera.pitch;
        let sensitivity = RoomTuning::default().look_sensitivity;
        let release_at = CENTER - Vec2::new(yaw_delta, pitch_delta) / sensitivity;

        let press = frame()
            .with_cursor_position_px(Some(CENTER))
            .with_pointer_event(PointerEvent::Pressed(PointerButton::Primary));
        assert_eq!(scene.update(DT, &press, world), SceneCommand::None);
        // Sideways detour so even a tiny correction counts as a drag.
        let detour = frame().with_cursor_position_px(Some(CENTER + Vec2::new(200.0, 0.0)));
        scene.update(DT, &detour, world);
        let release = frame()
            .with_cursor_position_px(Some(release_at))
            .with_pointer_event(PointerEvent::Released(PointerButton::Primary));
        assert_eq!(scene.update(DT, &release, world), SceneCommand::None);
    }

    fn click_at(scene: &mut RoomScene, world: &mut SceneWorld, target: Vec3) -> SceneCommand {
        look_at(scene, world, target);
        scene.update(DT, &click_snapshot(CENTER), world)
    }

    fn answer(scene: &mut RoomScene, world: &mut SceneWorld, kind: InteractableKind, text: &str) {
        click_at(scene, world, part_center(kind));
        assert!(session(scene).machine().is_examining(), "{kind:?} dialog");
        let typed = frame().with_typed_text(text).with_submit_pressed(true);
        scene.update(DT, &typed, world);
    }

    fn solve_all_riddles(scene: &mut RoomScene, world: &mut SceneWorld) {
        answer(scene, world, InteractableKind::Manuscript, "Nostos");
        answer(scene, world, InteractableKind::Constellation, "orsa maggiore");
        answer(scene, world, InteractableKind::Labyrinth, " neesenne ");
        answer(scene, world, InteractableKind::Compass, "ovest");
    }

    fn collect_all_feathers(scene: &mut RoomScene, world: &mut SceneWorld) {
        for _ in 0..FEATHER_COUNT * 3 {
            if session(scene).machine().state().wings {
                return;
            }
            let registry = session(scene).registry();
            let next = (0..FEATHER_COUNT).find(|index| {
                registry
                    .entity_for(InteractableKind::Feather { index: *index })
                    .is_some_and(|entity| world.is_entity_active(entity))
            });
            let Some(index) = next else {
                return;
            };
            click_at(scene, world, part_center(InteractableKind::Feather { index }));
            if session(scene).machine().is_examining() {
                scene.update(DT, &frame().with_cancel_pressed(true), world);
            }
        }
    }

    #[test]
    fn room_load_spawns_every_interactable_at_the_doorway() {
        let (scene, world) = loaded_room();
        assert_eq!(world.entity_count(), 5 + FEATHER_COUNT);
        assert_eq!(world.camera().position, Vec3::new(0.0, 1.7, 8.0));
        assert_eq!(world.particles().len(), animation::DUST_PARTICLE_COUNT);

        let hud = scene.hud(&world).expect("hud");
        assert_eq!(hud.top_left[0].text, ROOM_TITLE);
        assert_eq!(hud.progress.len(), PUZZLE_COUNT);
        assert!(hud.banner.is_none());
    }

    #[test]
    fn wasd_moves_view_and_walls_stop_it() {
        let (mut scene, mut world) = loaded_room();
        let forward = snapshot_from_actions(&[InputAction::MoveForward]);
        for _ in 0..60 {
            scene.update(DT, &forward, &mut world);
        }
        assert!((world.camera().position.z - 0.5).abs() < 1.0e-3);

        for _ in 0..600 {
            scene.update(DT, &forward, &mut world);
        }
        assert_eq!(world.camera().position.z, -9.5);
        assert_eq!(world.camera().position.y, 1.7);
    }

    #[test]
    fn hover_switches_cursor_to_pointer() {
        let (mut scene, mut world) = loaded_room();
        look_at(&mut scene, &mut world, part_center(InteractableKind::Constellation));
        let hovering = frame().with_cursor_position_px(Some(CENTER));
        scene.update(DT, &hovering, &mut world);
        assert_eq!(scene.cursor_affordance(), CursorAffordance::Pointer);
        assert_eq!(
            session(&scene).hovered(),
            Some(InteractableKind::Constellation)
        );

        let press = hovering.with_pointer_event(PointerEvent::Pressed(PointerButton::Primary));
        scene.update(DT, &press, &mut world);
        assert_eq!(scene.cursor_affordance(), CursorAffordance::Grabbing);
    }

    #[test]
    fn drag_release_over_object_is_not_a_click() {
        let (mut scene, mut world) = loaded_room();
        look_at(&mut scene, &mut world, part_center(InteractableKind::Constellation));
        let press = frame()
            .with_cursor_position_px(Some(CENTER))
            .with_pointer_event(PointerEvent::Pressed(PointerButton::Primary));
        scene.update(DT, &press, &mut world);
        let wander = frame().with_cursor_position_px(Some(CENTER + Vec2::new(30.0, 0.0)));
        scene.update(DT, &wander, &mut world);
        let release = frame()
            .with_cursor_position_px(Some(CENTER))
            .with_pointer_event(PointerEvent::Released(PointerButton::Primary));
        scene.update(DT, &release, &mut world);

        assert!(!session(&scene).machine().is_examining());
        assert!(session(&scene).machine().notifications().current().is_none());
    }

    #[test]
    fn constellation_then_door_reports_four_remaining() {
        let (mut scene, mut world) = loaded_room();
        answer(
            &mut scene,
            &mut world,
            InteractableKind::Constellation,
            "ORSA MAGGIORE",
        );
        assert!(session(&scene).machine().state().constellation);
        assert!(!session(&scene).machine().is_examining());

        assert_eq!(
            click_at(&mut scene, &mut world, part_center(InteractableKind::Door)),
            SceneCommand::None
        );
        let machine = session(&scene).machine();
        assert!(!machine.escaped());
        assert_eq!(machine.remaining(), 4);
        assert_eq!(
            machine.notifications().current(),
            Some("La porta è sigillata! Mancano 4 enigmi.")
        );
    }

    #[test]
    fn wrong_answer_keeps_dialog_open_and_escape_closes_it() {
        let (mut scene, mut world) = loaded_room();
        answer(&mut scene, &mut world, InteractableKind::Compass, "est");
        let machine = session(&scene).machine();
        assert!(machine.is_examining());
        assert_eq!(machine.examination().expect("open").input_buffer, "est");
        assert_eq!(machine.notifications().current(), Some("❌ Risposta errata!"));
        assert!(!scene.hud(&world).expect("hud").modal.is_empty());

        let backspace = frame().with_backspace_presses(1);
        scene.update(DT, &backspace, &mut world);
        assert_eq!(
            session(&scene).machine().examination().expect("open").input_buffer,
            "es"
        );

        let frozen = world.camera().position;
        let walk = snapshot_from_actions(&[InputAction::MoveForward]);
        scene.update(DT, &walk, &mut world);
        assert_eq!(world.camera().position, frozen);

        scene.update(DT, &frame().with_cancel_pressed(true), &mut world);
        assert!(!session(&scene).machine().is_examining());
        assert!(scene.hud(&world).expect("hud").modal.is_empty());
    }

    #[test]
    fn twelve_feathers_grant_exactly_one_wings_token() {
        let (mut scene, mut world) = loaded_room();
        click_at(
            &mut scene,
            &mut world,
            part_center(InteractableKind::Feather { index: 0 }),
        );
        let hud = scene.hud(&world).expect("hud");
        assert!(hud.top_left.iter().any(|line| line.text == "Piume: 1/12"));

        collect_all_feathers(&mut scene, &mut world);
        let machine = session(&scene).machine();
        assert!(machine.state().wings);
        assert_eq!(machine.feather_count(), FEATHER_COUNT);
        let wings_tokens = machine
            .inventory()
            .items()
            .iter()
            .filter(|item| **item == "Ali di Icaro Complete")
            .count();
        assert_eq!(wings_tokens, 1);
        let active_feathers = world
            .entities()
            .iter()
            .filter(|entity| entity.debug_name == "feather" && entity.active)
            .count();
        assert_eq!(active_feathers, 0);

        let hud = scene.hud(&world).expect("hud");
        assert!(!hud.top_left.iter().any(|line| line.text.starts_with("Piume")));
    }

    #[test]
    fn full_run_escapes_and_victory_settles_at_final_stage() {
        let (mut scene, mut world) = loaded_room();
        solve_all_riddles(&mut scene, &mut world);
        collect_all_feathers(&mut scene, &mut world);
        assert!(session(&scene).machine().all_solved());
        assert_eq!(session(&scene).machine().inventory().len(), PUZZLE_COUNT);

        let command = click_at(&mut scene, &mut world, part_center(InteractableKind::Door));
        assert_eq!(command, SceneCommand::SwitchTo(room_engine::SceneKey::Victory));
        assert!(session(&scene).machine().escaped());
        assert_eq!(session(&scene).victory().stage(), 0);

        advance(&mut scene, &mut world, 5);
        assert_eq!(session(&scene).victory().stage(), 0);
        advance(&mut scene, &mut world, 2);
        assert_eq!(session(&scene).victory().stage(), 1);

        advance(&mut scene, &mut world, 600);
        assert_eq!(session(&scene).victory().stage(), FINAL_STAGE);
        advance(&mut scene, &mut world, 600);
        assert_eq!(session(&scene).victory().stage(), FINAL_STAGE);
        assert_eq!(session(&scene).machine().inventory().len(), PUZZLE_COUNT);
    }

    #[test]
    fn victory_scene_continues_the_sequence_the_door_started() {
        let victory = VictoryHandle::default();
        let mut room = RoomScene::new(RoomTuning::default(), SEED, victory.clone());
        let mut world = SceneWorld::default();
        room.load(&mut world);
        solve_all_riddles(&mut room, &mut world);
        collect_all_feathers(&mut room, &mut world);
        let command = click_at(&mut room, &mut world, part_center(InteractableKind::Door));
        assert_eq!(command, SceneCommand::SwitchTo(room_engine::SceneKey::Victory));
        let escaped_at = victory.get().started_at().expect("started on escape");
        room.unload(&mut world);

        let mut scene = VictoryScene::new(victory.clone());
        let mut world = SceneWorld::default();
        scene.load(&mut world);
        assert_eq!(scene.sequence().started_at(), Some(escaped_at));
        assert_eq!(victory.get().stage(), 0);

        for _ in 0..7 {
            scene.update(DT, &frame(), &mut world);
        }
        assert_eq!(victory.get().stage(), 1);
        for _ in 0..600 {
            scene.update(DT, &frame(), &mut world);
        }
        assert!(victory.get().is_complete());
    }

    #[test]
    fn door_click_outcomes_come_back_in_the_step_report() {
        let mut world = SceneWorld::default();
        let mut room =
            session::RoomSession::new(RoomTuning::default(), SEED, VictoryHandle::default());
        room.populate(&mut world, &RoomLayout::build(SEED));

        let door = part_center(InteractableKind::Door);
        let to = door - world.camera().position;
        let sensitivity = RoomTuning::default().look_sensitivity;
        let yaw = (-to.x).atan2(-to.z);
        let pitch = (to.y / to.length()).asin();
        let drag_to = CENTER - Vec2::new(yaw, pitch) / sensitivity;

        room.step(
            DT,
            &frame()
                .with_cursor_position_px(Some(CENTER))
                .with_pointer_event(PointerEvent::Pressed(PointerButton::Primary)),
            &mut world,
        );
        let drag = room.step(
            DT,
            &frame()
                .with_cursor_position_px(Some(drag_to))
                .with_pointer_event(PointerEvent::Released(PointerButton::Primary)),
            &mut world,
        );
        assert!(drag.clicks.is_empty());

        let click = room.step(DT, &click_snapshot(CENTER), &mut world);
        assert_eq!(
            click.clicks,
            vec![ClickOutcome::Door(DoorOutcome::Locked { remaining: 5 })]
        );
        assert!(!click.escaped_this_step);
    }

    #[test]
    fn feather_outcome_reaches_report_and_secondary_button_never_clicks() {
        let mut world = SceneWorld::default();
        let mut room =
            session::RoomSession::new(RoomTuning::default(), SEED, VictoryHandle::default());
        room.populate(&mut world, &RoomLayout::build(SEED));
        let feather = part_center(InteractableKind::Feather { index: 3 });
        let cursor = room_engine::world_to_screen(feather, world.camera(), input_viewport())
            .expect("feather in view");

        let secondary = frame()
            .with_cursor_position_px(Some(cursor))
            .with_pointer_event(PointerEvent::Pressed(PointerButton::Secondary))
            .with_pointer_event(PointerEvent::Released(PointerButton::Secondary));
        assert!(room.step(DT, &secondary, &mut world).clicks.is_empty());

        let report = room.step(DT, &click_snapshot(cursor), &mut world);
        assert!(matches!(
            report.clicks.as_slice(),
            [ClickOutcome::Feather(FeatherOutcome::Collected { count: 1 })]
        ));
    }

    fn input_viewport() -> room_engine::Viewport {
        frame().viewport()
    }

    #[test]
    fn dump_key_and_unload_leave_no_session_behind() {
        let (mut scene, mut world) = loaded_room();
        scene.update(DT, &frame().with_dump_state_pressed(true), &mut world);
        scene.unload(&mut world);
        assert!(scene.session().is_none());
        assert_eq!(scene.cursor_affordance(), CursorAffordance::Default);
        assert!(scene.hud(&world).is_none());
        assert_eq!(scene.update(DT, &frame(), &mut world), SceneCommand::None);
    }

    #[test]
    fn victory_scene_reaches_stage_one_after_a_tenth_of_a_second() {
        let mut scene = VictoryScene::default();
        let mut world = SceneWorld::default();
        scene.load(&mut world);
        scene.update(0.05, &frame(), &mut world);
        assert_eq!(scene.sequence().stage(), 0);
        scene.update(0.05, &frame(), &mut world);
        assert_eq!(scene.sequence().stage(), 1);
        assert!(scene.hud(&world).expect("hud").modal.is_empty());

        for _ in 0..200 {
            scene.update(0.05, &frame(), &mut world);
        }
        assert_eq!(scene.sequence().stage(), FINAL_STAGE);
        assert_eq!(
            scene.hud(&world).expect("hud").modal[0].text,
            victory::VICTORY_TITLE
        );
    }

    #[test]
    fn scene_pair_starts_with_room_and_victory() {
        let (mut room, mut victory) = build_scene_pair(RoomTuning::default(), ROOM_SEED);
        let mut world = SceneWorld::default();
        room.load(&mut world);
        assert!(room.debug_title(&world).is_some());
        room.unload(&mut world);

        let mut world = SceneWorld::default();
        victory.load(&mut world);
        assert_eq!(victory.cursor_affordance(), CursorAffordance::Default);
    }
