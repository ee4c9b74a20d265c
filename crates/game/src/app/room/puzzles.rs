use serde::Serialize;
use tracing::{debug, info};

use super::notification::NotificationTimer;

pub(crate) const FEATHER_COUNT: usize = 12;
pub(crate) const PUZZLE_COUNT: usize = 5;
/// Longest answer the examination input accepts, in characters.
pub(crate) const MAX_ANSWER_CHARS: usize = 32;

pub(crate) const REJECTED_MESSAGE: &str = "❌ Risposta errata!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PuzzleKey {
    Manuscript,
    Constellation,
    Labyrinth,
    Wings,
    Compass,
}

impl PuzzleKey {
    pub(crate) const ALL: [PuzzleKey; PUZZLE_COUNT] = [
        PuzzleKey::Manuscript,
        PuzzleKey::Constellation,
        PuzzleKey::Labyrinth,
        PuzzleKey::Wings,
        PuzzleKey::Compass,
    ];

    pub(crate) fn reward_token(self) -> &'static str {
        match self {
            PuzzleKey::Manuscript => "Chiave di Bronzo",
            PuzzleKey::Constellation => "Frammento di Mappa",
            PuzzleKey::Labyrinth => "Filo di Arianna",
            PuzzleKey::Wings => "Ali di Icaro Complete",
            PuzzleKey::Compass => "Chiave d'Argento",
        }
    }

    pub(crate) fn success_message(self) -> &'static str {
        match self {
            PuzzleKey::Manuscript => "✓ NOSTOS è corretto!",
            PuzzleKey::Constellation => "✓ Orsa Maggiore corretta!",
            PuzzleKey::Labyrinth => "✓ Percorso corretto!",
            PuzzleKey::Wings => "✨ Tutte le piume raccolte! Le Ali di Icaro sono tue!",
            PuzzleKey::Compass => "✓ Ovest è corretto!",
        }
    }
}

/// Puzzles that are solved by typing an answer. Wings is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum RiddleKey {
    Manuscript,
    Constellation,
    Labyrinth,
    Compass,
}

impl RiddleKey {
    #[cfg(test)]
    pub(crate) const ALL: [RiddleKey; 4] = [
        RiddleKey::Manuscript,
        RiddleKey::Constellation,
        RiddleKey::Labyrinth,
        RiddleKey::Compass,
    ];

    pub(crate) fn puzzle(self) -> PuzzleKey {
        match self {
            RiddleKey::Manuscript => PuzzleKey::Manuscript,
            RiddleKey::Constellation => PuzzleKey::Constellation,
            RiddleKey::Labyrinth => PuzzleKey::Labyrinth,
            RiddleKey::Compass => PuzzleKey::Compass,
        }
    }

    fn accepted_answers(self) -> &'static [&'static str] {
        match self {
            RiddleKey::Manuscript => &["NOSTOS"],
            RiddleKey::Constellation => &["ORSA", "ORSA MAGGIORE", "URSA MAJOR"],
            RiddleKey::Labyrinth => &["NEESENNE"],
            RiddleKey::Compass => &["OVEST", "WEST", "O", "W"],
        }
    }

    pub(crate) fn accepts(self, raw: &str) -> bool {
        let normalized = normalize_answer(raw);
        self.accepted_answers().contains(&normalized.as_str())
    }

    pub(crate) fn title(self) -> &'static str {
        match self {
            RiddleKey::Manuscript => "Manoscritto di Omero",
            RiddleKey::Constellation => "Mappa Stellare",
            RiddleKey::Labyrinth => "Labirinto di Cnosso",
            RiddleKey::Compass => "Bussola di Ulisse",
        }
    }

    pub(crate) fn prompt(self) -> &'static [&'static str] {
        match self {
            RiddleKey::Manuscript => &[
                "Dopo dieci anni di guerra e dieci di mare,",
                "l'eroe sognava il ritornare.",
                "Una parola greca rappresenta questo concetto...",
            ],
            RiddleKey::Constellation => &[
                "I naviganti usavano questa costellazione per orientarsi.",
                "Ha forma di mestolo nel cielo settentrionale.",
            ],
            RiddleKey::Labyrinth => &["Percorso: Nord → Est → Est → Sud → Est → Nord → Nord → Est"],
            RiddleKey::Compass => &[
                "Dove tramonta il sole, dove il Mare Ionio bagna le coste.",
                "In quale direzione si trova Itaca?",
            ],
        }
    }

    pub(crate) fn hint(self) -> &'static str {
        match self {
            RiddleKey::Manuscript => "Il ritorno di Ulisse: _______",
            RiddleKey::Constellation => "_____ Maggiore",
            RiddleKey::Labyrinth => "Scrivi le iniziali: NEESENNE",
            RiddleKey::Compass => "Itaca è a _____ della Grecia",
        }
    }
}

pub(crate) fn normalize_answer(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub(crate) struct PuzzleState {
    pub(crate) manuscript: bool,
    pub(crate) constellation: bool,
    pub(crate) labyrinth: bool,
    pub(crate) wings: bool,
    pub(crate) compass: bool,
}

impl PuzzleState {
    pub(crate) fn is_solved(&self, key: PuzzleKey) -> bool {
        match key {
            PuzzleKey::Manuscript => self.manuscript,
            PuzzleKey::Constellation => self.constellation,
            PuzzleKey::Labyrinth => self.labyrinth,
            PuzzleKey::Wings => self.wings,
            PuzzleKey::Compass => self.compass,
        }
    }

    /// Flags only ever go from false to true. Returns whether this call flipped it.
    fn mark_solved(&mut self, key: PuzzleKey) -> bool {
        let flag = match key {
            PuzzleKey::Manuscript => &mut self.manuscript,
            PuzzleKey::Constellation => &mut self.constellation,
            PuzzleKey::Labyrinth => &mut self.labyrinth,
            PuzzleKey::Wings => &mut self.wings,
            PuzzleKey::Compass => &mut self.compass,
        };
        !std::mem::replace(flag, true)
    }

    pub(crate) fn solved_count(&self) -> usize {
        PuzzleKey::ALL
            .iter()
            .filter(|key| self.is_solved(**key))
            .count()
    }

    pub(crate) fn remaining(&self) -> usize {
        PUZZLE_COUNT - self.solved_count()
    }

    pub(crate) fn all_solved(&self) -> bool {
        self.remaining() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub(crate) struct Inventory {
    items: Vec<&'static str>,
}

impl Inventory {
    fn push(&mut self, token: &'static str) {
        self.items.push(token);
    }

    pub(crate) fn items(&self) -> &[&'static str] {
        &self.items
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Examination {
    pub(crate) riddle: RiddleKey,
    pub(crate) input_buffer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AnswerOutcome {
    Accepted { reward: &'static str },
    Rejected,
    AlreadySolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FeatherOutcome {
    Collected { count: usize },
    WingsCompleted,
    AlreadyCollected,
    WingsAlreadyComplete,
    UnknownFeather,
}

impl FeatherOutcome {
    /// Whether the feather with this outcome should disappear from the room.
    pub(crate) fn removes_feather(self) -> bool {
        matches!(
            self,
            FeatherOutcome::Collected { .. } | FeatherOutcome::WingsCompleted
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DoorOutcome {
    Escaped,
    Locked { remaining: usize },
    AlreadyEscaped,
}

/// Owner of every puzzle flag, the inventory, the feather tally, the
/// examination dialog and the escape flag. All mutation goes through the
/// methods below; each one raises its own notification.
#[derive(Debug, Default)]
pub(crate) struct PuzzleStateMachine {
    state: PuzzleState,
    inventory: Inventory,
    feathers_collected: [bool; FEATHER_COUNT],
    examination: Option<Examination>,
    escaped: bool,
    notifications: NotificationTimer,
}

impl PuzzleStateMachine {
    pub(crate) fn state(&self) -> &PuzzleState {
        &self.state
    }

    pub(crate) fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub(crate) fn feather_count(&self) -> usize {
        self.feathers_collected.iter().filter(|taken| **taken).count()
    }

    pub(crate) fn examination(&self) -> Option<&Examination> {
        self.examination.as_ref()
    }

    pub(crate) fn is_examining(&self) -> bool {
        self.examination.is_some()
    }

    pub(crate) fn escaped(&self) -> bool {
        self.escaped
    }

    pub(crate) fn notifications(&self) -> &NotificationTimer {
        &self.notifications
    }

    pub(crate) fn all_solved(&self) -> bool {
        self.state.all_solved()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.state.remaining()
    }

    pub(crate) fn solved_count(&self) -> usize {
        self.state.solved_count()
    }

    pub(crate) fn tick(&mut self, now: f64) {
        self.notifications.tick(now);
    }

    fn solve(&mut self, key: PuzzleKey, now: f64) -> Option<&'static str> {
        if !self.state.mark_solved(key) {
            return None;
        }
        let reward = key.reward_token();
        self.inventory.push(reward);
        self.notifications.notify(key.success_message(), now);
        info!(
            puzzle = ?key,
            reward,
            solved = self.state.solved_count(),
            "puzzle_solved"
        );
        Some(reward)
    }

    pub(crate) fn submit_answer(&mut self, riddle: RiddleKey, raw: &str, now: f64) -> AnswerOutcome {
        let key = riddle.puzzle();
        if !riddle.accepts(raw) {
            self.notifications.notify(REJECTED_MESSAGE, now);
            info!(puzzle = ?key, "answer_rejected");
            return AnswerOutcome::Rejected;
        }
        self.examination = None;
        match self.solve(key, now) {
            Some(reward) => AnswerOutcome::Accepted { reward },
            None => {
                debug!(puzzle = ?key, "answer_for_solved_puzzle");
                AnswerOutcome::AlreadySolved
            }
        }
    }

    pub(crate) fn collect_feather(&mut self, index: usize, now: f64) -> FeatherOutcome {
        if self.state.wings {
            return FeatherOutcome::WingsAlreadyComplete;
        }
        let Some(slot) = self.feathers_collected.get_mut(index) else {
            return FeatherOutcome::UnknownFeather;
        };
        if std::mem::replace(slot, true) {
            return FeatherOutcome::AlreadyCollected;
        }

        let count = self.feather_count();
        info!(index, count, "feather_collected");
        if count == FEATHER_COUNT {
            self.solve(PuzzleKey::Wings, now);
            FeatherOutcome::WingsCompleted
        } else {
            self.notifications
                .notify(format!("Piuma raccolta! ({count}/{FEATHER_COUNT})"), now);
            FeatherOutcome::Collected { count }
        }
    }

    pub(crate) fn activate_door(&mut self, now: f64) -> DoorOutcome {
        if self.escaped {
            return DoorOutcome::AlreadyEscaped;
        }
        if self.all_solved() {
            self.escaped = true;
            self.examination = None;
            info!("room_escaped");
            return DoorOutcome::Escaped;
        }
        let remaining = self.remaining();
        self.notifications.notify(
            format!("La porta è sigillata! Mancano {remaining} enigmi."),
            now,
        );
        info!(remaining, "door_locked");
        DoorOutcome::Locked { remaining }
    }

    /// Opens the dialog for `riddle` with an empty buffer and announces the
    /// examined object by name.
    pub(crate) fn examine(&mut self, riddle: RiddleKey, display_name: &str, now: f64) {
        self.examination = Some(Examination {
            riddle,
            input_buffer: String::new(),
        });
        self.notifications
            .notify(format!("Esamini: {display_name}"), now);
        debug!(riddle = ?riddle, "examination_opened");
    }

    pub(crate) fn close_examination(&mut self) {
        if self.examination.take().is_some() {
            debug!("examination_closed");
        }
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        let Some(examination) = self.examination.as_mut() else {
            return;
        };
        for ch in text.chars() {
            if examination.input_buffer.chars().count() >= MAX_ANSWER_CHARS {
                break;
            }
            examination.input_buffer.push(ch);
        }
    }

    pub(crate) fn backspace(&mut self, presses: u32) {
        let Some(examination) = self.examination.as_mut() else {
            return;
        };
        for _ in 0..presses {
            if examination.input_buffer.pop().is_none() {
                break;
            }
        }
    }

    /// Submits the open dialog's buffer. `None` when no dialog is open.
    pub(crate) fn submit_examination(&mut self, now: f64) -> Option<AnswerOutcome> {
        let examination = self.examination.as_ref()?;
        let riddle = examination.riddle;
        let answer = examination.input_buffer.clone();
        Some(self.submit_answer(riddle, &answer, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve_all_riddles(machine: &mut PuzzleStateMachine) {
        for (riddle, answer) in [
            (RiddleKey::Manuscript, "nostos"),
            (RiddleKey::Constellation, "Orsa Maggiore"),
            (RiddleKey::Labyrinth, "neesenne"),
            (RiddleKey::Compass, "w"),
        ] {
            assert!(matches!(
                machine.submit_answer(riddle, answer, 0.0),
                AnswerOutcome::Accepted { .. }
            ));
        }
    }

    fn collect_all_feathers(machine: &mut PuzzleStateMachine) {
        for index in 0..FEATHER_COUNT {
            machine.collect_feather(index, 0.0);
        }
    }

    #[test]
    fn normalization_trims_and_uppercases() {
        assert_eq!(normalize_answer("  ursa major \n"), "URSA MAJOR");
        assert!(RiddleKey::Constellation.accepts(" orsa "));
        assert!(RiddleKey::Compass.accepts("Ovest"));
        assert!(!RiddleKey::Compass.accepts("EST"));
        assert!(!RiddleKey::Manuscript.accepts("NOS TOS"));
    }

    #[test]
    fn every_riddle_has_an_accepted_answer_and_dialog_text() {
        for riddle in RiddleKey::ALL {
            assert!(!riddle.accepted_answers().is_empty());
            assert!(!riddle.prompt().is_empty());
            assert!(!riddle.hint().is_empty());
            assert_ne!(riddle.puzzle(), PuzzleKey::Wings);
        }
    }

    #[test]
    fn accepted_answer_appends_token_and_closes_dialog() {
        let mut machine = PuzzleStateMachine::default();
        machine.examine(RiddleKey::Manuscript, "Manoscritto di Omero", 0.0);
        machine.push_text("nostos");

        let outcome = machine.submit_examination(1.0);
        assert_eq!(
            outcome,
            Some(AnswerOutcome::Accepted {
                reward: "Chiave di Bronzo"
            })
        );
        assert!(machine.state().manuscript);
        assert_eq!(machine.inventory().items(), &["Chiave di Bronzo"]);
        assert!(machine.examination().is_none());
        assert_eq!(
            machine.notifications().current(),
            Some("✓ NOSTOS è corretto!")
        );
    }

    #[test]
    fn resubmitting_solved_riddle_never_duplicates_token() {
        let mut machine = PuzzleStateMachine::default();
        machine.submit_answer(RiddleKey::Labyrinth, "NEESENNE", 0.0);
        for _ in 0..3 {
            assert_eq!(
                machine.submit_answer(RiddleKey::Labyrinth, "NEESENNE", 0.0),
                AnswerOutcome::AlreadySolved
            );
        }
        assert_eq!(machine.inventory().len(), 1);
        assert_eq!(machine.solved_count(), 1);
    }

    #[test]
    fn reopened_solved_riddle_closes_on_answer_and_rejects_wrong_text() {
        let mut machine = PuzzleStateMachine::default();
        machine.submit_answer(RiddleKey::Manuscript, "NOSTOS", 0.0);

        machine.examine(RiddleKey::Manuscript, "Manoscritto di Omero", 1.0);
        machine.push_text("nostos");
        assert_eq!(
            machine.submit_examination(1.5),
            Some(AnswerOutcome::AlreadySolved)
        );
        assert!(!machine.is_examining());
        assert_eq!(machine.inventory().items(), &["Chiave di Bronzo"]);

        machine.examine(RiddleKey::Manuscript, "Manoscritto di Omero", 2.0);
        machine.push_text("itaca");
        assert_eq!(machine.submit_examination(2.5), Some(AnswerOutcome::Rejected));
        assert!(machine.is_examining());
        assert_eq!(machine.notifications().current(), Some(REJECTED_MESSAGE));
        assert_eq!(machine.inventory().len(), 1);
    }

    #[test]
    fn rejection_keeps_dialog_and_buffer() {
        let mut machine = PuzzleStateMachine::default();
        machine.examine(RiddleKey::Compass, "Bussola di Ulisse", 0.0);
        machine.push_text("EST");

        assert_eq!(machine.submit_examination(0.5), Some(AnswerOutcome::Rejected));
        let examination = machine.examination().expect("still open");
        assert_eq!(examination.input_buffer, "EST");
        assert_eq!(machine.notifications().current(), Some(REJECTED_MESSAGE));
        assert!(machine.inventory().is_empty());
    }

    #[test]
    fn examine_resets_buffer_and_close_discards_it() {
        let mut machine = PuzzleStateMachine::default();
        machine.examine(RiddleKey::Manuscript, "Manoscritto di Omero", 0.0);
        machine.push_text("abc");
        machine.examine(RiddleKey::Labyrinth, "Labirinto di Cnosso", 0.0);
        assert_eq!(machine.examination().expect("open").input_buffer, "");

        machine.push_text("xy");
        machine.close_examination();
        assert!(!machine.is_examining());
        assert_eq!(machine.submit_examination(0.0), None);
    }

    #[test]
    fn text_editing_is_bounded_and_ignored_without_dialog() {
        let mut machine = PuzzleStateMachine::default();
        machine.push_text("ignored");
        assert!(machine.examination().is_none());

        machine.examine(RiddleKey::Compass, "Bussola di Ulisse", 0.0);
        machine.push_text(&"x".repeat(MAX_ANSWER_CHARS + 10));
        assert_eq!(
            machine.examination().expect("open").input_buffer.chars().count(),
            MAX_ANSWER_CHARS
        );
        machine.backspace(MAX_ANSWER_CHARS as u32 + 5);
        assert_eq!(machine.examination().expect("open").input_buffer, "");
    }

    #[test]
    fn feather_counter_is_monotonic_and_unique() {
        let mut machine = PuzzleStateMachine::default();
        assert_eq!(
            machine.collect_feather(3, 0.0),
            FeatherOutcome::Collected { count: 1 }
        );
        assert_eq!(
            machine.collect_feather(3, 0.0),
            FeatherOutcome::AlreadyCollected
        );
        assert_eq!(
            machine.collect_feather(FEATHER_COUNT, 0.0),
            FeatherOutcome::UnknownFeather
        );
        assert_eq!(machine.feather_count(), 1);
        assert_eq!(
            machine.notifications().current(),
            Some("Piuma raccolta! (1/12)")
        );
    }

    #[test]
    fn twelfth_feather_completes_wings_once() {
        let mut machine = PuzzleStateMachine::default();
        for index in 0..FEATHER_COUNT - 1 {
            assert!(machine.collect_feather(index, 0.0).removes_feather());
        }
        assert!(!machine.state().wings);
        assert_eq!(
            machine.collect_feather(FEATHER_COUNT - 1, 0.0),
            FeatherOutcome::WingsCompleted
        );
        assert!(machine.state().wings);
        assert_eq!(machine.inventory().items(), &["Ali di Icaro Complete"]);
        assert_eq!(
            machine.collect_feather(0, 0.0),
            FeatherOutcome::WingsAlreadyComplete
        );
        assert_eq!(machine.inventory().len(), 1);
    }

    #[test]
    fn door_reports_exact_remaining_count() {
        let mut machine = PuzzleStateMachine::default();
        assert_eq!(
            machine.activate_door(0.0),
            DoorOutcome::Locked { remaining: 5 }
        );
        machine.submit_answer(RiddleKey::Constellation, "ORSA MAGGIORE", 0.0);
        assert_eq!(
            machine.activate_door(0.0),
            DoorOutcome::Locked { remaining: 4 }
        );
        assert_eq!(
            machine.notifications().current(),
            Some("La porta è sigillata! Mancano 4 enigmi.")
        );
        assert!(!machine.escaped());
    }

    #[test]
    fn door_escapes_exactly_once_when_all_solved() {
        let mut machine = PuzzleStateMachine::default();
        solve_all_riddles(&mut machine);
        collect_all_feathers(&mut machine);
        assert!(machine.all_solved());
        assert_eq!(machine.inventory().len(), PUZZLE_COUNT);

        assert_eq!(machine.activate_door(0.0), DoorOutcome::Escaped);
        assert!(machine.escaped());
        assert_eq!(machine.activate_door(0.0), DoorOutcome::AlreadyEscaped);
    }

    #[test]
    fn notifications_expire_through_tick() {
        let mut machine = PuzzleStateMachine::default();
        machine.activate_door(2.0);
        machine.tick(5.9);
        assert!(machine.notifications().current().is_some());
        machine.tick(6.0);
        assert!(machine.notifications().current().is_none());
    }
}
