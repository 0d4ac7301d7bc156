use crossterm::event::KeyEvent;
use log::warn;
use std::collections::HashMap;

use crate::bank::QuestionBank;
use crate::config::Config;
use crate::grading::{Grading, GradingController, SelectionEvent};
use crate::question::{AnswerLabel, Question, QuestionId, QuestionSource};
use crate::render::{
    Explanation, ExplanationView, OptionMarking, OptionsView, StatisticsView, Status, StatusView,
    ViewRenderer,
};
use crate::runtime::Command;
use crate::session::{SessionState, StatsSnapshot};

/// Last painted state of every view, read back by the terminal UI.
#[derive(Debug, Clone)]
pub struct Board {
    pub status: Status,
    pub stats: StatsSnapshot,
    explanations: HashMap<QuestionId, Explanation>,
    markings: HashMap<QuestionId, OptionMarking>,
    show_explanations: bool,
}

impl Board {
    pub fn new(show_explanations: bool) -> Self {
        Self {
            status: Status::Pending,
            stats: StatsSnapshot::default(),
            explanations: HashMap::new(),
            markings: HashMap::new(),
            show_explanations,
        }
    }

    pub fn explanation(&self, id: &QuestionId) -> Option<&Explanation> {
        self.explanations.get(id)
    }

    pub fn marking(&self, id: &QuestionId) -> Option<&OptionMarking> {
        self.markings.get(id)
    }

    pub fn shows_explanations(&self) -> bool {
        self.show_explanations
    }

    pub fn clear(&mut self) {
        self.explanations.clear();
        self.markings.clear();
    }
}

impl StatusView for Board {
    fn set_status(&mut self, status: Status) {
        self.status = status;
    }
}

impl StatisticsView for Board {
    fn set_statistics(&mut self, stats: &StatsSnapshot) {
        self.stats = *stats;
    }
}

impl ExplanationView for Board {
    fn set_explanation(&mut self, explanation: &Explanation) {
        self.explanations
            .insert(explanation.question_id().clone(), explanation.clone());
    }
}

impl OptionsView for Board {
    fn mark_options(&mut self, marking: &OptionMarking) {
        self.markings
            .insert(marking.question_id.clone(), marking.clone());
    }
}

impl ViewRenderer for Board {
    fn status_view(&mut self) -> Option<&mut dyn StatusView> {
        Some(self)
    }

    fn statistics_view(&mut self) -> Option<&mut dyn StatisticsView> {
        Some(self)
    }

    fn explanation_view(&mut self) -> Option<&mut dyn ExplanationView> {
        if self.show_explanations {
            Some(self)
        } else {
            None
        }
    }

    fn options_view(&mut self) -> Option<&mut dyn OptionsView> {
        Some(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

/// Interactive player state: one bank, one grading session.
#[derive(Debug)]
pub struct App {
    pub bank: QuestionBank,
    pub controller: GradingController<Board>,
    pub current: usize,
    pub last_error: Option<String>,
    chosen: Vec<Option<AnswerLabel>>,
    config: Config,
}

impl App {
    pub fn new(bank: QuestionBank, config: Config) -> Self {
        let bank = if config.shuffle_questions {
            bank.shuffled(&mut rand::thread_rng())
        } else {
            bank
        };
        let mut controller =
            GradingController::new(SessionState::new(), Board::new(config.show_explanations));
        controller.paint_initial();

        Self {
            chosen: vec![None; bank.len()],
            bank,
            controller,
            current: 0,
            last_error: None,
            config,
        }
    }

    pub fn board(&self) -> &Board {
        self.controller.renderer()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.controller.session().snapshot()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.bank.get(self.current)
    }

    /// Option currently picked (not yet checked) for the shown question.
    pub fn chosen(&self) -> Option<AnswerLabel> {
        self.chosen.get(self.current).copied().flatten()
    }

    pub fn choose(&mut self, label: AnswerLabel) {
        let Some(question) = self.current_question() else {
            return;
        };
        if question.has_option(label) {
            self.chosen[self.current] = Some(label);
        }
    }

    pub fn move_choice(&mut self, forward: bool) {
        let Some(question) = self.current_question() else {
            return;
        };
        let labels: Vec<AnswerLabel> = question.labels().collect();
        let pos = self
            .chosen()
            .and_then(|c| labels.iter().position(|l| *l == c));
        let next = match (pos, forward) {
            (None, true) => 0,
            (None, false) => labels.len() - 1,
            (Some(p), true) => (p + 1) % labels.len(),
            (Some(p), false) => (p + labels.len() - 1) % labels.len(),
        };
        self.chosen[self.current] = Some(labels[next]);
    }

    /// Grade the shown question with whatever is picked (possibly nothing).
    pub fn check(&mut self) -> Option<Grading> {
        let question = self.current_question()?;
        let event = SelectionEvent {
            question_id: question.id.clone(),
            chosen: self.chosen().map(|l| l.to_string()),
        };
        match self.controller.handle_event(&self.bank, &event) {
            Ok(grading) => {
                self.last_error = None;
                Some(grading)
            }
            Err(e) => {
                warn!("grading failed: {e}");
                self.last_error = Some(e.to_string());
                None
            }
        }
    }

    pub fn next_question(&mut self) {
        if self.current + 1 < self.bank.len() {
            self.current += 1;
        }
    }

    pub fn previous_question(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    /// Jump to the next question (after the shown one, wrapping) whose
    /// latest grading was wrong.
    pub fn next_mistake(&mut self) -> bool {
        let mistakes = self.controller.session().mistakes();
        let positions: Vec<usize> = mistakes
            .iter()
            .filter_map(|id| self.bank.position(id))
            .collect();
        let target = positions
            .iter()
            .copied()
            .filter(|p| *p > self.current)
            .min()
            .or_else(|| positions.iter().copied().min());
        match target {
            Some(p) => {
                self.current = p;
                true
            }
            None => false,
        }
    }

    /// Fresh session over the same bank, reshuffled when configured.
    pub fn restart(&mut self) {
        if self.config.shuffle_questions {
            let bank = std::mem::take(&mut self.bank);
            self.bank = bank.shuffled(&mut rand::thread_rng());
        }
        self.chosen = vec![None; self.bank.len()];
        self.current = 0;
        self.last_error = None;
        self.controller.renderer_mut().clear();
        self.controller.restart();
    }

    pub fn apply(&mut self, command: Command) -> AppAction {
        match command {
            Command::Quit => return AppAction::Quit,
            Command::Restart => self.restart(),
            Command::MoveChoice { forward } => self.move_choice(forward),
            Command::Previous => self.previous_question(),
            Command::Next => self.next_question(),
            Command::NextMistake => {
                self.next_mistake();
            }
            Command::Check => {
                self.check();
            }
            Command::Choose(label) => self.choose(label),
        }
        AppAction::Continue
    }

    pub fn on_key(&mut self, key: KeyEvent) -> AppAction {
        match Command::from_key(key) {
            Some(command) => self.apply(command),
            None => AppAction::Continue,
        }
    }

    pub fn answered_state(&self, idx: usize) -> Option<bool> {
        let question = self.bank.questions().get(idx)?;
        self.controller.session().result(&question.id)
    }
}
