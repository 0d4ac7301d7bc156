//! View sinks the grading controller paints into.
//!
//! A host implements [`ViewRenderer`] and hands out whichever sinks it
//! actually has; the controller skips the rest.

use serde::Serialize;
use strum_macros::Display;

use crate::question::{AnswerLabel, QuestionId};
use crate::session::StatsSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Status {
    Pending,
    Correct,
    Wrong,
}

/// Feedback text for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Explanation {
    /// Check was pressed without choosing anything.
    Prompt { question_id: QuestionId },
    Correct { question_id: QuestionId },
    Incorrect {
        question_id: QuestionId,
        correct: AnswerLabel,
        chosen: AnswerLabel,
        detail: Option<String>,
    },
}

impl Explanation {
    pub fn question_id(&self) -> &QuestionId {
        match self {
            Explanation::Prompt { question_id }
            | Explanation::Correct { question_id }
            | Explanation::Incorrect { question_id, .. } => question_id,
        }
    }

    pub fn is_correct(&self) -> bool {
        matches!(self, Explanation::Correct { .. })
    }

    /// Plain-text rendering used by the terminal player.
    pub fn message(&self) -> String {
        match self {
            Explanation::Prompt { .. } => "Select an answer, then check it.".to_string(),
            Explanation::Correct { .. } => "Correct!".to_string(),
            Explanation::Incorrect {
                correct,
                chosen,
                detail,
                ..
            } => match detail {
                Some(text) => format!("You chose {chosen}. Correct answer: {correct}. {text}"),
                None => format!("You chose {chosen}. Correct answer: {correct}."),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OptionMark {
    Plain,
    Correct,
    Wrong,
    Dim,
}

/// Marks for every option of one graded question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionMarking {
    pub question_id: QuestionId,
    pub correct: AnswerLabel,
    pub chosen: AnswerLabel,
    pub is_correct: bool,
    pub marks: Vec<(AnswerLabel, OptionMark)>,
}

impl OptionMarking {
    pub fn mark(&self, label: AnswerLabel) -> OptionMark {
        self.marks
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, m)| *m)
            .unwrap_or(OptionMark::Plain)
    }
}

pub trait StatusView {
    fn set_status(&mut self, status: Status);
}

pub trait StatisticsView {
    fn set_statistics(&mut self, stats: &StatsSnapshot);
}

pub trait ExplanationView {
    fn set_explanation(&mut self, explanation: &Explanation);
}

pub trait OptionsView {
    fn mark_options(&mut self, marking: &OptionMarking);
}

/// Capability set of a host. Every accessor defaults to "not available".
pub trait ViewRenderer {
    fn status_view(&mut self) -> Option<&mut dyn StatusView> {
        None
    }

    fn statistics_view(&mut self) -> Option<&mut dyn StatisticsView> {
        None
    }

    fn explanation_view(&mut self) -> Option<&mut dyn ExplanationView> {
        None
    }

    fn options_view(&mut self) -> Option<&mut dyn OptionsView> {
        None
    }
}

/// A renderer that paints nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl ViewRenderer for NullRenderer {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    Status(Status),
    Statistics(StatsSnapshot),
    Explanation(Explanation),
    Options(OptionMarking),
}

/// Records every update in call order. Used by tests and headless hosts.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    pub updates: Vec<ViewUpdate>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_status(&self) -> Option<Status> {
        self.updates.iter().rev().find_map(|u| match u {
            ViewUpdate::Status(s) => Some(*s),
            _ => None,
        })
    }

    pub fn last_statistics(&self) -> Option<StatsSnapshot> {
        self.updates.iter().rev().find_map(|u| match u {
            ViewUpdate::Statistics(s) => Some(*s),
            _ => None,
        })
    }

    pub fn last_explanation(&self) -> Option<&Explanation> {
        self.updates.iter().rev().find_map(|u| match u {
            ViewUpdate::Explanation(e) => Some(e),
            _ => None,
        })
    }

    pub fn last_marking(&self) -> Option<&OptionMarking> {
        self.updates.iter().rev().find_map(|u| match u {
            ViewUpdate::Options(m) => Some(m),
            _ => None,
        })
    }
}

impl StatusView for RecordingRenderer {
    fn set_status(&mut self, status: Status) {
        self.updates.push(ViewUpdate::Status(status));
    }
}

impl StatisticsView for RecordingRenderer {
    fn set_statistics(&mut self, stats: &StatsSnapshot) {
        self.updates.push(ViewUpdate::Statistics(*stats));
    }
}

impl ExplanationView for RecordingRenderer {
    fn set_explanation(&mut self, explanation: &Explanation) {
        self.updates.push(ViewUpdate::Explanation(explanation.clone()));
    }
}

impl OptionsView for RecordingRenderer {
    fn mark_options(&mut self, marking: &OptionMarking) {
        self.updates.push(ViewUpdate::Options(marking.clone()));
    }
}

impl ViewRenderer for RecordingRenderer {
    fn status_view(&mut self) -> Option<&mut dyn StatusView> {
        Some(self)
    }

    fn statistics_view(&mut self) -> Option<&mut dyn StatisticsView> {
        Some(self)
    }

    fn explanation_view(&mut self) -> Option<&mut dyn ExplanationView> {
        Some(self)
    }

    fn options_view(&mut self) -> Option<&mut dyn OptionsView> {
        Some(self)
    }
}
