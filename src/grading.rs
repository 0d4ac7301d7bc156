use log::{debug, info, trace};

use crate::error::{QuizError, Result};
use crate::question::{AnswerLabel, Question, QuestionId, QuestionSource};
use crate::render::{Explanation, OptionMark, OptionMarking, Status, ViewRenderer};
use crate::session::{SessionState, StatsSnapshot};

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl Outcome {
    fn status(self) -> Status {
        match self {
            Outcome::Correct => Status::Correct,
            Outcome::Incorrect => Status::Wrong,
        }
    }
}

/// "Selection changed for question X to label Y". `chosen` is `None` (or
/// blank) when the user checked without picking anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionEvent {
    pub question_id: QuestionId,
    pub chosen: Option<String>,
}

impl SelectionEvent {
    pub fn new(question_id: QuestionId, chosen: Option<impl Into<String>>) -> Self {
        Self {
            question_id,
            chosen: chosen.map(Into::into),
        }
    }
}

/// Result of handling one selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Grading {
    Pending,
    Graded {
        outcome: Outcome,
        snapshot: StatsSnapshot,
    },
}

/// Grades selections against the injected session and repaints the views.
#[derive(Debug)]
pub struct GradingController<R: ViewRenderer> {
    session: SessionState,
    renderer: R,
}

impl<R: ViewRenderer> GradingController<R> {
    pub fn new(session: SessionState, renderer: R) -> Self {
        Self { session, renderer }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// First paint before anything has been answered.
    pub fn paint_initial(&mut self) {
        let snapshot = self.session.snapshot();
        self.paint_status(Status::Pending);
        self.paint_statistics(&snapshot);
    }

    /// Throw the ledger away and start over.
    pub fn restart(&mut self) {
        info!("restarting session");
        self.session = SessionState::new();
        self.paint_initial();
    }

    /// Resolve the event's question through `source`, then grade it.
    pub fn handle_event<S: QuestionSource + ?Sized>(
        &mut self,
        source: &S,
        event: &SelectionEvent,
    ) -> Result<Grading> {
        let question = source
            .question(&event.question_id)
            .ok_or_else(|| QuizError::UnknownQuestion(event.question_id.to_string()))?;
        self.handle_selection(question, event.chosen.as_deref())
    }

    pub fn handle_selection(&mut self, question: &Question, chosen: Option<&str>) -> Result<Grading> {
        let chosen = match chosen.map(str::trim) {
            None | Some("") => {
                debug!("question {}: checked without a selection", question.id);
                self.paint_status(Status::Pending);
                self.paint_explanation(&Explanation::Prompt {
                    question_id: question.id.clone(),
                });
                return Ok(Grading::Pending);
            }
            Some(raw) => AnswerLabel::parse(raw)?,
        };
        if !question.has_option(chosen) {
            return Err(QuizError::UnknownOption {
                question: question.id.to_string(),
                label: chosen.as_char(),
            });
        }

        let outcome = if chosen == question.correct {
            Outcome::Correct
        } else {
            Outcome::Incorrect
        };
        let snapshot = self
            .session
            .record_answer(&question.id, outcome == Outcome::Correct);
        debug!(
            "question {}: chose {} (correct {}) -> {:?}, streak {} best {}",
            question.id, chosen, question.correct, outcome, snapshot.streak, snapshot.best
        );

        self.paint_status(outcome.status());
        self.paint_statistics(&snapshot);
        self.paint_explanation(&explain(question, chosen, outcome));
        self.paint_marks(&mark_options(question, chosen, outcome));

        Ok(Grading::Graded { outcome, snapshot })
    }

    fn paint_status(&mut self, status: Status) {
        match self.renderer.status_view() {
            Some(view) => view.set_status(status),
            None => trace!("no status view; skipping"),
        }
    }

    fn paint_statistics(&mut self, snapshot: &StatsSnapshot) {
        match self.renderer.statistics_view() {
            Some(view) => view.set_statistics(snapshot),
            None => trace!("no statistics view; skipping"),
        }
    }

    fn paint_explanation(&mut self, explanation: &Explanation) {
        match self.renderer.explanation_view() {
            Some(view) => view.set_explanation(explanation),
            None => trace!("no explanation view; skipping"),
        }
    }

    fn paint_marks(&mut self, marking: &OptionMarking) {
        match self.renderer.options_view() {
            Some(view) => view.mark_options(marking),
            None => trace!("no options view; skipping"),
        }
    }
}

fn explain(question: &Question, chosen: AnswerLabel, outcome: Outcome) -> Explanation {
    let question_id = question.id.clone();
    match outcome {
        Outcome::Correct => Explanation::Correct { question_id },
        Outcome::Incorrect => Explanation::Incorrect {
            question_id,
            correct: question.correct,
            chosen,
            detail: question
                .explanation
                .as_ref()
                .filter(|text| !text.trim().is_empty())
                .cloned(),
        },
    }
}

/// Correct option is always marked; a wrong pick is marked and every other
/// option dimmed. A right pick dims nothing.
pub fn mark_options(question: &Question, chosen: AnswerLabel, outcome: Outcome) -> OptionMarking {
    let marks = question
        .labels()
        .map(|label| {
            let mark = if label == question.correct {
                OptionMark::Correct
            } else if outcome == Outcome::Correct {
                OptionMark::Plain
            } else if label == chosen {
                OptionMark::Wrong
            } else {
                OptionMark::Dim
            };
            (label, mark)
        })
        .collect();

    OptionMarking {
        question_id: question.id.clone(),
        correct: question.correct,
        chosen,
        is_correct: outcome == Outcome::Correct,
        marks,
    }
}
