use serde::Serialize;
use std::collections::HashMap;

use crate::question::QuestionId;

/// Derived statistics at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Percentage of answered questions whose latest grading was correct.
    pub accuracy: u32,
    pub answered: usize,
    pub correct: usize,
    pub streak: u32,
    pub best: u32,
}

/// `round(100 * correct / answered)` with halves rounded up; 0 when nothing
/// has been answered.
pub fn accuracy_percent(correct: usize, answered: usize) -> u32 {
    if answered == 0 {
        return 0;
    }
    ((200 * correct + answered) / (2 * answered)) as u32
}

/// Grading ledger of one session. Only the grading controller writes to it.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    results: HashMap<QuestionId, bool>,
    // first-answered order, for stable mistake listings
    order: Vec<QuestionId>,
    streak: u32,
    best: u32,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_answer(&mut self, question_id: &QuestionId, is_correct: bool) -> StatsSnapshot {
        if self
            .results
            .insert(question_id.clone(), is_correct)
            .is_none()
        {
            self.order.push(question_id.clone());
        }

        if is_correct {
            self.streak += 1;
            self.best = self.best.max(self.streak);
        } else {
            self.streak = 0;
        }

        self.snapshot()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let answered = self.results.len();
        let correct = self.results.values().filter(|ok| **ok).count();
        StatsSnapshot {
            accuracy: accuracy_percent(correct, answered),
            answered,
            correct,
            streak: self.streak,
            best: self.best,
        }
    }

    /// Latest result for a question, `None` while unanswered.
    pub fn result(&self, question_id: &QuestionId) -> Option<bool> {
        self.results.get(question_id).copied()
    }

    /// Questions whose latest grading was incorrect, in first-answered order.
    pub fn mistakes(&self) -> Vec<QuestionId> {
        self.order
            .iter()
            .filter(|id| self.results.get(*id) == Some(&false))
            .cloned()
            .collect()
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn best(&self) -> u32 {
        self.best
    }
}
