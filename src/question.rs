use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{QuizError, Result};

/// A single option letter, always uppercase `A`-`Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct AnswerLabel(char);

impl AnswerLabel {
    pub fn new(c: char) -> Result<Self> {
        let upper = c.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            Ok(Self(upper))
        } else {
            Err(QuizError::InvalidLabel(c.to_string()))
        }
    }

    /// Parse a label from user or bank input; surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Result<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::new(c),
            _ => Err(QuizError::InvalidLabel(s.to_string())),
        }
    }

    /// Label of the option at `idx` (0 -> A).
    pub fn from_index(idx: usize) -> Result<Self> {
        if idx < 26 {
            Ok(Self((b'A' + idx as u8) as char))
        } else {
            Err(QuizError::InvalidLabel(format!("#{idx}")))
        }
    }

    pub fn as_char(&self) -> char {
        self.0
    }
}

impl TryFrom<char> for AnswerLabel {
    type Error = QuizError;

    fn try_from(c: char) -> Result<Self> {
        Self::new(c)
    }
}

impl From<AnswerLabel> for char {
    fn from(label: AnswerLabel) -> char {
        label.0
    }
}

impl fmt::Display for AnswerLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(QuizError::EmptyQuestionId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for QuestionId {
    type Error = QuizError;

    fn try_from(id: String) -> Result<Self> {
        Self::new(id)
    }
}

impl From<QuestionId> for String {
    fn from(id: QuestionId) -> String {
        id.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerOption {
    pub label: AnswerLabel,
    pub text: String,
}

/// A single-choice question as handed to the grading controller.
///
/// Built by [`Question::new`] or the bank loader, both of which check that
/// the correct label names an option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub id: QuestionId,
    pub stem: String,
    pub options: Vec<AnswerOption>,
    pub correct: AnswerLabel,
    pub explanation: Option<String>,
    pub topic: Option<String>,
    pub model: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
}

impl Question {
    /// Minimal question with options `A..=last` and no text; handy for hosts
    /// that only need grading.
    pub fn new(id: &str, correct: char, option_count: usize) -> Result<Self> {
        let options = (0..option_count)
            .map(|i| {
                AnswerLabel::from_index(i).map(|label| AnswerOption {
                    label,
                    text: String::new(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let question = Self {
            id: QuestionId::new(id)?,
            stem: String::new(),
            options,
            correct: AnswerLabel::new(correct)?,
            explanation: None,
            topic: None,
            model: None,
            category: None,
            difficulty: None,
        };
        question.check_correct()?;
        Ok(question)
    }

    pub fn with_explanation(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.explanation = if text.trim().is_empty() { None } else { Some(text) };
        self
    }

    pub fn with_stem(mut self, stem: impl Into<String>) -> Self {
        self.stem = stem.into();
        self
    }

    pub fn has_option(&self, label: AnswerLabel) -> bool {
        self.options.iter().any(|o| o.label == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = AnswerLabel> + '_ {
        self.options.iter().map(|o| o.label)
    }

    /// The correct label must name one of the options.
    pub(crate) fn check_correct(&self) -> Result<()> {
        if self.has_option(self.correct) {
            Ok(())
        } else {
            Err(QuizError::UnknownOption {
                question: self.id.to_string(),
                label: self.correct.as_char(),
            })
        }
    }
}

/// Read-only access to the questions of a session.
pub trait QuestionSource {
    fn questions(&self) -> &[Question];

    fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions().iter().find(|q| &q.id == id)
    }
}

impl QuestionSource for Vec<Question> {
    fn questions(&self) -> &[Question] {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn label_parse_normalizes_case_and_whitespace() {
        assert_eq!(AnswerLabel::parse(" b ").unwrap().as_char(), 'B');
        assert_eq!(AnswerLabel::parse("C").unwrap().to_string(), "C");
    }

    #[test]
    fn label_parse_rejects_garbage() {
        assert_matches!(AnswerLabel::parse(""), Err(QuizError::InvalidLabel(_)));
        assert_matches!(AnswerLabel::parse("AB"), Err(QuizError::InvalidLabel(_)));
        assert_matches!(AnswerLabel::parse("3"), Err(QuizError::InvalidLabel(_)));
        assert_matches!(AnswerLabel::new('é'), Err(QuizError::InvalidLabel(_)));
    }

    #[test]
    fn label_from_index() {
        assert_eq!(AnswerLabel::from_index(0).unwrap().as_char(), 'A');
        assert_eq!(AnswerLabel::from_index(25).unwrap().as_char(), 'Z');
        assert!(AnswerLabel::from_index(26).is_err());
    }

    #[test]
    fn deserialized_labels_and_ids_are_validated() {
        let label: AnswerLabel = serde_json::from_str("\"b\"").unwrap();
        assert_eq!(label.as_char(), 'B');
        assert!(serde_json::from_str::<AnswerLabel>("\"7\"").is_err());
        assert_eq!(serde_json::to_string(&label).unwrap(), "\"B\"");

        assert!(serde_json::from_str::<QuestionId>("\"\"").is_err());
        let id: QuestionId = serde_json::from_str("\"fsa-1\"").unwrap();
        assert_eq!(id.as_str(), "fsa-1");
    }

    #[test]
    fn lowercase_label_from_json_grades_against_options() {
        let correct: AnswerLabel = serde_json::from_str("\"b\"").unwrap();
        let q = Question::new("q1", 'A', 2).unwrap();
        assert!(q.has_option(correct));
    }

    #[test]
    fn empty_question_id_is_rejected() {
        assert_matches!(QuestionId::new("  "), Err(QuizError::EmptyQuestionId));
        assert_matches!(Question::new("", 'A', 4), Err(QuizError::EmptyQuestionId));
    }

    #[test]
    fn correct_label_must_be_an_option() {
        assert_matches!(
            Question::new("q1", 'E', 4),
            Err(QuizError::UnknownOption { label: 'E', .. })
        );
    }

    #[test]
    fn blank_explanation_is_dropped() {
        let q = Question::new("q1", 'A', 2).unwrap().with_explanation("   ");
        assert_eq!(q.explanation, None);
    }

    #[test]
    fn source_lookup_by_id() {
        let bank = vec![
            Question::new("q1", 'A', 2).unwrap(),
            Question::new("q2", 'B', 2).unwrap(),
        ];
        let id = QuestionId::new("q2").unwrap();
        assert_eq!(bank.question(&id).map(|q| q.correct.as_char()), Some('B'));
        assert!(bank.question(&QuestionId::new("q9").unwrap()).is_none());
    }
}
