use thiserror::Error;

/// Errors surfaced by grading and bank loading.
///
/// Everything except `Io`/`Json` is a precondition violation: the caller
/// handed the controller data it cannot grade against.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("`{0}` is not an answer label (expected a single letter A-Z)")]
    InvalidLabel(String),

    #[error("question {question} has no option {label}")]
    UnknownOption { question: String, label: char },

    #[error("no question with id {0}")]
    UnknownQuestion(String),

    #[error("question id must not be empty")]
    EmptyQuestionId,

    #[error("invalid question bank: {0}")]
    InvalidBank(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QuizError>;
