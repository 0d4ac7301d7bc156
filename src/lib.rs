// Library surface for the player binary, headless hosts and integration tests.
pub mod app;
pub mod bank;
pub mod config;
pub mod error;
pub mod grading;
pub mod question;
pub mod render;
pub mod runtime;
pub mod session;
pub mod ui;

pub use error::{QuizError, Result};
pub use grading::{Grading, GradingController, Outcome, SelectionEvent};
pub use question::{AnswerLabel, Question, QuestionId, QuestionSource};
pub use render::ViewRenderer;
pub use session::{SessionState, StatsSnapshot};
