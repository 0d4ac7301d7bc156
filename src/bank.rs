//! Question banks: JSON files of single-choice questions.
//!
//! The loader is lenient about shape (several key aliases, options as a list
//! or a labelled map, answers as a letter or an index) but strict about the
//! one thing grading needs: every question must resolve to a correct option.

use include_dir::{include_dir, Dir};
use itertools::Itertools;
use log::info;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{QuizError, Result};
use crate::question::{AnswerLabel, AnswerOption, Question, QuestionId, QuestionSource};

static BANKS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/banks");

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionBank {
    pub name: String,
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(name: impl Into<String>, questions: Vec<Question>) -> Result<Self> {
        let mut seen = HashSet::new();
        for q in &questions {
            if !seen.insert(&q.id) {
                return Err(QuizError::InvalidBank(format!("duplicate question id {}", q.id)));
            }
        }
        Ok(Self {
            name: name.into(),
            questions,
        })
    }

    pub fn from_json_str(name: &str, json: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(json)?;
        let questions = normalize_questions(&raw)?;
        Self::new(name, questions)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bank".to_string());
        let text = fs::read_to_string(path)?;
        let bank = Self::from_json_str(&name, &text)?;
        info!("loaded {} questions from {}", bank.len(), path.display());
        Ok(bank)
    }

    /// A bank compiled into the binary, by file stem.
    pub fn embedded(name: &str) -> Result<Self> {
        let file = BANKS_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| QuizError::InvalidBank(format!("no embedded bank named {name}")))?;
        let text = file
            .contents_utf8()
            .ok_or_else(|| QuizError::InvalidBank(format!("embedded bank {name} is not UTF-8")))?;
        Self::from_json_str(name, text)
    }

    pub fn embedded_names() -> Vec<String> {
        BANKS_DIR
            .files()
            .filter_map(|f| f.path().file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .sorted()
            .collect()
    }

    /// Resolve a CLI argument: an existing path wins, otherwise an embedded name.
    pub fn resolve(arg: &str) -> Result<Self> {
        let path = Path::new(arg);
        if path.is_file() {
            Self::load(path)
        } else {
            Self::embedded(arg)
        }
    }

    pub fn shuffled<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.questions.shuffle(rng);
        self
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Question> {
        self.questions.get(idx)
    }

    pub fn position(&self, id: &QuestionId) -> Option<usize> {
        self.questions.iter().position(|q| &q.id == id)
    }
}

impl QuestionSource for QuestionBank {
    fn questions(&self) -> &[Question] {
        &self.questions
    }
}

const WRAPPER_KEYS: &[&str] = &["questions", "items", "data"];

/// Accept either a list of questions or an object wrapping one under
/// `questions`, `items` or `data`.
pub fn normalize_questions(raw: &Value) -> Result<Vec<Question>> {
    let list = match raw {
        Value::Array(items) => items,
        Value::Object(obj) => match first(obj, WRAPPER_KEYS) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(QuizError::InvalidBank(
                    "expected a list or an object with a `questions`, `items` or `data` list"
                        .into(),
                ))
            }
        },
        _ => return Err(QuizError::InvalidBank("expected a list of questions".into())),
    };

    list.iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::Object(obj) => normalize_question(idx, obj),
            _ => Err(QuizError::InvalidBank(format!("question #{} is not an object", idx + 1))),
        })
        .collect()
}

fn first<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    let text = match first(obj, keys)? {
        Value::String(s) => fix_mojibake(s),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    Some(text).filter(|s| !s.trim().is_empty())
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => fix_mojibake(s),
        other => other.to_string(),
    }
}

fn normalize_question(idx: usize, obj: &Map<String, Value>) -> Result<Question> {
    let id = text_field(obj, &["id", "qid"]).unwrap_or_else(|| format!("q{}", idx + 1));
    let id = QuestionId::new(id)?;

    let options = match first(obj, &["options", "choices"]) {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, v)| {
                Ok(AnswerOption {
                    label: AnswerLabel::from_index(i)?,
                    text: value_text(v),
                })
            })
            .collect::<Result<Vec<_>>>()?,
        Some(Value::Object(map)) => map
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(k, v)| {
                Ok(AnswerOption {
                    label: AnswerLabel::parse(k)?,
                    text: value_text(v),
                })
            })
            .collect::<Result<Vec<_>>>()?,
        _ => Vec::new(),
    };
    if options.is_empty() {
        return Err(QuizError::InvalidBank(format!("question {id} has no options")));
    }
    // map keys "a" and "A" both parse to A
    let mut labels = HashSet::new();
    if let Some(dup) = options.iter().find(|o| !labels.insert(o.label)) {
        return Err(QuizError::InvalidBank(format!(
            "question {id}: option {} given twice",
            dup.label
        )));
    }

    let answer = first(obj, &["correct_answer", "answer_letter", "answer", "answerIndex"]);
    let correct = match answer {
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|i| options.get(i as usize))
            .map(|o| o.label)
            .ok_or_else(|| {
                QuizError::InvalidBank(format!("question {id}: answer index {n} out of range"))
            })?,
        Some(Value::String(s)) => {
            let s = s.trim();
            AnswerLabel::parse(s.strip_suffix('.').unwrap_or(s))?
        }
        _ => return Err(QuizError::InvalidBank(format!("question {id} has no answer"))),
    };

    let question = Question {
        stem: text_field(obj, &["stem", "text", "question", "q"]).unwrap_or_default(),
        options,
        correct,
        explanation: text_field(obj, &["explanation", "explanations", "rationale"]),
        topic: text_field(obj, &["topic"]),
        model: text_field(obj, &["model"]),
        category: text_field(obj, &["category"]),
        difficulty: text_field(obj, &["difficulty"]),
        id,
    };
    question.check_correct()?;
    Ok(question)
}

/// Undo UTF-8 text that was decoded as Latin-1 somewhere upstream
/// (`â\u{80}\u{99}` for `’`). Text that does not decode cleanly is returned as is.
pub fn fix_mojibake(s: &str) -> String {
    if !(s.contains('â') || s.contains('\u{FFFD}')) {
        return s.to_string();
    }
    // chars outside Latin-1 can't come from this kind of damage; drop them
    let bytes: Vec<u8> = s
        .chars()
        .filter_map(|c| u8::try_from(u32::from(c)).ok())
        .collect();
    match String::from_utf8(bytes) {
        Ok(fixed) if !fixed.is_empty() && fixed != s => fixed,
        _ => s.to_string(),
    }
}
