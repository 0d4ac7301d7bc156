use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use quizmark::app::{App, AppAction};
use quizmark::bank::QuestionBank;
use quizmark::config::Config;
use quizmark::render::Status;
use quizmark::runtime::{ChannelEventSource, Command, QuizEvent, Runner};

fn ordered_sample() -> App {
    App::new(
        QuestionBank::embedded("sample").unwrap(),
        Config {
            shuffle_questions: false,
            show_explanations: true,
        },
    )
}

// keys go through the same binding table as the terminal reader thread
fn key(code: KeyCode) -> QuizEvent {
    let command = Command::from_key(KeyEvent::new(code, KeyModifiers::NONE))
        .expect("bound key");
    QuizEvent::Command(command)
}

/// Drive a tiny event loop until quit (or bounded steps).
fn drive(app: &mut App, events: Vec<QuizEvent>) {
    let (tx, rx) = mpsc::channel();
    for ev in events {
        tx.send(ev).unwrap();
    }
    let runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(5));

    for _ in 0..100u32 {
        match runner.step() {
            QuizEvent::Tick | QuizEvent::Resize => {}
            QuizEvent::Command(command) => {
                if app.apply(command) == AppAction::Quit {
                    break;
                }
            }
        }
    }
}

#[test]
fn headless_answers_whole_bank_correctly() {
    let mut app = ordered_sample();
    let mut events = Vec::new();
    let answers: Vec<char> = (0..app.bank.len())
        .map(|i| app.bank.get(i).unwrap().correct.as_char())
        .collect();
    for c in &answers {
        events.push(key(KeyCode::Char(c.to_ascii_lowercase())));
        events.push(key(KeyCode::Enter));
        events.push(key(KeyCode::Right));
    }
    events.push(key(KeyCode::Esc));

    drive(&mut app, events);

    let stats = app.stats();
    assert_eq!(stats.answered, answers.len());
    assert_eq!(stats.accuracy, 100);
    assert_eq!(stats.streak as usize, answers.len());
    assert_eq!(app.board().stats, stats);
    assert_eq!(app.board().status, Status::Correct);
}

#[test]
fn headless_mistake_then_retry() {
    let mut app = ordered_sample();
    // first sample question is B; pick the option above it, then fix it
    drive(
        &mut app,
        vec![
            key(KeyCode::Enter),
            key(KeyCode::Char('a')),
            key(KeyCode::Enter),
            key(KeyCode::Right),
            key(KeyCode::Tab),
            key(KeyCode::Down),
            key(KeyCode::Enter),
            key(KeyCode::Esc),
        ],
    );

    assert_eq!(app.current, 0);
    let stats = app.stats();
    assert_eq!(stats.answered, 1);
    assert_eq!(stats.correct, 1);
    assert_eq!(stats.streak, 1);
    assert_eq!(stats.best, 1);
    assert!(app.controller.session().mistakes().is_empty());
}
