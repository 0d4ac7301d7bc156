//! Input plumbing for the player: terminal keys are turned into quiz
//! commands on a reader thread and handed to the UI thread over a channel.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::question::AnswerLabel;

/// What the player can be asked to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Choose(AnswerLabel),
    MoveChoice { forward: bool },
    Check,
    Previous,
    Next,
    NextMistake,
    Restart,
    Quit,
}

impl Command {
    /// Key bindings of the player. Unbound keys map to `None`.
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let command = match key.code {
            KeyCode::Esc => Command::Quit,
            KeyCode::Char('c') if ctrl => Command::Quit,
            KeyCode::Char('r') if ctrl => Command::Restart,
            KeyCode::Char(_) if ctrl => return None,
            KeyCode::Char(c) => Command::Choose(AnswerLabel::new(c).ok()?),
            KeyCode::Up => Command::MoveChoice { forward: false },
            KeyCode::Down => Command::MoveChoice { forward: true },
            KeyCode::Left => Command::Previous,
            KeyCode::Right => Command::Next,
            KeyCode::Tab => Command::NextMistake,
            KeyCode::Enter => Command::Check,
            _ => return None,
        };
        Some(command)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizEvent {
    Command(Command),
    Resize,
    /// No input within one tick.
    Tick,
}

pub trait QuizEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<QuizEvent, RecvTimeoutError>;
}

/// Events arriving over an mpsc channel: from the terminal reader thread, or
/// from a test feeding its own sender.
pub struct ChannelEventSource {
    rx: Receiver<QuizEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<QuizEvent>) -> Self {
        Self { rx }
    }

    /// Spawn a thread reading crossterm events until the receiver is dropped.
    pub fn terminal() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let event = match event::read() {
                // Windows reports releases too; only presses count
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    match Command::from_key(key) {
                        Some(command) => QuizEvent::Command(command),
                        None => continue,
                    }
                }
                Ok(CtEvent::Resize(_, _)) => QuizEvent::Resize,
                Ok(_) => continue,
                Err(_) => break,
            };
            if tx.send(event).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl QuizEventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<QuizEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Pulls one event at a time, turning silence into `Tick`.
pub struct Runner<E: QuizEventSource> {
    source: E,
    tick: Duration,
}

impl<E: QuizEventSource> Runner<E> {
    pub fn new(source: E, tick: Duration) -> Self {
        Self { source, tick }
    }

    pub fn step(&self) -> QuizEvent {
        // a closed channel is treated as endless silence
        self.source
            .recv_timeout(self.tick)
            .unwrap_or(QuizEvent::Tick)
    }
}
