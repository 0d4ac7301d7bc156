use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::info;
use quizmark::{
    app::{App, AppAction},
    bank::QuestionBank,
    config::{ConfigStore, FileConfigStore},
    runtime::{ChannelEventSource, QuizEvent, QuizEventSource, Runner},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

const TICK_RATE_MS: u64 = 250;

/// single-choice quiz player with live grading and streaks
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Plays a bank of single-choice questions in the terminal, grading each answer as you check it and tracking accuracy and streaks for the session."
)]
pub struct Cli {
    /// question bank: a JSON file, or the name of a built-in bank
    #[clap(default_value = "sample")]
    bank: String,

    /// keep the bank's question order
    #[clap(long)]
    no_shuffle: bool,

    /// don't show explanations after grading
    #[clap(long)]
    hide_explanations: bool,

    /// list the built-in banks and exit
    #[clap(long)]
    list: bool,

    /// remember the effective options for next time
    #[clap(long)]
    save_config: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    if cli.list {
        for name in QuestionBank::embedded_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let store = FileConfigStore::new();
    let config = store
        .load()
        .with_overrides(cli.no_shuffle, cli.hide_explanations);
    if cli.save_config {
        store.save(&config)?;
        info!("saved config to {}", store.path().display());
    }

    let bank = match QuestionBank::resolve(&cli.bank) {
        Ok(bank) => bank,
        Err(e) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, format!("{}: {e}", cli.bank))
                .exit();
        }
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(bank, config);
    let runner = Runner::new(
        ChannelEventSource::terminal(),
        Duration::from_millis(TICK_RATE_MS),
    );
    let res = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend, E: QuizEventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            // nothing animates; ticks only keep the loop responsive
            QuizEvent::Tick => continue,
            QuizEvent::Resize => {}
            QuizEvent::Command(command) => {
                if app.apply(command) == AppAction::Quit {
                    break;
                }
            }
        }
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    let stats = app.stats();
    info!(
        "session over: {} answered, {}% accuracy, best streak {}",
        stats.answered, stats.accuracy, stats.best
    );
    Ok(())
}
