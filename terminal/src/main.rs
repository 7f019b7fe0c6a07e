use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use common::{GameSettings, InputIntent, PseudoRandom, RoundController, RoundPhase};
use terminal::app::{App, AppCommand};
use terminal::effects::ParticleField;
use terminal::high_score::{default_high_score_path, JsonHighScoreStore};

#[derive(Parser, Debug)]
#[command(name = "snakeduel-terminal")]
#[command(about = "Snake duel against a greedy competitor, in the terminal")]
struct Args {
    /// Seed for the simulation's random source
    #[arg(long)]
    seed: Option<u64>,

    /// Frame rate the round is tuned for
    #[arg(long)]
    fps: Option<u32>,

    /// JSON file with game settings; missing keys use defaults
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Where the high score is stored
    #[arg(long)]
    highscore_file: Option<PathBuf>,

    /// Write logs here (the terminal UI owns stdout)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Let the competitor's policy steer the player too
    #[arg(long)]
    autopilot: bool,

    /// Run without a UI and print the final round snapshot as JSON
    #[arg(long)]
    headless: bool,

    /// Frames to simulate in headless mode
    #[arg(long, default_value = "3600")]
    frames: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref())?;

    let mut settings = load_settings(args.settings.as_deref())?;
    if let Some(fps) = args.fps {
        settings.fps = fps;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let store_path = args.highscore_file.clone().unwrap_or_else(default_high_score_path);
    tracing::info!(seed, high_score_file = ?store_path, "Starting snake duel");

    let fps = settings.fps;
    let round = RoundController::new(
        settings,
        Box::new(PseudoRandom::new(seed)),
        Box::new(JsonHighScoreStore::new(store_path)),
    );
    let mut app = App::new(round, ParticleField::new(fps), args.autopilot || args.headless);

    if args.headless {
        return run_headless(&mut app, args.frames);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut terminal = undo_on_error(setup_terminal, || {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
    })?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("Game loop failed: {err:#}");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

/// Runs `setup`; if it fails, runs `undo` before handing the error back.
fn undo_on_error<T>(setup: impl FnOnce() -> Result<T>, undo: impl FnOnce()) -> Result<T> {
    let result = setup();
    if result.is_err() {
        undo();
    }
    result
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {:?}", path))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .init();
        }
    }
    Ok(())
}

fn load_settings(path: Option<&Path>) -> Result<GameSettings> {
    let Some(path) = path else {
        return Ok(GameSettings::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {:?}", path))?;
    let settings: GameSettings = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings file: {:?}", path))?;
    Ok(settings)
}

fn run_headless(app: &mut App, frames: u32) -> Result<()> {
    app.apply(InputIntent::Start);
    let dt = app.round.settings().frame_dt();

    for _ in 0..frames {
        app.tick(dt);
        if app.round.phase() != RoundPhase::Playing {
            break;
        }
    }

    println!("{}", app.round.snapshot_json()?);
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let frame_budget = Duration::from_secs_f32(app.round.settings().frame_dt());
    let mut last_update = Instant::now();

    loop {
        let now = Instant::now();
        let dt = now.duration_since(last_update);
        last_update = now;

        app.update(dt);

        terminal.draw(|f| app.render(f))?;

        // Poll input for whatever is left of the frame
        let deadline = now + frame_budget;
        while let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
            if !event::poll(remaining)? {
                break;
            }
            if let Event::Key(key) = event::read()? {
                if let Some(AppCommand::Quit) = app.handle_input(key) {
                    return Ok(());
                }
            }
        }
    }
}
