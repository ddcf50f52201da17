mod commands;
mod render;

use anyhow::Context;
use clap::Parser;
use commands::{parse_command, Command, HELP};
use orchard_core::{Catalog, Event, EventBus, GameConfig, Locale, Phase, RunError, RunState};
use orchard_data::{load_assets, locale_from_code};
use render::{format_event, render_board, render_inventory, render_status, text};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_RUN_SEED: u64 = 0xF2_017;

#[derive(Parser, Debug)]
#[command(name = "orchard")]
#[command(about = "Turn-based fruit grid puzzle in the terminal")]
struct Cli {
    #[arg(long, help = "Run seed")]
    seed: Option<u64>,

    #[arg(long, default_value = "assets", help = "Directory holding config.json and symbols.json")]
    assets: PathBuf,

    #[arg(long, help = "Use the built-in catalog and defaults, ignoring --assets")]
    builtin: bool,

    #[arg(long, help = "Display locale (en, es)")]
    locale: Option<String>,

    #[arg(long, value_name = "TURNS", help = "Autoplay up to TURNS turns and print a summary")]
    auto: Option<u32>,

    #[arg(long, help = "Output events as JSON lines")]
    json: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct Outcome {
    day: u32,
    score: i64,
    goal: i64,
}

#[derive(Debug, Serialize)]
struct AutoSummary {
    seed: u64,
    turns_played: u32,
    days_cleared: u32,
    game_over: Option<Outcome>,
    day: u32,
    score: i64,
    goal: i64,
    symbols_on_grid: usize,
}

/// A presentation collaborator: drains engine events, prints them and
/// reports every animation as finished straight away.
struct Session {
    run: RunState,
    events: EventBus,
    locale: Locale,
    json: bool,
    days_cleared: u32,
    game_over: Option<Outcome>,
}

impl Session {
    fn new(run: RunState, locale: Locale, json: bool) -> Self {
        Self {
            run,
            events: EventBus::default(),
            locale,
            json,
            days_cleared: 0,
            game_over: None,
        }
    }

    fn print_events(&mut self) -> anyhow::Result<()> {
        let drained: Vec<Event> = self.events.drain().collect();
        for event in &drained {
            match event {
                Event::DayCleared { .. } => self.days_cleared += 1,
                Event::GameOver { day, score, goal } => {
                    self.game_over = Some(Outcome {
                        day: *day,
                        score: *score,
                        goal: *goal,
                    });
                }
                _ => {}
            }
            if self.json {
                println!("{}", serde_json::to_string(event).context("encode event")?);
            } else {
                println!("  {}", format_event(event, &self.run.catalog, self.locale));
            }
        }
        Ok(())
    }

    /// Prints what the last request emitted, then completes its animations
    /// and prints whatever that released.
    fn flush(&mut self) -> anyhow::Result<()> {
        self.print_events()?;
        self.run.settle_all(&mut self.events);
        self.print_events()
    }

    fn report(&mut self, result: Result<(), RunError>) -> anyhow::Result<()> {
        if let Err(err) = result {
            println!("{}: {err}", text(self.locale, "rejected", "rechazado"));
        }
        self.flush()
    }

    fn execute(&mut self, command: Command) -> anyhow::Result<bool> {
        match command {
            Command::Help => print_help(self.locale),
            Command::Quit => return Ok(false),
            Command::New => {
                let result = self.run.new_game(&mut self.events);
                self.report(result)?;
            }
            Command::End => {
                let result = self.run.end_turn(&mut self.events);
                self.report(result)?;
            }
            Command::Day => {
                let result = self.run.end_day(&mut self.events);
                self.report(result)?;
            }
            Command::Board => print!("{}", render_board(&self.run)),
            Command::Inventory => print!("{}", render_inventory(&self.run, self.locale)),
            Command::Status => println!("{}", render_status(&self.run, self.locale)),
            Command::Place { slot, cell } => {
                let Some(id) = self.run.conveyor.slot_at(slot).map(|symbol| symbol.id) else {
                    println!("{} {slot}", text(self.locale, "empty slot", "ranura vacia"));
                    return Ok(true);
                };
                let result = self.run.place_on_grid(id, cell, &mut self.events).map(drop);
                self.report(result)?;
            }
            Command::Drag { from, to } => {
                let Some(id) = self.run.grid.symbol_at(from).map(|symbol| symbol.id) else {
                    println!("{} {from}", text(self.locale, "empty cell", "celda vacia"));
                    return Ok(true);
                };
                let result = self
                    .run
                    .return_or_relocate(id, Some(to), &mut self.events)
                    .map(drop);
                self.report(result)?;
            }
        }
        Ok(true)
    }

    /// Clicks every inventory symbol onto the grid, newest last.
    fn place_everything(&mut self) -> anyhow::Result<()> {
        while let Some(slot) = self.run.conveyor.last_occupied_unplaced() {
            let Some(id) = self.run.conveyor.slot_at(slot).map(|symbol| symbol.id) else {
                break;
            };
            if self.run.place_on_grid(id, None, &mut self.events).is_err() {
                break;
            }
        }
        self.flush()
    }
}

fn print_help(locale: Locale) {
    println!("{}", text(locale, "Commands:", "Comandos:"));
    for (usage, en, es) in HELP {
        println!("  {usage:<34}{}", text(locale, en, es));
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_run(cli: &Cli, seed: u64) -> anyhow::Result<RunState> {
    let (config, catalog) = if cli.builtin {
        (GameConfig::default(), Catalog::builtin())
    } else {
        let assets = load_assets(&cli.assets)
            .with_context(|| format!("load assets from {}", cli.assets.display()))?;
        (assets.config, assets.catalog)
    };
    debug!(
        seed,
        builtin = cli.builtin,
        symbols = catalog.symbols().len(),
        "run configured"
    );
    Ok(RunState::new(config, catalog, seed))
}

fn run_auto(session: &mut Session, seed: u64, turns: u32) -> anyhow::Result<()> {
    let started = session.run.new_game(&mut session.events);
    session.report(started)?;
    let mut turns_played = 0;
    while turns_played < turns {
        match session.run.phase() {
            Phase::Playing => {}
            Phase::DayCleared => {
                let result = session.run.end_day(&mut session.events);
                session.report(result)?;
                continue;
            }
            Phase::AwaitingStart | Phase::GameOver => break,
        }
        session.place_everything()?;
        session
            .run
            .end_turn(&mut session.events)
            .context("end turn")?;
        turns_played += 1;
        session.flush()?;
    }

    let economy = &session.run.economy;
    let summary = AutoSummary {
        seed,
        turns_played,
        days_cleared: session.days_cleared,
        game_over: session.game_over,
        day: economy.day,
        score: economy.score,
        goal: economy.goal,
        symbols_on_grid: session.run.grid.count(),
    };
    if session.json {
        println!("{}", serde_json::to_string(&summary).context("encode summary")?);
        return Ok(());
    }
    let locale = session.locale;
    println!("{}", text(locale, "Summary:", "Resumen:"));
    println!("  seed {}", summary.seed);
    println!("  {} {}", text(locale, "turns", "turnos"), summary.turns_played);
    println!(
        "  {} {}",
        text(locale, "days cleared", "dias superados"),
        summary.days_cleared
    );
    match summary.game_over {
        Some(outcome) => println!(
            "  {}: {} {} {}/{}",
            text(locale, "game over", "fin del juego"),
            text(locale, "day", "dia"),
            outcome.day,
            outcome.score,
            outcome.goal
        ),
        None => println!("  {}", render_status(&session.run, locale)),
    }
    Ok(())
}

fn run_interactive(session: &mut Session) -> anyhow::Result<()> {
    let locale = session.locale;
    println!(
        "{}",
        text(
            locale,
            "Orchard. Type `new` to start, `help` for commands.",
            "Orchard. Escribe `new` para empezar, `help` para ver comandos."
        )
    );
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush().context("flush stdout")?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        if !session.execute(command)? {
            break;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or(DEFAULT_RUN_SEED);
    let locale = locale_from_code(cli.locale.as_deref());
    let run = build_run(&cli, seed)?;
    let mut session = Session::new(run, locale, cli.json);
    match cli.auto {
        Some(turns) => run_auto(&mut session, seed, turns),
        None => run_interactive(&mut session),
    }
}
