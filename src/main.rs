mod input;
mod ui;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use input::{handle_key, InputAction, ViewState};
use projekt_rpg::catalog::{load_catalog_or_builtin, Catalog};
use projekt_rpg::core::constants::{
    CATALOG_FILE_NAME, INPUT_POLL_MS, SIDE_QUEST_DAILY_CAP, STATE_KEY, TICK_INTERVAL_MS,
};
use projekt_rpg::core::progression::{current_rank, xp_multiplier};
use projekt_rpg::core::quests::{available_side_quests, quest_status, side_quest_uses, QuestStatus};
use projekt_rpg::core::time::{current_week, format_time_bank};
use projekt_rpg::core::{Clock, Session, SystemClock};
use projekt_rpg::utils::build_info;
use projekt_rpg::utils::logging::{init_file_logger, init_stderr_logger};
use projekt_rpg::utils::persistence::{FileStore, StateStore};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use ui::{draw_ui, Snapshot};

type AppSession = Session<FileStore, SystemClock>;

fn main() -> io::Result<()> {
    // Handle CLI arguments
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" | "-v" => {
                println!("{}", build_info::version_line());
                return Ok(());
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "status" => {
                init_stderr_logger();
                return print_status();
            }
            "reset" => {
                init_stderr_logger();
                let confirmed = args.iter().skip(2).any(|a| a == "--yes");
                return reset_state(confirmed);
            }
            other => {
                eprintln!("Unknown command: {}", other);
                eprintln!("Run 'projekt-rpg --help' for usage.");
                std::process::exit(1);
            }
        }
    }

    let store = FileStore::open_default()?;
    let log_path = init_file_logger(store.dir())?;
    log::info!("Starting {} (log: {})", build_info::version_line(), log_path.display());

    let catalog = load_catalog(&store);
    let (mut session, opening) = Session::open(store, SystemClock, catalog);
    let mut view = ViewState::new();
    view.record(&opening, &session.now());

    // Setup terminal
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = run_app(&mut terminal, &mut session, &mut view);

    // Restore terminal even if the loop failed
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = session.flush() {
        log::warn!("Final save failed: {}", e);
    }
    log::info!("Exiting");
    result
}

fn print_help() {
    println!("Projekt RPG - gamified German study tracker\n");
    println!("Usage: projekt-rpg [command]\n");
    println!("Commands:");
    println!("  status        Print today's progress and exit");
    println!("  reset --yes   Delete all saved progress");
    println!("  --version     Show version information");
    println!("  --help        Show this help message");
    println!("\nData is stored in ~/.projekt-rpg (override with PROJEKT_RPG_HOME).");
}

fn load_catalog(store: &FileStore) -> Catalog {
    load_catalog_or_builtin(&store.dir().join(CATALOG_FILE_NAME))
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut AppSession,
    view: &mut ViewState,
) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| {
            let snapshot = Snapshot {
                state: session.state(),
                catalog: session.catalog(),
                now: session.now(),
            };
            draw_ui(frame, &snapshot, &*view);
        })?;

        // Poll for input (non-blocking)
        if event::poll(Duration::from_millis(INPUT_POLL_MS))? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    match handle_key(key_event.code, view, session.state(), session.catalog()) {
                        InputAction::Quit => return Ok(()),
                        InputAction::Run(command) => {
                            let events = session.execute(command);
                            view.record(&events, &session.now());
                            view.clamp_cursors(session.state(), session.catalog());
                        }
                        InputAction::None => {}
                    }
                }
            }
        }

        // Enforcement tick every second
        if last_tick.elapsed() >= Duration::from_millis(TICK_INTERVAL_MS) {
            let events = session.tick();
            if !events.is_empty() {
                view.record(&events, &session.now());
                view.clamp_cursors(session.state(), session.catalog());
            }
            last_tick = Instant::now();
        }
    }
}

/// Non-interactive summary of today's progress. Never writes the save file.
fn print_status() -> io::Result<()> {
    let store = FileStore::open_default()?;
    let catalog = load_catalog(&store);
    let clock = SystemClock;
    let now = clock.now();
    let (session, _) = Session::load(store, clock, catalog);
    let state = session.state();
    let catalog = session.catalog();

    let rank = current_rank(state, catalog).map_or("?", |r| r.name.as_str());
    println!("Projekt RPG · {} · {}", now.format("%Y-%m-%d"), current_week(&now));
    println!(
        "Rank {} · {} XP (+{} today) · streak {}d x{}",
        rank,
        state.player.xp,
        state.daily.xp_gained,
        state.player.streak,
        xp_multiplier(state.player.streak)
    );
    println!("Time bank: {}", format_time_bank(state.daily.time_bank_ms));

    println!("\nDaily quests:");
    for quest in &catalog.daily_quests {
        let status = match quest_status(state, &quest.id) {
            QuestStatus::NotStarted => "open",
            QuestStatus::Active => "running",
            QuestStatus::Completed => "done",
            QuestStatus::Failed => "failed",
        };
        println!("  {:<24} {:>4} XP  {}", quest.title, quest.xp, status);
    }

    println!("\nSide quests:");
    for quest in available_side_quests(state, catalog) {
        println!(
            "  {:<24} {:>4} XP  {}/{} today",
            quest.title,
            quest.xp,
            side_quest_uses(state, &quest.id),
            SIDE_QUEST_DAILY_CAP
        );
    }
    Ok(())
}

fn reset_state(confirmed: bool) -> io::Result<()> {
    let store = FileStore::open_default()?;
    if !confirmed {
        eprintln!(
            "This deletes all progress in {}. Re-run with 'reset --yes' to confirm.",
            store.dir().display()
        );
        std::process::exit(1);
    }
    store.remove(STATE_KEY)?;
    log::warn!("Saved state removed");
    println!("Progress reset.");
    Ok(())
}
