//! A terminal browser for review sentiment data.
//!
//! Run the binary to launch the interactive view.
//! Run `export`, `print` or `init-config` for the non-interactive commands.

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use review_browser::{
    api::{HttpReviewApi, ReviewApi},
    app::{
        controller,
        event::{spawn_event_reader, AppEvent},
        handler,
        net_runtime::{self, NetUpdate},
        state::AppState,
    },
    cli::{self, Cli, Command},
    config::{self, AppConfig},
    core::model::Sentiment,
    ui,
};

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr only; stdout belongs to the TUI and `print`.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::load();
    cli.apply_overrides(&mut config);
    let sentiment = cli.sentiment;

    match cli.command {
        Some(Command::InitConfig) => {
            config.save()?;
            println!("wrote {}", config::config_path().display());
            Ok(())
        }
        Some(Command::Export { .. }) => {
            let api = build_api(&config)?;
            let path = cli::run_export(&api, sentiment, &config.export_dir).await?;
            println!("{}", path.display());
            Ok(())
        }
        Some(Command::Print(args)) => {
            let api = build_api(&config)?;
            println!("{}", cli::run_print(&api, sentiment, &args).await?);
            Ok(())
        }
        None => {
            let api: Arc<dyn ReviewApi> = Arc::new(build_api(&config)?);
            run_tui(api, config, sentiment).await
        }
    }
}

fn build_api(config: &AppConfig) -> Result<HttpReviewApi> {
    Ok(HttpReviewApi::new(&config.server_url)?.with_top_words_limit(config.top_words_limit))
}

// ───────────────────────────────────────── TUI ───────────────

async fn run_tui(api: Arc<dyn ReviewApi>, config: AppConfig, sentiment: Sentiment) -> Result<()> {
    let export_dir = config.export_dir.clone();
    let mut state = AppState::new(config, sentiment);
    controller::load_reviews(&mut state, true);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    execute!(
        stdout(),
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = event_loop(&mut terminal, &mut state, api, export_dir).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Tui,
    state: &mut AppState,
    api: Arc<dyn ReviewApi>,
    export_dir: PathBuf,
) -> Result<()> {
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let (net_tx, mut net_rx) = mpsc::unbounded_channel::<NetUpdate>();

    loop {
        // Start queued requests before drawing so the spinner shows at once.
        for request in state.take_pending_requests() {
            state.requests_in_flight += 1;
            net_runtime::dispatch(Arc::clone(&api), net_tx.clone(), export_dir.clone(), request);
        }

        terminal.draw(|frame| ui::draw(frame, state))?;

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(state, m),
                    AppEvent::Paste(text) => handler::handle_paste(state, &text),
                    AppEvent::Resize(_, _) => {}
                    AppEvent::Tick => state.tick = state.tick.wrapping_add(1),
                }
            }

            Some(update) = net_rx.recv() => {
                controller::apply_update(state, update);
                // Batch everything already queued into one redraw.
                while let Ok(update) = net_rx.try_recv() {
                    controller::apply_update(state, update);
                }
            }

            else => break,
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
