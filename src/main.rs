use anyhow::Result;
use tracing_subscriber::EnvFilter;

mod analysis;
mod app;
mod auditor;
mod config;
mod error;
mod extract;
mod gemini;
mod handler;
mod state;
mod tui;
mod ui;

use app::App;
use config::Config;

/// The TUI owns the terminal, so logs go to a file under the config dir.
/// `GITGRADE_LOG` controls the filter (tracing env-filter syntax).
fn init_logging() -> Result<()> {
    let log_dir = Config::config_dir()?;
    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::File::options()
        .create(true)
        .append(true)
        .open(log_dir.join("gitgrade.log"))?;

    let filter = EnvFilter::try_from_env("GITGRADE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging()?;

    let config = Config::load().unwrap_or_else(|_| Config::new());
    if let Err(err) = config.ensure_on_disk() {
        tracing::warn!(%err, "could not write config template");
    }
    let mut app = App::new(&config);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();

    tracing::info!(model = app.backend.model(), "gitgrade started");

    let result = run(&mut app, &mut terminal, &mut events).await;

    tui::restore()?;
    result
}

async fn run(app: &mut App, terminal: &mut tui::Tui, events: &mut tui::EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        if let Some(event) = events.next().await {
            handler::handle_event(app, event);
        }

        // Pick up a finished analysis; ticks keep the loop spinning while
        // one is in flight.
        app.harvest().await;
    }

    Ok(())
}
