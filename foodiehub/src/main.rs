//! FoodieHub terminal client
//!
//! Browse restaurants, build a cart, place an order, and watch it move
//! through the kitchen live. Runs against the backend configured via
//! environment variables, or fully offline on the built-in demo catalog
//! when no API key is set.

use std::io;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use dotenv::dotenv;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use foodiehub::AppConfig;
use foodiehub::ui::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Logs land in the in-app pane instead of stdout, which the TUI owns
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tui_logger::tracing_subscriber_layer())
        .with(env_filter)
        .init();
    tui_logger::init_logger(log::LevelFilter::Info).ok();
    tui_logger::set_default_level(log::LevelFilter::Info);

    let config = AppConfig::from_env();
    tracing::info!("FoodieHub starting against {}", config.api_url);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = App::new(config).run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
