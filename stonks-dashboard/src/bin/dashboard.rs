/// Stonks Dashboard
///
/// Connects to the backend event stream and renders the portfolio, live
/// tickers, charts and collector status. Press `q` or `Esc` to quit.
use std::{error::Error, fs::File, io, sync::Mutex, time::Duration};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use rustls::crypto::ring::default_provider;
use stonks_dashboard::{Dashboard, DashboardConfig, WebSocketClient, shared::widget};
use tracing::info;

const FRAME_INTERVAL: Duration = Duration::from_millis(250);

/// Log to a file; the terminal belongs to the UI
fn init_logging(path: &str) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = DashboardConfig::from_env()?;
    init_logging(&config.log_file)?;

    // Install rustls crypto provider for wss:// endpoints
    let _ = default_provider().install_default();

    // Setup panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let endpoint = config.endpoint();
    info!(%endpoint, "Starting dashboard");

    let mut dashboard = Dashboard::new(&config);
    let (mut events, connection) = WebSocketClient::with_config(config.websocket_config()).start();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut dashboard, &mut events);

    connection.shutdown().await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    let stats = dashboard.router_stats();
    info!(
        routed = stats.routed,
        ignored = stats.ignored,
        dropped = stats.dropped,
        "Dashboard stopped"
    );

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    dashboard: &mut Dashboard,
    events: &mut tokio::sync::mpsc::Receiver<stonks_dashboard::ConnectionEvent>,
) -> Result<(), Box<dyn Error>> {
    loop {
        dashboard.drain(events);
        terminal.draw(|f| widget::render_dashboard(f, dashboard.surfaces()))?;

        if event::poll(FRAME_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                {
                    return Ok(());
                }
            }
        }
    }
}
