mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::messages::{Action, AuthAction, SeriesAction, UiEvent};
use crate::state::refresher::PeriodicRefresher;
use crate::state::sagas::{Effects, SagaWorker};
use crate::state::store::Store;
use cricket_api::auth::{AuthClient, SessionMirror};
use cricket_api::client::ApiClient;
use cricket_api::graphql::GraphqlClient;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::info;
use std::io::Stdout;
use std::{io, panic};
use tokio::sync::mpsc;
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    better_panic::install();

    let settings = AppSettings::load();
    tui_logger::init_logger(settings.log_level)?;
    tui_logger::set_default_level(settings.log_level);

    let api = ApiClient::new(settings.api_url.clone());
    let jar = api.cookie_jar();
    let graphql = GraphqlClient::new(settings.graphql_url.clone(), jar.clone());
    let auth = AuthClient::new(settings.api_url.clone(), jar);
    if let Some(cookie) = settings.session_cookie.as_deref() {
        auth.import_session_cookie(cookie)?;
    }
    let mirror = SessionMirror::new(settings.session_path.clone());
    let restore = AuthAction::RestoreSession {
        authenticated: mirror.is_authenticated(),
        user: mirror.stored_user(),
    };

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (intent_tx, intent_rx) = mpsc::unbounded_channel::<Action>();
    let (put_tx, put_rx) = mpsc::unbounded_channel::<Action>();

    info!("using api {} and graphql {}", settings.api_url, settings.graphql_url);
    let refresh_interval = settings.refresh_interval;
    let mut app = App::new(settings, Store::new(intent_tx));
    app.dispatch(Action::Auth(restore));

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Saga worker
    let worker = SagaWorker::new(Effects::new(api, graphql, auth, mirror, put_tx), intent_rx);
    let saga_task = tokio::spawn(worker.run());

    // Live scoreboard refresh
    let periodic_updater = PeriodicRefresher::new(ui_event_tx.clone(), refresh_interval);
    let periodic_task = tokio::spawn(periodic_updater.run());

    // Animation tick thread, 80ms ≈ 12.5 FPS
    let anim_tx = ui_event_tx.clone();
    let animation_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(80));
        loop {
            interval.tick().await;
            if anim_tx.send(UiEvent::AnimationTick).await.is_err() {
                break;
            }
        }
    });

    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, &mut app, ui_event_rx, put_rx).await;

    input_handler.abort();
    saga_task.abort();
    periodic_task.abort();
    animation_task.abort();
    cleanup_terminal();

    Ok(())
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("crictui {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "crictui - live cricket scoring in the terminal

Usage:
  crictui
  crictui --help
  crictui --version

Environment:
  CRICTUI_API_URL         REST base URL (default http://localhost:8000/api/v1)
  CRICTUI_GRAPHQL_URL     GraphQL endpoint (default http://localhost:8000/graphql)
  CRICTUI_LOG_LEVEL       error|warn|info|debug|trace (default info)
  CRICTUI_REFRESH_SECS    Live scoreboard refresh period (default 30)
  CRICTUI_SESSION_COOKIE  Session cookie copied from a signed-in browser"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    mut ui_events: mpsc::Receiver<UiEvent>,
    mut puts: mpsc::UnboundedReceiver<Action>,
) {
    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                if !handle_ui_event(ui_event, app) {
                    break;
                }
            }

            Some(action) = puts.recv() => {
                app.on_put(action);
            }

            else => break,
        }
        draw::draw(&mut terminal, app);
    }
}

/// Returns false when the app should exit.
fn handle_ui_event(ui_event: UiEvent, app: &mut App) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            app.dispatch(Action::Auth(AuthAction::CheckAuthStatusRequest));
            app.dispatch(Action::Series(SeriesAction::FetchSeriesRequest));
        }
        UiEvent::KeyPressed(key_event) => return keys::handle_key_bindings(key_event, app),
        UiEvent::Resize => {}
        UiEvent::AnimationTick => app.advance_animation(),
        UiEvent::RefreshDue => app.on_refresh_due(),
    }
    true
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        let Ok(event) = tokio::task::spawn_blocking(crossterm_event::read).await else {
            break;
        };
        let ui_event = match event {
            Ok(Event::Key(key_event)) => Some(UiEvent::KeyPressed(key_event)),
            Ok(Event::Resize(_, _)) => Some(UiEvent::Resize),
            _ => None,
        };

        if let Some(ui_event) = ui_event
            && ui_events.send(ui_event).await.is_err()
        {
            break;
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
