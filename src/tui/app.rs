//! TUI application state and main event loop

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind};
use futures::{FutureExt, StreamExt};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use crate::api::SariClient;
use crate::config::Config;
use crate::expiry::{ExpirySignal, ExpirySink, ExpiryTracker, SystemClock};
use crate::models::{DbConfig, RegionMap};
use crate::session::SessionTimer;

use super::pickers::Pickers;
use super::ui;

/// Target frame rate for UI updates (~30 fps)
const FRAME_DURATION_MS: u64 = 33;

/// Active pane in the TUI
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    #[default]
    Regions,
    Instances,
    Databases,
}

impl Pane {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pane::Regions => "regions",
            Pane::Instances => "instances",
            Pane::Databases => "databases",
        }
    }

    fn next(self) -> Self {
        match self {
            Pane::Regions => Pane::Instances,
            Pane::Instances => Pane::Databases,
            Pane::Databases => Pane::Regions,
        }
    }

    fn prev(self) -> Self {
        match self {
            Pane::Regions => Pane::Databases,
            Pane::Instances => Pane::Regions,
            Pane::Databases => Pane::Instances,
        }
    }
}

/// Which screen is shown.
pub enum Screen {
    Browse,
    Farewell { header1: String, header2: String },
}

/// Messages delivered into the event loop from background tasks.
pub enum AppEvent {
    DatabasesLoaded(Result<RegionMap, String>),
    ConfigLoaded(Result<DbConfig, String>),
    Expiry(ExpirySignal),
}

/// Expiry-tracker sink that forwards signals into the app event channel.
struct EventSink(mpsc::UnboundedSender<AppEvent>);

impl ExpirySink for EventSink {
    fn percent(&self, value: f64) {
        let _ = self.0.send(AppEvent::Expiry(ExpirySignal::Percent(value)));
    }

    fn expired(&self) {
        let _ = self.0.send(AppEvent::Expiry(ExpirySignal::Expired));
    }
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_exit: bool,
    pub screen: Screen,
    pub active_pane: Pane,
    pub pickers: Pickers,
    /// Last fetched connection parameters.
    pub db_config: Option<DbConfig>,
    /// Password validity as a percentage, drives the gauge.
    pub pwd_percent: f64,
    /// A db_config fetch is in flight (spinner shown until its completion
    /// event arrives; never cleared early).
    pub loading: bool,
    pub spinner_frame: usize,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    pub session: Option<SessionTimer>,
    tracker: ExpiryTracker,
    client: Arc<SariClient>,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl App {
    fn new(
        client: Arc<SariClient>,
        tx: mpsc::UnboundedSender<AppEvent>,
        session: Option<SessionTimer>,
    ) -> Self {
        let tracker = ExpiryTracker::new(
            Arc::new(SystemClock),
            Arc::new(EventSink(tx.clone())),
        );
        Self {
            should_exit: false,
            screen: Screen::Browse,
            active_pane: Pane::default(),
            pickers: Pickers::new(),
            db_config: None,
            pwd_percent: 0.0,
            loading: false,
            spinner_frame: 0,
            status_message: None,
            status_is_error: false,
            session,
            tracker,
            client,
            tx,
        }
    }

    /// Kick off the initial database-list fetch.
    fn load_databases(&mut self) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client
                .list_databases()
                .await
                .map_err(|e| format!("{:#}", e));
            let _ = tx.send(AppEvent::DatabasesLoaded(result));
        });
    }

    /// Request connection parameters for the current selection.
    fn request_config(&mut self) {
        // One in-flight request per action.
        if self.loading {
            return;
        }
        let Some((region, db_id, db_name)) = self.pickers.selection() else {
            return;
        };
        self.loading = true;
        self.status_message = None;
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client
                .db_config(&region, &db_id, &db_name)
                .await
                .map_err(|e| format!("{:#}", e));
            let _ = tx.send(AppEvent::ConfigLoaded(result));
        });
    }

    /// Drop any fetched parameters and stop the password countdown.
    fn clear_db_parameters(&mut self) {
        if self.db_config.take().is_some() {
            self.tracker.clear();
        }
    }

    /// Handle input events
    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Resize(_, _) => {
                // Terminal resized - will be handled on next draw
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if let Screen::Farewell { .. } = self.screen {
            self.should_exit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_exit = true,
            KeyCode::Tab => self.active_pane = self.active_pane.next(),
            KeyCode::BackTab => self.active_pane = self.active_pane.prev(),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Enter => self.request_config(),
            KeyCode::Char('r') => {
                self.pickers.loading = true;
                self.clear_db_parameters();
                self.load_databases();
            }
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: i32) {
        if self.pickers.move_selection(self.active_pane, delta)
            && self.active_pane != Pane::Databases
        {
            // Changing a parent picker invalidates the fetched parameters.
            self.clear_db_parameters();
        }
    }

    /// Handle a message from a background task.
    fn handle_message(&mut self, event: AppEvent) {
        match event {
            AppEvent::DatabasesLoaded(Ok(databases)) => {
                if databases.is_empty() {
                    self.screen = Screen::Farewell {
                        header1: "Oops!".to_string(),
                        header2: "Sorry, but we couldn't find any RDS instance \
                                  you are allowed to access on this AWS account."
                            .to_string(),
                    };
                    return;
                }
                self.pickers.set_databases(databases);
            }
            AppEvent::DatabasesLoaded(Err(error)) => {
                self.pickers.loading = false;
                self.set_error(error);
            }
            AppEvent::ConfigLoaded(Ok(config)) => {
                self.loading = false;
                self.tracker.set_token(&config.rds_password);
                self.db_config = Some(config);
            }
            AppEvent::ConfigLoaded(Err(error)) => {
                self.loading = false;
                self.set_error(error);
            }
            AppEvent::Expiry(ExpirySignal::Percent(percent)) => {
                self.pwd_percent = percent.clamp(0.0, 100.0);
            }
            AppEvent::Expiry(ExpirySignal::Expired) => {
                // Reset the password field; the tracker then drops the
                // gauge to 0, same loop as the portal web page.
                if let Some(config) = &mut self.db_config {
                    config.rds_password.clear();
                }
                self.tracker.clear();
                self.set_error("Password expired. Press Enter to fetch a fresh one.".to_string());
            }
        }
    }

    /// Per-frame housekeeping: spinner animation and session countdown.
    fn on_tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);

        if let Some(session) = &self.session {
            if session.is_expired() && matches!(self.screen, Screen::Browse) {
                tracing::info!("session deadline reached");
                self.screen = Screen::Farewell {
                    header1: "Session Timeout".to_string(),
                    header2: String::new(),
                };
            }
        }
    }

    fn set_error(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.status_message = Some(message);
        self.status_is_error = true;
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        ui::render(frame, self);
    }
}

/// Run the TUI application with panic-safe terminal restore
pub async fn run(config: Config) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = AssertUnwindSafe(run_app(&mut terminal, config))
        .catch_unwind()
        .await;
    ratatui::restore();

    match result {
        Ok(r) => r,
        Err(e) => std::panic::resume_unwind(e),
    }
}

async fn run_app(terminal: &mut DefaultTerminal, config: Config) -> Result<()> {
    let client = Arc::new(SariClient::from_config(&config)?);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let session = config.session_deadline.map(SessionTimer::new);

    let mut app = App::new(client, tx, session);
    app.load_databases();

    let mut events = EventStream::new();
    let mut frame_tick = tokio::time::interval(Duration::from_millis(FRAME_DURATION_MS));

    while !app.should_exit {
        terminal.draw(|frame| app.render(frame))?;

        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(event)) => app.handle_event(event),
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                }
            }
            Some(message) = rx.recv() => app.handle_message(message),
            _ = frame_tick.tick() => app.on_tick(),
        }
    }

    Ok(())
}
