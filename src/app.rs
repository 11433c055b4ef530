use crate::backend::Backend;
use crate::config::Config;
use crate::events::network::{Event as NetworkEvent, Handler as NetworkEventHandler};
use crate::events::terminal::Handler as TerminalEventHandler;
use crate::logger::CustomLogger;
use crate::session::{SessionChange, SessionStore};
use crate::state::State;
use crate::ui::Theme;
use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::*;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::sync::{mpsc, Arc};
use tokio::sync::{
    broadcast::{self, error::RecvError},
    Mutex,
};

pub type NetworkEventSender = std::sync::mpsc::Sender<NetworkEvent>;
type NetworkEventReceiver = std::sync::mpsc::Receiver<NetworkEvent>;
type LogReceiver = std::sync::mpsc::Receiver<String>;

/// Oversees event processing, state management, and terminal output.
///
pub struct App {
    state: Arc<Mutex<State>>,
    sessions: SessionStore,
    config: Config,
}

impl App {
    /// Start a new application according to the given configuration. Returns
    /// the result of the application execution.
    ///
    pub async fn start(config: Config) -> Result<()> {
        let logger = CustomLogger::new(LevelFilter::Debug);
        let (log_tx, log_rx) = mpsc::channel::<String>();
        let log_tx = std::sync::Mutex::new(log_tx);
        logger.set_log_callback(Box::new(move |entry| {
            if let Ok(sender) = log_tx.lock() {
                let _ = sender.send(entry);
            }
        }));
        logger.install()?;

        info!("Starting application...");
        let theme = Theme::from_name(&config.theme_name).unwrap_or_else(|| {
            warn!(
                "Unknown theme '{}', falling back to default. Available: {}",
                config.theme_name,
                Theme::available_themes().join(", ")
            );
            Theme::default()
        });

        let (tx, rx) = mpsc::channel::<NetworkEvent>();
        let sessions = SessionStore::new();
        let app = App {
            state: Arc::new(Mutex::new(State::new(tx.clone(), sessions.clone(), theme))),
            sessions,
            config,
        };
        app.start_network(rx);
        app.start_ui(tx, log_rx).await?;

        info!("Exiting application...");
        Ok(())
    }

    /// Start a separate thread for asynchronous state mutations. Every network
    /// event is handled on its own task so requests resolve independently.
    ///
    fn start_network(&self, net_receiver: NetworkEventReceiver) {
        debug!("Creating new thread for asynchronous networking...");
        let cloned_state = Arc::clone(&self.state);
        let backend = Backend::new(
            &self.config.backend_url,
            &self.config.api_key,
            self.sessions.clone(),
        );
        let session_saver = save_sessions(
            self.config.clone(),
            self.sessions.clone(),
            self.sessions.subscribe(),
        );
        std::thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!("Failed to build network runtime: {}", e);
                    return;
                }
            };
            runtime.block_on(async move {
                tokio::spawn(session_saver);
                let handler = NetworkEventHandler::new(&cloned_state, backend);
                while let Ok(network_event) = net_receiver.recv() {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handler.handle(network_event).await {
                            error!("Failed to handle network event: {}", e);
                        }
                    });
                }
            })
        });
    }

    /// Begin the terminal event poll on a separate thread before starting the
    /// render loop on the main thread. Return the result following an exit
    /// request or unrecoverable error.
    ///
    async fn start_ui(&self, net_sender: NetworkEventSender, log_receiver: LogReceiver) -> Result<()> {
        debug!("Starting user interface on main thread...");
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        enable_raw_mode()?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;

        net_sender.send(NetworkEvent::RestoreSession {
            stored: self.config.session.clone(),
        })?;

        let result = self.run_loop(&mut terminal, log_receiver).await;

        disable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;
        terminal.show_cursor()?;

        result
    }

    async fn run_loop(
        &self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        log_receiver: LogReceiver,
    ) -> Result<()> {
        let terminal_event_handler = TerminalEventHandler::new();
        loop {
            let mut state = self.state.lock().await;
            while let Ok(entry) = log_receiver.try_recv() {
                state.add_log_entry(entry);
            }
            if let Ok(size) = terminal.size() {
                state.set_terminal_size(size);
            };
            terminal.draw(|frame| crate::ui::render(frame, &mut state))?;
            if !terminal_event_handler.handle_next(&mut state)? {
                debug!("Received application exit request.");
                break;
            }
        }
        Ok(())
    }
}

/// Persist every session change to the configuration file. Sign-out removes
/// the stored session.
///
async fn save_sessions(
    mut config: Config,
    sessions: SessionStore,
    mut changes: broadcast::Receiver<SessionChange>,
) {
    loop {
        let session = match changes.recv().await {
            Ok(change) => change.session().cloned(),
            Err(RecvError::Lagged(_)) => sessions.current(),
            Err(RecvError::Closed) => break,
        };
        if let Err(e) = config.save_session(session) {
            error!("Failed to persist session: {}", e);
        }
    }
}
