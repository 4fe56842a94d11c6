use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ratatui::crossterm::event::{self, Event};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::core::app::App;
use crate::core::caption_client::CaptionService;
use crate::core::config::data::Config;
use crate::core::controller::Submission;
use crate::ui::keybindings::{action_for_key, UiAction};
use crate::ui::lifecycle::{restore_terminal, setup_terminal};
use crate::ui::renderer::draw;
use crate::utils::clipboard::{ClipboardService, SystemClipboard};

/// How often the loop wakes with no input so expired statuses disappear.
const TICK_INTERVAL: Duration = Duration::from_millis(250);
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Background work that actions hand off to.
pub struct ViewServices {
    pub captions: CaptionService,
    pub clipboard: ClipboardService,
    pub cancel: CancellationToken,
}

pub async fn run_interactive(
    config: &Config,
    image: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let mut app = App::from_config(config)?;
    if let Some(path) = image.as_deref() {
        // a rejected path lands on the error line
        let _ = app.controller().select_path(path);
    }
    info!(endpoint = %app.client.endpoint(), "interactive view starting");

    let (captions, mut caption_updates) = CaptionService::new();
    let (clipboard, mut copy_results) = ClipboardService::new(Arc::new(SystemClipboard));
    let services = ViewServices {
        captions,
        clipboard,
        cancel: CancellationToken::new(),
    };

    let mut terminal = setup_terminal()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let reader = spawn_event_reader(event_tx, services.cancel.clone());
    let mut tick = tokio::time::interval(TICK_INTERVAL);

    let result: Result<(), Box<dyn Error>> = loop {
        if let Err(err) = terminal.draw(|f| draw(f, &app, Instant::now())) {
            break Err(err.into());
        }

        tokio::select! {
            ev = event_rx.recv() => match ev {
                Some(ev) => handle_event(&mut app, ev, &services),
                None => break Ok(()),
            },
            Some(update) = caption_updates.recv() => {
                app.controller()
                    .complete_caption(update.request_id, update.outcome);
            }
            Some(copied) = copy_results.recv() => {
                app.controller().record_copy(copied, Instant::now());
            }
            _ = tick.tick() => {
                app.session.prune_status(Instant::now());
            }
        }

        if app.ui.exit_requested {
            break Ok(());
        }
    };

    services.cancel.cancel();
    let _ = reader.await;
    restore_terminal(&mut terminal)?;
    result
}

fn spawn_event_reader(
    event_tx: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !cancel.is_cancelled() {
            match event::poll(EVENT_POLL_INTERVAL) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if event_tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(err) => debug!(error = %err, "failed to read terminal event"),
                },
                Ok(false) => {}
                Err(err) => {
                    debug!(error = %err, "terminal event poll failed");
                    break;
                }
            }
        }
    })
}

fn handle_event(app: &mut App, ev: Event, services: &ViewServices) {
    match ev {
        Event::Key(key) => {
            if let Some(action) = action_for_key(&key) {
                apply_action(app, action, services);
            }
        }
        Event::Paste(text) => app.ui.insert_str(&text),
        _ => {}
    }
}

/// Apply one decoded action. Caption requests run under a child of
/// `services.cancel`; clipboard writes report back through `services.clipboard`.
pub fn apply_action(app: &mut App, action: UiAction, services: &ViewServices) {
    match action {
        UiAction::Quit => app.ui.exit_requested = true,
        UiAction::SelectTypedPath => {
            if let Some(path) = app.ui.take_path() {
                let _ = app.controller().select_path(&path);
            }
        }
        UiAction::Generate => {
            if let Ok(Submission::Started(job)) = app.controller().generate_caption() {
                let cancel = services.cancel.child_token();
                services
                    .captions
                    .spawn_request(app.client.clone(), job, cancel);
            }
        }
        UiAction::Copy => {
            if let Some(caption) = app.session.caption() {
                services.clipboard.spawn_copy(caption.to_string());
            }
        }
        UiAction::ClearInput => app.ui.clear_input(),
        UiAction::Backspace => app.ui.backspace(),
        UiAction::Insert(c) => app.ui.insert_char(c),
    }
}
