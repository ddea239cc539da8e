use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Commands the interactive front end can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Quit,
    /// Start a new render pass for the current session
    Refresh,
}

/// Map a key press to a command.
pub fn key_to_command(key: KeyEvent) -> Option<UiCommand> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE)
        | (KeyCode::Esc, _)
        | (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(UiCommand::Quit),
        (KeyCode::Char('r'), KeyModifiers::NONE) | (KeyCode::F(5), _) => Some(UiCommand::Refresh),
        _ => None,
    }
}

/// Spawn a blocking thread that collects terminal input and forwards commands onto a channel.
pub fn spawn_input_thread(
    tx: UnboundedSender<UiCommand>,
    shutdown: Arc<AtomicBool>,
    poll_interval: Duration,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        while !shutdown.load(Ordering::SeqCst) {
            match event::poll(poll_interval) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    log::error!("input thread error: {err}");
                    break;
                }
            }

            let command = match event::read() {
                Ok(Event::Key(key)) => key_to_command(key),
                Ok(_) => None,
                Err(err) => {
                    log::error!("input thread error: {err}");
                    break;
                }
            };

            if let Some(command) = command {
                if tx.send(command).is_err() || command == UiCommand::Quit {
                    break;
                }
            }
        }
    })
}
