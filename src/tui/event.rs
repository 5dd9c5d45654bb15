//! Event handling for the TUI.
//!
//! A separate thread polls the terminal and emits timer ticks; fetch
//! and mutation worker threads post their completions onto the same
//! channel, so the main loop consumes a single ordered event stream.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

use crate::fetch::{FetchDone, MutationDone};

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// Timer tick: status-line expiry and periodic refetch checks.
    Tick,
    /// Keyboard input.
    Key(KeyEvent),
    /// Terminal resize (width).
    Resize(u16),
    /// A list fetch finished on a worker thread.
    Fetch(FetchDone),
    /// A mutation finished on a worker thread.
    Mutation(MutationDone),
}

/// Event handler that polls for terminal events in a separate thread.
pub struct EventHandler {
    rx: Receiver<Event>,
    tx: Sender<Event>,
}

impl EventHandler {
    /// Creates a new event handler with the specified tick rate.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let event_tx = tx.clone();

        thread::spawn(move || {
            loop {
                // Poll for events with timeout
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        let event = match evt {
                            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                                Event::Key(key)
                            }
                            CrosstermEvent::Resize(w, _) => Event::Resize(w),
                            _ => continue,
                        };
                        if event_tx.send(event).is_err() {
                            break;
                        }
                    }
                } else {
                    // Timeout - send tick
                    if event_tx.send(Event::Tick).is_err() {
                        break;
                    }
                }
            }
        });

        Self { rx, tx }
    }

    /// Clone of the sender, handed to the fetch layer.
    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    /// Receives the next event, blocking until one is available.
    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}
