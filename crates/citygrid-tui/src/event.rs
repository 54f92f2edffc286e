//! Terminal input plus the two clocks that drive the dashboard.
//!
//! A background task merges crossterm's event stream with a data tick and a
//! render tick and forwards everything over one channel, so the app loop
//! only ever awaits a single receiver.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// New terminal size in (cols, rows).
    Resize(u16, u16),
    /// Slow clock: notifications, throbbers.
    Tick,
    /// Frame clock: redraw and topology pulses.
    Render,
}

/// Tick and frame periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rates {
    pub tick: Duration,
    pub render: Duration,
}

impl Rates {
    /// Zero periods would spin the interval timers, so both are floored at 1 ms.
    pub fn from_millis(tick_ms: u64, render_ms: u64) -> Self {
        Self {
            tick: Duration::from_millis(tick_ms.max(1)),
            render: Duration::from_millis(render_ms.max(1)),
        }
    }
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    pub fn new(rates: Rates) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            let mut input = EventStream::new();
            let mut tick = tokio::time::interval(rates.tick);
            let mut render = tokio::time::interval(rates.render);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            render.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                let event = tokio::select! {
                    () = task_cancel.cancelled() => break,
                    _ = tick.tick() => Event::Tick,
                    _ = render.tick() => Event::Render,
                    Some(Ok(raw)) = input.next() => match translate(raw) {
                        Some(event) => event,
                        None => continue,
                    },
                };

                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx, cancel }
    }

    /// `None` once the reader task has exited.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Key releases and repeats, focus and paste events are dropped.
fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}
