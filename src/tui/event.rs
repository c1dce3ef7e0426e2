use std::time::Duration;

use crossterm::event::{KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;

/// What the club view reacts to between redraws.
#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    /// Heartbeat for the spinner and flash expiry.
    Tick,
    /// The configured refresh interval elapsed; club data is due for a refetch.
    AutoRefresh,
}

/// Keep key presses, drop releases and repeats. Windows terminals report
/// all three kinds; acting on more than Press would double every keystroke.
fn key_press(raw: crossterm::event::Event) -> Option<KeyEvent> {
    match raw {
        crossterm::event::Event::Key(key) if key.kind == KeyEventKind::Press => Some(key),
        _ => None,
    }
}

/// Funnels terminal input and the two timers into one channel the
/// `run_tui` loop can await on.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Start the reader task. `auto_refresh` is the interval from the
    /// config file; its immediate first firing is swallowed because the
    /// loop already fetches once on startup.
    pub fn new(tick_rate: Duration, auto_refresh: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut keys = crossterm::event::EventStream::new();
            let mut tick = tokio::time::interval(tick_rate);
            let mut refresh = tokio::time::interval(auto_refresh);
            refresh.tick().await;

            loop {
                let event = tokio::select! {
                    raw = keys.next() => match raw {
                        Some(Ok(raw)) => match key_press(raw) {
                            Some(key) => Event::Key(key),
                            None => continue,
                        },
                        _ => continue,
                    },
                    _ = tick.tick() => Event::Tick,
                    _ = refresh.tick() => Event::AutoRefresh,
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        EventHandler { rx }
    }

    /// Next event. A closed channel degrades to ticks so the loop keeps
    /// turning and can still notice `should_quit`.
    pub async fn next(&mut self) -> Event {
        self.rx.recv().await.unwrap_or(Event::Tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn raw_key(kind: KeyEventKind) -> crossterm::event::Event {
        crossterm::event::Event::Key(KeyEvent {
            code: KeyCode::Char('j'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_only_presses_pass_the_filter() {
        assert!(key_press(raw_key(KeyEventKind::Press)).is_some());
        assert!(key_press(raw_key(KeyEventKind::Release)).is_none());
        assert!(key_press(raw_key(KeyEventKind::Repeat)).is_none());
    }

    #[test]
    fn test_non_key_events_are_dropped() {
        assert!(key_press(crossterm::event::Event::Resize(80, 24)).is_none());
        assert!(key_press(crossterm::event::Event::FocusGained).is_none());
    }
}
