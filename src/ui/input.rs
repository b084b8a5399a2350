/// Input state tracker.
///
/// Tracks which keys are currently held down, enabling:
///   - Edge-triggered jump (only fires on initial press)
///   - Continuous editor panning while a key is held
///   - Pointer actions (editor place/delete) from terminal mouse events
///
/// Uses crossterm's keyboard enhancement for Release events when
/// available and falls back to timeout-based release detection on
/// terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEventKind};

/// After this duration without a Press/Repeat event, consider the key
/// released. Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

/// A pointer action on the playfield, in terminal cell coordinates.
/// The editor translates these to world positions.
#[derive(Clone, Copy, Debug)]
pub enum PointerAction {
    Place { col: u16, row: u16 },
    Delete { col: u16, row: u16 },
}

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that transitioned from "not held" to "held" during the
    /// most recent drain_events() call. Used for edge-triggered actions.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for meta-key handling.
    pub raw_events: Vec<KeyEvent>,

    /// Mouse clicks collected during drain.
    pub pointer_actions: Vec<PointerAction>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            pointer_actions: Vec::with_capacity(4),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();
        self.pointer_actions.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    self.raw_events.push(key);

                    match key.kind {
                        KeyEventKind::Release if self.honor_release => {
                            self.last_active.remove(&key.code);
                        }
                        KeyEventKind::Release => {
                            // Rely on timeout-based expiry instead
                        }
                        _ => {
                            let was_held = self.is_held_inner(key.code);
                            self.last_active.insert(key.code, Instant::now());
                            if !was_held {
                                self.fresh_presses.push(key.code);
                            }
                        }
                    }
                }
                Ok(Event::Mouse(mouse)) => match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        self.pointer_actions.push(PointerAction::Place {
                            col: mouse.column,
                            row: mouse.row,
                        });
                    }
                    MouseEventKind::Down(MouseButton::Right) => {
                        self.pointer_actions.push(PointerAction::Delete {
                            col: mouse.column,
                            row: mouse.row,
                        });
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        // Expire keys that have timed out (fallback for terminals
        // without Release events)
        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    /// Is this key currently held down?
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.is_held_inner(code)
    }

    /// Convenience: is any of these keys held?
    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Was this key freshly pressed this frame? (edge trigger)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    /// Convenience: was any of these keys freshly pressed?
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Check if any raw event this frame has Ctrl+C
    pub fn ctrl_c_pressed(&self) -> bool {
        use crossterm::event::KeyModifiers;
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    // ── Internal ──

    fn is_held_inner(&self, code: KeyCode) -> bool {
        self.last_active
            .get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}
