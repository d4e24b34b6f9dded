/// Keyboard state tracker.
///
/// Tracks which keys are held and which were freshly pressed, so that:
///   - Movement continues while a direction key is held
///   - Mine / build fire once per press
///   - Several directions can be held together
///
/// Uses Release events when the terminal reports them (keyboard
/// enhancement), otherwise a key counts as released after `HOLD_TIMEOUT`
/// without a Press/Repeat.
///
/// Key → intent resolution goes through the fixed binding tables below.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::input::{Action, Direction, DirectionSet};

const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

// ── Bindings ──

const DIRECTION_KEYS: &[(KeyCode, Direction)] = &[
    (KeyCode::Up, Direction::Up),
    (KeyCode::Char('w'), Direction::Up),
    (KeyCode::Char('W'), Direction::Up),
    (KeyCode::Down, Direction::Down),
    (KeyCode::Char('s'), Direction::Down),
    (KeyCode::Char('S'), Direction::Down),
    (KeyCode::Left, Direction::Left),
    (KeyCode::Char('a'), Direction::Left),
    (KeyCode::Char('A'), Direction::Left),
    (KeyCode::Right, Direction::Right),
    (KeyCode::Char('d'), Direction::Right),
    (KeyCode::Char('D'), Direction::Right),
];

const ACTION_KEYS: &[(KeyCode, Action)] = &[
    (KeyCode::Char('m'), Action::Mine),
    (KeyCode::Char('M'), Action::Mine),
    (KeyCode::Char(' '), Action::Mine),
    (KeyCode::Char('b'), Action::Build),
    (KeyCode::Char('B'), Action::Build),
    (KeyCode::Char('h'), Action::Home),
    (KeyCode::Char('H'), Action::Home),
    (KeyCode::Char('q'), Action::Home),
    (KeyCode::Char('Q'), Action::Home),
    (KeyCode::Home, Action::Home),
    (KeyCode::Esc, Action::Home),
];

pub fn direction_for(code: KeyCode) -> Option<Direction> {
    DIRECTION_KEYS.iter().find(|(k, _)| *k == code).map(|&(_, d)| d)
}

pub fn action_for(code: KeyCode) -> Option<Action> {
    ACTION_KEYS.iter().find(|(k, _)| *k == code).map(|&(_, a)| a)
}

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from "not held" to "held" during the last drain.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain (Ctrl-C detection).
    raw_events: Vec<KeyEvent>,

    /// Honor Release events. Only true when keyboard enhancement is on.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Drain pending terminal events without blocking. Once per frame.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key, Instant::now());
            }
        }

        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn record(&mut self, key: KeyEvent, at: Instant) {
        self.raw_events.push(key);
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {}
            _ => {
                let was_held = self.is_held_at(key.code, at);
                self.last_active.insert(key.code, at);
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    /// Directions whose keys are held right now.
    pub fn held_directions(&self) -> DirectionSet {
        let now = Instant::now();
        self.last_active
            .keys()
            .filter(|k| self.is_held_at(**k, now))
            .filter_map(|&k| direction_for(k))
            .collect()
    }

    /// Actions freshly pressed this frame, in press order.
    pub fn pressed_actions(&self) -> Vec<Action> {
        self.fresh_presses.iter().filter_map(|&k| action_for(k)).collect()
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active
            .get(&code)
            .map(|t| now.duration_since(*t) < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}
