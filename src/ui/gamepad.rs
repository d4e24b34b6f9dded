/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Move
///   A                     →  Mine
///   B / X                 →  Build
///   Select                →  Home

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::input::{Action, Direction, DirectionSet};

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Logical face/shoulder buttons.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,
    R1,
    L2,
    R2,
    Start,
    Select,
}

const BTN_COUNT: usize = 10;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.trim().to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" => Some(Btn::L1),
            "R1" | "RB" => Some(Btn::R1),
            "L2" | "LT" => Some(Btn::L2),
            "R2" | "RT" => Some(Btn::R2),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::LeftTrigger2 => Some(Btn::L2),
            Button::RightTrigger2 => Some(Btn::R2),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping, one list per action.
struct ActionMap {
    bindings: Vec<(Action, Vec<Btn>)>,
}

impl ActionMap {
    fn buttons(&self, action: Action) -> &[Btn] {
        self.bindings
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, b)| b.as_slice())
            .unwrap_or(&[])
    }

    fn set(&mut self, action: Action, names: &[String]) {
        let btns: Vec<Btn> = names.iter().filter_map(|s| Btn::from_name(s)).collect();
        if btns.is_empty() {
            return;
        }
        match self.bindings.iter_mut().find(|(a, _)| *a == action) {
            Some((_, b)) => *b = btns,
            None => self.bindings.push((action, btns)),
        }
    }
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            bindings: vec![
                (Action::Mine, vec![Btn::A]),
                (Action::Build, vec![Btn::B, Btn::X]),
                (Action::Home, vec![Btn::Select]),
            ],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Face buttons freshly pressed since the last `update()`.
    just_pressed: [bool; BTN_COUNT],

    dpad: DirectionSet,
    stick: DirectionSet,
    stick_x: f32,
    stick_y: f32,

    action_map: ActionMap,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(e) => {
                log::info!("gamepad support unavailable: {e}");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            just_pressed: [false; BTN_COUNT],
            dpad: DirectionSet::new(),
            stick: DirectionSet::new(),
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            connected,
        }
    }

    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        self.action_map.set(Action::Mine, &cfg.mine);
        self.action_map.set(Action::Build, &cfg.build);
        self.action_map.set(Action::Home, &cfg.home);
    }

    pub fn update(&mut self) {
        self.just_pressed = [false; BTN_COUNT];

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, false);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                }
                EventType::Connected => self.connected = true,
                EventType::Disconnected => {
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }

        self.stick = stick_directions(self.stick_x, self.stick_y);
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, down: bool) {
        let dir = match gilrs_btn {
            Button::DPadUp => Some(Direction::Up),
            Button::DPadDown => Some(Direction::Down),
            Button::DPadLeft => Some(Direction::Left),
            Button::DPadRight => Some(Direction::Right),
            _ => None,
        };
        if let Some(d) = dir {
            if down { self.dpad.insert(d) } else { self.dpad.remove(d) }
            return;
        }
        if let (Some(btn), true) = (Btn::from_gilrs(gilrs_btn), down) {
            self.just_pressed[btn as usize] = true;
        }
    }

    // ── Queries ──

    pub fn held_directions(&self) -> DirectionSet {
        self.dpad.iter().chain(self.stick.iter()).collect()
    }

    pub fn pressed_actions(&self) -> Vec<Action> {
        [Action::Mine, Action::Build, Action::Home]
            .into_iter()
            .filter(|&a| self.action_map.buttons(a).iter().any(|&b| self.just_pressed[b as usize]))
            .collect()
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        self.just_pressed = [false; BTN_COUNT];
        self.dpad = DirectionSet::new();
        self.stick = DirectionSet::new();
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}

/// Digital directions from analog stick position (gilrs: +y is up).
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
fn stick_directions(x: f32, y: f32) -> DirectionSet {
    let mut set = DirectionSet::new();
    if x < -STICK_DEADZONE { set.insert(Direction::Left); }
    if x > STICK_DEADZONE { set.insert(Direction::Right); }
    if y > STICK_DEADZONE { set.insert(Direction::Up); }
    if y < -STICK_DEADZONE { set.insert(Direction::Down); }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_names_parse() {
        assert_eq!(Btn::from_name("south"), Some(Btn::A));
        assert_eq!(Btn::from_name(" lb "), Some(Btn::L1));
        assert_eq!(Btn::from_name("Back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("Turbo"), None);
    }

    #[test]
    fn config_overrides_only_valid_lists() {
        let mut pad = GamepadState::new();
        pad.load_button_config(&GamepadConfig {
            mine: vec!["R1".into()],
            build: vec!["bogus".into()],
            home: vec![],
        });
        assert_eq!(pad.action_map.buttons(Action::Mine), &[Btn::R1]);
        assert_eq!(pad.action_map.buttons(Action::Build), &[Btn::B, Btn::X]);
        assert_eq!(pad.action_map.buttons(Action::Home), &[Btn::Select]);
    }

    #[test]
    fn pressed_buttons_map_to_actions() {
        let mut pad = GamepadState::new();
        pad.just_pressed[Btn::X as usize] = true;
        assert_eq!(pad.pressed_actions(), vec![Action::Build]);
        pad.just_pressed[Btn::A as usize] = true;
        assert_eq!(pad.pressed_actions(), vec![Action::Mine, Action::Build]);
    }

    #[test]
    fn stick_respects_deadzone() {
        assert!(stick_directions(0.1, -0.2).is_empty());
        let s = stick_directions(-0.9, 0.8);
        assert!(s.contains(Direction::Left) && s.contains(Direction::Up));
    }

    #[test]
    fn dpad_and_stick_merge() {
        let mut pad = GamepadState::new();
        pad.dpad.insert(Direction::Down);
        pad.stick = stick_directions(0.9, 0.0);
        let held = pad.held_directions();
        assert!(held.contains(Direction::Down) && held.contains(Direction::Right));
    }
}
