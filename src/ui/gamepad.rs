/// Gamepad input tracker using gilrs.
///
/// A one-button game barely needs a mapping, but which button feels
/// like "jump" varies by pad, so it is loaded from config.toml via
/// `load_button_config()`. Default mapping:
///   A / B / X / Y  →  Jump
///   Start          →  Confirm
///   Select         →  Cancel / back to menu

#[cfg(feature = "gamepad")]
use gilrs::{Button, EventType, Gilrs};

use crate::config::GamepadConfig;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    Start,
    Select,
}

const BTN_COUNT: usize = 8;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER" => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
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
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Per-button state: held (continuous) and just_pressed (edge).
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    #[allow(dead_code)]
    held: bool,
    just_pressed: bool,
}

/// Action-to-button mapping (loaded from config).
struct ActionMap {
    jump: Vec<Btn>,
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            jump: vec![Btn::A, Btn::B, Btn::X, Btn::Y],
            confirm: vec![Btn::Start],
            cancel: vec![Btn::Select],
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    buttons: [BtnState; BTN_COUNT],
    action_map: ActionMap,

    #[allow(dead_code)]
    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(_) => (None, false),
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            buttons: [BtnState::default(); BTN_COUNT],
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Load button mapping from config.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let jp = parse_list(&cfg.jump);
        if !jp.is_empty() { self.action_map.jump = jp; }
        let cf = parse_list(&cfg.confirm);
        if !cf.is_empty() { self.action_map.confirm = cf; }
        let ca = parse_list(&cfg.cancel);
        if !ca.is_empty() { self.action_map.cancel = ca; }
    }

    pub fn update(&mut self) {
        for b in &mut self.buttons {
            b.just_pressed = false;
        }

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
                    if let Some(b) = Btn::from_gilrs(btn) {
                        let s = &mut self.buttons[b as usize];
                        s.held = true;
                        s.just_pressed = true;
                    }
                }
                EventType::ButtonReleased(btn, _) => {
                    self.connected = true;
                    if let Some(b) = Btn::from_gilrs(btn) {
                        self.buttons[b as usize].held = false;
                    }
                }
                EventType::Connected => { self.connected = true; }
                EventType::Disconnected => {
                    self.connected = false;
                    self.buttons = [BtnState::default(); BTN_COUNT];
                }
                _ => {}
            }
        }
    }

    // ── Action queries (config-driven) ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[b as usize].just_pressed)
    }

    pub fn jump_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.jump)
    }
    pub fn confirm_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.confirm)
    }
    pub fn cancel_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.cancel)
    }
}
