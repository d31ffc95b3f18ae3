use std::collections::BTreeMap;
use tracing::info;

/// Accumulated wheel travel needed for one application step.
pub const SCROLL_STEP_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keycode {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamepadButton {
    DPadLeft,
    DPadRight,
    DPadUp,
    DPadDown,
    LeftShoulder,
    RightShoulder,
    /// Bottom face button (A on Xbox layouts, Cross on PlayStation).
    South,
    /// Right face button (B on Xbox layouts, Circle on PlayStation).
    East,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    KeyPressed(Keycode),
    PointerPressed(PointerButton),
    /// Vertical wheel travel in lines; positive moves to the next application.
    Wheel(f32),
    GamepadButton { id: u32, button: GamepadButton },
    GamepadConnected { id: u32, name: String },
    GamepadDisconnected { id: u32 },
    QuitRequested,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntentBatch {
    pub move_prev_app: bool,
    pub move_next_app: bool,
    pub move_prev_variant: bool,
    pub move_next_variant: bool,
    pub confirm: bool,
    pub cancel: bool,
}

impl IntentBatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollResult {
    pub intents: IntentBatch,
    /// Set by a window-close request or a secondary click: the launcher
    /// should terminate instead of coming back after this session.
    pub no_restart: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    PrevApp,
    NextApp,
    PrevVariant,
    NextVariant,
    Confirm,
    Cancel,
}

fn key_intent(key: Keycode) -> Option<Intent> {
    match key {
        Keycode::Left => Some(Intent::PrevApp),
        Keycode::Right => Some(Intent::NextApp),
        Keycode::Up => Some(Intent::PrevVariant),
        Keycode::Down => Some(Intent::NextVariant),
        Keycode::Enter => Some(Intent::Confirm),
        Keycode::Escape => Some(Intent::Cancel),
        Keycode::Other => None,
    }
}

fn gamepad_intent(button: GamepadButton) -> Option<Intent> {
    match button {
        GamepadButton::DPadLeft | GamepadButton::LeftShoulder => Some(Intent::PrevApp),
        GamepadButton::DPadRight | GamepadButton::RightShoulder => Some(Intent::NextApp),
        GamepadButton::DPadUp => Some(Intent::PrevVariant),
        GamepadButton::DPadDown => Some(Intent::NextVariant),
        GamepadButton::South => Some(Intent::Confirm),
        GamepadButton::East => Some(Intent::Cancel),
        GamepadButton::Other => None,
    }
}

#[derive(Debug, Default)]
pub struct InputNormalizer {
    scroll_accum: f32,
    gamepads: BTreeMap<u32, String>,
}

impl InputNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connected_gamepads(&self) -> impl Iterator<Item = (u32, &str)> {
        self.gamepads.iter().map(|(id, name)| (*id, name.as_str()))
    }

    pub fn scroll_accum(&self) -> f32 {
        self.scroll_accum
    }

    pub fn poll<I>(&mut self, events: I) -> PollResult
    where
        I: IntoIterator<Item = RawInput>,
    {
        let mut result = PollResult::default();
        for event in events {
            let intent = match event {
                RawInput::KeyPressed(key) => key_intent(key),
                RawInput::PointerPressed(PointerButton::Primary) => Some(Intent::Confirm),
                RawInput::PointerPressed(PointerButton::Secondary) => {
                    result.no_restart = true;
                    Some(Intent::Cancel)
                }
                RawInput::PointerPressed(PointerButton::Other) => None,
                RawInput::Wheel(delta) => self.accumulate_scroll(delta),
                RawInput::GamepadButton { button, .. } => gamepad_intent(button),
                RawInput::GamepadConnected { id, name } => {
                    info!(id, name = %name, "gamepad connected");
                    self.gamepads.insert(id, name);
                    None
                }
                RawInput::GamepadDisconnected { id } => {
                    if let Some(name) = self.gamepads.remove(&id) {
                        info!(id, name = %name, "gamepad disconnected");
                    }
                    None
                }
                RawInput::QuitRequested => {
                    result.no_restart = true;
                    Some(Intent::Cancel)
                }
            };
            if let Some(intent) = intent {
                set_flag(&mut result.intents, intent);
            }
        }
        result
    }

    fn accumulate_scroll(&mut self, delta: f32) -> Option<Intent> {
        self.scroll_accum += delta;
        if self.scroll_accum < -SCROLL_STEP_THRESHOLD {
            self.scroll_accum = 0.0;
            Some(Intent::PrevApp)
        } else if self.scroll_accum > SCROLL_STEP_THRESHOLD {
            self.scroll_accum = 0.0;
            Some(Intent::NextApp)
        } else {
            None
        }
    }
}

fn set_flag(batch: &mut IntentBatch, intent: Intent) {
    match intent {
        Intent::PrevApp => batch.move_prev_app = true,
        Intent::NextApp => batch.move_next_app = true,
        Intent::PrevVariant => batch.move_prev_variant = true,
        Intent::NextVariant => batch.move_next_variant = true,
        Intent::Confirm => batch.confirm = true,
        Intent::Cancel => batch.cancel = true,
    }
}
