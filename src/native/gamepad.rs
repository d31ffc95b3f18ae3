use crate::input::{GamepadButton, RawInput};
use anyhow::{anyhow, Result};
use sdl2::controller::{Button, GameController};
use sdl2::event::Event;
use sdl2::{EventPump, GameControllerSubsystem, Sdl};
use std::collections::HashMap;
use tracing::{debug, warn};

fn map_button(button: Button) -> GamepadButton {
    match button {
        Button::DPadLeft => GamepadButton::DPadLeft,
        Button::DPadRight => GamepadButton::DPadRight,
        Button::DPadUp => GamepadButton::DPadUp,
        Button::DPadDown => GamepadButton::DPadDown,
        Button::LeftShoulder => GamepadButton::LeftShoulder,
        Button::RightShoulder => GamepadButton::RightShoulder,
        Button::A => GamepadButton::South,
        Button::B => GamepadButton::East,
        _ => GamepadButton::Other,
    }
}

/// Owns the SDL context for one menu session. Dropping it closes every
/// opened controller and shuts the subsystem down.
pub struct GamepadPoller {
    // field order matters: controllers close before the subsystem goes away
    open: HashMap<u32, GameController>,
    pump: EventPump,
    subsystem: GameControllerSubsystem,
    _sdl: Sdl,
}

impl GamepadPoller {
    pub fn new() -> Result<Self> {
        // the egui window has focus, not SDL; keep receiving events anyway
        sdl2::hint::set("SDL_JOYSTICK_ALLOW_BACKGROUND_EVENTS", "1");
        sdl2::hint::set("SDL_NO_SIGNAL_HANDLERS", "1");
        let sdl = sdl2::init().map_err(|e| anyhow!("SDL init failed: {e}"))?;
        let subsystem = sdl
            .game_controller()
            .map_err(|e| anyhow!("SDL game controller subsystem unavailable: {e}"))?;
        let pump = sdl
            .event_pump()
            .map_err(|e| anyhow!("SDL event pump unavailable: {e}"))?;
        Ok(Self {
            open: HashMap::new(),
            pump,
            subsystem,
            _sdl: sdl,
        })
    }

    // controllers already plugged in at init also arrive as ControllerDeviceAdded
    pub fn poll(&mut self) -> Vec<RawInput> {
        let events: Vec<Event> = self.pump.poll_iter().collect();
        events
            .into_iter()
            .filter_map(|event| self.translate(event))
            .collect()
    }

    fn translate(&mut self, event: Event) -> Option<RawInput> {
        match event {
            Event::ControllerDeviceAdded { which, .. } => match self.subsystem.open(which) {
                Ok(controller) => {
                    let id = controller.instance_id();
                    let name = controller.name();
                    self.open.insert(id, controller);
                    Some(RawInput::GamepadConnected { id, name })
                }
                Err(err) => {
                    warn!(device = which, "failed to open game controller: {err}");
                    None
                }
            },
            Event::ControllerDeviceRemoved { which, .. } => {
                self.open.remove(&which);
                Some(RawInput::GamepadDisconnected { id: which })
            }
            Event::ControllerButtonDown { which, button, .. } => {
                debug!(id = which, ?button, "controller button");
                Some(RawInput::GamepadButton {
                    id: which,
                    button: map_button(button),
                })
            }
            _ => None,
        }
    }
}
