//! Show menu → decide → tear down → launch → show menu again.
//!
//! The graphical session and the process runner sit behind [`MenuFrontend`]
//! and [`CommandRunner`] so the loop itself runs without a display.

use crate::catalog::Catalog;
use crate::input::{InputNormalizer, RawInput};
use crate::selection::SelectionState;
use anyhow::Result;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pause after the graphical session is torn down, and again after a launched
/// program exits, so the display can settle between mode switches.
pub const SETTLE_DELAY: Duration = Duration::from_millis(250);

/// What one menu session ended with. Returned only after every graphical
/// resource of that session has been released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuReport {
    pub state: SelectionState,
    pub no_restart: bool,
}

impl MenuReport {
    pub fn new(state: SelectionState, no_restart: bool) -> Self {
        Self { state, no_restart }
    }

    /// A session that ended without a decision, e.g. its window was destroyed.
    pub fn abandoned() -> Self {
        Self::new(SelectionState::Cancelled, true)
    }
}

/// One menu session's input handling, advanced once per frame.
#[derive(Debug, Default)]
pub struct MenuDriver {
    input: InputNormalizer,
    state: SelectionState,
    no_restart: bool,
}

impl MenuDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Fold one poll cycle into the selection. Returns the report on the
    /// cycle that decides the session; afterwards events are ignored.
    pub fn step<I>(&mut self, events: I, catalog: &Catalog) -> Option<MenuReport>
    where
        I: IntoIterator<Item = RawInput>,
    {
        if self.state.is_decided() {
            return None;
        }
        let polled = self.input.poll(events);
        self.no_restart |= polled.no_restart;
        self.state = self.state.apply(&polled.intents, catalog);
        if !self.state.is_decided() {
            return None;
        }
        debug!(
            gamepads = self.input.connected_gamepads().count(),
            "menu session decided"
        );
        Some(MenuReport::new(self.state, self.no_restart))
    }
}

pub trait MenuFrontend {
    /// Acquire a graphical session, run the menu until the user decides, and
    /// release the session again.
    fn show_menu(&mut self, catalog: &Catalog) -> Result<MenuReport>;
}

pub trait CommandRunner {
    /// Run `command_line` through the shell and wait for it. Returns the exit
    /// code, `None` when the child was killed by a signal.
    fn run(&mut self, command_line: &str) -> Result<Option<i32>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Launch(String),
    ExitLauncher,
    RestartMenu,
}

pub fn decide_outcome(report: &MenuReport, catalog: &Catalog) -> SessionOutcome {
    let SelectionState::Confirmed(sel) = report.state else {
        return SessionOutcome::ExitLauncher;
    };
    match catalog.variant(sel.application, sel.variant) {
        Some(variant) if !variant.command_line.trim().is_empty() => {
            SessionOutcome::Launch(variant.command_line.clone())
        }
        Some(_) => SessionOutcome::RestartMenu,
        None => {
            warn!(
                application = sel.application,
                variant = sel.variant,
                "confirmed selection is outside the catalog"
            );
            SessionOutcome::RestartMenu
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub sessions: usize,
    pub launches: usize,
}

/// Run menu sessions until the user exits. Only frontend failures propagate;
/// a command that fails to start is logged and the menu comes back.
pub fn run_session_loop<F, R>(
    catalog: &Catalog,
    frontend: &mut F,
    runner: &mut R,
    settle: Duration,
) -> Result<LoopSummary>
where
    F: MenuFrontend + ?Sized,
    R: CommandRunner + ?Sized,
{
    let mut summary = LoopSummary::default();
    loop {
        let report = frontend.show_menu(catalog)?;
        summary.sessions += 1;
        let outcome = decide_outcome(&report, catalog);
        info!(?outcome, no_restart = report.no_restart, "menu closed");

        std::thread::sleep(settle);

        match outcome {
            SessionOutcome::Launch(command_line) => {
                info!(command = %command_line, "launching");
                summary.launches += 1;
                match runner.run(&command_line) {
                    Ok(Some(code)) => info!(command = %command_line, code, "command exited"),
                    Ok(None) => info!(command = %command_line, "command terminated by signal"),
                    Err(err) => warn!(command = %command_line, "command failed to run: {err:#}"),
                }
                if report.no_restart {
                    break;
                }
                std::thread::sleep(settle);
            }
            SessionOutcome::RestartMenu => {
                if report.no_restart {
                    break;
                }
            }
            SessionOutcome::ExitLauncher => break,
        }
    }
    info!(
        sessions = summary.sessions,
        launches = summary.launches,
        "launcher exiting gracefully"
    );
    Ok(summary)
}
