use super::events::collect_frame_input;
#[cfg(feature = "gamepad")]
use super::gamepad::GamepadPoller;
use super::surface::{EguiResources, EguiSurface};
use crate::catalog::Catalog;
use crate::config::ConfigPaths;
use crate::fonts::LoadedFont;
use crate::render::{render_menu, BACKGROUND_COLOR};
use crate::session::{MenuDriver, MenuReport};
use eframe::egui::{self, Context, CursorIcon, FontData, FontDefinitions, FontFamily};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{info, warn};

/// Keeps frames coming while idle so controller events get polled.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub fn configure_native_fonts(ctx: &Context, font: &LoadedFont) {
    let mut fonts = FontDefinitions::default();
    fonts
        .font_data
        .insert("menu".into(), FontData::from_owned(font.bytes.as_ref().clone()));
    fonts
        .families
        .entry(FontFamily::Proportional)
        .or_default()
        .insert(0, "menu".into());
    ctx.set_fonts(fonts);
}

/// One menu session. Textures live in `resources` and are freed when the
/// app is dropped at the end of `run_native`.
pub struct KioskMenuApp {
    catalog: Catalog,
    paths: ConfigPaths,
    fullscreen: bool,
    driver: MenuDriver,
    resources: Option<EguiResources>,
    report: Rc<RefCell<Option<MenuReport>>>,
    #[cfg(feature = "gamepad")]
    gamepads: Option<GamepadPoller>,
}

impl KioskMenuApp {
    pub fn new(
        catalog: Catalog,
        paths: ConfigPaths,
        fullscreen: bool,
        report: Rc<RefCell<Option<MenuReport>>>,
    ) -> Self {
        #[cfg(feature = "gamepad")]
        let gamepads = match GamepadPoller::new() {
            Ok(poller) => Some(poller),
            Err(err) => {
                warn!("game controllers disabled: {err:#}");
                None
            }
        };
        Self {
            catalog,
            paths,
            fullscreen,
            driver: MenuDriver::new(),
            resources: None,
            report,
            #[cfg(feature = "gamepad")]
            gamepads,
        }
    }

    fn gather_input(&mut self, ctx: &Context) -> Vec<crate::input::RawInput> {
        #[allow(unused_mut)]
        let mut raw = collect_frame_input(ctx);
        #[cfg(feature = "gamepad")]
        if let Some(poller) = self.gamepads.as_mut() {
            raw.extend(poller.poll());
        }
        raw
    }
}

impl eframe::App for KioskMenuApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        BACKGROUND_COLOR.to_normalized_gamma_f32()
    }

    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if self.fullscreen {
            ctx.set_cursor_icon(CursorIcon::None);
        }

        let raw = self.gather_input(ctx);
        if let Some(report) = self.driver.step(raw, &self.catalog) {
            info!(state = ?report.state, no_restart = report.no_restart, "menu decided");
            if self.report.borrow_mut().replace(report).is_some() {
                warn!("menu session reported twice");
            }
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        let mut surface = EguiSurface::new(ctx);
        let resources = self
            .resources
            .get_or_insert_with(|| EguiResources::build(&mut surface, &self.catalog, &self.paths));
        render_menu(&mut surface, resources, self.driver.state());

        ctx.request_repaint_after(FRAME_INTERVAL);
    }
}
