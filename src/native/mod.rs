mod app;
mod events;
#[cfg(feature = "gamepad")]
mod gamepad;
mod surface;

pub use app::{configure_native_fonts, KioskMenuApp};
pub use events::{collect_frame_input, translate_event};
pub use surface::EguiSurface;

use crate::catalog::Catalog;
use crate::config::ConfigPaths;
use crate::fonts::LoadedFont;
use crate::session::{MenuFrontend, MenuReport};
use anyhow::Result;
use eframe::egui::ViewportBuilder;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

pub const WINDOW_TITLE: &str = "Kiosk Launcher";

#[derive(Debug, Clone)]
pub struct NativeOptions {
    /// Run in a 1280x720 decorated window instead of fullscreen.
    pub windowed: bool,
    pub font: LoadedFont,
    pub paths: ConfigPaths,
}

pub struct NativeFrontend {
    options: NativeOptions,
}

impl NativeFrontend {
    pub fn new(options: NativeOptions) -> Self {
        Self { options }
    }

    fn viewport(&self) -> ViewportBuilder {
        let viewport = ViewportBuilder::default().with_title(WINDOW_TITLE);
        if self.options.windowed {
            viewport.with_inner_size([1280.0, 720.0])
        } else {
            viewport.with_fullscreen(true).with_decorations(false)
        }
    }
}

impl MenuFrontend for NativeFrontend {
    fn show_menu(&mut self, catalog: &Catalog) -> Result<MenuReport> {
        let report = Rc::new(RefCell::new(None));
        let options = eframe::NativeOptions {
            viewport: self.viewport(),
            run_and_return: true,
            ..Default::default()
        };

        let app = KioskMenuApp::new(
            catalog.clone(),
            self.options.paths.clone(),
            !self.options.windowed,
            Rc::clone(&report),
        );
        let font = self.options.font.clone();
        debug!(font = %font.path.display(), "opening menu window");
        eframe::run_native(
            WINDOW_TITLE,
            options,
            Box::new(move |cc| {
                cc.egui_ctx.set_zoom_factor(1.0);
                configure_native_fonts(&cc.egui_ctx, &font);
                Ok(Box::new(app))
            }),
        )
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;

        let taken = report.borrow_mut().take();
        Ok(taken.unwrap_or_else(|| {
            warn!("menu window closed without a decision");
            MenuReport::abandoned()
        }))
    }
}
