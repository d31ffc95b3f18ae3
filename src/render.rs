use crate::catalog::Catalog;
use crate::config::ConfigPaths;
use crate::icons::{decode_image_file, DecodedImage};
use crate::selection::SelectionState;
use anyhow::Result;
use eframe::egui::{pos2, vec2, Color32, Rect, Vec2};
use std::path::Path;
use tracing::warn;

pub const ICON_BASE_SIZE: f32 = 256.0;
pub const ICON_SPACING: f32 = 120.0;
pub const SELECTED_SCALE: f32 = 1.3;
pub const TEXT_Y_OFFSET: f32 = 220.0;
pub const LABEL_WRAP_WIDTH: f32 = ICON_BASE_SIZE * 1.2;
pub const VARIANT_LINE_GAP: f32 = 8.0;
pub const FONT_SIZE: f32 = 48.0;
pub const FOCUSED_BRIGHTNESS: f32 = 1.0;
pub const DIM_BRIGHTNESS: f32 = 150.0 / 255.0;
pub const BACKGROUND_COLOR: Color32 = Color32::from_rgb(20, 20, 35);

/// The drawing backend. Handles are owned by the caller; dropping them
/// releases the underlying GPU resources.
pub trait DrawSurface {
    type Image;
    type Text;

    fn output_size(&self) -> Vec2;
    fn load_image(&mut self, name: &str, image: DecodedImage) -> Result<Self::Image>;
    /// Lay out `text`, wrapping and centring lines at `wrap_width` when given.
    fn layout_text(&mut self, text: &str, wrap_width: Option<f32>) -> Result<Self::Text>;
    fn text_size(&self, text: &Self::Text) -> Vec2;
    fn clear(&mut self, color: Color32);
    /// `brightness` multiplies every colour channel, 1.0 leaves it unchanged.
    fn draw_image(&mut self, image: &Self::Image, dest: Rect, brightness: f32);
    fn draw_text(&mut self, text: &Self::Text, dest: Rect, brightness: f32);
}

// ── Layout ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuLayout {
    output: Vec2,
    start_x: f32,
}

impl MenuLayout {
    pub fn new(output: Vec2, app_count: usize) -> Self {
        let n = app_count as f32;
        let total_width = n * ICON_BASE_SIZE + (n - 1.0).max(0.0) * ICON_SPACING;
        Self {
            output,
            start_x: (output.x - total_width) / 2.0,
        }
    }

    pub fn slot_center_x(&self, idx: usize) -> f32 {
        self.start_x + idx as f32 * (ICON_BASE_SIZE + ICON_SPACING) + ICON_BASE_SIZE / 2.0
    }

    pub fn icon_rect(&self, idx: usize, focused: bool) -> Rect {
        let scale = if focused { SELECTED_SCALE } else { 1.0 };
        let size = ICON_BASE_SIZE * scale;
        Rect::from_center_size(pos2(self.slot_center_x(idx), self.output.y / 2.0), vec2(size, size))
    }

    pub fn label_rect(&self, idx: usize, text_size: Vec2) -> Rect {
        Rect::from_min_size(
            pos2(
                self.slot_center_x(idx) - text_size.x / 2.0,
                self.output.y / 2.0 + TEXT_Y_OFFSET,
            ),
            text_size,
        )
    }

    /// Rectangle for the next variant label, stacked under `above`.
    pub fn stacked_rect(&self, idx: usize, above: Rect, text_size: Vec2) -> Rect {
        Rect::from_min_size(
            pos2(
                self.slot_center_x(idx) - text_size.x / 2.0,
                above.bottom() + VARIANT_LINE_GAP,
            ),
            text_size,
        )
    }
}

// ── Per-session resources ─────────────────────────────────────────────────────

#[derive(Debug)]
pub struct AppResources<I, T> {
    pub icon: Option<I>,
    pub name: Option<T>,
    pub variants: Vec<Option<T>>,
}

/// Drawables derived from the catalog for one graphical session. Slots that
/// failed to load stay `None` and are skipped when drawing.
#[derive(Debug)]
pub struct MenuResources<I, T> {
    pub background: Option<I>,
    pub apps: Vec<AppResources<I, T>>,
}

impl<I, T> MenuResources<I, T> {
    pub fn build<S>(surface: &mut S, catalog: &Catalog, paths: &ConfigPaths) -> Self
    where
        S: DrawSurface<Image = I, Text = T>,
    {
        let svg_px = (ICON_BASE_SIZE * SELECTED_SCALE).ceil() as u32;
        let background = if paths.background.exists() {
            load_image_slot(surface, &paths.background, svg_px)
        } else {
            None
        };
        let apps = catalog
            .iter()
            .map(|app| {
                let icon = load_image_slot(surface, &paths.resolve(&app.icon_reference), svg_px);
                let name = layout_slot(surface, &app.name);
                let variants = if app.variants.len() > 1 {
                    app.variants
                        .iter()
                        .map(|variant| layout_slot(surface, &variant.label))
                        .collect()
                } else {
                    Vec::new()
                };
                AppResources {
                    icon,
                    name,
                    variants,
                }
            })
            .collect();
        Self { background, apps }
    }
}

fn load_image_slot<S: DrawSurface>(surface: &mut S, path: &Path, svg_px: u32) -> Option<S::Image> {
    let loaded = decode_image_file(path, svg_px)
        .and_then(|image| surface.load_image(&path.display().to_string(), image));
    match loaded {
        Ok(image) => Some(image),
        Err(err) => {
            warn!("could not load image {}: {err:#}", path.display());
            None
        }
    }
}

fn layout_slot<S: DrawSurface>(surface: &mut S, text: &str) -> Option<S::Text> {
    match surface.layout_text(text, Some(LABEL_WRAP_WIDTH)) {
        Ok(layout) => Some(layout),
        Err(err) => {
            warn!("could not render text for {text}: {err:#}");
            None
        }
    }
}

// ── Frame ─────────────────────────────────────────────────────────────────────

pub fn render_menu<S: DrawSurface>(
    surface: &mut S,
    resources: &MenuResources<S::Image, S::Text>,
    state: &SelectionState,
) {
    let output = surface.output_size();
    surface.clear(BACKGROUND_COLOR);
    if let Some(background) = &resources.background {
        surface.draw_image(
            background,
            Rect::from_min_size(pos2(0.0, 0.0), output),
            FOCUSED_BRIGHTNESS,
        );
    }

    let layout = MenuLayout::new(output, resources.apps.len());
    let focused = state.selection();
    for (idx, app) in resources.apps.iter().enumerate() {
        let is_focused = focused.is_some_and(|sel| sel.application == idx);
        let brightness = if is_focused {
            FOCUSED_BRIGHTNESS
        } else {
            DIM_BRIGHTNESS
        };

        if let Some(icon) = &app.icon {
            surface.draw_image(icon, layout.icon_rect(idx, is_focused), brightness);
        }

        let name_rect = app.name.as_ref().map(|name| {
            let rect = layout.label_rect(idx, surface.text_size(name));
            surface.draw_text(name, rect, brightness);
            rect
        });

        let Some(sel) = focused.filter(|_| is_focused) else {
            continue;
        };
        let mut above = name_rect.unwrap_or_else(|| layout.label_rect(idx, Vec2::ZERO));
        for (variant_idx, label) in app.variants.iter().enumerate() {
            let Some(label) = label else {
                continue;
            };
            let rect = layout.stacked_rect(idx, above, surface.text_size(label));
            let brightness = if variant_idx == sel.variant {
                FOCUSED_BRIGHTNESS
            } else {
                DIM_BRIGHTNESS
            };
            surface.draw_text(label, rect, brightness);
            above = rect;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Application, Variant};
    use crate::selection::Selection;
    use anyhow::bail;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Clear,
        Image(String, Rect, f32),
        Text(String, Rect, f32),
    }

    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<Call>,
        fail_text: Option<String>,
    }

    impl DrawSurface for RecordingSurface {
        type Image = String;
        type Text = String;

        fn output_size(&self) -> Vec2 {
            vec2(1920.0, 1080.0)
        }

        fn load_image(&mut self, name: &str, _image: DecodedImage) -> Result<String> {
            Ok(name.to_string())
        }

        fn layout_text(&mut self, text: &str, _wrap_width: Option<f32>) -> Result<String> {
            if self.fail_text.as_deref() == Some(text) {
                bail!("layout failed");
            }
            Ok(text.to_string())
        }

        fn text_size(&self, text: &String) -> Vec2 {
            vec2(text.len() as f32 * 10.0, 50.0)
        }

        fn clear(&mut self, _color: Color32) {
            self.calls.push(Call::Clear);
        }

        fn draw_image(&mut self, image: &String, dest: Rect, brightness: f32) {
            self.calls.push(Call::Image(image.clone(), dest, brightness));
        }

        fn draw_text(&mut self, text: &String, dest: Rect, brightness: f32) {
            self.calls.push(Call::Text(text.clone(), dest, brightness));
        }
    }

    fn resources(apps: &[(&str, &[&str])]) -> MenuResources<String, String> {
        MenuResources {
            background: None,
            apps: apps
                .iter()
                .map(|(name, variants)| AppResources {
                    icon: Some(format!("{name}.png")),
                    name: Some(name.to_string()),
                    variants: variants.iter().map(|v| Some(v.to_string())).collect(),
                })
                .collect(),
        }
    }

    fn texts(calls: &[Call]) -> Vec<(String, f32)> {
        calls
            .iter()
            .filter_map(|call| match call {
                Call::Text(text, _, brightness) => Some((text.clone(), *brightness)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn row_is_centred_horizontally() {
        let layout = MenuLayout::new(vec2(1920.0, 1080.0), 3);
        // 3 * 256 + 2 * 120 = 1008 wide, starting at 456
        assert_eq!(layout.slot_center_x(0), 456.0 + 128.0);
        assert_eq!(layout.slot_center_x(2), 456.0 + 2.0 * 376.0 + 128.0);
    }

    #[test]
    fn focused_icon_is_scaled_around_its_centre() {
        let layout = MenuLayout::new(vec2(1920.0, 1080.0), 1);
        let plain = layout.icon_rect(0, false);
        let focused = layout.icon_rect(0, true);
        assert_eq!(plain.center(), focused.center());
        assert_eq!(plain.width(), 256.0);
        assert!((focused.width() - 332.8).abs() < 1e-3);
        assert_eq!(focused.center().y, 540.0);
    }

    #[test]
    fn focused_item_is_bright_and_others_dim() {
        let mut surface = RecordingSurface::default();
        let res = resources(&[("Kodi", &[]), ("Sway", &[])]);
        let state = SelectionState::Browsing(Selection::new(1, 0));
        render_menu(&mut surface, &res, &state);

        assert_eq!(surface.calls[0], Call::Clear);
        assert_eq!(
            texts(&surface.calls),
            [
                ("Kodi".to_string(), DIM_BRIGHTNESS),
                ("Sway".to_string(), FOCUSED_BRIGHTNESS)
            ]
        );
        let icons: Vec<_> = surface
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Image(name, rect, b) => Some((name.clone(), rect.width(), *b)),
                _ => None,
            })
            .collect();
        assert_eq!(icons[0], ("Kodi.png".to_string(), 256.0, DIM_BRIGHTNESS));
        assert_eq!(icons[1].0, "Sway.png");
        assert_eq!(icons[1].2, FOCUSED_BRIGHTNESS);
    }

    #[test]
    fn variants_listed_only_for_focused_application() {
        let mut surface = RecordingSurface::default();
        let res = resources(&[("Moonlight", &["Stream", "Debug"]), ("Kodi", &["TV", "Music"])]);
        let state = SelectionState::Browsing(Selection::new(0, 1));
        render_menu(&mut surface, &res, &state);

        let drawn = texts(&surface.calls);
        assert_eq!(
            drawn,
            [
                ("Moonlight".to_string(), FOCUSED_BRIGHTNESS),
                ("Stream".to_string(), DIM_BRIGHTNESS),
                ("Debug".to_string(), FOCUSED_BRIGHTNESS),
                ("Kodi".to_string(), DIM_BRIGHTNESS),
            ]
        );

        let rects: Vec<Rect> = surface
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Text(_, rect, _) => Some(*rect),
                _ => None,
            })
            .collect();
        assert!(rects[1].top() > rects[0].bottom());
        assert!(rects[2].top() > rects[1].bottom());
    }

    #[test]
    fn cancelled_state_draws_everything_dim() {
        let mut surface = RecordingSurface::default();
        let res = resources(&[("Kodi", &[]), ("Sway", &[])]);
        render_menu(&mut surface, &res, &SelectionState::Cancelled);
        assert!(texts(&surface.calls).iter().all(|(_, b)| *b == DIM_BRIGHTNESS));
    }

    #[test]
    fn failed_resources_leave_blank_slots() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::new(vec![Application {
            name: "Kodi".into(),
            icon_reference: "missing.png".into(),
            variants: vec![Variant::new("TV", "kodi"), Variant::new("Broken", "kodi -x")],
        }])
        .unwrap();
        let mut surface = RecordingSurface {
            fail_text: Some("Broken".into()),
            ..Default::default()
        };
        let res = MenuResources::build(&mut surface, &catalog, &ConfigPaths::in_dir(dir.path()));
        assert!(res.background.is_none());
        assert!(res.apps[0].icon.is_none());
        assert_eq!(res.apps[0].name.as_deref(), Some("Kodi"));
        assert_eq!(res.apps[0].variants, vec![Some("TV".to_string()), None]);

        render_menu(&mut surface, &res, &SelectionState::default());
        assert_eq!(
            texts(&surface.calls),
            [
                ("Kodi".to_string(), FOCUSED_BRIGHTNESS),
                ("TV".to_string(), FOCUSED_BRIGHTNESS)
            ]
        );
    }

    #[test]
    fn single_variant_applications_get_no_variant_labels() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::new(vec![Application {
            name: "Kodi".into(),
            icon_reference: "kodi.png".into(),
            variants: vec![Variant::new("TV", "kodi")],
        }])
        .unwrap();
        let mut surface = RecordingSurface::default();
        let res = MenuResources::build(&mut surface, &catalog, &ConfigPaths::in_dir(dir.path()));
        assert!(res.apps[0].variants.is_empty());
    }
}
