use crate::icons::DecodedImage;
use crate::render::{DrawSurface, MenuResources, FONT_SIZE};
use anyhow::Result;
use eframe::egui::{
    pos2, text::LayoutJob, Align, Color32, ColorImage, Context, FontId, Galley, LayerId,
    Painter, Rect, TextureHandle, TextureOptions, Vec2,
};
use std::sync::Arc;

pub type EguiResources = MenuResources<TextureHandle, Arc<Galley>>;

/// Paints onto the background layer of the current egui frame.
pub struct EguiSurface<'a> {
    ctx: &'a Context,
    painter: Painter,
}

impl<'a> EguiSurface<'a> {
    pub fn new(ctx: &'a Context) -> Self {
        Self {
            ctx,
            painter: ctx.layer_painter(LayerId::background()),
        }
    }
}

fn tint(brightness: f32) -> Color32 {
    Color32::from_gray((brightness.clamp(0.0, 1.0) * 255.0).round() as u8)
}

impl DrawSurface for EguiSurface<'_> {
    type Image = TextureHandle;
    type Text = Arc<Galley>;

    fn output_size(&self) -> Vec2 {
        self.ctx.screen_rect().size()
    }

    fn load_image(&mut self, name: &str, image: DecodedImage) -> Result<TextureHandle> {
        let size = image.size();
        let color = if image.premultiplied {
            ColorImage::from_rgba_premultiplied(size, &image.rgba)
        } else {
            ColorImage::from_rgba_unmultiplied(size, &image.rgba)
        };
        Ok(self.ctx.load_texture(name, color, TextureOptions::LINEAR))
    }

    fn layout_text(&mut self, text: &str, wrap_width: Option<f32>) -> Result<Arc<Galley>> {
        let mut job = LayoutJob::simple(
            text.to_owned(),
            FontId::proportional(FONT_SIZE),
            Color32::WHITE,
            wrap_width.unwrap_or(f32::INFINITY),
        );
        if wrap_width.is_some() {
            job.halign = Align::Center;
        }
        Ok(self.ctx.fonts(|fonts| fonts.layout_job(job)))
    }

    fn text_size(&self, text: &Arc<Galley>) -> Vec2 {
        text.size()
    }

    fn clear(&mut self, color: Color32) {
        self.painter.rect_filled(self.ctx.screen_rect(), 0.0, color);
    }

    fn draw_image(&mut self, image: &TextureHandle, dest: Rect, brightness: f32) {
        let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
        self.painter.image(image.id(), dest, uv, tint(brightness));
    }

    fn draw_text(&mut self, text: &Arc<Galley>, dest: Rect, brightness: f32) {
        // centred galleys are laid out around x = 0
        let origin = dest.min - text.rect.min.to_vec2();
        self.painter
            .galley_with_override_text_color(origin, text.clone(), tint(brightness));
    }
}
