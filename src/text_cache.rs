//! Memoized text layout.
//!
//! Laying out a string into a paintable galley is the expensive part of text
//! drawing, and most of the HUD reads the same on consecutive frames. A
//! [`TextCache`] keeps the last galley it built and only rebuilds it when the
//! string or the color changes.

use std::sync::Arc;

use eframe::egui;
use tracing::warn;

use crate::error::RenderError;

/// Turns a string into something that can be painted.
pub trait TextRasterizer {
    type Texture;

    fn rasterize(&mut self, text: &str, color: egui::Color32) -> Result<Self::Texture, RenderError>;
}

/// Lays text out through egui's font atlas at a single font size.
pub struct GalleyRasterizer<'a> {
    ctx: &'a egui::Context,
    font: egui::FontId,
}

impl<'a> GalleyRasterizer<'a> {
    pub fn new(ctx: &'a egui::Context, font: egui::FontId) -> Self {
        Self { ctx, font }
    }
}

impl TextRasterizer for GalleyRasterizer<'_> {
    type Texture = Arc<egui::Galley>;

    fn rasterize(&mut self, text: &str, color: egui::Color32) -> Result<Self::Texture, RenderError> {
        let font = self.font.clone();
        self.ctx.fonts(|fonts| {
            if !fonts.families().contains(&font.family) {
                return Err(RenderError::MissingFontFamily(format!("{:?}", font.family)));
            }
            Ok(fonts.layout_no_wrap(text.to_owned(), font, color))
        })
    }
}

struct Entry<T> {
    texture: T,
    text: String,
    color: egui::Color32,
}

pub struct TextCache<T> {
    pos: egui::Pos2,
    entry: Option<Entry<T>>,
    regenerations: u64,
}

impl<T> TextCache<T> {
    pub fn new(pos: egui::Pos2) -> Self {
        Self {
            pos,
            entry: None,
            regenerations: 0,
        }
    }

    pub fn pos(&self) -> egui::Pos2 {
        self.pos
    }

    /// How many times the texture has been rebuilt.
    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }

    /// Returns a texture for `text` in `color`, rebuilding it only if either
    /// differs from the cached one. On failure the old texture is dropped, a
    /// warning is logged and `None` is returned so the caller skips drawing.
    pub fn get<R>(&mut self, rasterizer: &mut R, text: &str, color: egui::Color32) -> Option<&T>
    where
        R: TextRasterizer<Texture = T>,
    {
        let stale = match &self.entry {
            Some(entry) => entry.text != text || entry.color != color,
            None => true,
        };

        if stale {
            self.entry = None;
            self.regenerations += 1;
            match rasterizer.rasterize(text, color) {
                Ok(texture) => {
                    self.entry = Some(Entry {
                        texture,
                        text: text.to_owned(),
                        color,
                    })
                }
                Err(e) => {
                    warn!(text, error = %e, "skipping text element");
                    return None;
                }
            }
        }

        self.entry.as_ref().map(|entry| &entry.texture)
    }
}

impl TextCache<Arc<egui::Galley>> {
    /// Lays out (if needed) and paints `text` at the cache position.
    pub fn paint(
        &mut self,
        painter: &egui::Painter,
        rasterizer: &mut GalleyRasterizer<'_>,
        text: &str,
        color: egui::Color32,
    ) {
        let pos = self.pos();
        if let Some(galley) = self.get(rasterizer, text, color) {
            painter.galley(pos, Arc::clone(galley), color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every call; fails on strings starting with '!'.
    #[derive(Default)]
    struct Counting {
        calls: Vec<(String, egui::Color32)>,
    }

    impl TextRasterizer for Counting {
        type Texture = String;

        fn rasterize(&mut self, text: &str, color: egui::Color32) -> Result<String, RenderError> {
            self.calls.push((text.to_owned(), color));
            if text.starts_with('!') {
                return Err(RenderError::MissingFontFamily("test".into()));
            }
            Ok(format!("{text}@{color:?}"))
        }
    }

    fn cache() -> TextCache<String> {
        TextCache::new(egui::pos2(10.0, 20.0))
    }

    #[test]
    fn identical_calls_reuse_the_texture() {
        let mut r = Counting::default();
        let mut c = cache();
        for _ in 0..5 {
            assert!(c.get(&mut r, "Balance: 3", egui::Color32::WHITE).is_some());
        }
        assert_eq!(r.calls.len(), 1);
        assert_eq!(c.regenerations(), 1);
    }

    #[test]
    fn new_string_regenerates() {
        let mut r = Counting::default();
        let mut c = cache();
        c.get(&mut r, "Balance: 3", egui::Color32::WHITE);
        let tex = c.get(&mut r, "Balance: 4", egui::Color32::WHITE).cloned();
        assert_eq!(tex, Some(format!("Balance: 4@{:?}", egui::Color32::WHITE)));
        assert_eq!(c.regenerations(), 2);
    }

    #[test]
    fn new_color_regenerates() {
        let mut r = Counting::default();
        let mut c = cache();
        c.get(&mut r, "Level 1", egui::Color32::WHITE);
        c.get(&mut r, "Level 1", egui::Color32::RED);
        c.get(&mut r, "Level 1", egui::Color32::RED);
        assert_eq!(
            r.calls,
            vec![
                ("Level 1".to_owned(), egui::Color32::WHITE),
                ("Level 1".to_owned(), egui::Color32::RED),
            ]
        );
    }

    #[test]
    fn failure_skips_and_retries_next_frame() {
        let mut r = Counting::default();
        let mut c = cache();
        c.get(&mut r, "ok", egui::Color32::WHITE);
        assert!(c.get(&mut r, "!broken", egui::Color32::WHITE).is_none());
        assert!(c.get(&mut r, "!broken", egui::Color32::WHITE).is_none());
        assert_eq!(r.calls.len(), 3);
        assert!(c.get(&mut r, "ok", egui::Color32::WHITE).is_some());
        assert_eq!(c.regenerations(), 4);
    }

    #[test]
    fn keeps_its_position() {
        assert_eq!(cache().pos(), egui::pos2(10.0, 20.0));
    }
}
