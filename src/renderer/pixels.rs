//! Software RGBA framebuffer
//!
//! Used for native/headless runs and tests. Text has no glyph rasterizer;
//! HUD strings are kept per frame so callers can inspect or print them.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::{Color, RenderSurface};

/// 8-bit RGBA pixel
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub fn from_color(color: Color) -> Self {
        let [r, g, b, a] = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        Self { r, g, b, a }
    }

    /// Source-over blend of `color` onto this pixel
    fn blend(self, color: Color) -> Self {
        let alpha = color[3].clamp(0.0, 1.0);
        if alpha >= 1.0 {
            return Self::from_color(color);
        }
        let mix = |dst: u8, src: f32| {
            let dst = dst as f32 / 255.0;
            ((src.clamp(0.0, 1.0) * alpha + dst * (1.0 - alpha)) * 255.0).round() as u8
        };
        Self {
            r: mix(self.r, color[0]),
            g: mix(self.g, color[1]),
            b: mix(self.b, color[2]),
            a: 255,
        }
    }
}

/// CPU-side raster surface
#[derive(Debug, Clone)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
    texts: Vec<String>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba8::zeroed(); (width * height) as usize],
            texts: Vec::new(),
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// Raw RGBA bytes, row-major (ready for an ImageData/texture upload)
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Text drawn since the last clear
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    /// Clip a span to the framebuffer, returning pixel index ranges
    fn clip(&self, x0: f32, x1: f32, y0: f32, y1: f32) -> Option<(u32, u32, u32, u32)> {
        let cx0 = x0.max(0.0).round() as i64;
        let cx1 = (x1.min(self.width as f32)).round() as i64;
        let cy0 = y0.max(0.0).round() as i64;
        let cy1 = (y1.min(self.height as f32)).round() as i64;
        if cx0 >= cx1 || cy0 >= cy1 {
            return None;
        }
        Some((cx0 as u32, cx1 as u32, cy0 as u32, cy1 as u32))
    }
}

impl RenderSurface for PixelSurface {
    fn size(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    fn clear(&mut self, color: Color) {
        self.pixels.fill(Rgba8::from_color(color));
        self.texts.clear();
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let Some((x0, x1, y0, y1)) = self.clip(x, x + width, y, y + height) else {
            return;
        };
        for py in y0..y1 {
            let row = (py * self.width) as usize;
            for px in x0..x1 {
                let idx = row + px as usize;
                self.pixels[idx] = self.pixels[idx].blend(color);
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let Some((x0, x1, y0, y1)) = self.clip(
            center.x - radius,
            center.x + radius,
            center.y - radius,
            center.y + radius,
        ) else {
            return;
        };
        let r2 = radius * radius;
        for py in y0..y1 {
            let row = (py * self.width) as usize;
            for px in x0..x1 {
                // Sample at the pixel center
                let d = Vec2::new(px as f32 + 0.5, py as f32 + 0.5) - center;
                if d.length_squared() <= r2 {
                    let idx = row + px as usize;
                    self.pixels[idx] = self.pixels[idx].blend(color);
                }
            }
        }
    }

    fn fill_text(&mut self, text: &str, _x: f32, _y: f32, _color: Color) {
        self.texts.push(text.to_string());
    }
}
