//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
use std::{cell::RefCell, rc::Rc};

use crate::{vec2f, Vec2f};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Handle referencing a host-owned texture. The engine never dereferences it;
/// it travels through draw commands back to the renderer.
pub struct TextureId(u64);

impl TextureId {
    /// Wraps a raw host texture identifier.
    pub fn new(raw: u64) -> Self { Self(raw) }

    /// Returns the raw numeric identifier stored inside the handle.
    pub fn raw(self) -> u64 { self.0 }
}

impl Default for TextureId {
    fn default() -> Self { Self(0) }
}

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
/// Handle referencing a font registered with the atlas service.
pub struct FontId(pub usize);

#[derive(Copy, Clone, Debug)]
/// Quad and metrics for one glyph, in units of the font's base size.
pub struct Glyph {
    /// Quad corner offsets relative to the pen position, top-left.
    pub x0: f32,
    /// Quad top offset.
    pub y0: f32,
    /// Quad right offset.
    pub x1: f32,
    /// Quad bottom offset.
    pub y1: f32,
    /// Texture coordinate of the top-left corner.
    pub u0: f32,
    /// Texture coordinate top.
    pub v0: f32,
    /// Texture coordinate right.
    pub u1: f32,
    /// Texture coordinate bottom.
    pub v1: f32,
    /// Horizontal pen advance after this glyph.
    pub advance_x: f32,
}

#[derive(Copy, Clone, Debug)]
/// Per-font metrics at the font's base size.
pub struct FontMetrics {
    /// Pixel size the glyph quads are expressed in. Must be positive.
    pub size: f32,
    /// Distance between two baselines.
    pub line_height: f32,
    /// Distance from the top of a line to the baseline.
    pub ascent: f32,
}

/// Interface to the external glyph/texture service. Rasterization and packing
/// happen outside the engine; the engine only consumes metrics, UVs and the
/// opaque texture handle the host stored back after uploading the pixels.
pub trait FontAtlas {
    /// Texture holding every glyph plus the white pixel.
    fn texture(&self) -> TextureId;
    /// UV of an opaque white texel, used for untextured geometry.
    fn white_uv(&self) -> Vec2f;
    /// Metrics for a registered font.
    fn metrics(&self, font: FontId) -> FontMetrics;
    /// Glyph quad/UV for a code point, or `None` when the font lacks it.
    fn glyph(&self, font: FontId, c: char) -> Option<Glyph>;
}

#[derive(Clone)]
/// Shared handle to the atlas service consumed throughout the engine.
pub struct AtlasHandle(Rc<RefCell<dyn FontAtlas>>);

impl AtlasHandle {
    /// Wraps an atlas implementation into a shared handle.
    ///
    /// Panics when font 0 reports a non-positive size: an unloaded or
    /// degenerate font makes every later layout/draw call meaningless, so this
    /// is treated as a programming error rather than a recoverable state.
    pub fn new<A: FontAtlas + 'static>(atlas: A) -> Self {
        let metrics = atlas.metrics(FontId(0));
        assert!(metrics.size > 0.0, "font atlas reports a non-positive font size");
        Self(Rc::new(RefCell::new(atlas)))
    }

    /// Returns the atlas texture handle.
    pub fn texture(&self) -> TextureId { self.0.borrow().texture() }

    /// Returns the white-texel UV.
    pub fn white_uv(&self) -> Vec2f { self.0.borrow().white_uv() }

    /// Returns metrics for `font`.
    pub fn metrics(&self, font: FontId) -> FontMetrics { self.0.borrow().metrics(font) }

    /// Returns the glyph for `c`, falling back to `?` for unknown code points.
    pub fn glyph_or_fallback(&self, font: FontId, c: char) -> Option<Glyph> {
        let atlas = self.0.borrow();
        atlas.glyph(font, c).or_else(|| atlas.glyph(font, '?'))
    }

    /// Returns the glyph for `c`, if present.
    pub fn glyph(&self, font: FontId, c: char) -> Option<Glyph> { self.0.borrow().glyph(font, c) }

    /// Line height for `font` scaled to `size`.
    pub fn line_height(&self, font: FontId, size: f32) -> f32 {
        let m = self.metrics(font);
        m.line_height * (size / m.size)
    }

    /// Measures `text` rendered at `size`, wrapping at `wrap_width` when
    /// positive. Newlines always break; wrapping breaks at word boundaries
    /// where possible, otherwise mid-word.
    pub fn calc_text_size(&self, font: FontId, size: f32, text: &str, wrap_width: f32) -> Vec2f {
        let m = self.metrics(font);
        assert!(m.size > 0.0, "text measured against a degenerate font");
        let scale = size / m.size;
        let line_height = m.line_height * scale;

        let mut max_width: f32 = 0.0;
        let mut height = 0.0;
        for line in text.split('\n') {
            if wrap_width > 0.0 {
                let (w, lines) = self.measure_wrapped_line(font, scale, line, wrap_width);
                max_width = max_width.max(w);
                height += line_height * lines as f32;
            } else {
                max_width = max_width.max(self.line_width(font, scale, line));
                height += line_height;
            }
        }
        vec2f(max_width, height.max(line_height))
    }

    fn line_width(&self, font: FontId, scale: f32, line: &str) -> f32 {
        let atlas = self.0.borrow();
        let mut w = 0.0;
        for c in line.chars() {
            if let Some(g) = atlas.glyph(font, c).or_else(|| atlas.glyph(font, '?')) {
                w += g.advance_x * scale;
            }
        }
        w
    }

    fn measure_wrapped_line(&self, font: FontId, scale: f32, line: &str, wrap_width: f32) -> (f32, usize) {
        let mut lines = 1usize;
        let mut x = 0.0f32;
        let mut max_width = 0.0f32;
        for word in line.split_inclusive(' ') {
            let word_width = self.line_width(font, scale, word);
            if x > 0.0 && x + word_width > wrap_width {
                max_width = max_width.max(x);
                x = 0.0;
                lines += 1;
            }
            x += word_width;
        }
        (max_width.max(x), lines)
    }
}

/// Deterministic monospace atlas covering the printable ASCII range.
///
/// Every glyph maps to a fixed-advance quad with UVs derived from a 16x6 cell
/// grid, which makes text metrics exactly predictable — the property headless
/// hosts and the test suite rely on. Real hosts plug a rasterizing atlas in
/// through [`FontAtlas`] instead.
pub struct MonoAtlas {
    texture: TextureId,
    size: f32,
    advance: f32,
}

impl MonoAtlas {
    const FIRST: u32 = 0x20;
    const LAST: u32 = 0x7e;
    const COLS: u32 = 16;

    /// Creates a monospace atlas with the given base size, advancing
    /// `size * 0.5` per glyph.
    pub fn new(texture: TextureId, size: f32) -> Self {
        assert!(size > 0.0, "monospace atlas created with a non-positive size");
        Self { texture, size, advance: (size * 0.5).floor() }
    }
}

impl FontAtlas for MonoAtlas {
    fn texture(&self) -> TextureId { self.texture }

    fn white_uv(&self) -> Vec2f { vec2f(0.0, 0.0) }

    fn metrics(&self, _font: FontId) -> FontMetrics {
        FontMetrics {
            size: self.size,
            line_height: (self.size * 1.25).floor(),
            ascent: self.size,
        }
    }

    fn glyph(&self, _font: FontId, c: char) -> Option<Glyph> {
        let code = c as u32;
        if code < Self::FIRST || code > Self::LAST {
            return None;
        }
        let index = code - Self::FIRST;
        let col = (index % Self::COLS) as f32;
        let row = (index / Self::COLS) as f32;
        let rows = ((Self::LAST - Self::FIRST) / Self::COLS + 1) as f32;
        let cell_u = 1.0 / Self::COLS as f32;
        let cell_v = 1.0 / rows;
        Some(Glyph {
            x0: 0.0,
            y0: 0.0,
            x1: self.advance,
            y1: self.size,
            u0: col * cell_u,
            v0: row * cell_v,
            u1: (col + 1.0) * cell_u,
            v1: (row + 1.0) * cell_v,
            advance_x: self.advance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atlas() -> AtlasHandle { AtlasHandle::new(MonoAtlas::new(TextureId::new(1), 16.0)) }

    #[test]
    fn monospace_metrics_are_exact() {
        let atlas = atlas();
        let size = atlas.calc_text_size(FontId(0), 16.0, "abcd", 0.0);
        assert_eq!(size.x, 32.0);
        assert_eq!(size.y, 20.0);
    }

    #[test]
    fn newline_adds_a_line() {
        let atlas = atlas();
        let size = atlas.calc_text_size(FontId(0), 16.0, "ab\ncdef", 0.0);
        assert_eq!(size.x, 32.0);
        assert_eq!(size.y, 40.0);
    }

    #[test]
    fn wrap_breaks_at_word_boundaries() {
        let atlas = atlas();
        // "aaa bbb" at 8px/glyph wraps into two lines within 40px
        let size = atlas.calc_text_size(FontId(0), 16.0, "aaa bbb", 40.0);
        assert_eq!(size.y, 40.0);
    }

    #[test]
    fn unknown_codepoints_fall_back() {
        let atlas = atlas();
        assert!(atlas.glyph(FontId(0), '\u{1F600}').is_none());
        assert!(atlas.glyph_or_fallback(FontId(0), '\u{1F600}').is_some());
    }

    #[test]
    #[should_panic]
    fn degenerate_font_size_fails_fast() {
        let _ = MonoAtlas::new(TextureId::new(1), 0.0);
    }
}
