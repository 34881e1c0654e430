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
use crate::{color, vec2f, Color, Vec2f};

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[repr(usize)]
/// Identifiers for each of the built-in style colors.
pub enum StyleColor {
    /// Default text color.
    Text = 0,
    /// Dimmed text color.
    TextDisabled,
    /// Window background.
    WindowBg,
    /// Popup/tooltip background.
    PopupBg,
    /// Window/frame outline.
    Border,
    /// Background of framed widgets (checkbox, slider track, text input).
    FrameBg,
    /// Framed widget background while hovered.
    FrameBgHovered,
    /// Framed widget background while active.
    FrameBgActive,
    /// Title bar of unfocused windows.
    TitleBg,
    /// Title bar of the focused window.
    TitleBgActive,
    /// Title bar of collapsed windows.
    TitleBgCollapsed,
    /// Scrollbar track.
    ScrollbarBg,
    /// Scrollbar grab.
    ScrollbarGrab,
    /// Scrollbar grab while dragged.
    ScrollbarGrabActive,
    /// Slider grab.
    SliderGrab,
    /// Slider grab while dragged.
    SliderGrabActive,
    /// Default button color.
    Button,
    /// Button color while hovered.
    ButtonHovered,
    /// Button color while pressed.
    ButtonActive,
    /// Tree node / collapsing header background.
    Header,
    /// Header background while hovered.
    HeaderHovered,
    /// Header background while pressed.
    HeaderActive,
    /// Separator lines and column borders.
    Separator,
    /// Checkbox check mark and radio dot.
    CheckMark,
    /// Full-screen dim drawn behind a modal window.
    ModalWindowDim,
}

impl StyleColor {
    /// Number of entries in [`Style::colors`].
    pub const COUNT: usize = 25;
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
/// Identifiers for the pushable scalar/vector style variables.
pub enum StyleVar {
    /// Global alpha multiplier.
    Alpha,
    /// Padding between a window edge and its content.
    WindowPadding,
    /// Corner rounding of windows.
    WindowRounding,
    /// Padding inside framed widgets.
    FramePadding,
    /// Corner rounding of framed widgets.
    FrameRounding,
    /// Spacing between consecutive items.
    ItemSpacing,
    /// Spacing inside composite items (label next to its frame).
    ItemInnerSpacing,
    /// Horizontal indentation step.
    IndentSpacing,
    /// Minimum size of slider/scrollbar grabs.
    GrabMinSize,
}

#[derive(Copy, Clone, Debug)]
/// Value saved by a style-variable push.
pub(crate) enum StyleVarValue {
    F32(f32),
    Vec2(Vec2f),
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct StyleMod {
    pub var: StyleVar,
    pub backup: StyleVarValue,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct ColorMod {
    pub col: StyleColor,
    pub backup: Color,
}

#[derive(Copy, Clone)]
/// Visual constants that drive widget appearance. Flat: a color or variable
/// push temporarily overwrites one slot, nothing cascades.
pub struct Style {
    /// Global alpha multiplier applied to every emitted color.
    pub alpha: f32,
    /// Padding between a window edge and its content.
    pub window_padding: Vec2f,
    /// Corner rounding of windows.
    pub window_rounding: f32,
    /// Minimum window size enforced while resizing.
    pub window_min_size: Vec2f,
    /// Thickness of window borders; 0 disables them.
    pub window_border_size: f32,
    /// Padding inside framed widgets.
    pub frame_padding: Vec2f,
    /// Corner rounding of framed widgets.
    pub frame_rounding: f32,
    /// Spacing between consecutive items.
    pub item_spacing: Vec2f,
    /// Spacing inside composite items.
    pub item_inner_spacing: Vec2f,
    /// Extra tolerance added around rectangles for touch input; (0,0) for mice.
    pub touch_extra_padding: Vec2f,
    /// Horizontal indentation step for trees.
    pub indent_spacing: f32,
    /// Minimum spacing between two columns.
    pub columns_min_spacing: f32,
    /// Width of vertical scrollbars.
    pub scrollbar_size: f32,
    /// Corner rounding of scrollbar grabs.
    pub scrollbar_rounding: f32,
    /// Minimum size of slider/scrollbar grabs.
    pub grab_min_size: f32,
    /// Base font used for all text.
    pub font_size: f32,
    /// Enables the one-unit transparent fringe on strokes.
    pub anti_aliased_lines: bool,
    /// Enables the one-unit transparent fringe on filled shapes.
    pub anti_aliased_fill: bool,
    /// Maximum error allowed when flattening curves into segments.
    pub curve_tessellation_tol: f32,
    /// Palette of [`StyleColor`] entries.
    pub colors: [Color; StyleColor::COUNT],
}

impl Default for Style {
    fn default() -> Self {
        let mut colors = [Color::default(); StyleColor::COUNT];
        colors[StyleColor::Text as usize] = color(230, 230, 230, 255);
        colors[StyleColor::TextDisabled as usize] = color(128, 128, 128, 255);
        colors[StyleColor::WindowBg as usize] = color(15, 15, 15, 240);
        colors[StyleColor::PopupBg as usize] = color(20, 20, 20, 240);
        colors[StyleColor::Border as usize] = color(110, 110, 128, 128);
        colors[StyleColor::FrameBg as usize] = color(41, 74, 122, 138);
        colors[StyleColor::FrameBgHovered as usize] = color(66, 150, 250, 102);
        colors[StyleColor::FrameBgActive as usize] = color(66, 150, 250, 171);
        colors[StyleColor::TitleBg as usize] = color(10, 10, 10, 255);
        colors[StyleColor::TitleBgActive as usize] = color(41, 74, 122, 255);
        colors[StyleColor::TitleBgCollapsed as usize] = color(0, 0, 0, 130);
        colors[StyleColor::ScrollbarBg as usize] = color(5, 5, 5, 135);
        colors[StyleColor::ScrollbarGrab as usize] = color(79, 79, 79, 255);
        colors[StyleColor::ScrollbarGrabActive as usize] = color(130, 130, 130, 255);
        colors[StyleColor::SliderGrab as usize] = color(61, 133, 224, 255);
        colors[StyleColor::SliderGrabActive as usize] = color(66, 150, 250, 255);
        colors[StyleColor::Button as usize] = color(66, 150, 250, 102);
        colors[StyleColor::ButtonHovered as usize] = color(66, 150, 250, 255);
        colors[StyleColor::ButtonActive as usize] = color(15, 135, 250, 255);
        colors[StyleColor::Header as usize] = color(66, 150, 250, 79);
        colors[StyleColor::HeaderHovered as usize] = color(66, 150, 250, 204);
        colors[StyleColor::HeaderActive as usize] = color(66, 150, 250, 255);
        colors[StyleColor::Separator as usize] = color(110, 110, 128, 128);
        colors[StyleColor::CheckMark as usize] = color(66, 150, 250, 255);
        colors[StyleColor::ModalWindowDim as usize] = color(20, 20, 20, 89);

        Self {
            alpha: 1.0,
            window_padding: vec2f(8.0, 8.0),
            window_rounding: 0.0,
            window_min_size: vec2f(32.0, 32.0),
            window_border_size: 1.0,
            frame_padding: vec2f(4.0, 3.0),
            frame_rounding: 0.0,
            item_spacing: vec2f(8.0, 4.0),
            item_inner_spacing: vec2f(4.0, 4.0),
            touch_extra_padding: vec2f(0.0, 0.0),
            indent_spacing: 21.0,
            columns_min_spacing: 6.0,
            scrollbar_size: 14.0,
            scrollbar_rounding: 9.0,
            grab_min_size: 10.0,
            font_size: 13.0,
            anti_aliased_lines: true,
            anti_aliased_fill: true,
            curve_tessellation_tol: 1.25,
            colors,
        }
    }
}

impl Style {
    /// Returns the palette color with the global alpha applied.
    pub fn get_color(&self, col: StyleColor) -> Color { self.colors[col as usize].mul_alpha(self.alpha) }

    /// Returns the raw palette color.
    pub fn color_unscaled(&self, col: StyleColor) -> Color { self.colors[col as usize] }

    pub(crate) fn var_value(&self, var: StyleVar) -> StyleVarValue {
        match var {
            StyleVar::Alpha => StyleVarValue::F32(self.alpha),
            StyleVar::WindowPadding => StyleVarValue::Vec2(self.window_padding),
            StyleVar::WindowRounding => StyleVarValue::F32(self.window_rounding),
            StyleVar::FramePadding => StyleVarValue::Vec2(self.frame_padding),
            StyleVar::FrameRounding => StyleVarValue::F32(self.frame_rounding),
            StyleVar::ItemSpacing => StyleVarValue::Vec2(self.item_spacing),
            StyleVar::ItemInnerSpacing => StyleVarValue::Vec2(self.item_inner_spacing),
            StyleVar::IndentSpacing => StyleVarValue::F32(self.indent_spacing),
            StyleVar::GrabMinSize => StyleVarValue::F32(self.grab_min_size),
        }
    }

    pub(crate) fn set_var(&mut self, var: StyleVar, value: StyleVarValue) {
        match (var, value) {
            (StyleVar::Alpha, StyleVarValue::F32(v)) => self.alpha = v,
            (StyleVar::WindowPadding, StyleVarValue::Vec2(v)) => self.window_padding = v,
            (StyleVar::WindowRounding, StyleVarValue::F32(v)) => self.window_rounding = v,
            (StyleVar::FramePadding, StyleVarValue::Vec2(v)) => self.frame_padding = v,
            (StyleVar::FrameRounding, StyleVarValue::F32(v)) => self.frame_rounding = v,
            (StyleVar::ItemSpacing, StyleVarValue::Vec2(v)) => self.item_spacing = v,
            (StyleVar::ItemInnerSpacing, StyleVarValue::Vec2(v)) => self.item_inner_spacing = v,
            (StyleVar::IndentSpacing, StyleVarValue::F32(v)) => self.indent_spacing = v,
            (StyleVar::GrabMinSize, StyleVarValue::F32(v)) => self.grab_min_size = v,
            _ => panic!("style variable pushed with a value of the wrong shape"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_roundtrip_preserves_value() {
        let mut style = Style::default();
        let backup = style.var_value(StyleVar::ItemSpacing);
        style.set_var(StyleVar::ItemSpacing, StyleVarValue::Vec2(vec2f(1.0, 2.0)));
        assert_eq!((style.item_spacing.x, style.item_spacing.y), (1.0, 2.0));
        style.set_var(StyleVar::ItemSpacing, backup);
        assert_eq!((style.item_spacing.x, style.item_spacing.y), (8.0, 4.0));
    }

    #[test]
    fn alpha_scales_palette_colors() {
        let mut style = Style::default();
        style.alpha = 0.5;
        let c = style.get_color(StyleColor::Text);
        assert_eq!(c.a, 127);
        assert_eq!(c.r, 230);
    }
}
