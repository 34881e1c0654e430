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
#![warn(missing_docs)]
//! `remui` is a retained-state immediate mode GUI core. Application code issues
//! widget calls every frame; the engine reconciles them against a small amount of
//! retained state (hover/active/focus ids, window placement, scroll offsets,
//! open flags) and emits batched, anti-aliased vertex/index geometry that a
//! caller-supplied [`Renderer`] turns into GPU draw calls. Glyph rasterization,
//! platform integration and the GPU backend stay outside the crate behind narrow
//! trait interfaces.

mod atlas;
mod context;
mod draw_list;
mod id;
mod layout;
mod settings;
mod style;
mod widgets;
mod window;

pub use atlas::*;
pub use context::Context;
pub use draw_list::*;
pub use id::Id;
pub use layout::LastItem;
pub use rs_math3d::*;
pub use settings::{SettingsRegistry, WindowSettings};
pub use style::*;
pub use widgets::EditBuffer;
pub use window::*;

/// Floating-point type used for all geometry and layout calculations.
pub type Real = f32;

/// Number of mouse buttons tracked by [`Input`].
pub const MOUSE_BUTTON_COUNT: usize = 3;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(usize)]
/// Mouse buttons addressable in the per-button input arrays.
pub enum MouseButton {
    /// Left / primary button.
    Left = 0,
    /// Right / secondary button.
    Right = 1,
    /// Middle button.
    Middle = 2,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(usize)]
/// Logical keys the engine cares about. The host maps its own key codes onto
/// these before each frame; anything not listed here is application business.
pub enum Key {
    /// Tab key.
    Tab = 0,
    /// Left arrow.
    LeftArrow,
    /// Right arrow.
    RightArrow,
    /// Up arrow.
    UpArrow,
    /// Down arrow.
    DownArrow,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Delete key.
    Delete,
    /// Backspace key.
    Backspace,
    /// Return/Enter key.
    Enter,
    /// Escape key.
    Escape,
    /// Latin `A` (select-all shortcut).
    A,
    /// Latin `C` (copy shortcut).
    C,
    /// Latin `V` (paste shortcut).
    V,
    /// Latin `X` (cut shortcut).
    X,
    /// Latin `Y` (redo shortcut).
    Y,
    /// Latin `Z` (undo shortcut).
    Z,
}

impl Key {
    /// Number of tracked keys, used to size the per-key state arrays.
    pub const COUNT: usize = 19;
}

bitflags::bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Modifier key state as reported by the host.
    pub struct KeyMode : u32 {
        /// Super/cmd key held.
        const SUPER = 8;
        /// Alt key held.
        const ALT = 4;
        /// Control key held.
        const CTRL = 2;
        /// Shift key held.
        const SHIFT = 1;
        /// No modifiers active.
        const NONE = 0;
    }
}

impl KeyMode {
    /// Returns `true` if no modifiers are active.
    pub fn is_none(&self) -> bool { self.bits() == 0 }
    /// Returns `true` if Shift is held.
    pub fn is_shift(&self) -> bool { self.intersects(Self::SHIFT) }
    /// Returns `true` if Control is held.
    pub fn is_ctrl(&self) -> bool { self.intersects(Self::CTRL) }
    /// Returns `true` if Alt is held.
    pub fn is_alt(&self) -> bool { self.intersects(Self::ALT) }
    /// Returns `true` if Super is held.
    pub fn is_super(&self) -> bool { self.intersects(Self::SUPER) }
}

#[derive(Default, Copy, Clone, PartialEq, Eq, Debug)]
#[repr(C)]
/// Simple RGBA color stored with 8-bit components.
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Returns the same color with its alpha scaled by `factor` (0..1).
    pub fn mul_alpha(self, factor: f32) -> Self {
        let a = (self.a as f32 * factor.clamp(0.0, 1.0)) as u8;
        Color { a, ..self }
    }

    /// Packs the color into the vertex color format.
    pub fn packed(self) -> Color4b { color4b(self.r, self.g, self.b, self.a) }
}

/// Convenience constructor for [`Color`].
pub fn color(r: u8, g: u8, b: u8, a: u8) -> Color { Color { r, g, b, a } }

/// Convenience constructor for [`Vec2f`].
pub fn vec2f(x: f32, y: f32) -> Vec2f { Vec2f { x, y } }

#[derive(Default, Copy, Clone, PartialEq, Debug)]
/// Axis-aligned rectangle with float position and extent.
pub struct Rectf {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Rectf {
    /// Creates a rectangle from position and extent.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self { Self { x, y, width, height } }

    /// Creates a rectangle from two corner points.
    pub fn from_min_max(min: Vec2f, max: Vec2f) -> Self { Self::new(min.x, min.y, max.x - min.x, max.y - min.y) }

    /// Returns the top-left corner.
    pub fn min(&self) -> Vec2f { vec2f(self.x, self.y) }

    /// Returns the bottom-right corner.
    pub fn max(&self) -> Vec2f { vec2f(self.x + self.width, self.y + self.height) }

    /// Returns `true` if the point lies inside the rectangle (max-exclusive).
    pub fn contains(&self, p: Vec2f) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.x + self.width && p.y < self.y + self.height
    }

    /// Returns `true` if the two rectangles overlap.
    pub fn overlaps(&self, other: &Rectf) -> bool {
        other.x < self.x + self.width
            && other.x + other.width > self.x
            && other.y < self.y + self.height
            && other.y + other.height > self.y
    }

    /// Returns the intersection of the two rectangles; zero-sized when disjoint.
    pub fn intersect(&self, other: &Rectf) -> Rectf {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = (self.x + self.width).min(other.x + other.width);
        let y1 = (self.y + self.height).min(other.y + other.height);
        Rectf::new(x0, y0, (x1 - x0).max(0.0), (y1 - y0).max(0.0))
    }

    /// Expands (or shrinks, for negative amounts) the rectangle on all sides.
    pub fn expand(&self, amount: Vec2f) -> Rectf {
        Rectf::new(self.x - amount.x, self.y - amount.y, self.width + amount.x * 2.0, self.height + amount.y * 2.0)
    }

    /// Moves the rectangle by the given offset.
    pub fn translate(&self, offset: Vec2f) -> Rectf { Rectf::new(self.x + offset.x, self.y + offset.y, self.width, self.height) }

    /// Returns the center point.
    pub fn center(&self) -> Vec2f { vec2f(self.x + self.width * 0.5, self.y + self.height * 0.5) }

    /// Returns `true` if either extent is non-positive.
    pub fn is_empty(&self) -> bool { self.width <= 0.0 || self.height <= 0.0 }
}

/// Convenience constructor for [`Rectf`].
pub fn rectf(x: f32, y: f32, w: f32, h: f32) -> Rectf { Rectf::new(x, y, w, h) }

/// Linear interpolation between two scalars.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 { a + (b - a) * t }

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// Condition controlling when `set_next_window_*` requests are applied.
pub enum Cond {
    /// Apply every frame.
    Always,
    /// Apply once per runtime session.
    Once,
    /// Apply only when the window has no persisted/previous placement.
    FirstUseEver,
    /// Apply when the window transitions from inactive to active.
    Appearing,
}

/// Trait implemented by render backends; receives the flattened frame geometry.
pub trait Renderer {
    /// Consumes the frame's draw data and issues the actual GPU work.
    fn render(&mut self, draw_data: &DrawData<'_>);
}

/// Clipboard access used by text-editing widgets. Pluggable per platform.
pub trait Clipboard {
    /// Returns the current clipboard contents, if any.
    fn get_text(&mut self) -> Option<String>;
    /// Replaces the clipboard contents.
    fn set_text(&mut self, text: &str);
}

/// Fallback clipboard that stores text inside the process.
#[derive(Default)]
pub struct LocalClipboard {
    text: Option<String>,
}

impl Clipboard for LocalClipboard {
    fn get_text(&mut self) -> Option<String> { self.text.clone() }
    fn set_text(&mut self, text: &str) { self.text = Some(text.to_string()); }
}

/// IME positioning hook invoked by text-editing widgets. Pluggable per platform.
pub trait ImeHandler {
    /// Notifies the platform where the text caret currently sits, in screen space.
    fn set_caret_pos(&mut self, pos: Vec2f);
}

/// IME handler that ignores every notification.
#[derive(Default)]
pub struct NullIme;

impl ImeHandler for NullIme {
    fn set_caret_pos(&mut self, _pos: Vec2f) {}
}

/// Per-frame input snapshot plus the engine's normalized view of it.
///
/// The host fills the raw fields (or calls the event helpers) before
/// `Context::new_frame`; the orchestrator derives clicks, double clicks, drag
/// deltas and key-repeat state from them, and publishes the `want_capture_*`
/// flags back for the host's own event routing.
#[derive(Clone, Debug)]
pub struct Input {
    /// Pointer position in screen coordinates.
    pub mouse_pos: Vec2f,
    /// Raw per-button down state, host-filled.
    pub mouse_down: [bool; MOUSE_BUTTON_COUNT],
    /// Vertical wheel movement this frame, in lines.
    pub mouse_wheel: f32,
    /// Horizontal wheel movement this frame, in lines.
    pub mouse_wheel_h: f32,
    /// Raw per-key down state, host-filled.
    pub keys_down: [bool; Key::COUNT],
    /// Modifier keys currently held.
    pub key_mods: KeyMode,
    /// UTF-8 characters typed this frame.
    pub input_chars: String,
    /// Seconds elapsed since the previous frame.
    pub delta_time: f32,
    /// Size of the display surface in pixels.
    pub display_size: Dimensioni,

    /// Maximum seconds between two clicks to count as a double click.
    pub double_click_time: f32,
    /// Maximum pointer travel between two clicks to count as a double click.
    pub double_click_max_dist: f32,
    /// Seconds a key must stay down before it starts repeating.
    pub key_repeat_delay: f32,
    /// Seconds between repeats once a key repeats.
    pub key_repeat_rate: f32,
    /// Seconds of debounce before the persisted layout is rewritten.
    pub settings_save_rate: f32,

    /// Set when the UI wants the mouse (hovered window, capture, open popup).
    pub want_capture_mouse: bool,
    /// Set when the UI wants the keyboard (active text input).
    pub want_capture_keyboard: bool,

    pub(crate) mouse_pos_prev: Vec2f,
    pub(crate) mouse_delta: Vec2f,
    pub(crate) mouse_clicked: [bool; MOUSE_BUTTON_COUNT],
    pub(crate) mouse_released: [bool; MOUSE_BUTTON_COUNT],
    pub(crate) mouse_double_clicked: [bool; MOUSE_BUTTON_COUNT],
    pub(crate) mouse_clicked_pos: [Vec2f; MOUSE_BUTTON_COUNT],
    pub(crate) mouse_clicked_time: [f64; MOUSE_BUTTON_COUNT],
    pub(crate) mouse_down_duration: [f32; MOUSE_BUTTON_COUNT],
    pub(crate) mouse_drag_max_dist_sqr: [f32; MOUSE_BUTTON_COUNT],
    pub(crate) keys_down_duration: [f32; Key::COUNT],
    pub(crate) keys_down_duration_prev: [f32; Key::COUNT],
    pub(crate) time: f64,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            mouse_pos: vec2f(-f32::MAX, -f32::MAX),
            mouse_down: [false; MOUSE_BUTTON_COUNT],
            mouse_wheel: 0.0,
            mouse_wheel_h: 0.0,
            keys_down: [false; Key::COUNT],
            key_mods: KeyMode::NONE,
            input_chars: String::new(),
            delta_time: 1.0 / 60.0,
            display_size: Dimensioni::new(0, 0),
            double_click_time: 0.30,
            double_click_max_dist: 6.0,
            key_repeat_delay: 0.25,
            key_repeat_rate: 0.05,
            settings_save_rate: 5.0,
            want_capture_mouse: false,
            want_capture_keyboard: false,
            mouse_pos_prev: vec2f(-f32::MAX, -f32::MAX),
            mouse_delta: Vec2f::new(0.0, 0.0),
            mouse_clicked: [false; MOUSE_BUTTON_COUNT],
            mouse_released: [false; MOUSE_BUTTON_COUNT],
            mouse_double_clicked: [false; MOUSE_BUTTON_COUNT],
            mouse_clicked_pos: [Vec2f::new(0.0, 0.0); MOUSE_BUTTON_COUNT],
            mouse_clicked_time: [-f32::MAX as f64; MOUSE_BUTTON_COUNT],
            mouse_down_duration: [-1.0; MOUSE_BUTTON_COUNT],
            mouse_drag_max_dist_sqr: [0.0; MOUSE_BUTTON_COUNT],
            keys_down_duration: [-1.0; Key::COUNT],
            keys_down_duration_prev: [-1.0; Key::COUNT],
            time: 0.0,
        }
    }
}

impl Input {
    /// Updates the pointer position.
    pub fn mousemove(&mut self, x: f32, y: f32) { self.mouse_pos = vec2f(x, y); }

    /// Records a mouse button press.
    pub fn mousedown(&mut self, x: f32, y: f32, btn: MouseButton) {
        self.mousemove(x, y);
        self.mouse_down[btn as usize] = true;
    }

    /// Records a mouse button release.
    pub fn mouseup(&mut self, x: f32, y: f32, btn: MouseButton) {
        self.mousemove(x, y);
        self.mouse_down[btn as usize] = false;
    }

    /// Accumulates wheel movement.
    pub fn scroll(&mut self, x: f32, y: f32) {
        self.mouse_wheel_h += x;
        self.mouse_wheel += y;
    }

    /// Records that a key went down.
    pub fn keydown(&mut self, key: Key) { self.keys_down[key as usize] = true; }

    /// Records that a key went up.
    pub fn keyup(&mut self, key: Key) { self.keys_down[key as usize] = false; }

    /// Replaces the modifier key state.
    pub fn set_key_mods(&mut self, mods: KeyMode) { self.key_mods = mods; }

    /// Appends typed UTF-8 text.
    pub fn text(&mut self, text: &str) { self.input_chars.push_str(text); }

    /// Returns `true` if the button is currently held.
    pub fn is_mouse_down(&self, btn: MouseButton) -> bool { self.mouse_down[btn as usize] }

    /// Returns `true` if the button transitioned to down this frame.
    pub fn is_mouse_clicked(&self, btn: MouseButton) -> bool { self.mouse_clicked[btn as usize] }

    /// Returns `true` if the button double-clicked this frame.
    pub fn is_mouse_double_clicked(&self, btn: MouseButton) -> bool { self.mouse_double_clicked[btn as usize] }

    /// Returns `true` if the button transitioned to up this frame.
    pub fn is_mouse_released(&self, btn: MouseButton) -> bool { self.mouse_released[btn as usize] }

    /// Returns `true` if the button is held and has travelled past `lock_threshold`.
    pub fn is_mouse_dragging(&self, btn: MouseButton, lock_threshold: f32) -> bool {
        let threshold = if lock_threshold < 0.0 { 6.0 } else { lock_threshold };
        self.mouse_down[btn as usize] && self.mouse_drag_max_dist_sqr[btn as usize] >= threshold * threshold
    }

    /// Pointer travel since the click that started the current drag.
    pub fn mouse_drag_delta(&self, btn: MouseButton) -> Vec2f {
        if self.mouse_down[btn as usize] {
            self.mouse_pos - self.mouse_clicked_pos[btn as usize]
        } else {
            Vec2f::new(0.0, 0.0)
        }
    }

    /// Pointer movement since the previous frame.
    pub fn mouse_delta(&self) -> Vec2f { self.mouse_delta }

    /// Returns `true` if the key is currently held.
    pub fn is_key_down(&self, key: Key) -> bool { self.keys_down[key as usize] }

    /// Returns `true` if the key was pressed this frame, or is repeating when
    /// `repeat` is requested (using the configured delay/rate).
    pub fn is_key_pressed(&self, key: Key, repeat: bool) -> bool {
        let t = self.keys_down_duration[key as usize];
        if t == 0.0 {
            return true;
        }
        if repeat && t > self.key_repeat_delay {
            return self.key_repeat_amount(key) > 0;
        }
        false
    }

    /// Number of repeat pulses the key produced this frame.
    pub fn key_repeat_amount(&self, key: Key) -> i32 {
        let t = self.keys_down_duration[key as usize];
        calc_typematic_repeat_amount(t, t - self.delta_time, self.key_repeat_delay, self.key_repeat_rate)
    }

    /// Normalizes the raw snapshot into clicks, double clicks, drag distances
    /// and key durations. Called once per frame by the orchestrator.
    pub(crate) fn prelude(&mut self) {
        self.time += self.delta_time as f64;

        if self.mouse_pos.x < -f32::MAX * 0.5 || self.mouse_pos_prev.x < -f32::MAX * 0.5 {
            self.mouse_delta = Vec2f::new(0.0, 0.0);
        } else {
            self.mouse_delta = self.mouse_pos - self.mouse_pos_prev;
        }
        self.mouse_pos_prev = self.mouse_pos;

        for i in 0..MOUSE_BUTTON_COUNT {
            let was_down = self.mouse_down_duration[i] >= 0.0;
            self.mouse_clicked[i] = self.mouse_down[i] && !was_down;
            self.mouse_released[i] = !self.mouse_down[i] && was_down;
            self.mouse_double_clicked[i] = false;
            self.mouse_down_duration[i] = if self.mouse_down[i] {
                if was_down { self.mouse_down_duration[i] + self.delta_time } else { 0.0 }
            } else {
                -1.0
            };
            if self.mouse_clicked[i] {
                if self.time - self.mouse_clicked_time[i] < self.double_click_time as f64 {
                    let delta = self.mouse_pos - self.mouse_clicked_pos[i];
                    if delta.x * delta.x + delta.y * delta.y < self.double_click_max_dist * self.double_click_max_dist {
                        self.mouse_double_clicked[i] = true;
                    }
                    // two fast clicks never chain into a triple
                    self.mouse_clicked_time[i] = -f32::MAX as f64;
                } else {
                    self.mouse_clicked_time[i] = self.time;
                }
                self.mouse_clicked_pos[i] = self.mouse_pos;
                self.mouse_drag_max_dist_sqr[i] = 0.0;
            } else if self.mouse_down[i] {
                let delta = self.mouse_pos - self.mouse_clicked_pos[i];
                let dist_sqr = delta.x * delta.x + delta.y * delta.y;
                if dist_sqr > self.mouse_drag_max_dist_sqr[i] {
                    self.mouse_drag_max_dist_sqr[i] = dist_sqr;
                }
            }
        }

        self.keys_down_duration_prev = self.keys_down_duration;
        for i in 0..Key::COUNT {
            self.keys_down_duration[i] = if self.keys_down[i] {
                if self.keys_down_duration[i] < 0.0 { 0.0 } else { self.keys_down_duration[i] + self.delta_time }
            } else {
                -1.0
            };
        }
    }

    /// Clears the per-frame accumulators. Called at end of frame.
    pub(crate) fn epilogue(&mut self) {
        self.input_chars.clear();
        self.mouse_wheel = 0.0;
        self.mouse_wheel_h = 0.0;
    }
}

/// Computes how many typematic pulses occurred between `t_prev` and `t`.
pub(crate) fn calc_typematic_repeat_amount(t: f32, t_prev: f32, repeat_delay: f32, repeat_rate: f32) -> i32 {
    if t == 0.0 {
        return 1;
    }
    if t <= repeat_delay || repeat_rate <= 0.0 {
        return 0;
    }
    let count = ((t - repeat_delay) / repeat_rate) as i32 - ((t_prev - repeat_delay) / repeat_rate) as i32;
    count.max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_then_release_is_detected_across_frames() {
        let mut input = Input::default();
        input.mousedown(10.0, 10.0, MouseButton::Left);
        input.prelude();
        assert!(input.is_mouse_clicked(MouseButton::Left));
        assert!(input.is_mouse_down(MouseButton::Left));

        input.prelude();
        assert!(!input.is_mouse_clicked(MouseButton::Left));
        assert!(input.is_mouse_down(MouseButton::Left));

        input.mouseup(10.0, 10.0, MouseButton::Left);
        input.prelude();
        assert!(input.is_mouse_released(MouseButton::Left));
    }

    #[test]
    fn two_fast_clicks_double_click() {
        let mut input = Input::default();
        input.delta_time = 0.05;
        input.mousedown(10.0, 10.0, MouseButton::Left);
        input.prelude();
        input.mouseup(10.0, 10.0, MouseButton::Left);
        input.prelude();
        input.mousedown(11.0, 10.0, MouseButton::Left);
        input.prelude();
        assert!(input.is_mouse_double_clicked(MouseButton::Left));
    }

    #[test]
    fn slow_second_click_is_not_a_double_click() {
        let mut input = Input::default();
        input.delta_time = 0.5;
        input.mousedown(10.0, 10.0, MouseButton::Left);
        input.prelude();
        input.mouseup(10.0, 10.0, MouseButton::Left);
        input.prelude();
        input.mousedown(10.0, 10.0, MouseButton::Left);
        input.prelude();
        assert!(!input.is_mouse_double_clicked(MouseButton::Left));
    }

    #[test]
    fn key_repeat_pulses_after_delay() {
        let mut input = Input::default();
        input.delta_time = 0.1;
        input.keydown(Key::LeftArrow);
        input.prelude();
        assert!(input.is_key_pressed(Key::LeftArrow, false));

        // below the 0.25s delay: no repeat yet
        input.prelude();
        assert!(!input.is_key_pressed(Key::LeftArrow, true));

        input.prelude();
        input.prelude();
        assert!(input.is_key_pressed(Key::LeftArrow, true));
    }

    #[test]
    fn rect_intersection_and_containment() {
        let a = rectf(0.0, 0.0, 100.0, 50.0);
        let b = rectf(50.0, 20.0, 100.0, 100.0);
        let i = a.intersect(&b);
        assert_eq!(i, rectf(50.0, 20.0, 50.0, 30.0));
        assert!(a.contains(vec2f(0.0, 0.0)));
        assert!(!a.contains(vec2f(100.0, 0.0)));
        assert!(a.overlaps(&b));
        assert!(a.intersect(&rectf(500.0, 500.0, 10.0, 10.0)).is_empty());
    }
}
