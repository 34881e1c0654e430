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
use std::ops::Range;

use crate::context::trim_label;
use crate::id::Id;
use crate::style::StyleColor;
use crate::{rectf, vec2f, Context, Key, MouseButton};

/// Text storage contract consumed by [`Context::input_text`]. The widget owns
/// the caret and selection; the application owns the bytes. Implemented for
/// `String`; applications with rope/gap-buffer storage implement it themselves.
pub trait EditBuffer {
    /// Current contents as UTF-8.
    fn as_str(&self) -> &str;
    /// Inserts `text` at byte offset `at` (always a char boundary).
    fn insert(&mut self, at: usize, text: &str);
    /// Removes the byte range (bounds always on char boundaries).
    fn remove(&mut self, range: Range<usize>);
}

impl EditBuffer for String {
    fn as_str(&self) -> &str { self }
    fn insert(&mut self, at: usize, text: &str) { self.insert_str(at, text); }
    fn remove(&mut self, range: Range<usize>) { self.replace_range(range, ""); }
}

/// Caret, selection and horizontal scroll of the single text field being
/// edited. One per context: only the widget holding the active id reads it.
#[derive(Default, Clone)]
pub(crate) struct TextEditState {
    pub id: Id,
    /// Caret byte offset.
    pub cursor: usize,
    /// Selection anchor byte offset; equals `cursor` when nothing is selected.
    pub select_anchor: usize,
    /// Horizontal scroll keeping the caret inside the frame.
    pub scroll_x: f32,
}

impl TextEditState {
    fn selection(&self) -> Range<usize> {
        if self.cursor < self.select_anchor {
            self.cursor..self.select_anchor
        } else {
            self.select_anchor..self.cursor
        }
    }

    fn has_selection(&self) -> bool { self.cursor != self.select_anchor }

    fn clamp_to(&mut self, len: usize) {
        self.cursor = self.cursor.min(len);
        self.select_anchor = self.select_anchor.min(len);
    }
}

fn prev_char_boundary(text: &str, at: usize) -> usize {
    if at == 0 {
        return 0;
    }
    let mut i = at - 1;
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn next_char_boundary(text: &str, at: usize) -> usize {
    if at >= text.len() {
        return text.len();
    }
    let mut i = at + 1;
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

impl Context {
    /// Single-line text input bound to `buf`. Returns `true` when the buffer
    /// changed this frame. Click to focus; Enter and Escape release focus.
    /// Supports selection (shift+arrows, drag, ctrl+A), clipboard cut/copy/
    /// paste through the context's [`Clipboard`](crate::Clipboard), and
    /// reports the caret to the [`ImeHandler`](crate::ImeHandler).
    pub fn input_text(&mut self, label: &str, buf: &mut dyn EditBuffer) -> bool {
        let id = self.get_id(label);
        let width = self.calc_item_width();
        let frame = self.frame_interaction_rect(width);
        let label_size = self.calc_text_size(trim_label(label), 0.0);
        let inner_spacing = self.style.item_inner_spacing.x;
        let total = rectf(frame.x, frame.y, width + inner_spacing + label_size.x, frame.height);
        self.item_size(vec2f(total.width, total.height), self.style.frame_padding.y);
        let visible = self.item_add(total, id);

        // focus persists after release: click inside grabs it, click anywhere
        // else (or Enter/Escape below) drops it
        self.interaction.keep_alive(id);
        let hovered = self.item_hoverable(frame, id);
        let window_id = self.current_window().id;
        if self.io.is_mouse_clicked(MouseButton::Left) {
            if hovered {
                self.interaction.set_active(id, window_id);
            } else if self.interaction.active_id == id {
                self.interaction.clear_active();
            }
        }
        let active_now = self.interaction.active_id == id;
        let held = active_now && self.io.is_mouse_down(MouseButton::Left);

        let padding = self.style.frame_padding;
        let inner = frame.expand(vec2f(-padding.x, -padding.y));
        let mut state = if self.text_edit.id == id { self.text_edit.clone() } else { TextEditState::default() };
        let just_activated = active_now && self.interaction.active_id_prev_frame != id;
        if just_activated {
            state = TextEditState { id, cursor: buf.as_str().len(), select_anchor: 0, scroll_x: 0.0 };
        }
        state.clamp_to(buf.as_str().len());

        // caret placement from the mouse while the field is held
        if active_now && held {
            let local_x = self.io.mouse_pos.x - inner.x + state.scroll_x;
            let pos = self.locate_text_offset(buf.as_str(), local_x);
            if self.interaction.active_id_is_just_activated {
                state.select_anchor = pos;
            }
            state.cursor = pos;
        }

        let mut changed = false;
        if active_now {
            self.want_text_input = true;

            let typed = std::mem::take(&mut self.io.input_chars);
            let typed: String = typed.chars().filter(|c| !c.is_control()).collect();
            if !typed.is_empty() {
                if state.has_selection() {
                    let sel = state.selection();
                    state.cursor = sel.start;
                    buf.remove(sel);
                }
                buf.insert(state.cursor, &typed);
                state.cursor += typed.len();
                state.select_anchor = state.cursor;
                changed = true;
            }

            let shift = self.io.key_mods.is_shift();
            let ctrl = self.io.key_mods.is_ctrl();

            if self.io.is_key_pressed(Key::Backspace, true) {
                if state.has_selection() {
                    let sel = state.selection();
                    state.cursor = sel.start;
                    buf.remove(sel);
                    changed = true;
                } else if state.cursor > 0 {
                    let start = prev_char_boundary(buf.as_str(), state.cursor);
                    buf.remove(start..state.cursor);
                    state.cursor = start;
                    changed = true;
                }
                state.select_anchor = state.cursor;
            }
            if self.io.is_key_pressed(Key::Delete, true) {
                if state.has_selection() {
                    let sel = state.selection();
                    state.cursor = sel.start;
                    buf.remove(sel);
                    changed = true;
                } else if state.cursor < buf.as_str().len() {
                    let end = next_char_boundary(buf.as_str(), state.cursor);
                    buf.remove(state.cursor..end);
                    changed = true;
                }
                state.select_anchor = state.cursor;
            }
            if self.io.is_key_pressed(Key::LeftArrow, true) {
                state.cursor = prev_char_boundary(buf.as_str(), state.cursor);
                if !shift {
                    state.select_anchor = state.cursor;
                }
            }
            if self.io.is_key_pressed(Key::RightArrow, true) {
                state.cursor = next_char_boundary(buf.as_str(), state.cursor);
                if !shift {
                    state.select_anchor = state.cursor;
                }
            }
            if self.io.is_key_pressed(Key::Home, false) {
                state.cursor = 0;
                if !shift {
                    state.select_anchor = 0;
                }
            }
            if self.io.is_key_pressed(Key::End, false) {
                state.cursor = buf.as_str().len();
                if !shift {
                    state.select_anchor = state.cursor;
                }
            }
            if ctrl && self.io.is_key_pressed(Key::A, false) {
                state.select_anchor = 0;
                state.cursor = buf.as_str().len();
            }
            if ctrl && self.io.is_key_pressed(Key::C, false) && state.has_selection() {
                let sel = state.selection();
                let text = buf.as_str()[sel].to_string();
                self.clipboard.set_text(&text);
            }
            if ctrl && self.io.is_key_pressed(Key::X, false) && state.has_selection() {
                let sel = state.selection();
                let text = buf.as_str()[sel.clone()].to_string();
                self.clipboard.set_text(&text);
                state.cursor = sel.start;
                state.select_anchor = sel.start;
                buf.remove(sel);
                changed = true;
            }
            if ctrl && self.io.is_key_pressed(Key::V, false) {
                if let Some(pasted) = self.clipboard.get_text() {
                    let pasted: String = pasted.chars().filter(|c| !c.is_control()).collect();
                    if !pasted.is_empty() {
                        if state.has_selection() {
                            let sel = state.selection();
                            state.cursor = sel.start;
                            buf.remove(sel);
                        }
                        buf.insert(state.cursor, &pasted);
                        state.cursor += pasted.len();
                        state.select_anchor = state.cursor;
                        changed = true;
                    }
                }
            }
            if self.io.is_key_pressed(Key::Enter, false) || self.io.is_key_pressed(Key::Escape, false) {
                self.interaction.clear_active();
            }
        }

        // keep the caret inside the frame
        let caret_x = self.calc_text_size(&buf.as_str()[..state.cursor], 0.0).x;
        if caret_x - state.scroll_x > inner.width {
            state.scroll_x = caret_x - inner.width;
        } else if caret_x < state.scroll_x {
            state.scroll_x = caret_x;
        }

        if visible {
            let bg = self.interaction_color(
                StyleColor::FrameBg,
                StyleColor::FrameBgHovered,
                StyleColor::FrameBgActive,
                hovered,
                held || active_now,
            );
            self.render_frame(frame, bg, true);

            let text_origin = vec2f(inner.x - state.scroll_x, inner.y);
            if active_now && state.has_selection() {
                let sel = state.selection();
                let x0 = self.calc_text_size(&buf.as_str()[..sel.start], 0.0).x;
                let x1 = self.calc_text_size(&buf.as_str()[..sel.end], 0.0).x;
                let sel_rect = rectf(text_origin.x + x0, inner.y, x1 - x0, inner.height).intersect(&inner);
                let sel_col = self.style.get_color(StyleColor::FrameBgActive);
                let dl = &mut self.current_window_mut().draw_list;
                dl.add_rect_filled(sel_rect, sel_col, 0.0, crate::draw_list::CornerFlags::ALL);
            }

            let text_col = self.style.get_color(StyleColor::Text);
            let atlas = self.atlas().clone();
            let font = self.font();
            let font_size = self.style.font_size;
            {
                let dl = &mut self.current_window_mut().draw_list;
                dl.add_text(&atlas, font, font_size, text_origin, text_col, buf.as_str(), 0.0, Some(inner));
            }

            if active_now {
                // caret blink keyed off the wall clock
                if (self.io.time * 1.6).fract() < 0.8 {
                    let caret = rectf(text_origin.x + caret_x, inner.y, 1.0, inner.height).intersect(&inner);
                    let dl = &mut self.current_window_mut().draw_list;
                    dl.add_rect_filled(caret, text_col, 0.0, crate::draw_list::CornerFlags::ALL);
                }
                let caret_screen = vec2f(text_origin.x + caret_x, inner.y + inner.height);
                self.ime.set_caret_pos(caret_screen);
            }

            let label_pos = vec2f(frame.x + frame.width + inner_spacing, frame.y + padding.y);
            self.draw_text(label_pos, text_col, trim_label(label), 0.0);
        }

        if active_now || self.text_edit.id == id {
            self.text_edit = state;
        }
        changed
    }

    /// Byte offset of the char boundary closest to `local_x` pixels into
    /// `text`, measured with the context's font.
    fn locate_text_offset(&self, text: &str, local_x: f32) -> usize {
        if local_x <= 0.0 {
            return 0;
        }
        let atlas = self.atlas();
        let font = self.font();
        let metrics = atlas.metrics(font);
        let scale = self.style.font_size / metrics.size;
        let mut x = 0.0;
        for (i, ch) in text.char_indices() {
            let advance = match atlas.glyph_or_fallback(font, ch) {
                Some(g) => g.advance_x * scale,
                None => continue,
            };
            if local_x < x + advance * 0.5 {
                return i;
            }
            x += advance;
        }
        text.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::{AtlasHandle, MonoAtlas, TextureId};
    use crate::{Cond, KeyMode, MouseButton, Rectf, WindowFlags};
    use rs_math3d::Dimensioni;

    fn ctx() -> Context {
        let atlas = AtlasHandle::new(MonoAtlas::new(TextureId::new(1), 13.0));
        let mut ctx = Context::new(atlas);
        ctx.io.display_size = Dimensioni::new(800, 600);
        ctx
    }

    fn frame(ctx: &mut Context, f: impl FnOnce(&mut Context)) {
        ctx.new_frame();
        f(ctx);
        ctx.end_frame();
    }

    fn submit(ctx: &mut Context, buf: &mut String, changed: &mut bool, rect: &mut Rectf) {
        ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Once);
        ctx.set_next_window_size(vec2f(400.0, 200.0), Cond::Once);
        ctx.window("W", WindowFlags::default(), |ctx| {
            ctx.push_item_width(200.0);
            *changed = ctx.input_text("name", buf);
            *rect = ctx.last_item_rect();
            ctx.pop_item_width();
        });
    }

    fn focus_field(ctx: &mut Context, buf: &mut String, rect: &mut Rectf) {
        let mut changed = false;
        frame(ctx, |c| submit(c, buf, &mut changed, rect));
        let center = rect.center();
        ctx.io.mousemove(center.x, center.y);
        frame(ctx, |c| submit(c, buf, &mut changed, rect));
        ctx.io.mousedown(center.x, center.y, MouseButton::Left);
        frame(ctx, |c| submit(c, buf, &mut changed, rect));
        ctx.io.mouseup(center.x, center.y, MouseButton::Left);
        frame(ctx, |c| submit(c, buf, &mut changed, rect));
    }

    #[test]
    fn typing_inserts_into_the_buffer() {
        let mut ctx = ctx();
        let mut buf = String::new();
        let mut rect = Rectf::default();
        focus_field(&mut ctx, &mut buf, &mut rect);

        let mut changed = false;
        ctx.io.text("hi");
        frame(&mut ctx, |c| submit(c, &mut buf, &mut changed, &mut rect));
        assert!(changed);
        assert_eq!(buf, "hi");
        assert!(ctx.io.want_capture_keyboard);
    }

    #[test]
    fn backspace_removes_the_previous_char() {
        let mut ctx = ctx();
        let mut buf = String::from("abc");
        let mut rect = Rectf::default();
        focus_field(&mut ctx, &mut buf, &mut rect);

        // click placed the caret; move it to the end first
        let mut changed = false;
        ctx.io.keydown(Key::End);
        frame(&mut ctx, |c| submit(c, &mut buf, &mut changed, &mut rect));
        ctx.io.keyup(Key::End);
        ctx.io.keydown(Key::Backspace);
        frame(&mut ctx, |c| submit(c, &mut buf, &mut changed, &mut rect));
        ctx.io.keyup(Key::Backspace);
        assert!(changed);
        assert_eq!(buf, "ab");
    }

    #[test]
    fn select_all_then_typing_replaces_everything() {
        let mut ctx = ctx();
        let mut buf = String::from("old value");
        let mut rect = Rectf::default();
        focus_field(&mut ctx, &mut buf, &mut rect);

        let mut changed = false;
        ctx.io.set_key_mods(KeyMode::CTRL);
        ctx.io.keydown(Key::A);
        frame(&mut ctx, |c| submit(c, &mut buf, &mut changed, &mut rect));
        ctx.io.keyup(Key::A);
        ctx.io.set_key_mods(KeyMode::NONE);
        ctx.io.text("x");
        frame(&mut ctx, |c| submit(c, &mut buf, &mut changed, &mut rect));
        assert_eq!(buf, "x");
    }

    #[test]
    fn copy_and_paste_round_trip_through_the_clipboard() {
        let mut ctx = ctx();
        let mut buf = String::from("sel");
        let mut rect = Rectf::default();
        focus_field(&mut ctx, &mut buf, &mut rect);

        let mut changed = false;
        ctx.io.set_key_mods(KeyMode::CTRL);
        ctx.io.keydown(Key::A);
        frame(&mut ctx, |c| submit(c, &mut buf, &mut changed, &mut rect));
        ctx.io.keyup(Key::A);
        ctx.io.keydown(Key::C);
        frame(&mut ctx, |c| submit(c, &mut buf, &mut changed, &mut rect));
        ctx.io.keyup(Key::C);
        // move the caret to the end and paste after the original text
        ctx.io.set_key_mods(KeyMode::NONE);
        ctx.io.keydown(Key::End);
        frame(&mut ctx, |c| submit(c, &mut buf, &mut changed, &mut rect));
        ctx.io.keyup(Key::End);
        ctx.io.set_key_mods(KeyMode::CTRL);
        ctx.io.keydown(Key::V);
        frame(&mut ctx, |c| submit(c, &mut buf, &mut changed, &mut rect));
        ctx.io.keyup(Key::V);
        ctx.io.set_key_mods(KeyMode::NONE);
        assert_eq!(buf, "selsel");
    }

    #[test]
    fn enter_releases_focus() {
        let mut ctx = ctx();
        let mut buf = String::from("done");
        let mut rect = Rectf::default();
        focus_field(&mut ctx, &mut buf, &mut rect);
        assert!(ctx.interaction.active_id.is_some());

        let mut changed = false;
        ctx.io.keydown(Key::Enter);
        frame(&mut ctx, |c| submit(c, &mut buf, &mut changed, &mut rect));
        ctx.io.keyup(Key::Enter);
        assert_eq!(ctx.interaction.active_id, Id::NONE);
        frame(&mut ctx, |c| submit(c, &mut buf, &mut changed, &mut rect));
        assert!(!ctx.io.want_capture_keyboard);
    }

    #[test]
    fn char_boundary_walks_respect_utf8() {
        let text = "a€b";
        assert_eq!(next_char_boundary(text, 0), 1);
        assert_eq!(next_char_boundary(text, 1), 4);
        assert_eq!(prev_char_boundary(text, 4), 1);
        assert_eq!(prev_char_boundary(text, 5), 4);
        assert_eq!(prev_char_boundary(text, 0), 0);
        assert_eq!(next_char_boundary(text, 5), 5);
    }
}
