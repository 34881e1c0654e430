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
use crate::context::trim_label;
use crate::id::Id;
use crate::style::StyleColor;
use crate::{rectf, vec2f, Context, Rectf, Vec2f};

impl Context {
    /// Static text. Honors a pushed wrap position.
    pub fn text(&mut self, text: &str) {
        let wrap_width = match self.current_window().cursor.text_wrap_pos() {
            Some(wrap_x) if wrap_x > 0.0 => {
                let w = self.current_window();
                (w.cursor.start_pos.x + wrap_x - w.cursor.pos.x).max(1.0)
            }
            Some(_) => {
                let avail = self.content_region_avail();
                avail.x.max(1.0)
            }
            None => 0.0,
        };
        let size = self.calc_text_size(text, wrap_width);
        let pos = self.current_window().cursor.pos;
        self.item_size(size, 0.0);
        if !self.item_add(rectf(pos.x, pos.y, size.x, size.y), Id::NONE) {
            return;
        }
        let col = self.style.get_color(StyleColor::Text);
        self.draw_text(pos, col, text, wrap_width);
    }

    /// Static text wrapped at the content width.
    pub fn text_wrapped(&mut self, text: &str) {
        self.push_text_wrap_pos(0.0);
        self.text(text);
        self.pop_text_wrap_pos();
    }

    /// Static text in a custom color.
    pub fn text_colored(&mut self, color: crate::Color, text: &str) {
        self.push_style_color(StyleColor::Text, color);
        self.text(text);
        self.pop_style_color();
    }

    /// Static text in the disabled-text color.
    pub fn text_disabled(&mut self, text: &str) {
        let col = self.style.colors[StyleColor::TextDisabled as usize];
        self.text_colored(col, text);
    }

    /// A button sized to its label. Returns `true` on release over the button
    /// (or repeatedly while held inside a `push_button_repeat(true)` scope).
    pub fn button(&mut self, label: &str) -> bool {
        let padding = self.style.frame_padding;
        self.button_sized(label, |label_size| label_size + padding + padding)
    }

    /// A button with no frame padding, for dense rows.
    pub fn small_button(&mut self, label: &str) -> bool {
        self.button_sized(label, |label_size| label_size)
    }

    fn button_sized(&mut self, label: &str, size_of: impl FnOnce(Vec2f) -> Vec2f) -> bool {
        let id = self.get_id(label);
        let label_size = self.calc_text_size(trim_label(label), 0.0);
        let size = size_of(label_size);
        let pos = self.current_window().cursor.pos;
        let rect = rectf(pos.x, pos.y, size.x, size.y);
        self.item_size(size, self.style.frame_padding.y);
        let visible = self.item_add(rect, id);
        let repeat = self.current_window().cursor.button_repeat();
        let (hovered, held, pressed) = self.button_behavior(rect, id, repeat);
        if visible {
            let col = self.interaction_color(
                StyleColor::Button,
                StyleColor::ButtonHovered,
                StyleColor::ButtonActive,
                hovered,
                held,
            );
            self.render_frame(rect, col, true);
            let text_pos = vec2f(
                pos.x + (size.x - label_size.x) * 0.5,
                pos.y + (size.y - label_size.y) * 0.5,
            );
            let text_col = self.style.get_color(StyleColor::Text);
            self.draw_text(text_pos, text_col, trim_label(label), 0.0);
        }
        pressed
    }

    /// A clickable rectangle with no visuals, for custom-drawn widgets.
    pub fn invisible_button(&mut self, str_id: &str, size: Vec2f) -> bool {
        let id = self.get_id(str_id);
        let pos = self.current_window().cursor.pos;
        let rect = rectf(pos.x, pos.y, size.x, size.y);
        self.item_size(size, 0.0);
        self.item_add(rect, id);
        let (_, _, pressed) = self.button_behavior(rect, id, false);
        pressed
    }

    /// A labeled checkbox bound to `value`. Returns `true` when toggled.
    pub fn checkbox(&mut self, label: &str, value: &mut bool) -> bool {
        let id = self.get_id(label);
        let box_size = self.frame_height();
        let label_size = self.calc_text_size(trim_label(label), 0.0);
        let inner_spacing = self.style.item_inner_spacing.x;
        let pos = self.current_window().cursor.pos;
        let size = vec2f(box_size + inner_spacing + label_size.x, box_size);
        let rect = rectf(pos.x, pos.y, size.x, size.y);
        self.item_size(size, self.style.frame_padding.y);
        let visible = self.item_add(rect, id);
        let (hovered, held, pressed) = self.button_behavior(rect, id, false);
        if pressed {
            *value = !*value;
        }
        if visible {
            let box_rect = rectf(pos.x, pos.y, box_size, box_size);
            let col = self.interaction_color(
                StyleColor::FrameBg,
                StyleColor::FrameBgHovered,
                StyleColor::FrameBgActive,
                hovered,
                held,
            );
            self.render_frame(box_rect, col, true);
            if *value {
                let pad = (box_size * 0.25).floor();
                let mark = box_rect.expand(vec2f(-pad, -pad));
                let mark_col = self.style.get_color(StyleColor::CheckMark);
                let dl = &mut self.current_window_mut().draw_list;
                dl.add_rect_filled(mark, mark_col, 0.0, crate::draw_list::CornerFlags::ALL);
            }
            let text_pos = vec2f(
                pos.x + box_size + inner_spacing,
                pos.y + (box_size - label_size.y) * 0.5,
            );
            let text_col = self.style.get_color(StyleColor::Text);
            self.draw_text(text_pos, text_col, trim_label(label), 0.0);
        }
        pressed
    }

    /// One radio button of a group. Returns `true` when clicked; the caller
    /// stores which member is `active`.
    pub fn radio_button(&mut self, label: &str, active: bool) -> bool {
        let id = self.get_id(label);
        let diameter = self.frame_height();
        let label_size = self.calc_text_size(trim_label(label), 0.0);
        let inner_spacing = self.style.item_inner_spacing.x;
        let pos = self.current_window().cursor.pos;
        let size = vec2f(diameter + inner_spacing + label_size.x, diameter);
        let rect = rectf(pos.x, pos.y, size.x, size.y);
        self.item_size(size, self.style.frame_padding.y);
        let visible = self.item_add(rect, id);
        let (hovered, held, pressed) = self.button_behavior(rect, id, false);
        if visible {
            let center = vec2f(pos.x + diameter * 0.5, pos.y + diameter * 0.5);
            let radius = diameter * 0.5;
            let col = self.interaction_color(
                StyleColor::FrameBg,
                StyleColor::FrameBgHovered,
                StyleColor::FrameBgActive,
                hovered,
                held,
            );
            let border_col = self.style.get_color(StyleColor::Border);
            let mark_col = self.style.get_color(StyleColor::CheckMark);
            let dl = &mut self.current_window_mut().draw_list;
            dl.add_circle_filled(center, radius, col, 12);
            dl.add_circle(center, radius, border_col, 12, 1.0);
            if active {
                dl.add_circle_filled(center, radius * 0.45, mark_col, 12);
            }
            let text_pos = vec2f(
                pos.x + diameter + inner_spacing,
                pos.y + (diameter - label_size.y) * 0.5,
            );
            let text_col = self.style.get_color(StyleColor::Text);
            self.draw_text(text_pos, text_col, trim_label(label), 0.0);
        }
        pressed
    }

    /// A horizontal separator across the content width.
    pub fn separator(&mut self) {
        let avail = self.content_region_avail();
        let pos = self.current_window().cursor.pos;
        let rect = rectf(pos.x, pos.y, avail.x.max(1.0), 1.0);
        self.item_size(vec2f(rect.width, 1.0), 0.0);
        if !self.item_add(rect, Id::NONE) {
            return;
        }
        let col = self.style.get_color(StyleColor::Separator);
        let dl = &mut self.current_window_mut().draw_list;
        dl.add_line(vec2f(rect.x, rect.y), vec2f(rect.x + rect.width, rect.y), col, 1.0);
    }

    /// A small bullet dot, typically followed by `same_line` + `text`.
    pub fn bullet(&mut self) {
        let line_height = self.style.font_size;
        let size = vec2f(line_height, line_height);
        let pos = self.current_window().cursor.pos;
        let rect = rectf(pos.x, pos.y, size.x, size.y);
        self.item_size(size, 0.0);
        if !self.item_add(rect, Id::NONE) {
            return;
        }
        let col = self.style.get_color(StyleColor::Text);
        let center = rect.center();
        let dl = &mut self.current_window_mut().draw_list;
        dl.add_circle_filled(center, line_height * 0.2, col, 8);
    }

    /// Bullet dot plus text on one line.
    pub fn bullet_text(&mut self, text: &str) {
        self.bullet();
        self.same_line(0.0, -1.0);
        self.text(text);
    }

    /// Progress bar filled to `fraction` (0..=1), sized to the item width.
    pub fn progress_bar(&mut self, fraction: f32) {
        let width = self.calc_item_width();
        let height = self.frame_height();
        let pos = self.current_window().cursor.pos;
        let rect = rectf(pos.x, pos.y, width, height);
        self.item_size(vec2f(width, height), 0.0);
        if !self.item_add(rect, Id::NONE) {
            return;
        }
        let bg = self.style.get_color(StyleColor::FrameBg);
        self.render_frame(rect, bg, true);
        let fill = rectf(rect.x, rect.y, rect.width * fraction.clamp(0.0, 1.0), rect.height);
        if fill.width > 0.0 {
            let col = self.style.get_color(StyleColor::SliderGrab);
            let rounding = self.style.frame_rounding;
            let dl = &mut self.current_window_mut().draw_list;
            let corners = crate::draw_list::CornerFlags::TOP_LEFT | crate::draw_list::CornerFlags::BOT_LEFT;
            dl.add_rect_filled(fill, col, rounding, corners);
        }
    }

    pub(crate) fn frame_interaction_rect(&self, width: f32) -> Rectf {
        let pos = self.current_window().cursor.pos;
        rectf(pos.x, pos.y, width, self.frame_height())
    }
}

#[cfg(test)]
mod tests {
    use crate::atlas::{AtlasHandle, MonoAtlas, TextureId};
    use crate::{vec2f, Cond, Context, MouseButton, WindowFlags};
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

    #[test]
    fn button_fires_on_release_over_it() {
        let mut ctx = ctx();
        let mut presses = 0u32;
        let mut rect = crate::Rectf::default();
        let mut submit = |ctx: &mut Context, presses: &mut u32, rect: &mut crate::Rectf| {
            ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Once);
            ctx.set_next_window_size(vec2f(300.0, 200.0), Cond::Once);
            ctx.window("W", WindowFlags::default(), |ctx| {
                if ctx.button("Press") {
                    *presses += 1;
                }
                *rect = ctx.last_item_rect();
            });
        };
        frame(&mut ctx, |c| submit(c, &mut presses, &mut rect));
        let center = rect.center();
        ctx.io.mousemove(center.x, center.y);
        frame(&mut ctx, |c| submit(c, &mut presses, &mut rect));
        assert_eq!(presses, 0);
        ctx.io.mousedown(center.x, center.y, MouseButton::Left);
        frame(&mut ctx, |c| submit(c, &mut presses, &mut rect));
        assert_eq!(presses, 0, "press arms, release fires");
        ctx.io.mouseup(center.x, center.y, MouseButton::Left);
        frame(&mut ctx, |c| submit(c, &mut presses, &mut rect));
        assert_eq!(presses, 1);
    }

    #[test]
    fn overlapping_buttons_never_share_capture() {
        // buttons at the same screen position in two overlapping windows; a
        // click lands on at most one of them
        let mut ctx = ctx();
        let mut hits = (0u32, 0u32);
        let mut rect = crate::Rectf::default();
        let mut submit = |ctx: &mut Context, hits: &mut (u32, u32), rect: &mut crate::Rectf| {
            ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Once);
            ctx.set_next_window_size(vec2f(200.0, 200.0), Cond::Once);
            ctx.window("Under", WindowFlags::NO_TITLE_BAR, |ctx| {
                if ctx.button("U") {
                    hits.0 += 1;
                }
            });
            ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Once);
            ctx.set_next_window_size(vec2f(200.0, 200.0), Cond::Once);
            ctx.window("Over", WindowFlags::NO_TITLE_BAR, |ctx| {
                if ctx.button("O") {
                    hits.1 += 1;
                }
                *rect = ctx.last_item_rect();
            });
        };
        frame(&mut ctx, |c| submit(c, &mut hits, &mut rect));
        let center = rect.center();
        ctx.io.mousemove(center.x, center.y);
        frame(&mut ctx, |c| submit(c, &mut hits, &mut rect));
        ctx.io.mousedown(center.x, center.y, MouseButton::Left);
        frame(&mut ctx, |c| submit(c, &mut hits, &mut rect));
        ctx.io.mouseup(center.x, center.y, MouseButton::Left);
        frame(&mut ctx, |c| submit(c, &mut hits, &mut rect));
        assert_eq!(hits.0, 0, "the occluded window's button never fires");
        assert_eq!(hits.1, 1);
    }

    #[test]
    fn checkbox_toggles_on_click() {
        let mut ctx = ctx();
        let mut value = false;
        let mut rect = crate::Rectf::default();
        let mut submit = |ctx: &mut Context, value: &mut bool, rect: &mut crate::Rectf| {
            ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Once);
            ctx.set_next_window_size(vec2f(300.0, 200.0), Cond::Once);
            ctx.window("W", WindowFlags::default(), |ctx| {
                ctx.checkbox("enabled", value);
                *rect = ctx.last_item_rect();
            });
        };
        frame(&mut ctx, |c| submit(c, &mut value, &mut rect));
        let center = rect.center();
        ctx.io.mousemove(center.x, center.y);
        frame(&mut ctx, |c| submit(c, &mut value, &mut rect));
        ctx.io.mousedown(center.x, center.y, MouseButton::Left);
        frame(&mut ctx, |c| submit(c, &mut value, &mut rect));
        ctx.io.mouseup(center.x, center.y, MouseButton::Left);
        frame(&mut ctx, |c| submit(c, &mut value, &mut rect));
        assert!(value);
    }

    #[test]
    fn text_advances_the_cursor() {
        let mut ctx = ctx();
        frame(&mut ctx, |ctx| {
            ctx.window("W", WindowFlags::default(), |ctx| {
                let before = ctx.current_window().cursor.pos;
                ctx.text("hello");
                let after = ctx.current_window().cursor.pos;
                assert!(after.y > before.y);
                assert_eq!(after.x, before.x);
            });
        });
    }

    #[test]
    fn same_line_keeps_items_on_one_row() {
        let mut ctx = ctx();
        frame(&mut ctx, |ctx| {
            ctx.window("W", WindowFlags::default(), |ctx| {
                ctx.text("label:");
                let first = ctx.last_item_rect();
                ctx.same_line(0.0, -1.0);
                ctx.text("value");
                let second = ctx.last_item_rect();
                assert_eq!(first.y, second.y);
                assert!(second.x > first.x + first.width);
            });
        });
    }
}
