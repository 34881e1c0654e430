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
use crate::style::StyleColor;
use crate::{rectf, vec2f, Context};

impl Context {
    /// Horizontal slider for an `f32` in `[min, max]`. Returns `true` while
    /// the value changes.
    pub fn slider_f32(&mut self, label: &str, value: &mut f32, min: f32, max: f32) -> bool {
        let id = self.get_id(label);
        let width = self.calc_item_width();
        let frame = self.frame_interaction_rect(width);
        let label_size = self.calc_text_size(trim_label(label), 0.0);
        let inner_spacing = self.style.item_inner_spacing.x;
        let total = rectf(frame.x, frame.y, width + inner_spacing + label_size.x, frame.height);
        self.item_size(vec2f(total.width, total.height), self.style.frame_padding.y);
        let visible = self.item_add(total, id);
        let (hovered, held, _) = self.button_behavior(frame, id, false);

        let grab_w = self.style.grab_min_size;
        let track_w = (frame.width - grab_w).max(1.0);
        let mut changed = false;
        if held {
            let t = ((self.io.mouse_pos.x - frame.x - grab_w * 0.5) / track_w).clamp(0.0, 1.0);
            let new_value = self.lerp_ratio(t, min, max);
            if new_value != *value {
                *value = new_value;
                changed = true;
            }
        }
        *value = value.clamp(min.min(max), max.max(min));

        if visible {
            let bg = self.interaction_color(
                StyleColor::FrameBg,
                StyleColor::FrameBgHovered,
                StyleColor::FrameBgActive,
                hovered,
                held,
            );
            self.render_frame(frame, bg, true);
            let t = self.ratio_in(*value, min, max);
            let grab = rectf(
                frame.x + t * track_w + 2.0,
                frame.y + 2.0,
                (grab_w - 4.0).max(1.0),
                frame.height - 4.0,
            );
            let grab_col = if held {
                self.style.get_color(StyleColor::SliderGrabActive)
            } else {
                self.style.get_color(StyleColor::SliderGrab)
            };
            let rounding = self.style.frame_rounding;
            let dl = &mut self.current_window_mut().draw_list;
            dl.add_rect_filled(grab, grab_col, rounding, crate::draw_list::CornerFlags::ALL);

            let value_text = format!("{:.3}", *value);
            let value_size = self.calc_text_size(&value_text, 0.0);
            let text_col = self.style.get_color(StyleColor::Text);
            let value_pos = vec2f(
                frame.x + (frame.width - value_size.x) * 0.5,
                frame.y + (frame.height - value_size.y) * 0.5,
            );
            self.draw_text(value_pos, text_col, &value_text, 0.0);
            let label_pos = vec2f(frame.x + frame.width + inner_spacing, frame.y + self.style.frame_padding.y);
            self.draw_text(label_pos, text_col, trim_label(label), 0.0);
        }
        changed
    }

    /// Drag box for an `f32`: horizontal mouse movement changes the value by
    /// `speed` per pixel. `min >= max` leaves the range unbounded. Returns
    /// `true` while the value changes.
    pub fn drag_f32(&mut self, label: &str, value: &mut f32, speed: f32, min: f32, max: f32) -> bool {
        let id = self.get_id(label);
        let width = self.calc_item_width();
        let frame = self.frame_interaction_rect(width);
        let label_size = self.calc_text_size(trim_label(label), 0.0);
        let inner_spacing = self.style.item_inner_spacing.x;
        let total = rectf(frame.x, frame.y, width + inner_spacing + label_size.x, frame.height);
        self.item_size(vec2f(total.width, total.height), self.style.frame_padding.y);
        let visible = self.item_add(total, id);
        let (hovered, held, _) = self.button_behavior(frame, id, false);

        let mut changed = false;
        if held {
            let delta = self.io.mouse_delta().x * speed;
            if delta != 0.0 {
                *value += delta;
                if min < max {
                    *value = value.clamp(min, max);
                }
                changed = true;
            }
        }

        if visible {
            let bg = self.interaction_color(
                StyleColor::FrameBg,
                StyleColor::FrameBgHovered,
                StyleColor::FrameBgActive,
                hovered,
                held,
            );
            self.render_frame(frame, bg, true);
            let value_text = format!("{:.3}", *value);
            let value_size = self.calc_text_size(&value_text, 0.0);
            let text_col = self.style.get_color(StyleColor::Text);
            let value_pos = vec2f(
                frame.x + (frame.width - value_size.x) * 0.5,
                frame.y + (frame.height - value_size.y) * 0.5,
            );
            self.draw_text(value_pos, text_col, &value_text, 0.0);
            let label_pos = vec2f(frame.x + frame.width + inner_spacing, frame.y + self.style.frame_padding.y);
            self.draw_text(label_pos, text_col, trim_label(label), 0.0);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use crate::atlas::{AtlasHandle, MonoAtlas, TextureId};
    use crate::id::Id;
    use crate::{vec2f, Cond, Context, MouseButton, Rectf, WindowFlags};
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
    fn slider_tracks_the_mouse_while_held() {
        let mut ctx = ctx();
        let mut value = 0.0f32;
        let mut rect = Rectf::default();
        let mut submit = |ctx: &mut Context, value: &mut f32, rect: &mut Rectf| {
            ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Once);
            ctx.set_next_window_size(vec2f(400.0, 200.0), Cond::Once);
            ctx.window("W", WindowFlags::default(), |ctx| {
                ctx.push_item_width(200.0);
                ctx.slider_f32("speed", value, 0.0, 1.0);
                *rect = ctx.last_item_rect();
                ctx.pop_item_width();
            });
        };
        frame(&mut ctx, |c| submit(c, &mut value, &mut rect));
        // the slider frame is the first 200px of the item
        let y = rect.center().y;
        let right_end = rect.x + 200.0 - 2.0;
        ctx.io.mousemove(right_end, y);
        frame(&mut ctx, |c| submit(c, &mut value, &mut rect));
        ctx.io.mousedown(right_end, y, MouseButton::Left);
        frame(&mut ctx, |c| submit(c, &mut value, &mut rect));
        assert!(value > 0.9, "grabbing near the right end: value {value}");

        let mid = rect.x + 100.0;
        ctx.io.mousemove(mid, y);
        frame(&mut ctx, |c| submit(c, &mut value, &mut rect));
        assert!((value - 0.5).abs() < 0.1, "dragged to the middle: value {value}");

        ctx.io.mouseup(mid, y, MouseButton::Left);
        frame(&mut ctx, |c| submit(c, &mut value, &mut rect));
    }

    #[test]
    fn capture_is_released_when_the_widget_disappears_mid_drag() {
        let mut ctx = ctx();
        let mut value = 0.5f32;
        let mut rect = Rectf::default();
        let mut submit = |ctx: &mut Context, show: bool, value: &mut f32, rect: &mut Rectf| {
            ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Once);
            ctx.set_next_window_size(vec2f(400.0, 200.0), Cond::Once);
            ctx.window("W", WindowFlags::default(), |ctx| {
                if show {
                    ctx.slider_f32("speed", value, 0.0, 1.0);
                    *rect = ctx.last_item_rect();
                }
            });
        };
        frame(&mut ctx, |c| submit(c, true, &mut value, &mut rect));
        let center = vec2f(rect.x + 50.0, rect.center().y);
        ctx.io.mousemove(center.x, center.y);
        frame(&mut ctx, |c| submit(c, true, &mut value, &mut rect));
        ctx.io.mousedown(center.x, center.y, MouseButton::Left);
        frame(&mut ctx, |c| submit(c, true, &mut value, &mut rect));
        assert!(ctx.interaction.active_id.is_some(), "drag in progress");

        // the widget stops being submitted; nobody re-asserts the active id
        frame(&mut ctx, |c| submit(c, false, &mut value, &mut rect));
        assert_eq!(ctx.interaction.active_id, Id::NONE);
    }

    #[test]
    fn drag_accumulates_mouse_movement() {
        let mut ctx = ctx();
        let mut value = 10.0f32;
        let mut rect = Rectf::default();
        let mut submit = |ctx: &mut Context, value: &mut f32, rect: &mut Rectf| {
            ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Once);
            ctx.set_next_window_size(vec2f(400.0, 200.0), Cond::Once);
            ctx.window("W", WindowFlags::default(), |ctx| {
                ctx.push_item_width(150.0);
                ctx.drag_f32("count", value, 0.5, 0.0, 0.0);
                *rect = ctx.last_item_rect();
                ctx.pop_item_width();
            });
        };
        frame(&mut ctx, |c| submit(c, &mut value, &mut rect));
        let center = vec2f(rect.x + 75.0, rect.center().y);
        ctx.io.mousemove(center.x, center.y);
        frame(&mut ctx, |c| submit(c, &mut value, &mut rect));
        ctx.io.mousedown(center.x, center.y, MouseButton::Left);
        frame(&mut ctx, |c| submit(c, &mut value, &mut rect));
        ctx.io.mousemove(center.x + 20.0, center.y);
        frame(&mut ctx, |c| submit(c, &mut value, &mut rect));
        // 20px at 0.5 per pixel
        assert_eq!(value, 20.0);
        ctx.io.mouseup(center.x + 20.0, center.y, MouseButton::Left);
        frame(&mut ctx, |c| submit(c, &mut value, &mut rect));
    }
}
