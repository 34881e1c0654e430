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
use crate::{rectf, vec2f, Context, Vec2f};

impl Context {
    /// Collapsible tree node. When open, runs `f` with the following items
    /// indented and id-scoped under the node; returns its result. Open state
    /// persists per window across frames.
    pub fn tree_node<R>(&mut self, label: &str, f: impl FnOnce(&mut Self) -> R) -> Option<R> {
        let open = self.node_header(label, false, false);
        if !open {
            return None;
        }
        self.push_id(label);
        self.indent();
        let result = f(self);
        self.unindent();
        self.pop_id();
        Some(result)
    }

    /// Full-width header that folds the section below it. Returns `true`
    /// while open; the caller guards its section with the result.
    pub fn collapsing_header(&mut self, label: &str) -> bool {
        self.node_header(label, true, true)
    }

    fn node_header(&mut self, label: &str, full_width: bool, default_open: bool) -> bool {
        let id = self.get_id(label);
        let mut open = match self.storage_get(id) {
            0 => default_open,
            v => v == 2,
        };

        let label_size = self.calc_text_size(trim_label(label), 0.0);
        let arrow_w = self.style.font_size;
        let inner_spacing = self.style.item_inner_spacing.x;
        let height = self.frame_height();
        let pos = self.current_window().cursor.pos;
        let width = if full_width {
            self.content_region_avail().x.max(1.0)
        } else {
            arrow_w + inner_spacing + label_size.x + self.style.frame_padding.x * 2.0
        };
        let rect = rectf(pos.x, pos.y, width, height);
        self.item_size(vec2f(width, height), self.style.frame_padding.y);
        let visible = self.item_add(rect, id);
        let (hovered, held, pressed) = self.button_behavior(rect, id, false);
        if pressed {
            open = !open;
        }
        self.storage_set(id, if open { 2 } else { 1 });

        if visible {
            if full_width || hovered || held {
                let col = self.interaction_color(
                    StyleColor::Header,
                    StyleColor::HeaderHovered,
                    StyleColor::HeaderActive,
                    hovered,
                    held,
                );
                self.render_frame(rect, col, false);
            }
            let arrow_center = vec2f(
                rect.x + self.style.frame_padding.x + arrow_w * 0.5,
                rect.y + height * 0.5,
            );
            self.draw_node_arrow(arrow_center, arrow_w * 0.35, open);
            let text_pos = vec2f(
                rect.x + self.style.frame_padding.x + arrow_w + inner_spacing,
                rect.y + (height - label_size.y) * 0.5,
            );
            let text_col = self.style.get_color(StyleColor::Text);
            self.draw_text(text_pos, text_col, trim_label(label), 0.0);
        }
        open
    }

    fn draw_node_arrow(&mut self, center: Vec2f, half: f32, open: bool) {
        let col = self.style.get_color(StyleColor::Text);
        let (a, b, c) = if open {
            // pointing down
            (
                vec2f(center.x - half, center.y - half * 0.5),
                vec2f(center.x + half, center.y - half * 0.5),
                vec2f(center.x, center.y + half),
            )
        } else {
            // pointing right
            (
                vec2f(center.x - half * 0.5, center.y - half),
                vec2f(center.x + half, center.y),
                vec2f(center.x - half * 0.5, center.y + half),
            )
        };
        let dl = &mut self.current_window_mut().draw_list;
        dl.add_triangle_filled(a, b, c, col);
    }
}

#[cfg(test)]
mod tests {
    use crate::atlas::{AtlasHandle, MonoAtlas, TextureId};
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
    fn tree_node_starts_closed_and_opens_on_click() {
        let mut ctx = ctx();
        let mut body_ran = false;
        let mut rect = Rectf::default();
        let mut submit = |ctx: &mut Context, body_ran: &mut bool, rect: &mut Rectf| {
            ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Once);
            ctx.set_next_window_size(vec2f(300.0, 300.0), Cond::Once);
            ctx.window("W", WindowFlags::default(), |ctx| {
                ctx.tree_node("Details", |ctx| {
                    *body_ran = true;
                    ctx.text("inner");
                });
                *rect = ctx.last_item_rect();
            });
        };
        frame(&mut ctx, |c| submit(c, &mut body_ran, &mut rect));
        assert!(!body_ran);

        let center = rect.center();
        ctx.io.mousemove(center.x, center.y);
        frame(&mut ctx, |c| submit(c, &mut body_ran, &mut rect));
        ctx.io.mousedown(center.x, center.y, MouseButton::Left);
        frame(&mut ctx, |c| submit(c, &mut body_ran, &mut rect));
        ctx.io.mouseup(center.x, center.y, MouseButton::Left);
        frame(&mut ctx, |c| submit(c, &mut body_ran, &mut rect));
        assert!(body_ran, "click toggles the node open");

        // stays open with no further input
        body_ran = false;
        ctx.io.mousemove(0.0, 299.0);
        frame(&mut ctx, |c| submit(c, &mut body_ran, &mut rect));
        assert!(body_ran);
    }

    #[test]
    fn collapsing_header_defaults_open_and_collapses_on_click() {
        let mut ctx = ctx();
        let mut open_seen = false;
        let mut rect = Rectf::default();
        let mut submit = |ctx: &mut Context, open_seen: &mut bool, rect: &mut Rectf| {
            ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Once);
            ctx.set_next_window_size(vec2f(300.0, 300.0), Cond::Once);
            ctx.window("W", WindowFlags::default(), |ctx| {
                *open_seen = ctx.collapsing_header("Section");
                *rect = ctx.last_item_rect();
            });
        };
        frame(&mut ctx, |c| submit(c, &mut open_seen, &mut rect));
        assert!(open_seen);

        let center = rect.center();
        ctx.io.mousemove(center.x, center.y);
        frame(&mut ctx, |c| submit(c, &mut open_seen, &mut rect));
        ctx.io.mousedown(center.x, center.y, MouseButton::Left);
        frame(&mut ctx, |c| submit(c, &mut open_seen, &mut rect));
        ctx.io.mouseup(center.x, center.y, MouseButton::Left);
        frame(&mut ctx, |c| submit(c, &mut open_seen, &mut rect));
        assert!(!open_seen);
    }

    #[test]
    fn nested_nodes_scope_their_ids() {
        let mut ctx = ctx();
        frame(&mut ctx, |ctx| {
            ctx.window("W", WindowFlags::default(), |ctx| {
                // same label at two nesting levels must hash differently
                let outer = ctx.get_id("item");
                ctx.push_id("item");
                let inner = ctx.get_id("item");
                ctx.pop_id();
                assert_ne!(outer, inner);
            });
        });
    }
}
