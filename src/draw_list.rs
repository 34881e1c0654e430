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
use crate::atlas::{AtlasHandle, FontId, TextureId};
use crate::{rectf, vec2f, Color, Color4b, Rectf, Vec2f};

/// Index type of the emitted geometry.
pub type DrawIdx = u32;

/// Number of segments in the fast-path arc lookup table (one full circle).
pub const ARC_FAST_TABLE_SIZE: usize = 12;

/// Width in pixels of the anti-aliasing fringe on each side of a shape edge.
const AA_SIZE: f32 = 1.0;

#[derive(Copy, Clone, Debug)]
#[repr(C)]
/// One vertex of the emitted geometry: screen position, atlas UV, packed RGBA.
pub struct DrawVert {
    /// Position in screen coordinates.
    pub pos: Vec2f,
    /// Texture coordinate into the active texture.
    pub uv: Vec2f,
    /// Vertex color.
    pub color: Color4b,
}

#[derive(Copy, Clone, Debug, PartialEq)]
/// One batched draw call: a range of the index buffer together with the render
/// state (scissor rectangle and texture) it must be issued under.
pub struct DrawCmd {
    /// Scissor rectangle in screen coordinates.
    pub clip_rect: Rectf,
    /// Texture bound while drawing this range.
    pub texture: TextureId,
    /// First index of the range.
    pub idx_offset: usize,
    /// Number of indices in the range.
    pub elem_count: usize,
}

bitflags::bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Which corners of a rounded rectangle actually get rounded.
    pub struct CornerFlags : u32 {
        /// Top-left corner.
        const TOP_LEFT = 1;
        /// Top-right corner.
        const TOP_RIGHT = 2;
        /// Bottom-left corner.
        const BOT_LEFT = 4;
        /// Bottom-right corner.
        const BOT_RIGHT = 8;
        /// Both top corners.
        const TOP = Self::TOP_LEFT.bits() | Self::TOP_RIGHT.bits();
        /// Both bottom corners.
        const BOT = Self::BOT_LEFT.bits() | Self::BOT_RIGHT.bits();
        /// All four corners.
        const ALL = Self::TOP.bits() | Self::BOT.bits();
    }
}

impl CornerFlags {
    /// Returns `true` if any top corner is rounded.
    pub fn is_top(&self) -> bool { self.intersects(Self::TOP) }
    /// Returns `true` if any bottom corner is rounded.
    pub fn is_bot(&self) -> bool { self.intersects(Self::BOT) }
}

/// Append-only vertex/index/command generator for one window layer.
///
/// All tessellation happens here: shapes are pushed through the path API or
/// the `add_*` helpers, get expanded into triangles (with a one pixel
/// anti-aliasing fringe when enabled) and land in flat buffers. Commands are
/// split only when the scissor rectangle or the bound texture change, so the
/// renderer receives a minimal batch sequence. Buffers are cleared, never
/// freed, so a stable UI reaches a steady state with no allocations per frame.
pub struct DrawList {
    /// Emitted vertices.
    pub vtx_buffer: Vec<DrawVert>,
    /// Emitted indices into `vtx_buffer`.
    pub idx_buffer: Vec<DrawIdx>,
    /// Emitted batched commands covering `idx_buffer` exactly.
    pub cmd_buffer: Vec<DrawCmd>,

    /// Anti-alias stroked shapes.
    pub anti_aliased_lines: bool,
    /// Anti-alias filled shapes.
    pub anti_aliased_fill: bool,

    clip_stack: Vec<Rectf>,
    texture_stack: Vec<TextureId>,
    path: Vec<Vec2f>,
    white_uv: Vec2f,
    arc_fast: [Vec2f; ARC_FAST_TABLE_SIZE],

    // cursor into vtx_buffer while writing a reserved primitive
    vtx_write: usize,
    idx_write: usize,
    vtx_current: DrawIdx,
}

impl DrawList {
    /// Creates an empty draw list. `white_uv` is the atlas' opaque texel used
    /// for untextured geometry.
    pub fn new(white_uv: Vec2f) -> Self {
        let mut arc_fast = [vec2f(0.0, 0.0); ARC_FAST_TABLE_SIZE];
        for (i, p) in arc_fast.iter_mut().enumerate() {
            let a = i as f32 / ARC_FAST_TABLE_SIZE as f32 * std::f32::consts::TAU;
            *p = vec2f(a.cos(), a.sin());
        }
        Self {
            vtx_buffer: Vec::new(),
            idx_buffer: Vec::new(),
            cmd_buffer: Vec::new(),
            anti_aliased_lines: true,
            anti_aliased_fill: true,
            clip_stack: Vec::new(),
            texture_stack: Vec::new(),
            path: Vec::new(),
            white_uv,
            arc_fast,
            vtx_write: 0,
            idx_write: 0,
            vtx_current: 0,
        }
    }

    /// Resets the list for a new frame, keeping buffer capacity. The initial
    /// clip rectangle and texture seed the first command.
    pub fn reset(&mut self, clip_rect: Rectf, texture: TextureId, white_uv: Vec2f) {
        self.vtx_buffer.clear();
        self.idx_buffer.clear();
        self.cmd_buffer.clear();
        self.clip_stack.clear();
        self.texture_stack.clear();
        self.path.clear();
        self.white_uv = white_uv;
        self.vtx_write = 0;
        self.idx_write = 0;
        self.vtx_current = 0;
        self.clip_stack.push(clip_rect);
        self.texture_stack.push(texture);
        self.cmd_buffer.push(DrawCmd { clip_rect, texture, idx_offset: 0, elem_count: 0 });
    }

    /// Current scissor rectangle.
    pub fn current_clip_rect(&self) -> Rectf {
        *self.clip_stack.last().unwrap_or(&rectf(-8192.0, -8192.0, 16384.0, 16384.0))
    }

    /// Depth of the scissor stack (1 right after `reset`).
    pub fn clip_depth(&self) -> usize { self.clip_stack.len() }

    /// Current texture.
    pub fn current_texture(&self) -> TextureId {
        self.texture_stack.last().copied().unwrap_or_default()
    }

    /// Pushes a scissor rectangle; when `intersect_with_current` it is clamped
    /// against the rectangle already in effect so nested scopes only narrow.
    pub fn push_clip_rect(&mut self, rect: Rectf, intersect_with_current: bool) {
        let rect = if intersect_with_current { self.current_clip_rect().intersect(&rect) } else { rect };
        self.clip_stack.push(rect);
        self.on_changed_clip_rect();
    }

    /// Pops the top scissor rectangle. Panics when the stack underflows.
    pub fn pop_clip_rect(&mut self) {
        assert!(self.clip_stack.len() > 1, "clip rect stack underflow");
        self.clip_stack.pop();
        self.on_changed_clip_rect();
    }

    /// Pushes a texture binding (e.g. a user image inside a window).
    pub fn push_texture(&mut self, texture: TextureId) {
        self.texture_stack.push(texture);
        self.on_changed_texture();
    }

    /// Pops the top texture binding. Panics when the stack underflows.
    pub fn pop_texture(&mut self) {
        assert!(self.texture_stack.len() > 1, "texture stack underflow");
        self.texture_stack.pop();
        self.on_changed_texture();
    }

    fn on_changed_clip_rect(&mut self) {
        let clip = self.current_clip_rect();
        let curr = self.cmd_buffer.last().copied();
        match curr {
            Some(cmd) if cmd.elem_count == 0 => {
                // empty command: rewrite its state in place, merging with the
                // previous command when that restores its exact state
                if self.cmd_buffer.len() >= 2 {
                    let prev = self.cmd_buffer[self.cmd_buffer.len() - 2];
                    if prev.clip_rect == clip && prev.texture == cmd.texture {
                        self.cmd_buffer.pop();
                        return;
                    }
                }
                self.cmd_buffer.last_mut().unwrap().clip_rect = clip;
            }
            Some(cmd) if cmd.clip_rect != clip => {
                let texture = cmd.texture;
                self.cmd_buffer.push(DrawCmd {
                    clip_rect: clip,
                    texture,
                    idx_offset: self.idx_buffer.len(),
                    elem_count: 0,
                });
            }
            _ => {}
        }
    }

    fn on_changed_texture(&mut self) {
        let texture = self.current_texture();
        let curr = self.cmd_buffer.last().copied();
        match curr {
            Some(cmd) if cmd.elem_count == 0 => {
                if self.cmd_buffer.len() >= 2 {
                    let prev = self.cmd_buffer[self.cmd_buffer.len() - 2];
                    if prev.texture == texture && prev.clip_rect == cmd.clip_rect {
                        self.cmd_buffer.pop();
                        return;
                    }
                }
                self.cmd_buffer.last_mut().unwrap().texture = texture;
            }
            Some(cmd) if cmd.texture != texture => {
                let clip_rect = cmd.clip_rect;
                self.cmd_buffer.push(DrawCmd {
                    clip_rect,
                    texture,
                    idx_offset: self.idx_buffer.len(),
                    elem_count: 0,
                });
            }
            _ => {}
        }
    }

    /// Drops a trailing command that batched no geometry.
    pub fn trim_trailing_empty_cmd(&mut self) {
        if let Some(cmd) = self.cmd_buffer.last() {
            if cmd.elem_count == 0 && self.cmd_buffer.len() > 1 {
                self.cmd_buffer.pop();
            }
        }
    }

    /// Checks that the commands tile the index buffer exactly.
    pub fn validate(&self) {
        let mut offset = 0;
        for cmd in &self.cmd_buffer {
            debug_assert_eq!(cmd.idx_offset, offset, "draw command offsets must be contiguous");
            offset += cmd.elem_count;
        }
        debug_assert_eq!(offset, self.idx_buffer.len(), "draw commands must cover every index");
    }

    fn prim_reserve(&mut self, idx_count: usize, vtx_count: usize) {
        debug_assert!(!self.cmd_buffer.is_empty(), "draw list used before reset");
        self.cmd_buffer.last_mut().unwrap().elem_count += idx_count;
        self.vtx_write = self.vtx_buffer.len();
        self.idx_write = self.idx_buffer.len();
        self.vtx_current = self.vtx_write as DrawIdx;
        self.vtx_buffer.resize(
            self.vtx_write + vtx_count,
            DrawVert { pos: vec2f(0.0, 0.0), uv: self.white_uv, color: crate::color(0, 0, 0, 0).packed() },
        );
        self.idx_buffer.resize(self.idx_write + idx_count, 0);
    }

    fn write_vtx(&mut self, pos: Vec2f, uv: Vec2f, color: Color4b) {
        self.vtx_buffer[self.vtx_write] = DrawVert { pos, uv, color };
        self.vtx_write += 1;
    }

    fn write_idx(&mut self, idx: DrawIdx) {
        self.idx_buffer[self.idx_write] = idx;
        self.idx_write += 1;
    }

    //
    // path API
    //

    /// Discards the working path.
    pub fn path_clear(&mut self) { self.path.clear(); }

    /// Appends a point to the working path, skipping exact duplicates.
    pub fn path_line_to(&mut self, p: Vec2f) {
        // Vec2f carries no PartialEq, compare components.
        if self.path.last().is_none_or(|q| q.x != p.x || q.y != p.y) {
            self.path.push(p);
        }
    }

    /// Appends a coarse arc using the 12-segment lookup table. `a_min`/`a_max`
    /// index into the table; the top of the circle is sample 9.
    pub fn path_arc_to_fast(&mut self, center: Vec2f, radius: f32, a_min: usize, a_max: usize) {
        if radius <= 0.0 {
            self.path_line_to(center);
            return;
        }
        for a in a_min..=a_max {
            let c = self.arc_fast[a % ARC_FAST_TABLE_SIZE];
            self.path_line_to(vec2f(center.x + c.x * radius, center.y + c.y * radius));
        }
    }

    /// Appends an arc with explicit angles and segment count.
    pub fn path_arc_to(&mut self, center: Vec2f, radius: f32, a_min: f32, a_max: f32, segments: usize) {
        if radius <= 0.0 {
            self.path_line_to(center);
            return;
        }
        for i in 0..=segments {
            let a = a_min + (i as f32 / segments as f32) * (a_max - a_min);
            self.path_line_to(vec2f(center.x + a.cos() * radius, center.y + a.sin() * radius));
        }
    }

    /// Appends a rectangle outline with optional rounded corners.
    pub fn path_rect(&mut self, min: Vec2f, max: Vec2f, rounding: f32, corners: CornerFlags) {
        let rounding = rounding
            .min((max.x - min.x).abs() * 0.5 - 1.0)
            .min((max.y - min.y).abs() * 0.5 - 1.0)
            .max(0.0);
        if rounding <= 0.0 || corners.is_empty() {
            self.path_line_to(min);
            self.path_line_to(vec2f(max.x, min.y));
            self.path_line_to(max);
            self.path_line_to(vec2f(min.x, max.y));
        } else {
            let r_tl = if corners.intersects(CornerFlags::TOP_LEFT) { rounding } else { 0.0 };
            let r_tr = if corners.intersects(CornerFlags::TOP_RIGHT) { rounding } else { 0.0 };
            let r_br = if corners.intersects(CornerFlags::BOT_RIGHT) { rounding } else { 0.0 };
            let r_bl = if corners.intersects(CornerFlags::BOT_LEFT) { rounding } else { 0.0 };
            self.path_arc_to_fast(vec2f(min.x + r_tl, min.y + r_tl), r_tl, 6, 9);
            self.path_arc_to_fast(vec2f(max.x - r_tr, min.y + r_tr), r_tr, 9, 12);
            self.path_arc_to_fast(vec2f(max.x - r_br, max.y - r_br), r_br, 0, 3);
            self.path_arc_to_fast(vec2f(min.x + r_bl, max.y - r_bl), r_bl, 3, 6);
        }
    }

    /// Strokes the working path and clears it.
    pub fn path_stroke(&mut self, color: Color, closed: bool, thickness: f32) {
        let path = std::mem::take(&mut self.path);
        self.add_polyline(&path, color, closed, thickness);
        self.path = path;
        self.path.clear();
    }

    /// Fills the working path (which must be convex) and clears it.
    pub fn path_fill_convex(&mut self, color: Color) {
        let path = std::mem::take(&mut self.path);
        self.add_convex_poly_filled(&path, color);
        self.path = path;
        self.path.clear();
    }

    //
    // primitives
    //

    /// Tessellates a point strip into a stroked line, with an anti-aliasing
    /// fringe when enabled.
    pub fn add_polyline(&mut self, points: &[Vec2f], color: Color, closed: bool, thickness: f32) {
        if points.len() < 2 || color.a == 0 {
            return;
        }
        let count = if closed { points.len() } else { points.len() - 1 };
        if self.anti_aliased_lines {
            self.add_polyline_aa(points, count, color, closed, thickness);
        } else {
            self.add_polyline_plain(points, count, color, closed, thickness);
        }
    }

    fn add_polyline_plain(&mut self, points: &[Vec2f], count: usize, color: Color, closed: bool, thickness: f32) {
        let col = color.packed();
        let uv = self.white_uv;
        self.prim_reserve(count * 6, count * 4);
        let base = self.vtx_current;
        for i in 0..count {
            let i1 = if closed && i + 1 == points.len() { 0 } else { i + 1 };
            let p0 = points[i];
            let p1 = points[i1];
            let d = normalize_over_zero(p1 - p0);
            let n = vec2f(d.y * thickness * 0.5, -d.x * thickness * 0.5);
            self.write_vtx(p0 + n, uv, col);
            self.write_vtx(p1 + n, uv, col);
            self.write_vtx(p1 - n, uv, col);
            self.write_vtx(p0 - n, uv, col);
            let v = base + (i * 4) as DrawIdx;
            self.write_idx(v);
            self.write_idx(v + 1);
            self.write_idx(v + 2);
            self.write_idx(v);
            self.write_idx(v + 2);
            self.write_idx(v + 3);
        }
    }

    fn add_polyline_aa(&mut self, points: &[Vec2f], count: usize, color: Color, closed: bool, thickness: f32) {
        let col = color.packed();
        let col_trans = Color { a: 0, ..color }.packed();
        let uv = self.white_uv;
        let thick_line = thickness > 1.0;
        let point_count = points.len();

        // per-point averaged edge normals
        let mut normals = vec![vec2f(0.0, 0.0); point_count];
        for i in 0..count {
            let i1 = if i + 1 == point_count { 0 } else { i + 1 };
            let d = normalize_over_zero(points[i1] - points[i]);
            normals[i] = vec2f(d.y, -d.x);
        }
        if !closed {
            normals[point_count - 1] = normals[point_count - 2];
        }

        if !thick_line {
            // 3 vertices per point: center at full alpha, two fringe points at zero
            let idx_count = count * 12;
            let vtx_count = point_count * 3;
            self.prim_reserve(idx_count, vtx_count);
            let base = self.vtx_current;

            for i in 0..point_count {
                let n = if closed || (i != 0 && i != point_count - 1) {
                    fix_normal(average_normals(&normals, i, point_count, closed))
                } else {
                    normals[if i == 0 { 0 } else { point_count - 2 }]
                };
                let off = vec2f(n.x * AA_SIZE, n.y * AA_SIZE);
                self.write_vtx(points[i], uv, col);
                self.write_vtx(points[i] + off, uv, col_trans);
                self.write_vtx(points[i] - off, uv, col_trans);
            }

            for i in 0..count {
                let i1 = if i + 1 == point_count { 0 } else { i + 1 };
                let v0 = base + (i * 3) as DrawIdx;
                let v1 = base + (i1 * 3) as DrawIdx;
                // two quads: center-to-fringe on each side
                self.write_idx(v0);
                self.write_idx(v1);
                self.write_idx(v1 + 1);
                self.write_idx(v0);
                self.write_idx(v1 + 1);
                self.write_idx(v0 + 1);
                self.write_idx(v0);
                self.write_idx(v1 + 2);
                self.write_idx(v1);
                self.write_idx(v0);
                self.write_idx(v0 + 2);
                self.write_idx(v1 + 2);
            }
        } else {
            // 4 vertices per point: solid inner edge pair, transparent outer pair
            let half = (thickness - AA_SIZE) * 0.5;
            let idx_count = count * 18;
            let vtx_count = point_count * 4;
            self.prim_reserve(idx_count, vtx_count);
            let base = self.vtx_current;

            for i in 0..point_count {
                let n = if closed || (i != 0 && i != point_count - 1) {
                    fix_normal(average_normals(&normals, i, point_count, closed))
                } else {
                    normals[if i == 0 { 0 } else { point_count - 2 }]
                };
                let inner = vec2f(n.x * half, n.y * half);
                let outer = vec2f(n.x * (half + AA_SIZE), n.y * (half + AA_SIZE));
                self.write_vtx(points[i] + outer, uv, col_trans);
                self.write_vtx(points[i] + inner, uv, col);
                self.write_vtx(points[i] - inner, uv, col);
                self.write_vtx(points[i] - outer, uv, col_trans);
            }

            for i in 0..count {
                let i1 = if i + 1 == point_count { 0 } else { i + 1 };
                let v0 = base + (i * 4) as DrawIdx;
                let v1 = base + (i1 * 4) as DrawIdx;
                self.write_idx(v0 + 1);
                self.write_idx(v1 + 1);
                self.write_idx(v1 + 2);
                self.write_idx(v0 + 1);
                self.write_idx(v1 + 2);
                self.write_idx(v0 + 2);
                self.write_idx(v0);
                self.write_idx(v1);
                self.write_idx(v1 + 1);
                self.write_idx(v0);
                self.write_idx(v1 + 1);
                self.write_idx(v0 + 1);
                self.write_idx(v0 + 2);
                self.write_idx(v1 + 2);
                self.write_idx(v1 + 3);
                self.write_idx(v0 + 2);
                self.write_idx(v1 + 3);
                self.write_idx(v0 + 3);
            }
        }
    }

    /// Fills a convex polygon, with an anti-aliasing fringe when enabled.
    pub fn add_convex_poly_filled(&mut self, points: &[Vec2f], color: Color) {
        if points.len() < 3 || color.a == 0 {
            return;
        }
        let col = color.packed();
        let uv = self.white_uv;
        let point_count = points.len();

        if self.anti_aliased_fill {
            let col_trans = Color { a: 0, ..color }.packed();
            let idx_count = (point_count - 2) * 3 + point_count * 6;
            let vtx_count = point_count * 2;
            self.prim_reserve(idx_count, vtx_count);
            let base = self.vtx_current;

            // interior fan over the inner (even) vertices
            for i in 2..point_count {
                self.write_idx(base);
                self.write_idx(base + ((i - 1) << 1) as DrawIdx);
                self.write_idx(base + (i << 1) as DrawIdx);
            }

            let mut normals = vec![vec2f(0.0, 0.0); point_count];
            for i0 in 0..point_count {
                let i1 = (i0 + 1) % point_count;
                let d = normalize_over_zero(points[i1] - points[i0]);
                normals[i0] = vec2f(d.y, -d.x);
            }

            for i0 in 0..point_count {
                let prev = (i0 + point_count - 1) % point_count;
                let n = fix_normal(vec2f(
                    (normals[prev].x + normals[i0].x) * 0.5,
                    (normals[prev].y + normals[i0].y) * 0.5,
                ));
                let off = vec2f(n.x * AA_SIZE * 0.5, n.y * AA_SIZE * 0.5);
                self.write_vtx(points[i0] - off, uv, col);
                self.write_vtx(points[i0] + off, uv, col_trans);
            }

            // fringe ring
            for i0 in 0..point_count {
                let i1 = (i0 + 1) % point_count;
                let in0 = base + (i0 << 1) as DrawIdx;
                let out0 = in0 + 1;
                let in1 = base + (i1 << 1) as DrawIdx;
                let out1 = in1 + 1;
                self.write_idx(in1);
                self.write_idx(in0);
                self.write_idx(out0);
                self.write_idx(out0);
                self.write_idx(out1);
                self.write_idx(in1);
            }
        } else {
            let idx_count = (point_count - 2) * 3;
            self.prim_reserve(idx_count, point_count);
            let base = self.vtx_current;
            for p in points {
                self.write_vtx(*p, uv, col);
            }
            for i in 2..point_count {
                self.write_idx(base);
                self.write_idx(base + (i - 1) as DrawIdx);
                self.write_idx(base + i as DrawIdx);
            }
        }
    }

    /// Strokes a single line segment.
    pub fn add_line(&mut self, a: Vec2f, b: Vec2f, color: Color, thickness: f32) {
        if color.a == 0 {
            return;
        }
        self.path_clear();
        self.path_line_to(a + vec2f(0.5, 0.5));
        self.path_line_to(b + vec2f(0.5, 0.5));
        self.path_stroke(color, false, thickness);
    }

    /// Strokes a rectangle outline.
    pub fn add_rect(&mut self, rect: Rectf, color: Color, rounding: f32, thickness: f32) {
        if color.a == 0 || rect.is_empty() {
            return;
        }
        self.path_clear();
        self.path_rect(rect.min() + vec2f(0.5, 0.5), rect.max() - vec2f(0.5, 0.5), rounding, CornerFlags::ALL);
        self.path_stroke(color, true, thickness);
    }

    /// Fills a rectangle, rounding the requested corners.
    pub fn add_rect_filled(&mut self, rect: Rectf, color: Color, rounding: f32, corners: CornerFlags) {
        if color.a == 0 || rect.is_empty() {
            return;
        }
        if rounding > 0.0 && !corners.is_empty() {
            self.path_clear();
            self.path_rect(rect.min(), rect.max(), rounding, corners);
            self.path_fill_convex(color);
        } else {
            self.prim_rect(rect.min(), rect.max(), color.packed());
        }
    }

    /// Fills a rectangle with a different color at each corner.
    pub fn add_rect_filled_multi_color(
        &mut self,
        rect: Rectf,
        col_tl: Color,
        col_tr: Color,
        col_br: Color,
        col_bl: Color,
    ) {
        if rect.is_empty() {
            return;
        }
        let uv = self.white_uv;
        self.prim_reserve(6, 4);
        let base = self.vtx_current;
        self.write_vtx(rect.min(), uv, col_tl.packed());
        self.write_vtx(vec2f(rect.x + rect.width, rect.y), uv, col_tr.packed());
        self.write_vtx(rect.max(), uv, col_br.packed());
        self.write_vtx(vec2f(rect.x, rect.y + rect.height), uv, col_bl.packed());
        self.write_idx(base);
        self.write_idx(base + 1);
        self.write_idx(base + 2);
        self.write_idx(base);
        self.write_idx(base + 2);
        self.write_idx(base + 3);
    }

    fn prim_rect(&mut self, min: Vec2f, max: Vec2f, col: Color4b) {
        let uv = self.white_uv;
        self.prim_reserve(6, 4);
        let base = self.vtx_current;
        self.write_vtx(min, uv, col);
        self.write_vtx(vec2f(max.x, min.y), uv, col);
        self.write_vtx(max, uv, col);
        self.write_vtx(vec2f(min.x, max.y), uv, col);
        self.write_idx(base);
        self.write_idx(base + 1);
        self.write_idx(base + 2);
        self.write_idx(base);
        self.write_idx(base + 2);
        self.write_idx(base + 3);
    }

    fn prim_rect_uv(&mut self, min: Vec2f, max: Vec2f, uv_min: Vec2f, uv_max: Vec2f, col: Color4b) {
        self.prim_reserve(6, 4);
        let base = self.vtx_current;
        self.write_vtx(min, vec2f(uv_min.x, uv_min.y), col);
        self.write_vtx(vec2f(max.x, min.y), vec2f(uv_max.x, uv_min.y), col);
        self.write_vtx(max, vec2f(uv_max.x, uv_max.y), col);
        self.write_vtx(vec2f(min.x, max.y), vec2f(uv_min.x, uv_max.y), col);
        self.write_idx(base);
        self.write_idx(base + 1);
        self.write_idx(base + 2);
        self.write_idx(base);
        self.write_idx(base + 2);
        self.write_idx(base + 3);
    }

    /// Strokes a triangle.
    pub fn add_triangle(&mut self, a: Vec2f, b: Vec2f, c: Vec2f, color: Color, thickness: f32) {
        if color.a == 0 {
            return;
        }
        self.path_clear();
        self.path_line_to(a);
        self.path_line_to(b);
        self.path_line_to(c);
        self.path_stroke(color, true, thickness);
    }

    /// Fills a triangle.
    pub fn add_triangle_filled(&mut self, a: Vec2f, b: Vec2f, c: Vec2f, color: Color) {
        if color.a == 0 {
            return;
        }
        self.path_clear();
        self.path_line_to(a);
        self.path_line_to(b);
        self.path_line_to(c);
        self.path_fill_convex(color);
    }

    /// Strokes a circle approximated with `segments` chords (at least 3).
    pub fn add_circle(&mut self, center: Vec2f, radius: f32, color: Color, segments: usize, thickness: f32) {
        if color.a == 0 || radius <= 0.0 {
            return;
        }
        let segments = segments.max(3);
        let a_max = std::f32::consts::TAU * (segments as f32 - 1.0) / segments as f32;
        self.path_clear();
        self.path_arc_to(center, radius, 0.0, a_max, segments - 1);
        self.path_stroke(color, true, thickness);
    }

    /// Fills a circle approximated with `segments` chords (at least 3).
    pub fn add_circle_filled(&mut self, center: Vec2f, radius: f32, color: Color, segments: usize) {
        if color.a == 0 || radius <= 0.0 {
            return;
        }
        let segments = segments.max(3);
        let a_max = std::f32::consts::TAU * (segments as f32 - 1.0) / segments as f32;
        self.path_clear();
        self.path_arc_to(center, radius, 0.0, a_max, segments - 1);
        self.path_fill_convex(color);
    }

    /// Draws a textured quad.
    pub fn add_image(&mut self, texture: TextureId, rect: Rectf, uv_min: Vec2f, uv_max: Vec2f, color: Color) {
        if color.a == 0 || rect.is_empty() {
            return;
        }
        let push = texture != self.current_texture();
        if push {
            self.push_texture(texture);
        }
        self.prim_rect_uv(rect.min(), rect.max(), uv_min, uv_max, color.packed());
        if push {
            self.pop_texture();
        }
    }

    /// Lays glyphs for `text` starting at `pos` (top-left of the first line).
    ///
    /// Glyph quads are clipped on the CPU against `fine_clip` (when given) or
    /// the current scissor rectangle, interpolating UVs so partially visible
    /// glyphs stay correct; quads entirely outside are skipped. Wraps at
    /// `wrap_width` when positive, on word boundaries where possible.
    pub fn add_text(
        &mut self,
        atlas: &AtlasHandle,
        font: FontId,
        size: f32,
        pos: Vec2f,
        color: Color,
        text: &str,
        wrap_width: f32,
        fine_clip: Option<Rectf>,
    ) {
        if color.a == 0 || text.is_empty() {
            return;
        }
        let metrics = atlas.metrics(font);
        let scale = size / metrics.size;
        let line_height = metrics.line_height * scale;
        let clip = fine_clip.unwrap_or_else(|| self.current_clip_rect());
        let col = color.packed();

        let mut pen = pos;
        for line in text.split('\n') {
            if wrap_width > 0.0 {
                for word in line.split_inclusive(' ') {
                    let word_width: f32 = word
                        .chars()
                        .filter_map(|c| atlas.glyph_or_fallback(font, c))
                        .map(|g| g.advance_x * scale)
                        .sum();
                    if pen.x > pos.x && pen.x + word_width > pos.x + wrap_width {
                        pen.x = pos.x;
                        pen.y += line_height;
                    }
                    self.emit_glyph_run(atlas, font, scale, &mut pen, col, word, &clip);
                }
            } else {
                self.emit_glyph_run(atlas, font, scale, &mut pen, col, line, &clip);
            }
            pen.x = pos.x;
            pen.y += line_height;
        }
    }

    fn emit_glyph_run(
        &mut self,
        atlas: &AtlasHandle,
        font: FontId,
        scale: f32,
        pen: &mut Vec2f,
        col: Color4b,
        run: &str,
        clip: &Rectf,
    ) {
        for c in run.chars() {
            let Some(g) = atlas.glyph_or_fallback(font, c) else { continue };
            let advance = g.advance_x * scale;
            let mut x0 = pen.x + g.x0 * scale;
            let mut y0 = pen.y + g.y0 * scale;
            let mut x1 = pen.x + g.x1 * scale;
            let mut y1 = pen.y + g.y1 * scale;
            pen.x += advance;

            let (cx0, cy0) = (clip.x, clip.y);
            let (cx1, cy1) = (clip.x + clip.width, clip.y + clip.height);
            if x1 <= cx0 || x0 >= cx1 || y1 <= cy0 || y0 >= cy1 {
                continue;
            }

            let mut u0 = g.u0;
            let mut v0 = g.v0;
            let mut u1 = g.u1;
            let mut v1 = g.v1;
            if x0 < cx0 {
                u0 += (cx0 - x0) / (x1 - x0) * (u1 - u0);
                x0 = cx0;
            }
            if y0 < cy0 {
                v0 += (cy0 - y0) / (y1 - y0) * (v1 - v0);
                y0 = cy0;
            }
            if x1 > cx1 {
                u1 -= (x1 - cx1) / (x1 - x0) * (u1 - u0);
                x1 = cx1;
            }
            if y1 > cy1 {
                v1 -= (y1 - cy1) / (y1 - y0) * (v1 - v0);
                y1 = cy1;
            }
            self.prim_rect_uv(vec2f(x0, y0), vec2f(x1, y1), vec2f(u0, v0), vec2f(u1, v1), col);
        }
    }
}

/// Normalizes a vector, returning zero for degenerate segments so duplicate
/// path points never produce NaN offsets.
fn normalize_over_zero(v: Vec2f) -> Vec2f {
    let len_sqr = v.x * v.x + v.y * v.y;
    if len_sqr > 0.0 {
        let inv = 1.0 / len_sqr.sqrt();
        vec2f(v.x * inv, v.y * inv)
    } else {
        vec2f(0.0, 0.0)
    }
}

fn average_normals(normals: &[Vec2f], i: usize, count: usize, closed: bool) -> Vec2f {
    let prev = if i == 0 {
        if closed { count - 1 } else { 0 }
    } else {
        i - 1
    };
    vec2f((normals[prev].x + normals[i].x) * 0.5, (normals[prev].y + normals[i].y) * 0.5)
}

/// Rescales an averaged miter normal back to unit-ish length, clamping the
/// scale so nearly opposite edge normals never explode the fringe.
fn fix_normal(n: Vec2f) -> Vec2f {
    let len_sqr = n.x * n.x + n.y * n.y;
    let scale = if len_sqr < 0.5 { 2.0 } else { 1.0 / len_sqr };
    vec2f(n.x * scale, n.y * scale)
}

/// The frame's complete render output, handed to [`crate::Renderer`].
///
/// Lists are ordered back-to-front; issuing them in sequence with scissor and
/// texture taken from each command reproduces the frame.
pub struct DrawData<'a> {
    /// Draw lists in submission order.
    pub lists: Vec<&'a DrawList>,
    /// Display size the geometry was generated for.
    pub display_size: Vec2f,
    /// Total vertex count across all lists.
    pub total_vtx_count: usize,
    /// Total index count across all lists.
    pub total_idx_count: usize,
}

impl<'a> DrawData<'a> {
    /// Assembles draw data from an ordered list sequence.
    pub fn new(lists: Vec<&'a DrawList>, display_size: Vec2f) -> Self {
        let total_vtx_count = lists.iter().map(|l| l.vtx_buffer.len()).sum();
        let total_idx_count = lists.iter().map(|l| l.idx_buffer.len()).sum();
        Self { lists, display_size, total_vtx_count, total_idx_count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;

    fn list() -> DrawList {
        let mut dl = DrawList::new(vec2f(0.0, 0.0));
        dl.reset(rectf(0.0, 0.0, 800.0, 600.0), TextureId::new(1), vec2f(0.0, 0.0));
        dl
    }

    #[test]
    fn plain_rect_is_two_triangles() {
        let mut dl = list();
        dl.add_rect_filled(rectf(10.0, 10.0, 50.0, 20.0), color(255, 0, 0, 255), 0.0, CornerFlags::ALL);
        assert_eq!(dl.vtx_buffer.len(), 4);
        assert_eq!(dl.idx_buffer.len(), 6);
        assert_eq!(dl.cmd_buffer.len(), 1);
        assert_eq!(dl.cmd_buffer[0].elem_count, 6);
        dl.validate();
    }

    #[test]
    fn aa_fill_doubles_the_ring() {
        let mut dl = list();
        let pts = [vec2f(0.0, 0.0), vec2f(40.0, 0.0), vec2f(40.0, 30.0), vec2f(0.0, 30.0)];
        dl.add_convex_poly_filled(&pts, color(255, 255, 255, 255));
        assert_eq!(dl.vtx_buffer.len(), 8);
        assert_eq!(dl.idx_buffer.len(), (4 - 2) * 3 + 4 * 6);
        // fringe vertices carry zero alpha
        let transparent = dl.vtx_buffer.iter().filter(|v| v.color.w == 0).count();
        assert_eq!(transparent, 4);
        dl.validate();
    }

    #[test]
    fn degenerate_circle_segment_counts_are_clamped() {
        let mut dl = list();
        dl.add_circle(vec2f(50.0, 50.0), 10.0, color(255, 0, 0, 255), 0, 1.0);
        dl.add_circle_filled(vec2f(50.0, 50.0), 10.0, color(255, 0, 0, 255), 1);
        assert!(!dl.vtx_buffer.is_empty());
        for v in &dl.vtx_buffer {
            assert!(v.pos.x.is_finite() && v.pos.y.is_finite());
        }
        dl.validate();
    }

    #[test]
    fn thin_aa_stroke_uses_three_vertices_per_point() {
        let mut dl = list();
        dl.add_polyline(&[vec2f(0.0, 0.0), vec2f(100.0, 0.0)], color(255, 255, 255, 255), false, 1.0);
        assert_eq!(dl.vtx_buffer.len(), 2 * 3);
        assert_eq!(dl.idx_buffer.len(), 1 * 12);
        dl.validate();
    }

    #[test]
    fn thick_aa_stroke_uses_four_vertices_per_point() {
        let mut dl = list();
        dl.add_polyline(&[vec2f(0.0, 0.0), vec2f(100.0, 0.0), vec2f(100.0, 50.0)], color(0, 255, 0, 255), false, 4.0);
        assert_eq!(dl.vtx_buffer.len(), 3 * 4);
        assert_eq!(dl.idx_buffer.len(), 2 * 18);
        dl.validate();
    }

    #[test]
    fn duplicate_path_points_produce_no_nan() {
        let mut dl = list();
        dl.add_polyline(
            &[vec2f(10.0, 10.0), vec2f(10.0, 10.0), vec2f(50.0, 10.0)],
            color(255, 255, 255, 255),
            false,
            1.0,
        );
        for v in &dl.vtx_buffer {
            assert!(v.pos.x.is_finite() && v.pos.y.is_finite());
        }
    }

    #[test]
    fn clip_change_splits_commands_only_around_geometry() {
        let mut dl = list();
        // a clip push before any geometry rewrites the seed command in place
        dl.push_clip_rect(rectf(0.0, 0.0, 400.0, 300.0), true);
        assert_eq!(dl.cmd_buffer.len(), 1);
        dl.add_rect_filled(rectf(0.0, 0.0, 10.0, 10.0), color(255, 0, 0, 255), 0.0, CornerFlags::ALL);
        dl.push_clip_rect(rectf(0.0, 0.0, 100.0, 100.0), true);
        dl.add_rect_filled(rectf(0.0, 0.0, 10.0, 10.0), color(255, 0, 0, 255), 0.0, CornerFlags::ALL);
        assert_eq!(dl.cmd_buffer.len(), 2);
        dl.pop_clip_rect();
        dl.pop_clip_rect();
        dl.trim_trailing_empty_cmd();
        assert_eq!(dl.cmd_buffer.len(), 2);
        dl.validate();
    }

    #[test]
    fn push_pop_without_geometry_merges_back() {
        let mut dl = list();
        dl.add_rect_filled(rectf(0.0, 0.0, 10.0, 10.0), color(255, 0, 0, 255), 0.0, CornerFlags::ALL);
        dl.push_clip_rect(rectf(5.0, 5.0, 20.0, 20.0), true);
        dl.pop_clip_rect();
        assert_eq!(dl.cmd_buffer.len(), 1);
        dl.validate();
    }

    #[test]
    fn nested_clip_rects_only_narrow() {
        let mut dl = list();
        dl.push_clip_rect(rectf(100.0, 100.0, 200.0, 200.0), true);
        dl.push_clip_rect(rectf(0.0, 0.0, 150.0, 150.0), true);
        assert_eq!(dl.current_clip_rect(), rectf(100.0, 100.0, 50.0, 50.0));
    }

    #[test]
    #[should_panic]
    fn clip_stack_underflow_panics() {
        let mut dl = list();
        dl.pop_clip_rect();
    }

    #[test]
    fn texture_change_opens_a_new_command() {
        let mut dl = list();
        dl.add_rect_filled(rectf(0.0, 0.0, 10.0, 10.0), color(255, 0, 0, 255), 0.0, CornerFlags::ALL);
        dl.add_image(
            TextureId::new(7),
            rectf(20.0, 20.0, 32.0, 32.0),
            vec2f(0.0, 0.0),
            vec2f(1.0, 1.0),
            color(255, 255, 255, 255),
        );
        dl.trim_trailing_empty_cmd();
        assert_eq!(dl.cmd_buffer.len(), 2);
        assert_eq!(dl.cmd_buffer[1].texture, TextureId::new(7));
        dl.validate();
    }

    #[test]
    fn text_fine_clip_keeps_vertices_inside_the_box() {
        use crate::atlas::{AtlasHandle, FontId, MonoAtlas};
        let atlas = AtlasHandle::new(MonoAtlas::new(TextureId::new(1), 16.0));
        let clip = rectf(0.0, 0.0, 50.0, 20.0);
        let mut dl = list();
        dl.add_text(
            &atlas,
            FontId(0),
            16.0,
            vec2f(-10.0, -5.0),
            color(255, 255, 255, 255),
            "clipped text that overflows",
            0.0,
            Some(clip),
        );
        assert!(!dl.vtx_buffer.is_empty());
        for v in &dl.vtx_buffer {
            assert!(v.pos.x >= clip.x - 1e-3 && v.pos.x <= clip.x + clip.width + 1e-3);
            assert!(v.pos.y >= clip.y - 1e-3 && v.pos.y <= clip.y + clip.height + 1e-3);
        }
        dl.validate();
    }

    #[test]
    fn fully_clipped_glyphs_emit_nothing() {
        use crate::atlas::{AtlasHandle, FontId, MonoAtlas};
        let atlas = AtlasHandle::new(MonoAtlas::new(TextureId::new(1), 16.0));
        let mut dl = list();
        dl.add_text(
            &atlas,
            FontId(0),
            16.0,
            vec2f(1000.0, 1000.0),
            color(255, 255, 255, 255),
            "invisible",
            0.0,
            Some(rectf(0.0, 0.0, 50.0, 20.0)),
        );
        assert!(dl.vtx_buffer.is_empty());
    }

    #[test]
    fn rounded_rect_tessellates_arcs() {
        let mut dl = list();
        dl.add_rect_filled(rectf(0.0, 0.0, 100.0, 40.0), color(0, 0, 255, 255), 8.0, CornerFlags::ALL);
        assert!(dl.vtx_buffer.len() > 8);
        dl.validate();
    }

    #[test]
    fn draw_data_totals() {
        let mut a = list();
        a.add_rect_filled(rectf(0.0, 0.0, 10.0, 10.0), color(255, 0, 0, 255), 0.0, CornerFlags::ALL);
        let mut b = list();
        b.add_rect_filled(rectf(0.0, 0.0, 10.0, 10.0), color(255, 0, 0, 255), 0.0, CornerFlags::ALL);
        let data = DrawData::new(vec![&a, &b], vec2f(800.0, 600.0));
        assert_eq!(data.total_vtx_count, 8);
        assert_eq!(data.total_idx_count, 12);
    }
}
