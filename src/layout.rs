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
use crate::id::Id;
use crate::{lerp, rectf, vec2f, Rectf, Vec2f};

#[derive(Copy, Clone, Debug, Default)]
/// Geometry and identity of the item most recently submitted to the layout,
/// exposed to `same_line`-style queries and hover checks.
pub struct LastItem {
    /// Id of the item, or `Id::NONE` for pure layout advances.
    pub id: Id,
    /// Screen rectangle the item occupied.
    pub rect: Rectf,
    /// `false` when the item was culled against the clip rectangle.
    pub visible: bool,
}

#[derive(Copy, Clone)]
struct GroupData {
    backup_pos: Vec2f,
    backup_max_pos: Vec2f,
    backup_indent: f32,
    backup_curr_line_height: f32,
    backup_curr_line_text_base: f32,
}

/// Per-window layout cursor.
///
/// Items flow top to bottom; each call to [`item_size`](Self::item_size)
/// advances the cursor below the tallest item of the current line and folds
/// the item extent into the window's content size. `same_line` rewinds to the
/// previous line's end so the next item continues horizontally. The cursor is
/// reset from the window position (plus padding, scroll and title bar) every
/// time the window begins.
pub struct LayoutCursor {
    pub(crate) start_pos: Vec2f,
    pub(crate) pos: Vec2f,
    pub(crate) pos_prev_line: Vec2f,
    pub(crate) curr_line_height: f32,
    pub(crate) prev_line_height: f32,
    pub(crate) curr_line_text_base: f32,
    pub(crate) prev_line_text_base: f32,
    pub(crate) indent: f32,
    pub(crate) max_pos: Vec2f,
    pub(crate) last_item: LastItem,
    pub(crate) item_width_default: f32,

    group_stack: Vec<GroupData>,
    item_width_stack: Vec<f32>,
    text_wrap_stack: Vec<f32>,
    button_repeat_stack: Vec<bool>,
    allow_keyboard_focus_stack: Vec<bool>,
}

impl LayoutCursor {
    pub(crate) fn new() -> Self {
        Self {
            start_pos: vec2f(0.0, 0.0),
            pos: vec2f(0.0, 0.0),
            pos_prev_line: vec2f(0.0, 0.0),
            curr_line_height: 0.0,
            prev_line_height: 0.0,
            curr_line_text_base: 0.0,
            prev_line_text_base: 0.0,
            indent: 0.0,
            max_pos: vec2f(0.0, 0.0),
            last_item: LastItem::default(),
            item_width_default: 200.0,
            group_stack: Vec::new(),
            item_width_stack: Vec::new(),
            text_wrap_stack: Vec::new(),
            button_repeat_stack: Vec::new(),
            allow_keyboard_focus_stack: Vec::new(),
        }
    }

    /// Resets the cursor to the window's content origin. Override stacks are
    /// expected to be empty at this point; leftovers indicate an unbalanced
    /// push from the previous frame.
    pub(crate) fn reset(&mut self, start_pos: Vec2f, item_width_default: f32) {
        assert!(self.group_stack.is_empty(), "unbalanced begin_group/end_group");
        assert!(self.item_width_stack.is_empty(), "unbalanced push_item_width/pop_item_width");
        assert!(self.text_wrap_stack.is_empty(), "unbalanced push_text_wrap_pos/pop_text_wrap_pos");
        self.start_pos = start_pos;
        self.pos = start_pos;
        self.pos_prev_line = start_pos;
        self.curr_line_height = 0.0;
        self.prev_line_height = 0.0;
        self.curr_line_text_base = 0.0;
        self.prev_line_text_base = 0.0;
        self.indent = 0.0;
        self.max_pos = start_pos;
        self.last_item = LastItem::default();
        self.item_width_default = item_width_default;
        self.button_repeat_stack.clear();
        self.allow_keyboard_focus_stack.clear();
    }

    /// Advances the cursor past an item of the given size: the current line
    /// grows to the tallest item seen, the next line starts below it, and the
    /// content extent folds in the item's far corner.
    pub(crate) fn item_size(&mut self, size: Vec2f, spacing_y: f32, text_baseline_offset: f32) {
        let line_height = self.curr_line_height.max(size.y);
        let text_base = self.curr_line_text_base.max(text_baseline_offset);

        self.pos_prev_line = vec2f(self.pos.x + size.x, self.pos.y);
        self.pos = vec2f(self.start_pos.x + self.indent, self.pos.y + line_height + spacing_y);
        self.max_pos = vec2f(self.max_pos.x.max(self.pos_prev_line.x), self.max_pos.y.max(self.pos.y - spacing_y));

        self.prev_line_height = line_height;
        self.prev_line_text_base = text_base;
        self.curr_line_height = 0.0;
        self.curr_line_text_base = 0.0;
    }

    /// Rewinds the cursor onto the previous line. `pos_x == 0` continues after
    /// the previous item with `spacing_w` (negative means the default);
    /// otherwise the cursor jumps to `pos_x` relative to the content origin.
    pub(crate) fn same_line(&mut self, pos_x: f32, spacing_w: f32, default_spacing_x: f32) {
        if pos_x != 0.0 {
            self.pos = vec2f(self.start_pos.x + pos_x + spacing_w.max(0.0), self.pos_prev_line.y);
        } else {
            let spacing = if spacing_w < 0.0 { default_spacing_x } else { spacing_w };
            self.pos = vec2f(self.pos_prev_line.x + spacing, self.pos_prev_line.y);
        }
        self.curr_line_height = self.prev_line_height;
        self.curr_line_text_base = self.prev_line_text_base;
    }

    /// Single choke point every widget passes through after reserving its
    /// rectangle. Records the last item and culls it against `clip`; layout
    /// has already advanced, so a culled item costs no geometry but keeps the
    /// flow identical.
    pub(crate) fn item_add(&mut self, rect: Rectf, id: Id, clip: &Rectf) -> bool {
        let visible = !clip.intersect(&rect).is_empty();
        self.last_item = LastItem { id, rect, visible };
        visible
    }

    /// Moves the content origin right; subsequent lines start indented.
    pub(crate) fn indent(&mut self, amount: f32) {
        self.indent += amount;
        self.pos.x = self.start_pos.x + self.indent;
    }

    /// Undoes [`indent`](Self::indent).
    pub(crate) fn unindent(&mut self, amount: f32) {
        self.indent -= amount;
        self.pos.x = self.start_pos.x + self.indent;
    }

    /// Opens a layout group: a scope whose items are measured as one unit.
    pub(crate) fn begin_group(&mut self) {
        self.group_stack.push(GroupData {
            backup_pos: self.pos,
            backup_max_pos: self.max_pos,
            backup_indent: self.indent,
            backup_curr_line_height: self.curr_line_height,
            backup_curr_line_text_base: self.curr_line_text_base,
        });
        self.indent = self.pos.x - self.start_pos.x;
        self.max_pos = self.pos;
        self.curr_line_height = 0.0;
        self.curr_line_text_base = 0.0;
    }

    /// Closes the innermost group and returns its combined bounding box; the
    /// caller advances the cursor with it as a single item. Panics when no
    /// group is open.
    pub(crate) fn end_group(&mut self) -> Rectf {
        let data = self.group_stack.pop().expect("end_group without begin_group");
        let bbox = Rectf::from_min_max(
            data.backup_pos,
            vec2f(self.max_pos.x.max(data.backup_pos.x), self.max_pos.y.max(data.backup_pos.y)),
        );
        self.pos = data.backup_pos;
        self.max_pos = vec2f(self.max_pos.x.max(data.backup_max_pos.x), self.max_pos.y.max(data.backup_max_pos.y));
        self.indent = data.backup_indent;
        self.curr_line_height = data.backup_curr_line_height;
        self.curr_line_text_base = data.backup_curr_line_text_base;
        bbox
    }

    /// Pushes an item width override. Positive is absolute; negative means
    /// "fill to that many pixels from the right edge".
    pub(crate) fn push_item_width(&mut self, width: f32) { self.item_width_stack.push(width); }

    /// Pops an item width override. Panics on underflow.
    pub(crate) fn pop_item_width(&mut self) {
        assert!(self.item_width_stack.pop().is_some(), "pop_item_width without push_item_width");
    }

    /// Resolves the effective item width against the available content width.
    pub(crate) fn calc_item_width(&self, avail_width: f32) -> f32 {
        let w = self.item_width_stack.last().copied().unwrap_or(self.item_width_default);
        if w < 0.0 {
            (avail_width - self.pos.x + self.start_pos.x + w).max(1.0)
        } else {
            w
        }
    }

    /// Pushes a wrap position (relative to the content origin; `0` wraps at
    /// the content width, negative disables).
    pub(crate) fn push_text_wrap_pos(&mut self, wrap_x: f32) { self.text_wrap_stack.push(wrap_x); }

    /// Pops a wrap position. Panics on underflow.
    pub(crate) fn pop_text_wrap_pos(&mut self) {
        assert!(self.text_wrap_stack.pop().is_some(), "pop_text_wrap_pos without push_text_wrap_pos");
    }

    /// Current wrap position, if any.
    pub(crate) fn text_wrap_pos(&self) -> Option<f32> { self.text_wrap_stack.last().copied() }

    /// Pushes the button auto-repeat flag.
    pub(crate) fn push_button_repeat(&mut self, repeat: bool) { self.button_repeat_stack.push(repeat); }

    /// Pops the button auto-repeat flag. Panics on underflow.
    pub(crate) fn pop_button_repeat(&mut self) {
        assert!(self.button_repeat_stack.pop().is_some(), "pop_button_repeat without push_button_repeat");
    }

    /// Whether held buttons should fire repeatedly.
    pub(crate) fn button_repeat(&self) -> bool { self.button_repeat_stack.last().copied().unwrap_or(false) }

    /// Pushes the keyboard focus participation flag.
    pub(crate) fn push_allow_keyboard_focus(&mut self, allow: bool) { self.allow_keyboard_focus_stack.push(allow); }

    /// Pops the keyboard focus participation flag. Panics on underflow.
    pub(crate) fn pop_allow_keyboard_focus(&mut self) {
        assert!(
            self.allow_keyboard_focus_stack.pop().is_some(),
            "pop_allow_keyboard_focus without push_allow_keyboard_focus"
        );
    }

    /// Whether items currently take part in keyboard focus.
    pub(crate) fn allow_keyboard_focus(&self) -> bool {
        self.allow_keyboard_focus_stack.last().copied().unwrap_or(true)
    }

    /// Content extent measured so far this frame, relative to the origin.
    pub(crate) fn content_size(&self) -> Vec2f {
        vec2f(self.max_pos.x - self.start_pos.x, self.max_pos.y - self.start_pos.y)
    }
}

/// One active column layout inside a window. Offsets are stored normalized
/// (0..=1 across the span) so they survive window resizes; the per-id offset
/// vectors persist across frames in the window.
pub(crate) struct ColumnsSet {
    pub id: Id,
    pub count: usize,
    pub current: usize,
    pub min_x: f32,
    pub max_x: f32,
    pub start_y: f32,
    pub line_max_y: f32,
    /// Normalized borders; `count + 1` entries with `offsets[0] == 0` and
    /// `offsets[count] == 1`.
    pub offsets: Vec<f32>,
}

impl ColumnsSet {
    pub(crate) fn new(id: Id, count: usize, min_x: f32, max_x: f32, start_y: f32, offsets: Option<Vec<f32>>) -> Self {
        assert!(count >= 1, "columns need at least one column");
        let offsets = match offsets {
            Some(offsets) if offsets.len() == count + 1 => offsets,
            _ => (0..=count).map(|i| i as f32 / count as f32).collect(),
        };
        Self { id, count, current: 0, min_x, max_x, start_y, line_max_y: start_y, offsets }
    }

    /// Screen x of border `i`.
    pub(crate) fn offset_x(&self, i: usize) -> f32 { lerp(self.min_x, self.max_x, self.offsets[i]) }

    /// Moves border `i` to screen x, clamped between its neighbors.
    pub(crate) fn set_offset_x(&mut self, i: usize, x: f32) {
        if i == 0 || i >= self.count {
            return;
        }
        let span = self.max_x - self.min_x;
        if span <= 0.0 {
            return;
        }
        let t = ((x - self.min_x) / span).clamp(self.offsets[i - 1] + 0.02, self.offsets[i + 1] - 0.02);
        self.offsets[i] = t;
    }

    /// Screen rectangle of column `i`, vertically unbounded (callers clip).
    pub(crate) fn column_rect(&self, i: usize, height: f32) -> Rectf {
        rectf(self.offset_x(i), self.start_y, self.offset_x(i + 1) - self.offset_x(i), height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Id;

    fn cursor() -> LayoutCursor {
        let mut c = LayoutCursor::new();
        c.reset(vec2f(10.0, 20.0), 200.0);
        c
    }

    // Vec2f has no PartialEq
    fn assert_vec2(v: Vec2f, x: f32, y: f32) {
        assert_eq!((v.x, v.y), (x, y));
    }

    #[test]
    fn items_stack_vertically_with_spacing() {
        let mut c = cursor();
        c.item_size(vec2f(100.0, 20.0), 4.0, 0.0);
        assert_vec2(c.pos, 10.0, 44.0);
        c.item_size(vec2f(60.0, 30.0), 4.0, 0.0);
        assert_vec2(c.pos, 10.0, 78.0);
        assert_vec2(c.content_size(), 100.0, 54.0);
    }

    #[test]
    fn same_line_continues_after_previous_item() {
        let mut c = cursor();
        c.item_size(vec2f(100.0, 20.0), 4.0, 0.0);
        c.same_line(0.0, -1.0, 8.0);
        assert_vec2(c.pos, 118.0, 20.0);
        // the rejoined line keeps the previous line's height
        c.item_size(vec2f(40.0, 10.0), 4.0, 0.0);
        assert_eq!(c.pos.y, 44.0);
    }

    #[test]
    fn same_line_with_explicit_x() {
        let mut c = cursor();
        c.item_size(vec2f(100.0, 20.0), 4.0, 0.0);
        c.same_line(150.0, 0.0, 8.0);
        assert_vec2(c.pos, 160.0, 20.0);
    }

    #[test]
    fn line_grows_to_tallest_item() {
        let mut c = cursor();
        c.item_size(vec2f(50.0, 10.0), 4.0, 0.0);
        c.same_line(0.0, 0.0, 8.0);
        c.item_size(vec2f(50.0, 35.0), 4.0, 0.0);
        assert_eq!(c.pos.y, 20.0 + 35.0 + 4.0);
    }

    #[test]
    fn group_measures_as_one_unit() {
        let mut c = cursor();
        c.begin_group();
        c.item_size(vec2f(80.0, 20.0), 4.0, 0.0);
        c.item_size(vec2f(40.0, 20.0), 4.0, 0.0);
        let bbox = c.end_group();
        assert_vec2(bbox.min(), 10.0, 20.0);
        assert_vec2(bbox.max(), 90.0, 64.0);
        // cursor is back where the group began, ready for item_size(bbox)
        assert_vec2(c.pos, 10.0, 20.0);
    }

    #[test]
    fn culled_items_still_advance_layout() {
        let mut c = cursor();
        let clip = rectf(0.0, 0.0, 200.0, 30.0);
        c.item_size(vec2f(100.0, 20.0), 4.0, 0.0);
        assert!(c.item_add(rectf(10.0, 20.0, 100.0, 20.0), Id::NONE, &clip));
        c.item_size(vec2f(100.0, 20.0), 4.0, 0.0);
        assert!(!c.item_add(rectf(10.0, 44.0, 100.0, 20.0), Id::NONE, &clip));
        assert!(!c.last_item.visible);
        assert_eq!(c.pos.y, 68.0);
    }

    #[test]
    fn item_width_stack_and_fill_from_right() {
        let mut c = cursor();
        assert_eq!(c.calc_item_width(400.0), 200.0);
        c.push_item_width(120.0);
        assert_eq!(c.calc_item_width(400.0), 120.0);
        c.push_item_width(-50.0);
        // cursor at origin: fill to 50px short of the available width
        assert_eq!(c.calc_item_width(400.0), 350.0);
        c.pop_item_width();
        c.pop_item_width();
        assert_eq!(c.calc_item_width(400.0), 200.0);
    }

    #[test]
    #[should_panic]
    fn pop_item_width_underflow_panics() {
        let mut c = cursor();
        c.pop_item_width();
    }

    #[test]
    fn indent_shifts_following_lines() {
        let mut c = cursor();
        c.indent(21.0);
        assert_eq!(c.pos.x, 31.0);
        c.item_size(vec2f(10.0, 10.0), 4.0, 0.0);
        assert_eq!(c.pos.x, 31.0);
        c.unindent(21.0);
        assert_eq!(c.pos.x, 10.0);
    }

    #[test]
    fn column_offsets_are_normalized() {
        let mut set = ColumnsSet::new(Id::NONE, 3, 100.0, 400.0, 0.0, None);
        assert_eq!(set.offset_x(0), 100.0);
        assert_eq!(set.offset_x(3), 400.0);
        set.set_offset_x(1, 160.0);
        assert!((set.offsets[1] - 0.2).abs() < 1e-5);
        // dragging past a neighbor clamps
        set.set_offset_x(1, 390.0);
        assert!(set.offsets[1] < set.offsets[2]);
    }
}
