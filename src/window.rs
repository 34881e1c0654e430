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
use std::collections::HashMap;

use crate::draw_list::DrawList;
use crate::id::Id;
use crate::layout::{ColumnsSet, LayoutCursor};
use crate::style::Style;
use crate::{rectf, vec2f, Rectf, Vec2f};

bitflags::bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    /// Behavior switches for a window.
    pub struct WindowFlags : u32 {
        /// No title bar; the window body starts at the top edge.
        const NO_TITLE_BAR = 1;
        /// The resize grip is disabled.
        const NO_RESIZE = 2;
        /// Dragging the title bar does not move the window.
        const NO_MOVE = 4;
        /// Overflowing content shows no scrollbar (wheel still scrolls).
        const NO_SCROLLBAR = 8;
        /// Double-clicking the title bar does not collapse.
        const NO_COLLAPSE = 16;
        /// The window resizes itself to its content every frame.
        const ALWAYS_AUTO_RESIZE = 32;
        /// Placement is never written to or read from the settings registry.
        const NO_SAVED_SETTINGS = 64;
        /// The window is invisible to hover resolution and never focused.
        const NO_INPUTS = 128;
        /// Appearing does not steal keyboard focus.
        const NO_FOCUS_ON_APPEARING = 256;
        /// Focusing the window does not raise it.
        const NO_BRING_TO_FRONT_ON_FOCUS = 512;
        /// Child region embedded in a parent window.
        const CHILD = 1024;
        /// Transient window dismissed by outside clicks.
        const POPUP = 2048;
        /// Popup that blocks interaction with every non-descendant window.
        const MODAL = 4096;
        /// Hover annotation; drawn above everything, never interactive.
        const TOOLTIP = 8192;
        /// Popup anchored to a combo box field.
        const COMBO = 16384;
    }
}

impl WindowFlags {
    /// Returns `true` for any popup-like flavor (popup, modal, combo).
    pub fn is_popup(&self) -> bool { self.intersects(Self::POPUP | Self::MODAL | Self::COMBO) }
    /// Returns `true` for a modal popup.
    pub fn is_modal(&self) -> bool { self.intersects(Self::MODAL) }
    /// Returns `true` for a tooltip.
    pub fn is_tooltip(&self) -> bool { self.intersects(Self::TOOLTIP) }
    /// Returns `true` for a child region.
    pub fn is_child(&self) -> bool { self.intersects(Self::CHILD) }
    /// Returns `true` when the window ignores all input.
    pub fn is_no_inputs(&self) -> bool { self.intersects(Self::NO_INPUTS) }
}

/// Retained per-window state.
///
/// Windows live in the context's creation-order vector; their index there is
/// stable for the whole session and doubles as the window handle everywhere
/// (z-order is a separate permutation of those indices). Everything inside is
/// either placement state that persists across frames or per-frame scratch
/// reset by `begin_window`.
pub struct Window {
    /// Unique display name; also the settings section and the id seed.
    pub name: String,
    /// Id hashed from the name, seed for every item inside.
    pub id: Id,
    /// Top-left corner in screen coordinates.
    pub pos: Vec2f,
    /// Current size (collapsed windows report the title bar only).
    pub size: Vec2f,
    /// Uncollapsed size.
    pub size_full: Vec2f,
    /// Content extent measured the previous frame.
    pub content_size: Vec2f,
    /// Behavior switches, refreshed every `begin_window`.
    pub flags: WindowFlags,
    /// Scroll offset applied to the content.
    pub scroll: Vec2f,
    /// Scroll range measured the previous frame.
    pub scroll_max: Vec2f,
    /// Collapsed to the title bar.
    pub collapsed: bool,
    /// Submitted this frame.
    pub active: bool,
    /// Submitted the previous frame.
    pub was_active: bool,
    /// First active frame after being inactive (or ever).
    pub appearing: bool,
    /// Hidden this frame (e.g. popup measuring pass); layout runs, drawing is
    /// discarded.
    pub hidden: bool,
    /// Window rectangle clipped by the parent chain; the hoverable region.
    pub outer_clip: Rectf,
    /// True while the window is collapsed or fully clipped; widgets early out.
    pub skip_items: bool,

    /// Creation-order index of the parent, for children and popups.
    pub parent_window: Option<usize>,
    /// Creation-order index of the root of this window's tree (self for roots).
    pub root_window: usize,
    /// Nesting depth in the popup stack, 0 for plain windows.
    pub popup_depth: usize,

    /// Geometry emitted by this window this frame.
    pub draw_list: DrawList,
    /// Layout cursor for this window's content.
    pub cursor: LayoutCursor,

    pub(crate) id_stack: Vec<Id>,
    pub(crate) storage: HashMap<Id, u32>,
    pub(crate) columns_cache: HashMap<Id, Vec<f32>>,
    pub(crate) current_columns: Option<ColumnsSet>,
    pub(crate) begin_count: usize,
    pub(crate) set_window_pos_allow_flags: u32,
    pub(crate) set_window_size_allow_flags: u32,
    pub(crate) set_window_collapsed_allow_flags: u32,
}

impl Window {
    pub(crate) fn new(name: &str, id: Id, index: usize, white_uv: Vec2f) -> Self {
        Self {
            name: name.to_string(),
            id,
            pos: vec2f(60.0, 60.0),
            size: vec2f(0.0, 0.0),
            size_full: vec2f(0.0, 0.0),
            content_size: vec2f(0.0, 0.0),
            flags: WindowFlags::default(),
            scroll: vec2f(0.0, 0.0),
            scroll_max: vec2f(0.0, 0.0),
            collapsed: false,
            active: false,
            was_active: false,
            appearing: false,
            hidden: false,
            outer_clip: Rectf::default(),
            skip_items: false,
            parent_window: None,
            root_window: index,
            popup_depth: 0,
            draw_list: DrawList::new(white_uv),
            cursor: LayoutCursor::new(),
            id_stack: vec![id],
            storage: HashMap::new(),
            columns_cache: HashMap::new(),
            current_columns: None,
            begin_count: 0,
            set_window_pos_allow_flags: !0,
            set_window_size_allow_flags: !0,
            set_window_collapsed_allow_flags: !0,
        }
    }

    /// Current id scope seed (the innermost pushed id, or the window id).
    pub fn id_seed(&self) -> Id { *self.id_stack.last().unwrap_or(&self.id) }

    /// Hashes a string key inside this window's current id scope.
    pub fn get_id(&self, key: &str) -> Id { Id::from_str_seeded(key, self.id_seed()) }

    /// Hashes an integer key inside this window's current id scope.
    pub fn get_id_u32(&self, key: u32) -> Id { Id::from_u32_seeded(key, self.id_seed()) }

    pub(crate) fn push_id(&mut self, id: Id) { self.id_stack.push(id); }

    pub(crate) fn pop_id(&mut self) {
        assert!(self.id_stack.len() > 1, "pop_id without matching push_id");
        self.id_stack.pop();
    }

    /// Height of the title bar given the current style, 0 when hidden.
    pub fn title_bar_height(&self, style: &Style) -> f32 {
        if self.flags.intersects(WindowFlags::NO_TITLE_BAR) {
            0.0
        } else {
            style.font_size + style.frame_padding.y * 2.0
        }
    }

    /// Outer rectangle, including the title bar.
    pub fn rect(&self) -> Rectf { rectf(self.pos.x, self.pos.y, self.size.x, self.size.y) }

    /// Title bar rectangle (zero-height when hidden).
    pub fn title_bar_rect(&self, style: &Style) -> Rectf {
        rectf(self.pos.x, self.pos.y, self.size.x, self.title_bar_height(style))
    }

    /// Content region rectangle: inside padding, below the title bar, left of
    /// the scrollbar.
    pub fn content_rect(&self, style: &Style) -> Rectf {
        let title = self.title_bar_height(style);
        let scrollbar = if self.has_vertical_scrollbar() { style.scrollbar_size } else { 0.0 };
        rectf(
            self.pos.x + style.window_padding.x,
            self.pos.y + title + style.window_padding.y,
            (self.size.x - style.window_padding.x * 2.0 - scrollbar).max(0.0),
            (self.size.y - title - style.window_padding.y * 2.0).max(0.0),
        )
    }

    /// Whether the vertical scrollbar is visible this frame.
    pub fn has_vertical_scrollbar(&self) -> bool {
        self.scroll_max.y > 0.0 && !self.flags.intersects(WindowFlags::NO_SCROLLBAR) && !self.collapsed
    }

    /// Rectangle of the lower-right resize grip.
    pub fn resize_grip_rect(&self, grip_size: f32) -> Rectf {
        rectf(
            self.pos.x + self.size.x - grip_size,
            self.pos.y + self.size.y - grip_size,
            grip_size,
            grip_size,
        )
    }

    /// Root-through-parents walk: `true` when `ancestor_index` is this window
    /// or one of its parents.
    pub(crate) fn is_descendant_of(&self, ancestor_index: usize, own_index: usize, windows: &[Window]) -> bool {
        let mut current = own_index;
        loop {
            if current == ancestor_index {
                return true;
            }
            match windows[current].parent_window {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Id;

    fn window(name: &str, index: usize) -> Window {
        Window::new(name, Id::from_str_seeded(name, Id::NONE), index, vec2f(0.0, 0.0))
    }

    #[test]
    fn scoped_ids_differ_between_windows() {
        let a = window("A", 0);
        let b = window("B", 1);
        assert_ne!(a.get_id("button"), b.get_id("button"));
        assert_eq!(a.get_id("button"), window("A", 5).get_id("button"));
    }

    #[test]
    fn pushed_scope_changes_item_ids() {
        let mut w = window("A", 0);
        let outer = w.get_id("item");
        let scope = w.get_id("row:0");
        w.push_id(scope);
        assert_ne!(outer, w.get_id("item"));
        w.pop_id();
        assert_eq!(outer, w.get_id("item"));
    }

    #[test]
    #[should_panic]
    fn popping_the_window_scope_panics() {
        let mut w = window("A", 0);
        w.pop_id();
    }

    #[test]
    fn title_bar_height_respects_flag() {
        let style = Style::default();
        let mut w = window("A", 0);
        assert!(w.title_bar_height(&style) > 0.0);
        w.flags = WindowFlags::NO_TITLE_BAR;
        assert_eq!(w.title_bar_height(&style), 0.0);
    }

    #[test]
    fn descendant_walk_follows_parents() {
        let mut root = window("root", 0);
        root.root_window = 0;
        let mut popup = window("popup", 1);
        popup.parent_window = Some(0);
        let mut nested = window("nested", 2);
        nested.parent_window = Some(1);
        let other = window("other", 3);
        let windows = vec![root, popup, nested, other];
        assert!(windows[2].is_descendant_of(0, 2, &windows));
        assert!(windows[1].is_descendant_of(0, 1, &windows));
        assert!(!windows[3].is_descendant_of(0, 3, &windows));
    }

    #[test]
    fn flag_helpers() {
        let f = WindowFlags::POPUP | WindowFlags::NO_SAVED_SETTINGS;
        assert!(f.is_popup());
        assert!(!f.is_modal());
        assert!(!f.is_tooltip());
        assert!(WindowFlags::MODAL.is_popup());
    }
}
