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
use std::path::PathBuf;

use rs_math3d::Vec2i;

use crate::atlas::{AtlasHandle, FontId};
use crate::draw_list::{CornerFlags, DrawData, DrawList};
use crate::id::{Id, InteractionState};
use crate::layout::ColumnsSet;
use crate::settings::SettingsRegistry;
use crate::style::{ColorMod, Style, StyleColor, StyleMod, StyleVar};
use crate::widgets::TextEditState;
use crate::window::{Window, WindowFlags};
use crate::{
    calc_typematic_repeat_amount, lerp, rectf, vec2f, Clipboard, Color, Cond, ImeHandler, Input, Key, LocalClipboard,
    MouseButton, NullIme, Rectf, Renderer, Vec2f,
};

fn cond_bit(cond: Cond) -> u32 {
    match cond {
        Cond::Always => 1,
        Cond::Once => 2,
        Cond::FirstUseEver => 4,
        Cond::Appearing => 8,
    }
}

const ONE_SHOT_CONDS: u32 = 2 | 4 | 8;

struct PopupRef {
    popup_id: Id,
    window: Option<usize>,
    parent_window: Option<usize>,
    open_mouse_pos: Vec2f,
}

#[derive(Default)]
struct NextWindowData {
    pos: Option<(Vec2f, Cond)>,
    size: Option<(Vec2f, Cond)>,
    collapsed: Option<(bool, Cond)>,
    focus: bool,
}

/// The engine. One instance owns all retained UI state and drives the
/// per-frame cycle:
///
/// ```text
/// ctx.new_frame();
/// ctx.window("Demo", WindowFlags::default(), |ctx| {
///     ctx.text("hello");
/// });
/// ctx.end_frame();
/// ctx.render(&mut my_renderer);
/// ```
///
/// Everything is single threaded; the context is the explicit capability for
/// every UI call and two of them never share state.
pub struct Context {
    /// Input snapshot and derived per-frame state.
    pub io: Input,
    /// Visual constants; mutate directly or through the push/pop stacks.
    pub style: Style,

    atlas: AtlasHandle,
    font: FontId,

    pub(crate) windows: Vec<Window>,
    window_ids: HashMap<Id, usize>,
    display_order: Vec<usize>,
    window_stack: Vec<usize>,
    render_order: Vec<usize>,

    pub(crate) interaction: InteractionState,
    hovered_window: Option<usize>,
    hovered_root_window: Option<usize>,
    focused_window: Option<usize>,

    popup_stack: Vec<PopupRef>,
    modal_dim_ratio: f32,
    modal_dim_list: DrawList,
    modal_dim_behind: Option<usize>,

    color_stack: Vec<ColorMod>,
    style_var_stack: Vec<StyleMod>,

    settings: SettingsRegistry,
    settings_path: Option<PathBuf>,

    next_window: NextWindowData,

    pub(crate) clipboard: Box<dyn Clipboard>,
    pub(crate) ime: Box<dyn ImeHandler>,
    pub(crate) text_edit: TextEditState,
    pub(crate) want_text_input: bool,

    frame_count: u64,
    frame_open: bool,
}

impl Context {
    /// Creates a context bound to a font/texture service.
    pub fn new(atlas: AtlasHandle) -> Self {
        let white_uv = atlas.white_uv();
        Self {
            io: Input::default(),
            style: Style::default(),
            atlas,
            font: FontId(0),
            windows: Vec::new(),
            window_ids: HashMap::new(),
            display_order: Vec::new(),
            window_stack: Vec::new(),
            render_order: Vec::new(),
            interaction: InteractionState::default(),
            hovered_window: None,
            hovered_root_window: None,
            focused_window: None,
            popup_stack: Vec::new(),
            modal_dim_ratio: 0.0,
            modal_dim_list: DrawList::new(white_uv),
            modal_dim_behind: None,
            color_stack: Vec::new(),
            style_var_stack: Vec::new(),
            settings: SettingsRegistry::new(),
            settings_path: None,
            next_window: NextWindowData::default(),
            clipboard: Box::new(LocalClipboard::default()),
            ime: Box::new(NullIme),
            text_edit: TextEditState::default(),
            want_text_input: false,
            frame_count: 0,
            frame_open: false,
        }
    }

    /// Replaces the clipboard implementation.
    pub fn set_clipboard(&mut self, clipboard: Box<dyn Clipboard>) { self.clipboard = clipboard; }

    /// Replaces the IME handler.
    pub fn set_ime(&mut self, ime: Box<dyn ImeHandler>) { self.ime = ime; }

    /// The atlas the context draws with.
    pub fn atlas(&self) -> &AtlasHandle { &self.atlas }

    /// Font used for all text.
    pub fn font(&self) -> FontId { self.font }

    /// Number of frames begun since creation.
    pub fn frame_count(&self) -> u64 { self.frame_count }

    //
    // settings
    //

    /// Loads persisted window placements from a string.
    pub fn load_settings_from_str(&mut self, data: &str) { self.settings = SettingsRegistry::from_str(data); }

    /// Loads persisted window placements from a file; the same path receives
    /// debounced rewrites from then on. A missing file is fine.
    pub fn load_settings_from_path<P: Into<PathBuf>>(&mut self, path: P) -> std::io::Result<()> {
        let path = path.into();
        self.settings = SettingsRegistry::load_from_path(&path)?;
        self.settings_path = Some(path);
        Ok(())
    }

    /// Serializes the current window placements.
    pub fn save_settings_to_string(&mut self) -> String {
        self.sync_settings();
        self.settings.serialize()
    }

    fn sync_settings(&mut self) {
        let mut updates: Vec<(String, Vec2i, Vec2i, bool)> = Vec::new();
        for w in &self.windows {
            if !w.active && !w.was_active {
                continue;
            }
            let f = w.flags;
            if f.intersects(WindowFlags::NO_SAVED_SETTINGS) || f.is_popup() || f.is_tooltip() || f.is_child() {
                continue;
            }
            updates.push((
                w.name.clone(),
                Vec2i::new(w.pos.x as i32, w.pos.y as i32),
                Vec2i::new(w.size_full.x as i32, w.size_full.y as i32),
                w.collapsed,
            ));
        }
        for (name, pos, size, collapsed) in updates {
            self.settings.set(&name, pos, size, collapsed);
        }
    }

    //
    // frame lifecycle
    //

    /// Opens a frame: normalizes input, resolves the hovered window from the
    /// previous frame's z-order, routes clicks to focus/popup dismissal and
    /// resets the per-frame interaction state.
    ///
    /// Panics when the previous frame was not closed with `end_frame`.
    pub fn new_frame(&mut self) {
        assert!(!self.frame_open, "new_frame called while a frame is already open");
        assert!(self.color_stack.is_empty(), "push_style_color left unpopped across frames");
        assert!(self.style_var_stack.is_empty(), "push_style_var left unpopped across frames");
        self.frame_open = true;
        self.frame_count += 1;

        self.io.prelude();
        self.interaction.begin_frame();
        self.want_text_input = false;

        let active_window = self.interaction.active_id_window;
        for w in &mut self.windows {
            // Capture dies with the window that granted it.
            if active_window.is_some() && w.id == active_window && !w.active {
                self.interaction.clear_active();
            }
            w.was_active = w.active;
            w.active = false;
            w.hidden = false;
            w.begin_count = 0;
        }

        self.update_hovered_window();
        self.update_focus_and_popups();
        self.update_modal_dim();
    }

    fn update_hovered_window(&mut self) {
        self.hovered_window = None;
        self.hovered_root_window = None;
        let mouse = self.io.mouse_pos;
        if mouse.x < -f32::MAX * 0.5 {
            return;
        }
        let pad = self.style.touch_extra_padding;
        for &i in self.display_order.iter().rev() {
            let w = &self.windows[i];
            if !w.was_active || w.flags.is_no_inputs() || w.flags.is_tooltip() {
                continue;
            }
            if w.outer_clip.expand(pad).contains(mouse) {
                self.hovered_window = Some(i);
                self.hovered_root_window = Some(w.root_window);
                break;
            }
        }
        if let Some(modal_root) = self.topmost_modal_root() {
            if let Some(h) = self.hovered_window {
                if !self.windows[h].is_descendant_of(modal_root, h, &self.windows) {
                    self.hovered_window = None;
                    self.hovered_root_window = None;
                }
            }
        }
    }

    fn topmost_modal_root(&self) -> Option<usize> {
        self.popup_stack
            .iter()
            .rev()
            .find_map(|p| p.window.filter(|&w| self.windows[w].flags.is_modal() && self.windows[w].was_active))
    }

    fn update_focus_and_popups(&mut self) {
        if self.io.is_mouse_clicked(MouseButton::Left) {
            match self.hovered_root_window {
                Some(root) => {
                    match self.popup_level_of(root) {
                        // clicking inside a popup keeps it and its ancestors
                        Some(level) => self.close_popups_over(level + 1),
                        None => self.close_popups_over(0),
                    }
                    self.focus_window(root);
                }
                None => {
                    self.close_popups_over(0);
                    self.focused_window = None;
                }
            }
        }
        if self.io.is_key_pressed(Key::Escape, false) && !self.popup_stack.is_empty() {
            let top = self.popup_stack.len() - 1;
            self.close_popups_over(top);
        }
    }

    fn update_modal_dim(&mut self) {
        let target = if self.topmost_modal_root().is_some() { 1.0 } else { 0.0 };
        let step = self.io.delta_time * 6.0;
        self.modal_dim_ratio = if target > self.modal_dim_ratio {
            (self.modal_dim_ratio + step).min(1.0)
        } else {
            (self.modal_dim_ratio - step).max(0.0)
        };
    }

    /// Closes the frame: verifies structural balance, sweeps active-id
    /// liveness, re-sorts the z-order (children after roots, popup layers on
    /// top), finalizes draw lists and ticks the settings debounce.
    ///
    /// Panics on an unbalanced window, style or id stack — that is a bug in
    /// the calling code, not a recoverable state.
    pub fn end_frame(&mut self) {
        assert!(self.frame_open, "end_frame called without new_frame");
        assert!(
            self.window_stack.is_empty(),
            "a window was left open at end_frame (missing end_window)"
        );
        assert!(self.color_stack.is_empty(), "unbalanced push_style_color/pop_style_color");
        assert!(self.style_var_stack.is_empty(), "unbalanced push_style_var/pop_style_var");

        self.interaction.end_frame();

        // popups whose window stopped being submitted die with it
        let windows = &self.windows;
        self.popup_stack.retain(|p| match p.window {
            Some(w) => windows[w].active,
            None => true,
        });

        self.sort_display_order();
        self.render_order =
            self.display_order.iter().copied().filter(|&i| self.windows[i].active && !self.windows[i].hidden).collect();
        for &i in &self.render_order.clone() {
            let dl = &mut self.windows[i].draw_list;
            dl.trim_trailing_empty_cmd();
            dl.validate();
        }

        self.build_modal_dim_list();

        self.sync_settings();
        if self.settings.tick(self.io.delta_time, self.io.settings_save_rate) {
            if let Some(path) = self.settings_path.clone() {
                if let Err(e) = self.settings.save_to_path(&path) {
                    log::warn!("settings: save to {path:?} failed: {e}");
                }
            }
        }

        self.io.want_capture_mouse = self.hovered_window.is_some()
            || self.interaction.active_id.is_some()
            || !self.popup_stack.is_empty();
        self.io.want_capture_keyboard = self.want_text_input;

        self.io.epilogue();
        self.frame_open = false;
    }

    fn sort_display_order(&mut self) {
        let order = std::mem::take(&mut self.display_order);
        // Popup and modal roots rank by their position in the popup stack, so
        // a popup opened from inside a modal stays above that modal. Tooltips
        // ride above everything.
        let layer = |windows: &[Window], i: usize| -> (u32, usize) {
            let w = &windows[i];
            if w.flags.is_tooltip() {
                (2, 0)
            } else if w.flags.is_modal() || w.flags.is_popup() {
                (1, w.popup_depth)
            } else {
                (0, 0)
            }
        };
        let mut roots: Vec<usize> = order.iter().copied().filter(|&i| self.windows[i].root_window == i).collect();
        roots.sort_by_key(|&i| layer(&self.windows, i));
        let mut new_order = Vec::with_capacity(order.len());
        for &r in &roots {
            new_order.push(r);
            for &i in &order {
                if i != r && self.windows[i].root_window == r {
                    new_order.push(i);
                }
            }
        }
        for &i in &order {
            if !new_order.contains(&i) {
                new_order.push(i);
            }
        }
        self.display_order = new_order;
    }

    fn build_modal_dim_list(&mut self) {
        self.modal_dim_behind = self.topmost_modal_root();
        let display = self.display_rect();
        let texture = self.atlas.texture();
        let white_uv = self.atlas.white_uv();
        self.modal_dim_list.reset(display, texture, white_uv);
        if self.modal_dim_ratio > 0.0 {
            let col = self.style.color_unscaled(StyleColor::ModalWindowDim).mul_alpha(self.modal_dim_ratio * self.style.alpha);
            self.modal_dim_list.add_rect_filled(display, col, 0.0, CornerFlags::ALL);
        }
        self.modal_dim_list.trim_trailing_empty_cmd();
    }

    /// Hands the frame's geometry to the renderer, back to front, with the
    /// modal dim layer spliced in under the topmost modal.
    pub fn render(&mut self, renderer: &mut dyn Renderer) {
        assert!(!self.frame_open, "render must be called after end_frame");
        let display = vec2f(self.io.display_size.width as f32, self.io.display_size.height as f32);
        let dim_active = self.modal_dim_ratio > 0.0;
        let mut dim_inserted = !dim_active;
        let mut lists: Vec<&DrawList> = Vec::with_capacity(self.render_order.len() + 1);
        for &i in &self.render_order {
            if !dim_inserted && Some(self.windows[i].root_window) == self.modal_dim_behind {
                lists.push(&self.modal_dim_list);
                dim_inserted = true;
            }
            lists.push(&self.windows[i].draw_list);
        }
        if !dim_inserted {
            lists.push(&self.modal_dim_list);
        }
        renderer.render(&DrawData::new(lists, display));
    }

    fn display_rect(&self) -> Rectf {
        rectf(0.0, 0.0, self.io.display_size.width as f32, self.io.display_size.height as f32)
    }

    //
    // windows
    //

    /// Requests the position of the next window begun, subject to `cond`.
    pub fn set_next_window_pos(&mut self, pos: Vec2f, cond: Cond) { self.next_window.pos = Some((pos, cond)); }

    /// Requests the size of the next window begun, subject to `cond`.
    pub fn set_next_window_size(&mut self, size: Vec2f, cond: Cond) { self.next_window.size = Some((size, cond)); }

    /// Requests the collapsed state of the next window begun, subject to `cond`.
    pub fn set_next_window_collapsed(&mut self, collapsed: bool, cond: Cond) {
        self.next_window.collapsed = Some((collapsed, cond));
    }

    /// Focuses the next window begun.
    pub fn set_next_window_focus(&mut self) { self.next_window.focus = true; }

    fn create_window(&mut self, name: &str, id: Id, flags: WindowFlags) -> usize {
        let index = self.windows.len();
        let mut w = Window::new(name, id, index, self.atlas.white_uv());
        if !flags.intersects(WindowFlags::NO_SAVED_SETTINGS) {
            if let Some(s) = self.settings.get(name) {
                w.pos = vec2f(s.pos.x as f32, s.pos.y as f32);
                w.size_full = vec2f(s.size.x as f32, s.size.y as f32);
                w.collapsed = s.collapsed;
                w.set_window_pos_allow_flags &= !cond_bit(Cond::FirstUseEver);
                w.set_window_size_allow_flags &= !cond_bit(Cond::FirstUseEver);
                w.set_window_collapsed_allow_flags &= !cond_bit(Cond::FirstUseEver);
            } else {
                // cascade fresh windows so they don't pile up
                let n = self.windows.len() as f32;
                w.pos = vec2f(60.0 + n * 20.0, 60.0 + n * 20.0);
            }
        }
        self.windows.push(w);
        self.window_ids.insert(id, index);
        index
    }

    fn set_window_pos_by_index(&mut self, index: usize, pos: Vec2f, cond: Cond) {
        let w = &mut self.windows[index];
        if w.set_window_pos_allow_flags & cond_bit(cond) == 0 {
            return;
        }
        w.set_window_pos_allow_flags &= !ONE_SHOT_CONDS;
        w.pos = pos;
    }

    fn set_window_size_by_index(&mut self, index: usize, size: Vec2f, cond: Cond) {
        let w = &mut self.windows[index];
        if w.set_window_size_allow_flags & cond_bit(cond) == 0 {
            return;
        }
        w.set_window_size_allow_flags &= !ONE_SHOT_CONDS;
        w.size_full = size;
    }

    fn set_window_collapsed_by_index(&mut self, index: usize, collapsed: bool, cond: Cond) {
        let w = &mut self.windows[index];
        if w.set_window_collapsed_allow_flags & cond_bit(cond) == 0 {
            return;
        }
        w.set_window_collapsed_allow_flags &= !ONE_SHOT_CONDS;
        w.collapsed = collapsed;
    }

    /// Gives a window keyboard focus and raises its root, unless it opted out.
    pub(crate) fn focus_window(&mut self, index: usize) {
        let root = self.windows[index].root_window;
        self.focused_window = Some(root);
        if !self.windows[root].flags.intersects(WindowFlags::NO_BRING_TO_FRONT_ON_FOCUS) {
            self.bring_to_front(root);
        }
    }

    fn bring_to_front(&mut self, index: usize) {
        if self.display_order.last() == Some(&index) {
            return;
        }
        if let Some(pos) = self.display_order.iter().position(|&i| i == index) {
            self.display_order.remove(pos);
            self.display_order.push(index);
        }
    }

    /// Focuses a window by name; does nothing for an unknown name.
    pub fn focus_window_by_name(&mut self, name: &str) {
        let id = Id::from_str_seeded(name, Id::NONE);
        if let Some(&index) = self.window_ids.get(&id) {
            self.focus_window(index);
        }
    }

    /// Whether the named window's root currently has focus.
    pub fn is_window_focused(&self, name: &str) -> bool {
        let id = Id::from_str_seeded(name, Id::NONE);
        match self.window_ids.get(&id) {
            Some(&index) => self.focused_window == Some(self.windows[index].root_window),
            None => false,
        }
    }

    /// Outer rectangle of a window, if it exists.
    pub fn window_rect(&self, name: &str) -> Option<Rectf> {
        let id = Id::from_str_seeded(name, Id::NONE);
        self.window_ids.get(&id).map(|&i| self.windows[i].rect())
    }

    /// Window names in back-to-front draw order (active windows only).
    pub fn window_order(&self) -> Vec<&str> {
        self.display_order
            .iter()
            .filter(|&&i| self.windows[i].active || self.windows[i].was_active)
            .map(|&i| self.windows[i].name.as_str())
            .collect()
    }

    /// Begins a window; returns `true` when its contents should be submitted
    /// (`false` while collapsed or hidden). `end_window` must be called
    /// regardless. Prefer [`window`](Self::window) for structural safety.
    pub fn begin_window(&mut self, name: &str, flags: WindowFlags) -> bool {
        assert!(self.frame_open, "begin_window called outside a frame");
        let id = Id::from_str_seeded(name, Id::NONE);
        let index = match self.window_ids.get(&id) {
            Some(&i) => i,
            None => self.create_window(name, id, flags),
        };

        let parent = self.window_stack.last().copied();
        let appearing = {
            let is_linked = flags.is_child() || flags.is_popup() || flags.is_tooltip();
            let root = if flags.is_child() {
                parent.map(|p| self.windows[p].root_window).unwrap_or(index)
            } else {
                index
            };
            let w = &mut self.windows[index];
            assert!(w.begin_count == 0, "window '{}' begun twice in one frame", w.name);
            w.flags = flags;
            w.parent_window = if is_linked { parent } else { None };
            w.root_window = root;
            w.active = true;
            w.appearing = !w.was_active;
            w.begin_count += 1;
            w.appearing
        };
        if appearing {
            let w = &mut self.windows[index];
            w.set_window_pos_allow_flags |= cond_bit(Cond::Appearing);
            w.set_window_size_allow_flags |= cond_bit(Cond::Appearing);
            w.set_window_collapsed_allow_flags |= cond_bit(Cond::Appearing);
        }

        if !self.display_order.contains(&index) {
            self.display_order.push(index);
        }

        let next = std::mem::take(&mut self.next_window);
        if let Some((pos, cond)) = next.pos {
            self.set_window_pos_by_index(index, pos, cond);
        }
        if let Some((size, cond)) = next.size {
            self.set_window_size_by_index(index, size, cond);
        }
        if let Some((collapsed, cond)) = next.collapsed {
            self.set_window_collapsed_by_index(index, collapsed, cond);
        }

        let style = self.style;
        {
            let w = &mut self.windows[index];
            if w.size_full.x <= 0.0 || w.size_full.y <= 0.0 {
                w.size_full = if flags.intersects(WindowFlags::ALWAYS_AUTO_RESIZE) {
                    style.window_min_size
                } else {
                    vec2f(400.0, 300.0)
                };
            }
            if flags.intersects(WindowFlags::ALWAYS_AUTO_RESIZE) && w.content_size.y > 0.0 {
                let title = w.title_bar_height(&style);
                w.size_full = vec2f(
                    (w.content_size.x + style.window_padding.x * 2.0).max(style.window_min_size.x),
                    (w.content_size.y + style.window_padding.y * 2.0 + title).max(style.window_min_size.y),
                );
            }
            w.size = if w.collapsed { vec2f(w.size_full.x, w.title_bar_height(&style)) } else { w.size_full };
        }

        if appearing && next.focus {
            self.focus_window(index);
        } else if appearing
            && !flags.intersects(WindowFlags::NO_FOCUS_ON_APPEARING)
            && !flags.is_tooltip()
            && !flags.is_no_inputs()
        {
            self.focus_window(index);
        } else if next.focus {
            self.focus_window(index);
        }

        // double-click on the title collapses
        let title_rect = self.windows[index].title_bar_rect(&style);
        if !flags.intersects(WindowFlags::NO_TITLE_BAR)
            && !flags.intersects(WindowFlags::NO_COLLAPSE)
            && self.hovered_window == Some(index)
            && title_rect.contains(self.io.mouse_pos)
            && self.io.is_mouse_double_clicked(MouseButton::Left)
        {
            let w = &mut self.windows[index];
            w.collapsed = !w.collapsed;
            w.size = if w.collapsed { vec2f(w.size_full.x, w.title_bar_height(&style)) } else { w.size_full };
        }

        self.window_move_behavior(index, title_rect, flags, id);
        self.window_resize_behavior(index, flags, id, &style);

        // wheel scroll
        if self.hovered_window == Some(index) && self.io.mouse_wheel != 0.0 && !self.windows[index].collapsed {
            let max = self.windows[index].scroll_max.y;
            if max > 0.0 {
                let wheel = self.io.mouse_wheel;
                let w = &mut self.windows[index];
                w.scroll.y = (w.scroll.y - wheel * style.font_size * 3.0).clamp(0.0, max);
            }
        }

        self.draw_window_decorations(index, flags, &style);

        // a child poking out of its parent is not hoverable there
        let outer_clip = {
            let rect = self.windows[index].rect();
            match parent {
                Some(p) if flags.is_child() => rect.intersect(&self.windows[p].draw_list.current_clip_rect()),
                _ => rect,
            }
        };

        let content = self.windows[index].content_rect(&style);
        let collapsed = self.windows[index].collapsed;
        let hidden = self.windows[index].hidden;
        {
            let scroll = self.windows[index].scroll;
            let w = &mut self.windows[index];
            w.outer_clip = outer_clip;
            w.draw_list.push_clip_rect(content, true);
            w.skip_items = collapsed || hidden;
            w.cursor.reset(vec2f(content.x - scroll.x, content.y - scroll.y), (content.width * 0.65).max(1.0));
        }

        self.window_stack.push(index);
        !self.windows[index].skip_items
    }

    fn window_move_behavior(&mut self, index: usize, title_rect: Rectf, flags: WindowFlags, window_id: Id) {
        if flags.intersects(WindowFlags::NO_TITLE_BAR) {
            return;
        }
        let move_id = self.windows[index].get_id("#MOVE");
        self.interaction.keep_alive(move_id);
        if self.interaction.active_id == move_id {
            if self.io.is_mouse_down(MouseButton::Left) {
                let delta = self.io.mouse_delta();
                let w = &mut self.windows[index];
                w.pos = w.pos + delta;
            } else {
                self.interaction.clear_active();
            }
        } else if !flags.intersects(WindowFlags::NO_MOVE)
            && self.hovered_window == Some(index)
            && title_rect.contains(self.io.mouse_pos)
            && self.io.is_mouse_clicked(MouseButton::Left)
        {
            self.interaction.set_active(move_id, window_id);
        }
    }

    fn window_resize_behavior(&mut self, index: usize, flags: WindowFlags, window_id: Id, style: &Style) {
        if flags.intersects(WindowFlags::NO_RESIZE | WindowFlags::ALWAYS_AUTO_RESIZE) || self.windows[index].collapsed {
            return;
        }
        let resize_id = self.windows[index].get_id("#RESIZE");
        self.interaction.keep_alive(resize_id);
        if self.interaction.active_id == resize_id {
            if self.io.is_mouse_down(MouseButton::Left) {
                let delta = self.io.mouse_delta();
                let w = &mut self.windows[index];
                w.size_full = vec2f(
                    (w.size_full.x + delta.x).max(style.window_min_size.x),
                    (w.size_full.y + delta.y).max(style.window_min_size.y),
                );
                w.size = w.size_full;
            } else {
                self.interaction.clear_active();
            }
        } else {
            let grip = self.windows[index].resize_grip_rect(style.font_size);
            if self.hovered_window == Some(index)
                && grip.contains(self.io.mouse_pos)
                && self.io.is_mouse_clicked(MouseButton::Left)
            {
                self.interaction.set_active(resize_id, window_id);
            }
        }
    }

    fn draw_window_decorations(&mut self, index: usize, flags: WindowFlags, style: &Style) {
        let display = self.display_rect();
        let texture = self.atlas.texture();
        let white_uv = self.atlas.white_uv();
        let atlas = self.atlas.clone();
        let font = self.font;
        let focused_root = self.focused_window;
        let hidden = self.windows[index].hidden;

        {
            let w = &mut self.windows[index];
            w.draw_list.anti_aliased_lines = style.anti_aliased_lines;
            w.draw_list.anti_aliased_fill = style.anti_aliased_fill;
            w.draw_list.reset(display, texture, white_uv);
        }
        if hidden {
            return;
        }

        let wrect = self.windows[index].rect();
        let title_rect = self.windows[index].title_bar_rect(style);
        let collapsed = self.windows[index].collapsed;
        let rounding = style.window_rounding;
        let root = self.windows[index].root_window;
        let title_col = if collapsed {
            style.get_color(StyleColor::TitleBgCollapsed)
        } else if focused_root == Some(root) {
            style.get_color(StyleColor::TitleBgActive)
        } else {
            style.get_color(StyleColor::TitleBg)
        };

        let name = self.windows[index].name.clone();
        let w = &mut self.windows[index];
        if !collapsed {
            let bg = if flags.is_popup() || flags.is_tooltip() {
                StyleColor::PopupBg
            } else {
                StyleColor::WindowBg
            };
            w.draw_list.add_rect_filled(wrect, style.get_color(bg), rounding, CornerFlags::ALL);
        }
        if !flags.intersects(WindowFlags::NO_TITLE_BAR) {
            let corners = if collapsed { CornerFlags::ALL } else { CornerFlags::TOP };
            w.draw_list.add_rect_filled(title_rect, title_col, rounding, corners);
            let text_pos = vec2f(title_rect.x + style.frame_padding.x * 2.0, title_rect.y + style.frame_padding.y);
            let clip = title_rect.expand(vec2f(-style.frame_padding.x, 0.0));
            w.draw_list.add_text(
                &atlas,
                font,
                style.font_size,
                text_pos,
                style.get_color(StyleColor::Text),
                trim_label(&name),
                0.0,
                Some(clip),
            );
        }
        if !collapsed && style.window_border_size > 0.0 {
            w.draw_list.add_rect(wrect, style.get_color(StyleColor::Border), rounding, style.window_border_size);
        }
        if !collapsed && !flags.intersects(WindowFlags::NO_RESIZE | WindowFlags::ALWAYS_AUTO_RESIZE) {
            let grip = w.resize_grip_rect(style.font_size);
            w.draw_list.add_triangle_filled(
                vec2f(grip.x + grip.width, grip.y),
                grip.max(),
                vec2f(grip.x, grip.y + grip.height),
                style.get_color(StyleColor::Button),
            );
        }
        if !collapsed && self.windows[index].has_vertical_scrollbar() {
            self.scrollbar_y(index, style);
        }
    }

    fn scrollbar_y(&mut self, index: usize, style: &Style) {
        let w = &self.windows[index];
        let title = w.title_bar_height(style);
        let track = rectf(
            w.pos.x + w.size.x - style.scrollbar_size,
            w.pos.y + title,
            style.scrollbar_size,
            w.size.y - title,
        );
        let visible = track.height;
        let content = visible + w.scroll_max.y;
        let grab_h = (track.height * visible / content).max(style.grab_min_size);
        let scroll_ratio = if w.scroll_max.y > 0.0 { w.scroll.y / w.scroll_max.y } else { 0.0 };
        let grab_y = track.y + scroll_ratio * (track.height - grab_h);
        let grab = rectf(track.x + 2.0, grab_y, track.width - 4.0, grab_h);
        let scrollbar_id = w.get_id("#SCROLLY");
        let window_id = w.id;
        let scroll_max = w.scroll_max.y;

        self.interaction.keep_alive(scrollbar_id);
        let mut grab_active = false;
        if self.interaction.active_id == scrollbar_id {
            if self.io.is_mouse_down(MouseButton::Left) {
                grab_active = true;
                let t = ((self.io.mouse_pos.y - track.y - grab_h * 0.5) / (track.height - grab_h)).clamp(0.0, 1.0);
                self.windows[index].scroll.y = t * scroll_max;
            } else {
                self.interaction.clear_active();
            }
        } else if self.hovered_window == Some(index)
            && track.contains(self.io.mouse_pos)
            && self.io.is_mouse_clicked(MouseButton::Left)
        {
            self.interaction.set_active(scrollbar_id, window_id);
            grab_active = true;
        }

        let grab_col = if grab_active {
            style.get_color(StyleColor::ScrollbarGrabActive)
        } else {
            style.get_color(StyleColor::ScrollbarGrab)
        };
        let dl = &mut self.windows[index].draw_list;
        dl.add_rect_filled(track, style.get_color(StyleColor::ScrollbarBg), 0.0, CornerFlags::ALL);
        dl.add_rect_filled(grab, grab_col, style.scrollbar_rounding, CornerFlags::ALL);
    }

    /// Ends the current window; verifies the id and clip stacks balanced and
    /// measures the content extent for next frame's scrolling and auto-resize.
    pub fn end_window(&mut self) {
        assert!(self.frame_open, "end_window called outside a frame");
        let index = self.window_stack.pop().expect("end_window without a matching begin_window");
        assert!(
            self.windows[index].current_columns.is_none(),
            "end_window called with a column set still open"
        );
        let style = self.style;
        let w = &mut self.windows[index];
        assert_eq!(w.id_stack.len(), 1, "unbalanced push_id/pop_id in window '{}'", w.name);
        w.content_size = w.cursor.content_size();
        w.draw_list.pop_clip_rect();
        assert_eq!(w.draw_list.clip_depth(), 1, "unbalanced clip rect stack in window '{}'", w.name);
        let visible = w.content_rect(&style).height;
        w.scroll_max = vec2f(0.0, (w.content_size.y - visible).max(0.0));
        w.scroll.y = w.scroll.y.clamp(0.0, w.scroll_max.y);
    }

    /// Structurally safe window scope: `f` runs only while the window is open
    /// and the window is always ended.
    pub fn window<R>(&mut self, name: &str, flags: WindowFlags, f: impl FnOnce(&mut Self) -> R) -> Option<R> {
        let open = self.begin_window(name, flags);
        let result = if open { Some(f(self)) } else { None };
        self.end_window();
        result
    }

    //
    // popups
    //

    /// Marks a popup (identified in the current window's scope) as open at the
    /// current mouse position. Idempotent while already open.
    pub fn open_popup(&mut self, str_id: &str) {
        let popup_id = self.current_window().get_id(str_id);
        if self.popup_stack.iter().any(|p| p.popup_id == popup_id) {
            return;
        }
        let parent = self.current_window_index();
        self.popup_stack.push(PopupRef {
            popup_id,
            window: None,
            parent_window: Some(parent),
            open_mouse_pos: self.io.mouse_pos,
        });
    }

    /// Whether the popup is in the open stack.
    pub fn is_popup_open(&self, str_id: &str) -> bool {
        let popup_id = self.current_window().get_id(str_id);
        self.popup_stack.iter().any(|p| p.popup_id == popup_id)
    }

    /// Begins an open popup; `false` means closed (submit nothing, do not call
    /// `end_popup`).
    pub fn begin_popup(&mut self, str_id: &str) -> bool {
        let popup_id = self.current_window().get_id(str_id);
        let Some(level) = self.popup_stack.iter().position(|p| p.popup_id == popup_id) else {
            return false;
        };
        let pos = self.popup_stack[level].open_mouse_pos;
        let name = format!("##popup_{:016x}", popup_id.raw());
        self.set_next_window_pos(pos, Cond::Appearing);
        let flags = WindowFlags::POPUP
            | WindowFlags::NO_TITLE_BAR
            | WindowFlags::NO_RESIZE
            | WindowFlags::NO_MOVE
            | WindowFlags::NO_SAVED_SETTINGS
            | WindowFlags::ALWAYS_AUTO_RESIZE;
        self.begin_window(&name, flags);
        let index = self.current_window_index();
        self.popup_stack[level].window = Some(index);
        self.windows[index].popup_depth = level + 1;
        true
    }

    /// Begins an open modal; like [`begin_popup`](Self::begin_popup) but with
    /// a title bar, centered on first appearance, and blocking every window
    /// outside its tree.
    pub fn begin_popup_modal(&mut self, name: &str) -> bool {
        let popup_id = self.current_window().get_id(name);
        let Some(level) = self.popup_stack.iter().position(|p| p.popup_id == popup_id) else {
            return false;
        };
        let display = self.display_rect();
        self.set_next_window_pos(vec2f(display.width * 0.5 - 140.0, display.height * 0.5 - 80.0), Cond::Appearing);
        let flags = WindowFlags::MODAL
            | WindowFlags::POPUP
            | WindowFlags::NO_RESIZE
            | WindowFlags::NO_COLLAPSE
            | WindowFlags::NO_SAVED_SETTINGS
            | WindowFlags::ALWAYS_AUTO_RESIZE;
        self.begin_window(name, flags);
        let index = self.current_window_index();
        self.popup_stack[level].window = Some(index);
        self.windows[index].popup_depth = level + 1;
        true
    }

    /// Ends a popup begun with `begin_popup`/`begin_popup_modal`.
    pub fn end_popup(&mut self) { self.end_window(); }

    /// Closes the popup the current window belongs to, and everything above it.
    pub fn close_current_popup(&mut self) {
        let current = self.current_window_index();
        if let Some(level) = self.popup_stack.iter().position(|p| p.window == Some(current)) {
            self.close_popups_over(level);
        }
    }

    fn popup_level_of(&self, window_index: usize) -> Option<usize> {
        self.popup_stack.iter().position(|p| p.window == Some(window_index))
    }

    fn close_popups_over(&mut self, level: usize) {
        while self.popup_stack.len() > level {
            let p = self.popup_stack.pop();
            if let Some(parent) = p.and_then(|p| p.parent_window) {
                self.focused_window = Some(self.windows[parent].root_window);
            }
        }
    }

    /// Begins a tooltip window at the mouse cursor. Always succeeds; close
    /// with [`end_tooltip`](Self::end_tooltip).
    pub fn begin_tooltip(&mut self) {
        let pos = self.io.mouse_pos + vec2f(16.0, 8.0);
        self.set_next_window_pos(pos, Cond::Always);
        let flags = WindowFlags::TOOLTIP
            | WindowFlags::NO_TITLE_BAR
            | WindowFlags::NO_INPUTS
            | WindowFlags::NO_FOCUS_ON_APPEARING
            | WindowFlags::NO_SAVED_SETTINGS
            | WindowFlags::ALWAYS_AUTO_RESIZE;
        self.begin_window("##tooltip", flags);
    }

    /// Ends the tooltip window.
    pub fn end_tooltip(&mut self) { self.end_window(); }

    //
    // ids and per-item state
    //

    pub(crate) fn current_window_index(&self) -> usize {
        *self.window_stack.last().expect("no window is currently begun")
    }

    pub(crate) fn current_window(&self) -> &Window { &self.windows[self.current_window_index()] }

    pub(crate) fn current_window_mut(&mut self) -> &mut Window {
        let index = self.current_window_index();
        &mut self.windows[index]
    }

    /// Hashes a key in the current window's id scope.
    pub fn get_id(&self, key: &str) -> Id { self.current_window().get_id(key) }

    /// Opens an id scope (e.g. around loop bodies reusing the same labels).
    pub fn push_id(&mut self, key: &str) {
        let id = self.current_window().get_id(key);
        self.current_window_mut().push_id(id);
    }

    /// Opens an id scope keyed by a loop index.
    pub fn push_id_u32(&mut self, key: u32) {
        let id = self.current_window().get_id_u32(key);
        self.current_window_mut().push_id(id);
    }

    /// Closes the innermost id scope. Panics when only the window scope is left.
    pub fn pop_id(&mut self) { self.current_window_mut().pop_id(); }

    /// Structurally balanced id scope.
    pub fn with_id<R>(&mut self, key: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.push_id(key);
        let result = f(self);
        self.pop_id();
        result
    }

    /// Per-window `u32` storage for widget open/selection state.
    pub(crate) fn storage_get(&self, id: Id) -> u32 {
        self.current_window().storage.get(&id).copied().unwrap_or(0)
    }

    pub(crate) fn storage_set(&mut self, id: Id, value: u32) {
        self.current_window_mut().storage.insert(id, value);
    }

    //
    // interaction
    //

    /// Whether `rect` can be hovered for `id` right now: the owning window is
    /// the hovered window, no other widget holds capture, and the pointer is
    /// inside `rect` clipped to the current scissor (expanded by the touch
    /// padding). Registers the hover when it succeeds.
    pub(crate) fn item_hoverable(&mut self, rect: Rectf, id: Id) -> bool {
        let index = self.current_window_index();
        if self.hovered_window != Some(index) {
            return false;
        }
        if self.interaction.active_id.is_some() && self.interaction.active_id != id {
            return false;
        }
        let clip = self.windows[index].draw_list.current_clip_rect();
        let r = rect.expand(self.style.touch_extra_padding).intersect(&clip);
        if !r.contains(self.io.mouse_pos) {
            return false;
        }
        self.interaction.set_hovered(id);
        true
    }

    /// Canonical press/hold resolution shared by all button-like widgets.
    /// Returns `(hovered, held, pressed)`; `pressed` fires on release over the
    /// widget, or repeatedly while held when `repeat` is set.
    pub(crate) fn button_behavior(&mut self, rect: Rectf, id: Id, repeat: bool) -> (bool, bool, bool) {
        let window_id = self.current_window().id;
        self.interaction.keep_alive(id);
        let hovered = self.item_hoverable(rect, id);
        let mut pressed = false;

        if hovered && self.io.is_mouse_clicked(MouseButton::Left) {
            self.interaction.set_active(id, window_id);
            pressed = repeat;
        }
        if hovered && repeat && self.interaction.active_id == id {
            let t = self.io.mouse_down_duration[MouseButton::Left as usize];
            if t > 0.0 {
                let pulses = calc_typematic_repeat_amount(
                    t,
                    t - self.io.delta_time,
                    self.io.key_repeat_delay,
                    self.io.key_repeat_rate,
                );
                if pulses > 0 {
                    pressed = true;
                }
            }
        }

        let mut held = false;
        if self.interaction.active_id == id {
            if self.io.is_mouse_down(MouseButton::Left) {
                held = true;
            } else {
                if hovered && !repeat {
                    pressed = true;
                }
                self.interaction.clear_active();
            }
        }
        (hovered, held, pressed)
    }

    /// Whether the last submitted item is hovered.
    pub fn is_item_hovered(&self) -> bool {
        let w = self.current_window();
        w.cursor.last_item.id.is_some() && self.interaction.hovered_id == w.cursor.last_item.id
    }

    /// Whether the last submitted item holds capture.
    pub fn is_item_active(&self) -> bool {
        let w = self.current_window();
        w.cursor.last_item.id.is_some() && self.interaction.active_id == w.cursor.last_item.id
    }

    /// Rectangle of the last submitted item.
    pub fn last_item_rect(&self) -> Rectf { self.current_window().cursor.last_item.rect }

    //
    // layout pass-throughs
    //

    /// Reserves a layout cell and advances the cursor.
    pub(crate) fn item_size(&mut self, size: Vec2f, text_baseline_offset: f32) {
        let spacing_y = self.style.item_spacing.y;
        self.current_window_mut().cursor.item_size(size, spacing_y, text_baseline_offset);
    }

    /// Registers the last item and culls it against the current clip.
    pub(crate) fn item_add(&mut self, rect: Rectf, id: Id) -> bool {
        let index = self.current_window_index();
        let clip = self.windows[index].draw_list.current_clip_rect();
        self.windows[index].cursor.item_add(rect, id, &clip)
    }

    /// Continues the next item on the same line. `pos_x == 0` means "after the
    /// previous item"; `spacing < 0` uses the default item spacing.
    pub fn same_line(&mut self, pos_x: f32, spacing: f32) {
        let default_spacing = self.style.item_spacing.x;
        self.current_window_mut().cursor.same_line(pos_x, spacing, default_spacing);
    }

    /// Inserts vertical spacing of one item-spacing unit.
    pub fn spacing(&mut self) { self.item_size(vec2f(0.0, 0.0), 0.0); }

    /// Indents following lines by `style.indent_spacing`.
    pub fn indent(&mut self) {
        let amount = self.style.indent_spacing;
        self.current_window_mut().cursor.indent(amount);
    }

    /// Undoes one [`indent`](Self::indent).
    pub fn unindent(&mut self) {
        let amount = self.style.indent_spacing;
        self.current_window_mut().cursor.unindent(amount);
    }

    /// Opens a layout group measured as a single item.
    pub fn begin_group(&mut self) { self.current_window_mut().cursor.begin_group(); }

    /// Closes the innermost group; its bounding box becomes the last item.
    pub fn end_group(&mut self) {
        let bbox = self.current_window_mut().cursor.end_group();
        self.item_size(vec2f(bbox.width, bbox.height), 0.0);
        self.item_add(bbox, Id::NONE);
    }

    /// Structurally balanced group scope.
    pub fn group<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.begin_group();
        let result = f(self);
        self.end_group();
        result
    }

    /// Pushes an item width override (negative fills from the right edge).
    pub fn push_item_width(&mut self, width: f32) { self.current_window_mut().cursor.push_item_width(width); }

    /// Pops an item width override.
    pub fn pop_item_width(&mut self) { self.current_window_mut().cursor.pop_item_width(); }

    /// Effective width for the next framed widget.
    pub(crate) fn calc_item_width(&self) -> f32 {
        let style = self.style;
        let w = self.current_window();
        let avail = w.content_rect(&style).width;
        w.cursor.calc_item_width(avail)
    }

    /// Pushes a text wrap position relative to the content origin.
    pub fn push_text_wrap_pos(&mut self, wrap_x: f32) { self.current_window_mut().cursor.push_text_wrap_pos(wrap_x); }

    /// Pops a text wrap position.
    pub fn pop_text_wrap_pos(&mut self) { self.current_window_mut().cursor.pop_text_wrap_pos(); }

    /// Pushes the button auto-repeat flag.
    pub fn push_button_repeat(&mut self, repeat: bool) { self.current_window_mut().cursor.push_button_repeat(repeat); }

    /// Pops the button auto-repeat flag.
    pub fn pop_button_repeat(&mut self) { self.current_window_mut().cursor.pop_button_repeat(); }

    /// Pushes the keyboard-focus participation flag.
    pub fn push_allow_keyboard_focus(&mut self, allow: bool) {
        self.current_window_mut().cursor.push_allow_keyboard_focus(allow);
    }

    /// Pops the keyboard-focus participation flag.
    pub fn pop_allow_keyboard_focus(&mut self) { self.current_window_mut().cursor.pop_allow_keyboard_focus(); }

    /// Remaining content size from the cursor to the content rect's corner.
    pub fn content_region_avail(&self) -> Vec2f {
        let style = self.style;
        let w = self.current_window();
        let content = w.content_rect(&style);
        vec2f(
            (content.x + content.width - w.cursor.pos.x).max(0.0),
            (content.y + content.height - w.cursor.pos.y).max(0.0),
        )
    }

    //
    // columns
    //

    /// Splits the content region into `count` vertical columns. Border
    /// positions persist per `str_id` across frames and are drag-resizable.
    pub fn begin_columns(&mut self, str_id: &str, count: usize) {
        let style = self.style;
        let index = self.current_window_index();
        assert!(self.windows[index].current_columns.is_none(), "begin_columns called inside begin_columns");
        let w = &mut self.windows[index];
        let id = w.get_id(str_id);
        let content = w.content_rect(&style);
        let cached = w.columns_cache.get(&id).cloned();
        let set = ColumnsSet::new(id, count, content.x, content.x + content.width, w.cursor.pos.y, cached);
        let col0 = set.column_rect(0, content.height + content.y - set.start_y);
        w.draw_list.push_clip_rect(col0, true);
        w.cursor.pos = vec2f(col0.x + style.columns_min_spacing * 0.5, set.start_y);
        w.current_columns = Some(set);
    }

    /// Advances to the next column (wrapping to a new row after the last).
    pub fn next_column(&mut self) {
        let style = self.style;
        let index = self.current_window_index();
        let content = {
            let w = &self.windows[index];
            w.content_rect(&style)
        };
        let w = &mut self.windows[index];
        let set = w.current_columns.as_mut().expect("next_column outside begin_columns");
        set.line_max_y = set.line_max_y.max(w.cursor.pos.y);
        set.current += 1;
        let new_row = set.current == set.count;
        if new_row {
            set.current = 0;
            set.start_y = set.line_max_y;
        }
        let col = set.column_rect(set.current, (content.y + content.height - set.start_y).max(0.0));
        let y = set.start_y;
        w.draw_list.pop_clip_rect();
        w.draw_list.push_clip_rect(col, true);
        w.cursor.pos = vec2f(col.x + style.columns_min_spacing * 0.5, y);
        w.cursor.curr_line_height = 0.0;
    }

    /// Ends the column layout, draws the borders and handles border dragging.
    pub fn end_columns(&mut self) {
        let style = self.style;
        let index = self.current_window_index();
        let mut set = self.windows[index].current_columns.take().expect("end_columns outside begin_columns");
        {
            let w = &mut self.windows[index];
            set.line_max_y = set.line_max_y.max(w.cursor.pos.y);
            w.draw_list.pop_clip_rect();
        }

        // borders: drawn as separators, draggable between neighbors
        let window_id = self.windows[index].id;
        let bottom = set.line_max_y;
        for i in 1..set.count {
            let x = set.offset_x(i);
            let border = rectf(x - 2.0, set.start_y.min(bottom), 4.0, (bottom - set.start_y).abs().max(1.0));
            let border_id = Id::from_u32_seeded(i as u32, set.id);
            self.interaction.keep_alive(border_id);
            let mut active = false;
            if self.interaction.active_id == border_id {
                if self.io.is_mouse_down(MouseButton::Left) {
                    active = true;
                    set.set_offset_x(i, self.io.mouse_pos.x);
                } else {
                    self.interaction.clear_active();
                }
            } else if self.hovered_window == Some(index)
                && border.contains(self.io.mouse_pos)
                && self.io.is_mouse_clicked(MouseButton::Left)
            {
                self.interaction.set_active(border_id, window_id);
                active = true;
            }
            let col = if active {
                style.get_color(StyleColor::SliderGrabActive)
            } else {
                style.get_color(StyleColor::Separator)
            };
            let x = set.offset_x(i);
            self.windows[index].draw_list.add_line(vec2f(x, border.y), vec2f(x, border.y + border.height), col, 1.0);
        }

        let w = &mut self.windows[index];
        w.columns_cache.insert(set.id, set.offsets.clone());
        w.cursor.pos = vec2f(w.cursor.start_pos.x + w.cursor.indent, set.line_max_y);
        w.cursor.curr_line_height = 0.0;
    }

    //
    // style stacks
    //

    /// Temporarily overrides one palette color.
    pub fn push_style_color(&mut self, col: StyleColor, value: Color) {
        self.color_stack.push(ColorMod { col, backup: self.style.colors[col as usize] });
        self.style.colors[col as usize] = value;
    }

    /// Restores the most recent color override. Panics on underflow.
    pub fn pop_style_color(&mut self) {
        let m = self.color_stack.pop().expect("pop_style_color without push_style_color");
        self.style.colors[m.col as usize] = m.backup;
    }

    /// Temporarily overrides one scalar style variable.
    pub fn push_style_var_f32(&mut self, var: StyleVar, value: f32) {
        self.style_var_stack.push(StyleMod { var, backup: self.style.var_value(var) });
        self.style.set_var(var, crate::style::StyleVarValue::F32(value));
    }

    /// Temporarily overrides one vector style variable.
    pub fn push_style_var_vec2(&mut self, var: StyleVar, value: Vec2f) {
        self.style_var_stack.push(StyleMod { var, backup: self.style.var_value(var) });
        self.style.set_var(var, crate::style::StyleVarValue::Vec2(value));
    }

    /// Restores the most recent style-variable override. Panics on underflow.
    pub fn pop_style_var(&mut self) {
        let m = self.style_var_stack.pop().expect("pop_style_var without push_style_var");
        self.style.set_var(m.var, m.backup);
    }

    //
    // drawing helpers
    //

    /// Measures text with the context's font and wrap width.
    pub fn calc_text_size(&self, text: &str, wrap_width: f32) -> Vec2f {
        self.atlas.calc_text_size(self.font, self.style.font_size, text, wrap_width)
    }

    /// Height of one text line plus frame padding.
    pub fn frame_height(&self) -> f32 { self.style.font_size + self.style.frame_padding.y * 2.0 }

    /// Draws text into the current window.
    pub(crate) fn draw_text(&mut self, pos: Vec2f, col: Color, text: &str, wrap_width: f32) {
        let atlas = self.atlas.clone();
        let font = self.font;
        let size = self.style.font_size;
        self.current_window_mut().draw_list.add_text(&atlas, font, size, pos, col, text, wrap_width, None);
    }

    /// Draws a filled frame with optional border, the shared background of
    /// framed widgets.
    pub(crate) fn render_frame(&mut self, rect: Rectf, col: Color, border: bool) {
        let rounding = self.style.frame_rounding;
        let border_col = self.style.get_color(StyleColor::Border);
        let dl = &mut self.current_window_mut().draw_list;
        dl.add_rect_filled(rect, col, rounding, CornerFlags::ALL);
        if border {
            dl.add_rect(rect, border_col, rounding, 1.0);
        }
    }

    /// Linear ratio helper used by sliders and scrollbars.
    pub(crate) fn ratio_in(&self, x: f32, min: f32, max: f32) -> f32 {
        if max > min { ((x - min) / (max - min)).clamp(0.0, 1.0) } else { 0.0 }
    }

    /// Inverse of [`ratio_in`](Self::ratio_in).
    pub(crate) fn lerp_ratio(&self, t: f32, min: f32, max: f32) -> f32 { lerp(min, max, t) }
}

/// Cuts a label at the first `"##"`, the conventional separator between the
/// visible text and an id-disambiguation suffix.
pub(crate) fn trim_label(label: &str) -> &str {
    match label.find("##") {
        Some(pos) => &label[..pos],
        None => label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::{MonoAtlas, TextureId};
    use crate::vec2f;

    fn ctx() -> Context {
        let atlas = AtlasHandle::new(MonoAtlas::new(TextureId::new(1), 13.0));
        let mut ctx = Context::new(atlas);
        ctx.io.display_size = rs_math3d::Dimensioni::new(800, 600);
        ctx
    }

    fn frame(ctx: &mut Context, f: impl FnOnce(&mut Context)) {
        ctx.new_frame();
        f(ctx);
        ctx.end_frame();
    }

    #[test]
    fn window_ids_are_stable_across_frames() {
        let mut ctx = ctx();
        let mut first = Id::NONE;
        frame(&mut ctx, |ctx| {
            ctx.window("A", WindowFlags::default(), |ctx| {
                first = ctx.get_id("widget");
            });
        });
        let mut second = Id::NONE;
        frame(&mut ctx, |ctx| {
            ctx.window("A", WindowFlags::default(), |ctx| {
                second = ctx.get_id("widget");
            });
        });
        assert_eq!(first, second);
        assert!(first.is_some());
    }

    #[test]
    #[should_panic]
    fn two_new_frames_without_end_panic() {
        let mut ctx = ctx();
        ctx.new_frame();
        ctx.new_frame();
    }

    #[test]
    #[should_panic]
    fn unbalanced_push_id_panics_at_end_window() {
        let mut ctx = ctx();
        ctx.new_frame();
        ctx.begin_window("A", WindowFlags::default());
        ctx.push_id("one");
        ctx.push_id("two");
        ctx.pop_id();
        // one push left unpopped
        ctx.end_window();
    }

    #[test]
    #[should_panic]
    fn missing_end_window_panics_at_end_frame() {
        let mut ctx = ctx();
        ctx.new_frame();
        ctx.begin_window("A", WindowFlags::default());
        ctx.end_frame();
    }

    #[test]
    fn click_promotes_window_to_front_keeping_others_stable() {
        let mut ctx = ctx();
        let submit = |ctx: &mut Context| {
            ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Once);
            ctx.set_next_window_size(vec2f(100.0, 100.0), Cond::Once);
            ctx.window("A", WindowFlags::default(), |_| {});
            ctx.set_next_window_pos(vec2f(200.0, 0.0), Cond::Once);
            ctx.set_next_window_size(vec2f(100.0, 100.0), Cond::Once);
            ctx.window("B", WindowFlags::default(), |_| {});
            ctx.set_next_window_pos(vec2f(400.0, 0.0), Cond::Once);
            ctx.set_next_window_size(vec2f(100.0, 100.0), Cond::Once);
            ctx.window("C", WindowFlags::default(), |_| {});
        };
        frame(&mut ctx, submit);
        assert_eq!(ctx.window_order(), vec!["A", "B", "C"]);

        // click the body of B
        ctx.io.mousedown(250.0, 50.0, MouseButton::Left);
        frame(&mut ctx, submit);
        assert_eq!(ctx.window_order(), vec!["A", "C", "B"]);
        assert!(ctx.is_window_focused("B"));

        ctx.io.mouseup(250.0, 50.0, MouseButton::Left);
        frame(&mut ctx, submit);
        assert_eq!(ctx.window_order(), vec!["A", "C", "B"]);
    }

    #[test]
    fn settings_round_trip_restores_placement() {
        let mut ctx = ctx();
        frame(&mut ctx, |ctx| {
            ctx.set_next_window_pos(vec2f(120.0, 80.0), Cond::Always);
            ctx.set_next_window_size(vec2f(300.0, 400.0), Cond::Always);
            ctx.window("Inspector", WindowFlags::default(), |_| {});
        });
        let saved = ctx.save_settings_to_string();
        assert!(saved.contains("[Inspector]"));
        assert!(saved.contains("Pos=120,80"));
        assert!(saved.contains("Size=300,400"));

        let mut fresh = self::ctx();
        fresh.load_settings_from_str(&saved);
        frame(&mut fresh, |ctx| {
            ctx.window("Inspector", WindowFlags::default(), |_| {});
        });
        let rect = fresh.window_rect("Inspector").unwrap();
        assert_eq!((rect.x, rect.y), (120.0, 80.0));
        assert_eq!(rect.width, 300.0);
        assert_eq!(rect.height, 400.0);
    }

    #[test]
    fn no_saved_settings_windows_stay_out_of_the_registry() {
        let mut ctx = ctx();
        frame(&mut ctx, |ctx| {
            ctx.window("Transient", WindowFlags::NO_SAVED_SETTINGS, |_| {});
        });
        let saved = ctx.save_settings_to_string();
        assert!(!saved.contains("Transient"));
    }

    #[test]
    fn hover_picks_the_topmost_window() {
        let mut ctx = ctx();
        let submit = |ctx: &mut Context| {
            ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Once);
            ctx.set_next_window_size(vec2f(200.0, 200.0), Cond::Once);
            ctx.window("Under", WindowFlags::default(), |_| {});
            ctx.set_next_window_pos(vec2f(100.0, 100.0), Cond::Once);
            ctx.set_next_window_size(vec2f(200.0, 200.0), Cond::Once);
            ctx.window("Over", WindowFlags::default(), |_| {});
        };
        frame(&mut ctx, submit);
        // overlap region: Over wins because it is later in the order
        ctx.io.mousemove(150.0, 150.0);
        frame(&mut ctx, submit);
        assert_eq!(ctx.hovered_window.map(|i| ctx.windows[i].name.as_str()), Some("Over"));

        ctx.io.mousemove(50.0, 50.0);
        frame(&mut ctx, submit);
        assert_eq!(ctx.hovered_window.map(|i| ctx.windows[i].name.as_str()), Some("Under"));
    }

    #[test]
    fn popup_opens_and_click_outside_closes_it() {
        let mut ctx = ctx();
        let submit = |ctx: &mut Context, expect_open: &mut bool| {
            ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Once);
            ctx.set_next_window_size(vec2f(200.0, 200.0), Cond::Once);
            ctx.window("Host", WindowFlags::default(), |ctx| {
                if ctx.begin_popup("ctx_menu") {
                    *expect_open = true;
                    ctx.end_popup();
                }
            });
        };
        let mut open = false;
        ctx.io.mousemove(100.0, 100.0);
        ctx.new_frame();
        ctx.window("Host", WindowFlags::default(), |ctx| {
            ctx.open_popup("ctx_menu");
        });
        ctx.end_frame();

        frame(&mut ctx, |ctx| submit(ctx, &mut open));
        assert!(open);

        // click far outside every window
        ctx.io.mousedown(700.0, 500.0, MouseButton::Left);
        open = false;
        frame(&mut ctx, |ctx| submit(ctx, &mut open));
        assert!(!open);
    }

    #[test]
    fn window_move_follows_a_title_bar_drag() {
        let mut ctx = ctx();
        let submit = |ctx: &mut Context| {
            ctx.set_next_window_pos(vec2f(100.0, 100.0), Cond::Once);
            ctx.set_next_window_size(vec2f(200.0, 150.0), Cond::Once);
            ctx.window("Drag", WindowFlags::default(), |_| {});
        };
        frame(&mut ctx, submit);

        // press inside the title bar, then drag
        ctx.io.mousedown(150.0, 105.0, MouseButton::Left);
        frame(&mut ctx, submit);
        ctx.io.mousemove(190.0, 125.0);
        frame(&mut ctx, submit);
        ctx.io.mouseup(190.0, 125.0, MouseButton::Left);
        frame(&mut ctx, submit);

        let rect = ctx.window_rect("Drag").unwrap();
        assert_eq!((rect.x, rect.y), (140.0, 120.0));
    }

    #[test]
    fn style_color_stack_restores_on_pop() {
        let mut ctx = ctx();
        frame(&mut ctx, |ctx| {
            ctx.window("A", WindowFlags::default(), |ctx| {
                let original = ctx.style.colors[StyleColor::Button as usize];
                ctx.push_style_color(StyleColor::Button, crate::color(1, 2, 3, 4));
                assert_eq!(ctx.style.colors[StyleColor::Button as usize], crate::color(1, 2, 3, 4));
                ctx.pop_style_color();
                assert_eq!(ctx.style.colors[StyleColor::Button as usize], original);
            });
        });
    }

    #[test]
    #[should_panic]
    fn unpopped_style_color_panics_at_end_frame() {
        let mut ctx = ctx();
        ctx.new_frame();
        ctx.begin_window("A", WindowFlags::default());
        ctx.push_style_color(StyleColor::Button, crate::color(1, 2, 3, 4));
        ctx.end_window();
        ctx.end_frame();
    }

    #[test]
    fn collapsed_window_skips_items() {
        let mut ctx = ctx();
        frame(&mut ctx, |ctx| {
            ctx.set_next_window_collapsed(true, Cond::Always);
            let mut ran = false;
            ctx.window("A", WindowFlags::default(), |_| {
                ran = true;
            });
            assert!(!ran);
        });
    }

    #[test]
    fn columns_persist_offsets_across_frames() {
        let mut ctx = ctx();
        let submit = |ctx: &mut Context| {
            ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Once);
            ctx.set_next_window_size(vec2f(400.0, 300.0), Cond::Once);
            ctx.window("Cols", WindowFlags::default(), |ctx| {
                ctx.begin_columns("grid", 2);
                ctx.next_column();
                ctx.end_columns();
            });
        };
        frame(&mut ctx, submit);
        let id = {
            // offsets landed in the per-window cache
            let w = &ctx.windows[0];
            assert_eq!(w.columns_cache.len(), 1);
            *w.columns_cache.keys().next().unwrap()
        };
        frame(&mut ctx, submit);
        let offsets = ctx.windows[0].columns_cache.get(&id).unwrap();
        assert_eq!(offsets.len(), 3);
        assert_eq!(offsets[0], 0.0);
        assert_eq!(offsets[2], 1.0);
    }

    fn submit_modal_over_base(ctx: &mut Context, with_menu: bool) {
        ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Once);
        ctx.set_next_window_size(vec2f(200.0, 200.0), Cond::Once);
        ctx.window("Base", WindowFlags::default(), |ctx| {
            ctx.open_popup("Confirm");
            if ctx.begin_popup_modal("Confirm") {
                if with_menu {
                    ctx.open_popup("menu");
                    if ctx.begin_popup("menu") {
                        ctx.end_popup();
                    }
                }
                ctx.end_popup();
            }
        });
    }

    #[test]
    fn popup_opened_inside_a_modal_stacks_above_it() {
        let mut ctx = ctx();
        ctx.io.mousemove(400.0, 300.0);
        frame(&mut ctx, |ctx| submit_modal_over_base(ctx, true));
        frame(&mut ctx, |ctx| submit_modal_over_base(ctx, true));

        let order = ctx.window_order();
        let modal = order.iter().position(|n| *n == "Confirm").unwrap();
        let menu = order.iter().position(|n| n.starts_with("##popup_")).unwrap();
        assert!(menu > modal, "the menu must render above the modal that opened it: {order:?}");
    }

    #[test]
    fn modal_blocks_hover_outside_its_tree() {
        let mut ctx = ctx();
        // over Base, far from the centered modal
        ctx.io.mousemove(20.0, 20.0);
        frame(&mut ctx, |ctx| submit_modal_over_base(ctx, false));
        frame(&mut ctx, |ctx| submit_modal_over_base(ctx, false));
        assert!(ctx.hovered_window.is_none());

        // over the modal itself (it appears centered)
        ctx.io.mousemove(270.0, 230.0);
        frame(&mut ctx, |ctx| submit_modal_over_base(ctx, false));
        assert_eq!(ctx.hovered_window.map(|i| ctx.windows[i].name.as_str()), Some("Confirm"));
    }

    #[test]
    fn modal_dim_ramps_toward_opaque() {
        let mut ctx = ctx();
        ctx.io.mousemove(400.0, 300.0);
        frame(&mut ctx, |ctx| submit_modal_over_base(ctx, false));
        assert_eq!(ctx.modal_dim_ratio, 0.0);
        frame(&mut ctx, |ctx| submit_modal_over_base(ctx, false));
        frame(&mut ctx, |ctx| submit_modal_over_base(ctx, false));
        // two frames of ramping at 6 per second
        let expected = 2.0 * ctx.io.delta_time * 6.0;
        assert!((ctx.modal_dim_ratio - expected).abs() < 1e-4);
    }

    #[test]
    fn clicking_a_lower_popup_closes_only_the_levels_above() {
        let mut ctx = ctx();
        let submit = |ctx: &mut Context, open_sub: bool, seen: &mut (bool, bool)| {
            ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Once);
            ctx.set_next_window_size(vec2f(200.0, 200.0), Cond::Once);
            ctx.window("Host", WindowFlags::default(), |ctx| {
                if ctx.begin_popup("menu") {
                    seen.0 = true;
                    if open_sub {
                        ctx.open_popup("sub");
                    }
                    if ctx.begin_popup("sub") {
                        seen.1 = true;
                        ctx.end_popup();
                    }
                    ctx.end_popup();
                }
            });
        };

        ctx.io.mousemove(100.0, 100.0);
        ctx.new_frame();
        ctx.window("Host", WindowFlags::default(), |ctx| {
            ctx.open_popup("menu");
        });
        ctx.end_frame();

        // the submenu opens away from the menu
        ctx.io.mousemove(300.0, 300.0);
        let mut seen = (false, false);
        frame(&mut ctx, |ctx| submit(ctx, true, &mut seen));
        assert_eq!(seen, (true, true));

        // click inside the menu itself
        ctx.io.mousedown(105.0, 105.0, MouseButton::Left);
        let mut seen = (false, false);
        frame(&mut ctx, |ctx| submit(ctx, false, &mut seen));
        assert!(seen.0, "the clicked level stays open");
        assert!(!seen.1, "levels above the clicked one close");
    }

    #[test]
    fn child_overflow_is_not_hoverable_outside_the_parent() {
        let mut ctx = ctx();
        let submit = |ctx: &mut Context| {
            ctx.set_next_window_pos(vec2f(0.0, 0.0), Cond::Once);
            ctx.set_next_window_size(vec2f(200.0, 200.0), Cond::Once);
            ctx.window("Parent", WindowFlags::default(), |ctx| {
                ctx.set_next_window_pos(vec2f(100.0, 100.0), Cond::Once);
                ctx.set_next_window_size(vec2f(300.0, 80.0), Cond::Once);
                ctx.window("Pane", WindowFlags::CHILD, |_| {});
            });
        };
        // inside the child rect but past the parent's edge
        ctx.io.mousemove(320.0, 150.0);
        frame(&mut ctx, submit);
        frame(&mut ctx, submit);
        assert!(ctx.hovered_window.is_none());

        // inside both
        ctx.io.mousemove(150.0, 150.0);
        frame(&mut ctx, submit);
        assert_eq!(ctx.hovered_window.map(|i| ctx.windows[i].name.as_str()), Some("Pane"));
    }
}
