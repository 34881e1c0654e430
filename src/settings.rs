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
use std::fmt::Write as _;
use std::path::Path;

use rs_math3d::Vec2i;

#[derive(Clone, Debug)]
/// Persisted placement of one window, keyed by its display name.
pub struct WindowSettings {
    /// Window name, also the section header in the serialized form.
    pub name: String,
    /// Top-left corner.
    pub pos: Vec2i,
    /// Uncollapsed size.
    pub size: Vec2i,
    /// Collapsed to the title bar.
    pub collapsed: bool,
}

/// Window placements as read from / written to disk.
///
/// The format is line oriented: a `[Name]` header opens a section, followed
/// by `Pos=x,y`, `Size=w,h` and `Collapsed=0|1` lines in any order. Unknown
/// keys and malformed lines are skipped with a warning so future additions
/// and hand edits stay harmless. A missing file is an empty registry, not an
/// error.
///
/// The registry rewrites itself wholesale: the context marks it dirty when a
/// tracked window moves, resizes or collapses, and flushes after the debounce
/// interval elapses.
#[derive(Default)]
pub struct SettingsRegistry {
    entries: Vec<WindowSettings>,
    dirty: bool,
    dirty_timer: f32,
}

impl SettingsRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self { Self::default() }

    /// Looks up a window's persisted placement.
    pub fn get(&self, name: &str) -> Option<&WindowSettings> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Inserts or updates a window's placement, marking the registry dirty
    /// only when an existing entry actually changed. A first insertion records
    /// the placement without scheduling a rewrite; it rides along with the
    /// next genuine change.
    pub fn set(&mut self, name: &str, pos: Vec2i, size: Vec2i, collapsed: bool) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(e) => {
                let moved = e.pos.x != pos.x || e.pos.y != pos.y;
                let resized = e.size.x != size.x || e.size.y != size.y;
                if moved || resized || e.collapsed != collapsed {
                    e.pos = pos;
                    e.size = size;
                    e.collapsed = collapsed;
                    self.dirty = true;
                }
            }
            None => {
                self.entries.push(WindowSettings { name: name.to_string(), pos, size, collapsed });
            }
        }
    }

    /// Whether an unsaved change is pending.
    pub fn is_dirty(&self) -> bool { self.dirty }

    /// Advances the debounce timer; returns `true` once a pending change has
    /// aged past `save_rate` seconds, clearing the dirty state.
    pub(crate) fn tick(&mut self, delta_time: f32, save_rate: f32) -> bool {
        if !self.dirty {
            return false;
        }
        self.dirty_timer += delta_time;
        if self.dirty_timer >= save_rate {
            self.dirty = false;
            self.dirty_timer = 0.0;
            true
        } else {
            false
        }
    }

    /// Parses the serialized form. Never fails; oddities are skipped.
    pub fn from_str(data: &str) -> Self {
        let mut registry = Self::new();
        let mut current: Option<WindowSettings> = None;
        for raw in data.lines() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('[') {
                if let Some(entry) = current.take() {
                    registry.entries.push(entry);
                }
                match line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                    Some(name) if !name.is_empty() => {
                        current = Some(WindowSettings {
                            name: name.to_string(),
                            pos: Vec2i::new(60, 60),
                            size: Vec2i::new(0, 0),
                            collapsed: false,
                        });
                    }
                    _ => log::warn!("settings: malformed section header {raw:?}"),
                }
                continue;
            }
            let Some(entry) = current.as_mut() else {
                log::warn!("settings: line outside any section {raw:?}");
                continue;
            };
            let Some((key, value)) = line.split_once('=') else {
                log::warn!("settings: malformed line {raw:?}");
                continue;
            };
            match key {
                "Pos" => match parse_pair(value) {
                    Some((x, y)) => entry.pos = Vec2i::new(x, y),
                    None => log::warn!("settings: bad Pos value {value:?}"),
                },
                "Size" => match parse_pair(value) {
                    Some((w, h)) => entry.size = Vec2i::new(w, h),
                    None => log::warn!("settings: bad Size value {value:?}"),
                },
                "Collapsed" => entry.collapsed = value.trim() == "1",
                _ => log::warn!("settings: unknown key {key:?}"),
            }
        }
        if let Some(entry) = current.take() {
            registry.entries.push(entry);
        }
        registry
    }

    /// Serializes every entry in insertion order.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for e in &self.entries {
            let _ = writeln!(out, "[{}]", e.name);
            let _ = writeln!(out, "Pos={},{}", e.pos.x, e.pos.y);
            let _ = writeln!(out, "Size={},{}", e.size.x, e.size.y);
            let _ = writeln!(out, "Collapsed={}", if e.collapsed { 1 } else { 0 });
            out.push('\n');
        }
        out
    }

    /// Loads a registry from a file. A missing file yields an empty registry;
    /// other I/O errors propagate.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(data) => Ok(Self::from_str(&data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e),
        }
    }

    /// Writes the registry wholesale.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        log::debug!("settings: saving {} window placements", self.entries.len());
        std::fs::write(path, self.serialize())
    }
}

fn parse_pair(value: &str) -> Option<(i32, i32)> {
    let (a, b) = value.split_once(',')?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_placements() {
        let mut registry = SettingsRegistry::new();
        registry.set("Inspector", Vec2i::new(120, 80), Vec2i::new(300, 400), false);
        registry.set("Console", Vec2i::new(0, 480), Vec2i::new(640, 200), true);
        let reloaded = SettingsRegistry::from_str(&registry.serialize());
        let inspector = reloaded.get("Inspector").unwrap();
        assert_eq!((inspector.pos.x, inspector.pos.y), (120, 80));
        assert_eq!((inspector.size.x, inspector.size.y), (300, 400));
        assert!(!inspector.collapsed);
        assert!(reloaded.get("Console").unwrap().collapsed);
    }

    #[test]
    fn unknown_keys_and_junk_are_skipped() {
        let data = "\
stray line
[Inspector]
Pos=10,20
Flavor=vanilla
Size=nonsense
Collapsed=1
";
        let registry = SettingsRegistry::from_str(data);
        let e = registry.get("Inspector").unwrap();
        assert_eq!((e.pos.x, e.pos.y), (10, 20));
        // bad Size keeps the default
        assert_eq!((e.size.x, e.size.y), (0, 0));
        assert!(e.collapsed);
    }

    #[test]
    fn missing_file_is_an_empty_registry() {
        let registry = SettingsRegistry::load_from_path("/nonexistent/remui.ini").unwrap();
        assert!(registry.get("Inspector").is_none());
    }

    #[test]
    fn set_only_dirties_on_change() {
        let mut registry = SettingsRegistry::new();
        // tracking a window for the first time is not a change worth a rewrite
        registry.set("A", Vec2i::new(1, 2), Vec2i::new(3, 4), false);
        assert!(!registry.is_dirty());
        registry.set("A", Vec2i::new(1, 2), Vec2i::new(3, 4), false);
        assert!(!registry.is_dirty());
        registry.set("A", Vec2i::new(9, 2), Vec2i::new(3, 4), false);
        assert!(registry.is_dirty());
        assert!(registry.tick(10.0, 5.0));
        assert!(!registry.is_dirty());
    }

    #[test]
    fn debounce_waits_for_the_save_rate() {
        let mut registry = SettingsRegistry::new();
        registry.set("A", Vec2i::new(1, 2), Vec2i::new(3, 4), false);
        registry.set("A", Vec2i::new(5, 6), Vec2i::new(3, 4), false);
        assert!(!registry.tick(1.0, 5.0));
        assert!(!registry.tick(1.0, 5.0));
        assert!(registry.tick(3.0, 5.0));
        assert!(!registry.tick(100.0, 5.0));
    }
}
