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

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

#[derive(Default, Copy, Clone, Eq, PartialEq, Hash, Debug)]
/// Stable 64-bit widget identifier.
///
/// Computed as `hash(key, scope seed)` where the seed is the top of the owning
/// window's identifier stack. Two widgets hashing to the same value in the same
/// frame are indistinguishable to the interaction state machine; that is a
/// collision, not an error.
pub struct Id(u64);

impl Id {
    /// The null identifier; never owned by any widget.
    pub const NONE: Id = Id(0);

    /// Creates an ID from a caller-supplied numeric value.
    pub fn new(value: u64) -> Self { Self(value) }

    /// Hashes a string key under the given scope seed.
    pub fn from_str_seeded(label: &str, seed: Id) -> Self { Self::from_bytes_seeded(label.as_bytes(), seed) }

    /// Hashes the address of a stable object under the given scope seed.
    pub fn from_ptr_seeded<T: ?Sized>(value: &T, seed: Id) -> Self {
        let ptr = value as *const T as *const u8 as usize;
        Self::from_bytes_seeded(&ptr.to_le_bytes(), seed)
    }

    /// Hashes a loop index under the given scope seed.
    pub fn from_u32_seeded(index: u32, seed: Id) -> Self { Self::from_bytes_seeded(&index.to_le_bytes(), seed) }

    /// FNV-1a over `bytes`, continuing from `seed` (or the offset basis when
    /// the seed is null) so nested scopes chain into the hash.
    pub fn from_bytes_seeded(bytes: &[u8], seed: Id) -> Self {
        let mut hash = if seed == Id::NONE { FNV_OFFSET_BASIS } else { seed.0 };
        for byte in bytes {
            hash ^= *byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        Self(hash)
    }

    /// Returns the raw numeric value wrapped by this ID.
    pub fn raw(self) -> u64 { self.0 }

    /// Returns `true` for the null identifier.
    pub fn is_none(self) -> bool { self.0 == 0 }

    /// Returns `true` for any non-null identifier.
    pub fn is_some(self) -> bool { self.0 != 0 }
}

/// Arbitrates, once per frame, which single identifier owns hover and which
/// single identifier owns active (mouse capture) status.
///
/// `hovered_id` is recomputed from scratch every frame. `active_id` persists
/// across frames but must be re-asserted alive each frame by a widget
/// computing the same id, otherwise it is forcibly cleared at frame end — the
/// mechanism that releases capture when the owning widget stops being
/// submitted (e.g. conditionally not rendered).
#[derive(Default, Clone, Debug)]
pub(crate) struct InteractionState {
    /// Identifier hovered this frame; rebuilt from zero every frame.
    pub hovered_id: Id,
    /// The single identifier currently capturing interaction.
    pub active_id: Id,
    /// Id of the window that owns the active identifier.
    pub active_id_window: Id,
    /// Whether `active_id` was re-asserted this frame.
    pub active_id_is_alive: bool,
    /// One-frame latch raised by `set_active`.
    pub active_id_is_just_activated: bool,
    /// Value of `active_id` at the start of the frame.
    pub active_id_prev_frame: Id,
}

impl InteractionState {
    /// Grants exclusive capture to `id`; any prior holder is implicitly cleared.
    pub fn set_active(&mut self, id: Id, window: Id) {
        self.active_id = id;
        self.active_id_window = window;
        self.active_id_is_just_activated = true;
        if id.is_some() {
            self.active_id_is_alive = true;
        }
    }

    /// Releases capture.
    pub fn clear_active(&mut self) { self.set_active(Id::NONE, Id::NONE); }

    /// Re-asserts that the widget owning `id` still exists this frame.
    pub fn keep_alive(&mut self, id: Id) {
        if self.active_id == id && id.is_some() {
            self.active_id_is_alive = true;
        }
    }

    /// Marks `id` as the hovered widget for this frame.
    pub fn set_hovered(&mut self, id: Id) { self.hovered_id = id; }

    /// Per-frame reset: hover starts empty, liveness must be re-proven.
    pub fn begin_frame(&mut self) {
        self.hovered_id = Id::NONE;
        self.active_id_prev_frame = self.active_id;
        self.active_id_is_alive = false;
        self.active_id_is_just_activated = false;
    }

    /// Frame-end liveness sweep: an active id nobody re-asserted is dropped.
    pub fn end_frame(&mut self) {
        if self.active_id.is_some() && !self.active_id_is_alive {
            self.clear_active();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_deterministic_across_frames() {
        let seed = Id::from_str_seeded("A", Id::NONE);
        let frame1 = Id::from_str_seeded("X", seed);
        let frame2 = Id::from_str_seeded("X", seed);
        assert_eq!(frame1, frame2);
        assert!(frame1.is_some());
    }

    #[test]
    fn id_depends_on_scope_seed() {
        let seed_a = Id::from_str_seeded("A", Id::NONE);
        let seed_b = Id::from_str_seeded("B", Id::NONE);
        assert_ne!(Id::from_str_seeded("X", seed_a), Id::from_str_seeded("X", seed_b));
        assert_ne!(Id::from_str_seeded("X", seed_a), Id::from_str_seeded("X", Id::NONE));
    }

    #[test]
    fn activation_is_exclusive() {
        let mut state = InteractionState::default();
        let first = Id::new(1);
        let second = Id::new(2);
        state.set_active(first, Id::new(10));
        assert_eq!(state.active_id, first);
        state.set_active(second, Id::new(10));
        assert_eq!(state.active_id, second);
        assert_ne!(state.active_id, first);
    }

    #[test]
    fn unasserted_active_id_clears_at_frame_end() {
        let mut state = InteractionState::default();
        let id = Id::new(7);
        state.set_active(id, Id::new(1));
        state.end_frame();
        assert_eq!(state.active_id, id);

        state.begin_frame();
        // no widget computed the id this frame
        state.end_frame();
        assert_eq!(state.active_id, Id::NONE);
    }

    #[test]
    fn keep_alive_preserves_active_id() {
        let mut state = InteractionState::default();
        let id = Id::new(7);
        state.set_active(id, Id::new(1));
        for _ in 0..3 {
            state.begin_frame();
            state.keep_alive(id);
            state.end_frame();
        }
        assert_eq!(state.active_id, id);
    }
}
