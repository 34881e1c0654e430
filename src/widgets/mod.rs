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

//! Built-in widgets, layered on the frame orchestrator's primitives: every
//! widget here is id hashing + a layout cell + `button_behavior` + draw calls,
//! nothing more. Applications can build their own widgets from the same
//! primitives.

mod core_widgets;
mod nodes;
mod slider;
mod textbox;

pub use textbox::EditBuffer;
pub(crate) use textbox::TextEditState;

use crate::style::StyleColor;
use crate::Context;

impl Context {
    /// Background color for a frame/button-like widget in one of its three
    /// interaction states.
    pub(crate) fn interaction_color(
        &self,
        idle: StyleColor,
        hovered_color: StyleColor,
        held_color: StyleColor,
        hovered: bool,
        held: bool,
    ) -> crate::Color {
        if held {
            self.style.get_color(held_color)
        } else if hovered {
            self.style.get_color(hovered_color)
        } else {
            self.style.get_color(idle)
        }
    }
}
