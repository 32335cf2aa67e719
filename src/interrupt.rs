// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use core::cell::Cell;
use critical_section::Mutex;

use crate::binding::CHANNEL_COUNT;

fn no_handler() {}

/// One handler slot per channel, all starting out as no-ops.
static HANDLERS: [Mutex<Cell<fn()>>; CHANNEL_COUNT] =
    [const { Mutex::new(Cell::new(no_handler as fn())) }; CHANNEL_COUNT];

pub(crate) fn set_handler(index: usize, handler: fn()) {
    critical_section::with(|cs| HANDLERS[index].borrow(cs).set(handler));
}

pub(crate) fn clear_handler(index: usize) {
    set_handler(index, no_handler);
}

/// Run the handler for channel `index`.
///
/// The slot is copied out before the call, so a handler may replace
/// itself.
pub(crate) fn dispatch(index: usize) {
    let handler = critical_section::with(|cs| HANDLERS[index].borrow(cs).get());
    handler();
}
