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

//! Compile-time channel binding table.
//!
//! A SAM3X has three TC blocks with three channels each. Logical timer `N`
//! is channel `N % 3` of block `N / 3`. The table only has entries for
//! indices that exist on the chip, so `Timer<9>` does not compile.

/// TC0 block base address
pub(crate) const TC0_BASE: u32 = 0x4008_0000;
/// TC1 block base address
pub(crate) const TC1_BASE: u32 = 0x4008_4000;
/// TC2 block base address
pub(crate) const TC2_BASE: u32 = 0x4008_8000;

/// Number of TC channels on the chip
pub const CHANNEL_COUNT: usize = 9;

/// Marker type for timer channel `N`
pub struct Channel<const N: u8>;

/// Static description of where a timer channel lives
pub trait ChannelBinding {
    /// Logical timer index, also the slot in the handler table
    const INDEX: usize;
    /// Base address of the TC block the channel belongs to
    const TC_BASE: u32;
    /// Channel number inside the TC block (0..=2)
    const CHANNEL: u8;
    /// PMC peripheral identifier (ID_TCx)
    const PERIPHERAL_ID: u8;
    /// NVIC interrupt line (TCx_IRQn)
    const IRQ: u16;
}

macro_rules! channel_table {
    ($($n:literal => ($base:expr, $chan:literal, $pid:literal, $irq:literal),)+) => {
        $(
            impl ChannelBinding for Channel<$n> {
                const INDEX: usize = $n;
                const TC_BASE: u32 = $base;
                const CHANNEL: u8 = $chan;
                const PERIPHERAL_ID: u8 = $pid;
                const IRQ: u16 = $irq;
            }
        )+
    };
}

channel_table! {
    0 => (TC0_BASE, 0, 27, 27),
    1 => (TC0_BASE, 1, 28, 28),
    2 => (TC0_BASE, 2, 29, 29),
    3 => (TC1_BASE, 0, 30, 30),
    4 => (TC1_BASE, 1, 31, 31),
    5 => (TC1_BASE, 2, 32, 32),
    6 => (TC2_BASE, 0, 33, 33),
    7 => (TC2_BASE, 1, 34, 34),
    8 => (TC2_BASE, 2, 35, 35),
}
