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

use bitflags::bitflags;

use super::registers::*;

/// TOP when the counter is not reset by an RC compare.
pub const TOP_MAX: u32 = 0xFFFF;

/// Counter range a prescaler must cover, one past [TOP_MAX].
const COUNTER_RANGE: u32 = 0x1_0000;

/// Counting mode of a channel
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// Capture mode, free running
    InputCapture,
    /// Capture mode, counter reset on RC compare
    InputCaptureToMatch,
    /// Waveform, up to 0xFFFF
    Up,
    /// Waveform, up to TOP (RC)
    UpToMatch,
    /// Waveform, up to 0xFFFF then down
    UpDown,
    /// Waveform, up to TOP (RC) then down
    UpDownToMatch,
}

impl TimerMode {
    /// Whether the counter wraps at RC rather than at [TOP_MAX].
    pub const fn is_to_match(self) -> bool {
        matches!(
            self,
            Self::InputCaptureToMatch | Self::UpToMatch | Self::UpDownToMatch
        )
    }
}

impl From<TimerMode> for u32 {
    fn from(val: TimerMode) -> Self {
        match val {
            TimerMode::InputCapture => 0,
            TimerMode::InputCaptureToMatch => CMR_CPCTRG,
            TimerMode::Up => CMR_WAVE | CMR_WAVSEL_UP,
            TimerMode::UpToMatch => CMR_WAVE | CMR_WAVSEL_UP_RC,
            TimerMode::UpDown => CMR_WAVE | CMR_WAVSEL_UPDOWN,
            TimerMode::UpDownToMatch => CMR_WAVE | CMR_WAVSEL_UPDOWN_RC,
        }
    }
}

/// Internal clock feeding the counter, as a fraction of the master clock
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ClockSelect {
    /// TIMER_CLOCK1, MCK/2
    Mck2 = 0,
    /// TIMER_CLOCK2, MCK/8
    Mck8 = 1,
    /// TIMER_CLOCK3, MCK/32
    Mck32 = 2,
    /// TIMER_CLOCK4, MCK/128
    Mck128 = 3,
}

/// Prescalers in the order they are tried. TIMER_CLOCK5 (slow clock) is
/// not used.
pub const PRESCALERS: [ClockSelect; 4] = [
    ClockSelect::Mck2,
    ClockSelect::Mck8,
    ClockSelect::Mck32,
    ClockSelect::Mck128,
];

impl ClockSelect {
    pub const fn divisor(self) -> u32 {
        match self {
            Self::Mck2 => 2,
            Self::Mck8 => 8,
            Self::Mck32 => 32,
            Self::Mck128 => 128,
        }
    }

    /// Whether `freq` lies strictly between the slowest and fastest
    /// frequency this prescaler can produce with a 16-bit TOP.
    pub const fn can_produce(self, master_clock: u32, freq: u32) -> bool {
        let clock = master_clock / self.divisor();
        freq > clock / COUNTER_RANGE && freq < clock
    }

    /// First prescaler in [PRESCALERS] that can produce `freq`.
    ///
    /// This is first fit, not the one with the smallest error.
    pub fn for_frequency(master_clock: u32, freq: u32) -> Option<Self> {
        PRESCALERS
            .into_iter()
            .find(|clock| clock.can_produce(master_clock, freq))
    }
}

impl From<ClockSelect> for u32 {
    fn from(val: ClockSelect) -> Self {
        val as u32
    }
}

bitflags! {
    /// Events that raise the channel interrupt. The empty set turns the
    /// interrupt off.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InterruptSources: u32 {
        /// Counter matched RA
        const MATCH_A = 1 << 1;
        /// Counter matched RB
        const MATCH_B = 1 << 2;
        /// Counter wrapped past TOP. This is an RC compare when TOP is RC.
        const OVERFLOW = 1 << 3;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for InterruptSources {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "InterruptSources({=u32:#x})", self.bits())
    }
}

/// What a compare match does to the channel's TIOx output
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum OutputAction {
    #[default]
    Disconnected = 0,
    Set = 1,
    Clear = 2,
    Toggle = 3,
}

impl From<OutputAction> for u32 {
    fn from(val: OutputAction) -> Self {
        val as u32
    }
}
