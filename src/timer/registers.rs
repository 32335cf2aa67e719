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

/// Counter clock enable command.
pub(crate) const CCR_CLKEN: u32 = 1 << 0;
/// Counter clock disable command.
pub(crate) const CCR_CLKDIS: u32 = 1 << 1;
/// Software trigger: reset the counter and start the clock.
pub(crate) const CCR_SWTRG: u32 = 1 << 2;

/// External event selection field, waveform mode.
pub(crate) const CMR_EEVT_MASK: u32 = 0x3 << 10;
/// XC0 as external event, which makes TIOB an output.
pub(crate) const CMR_EEVT_XC0: u32 = 0x1 << 10;
/// RC compare trigger enable. Shares bit 14 with the upper WAVSEL bit in
/// waveform mode, so it is set for every "count to RC" mode.
pub(crate) const CMR_CPCTRG: u32 = 1 << 14;
/// Waveform mode.
pub(crate) const CMR_WAVE: u32 = 1 << 15;
/// WAVSEL: up to 0xFFFF.
pub(crate) const CMR_WAVSEL_UP: u32 = 0x0 << 13;
/// WAVSEL: up to 0xFFFF, then down.
pub(crate) const CMR_WAVSEL_UPDOWN: u32 = 0x1 << 13;
/// WAVSEL: up to RC.
pub(crate) const CMR_WAVSEL_UP_RC: u32 = 0x2 << 13;
/// WAVSEL: up to RC, then down.
pub(crate) const CMR_WAVSEL_UPDOWN_RC: u32 = 0x3 << 13;
/// RA compare effect on TIOA.
pub(crate) const CMR_ACPA_SHIFT: u32 = 16;
/// RB compare effect on TIOB.
pub(crate) const CMR_BCPB_SHIFT: u32 = 24;
/// Width mask of an output action field.
pub(crate) const CMR_ACTION_MASK: u32 = 0x3;

/// Counter overflow.
pub(crate) const SR_COVFS: u32 = 1 << 0;
/// RA compare.
pub(crate) const SR_CPAS: u32 = 1 << 2;
/// RB compare.
pub(crate) const SR_CPBS: u32 = 1 << 3;
/// RC compare.
pub(crate) const SR_CPCS: u32 = 1 << 4;
/// Counter clock is enabled.
pub(crate) const SR_CLKSTA: u32 = 1 << 16;
/// Every interrupt source of a channel.
pub(crate) const INTERRUPTS_ALL: u32 = 0xFFFF_FFFF;

/// Write protect enable.
pub(crate) const WPMR_WPEN: u32 = 1 << 0;
/// Write protect key, "TIM" in ASCII.
pub(crate) const WPMR_WPKEY: u32 = 0x54_494D << 8;

/// Power Management Controller base address.
pub(crate) const PMC_BASE: u32 = 0x400E_0600;

/// Timer-Counter channel registers, offsets from the channel base.
#[repr(u32)]
#[derive(Clone, Copy)]
pub(crate) enum ChannelReg {
    Ccr = 0x00,
    Cmr = 0x04,
    Cv = 0x10,
    Ra = 0x14,
    Rb = 0x18,
    Rc = 0x1C,
    Sr = 0x20,
    Ier = 0x24,
    Idr = 0x28,
    Imr = 0x2C,
}

/// Size of one channel's register block.
pub(crate) const CHANNEL_STRIDE: u32 = 0x40;
/// Write protect mode register, offset from the TC block base.
pub(crate) const TC_WPMR: u32 = 0xE4;

/// PMC registers, offsets from [PMC_BASE].
#[repr(u32)]
#[derive(Clone, Copy)]
pub(crate) enum PmcReg {
    Pcer0 = 0x10,
    Pcdr0 = 0x14,
    Pcsr0 = 0x18,
    Pcer1 = 0x100,
    Pcdr1 = 0x104,
    Pcsr1 = 0x108,
}

impl From<ChannelReg> for u32 {
    fn from(val: ChannelReg) -> Self {
        val as u32
    }
}

impl From<PmcReg> for u32 {
    fn from(val: PmcReg) -> Self {
        val as u32
    }
}
