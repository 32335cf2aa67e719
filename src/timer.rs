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

//! Timer-Counter channel driver

use crate::binding::{Channel, ChannelBinding};
use crate::bus::{Bus, Mmio};
use crate::errors::Error;
use crate::interrupt;

mod constants;
mod pwm;
pub(crate) mod registers;

use crate::{debug, trace, warn};

pub use constants::{
    ClockSelect, InterruptSources, OutputAction, TimerMode, PRESCALERS, TOP_MAX,
};
pub use pwm::{PwmA, PwmB, PwmChannel};
use registers::*;

/// Core clock of a SAM3X8E running from the 12MHz crystal through PLLA.
pub const DEFAULT_MASTER_CLOCK_HZ: u32 = 84_000_000;

/// One Timer-Counter channel, used as an independent timer.
///
/// `N` picks the channel at compile time, see [ChannelBinding]. The only
/// state kept here is the bus handle and the master clock used for
/// frequency calculations, everything else is read back from the
/// registers.
pub struct Timer<const N: u8, B: Bus = Mmio>
where
    Channel<N>: ChannelBinding,
{
    bus: B,
    master_clock: u32,
}

impl<const N: u8, B: Bus> Timer<N, B>
where
    Channel<N>: ChannelBinding,
{
    const BASE: u32 = <Channel<N>>::TC_BASE + CHANNEL_STRIDE * <Channel<N>>::CHANNEL as u32;

    /// Create the timer with [DEFAULT_MASTER_CLOCK_HZ].
    ///
    /// Unlocks the write protection of the channel's TC block.
    pub fn new(bus: B) -> Self {
        Self::with_master_clock(bus, DEFAULT_MASTER_CLOCK_HZ)
    }

    /// Create the timer for a board whose master clock is `master_clock` Hz.
    pub fn with_master_clock(bus: B, master_clock: u32) -> Self {
        let mut timer = Self { bus, master_clock };
        timer.init();
        timer
    }

    pub fn init(&mut self) {
        self.unlock();
    }

    pub fn master_clock(&self) -> u32 {
        self.master_clock
    }

    /// Give back the bus handle.
    pub fn release(self) -> B {
        self.bus
    }

    fn read(&self, reg: ChannelReg) -> u32 {
        self.bus.read(Self::BASE + u32::from(reg))
    }

    fn write(&mut self, reg: ChannelReg, value: u32) {
        self.bus.write(Self::BASE + u32::from(reg), value)
    }

    fn wpmr() -> u32 {
        <Channel<N>>::TC_BASE + TC_WPMR
    }

    // #region write protection

    /// Allow writes to the TC block's mode registers.
    ///
    /// The protection is shared by the three channels of a block.
    pub fn unlock(&mut self) {
        trace!("TC{}: unlock", N);
        self.bus.write(Self::wpmr(), WPMR_WPKEY);
    }

    /// Write protect the TC block's mode registers, for all three channels
    /// of the block. Configuring a locked channel silently does nothing.
    pub fn lock(&mut self) {
        trace!("TC{}: lock", N);
        self.bus.write(Self::wpmr(), WPMR_WPEN | WPMR_WPKEY);
    }

    pub fn is_locked(&self) -> bool {
        self.bus.read(Self::wpmr()) & WPMR_WPEN != 0
    }

    // #endregion write protection

    // #region peripheral clock

    /// PMC status, enable and disable registers and the bit for this channel
    fn pmc_slot() -> (PmcReg, PmcReg, PmcReg, u32) {
        let id = <Channel<N>>::PERIPHERAL_ID;
        if id < 32 {
            (PmcReg::Pcsr0, PmcReg::Pcer0, PmcReg::Pcdr0, 1 << id)
        } else {
            (PmcReg::Pcsr1, PmcReg::Pcer1, PmcReg::Pcdr1, 1 << (id - 32))
        }
    }

    pub fn is_peripheral_clock_enabled(&self) -> bool {
        let (status, _, _, mask) = Self::pmc_slot();
        self.bus.read(PMC_BASE + u32::from(status)) & mask == mask
    }

    /// Gate the TC clock on at the PMC. Does nothing if it already is.
    pub fn enable_peripheral_clock(&mut self) {
        let (_, enable, _, mask) = Self::pmc_slot();
        if !self.is_peripheral_clock_enabled() {
            trace!("TC{}: peripheral clock on", N);
            self.bus.write(PMC_BASE + u32::from(enable), mask);
        }
    }

    /// Gate the TC clock off at the PMC. Does nothing if it already is.
    pub fn disable_peripheral_clock(&mut self) {
        let (_, _, disable, mask) = Self::pmc_slot();
        if self.is_peripheral_clock_enabled() {
            trace!("TC{}: peripheral clock off", N);
            self.bus.write(PMC_BASE + u32::from(disable), mask);
        }
    }

    // #endregion peripheral clock

    /// Configure the counting mode and a clock that produces `freq` Hz.
    ///
    /// The channel is stopped, its interrupt sources are masked and pending
    /// status is dropped before anything is changed. Returns the frequency
    /// actually produced, which is truncated by integer division and may
    /// differ from the request.
    ///
    /// In the free running modes TOP is 0xFFFF, so the returned frequency
    /// is the wrap rate rather than `freq`.
    ///
    /// # Errors
    ///
    /// [Error::FrequencyUnattainable] if no prescaler fits. The mode is
    /// still written, with the MCK/2 clock, and TOP is left alone.
    pub fn set_mode_and_frequency(&mut self, mode: TimerMode, freq: u32) -> Result<u32, Error> {
        self.write(ChannelReg::Ccr, CCR_CLKDIS);
        self.write(ChannelReg::Idr, INTERRUPTS_ALL);
        self.read(ChannelReg::Sr);

        self.enable_peripheral_clock();

        let Some(clock) = ClockSelect::for_frequency(self.master_clock, freq) else {
            self.write(ChannelReg::Cmr, u32::from(mode) | u32::from(ClockSelect::Mck2));
            warn!("TC{}: {} Hz unattainable, left at MCK/2", N, freq);
            return Err(Error::FrequencyUnattainable);
        };
        self.write(ChannelReg::Cmr, u32::from(mode) | u32::from(clock));

        let divisor = clock.divisor();
        let top = if mode.is_to_match() {
            self.master_clock / (divisor * freq)
        } else {
            TOP_MAX
        };
        self.set_top(top);

        let actual = self.master_clock / (divisor * top);
        debug!(
            "TC{}: {:?} MCK/{} top {} -> {} Hz (asked {})",
            N, mode, divisor, top, actual, freq
        );
        Ok(actual)
    }

    /// Write RC. Only the "to match" modes use it as TOP, no check is made.
    pub fn set_top(&mut self, top: u32) {
        self.write(ChannelReg::Rc, top);
    }

    fn compare_trigger(&self) -> bool {
        self.read(ChannelReg::Cmr) & CMR_CPCTRG != 0
    }

    /// Value the counter wraps at: RC if the channel resets on RC compare,
    /// otherwise [TOP_MAX]. Read from the mode register every time.
    pub fn top_value(&self) -> u32 {
        if self.compare_trigger() {
            self.read(ChannelReg::Rc)
        } else {
            TOP_MAX
        }
    }

    /// Current counter value. The counter keeps running, so this is stale
    /// as soon as it returns.
    pub fn value(&self) -> u32 {
        self.read(ChannelReg::Cv)
    }

    /// Enable the counter clock and reset the counter.
    pub fn start(&mut self) {
        self.write(ChannelReg::Ccr, CCR_CLKEN | CCR_SWTRG);
    }

    /// Disable the counter clock. Takes effect on the next counter tick.
    pub fn stop(&mut self) {
        self.write(ChannelReg::Ccr, CCR_CLKDIS);
    }

    /// Whether the counter clock is running.
    ///
    /// Reading the status register acknowledges pending events, so don't
    /// call this while channel interrupts are in use.
    pub fn is_running(&self) -> bool {
        self.read(ChannelReg::Sr) & SR_CLKSTA != 0
    }

    // #region duty cycle

    /// Set RA to `ratio` of TOP, rounded to the nearest count. Nothing is
    /// clamped, a ratio above 1.0 gives a compare value past TOP.
    pub fn set_duty_cycle_a(&mut self, ratio: f32) {
        let value = scale(self.top_value(), ratio);
        self.set_duty_cycle_a_absolute(value);
    }

    /// Set RB to `ratio` of TOP, see [Timer::set_duty_cycle_a].
    pub fn set_duty_cycle_b(&mut self, ratio: f32) {
        let value = scale(self.top_value(), ratio);
        self.set_duty_cycle_b_absolute(value);
    }

    /// Set RA in counts, from 0 to [Timer::top_value].
    pub fn set_duty_cycle_a_absolute(&mut self, value: u32) {
        self.write(ChannelReg::Ra, value);
    }

    /// Set RB in counts, from 0 to [Timer::top_value].
    pub fn set_duty_cycle_b_absolute(&mut self, value: u32) {
        self.write(ChannelReg::Rb, value);
    }

    pub fn duty_cycle_a(&self) -> u32 {
        self.read(ChannelReg::Ra)
    }

    pub fn duty_cycle_b(&self) -> u32 {
        self.read(ChannelReg::Rb)
    }

    // #endregion duty cycle

    // #region outputs

    fn set_action(&mut self, shift: u32, action: OutputAction, extra: (u32, u32)) {
        let (clear, set) = extra;
        let mut cmr = self.read(ChannelReg::Cmr);
        cmr &= !(CMR_ACTION_MASK << shift) & !clear;
        cmr |= (u32::from(action) << shift) | set;
        self.write(ChannelReg::Cmr, cmr);
    }

    /// What an RA compare does to TIOA. Waveform modes only.
    ///
    /// [Timer::set_mode_and_frequency] resets this, so call it afterwards.
    pub fn set_output_a(&mut self, action: OutputAction) {
        self.set_action(CMR_ACPA_SHIFT, action, (0, 0));
    }

    /// What an RB compare does to TIOB. Waveform modes only.
    ///
    /// TIOB is an input unless the external event is moved off it, so this
    /// also selects XC0 as the external event when an action is set.
    pub fn set_output_b(&mut self, action: OutputAction) {
        let eevt = match action {
            OutputAction::Disconnected => (0, 0),
            _ => (CMR_EEVT_MASK, CMR_EEVT_XC0),
        };
        self.set_action(CMR_BCPB_SHIFT, action, eevt);
    }

    // #endregion outputs

    // #region interrupts

    /// Hardware event that means "wrapped past TOP" in the current mode.
    fn overflow_event(&self) -> u32 {
        if self.compare_trigger() {
            SR_CPCS
        } else {
            SR_COVFS
        }
    }

    fn sources_from_events(&self, events: u32) -> InterruptSources {
        let mut sources = InterruptSources::empty();
        sources.set(InterruptSources::MATCH_A, events & SR_CPAS != 0);
        sources.set(InterruptSources::MATCH_B, events & SR_CPBS != 0);
        sources.set(
            InterruptSources::OVERFLOW,
            events & self.overflow_event() != 0,
        );
        sources
    }

    /// Select the events that raise the channel interrupt.
    ///
    /// An empty set masks every source and disables the interrupt line.
    /// Otherwise all sources are masked, the line is enabled and the
    /// requested ones are unmasked. [InterruptSources::OVERFLOW] maps to the
    /// RC compare when TOP is RC and to the counter overflow otherwise, so
    /// set the mode first.
    ///
    /// Each flag is tested on its own, only the requested sources are
    /// unmasked. Pass [InterruptSources::all()] to get every source.
    pub fn set_interrupts(&mut self, sources: InterruptSources) {
        self.write(ChannelReg::Idr, INTERRUPTS_ALL);
        if sources.is_empty() {
            self.bus.disable_irq(<Channel<N>>::IRQ);
            trace!("TC{}: interrupts off", N);
            return;
        }

        self.bus.enable_irq(<Channel<N>>::IRQ);
        let mut events = 0;
        if sources.contains(InterruptSources::OVERFLOW) {
            events |= self.overflow_event();
        }
        if sources.contains(InterruptSources::MATCH_A) {
            events |= SR_CPAS;
        }
        if sources.contains(InterruptSources::MATCH_B) {
            events |= SR_CPBS;
        }
        trace!("TC{}: interrupt events {:#x}", N, events);
        self.write(ChannelReg::Ier, events);
    }

    /// Sources currently unmasked, in terms of [InterruptSources].
    pub fn enabled_interrupts(&self) -> InterruptSources {
        self.sources_from_events(self.read(ChannelReg::Imr))
    }

    /// Events latched since the last status read. Reading acknowledges
    /// them, so an interrupt handler should call this once per entry.
    pub fn pending_interrupts(&self) -> InterruptSources {
        let events = self.read(ChannelReg::Sr);
        self.sources_from_events(events)
    }

    /// Entry point for the channel's interrupt vector.
    ///
    /// Runs the handler installed with [Timer::set_interrupt_handler], or
    /// nothing if there is none.
    pub fn interrupt() {
        interrupt::dispatch(<Channel<N>>::INDEX);
    }

    /// Install the function [Timer::interrupt] runs for this channel.
    pub fn set_interrupt_handler(handler: fn()) {
        interrupt::set_handler(<Channel<N>>::INDEX, handler);
    }

    /// Go back to doing nothing on interrupt.
    pub fn clear_interrupt_handler() {
        interrupt::clear_handler(<Channel<N>>::INDEX);
    }

    // #endregion interrupts

    /// Borrow compare channel A as an embedded-hal PWM output.
    pub fn pwm_a(&mut self) -> PwmChannel<'_, N, B, PwmA> {
        PwmChannel::new(self)
    }

    /// Borrow compare channel B as an embedded-hal PWM output.
    pub fn pwm_b(&mut self) -> PwmChannel<'_, N, B, PwmB> {
        PwmChannel::new(self)
    }
}

/// `top * ratio`, rounded half away from zero. Negative products saturate to 0.
fn scale(top: u32, ratio: f32) -> u32 {
    libm::roundf(top as f32 * ratio) as u32
}
