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

/// NVIC Interrupt Set-Enable registers
pub const NVIC_ISER: u32 = 0xE000_E100;
/// NVIC Interrupt Clear-Enable registers
pub const NVIC_ICER: u32 = 0xE000_E180;

/// Trait for accessing the peripheral registers of the chip
///
/// All accesses are 32-bit and take `&self`, the same way a
/// memory-mapped register does. Tests implement this with a register file.
pub trait Bus {
    /// Read the 32-bit register at `addr`
    fn read(&self, addr: u32) -> u32;
    /// Write the 32-bit register at `addr`
    fn write(&self, addr: u32, value: u32);
    /// Unmask interrupt line `irq` at the interrupt controller
    fn enable_irq(&self, irq: u16) {
        let (offset, mask) = nvic_slot(irq);
        self.write(NVIC_ISER + offset, mask);
    }
    /// Mask interrupt line `irq` at the interrupt controller
    fn disable_irq(&self, irq: u16) {
        let (offset, mask) = nvic_slot(irq);
        self.write(NVIC_ICER + offset, mask);
    }
}

/// Register offset and bit for `irq` in a NVIC enable bank
pub(crate) const fn nvic_slot(irq: u16) -> (u32, u32) {
    (4 * (irq as u32 / 32), 1 << (irq % 32))
}

/// Direct memory-mapped register access
///
/// This is a zero-sized handle: all state is in the hardware.
#[derive(Debug, Clone, Copy)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// Get a handle to the device registers.
    ///
    /// # Safety
    ///
    /// The caller must make sure no two [Timer](crate::Timer)s for the
    /// same channel exist at once.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl Bus for Mmio {
    fn read(&self, addr: u32) -> u32 {
        // SAFETY: addresses come from the channel binding table and point
        // at device registers, and Mmio::new() vouches for ownership
        unsafe { core::ptr::read_volatile(addr as usize as *const u32) }
    }

    fn write(&self, addr: u32, value: u32) {
        // SAFETY: see read()
        unsafe { core::ptr::write_volatile(addr as usize as *mut u32, value) }
    }

    #[cfg(feature = "cortex-m")]
    fn enable_irq(&self, irq: u16) {
        // SAFETY: unmasking may break a critical section, callers do this
        // outside of one
        unsafe { cortex_m::peripheral::NVIC::unmask(IrqLine(irq)) }
    }

    #[cfg(feature = "cortex-m")]
    fn disable_irq(&self, irq: u16) {
        cortex_m::peripheral::NVIC::mask(IrqLine(irq))
    }
}

#[cfg(feature = "cortex-m")]
#[derive(Clone, Copy)]
struct IrqLine(u16);

// SAFETY: lines come from the binding table, which only names valid
// device interrupts
#[cfg(feature = "cortex-m")]
unsafe impl cortex_m::interrupt::InterruptNumber for IrqLine {
    fn number(self) -> u16 {
        self.0
    }
}

impl<T: Bus + ?Sized> Bus for &T {
    fn read(&self, addr: u32) -> u32 {
        (**self).read(addr)
    }
    fn write(&self, addr: u32, value: u32) {
        (**self).write(addr, value)
    }
    fn enable_irq(&self, irq: u16) {
        (**self).enable_irq(irq)
    }
    fn disable_irq(&self, irq: u16) {
        (**self).disable_irq(irq)
    }
}
