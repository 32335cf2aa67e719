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

//! Register file standing in for the TC, PMC and NVIC in unit tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::vec::Vec;

use crate::binding::TC0_BASE;
use crate::bus::{Bus, NVIC_ICER, NVIC_ISER};
use crate::timer::registers::*;

const TC_END: u32 = TC0_BASE + 3 * 0x4000;
const TC_BLOCK: u32 = 0x4000;

#[derive(Default)]
pub(crate) struct FakeBus {
    regs: RefCell<BTreeMap<u32, u32>>,
    writes: RefCell<Vec<(u32, u32)>>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register value without read side effects.
    pub fn peek(&self, addr: u32) -> u32 {
        self.regs.borrow().get(&addr).copied().unwrap_or(0)
    }

    /// Set a register, bypassing write semantics.
    pub fn poke(&self, addr: u32, value: u32) {
        self.regs.borrow_mut().insert(addr, value);
    }

    /// Latch events in a status register, as the hardware would.
    pub fn raise(&self, sr_addr: u32, events: u32) {
        let value = self.peek(sr_addr) | events;
        self.poke(sr_addr, value);
    }

    /// Every value written to `addr`, in order.
    pub fn writes_to(&self, addr: u32) -> Vec<u32> {
        self.writes
            .borrow()
            .iter()
            .filter(|(a, _)| *a == addr)
            .map(|(_, v)| *v)
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }

    pub fn irq_enabled(&self, irq: u16) -> bool {
        let (offset, mask) = crate::bus::nvic_slot(irq);
        self.peek(NVIC_ISER + offset) & mask != 0
    }

    fn update(&self, addr: u32, f: impl FnOnce(u32) -> u32) {
        let value = f(self.peek(addr));
        self.poke(addr, value);
    }

    /// Offset inside a channel block, if `addr` is a TC channel register.
    fn channel_offset(addr: u32) -> Option<(u32, u32)> {
        if !(TC0_BASE..TC_END).contains(&addr) {
            return None;
        }
        let rel = (addr - TC0_BASE) % TC_BLOCK;
        if rel >= 3 * CHANNEL_STRIDE {
            return None;
        }
        Some((addr - rel % CHANNEL_STRIDE, rel % CHANNEL_STRIDE))
    }
}

impl Bus for FakeBus {
    fn read(&self, addr: u32) -> u32 {
        let value = self.peek(addr);
        if let Some((_, offset)) = Self::channel_offset(addr) {
            if offset == ChannelReg::Sr as u32 {
                // event bits clear on read, line levels and CLKSTA stay
                self.poke(addr, value & 0xFFFF_0000);
            }
        }
        value
    }

    fn write(&self, addr: u32, value: u32) {
        self.writes.borrow_mut().push((addr, value));
        if let Some((chan, offset)) = Self::channel_offset(addr) {
            let sr = chan + ChannelReg::Sr as u32;
            let imr = chan + ChannelReg::Imr as u32;
            match offset {
                o if o == ChannelReg::Ccr as u32 => {
                    if value & CCR_CLKDIS != 0 {
                        self.update(sr, |v| v & !SR_CLKSTA);
                    } else if value & CCR_CLKEN != 0 {
                        self.update(sr, |v| v | SR_CLKSTA);
                    }
                    if value & CCR_SWTRG != 0 {
                        self.poke(chan + ChannelReg::Cv as u32, 0);
                    }
                }
                o if o == ChannelReg::Ier as u32 => self.update(imr, |v| v | value),
                o if o == ChannelReg::Idr as u32 => self.update(imr, |v| v & !value),
                _ => self.poke(addr, value),
            }
            return;
        }
        let pmc = |reg: PmcReg| PMC_BASE + reg as u32;
        match addr {
            a if a == pmc(PmcReg::Pcer0) => self.update(pmc(PmcReg::Pcsr0), |v| v | value),
            a if a == pmc(PmcReg::Pcdr0) => self.update(pmc(PmcReg::Pcsr0), |v| v & !value),
            a if a == pmc(PmcReg::Pcer1) => self.update(pmc(PmcReg::Pcsr1), |v| v | value),
            a if a == pmc(PmcReg::Pcdr1) => self.update(pmc(PmcReg::Pcsr1), |v| v & !value),
            a if (NVIC_ICER..NVIC_ICER + 0x20).contains(&a) => {
                self.update(a - NVIC_ICER + NVIC_ISER, |v| v & !value)
            }
            a if (NVIC_ISER..NVIC_ISER + 0x20).contains(&a) => self.update(a, |v| v | value),
            _ => self.poke(addr, value),
        }
    }
}
