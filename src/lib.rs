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

//! SAM3X Timer-Counter library
//!
//! Every Timer-Counter (TC) channel of the SAM3X is an independent 32-bit
//! counter, and this crate treats each of them as its own [Timer]. The
//! channel is picked at compile time with a const index, so
//! `Timer<0>` .. `Timer<8>` bind to TC0 channel 0 .. TC2 channel 2.
//!
//! The main entry point is [Timer::set_mode_and_frequency], which picks a
//! clock prescaler and a TOP value for the requested frequency.
//!
//! Basic usage:
//! ```no_run
//! # use sam_timers::{Timer, TimerMode, InterruptSources, Mmio};
//! fn tick() {
//!     // called from the TC3 vector
//! }
//! // SAFETY: nothing else touches TC1 channel 0
//! let mut timer = Timer::<3, Mmio>::new(unsafe { Mmio::new() });
//! let actual = timer.set_mode_and_frequency(TimerMode::UpToMatch, 1000);
//! Timer::<3, Mmio>::set_interrupt_handler(tick);
//! timer.set_interrupts(InterruptSources::OVERFLOW);
//! timer.start();
//! ```
//!
//! The interrupt vector itself belongs to the application, it only has to
//! forward to [Timer::interrupt]:
//! ```ignore
//! #[interrupt]
//! fn TC3() {
//!     Timer::<3, Mmio>::interrupt();
//! }
//! ```
#![cfg_attr(not(test), no_std)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

#[cfg(feature = "defmt")]
pub(crate) use defmt::{debug, trace, warn};
#[cfg(not(feature = "defmt"))]
pub(crate) use log::{debug, trace, warn};

#[cfg(not(any(feature = "log", feature = "defmt")))]
compile_error!("enable the `log` or `defmt` feature");

mod binding;
pub mod bus;
pub mod errors;
mod interrupt;
mod timer;

#[cfg(test)]
mod fake;

pub use binding::{Channel, ChannelBinding, CHANNEL_COUNT};
pub use bus::{Bus, Mmio};
pub use errors::Error;
pub use timer::{
    ClockSelect, InterruptSources, OutputAction, PwmA, PwmB, PwmChannel, Timer, TimerMode,
    DEFAULT_MASTER_CLOCK_HZ, PRESCALERS, TOP_MAX,
};
