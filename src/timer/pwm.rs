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

use core::convert::Infallible;
use core::marker::PhantomData;

use embedded_hal::pwm::{ErrorType, SetDutyCycle};

use super::Timer;
use crate::binding::{Channel, ChannelBinding};
use crate::bus::Bus;

/// Compare channel A (RA, TIOA)
pub struct PwmA;
/// Compare channel B (RB, TIOB)
pub struct PwmB;

/// One compare register of a [Timer] as an embedded-hal PWM output.
///
/// The duty range is TOP, capped at `u16::MAX` since embedded-hal counts
/// in 16 bits. Reconfiguring the timer changes the range under an
/// existing duty cycle, which is why this only borrows the timer.
pub struct PwmChannel<'a, const N: u8, B: Bus, C>
where
    Channel<N>: ChannelBinding,
{
    timer: &'a mut Timer<N, B>,
    _channel: PhantomData<C>,
}

impl<'a, const N: u8, B: Bus, C> PwmChannel<'a, N, B, C>
where
    Channel<N>: ChannelBinding,
{
    pub(super) fn new(timer: &'a mut Timer<N, B>) -> Self {
        Self {
            timer,
            _channel: PhantomData,
        }
    }

    fn max_duty(&self) -> u16 {
        self.timer.top_value().min(u16::MAX as u32) as u16
    }
}

impl<const N: u8, B: Bus, C> ErrorType for PwmChannel<'_, N, B, C>
where
    Channel<N>: ChannelBinding,
{
    type Error = Infallible;
}

impl<const N: u8, B: Bus> SetDutyCycle for PwmChannel<'_, N, B, PwmA>
where
    Channel<N>: ChannelBinding,
{
    fn max_duty_cycle(&self) -> u16 {
        self.max_duty()
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.timer.set_duty_cycle_a_absolute(duty as u32);
        Ok(())
    }
}

impl<const N: u8, B: Bus> SetDutyCycle for PwmChannel<'_, N, B, PwmB>
where
    Channel<N>: ChannelBinding,
{
    fn max_duty_cycle(&self) -> u16 {
        self.max_duty()
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.timer.set_duty_cycle_b_absolute(duty as u32);
        Ok(())
    }
}
