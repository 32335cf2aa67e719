use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use sam_timers::{Bus, Error, InterruptSources, Timer, TimerMode};

const TC0_CH2: u32 = 0x4008_0000 + 2 * 0x40;
const CMR: u32 = TC0_CH2 + 0x04;
const RC: u32 = TC0_CH2 + 0x1C;
const IER: u32 = TC0_CH2 + 0x24;

/// Plain register memory that records every write.
#[derive(Default)]
struct Recorder {
    regs: RefCell<HashMap<u32, u32>>,
    writes: RefCell<Vec<(u32, u32)>>,
}

impl Recorder {
    fn get(&self, addr: u32) -> u32 {
        self.regs.borrow().get(&addr).copied().unwrap_or(0)
    }
    fn written(&self, addr: u32) -> Vec<u32> {
        self.writes
            .borrow()
            .iter()
            .filter(|(a, _)| *a == addr)
            .map(|(_, v)| *v)
            .collect()
    }
}

impl Bus for Recorder {
    fn read(&self, addr: u32) -> u32 {
        self.get(addr)
    }
    fn write(&self, addr: u32, value: u32) {
        self.writes.borrow_mut().push((addr, value));
        self.regs.borrow_mut().insert(addr, value);
    }
}

#[test_log::test]
fn one_khz_up_to_match() {
    let bus = Recorder::default();
    let mut timer: Timer<2, &Recorder> = Timer::new(&bus);
    assert_eq!(
        timer.set_mode_and_frequency(TimerMode::UpToMatch, 1000),
        Ok(1000)
    );
    // MCK/2 is the first prescaler that fits
    assert_eq!(bus.get(CMR) & 0x7, 0);
    assert_eq!(bus.get(RC), 42_000);
    assert_eq!(timer.top_value(), 42_000);
}

#[test]
fn every_prescaler_reports_truncated_frequency() {
    let mck = 84_000_000u32;
    for (freq, clock, divisor) in [(5000u32, 0u32, 2u32), (300, 1, 8), (75, 2, 32), (15, 3, 128)] {
        let bus = Recorder::default();
        let mut timer: Timer<2, &Recorder> = Timer::new(&bus);
        let top = mck / (divisor * freq);
        assert_eq!(
            timer.set_mode_and_frequency(TimerMode::UpDownToMatch, freq),
            Ok(mck / (divisor * top))
        );
        assert_eq!(bus.get(CMR) & 0x7, clock);
        assert_eq!(bus.get(RC), top);
    }
}

#[test_log::test]
fn above_half_master_clock_is_unattainable() {
    let bus = Recorder::default();
    let mut timer: Timer<2, &Recorder> = Timer::new(&bus);
    assert_eq!(
        timer.set_mode_and_frequency(TimerMode::UpToMatch, 50_000_000),
        Err(Error::FrequencyUnattainable)
    );
    assert_eq!(bus.get(CMR), 0xC000);
    assert!(bus.written(RC).is_empty());
}

#[test]
fn other_master_clock() {
    let bus = Recorder::default();
    let mut timer: Timer<2, &Recorder> = Timer::with_master_clock(&bus, 48_000_000);
    assert_eq!(timer.master_clock(), 48_000_000);
    assert_eq!(
        timer.set_mode_and_frequency(TimerMode::UpToMatch, 1000),
        Ok(1000)
    );
    assert_eq!(bus.get(RC), 24_000);
}

#[test]
fn overflow_interrupt_uses_rc_compare() {
    let bus = Recorder::default();
    let mut timer: Timer<2, &Recorder> = Timer::new(&bus);
    timer
        .set_mode_and_frequency(TimerMode::UpToMatch, 1000)
        .unwrap();
    timer.set_interrupts(InterruptSources::OVERFLOW);
    // CPCS, not COVFS
    assert_eq!(bus.written(IER), [1 << 4]);
    // TC2_IRQn = 29 in the first NVIC bank
    assert_eq!(bus.get(0xE000_E100), 1 << 29);
}

static TICKS: AtomicU32 = AtomicU32::new(0);

fn tick() {
    TICKS.fetch_add(1, Ordering::SeqCst);
}

#[test]
fn vector_forwards_to_handler() {
    Timer::<2, &Recorder>::interrupt();
    assert_eq!(TICKS.load(Ordering::SeqCst), 0);
    Timer::<2, &Recorder>::set_interrupt_handler(tick);
    Timer::<2, &Recorder>::interrupt();
    Timer::<2, &Recorder>::interrupt();
    assert_eq!(TICKS.load(Ordering::SeqCst), 2);
}
