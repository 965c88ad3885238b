use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    /// Refetch stock and restock times.
    Stock,
    /// Refetch weather events.
    Weather,
    /// Recompute countdown text only.
    Clock,
}

#[derive(Debug)]
struct Slot {
    timer: Timer,
    period: Duration,
    next: Instant,
}

/// Periodic timers multiplexed over one heartbeat.
///
/// Every timer is due immediately after construction. A timer that missed
/// several periods fires once, then realigns to `now + period`.
#[derive(Debug)]
pub struct Scheduler {
    slots: Vec<Slot>,
}

impl Scheduler {
    pub fn new(now: Instant, timers: impl IntoIterator<Item = (Timer, Duration)>) -> Self {
        let slots = timers
            .into_iter()
            .map(|(timer, period)| Slot {
                timer,
                period: period.max(Duration::from_millis(1)),
                next: now,
            })
            .collect();
        Self { slots }
    }

    pub fn due(&mut self, now: Instant) -> Vec<Timer> {
        self.slots
            .iter_mut()
            .filter(|slot| slot.next <= now)
            .map(|slot| {
                slot.next += slot.period;
                if slot.next <= now {
                    slot.next = now + slot.period;
                }
                slot.timer
            })
            .collect()
    }

    /// Greatest common divisor of all periods, so every timer lands on a beat.
    /// `None` once cancelled.
    pub fn heartbeat(&self) -> Option<Duration> {
        self.slots
            .iter()
            .map(|slot| millis(slot.period))
            .reduce(gcd)
            .map(Duration::from_millis)
    }

    pub fn cancel_all(&mut self) {
        self.slots.clear();
    }
}

fn millis(period: Duration) -> u64 {
    u64::try_from(period.as_millis()).unwrap_or(u64::MAX).max(1)
}

const fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
