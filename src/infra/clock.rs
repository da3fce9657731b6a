//! Источник текущего времени.

use std::cell::Cell;

use chrono::{Duration, Local, NaiveDateTime};

use crate::domain::time::truncate_to_seconds;

pub trait Clock {
    /// Текущее локальное время, без долей секунды.
    fn now(&self) -> NaiveDateTime;
}

/// Системные часы (локальное время).
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        truncate_to_seconds(Local::now().naive_local())
    }
}

/// Часы, которые стоят, пока их не подвинут. Для тестов.
#[derive(Clone, Debug)]
pub struct FixedClock {
    now: Cell<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Cell::new(truncate_to_seconds(now)),
        }
    }

    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(truncate_to_seconds(now));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}
