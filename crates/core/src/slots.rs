//! # Slot Generator
//!
//! Enumerates fixed-width candidate slots inside an open interval and keeps
//! the ones that do not overlap any busy interval.
//!
//! Candidates start at the open interval's first minute and advance by the
//! [`Stride`] policy. With the default [`Stride::SlotDuration`], a rejected
//! candidate is skipped a whole slot width at a time; the generator never
//! retries inside a rejected window, so a short booking can hide a slot that
//! would have fit at a different offset.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::schedule::DaySchedule;
use crate::time::{Minutes, TimeInterval, format_time_of_day, overlaps, parse_time_of_day};

/// How far the generator advances between candidate slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stride {
    /// Advance by the slot width.
    #[default]
    SlotDuration,
    /// Advance by a fixed number of minutes regardless of slot width.
    Every(Minutes),
}

impl Stride {
    fn step(&self, slot_duration: Minutes) -> Minutes {
        match self {
            Stride::SlotDuration => slot_duration,
            Stride::Every(minutes) => *minutes,
        }
    }
}

/// A bookable candidate window. Serialized as its `HH:MM` start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub interval: TimeInterval,
}

impl Slot {
    pub fn start(&self) -> Minutes {
        self.interval.start
    }

    pub fn label(&self) -> String {
        format_time_of_day(self.interval.start)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotGenerator {
    stride: Stride,
}

impl SlotGenerator {
    pub fn new(stride: Stride) -> Self {
        Self { stride }
    }

    pub fn stride(&self) -> Stride {
        self.stride
    }

    /// Free slots of `slot_duration` minutes inside `open`.
    ///
    /// An empty or inverted `open`, or a non-positive duration or stride,
    /// yields no slots rather than an error. `busy` may be unsorted and may
    /// overlap itself.
    pub fn generate(
        &self,
        open: TimeInterval,
        slot_duration: Minutes,
        busy: &[TimeInterval],
    ) -> Vec<Slot> {
        let step = self.stride.step(slot_duration);
        if open.is_empty() || slot_duration <= 0 || step <= 0 {
            return Vec::new();
        }

        let mut slots = Vec::new();
        let mut current = open.start;
        while current
            .checked_add(slot_duration)
            .is_some_and(|end| end <= open.end)
        {
            let candidate = TimeInterval::starting_at(current, slot_duration);
            if !busy.iter().any(|b| overlaps(&candidate, b)) {
                slots.push(Slot {
                    interval: candidate,
                });
            }
            let Some(next) = current.checked_add(step) else {
                break;
            };
            current = next;
        }
        slots
    }

    /// Free slots for a resolved day. A closed day has none, whatever is busy.
    pub fn generate_for_day(
        &self,
        day: DaySchedule,
        slot_duration: Minutes,
        busy: &[TimeInterval],
    ) -> Vec<Slot> {
        match day {
            DaySchedule::Open(open) => self.generate(open, slot_duration, busy),
            DaySchedule::Closed => Vec::new(),
        }
    }
}

/// String-boundary form of [`SlotGenerator::generate`] with the default
/// stride: takes `HH:MM` bounds and returns `HH:MM` start times.
///
/// Unparseable bounds yield no slots.
pub fn slot_times(start: &str, end: &str, slot_duration: Minutes, busy: &[TimeInterval]) -> Vec<String> {
    let (Ok(start), Ok(end)) = (parse_time_of_day(start), parse_time_of_day(end)) else {
        return Vec::new();
    };
    SlotGenerator::default()
        .generate(TimeInterval::new(start, end), slot_duration, busy)
        .iter()
        .map(Slot::label)
        .collect()
}
