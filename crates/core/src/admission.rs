//! # Booking Admission
//!
//! Decides whether a proposed booking conflicts with the existing bookings of
//! the same resource on the same date. Uses the same overlap predicate as the
//! slot generator, so the slots offered and the bookings accepted never
//! disagree.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::time::{TimeInterval, overlaps};

/// Whose calendar a busy-interval lookup covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum ResourceScope {
    /// One staff member of a business.
    Staff { business_id: Uuid, staff_id: Uuid },
    /// The business as a whole, used when no staff member is selected.
    Business { business_id: Uuid },
}

impl ResourceScope {
    pub fn new(business_id: Uuid, staff_id: Option<Uuid>) -> Self {
        match staff_id {
            Some(staff_id) => ResourceScope::Staff {
                business_id,
                staff_id,
            },
            None => ResourceScope::Business { business_id },
        }
    }

    pub fn business_id(&self) -> Uuid {
        match self {
            ResourceScope::Staff { business_id, .. } | ResourceScope::Business { business_id } => {
                *business_id
            }
        }
    }

    pub fn staff_id(&self) -> Option<Uuid> {
        match self {
            ResourceScope::Staff { staff_id, .. } => Some(*staff_id),
            ResourceScope::Business { .. } => None,
        }
    }

    /// Stable key identifying the resource calendar of one date, suitable for
    /// serialising concurrent admissions on the same calendar.
    pub fn calendar_key(&self, date: NaiveDate) -> String {
        match self {
            ResourceScope::Staff { staff_id, .. } => format!("staff:{staff_id}:{date}"),
            ResourceScope::Business { business_id } => format!("business:{business_id}:{date}"),
        }
    }

    /// Keys to lock, in order, before admitting a booking in this scope.
    ///
    /// A business-scope admission reads every staff booking of the business,
    /// so every admission takes the business key first; staff admissions then
    /// also take their own key. The fixed order keeps lock waits acyclic.
    pub fn lock_keys(&self, date: NaiveDate) -> Vec<String> {
        let business = ResourceScope::Business {
            business_id: self.business_id(),
        };
        match self {
            ResourceScope::Staff { .. } => {
                vec![business.calendar_key(date), self.calendar_key(date)]
            }
            ResourceScope::Business { .. } => vec![self.calendar_key(date)],
        }
    }
}

/// Read-only view of the busy intervals of one resource on one date.
///
/// Implementations return the intervals of every non-cancelled booking in
/// `scope` on `date`.
#[async_trait]
pub trait BusyIntervalSource: Send + Sync {
    async fn busy_intervals(
        &self,
        scope: &ResourceScope,
        date: NaiveDate,
    ) -> eyre::Result<Vec<TimeInterval>>;
}

/// First busy interval that overlaps `proposed`, if any.
pub fn find_conflict(proposed: &TimeInterval, busy: &[TimeInterval]) -> Option<TimeInterval> {
    busy.iter().copied().find(|b| overlaps(proposed, b))
}

pub fn has_conflict(proposed: &TimeInterval, busy: &[TimeInterval]) -> bool {
    find_conflict(proposed, busy).is_some()
}

/// Admits `proposed` or fails with [`BookingError::SlotUnavailable`].
pub fn admit(proposed: &TimeInterval, busy: &[TimeInterval]) -> BookingResult<()> {
    match find_conflict(proposed, busy) {
        Some(existing) => Err(BookingError::SlotUnavailable(format!(
            "{proposed} overlaps existing booking {existing}"
        ))),
        None => Ok(()),
    }
}
