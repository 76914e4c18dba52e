use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub date: NaiveDate,
    /// True when the resource does not work on `date`.
    pub closed: bool,
    /// Free slot start times, `HH:MM`, ascending.
    pub slots: Vec<String>,
}
