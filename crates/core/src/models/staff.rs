use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingHoursResponse {
    pub staff_id: Uuid,
    pub working_hours: Value,
    /// True when nothing is stored and the standard week is returned instead.
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateWorkingHoursRequest {
    pub working_hours: Value,
}
