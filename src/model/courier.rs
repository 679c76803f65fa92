//! Delivery couriers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Couriers, shown as `DP-<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CourierId(pub u32);

impl From<u32> for CourierId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for CourierId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DP-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourierStatus {
    Available,
    Busy,
    Offline,
}

impl Display for CourierStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CourierStatus::Available => "available",
            CourierStatus::Busy => "busy",
            CourierStatus::Offline => "offline",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Courier {
    pub id: CourierId,
    pub name: String,
    pub phone: String,
    pub status: CourierStatus,
    pub active: bool,
    /// En-route orders currently linked to this courier.
    pub active_orders: u32,
    pub created_at: DateTime<Utc>,
}

impl Courier {
    pub fn new(id: CourierId, params: CourierCreate, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: params.name.trim().to_string(),
            phone: params.phone.trim().to_string(),
            status: CourierStatus::Available,
            active: true,
            active_orders: 0,
            created_at: now,
        }
    }

    /// Status implied by the workload. `Offline` is only left on request.
    pub fn derived_status(&self) -> CourierStatus {
        match (self.status, self.active_orders) {
            (CourierStatus::Offline, _) => CourierStatus::Offline,
            (_, 0) => CourierStatus::Available,
            _ => CourierStatus::Busy,
        }
    }

    /// Can take a new delivery right now.
    pub fn is_assignable(&self) -> bool {
        self.active && self.status == CourierStatus::Available
    }
}

#[derive(Debug, Clone)]
pub struct CourierCreate {
    pub name: String,
    pub phone: String,
}

/// Manual edits. A requested status other than `Offline` is re-derived from the workload.
#[derive(Debug, Clone, Default)]
pub struct CourierUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub status: Option<CourierStatus>,
}

/// Roster order used by the admin board: available, then busy, then offline.
pub fn sort_roster(couriers: &mut [Courier]) {
    couriers.sort_by(|a, b| a.status.cmp(&b.status).then_with(|| a.id.cmp(&b.id)));
}
