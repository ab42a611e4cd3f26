//! Modelo de UsageRecord
//!
//! Un registro de uso cubre un ciclo reserva → retirada → devolución
//! de un vehículo por un conductor. Mapea la tabla `vehicle_usage`.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::UnknownVariant;

/// Estado del registro de uso
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UsageStatus {
    Reserved,
    InUse,
    Finalized,
}

impl UsageStatus {
    /// Estados que cuentan como registro abierto
    pub const OPEN: [UsageStatus; 2] = [UsageStatus::Reserved, UsageStatus::InUse];

    pub fn as_str(&self) -> &'static str {
        match self {
            UsageStatus::Reserved => "reserved",
            UsageStatus::InUse => "in_use",
            UsageStatus::Finalized => "finalized",
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, UsageStatus::Finalized)
    }

    /// Reserved → InUse → Finalized; Finalized es terminal
    pub fn can_transition_to(&self, next: UsageStatus) -> bool {
        matches!(
            (self, next),
            (UsageStatus::Reserved, UsageStatus::InUse) | (UsageStatus::InUse, UsageStatus::Finalized)
        )
    }
}

impl std::fmt::Display for UsageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for UsageStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "reserved" => Ok(UsageStatus::Reserved),
            "in_use" => Ok(UsageStatus::InUse),
            "finalized" => Ok(UsageStatus::Finalized),
            _ => Err(UnknownVariant { kind: "usage_status", value }),
        }
    }
}

/// Registro de uso - mapea exactamente a la tabla vehicle_usage
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UsageRecord {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub user_id: Uuid,
    pub driver_name: String,
    pub vehicle_name: String,
    #[sqlx(try_from = "String")]
    pub status: UsageStatus,
    pub reserved_on: NaiveDate,
    pub picked_up_on: Option<NaiveDate>,
    pub picked_up_at: Option<NaiveTime>,
    pub returned_on: Option<NaiveDate>,
    pub returned_at: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos de una reserva nueva
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub vehicle_id: Uuid,
    pub user_id: Uuid,
    pub driver_name: String,
    pub vehicle_name: String,
    pub reserved_on: NaiveDate,
}

/// Sello de fecha/hora de una transición
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Transición condicional: sólo se aplica si el registro sigue en `from`
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub usage_id: Uuid,
    pub from: UsageStatus,
    pub to: UsageStatus,
    pub stamp: Stamp,
}

impl UsageRecord {
    pub fn reserve(data: NewReservation) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            vehicle_id: data.vehicle_id,
            user_id: data.user_id,
            driver_name: data.driver_name,
            vehicle_name: data.vehicle_name,
            status: UsageStatus::Reserved,
            reserved_on: data.reserved_on,
            picked_up_on: None,
            picked_up_at: None,
            returned_on: None,
            returned_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Aplica la transición en memoria; devuelve false si el estado no coincide
    pub fn apply(&mut self, transition: &Transition) -> bool {
        if self.status != transition.from || !transition.from.can_transition_to(transition.to) {
            return false;
        }

        match transition.to {
            UsageStatus::InUse => {
                self.picked_up_on = Some(transition.stamp.date);
                self.picked_up_at = Some(transition.stamp.time);
            }
            UsageStatus::Finalized => {
                self.returned_on = Some(transition.stamp.date);
                self.returned_at = Some(transition.stamp.time);
            }
            UsageStatus::Reserved => return false,
        }

        self.status = transition.to;
        self.updated_at = Utc::now();
        true
    }

    /// Indica si el vehículo estaba en manos de este conductor en `date`
    pub fn covers(&self, date: NaiveDate) -> bool {
        match self.picked_up_on {
            Some(start) => start <= date && self.returned_on.map_or(true, |end| date <= end),
            None => false,
        }
    }
}
