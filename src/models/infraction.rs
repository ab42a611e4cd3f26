//! Modelo de Infraction
//!
//! Multas de trânsito ligadas a un vehículo. El conductor infractor se
//! resuelve cruzando la fecha de la infracción con los registros de uso.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_INFRACTION_STATUS: &str = "Pendente";

/// Infraction - mapea exactamente a la tabla infractions
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Infraction {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub vehicle_name: String,
    pub ticket_number: String,
    pub renainf: Option<String>,
    pub infraction_date: NaiveDate,
    pub infraction_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub infraction_type: Option<String>,
    pub offender: Option<String>,
    pub status: String,
    pub original_fine: Option<Decimal>,
    pub original_amount: Option<Decimal>,
    pub net_amount: Option<Decimal>,
    pub appeal_deadline: Option<NaiveDate>,
    pub identification_deadline: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub slip_printed: bool,
    pub driver_identified: bool,
    pub offending_driver_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Campos editables de una infracción (alta y edición comparten forma)
#[derive(Debug, Clone)]
pub struct InfractionData {
    pub vehicle_id: Uuid,
    pub vehicle_name: String,
    pub ticket_number: String,
    pub renainf: Option<String>,
    pub infraction_date: NaiveDate,
    pub infraction_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub infraction_type: Option<String>,
    pub offender: Option<String>,
    pub status: String,
    pub original_fine: Option<Decimal>,
    pub original_amount: Option<Decimal>,
    pub net_amount: Option<Decimal>,
    pub appeal_deadline: Option<NaiveDate>,
    pub identification_deadline: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub slip_printed: bool,
    pub offending_driver_id: Option<Uuid>,
}

impl Infraction {
    pub fn new(data: InfractionData) -> Self {
        let now = Utc::now();
        let mut infraction = Self {
            id: Uuid::new_v4(),
            vehicle_id: data.vehicle_id,
            vehicle_name: String::new(),
            ticket_number: String::new(),
            renainf: None,
            infraction_date: data.infraction_date,
            infraction_time: None,
            location: None,
            description: None,
            infraction_type: None,
            offender: None,
            status: String::new(),
            original_fine: None,
            original_amount: None,
            net_amount: None,
            appeal_deadline: None,
            identification_deadline: None,
            due_date: None,
            slip_printed: false,
            driver_identified: false,
            offending_driver_id: None,
            created_at: now,
            updated_at: now,
        };
        infraction.overwrite(data);
        infraction
    }

    /// Sustituye todos los campos editables
    pub fn overwrite(&mut self, data: InfractionData) {
        self.vehicle_id = data.vehicle_id;
        self.vehicle_name = data.vehicle_name;
        self.ticket_number = data.ticket_number;
        self.renainf = data.renainf;
        self.infraction_date = data.infraction_date;
        self.infraction_time = data.infraction_time;
        self.location = data.location;
        self.description = data.description;
        self.infraction_type = data.infraction_type;
        self.offender = data.offender;
        self.status = data.status;
        self.original_fine = data.original_fine;
        self.original_amount = data.original_amount;
        self.net_amount = data.net_amount;
        self.appeal_deadline = data.appeal_deadline;
        self.identification_deadline = data.identification_deadline;
        self.due_date = data.due_date;
        self.slip_printed = data.slip_printed;
        self.driver_identified = data.offending_driver_id.is_some();
        self.offending_driver_id = data.offending_driver_id;
        self.updated_at = Utc::now();
    }
}
