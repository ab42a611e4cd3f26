use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::infraction::{InfractionData, DEFAULT_INFRACTION_STATUS};
use crate::utils::validation::validate_not_empty;

// Alta/edición de una multa
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InfractionRequest {
    pub vehicle_id: Uuid,
    #[validate(custom = "validate_not_empty")]
    pub ticket_number: String,
    pub renainf: Option<String>,
    pub infraction_date: NaiveDate,
    pub infraction_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub infraction_type: Option<String>,
    pub offender: Option<String>,
    pub status: Option<String>,
    pub original_fine: Option<Decimal>,
    pub original_amount: Option<Decimal>,
    pub net_amount: Option<Decimal>,
    pub appeal_deadline: Option<NaiveDate>,
    pub identification_deadline: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub slip_printed: bool,
}

impl InfractionRequest {
    pub fn into_data(self, vehicle_name: String, offending_driver_id: Option<Uuid>) -> InfractionData {
        InfractionData {
            vehicle_id: self.vehicle_id,
            vehicle_name,
            ticket_number: self.ticket_number.trim().to_string(),
            renainf: self.renainf,
            infraction_date: self.infraction_date,
            infraction_time: self.infraction_time,
            location: self.location,
            description: self.description,
            infraction_type: self.infraction_type,
            offender: self.offender,
            status: self
                .status
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_INFRACTION_STATUS.to_string()),
            original_fine: self.original_fine,
            original_amount: self.original_amount,
            net_amount: self.net_amount,
            appeal_deadline: self.appeal_deadline,
            identification_deadline: self.identification_deadline,
            due_date: self.due_date,
            slip_printed: self.slip_printed,
            offending_driver_id,
        }
    }
}
