use serde::Deserialize;
use validator::ValidationErrors;

use crate::models::usage::Stamp;
use crate::utils::clock::Clock;
use crate::utils::errors::AppError;
use crate::utils::validation::{validate_date, validate_time};

/// Fecha/hora tecleadas en la consola de reservas.
/// Lo que no se indique se toma del reloj.
#[derive(Debug, Default, Deserialize)]
pub struct StampRequest {
    pub date: Option<String>,
    pub time: Option<String>,
}

impl StampRequest {
    pub fn to_stamp(&self, clock: &dyn Clock) -> Result<Option<Stamp>, AppError> {
        if self.date.is_none() && self.time.is_none() {
            return Ok(None);
        }

        let mut errors = ValidationErrors::new();
        let date = match self.date.as_deref().map(validate_date) {
            Some(Ok(date)) => date,
            Some(Err(e)) => {
                errors.add("date", e);
                clock.today()
            }
            None => clock.today(),
        };
        let time = match self.time.as_deref().map(validate_time) {
            Some(Ok(time)) => time,
            Some(Err(e)) => {
                errors.add("time", e);
                clock.now_time()
            }
            None => clock.now_time(),
        };

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        Ok(Some(Stamp { date, time }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::FixedClock;
    use chrono::{NaiveDate, NaiveTime};

    fn clock() -> FixedClock {
        FixedClock::new(
            NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_empty_request_uses_clock() {
        assert_eq!(StampRequest::default().to_stamp(&clock()).unwrap(), None);
    }

    #[test]
    fn test_partial_request_fills_from_clock() {
        let request = StampRequest {
            date: None,
            time: Some("17:30".to_string()),
        };
        let stamp = request.to_stamp(&clock()).unwrap().unwrap();
        assert_eq!(stamp.date, NaiveDate::from_ymd_opt(2025, 6, 10).unwrap());
        assert_eq!(stamp.time, NaiveTime::from_hms_opt(17, 30, 0).unwrap());
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let request = StampRequest {
            date: Some("10/06/2025".to_string()),
            time: None,
        };
        assert!(matches!(request.to_stamp(&clock()), Err(AppError::Validation(_))));
    }
}
