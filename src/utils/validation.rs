//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! usadas por los DTOs (`#[validate(custom = ...)]`) y los controladores.

use chrono::{NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Placa antigua (ABC1234) o Mercosul (ABC1D23), con guion opcional
    static ref LICENSE_PLATE_REGEX: Regex =
        Regex::new(r"^[A-Z]{3}-?[0-9][A-Z0-9][0-9]{2}$").expect("valid license plate regex");
}

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar y convertir string a tiempo (acepta `HH:MM:SS` y `HH:MM`)
pub fn validate_time(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| {
            let mut error = ValidationError::new("time");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"HH:MM:SS".to_string());
            error
        })
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Normaliza una placa: mayúsculas, sin espacios ni guiones
pub fn normalize_license_plate(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .collect::<String>()
        .to_uppercase()
}

/// Validar formato de placa de vehículo
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    let normalized = value.trim().to_uppercase();
    if !LICENSE_PLATE_REGEX.is_match(&normalized) {
        let mut error = ValidationError::new("license_plate");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"ABC1234 / ABC1D23".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar número de registro (RENAVAM): 9 a 11 dígitos
pub fn validate_registration_number(value: &str) -> Result<(), ValidationError> {
    let digits = value.trim();
    if digits.len() < 9 || digits.len() > 11 || !digits.chars().all(|c| c.is_ascii_digit()) {
        let mut error = ValidationError::new("registration_number");
        error.add_param("value".into(), &value.to_string());
        error.add_param("length".into(), &"9-11 digits".to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-01-15").is_ok());
        assert!(validate_date("15/01/2024").is_err());
    }

    #[test]
    fn test_validate_time_accepts_short_form() {
        assert_eq!(validate_time("08:15").unwrap().to_string(), "08:15:00");
        assert_eq!(validate_time("08:15:30").unwrap().to_string(), "08:15:30");
        assert!(validate_time("25:00").is_err());
    }

    #[test]
    fn test_validate_license_plate() {
        assert!(validate_license_plate("ABC1234").is_ok());
        assert!(validate_license_plate("abc-1234").is_ok());
        assert!(validate_license_plate("BRA2E19").is_ok());
        assert!(validate_license_plate("AB-123-CD").is_err());
        assert!(validate_license_plate("").is_err());
    }

    #[test]
    fn test_normalize_license_plate() {
        assert_eq!(normalize_license_plate("abc-1234"), "ABC1234");
        assert_eq!(normalize_license_plate(" bra 2e19 "), "BRA2E19");
    }

    #[test]
    fn test_validate_registration_number() {
        assert!(validate_registration_number("00123456789").is_ok());
        assert!(validate_registration_number("12345678").is_err());
        assert!(validate_registration_number("1234567890A").is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Fiat Uno").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }
}
