//! Reloj local para sellar reservas, retiradas y devoluciones
//!
//! Las fechas se guardan como `YYYY-MM-DD` y las horas como `HH:MM:SS`
//! (sin fracciones de segundo).

use chrono::{Local, NaiveDate, NaiveTime, Timelike};

/// Fuente de fecha/hora local inyectada en los servicios
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
    fn now_time(&self) -> NaiveTime;
}

/// Reloj de pared de la máquina
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_time(&self) -> NaiveTime {
        truncate_to_seconds(Local::now().time())
    }
}

/// Reloj fijo, útil en tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl FixedClock {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            date,
            time: truncate_to_seconds(time),
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date
    }

    fn now_time(&self) -> NaiveTime {
        self.time
    }
}

fn truncate_to_seconds(time: NaiveTime) -> NaiveTime {
    time.with_nanosecond(0).unwrap_or(time)
}
