//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: el ciclo de
//! vida de las reservas, la autenticación y la identificación de conductores
//! en las multas.

pub mod auth_service;
pub mod infraction_service;
pub mod reservation_service;

pub use auth_service::AuthService;
pub use infraction_service::InfractionService;
pub use reservation_service::{Rejection, ReservationService, Session};
