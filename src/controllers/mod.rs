//! Controladores HTTP

pub mod auth_controller;
pub mod infraction_controller;
pub mod report_controller;
pub mod reservation_controller;
pub mod user_controller;
pub mod vehicle_controller;
