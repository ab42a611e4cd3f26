//! Backend de gestión de frota
//!
//! Reservas, retiradas y devoluciones de vehículos, con administración de
//! vehículos, usuarios y multas de trânsito.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
