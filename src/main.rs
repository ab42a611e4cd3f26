use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use dotenvy::dotenv;

use fleet_manager::config::{database::DatabaseConfig, EnvironmentConfig, StoreBackend};
use fleet_manager::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚙 Fleet Manager - Reservas de vehículos");
    info!("========================================");

    let config = EnvironmentConfig::from_env()?;

    let app_state = match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL no configurada"))?;
            let pool = match DatabaseConfig::new(url).create_pool().await {
                Ok(pool) => pool,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            AppState::from_pool(pool, config.clone())
        }
        StoreBackend::Memory => {
            info!("🧪 Usando store en memoria (los datos se pierden al reiniciar)");
            AppState::in_memory(config.clone())
        }
    };

    let app = create_router(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Estado del servicio");
    info!("🔐 Auth:");
    info!("   POST /api/auth/register - Registro de conductor");
    info!("   POST /api/auth/login - Login");
    info!("   GET  /api/auth/me - Usuario actual");
    info!("🚗 Frota:");
    info!("   GET  /api/fleet - Vehículos con ocupante");
    info!("   POST /api/fleet/:vehicle_id/reserve - Reservar");
    info!("   POST /api/fleet/:vehicle_id/pickup - Retirar");
    info!("   POST /api/fleet/:vehicle_id/return - Devolver");
    info!("🛠️ Administración:");
    info!("   GET  /api/reservations - Consola de reservas");
    info!("   POST /api/reservations/:usage_id/pickup|return - Retirada/devolución manual");
    info!("   CRUD /api/vehicles - Vehículos");
    info!("   GET|POST /api/users, PATCH /api/users/:id/active|role - Usuarios");
    info!("   GET|POST /api/infractions, PUT /api/infractions/:id - Multas");
    info!("   GET  /api/usage - Historial de uso");
    info!("   GET  /api/dashboard - Panel");
    info!("👤 Conductor:");
    info!("   GET  /api/usage/me - Mi historial");
    info!("   GET  /api/infractions/me - Mis multas");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
