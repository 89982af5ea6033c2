use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use practicas_backend::config::environment::EnvironmentConfig;
use practicas_backend::database::DatabaseConnection;
use practicas_backend::{create_app_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging: RUST_LOG tiene prioridad sobre la configuración
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🎓 Gestión de prácticas - API de asignaciones");
    info!("================================================");
    info!("🌍 Entorno: {}", config.environment);

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::connect(&config).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    if let Err(e) = db_connection.run_migrations().await {
        error!("❌ Error aplicando migraciones: {}", e);
        return Err(anyhow::anyhow!("Error de migraciones: {}", e));
    }
    info!("✅ Migraciones aplicadas");

    let addr = config.socket_addr()?;
    let app_state = AppState::new(db_connection.pool().clone(), config.clone());
    let app = create_app_router(app_state);

    info!("🌐 Servidor iniciando en {}", config.server_url());
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("👩‍🎓 Aprendices:");
    info!("   GET/POST /api/apprentices - Listar / registrar");
    info!("   GET  /api/apprentices/available - Aprendices sin asignación activa");
    info!("🏢 Empresas:");
    info!("   GET/POST /api/companies - Listar / registrar");
    info!("   GET/PUT/DELETE /api/companies/:id - Detalle / editar / eliminar");
    info!("   GET  /api/companies/:id/statistics - Estadísticas");
    info!("   GET/POST /api/companies/:id/assignments - Asignaciones / asignar aprendiz");
    info!("📋 Asignaciones:");
    info!("   GET/POST /api/assignments - Listar / proponer");
    info!("   POST /api/assignments/:id/{{confirm,reject,cancel,start}} - Transiciones");
    info!("   POST /api/assignments/batch/{{confirm,reject}} - Acciones masivas");
    info!("📓 Etapas de práctica:");
    info!("   GET/POST /api/placements - Listar / registrar");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
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
