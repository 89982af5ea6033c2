//! Configuración de conexión a PostgreSQL
//!
//! Este módulo maneja la conexión a la base de datos y la aplicación
//! de las migraciones del esquema de prácticas.

use sqlx::PgPool;
use tracing::info;

use crate::config::{database::DatabaseConfig, environment::EnvironmentConfig};

/// Conexión compartida a la base de datos
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Crear el pool de conexiones a partir de la configuración del entorno
    pub async fn connect(config: &EnvironmentConfig) -> Result<Self, sqlx::Error> {
        let db_config = DatabaseConfig::from_environment(config);
        info!("Conectando a {}", mask_database_url(&db_config.url));
        let pool = db_config.create_pool().await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Ejecutar migraciones de la base de datos
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

/// Función helper para enmascarar la URL de la base de datos en logs
fn mask_database_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at_pos)) if at_pos > scheme_end => {
            format!("{}***:***@{}", &url[..scheme_end + 3], &url[at_pos + 1..])
        }
        _ => url.to_string(),
    }
}
