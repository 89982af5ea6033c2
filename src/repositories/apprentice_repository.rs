use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Apprentice;
use crate::repositories::assignment_repository::ACTIVE_STATUSES_SQL;
use crate::utils::errors::{translate_unique_violation, AppResult};

/// Acceso al registro de aprendices
#[async_trait]
pub trait ApprenticeRepository: Send + Sync {
    async fn create(&self, apprentice: &Apprentice) -> AppResult<Apprentice>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Apprentice>>;

    async fn document_exists(&self, document: &str) -> AppResult<bool>;

    /// Todos los aprendices, ordenados por apellido y nombre
    async fn list_all(&self) -> AppResult<Vec<Apprentice>>;

    /// Aprendices sin ninguna asignación en estado activo.
    /// Se calcula en cada lectura; no hay bandera almacenada.
    async fn list_available(&self) -> AppResult<Vec<Apprentice>>;
}

pub struct PgApprenticeRepository {
    pool: PgPool,
}

impl PgApprenticeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApprenticeRepository for PgApprenticeRepository {
    async fn create(&self, apprentice: &Apprentice) -> AppResult<Apprentice> {
        sqlx::query_as::<_, Apprentice>(
            r#"
            INSERT INTO apprentices (id, first_name, last_name, document, email, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(apprentice.id)
        .bind(&apprentice.first_name)
        .bind(&apprentice.last_name)
        .bind(&apprentice.document)
        .bind(&apprentice.email)
        .bind(apprentice.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(translate_unique_violation)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Apprentice>> {
        let apprentice = sqlx::query_as::<_, Apprentice>("SELECT * FROM apprentices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(apprentice)
    }

    async fn document_exists(&self, document: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM apprentices WHERE document = $1)")
                .bind(document.trim())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn list_all(&self) -> AppResult<Vec<Apprentice>> {
        let apprentices = sqlx::query_as::<_, Apprentice>(
            "SELECT * FROM apprentices ORDER BY last_name, first_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(apprentices)
    }

    async fn list_available(&self) -> AppResult<Vec<Apprentice>> {
        let sql = format!(
            r#"
            SELECT ap.* FROM apprentices ap
            WHERE NOT EXISTS (
                SELECT 1 FROM assignments a
                WHERE a.apprentice_id = ap.id AND a.status IN {}
            )
            ORDER BY ap.last_name, ap.first_name
            "#,
            ACTIVE_STATUSES_SQL
        );

        let apprentices = sqlx::query_as::<_, Apprentice>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(apprentices)
    }
}
