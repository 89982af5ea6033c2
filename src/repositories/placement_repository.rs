use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::placement_dto::PlacementFilter;
use crate::models::{Placement, PlacementDetail, PlacementStatus};
use crate::utils::errors::{translate_unique_violation, AppResult};

const DETAIL_SELECT: &str = r#"
    SELECT p.*,
        (ap.first_name || ' ' || ap.last_name) AS apprentice_name,
        ap.document AS apprentice_document,
        c.name AS company_name
    FROM placements p
    JOIN apprentices ap ON ap.id = p.apprentice_id
    JOIN companies c ON c.id = p.company_id
"#;

/// Acceso a las etapas de práctica
#[async_trait]
pub trait PlacementRepository: Send + Sync {
    async fn create(&self, placement: &Placement) -> AppResult<Placement>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Placement>>;

    async fn find_detail(&self, id: Uuid) -> AppResult<Option<PlacementDetail>>;

    /// Etapa derivada de una asignación, si existe
    async fn find_by_origin(&self, assignment_id: Uuid) -> AppResult<Option<Placement>>;

    async fn update(&self, placement: &Placement) -> AppResult<Placement>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Listado filtrado por fecha de inicio descendente; `limit` corta los N más recientes
    async fn list(
        &self,
        filter: &PlacementFilter,
        limit: Option<i64>,
    ) -> AppResult<Vec<PlacementDetail>>;

    async fn count_by_status(&self, company_id: Uuid) -> AppResult<Vec<(PlacementStatus, i64)>>;
}

pub struct PgPlacementRepository {
    pool: PgPool,
}

impl PgPlacementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlacementRepository for PgPlacementRepository {
    async fn create(&self, placement: &Placement) -> AppResult<Placement> {
        sqlx::query_as::<_, Placement>(
            r#"
            INSERT INTO placements (
                id, apprentice_id, company_id, tutor, start_date, end_date,
                objectives, logbook, status, origin_assignment_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(placement.id)
        .bind(placement.apprentice_id)
        .bind(placement.company_id)
        .bind(&placement.tutor)
        .bind(placement.start_date)
        .bind(placement.end_date)
        .bind(&placement.objectives)
        .bind(&placement.logbook)
        .bind(placement.status)
        .bind(placement.origin_assignment_id)
        .fetch_one(&self.pool)
        .await
        .map_err(translate_unique_violation)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Placement>> {
        let placement = sqlx::query_as::<_, Placement>("SELECT * FROM placements WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(placement)
    }

    async fn find_detail(&self, id: Uuid) -> AppResult<Option<PlacementDetail>> {
        let sql = format!("{} WHERE p.id = $1", DETAIL_SELECT);
        let detail = sqlx::query_as::<_, PlacementDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(detail)
    }

    async fn find_by_origin(&self, assignment_id: Uuid) -> AppResult<Option<Placement>> {
        let placement = sqlx::query_as::<_, Placement>(
            "SELECT * FROM placements WHERE origin_assignment_id = $1",
        )
        .bind(assignment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(placement)
    }

    async fn update(&self, placement: &Placement) -> AppResult<Placement> {
        let updated = sqlx::query_as::<_, Placement>(
            r#"
            UPDATE placements
            SET apprentice_id = $2, company_id = $3, tutor = $4, start_date = $5, end_date = $6,
                objectives = $7, logbook = $8, status = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(placement.id)
        .bind(placement.apprentice_id)
        .bind(placement.company_id)
        .bind(&placement.tutor)
        .bind(placement.start_date)
        .bind(placement.end_date)
        .bind(&placement.objectives)
        .bind(&placement.logbook)
        .bind(placement.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM placements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(
        &self,
        filter: &PlacementFilter,
        limit: Option<i64>,
    ) -> AppResult<Vec<PlacementDetail>> {
        let mut builder = QueryBuilder::<Postgres>::new(DETAIL_SELECT);
        builder.push(" WHERE TRUE");
        if let Some(company_id) = filter.company_id {
            builder.push(" AND p.company_id = ").push_bind(company_id);
        }
        if let Some(status) = filter.status {
            builder.push(" AND p.status = ").push_bind(status);
        }
        builder.push(" ORDER BY p.start_date DESC");
        if let Some(limit) = limit {
            builder.push(" LIMIT ").push_bind(limit);
        }

        let placements = builder
            .build_query_as::<PlacementDetail>()
            .fetch_all(&self.pool)
            .await?;

        Ok(placements)
    }

    async fn count_by_status(&self, company_id: Uuid) -> AppResult<Vec<(PlacementStatus, i64)>> {
        let counts = sqlx::query_as::<_, (PlacementStatus, i64)>(
            "SELECT status, COUNT(*) FROM placements WHERE company_id = $1 GROUP BY status",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }
}
