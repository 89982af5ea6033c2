use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::assignment_dto::AssignmentFilter;
use crate::dto::Page;
use crate::models::{Assignment, AssignmentDetail, AssignmentStatus, Placement};
use crate::utils::errors::{translate_unique_violation, AppResult};

use super::contains_pattern;

/// Literal SQL con los estados activos de una asignación
pub const ACTIVE_STATUSES_SQL: &str = "('PENDING', 'ASSIGNED', 'CONFIRMED', 'STARTED')";

const DETAIL_SELECT: &str = r#"
    SELECT a.*,
        (ap.first_name || ' ' || ap.last_name) AS apprentice_name,
        ap.document AS apprentice_document,
        c.name AS company_name
    FROM assignments a
    JOIN apprentices ap ON ap.id = a.apprentice_id
    JOIN companies c ON c.id = a.company_id
"#;

const FROM_JOINED: &str = r#"
    FROM assignments a
    JOIN apprentices ap ON ap.id = a.apprentice_id
    JOIN companies c ON c.id = a.company_id
"#;

/// Acceso a las asignaciones
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn create(&self, assignment: &Assignment) -> AppResult<Assignment>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Assignment>>;

    async fn find_detail(&self, id: Uuid) -> AppResult<Option<AssignmentDetail>>;

    /// ¿Tiene el aprendiz otra asignación activa (distinta de `exclude`)?
    async fn has_active_for_apprentice(
        &self,
        apprentice_id: Uuid,
        exclude: Option<Uuid>,
    ) -> AppResult<bool>;

    /// Persistir la asignación sólo si sigue en `expected`.
    /// Devuelve `None` si otra transición llegó antes.
    async fn update(
        &self,
        assignment: &Assignment,
        expected: AssignmentStatus,
    ) -> AppResult<Option<Assignment>>;

    /// Pasar a STARTED y crear la etapa en una sola transacción.
    /// Devuelve `None` si la asignación ya no está CONFIRMED.
    async fn start_practice(
        &self,
        assignment: &Assignment,
        placement: &Placement,
    ) -> AppResult<Option<(Assignment, Placement)>>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Página del listado filtrado, más reciente primero
    async fn search(
        &self,
        filter: &AssignmentFilter,
        page: Page,
    ) -> AppResult<Vec<AssignmentDetail>>;

    /// Conteos por estado sobre el conjunto filtrado
    async fn count_by_status(
        &self,
        filter: &AssignmentFilter,
    ) -> AppResult<Vec<(AssignmentStatus, i64)>>;
}

pub struct PgAssignmentRepository {
    pool: PgPool,
}

impl PgAssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &AssignmentFilter) {
    builder.push(" WHERE TRUE");

    if let Some(q) = filter.search_text() {
        let pattern = contains_pattern(q);
        builder
            .push(" AND ((ap.first_name || ' ' || ap.last_name) ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR ap.document ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR c.name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR a.proposed_tutor ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(status) = filter.status {
        builder.push(" AND a.status = ").push_bind(status);
    }
    if let Some(modality) = filter.modality {
        builder.push(" AND a.modality = ").push_bind(modality);
    }
    if let Some(company_id) = filter.company_id {
        builder.push(" AND a.company_id = ").push_bind(company_id);
    }
    if let Some(from) = filter.created_from {
        builder.push(" AND a.created_at::date >= ").push_bind(from);
    }
    if let Some(to) = filter.created_to {
        builder.push(" AND a.created_at::date <= ").push_bind(to);
    }
}

#[async_trait]
impl AssignmentRepository for PgAssignmentRepository {
    async fn create(&self, assignment: &Assignment) -> AppResult<Assignment> {
        let created = sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO assignments (
                id, apprentice_id, company_id, proposed_start_date, proposed_end_date,
                status, modality, proposed_tutor, work_area, proposed_objectives,
                company_contact_name, company_contact_phone, company_contact_email,
                notes, created_at, confirmed_at, updated_at, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING *
            "#,
        )
        .bind(assignment.id)
        .bind(assignment.apprentice_id)
        .bind(assignment.company_id)
        .bind(assignment.proposed_start_date)
        .bind(assignment.proposed_end_date)
        .bind(assignment.status)
        .bind(assignment.modality)
        .bind(&assignment.proposed_tutor)
        .bind(&assignment.work_area)
        .bind(&assignment.proposed_objectives)
        .bind(&assignment.company_contact_name)
        .bind(&assignment.company_contact_phone)
        .bind(&assignment.company_contact_email)
        .bind(&assignment.notes)
        .bind(assignment.created_at)
        .bind(assignment.confirmed_at)
        .bind(assignment.updated_at)
        .bind(&assignment.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(translate_unique_violation)?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Assignment>> {
        let assignment = sqlx::query_as::<_, Assignment>("SELECT * FROM assignments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(assignment)
    }

    async fn find_detail(&self, id: Uuid) -> AppResult<Option<AssignmentDetail>> {
        let sql = format!("{} WHERE a.id = $1", DETAIL_SELECT);
        let detail = sqlx::query_as::<_, AssignmentDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(detail)
    }

    async fn has_active_for_apprentice(
        &self,
        apprentice_id: Uuid,
        exclude: Option<Uuid>,
    ) -> AppResult<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM assignments WHERE apprentice_id = $1 \
             AND status IN {} AND ($2::uuid IS NULL OR id <> $2))",
            ACTIVE_STATUSES_SQL
        );
        let exists: bool = sqlx::query_scalar(&sql)
            .bind(apprentice_id)
            .bind(exclude)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn update(
        &self,
        assignment: &Assignment,
        expected: AssignmentStatus,
    ) -> AppResult<Option<Assignment>> {
        let updated = sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE assignments
            SET apprentice_id = $3, company_id = $4,
                proposed_start_date = $5, proposed_end_date = $6,
                status = $7, modality = $8, proposed_tutor = $9, work_area = $10,
                proposed_objectives = $11, company_contact_name = $12, company_contact_phone = $13,
                company_contact_email = $14, notes = $15, confirmed_at = $16, updated_at = $17
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(assignment.id)
        .bind(expected)
        .bind(assignment.apprentice_id)
        .bind(assignment.company_id)
        .bind(assignment.proposed_start_date)
        .bind(assignment.proposed_end_date)
        .bind(assignment.status)
        .bind(assignment.modality)
        .bind(&assignment.proposed_tutor)
        .bind(&assignment.work_area)
        .bind(&assignment.proposed_objectives)
        .bind(&assignment.company_contact_name)
        .bind(&assignment.company_contact_phone)
        .bind(&assignment.company_contact_email)
        .bind(&assignment.notes)
        .bind(assignment.confirmed_at)
        .bind(assignment.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(translate_unique_violation)?;

        Ok(updated)
    }

    async fn start_practice(
        &self,
        assignment: &Assignment,
        placement: &Placement,
    ) -> AppResult<Option<(Assignment, Placement)>> {
        let mut tx = self.pool.begin().await?;

        let current: Option<AssignmentStatus> =
            sqlx::query_scalar("SELECT status FROM assignments WHERE id = $1 FOR UPDATE")
                .bind(assignment.id)
                .fetch_optional(&mut *tx)
                .await?;

        if current != Some(AssignmentStatus::Confirmed) {
            tx.rollback().await?;
            return Ok(None);
        }

        let started = sqlx::query_as::<_, Assignment>(
            "UPDATE assignments SET status = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(assignment.id)
        .bind(assignment.status)
        .bind(assignment.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        let created = sqlx::query_as::<_, Placement>(
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
        .fetch_one(&mut *tx)
        .await
        .map_err(translate_unique_violation)?;

        tx.commit().await?;

        Ok(Some((started, created)))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM assignments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn search(
        &self,
        filter: &AssignmentFilter,
        page: Page,
    ) -> AppResult<Vec<AssignmentDetail>> {
        let mut builder = QueryBuilder::<Postgres>::new(DETAIL_SELECT);
        push_filters(&mut builder, filter);
        builder
            .push(" ORDER BY a.created_at DESC LIMIT ")
            .push_bind(page.size)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let items = builder
            .build_query_as::<AssignmentDetail>()
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    async fn count_by_status(
        &self,
        filter: &AssignmentFilter,
    ) -> AppResult<Vec<(AssignmentStatus, i64)>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT a.status, COUNT(*)");
        builder.push(FROM_JOINED);
        push_filters(&mut builder, filter);
        builder.push(" GROUP BY a.status");

        let counts = builder
            .build_query_as::<(AssignmentStatus, i64)>()
            .fetch_all(&self.pool)
            .await?;

        Ok(counts)
    }
}
