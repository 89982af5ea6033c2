use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::company_dto::CompanyListQuery;
use crate::models::{Company, CompanyDependents, CompanyWithCounts};
use crate::utils::errors::{translate_unique_violation, AppResult};

use super::contains_pattern;

/// Acceso a la tabla de empresas
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn create(&self, company: &Company) -> AppResult<Company>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Company>>;

    /// ¿Existe otra empresa (distinta de `exclude`) con este NIT?
    async fn tax_id_exists(&self, tax_id: &str, exclude: Option<Uuid>) -> AppResult<bool>;

    /// ¿Existe otra empresa (distinta de `exclude`) con este correo?
    async fn email_exists(&self, email: &str, exclude: Option<Uuid>) -> AppResult<bool>;

    async fn update(&self, company: &Company) -> AppResult<Company>;

    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Listado ordenado por nombre, anotado con asignaciones y etapas
    async fn list(&self, query: &CompanyListQuery) -> AppResult<Vec<CompanyWithCounts>>;

    async fn dependents(&self, id: Uuid) -> AppResult<CompanyDependents>;
}

pub struct PgCompanyRepository {
    pool: PgPool,
}

impl PgCompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyRepository for PgCompanyRepository {
    async fn create(&self, company: &Company) -> AppResult<Company> {
        sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (
                id, name, tax_id, address, city, phone, email, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(company.id)
        .bind(&company.name)
        .bind(&company.tax_id)
        .bind(&company.address)
        .bind(&company.city)
        .bind(&company.phone)
        .bind(&company.email)
        .bind(company.created_at)
        .bind(company.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(translate_unique_violation)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Company>> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(company)
    }

    async fn tax_id_exists(&self, tax_id: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM companies \
             WHERE tax_id = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(tax_id.trim())
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn email_exists(&self, email: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM companies \
             WHERE lower(email) = lower($1) AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(email.trim())
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update(&self, company: &Company) -> AppResult<Company> {
        sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET name = $2, tax_id = $3, address = $4, city = $5, phone = $6, email = $7,
                updated_at = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(company.id)
        .bind(&company.name)
        .bind(&company.tax_id)
        .bind(&company.address)
        .bind(&company.city)
        .bind(&company.phone)
        .bind(&company.email)
        .bind(company.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(translate_unique_violation)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, query: &CompanyListQuery) -> AppResult<Vec<CompanyWithCounts>> {
        let search = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(contains_pattern);
        let city = query
            .city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let companies = sqlx::query_as::<_, CompanyWithCounts>(
            r#"
            SELECT c.*,
                (SELECT COUNT(*) FROM assignments a WHERE a.company_id = c.id) AS assignment_count,
                (SELECT COUNT(*) FROM placements p WHERE p.company_id = c.id) AS placement_count
            FROM companies c
            WHERE ($1::text IS NULL OR c.name ILIKE $1 OR c.tax_id ILIKE $1 OR c.email ILIKE $1)
              AND ($2::text IS NULL OR lower(c.city) = lower($2))
            ORDER BY c.name
            "#,
        )
        .bind(search)
        .bind(city)
        .fetch_all(&self.pool)
        .await?;

        Ok(companies)
    }

    async fn dependents(&self, id: Uuid) -> AppResult<CompanyDependents> {
        let (assignments, placements): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM assignments WHERE company_id = $1),
                (SELECT COUNT(*) FROM placements WHERE company_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(CompanyDependents { assignments, placements })
    }
}
