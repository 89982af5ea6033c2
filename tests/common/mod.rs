//! Utilidades compartidas por los tests de integración
//!
//! `MemoryStore` implementa los cuatro repositorios sobre vectores en
//! memoria, de modo que el router completo se puede probar sin PostgreSQL.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use practicas_backend::config::environment::EnvironmentConfig;
use practicas_backend::dto::assignment_dto::AssignmentFilter;
use practicas_backend::dto::company_dto::CompanyListQuery;
use practicas_backend::dto::placement_dto::PlacementFilter;
use practicas_backend::dto::Page;
use practicas_backend::models::{
    Apprentice, Assignment, AssignmentDetail, AssignmentStatus, Company, CompanyDependents,
    CompanyWithCounts, Placement, PlacementDetail, PlacementStatus,
};
use practicas_backend::repositories::{
    ApprenticeRepository, AssignmentRepository, CompanyRepository, PlacementRepository,
};
use practicas_backend::utils::errors::{validation_error, AppError, AppResult, GENERAL_NOTICE};
use practicas_backend::{create_app_router, AppState};

#[derive(Default)]
struct Tables {
    apprentices: Vec<Apprentice>,
    companies: Vec<Company>,
    assignments: Vec<Assignment>,
    placements: Vec<Placement>,
}

impl Tables {
    fn apprentice(&self, id: Uuid) -> Option<&Apprentice> {
        self.apprentices.iter().find(|a| a.id == id)
    }

    fn company(&self, id: Uuid) -> Option<&Company> {
        self.companies.iter().find(|c| c.id == id)
    }

    fn assignment_detail(&self, assignment: &Assignment) -> Option<AssignmentDetail> {
        let apprentice = self.apprentice(assignment.apprentice_id)?;
        let company = self.company(assignment.company_id)?;
        Some(AssignmentDetail {
            assignment: assignment.clone(),
            apprentice_name: apprentice.full_name(),
            apprentice_document: apprentice.document.clone(),
            company_name: company.name.clone(),
        })
    }

    fn placement_detail(&self, placement: &Placement) -> Option<PlacementDetail> {
        let apprentice = self.apprentice(placement.apprentice_id)?;
        let company = self.company(placement.company_id)?;
        Some(PlacementDetail {
            placement: placement.clone(),
            apprentice_name: apprentice.full_name(),
            apprentice_document: apprentice.document.clone(),
            company_name: company.name.clone(),
        })
    }

    /// Emula el índice único parcial de asignaciones activas
    fn active_conflict(&self, assignment: &Assignment) -> bool {
        assignment.status.is_active()
            && self.assignments.iter().any(|a| {
                a.id != assignment.id
                    && a.apprentice_id == assignment.apprentice_id
                    && a.status.is_active()
            })
    }

    fn filtered_assignments(&self, filter: &AssignmentFilter) -> Vec<AssignmentDetail> {
        let needle = filter.search_text().map(str::to_lowercase);
        let mut items: Vec<AssignmentDetail> = self
            .assignments
            .iter()
            .filter_map(|a| self.assignment_detail(a))
            .filter(|d| {
                let a = &d.assignment;
                let text_ok = needle.as_ref().map_or(true, |n| {
                    d.apprentice_name.to_lowercase().contains(n)
                        || d.apprentice_document.to_lowercase().contains(n)
                        || d.company_name.to_lowercase().contains(n)
                        || a.proposed_tutor.to_lowercase().contains(n)
                });
                let created = a.created_at.date_naive();
                text_ok
                    && filter.status.map_or(true, |s| a.status == s)
                    && filter.modality.map_or(true, |m| a.modality == m)
                    && filter.company_id.map_or(true, |c| a.company_id == c)
                    && filter.created_from.map_or(true, |from| created >= from)
                    && filter.created_to.map_or(true, |to| created <= to)
            })
            .collect();
        items.sort_by(|a, b| b.assignment.created_at.cmp(&a.assignment.created_at));
        items
    }
}

fn active_assignment_error() -> AppError {
    validation_error("apprentice_id", "El aprendiz ya tiene una asignación activa.")
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn assignment(&self, id: Uuid) -> Option<Assignment> {
        self.lock().assignments.iter().find(|a| a.id == id).cloned()
    }

    pub fn placements(&self) -> Vec<Placement> {
        self.lock().placements.clone()
    }

    pub fn assignments(&self) -> Vec<Assignment> {
        self.lock().assignments.clone()
    }

    /// Forzar un estado sin pasar por el ciclo de vida (simula datos previos)
    pub fn force_status(&self, id: Uuid, status: AssignmentStatus) {
        if let Some(a) = self.lock().assignments.iter_mut().find(|a| a.id == id) {
            a.status = status;
        }
    }
}

#[async_trait]
impl ApprenticeRepository for MemoryStore {
    async fn create(&self, apprentice: &Apprentice) -> AppResult<Apprentice> {
        let mut tables = self.lock();
        if tables.apprentices.iter().any(|a| a.document == apprentice.document) {
            return Err(validation_error("document", "Ya existe un aprendiz con este documento."));
        }
        tables.apprentices.push(apprentice.clone());
        Ok(apprentice.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Apprentice>> {
        Ok(self.lock().apprentice(id).cloned())
    }

    async fn document_exists(&self, document: &str) -> AppResult<bool> {
        Ok(self.lock().apprentices.iter().any(|a| a.document == document.trim()))
    }

    async fn list_all(&self) -> AppResult<Vec<Apprentice>> {
        let mut apprentices = self.lock().apprentices.clone();
        apprentices.sort_by(|a, b| {
            (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name))
        });
        Ok(apprentices)
    }

    async fn list_available(&self) -> AppResult<Vec<Apprentice>> {
        let tables = self.lock();
        let mut apprentices: Vec<Apprentice> = tables
            .apprentices
            .iter()
            .filter(|ap| {
                !tables
                    .assignments
                    .iter()
                    .any(|a| a.apprentice_id == ap.id && a.status.is_active())
            })
            .cloned()
            .collect();
        apprentices.sort_by(|a, b| {
            (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name))
        });
        Ok(apprentices)
    }
}

#[async_trait]
impl CompanyRepository for MemoryStore {
    async fn create(&self, company: &Company) -> AppResult<Company> {
        let mut tables = self.lock();
        if tables.companies.iter().any(|c| c.tax_id == company.tax_id) {
            return Err(validation_error("tax_id", "Ya existe una empresa con este NIT."));
        }
        tables.companies.push(company.clone());
        Ok(company.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Company>> {
        Ok(self.lock().company(id).cloned())
    }

    async fn tax_id_exists(&self, tax_id: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        Ok(self
            .lock()
            .companies
            .iter()
            .any(|c| c.tax_id == tax_id.trim() && Some(c.id) != exclude))
    }

    async fn email_exists(&self, email: &str, exclude: Option<Uuid>) -> AppResult<bool> {
        let email = email.trim().to_lowercase();
        Ok(self
            .lock()
            .companies
            .iter()
            .any(|c| c.email.to_lowercase() == email && Some(c.id) != exclude))
    }

    async fn update(&self, company: &Company) -> AppResult<Company> {
        let mut tables = self.lock();
        if let Some(existing) = tables.companies.iter_mut().find(|c| c.id == company.id) {
            *existing = company.clone();
        }
        Ok(company.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.lock();
        let before = tables.companies.len();
        tables.companies.retain(|c| c.id != id);
        Ok(tables.companies.len() < before)
    }

    async fn list(&self, query: &CompanyListQuery) -> AppResult<Vec<CompanyWithCounts>> {
        let tables = self.lock();
        let needle = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        let city = query
            .city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase);

        let mut companies: Vec<CompanyWithCounts> = tables
            .companies
            .iter()
            .filter(|c| {
                needle.as_ref().map_or(true, |n| {
                    c.name.to_lowercase().contains(n)
                        || c.tax_id.to_lowercase().contains(n)
                        || c.email.to_lowercase().contains(n)
                }) && city.as_ref().map_or(true, |city| &c.city.to_lowercase() == city)
            })
            .map(|c| CompanyWithCounts {
                company: c.clone(),
                assignment_count: tables.assignments.iter().filter(|a| a.company_id == c.id).count()
                    as i64,
                placement_count: tables.placements.iter().filter(|p| p.company_id == c.id).count()
                    as i64,
            })
            .collect();
        companies.sort_by(|a, b| a.company.name.cmp(&b.company.name));
        Ok(companies)
    }

    async fn dependents(&self, id: Uuid) -> AppResult<CompanyDependents> {
        let tables = self.lock();
        Ok(CompanyDependents {
            assignments: tables.assignments.iter().filter(|a| a.company_id == id).count() as i64,
            placements: tables.placements.iter().filter(|p| p.company_id == id).count() as i64,
        })
    }
}

#[async_trait]
impl AssignmentRepository for MemoryStore {
    async fn create(&self, assignment: &Assignment) -> AppResult<Assignment> {
        let mut tables = self.lock();
        if tables.active_conflict(assignment) {
            return Err(active_assignment_error());
        }
        tables.assignments.push(assignment.clone());
        Ok(assignment.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Assignment>> {
        Ok(self.assignment(id))
    }

    async fn find_detail(&self, id: Uuid) -> AppResult<Option<AssignmentDetail>> {
        let tables = self.lock();
        Ok(tables
            .assignments
            .iter()
            .find(|a| a.id == id)
            .and_then(|a| tables.assignment_detail(a)))
    }

    async fn has_active_for_apprentice(
        &self,
        apprentice_id: Uuid,
        exclude: Option<Uuid>,
    ) -> AppResult<bool> {
        Ok(self.lock().assignments.iter().any(|a| {
            a.apprentice_id == apprentice_id && a.status.is_active() && Some(a.id) != exclude
        }))
    }

    async fn update(
        &self,
        assignment: &Assignment,
        expected: AssignmentStatus,
    ) -> AppResult<Option<Assignment>> {
        let mut tables = self.lock();
        if tables.active_conflict(assignment) {
            return Err(active_assignment_error());
        }
        match tables
            .assignments
            .iter_mut()
            .find(|a| a.id == assignment.id && a.status == expected)
        {
            Some(existing) => {
                *existing = assignment.clone();
                Ok(Some(assignment.clone()))
            }
            None => Ok(None),
        }
    }

    async fn start_practice(
        &self,
        assignment: &Assignment,
        placement: &Placement,
    ) -> AppResult<Option<(Assignment, Placement)>> {
        let mut tables = self.lock();
        let still_confirmed = tables
            .assignments
            .iter()
            .any(|a| a.id == assignment.id && a.status == AssignmentStatus::Confirmed);
        if !still_confirmed {
            return Ok(None);
        }
        if tables
            .placements
            .iter()
            .any(|p| p.origin_assignment_id == Some(assignment.id))
        {
            return Err(validation_error(
                GENERAL_NOTICE,
                "La asignación ya tiene una etapa de práctica asociada.",
            ));
        }

        if let Some(existing) = tables.assignments.iter_mut().find(|a| a.id == assignment.id) {
            existing.status = assignment.status;
            existing.updated_at = assignment.updated_at;
        }
        tables.placements.push(placement.clone());
        let started = tables
            .assignments
            .iter()
            .find(|a| a.id == assignment.id)
            .cloned()
            .unwrap_or_else(|| assignment.clone());
        Ok(Some((started, placement.clone())))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.lock();
        let before = tables.assignments.len();
        tables.assignments.retain(|a| a.id != id);
        if tables.assignments.len() == before {
            return Ok(false);
        }
        for placement in tables.placements.iter_mut() {
            if placement.origin_assignment_id == Some(id) {
                placement.origin_assignment_id = None;
            }
        }
        Ok(true)
    }

    async fn search(
        &self,
        filter: &AssignmentFilter,
        page: Page,
    ) -> AppResult<Vec<AssignmentDetail>> {
        Ok(self
            .lock()
            .filtered_assignments(filter)
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.size as usize)
            .collect())
    }

    async fn count_by_status(
        &self,
        filter: &AssignmentFilter,
    ) -> AppResult<Vec<(AssignmentStatus, i64)>> {
        let items = self.lock().filtered_assignments(filter);
        Ok(AssignmentStatus::ALL
            .into_iter()
            .map(|s| (s, items.iter().filter(|d| d.assignment.status == s).count() as i64))
            .filter(|(_, count)| *count > 0)
            .collect())
    }
}

#[async_trait]
impl PlacementRepository for MemoryStore {
    async fn create(&self, placement: &Placement) -> AppResult<Placement> {
        self.lock().placements.push(placement.clone());
        Ok(placement.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Placement>> {
        Ok(self.lock().placements.iter().find(|p| p.id == id).cloned())
    }

    async fn find_detail(&self, id: Uuid) -> AppResult<Option<PlacementDetail>> {
        let tables = self.lock();
        Ok(tables
            .placements
            .iter()
            .find(|p| p.id == id)
            .and_then(|p| tables.placement_detail(p)))
    }

    async fn find_by_origin(&self, assignment_id: Uuid) -> AppResult<Option<Placement>> {
        Ok(self
            .lock()
            .placements
            .iter()
            .find(|p| p.origin_assignment_id == Some(assignment_id))
            .cloned())
    }

    async fn update(&self, placement: &Placement) -> AppResult<Placement> {
        let mut tables = self.lock();
        if let Some(existing) = tables.placements.iter_mut().find(|p| p.id == placement.id) {
            *existing = placement.clone();
        }
        Ok(placement.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.lock();
        let before = tables.placements.len();
        tables.placements.retain(|p| p.id != id);
        Ok(tables.placements.len() < before)
    }

    async fn list(
        &self,
        filter: &PlacementFilter,
        limit: Option<i64>,
    ) -> AppResult<Vec<PlacementDetail>> {
        let tables = self.lock();
        let mut placements: Vec<PlacementDetail> = tables
            .placements
            .iter()
            .filter(|p| filter.company_id.map_or(true, |c| p.company_id == c))
            .filter(|p| filter.status.map_or(true, |s| p.status == s))
            .filter_map(|p| tables.placement_detail(p))
            .collect();
        placements.sort_by(|a, b| b.placement.start_date.cmp(&a.placement.start_date));
        if let Some(limit) = limit {
            placements.truncate(limit as usize);
        }
        Ok(placements)
    }

    async fn count_by_status(&self, company_id: Uuid) -> AppResult<Vec<(PlacementStatus, i64)>> {
        let tables = self.lock();
        Ok(PlacementStatus::ALL
            .into_iter()
            .map(|s| {
                let count = tables
                    .placements
                    .iter()
                    .filter(|p| p.company_id == company_id && p.status == s)
                    .count() as i64;
                (s, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect())
    }
}

/// Router completo respaldado por un `MemoryStore` compartido
pub fn test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let state = AppState::with_repositories(
        EnvironmentConfig::default(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    );
    (create_app_router(state), store)
}

/// Enviar una petición JSON y devolver estado y cuerpo
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    send_as(app, method, uri, body, None).await
}

pub async fn send_as(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    user: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user", user);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn company_payload(name: &str, tax_id: &str, email: &str) -> Value {
    json!({
        "name": name,
        "tax_id": tax_id,
        "address": "Calle 10 # 20-30",
        "city": "Medellín",
        "phone": "6045551234",
        "email": email,
    })
}

pub fn apprentice_payload(first: &str, last: &str, document: &str) -> Value {
    json!({
        "first_name": first,
        "last_name": last,
        "document": document,
    })
}

/// Propuesta válida: empieza en 7 días y dura 180
pub fn assignment_payload(apprentice_id: &str, company_id: Option<&str>) -> Value {
    let start = today() + Duration::days(7);
    let end = start + Duration::days(180);
    let mut payload = json!({
        "apprentice_id": apprentice_id,
        "proposed_start_date": start.to_string(),
        "proposed_end_date": end.to_string(),
        "modality": "ON_SITE",
        "proposed_tutor": "Ing. Laura Gómez",
        "work_area": "Desarrollo",
        "proposed_objectives": "Apoyar el equipo de software",
    });
    if let Some(company_id) = company_id {
        payload["company_id"] = json!(company_id);
    }
    payload
}

pub async fn create_company(app: &Router, name: &str, tax_id: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/companies",
        Some(company_payload(name, tax_id, email)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

pub async fn create_apprentice(app: &Router, first: &str, last: &str, document: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/apprentices",
        Some(apprentice_payload(first, last, document)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

/// Asignación creada desde la empresa (estado ASSIGNED)
pub async fn assign(app: &Router, company_id: &str, apprentice_id: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        &format!("/api/companies/{company_id}/assignments"),
        Some(assignment_payload(apprentice_id, None)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["id"].as_str().unwrap().to_string()
}
