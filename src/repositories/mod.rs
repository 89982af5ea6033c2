//! Capa de persistencia
//!
//! Un trait por entidad, con su implementación sobre PostgreSQL.
//! El estado de la aplicación los guarda como `Arc<dyn ...>`.

pub mod apprentice_repository;
pub mod assignment_repository;
pub mod company_repository;
pub mod placement_repository;

pub use apprentice_repository::{ApprenticeRepository, PgApprenticeRepository};
pub use assignment_repository::{AssignmentRepository, PgAssignmentRepository};
pub use company_repository::{CompanyRepository, PgCompanyRepository};
pub use placement_repository::{PgPlacementRepository, PlacementRepository};

/// Patrón `ILIKE` que busca `text` literal, con `%`, `_` y la barra invertida escapados
pub(crate) fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
