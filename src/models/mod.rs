//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL (ver `migrations/`).

pub mod apprentice;
pub mod assignment;
pub mod company;
pub mod placement;

pub use apprentice::Apprentice;
pub use assignment::{Assignment, AssignmentDetail, AssignmentModality, AssignmentStatus};
pub use company::{Company, CompanyDependents, CompanyWithCounts};
pub use placement::{Placement, PlacementDetail, PlacementStatus};
