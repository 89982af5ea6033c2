//! Utilidades del sistema
//!
//! Manejo de errores y reglas de validación compartidas.

pub mod errors;
pub mod validation;
