//! Services module
//!
//! Lógica de negocio independiente de la persistencia.

pub mod lifecycle;
