//! Middleware del sistema
//!
//! Extractores de la petición y configuración de CORS.

pub mod acting_user;
pub mod action_body;
pub mod cors;

pub use acting_user::ActingUser;
pub use action_body::ActionBody;
pub use cors::cors_layer;
