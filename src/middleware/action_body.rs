//! Cuerpo opcional de las acciones sobre asignaciones
//!
//! Confirmar, rechazar y cancelar aceptan una petición sin cuerpo. Un cuerpo
//! presente pero mal formado es un error de validación, nunca se descarta.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::utils::errors::{validation_error, AppError, GENERAL_NOTICE};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionBody<T>(pub T);

impl<T> ActionBody<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ActionBody<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| validation_error(GENERAL_NOTICE, e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(ActionBody(T::default()));
        }

        let Json(value) = Json::<T>::from_bytes(&bytes)
            .map_err(|e| validation_error(GENERAL_NOTICE, e.body_text()))?;

        Ok(ActionBody(value))
    }
}
