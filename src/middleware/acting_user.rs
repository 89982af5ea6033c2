//! Usuario que actúa en la petición
//!
//! No hay autenticación: el cliente puede identificar al usuario con la
//! cabecera `x-user`. El valor se pasa de forma explícita a las
//! operaciones de creación como `created_by`.

use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

pub const ACTING_USER_HEADER: &str = "x-user";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActingUser(pub Option<String>);

impl ActingUser {
    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(ACTING_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Ok(ActingUser(user))
    }
}
