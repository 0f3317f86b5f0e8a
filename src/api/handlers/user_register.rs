use crate::registration::{ErrorCategory, Registrar, RegistrationRequest};
use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use std::{fmt, sync::Arc};
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize)]
pub struct UserRegister {
    email: String,
    #[schema(format = Password)]
    password: String,
}

impl fmt::Debug for UserRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRegister")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[utoipa::path(
    post,
    path= "/users",
    request_body = UserRegister,
    responses (
        (status = 201, description = "User created", body = String),
        (status = 400, description = "Missing or invalid email or password", body = String),
        (status = 500, description = "Failed to create user", body = String),
    ),
    tag= "register"
)]
#[instrument(skip_all)]
pub async fn register(
    Extension(registrar): Extension<Arc<Registrar>>,
    payload: Result<Json<UserRegister>, JsonRejection>,
) -> impl IntoResponse {
    let user = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            debug!("Rejected payload: {}", rejection.status());
            return (StatusCode::BAD_REQUEST, "Missing payload".to_string());
        }
    };

    let request = RegistrationRequest::new(user.email, user.password);

    match registrar.register(request).await {
        Ok(()) => (StatusCode::CREATED, "User created.".to_string()),
        Err(err) => match err.category() {
            ErrorCategory::Client => {
                debug!("Invalid registration: {}", err);
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ErrorCategory::Internal => {
                error!("Failed to create user: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to create user".to_string(),
                )
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_password() {
        let user: UserRegister =
            serde_json::from_str(r#"{"email":"a@example.com","password":"correct horse"}"#)
                .unwrap();
        let debug = format!("{user:?}");
        assert!(debug.contains("a@example.com"));
        assert!(!debug.contains("correct horse"));
    }

    #[test]
    fn missing_field_fails_to_deserialize() {
        assert!(serde_json::from_str::<UserRegister>(r#"{"email":"a@example.com"}"#).is_err());
    }
}
