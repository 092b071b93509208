// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Erro de domínio, usado por repositórios e serviços.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0} não encontrado")]
    NotFound(&'static str),

    #[error("Referência inválida: {0}")]
    InvalidReference(String),

    #[error("Registro em uso: {0}")]
    InUse(&'static str),

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("Overflow em cálculo de valores")]
    ArithmeticOverflow,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Traduz erros de integridade do Postgres para variantes de domínio.
    /// `entity` nomeia o registro afetado na mensagem.
    pub fn from_write(e: sqlx::Error, entity: &'static str) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return AppError::UniqueConstraintViolation(
                    db_err.constraint().unwrap_or(entity).to_string(),
                );
            }
            if db_err.is_foreign_key_violation() {
                return AppError::InvalidReference(
                    db_err.constraint().unwrap_or(entity).to_string(),
                );
            }
        }
        e.into()
    }

    /// Em um DELETE, a violação de chave estrangeira significa que outro
    /// registro ainda aponta para este.
    pub fn from_delete(e: sqlx::Error, entity: &'static str) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_foreign_key_violation() {
                return AppError::InUse(entity);
            }
        }
        e.into()
    }

    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let en = locale.is_english();
        let pick = |pt: &str, en_msg: &str| if en { en_msg.to_string() } else { pt.to_string() };

        let (status, error, details) = match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                                .into()
                        })
                        .collect();
                    details.insert(field.to_string(), Value::Array(messages));
                }
                (
                    StatusCode::BAD_REQUEST,
                    pick("Um ou mais campos são inválidos.", "One or more fields are invalid."),
                    Some(Value::Object(details)),
                )
            }
            AppError::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                pick(
                    &format!("{} não encontrado.", entity),
                    &format!("{} not found.", entity),
                ),
                None,
            ),
            AppError::InvalidReference(constraint) => (
                StatusCode::BAD_REQUEST,
                pick(
                    "Registro relacionado não existe.",
                    "Referenced record does not exist.",
                ),
                Some(json!({ "constraint": constraint })),
            ),
            AppError::InUse(entity) => (
                StatusCode::CONFLICT,
                pick(
                    &format!("{} está em uso e não pode ser removido.", entity),
                    &format!("{} is in use and cannot be deleted.", entity),
                ),
                None,
            ),
            AppError::UniqueConstraintViolation(constraint) => (
                StatusCode::CONFLICT,
                pick("Registro duplicado.", "Duplicate record."),
                Some(json!({ "constraint": constraint })),
            ),
            AppError::ArithmeticOverflow => (
                StatusCode::UNPROCESSABLE_ENTITY,
                pick(
                    "Valores fora do intervalo suportado.",
                    "Values are outside the supported range.",
                ),
                None,
            ),
            AppError::EmailAlreadyExists => (
                StatusCode::CONFLICT,
                pick("Este e-mail já está em uso.", "This e-mail is already in use."),
                None,
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                pick("E-mail ou senha inválidos.", "Invalid e-mail or password."),
                None,
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                pick(
                    "Token de autenticação inválido ou ausente.",
                    "Missing or invalid authentication token.",
                ),
                None,
            ),
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    pick("Ocorreu um erro inesperado.", "An unexpected error occurred."),
                    None,
                )
            }
        };

        ApiError { status, error, details }
    }
}

// Erro já pronto para a resposta HTTP (status + mensagem traduzida).
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        e.to_api_error(&Locale::default())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": false,
            "error": self.error,
        });
        if let Some(details) = self.details {
            body["details"] = details;
        }
        (self.status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use validator::{ValidationError, ValidationErrors};

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_is_404_with_envelope() {
        let response = AppError::NotFound("Produto").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Produto não encontrado.");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn validation_error_lists_field_messages() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("length");
        err.message = Some("O nome é obrigatório.".into());
        errors.add("name", err);

        let response = AppError::ValidationError(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["details"]["name"][0], "O nome é obrigatório.");
    }

    #[test]
    fn english_locale_translates_message() {
        let api = AppError::InUse("Produto").to_api_error(&Locale("en".into()));
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert_eq!(api.error, "Produto is in use and cannot be deleted.");
    }

    #[test]
    fn overflow_is_unprocessable() {
        let api = AppError::ArithmeticOverflow.to_api_error(&Locale::default());
        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(api.error, "Valores fora do intervalo suportado.");
    }

    #[test]
    fn internal_errors_hide_details() {
        let api = AppError::InternalServerError(anyhow::anyhow!("boom")).to_api_error(&Locale::default());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.error, "Ocorreu um erro inesperado.");
    }
}
