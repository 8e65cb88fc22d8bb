use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

// Cada tipo de falha fica distinguível até a borda HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    // Payload rejeitado pelo `validator` no handler
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Campo de texto vazio ou fora dos limites (regra do agregado)
    #[error("{field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    // Corpo ou query string que nem chegou a desserializar
    #[error("Requisição inválida: {0}")]
    InvalidRequest(String),

    // Status inconsistente com os campos dependentes
    #[error("{0}")]
    BusinessRuleViolation(String),

    #[error("Já existe um manager com o nome '{first_name} {last_name}'")]
    DuplicateManager { first_name: String, last_name: String },

    #[error("Manager {0} não encontrado")]
    ManagerNotFound(Uuid),

    // Falha de persistência (commit, conexão, constraint não prevista)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidRequest(_)
            | AppError::InvalidField { .. }
            | AppError::BusinessRuleViolation(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateManager { .. } => StatusCode::CONFLICT,
            AppError::ManagerNotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

// Os erros citam o campo como o cliente o envia: first_name -> firstName
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(camel_case(&field), messages);
                }
                json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                })
            }
            AppError::InvalidField { field, reason } => json!({
                "error": reason.clone(),
                "details": { (camel_case(field)): [reason] },
            }),

            // Erros 500: loga o detalhe, devolve mensagem genérica.
            e @ (AppError::DatabaseError(_) | AppError::InternalServerError(_)) => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                json!({ "error": "Ocorreu um erro inesperado." })
            }

            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
