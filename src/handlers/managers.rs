// src/handlers/managers.rs

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    models::manager::{CreateManagerCommand, ManagerResponse, ManagerStatus},
};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("required".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateManagerPayload {
    #[validate(
        custom(function = "not_blank"),
        length(min = 4, max = 40, message = "length_4_40")
    )]
    #[schema(example = "Maria")]
    pub first_name: String,

    #[validate(
        custom(function = "not_blank"),
        length(min = 4, max = 40, message = "length_4_40")
    )]
    #[schema(example = "Oliveira")]
    pub last_name: String,

    // Ausente = Open
    #[schema(example = "Contacted")]
    pub status: Option<ManagerStatus>,

    #[schema(example = 12)]
    pub assigned_sales_agent_id: Option<i32>,

    pub contacted_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub reported_at: Option<DateTime<Utc>>,
}

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 200;

#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListManagersQuery {
    /// Máximo de itens por página (padrão 50, máximo 200)
    #[validate(range(min = 1, max = 200))]
    pub limit: Option<i64>,

    /// Quantos itens pular, em ordem de criação (padrão 0)
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
}

impl ListManagersQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }
}

impl From<CreateManagerPayload> for CreateManagerCommand {
    fn from(payload: CreateManagerPayload) -> Self {
        Self {
            status: payload.status.unwrap_or_default(),
            assigned_sales_agent_id: payload.assigned_sales_agent_id,
            contacted_at: payload.contacted_at,
            approved_at: payload.approved_at,
            reported_at: payload.reported_at,
            ..Self::new(payload.first_name, payload.last_name)
        }
    }
}

// POST /api/v1/managers
#[utoipa::path(
    post,
    path = "/api/v1/managers",
    tag = "Managers",
    request_body = CreateManagerPayload,
    responses(
        (status = 201, description = "Manager criado", body = ManagerResponse),
        (status = 400, description = "JSON malformado, dados inválidos ou regra de status violada"),
        (status = 409, description = "Já existe um manager com o mesmo nome e sobrenome"),
        (status = 500, description = "Erro interno")
    )
)]
pub async fn create_manager(
    State(app_state): State<AppState>,
    payload: Result<Json<CreateManagerPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let manager = app_state
        .manager_service
        .create_manager(payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(ManagerResponse::from(manager))))
}

// GET /api/v1/managers
#[utoipa::path(
    get,
    path = "/api/v1/managers",
    tag = "Managers",
    params(ListManagersQuery),
    responses(
        (status = 200, description = "Página de managers em ordem de criação", body = Vec<ManagerResponse>),
        (status = 400, description = "Parâmetros de paginação inválidos")
    )
)]
pub async fn list_managers(
    State(app_state): State<AppState>,
    query: Result<Query<ListManagersQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(query) = query?;
    query.validate()?;

    let managers: Vec<ManagerResponse> = app_state
        .manager_service
        .list_managers(query.limit(), query.offset())
        .await?
        .into_iter()
        .map(ManagerResponse::from)
        .collect();

    Ok((StatusCode::OK, Json(managers)))
}

// GET /api/v1/managers/{external_id}
#[utoipa::path(
    get,
    path = "/api/v1/managers/{external_id}",
    tag = "Managers",
    params(
        ("external_id" = Uuid, Path, description = "Identificador externo do manager")
    ),
    responses(
        (status = 200, description = "Manager encontrado", body = ManagerResponse),
        (status = 404, description = "Manager não encontrado")
    )
)]
pub async fn get_manager(
    State(app_state): State<AppState>,
    Path(external_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let manager = app_state.manager_service.get_manager(external_id).await?;

    Ok((StatusCode::OK, Json(ManagerResponse::from(manager))))
}
