// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CRM Managers",
        description = "Cadastro de managers (leads do funil de vendas)"
    ),
    paths(
        // --- Managers ---
        handlers::managers::create_manager,
        handlers::managers::list_managers,
        handlers::managers::get_manager,
    ),
    components(
        schemas(
            // --- Managers ---
            models::manager::ManagerStatus,
            models::manager::ManagerResponse,

            // --- Payloads ---
            handlers::managers::CreateManagerPayload,
        )
    ),
    tags(
        (name = "Managers", description = "Criação e consulta de managers")
    )
)]
pub struct ApiDoc;
