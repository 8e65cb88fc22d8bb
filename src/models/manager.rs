// src/models/manager.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

pub const NAME_MIN_LEN: usize = 4;
pub const NAME_MAX_LEN: usize = 40;

// --- ENUMS ---

/// Etapa do manager no funil de vendas, na ordem do funil.
///
/// Trafega em JSON pelo nome da variante (`"MeetingSet"`), não pelo código
/// numérico 1..8 da API legada (Open = 1, Contacted = 2, MeetingSet = 3,
/// Qualified = 4, Customer = 5, OpportunityLost = 6, Unqualified = 7,
/// InVeterinaryCustomer = 8). Clientes que enviavam o número precisam
/// mandar o nome.
// No banco é o CREATE TYPE manager_status, com rótulos em snake_case.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
    PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[sqlx(type_name = "manager_status", rename_all = "snake_case")]
pub enum ManagerStatus {
    #[default]
    Open,
    Contacted,
    MeetingSet,
    Qualified,
    Customer,
    OpportunityLost,
    Unqualified,
    InVeterinaryCustomer,
}

impl ManagerStatus {
    /// Todo status depois de `Open` exige agente responsável e data de contato.
    pub fn requires_contact(self) -> bool {
        self != ManagerStatus::Open
    }

    /// A partir de `Qualified` o lead precisa ter sido aprovado.
    pub fn requires_approval(self) -> bool {
        self >= ManagerStatus::Qualified
    }

    pub fn requires_report(self) -> bool {
        self == ManagerStatus::Unqualified
    }
}

// --- COMANDO ---

/// Intenção de criar um Manager, já desacoplada do formato HTTP.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateManagerCommand {
    pub first_name: String,
    pub last_name: String,
    pub status: ManagerStatus,
    pub assigned_sales_agent_id: Option<i32>,
    pub contacted_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub reported_at: Option<DateTime<Utc>>,
}

impl CreateManagerCommand {
    /// Comando mínimo: só os nomes, status `Open`.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Default::default()
        }
    }
}

// --- REGRAS ---

/// Regra dos campos de nome: não pode ser vazio/em branco e deve ter
/// entre 4 e 40 caracteres.
pub fn validate_name(value: &str, field: &'static str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidField {
            field,
            reason: format!("{field} não pode ser vazio ou conter apenas espaços."),
        });
    }

    let len = value.chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        return Err(AppError::InvalidField {
            field,
            reason: format!(
                "{field} deve ter entre {NAME_MIN_LEN} e {NAME_MAX_LEN} caracteres."
            ),
        });
    }

    Ok(())
}

fn require<T>(value: Option<T>, field: &str, status: ManagerStatus) -> Result<(), AppError> {
    if value.is_none() {
        return Err(AppError::BusinessRuleViolation(format!(
            "{field} é obrigatório para o status {status:?}."
        )));
    }
    Ok(())
}

fn validate_status_rules(command: &CreateManagerCommand) -> Result<(), AppError> {
    let status = command.status;

    if status.requires_contact() {
        require(command.assigned_sales_agent_id, "assigned_sales_agent_id", status)?;
        require(command.contacted_at, "contacted_at", status)?;
    }
    if status.requires_approval() {
        require(command.approved_at, "approved_at", status)?;
    }
    if status.requires_report() {
        require(command.reported_at, "reported_at", status)?;
    }

    Ok(())
}

// --- AGREGADO (criação) ---

/// Manager validado e ainda não persistido.
///
/// Só pode ser obtido por [`NewManager::new`], então todo valor deste tipo
/// respeita as regras de nome e de status.
#[derive(Debug, Clone, PartialEq)]
pub struct NewManager {
    external_id: Uuid,
    first_name: String,
    last_name: String,
    status: ManagerStatus,
    assigned_sales_agent_id: Option<i32>,
    contacted_at: Option<DateTime<Utc>>,
    approved_at: Option<DateTime<Utc>>,
    reported_at: Option<DateTime<Utc>>,
}

impl NewManager {
    pub fn new(command: CreateManagerCommand) -> Result<Self, AppError> {
        validate_name(&command.first_name, "first_name")?;
        validate_name(&command.last_name, "last_name")?;
        validate_status_rules(&command)?;

        Ok(Self {
            external_id: Uuid::new_v4(),
            first_name: command.first_name,
            last_name: command.last_name,
            status: command.status,
            assigned_sales_agent_id: command.assigned_sales_agent_id,
            contacted_at: command.contacted_at,
            approved_at: command.approved_at,
            reported_at: command.reported_at,
        })
    }

    pub fn external_id(&self) -> Uuid {
        self.external_id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn status(&self) -> ManagerStatus {
        self.status
    }

    pub fn assigned_sales_agent_id(&self) -> Option<i32> {
        self.assigned_sales_agent_id
    }

    pub fn contacted_at(&self) -> Option<DateTime<Utc>> {
        self.contacted_at
    }

    pub fn approved_at(&self) -> Option<DateTime<Utc>> {
        self.approved_at
    }

    pub fn reported_at(&self) -> Option<DateTime<Utc>> {
        self.reported_at
    }
}

// --- AGREGADO (persistido) ---

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Manager {
    pub id: i32,
    pub external_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub status: ManagerStatus,
    pub assigned_sales_agent_id: Option<i32>,
    pub contacted_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub reported_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Manager {
    /// Reidrata um Manager a partir do que o armazenamento atribuiu.
    /// Não revalida: o `NewManager` já passou pelas regras.
    pub fn hydrate(
        id: i32,
        manager: NewManager,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            external_id: manager.external_id,
            first_name: manager.first_name,
            last_name: manager.last_name,
            status: manager.status,
            assigned_sales_agent_id: manager.assigned_sales_agent_id,
            contacted_at: manager.contacted_at,
            approved_at: manager.approved_at,
            reported_at: manager.reported_at,
            created_at,
            updated_at,
        }
    }
}

// --- RESPOSTA ---

// Não expõe o `id` interno, só o identificador externo.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManagerResponse {
    pub external_id: Uuid,
    #[schema(example = "Maria")]
    pub first_name: String,
    #[schema(example = "da Silva")]
    pub last_name: String,
    pub status: ManagerStatus,
    pub assigned_sales_agent_id: Option<i32>,
    pub contacted_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub reported_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Manager> for ManagerResponse {
    fn from(manager: Manager) -> Self {
        Self {
            external_id: manager.external_id,
            first_name: manager.first_name,
            last_name: manager.last_name,
            status: manager.status,
            assigned_sales_agent_id: manager.assigned_sales_agent_id,
            contacted_at: manager.contacted_at,
            approved_at: manager.approved_at,
            reported_at: manager.reported_at,
            created_at: manager.created_at,
            updated_at: manager.updated_at,
        }
    }
}
