// src/db/manager_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::manager::{Manager, NewManager},
};

// Nome da constraint UNIQUE (first_name, last_name) criada na migração.
pub const NAME_UNIQUE_CONSTRAINT: &str = "managers_first_name_last_name_key";

const MANAGER_COLUMNS: &str = r#"
    id, external_id, first_name, last_name, status,
    assigned_sales_agent_id, contacted_at, approved_at, reported_at,
    created_at, updated_at
"#;

/// Acesso compartilhado aos Managers. Vive no `AppState`.
#[async_trait]
pub trait ManagerStore: Send + Sync {
    /// Abre uma unidade de trabalho para uma única requisição.
    async fn begin(&self) -> Result<Box<dyn ManagerUnitOfWork>, AppError>;

    async fn find_by_external_id(&self, external_id: Uuid) -> Result<Option<Manager>, AppError>;

    /// Página em ordem de criação.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Manager>, AppError>;
}

/// Escopo de uma requisição. Nada é durável antes de `commit`;
/// descartar sem commit desfaz todos os `add`.
#[async_trait]
pub trait ManagerUnitOfWork: Send {
    async fn exists_by_name(&mut self, first_name: &str, last_name: &str) -> Result<bool, AppError>;

    async fn add(&mut self, manager: NewManager) -> Result<Manager, AppError>;

    async fn commit(self: Box<Self>) -> Result<(), AppError>;
}

// Converte violação da UNIQUE de nomes em conflito; o resto é erro de banco.
fn map_insert_error(e: sqlx::Error, first_name: &str, last_name: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() && db_err.constraint() == Some(NAME_UNIQUE_CONSTRAINT) {
            return AppError::DuplicateManager {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            };
        }
    }
    e.into()
}

#[derive(Clone)]
pub struct PgManagerStore {
    pool: PgPool,
}

impl PgManagerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ManagerStore for PgManagerStore {
    async fn begin(&self) -> Result<Box<dyn ManagerUnitOfWork>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgManagerUnitOfWork { tx, pending: Vec::new() }))
    }

    async fn find_by_external_id(&self, external_id: Uuid) -> Result<Option<Manager>, AppError> {
        let manager = sqlx::query_as::<_, Manager>(&format!(
            "SELECT {MANAGER_COLUMNS} FROM managers WHERE external_id = $1"
        ))
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(manager)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Manager>, AppError> {
        let managers = sqlx::query_as::<_, Manager>(&format!(
            "SELECT {MANAGER_COLUMNS} FROM managers ORDER BY id ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(managers)
    }
}

pub struct PgManagerUnitOfWork {
    tx: Transaction<'static, Postgres>,
    // (first_name, last_name) inseridos nesta transação; usado se a UNIQUE só falhar no commit
    pending: Vec<(String, String)>,
}

#[async_trait]
impl ManagerUnitOfWork for PgManagerUnitOfWork {
    async fn exists_by_name(&mut self, first_name: &str, last_name: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM managers WHERE first_name = $1 AND last_name = $2)",
        )
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(exists)
    }

    async fn add(&mut self, manager: NewManager) -> Result<Manager, AppError> {
        // id, created_at e updated_at vêm dos defaults da tabela
        let inserted = sqlx::query_as::<_, Manager>(&format!(
            r#"
            INSERT INTO managers (
                external_id, first_name, last_name, status,
                assigned_sales_agent_id, contacted_at, approved_at, reported_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {MANAGER_COLUMNS}
            "#
        ))
        .bind(manager.external_id())
        .bind(manager.first_name())
        .bind(manager.last_name())
        .bind(manager.status())
        .bind(manager.assigned_sales_agent_id())
        .bind(manager.contacted_at())
        .bind(manager.approved_at())
        .bind(manager.reported_at())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| map_insert_error(e, manager.first_name(), manager.last_name()))?;

        self.pending
            .push((inserted.first_name.clone(), inserted.last_name.clone()));

        Ok(inserted)
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let PgManagerUnitOfWork { tx, pending } = *self;

        tx.commit()
            .await
            .map_err(|e| map_commit_error(e, &pending))
    }
}

// Só dá para atribuir a violação a um nome se a transação inseriu exatamente um
fn map_commit_error(e: sqlx::Error, pending: &[(String, String)]) -> AppError {
    match pending {
        [(first_name, last_name)] => map_insert_error(e, first_name, last_name),
        _ => e.into(),
    }
}
