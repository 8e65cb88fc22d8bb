// src/db/memory_repo.rs
//
// ManagerStore em memória para os testes. Reproduz o contrato do Postgres:
// a UNIQUE (first_name, last_name) vale também para linhas ainda não
// commitadas de outra unidade, e o rollback (drop sem commit) libera o nome.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::manager_repo::{ManagerStore, ManagerUnitOfWork},
    models::manager::{Manager, NewManager},
};

#[derive(Default)]
struct Table {
    rows: Vec<Manager>,
    next_id: i32,
    // Nomes inseridos por unidades ainda abertas
    reserved: HashSet<(String, String)>,
}

impl Table {
    fn has_name(&self, first_name: &str, last_name: &str) -> bool {
        self.rows
            .iter()
            .any(|m| m.first_name == first_name && m.last_name == last_name)
    }

    fn release(&mut self, pending: &[Manager]) {
        for manager in pending {
            self.reserved
                .remove(&(manager.first_name.clone(), manager.last_name.clone()));
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemoryManagerStore {
    table: Arc<Mutex<Table>>,
    fail_commits: bool,
}

impl InMemoryManagerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store cujo commit sempre falha, como um banco fora do ar.
    pub fn failing_commits() -> Self {
        Self {
            fail_commits: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.table.lock().unwrap().rows.len()
    }
}

fn duplicate(first_name: &str, last_name: &str) -> AppError {
    AppError::DuplicateManager {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    }
}

#[async_trait]
impl ManagerStore for InMemoryManagerStore {
    async fn begin(&self) -> Result<Box<dyn ManagerUnitOfWork>, AppError> {
        Ok(Box::new(InMemoryUnitOfWork {
            table: Arc::clone(&self.table),
            pending: Vec::new(),
            fail_commit: self.fail_commits,
        }))
    }

    async fn find_by_external_id(&self, external_id: Uuid) -> Result<Option<Manager>, AppError> {
        let table = self.table.lock().unwrap();
        Ok(table.rows.iter().find(|m| m.external_id == external_id).cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Manager>, AppError> {
        let table = self.table.lock().unwrap();
        Ok(table
            .rows
            .iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}

pub struct InMemoryUnitOfWork {
    table: Arc<Mutex<Table>>,
    pending: Vec<Manager>,
    fail_commit: bool,
}

#[async_trait]
impl ManagerUnitOfWork for InMemoryUnitOfWork {
    async fn exists_by_name(&mut self, first_name: &str, last_name: &str) -> Result<bool, AppError> {
        let table = self.table.lock().unwrap();
        Ok(table.has_name(first_name, last_name))
    }

    async fn add(&mut self, manager: NewManager) -> Result<Manager, AppError> {
        let mut table = self.table.lock().unwrap();

        let key = (manager.first_name().to_string(), manager.last_name().to_string());
        if table.has_name(&key.0, &key.1) || table.reserved.contains(&key) {
            return Err(duplicate(&key.0, &key.1));
        }
        table.reserved.insert(key);

        // O id é reservado já no insert, como uma SEQUENCE
        table.next_id += 1;
        let now = Utc::now();
        let persisted = Manager::hydrate(table.next_id, manager, now, now);

        self.pending.push(persisted.clone());
        Ok(persisted)
    }

    async fn commit(mut self: Box<Self>) -> Result<(), AppError> {
        if self.fail_commit {
            // O drop faz o rollback
            return Err(AppError::DatabaseError(sqlx::Error::PoolTimedOut));
        }

        let pending = std::mem::take(&mut self.pending);
        let mut table = self.table.lock().unwrap();
        table.release(&pending);
        table.rows.extend(pending);
        Ok(())
    }
}

impl Drop for InMemoryUnitOfWork {
    fn drop(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        if let Ok(mut table) = self.table.lock() {
            table.release(&self.pending);
        }
    }
}
