// src/services/manager_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ManagerStore,
    models::manager::{validate_name, CreateManagerCommand, Manager, NewManager},
};

#[derive(Clone)]
pub struct ManagerService {
    store: Arc<dyn ManagerStore>,
}

impl ManagerService {
    pub fn new(store: Arc<dyn ManagerStore>) -> Self {
        Self { store }
    }

    /// LÓGICA DE NEGÓCIO: cria um Manager sem duplicar o par de nomes.
    ///
    /// A checagem `exists_by_name` é só um atalho; se duas requisições
    /// correrem juntas, a UNIQUE do banco barra a segunda e o erro volta
    /// como `DuplicateManager` do mesmo jeito.
    pub async fn create_manager(&self, command: CreateManagerCommand) -> Result<Manager, AppError> {
        // 1. Valida os nomes antes de tocar no banco
        validate_name(&command.first_name, "first_name")?;
        validate_name(&command.last_name, "last_name")?;

        // 2. Abre a unidade de trabalho (transação)
        let mut uow = self.store.begin().await?;

        if uow.exists_by_name(&command.first_name, &command.last_name).await? {
            tracing::warn!(
                first_name = %command.first_name,
                last_name = %command.last_name,
                "Manager duplicado rejeitado"
            );
            return Err(AppError::DuplicateManager {
                first_name: command.first_name,
                last_name: command.last_name,
            });
        }

        // 3. Monta o agregado (regras de status)
        let new_manager = NewManager::new(command)?;

        // 4. Persiste. Qualquer `?` daqui para cima descarta a transação.
        let manager = uow.add(new_manager).await?;
        uow.commit().await?;

        tracing::info!(
            external_id = %manager.external_id,
            status = ?manager.status,
            "Manager criado"
        );

        Ok(manager)
    }

    pub async fn get_manager(&self, external_id: Uuid) -> Result<Manager, AppError> {
        self.store
            .find_by_external_id(external_id)
            .await?
            .ok_or(AppError::ManagerNotFound(external_id))
    }

    pub async fn list_managers(&self, limit: i64, offset: i64) -> Result<Vec<Manager>, AppError> {
        self.store.list(limit, offset).await
    }
}
