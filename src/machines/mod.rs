pub mod error;
pub mod fallback;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::warn;
#[cfg(test)]
use mockall::automock;
use reqwest::Method;

use crate::api_client::ApiClient;

use {error::*, models::*};


pub type DynMachineService = Arc<dyn MachineService + Send + Sync>;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait MachineService {
    ///
    /// Lists every machine. This is the only read with a fallback: any
    /// failure yields the built-in sample network instead of an error.
    ///
    async fn list_machines(&self) -> MachineListing;
    async fn get_machine(&self, id: &str) -> Result<Machine>;
    async fn create_machine(&self, machine: NewMachine) -> Result<Machine>;
    async fn update_machine(&self, id: &str, update: MachineUpdate) -> Result<Machine>;
    async fn delete_machine(&self, id: &str) -> Result<()>;
    /// Tops the machine up to capacity, recording `today` as its last refill.
    async fn refill_machine(&self, id: &str, today: NaiveDate) -> Result<Machine>;
}

pub struct ApiMachineService {
    client: ApiClient,
}

impl ApiMachineService {
    pub fn new_dyn(client: ApiClient) -> DynMachineService {
        Arc::new(Self { client })
    }
}

#[async_trait]
impl MachineService for ApiMachineService {
    async fn list_machines(&self) -> MachineListing {
        match self.client.get::<Vec<Machine>>("/atms", &[]).await {
            Ok(machines) => MachineListing { machines, source: DataSource::Live },
            Err(e) => {
                warn!("Falling back to sample machine data: {}", e);
                MachineListing { machines: fallback::sample_machines(), source: DataSource::Fallback }
            }
        }
    }

    async fn get_machine(&self, id: &str) -> Result<Machine> {
        Ok(self.client.get(&format!("/atms/{}", id), &[]).await?)
    }

    async fn create_machine(&self, machine: NewMachine) -> Result<Machine> {
        if machine.capacity <= 0.0 {
            return Err(Error::InvalidMachine(format!("capacity must be positive, got {}", machine.capacity)));
        }
        if machine.current_cash < 0.0 || machine.current_cash > machine.capacity {
            return Err(Error::InvalidMachine(format!(
                "current cash {} must be between 0 and capacity {}",
                machine.current_cash, machine.capacity
            )));
        }
        Ok(self.client.send_json(Method::POST, "/atms", &machine).await?)
    }

    async fn update_machine(&self, id: &str, update: MachineUpdate) -> Result<Machine> {
        if let (Some(cash), Some(capacity)) = (update.current_cash, update.capacity) {
            if cash < 0.0 || cash > capacity {
                return Err(Error::InvalidMachine(format!(
                    "current cash {} must be between 0 and capacity {}", cash, capacity
                )));
            }
        }
        Ok(self.client.send_json(Method::PUT, &format!("/atms/{}", id), &update).await?)
    }

    async fn delete_machine(&self, id: &str) -> Result<()> {
        Ok(self.client.delete(&format!("/atms/{}", id)).await?)
    }

    async fn refill_machine(&self, id: &str, today: NaiveDate) -> Result<Machine> {
        let machine = self.get_machine(id).await?;
        let update = MachineUpdate {
            current_cash: Some(machine.capacity),
            last_refill: Some(today),
            ..Default::default()
        };
        self.update_machine(id, update).await
    }
}
