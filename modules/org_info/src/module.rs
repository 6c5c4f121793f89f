use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::api::graph::Resolver;
use crate::api::rest::routes;
use crate::config::OrgInfoConfig;
use crate::contract::client::OrgInfoApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::OrgInfoLocalClient;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{
    InMemoryDepartmentRepository, InMemoryEmployeeRepository, InMemoryProjectRepository,
    InMemoryStore, SeaOrmDepartmentRepository, SeaOrmEmployeeRepository,
    SeaOrmProjectRepository,
};

/// The store the repositories are built on.
pub enum StoreBackend {
    Memory(Arc<InMemoryStore>),
    Database(DatabaseConnection),
}

/// The org_info module: one service shared by the REST face, the graph face
/// and in-process clients.
#[derive(Clone)]
pub struct OrgInfo {
    service: Arc<Service>,
    config: OrgInfoConfig,
}

impl OrgInfo {
    pub fn init(config: OrgInfoConfig, backend: StoreBackend) -> Self {
        let service_config = ServiceConfig {
            max_name_length: config.max_name_length,
        };
        let service = match backend {
            StoreBackend::Memory(store) => {
                info!("org_info: using in-memory store");
                Service::new(
                    Arc::new(InMemoryDepartmentRepository::new(store.clone())),
                    Arc::new(InMemoryEmployeeRepository::new(store.clone())),
                    Arc::new(InMemoryProjectRepository::new(store)),
                    service_config,
                )
            }
            StoreBackend::Database(db) => {
                info!("org_info: using database store");
                Service::new(
                    Arc::new(SeaOrmDepartmentRepository::new(db.clone())),
                    Arc::new(SeaOrmEmployeeRepository::new(db.clone())),
                    Arc::new(SeaOrmProjectRepository::new(db)),
                    service_config,
                )
            }
        };
        Self {
            service: Arc::new(service),
            config,
        }
    }

    /// Apply pending schema migrations.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("org_info: running migrations");
        Migrator::up(db, None).await?;
        Ok(())
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    pub fn client(&self) -> Arc<dyn OrgInfoApi> {
        Arc::new(OrgInfoLocalClient::new(self.service.clone()))
    }

    /// Query and mutation resolvers for the graph API. The server does not
    /// mount them; a schema crate binds them to an endpoint such as `/query`.
    pub fn graph_resolver(&self) -> Resolver {
        Resolver::new(self.client())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.config.request_timeout_ms)
    }

    /// Mount `/health` and the `/api/v1` routes.
    pub fn register_rest(&self, router: Router) -> Router {
        routes::register_routes(router, self.service.clone(), self.request_timeout())
    }
}
