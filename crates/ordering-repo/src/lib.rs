#[cfg(not(any(feature = "memory", feature = "sqlite")))]
compile_error!("Enable a repo feature: `memory` or `sqlite`.");

use ordering_types::domain::cart::{Cart, CartId};
use ordering_types::domain::order::{NewOrder, Order, OrderId};
use ordering_types::ports::cart_store::CartStore;
use ordering_types::ports::order_store::{OrderStore, RepoError};

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

/// Store adapter picked at startup from the enabled features and config.
#[derive(Clone)]
pub enum Repo {
    #[cfg(feature = "memory")]
    Memory(memory::InMemoryRepo),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite::SqliteRepo),
}

pub async fn build_repo(url: Option<&str>) -> anyhow::Result<Repo> {
    Repo::build_repo(url).await
}

impl Repo {
    #[cfg(all(feature = "memory", not(feature = "sqlite")))]
    pub async fn build_repo(_: Option<&str>) -> anyhow::Result<Self> {
        tracing::info!("using in-memory order store");
        Ok(Self::Memory(memory::InMemoryRepo::new()))
    }

    #[cfg(all(feature = "sqlite", not(feature = "memory")))]
    pub async fn build_repo(database_url: Option<&str>) -> anyhow::Result<Self> {
        let url = database_url.unwrap_or("sqlite://orders.db");
        tracing::info!(url, "using sqlite order store");
        Ok(Self::Sqlite(sqlite::SqliteRepo::new(url).await?))
    }

    // With both adapters compiled in, a configured URL selects SQLite.
    #[cfg(all(feature = "sqlite", feature = "memory"))]
    pub async fn build_repo(database_url: Option<&str>) -> anyhow::Result<Self> {
        match database_url {
            Some(url) => {
                tracing::info!(url, "using sqlite order store");
                Ok(Self::Sqlite(sqlite::SqliteRepo::new(url).await?))
            }
            None => {
                tracing::info!("using in-memory order store");
                Ok(Self::Memory(memory::InMemoryRepo::new()))
            }
        }
    }
}

/// Both ports of one adapter behind a single object.
trait Backend: OrderStore + CartStore {}

impl<T: OrderStore + CartStore> Backend for T {}

impl Repo {
    fn backend(&self) -> &dyn Backend {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(repo) => repo,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(repo) => repo,
        }
    }
}

#[async_trait::async_trait]
impl OrderStore for Repo {
    async fn find_active_by_id(&self, id: OrderId) -> Result<Option<Order>, RepoError> {
        self.backend().find_active_by_id(id).await
    }

    async fn find_all_active(&self) -> Result<Vec<Order>, RepoError> {
        self.backend().find_all_active().await
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepoError> {
        self.backend().find_by_id(id).await
    }

    async fn create(&self, order: NewOrder) -> Result<Order, RepoError> {
        self.backend().create(order).await
    }

    async fn save(&self, order: Order) -> Result<Order, RepoError> {
        self.backend().save(order).await
    }
}

#[async_trait::async_trait]
impl CartStore for Repo {
    async fn find_cart(&self, id: CartId) -> Result<Option<Cart>, RepoError> {
        self.backend().find_cart(id).await
    }

    async fn create_cart(&self) -> Result<Cart, RepoError> {
        self.backend().create_cart().await
    }
}
