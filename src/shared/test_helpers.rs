use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;

use crate::core::error::{AppError, Result};
use crate::features::villas::models::{NewVilla, Villa};
use crate::features::villas::repository::{
    InMemoryVillaStore, VillaFilter, VillaRepository, VillaStore,
};
use crate::features::villas::{routes, VillaService};

/// In-memory store that counts repository calls and can simulate a failing
/// list query
#[derive(Clone, Default)]
pub struct RecordingStore {
    inner: InMemoryVillaStore,
    calls: Arc<AtomicUsize>,
    fail_listing: Arc<AtomicBool>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of repository operations issued so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_listing(&self) {
        self.fail_listing.store(true, Ordering::SeqCst);
    }
}

impl VillaStore for RecordingStore {
    fn scope(&self) -> Box<dyn VillaRepository> {
        Box::new(RecordingRepository {
            inner: self.inner.scope(),
            calls: Arc::clone(&self.calls),
            fail_listing: Arc::clone(&self.fail_listing),
        })
    }
}

struct RecordingRepository {
    inner: Box<dyn VillaRepository>,
    calls: Arc<AtomicUsize>,
    fail_listing: Arc<AtomicBool>,
}

impl RecordingRepository {
    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl VillaRepository for RecordingRepository {
    async fn get_all(&mut self) -> Result<Vec<Villa>> {
        self.record();
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(AppError::Internal("storage unavailable".to_string()));
        }
        self.inner.get_all().await
    }

    async fn get(&mut self, filter: &VillaFilter, tracked: bool) -> Result<Option<Villa>> {
        self.record();
        self.inner.get(filter, tracked).await
    }

    async fn create(&mut self, villa: NewVilla) -> Result<Villa> {
        self.record();
        self.inner.create(villa).await
    }

    async fn update(&mut self, villa: Villa) -> Result<()> {
        self.record();
        self.inner.update(villa).await
    }

    async fn remove(&mut self, villa: Villa) -> Result<()> {
        self.record();
        self.inner.remove(villa).await
    }

    async fn save(&mut self) -> Result<()> {
        self.record();
        self.inner.save().await
    }
}

/// Build a test server exposing the villa routes over `store`
pub fn villa_test_server(store: Arc<dyn VillaStore>) -> TestServer {
    let service = Arc::new(VillaService::new(store));
    TestServer::new(routes::routes(service)).expect("failed to build test server")
}
