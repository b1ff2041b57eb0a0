//! Data access for villas.
//!
//! A [`VillaStore`] is the long-lived handle injected into the service. Every
//! request opens its own [`VillaRepository`] scope from it; the scope owns a
//! [`ChangeTracker`] so staged updates and tracked ids never leak between
//! requests.

mod memory;
mod postgres;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::core::error::{AppError, Result};
use crate::features::villas::models::{NewVilla, Villa};

pub use memory::InMemoryVillaStore;
pub use postgres::PgVillaStore;

/// Typed lookup used by [`VillaRepository::get`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VillaFilter {
    Id(i32),
    /// Exact name match ignoring case
    NameIgnoreCase(String),
}

impl VillaFilter {
    pub fn matches(&self, villa: &Villa) -> bool {
        match self {
            VillaFilter::Id(id) => villa.id == *id,
            VillaFilter::NameIgnoreCase(name) => villa.name.to_lowercase() == name.to_lowercase(),
        }
    }
}

pub trait VillaStore: Send + Sync {
    /// Open a repository scope for a single request
    fn scope(&self) -> Box<dyn VillaRepository>;
}

#[async_trait]
pub trait VillaRepository: Send {
    async fn get_all(&mut self) -> Result<Vec<Villa>>;

    /// First villa matching `filter`. A tracked read enlists the villa in
    /// this scope's identity map.
    async fn get(&mut self, filter: &VillaFilter, tracked: bool) -> Result<Option<Villa>>;

    /// Insert and persist immediately, returning the villa with its new id
    async fn create(&mut self, villa: NewVilla) -> Result<Villa>;

    /// Stage a full replacement. Nothing is written until [`save`](Self::save).
    async fn update(&mut self, villa: Villa) -> Result<()>;

    /// Delete and persist immediately
    async fn remove(&mut self, villa: Villa) -> Result<()>;

    /// Commit every staged update
    async fn save(&mut self) -> Result<()>;
}

/// Per-scope identity map and pending updates
#[derive(Debug, Default)]
pub struct ChangeTracker {
    tracked: HashSet<i32>,
    pending: Vec<Villa>,
}

impl ChangeTracker {
    pub fn attach(&mut self, villa: &Villa) {
        self.tracked.insert(villa.id);
    }

    pub fn detach(&mut self, id: i32) {
        self.tracked.remove(&id);
        self.pending.retain(|v| v.id != id);
    }

    /// Queue `villa` for the next save.
    ///
    /// Fails when a tracked read already enlisted another instance with the
    /// same id in this scope.
    pub fn stage_update(&mut self, villa: Villa) -> Result<()> {
        if self.tracked.contains(&villa.id) {
            return Err(AppError::Conflict(format!(
                "Villa {} is already tracked in this scope",
                villa.id
            )));
        }
        self.pending.retain(|v| v.id != villa.id);
        self.pending.push(villa);
        Ok(())
    }

    pub fn take_pending(&mut self) -> Vec<Villa> {
        std::mem::take(&mut self.pending)
    }
}
