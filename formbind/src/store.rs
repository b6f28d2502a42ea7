//! Explicit in-memory entity stores with caller-chosen lifetimes.
//!
//! A bound entity is handed to an [`EntityStore`] by the caller; nothing in the
//! parser or adapter keeps global lists. [`StoreProvider`] makes the sharing
//! policy explicit instead of leaving it to a container:
//!
//! - `Singleton`: every resolve returns the same store.
//! - `Scoped`: one store per [`Scope`] (typically one request).
//! - `Transient`: a fresh store on every resolve.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

/// Minimal persistence port for bound entities.
pub trait EntityStore<T>: Send + Sync {
    /// Identifies this store instance, so callers can observe sharing.
    fn instance_id(&self) -> Uuid;

    /// Appends an entity and returns its zero-based position.
    fn insert(&self, entity: T) -> usize;

    fn list(&self) -> Vec<T>;

    fn count(&self) -> usize;
}

/// `RwLock`-guarded vector store.
#[derive(Debug)]
pub struct MemoryStore<T> {
    id: Uuid,
    rows: RwLock<Vec<T>>,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self::seeded(Vec::new())
    }

    pub fn seeded<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            id: Uuid::new_v4(),
            rows: RwLock::new(rows.into_iter().collect()),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EntityStore<T> for MemoryStore<T>
where
    T: Clone + Send + Sync,
{
    fn instance_id(&self) -> Uuid {
        self.id
    }

    fn insert(&self, entity: T) -> usize {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        rows.push(entity);
        rows.len() - 1
    }

    fn list(&self) -> Vec<T> {
        self.rows.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn count(&self) -> usize {
        self.rows.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreLifetime {
    Singleton,
    Scoped,
    Transient,
}

/// Unit of work that owns scoped stores, e.g. one inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scope {
    id: Uuid,
}

impl Scope {
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

type StoreFactory<T> = Box<dyn Fn() -> Arc<dyn EntityStore<T>> + Send + Sync>;

/// Resolves stores according to an explicit [`StoreLifetime`].
pub struct StoreProvider<T> {
    lifetime: StoreLifetime,
    factory: StoreFactory<T>,
    singleton: Arc<dyn EntityStore<T>>,
    scoped: RwLock<HashMap<Scope, Arc<dyn EntityStore<T>>>>,
}

impl<T> StoreProvider<T>
where
    T: 'static,
{
    pub fn new<F>(lifetime: StoreLifetime, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn EntityStore<T>> + Send + Sync + 'static,
    {
        let singleton = factory();
        Self {
            lifetime,
            factory: Box::new(factory),
            singleton,
            scoped: RwLock::new(HashMap::new()),
        }
    }

    pub fn lifetime(&self) -> StoreLifetime {
        self.lifetime
    }

    pub fn resolve(&self, scope: &Scope) -> Arc<dyn EntityStore<T>> {
        match self.lifetime {
            StoreLifetime::Singleton => Arc::clone(&self.singleton),
            StoreLifetime::Transient => (self.factory)(),
            StoreLifetime::Scoped => {
                if let Some(store) = self.scoped.read().unwrap_or_else(PoisonError::into_inner).get(scope) {
                    return Arc::clone(store);
                }
                let mut scoped = self.scoped.write().unwrap_or_else(PoisonError::into_inner);
                Arc::clone(scoped.entry(*scope).or_insert_with(|| (self.factory)()))
            }
        }
    }

    /// Drops the stores owned by `scope`.
    pub fn end_scope(&self, scope: &Scope) {
        let removed = self
            .scoped
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(scope);
        if removed.is_some() {
            log::trace!("released scoped store for {}", scope.id());
        }
    }
}

impl<T> StoreProvider<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Provider backed by [`MemoryStore`]s seeded from `seed`.
    pub fn in_memory<F>(lifetime: StoreLifetime, seed: F) -> Self
    where
        F: Fn() -> Vec<T> + Send + Sync + 'static,
    {
        Self::new(lifetime, move || Arc::new(MemoryStore::seeded(seed())) as Arc<dyn EntityStore<T>>)
    }
}
