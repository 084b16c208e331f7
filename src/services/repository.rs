//! Catalog repository: CRUD over one JSON array per entity kind.
//!
//! The repository is the only component that touches the [`KvStore`].
//! Every mutation reads the whole array, edits it in memory and writes it
//! back. Writes operate on the raw JSON values so that entries which fail to
//! decode are carried through untouched instead of being dropped.

use crate::models::CatalogEntity;
use crate::storage::KvStore;
use crate::{Error, Result};
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Repository for a single entity kind.
pub struct CatalogRepository<E: CatalogEntity> {
    store: Arc<dyn KvStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: CatalogEntity> Clone for CatalogRepository<E> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.store))
    }
}

impl<E: CatalogEntity> CatalogRepository<E> {
    /// Creates a repository over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    fn key() -> &'static str {
        E::KIND.store_key()
    }

    fn load_raw(&self) -> Result<Vec<Value>> {
        match self.store.get(Self::key())? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(Error::StoreUnavailable {
                operation: format!("load_{}", Self::key()),
                cause: format!("expected a JSON array, found {}", json_type(&other)),
            }),
        }
    }

    fn save_raw(&self, items: Vec<Value>) -> Result<()> {
        self.store.set(Self::key(), &Value::Array(items))
    }

    fn decode(items: Vec<Value>) -> Vec<E> {
        items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<E>(item) {
                Ok(entity) => Some(entity),
                Err(e) => {
                    warn!(kind = %E::KIND, error = %e, "Skipping undecodable catalog entry");
                    None
                },
            })
            .collect()
    }

    fn encode(entity: &E) -> Result<Value> {
        serde_json::to_value(entity).map_err(|e| Error::OperationFailed {
            operation: format!("serialize_{}", E::KIND.as_str()),
            cause: e.to_string(),
        })
    }

    /// Reads every entity of this kind.
    ///
    /// Never fails: an absent key or an unreadable store yields an empty list.
    #[must_use]
    pub fn list_all(&self) -> Vec<E> {
        match self.try_list_all() {
            Ok(entities) => entities,
            Err(e) => {
                warn!(kind = %E::KIND, error = %e, "Store read failed, returning empty collection");
                Vec::new()
            },
        }
    }

    /// Reads every entity of this kind, propagating store failures.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnavailable`] if the store cannot be read.
    pub fn try_list_all(&self) -> Result<Vec<E>> {
        self.load_raw().map(Self::decode)
    }

    /// Finds an entity by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no entity has this id.
    pub fn find_by_id(&self, id: &str) -> Result<E> {
        Self::find_in(self.list_all(), id)
    }

    /// Finds an entity by id for a subsequent write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnavailable`] if the store cannot be read, or
    /// [`Error::NotFound`] if no entity has this id.
    pub fn find_for_update(&self, id: &str) -> Result<E> {
        Self::find_in(self.try_list_all()?, id)
    }

    fn find_in(entities: Vec<E>, id: &str) -> Result<E> {
        let id = id.trim();
        entities
            .into_iter()
            .find(|e| e.id() == id)
            .ok_or_else(|| Error::NotFound {
                kind: E::KIND,
                id: id.to_string(),
            })
    }

    /// Entities whose category equals `category`, ignoring case.
    #[must_use]
    pub fn filter_by_category(&self, category: &str) -> Vec<E> {
        let wanted = category.to_lowercase();
        self.list_all()
            .into_iter()
            .filter(|e| e.category().to_lowercase() == wanted)
            .collect()
    }

    /// Appends a new entity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateId`] if the id is taken, or a store error.
    #[instrument(skip(self, entity), fields(kind = %E::KIND, id = entity.id()))]
    pub fn append(&self, entity: &E) -> Result<()> {
        let mut items = self.load_raw()?;
        if items.iter().any(|item| raw_id(item) == Some(entity.id())) {
            return Err(Error::DuplicateId {
                kind: E::KIND,
                id: entity.id().to_string(),
            });
        }
        items.push(Self::encode(entity)?);
        self.save_raw(items)
    }

    /// Replaces the entity with id `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no entity has this id, or a store error.
    #[instrument(skip(self, entity), fields(kind = %E::KIND))]
    pub fn replace(&self, id: &str, entity: &E) -> Result<()> {
        let id = id.trim();
        let mut items = self.load_raw()?;
        let slot = items
            .iter_mut()
            .find(|item| raw_id(item) == Some(id))
            .ok_or_else(|| Error::NotFound {
                kind: E::KIND,
                id: id.to_string(),
            })?;
        *slot = Self::encode(entity)?;
        self.save_raw(items)
    }

    /// Overwrites the whole collection.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub fn replace_all(&self, entities: &[E]) -> Result<()> {
        let items = entities.iter().map(Self::encode).collect::<Result<Vec<_>>>()?;
        self.save_raw(items)
    }
}

fn raw_id(item: &Value) -> Option<&str> {
    item.get("id").and_then(Value::as_str)
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
