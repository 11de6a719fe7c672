//! Keyed JSON blob storage for saved recipes and the local identity.
//!
//! Keys:
//! - `current_user`            → UserIdentity of the signed-in profile
//! - `profile:<id>`            → UserIdentity kept across sign-outs
//! - `recipes:guest`           → saved collection without an identity
//! - `recipes:user:<id>`       → saved collection of one identity
//! - `profile_email:<email>`   → id of the profile currently using that e-mail
//!
//! A missing or unparsable blob reads as empty. Every mutation is a single
//! whole-value write, so a failed write leaves the previous value in place.
//! Collection records that fail to parse are carried through writes as-is,
//! and a collection blob that is not a list is copied to
//! `<key>:unreadable:<millis>` before it is replaced.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::recipe::Recipe;
use crate::models::user::UserIdentity;
use crate::recipes::reconciler::{self, SaveOutcome};

const CURRENT_USER_KEY: &str = "current_user";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage is full")]
    StorageFull,

    #[error("write failed: {0}")]
    Write(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<redis::RedisError> for StoreError {
    fn from(e: redis::RedisError) -> Self {
        // Redis refuses writes past `maxmemory` with an OOM error.
        if e.code() == Some("OOM") {
            StoreError::StorageFull
        } else {
            StoreError::Backend(e.to_string())
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Blob store backends
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Redis-backed store. Blobs larger than `quota_bytes` are refused up front.
pub struct RedisBlobStore {
    conn: MultiplexedConnection,
    quota_bytes: usize,
}

impl RedisBlobStore {
    pub fn new(conn: MultiplexedConnection, quota_bytes: usize) -> Self {
        Self { conn, quota_bytes }
    }
}

#[async_trait]
impl BlobStore for RedisBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        if value.len() > self.quota_bytes {
            warn!(
                "Refusing {} byte write to '{}': quota is {} bytes",
                value.len(),
                key,
                self.quota_bytes
            );
            return Err(StoreError::StorageFull);
        }
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }
}

/// In-process store with a quota on the total stored bytes.
pub struct MemoryBlobStore {
    blobs: std::sync::Mutex<HashMap<String, Vec<u8>>>,
    quota_bytes: usize,
}

impl MemoryBlobStore {
    pub fn new(quota_bytes: usize) -> Self {
        Self {
            blobs: std::sync::Mutex::new(HashMap::new()),
            quota_bytes,
        }
    }

    fn blobs(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // A poisoned map is still a consistent map: every write is a single insert.
        self.blobs.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.blobs().get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        let mut blobs = self.blobs();
        let others: usize = blobs
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(_, v)| v.len())
            .sum();
        if others + value.len() > self.quota_bytes {
            return Err(StoreError::StorageFull);
        }
        blobs.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.blobs().remove(key);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scopes
// ────────────────────────────────────────────────────────────────────────────

/// Which saved collection is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Guest,
    User(Uuid),
}

impl Scope {
    pub fn of(identity: Option<&UserIdentity>) -> Self {
        identity.map_or(Scope::Guest, |user| Scope::User(user.id))
    }

    pub fn storage_key(&self) -> String {
        match self {
            Scope::Guest => "recipes:guest".to_string(),
            Scope::User(id) => format!("recipes:user:{id}"),
        }
    }
}

fn profile_key(id: Uuid) -> String {
    format!("profile:{id}")
}

fn profile_email_key(email: &str) -> String {
    format!("profile_email:{email}")
}

fn backup_key(key: &str) -> String {
    format!("{key}:unreadable:{}", Utc::now().timestamp_millis())
}

/// A collection as read from storage.
#[derive(Default)]
struct StoredCollection {
    recipes: Vec<Recipe>,
    /// Records that did not parse as recipes, kept verbatim.
    unreadable: Vec<Value>,
    /// The whole blob, when it was not a JSON list at all.
    damaged_blob: Option<Vec<u8>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Recipe store
// ────────────────────────────────────────────────────────────────────────────

/// Typed access to the blob store. Cheap to clone.
#[derive(Clone)]
pub struct RecipeStore {
    blobs: Arc<dyn BlobStore>,
    /// Serializes read-modify-write cycles on collections.
    write_lock: Arc<Mutex<()>>,
}

impl RecipeStore {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            blobs,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Loads the collection of `scope`. Missing or corrupt data is empty.
    ///
    /// Records saved before recipes carried ids are given one here and the
    /// collection is written back, so the new ids stay stable.
    pub async fn collection(&self, scope: Scope) -> Result<Vec<Recipe>, StoreError> {
        Ok(self.load(scope).await?.recipes)
    }

    pub async fn remove_collection(&self, scope: Scope) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.blobs.delete(&scope.storage_key()).await
    }

    /// Reconciles `recipe` into the collection. Returns the stored recipe and
    /// the updated collection.
    pub async fn save_recipe(
        &self,
        scope: Scope,
        recipe: Recipe,
    ) -> Result<(Recipe, SaveOutcome, Vec<Recipe>), StoreError> {
        let _guard = self.write_lock.lock().await;
        let stored = self.load_for_write(scope).await?;
        let (updated, index, outcome) = reconciler::save(stored.recipes, recipe);

        self.write_collection(&scope.storage_key(), &updated, &stored.unreadable)
            .await?;

        let saved = updated[index].clone();
        debug!("Saved recipe {} ({:?})", saved.id, outcome);
        Ok((saved, outcome, updated))
    }

    /// Removes a recipe by id. Absent ids are a no-op and skip the write.
    pub async fn delete_recipe(&self, scope: Scope, id: Uuid) -> Result<Vec<Recipe>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let stored = self.load_for_write(scope).await?;
        let before = stored.recipes.len();
        let updated = reconciler::delete(stored.recipes, id);

        if updated.len() != before {
            self.write_collection(&scope.storage_key(), &updated, &stored.unreadable)
                .await?;
        }
        Ok(updated)
    }

    pub async fn current_user(&self) -> Result<Option<UserIdentity>, StoreError> {
        self.read_json(CURRENT_USER_KEY).await
    }

    pub async fn set_current_user(&self, identity: Option<&UserIdentity>) -> Result<(), StoreError> {
        match identity {
            Some(user) => self.write_json(CURRENT_USER_KEY, user).await,
            None => self.blobs.delete(CURRENT_USER_KEY).await,
        }
    }

    pub async fn active_scope(&self) -> Result<Scope, StoreError> {
        Ok(Scope::of(self.current_user().await?.as_ref()))
    }

    pub async fn profile(&self, id: Uuid) -> Result<Option<UserIdentity>, StoreError> {
        self.read_json(&profile_key(id)).await
    }

    pub async fn put_profile(&self, identity: &UserIdentity) -> Result<(), StoreError> {
        self.write_json(&profile_key(identity.id), identity).await
    }

    pub async fn delete_profile(&self, id: Uuid) -> Result<(), StoreError> {
        self.blobs.delete(&profile_key(id)).await
    }

    /// Id of the profile that last claimed `email`, if any.
    pub async fn profile_id_for_email(&self, email: &str) -> Result<Option<Uuid>, StoreError> {
        self.read_json(&profile_email_key(email)).await
    }

    pub async fn put_profile_email(&self, email: &str, id: Uuid) -> Result<(), StoreError> {
        self.write_json(&profile_email_key(email), &id).await
    }

    pub async fn delete_profile_email(&self, email: &str) -> Result<(), StoreError> {
        self.blobs.delete(&profile_email_key(email)).await
    }

    /// Reads a collection one record at a time. Records that do not parse are
    /// kept aside as raw JSON so the next write carries them along.
    async fn load(&self, scope: Scope) -> Result<StoredCollection, StoreError> {
        let key = scope.storage_key();
        let Some(bytes) = self.blobs.get(&key).await? else {
            return Ok(StoredCollection::default());
        };
        let records = match serde_json::from_slice::<Vec<Value>>(&bytes) {
            Ok(records) => records,
            Err(e) => {
                warn!("Ignoring unreadable collection '{key}': {e}");
                return Ok(StoredCollection {
                    damaged_blob: Some(bytes),
                    ..StoredCollection::default()
                });
            }
        };

        let mut stored = StoredCollection::default();
        let mut legacy = 0;
        for record in records {
            let missing_id = record.get("id").is_none();
            match serde_json::from_value::<Recipe>(record.clone()) {
                Ok(recipe) => {
                    if missing_id {
                        legacy += 1;
                    }
                    stored.recipes.push(recipe);
                }
                Err(e) => {
                    warn!("Keeping unreadable record in '{key}' aside: {e}");
                    stored.unreadable.push(record);
                }
            }
        }

        if legacy > 0 {
            info!("Assigned ids to {legacy} legacy recipe(s) in '{key}'");
            if let Err(e) = self
                .write_collection(&key, &stored.recipes, &stored.unreadable)
                .await
            {
                warn!("Could not persist ids for legacy recipes in '{key}': {e}");
            }
        }

        Ok(stored)
    }

    /// Like `load`, but copies a blob that is not a JSON list to a backup key
    /// first. If the copy fails the write is refused.
    async fn load_for_write(&self, scope: Scope) -> Result<StoredCollection, StoreError> {
        let stored = self.load(scope).await?;
        if let Some(bytes) = &stored.damaged_blob {
            let backup = backup_key(&scope.storage_key());
            self.blobs.put(&backup, bytes.clone()).await?;
            warn!("Moved unreadable collection to '{backup}'");
        }
        Ok(stored)
    }

    async fn write_collection(
        &self,
        key: &str,
        recipes: &[Recipe],
        unreadable: &[Value],
    ) -> Result<(), StoreError> {
        let mut records = recipes
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<Value>, _>>()
            .map_err(|e| StoreError::Write(e.to_string()))?;
        records.extend(unreadable.iter().cloned());
        self.write_json(key, &records).await
    }

    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(bytes) = self.blobs.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Ignoring unreadable blob '{key}': {e}");
                Ok(None)
            }
        }
    }

    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value).map_err(|e| StoreError::Write(e.to_string()))?;
        self.blobs.put(key, bytes).await
    }
}
