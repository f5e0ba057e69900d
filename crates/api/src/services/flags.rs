//! Flag lifecycle service.
//!
//! Owns create/update/toggle/list and keeps the evaluation cache consistent
//! after each mutation. Every mutation re-reads the affected key from the
//! store and overwrites the cache entry with the committed state.

use domain::models::{
    CreateFlagRequest, EvaluationResult, Flag, UpdateFlagRequest,
};
use domain::services::evaluation;
use persistence::repositories::FlagRepository;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};

use crate::services::FlagCache;

/// Application service for flag management and evaluation.
///
/// The cache is injected explicitly; there is no process-wide singleton.
#[derive(Clone)]
pub struct FlagService {
    repo: FlagRepository,
    cache: Arc<FlagCache>,
}

impl FlagService {
    pub fn new(pool: PgPool, cache: Arc<FlagCache>) -> Self {
        Self {
            repo: FlagRepository::new(pool),
            cache,
        }
    }

    /// Lists all flags, read authoritatively from the store. The cache is
    /// only for the evaluation path.
    pub async fn list(&self) -> Result<Vec<Flag>, sqlx::Error> {
        let entities = self.repo.list().await?;
        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Creates a flag: clamps the rollout percentage into [0, 100], derives
    /// the immutable key from the name, persists flag + audit entry, then
    /// refreshes the cache from the committed row.
    pub async fn create(&self, request: CreateFlagRequest) -> Result<Flag, sqlx::Error> {
        let key = domain::models::flag::derive_key(&request.name);
        let rollout = request.rollout_percentage.clamp(0, 100);

        let entity = self
            .repo
            .create(
                &request.name,
                &key,
                request.enabled,
                rollout,
                request.target_user_ids.as_deref(),
            )
            .await?;

        let flag: Flag = entity.into();
        info!(flag_id = flag.id, key = %flag.key, "Flag created");

        self.refresh_cache(&flag.key).await;
        Ok(flag)
    }

    /// Applies a partial update to a flag. Absent fields keep their prior
    /// value; a provided rollout percentage is clamped into [0, 100]. The
    /// cache entry is refreshed under the flag's immutable key.
    pub async fn update(
        &self,
        id: i64,
        request: UpdateFlagRequest,
    ) -> Result<Option<Flag>, sqlx::Error> {
        let rollout = request.rollout_percentage.map(|p| p.clamp(0, 100));

        let entity = self
            .repo
            .update(
                id,
                request.name.as_deref(),
                rollout,
                request.enabled,
                request.target_user_ids.as_deref(),
            )
            .await?;

        let Some(entity) = entity else {
            return Ok(None);
        };

        let flag: Flag = entity.into();
        info!(flag_id = flag.id, key = %flag.key, "Flag updated");

        self.refresh_cache(&flag.key).await;
        Ok(Some(flag))
    }

    /// Flips a flag's enabled bit and refreshes the cache.
    pub async fn toggle(&self, id: i64) -> Result<Option<Flag>, sqlx::Error> {
        let entity = self.repo.toggle(id).await?;

        let Some(entity) = entity else {
            return Ok(None);
        };

        let flag: Flag = entity.into();
        info!(flag_id = flag.id, key = %flag.key, enabled = flag.enabled, "Flag toggled");

        self.refresh_cache(&flag.key).await;
        Ok(Some(flag))
    }

    /// Evaluates a flag for a user.
    ///
    /// Reads the cache first, falling through to the store on a miss (and
    /// populating the cache on a hit). Never fails past this boundary: an
    /// unknown key yields `flag_not_found` and a store failure yields the
    /// fail-closed `error` result.
    pub async fn evaluate(&self, flag_key: &str, user_id: &str) -> EvaluationResult {
        let flag = match self.cache.get(flag_key) {
            Some(flag) => flag,
            None => match self.repo.find_by_key(flag_key).await {
                Ok(Some(entity)) => {
                    let flag: Flag = entity.into();
                    self.cache.insert(flag.clone());
                    flag
                }
                Ok(None) => return EvaluationResult::not_found(flag_key),
                Err(err) => {
                    warn!(key = %flag_key, error = %err, "Store read failed during evaluation");
                    return EvaluationResult::error(flag_key);
                }
            },
        };

        evaluation::evaluate(&flag, user_id)
    }

    /// Re-reads `key` from the store and overwrites (or removes) the cache
    /// entry. Best-effort: a failed re-read leaves the previous entry in
    /// place until the next write, and the store remains authoritative.
    async fn refresh_cache(&self, key: &str) {
        match self.repo.find_by_key(key).await {
            Ok(found) => self.cache.refresh(key, found.map(Into::into)),
            Err(err) => {
                warn!(key = %key, error = %err, "Cache refresh read failed");
            }
        }
    }
}
