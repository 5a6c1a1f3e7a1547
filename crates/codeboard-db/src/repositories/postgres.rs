//! PostgreSQL implementation of CodeRegistry and QuotaLedger
//!
//! Every write runs in one transaction. Transaction-scoped advisory locks
//! serialize the actions of one user, and of one core code for posts, so the
//! counts read inside the transaction are the counts the rules decide on.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use codeboard_core::entities::{Code, NewCode};
use codeboard_core::error::DomainError;
use codeboard_core::rules::{ClaimFacts, PostFacts, QuotaLimits};
use codeboard_core::traits::{ActionStamp, CodeRegistry, QuotaLedger, RepoResult};
use codeboard_core::value_objects::{CalendarDay, CodeId, UserToken};

use crate::mappers::CodeInsert;
use crate::models::CodeModel;

use super::error::{map_db_error, map_unique_violation};

const SCHEMA: &str = include_str!("../../schema/board.sql");

/// Advisory lock namespaces (first key of the two-key form)
const USER_LOCK: i32 = 0x6362_0001;
const CORE_CODE_LOCK: i32 = 0x6362_0002;
const SCHEMA_LOCK: i32 = 0x6362_0003;

const CODE_COLUMNS: &str =
    "id, content, core_code, owner_token, remaining_uses, created_at, posted_on";

/// PostgreSQL board store
#[derive(Clone)]
pub struct PgBoardStore {
    pool: PgPool,
}

impl PgBoardStore {
    /// Create a new PgBoardStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create tables and indexes if they do not exist yet
    ///
    /// Concurrent callers are serialized so `IF NOT EXISTS` cannot race.
    pub async fn ensure_schema(&self) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        Self::lock(&mut tx, SCHEMA_LOCK, "schema").await?;
        sqlx::raw_sql(SCHEMA)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    async fn lock(
        tx: &mut Transaction<'_, Postgres>,
        namespace: i32,
        key: &str,
    ) -> RepoResult<()> {
        sqlx::query("SELECT pg_advisory_xact_lock($1, hashtext($2))")
            .bind(namespace)
            .bind(key)
            .execute(&mut **tx)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn claims_on(
        tx: &mut Transaction<'_, Postgres>,
        user: &UserToken,
        day: CalendarDay,
    ) -> RepoResult<u32> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM claims WHERE user_token = $1 AND claimed_on = $2
            "#,
        )
        .bind(user.as_str())
        .bind(day.date())
        .fetch_one(&mut **tx)
        .await
        .map_err(map_db_error)?;

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}

#[async_trait]
impl CodeRegistry for PgBoardStore {
    #[instrument(skip(self))]
    async fn list_active(&self, limit: usize) -> RepoResult<Vec<Code>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let results = sqlx::query_as::<_, CodeModel>(&format!(
            r#"
            SELECT {CODE_COLUMNS} FROM (
                SELECT {CODE_COLUMNS}
                FROM codes
                WHERE remaining_uses > 0
                ORDER BY created_at DESC, id DESC
                LIMIT $1
            ) recent
            ORDER BY created_at ASC, id ASC
            "#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Code::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: CodeId) -> RepoResult<Option<Code>> {
        let result = sqlx::query_as::<_, CodeModel>(&format!(
            "SELECT {CODE_COLUMNS} FROM codes WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Code::from))
    }

    #[instrument(skip(self, draft), fields(owner = %draft.owner))]
    async fn create(
        &self,
        draft: NewCode,
        stamp: ActionStamp,
        limits: QuotaLimits,
        initial_uses: u32,
    ) -> RepoResult<Code> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Author first, then core code; claims never take the core code lock
        Self::lock(&mut tx, USER_LOCK, draft.owner.as_str()).await?;
        Self::lock(&mut tx, CORE_CODE_LOCK, &draft.core_code).await?;

        let posts_today = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT posts_made FROM daily_posts WHERE user_token = $1 AND posted_on = $2
            "#,
        )
        .bind(draft.owner.as_str())
        .bind(stamp.day.date())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .unwrap_or(0);

        let duplicate = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM codes WHERE core_code = $1 AND remaining_uses > 0)
            "#,
        )
        .bind(&draft.core_code)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        limits.check_post(PostFacts {
            posts_today: u32::try_from(posts_today).unwrap_or(0),
            duplicate,
        })?;

        let code = Code::create(draft, initial_uses, stamp.at, stamp.day);
        let insert = CodeInsert::new(&code);
        sqlx::query(
            r#"
            INSERT INTO codes (id, content, core_code, owner_token, remaining_uses, created_at, posted_on)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(insert.id)
        .bind(insert.content)
        .bind(insert.core_code)
        .bind(insert.owner_token)
        .bind(insert.remaining_uses)
        .bind(insert.created_at)
        .bind(insert.posted_on)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO daily_posts (user_token, posted_on, posts_made)
            VALUES ($1, $2, 1)
            ON CONFLICT (user_token, posted_on)
            DO UPDATE SET posts_made = daily_posts.posts_made + 1
            "#,
        )
        .bind(insert.owner_token)
        .bind(insert.posted_on)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(code)
    }

    #[instrument(skip(self, claimant), fields(claimant = %claimant))]
    async fn claim(
        &self,
        id: CodeId,
        claimant: &UserToken,
        stamp: ActionStamp,
        limits: QuotaLimits,
    ) -> RepoResult<Code> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        Self::lock(&mut tx, USER_LOCK, claimant.as_str()).await?;

        let current = sqlx::query_as::<_, CodeModel>(&format!(
            "SELECT {CODE_COLUMNS} FROM codes WHERE id = $1 FOR UPDATE"
        ))
        .bind(id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .map(Code::from);

        let claims_today = Self::claims_on(&mut tx, claimant, stamp.day).await?;

        let already_claimed = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM claims WHERE user_token = $1 AND code_id = $2)
            "#,
        )
        .bind(claimant.as_str())
        .bind(id.into_inner())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        limits.check_claim(
            claimant,
            ClaimFacts {
                code_id: id,
                code: current.as_ref(),
                claims_today,
                already_claimed,
            },
        )?;

        let updated = sqlx::query_as::<_, CodeModel>(&format!(
            r#"
            UPDATE codes
            SET remaining_uses = remaining_uses - 1
            WHERE id = $1 AND remaining_uses > 0
            RETURNING {CODE_COLUMNS}
            "#
        ))
        .bind(id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::CodeExhausted)?;

        sqlx::query(
            r#"
            INSERT INTO claims (user_token, code_id, claimed_on, claimed_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(claimant.as_str())
        .bind(id.into_inner())
        .bind(stamp.day.date())
        .bind(stamp.at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyClaimed))?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(Code::from(updated))
    }

    async fn ping(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}

#[async_trait]
impl QuotaLedger for PgBoardStore {
    #[instrument(skip(self))]
    async fn post_count(&self, user: &UserToken, day: CalendarDay) -> RepoResult<u32> {
        let count = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT posts_made FROM daily_posts WHERE user_token = $1 AND posted_on = $2
            "#,
        )
        .bind(user.as_str())
        .bind(day.date())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .unwrap_or(0);

        Ok(u32::try_from(count).unwrap_or(0))
    }

    #[instrument(skip(self))]
    async fn claim_count(&self, user: &UserToken, day: CalendarDay) -> RepoResult<u32> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM claims WHERE user_token = $1 AND claimed_on = $2
            "#,
        )
        .bind(user.as_str())
        .bind(day.date())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    #[instrument(skip(self))]
    async fn has_claimed(&self, user: &UserToken, code_id: CodeId) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM claims WHERE user_token = $1 AND code_id = $2)
            "#,
        )
        .bind(user.as_str())
        .bind(code_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn claimed_among(
        &self,
        user: &UserToken,
        ids: &[CodeId],
    ) -> RepoResult<HashSet<CodeId>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let ids: Vec<Uuid> = ids.iter().map(|id| id.into_inner()).collect();

        let claimed = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT code_id FROM claims WHERE user_token = $1 AND code_id = ANY($2)
            "#,
        )
        .bind(user.as_str())
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(claimed.into_iter().map(CodeId::from_uuid).collect())
    }

    #[instrument(skip(self))]
    async fn prune_before(&self, cutoff: CalendarDay) -> RepoResult<u64> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let claims = sqlx::query("DELETE FROM claims WHERE claimed_on < $1")
            .bind(cutoff.date())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        let posts = sqlx::query("DELETE FROM daily_posts WHERE posted_on < $1")
            .bind(cutoff.date())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        tx.commit().await.map_err(map_db_error)?;

        Ok(claims + posts)
    }
}
