//! ContentRepository trait implementation.
//!
//! Provides the PostgreSQL-backed implementation of the ContentRepository
//! trait. Every call checks a connection out of the pool on a blocking thread
//! and returns it when the call completes.

use crate::models::{CompanyRow, ContentItemRow, LinkedAccountRow, StrategyRow};
use crate::schema::{companies, content_items, strategies, user_linked_accounts};
use crate::{DbPool, DatabaseResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use herald_core::{
    Company, ContentItem, ContentStatus, LinkedAccount, MediaField, Platform, Strategy,
    StrategyStatus,
};
use herald_error::{DatabaseError, DatabaseErrorKind, HeraldResult};
use herald_interface::ContentRepository;

/// Database-backed content repository.
#[derive(Clone)]
pub struct PostgresContentRepository {
    pool: DbPool,
}

impl std::fmt::Debug for PostgresContentRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.pool.state();
        f.debug_struct("PostgresContentRepository")
            .field("connections", &state.connections)
            .field("idle_connections", &state.idle_connections)
            .finish()
    }
}

impl PostgresContentRepository {
    /// Create a new content repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run `f` with a pooled connection on the blocking thread pool.
    async fn with_conn<T, F>(&self, f: F) -> HeraldResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> HeraldResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Query(e.to_string())))?
    }
}

fn item_exists(conn: &mut PgConnection, content_id: i32) -> DatabaseResult<bool> {
    let count: i64 = content_items::table
        .filter(content_items::id.eq(content_id))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Conditional status write: applies only while the row still holds `from`.
///
/// Missing rows are reported as `NotFound`; rows in another state as `false`.
fn conditional_update<F>(conn: &mut PgConnection, content_id: i32, update: F) -> HeraldResult<bool>
where
    F: FnOnce(&mut PgConnection) -> Result<usize, diesel::result::Error>,
{
    let changed = conn
        .transaction::<_, diesel::result::Error, _>(|conn| update(conn))
        .map_err(DatabaseError::from)?;
    if changed > 0 {
        return Ok(true);
    }
    if !item_exists(conn, content_id)? {
        return Err(DatabaseError::new(DatabaseErrorKind::NotFound).into());
    }
    Ok(false)
}

#[async_trait]
impl ContentRepository for PostgresContentRepository {
    #[tracing::instrument(skip(self))]
    async fn company(&self, company_id: i32, user_id: i32) -> HeraldResult<Company> {
        self.with_conn(move |conn| {
            let row = companies::table
                .filter(companies::id.eq(company_id))
                .filter(companies::user_id.eq(user_id))
                .select(CompanyRow::as_select())
                .first(conn)
                .map_err(DatabaseError::from)?;
            Ok(row.into())
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn companies_with_approved_strategy(&self) -> HeraldResult<Vec<Company>> {
        self.with_conn(|conn| {
            let approved = strategies::table
                .filter(strategies::status.eq(StrategyStatus::Approved.as_str()))
                .select(strategies::company_id);
            let rows = companies::table
                .filter(companies::id.eq_any(approved))
                .order(companies::id.asc())
                .select(CompanyRow::as_select())
                .load(conn)
                .map_err(DatabaseError::from)?;
            Ok(rows.into_iter().map(Company::from).collect())
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn strategy(&self, strategy_id: i32, user_id: i32) -> HeraldResult<Strategy> {
        self.with_conn(move |conn| {
            let row = strategies::table
                .inner_join(companies::table)
                .filter(strategies::id.eq(strategy_id))
                .filter(companies::user_id.eq(user_id))
                .select(StrategyRow::as_select())
                .first(conn)
                .map_err(DatabaseError::from)?;
            Ok(Strategy::try_from(row)?)
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn approved_strategy(&self, company_id: i32) -> HeraldResult<Option<Strategy>> {
        self.with_conn(move |conn| {
            let row = strategies::table
                .filter(strategies::company_id.eq(company_id))
                .filter(strategies::status.eq(StrategyStatus::Approved.as_str()))
                .order((strategies::approved_at.desc().nulls_last(), strategies::id.desc()))
                .select(StrategyRow::as_select())
                .first(conn)
                .optional()
                .map_err(DatabaseError::from)?;
            Ok(row.map(Strategy::try_from).transpose()?)
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn items_for_strategy(
        &self,
        strategy_id: i32,
        statuses: &[ContentStatus],
    ) -> HeraldResult<Vec<ContentItem>> {
        let statuses: Vec<&'static str> = statuses.iter().map(ContentStatus::as_str).collect();
        self.with_conn(move |conn| {
            let rows = content_items::table
                .filter(content_items::strategy_id.eq(strategy_id))
                .filter(content_items::status.eq_any(statuses))
                .order(content_items::id.asc())
                .select(ContentItemRow::as_select())
                .load(conn)
                .map_err(DatabaseError::from)?;

            let mut items = Vec::with_capacity(rows.len());
            for row in rows {
                let id = row.id;
                match ContentItem::try_from(row) {
                    Ok(item) => items.push(item),
                    // One unreadable row must not hide the rest of the schedule.
                    Err(e) => tracing::warn!(content_id = id, error = %e, "Skipping unreadable content item"),
                }
            }
            Ok(items)
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn content_item(&self, content_id: i32, user_id: i32) -> HeraldResult<ContentItem> {
        self.with_conn(move |conn| {
            let row = content_items::table
                .inner_join(companies::table)
                .filter(content_items::id.eq(content_id))
                .filter(companies::user_id.eq(user_id))
                .select(ContentItemRow::as_select())
                .first(conn)
                .map_err(DatabaseError::from)?;
            Ok(ContentItem::try_from(row)?)
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn linked_account(
        &self,
        user_id: i32,
        platform: Platform,
    ) -> HeraldResult<Option<LinkedAccount>> {
        self.with_conn(move |conn| {
            let row = user_linked_accounts::table
                .filter(user_linked_accounts::user_id.eq(user_id))
                .filter(user_linked_accounts::platform.eq(platform.account_key()))
                .order((
                    user_linked_accounts::created_at.desc(),
                    user_linked_accounts::id.desc(),
                ))
                .select(LinkedAccountRow::as_select())
                .first(conn)
                .optional()
                .map_err(DatabaseError::from)?;
            Ok(row.map(LinkedAccount::try_from).transpose()?)
        })
        .await
    }

    #[tracing::instrument(skip(self, url))]
    async fn set_media_url(
        &self,
        content_id: i32,
        field: MediaField,
        url: &str,
    ) -> HeraldResult<()> {
        let url = url.to_string();
        self.with_conn(move |conn| {
            let target = content_items::table.filter(content_items::id.eq(content_id));
            let changed = match field {
                MediaField::MediaLink => diesel::update(target)
                    .set(content_items::media_link.eq(&url))
                    .execute(conn),
                MediaField::VideoPlaceholder => diesel::update(target)
                    .set(content_items::video_placeholder.eq(&url))
                    .execute(conn),
            }
            .map_err(DatabaseError::from)?;

            if changed == 0 {
                return Err(DatabaseError::new(DatabaseErrorKind::NotFound).into());
            }
            Ok(())
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn transition_status(
        &self,
        content_id: i32,
        from: ContentStatus,
        to: ContentStatus,
    ) -> HeraldResult<bool> {
        self.with_conn(move |conn| {
            conditional_update(conn, content_id, |conn| {
                diesel::update(
                    content_items::table
                        .filter(content_items::id.eq(content_id))
                        .filter(content_items::status.eq(from.as_str())),
                )
                .set(content_items::status.eq(to.as_str()))
                .execute(conn)
            })
        })
        .await
    }

    #[tracing::instrument(skip(self, caption, hashtags))]
    async fn approve_content(
        &self,
        content_id: i32,
        from: ContentStatus,
        caption: &str,
        hashtags: Option<&str>,
    ) -> HeraldResult<bool> {
        let caption = caption.to_string();
        let hashtags = hashtags.map(str::to_string);
        self.with_conn(move |conn| {
            conditional_update(conn, content_id, |conn| {
                diesel::update(
                    content_items::table
                        .filter(content_items::id.eq(content_id))
                        .filter(content_items::status.eq(from.as_str())),
                )
                .set((
                    content_items::status.eq(ContentStatus::Approved.as_str()),
                    content_items::caption.eq(Some(caption)),
                    content_items::hashtags.eq(hashtags),
                ))
                .execute(conn)
            })
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn reject_content(
        &self,
        content_id: i32,
        from: ContentStatus,
        rejected_at: DateTime<Utc>,
    ) -> HeraldResult<bool> {
        self.with_conn(move |conn| {
            conditional_update(conn, content_id, |conn| {
                diesel::update(
                    content_items::table
                        .filter(content_items::id.eq(content_id))
                        .filter(content_items::status.eq(from.as_str())),
                )
                .set((
                    content_items::status.eq(ContentStatus::Rejected.as_str()),
                    content_items::rejected_at.eq(Some(rejected_at)),
                ))
                .execute(conn)
            })
        })
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn approve_strategy(
        &self,
        strategy_id: i32,
        approved_at: DateTime<Utc>,
    ) -> HeraldResult<Strategy> {
        self.with_conn(move |conn| {
            let row = conn
                .transaction::<_, diesel::result::Error, _>(|conn| {
                    let company_id: i32 = strategies::table
                        .find(strategy_id)
                        .select(strategies::company_id)
                        .first(conn)?;

                    let archived = diesel::update(
                        strategies::table
                            .filter(strategies::company_id.eq(company_id))
                            .filter(strategies::status.eq(StrategyStatus::Approved.as_str()))
                            .filter(strategies::id.ne(strategy_id)),
                    )
                    .set((
                        strategies::status.eq(StrategyStatus::Archived.as_str()),
                        strategies::archived_at.eq(Some(approved_at)),
                    ))
                    .execute(conn)?;
                    tracing::debug!(company_id, archived, "Archived previous strategies");

                    diesel::update(strategies::table.find(strategy_id))
                        .set((
                            strategies::status.eq(StrategyStatus::Approved.as_str()),
                            strategies::approved_at.eq(Some(approved_at)),
                        ))
                        .returning(StrategyRow::as_returning())
                        .get_result(conn)
                })
                .map_err(DatabaseError::from)?;
            Ok(Strategy::try_from(row)?)
        })
        .await
    }
}
