use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Select, Set, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use tracing::debug;

use crate::{
    entities::{cache, review},
    error::{AppError, AppResult},
};

/// Title metadata mirrored from the provider when a review is written.
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub title_id: String,
    pub title: String,
    pub plot: Option<String>,
    pub image: Option<String>,
}

/// The editable columns of a review.
#[derive(Clone, Debug)]
pub struct ReviewInput {
    pub rating: f64,
    pub title: String,
    pub content: String,
    pub author: Option<String>,
}

/// A review joined with its cache row.
#[derive(Clone, Debug, PartialEq, FromQueryResult)]
pub struct ReviewRow {
    pub id: i32,
    pub rating: f64,
    pub review_title: String,
    pub content: String,
    pub author: Option<String>,
    pub date: i64,
    pub title_id: String,
    pub cache_title: String,
    pub plot: Option<String>,
    pub image: Option<String>,
}

#[derive(Clone)]
pub struct Store {
    db: DatabaseConnection,
}

impl Store {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[cfg(test)]
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Caches the title and stores the review in a single transaction.
    /// Returns `(cache_id, review_id)`.
    pub async fn submit_review(
        &self,
        entry: &CacheEntry,
        input: &ReviewInput,
    ) -> AppResult<(i32, i32)> {
        let txn = self.db.begin().await?;
        let cache_id = upsert_cache(&txn, entry).await?;
        let review_id = insert_review(&txn, cache_id, input).await?;
        txn.commit().await?;

        debug!(title_id = %entry.title_id, cache_id, review_id, "review submitted");
        Ok((cache_id, review_id))
    }

    pub async fn list_reviews(&self) -> AppResult<Vec<ReviewRow>> {
        Ok(joined_reviews().into_model::<ReviewRow>().all(&self.db).await?)
    }

    pub async fn get_review(&self, id: i32) -> AppResult<ReviewRow> {
        joined_reviews()
            .filter(review::Column::Id.eq(id))
            .into_model::<ReviewRow>()
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("review {id}")))
    }

    /// Reviews whose own title contains `needle`, using the backend's LIKE rules.
    pub async fn filter_reviews_by_title(&self, needle: &str) -> AppResult<Vec<ReviewRow>> {
        Ok(joined_reviews()
            .filter(review::Column::Title.contains(needle))
            .into_model::<ReviewRow>()
            .all(&self.db)
            .await?)
    }

    /// Overwrites every editable column and stamps the review with the current time.
    pub async fn update_review(&self, id: i32, input: &ReviewInput) -> AppResult<()> {
        let res = review::Entity::update_many()
            .col_expr(review::Column::Title, Expr::value(input.title.clone()))
            .col_expr(review::Column::Content, Expr::value(input.content.clone()))
            .col_expr(review::Column::Author, Expr::value(input.author.clone()))
            .col_expr(review::Column::Rating, Expr::value(input.rating))
            .col_expr(review::Column::Date, Expr::value(now_sec()))
            .filter(review::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if res.rows_affected == 0 {
            return Err(AppError::NotFound(format!("review {id}")));
        }
        Ok(())
    }

    /// Removes the review. The cache row it pointed at is kept.
    pub async fn delete_review(&self, id: i32) -> AppResult<u64> {
        let res = review::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected)
    }
}

fn joined_reviews() -> Select<review::Entity> {
    review::Entity::find()
        .select_only()
        .column(review::Column::Id)
        .column(review::Column::Rating)
        .column_as(review::Column::Title, "review_title")
        .column(review::Column::Content)
        .column(review::Column::Author)
        .column(review::Column::Date)
        .column(cache::Column::TitleId)
        .column_as(cache::Column::Title, "cache_title")
        .column(cache::Column::Plot)
        .column(cache::Column::Image)
        .inner_join(cache::Entity)
        .order_by_asc(review::Column::Id)
}

/// Inserts or refreshes the cache row for `entry.title_id` and returns its id.
async fn upsert_cache<C: ConnectionTrait>(conn: &C, entry: &CacheEntry) -> AppResult<i32> {
    let model = cache::ActiveModel {
        id: Default::default(),
        title_id: Set(entry.title_id.clone()),
        title: Set(entry.title.clone()),
        plot: Set(entry.plot.clone()),
        image: Set(entry.image.clone()),
    };

    let mut query = cache::Entity::insert(model)
        .on_conflict(
            OnConflict::column(cache::Column::TitleId)
                .update_columns([cache::Column::Title, cache::Column::Plot, cache::Column::Image])
                .to_owned(),
        )
        .into_query();
    query.returning_col(cache::Column::Id);

    let stmt = conn.get_database_backend().build(&query);
    let row = conn.query_one(stmt).await?.ok_or(DbErr::RecordNotInserted)?;
    Ok(row.try_get::<i32>("", "id")?)
}

async fn insert_review<C: ConnectionTrait>(
    conn: &C,
    cache_id: i32,
    input: &ReviewInput,
) -> AppResult<i32> {
    let model = review::ActiveModel {
        id: Default::default(),
        cache_id: Set(cache_id),
        rating: Set(input.rating),
        title: Set(input.title.clone()),
        content: Set(input.content.clone()),
        author: Set(input.author.clone()),
        date: Set(now_sec()),
    };

    let res = review::Entity::insert(model).exec(conn).await?;
    Ok(res.last_insert_id)
}

fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}
