//! Paged listing queries shared by the media and post tables.

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use gallery_core::result::AppResult;
use gallery_core::types::pagination::{PageRequest, PageResponse};

use super::{contains_pattern, db_error};

/// Which rows a listing selects. Soft-deleted rows are always excluded.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Listing<'a> {
    /// Everything one user owns, public or not.
    Owner(Uuid),
    /// Every public row.
    Public,
    /// Public rows with `query` in title, description, or tags.
    Search(&'a str),
    /// Public rows whose tags contain every entry.
    Tags(&'a [String]),
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, listing: Listing<'_>) {
    qb.push(" WHERE deleted_at IS NULL");
    match listing {
        Listing::Owner(owner_id) => {
            qb.push(" AND owner_id = ");
            qb.push_bind(owner_id);
        }
        Listing::Public => {
            qb.push(" AND is_public = TRUE");
        }
        Listing::Search(query) => {
            let pattern = contains_pattern(query);
            qb.push(" AND is_public = TRUE AND (LOWER(title) LIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR LOWER(description) LIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR LOWER(tags) LIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
        Listing::Tags(tags) => {
            qb.push(" AND is_public = TRUE");
            for tag in tags {
                qb.push(" AND LOWER(tags) LIKE ");
                qb.push_bind(contains_pattern(tag));
            }
        }
    }
}

/// Count and fetch one page of `table`, newest first.
pub(crate) async fn fetch_page<T>(
    pool: &PgPool,
    table: &'static str,
    listing: Listing<'_>,
    page: &PageRequest,
) -> AppResult<PageResponse<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut count = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {table}"));
    push_filter(&mut count, listing);
    let total: i64 = count
        .build_query_scalar::<i64>()
        .fetch_one(pool)
        .await
        .map_err(db_error("Failed to count rows"))?;

    let mut select = QueryBuilder::<Postgres>::new(format!("SELECT * FROM {table}"));
    push_filter(&mut select, listing);
    select.push(" ORDER BY created_at DESC, id DESC LIMIT ");
    select.push_bind(i64::try_from(page.limit()).unwrap_or(i64::MAX));
    select.push(" OFFSET ");
    select.push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));
    let items = select
        .build_query_as::<T>()
        .fetch_all(pool)
        .await
        .map_err(db_error("Failed to list rows"))?;

    Ok(PageResponse::new(items, *page, total.max(0) as u64))
}
