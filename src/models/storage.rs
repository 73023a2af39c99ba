use crate::models::book::{Author, BookRecord, Format};
use crate::services::filter::FilterSpec;
use crate::utils::columns::{flatten_column, nullable_column, zip_longest3, zip_pairs};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const BOOKS_VIEW: &str = "books_view";

const BOOK_COLUMNS: &str = "booktitle, gut_book_id, author_name, birth_year, death_year, \
                            subjects, bookshelves, languages, mime_type, url";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// True when the store could not be reached at all, as opposed to a
    /// failing query.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            StorageError::Postgres(
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            )
        )
    }
}

/// Read access to the denormalized book view. Both calls must order rows
/// the same way for a given filter, otherwise offset paging skips or
/// repeats books.
#[async_trait]
pub trait StorageBackend {
    async fn count_books(&self, filter: &FilterSpec) -> Result<i64, StorageError>;
    async fn fetch_books(
        &self,
        filter: &FilterSpec,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<BookRecord>, StorageError>;
    async fn test_connection(&self) -> Result<(), StorageError>;
}

pub struct PostgresBackend {
    pool: PgPool,
}

impl PostgresBackend {
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Pairs the `mime_type` and `url` columns. Unpaired trailing entries and
/// pairs with a null side are dropped with a warning.
fn formats_from_columns(
    title: &str,
    mime_types: Vec<Option<String>>,
    urls: Vec<Option<String>>,
) -> Vec<Format> {
    let (mime_count, url_count) = (mime_types.len(), urls.len());
    let (pairs, mismatched) = zip_pairs(mime_types, urls);
    if mismatched {
        warn!(
            "Book '{}' has {} mime types but {} urls, extra entries dropped",
            title, mime_count, url_count
        );
    }

    pairs
        .into_iter()
        .enumerate()
        .filter_map(|(position, pair)| match pair {
            (Some(mime_type), Some(url)) => Some(Format { mime_type, url }),
            (mime_type, url) => {
                warn!(
                    "Book '{}' format {} has a null entry (mime type {:?}, url {:?}), dropped",
                    title, position, mime_type, url
                );
                None
            }
        })
        .collect()
}

fn row_to_book(row: &PgRow) -> Result<BookRecord, StorageError> {
    let title: String = row.try_get("booktitle")?;

    let names = nullable_column(row.try_get("author_name")?);
    let births = nullable_column(row.try_get("birth_year")?);
    let deaths = nullable_column(row.try_get("death_year")?);
    let authors = zip_longest3(names, births, deaths)
        .into_iter()
        .map(|(name, birth_year, death_year)| Author {
            name: name.flatten(),
            birth_year: birth_year.flatten(),
            death_year: death_year.flatten(),
        })
        .collect();

    let formats = formats_from_columns(
        &title,
        nullable_column(row.try_get("mime_type")?),
        nullable_column(row.try_get("url")?),
    );

    Ok(BookRecord {
        external_id: row.try_get("gut_book_id")?,
        authors,
        subjects: flatten_column(row.try_get("subjects")?),
        bookshelves: flatten_column(row.try_get("bookshelves")?),
        languages: flatten_column(row.try_get("languages")?),
        formats,
        title,
    })
}

#[async_trait]
impl StorageBackend for PostgresBackend {
    async fn count_books(&self, filter: &FilterSpec) -> Result<i64, StorageError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) AS count FROM ");
        query.push(BOOKS_VIEW);
        filter.push_where(&mut query);

        let count = query
            .build()
            .fetch_one(&self.pool)
            .await?
            .try_get::<i64, _>("count")?;

        Ok(count)
    }

    async fn fetch_books(
        &self,
        filter: &FilterSpec,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<BookRecord>, StorageError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT ");
        query.push(BOOK_COLUMNS);
        query.push(" FROM ");
        query.push(BOOKS_VIEW);
        filter.push_where(&mut query);
        query.push(" ORDER BY booktitle LIMIT ");
        query.push_bind(limit);
        query.push(" OFFSET ");
        query.push_bind(offset);

        debug!("Fetching books: {}", query.sql());

        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_book).collect()
    }

    async fn test_connection(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

/// Keeps the whole catalog in memory, ordered by title like the
/// PostgreSQL backend.
pub struct MemoryBackend {
    books: Vec<BookRecord>,
}

impl MemoryBackend {
    pub fn new(mut books: Vec<BookRecord>) -> Self {
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Self { books }
    }

    /// Loads a JSON array of books.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let content = std::fs::read_to_string(path)?;
        let books: Vec<BookRecord> = serde_json::from_str(&content)?;
        Ok(Self::new(books))
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn count_books(&self, filter: &FilterSpec) -> Result<i64, StorageError> {
        Ok(self.books.iter().filter(|b| filter.matches(b)).count() as i64)
    }

    async fn fetch_books(
        &self,
        filter: &FilterSpec,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<BookRecord>, StorageError> {
        let offset = usize::try_from(offset).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);

        Ok(self
            .books
            .iter()
            .filter(|b| filter.matches(b))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn test_connection(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
