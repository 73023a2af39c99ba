use crate::error::ApiError;
use crate::models::responses::{BookJson, BookListBody, BookListResponse, EmptyResultNotice};
use crate::services::filter::{FilterField, FilterSpec};
use crate::services::pagination::{paginate, PageRequest, Pagination};
use crate::services::shaper::shape_books;
use crate::AppState;
use axum::{
    extract::{Host, OriginalUri, Query, State},
    http::HeaderMap,
    response::Json,
};
use serde::Deserialize;
use tracing::info;

const SAMPLE_SIZE: i64 = 5;

/// Query parameters of `GET /`. Everything arrives as raw text so a bad
/// `limit` is reported as JSON rather than as an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct BookListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub id: Option<String>,
    pub title: Option<String>,
    pub topic: Option<String>,
    pub author: Option<String>,
    pub mime_type: Option<String>,
    pub languages: Option<String>,
}

impl BookListParams {
    fn raw(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Id => self.id.as_deref(),
            FilterField::Title => self.title.as_deref(),
            FilterField::Topic => self.topic.as_deref(),
            FilterField::Author => self.author.as_deref(),
            FilterField::MimeType => self.mime_type.as_deref(),
            FilterField::Languages => self.languages.as_deref(),
        }
    }

    pub fn filter(&self) -> FilterSpec {
        FilterField::ALL
            .into_iter()
            .fold(FilterSpec::new(), |spec, field| spec.with(field, self.raw(field)))
    }
}

/// Builds an absolute listing URL that keeps the caller's filter parameters
/// and replaces `limit`/`offset`.
fn page_link(base: &str, path: &str, query: Option<&str>, limit: i64, offset: i64) -> String {
    let mut pairs: Vec<String> = query
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or_default();
            key != "limit" && key != "offset"
        })
        .map(str::to_string)
        .collect();

    pairs.push(format!("limit={}", limit));
    pairs.push(format!("offset={}", offset));

    format!("{}{}?{}", base.trim_end_matches('/'), path, pairs.join("&"))
}

pub async fn book_list(
    State(state): State<AppState>,
    Host(host): Host,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(params): Query<BookListParams>,
) -> Result<Json<BookListBody>, ApiError> {
    info!("Book list query: {:?}", params);

    let request = PageRequest::from_params(params.limit.as_deref(), params.offset.as_deref())?;
    let filter = params.filter();

    let total = state.backend.count_books(&filter).await?;

    let window = match paginate(request, total)? {
        Pagination::NoResults => {
            info!("No books matched {:?}", filter);
            return Ok(Json(BookListBody::Empty(EmptyResultNotice::default())));
        }
        Pagination::Page(window) => window,
    };

    let books = state
        .backend
        .fetch_books(&filter, window.offset, window.limit)
        .await?;

    let forwarded_proto = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok());
    let base = state.base_url(&host, forwarded_proto);
    let link = |offset: i64| page_link(&base, uri.path(), uri.query(), window.limit, offset);

    Ok(Json(BookListBody::Page(BookListResponse {
        count: total,
        next: window.next_offset.map(&link),
        previous: window.prev_offset.map(&link),
        results: shape_books(books),
    })))
}

/// First few books, unfiltered, as a bare array.
pub async fn test_api(State(state): State<AppState>) -> Result<Json<Vec<BookJson>>, ApiError> {
    let books = state
        .backend
        .fetch_books(&FilterSpec::new(), 0, SAMPLE_SIZE)
        .await?;

    Ok(Json(shape_books(books)))
}
