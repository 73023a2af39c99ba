use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const EMPTY_RESULT_MESSAGE: &str = "Please try some other filter or search options";

#[derive(Deserialize, Serialize, Debug)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorJson {
    pub name: Option<String>,
    pub birth_year: Option<String>,
    pub death_year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookJson {
    pub booktitle: String,
    pub authors: Vec<AuthorJson>,
    pub subjects: Vec<String>,
    pub bookshelves: Vec<String>,
    pub languages: Vec<String>,
    /// One single-entry map per format, `{mime_type: url}`.
    pub formats: Vec<BTreeMap<String, String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookListResponse {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<BookJson>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmptyResultNotice {
    #[serde(rename = "Message")]
    pub message: String,
}

impl Default for EmptyResultNotice {
    fn default() -> Self {
        Self {
            message: EMPTY_RESULT_MESSAGE.to_string(),
        }
    }
}

/// `GET /` answers with either a page envelope or the empty-result notice,
/// both with status 200.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BookListBody {
    Page(BookListResponse),
    Empty(EmptyResultNotice),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
