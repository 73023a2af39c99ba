//! Turns the listing query parameters into a [`FilterSpec`] and interprets
//! it, either as a SQL `WHERE` clause or as an in-memory predicate.
//!
//! Terms for the same field are OR'ed, fields are AND'ed. Every field except
//! `id` is a case-insensitive substring test; `id` is exact membership.

use crate::models::book::BookRecord;
use sqlx::{Postgres, QueryBuilder};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterField {
    Id,
    Title,
    Topic,
    Author,
    MimeType,
    Languages,
}

/// Where a substring term is looked up in `books_view`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Scalar(&'static str),
    Array(&'static str),
}

impl FilterField {
    pub const ALL: [FilterField; 6] = [
        FilterField::Id,
        FilterField::Title,
        FilterField::Topic,
        FilterField::Author,
        FilterField::MimeType,
        FilterField::Languages,
    ];

    /// Name of the query parameter carrying this field.
    pub fn param_name(self) -> &'static str {
        match self {
            FilterField::Id => "id",
            FilterField::Title => "title",
            FilterField::Topic => "topic",
            FilterField::Author => "author",
            FilterField::MimeType => "mime_type",
            FilterField::Languages => "languages",
        }
    }

    fn columns(self) -> &'static [Column] {
        match self {
            FilterField::Id => &[Column::Scalar("gut_book_id")],
            FilterField::Title => &[Column::Scalar("booktitle")],
            FilterField::Topic => &[Column::Array("subjects"), Column::Scalar("booktitle")],
            FilterField::Author => &[Column::Array("author_name")],
            FilterField::MimeType => &[Column::Array("mime_type")],
            FilterField::Languages => &[Column::Array("languages")],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    terms: BTreeMap<FilterField, Vec<String>>,
}

/// Splits a comma separated parameter into trimmed, non-empty terms.
pub fn split_terms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Escapes LIKE metacharacters and wraps the term in `%`.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the terms of a raw parameter value. Absent or blank values leave
    /// the field unconstrained.
    pub fn with(mut self, field: FilterField, raw: Option<&str>) -> Self {
        let terms = raw.map(split_terms).unwrap_or_default();
        if !terms.is_empty() {
            self.terms.entry(field).or_default().extend(terms);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self, field: FilterField) -> &[String] {
        self.terms.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn matches(&self, book: &BookRecord) -> bool {
        self.terms.iter().all(|(field, terms)| {
            terms.iter().any(|term| field_matches(*field, term, book))
        })
    }

    /// Appends ` WHERE ...` for this filter to `builder`. Appends nothing
    /// when the filter is empty.
    pub fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        for (i, (field, terms)) in self.terms.iter().enumerate() {
            builder.push(if i == 0 { " WHERE " } else { " AND " });

            if *field == FilterField::Id {
                builder.push("gut_book_id = ANY(");
                builder.push_bind(terms.clone());
                builder.push(")");
                continue;
            }

            builder.push("(");
            let mut first = true;
            for term in terms {
                for column in field.columns() {
                    if !first {
                        builder.push(" OR ");
                    }
                    first = false;
                    push_contains(builder, *column, term);
                }
            }
            builder.push(")");
        }
    }
}

fn push_contains(builder: &mut QueryBuilder<'_, Postgres>, column: Column, term: &str) {
    match column {
        Column::Scalar(name) => {
            builder.push(name);
            builder.push(" ILIKE ");
            builder.push_bind(like_pattern(term));
        }
        Column::Array(name) => {
            builder.push("EXISTS (SELECT 1 FROM unnest(");
            builder.push(name);
            builder.push(") AS v(item) WHERE v.item ILIKE ");
            builder.push_bind(like_pattern(term));
            builder.push(")");
        }
    }
}

fn field_matches(field: FilterField, term: &str, book: &BookRecord) -> bool {
    match field {
        FilterField::Id => book.external_id.as_deref() == Some(term),
        FilterField::Title => contains_ci(&book.title, term),
        FilterField::Topic => {
            book.subjects.iter().any(|s| contains_ci(s, term)) || contains_ci(&book.title, term)
        }
        FilterField::Author => book
            .authors
            .iter()
            .filter_map(|a| a.name.as_deref())
            .any(|name| contains_ci(name, term)),
        FilterField::MimeType => book.formats.iter().any(|f| contains_ci(&f.mime_type, term)),
        FilterField::Languages => book.languages.iter().any(|l| contains_ci(l, term)),
    }
}
