use crate::models::book::BookRecord;
use crate::models::responses::{AuthorJson, BookJson};
use std::collections::BTreeMap;

pub fn shape_book(book: BookRecord) -> BookJson {
    BookJson {
        booktitle: book.title,
        authors: book
            .authors
            .into_iter()
            .map(|author| AuthorJson {
                name: author.name,
                birth_year: author.birth_year,
                death_year: author.death_year,
            })
            .collect(),
        subjects: book.subjects,
        bookshelves: book.bookshelves,
        languages: book.languages,
        formats: book
            .formats
            .into_iter()
            .map(|format| BTreeMap::from([(format.mime_type, format.url)]))
            .collect(),
    }
}

pub fn shape_books(books: Vec<BookRecord>) -> Vec<BookJson> {
    books.into_iter().map(shape_book).collect()
}
