use books_service::models::book::{Author, BookRecord, Format};
use books_service::services::filter::{FilterField, FilterSpec};
use books_service::services::shaper::shape_books;
use books_service::utils::columns::zip_longest3;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn create_sample_books() -> Vec<BookRecord> {
    let mut books = vec![BookRecord {
        title: "Pride and Prejudice".to_string(),
        external_id: Some("1342".to_string()),
        authors: vec![Author {
            name: Some("Austen, Jane".to_string()),
            birth_year: Some("1775".to_string()),
            death_year: Some("1817".to_string()),
        }],
        subjects: vec!["Courtship -- Fiction".to_string()],
        bookshelves: vec!["Best Books Ever Listings".to_string()],
        languages: vec!["en".to_string()],
        formats: vec![Format {
            mime_type: "text/html".to_string(),
            url: "https://www.gutenberg.org/ebooks/1342.html.images".to_string(),
        }],
    }];

    for i in 1000..2000 {
        books.push(BookRecord {
            title: format!("Test Book {}", i),
            external_id: Some(i.to_string()),
            authors: vec![Author {
                name: Some(format!("Test Author {}", i % 50)),
                birth_year: Some((1700 + i % 200).to_string()),
                death_year: None,
            }],
            subjects: vec![format!("Subject {}", i % 30), "Fiction".to_string()],
            bookshelves: vec![],
            languages: vec![if i % 3 == 0 { "fr" } else { "en" }.to_string()],
            formats: vec![
                Format {
                    mime_type: "text/plain".to_string(),
                    url: format!("https://www.gutenberg.org/ebooks/{}.txt.utf-8", i),
                },
                Format {
                    mime_type: "application/epub+zip".to_string(),
                    url: format!("https://www.gutenberg.org/ebooks/{}.epub3.images", i),
                },
            ],
        });
    }

    books
}

fn benchmark_filter_matches(c: &mut Criterion) {
    let books = create_sample_books();
    let filter = FilterSpec::new()
        .with(FilterField::Topic, Some("subject 1,courtship"))
        .with(FilterField::Languages, Some("en"));

    c.bench_function("filter_matches", |b| {
        b.iter(|| {
            books
                .iter()
                .filter(|book| filter.matches(black_box(book)))
                .count()
        })
    });
}

fn benchmark_filter_with_authors(c: &mut Criterion) {
    let books = create_sample_books();
    let filter = FilterSpec::new()
        .with(FilterField::Author, Some("Test Author 25"))
        .with(FilterField::MimeType, Some("epub"));

    c.bench_function("filter_with_authors", |b| {
        b.iter(|| {
            books
                .iter()
                .filter(|book| filter.matches(black_box(book)))
                .count()
        })
    });
}

fn benchmark_shape_page(c: &mut Criterion) {
    let page: Vec<BookRecord> = create_sample_books().into_iter().take(25).collect();

    c.bench_function("shape_page", |b| {
        b.iter(|| shape_books(black_box(page.clone())))
    });
}

fn benchmark_zip_authors(c: &mut Criterion) {
    let names: Vec<String> = (0..8).map(|i| format!("Author {}", i)).collect();
    let births: Vec<String> = (0..5).map(|i| (1800 + i).to_string()).collect();
    let deaths: Vec<String> = (0..3).map(|i| (1870 + i).to_string()).collect();

    c.bench_function("zip_authors", |b| {
        b.iter(|| {
            zip_longest3(
                black_box(names.clone()),
                black_box(births.clone()),
                black_box(deaths.clone()),
            )
        })
    });
}

criterion_group!(
    benches,
    benchmark_filter_matches,
    benchmark_filter_with_authors,
    benchmark_shape_page,
    benchmark_zip_authors
);
criterion_main!(benches);
