//! Helpers for the parallel array columns of `books_view`.
//!
//! The view stores one-to-many book attributes as independent arrays that
//! line up by position. Authors and formats are zipped differently: author
//! arrays are ragged by nature, format arrays are expected to match.

/// Zips three columns positionally up to the longest one, padding the
/// shorter columns with `None`.
pub fn zip_longest3<A, B, C>(a: Vec<A>, b: Vec<B>, c: Vec<C>) -> Vec<(Option<A>, Option<B>, Option<C>)> {
    let len = a.len().max(b.len()).max(c.len());
    let mut a = a.into_iter();
    let mut b = b.into_iter();
    let mut c = c.into_iter();

    (0..len).map(|_| (a.next(), b.next(), c.next())).collect()
}

/// Zips two columns that should have equal length. Extra trailing entries
/// on either side are dropped; the returned flag reports whether that
/// happened.
pub fn zip_pairs<A, B>(a: Vec<A>, b: Vec<B>) -> (Vec<(A, B)>, bool) {
    let mismatched = a.len() != b.len();
    (a.into_iter().zip(b).collect(), mismatched)
}

/// Drops null elements from a nullable array column.
pub fn flatten_column(column: Option<Vec<Option<String>>>) -> Vec<String> {
    column.unwrap_or_default().into_iter().flatten().collect()
}

/// Keeps null elements so positions still line up with sibling columns.
pub fn nullable_column(column: Option<Vec<Option<String>>>) -> Vec<Option<String>> {
    column.unwrap_or_default()
}
