//! Label suggestions for error messages.
//!
//! When a caller asks for an index label that does not exist, the error
//! carries a "did you mean" hint computed here.

/// Edit distance (insertions, deletions, substitutions) between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    // Single rolling row: row[j] is the distance between the processed prefix
    // of `a` and the first `j` chars of `b`.
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let substitution = diagonal + usize::from(ca != *cb);
            row[j + 1] = substitution.min(above + 1).min(row[j] + 1);
            diagonal = above;
        }
    }

    row[b.len()]
}

/// Finds the candidate label closest to `query`, if any is close enough.
///
/// Comparison is case-insensitive. Up to one edit is tolerated for labels of
/// at most 3 chars, two for at most 5, three otherwise.
///
/// # Examples
///
/// ```
/// use fsindex_common::utils::strings::closest_label;
///
/// let labels = ["Token", "Sentence", "Annotation"];
/// assert_eq!(closest_label("Tokn", &labels), Some("Token"));
/// assert_eq!(closest_label("Paragraph", &labels), None);
/// ```
pub fn closest_label<'a, S: AsRef<str>>(query: &str, candidates: &'a [S]) -> Option<&'a str> {
    let query_lower = query.to_lowercase();
    let budget = match query.chars().count() {
        0..=3 => 1,
        4..=5 => 2,
        _ => 3,
    };

    candidates
        .iter()
        .map(AsRef::as_ref)
        .map(|candidate| (candidate, edit_distance(&query_lower, &candidate.to_lowercase())))
        .filter(|&(_, distance)| distance <= budget)
        .min_by_key(|&(_, distance)| distance)
        .map(|(candidate, _)| candidate)
}

/// Formats the hint appended to an unknown-label error.
///
/// Returns an empty string when there is nothing to suggest.
#[must_use]
pub fn suggestion_hint(suggestion: Option<&str>) -> String {
    suggestion
        .map(|label| format!(" (did you mean '{label}'?)"))
        .unwrap_or_default()
}
