//! Query canonicalization.
//!
//! Terse or misspelled queries embed poorly, so before embedding we
//! lower-case and trim the query, fix a handful of known typos, and expand
//! a small set of one-word queries into keyword-packed phrases that recall
//! better. Both lookups are exact-match on the whole string; a query with
//! extra words ("hr policy please") falls through unchanged.

/// Known misspellings mapped to their canonical term.
const TYPO_CORRECTIONS: &[(&str, &str)] = &[
    ("benifit", "benefits"),
    ("benifits", "benefits"),
    ("policys", "policies"),
    ("prodcuts", "products"),
];

/// Short ambiguous queries mapped to keyword-rich expansions.
const SHORTCUT_EXPANSIONS: &[(&str, &str)] = &[
    (
        "hr",
        "human resources policy leave policy employee benefits work hours remote work",
    ),
    (
        "leave",
        "employee leave policy vacation sick leave paid time off holidays",
    ),
    (
        "benefits",
        "employee benefits insurance compensation perks health coverage",
    ),
    (
        "company",
        "company overview history mission vision headquarters employees clients",
    ),
    (
        "products",
        "company products services offerings solutions platform tools",
    ),
    (
        "about",
        "company overview history mission vision what company does",
    ),
    (
        "policy",
        "company hr policy employee rules benefits working hours",
    ),
    ("product", "company products services"),
];

fn lookup<'a>(table: &'a [(&str, &str)], key: &str) -> Option<&'a str> {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

/// Canonicalize a raw query for embedding.
///
/// Lower-cases and trims, applies the typo map, then checks the corrected
/// string against the shortcut table. Typo correction chains into
/// expansion: `"benifit"` corrects to `"benefits"`, which is itself a
/// shortcut key, so the benefits expansion is returned.
pub fn normalize_query(query: &str) -> String {
    let cleaned = query.trim().to_lowercase();
    let corrected = lookup(TYPO_CORRECTIONS, &cleaned).unwrap_or(&cleaned);

    match lookup(SHORTCUT_EXPANSIONS, corrected) {
        Some(expansion) => expansion.to_string(),
        None => corrected.to_string(),
    }
}
