//! Aggregation functions over the loaded record tables.
//!
//! Every function here is pure: it borrows the immutable record set, derives
//! one count table and returns it. Empty input always produces an empty
//! table, never an error, so the page keeps rendering on malformed data.

use crate::records::{
    AffiliationRecord, CategoryCount, CrossCount, PublicationRecord, YearlyCount,
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref KEYWORD_SPLIT_REGEX: Regex = Regex::new(r"[;,/()\[\]]+|\s+").unwrap();
}

/// Connective words skipped when tokenizing keyword text. The source sheets
/// mix Spanish and English keyword lists.
const KEYWORD_STOPWORDS: &[&str] = &[
    "de", "del", "la", "las", "el", "los", "en", "con", "para", "por", "una", "uno", "the", "of",
    "and", "for", "from", "with", "via", "its",
];

/// Attribute selector for [`top_n_by_frequency`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Journal,
    Publisher,
    Keyword,
}

// Grouping keeps first-seen insertion order; a linear scan is plenty for a
// record set of a few thousand rows.
fn bump(counts: &mut Vec<CategoryCount>, label: &str) {
    if let Some(entry) = counts.iter_mut().find(|c| c.label == label) {
        entry.count += 1;
    } else {
        counts.push(CategoryCount::new(label, 1));
    }
}

fn bump_cross(counts: &mut Vec<CrossCount>, primary: &str, secondary: &str) {
    if let Some(entry) = counts
        .iter_mut()
        .find(|c| c.primary == primary && c.secondary == secondary)
    {
        entry.count += 1;
    } else {
        counts.push(CrossCount {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
            count: 1,
        });
    }
}

/// Counts publications per quartile, excluding rows with an unset quartile.
/// Output keeps first-seen order; quartile-keyed charts re-order against
/// [`crate::records::QUARTILE_ORDER`].
pub fn count_by_quartile(records: &[PublicationRecord]) -> Vec<CategoryCount> {
    let mut counts = Vec::new();
    for record in records {
        if let Some(quartile) = record.quartile {
            bump(&mut counts, quartile.label());
        }
    }
    counts
}

/// Returns the per-year article counts sorted ascending by year. Rows with
/// unusable year or count cells never reach this table (the loader drops
/// them), so this is a sort over whatever survived.
pub fn count_by_year(rows: &[YearlyCount]) -> Vec<YearlyCount> {
    let mut sorted = rows.to_vec();
    sorted.sort_by_key(|row| row.year);
    sorted
}

/// Cross-tabulates quartile against the leadership flag. The flag is shown
/// as "Yes"/"No"; rows missing either attribute are excluded.
pub fn cross_tab_leadership(records: &[PublicationRecord]) -> Vec<CrossCount> {
    let mut counts = Vec::new();
    for record in records {
        if let (Some(quartile), Some(leadership)) = (record.quartile, record.leadership) {
            let flag = if leadership { "Yes" } else { "No" };
            bump_cross(&mut counts, quartile.label(), flag);
        }
    }
    counts
}

/// Counts journals within each quartile for the treemap panel. Rows missing
/// either attribute are excluded.
pub fn journals_by_quartile(records: &[PublicationRecord]) -> Vec<CrossCount> {
    let mut counts = Vec::new();
    for record in records {
        if let (Some(quartile), Some(journal)) = (record.quartile, &record.journal) {
            bump_cross(&mut counts, quartile.label(), journal);
        }
    }
    counts
}

/// Returns the `n` most frequent values of `field` across the record set.
///
/// Non-empty values are counted in first-seen order; the final selection is
/// a stable sort by descending count, so ties keep their original frequency
/// order rather than falling back to alphabetical.
///
/// # Arguments
/// * `records` - The publication records to count over
/// * `field` - Which attribute to count (journal, publisher, or keyword)
/// * `n` - Maximum number of entries to return
pub fn top_n_by_frequency(records: &[PublicationRecord], field: Field, n: usize) -> Vec<CategoryCount> {
    let mut counts = Vec::new();
    for record in records {
        match field {
            Field::Journal => {
                if let Some(journal) = &record.journal {
                    bump(&mut counts, journal);
                }
            }
            Field::Publisher => {
                if let Some(publisher) = &record.publisher {
                    bump(&mut counts, publisher);
                }
            }
            Field::Keyword => {
                if let Some(keywords) = &record.keywords {
                    for token in tokenize_keywords(keywords) {
                        bump(&mut counts, &token);
                    }
                }
            }
        }
    }

    // Vec::sort_by is stable, which is what keeps the tie-break first-seen.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}

/// Counts affiliation rows per country for the choropleth panel.
pub fn count_by_country(records: &[AffiliationRecord]) -> Vec<CategoryCount> {
    let mut counts = Vec::new();
    for record in records {
        if let Some(country) = &record.country {
            bump(&mut counts, country);
        }
    }
    counts
}

/// Subset of affiliation rows matching `country`; identity passthrough when
/// no country is selected. An unknown country simply matches nothing.
pub fn filter_by_country(
    records: &[AffiliationRecord],
    country: Option<&str>,
) -> Vec<AffiliationRecord> {
    match country {
        None => records.to_vec(),
        Some(country) => records
            .iter()
            .filter(|r| r.country.as_deref() == Some(country))
            .cloned()
            .collect(),
    }
}

/// Subset of publication rows matching the quartile label; identity
/// passthrough when no quartile is selected.
pub fn filter_by_quartile(
    records: &[PublicationRecord],
    quartile: Option<&str>,
) -> Vec<PublicationRecord> {
    match quartile {
        None => records.to_vec(),
        Some(label) => records
            .iter()
            .filter(|r| r.quartile.map(|q| q.label()) == Some(label))
            .cloned()
            .collect(),
    }
}

/// Splits free-text keyword lists into lowercase tokens, dropping separators,
/// short fragments and connective words.
pub fn tokenize_keywords(text: &str) -> Vec<String> {
    KEYWORD_SPLIT_REGEX
        .split(text)
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|token| token.chars().count() > 2 && !KEYWORD_STOPWORDS.contains(&token.as_str()))
        .collect()
}
