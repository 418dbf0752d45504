#![cfg(not(tarpaulin_include))]
#![cfg(feature = "web")]

//! Workbook ingestion.
//!
//! Reads the three sheets of the annual publications workbook into the typed
//! [`Dataset`]. Header matching is case-insensitive after trimming, against a
//! per-field alias table (the source workbook carries Spanish headers).
//! A missing sheet or column is logged and degrades to an empty table so the
//! dashboard always has something to render.

use crate::records::{AffiliationRecord, Dataset, PublicationRecord, Quartile, YearlyCount};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::error::Error;
use std::path::Path;

/// Sheet names as they appear in the source workbook.
pub const PUBLICATIONS_SHEET: &str = "Hoja1";
pub const YEARLY_SHEET: &str = "Hoja2";
pub const AFFILIATIONS_SHEET: &str = "Hoja3";

/// Accepted header spellings per field, compared lowercase after trimming.
pub const QUARTILE_HEADERS: &[&str] = &["cuartil", "quartile"];
pub const JOURNAL_HEADERS: &[&str] = &["revista", "journal"];
pub const PUBLISHER_HEADERS: &[&str] = &["editorial", "publisher"];
pub const LEADERSHIP_HEADERS: &[&str] = &["es ufro?", "es ufro", "liderazgo", "leadership"];
pub const KEYWORD_HEADERS: &[&str] = &["palabras clave", "keywords"];
pub const YEAR_HEADERS: &[&str] = &["año", "ano", "year"];
pub const ARTICLES_HEADERS: &[&str] = &[
    "cantidad de articulos",
    "cantidad de artículos",
    "articles",
    "article count",
];
pub const COUNTRY_HEADERS: &[&str] = &["pais", "país", "country"];

/// Load the full record set from an Excel workbook
///
/// Opens the workbook and reads the publications, yearly-counts and
/// affiliations sheets into one [`Dataset`]. Sheet names are matched
/// case-insensitively; a sheet that is missing or unreadable yields an empty
/// table and a warning rather than an error.
///
/// # Arguments
/// * `filepath` - Path to the `.xlsx` workbook to load
///
/// # Returns
/// * `Result<Dataset, Box<dyn Error>>` - The loaded record set, or an error
///   if the workbook itself cannot be opened
///
/// # Examples
/// ```no_run
/// use pubdash::loader::load_workbook;
///
/// match load_workbook("publications.xlsx") {
///     Ok(dataset) => println!("Loaded {} publications", dataset.publications.len()),
///     Err(e) => eprintln!("Error loading workbook: {}", e),
/// }
/// ```
pub fn load_workbook(filepath: impl AsRef<Path>) -> Result<Dataset, Box<dyn Error>> {
    use calamine::{open_workbook, Reader, Xlsx};

    let mut workbook: Xlsx<_> = open_workbook(filepath)?;
    let names = workbook.sheet_names().to_vec();
    let resolve = |wanted: &str| {
        names
            .iter()
            .find(|name| name.trim().eq_ignore_ascii_case(wanted))
            .cloned()
    };

    let mut dataset = Dataset::default();

    match resolve(PUBLICATIONS_SHEET) {
        Some(name) => match workbook.worksheet_range(&name) {
            Ok(range) => dataset.publications = load_publications(&range),
            Err(e) => log::warn!("publications sheet {} is unreadable: {}", name, e),
        },
        None => log::warn!("workbook has no {} sheet", PUBLICATIONS_SHEET),
    }

    match resolve(YEARLY_SHEET) {
        Some(name) => match workbook.worksheet_range(&name) {
            Ok(range) => dataset.yearly = load_yearly(&range),
            Err(e) => log::warn!("yearly sheet {} is unreadable: {}", name, e),
        },
        None => log::warn!("workbook has no {} sheet", YEARLY_SHEET),
    }

    match resolve(AFFILIATIONS_SHEET) {
        Some(name) => match workbook.worksheet_range(&name) {
            Ok(range) => dataset.affiliations = load_affiliations(&range),
            Err(e) => log::warn!("affiliations sheet {} is unreadable: {}", name, e),
        },
        None => log::warn!("workbook has no {} sheet", AFFILIATIONS_SHEET),
    }

    log::info!(
        "loaded {} publications, {} yearly rows, {} affiliations",
        dataset.publications.len(),
        dataset.yearly.len(),
        dataset.affiliations.len()
    );
    Ok(dataset)
}

/// Finds the index of the first header cell matching one of `aliases`,
/// compared lowercase after trimming.
pub fn find_column(headers: &[calamine::Data], aliases: &[&str]) -> Option<usize> {
    use calamine::Data;

    headers.iter().position(|cell| {
        matches!(cell, Data::String(s) if aliases.contains(&s.trim().to_lowercase().as_str()))
    })
}

/// Normalizes a leadership cell to a flag: numeric 1/0, booleans and yes/no
/// text (Spanish or English) are accepted; anything else is unset.
pub fn parse_leadership(cell: &calamine::Data) -> Option<bool> {
    use calamine::Data;

    match cell {
        Data::Int(1) => Some(true),
        Data::Int(0) => Some(false),
        Data::Float(f) if *f == 1.0 => Some(true),
        Data::Float(f) if *f == 0.0 => Some(false),
        Data::Bool(b) => Some(*b),
        Data::String(s) => match s.trim().to_lowercase().as_str() {
            "1" | "si" | "sí" | "yes" | "y" => Some(true),
            "0" | "no" | "n" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn cell_text(cell: &calamine::Data) -> Option<String> {
    use calamine::Data;

    match cell {
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) if f.fract() == 0.0 => Some(format!("{}", *f as i64)),
        Data::Float(f) => Some(f.to_string()),
        _ => None,
    }
}

fn cell_number(cell: &calamine::Data) -> Option<f64> {
    use calamine::Data;

    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) => Some(*f),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads the publications sheet into typed records. Columns that cannot be
/// resolved stay unset on every record; a sheet with no recognizable column
/// at all yields an empty table.
pub fn load_publications(range: &calamine::Range<calamine::Data>) -> Vec<PublicationRecord> {
    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(headers) => headers,
        None => return Vec::new(),
    };

    let quartile_col = find_column(headers, QUARTILE_HEADERS);
    let journal_col = find_column(headers, JOURNAL_HEADERS);
    let publisher_col = find_column(headers, PUBLISHER_HEADERS);
    let leadership_col = find_column(headers, LEADERSHIP_HEADERS);
    let keyword_col = find_column(headers, KEYWORD_HEADERS);

    if [quartile_col, journal_col, publisher_col, leadership_col, keyword_col]
        .iter()
        .all(Option::is_none)
    {
        log::warn!("publications sheet has none of the expected columns");
        return Vec::new();
    }

    let mut records = Vec::new();
    for row in rows {
        let record = PublicationRecord {
            quartile: quartile_col
                .and_then(|col| row.get(col))
                .and_then(cell_text)
                .and_then(|text| Quartile::from_label(&text)),
            journal: journal_col.and_then(|col| row.get(col)).and_then(cell_text),
            publisher: publisher_col.and_then(|col| row.get(col)).and_then(cell_text),
            leadership: leadership_col
                .and_then(|col| row.get(col))
                .and_then(parse_leadership),
            keywords: keyword_col.and_then(|col| row.get(col)).and_then(cell_text),
        };

        // Trailing blank rows carry nothing worth keeping.
        if record != PublicationRecord::default() {
            records.push(record);
        }
    }
    records
}

/// Reads the yearly-counts sheet, dropping rows with unusable cells and
/// sorting ascending by year. Both expected columns must resolve or the
/// result is empty.
pub fn load_yearly(range: &calamine::Range<calamine::Data>) -> Vec<YearlyCount> {
    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(headers) => headers,
        None => return Vec::new(),
    };

    let (year_col, articles_col) = match (
        find_column(headers, YEAR_HEADERS),
        find_column(headers, ARTICLES_HEADERS),
    ) {
        (Some(year), Some(articles)) => (year, articles),
        _ => {
            log::warn!("yearly sheet lacks the year/article-count columns");
            return Vec::new();
        }
    };

    let mut counts: Vec<YearlyCount> = rows
        .filter_map(|row| {
            let year = row.get(year_col).and_then(cell_number)?;
            let articles = row.get(articles_col).and_then(cell_number)?;
            Some(YearlyCount {
                year: year as i32,
                articles: articles as i64,
            })
        })
        .collect();
    counts.sort_by_key(|row| row.year);
    counts
}

pub fn load_affiliations(range: &calamine::Range<calamine::Data>) -> Vec<AffiliationRecord> {
    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(headers) => headers,
        None => return Vec::new(),
    };

    let country_col = match find_column(headers, COUNTRY_HEADERS) {
        Some(col) => col,
        None => {
            log::warn!("affiliations sheet lacks a country column");
            return Vec::new();
        }
    };

    rows.filter_map(|row| {
        row.get(country_col)
            .and_then(cell_text)
            .map(|country| AffiliationRecord {
                country: Some(country),
            })
    })
    .collect()
}

/// Loads the banner image and embeds it as a `data:` URI for the page
/// header, the same way the page previously inlined it. Any failure
/// degrades to no banner.
pub fn banner_data_uri(filepath: impl AsRef<Path>) -> Option<String> {
    let path = filepath.as_ref();
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("banner image {} not loaded: {}", path.display(), e);
            return None;
        }
    };

    let media_type = match image::guess_format(&bytes) {
        Ok(image::ImageFormat::Jpeg) => "image/jpeg",
        Ok(image::ImageFormat::Gif) => "image/gif",
        Ok(image::ImageFormat::WebP) => "image/webp",
        // The banner asset shipped with the dashboard is a PNG; assume that
        // when sniffing fails.
        _ => "image/png",
    };

    Some(format!("data:{};base64,{}", media_type, BASE64.encode(&bytes)))
}
