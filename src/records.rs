use serde::{Deserialize, Serialize};
use std::fmt;

/// Journal-impact quartile bucket (Q1 highest, Q4 lowest, S/Q unassigned)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quartile {
    Q1,
    Q2,
    Q3,
    Q4,
    #[serde(rename = "S/Q")]
    SQ,
}

/// Fixed display order for every quartile-keyed chart, regardless of the
/// order values appear in the workbook.
pub const QUARTILE_ORDER: [Quartile; 5] = [
    Quartile::Q1,
    Quartile::Q2,
    Quartile::Q3,
    Quartile::Q4,
    Quartile::SQ,
];

impl Quartile {
    /// Parses a workbook cell label; anything unrecognized counts as unset.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "Q1" => Some(Quartile::Q1),
            "Q2" => Some(Quartile::Q2),
            "Q3" => Some(Quartile::Q3),
            "Q4" => Some(Quartile::Q4),
            "S/Q" | "SQ" => Some(Quartile::SQ),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Quartile::Q1 => "Q1",
            Quartile::Q2 => "Q2",
            Quartile::Q3 => "Q3",
            Quartile::Q4 => "Q4",
            Quartile::SQ => "S/Q",
        }
    }
}

impl fmt::Display for Quartile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the publications sheet. Every field is optional: the loader
/// keeps whatever columns it could resolve and the aggregators skip unset
/// values, so a malformed sheet degrades to empty aggregates instead of
/// failing the page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicationRecord {
    pub quartile: Option<Quartile>,
    pub journal: Option<String>,
    pub publisher: Option<String>,
    /// Whether the institution's researcher was lead/corresponding author.
    pub leadership: Option<bool>,
    /// Free-text keyword list as it appears in the sheet.
    pub keywords: Option<String>,
}

/// One row of the co-author affiliations sheet.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AffiliationRecord {
    pub country: Option<String>,
}

/// Article count for one year, ascending by year once aggregated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyCount {
    pub year: i32,
    pub articles: i64,
}

/// A grouped count keyed by one categorical attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: u64,
}

impl CategoryCount {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        CategoryCount {
            label: label.into(),
            count,
        }
    }
}

/// A grouped count keyed by two categorical attributes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossCount {
    pub primary: String,
    pub secondary: String,
    pub count: u64,
}

/// The immutable record set for one reporting period. Built once by the
/// loader and shared read-only with the aggregators and chart builders;
/// nothing mutates it after load.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub publications: Vec<PublicationRecord>,
    pub yearly: Vec<YearlyCount>,
    pub affiliations: Vec<AffiliationRecord>,
}

impl Dataset {
    /// Distinct affiliation countries in alphabetical order, for the
    /// country dropdown.
    pub fn countries(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for record in &self.affiliations {
            if let Some(country) = &record.country {
                if !seen.iter().any(|c| c == country) {
                    seen.push(country.clone());
                }
            }
        }
        seen.sort();
        seen
    }
}
