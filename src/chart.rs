use crate::records::{CategoryCount, CrossCount, YearlyCount, QUARTILE_ORDER};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

/// Dashboard panels, one per visualization. Filter events are keyed by
/// panel id; only `Journals` and `Countries` accept filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    /// Time-series line of articles per year
    TimeSeries,

    /// Pie of article counts per quartile
    Quartiles,

    /// Grouped bar of leadership counts per quartile
    Leadership,

    /// Treemap of journals within each quartile
    Journals,

    /// Choropleth of co-author affiliation countries
    Countries,

    /// Raster word cloud of the most frequent keywords
    Keywords,
}

/// One point of a time-series line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    pub x: i32,
    pub y: i64,
}

/// One series of a grouped bar chart, aligned with the category list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<u64>,
}

/// One node of a treemap hierarchy. Branch nodes have an empty `parent`;
/// leaf ids are prefixed with the branch label so journals appearing in two
/// quartiles stay distinct.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreemapNode {
    pub id: String,
    pub label: String,
    pub parent: String,
    pub value: u64,
}

/// The data payload of one chart, tagged by kind. This is what the page
/// script maps onto the rendering library; nothing in it is renderer
/// specific.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartData {
    Line {
        x_label: String,
        y_label: String,
        points: Vec<LinePoint>,
        /// Y-axis top, fixed at 20% above the highest point.
        y_max: f64,
    },
    Pie {
        slices: Vec<CategoryCount>,
    },
    GroupedBar {
        x_label: String,
        y_label: String,
        categories: Vec<String>,
        series: Vec<BarSeries>,
    },
    Treemap {
        nodes: Vec<TreemapNode>,
    },
    Choropleth {
        regions: Vec<CategoryCount>,
    },
    Image {
        media_type: String,
        /// Base64-encoded raster payload.
        data: String,
    },
}

/// A rendering-ready description of one visualization. Recomputed whenever
/// its inputs change; it has no identity beyond the current render.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub panel: Panel,
    pub title: String,
    pub data: ChartData,
}

/// Time-series line of articles per year.
pub fn yearly_line(rows: &[YearlyCount]) -> ChartSpec {
    let points: Vec<LinePoint> = rows
        .iter()
        .map(|row| LinePoint {
            x: row.year,
            y: row.articles,
        })
        .collect();
    let y_max = points.iter().map(|p| p.y).max().unwrap_or(0) as f64 * 1.2;

    ChartSpec {
        panel: Panel::TimeSeries,
        title: "Articles per year".to_string(),
        data: ChartData::Line {
            x_label: "Year".to_string(),
            y_label: "Articles".to_string(),
            points,
            y_max,
        },
    }
}

/// Pie of quartile counts, slices in the fixed quartile order.
pub fn quartile_pie(counts: &[CategoryCount]) -> ChartSpec {
    let mut slices = Vec::new();
    for quartile in QUARTILE_ORDER {
        if let Some(entry) = counts.iter().find(|c| c.label == quartile.label()) {
            slices.push(entry.clone());
        }
    }

    ChartSpec {
        panel: Panel::Quartiles,
        title: "Articles by quartile".to_string(),
        data: ChartData::Pie { slices },
    }
}

/// Grouped bar of the leadership cross-tab: x = quartile in fixed order,
/// one series per flag value.
pub fn leadership_bar(cross: &[CrossCount]) -> ChartSpec {
    let categories: Vec<String> = QUARTILE_ORDER
        .iter()
        .filter(|q| cross.iter().any(|c| c.primary == q.label()))
        .map(|q| q.label().to_string())
        .collect();

    let series = ["Yes", "No"]
        .iter()
        .map(|flag| BarSeries {
            name: flag.to_string(),
            values: categories
                .iter()
                .map(|category| {
                    cross
                        .iter()
                        .find(|c| &c.primary == category && c.secondary == *flag)
                        .map(|c| c.count)
                        .unwrap_or(0)
                })
                .collect(),
        })
        .collect();

    ChartSpec {
        panel: Panel::Leadership,
        title: "Lead authorship by quartile".to_string(),
        data: ChartData::GroupedBar {
            x_label: "Quartile".to_string(),
            y_label: "Number of articles".to_string(),
            categories,
            series,
        },
    }
}

/// Two-level treemap: quartile branches in fixed order, journal leaves with
/// their counts. Branch values are the sum of their leaves.
pub fn journal_treemap(cross: &[CrossCount]) -> ChartSpec {
    let mut nodes = Vec::new();
    for quartile in QUARTILE_ORDER {
        let leaves: Vec<&CrossCount> = cross
            .iter()
            .filter(|c| c.primary == quartile.label())
            .collect();
        if leaves.is_empty() {
            continue;
        }

        nodes.push(TreemapNode {
            id: quartile.label().to_string(),
            label: quartile.label().to_string(),
            parent: String::new(),
            value: leaves.iter().map(|c| c.count).sum(),
        });
        for leaf in leaves {
            nodes.push(TreemapNode {
                id: format!("{}/{}", quartile.label(), leaf.secondary),
                label: leaf.secondary.clone(),
                parent: quartile.label().to_string(),
                value: leaf.count,
            });
        }
    }

    ChartSpec {
        panel: Panel::Journals,
        title: "Journals by quartile".to_string(),
        data: ChartData::Treemap { nodes },
    }
}

/// Choropleth of affiliation counts per country. Region labels are plain
/// country names; the page layer resolves them to map geometry.
pub fn country_choropleth(counts: &[CategoryCount]) -> ChartSpec {
    ChartSpec {
        panel: Panel::Countries,
        title: "Co-author affiliation countries".to_string(),
        data: ChartData::Choropleth {
            regions: counts.to_vec(),
        },
    }
}

/// Raster-image chart wrapping an already rendered PNG word cloud.
pub fn keyword_cloud(png: &[u8]) -> ChartSpec {
    ChartSpec {
        panel: Panel::Keywords,
        title: "Most frequent keywords".to_string(),
        data: ChartData::Image {
            media_type: "image/png".to_string(),
            data: BASE64.encode(png),
        },
    }
}
