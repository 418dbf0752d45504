#![cfg(not(tarpaulin_include))]
#![cfg(feature = "web")]

//! Raster word-cloud rendering for the keywords panel.
//!
//! The layout is deterministic: words arrive sorted by descending count,
//! are sized proportionally between the configured font bounds and flow
//! left-to-right into rows. The result is returned as PNG bytes for the
//! Chart Builder to embed.

use crate::records::CategoryCount;
use plotters::prelude::*;
use std::error::Error;

/// Rendering options for the word cloud raster
#[derive(Clone, Debug)]
pub struct CloudOptions {
    /// Width of the raster in pixels
    pub width: u32,

    /// Height of the raster in pixels
    pub height: u32,

    /// Font size given to the least frequent word
    pub min_font: u32,

    /// Font size given to the most frequent word
    pub max_font: u32,
}

impl Default for CloudOptions {
    fn default() -> Self {
        Self {
            width: 900,
            height: 450,
            min_font: 14,
            max_font: 52,
        }
    }
}

/// Renders weighted keywords to a PNG word cloud
///
/// # Arguments
/// * `words` - Keyword counts, highest first (the order controls placement)
/// * `options` - Raster dimensions and font bounds
///
/// # Returns
/// * A Result containing the PNG image data as bytes or an error
///
/// # Implementation Notes
/// * Draws into a temporary file and reads it back, so no artifact is left
///   on disk
/// * Words that no longer fit below the last row are dropped
pub fn render_word_cloud(
    words: &[CategoryCount],
    options: &CloudOptions,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("wordcloud.png");
    {
        let root = BitMapBackend::new(&path, (options.width, options.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let max_count = words.iter().map(|w| w.count).max().unwrap_or(1);
        let min_count = words.iter().map(|w| w.count).min().unwrap_or(1);
        let span = (max_count - min_count).max(1) as f64;

        let margin: i32 = 16;
        let mut x = margin;
        let mut y = margin;
        let mut row_height: i32 = 0;

        for (index, word) in words.iter().enumerate() {
            let scale = (word.count - min_count) as f64 / span;
            let size = if max_count == min_count {
                (options.min_font + options.max_font) / 2
            } else {
                options.min_font + (scale * (options.max_font - options.min_font) as f64) as u32
            } as i32;

            // Rough glyph-width estimate; exact metrics are not worth a font
            // query for a tag cloud.
            let text_width = (word.label.chars().count() as f64 * size as f64 * 0.58) as i32;

            if x + text_width > options.width as i32 - margin {
                x = margin;
                y += row_height + 10;
                row_height = 0;
            }
            if y + size > options.height as i32 - margin {
                break;
            }

            let color = Palette99::pick(index);
            let style = ("sans-serif", size).into_font().color(&color);
            root.draw_text(&word.label, &style, (x, y))?;

            x += text_width + 14;
            row_height = row_height.max(size);
        }

        root.present()?;
    }

    let bytes = std::fs::read(&path)?;
    Ok(bytes)
}
