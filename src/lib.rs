/*!
# Publications Dashboard

A browser-based reporting dashboard for one institution's annual
scientific-publication output, built in Rust.

## Overview

The dashboard ingests a fixed workbook of Web of Science publication records
and renders six descriptive visualizations in a single page: a time series of
articles per year, a pie of journal quartiles, a grouped bar of lead
authorship per quartile, a treemap of journals within quartiles, a choropleth
of co-author affiliation countries, and a word cloud of the most frequent
keywords. Two dropdown filters (country and quartile) recompute their panels
on change.

## Architecture

Data flows one way, from the workbook to the page:

- **Dataset Loader** - reads three sheets into typed in-memory tables, with
  case-insensitive header resolution and degrade-to-empty behavior on
  malformed input
- **Aggregator** - pure grouping/counting/sorting over the immutable record
  set
- **Chart Builder** - pure mappings from count tables to renderer-independent
  chart specifications
- **Reactive Filter Controller** - a small state machine that recomputes one
  panel per filter event
- **Web Layer** - an axum application serving the page shell and a JSON API
  the page script renders from

The record set is loaded once at startup and never mutated; the only mutable
state is the current filter selection behind a mutex.

## Modules

- **records**: typed data model (records, counts, the quartile enum)
- **loader**: workbook ingestion and banner asset embedding
- **aggregate**: summary-table derivation
- **chart**: chart specifications and their builders
- **controller**: filter state machine driving the two reactive panels
- **wordcloud**: raster word-cloud rendering
- **app**: routing, shared state, page rendering

## REST API Endpoints

- `GET /` - the dashboard page
- `GET /api/dashboard` - all chart specs plus dropdown option lists
- `POST /api/filter` - apply or clear one filter, returns the replacement
  chart spec
- `GET /static/<path>` - page script and stylesheet
*/

// Re-export all modules so they appear in the documentation
pub mod aggregate;
pub mod app;
pub mod chart;
pub mod controller;
pub mod loader;
pub mod records;
pub mod wordcloud;

/// Re-export everything from these modules to make it easier to use
pub use aggregate::*;
pub use chart::*;
pub use controller::*;
pub use loader::*;
pub use records::*;
pub use wordcloud::*;
