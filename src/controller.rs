//! Reactive filter state machine.
//!
//! Two independent filters, each either unset or holding one value. A filter
//! event sets or clears exactly one of them, then synchronously re-runs the
//! scoped aggregation and chart construction for the one panel that filter
//! owns. Events are handled to completion, one at a time; there is no
//! queueing or overlapping recomputation to reason about.

use crate::aggregate;
use crate::chart::{self, ChartSpec, Panel};
use crate::records::Dataset;
use std::sync::Arc;

/// Transient UI filter state. Superseded wholesale by the next event, never
/// persisted. Values are the exact dropdown labels; an unrecognized value
/// filters down to an empty aggregate rather than faulting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub country: Option<String>,
    pub quartile: Option<String>,
}

/// One dropdown change: sets the filter to `Some(value)` or clears it with
/// `None`, which restores the unfiltered aggregate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterEvent {
    Country(Option<String>),
    Quartile(Option<String>),
}

impl FilterEvent {
    /// The one panel this event is scoped to.
    pub fn panel(&self) -> Panel {
        match self {
            FilterEvent::Country(_) => Panel::Countries,
            FilterEvent::Quartile(_) => Panel::Journals,
        }
    }
}

/// Owns the filter state for one dashboard session and recomputes the
/// affected panel on each event. The record set itself is shared and
/// read-only.
pub struct DashboardController {
    dataset: Arc<Dataset>,
    filters: FilterSelection,
}

impl DashboardController {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        DashboardController {
            dataset,
            filters: FilterSelection::default(),
        }
    }

    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    /// Applies one filter event and returns the replacement spec for the
    /// panel it is scoped to. No other panel is affected.
    pub fn apply(&mut self, event: FilterEvent) -> ChartSpec {
        match event {
            FilterEvent::Country(value) => {
                self.filters.country = value;
                self.countries_chart()
            }
            FilterEvent::Quartile(value) => {
                self.filters.quartile = value;
                self.journals_chart()
            }
        }
    }

    /// Current choropleth spec, scoped by the country filter if set.
    pub fn countries_chart(&self) -> ChartSpec {
        let rows =
            aggregate::filter_by_country(&self.dataset.affiliations, self.filters.country.as_deref());
        chart::country_choropleth(&aggregate::count_by_country(&rows))
    }

    /// Current treemap spec, scoped by the quartile filter if set.
    pub fn journals_chart(&self) -> ChartSpec {
        let rows = aggregate::filter_by_quartile(
            &self.dataset.publications,
            self.filters.quartile.as_deref(),
        );
        chart::journal_treemap(&aggregate::journals_by_quartile(&rows))
    }

    /// Replacement spec for a filterable panel without changing any filter
    /// state; `None` for panels that have no filter.
    pub fn chart_for(&self, panel: Panel) -> Option<ChartSpec> {
        match panel {
            Panel::Countries => Some(self.countries_chart()),
            Panel::Journals => Some(self.journals_chart()),
            _ => None,
        }
    }
}
