use pubdash::chart::{ChartData, Panel};
use pubdash::controller::{DashboardController, FilterEvent};
use pubdash::records::{AffiliationRecord, Dataset, PublicationRecord, Quartile};
use std::sync::Arc;

// A small dataset matching the shape of a loaded workbook: three Chile and
// two Brazil affiliation rows, publications across two quartiles.
fn sample_dataset() -> Arc<Dataset> {
    let affiliations = ["Chile", "Chile", "Brazil", "Chile", "Brazil"]
        .iter()
        .map(|country| AffiliationRecord {
            country: Some(country.to_string()),
        })
        .collect();

    let publications = vec![
        publication(Quartile::Q1, "Nature"),
        publication(Quartile::Q1, "Science"),
        publication(Quartile::Q2, "Sensors"),
    ];

    Arc::new(Dataset {
        publications,
        yearly: Vec::new(),
        affiliations,
    })
}

fn publication(quartile: Quartile, journal: &str) -> PublicationRecord {
    PublicationRecord {
        quartile: Some(quartile),
        journal: Some(journal.to_string()),
        ..Default::default()
    }
}

fn region_counts(controller: &DashboardController) -> Vec<(String, u64)> {
    match controller.countries_chart().data {
        ChartData::Choropleth { regions } => {
            regions.into_iter().map(|r| (r.label, r.count)).collect()
        }
        other => panic!("expected a choropleth payload, got {:?}", other),
    }
}

fn test_country_filter_cycle() {
    println!("\n====== Testing country filter set / clear ======");

    let mut controller = DashboardController::new(sample_dataset());
    let unfiltered = controller.countries_chart();
    assert_eq!(
        region_counts(&controller),
        vec![("Chile".to_string(), 3), ("Brazil".to_string(), 2)]
    );
    println!("✓ Unfiltered map counts Chile=3 Brazil=2");

    let spec = controller.apply(FilterEvent::Country(Some("Chile".to_string())));
    assert_eq!(spec.panel, Panel::Countries);
    assert_eq!(region_counts(&controller), vec![("Chile".to_string(), 3)]);
    println!("✓ Selecting Chile narrows the map to Chile=3");

    let restored = controller.apply(FilterEvent::Country(None));
    assert_eq!(restored, unfiltered);
    assert!(controller.filters().country.is_none());
    println!("✓ Clearing the filter reproduces the unfiltered spec exactly");
}

fn test_unknown_country() {
    println!("\n====== Testing unknown filter values ======");

    let mut controller = DashboardController::new(sample_dataset());

    let spec = controller.apply(FilterEvent::Country(Some("Atlantis".to_string())));
    match spec.data {
        ChartData::Choropleth { regions } => assert!(regions.is_empty()),
        other => panic!("expected a choropleth payload, got {:?}", other),
    }
    println!("✓ Unknown country produces an empty aggregate, not a fault");

    let spec = controller.apply(FilterEvent::Quartile(Some("Q9".to_string())));
    match spec.data {
        ChartData::Treemap { nodes } => assert!(nodes.is_empty()),
        other => panic!("expected a treemap payload, got {:?}", other),
    }
    println!("✓ Unknown quartile label likewise");
}

fn test_quartile_filter_scoping() {
    println!("\n====== Testing quartile filter and panel scoping ======");

    let mut controller = DashboardController::new(sample_dataset());
    let unfiltered_journals = controller.journals_chart();
    let unfiltered_countries = controller.countries_chart();

    let spec = controller.apply(FilterEvent::Quartile(Some("Q1".to_string())));
    assert_eq!(spec.panel, Panel::Journals);
    match &spec.data {
        ChartData::Treemap { nodes } => {
            assert!(nodes.iter().all(|n| n.id == "Q1" || n.parent == "Q1"));
            let branch = nodes.iter().find(|n| n.id == "Q1").unwrap();
            assert_eq!(branch.value, 2);
            println!("✓ Treemap narrowed to the Q1 branch");
        }
        other => panic!("expected a treemap payload, got {:?}", other),
    }

    // The other panel never moves on a quartile event
    assert_eq!(controller.countries_chart(), unfiltered_countries);
    println!("✓ Country panel unaffected by a quartile event");

    let restored = controller.apply(FilterEvent::Quartile(None));
    assert_eq!(restored, unfiltered_journals);
    println!("✓ Clearing the quartile filter restores the full treemap");
}

fn test_independent_filters() {
    println!("\n====== Testing filter independence ======");

    let mut controller = DashboardController::new(sample_dataset());

    controller.apply(FilterEvent::Country(Some("Brazil".to_string())));
    controller.apply(FilterEvent::Quartile(Some("Q2".to_string())));

    assert_eq!(controller.filters().country.as_deref(), Some("Brazil"));
    assert_eq!(controller.filters().quartile.as_deref(), Some("Q2"));
    println!("✓ Both filters hold their own state");

    // Clearing one leaves the other set
    controller.apply(FilterEvent::Country(None));
    assert!(controller.filters().country.is_none());
    assert_eq!(controller.filters().quartile.as_deref(), Some("Q2"));
    println!("✓ Clearing one filter leaves the other untouched");
}

fn test_chart_for() {
    println!("\n====== Testing chart_for panel lookup ======");

    let controller = DashboardController::new(sample_dataset());

    assert!(controller.chart_for(Panel::Countries).is_some());
    assert!(controller.chart_for(Panel::Journals).is_some());
    assert!(controller.chart_for(Panel::TimeSeries).is_none());
    assert!(controller.chart_for(Panel::Keywords).is_none());
    println!("✓ Only the two filterable panels resolve to a chart");
}

fn test_event_panels() {
    println!("\n====== Testing event-to-panel scoping ======");

    let country = FilterEvent::Country(None);
    let quartile = FilterEvent::Quartile(None);
    assert_eq!(country.panel(), Panel::Countries);
    assert_eq!(quartile.panel(), Panel::Journals);
    println!("✓ Each event names the one panel it owns");
}

pub fn run_tests() {
    println!("Starting filter controller unit tests");
    test_country_filter_cycle();
    test_unknown_country();
    test_quartile_filter_scoping();
    test_independent_filters();
    test_chart_for();
    test_event_panels();
    println!("All tests passed!");
}

fn main() {
    run_tests();
}
