#![cfg(not(tarpaulin_include))]
#![cfg(feature = "web")]

use axum::{
    Json, Router,
    extract::State,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::aggregate::{self, Field};
use crate::chart::{self, ChartSpec, Panel};
use crate::controller::{DashboardController, FilterEvent};
use crate::loader;
use crate::records::QUARTILE_ORDER;
use crate::wordcloud::{self, CloudOptions};

const PAGE_TITLE: &str = "Analysis of WoS Publications 2023";

const PAGE_INTRO: &str = "This dashboard presents the institution's scientific publications \
indexed in the Web of Science (WoS) and registered by the national research agency during \
2023.\n\nIt is meant to give a general view of the institution's productivity over the \
period. The primary source is the agency's list of WoS publications affiliated with the \
institution, covering January through December 2023.";

const QUARTILE_NOTE: &str = "*The quartile is an indicator of the relative standing of a \
journal within the journals of its field.";

/// Server configuration, filled from command-line arguments.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub workbook: PathBuf,
    pub banner: Option<PathBuf>,
    pub bind: String,
}

pub struct AppState {
    controller: Mutex<DashboardController>,
    /// Specs for the four panels without filters, built once at startup.
    static_specs: Vec<ChartSpec>,
    countries: Vec<String>,
    page: String,
}

#[derive(Deserialize)]
struct FilterRequest {
    panel: Panel,
    /// The selected dropdown value; `null` clears the filter.
    value: Option<String>,
}

#[derive(Serialize)]
struct FilterResponse {
    status: String,
    chart: Option<ChartSpec>,
    message: Option<String>,
}

#[derive(Serialize)]
struct DashboardResponse {
    generated_at: String,
    charts: Vec<ChartSpec>,
    countries: Vec<String>,
    quartiles: Vec<&'static str>,
}

pub async fn run(config: RunConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Load the record set once; it is immutable from here on.
    let dataset = Arc::new(loader::load_workbook(&config.workbook)?);

    let banner = config.banner.as_ref().and_then(loader::banner_data_uri);

    // The word cloud is rendered once: the keywords panel has no filter.
    let keywords = aggregate::top_n_by_frequency(&dataset.publications, Field::Keyword, 60);
    let cloud_png = match wordcloud::render_word_cloud(&keywords, &CloudOptions::default()) {
        Ok(png) => png,
        Err(e) => {
            log::warn!("word cloud rendering failed: {}", e);
            Vec::new()
        }
    };

    let static_specs = vec![
        chart::yearly_line(&aggregate::count_by_year(&dataset.yearly)),
        chart::quartile_pie(&aggregate::count_by_quartile(&dataset.publications)),
        chart::leadership_bar(&aggregate::cross_tab_leadership(&dataset.publications)),
        chart::keyword_cloud(&cloud_png),
    ];

    // Render the page shell once; everything dynamic goes through the API.
    let mut registry = Handlebars::new();
    registry.register_template_string("dashboard", include_str!("../static/dashboard.hbs"))?;
    let page = registry.render(
        "dashboard",
        &serde_json::json!({
            "title": PAGE_TITLE,
            "intro": PAGE_INTRO,
            "quartile_note": QUARTILE_NOTE,
            "banner": banner,
        }),
    )?;

    // Setup app state
    let app_state = Arc::new(AppState {
        countries: dataset.countries(),
        controller: Mutex::new(DashboardController::new(dataset)),
        static_specs,
        page,
    });

    // Build router
    let app = Router::new()
        .route("/", get(serve_dashboard))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/filter", post(apply_filter))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(app_state);

    // Start server
    let listener = TcpListener::bind(&config.bind).await?;
    println!("Listening on http://{}", config.bind);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_dashboard(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(state.page.clone())
}

async fn get_dashboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let controller = state.controller.lock().unwrap();

    let mut charts = state.static_specs.clone();
    charts.push(controller.journals_chart());
    charts.push(controller.countries_chart());

    Json(DashboardResponse {
        generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        charts,
        countries: state.countries.clone(),
        quartiles: QUARTILE_ORDER.iter().map(|q| q.label()).collect(),
    })
}

async fn apply_filter(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<FilterRequest>,
) -> impl IntoResponse {
    let event = match payload.panel {
        Panel::Countries => FilterEvent::Country(payload.value),
        Panel::Journals => FilterEvent::Quartile(payload.value),
        _ => {
            return Json(FilterResponse {
                status: "error".to_string(),
                chart: None,
                message: Some("panel does not accept filters".to_string()),
            });
        }
    };

    let mut controller = state.controller.lock().unwrap();
    let chart = controller.apply(event);

    Json(FilterResponse {
        status: "ok".to_string(),
        chart: Some(chart),
        message: None,
    })
}
