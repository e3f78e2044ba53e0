//! Agricultural campaign dashboard
//!
//! Compares sown and harvested hectares, and lost-hectare percentages, for
//! two locations at the same geographic level over a range of campaign
//! years.
//!
//! Data flow:
//! 1. Logged-out users see the login or register form. Both go through the
//!    Firebase identity provider; registration also creates the backend user.
//! 2. Once a session exists, the catalog (crops, countries, regions,
//!    provinces) is loaded for the filter selects.
//! 3. Submitting the filter panel updates `AppState::filters`. Two effects
//!    react to it: one loads the campaign series for the line charts, the
//!    other loads losses and averages for the comparison table.
//! 4. Each batch takes a generation ticket; a result whose ticket is no
//!    longer current is dropped instead of overwriting newer data.

use campo_chart_ui::components::{
    AverageBox, ChartContainer, ChartHeader, ComparisonTable, Credentials, EmptyState,
    ErrorDisplay, FilterPanel, LineChart, LoadingSpinner, LocationToggle, LoginForm,
    RegisterForm, ThresholdLegend,
};
use campo_chart_ui::state::{AppState, AuthView};
use campo_core::api::ApiClient;
use campo_core::config::CampoConfig;
use campo_core::error::Result;
use campo_core::fetch::{load_comparison, load_region_series};
use campo_core::identity::FirebaseIdentity;
use campo_core::observation::{HARVESTED_HECTARES, SOWN_HECTARES};
use campo_core::session::{IdentityProvider, Session};
use campo_data::merge::chart_rows_for;
use campo_data::threshold::{classify, TOLERANCE_POINTS};
use dioxus::prelude::*;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("campo-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    let state = use_context_provider(AppState::new);
    use_context_provider(|| ApiClient::new(CampoConfig::compiled()));

    rsx! {
        div {
            style: "padding: 16px; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;",
            if (state.session)().logged_in() {
                Dashboard {}
            } else {
                AuthGate {}
            }
        }
    }
}

async fn sign_in(config: &CampoConfig, credentials: &Credentials) -> Result<Session> {
    let identity = FirebaseIdentity::from_config(config)?;
    identity
        .sign_in(&credentials.email, &credentials.password)
        .await
}

/// Create the provider account, then the backend user record.
async fn register(client: &ApiClient, credentials: &Credentials) -> Result<Session> {
    let identity = FirebaseIdentity::from_config(client.config())?;
    let session = identity
        .create_account(&credentials.email, &credentials.password)
        .await?;
    client.register_user(&session, &credentials.username).await?;
    Ok(session)
}

/// Login / register switcher shown to logged-out users.
#[component]
fn AuthGate() -> Element {
    let mut state = use_context::<AppState>();
    let client = use_context::<ApiClient>();
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let login_client = client.clone();
    let on_login = move |credentials: Credentials| {
        let config = login_client.config().clone();
        busy.set(true);
        spawn(async move {
            let result = sign_in(&config, &credentials).await;
            busy.set(false);
            match result {
                Ok(session) => {
                    log::info!("signed in as {:?}", session.user_id);
                    error.set(None);
                    state.session.set(session);
                }
                Err(e) => {
                    log::warn!("sign in failed: {}", e);
                    error.set(Some(e.to_string()));
                }
            }
        });
    };

    let on_register = move |credentials: Credentials| {
        let client = client.clone();
        busy.set(true);
        spawn(async move {
            let result = register(&client, &credentials).await;
            busy.set(false);
            match result {
                Ok(session) => {
                    log::info!("registered {:?}", session.user_id);
                    error.set(None);
                    state.session.set(session);
                }
                Err(e) => {
                    log::warn!("registration failed: {}", e);
                    error.set(Some(e.to_string()));
                }
            }
        });
    };

    let mut switch_to = move |view: AuthView| {
        error.set(None);
        state.auth_view.set(view);
    };

    match (state.auth_view)() {
        AuthView::Login => rsx! {
            LoginForm {
                error: error(),
                busy: busy(),
                on_submit: on_login,
                on_switch: move |_| switch_to(AuthView::Register),
            }
        },
        AuthView::Register => rsx! {
            RegisterForm {
                error: error(),
                busy: busy(),
                on_submit: on_register,
                on_switch: move |_| switch_to(AuthView::Login),
            }
        },
    }
}

/// Filter panel plus the region charts and loss comparison sections.
#[component]
fn Dashboard() -> Element {
    let mut state = use_context::<AppState>();
    let client = use_context::<ApiClient>();

    // Load the catalog whenever the signed-in user changes
    let catalog_client = client.clone();
    use_effect(move || {
        let session = (state.session)();
        if !session.logged_in() {
            return;
        }
        let client = catalog_client.clone();
        state.catalog_loading.set(true);
        state.catalog_error.set(None);
        spawn(async move {
            match client.load_catalog(&session).await {
                Ok(catalog) => {
                    log::info!(
                        "catalog loaded: {} crops, {} countries, {} regions, {} provinces",
                        catalog.crops.len(),
                        catalog.countries.len(),
                        catalog.regions.len(),
                        catalog.provinces.len()
                    );
                    state.catalog.set(catalog);
                }
                Err(e) => {
                    log::error!("Failed to load catalog: {}", e);
                    state.catalog_error.set(Some(e.to_string()));
                }
            }
            state.catalog_loading.set(false);
        });
    });

    // Region charts batch
    let region_client = client.clone();
    use_effect(move || {
        let filters = (state.filters)();
        let session = (state.session)();
        // Subscribing to reload lets retry() rerun the batch
        let _ = (state.reload)();
        let ticket = state.region_generation.write().begin();
        if !filters.is_fetchable() {
            state.region.write().reset();
            return;
        }
        state.region.write().begin();
        let client = region_client.clone();
        spawn(async move {
            let result = load_region_series(&client, &session, &filters).await;
            let generation = *state.region_generation.peek();
            state
                .region
                .write()
                .finish_if_current(&generation, ticket, result);
        });
    });

    // Comparison batch
    let comparison_client = client.clone();
    use_effect(move || {
        let filters = (state.filters)();
        let session = (state.session)();
        // Subscribing to reload lets retry() rerun the batch
        let _ = (state.reload)();
        let ticket = state.comparison_generation.write().begin();
        if !filters.is_fetchable() {
            state.comparison.write().reset();
            return;
        }
        state.comparison.write().begin();
        let client = comparison_client.clone();
        spawn(async move {
            let result = load_comparison(&client, &session, &filters).await;
            let generation = *state.comparison_generation.peek();
            state
                .comparison
                .write()
                .finish_if_current(&generation, ticket, result);
        });
    });

    let filters = (state.filters)();
    let email = (state.session)().email.unwrap_or_default();
    let region = state.region.read().clone();
    let comparison = state.comparison.read().clone();

    let sown_rows = chart_rows_for(&filters, &region.data, SOWN_HECTARES);
    let harvested_rows = chart_rows_for(&filters, &region.data, HARVESTED_HECTARES);

    let active = filters.active_location((state.active_location)());
    let average = comparison.data.averages[active];
    let classified = classify(&comparison.data.losses[active], average);
    let active_label = comparison.data.labels[active].clone();

    rsx! {
        div {
            style: "display: flex; justify-content: space-between; align-items: center; margin-bottom: 8px;",
            h2 { style: "margin: 0;", "Campañas agrícolas" }
            div {
                style: "font-size: 13px; color: #666;",
                "{email} "
                button {
                    r#type: "button",
                    onclick: move |_| state.sign_out(),
                    "Cerrar sesión"
                }
            }
        }

        FilterPanel {}

        if !filters.is_fetchable() {
            EmptyState { message: "Elegí un nivel y al menos una ubicación, y presioná \"Ver campañas\".".to_string() }
        } else {
            section {
                style: "margin-bottom: 24px;",
                ChartHeader {
                    title: "Hectáreas por campaña".to_string(),
                    filters: filters.clone(),
                    unit_description: "Hectáreas (ha)".to_string(),
                }
                if let Some(err) = region.error.clone() {
                    ErrorDisplay {
                        section: "los gráficos de campañas".to_string(),
                        message: err,
                        on_retry: move |_| state.retry(),
                    }
                } else if region.loading && region.data.is_empty() {
                    LoadingSpinner {}
                } else if region.data.is_empty() {
                    EmptyState { message: "No hay campañas para los filtros seleccionados.".to_string() }
                } else {
                    div {
                        style: "display: flex; flex-wrap: wrap; gap: 24px;",
                        div {
                            style: "flex: 1; min-width: 320px;",
                            h4 { "Hectáreas sembradas" }
                            ChartContainer {
                                id: "sown-chart".to_string(),
                                loading: region.loading,
                                LineChart { rows: sown_rows, y_label: "Hectáreas sembradas".to_string() }
                            }
                        }
                        div {
                            style: "flex: 1; min-width: 320px;",
                            h4 { "Hectáreas cosechadas" }
                            ChartContainer {
                                id: "harvested-chart".to_string(),
                                loading: region.loading,
                                LineChart { rows: harvested_rows, y_label: "Hectáreas cosechadas".to_string() }
                            }
                        }
                    }
                }
            }

            section {
                ChartHeader {
                    title: "Comparativa de pérdidas".to_string(),
                    filters: filters.clone(),
                    unit_description: "% de hectáreas perdidas".to_string(),
                }
                if let Some(err) = comparison.error.clone() {
                    ErrorDisplay {
                        section: "la comparativa de pérdidas".to_string(),
                        message: err,
                        on_retry: move |_| state.retry(),
                    }
                } else if comparison.loading {
                    LoadingSpinner {}
                } else {
                    LocationToggle { labels: comparison.data.labels.clone() }
                    AverageBox {
                        average,
                        year_from: filters.year_from.clone(),
                        year_to: filters.year_to.clone(),
                    }
                    if classified.is_empty() {
                        EmptyState { message: format!("No hay pérdidas registradas para {}.", active_label) }
                    } else {
                        ComparisonTable { label: active_label.clone(), rows: classified.clone() }
                    }
                    ThresholdLegend { tolerance: TOLERANCE_POINTS }
                }
            }
        }
    }
}
