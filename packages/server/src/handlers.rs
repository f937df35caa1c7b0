//! HTTP handler functions for the farm monitor API.

use actix_web::{HttpResponse, web};
use farm_monitor_analytics::{export, filter};
use farm_monitor_dashboard::presentation::{SortDirection, TableColumn};
use farm_monitor_dashboard::{Presenter, TableFilter, TableSort};
use farm_monitor_server_models::{
    ApiFilterOptions, ApiHealth, DashboardQueryParams, FilterQueryParams,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/options`
///
/// Lists the selectable regions, tiers and risk levels.
pub async fn options(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiFilterOptions::new(
        &state.store.regions(),
        &state.store.tiers(),
    ))
}

/// `GET /api/summary`
///
/// Returns the raw aggregate summary for the given filters.
pub async fn summary(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    let criteria = params.criteria();
    let summary = farm_monitor_analytics::run(state.store.records(), &criteria, &state.options);
    HttpResponse::Ok().json(summary)
}

/// `GET /api/dashboard`
///
/// Returns the fully formatted dashboard view, optionally with the table
/// rows sorted by `sort` and `order` and narrowed by `filterColumn` and
/// `filterValue`.
pub async fn dashboard(
    state: web::Data<AppState>,
    params: web::Query<DashboardQueryParams>,
) -> HttpResponse {
    let table_params = table_sort(&params).and_then(|sort| Ok((sort, table_filter(&params)?)));
    let (sort, filters) = match table_params {
        Ok(table_params) => table_params,
        Err(message) => {
            log::warn!("Rejected dashboard request: {message}");
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": message
            }));
        }
    };

    let criteria = FilterQueryParams::from(&*params).criteria();
    let summary = farm_monitor_analytics::run(state.store.records(), &criteria, &state.options);
    let presenter = Presenter::new(
        state.decoration.as_ref(),
        state.store.loaded_at().date_naive(),
    );

    let mut view = presenter.present(&summary, sort);
    view.table.retain_matching(&filters);

    HttpResponse::Ok().json(view)
}

/// `GET /api/export`
///
/// Downloads every record matching the filters as CSV.
pub async fn export(
    state: web::Data<AppState>,
    params: web::Query<FilterQueryParams>,
) -> HttpResponse {
    let criteria = params.criteria();
    let subset = filter::apply(state.store.records(), &criteria);

    match export::to_csv_string(&subset) {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                "attachment; filename=\"farm_data.csv\"",
            ))
            .body(csv),
        Err(e) => {
            log::error!("Failed to export farms: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to export farms"
            }))
        }
    }
}

/// Parses the optional `sort` and `order` parameters.
fn table_sort(params: &DashboardQueryParams) -> Result<Option<TableSort>, String> {
    let Some(column) = params.sort.as_deref().filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let column: TableColumn = column
        .parse()
        .map_err(|_| format!("Unknown sort column '{column}'"))?;

    let direction = match params.order.as_deref().filter(|s| !s.is_empty()) {
        Some(order) => order
            .parse()
            .map_err(|_| format!("Unknown sort order '{order}'"))?,
        None => SortDirection::Asc,
    };

    Ok(Some(TableSort { column, direction }))
}

/// Parses the optional `filterColumn` and `filterValue` parameters. A column
/// without a value filters nothing.
fn table_filter(params: &DashboardQueryParams) -> Result<Vec<TableFilter>, String> {
    let Some(column) = params.filter_column.as_deref().filter(|s| !s.is_empty()) else {
        return Ok(vec![]);
    };
    let column: TableColumn = column
        .parse()
        .map_err(|_| format!("Unknown filter column '{column}'"))?;

    Ok(params
        .filter_value
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|value| TableFilter {
            column,
            value: value.to_string(),
        })
        .into_iter()
        .collect())
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test as actix_test, web};
    use chrono::NaiveDate;
    use farm_monitor_analytics_models::{DashboardSummary, FarmTable, SummaryOptions};
    use farm_monitor_dashboard::decoration::StaticDecoration;
    use farm_monitor_farm_models::{RiskLevel, SupplierTier};
    use farm_monitor_store::{FarmStore, SyntheticSource};

    use super::*;
    use crate::configure;

    fn state() -> web::Data<AppState> {
        let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let store =
            FarmStore::from_source(&SyntheticSource::new(270, 42, today), Some(270)).unwrap();
        web::Data::new(AppState {
            store,
            options: SummaryOptions::default(),
            decoration: Box::new(StaticDecoration),
        })
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = actix_test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn options_list_all_risk_levels() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = actix_test::TestRequest::get().uri("/api/options").to_request();
        let body: ApiFilterOptions = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.risk_levels.len(), 4);
        assert_eq!(body.regions[0].value, "all");
        assert!(body.regions.len() > 1);
    }

    #[actix_web::test]
    async fn default_summary_covers_whole_portfolio() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = actix_test::TestRequest::get().uri("/api/summary").to_request();
        let body: DashboardSummary = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.cards.total_farms, 270);
        assert_eq!(body.table.rows().len(), 50);
        assert_eq!(body.table.rows()[0].id, "FARM_001");
    }

    #[actix_web::test]
    async fn summary_applies_filters() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = actix_test::TestRequest::get()
            .uri("/api/summary?tier=Gold&risk=High")
            .to_request();
        let body: DashboardSummary = actix_test::call_and_read_body_json(&app, req).await;

        assert!(body.table.rows().iter().all(|row| {
            row.supplier_tier == SupplierTier::Gold
                && (row.drought_risk == RiskLevel::High || row.flood_risk == RiskLevel::High)
        }));
        assert_eq!(body.filter_summary.total, 270);
    }

    #[actix_web::test]
    async fn unknown_region_is_empty_not_an_error() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = actix_test::TestRequest::get()
            .uri("/api/summary?region=Atlantis")
            .to_request();
        let body: DashboardSummary = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.cards.total_farms, 0);
        assert_eq!(body.table, FarmTable::NoMatches);
    }

    #[actix_web::test]
    async fn dashboard_renders_view() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = actix_test::TestRequest::get()
            .uri("/api/dashboard?search=FARM_001&sort=overallScore&order=desc")
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(
            body["filterSummary"]["headline"],
            "Showing 1 of 270 farms"
        );
        assert_eq!(body["header"]["lastUpdated"].as_str().map(str::len), Some(10));
        assert_eq!(body["table"]["kind"], "rows");
        assert_eq!(body["table"]["rows"][0]["id"], "FARM_001");
    }

    #[actix_web::test]
    async fn dashboard_rejects_unknown_sort_column() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = actix_test::TestRequest::get()
            .uri("/api/dashboard?sort=milkVolume")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn dashboard_filters_table_column() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = actix_test::TestRequest::get()
            .uri("/api/dashboard?filterColumn=id&filterValue=farm_01")
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        let ids: Vec<&str> = body["table"]["rows"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|row| row["id"].as_str())
            .collect();
        assert_eq!(ids.len(), 10);
        assert!(ids.iter().all(|id| id.starts_with("FARM_01")));
        assert_eq!(
            body["filterSummary"]["headline"],
            "Showing 270 of 270 farms"
        );

        let req = actix_test::TestRequest::get()
            .uri("/api/dashboard?filterColumn=milkVolume&filterValue=1")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn export_returns_csv_for_filtered_subset() {
        let app = actix_test::init_service(App::new().app_data(state()).configure(configure)).await;
        let req = actix_test::TestRequest::get()
            .uri("/api/export?search=FARM_00")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok()),
            Some("text/csv; charset=utf-8")
        );

        let body = actix_test::read_body(resp).await;
        let text = std::str::from_utf8(&body).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("id,name,"));
        assert_eq!(lines.count(), 9);
    }

    #[test]
    fn sort_defaults_to_ascending() {
        let params = DashboardQueryParams {
            sort: Some("size".to_string()),
            ..DashboardQueryParams::default()
        };
        assert_eq!(
            table_sort(&params).unwrap(),
            Some(TableSort {
                column: TableColumn::Size,
                direction: SortDirection::Asc,
            })
        );
        assert_eq!(table_sort(&DashboardQueryParams::default()).unwrap(), None);
    }

    #[test]
    fn filter_column_without_value_filters_nothing() {
        let params = DashboardQueryParams {
            filter_column: Some("region".to_string()),
            ..DashboardQueryParams::default()
        };
        assert!(table_filter(&params).unwrap().is_empty());

        let params = DashboardQueryParams {
            filter_value: Some("west".to_string()),
            ..params
        };
        assert_eq!(
            table_filter(&params).unwrap(),
            vec![TableFilter {
                column: TableColumn::Region,
                value: "west".to_string(),
            }]
        );
    }
}
