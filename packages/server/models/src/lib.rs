#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the farm monitor server.
//!
//! These types are serialized to JSON for the REST API. Query parameters
//! are kept as raw strings so that unrecognized selector values reach the
//! filter engine (and match nothing) instead of failing deserialization.

use farm_monitor_analytics_models::{ALL, FilterCriteria};
use farm_monitor_farm_models::{Region, RiskLevel, SupplierTier};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Filter fields shared by the summary, dashboard and export endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQueryParams {
    /// Case-insensitive substring of the farm name or id.
    pub search: Option<String>,
    /// Region display name, or `all`.
    pub region: Option<String>,
    /// Supplier tier, or `all`.
    pub tier: Option<String>,
    /// Risk level matched against drought or flood risk, or `all`.
    pub risk: Option<String>,
}

impl FilterQueryParams {
    /// Converts the raw parameters into filter criteria.
    #[must_use]
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::from_raw(
            self.search.as_deref(),
            self.region.as_deref(),
            self.tier.as_deref(),
            self.risk.as_deref(),
        )
    }
}

/// Query parameters for the dashboard endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQueryParams {
    /// Case-insensitive substring of the farm name or id.
    pub search: Option<String>,
    /// Region display name, or `all`.
    pub region: Option<String>,
    /// Supplier tier, or `all`.
    pub tier: Option<String>,
    /// Risk level matched against drought or flood risk, or `all`.
    pub risk: Option<String>,
    /// Table column to sort the visible rows by.
    pub sort: Option<String>,
    /// `asc` (default) or `desc`.
    pub order: Option<String>,
    /// Table column to filter the visible rows on.
    pub filter_column: Option<String>,
    /// Case-insensitive substring the `filter_column` cell must contain.
    pub filter_value: Option<String>,
}

impl From<&DashboardQueryParams> for FilterQueryParams {
    fn from(p: &DashboardQueryParams) -> Self {
        Self {
            search: p.search.clone(),
            region: p.region.clone(),
            tier: p.tier.clone(),
            risk: p.risk.clone(),
        }
    }
}

/// One entry of a filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOption {
    /// Text shown to the user.
    pub label: String,
    /// Value to send back as a query parameter.
    pub value: String,
}

impl ApiOption {
    fn all(label: &str) -> Self {
        Self {
            label: label.to_string(),
            value: ALL.to_string(),
        }
    }

    fn named(name: impl ToString) -> Self {
        let name = name.to_string();
        Self {
            label: name.clone(),
            value: name,
        }
    }
}

/// Selectable values for each filter, each list led by its "all" entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFilterOptions {
    pub regions: Vec<ApiOption>,
    pub tiers: Vec<ApiOption>,
    pub risk_levels: Vec<ApiOption>,
}

impl ApiFilterOptions {
    /// Builds the option lists from the regions and tiers present in the
    /// store. Risk levels are always the full set.
    #[must_use]
    pub fn new(regions: &[Region], tiers: &[SupplierTier]) -> Self {
        Self {
            regions: std::iter::once(ApiOption::all("All Regions"))
                .chain(regions.iter().map(ApiOption::named))
                .collect(),
            tiers: std::iter::once(ApiOption::all("All Tiers"))
                .chain(tiers.iter().map(ApiOption::named))
                .collect(),
            risk_levels: std::iter::once(ApiOption::all("All Risk Levels"))
                .chain(RiskLevel::all().iter().map(ApiOption::named))
                .collect(),
        }
    }
}
