//! API-facing schemas.
//!
//! These mirror the cartlist_core types with utoipa derives so they can
//! appear in the OpenAPI document; conversions are mechanical.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn default_quantity() -> f64 {
    1.0
}

fn default_unit() -> String {
    "each".to_string()
}

/// An alternate reading of a line item's amount (mirrors cartlist_core::Measurement)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Measurement {
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
}

/// Brand and dietary constraints (mirrors cartlist_core::Filters)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Filters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_filters: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_filters: Option<Vec<String>>,
}

/// A structured shopping line item (mirrors cartlist_core::LineItem)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LineItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upcs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_item_measurements: Option<Vec<Measurement>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,
}

impl From<Measurement> for cartlist_core::Measurement {
    fn from(m: Measurement) -> Self {
        Self {
            quantity: m.quantity,
            unit: m.unit,
        }
    }
}

impl From<cartlist_core::Measurement> for Measurement {
    fn from(m: cartlist_core::Measurement) -> Self {
        Self {
            quantity: m.quantity,
            unit: m.unit,
        }
    }
}

impl From<Filters> for cartlist_core::Filters {
    fn from(f: Filters) -> Self {
        Self {
            brand_filters: f.brand_filters,
            health_filters: f.health_filters,
        }
    }
}

impl From<cartlist_core::Filters> for Filters {
    fn from(f: cartlist_core::Filters) -> Self {
        Self {
            brand_filters: f.brand_filters,
            health_filters: f.health_filters,
        }
    }
}

impl From<LineItem> for cartlist_core::LineItem {
    fn from(item: LineItem) -> Self {
        Self {
            name: item.name,
            quantity: item.quantity,
            unit: item.unit,
            display_text: item.display_text,
            upcs: item.upcs,
            line_item_measurements: item
                .line_item_measurements
                .map(|ms| ms.into_iter().map(Into::into).collect()),
            filters: item.filters.map(Into::into),
        }
    }
}

impl From<cartlist_core::LineItem> for LineItem {
    fn from(item: cartlist_core::LineItem) -> Self {
        Self {
            name: item.name,
            quantity: item.quantity,
            unit: item.unit,
            display_text: item.display_text,
            upcs: item.upcs,
            line_item_measurements: item
                .line_item_measurements
                .map(|ms| ms.into_iter().map(Into::into).collect()),
            filters: item.filters.map(Into::into),
        }
    }
}
