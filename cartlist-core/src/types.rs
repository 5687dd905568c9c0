use serde::{Deserialize, Serialize};

fn default_quantity() -> f64 {
    1.0
}

fn default_unit() -> String {
    "each".to_string()
}

/// An alternate reading of a line item's amount (e.g. "2 cups" vs "480 ml").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
}

impl Default for Measurement {
    fn default() -> Self {
        Self {
            quantity: default_quantity(),
            unit: default_unit(),
        }
    }
}

/// Optional brand and dietary constraints on product matching.
///
/// Absence means "no constraint", which is distinct from an empty list,
/// so absent fields are never serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_filters: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_filters: Option<Vec<String>>,
}

/// A structured, shopping-API-ready representation of one ingredient.
///
/// `name` is always present; quantity and unit fall back to "1 each" when
/// the source text gives no amount. All optional fields are omitted from
/// serialized output when absent rather than sent as nulls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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

/// Recipe content extracted from a page. Request-scoped; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedRecipe {
    pub title: String,
    /// Free-text ingredient lines in original recipe order.
    pub ingredients: Vec<String>,
    /// Instructions as a single free-text blob, not yet split into steps.
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
}

/// A fully structured list ready for partner submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingList {
    pub title: String,
    pub ingredients: Vec<LineItem>,
    /// Discrete instruction steps. Forwarded only when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Validate a structured ingredient list before it crosses a boundary.
///
/// Rejects empty lists, blank names, and non-positive quantities, including
/// quantities inside alternate measurements.
pub fn validate_line_items(items: &[LineItem]) -> Result<(), String> {
    if items.is_empty() {
        return Err("line item list is empty".to_string());
    }

    for (i, item) in items.iter().enumerate() {
        if item.name.trim().is_empty() {
            return Err(format!("line item {} has an empty name", i));
        }
        if item.quantity <= 0.0 {
            return Err(format!(
                "line item '{}' has non-positive quantity {}",
                item.name, item.quantity
            ));
        }
        if let Some(measurements) = &item.line_item_measurements {
            for m in measurements {
                if m.quantity <= 0.0 {
                    return Err(format!(
                        "line item '{}' has a measurement with non-positive quantity {}",
                        item.name, m.quantity
                    ));
                }
            }
        }
    }

    Ok(())
}
