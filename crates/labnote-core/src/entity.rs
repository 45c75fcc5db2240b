use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LabnoteError;

/// Kinds of lab inventory record served under `/api/entities/{type}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    #[serde(alias = "chemicals")]
    Chemical,
    #[serde(alias = "genes")]
    Gene,
    #[serde(alias = "reagents")]
    Reagent,
    Equipment,
}

impl EntityType {
    pub const ALL: [EntityType; 4] = [
        EntityType::Chemical,
        EntityType::Gene,
        EntityType::Reagent,
        EntityType::Equipment,
    ];

    /// Path segment used by the REST API.
    pub fn path_segment(self) -> &'static str {
        match self {
            EntityType::Chemical => "chemicals",
            EntityType::Gene => "genes",
            EntityType::Reagent => "reagents",
            EntityType::Equipment => "equipment",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntityType::Chemical => "Chemical",
            EntityType::Gene => "Gene",
            EntityType::Reagent => "Reagent",
            EntityType::Equipment => "Equipment",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        EntityType::ALL
            .into_iter()
            .find(|t| t.path_segment() == lower || t.label().to_ascii_lowercase() == lower)
            .ok_or_else(|| {
                format!("unknown entity type: {s} (expected chemical, gene, reagent, equipment)")
            })
    }
}

/// A lab inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub min_stock: Option<f64>,
}

impl Entity {
    /// Quantity with unit, e.g. `500 mL`.
    pub fn stock_display(&self) -> Option<String> {
        let qty = self.quantity?;
        Some(match &self.unit {
            Some(unit) => format!("{qty} {unit}"),
            None => qty.to_string(),
        })
    }
}

/// One entry of an entity's usage history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageLog {
    #[serde(default)]
    pub id: Option<String>,
    pub entity_id: String,
    pub quantity: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    pub used_at: DateTime<Utc>,
}

/// Body of a usage POST.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageInput {
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub entity: Entity,
    pub current: f64,
    pub minimum: f64,
}

/// The `{success, data}` wrapper every API response is sent in.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn into_result(self) -> Result<T, LabnoteError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(LabnoteError::Api("response carried no data".to_string())),
            (false, _) => Err(LabnoteError::Api(
                self.error.unwrap_or_else(|| "request failed".to_string()),
            )),
        }
    }
}
