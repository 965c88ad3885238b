use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// `null` decodes like a missing field.
fn nullable<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(de).map(Option::unwrap_or_default)
}

/// Quantities arrive as integers, floats, strings or `null`. Anything that is
/// not a non-negative count is zero.
fn quantity<'de, D: Deserializer<'de>>(de: D) -> Result<u64, D::Error> {
    let value = Option::<json::Value>::deserialize(de)?;
    Ok(match value {
        Some(json::Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|n| *n > 0.0).map(|n| n as u64))
            .unwrap_or_default(),
        Some(json::Value::String(text)) => text.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StockItem {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, rename = "value", alias = "quantity", deserialize_with = "quantity")]
    pub quantity: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

/// Current shop contents, one list per bucket. Missing or `null` buckets decode as empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StockData {
    #[serde(deserialize_with = "nullable")]
    pub seeds_stock: Vec<StockItem>,
    #[serde(deserialize_with = "nullable")]
    pub egg_stock: Vec<StockItem>,
    #[serde(deserialize_with = "nullable")]
    pub gear_stock: Vec<StockItem>,
    #[serde(deserialize_with = "nullable")]
    pub honey_stock: Vec<StockItem>,
    #[serde(deserialize_with = "nullable")]
    pub cosmetics_stock: Vec<StockItem>,
    /// Fields we have no bucket for, kept so new server buckets can be noticed.
    #[serde(flatten)]
    pub other: BTreeMap<String, json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RestockEntry {
    /// Next restock, unix milliseconds.
    pub timestamp: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub countdown: String,
    #[serde(rename = "LastRestock", deserialize_with = "nullable")]
    pub last_restock: String,
    #[serde(rename = "timeSinceLastRestock", deserialize_with = "nullable")]
    pub time_since_last_restock: String,
}

/// Keyed by restock key (`seeds`, `egg`, `gear`, `Event`, `cosmetic`), not by stock bucket.
pub type RestockTimes = BTreeMap<String, RestockEntry>;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherEvent {
    #[serde(rename = "weather_id", deserialize_with = "nullable")]
    pub id: String,
    #[serde(rename = "weather_name", deserialize_with = "nullable")]
    pub name: String,
    pub active: bool,
    /// Seconds.
    pub duration: u64,
    #[serde(rename = "start_duration_unix")]
    pub start_unix: i64,
    #[serde(rename = "end_duration_unix")]
    pub end_unix: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherReport {
    pub success: bool,
    #[serde(deserialize_with = "nullable")]
    pub weather: Vec<WeatherEvent>,
}

/// `Item-Info` is kept opaque, only its availability matters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemCatalogue(pub json::Value);

impl ItemCatalogue {
    pub fn len(&self) -> usize {
        match &self.0 {
            json::Value::Array(items) => items.len(),
            json::Value::Object(items) => items.len(),
            json::Value::Null => 0,
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Combined payload of the stock domain.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StockBoard {
    pub stock: StockData,
    pub restock: RestockTimes,
}
