//! Raw schema definitions as delivered by the schema source.
//!
//! Shape: component → tabs → sections → fields. Maps keep their source order,
//! which later decides component resolution and score tie-breaking.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSchema {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default, deserialize_with = "lenient_map")]
    pub tabs: IndexMap<String, RawTab>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTab {
    #[serde(default, deserialize_with = "lenient_map")]
    pub sections: IndexMap<String, RawSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSection {
    #[serde(default)]
    pub label: Option<String>,
    /// A section without a field map contributes nothing to the index
    #[serde(default, deserialize_with = "lenient_optional_map")]
    pub fields: Option<IndexMap<String, RawField>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawField {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
    /// Option key → display value. Non-string display values are stringified.
    #[serde(default)]
    pub options: Option<IndexMap<String, Value>>,
    #[serde(default)]
    pub responsive: Option<bool>,
    #[serde(default)]
    pub default: Option<Value>,
}

/// Keep the entries that fit `T`; a malformed entry drops only itself.
fn retain_valid<T: DeserializeOwned>(raw: IndexMap<String, Value>) -> IndexMap<String, T> {
    raw.into_iter()
        .filter_map(|(key, value)| match serde_json::from_value(value) {
            Ok(parsed) => Some((key, parsed)),
            Err(e) => {
                warn!("Skipping malformed schema entry {}: {}", key, e);
                None
            }
        })
        .collect()
}

fn lenient_map<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    IndexMap::<String, Value>::deserialize(deserializer).map(retain_valid)
}

fn lenient_optional_map<'de, D, T>(deserializer: D) -> Result<Option<IndexMap<String, T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Option::<IndexMap<String, Value>>::deserialize(deserializer).map(|raw| raw.map(retain_valid))
}
