//! Schema Index
//!
//! Flattens raw nested schemas into one ordered field list per component
//! type. Built once, queried many times; rebuilding replaces everything.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use super::raw::{RawField, RawSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Text,
    RichText,
    Code,
    Toggle,
    Select,
    Color,
    Upload,
    Other,
}

impl FieldType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "text" => FieldType::Text,
            "richtext" => FieldType::RichText,
            "code" => FieldType::Code,
            "toggle" => FieldType::Toggle,
            "select" => FieldType::Select,
            "color" => FieldType::Color,
            "upload" => FieldType::Upload,
            _ => FieldType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::RichText => "richtext",
            FieldType::Code => "code",
            FieldType::Toggle => "toggle",
            FieldType::Select => "select",
            FieldType::Color => "color",
            FieldType::Upload => "upload",
            FieldType::Other => "other",
        }
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(FieldType::parse(&raw))
    }
}

/// Settings-panel tab a field lives on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tab {
    General,
    Design,
    Advanced,
    Other(String),
}

impl Tab {
    pub fn parse(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        match lowered.as_str() {
            "general" | "content" => Tab::General,
            "design" => Tab::Design,
            "advanced" => Tab::Advanced,
            _ => Tab::Other(lowered),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Tab::General => "general",
            Tab::Design => "design",
            Tab::Advanced => "advanced",
            Tab::Other(name) => name.as_str(),
        }
    }

    /// Capitalized name as shown in the tab bar
    pub fn display_name(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl Serialize for Tab {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Tab {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Tab::parse(&raw))
    }
}

/// One editable field of one component type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub field_name: String,
    pub label: String,
    pub field_type: FieldType,
    pub tab: Tab,
    pub section_name: String,
    pub section_label: String,
    /// Option key → display value, in schema order
    pub options: Option<IndexMap<String, String>>,
    pub responsive: bool,
    pub default: Option<Value>,
}

impl FieldDescriptor {
    /// Display value for an option key, matched case-insensitively.
    pub fn option_display(&self, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.options.as_ref().and_then(|options| {
            options
                .iter()
                .find(|(k, _)| k.to_lowercase() == key)
                .map(|(_, v)| v.as_str())
        })
    }

    /// Option key whose key or display value equals `value` (case-insensitive).
    pub fn option_key_for(&self, value: &str) -> Option<&str> {
        let value = value.to_lowercase();
        self.options.as_ref().and_then(|options| {
            options
                .iter()
                .find(|(k, _)| k.to_lowercase() == value)
                .or_else(|| options.iter().find(|(_, v)| v.to_lowercase() == value))
                .map(|(k, _)| k.as_str())
        })
    }

    pub fn has_options(&self) -> bool {
        self.options.as_ref().is_some_and(|o| !o.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSchemaEntry {
    pub component_type: String,
    pub label: String,
    pub aliases: Vec<String>,
    pub fields: Vec<FieldDescriptor>,
}

impl ComponentSchemaEntry {
    pub fn field(&self, field_name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.field_name == field_name)
    }
}

/// In-memory index of every component type's editable fields
#[derive(Debug, Clone, Default)]
pub struct SchemaIndex {
    entries: Vec<ComponentSchemaEntry>,
    by_type: HashMap<String, usize>,
}

impl SchemaIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_raw<I>(raw: I) -> Self
    where
        I: IntoIterator<Item = (String, RawSchema)>,
    {
        let mut index = Self::new();
        index.build(raw);
        index
    }

    /// Flatten raw schemas into the index, replacing any previous contents.
    pub fn build<I>(&mut self, raw: I)
    where
        I: IntoIterator<Item = (String, RawSchema)>,
    {
        self.entries.clear();
        self.by_type.clear();

        for (component_type, schema) in raw {
            if self.by_type.contains_key(&component_type) {
                debug!("Skipping duplicate schema for {}", component_type);
                continue;
            }
            let entry = flatten(&component_type, &schema);
            self.by_type.insert(component_type, self.entries.len());
            self.entries.push(entry);
        }

        info!(
            "Schema index built: {} component types, {} fields",
            self.entries.len(),
            self.entries.iter().map(|e| e.fields.len()).sum::<usize>()
        );
    }

    pub fn get(&self, component_type: &str) -> Option<&ComponentSchemaEntry> {
        self.by_type.get(component_type).map(|&idx| &self.entries[idx])
    }

    /// Flat field list for a component type (empty when unknown)
    pub fn fields(&self, component_type: &str) -> &[FieldDescriptor] {
        self.get(component_type).map(|e| e.fields.as_slice()).unwrap_or(&[])
    }

    /// Entries in build order
    pub fn entries(&self) -> &[ComponentSchemaEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten(component_type: &str, schema: &RawSchema) -> ComponentSchemaEntry {
    let mut fields = Vec::new();
    let mut seen = HashSet::new();

    for (tab_name, raw_tab) in &schema.tabs {
        let tab = Tab::parse(tab_name);
        for (section_name, section) in &raw_tab.sections {
            let Some(raw_fields) = &section.fields else {
                continue;
            };
            let section_label = section
                .label
                .clone()
                .unwrap_or_else(|| section_name.to_string());

            for (field_name, raw) in raw_fields {
                if !seen.insert(field_name.clone()) {
                    debug!("Duplicate field {} in {}", field_name, component_type);
                    continue;
                }
                fields.push(descriptor(field_name, raw, &tab, section_name, &section_label));
            }
        }
    }

    ComponentSchemaEntry {
        component_type: component_type.to_string(),
        label: if schema.label.is_empty() {
            component_type.to_string()
        } else {
            schema.label.clone()
        },
        aliases: schema.aliases.clone(),
        fields,
    }
}

fn descriptor(
    field_name: &str,
    raw: &RawField,
    tab: &Tab,
    section_name: &str,
    section_label: &str,
) -> FieldDescriptor {
    let options = raw.options.as_ref().map(|options| {
        options
            .iter()
            .filter_map(|(key, value)| option_text(value).map(|text| (key.clone(), text)))
            .collect::<IndexMap<String, String>>()
    });

    FieldDescriptor {
        field_name: field_name.to_string(),
        label: raw.label.clone().unwrap_or_else(|| field_name.replace('_', " ")),
        field_type: raw
            .field_type
            .as_deref()
            .map(FieldType::parse)
            .unwrap_or(FieldType::Text),
        tab: tab.clone(),
        section_name: section_name.to_string(),
        section_label: section_label.to_string(),
        options,
        responsive: raw.responsive.unwrap_or(false),
        default: raw.default.clone(),
    }
}

fn option_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
