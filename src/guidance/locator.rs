//! Field Locator
//!
//! Ordered chain of strategies for finding a field's control in the
//! settings panel. First hit wins; every hit is widened to the enclosing
//! field group so the whole row gets highlighted.

use std::sync::Arc;
use tracing::debug;

use super::dom::{selectors, BuilderDom, ElementRef};

pub trait LocatorStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn try_locate(&self, dom: &dyn BuilderDom, field_name: &str) -> Option<ElementRef>;
}

fn field_group(dom: &dyn BuilderDom, element: ElementRef) -> ElementRef {
    dom.closest(element, selectors::FIELD_GROUP).unwrap_or(element)
}

/// `field_name` → lowercase words
pub fn humanize(field_name: &str) -> String {
    field_name
        .split(|c: char| c == '_' || c == '-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// `[data-field-name="..."]`
pub struct DataFieldAttribute;

impl LocatorStrategy for DataFieldAttribute {
    fn name(&self) -> &'static str {
        "data-field-name"
    }

    fn try_locate(&self, dom: &dyn BuilderDom, field_name: &str) -> Option<ElementRef> {
        let el = dom.query(&format!("[data-field-name=\"{}\"]", field_name))?;
        Some(field_group(dom, el))
    }
}

/// Legacy `[data-option-id="..."]`
pub struct LegacyOptionAttribute;

impl LocatorStrategy for LegacyOptionAttribute {
    fn name(&self) -> &'static str {
        "data-option-id"
    }

    fn try_locate(&self, dom: &dyn BuilderDom, field_name: &str) -> Option<ElementRef> {
        let el = dom.query(&format!("[data-option-id=\"{}\"]", field_name))?;
        Some(field_group(dom, el))
    }
}

/// `[name="..."]` inside the settings panel, or a `pb-field--<name>` class
pub struct NameOrClass;

impl LocatorStrategy for NameOrClass {
    fn name(&self) -> &'static str {
        "name-or-class"
    }

    fn try_locate(&self, dom: &dyn BuilderDom, field_name: &str) -> Option<ElementRef> {
        let by_name = dom
            .query(selectors::SETTINGS_PANEL)
            .and_then(|panel| dom.query_within(panel, &format!("[name=\"{}\"]", field_name)));
        let el = by_name.or_else(|| dom.query(&format!(".pb-field--{}", field_name)))?;
        Some(field_group(dom, el))
    }
}

/// Case-insensitive label text search on the humanized field name
pub struct LabelText;

impl LocatorStrategy for LabelText {
    fn name(&self) -> &'static str {
        "label-text"
    }

    fn try_locate(&self, dom: &dyn BuilderDom, field_name: &str) -> Option<ElementRef> {
        let needle = humanize(field_name);
        if needle.is_empty() {
            return None;
        }
        dom.query_all(selectors::FIELD_LABELS)
            .into_iter()
            .find(|label| dom.text(*label).to_lowercase().contains(&needle))
            .map(|label| field_group(dom, label))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedField {
    pub element: ElementRef,
    pub strategy: &'static str,
}

#[derive(Clone)]
pub struct FieldLocator {
    strategies: Vec<Arc<dyn LocatorStrategy>>,
}

impl FieldLocator {
    pub fn new(strategies: Vec<Arc<dyn LocatorStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn LocatorStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn locate(&self, dom: &dyn BuilderDom, field_name: &str) -> Option<LocatedField> {
        for strategy in &self.strategies {
            if let Some(element) = strategy.try_locate(dom, field_name) {
                debug!("Located {} via {}", field_name, strategy.name());
                return Some(LocatedField { element, strategy: strategy.name() });
            }
        }
        None
    }
}

impl Default for FieldLocator {
    fn default() -> Self {
        Self::new(vec![
            Arc::new(DataFieldAttribute),
            Arc::new(LegacyOptionAttribute),
            Arc::new(NameOrClass),
            Arc::new(LabelText),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("text_font_size"), "text font size");
        assert_eq!(humanize("Max-Width"), "max width");
        assert_eq!(humanize("__"), "");
    }

    #[test]
    fn test_empty_chain_finds_nothing() {
        struct NoDom;
        impl BuilderDom for NoDom {
            fn query(&self, _: &str) -> Option<ElementRef> {
                Some(ElementRef(1))
            }
            fn query_all(&self, _: &str) -> Vec<ElementRef> {
                vec![]
            }
            fn query_within(&self, _: ElementRef, _: &str) -> Option<ElementRef> {
                None
            }
            fn closest(&self, _: ElementRef, _: &str) -> Option<ElementRef> {
                None
            }
            fn text(&self, _: ElementRef) -> String {
                String::new()
            }
            fn has_class(&self, _: ElementRef, _: &str) -> bool {
                false
            }
            fn add_class(&self, _: ElementRef, _: &str) {}
            fn remove_class(&self, _: ElementRef, _: &str) {}
            fn click(&self, _: ElementRef) -> bool {
                true
            }
            fn scroll_into_view(&self, _: ElementRef) {}
            fn document_root(&self) -> ElementRef {
                ElementRef(0)
            }
        }

        assert!(FieldLocator::new(vec![]).locate(&NoDom, "x").is_none());

        let located = FieldLocator::default().locate(&NoDom, "x").unwrap();
        assert_eq!(located.strategy, "data-field-name");
        // no enclosing group: the element itself is returned
        assert_eq!(located.element, ElementRef(1));
    }
}
