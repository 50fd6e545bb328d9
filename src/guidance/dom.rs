//! Builder UI capability
//!
//! The executor never touches the page directly. Everything it needs from
//! the live builder UI goes through [`BuilderDom`].

/// Opaque handle to an element in the builder UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef(pub u64);

pub trait BuilderDom: Send + Sync {
    /// First element matching a CSS selector
    fn query(&self, selector: &str) -> Option<ElementRef>;

    /// All elements matching a CSS selector, in document order
    fn query_all(&self, selector: &str) -> Vec<ElementRef>;

    /// First descendant of `root` matching a selector
    fn query_within(&self, root: ElementRef, selector: &str) -> Option<ElementRef>;

    /// Nearest ancestor (or the element itself) matching a selector
    fn closest(&self, element: ElementRef, selector: &str) -> Option<ElementRef>;

    fn text(&self, element: ElementRef) -> String;

    fn has_class(&self, element: ElementRef, class: &str) -> bool;

    fn add_class(&self, element: ElementRef, class: &str);

    fn remove_class(&self, element: ElementRef, class: &str);

    /// Activate an element. Returns false when the element is gone.
    fn click(&self, element: ElementRef) -> bool;

    fn scroll_into_view(&self, element: ElementRef);

    fn document_root(&self) -> ElementRef;

    /// Ask the host's own event bus to open the selected component's settings.
    fn trigger_open_settings(&self) -> bool {
        false
    }
}

pub mod selectors {
    pub const SETTINGS_PANEL: &str = ".pb-settings-panel";
    pub const SELECTED_SETTINGS_BUTTON: &str = ".pb-component--selected .pb-settings-button";
    pub const TAB_ITEMS: &str = ".pb-settings-tabs .pb-tab";
    pub const SECTION_HEADERS: &str = ".pb-section .pb-section-header";
    pub const SECTION_HEADER: &str = ".pb-section-header";
    pub const SECTION_CONTAINER: &str = ".pb-section";
    pub const SECTION_CLOSED_CLASS: &str = "pb-section--closed";
    pub const RESPONSIVE_TOGGLE: &str = ".pb-responsive-toggle";
    pub const FIELD_LABELS: &str = ".pb-field-label, .pb-option-label, label";
    pub const FIELD_GROUP: &str = ".pb-field-group, .pb-option, .pb-form-field";

    pub const TAB_INDICATOR_CLASS: &str = "pa-tab-indicator";
    pub const SECTION_HIGHLIGHT_CLASS: &str = "pa-section-highlight";
    pub const FIELD_HIGHLIGHT_CLASS: &str = "pa-field-highlight";

    pub fn section_by_name(section_name: &str) -> String {
        format!("{}[data-section=\"{}\"]", SECTION_CONTAINER, section_name)
    }

    pub fn device_button(breakpoint: &str) -> String {
        format!("[data-device=\"{}\"]", breakpoint)
    }
}
