//! Host page-builder capability
//!
//! Read the selection, write field values, hear about selection changes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Field name → new value
pub type FieldChanges = Map<String, Value>;

pub type SelectionHandler = Box<dyn Fn(Option<&SelectedComponent>) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedComponent {
    pub id: String,
    pub component_type: String,
    /// Current field values
    pub data: Map<String, Value>,
}

pub trait HostCapability: Send + Sync {
    fn selected_component(&self) -> Option<SelectedComponent>;

    /// Write field values. False when the component is no longer selected or valid.
    fn apply_field_changes(&self, component_id: &str, changes: &FieldChanges) -> bool;

    fn on_selection_changed(&self, handler: SelectionHandler);
}

#[derive(Default)]
struct HostState {
    components: HashMap<String, SelectedComponent>,
    selected: Option<String>,
}

/// Host backed by an in-process component store
#[derive(Clone, Default)]
pub struct InMemoryHost {
    state: Arc<Mutex<HostState>>,
    handlers: Arc<Mutex<Vec<SelectionHandler>>>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn insert_component(
        &self,
        id: impl Into<String>,
        component_type: impl Into<String>,
        data: Map<String, Value>,
    ) {
        let id = id.into();
        let component = SelectedComponent { id: id.clone(), component_type: component_type.into(), data };
        self.state().components.insert(id, component);
    }

    /// Change the selection and notify handlers. Unknown ids clear it.
    pub fn select(&self, id: Option<&str>) {
        let selected = {
            let mut state = self.state();
            let component = id.and_then(|id| state.components.get(id).cloned());
            state.selected = component.as_ref().map(|c| c.id.clone());
            component
        };
        debug!("Selection changed to {:?}", selected.as_ref().map(|c| &c.id));

        let handlers = self.handlers.lock().unwrap_or_else(|p| p.into_inner());
        for handler in handlers.iter() {
            handler(selected.as_ref());
        }
    }

    pub fn component(&self, id: &str) -> Option<SelectedComponent> {
        self.state().components.get(id).cloned()
    }
}

impl HostCapability for InMemoryHost {
    fn selected_component(&self) -> Option<SelectedComponent> {
        let state = self.state();
        state.selected.as_ref().and_then(|id| state.components.get(id).cloned())
    }

    fn apply_field_changes(&self, component_id: &str, changes: &FieldChanges) -> bool {
        let mut state = self.state();
        if state.selected.as_deref() != Some(component_id) {
            return false;
        }
        let Some(component) = state.components.get_mut(component_id) else {
            return false;
        };
        for (field, value) in changes {
            component.data.insert(field.clone(), value.clone());
        }
        true
    }

    fn on_selection_changed(&self, handler: SelectionHandler) {
        self.handlers.lock().unwrap_or_else(|p| p.into_inner()).push(handler);
    }
}
