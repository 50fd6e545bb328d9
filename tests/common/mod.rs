#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use page_assist::dispatch::{ChangesetPreview, UndoHandle};
use page_assist::error::{AiError, SnapshotError};
use page_assist::guidance::dom::selectors;
use page_assist::guidance::{BuilderDom, ElementRef, OverlayId, OverlayPresenter};
use page_assist::schema::JsonSchemaSource;
use page_assist::services::{
    AiService, AnalysisResult, ChatSurface, GeneratedChanges, MessageKind, ProposedChange,
    RollbackTarget, SnapshotService, ValidationResult,
};
use page_assist::SchemaIndex;

pub const FIXTURE_SCHEMAS: &str = include_str!("../../demos/schemas.json");

pub fn fixture_index() -> Arc<SchemaIndex> {
    let schemas = JsonSchemaSource::parse(FIXTURE_SCHEMAS).expect("fixture schemas parse");
    Arc::new(SchemaIndex::from_raw(schemas))
}

pub fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("json object")
}

// ─── Builder UI ──────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct DomState {
    elements: HashMap<String, Vec<ElementRef>>,
    within: HashMap<(ElementRef, String), ElementRef>,
    parents: HashMap<(ElementRef, String), ElementRef>,
    texts: HashMap<ElementRef, String>,
    classes: HashMap<ElementRef, HashSet<String>>,
    /// Selector → number of queries that miss before it appears
    misses: HashMap<String, usize>,
    clicks: Vec<ElementRef>,
    /// Elements whose clicks are swallowed
    dead: HashSet<ElementRef>,
    scrolled: Vec<ElementRef>,
    open_via_bus: bool,
}

#[derive(Default)]
pub struct FakeDom {
    state: Mutex<DomState>,
}

pub const ROOT: ElementRef = ElementRef(0);
pub const SETTINGS_BUTTON: ElementRef = ElementRef(1);
pub const PANEL: ElementRef = ElementRef(2);
pub const TABS: [ElementRef; 3] = [ElementRef(10), ElementRef(11), ElementRef(12)];
pub const TEXT_SECTION: ElementRef = ElementRef(20);
pub const TEXT_SECTION_HEADER: ElementRef = ElementRef(21);
pub const ALIGNMENT_INPUT: ElementRef = ElementRef(30);
pub const ALIGNMENT_GROUP: ElementRef = ElementRef(31);
pub const ALIGNMENT_TOGGLE: ElementRef = ElementRef(32);
pub const PHONE_BUTTON: ElementRef = ElementRef(33);

impl FakeDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings UI of a selected text component, text section collapsed
    pub fn text_settings() -> Self {
        let dom = Self::new();
        dom.add(selectors::SELECTED_SETTINGS_BUTTON, SETTINGS_BUTTON);
        dom.add(selectors::SETTINGS_PANEL, PANEL);
        for tab in TABS {
            dom.add(selectors::TAB_ITEMS, tab);
        }
        dom.add(&selectors::section_by_name("text"), TEXT_SECTION);
        dom.add_class(TEXT_SECTION, selectors::SECTION_CLOSED_CLASS);
        dom.nest(TEXT_SECTION, selectors::SECTION_HEADER, TEXT_SECTION_HEADER);
        dom.add("[data-field-name=\"text_orientation\"]", ALIGNMENT_INPUT);
        dom.parent(ALIGNMENT_INPUT, selectors::FIELD_GROUP, ALIGNMENT_GROUP);
        dom.nest(ALIGNMENT_GROUP, selectors::RESPONSIVE_TOGGLE, ALIGNMENT_TOGGLE);
        dom.add(&selectors::device_button("phone"), PHONE_BUTTON);
        dom
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DomState> {
        self.state.lock().unwrap()
    }

    pub fn add(&self, selector: &str, element: ElementRef) {
        self.lock().elements.entry(selector.to_string()).or_default().push(element);
    }

    pub fn remove(&self, selector: &str) {
        self.lock().elements.remove(selector);
    }

    pub fn nest(&self, root: ElementRef, selector: &str, element: ElementRef) {
        self.lock().within.insert((root, selector.to_string()), element);
    }

    pub fn parent(&self, element: ElementRef, selector: &str, ancestor: ElementRef) {
        self.lock().parents.insert((element, selector.to_string()), ancestor);
    }

    pub fn set_text(&self, element: ElementRef, text: &str) {
        self.lock().texts.insert(element, text.to_string());
    }

    pub fn appear_after(&self, selector: &str, misses: usize) {
        self.lock().misses.insert(selector.to_string(), misses);
    }

    /// Clicks on `element` are recorded but report failure
    pub fn disable_clicks(&self, element: ElementRef) {
        self.lock().dead.insert(element);
    }

    pub fn open_via_bus(&self) {
        self.lock().open_via_bus = true;
    }

    pub fn classes(&self, element: ElementRef) -> HashSet<String> {
        self.lock().classes.get(&element).cloned().unwrap_or_default()
    }

    pub fn clicks(&self) -> Vec<ElementRef> {
        self.lock().clicks.clone()
    }

    pub fn scrolled(&self) -> Vec<ElementRef> {
        self.lock().scrolled.clone()
    }
}

impl BuilderDom for FakeDom {
    fn query(&self, selector: &str) -> Option<ElementRef> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<ElementRef> {
        let mut state = self.lock();
        if let Some(misses) = state.misses.get_mut(selector) {
            if *misses > 0 {
                *misses -= 1;
                return Vec::new();
            }
        }
        state.elements.get(selector).cloned().unwrap_or_default()
    }

    fn query_within(&self, root: ElementRef, selector: &str) -> Option<ElementRef> {
        self.lock().within.get(&(root, selector.to_string())).copied()
    }

    fn closest(&self, element: ElementRef, selector: &str) -> Option<ElementRef> {
        self.lock().parents.get(&(element, selector.to_string())).copied()
    }

    fn text(&self, element: ElementRef) -> String {
        self.lock().texts.get(&element).cloned().unwrap_or_default()
    }

    fn has_class(&self, element: ElementRef, class: &str) -> bool {
        self.lock().classes.get(&element).is_some_and(|c| c.contains(class))
    }

    fn add_class(&self, element: ElementRef, class: &str) {
        self.lock().classes.entry(element).or_default().insert(class.to_string());
    }

    fn remove_class(&self, element: ElementRef, class: &str) {
        if let Some(classes) = self.lock().classes.get_mut(&element) {
            classes.remove(class);
        }
    }

    fn click(&self, element: ElementRef) -> bool {
        let mut state = self.lock();
        state.clicks.push(element);
        !state.dead.contains(&element)
    }

    fn scroll_into_view(&self, element: ElementRef) {
        self.lock().scrolled.push(element);
    }

    fn document_root(&self) -> ElementRef {
        ROOT
    }

    fn trigger_open_settings(&self) -> bool {
        self.lock().open_via_bus
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShownTooltip {
    pub id: OverlayId,
    pub anchor: ElementRef,
    pub title: String,
    pub body: String,
}

#[derive(Default)]
pub struct FakeOverlay {
    next: Mutex<u64>,
    visible: Mutex<Vec<ShownTooltip>>,
    shown: Mutex<Vec<ShownTooltip>>,
}

impl FakeOverlay {
    pub fn visible(&self) -> Vec<ShownTooltip> {
        self.visible.lock().unwrap().clone()
    }

    /// Every tooltip ever shown
    pub fn shown(&self) -> Vec<ShownTooltip> {
        self.shown.lock().unwrap().clone()
    }
}

impl OverlayPresenter for FakeOverlay {
    fn show_tooltip(&self, anchor: ElementRef, title: &str, body: &str) -> OverlayId {
        let mut next = self.next.lock().unwrap();
        *next += 1;
        let tip = ShownTooltip {
            id: OverlayId(*next),
            anchor,
            title: title.to_string(),
            body: body.to_string(),
        };
        self.visible.lock().unwrap().push(tip.clone());
        self.shown.lock().unwrap().push(tip.clone());
        tip.id
    }

    fn dismiss(&self, id: OverlayId) {
        self.visible.lock().unwrap().retain(|t| t.id != id);
    }

    fn dismiss_all(&self) {
        self.visible.lock().unwrap().clear();
    }
}

// ─── Chat ────────────────────────────────────────────────────────────────────

pub struct RecordingChat {
    pub messages: Mutex<Vec<(String, MessageKind)>>,
    pub typing: Mutex<Vec<bool>>,
    pub undo: Mutex<Option<UndoHandle>>,
    pub previews: Mutex<Vec<ChangesetPreview>>,
    accept: bool,
}

impl RecordingChat {
    pub fn accepting() -> Self {
        Self::new(true)
    }

    pub fn declining() -> Self {
        Self::new(false)
    }

    fn new(accept: bool) -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            typing: Mutex::new(Vec::new()),
            undo: Mutex::new(None),
            previews: Mutex::new(Vec::new()),
            accept,
        }
    }

    pub fn messages(&self) -> Vec<(String, MessageKind)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn last_message(&self) -> (String, MessageKind) {
        self.messages().last().cloned().expect("a chat message")
    }

    pub fn undo_handle(&self) -> Option<UndoHandle> {
        self.undo.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatSurface for RecordingChat {
    fn add_message(&self, text: &str, kind: MessageKind) {
        self.messages.lock().unwrap().push((text.to_string(), kind));
    }

    fn show_typing(&self) {
        self.typing.lock().unwrap().push(true);
    }

    fn remove_typing(&self) {
        self.typing.lock().unwrap().push(false);
    }

    fn append_undo_button(&self, undo: UndoHandle) {
        *self.undo.lock().unwrap() = Some(undo);
    }

    async fn confirm_changeset(&self, preview: &ChangesetPreview) -> bool {
        self.previews.lock().unwrap().push(preview.clone());
        self.accept
    }
}

// ─── AI ──────────────────────────────────────────────────────────────────────

pub struct ScriptedAi {
    analyze: Result<AnalysisResult, AiError>,
    generate: Result<GeneratedChanges, AiError>,
    validate: Result<ValidationResult, AiError>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl ScriptedAi {
    /// Proposes the given changes and validates them
    pub fn proposing(changes: Vec<(&str, Value)>) -> Self {
        Self {
            analyze: Ok(AnalysisResult(serde_json::json!({"intent": "rewrite"}))),
            generate: Ok(GeneratedChanges {
                changes: changes
                    .into_iter()
                    .map(|(field, new_value)| ProposedChange { field: field.to_string(), new_value, label: None })
                    .collect(),
                summary: Some("Rewrote the copy".to_string()),
            }),
            validate: Ok(ValidationResult { valid: true, errors: Vec::new() }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_analyze(code: &str) -> Self {
        let mut ai = Self::proposing(vec![]);
        ai.analyze = Err(AiError::from_code(code, "rejected"));
        ai
    }

    pub fn failing_generate(detail: &str) -> Self {
        let mut ai = Self::proposing(vec![]);
        ai.generate = Err(AiError::Failed(detail.to_string()));
        ai
    }

    pub fn with_validation(mut self, validate: Result<ValidationResult, AiError>) -> Self {
        self.validate = validate;
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiService for ScriptedAi {
    async fn analyze(&self, _: &str, _: &str, _: &Map<String, Value>) -> Result<AnalysisResult, AiError> {
        self.calls.lock().unwrap().push("analyze");
        self.analyze.clone()
    }

    async fn generate(
        &self,
        _: &AnalysisResult,
        _: &str,
        _: &Map<String, Value>,
    ) -> Result<GeneratedChanges, AiError> {
        self.calls.lock().unwrap().push("generate");
        self.generate.clone()
    }

    async fn validate_changeset(&self, _: &str, _: &[ProposedChange]) -> Result<ValidationResult, AiError> {
        self.calls.lock().unwrap().push("validate");
        self.validate.clone()
    }
}

// ─── Snapshots ───────────────────────────────────────────────────────────────

/// Snapshot store that is always unavailable
pub struct BrokenSnapshots;

#[async_trait]
impl SnapshotService for BrokenSnapshots {
    async fn save_snapshot(&self, _: &str, _: &str, _: &Map<String, Value>, _: &str) -> Result<String, SnapshotError> {
        Err(SnapshotError::Storage("disk full".to_string()))
    }

    async fn rollback(&self, target: &RollbackTarget) -> Result<Map<String, Value>, SnapshotError> {
        Err(SnapshotError::NotFound(format!("{:?}", target)))
    }
}
