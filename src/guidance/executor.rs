//! Guidance Executor
//!
//! Runs a guidance sequence step by step against the builder UI. One run is
//! active at a time: starting a new run preempts the previous one, which
//! stops at its next step boundary.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::dom::{selectors, BuilderDom, ElementRef};
use super::locator::FieldLocator;
use super::overlay::{MarkTracker, OverlayPresenter};
use super::retry::{poll_until, RetryPolicy};
use super::step::{GuidanceStep, Tooltip};
use crate::error::AssistError;
use crate::events::{AssistEvent, EventBus};
use crate::intent::Breakpoint;

/// Delays and lifetimes used while guiding, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceTimings {
    pub step_delay_ms: u64,
    pub tab_indicator_ms: u64,
    pub section_highlight_ms: u64,
    pub field_highlight_ms: u64,
    pub tooltip_ms: u64,
    /// Polling used while waiting for panels and tabs to render
    pub ui_ready: RetryPolicy,
}

impl Default for GuidanceTimings {
    fn default() -> Self {
        Self {
            step_delay_ms: 400,
            tab_indicator_ms: 3000,
            section_highlight_ms: 4000,
            field_highlight_ms: 6000,
            tooltip_ms: 8000,
            ui_ready: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub step: String,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Outcomes of the steps that ran, in order
    pub outcomes: Vec<StepOutcome>,
    /// False when the run was preempted before finishing
    pub completed: bool,
}

impl ExecutionReport {
    pub fn success(&self) -> bool {
        self.completed && self.outcomes.iter().all(|o| o.success)
    }
}

pub struct GuidanceExecutor {
    dom: Arc<dyn BuilderDom>,
    marks: MarkTracker,
    locator: FieldLocator,
    timings: GuidanceTimings,
    executing: AtomicBool,
    generation: AtomicU64,
    last_field: Mutex<Option<ElementRef>>,
    events: Option<EventBus>,
}

impl GuidanceExecutor {
    pub fn new(dom: Arc<dyn BuilderDom>, overlay: Arc<dyn OverlayPresenter>) -> Self {
        Self {
            marks: MarkTracker::new(dom.clone(), overlay),
            dom,
            locator: FieldLocator::default(),
            timings: GuidanceTimings::default(),
            executing: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            last_field: Mutex::new(None),
            events: None,
        }
    }

    pub fn with_locator(mut self, locator: FieldLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn with_timings(mut self, timings: GuidanceTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn is_executing(&self) -> bool {
        self.executing.load(Ordering::SeqCst)
    }

    /// Transient visuals still on screen
    pub fn active_marks(&self) -> usize {
        self.marks.active()
    }

    fn is_current(&self, generation: u64) -> bool {
        self.is_executing() && self.generation.load(Ordering::SeqCst) == generation
    }

    fn publish(&self, event: AssistEvent) {
        if let Some(events) = &self.events {
            events.publish(event);
        }
    }

    /// Run the steps. True iff the run finished un-preempted and every step succeeded.
    pub async fn execute_plan(&self, steps: &[GuidanceStep]) -> bool {
        self.execute_plan_report(steps).await.success()
    }

    pub async fn execute_plan_report(&self, steps: &[GuidanceStep]) -> ExecutionReport {
        self.cleanup();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.executing.store(true, Ordering::SeqCst);
        info!("Starting guidance run {} ({} steps)", generation, steps.len());

        let mut outcomes = Vec::with_capacity(steps.len());
        for (i, step) in steps.iter().enumerate() {
            if !self.is_current(generation) {
                debug!("Guidance run {} preempted before {}", generation, step.kind());
                break;
            }

            let success = self.execute_step(step, generation).await;
            debug!("Step {} finished: {}", step.kind(), success);
            self.publish(AssistEvent::StepFinished { step: step.kind().to_string(), success });
            outcomes.push(StepOutcome { step: step.kind().to_string(), success });

            if i + 1 < steps.len() {
                tokio::time::sleep(Duration::from_millis(self.timings.step_delay_ms)).await;
            }
        }

        let completed = self.is_current(generation) && outcomes.len() == steps.len();
        if self.is_current(generation) {
            self.executing.store(false, Ordering::SeqCst);
        }
        self.publish(AssistEvent::GuidanceFinished { completed });

        ExecutionReport { outcomes, completed }
    }

    /// Stop the active run and remove every transient visual now. Safe when idle.
    pub fn cleanup(&self) {
        self.executing.store(false, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.marks.clear_all();
        *self.last_field.lock().unwrap_or_else(|p| p.into_inner()) = None;
    }

    async fn execute_step(&self, step: &GuidanceStep, generation: u64) -> bool {
        match step {
            GuidanceStep::OpenSettings => self.open_settings(generation).await,
            GuidanceStep::SwitchTab { tab_index, .. } => self.switch_tab(*tab_index, generation).await,
            GuidanceStep::ExpandSection { section_name, section_label } => {
                self.expand_section(section_name, section_label)
            }
            GuidanceStep::HighlightField { field_name, tooltip } => {
                self.highlight_field(field_name, tooltip.as_ref())
            }
            GuidanceStep::ShowResponsive { breakpoint } => self.show_responsive(*breakpoint),
            GuidanceStep::ShowTooltip { target, title, body } => {
                self.show_tooltip(target.as_deref(), title, body)
            }
        }
    }

    async fn open_settings(&self, generation: u64) -> bool {
        let triggered = self.dom.trigger_open_settings()
            || self
                .dom
                .query(selectors::SELECTED_SETTINGS_BUTTON)
                .is_some_and(|button| self.dom.click(button));
        if !triggered {
            warn!("Could not open the settings panel");
            return false;
        }

        let dom = self.dom.clone();
        let panel = poll_until(self.timings.ui_ready, || dom.query(selectors::SETTINGS_PANEL)).await;
        panel.is_some() && self.is_current(generation)
    }

    async fn switch_tab(&self, tab_index: usize, generation: u64) -> bool {
        let dom = self.dom.clone();
        let tabs = poll_until(self.timings.ui_ready, || {
            let tabs = dom.query_all(selectors::TAB_ITEMS);
            (!tabs.is_empty()).then_some(tabs)
        })
        .await;
        if !self.is_current(generation) {
            return false;
        }

        let Some(tab) = tabs.and_then(|tabs| tabs.get(tab_index).copied()) else {
            warn!("Tab {} not available", tab_index);
            return false;
        };
        if !self.dom.click(tab) {
            warn!("Tab {} did not respond to the click", tab_index);
            return false;
        }
        self.marks.mark_class(
            tab,
            selectors::TAB_INDICATOR_CLASS,
            Duration::from_millis(self.timings.tab_indicator_ms),
        );
        true
    }

    fn expand_section(&self, section_name: &str, section_label: &str) -> bool {
        let wanted = section_label.trim().to_lowercase();
        let section = self.dom.query(&selectors::section_by_name(section_name)).or_else(|| {
            self.dom
                .query_all(selectors::SECTION_HEADERS)
                .into_iter()
                .find(|header| self.dom.text(*header).trim().to_lowercase() == wanted)
                .and_then(|header| self.dom.closest(header, selectors::SECTION_CONTAINER))
        });

        let Some(section) = section else {
            warn!("Section {} not found", section_name);
            return false;
        };

        if self.dom.has_class(section, selectors::SECTION_CLOSED_CLASS) {
            let opened = self
                .dom
                .query_within(section, selectors::SECTION_HEADER)
                .is_some_and(|header| self.dom.click(header));
            if !opened {
                warn!("Section {} is collapsed and could not be opened", section_name);
                return false;
            }
        }
        self.marks.mark_class(
            section,
            selectors::SECTION_HIGHLIGHT_CLASS,
            Duration::from_millis(self.timings.section_highlight_ms),
        );
        true
    }

    fn highlight_field(&self, field_name: &str, tooltip: Option<&Tooltip>) -> bool {
        let Some(located) = self.locator.locate(self.dom.as_ref(), field_name) else {
            warn!("{}", AssistError::LocatorMiss(field_name.to_string()));
            return false;
        };

        let element = located.element;
        self.marks.mark_class(
            element,
            selectors::FIELD_HIGHLIGHT_CLASS,
            Duration::from_millis(self.timings.field_highlight_ms),
        );
        self.dom.scroll_into_view(element);
        if let Some(tooltip) = tooltip {
            self.marks.show_tooltip(
                element,
                &tooltip.title,
                &tooltip.body,
                Duration::from_millis(self.timings.tooltip_ms),
            );
        }
        *self.last_field.lock().unwrap_or_else(|p| p.into_inner()) = Some(element);
        true
    }

    fn show_responsive(&self, breakpoint: Breakpoint) -> bool {
        let last_field = *self.last_field.lock().unwrap_or_else(|p| p.into_inner());
        let toggle = last_field
            .and_then(|field| self.dom.query_within(field, selectors::RESPONSIVE_TOGGLE))
            .or_else(|| self.dom.query(selectors::RESPONSIVE_TOGGLE));

        let Some(toggle) = toggle else {
            debug!("No responsive toggle for {}", breakpoint.as_str());
            return false;
        };
        if !self.dom.click(toggle) {
            return false;
        }
        if let Some(device) = self.dom.query(&selectors::device_button(breakpoint.as_str())) {
            self.dom.click(device);
        }
        true
    }

    fn show_tooltip(&self, target: Option<&str>, title: &str, body: &str) -> bool {
        let anchor = target
            .and_then(|selector| self.dom.query(selector))
            .or_else(|| self.dom.query(selectors::SETTINGS_PANEL))
            .unwrap_or_else(|| self.dom.document_root());
        self.marks
            .show_tooltip(anchor, title, body, Duration::from_millis(self.timings.tooltip_ms));
        true
    }
}
