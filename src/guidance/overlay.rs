//! Overlays and transient marks
//!
//! Every temporary visual (indicator class, highlight, tooltip) is tracked
//! together with its removal timer so it can be torn down at once.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

use super::dom::{BuilderDom, ElementRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(pub u64);

/// Presents anchored tooltips over the builder UI
pub trait OverlayPresenter: Send + Sync {
    fn show_tooltip(&self, anchor: ElementRef, title: &str, body: &str) -> OverlayId;

    fn dismiss(&self, id: OverlayId);

    /// Remove every tooltip and scrim
    fn dismiss_all(&self);
}

struct Mark {
    element: ElementRef,
    class: String,
    timer: JoinHandle<()>,
}

struct Tip {
    overlay: OverlayId,
    timer: JoinHandle<()>,
}

#[derive(Default)]
struct TrackerState {
    next_id: u64,
    marks: HashMap<u64, Mark>,
    tips: HashMap<u64, Tip>,
}

/// Owns the removal timers of all transient visuals
#[derive(Clone)]
pub struct MarkTracker {
    dom: Arc<dyn BuilderDom>,
    overlay: Arc<dyn OverlayPresenter>,
    state: Arc<Mutex<TrackerState>>,
}

impl MarkTracker {
    pub fn new(dom: Arc<dyn BuilderDom>, overlay: Arc<dyn OverlayPresenter>) -> Self {
        Self { dom, overlay, state: Arc::new(Mutex::new(TrackerState::default())) }
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add `class` to `element` and remove it again after `ttl`.
    pub fn mark_class(&self, element: ElementRef, class: &str, ttl: Duration) {
        self.dom.add_class(element, class);

        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;

        let tracker = self.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mark = tracker.lock().marks.remove(&id);
            if let Some(mark) = mark {
                tracker.dom.remove_class(mark.element, &mark.class);
            }
        });
        state.marks.insert(id, Mark { element, class: class.to_string(), timer });
    }

    /// Show a tooltip that dismisses itself after `ttl`.
    pub fn show_tooltip(&self, anchor: ElementRef, title: &str, body: &str, ttl: Duration) -> OverlayId {
        let overlay = self.overlay.show_tooltip(anchor, title, body);

        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;

        let tracker = self.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let tip = tracker.lock().tips.remove(&id);
            if let Some(tip) = tip {
                tracker.overlay.dismiss(tip.overlay);
            }
        });
        state.tips.insert(id, Tip { overlay, timer });
        overlay
    }

    /// Number of visuals still waiting for removal
    pub fn active(&self) -> usize {
        let state = self.lock();
        state.marks.len() + state.tips.len()
    }

    /// Abort all removal timers and remove everything now.
    pub fn clear_all(&self) {
        let (marks, tips) = {
            let mut state = self.lock();
            (std::mem::take(&mut state.marks), std::mem::take(&mut state.tips))
        };
        if !marks.is_empty() || !tips.is_empty() {
            debug!("Clearing {} marks and {} tooltips", marks.len(), tips.len());
        }

        for mark in marks.into_values() {
            mark.timer.abort();
            self.dom.remove_class(mark.element, &mark.class);
        }
        for tip in tips.into_values() {
            tip.timer.abort();
        }
        self.overlay.dismiss_all();
    }
}
