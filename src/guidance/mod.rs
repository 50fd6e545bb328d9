//! Guidance
//!
//! Plans and runs step-by-step navigation to a setting in the builder's
//! settings panel: open panel, switch tab, expand section, highlight field,
//! optionally switch to a responsive breakpoint.

pub mod dom;
mod executor;
mod locator;
mod overlay;
mod plan;
mod retry;
mod step;

pub use dom::{BuilderDom, ElementRef};
pub use executor::{ExecutionReport, GuidanceExecutor, GuidanceTimings, StepOutcome};
pub use locator::{
    humanize, DataFieldAttribute, FieldLocator, LabelText, LegacyOptionAttribute, LocatedField,
    LocatorStrategy, NameOrClass,
};
pub use overlay::{MarkTracker, OverlayId, OverlayPresenter};
pub use plan::{build_plan, no_match_message, tab_index, SELECT_COMPONENT_MESSAGE};
pub use retry::{poll_until, RetryPolicy};
pub use step::{GuidancePlan, GuidanceStep, Tooltip};
