//! Component system for the page widgets.
//!
//! Each widget owns its local state and the element references it was
//! given, reacts to page messages, and reports side effects back to the
//! session as [`Effect`]s instead of performing them.

use historia_types::{Effect, Msg};

use super::PageContext;

/// A page widget with its own state and behavior.
///
/// # Component Lifecycle
///
/// 1. **Mount**: `mount()` runs once after the page loads. It renders into or
///    attaches to the widget's elements and restores any persisted state.
/// 2. **Messages**: every [`Msg`] the page receives is offered to every
///    component through `handle_message()`. Components ignore what they do
///    not care about.
///
/// Missing elements are never fatal: a component logs a warning and keeps
/// whatever behavior does not depend on them.
pub trait Component {
    /// Render or attach, restore state, and return initial effects.
    fn mount(&mut self, _ctx: &mut PageContext) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle one page message.
    fn handle_message(&mut self, ctx: &mut PageContext, msg: &Msg) -> Vec<Effect>;
}
