//! Collapsible navigation menu.
//!
//! The menu renders one link per registry entry plus a toggle control. It
//! tracks a collapsed flag that is:
//! - flipped by the toggle, by Escape (only when expanded), by scrolling past
//!   the threshold on small screens, and by growing the viewport past the
//!   breakpoint (only when collapsed)
//! - persisted under a fixed key as `"true"`/`"false"` and restored on mount
//! - broadcast on every change as a `menuToggle` notification
//!
//! Two attachment modes exist. [`MenuMount::Render`] draws the menu and its
//! toggle inside a host element. [`MenuMount::Existing`] adopts a menu
//! already present in the page and creates the toggle at the start of the
//! body when none is supplied.

mod menu_component;
mod state;

pub use menu_component::{CollapsibleMenu, MenuMount};
pub use state::{CollapsibleMenuState, MenuLink};
