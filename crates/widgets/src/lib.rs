//! Page widgets for the historia site.
//!
//! A [`PageSession`] owns one loaded page: an in-memory [`Document`] with
//! its [`Window`], plus three widgets sharing a [`NavigationRegistry`]:
//!
//! - [`CollapsibleMenu`]: page links with a persisted collapsed flag
//! - [`PrevNextNavigator`]: wrap-around previous/next buttons and arrow keys
//! - [`HeaderResolver`]: per-page title and background image, redrawn on
//!   every menu toggle
//!
//! Widgets only touch the document; navigation, notifications, image
//! lookups and timers are returned as effects the session executes.

pub mod components;
pub mod dom;
pub mod notify;
pub mod registry;
pub mod session;

#[cfg(test)]
mod test_support;

pub use components::{
    CollapsibleMenu, Component, HeaderResolver, ImageSource, MenuMount, PageContext, PhotoSearch, PrevNextNavigator,
    RemoteImageSource, StaticImageSource, image_source_for,
};
pub use dom::{Document, Location, PageShell, Window};
pub use notify::NotificationBus;
pub use registry::NavigationRegistry;
pub use session::PageSession;
