//! Shared type definitions for the historia site widgets.

pub mod config;
pub mod messaging;
pub mod page;

pub use config::{
    HeaderConfig, ImageSourceKind, MenuOptions, NavigatorOptions, PLACEHOLDER_ACCESS_KEYS, RemoteSearchConfig, SiteConfig,
};
pub use messaging::{Attribution, Effect, ElementId, ImageResolution, Key, MENU_TOGGLE_EVENT, MenuState, MenuToggleEvent, Msg};
pub use page::{DEFAULT_PAGE_ID, PageEntry, default_pages};
