//! Messages fed into the page event loop and effects returned by widgets.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Handle to an element of a page document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub usize);

/// Keys the widgets react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other(String),
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Collapsed/expanded flag of the navigation menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuState {
    pub collapsed: bool,
}

impl MenuState {
    /// Persisted representation: the literal `"true"` or `"false"`.
    pub fn as_stored(&self) -> &'static str {
        if self.collapsed { "true" } else { "false" }
    }

    /// Parses a persisted value. Anything other than `"true"` means expanded.
    pub fn from_stored(value: &str) -> Self {
        Self {
            collapsed: value == "true",
        }
    }
}

/// Payload of the `menuToggle` notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuToggleEvent {
    pub collapsed: bool,
}

/// Name under which the toggle notification is published.
pub const MENU_TOGGLE_EVENT: &str = "menuToggle";

/// Photographer credit attached to a remote image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    pub name: String,
    pub profile_url: String,
}

/// Outcome of resolving a header background image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResolution {
    pub url: String,
    /// Present only for successful remote lookups.
    pub attribution: Option<Attribution>,
}

impl ImageResolution {
    /// Resolution without attribution.
    pub fn plain(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            attribution: None,
        }
    }
}

/// Input processed by the page event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Pointer activation of an element.
    Click(ElementId),
    /// Key pressed anywhere in the document.
    KeyDown(Key),
    /// Viewport scrolled to the given vertical offset.
    Scroll { y: u32 },
    /// Viewport resized to the given width.
    Resize { width: u32 },
    /// The navigation element's page attribute changed.
    SetCurrentPage(String),
    /// Menu toggle notification delivered to observers.
    MenuToggled(MenuToggleEvent),
    /// A background image lookup finished.
    ImageResolved {
        background: ElementId,
        attribution: Option<ElementId>,
        resolution: ImageResolution,
    },
    /// Deferred opacity flip of a background element.
    FadeIn(ElementId),
}

/// Side effect requested by a widget.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Full page load of the given file.
    Navigate(String),
    /// Publish a menu toggle notification.
    Notify(MenuToggleEvent),
    /// Look up the background image for a page and report back with
    /// `Msg::ImageResolved`.
    ResolveImage {
        page_id: String,
        background: ElementId,
        attribution: Option<ElementId>,
    },
    /// Deliver `msg` after `delay`.
    Schedule { delay: Duration, msg: Box<Msg> },
}
