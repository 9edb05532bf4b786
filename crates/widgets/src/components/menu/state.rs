use historia_types::{ElementId, MenuState};

/// A rendered menu link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuLink {
    pub page_id: String,
    pub href: String,
    pub element: ElementId,
}

/// State for the collapsible menu.
///
/// Holds the collapsed flag plus the element references resolved at mount.
/// Element references stay `None` when the page lacks them; toggling still
/// updates the flag.
#[derive(Debug, Default, Clone)]
pub struct CollapsibleMenuState {
    pub menu_state: MenuState,
    /// Menu element receiving the collapsed class.
    pub menu: Option<ElementId>,
    /// Toggle control.
    pub toggle: Option<ElementId>,
    /// Links in registry order.
    pub links: Vec<MenuLink>,
    /// Whether scrolling past the threshold collapses the menu. Decided once
    /// at mount from the viewport width.
    pub auto_collapse_on_scroll: bool,
}

impl CollapsibleMenuState {
    pub fn is_collapsed(&self) -> bool {
        self.menu_state.collapsed
    }

    pub fn link_for(&self, element: ElementId) -> Option<&MenuLink> {
        self.links.iter().find(|link| link.element == element)
    }

    /// Glyph shown on the toggle for the current state.
    pub fn toggle_glyph(&self) -> &'static str {
        if self.menu_state.collapsed { "☰" } else { "✕" }
    }
}
