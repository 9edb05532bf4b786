pub mod component;
pub mod header;
pub mod menu;
pub mod navigator;

use std::sync::Arc;

use historia_types::{ElementId, SiteConfig};
use historia_util::KeyValueStore;

use crate::dom::{CURRENT_PAGE_ATTRIBUTE, Document, Window};
use crate::registry::NavigationRegistry;

pub use component::Component;
pub use header::{HeaderResolver, ImageSource, PhotoSearch, RemoteImageSource, StaticImageSource, image_source_for};
pub use menu::{CollapsibleMenu, MenuMount};
pub use navigator::PrevNextNavigator;

/// Everything a component may read or mutate while handling a message.
pub struct PageContext {
    pub document: Document,
    pub window: Window,
    pub site: Arc<SiteConfig>,
    pub registry: NavigationRegistry,
    pub store: Arc<dyn KeyValueStore>,
    /// Navigation element carrying the current page attribute, if present.
    pub navigation: Option<ElementId>,
}

impl PageContext {
    pub fn new(
        document: Document,
        window: Window,
        site: Arc<SiteConfig>,
        store: Arc<dyn KeyValueStore>,
        navigation: Option<ElementId>,
    ) -> Self {
        let registry = NavigationRegistry::new(site.pages.clone(), site.default_page.clone());
        Self {
            document,
            window,
            site,
            registry,
            store,
            navigation,
        }
    }

    /// Current page identity: navigation attribute, URL match, then default.
    pub fn current_page(&self) -> String {
        let attribute = self
            .navigation
            .filter(|nav| self.document.is_connected(*nav))
            .and_then(|nav| self.document.attribute(nav, CURRENT_PAGE_ATTRIBUTE));
        self.registry.resolve_current(attribute, &self.window.location.pathname)
    }
}
