use std::sync::Arc;

use historia_types::SiteConfig;
use historia_util::{KeyValueStore, StoreError};

use crate::components::PageContext;
use crate::dom::PageShell;

/// Context over the standard page skeleton with default site settings.
pub(crate) fn context(
    pathname: &str,
    current_page: Option<&str>,
    inner_width: u32,
    store: Arc<dyn KeyValueStore>,
) -> PageContext {
    let shell = PageShell::standard(pathname, current_page, inner_width);
    PageContext::new(
        shell.document,
        shell.window,
        Arc::new(SiteConfig::default()),
        store,
        shell.navigation,
    )
}

/// Store whose every access fails, like a browser with storage disabled.
pub(crate) struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("storage disabled".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("storage disabled".into()))
    }
}
