//! Configuration objects handed to each widget.
//!
//! Every struct here deserializes with `#[serde(default)]`, so a site file
//! only needs to name the values it changes. The defaults reproduce the
//! ancient civilizations site.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::page::{DEFAULT_PAGE_ID, PageEntry, default_pages};

/// Access keys shipped in sample configuration files. Treated as "no key".
pub const PLACEHOLDER_ACCESS_KEYS: &[&str] = &["YOUR_UNSPLASH_ACCESS_KEY", "YOUR_ACCESS_KEY"];

/// Top-level configuration for all widgets of one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Ordered navigation registry.
    pub pages: Vec<PageEntry>,
    /// Page identity used when neither the navigation element nor the URL
    /// names a page.
    pub default_page: String,
    pub menu: MenuOptions,
    pub navigator: NavigatorOptions,
    pub header: HeaderConfig,
    /// Strategy used by the header to find its background image.
    pub image_source: ImageSourceKind,
    pub remote: RemoteSearchConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            pages: default_pages(),
            default_page: DEFAULT_PAGE_ID.to_string(),
            menu: MenuOptions::default(),
            navigator: NavigatorOptions::default(),
            header: HeaderConfig::default(),
            image_source: ImageSourceKind::Static,
            remote: RemoteSearchConfig::default(),
        }
    }
}

/// Which image strategy the header resolver uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSourceKind {
    /// Local asset table joined with a base path.
    #[default]
    Static,
    /// Remote photo search with a default image fallback.
    Remote,
}

/// Options for the collapsible navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuOptions {
    /// Class of the menu element.
    pub menu_class: String,
    /// Class of the toggle rendered next to the menu.
    pub toggle_class: String,
    /// Class of the toggle created for a menu that already exists in the page.
    pub standalone_toggle_class: String,
    /// Class applied to the menu and toggle while collapsed.
    pub collapsed_class: String,
    /// Class applied to the document body while collapsed.
    pub body_collapsed_class: String,
    /// Key of the persisted collapsed flag.
    pub storage_key: String,
    /// Viewport width (px) separating small from large screens.
    pub breakpoint: u32,
    /// Scroll offset (px) past which small screens auto-collapse the menu.
    pub scroll_threshold: u32,
    /// Accessible label of the toggle control.
    pub toggle_label: String,
    /// Accessible label of the navigation element.
    pub menu_label: String,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            menu_class: "nav-menu".to_string(),
            toggle_class: "toggle-button".to_string(),
            standalone_toggle_class: "nav-toggle".to_string(),
            collapsed_class: "collapsed".to_string(),
            body_collapsed_class: "menu-collapsed".to_string(),
            storage_key: "navMenuCollapsed".to_string(),
            breakpoint: 768,
            scroll_threshold: 100,
            toggle_label: "Alternar menu de navegação".to_string(),
            menu_label: "Navegação entre mapas mentais".to_string(),
        }
    }
}

/// Accessible labels of the previous/next buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorOptions {
    pub previous_label: String,
    pub next_label: String,
}

impl Default for NavigatorOptions {
    fn default() -> Self {
        Self {
            previous_label: "Página anterior".to_string(),
            next_label: "Próxima página".to_string(),
        }
    }
}

/// Per-page header tables plus global image settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Page id → image file name under `image_path`.
    pub images: IndexMap<String, String>,
    /// Page id → CSS class added to the header background.
    pub classes: IndexMap<String, String>,
    /// Page id → display title.
    pub titles: IndexMap<String, String>,
    /// Base directory prepended to image file names.
    pub image_path: String,
    /// Image file used for pages missing from `images`.
    pub default_image: String,
    /// Title used for pages missing from `titles`.
    pub fallback_title: String,
    /// Class marking the header this resolver owns.
    pub marker_class: String,
    /// Delay (ms) before a freshly set background fades in.
    pub fade_delay_ms: u64,
}

impl HeaderConfig {
    /// Display title for a page, falling back to the generic title.
    pub fn title_for(&self, page_id: &str) -> &str {
        self.titles.get(page_id).map(String::as_str).unwrap_or(&self.fallback_title)
    }

    /// Local image URL for a page: `<image_path><file>`.
    pub fn image_url_for(&self, page_id: &str) -> String {
        let image_name = self.images.get(page_id).unwrap_or(&self.default_image);
        format!("{}{}", self.image_path, image_name)
    }

    /// CSS class for a page's header background, if configured.
    pub fn class_for(&self, page_id: &str) -> Option<&str> {
        self.classes.get(page_id).map(String::as_str)
    }
}

impl Default for HeaderConfig {
    fn default() -> Self {
        let images = table(&[
            ("acadios", "header-bg--acadios.jpg"),
            ("assirios", "header-bg--assirios.jpg"),
            ("babilonios", "header-bg--babilonios.jpg"),
            ("hebreus", "header-bg--hebreus.jpg"),
            ("sumerios", "header-bg--sumerios.jpg"),
            ("demo", "default-header.svg"),
            ("test", "default-header.svg"),
        ]);
        let classes = table(&[
            ("acadios", "header-bg--acadios"),
            ("assirios", "header-bg--assirios"),
            ("babilonios", "header-bg--babilonios"),
            ("hebreus", "header-bg--hebreus"),
            ("sumerios", "header-bg--sumerios"),
        ]);
        let titles = table(&[
            ("hebreus", "POVO HEBREU"),
            ("sumerios", "POVO SUMÉRIO"),
            ("acadios", "POVO ACÁDIO"),
            ("babilonios", "POVO BABILÔNIO"),
            ("assirios", "POVO ASSÍRIO"),
            ("demo", "DEMO - HEADER ESTÁTICO"),
            ("test", "TESTE - HEADER CORRIGIDO"),
        ]);
        Self {
            images,
            classes,
            titles,
            image_path: "public/images/headers/".to_string(),
            default_image: "default-header.svg".to_string(),
            fallback_title: "CIVILIZAÇÃO ANTIGA".to_string(),
            marker_class: "site-header".to_string(),
            fade_delay_ms: 100,
        }
    }
}

/// Settings for the remote photo search strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSearchConfig {
    /// API access key. `None` or a placeholder disables network calls.
    pub access_key: Option<String>,
    /// Search endpoint.
    pub api_url: String,
    /// Image used whenever the search is skipped or fails.
    pub default_image_url: String,
    /// Page id → search query.
    pub search_terms: IndexMap<String, String>,
    /// Query for pages missing from `search_terms`.
    pub fallback_search_term: String,
    pub orientation: String,
    pub per_page: u32,
    pub image_width: u32,
    pub image_height: u32,
    pub fit: String,
}

impl RemoteSearchConfig {
    /// Returns the access key when it is set and not a sample placeholder.
    pub fn usable_access_key(&self) -> Option<&str> {
        self.access_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !PLACEHOLDER_ACCESS_KEYS.contains(key))
    }

    /// Search query for a page.
    pub fn search_term_for(&self, page_id: &str) -> &str {
        self.search_terms.get(page_id).map(String::as_str).unwrap_or(&self.fallback_search_term)
    }

    /// Appends the sizing parameters to a photo URL returned by the API.
    pub fn sized_image_url(&self, raw_url: &str) -> String {
        let separator = if raw_url.contains('?') { '&' } else { '?' };
        format!(
            "{raw_url}{separator}w={}&h={}&fit={}",
            self.image_width, self.image_height, self.fit
        )
    }
}

impl Default for RemoteSearchConfig {
    fn default() -> Self {
        let search_terms = table(&[
            ("hebreus", "ancient hebrew temple jerusalem"),
            ("sumerios", "ancient mesopotamia sumerian civilization"),
            ("acadios", "ancient akkadian empire mesopotamia"),
            ("babilonios", "babylon ancient city hanging gardens"),
            ("assirios", "assyrian empire ancient mesopotamia"),
            ("demo", "ancient civilization history education"),
            ("test", "ancient civilization test"),
        ]);
        Self {
            access_key: None,
            api_url: "https://api.unsplash.com/search/photos".to_string(),
            default_image_url: "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=1200&h=400&fit=crop"
                .to_string(),
            search_terms,
            fallback_search_term: "ancient civilization history".to_string(),
            orientation: "landscape".to_string(),
            per_page: 1,
            image_width: 1200,
            image_height: 400,
            fit: "crop".to_string(),
        }
    }
}

fn table(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}
