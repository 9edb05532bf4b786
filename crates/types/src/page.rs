use serde::{Deserialize, Serialize};

/// One navigable content page of the site.
///
/// The ordered sequence of entries drives every widget: the menu renders one
/// link per entry and the prev/next navigator cycles through them in order,
/// wrapping at both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEntry {
    /// Stable identifier (e.g., "hebreus").
    pub id: String,
    /// Human-friendly title shown in links and labels (e.g., "Hebreus").
    pub title: String,
    /// Short glyph rendered before the title.
    pub icon: String,
    /// Static page file the entry navigates to (e.g., "Hebreus.html").
    pub file: String,
}

impl PageEntry {
    /// Creates a new page entry.
    pub fn new(id: impl Into<String>, title: impl Into<String>, icon: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            icon: icon.into(),
            file: file.into(),
        }
    }

    /// Token matched against the URL path when no explicit page attribute is
    /// available: the file name without its extension ("Hebreus.html" → "Hebreus").
    pub fn path_token(&self) -> &str {
        self.file.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(&self.file)
    }

    /// Menu link label: icon followed by title.
    pub fn label(&self) -> String {
        format!("{} {}", self.icon, self.title)
    }
}

/// Identifier used when no page can be resolved from the document.
pub const DEFAULT_PAGE_ID: &str = "hebreus";

/// Navigation order of the ancient civilization pages.
pub fn default_pages() -> Vec<PageEntry> {
    vec![
        PageEntry::new("hebreus", "Hebreus", "🏺", "Hebreus.html"),
        PageEntry::new("sumerios", "Sumérios", "🏛️", "Sumerios.html"),
        PageEntry::new("acadios", "Acádios", "⚔️", "Acadios.html"),
        PageEntry::new("babilonios", "Babilônios", "🏺", "Babilonios.html"),
        PageEntry::new("assirios", "Assírios", "🛡️", "Assirios.html"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_token_strips_extension() {
        let entry = PageEntry::new("acadios", "Acádios", "⚔️", "Acadios.html");
        assert_eq!(entry.path_token(), "Acadios");

        let bare = PageEntry::new("demo", "Demo", "*", "demo");
        assert_eq!(bare.path_token(), "demo");
    }

    #[test]
    fn default_pages_follow_site_order() {
        let ids: Vec<_> = default_pages().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, ["hebreus", "sumerios", "acadios", "babilonios", "assirios"]);
    }
}
