use std::time::Duration;

use historia_types::{Effect, ElementId, HeaderConfig, ImageResolution, Msg};
use tracing::{debug, warn};

use crate::components::{Component, PageContext};

const BACKGROUND_CLASS: &str = "header-background";
const OVERLAY_CLASS: &str = "header-overlay";
const CONTENT_CLASS: &str = "header-content";
const TITLE_CLASS: &str = "header-title";
const ATTRIBUTION_CLASS: &str = "photo-attribution";
const PHOTOGRAPHER_LINK_CLASS: &str = "photographer-link";
const PHOTO_SERVICE_URL: &str = "https://unsplash.com";

/// Handles to the parts of the header block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderElements {
    pub header: ElementId,
    pub background: ElementId,
    pub title: ElementId,
    /// Photographer link; present only when the image source credits photos.
    pub photographer: Option<ElementId>,
}

/// Keeps a single header block in sync with the current page.
///
/// Every update probes for the header by its marker class before creating
/// one, so running it repeatedly never duplicates the block.
#[derive(Debug)]
pub struct HeaderResolver {
    config: HeaderConfig,
    container: Option<ElementId>,
    with_attribution: bool,
    elements: Option<HeaderElements>,
}

impl HeaderResolver {
    pub fn new(config: HeaderConfig, container: Option<ElementId>, with_attribution: bool) -> Self {
        Self {
            config,
            container,
            with_attribution,
            elements: None,
        }
    }

    pub fn elements(&self) -> Option<HeaderElements> {
        self.elements
    }

    /// Creates the header if needed, refreshes title and page class, drops a
    /// duplicate header and requests the background image for the page.
    pub fn update(&mut self, ctx: &mut PageContext) -> Vec<Effect> {
        let page_id = ctx.current_page();
        let elements = match self.probe(ctx) {
            Some(elements) => elements,
            None => self.create(ctx),
        };
        self.elements = Some(elements);

        ctx.document.set_text(elements.title, self.config.title_for(&page_id));
        for class in self.config.classes.values() {
            ctx.document.remove_class(elements.background, class);
        }
        if let Some(class) = self.config.class_for(&page_id) {
            ctx.document.add_class(elements.background, class);
        }
        self.remove_duplicate_header(ctx);

        debug!(page = %page_id, "header updated");
        vec![Effect::ResolveImage {
            page_id,
            background: elements.background,
            attribution: elements.photographer,
        }]
    }

    /// Applies a resolved image: sets it transparent and schedules the fade-in.
    pub fn apply_image(
        &self,
        ctx: &mut PageContext,
        background: ElementId,
        photographer: Option<ElementId>,
        resolution: &ImageResolution,
    ) -> Vec<Effect> {
        ctx.document
            .set_style(background, "background-image", format!("url({})", resolution.url));
        ctx.document.set_style(background, "opacity", "0");

        if let (Some(link), Some(credit)) = (photographer, &resolution.attribution) {
            ctx.document.set_text(link, credit.name.as_str());
            ctx.document.set_attribute(link, "href", credit.profile_url.as_str());
        }

        vec![Effect::Schedule {
            delay: Duration::from_millis(self.config.fade_delay_ms),
            msg: Box::new(Msg::FadeIn(background)),
        }]
    }

    fn probe(&self, ctx: &PageContext) -> Option<HeaderElements> {
        if let Some(known) = self.elements.filter(|e| ctx.document.is_connected(e.header)) {
            return Some(known);
        }
        let doc = &ctx.document;
        let header = doc.find_by_class(doc.root(), &self.config.marker_class)?;
        let background = doc.find_by_class(header, BACKGROUND_CLASS)?;
        let title = doc.find_by_class(header, TITLE_CLASS)?;
        let photographer = doc.find_by_class(header, PHOTOGRAPHER_LINK_CLASS);
        Some(HeaderElements {
            header,
            background,
            title,
            photographer,
        })
    }

    fn create(&self, ctx: &mut PageContext) -> HeaderElements {
        let doc = &mut ctx.document;
        let header = doc.create_element_with_class("header", &self.config.marker_class);
        let background = doc.create_element_with_class("div", BACKGROUND_CLASS);
        let overlay = doc.create_element_with_class("div", OVERLAY_CLASS);
        let content = doc.create_element_with_class("div", CONTENT_CLASS);
        let title = doc.create_element_with_class("h1", TITLE_CLASS);
        doc.append_child(content, title);
        doc.append_child(header, background);
        doc.append_child(header, overlay);
        doc.append_child(header, content);

        let photographer = self.with_attribution.then(|| {
            let block = doc.create_element_with_class("div", ATTRIBUTION_CLASS);
            let text = doc.create_element_with_class("span", "attribution-text");
            doc.set_text(text, "Foto por ");
            let link = doc.create_element_with_class("a", PHOTOGRAPHER_LINK_CLASS);
            doc.set_attribute(link, "href", "#");
            doc.set_attribute(link, "target", "_blank");
            doc.set_attribute(link, "rel", "noopener");
            doc.set_text(link, "Fotógrafo");
            let service = doc.create_element("a");
            doc.set_attribute(service, "href", PHOTO_SERVICE_URL);
            doc.set_attribute(service, "target", "_blank");
            doc.set_attribute(service, "rel", "noopener");
            doc.set_text(service, "Unsplash");
            doc.append_child(text, link);
            doc.append_child(text, service);
            doc.append_child(block, text);
            doc.append_child(header, block);
            link
        });

        self.insert(ctx, header);
        HeaderElements {
            header,
            background,
            title,
            photographer,
        }
    }

    fn insert(&self, ctx: &mut PageContext, header: ElementId) {
        let doc = &mut ctx.document;
        if let Some(container) = self.container.filter(|c| doc.is_connected(*c)) {
            doc.prepend_child(container, header);
            return;
        }
        if let Some(navigation) = ctx.navigation.filter(|n| doc.is_connected(*n)) {
            if doc.insert_after(navigation, header) {
                return;
            }
        }
        warn!("header container and navigation element not found; inserting header at body start");
        let body = doc.body();
        doc.prepend_child(body, header);
    }

    fn remove_duplicate_header(&self, ctx: &mut PageContext) {
        let Some(container) = self.container.filter(|c| ctx.document.is_connected(*c)) else {
            return;
        };
        // Only the page's own top-level header; nested content headers stay.
        let marker = self.config.marker_class.as_str();
        let doc = &ctx.document;
        let duplicate = doc.children(container).iter().copied().find(|child| {
            doc.tag(*child).is_some_and(|t| t.eq_ignore_ascii_case("header")) && !doc.has_class(*child, marker)
        });
        if let Some(duplicate) = duplicate {
            debug!(?duplicate, "removing duplicate header");
            ctx.document.remove(duplicate);
        }
    }
}

impl Component for HeaderResolver {
    fn mount(&mut self, ctx: &mut PageContext) -> Vec<Effect> {
        self.update(ctx)
    }

    fn handle_message(&mut self, ctx: &mut PageContext, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::MenuToggled(_) | Msg::SetCurrentPage(_) => self.update(ctx),
            Msg::ImageResolved {
                background,
                attribution,
                resolution,
            } => self.apply_image(ctx, *background, *attribution, resolution),
            Msg::FadeIn(background) => {
                ctx.document.set_style(*background, "opacity", "1");
                Vec::new()
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use historia_types::{Attribution, MenuToggleEvent};
    use historia_util::InMemoryStore;

    use super::*;
    use crate::dom::CONTAINER_CLASS;
    use crate::test_support::context;

    fn resolver(ctx: &PageContext, with_attribution: bool) -> HeaderResolver {
        let container = ctx.document.find_by_class(ctx.document.root(), CONTAINER_CLASS);
        HeaderResolver::new(HeaderConfig::default(), container, with_attribution)
    }

    #[test]
    fn creates_header_at_container_start_and_drops_duplicate() {
        let mut ctx = context("/Acadios.html", Some("acadios"), 1024, Arc::new(InMemoryStore::new()));
        let mut header = resolver(&ctx, false);

        let effects = header.mount(&mut ctx);
        let elements = header.elements().expect("created");
        assert_eq!(
            effects,
            vec![Effect::ResolveImage {
                page_id: "acadios".into(),
                background: elements.background,
                attribution: None,
            }]
        );

        let container = ctx.document.find_by_class(ctx.document.root(), CONTAINER_CLASS).expect("container");
        assert_eq!(ctx.document.children(container).first(), Some(&elements.header));
        assert_eq!(ctx.document.find_all_by_tag(container, "header"), vec![elements.header]);
        assert_eq!(ctx.document.text(elements.title), Some("POVO ACÁDIO"));
        assert!(ctx.document.has_class(elements.background, "header-bg--acadios"));
        assert!(ctx.document.find_by_class(elements.header, "photo-attribution").is_none());
    }

    #[test]
    fn nested_content_headers_survive_updates() {
        let mut ctx = context("/Assirios.html", None, 1024, Arc::new(InMemoryStore::new()));
        let container = ctx.document.find_by_class(ctx.document.root(), CONTAINER_CLASS).expect("container");
        let main = ctx.document.find_by_tag(container, "main").expect("main");
        let article = ctx.document.create_element("article");
        let article_header = ctx.document.create_element("header");
        ctx.document.append_child(article, article_header);
        ctx.document.append_child(main, article);

        let mut header = resolver(&ctx, false);
        header.mount(&mut ctx);
        header.update(&mut ctx);
        header.update(&mut ctx);

        let elements = header.elements().expect("created");
        assert!(ctx.document.is_connected(article_header));
        assert_eq!(
            ctx.document.find_all_by_tag(container, "header"),
            vec![elements.header, article_header]
        );
    }

    #[test]
    fn repeated_updates_reuse_the_header() {
        let mut ctx = context("/Hebreus.html", None, 1024, Arc::new(InMemoryStore::new()));
        let mut header = resolver(&ctx, true);
        header.mount(&mut ctx);
        let first = header.elements().expect("created");

        header.handle_message(&mut ctx, &Msg::MenuToggled(MenuToggleEvent { collapsed: true }));
        header.update(&mut ctx);

        assert_eq!(header.elements(), Some(first));
        let root = ctx.document.root();
        let owned: Vec<_> = ctx
            .document
            .find_all_by_tag(root, "header")
            .into_iter()
            .filter(|h| ctx.document.has_class(*h, "site-header"))
            .collect();
        assert_eq!(owned, vec![first.header]);
    }

    #[test]
    fn unknown_page_gets_generic_title_and_no_class() {
        let mut ctx = context("/Egipcios.html", Some("egipcios"), 1024, Arc::new(InMemoryStore::new()));
        let mut header = resolver(&ctx, false);
        header.mount(&mut ctx);
        let elements = header.elements().expect("created");

        assert_eq!(ctx.document.text(elements.title), Some("CIVILIZAÇÃO ANTIGA"));
        assert_eq!(ctx.document.classes(elements.background), &["header-background".to_string()]);
    }

    #[test]
    fn page_change_swaps_title_and_class() {
        let mut ctx = context("/Hebreus.html", None, 1024, Arc::new(InMemoryStore::new()));
        let mut header = resolver(&ctx, false);
        header.mount(&mut ctx);
        let elements = header.elements().expect("created");

        let navigation = ctx.navigation.expect("navigation");
        ctx.document.set_attribute(navigation, "current-page", "sumerios");
        let effects = header.handle_message(&mut ctx, &Msg::SetCurrentPage("sumerios".into()));

        assert!(matches!(&effects[..], [Effect::ResolveImage { page_id, .. }] if page_id == "sumerios"));
        assert_eq!(ctx.document.text(elements.title), Some("POVO SUMÉRIO"));
        assert!(ctx.document.has_class(elements.background, "header-bg--sumerios"));
        assert!(!ctx.document.has_class(elements.background, "header-bg--hebreus"));
    }

    #[test]
    fn resolved_image_fades_in_with_credit() {
        let mut ctx = context("/Hebreus.html", None, 1024, Arc::new(InMemoryStore::new()));
        let mut header = resolver(&ctx, true);
        header.mount(&mut ctx);
        let elements = header.elements().expect("created");
        let link = elements.photographer.expect("attribution link");

        let resolution = ImageResolution {
            url: "https://images.example/a.jpg?w=1200&h=400&fit=crop".into(),
            attribution: Some(Attribution {
                name: "Ana Lima".into(),
                profile_url: "https://unsplash.com/@analima".into(),
            }),
        };
        let effects = header.handle_message(
            &mut ctx,
            &Msg::ImageResolved {
                background: elements.background,
                attribution: Some(link),
                resolution,
            },
        );

        assert_eq!(
            ctx.document.style(elements.background, "background-image"),
            Some("url(https://images.example/a.jpg?w=1200&h=400&fit=crop)")
        );
        assert_eq!(ctx.document.style(elements.background, "opacity"), Some("0"));
        assert_eq!(ctx.document.text(link), Some("Ana Lima"));
        assert_eq!(ctx.document.attribute(link, "href"), Some("https://unsplash.com/@analima"));
        assert_eq!(
            effects,
            vec![Effect::Schedule {
                delay: Duration::from_millis(100),
                msg: Box::new(Msg::FadeIn(elements.background)),
            }]
        );

        header.handle_message(&mut ctx, &Msg::FadeIn(elements.background));
        assert_eq!(ctx.document.style(elements.background, "opacity"), Some("1"));
    }

    #[test]
    fn fallback_image_leaves_placeholder_credit() {
        let mut ctx = context("/Hebreus.html", None, 1024, Arc::new(InMemoryStore::new()));
        let mut header = resolver(&ctx, true);
        header.mount(&mut ctx);
        let elements = header.elements().expect("created");
        let link = elements.photographer.expect("attribution link");

        header.apply_image(&mut ctx, elements.background, Some(link), &ImageResolution::plain("default.jpg"));
        assert_eq!(ctx.document.text(link), Some("Fotógrafo"));
        assert_eq!(ctx.document.attribute(link, "href"), Some("#"));
    }

    #[test]
    fn without_container_inserts_after_navigation() {
        let mut ctx = context("/Hebreus.html", None, 1024, Arc::new(InMemoryStore::new()));
        let mut header = HeaderResolver::new(HeaderConfig::default(), None, false);
        header.mount(&mut ctx);

        let navigation = ctx.navigation.expect("navigation");
        let body = ctx.document.body();
        let elements = header.elements().expect("created");
        assert_eq!(&ctx.document.children(body)[..2], &[navigation, elements.header]);
    }

    #[test]
    fn without_anchors_inserts_at_body_start() {
        let mut ctx = context("/Hebreus.html", None, 1024, Arc::new(InMemoryStore::new()));
        let navigation = ctx.navigation.take().expect("navigation");
        ctx.document.remove(navigation);
        let mut header = HeaderResolver::new(HeaderConfig::default(), None, false);
        header.mount(&mut ctx);

        let body = ctx.document.body();
        let elements = header.elements().expect("created");
        assert_eq!(ctx.document.children(body).first(), Some(&elements.header));
    }
}
