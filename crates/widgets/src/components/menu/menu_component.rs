use historia_types::{Effect, ElementId, Key, MenuOptions, MenuState, MenuToggleEvent, Msg};
use tracing::{debug, warn};

use super::{CollapsibleMenuState, MenuLink};
use crate::components::{Component, PageContext};

/// Where the menu lives in the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuMount {
    /// Render the menu and its toggle inside `host`.
    Render { host: Option<ElementId> },
    /// Adopt an existing menu element; create the toggle when `toggle` is `None`.
    Existing {
        menu: Option<ElementId>,
        toggle: Option<ElementId>,
    },
}

/// The collapsible navigation menu widget.
#[derive(Debug)]
pub struct CollapsibleMenu {
    options: MenuOptions,
    mount: MenuMount,
    pub state: CollapsibleMenuState,
}

impl CollapsibleMenu {
    pub fn new(options: MenuOptions, mount: MenuMount) -> Self {
        Self {
            options,
            mount,
            state: CollapsibleMenuState::default(),
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.state.is_collapsed()
    }

    /// Flips the collapsed flag, updates classes and the accessible expanded
    /// flag, persists the new value and emits the toggle notification.
    pub fn toggle(&mut self, ctx: &mut PageContext) -> Vec<Effect> {
        self.state.menu_state.collapsed = !self.state.menu_state.collapsed;
        self.apply_visual_state(ctx);
        self.save_state(ctx);
        debug!(collapsed = self.is_collapsed(), "menu toggled");
        vec![Effect::Notify(MenuToggleEvent {
            collapsed: self.is_collapsed(),
        })]
    }

    pub fn expand(&mut self, ctx: &mut PageContext) -> Vec<Effect> {
        if self.is_collapsed() { self.toggle(ctx) } else { Vec::new() }
    }

    pub fn collapse(&mut self, ctx: &mut PageContext) -> Vec<Effect> {
        if self.is_collapsed() { Vec::new() } else { self.toggle(ctx) }
    }

    /// Marks the link of `page_id` as the active one.
    pub fn update_active_link(&self, ctx: &mut PageContext, page_id: &str) {
        for link in &self.state.links {
            if link.page_id == page_id {
                ctx.document.add_class(link.element, "active");
                ctx.document.set_attribute(link.element, "aria-current", "page");
            } else {
                ctx.document.remove_class(link.element, "active");
                ctx.document.remove_attribute(link.element, "aria-current");
            }
        }
    }

    fn render_into(&mut self, ctx: &mut PageContext, host: ElementId) {
        let current_page = ctx.current_page();
        let doc = &mut ctx.document;

        let menu = doc.create_element_with_class("nav", &self.options.menu_class);
        doc.set_attribute(menu, "role", "navigation");
        doc.set_attribute(menu, "aria-label", self.options.menu_label.as_str());

        let mut links = Vec::with_capacity(ctx.registry.entries().len());
        for entry in ctx.registry.entries() {
            let link = doc.create_element("a");
            doc.set_attribute(link, "href", entry.file.as_str());
            doc.set_attribute(link, "data-page", entry.id.as_str());
            doc.set_text(link, entry.label());
            doc.append_child(menu, link);
            links.push(MenuLink {
                page_id: entry.id.clone(),
                href: entry.file.clone(),
                element: link,
            });
        }
        doc.append_child(host, menu);

        let toggle = self.create_toggle(ctx, &self.options.toggle_class);
        ctx.document.append_child(host, toggle);

        self.state.menu = Some(menu);
        self.state.toggle = Some(toggle);
        self.state.links = links;
        self.update_active_link(ctx, &current_page);
    }

    fn create_toggle(&self, ctx: &mut PageContext, class: &str) -> ElementId {
        let doc = &mut ctx.document;
        let toggle = doc.create_element_with_class("button", class);
        doc.set_attribute(toggle, "aria-label", self.options.toggle_label.as_str());
        doc.set_attribute(toggle, "aria-expanded", "true");
        doc.set_text(toggle, self.state.toggle_glyph());
        toggle
    }

    fn attach(&mut self, ctx: &mut PageContext) -> bool {
        match self.mount {
            MenuMount::Render { host } => match host.filter(|h| ctx.document.is_connected(*h)) {
                Some(host) => {
                    self.render_into(ctx, host);
                    true
                }
                None => {
                    warn!("navigation menu host not found; menu not rendered");
                    false
                }
            },
            MenuMount::Existing { menu, toggle } => {
                let Some(menu) = menu.filter(|m| ctx.document.is_connected(*m)) else {
                    warn!("navigation menu element not found; menu toggle disabled");
                    return false;
                };
                let toggle = match toggle {
                    Some(toggle) => toggle,
                    None => {
                        let toggle = self.create_toggle(ctx, &self.options.standalone_toggle_class);
                        let body = ctx.document.body();
                        ctx.document.prepend_child(body, toggle);
                        toggle
                    }
                };
                self.state.menu = Some(menu);
                self.state.toggle = Some(toggle);
                true
            }
        }
    }

    fn apply_visual_state(&self, ctx: &mut PageContext) {
        let collapsed = self.is_collapsed();
        let collapsed_class = self.options.collapsed_class.as_str();
        if let Some(menu) = self.state.menu {
            ctx.document.toggle_class(menu, collapsed_class, collapsed);
        }
        if let Some(toggle) = self.state.toggle {
            ctx.document.toggle_class(toggle, collapsed_class, collapsed);
            ctx.document.set_attribute(toggle, "aria-expanded", (!collapsed).to_string());
            ctx.document.set_text(toggle, self.state.toggle_glyph());
        }
        let body = ctx.document.body();
        ctx.document.toggle_class(body, &self.options.body_collapsed_class, collapsed);
    }

    fn save_state(&self, ctx: &PageContext) {
        if let Err(error) = ctx.store.set(&self.options.storage_key, self.state.menu_state.as_stored()) {
            warn!(%error, "could not save menu state");
        }
    }

    fn restore_state(&mut self, ctx: &mut PageContext) {
        match ctx.store.get(&self.options.storage_key) {
            Ok(Some(saved)) => {
                self.state.menu_state = MenuState::from_stored(&saved);
                self.apply_visual_state(ctx);
            }
            Ok(None) => {}
            Err(error) => warn!(%error, "could not restore menu state"),
        }
    }

    fn handle_click(&mut self, ctx: &mut PageContext, target: ElementId) -> Vec<Effect> {
        if Some(target) == self.state.toggle {
            return self.toggle(ctx);
        }
        let Some(href) = self.state.link_for(target).map(|link| link.href.clone()) else {
            return Vec::new();
        };
        let mut effects = self.collapse(ctx);
        effects.push(Effect::Navigate(href));
        effects
    }
}

impl Component for CollapsibleMenu {
    fn mount(&mut self, ctx: &mut PageContext) -> Vec<Effect> {
        if !self.attach(ctx) {
            return Vec::new();
        }
        self.restore_state(ctx);
        self.state.auto_collapse_on_scroll = ctx.window.inner_width <= self.options.breakpoint;
        Vec::new()
    }

    fn handle_message(&mut self, ctx: &mut PageContext, msg: &Msg) -> Vec<Effect> {
        if self.state.menu.is_none() {
            return Vec::new();
        }
        match msg {
            Msg::Click(target) => self.handle_click(ctx, *target),
            Msg::KeyDown(Key::Escape) => self.collapse(ctx),
            Msg::Scroll { y } if self.state.auto_collapse_on_scroll && *y > self.options.scroll_threshold => {
                self.collapse(ctx)
            }
            Msg::Resize { width } if *width > self.options.breakpoint => self.expand(ctx),
            Msg::SetCurrentPage(_) => {
                let current = ctx.current_page();
                self.update_active_link(ctx, &current);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_support::{UnavailableStore, context};
    use historia_util::InMemoryStore;

    fn rendered_menu(ctx: &mut PageContext) -> CollapsibleMenu {
        let host = ctx.navigation;
        let mut menu = CollapsibleMenu::new(MenuOptions::default(), MenuMount::Render { host });
        assert!(menu.mount(ctx).is_empty());
        menu
    }

    fn stored(ctx: &PageContext) -> Option<String> {
        ctx.store.get("navMenuCollapsed").expect("store readable")
    }

    #[test]
    fn renders_links_with_active_page() {
        let mut ctx = context("/Acadios.html", Some("acadios"), 1024, Arc::new(InMemoryStore::new()));
        let menu = rendered_menu(&mut ctx);

        assert_eq!(menu.state.links.len(), 5);
        let acadios = &menu.state.links[2];
        assert_eq!(acadios.href, "Acadios.html");
        assert!(ctx.document.has_class(acadios.element, "active"));
        assert_eq!(ctx.document.attribute(acadios.element, "aria-current"), Some("page"));
        assert_eq!(ctx.document.text(acadios.element), Some("⚔️ Acádios"));
        assert!(!ctx.document.has_class(menu.state.links[0].element, "active"));

        let toggle = menu.state.toggle.expect("toggle");
        assert_eq!(ctx.document.attribute(toggle, "aria-expanded"), Some("true"));
        assert_eq!(ctx.document.attribute(toggle, "aria-label"), Some("Alternar menu de navegação"));
    }

    #[test]
    fn double_toggle_restores_visuals_and_storage() {
        let store = Arc::new(InMemoryStore::with_entry("navMenuCollapsed", "true"));
        let mut ctx = context("/Hebreus.html", None, 1024, store);
        let mut menu = rendered_menu(&mut ctx);
        let nav = menu.state.menu.expect("menu");
        let toggle = menu.state.toggle.expect("toggle");
        let before = ctx.document.clone();

        let first = menu.toggle(&mut ctx);
        assert_eq!(first, vec![Effect::Notify(MenuToggleEvent { collapsed: false })]);
        assert_eq!(stored(&ctx).as_deref(), Some("false"));
        assert!(!ctx.document.has_class(nav, "collapsed"));

        let second = menu.toggle(&mut ctx);
        assert_eq!(second, vec![Effect::Notify(MenuToggleEvent { collapsed: true })]);
        assert_eq!(stored(&ctx).as_deref(), Some("true"));
        assert_eq!(ctx.document, before);
        assert_eq!(ctx.document.attribute(toggle, "aria-expanded"), Some("false"));
    }

    #[test]
    fn restoring_true_collapses_everything() {
        let store = Arc::new(InMemoryStore::with_entry("navMenuCollapsed", "true"));
        let mut ctx = context("/Hebreus.html", None, 1024, store);
        let menu = rendered_menu(&mut ctx);

        assert!(menu.is_collapsed());
        let nav = menu.state.menu.expect("menu");
        let toggle = menu.state.toggle.expect("toggle");
        assert!(ctx.document.has_class(nav, "collapsed"));
        assert!(ctx.document.has_class(toggle, "collapsed"));
        assert!(ctx.document.has_class(ctx.document.body(), "menu-collapsed"));
        assert_eq!(ctx.document.attribute(toggle, "aria-expanded"), Some("false"));
        assert_eq!(ctx.document.text(toggle), Some("☰"));
    }

    #[test]
    fn expand_and_collapse_are_idempotent() {
        let mut ctx = context("/Hebreus.html", None, 1024, Arc::new(InMemoryStore::new()));
        let mut menu = rendered_menu(&mut ctx);

        assert!(menu.expand(&mut ctx).is_empty());
        assert_eq!(menu.collapse(&mut ctx).len(), 1);
        assert!(menu.collapse(&mut ctx).is_empty());
        assert!(menu.is_collapsed());
        assert_eq!(menu.expand(&mut ctx).len(), 1);
        assert!(!menu.is_collapsed());
    }

    #[test]
    fn unavailable_store_does_not_block_toggling() {
        let mut ctx = context("/Hebreus.html", None, 1024, Arc::new(UnavailableStore));
        let mut menu = rendered_menu(&mut ctx);

        assert!(!menu.is_collapsed());
        let effects = menu.toggle(&mut ctx);
        assert!(menu.is_collapsed());
        assert_eq!(effects, vec![Effect::Notify(MenuToggleEvent { collapsed: true })]);
    }

    #[test]
    fn escape_only_collapses_an_expanded_menu() {
        let mut ctx = context("/Hebreus.html", None, 1024, Arc::new(InMemoryStore::new()));
        let mut menu = rendered_menu(&mut ctx);

        assert_eq!(menu.handle_message(&mut ctx, &Msg::KeyDown(Key::Escape)).len(), 1);
        assert!(menu.is_collapsed());
        assert!(menu.handle_message(&mut ctx, &Msg::KeyDown(Key::Escape)).is_empty());
        assert!(menu.is_collapsed());
    }

    #[test]
    fn scroll_collapses_only_on_small_screens() {
        let mut small = context("/Hebreus.html", None, 768, Arc::new(InMemoryStore::new()));
        let mut menu = rendered_menu(&mut small);
        assert!(menu.handle_message(&mut small, &Msg::Scroll { y: 100 }).is_empty());
        assert_eq!(menu.handle_message(&mut small, &Msg::Scroll { y: 101 }).len(), 1);
        assert!(menu.is_collapsed());

        let mut large = context("/Hebreus.html", None, 769, Arc::new(InMemoryStore::new()));
        let mut menu = rendered_menu(&mut large);
        assert!(menu.handle_message(&mut large, &Msg::Scroll { y: 500 }).is_empty());
        assert!(!menu.is_collapsed());
    }

    #[test]
    fn growing_past_breakpoint_expands() {
        let store = Arc::new(InMemoryStore::with_entry("navMenuCollapsed", "true"));
        let mut ctx = context("/Hebreus.html", None, 600, store);
        let mut menu = rendered_menu(&mut ctx);

        assert!(menu.handle_message(&mut ctx, &Msg::Resize { width: 768 }).is_empty());
        assert!(menu.is_collapsed());
        assert_eq!(menu.handle_message(&mut ctx, &Msg::Resize { width: 1200 }).len(), 1);
        assert!(!menu.is_collapsed());
        assert!(menu.handle_message(&mut ctx, &Msg::Resize { width: 1300 }).is_empty());
    }

    #[test]
    fn clicking_link_collapses_and_navigates() {
        let mut ctx = context("/Hebreus.html", None, 1024, Arc::new(InMemoryStore::new()));
        let mut menu = rendered_menu(&mut ctx);
        let babilonios = menu.state.links[3].element;

        let effects = menu.handle_message(&mut ctx, &Msg::Click(babilonios));
        assert_eq!(
            effects,
            vec![
                Effect::Notify(MenuToggleEvent { collapsed: true }),
                Effect::Navigate("Babilonios.html".into()),
            ]
        );
    }

    #[test]
    fn current_page_change_moves_active_link() {
        let mut ctx = context("/Hebreus.html", None, 1024, Arc::new(InMemoryStore::new()));
        let mut menu = rendered_menu(&mut ctx);
        let hebreus = menu.state.links[0].element;
        let assirios = menu.state.links[4].element;
        assert!(ctx.document.has_class(hebreus, "active"));

        let navigation = ctx.navigation.expect("navigation");
        ctx.document.set_attribute(navigation, "current-page", "assirios");
        menu.handle_message(&mut ctx, &Msg::SetCurrentPage("assirios".into()));
        assert!(!ctx.document.has_class(hebreus, "active"));
        assert_eq!(ctx.document.attribute(hebreus, "aria-current"), None);
        assert!(ctx.document.has_class(assirios, "active"));
    }

    #[test]
    fn existing_menu_gets_a_toggle_at_body_start() {
        let mut ctx = context("/Hebreus.html", None, 1024, Arc::new(InMemoryStore::new()));
        let body = ctx.document.body();
        let existing = ctx.document.create_element_with_class("nav", "nav-menu");
        ctx.document.append_child(body, existing);

        let mut menu = CollapsibleMenu::new(
            MenuOptions::default(),
            MenuMount::Existing {
                menu: Some(existing),
                toggle: None,
            },
        );
        menu.mount(&mut ctx);

        let toggle = menu.state.toggle.expect("toggle created");
        assert_eq!(ctx.document.children(body).first(), Some(&toggle));
        assert!(ctx.document.has_class(toggle, "nav-toggle"));

        menu.handle_message(&mut ctx, &Msg::Click(toggle));
        assert!(ctx.document.has_class(existing, "collapsed"));
    }

    #[test]
    fn missing_host_leaves_menu_inert() {
        let mut ctx = context("/Hebreus.html", None, 1024, Arc::new(InMemoryStore::new()));
        let mut menu = CollapsibleMenu::new(MenuOptions::default(), MenuMount::Render { host: None });
        assert!(menu.mount(&mut ctx).is_empty());
        assert!(menu.handle_message(&mut ctx, &Msg::KeyDown(Key::Escape)).is_empty());
        assert!(!menu.is_collapsed());
    }
}
