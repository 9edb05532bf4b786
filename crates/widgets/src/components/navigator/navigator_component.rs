use historia_types::{Effect, ElementId, Key, Msg, NavigatorOptions, PageEntry};
use tracing::{debug, warn};

use crate::components::{Component, PageContext};

const BUTTONS_CLASS: &str = "nav-buttons";
const BUTTON_CLASS: &str = "nav-button";

/// Renders the previous/next buttons and handles arrow-key navigation.
#[derive(Debug)]
pub struct PrevNextNavigator {
    options: NavigatorOptions,
    host: Option<ElementId>,
    previous: Option<ElementId>,
    next: Option<ElementId>,
    current: String,
}

impl PrevNextNavigator {
    pub fn new(options: NavigatorOptions, host: Option<ElementId>) -> Self {
        Self {
            options,
            host,
            previous: None,
            next: None,
            current: String::new(),
        }
    }

    pub fn current_page(&self) -> &str {
        &self.current
    }

    pub fn previous_page<'a>(&self, ctx: &'a PageContext) -> Option<&'a PageEntry> {
        ctx.registry.previous_of(&self.current)
    }

    pub fn next_page<'a>(&self, ctx: &'a PageContext) -> Option<&'a PageEntry> {
        ctx.registry.next_of(&self.current)
    }

    /// Element handles of the previous and next buttons, once rendered.
    pub fn buttons(&self) -> Option<(ElementId, ElementId)> {
        self.previous.zip(self.next)
    }

    fn render(&mut self, ctx: &mut PageContext, host: ElementId) {
        let doc = &mut ctx.document;
        let wrapper = doc.create_element_with_class("div", BUTTONS_CLASS);
        let previous = button(ctx, "prev", &self.options.previous_label, "←");
        let next = button(ctx, "next", &self.options.next_label, "→");
        let doc = &mut ctx.document;
        doc.append_child(wrapper, previous);
        doc.append_child(wrapper, next);
        doc.append_child(host, wrapper);
        self.previous = Some(previous);
        self.next = Some(next);
    }

    fn update_buttons(&self, ctx: &mut PageContext) {
        let Some((previous_button, next_button)) = self.buttons() else {
            return;
        };
        let targets = [
            (previous_button, self.previous_page(ctx).cloned(), &self.options.previous_label),
            (next_button, self.next_page(ctx).cloned(), &self.options.next_label),
        ];
        for (element, entry, label) in targets {
            let Some(entry) = entry else {
                continue;
            };
            ctx.document.set_attribute(element, "href", entry.file.as_str());
            ctx.document.remove_attribute(element, "disabled");
            ctx.document.set_attribute(element, "aria-label", format!("{label}: {}", entry.title));
        }
    }

    fn navigate(entry: Option<&PageEntry>) -> Vec<Effect> {
        match entry {
            Some(entry) => {
                debug!(target_page = %entry.id, file = %entry.file, "navigating");
                vec![Effect::Navigate(entry.file.clone())]
            }
            None => Vec::new(),
        }
    }
}

fn button(ctx: &mut PageContext, direction: &str, label: &str, glyph: &str) -> ElementId {
    let doc = &mut ctx.document;
    let element = doc.create_element_with_class("a", BUTTON_CLASS);
    doc.add_class(element, direction);
    doc.set_attribute(element, "href", "#");
    doc.set_attribute(element, "id", format!("{direction}-button"));
    doc.set_attribute(element, "aria-label", label);
    doc.set_text(element, glyph);
    element
}

impl Component for PrevNextNavigator {
    fn mount(&mut self, ctx: &mut PageContext) -> Vec<Effect> {
        self.current = ctx.current_page();
        match self.host.filter(|host| ctx.document.is_connected(*host)) {
            Some(host) => {
                self.render(ctx, host);
                self.update_buttons(ctx);
            }
            None => warn!("navigation buttons host not found; buttons not rendered"),
        }
        Vec::new()
    }

    fn handle_message(&mut self, ctx: &mut PageContext, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::Click(target) if Some(*target) == self.previous => Self::navigate(self.previous_page(ctx)),
            Msg::Click(target) if Some(*target) == self.next => Self::navigate(self.next_page(ctx)),
            Msg::KeyDown(Key::ArrowLeft) => Self::navigate(self.previous_page(ctx)),
            Msg::KeyDown(Key::ArrowRight) => Self::navigate(self.next_page(ctx)),
            Msg::SetCurrentPage(_) => {
                let current = ctx.current_page();
                if current != self.current {
                    self.current = current;
                    self.update_buttons(ctx);
                }
                Vec::new()
            }
            _ => Vec::new(),
        }
    }
}
