//! In-memory page document.
//!
//! Widgets manipulate this arena instead of a browser DOM. Elements are
//! addressed by copyable [`ElementId`]s that stay valid for the lifetime of
//! the document; removing an element only detaches it from its parent.

use std::fmt::Write as _;

use historia_types::ElementId;
use indexmap::IndexMap;

/// A single element node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    classes: Vec<String>,
    attributes: IndexMap<String, String>,
    style: IndexMap<String, String>,
    text: Option<String>,
    children: Vec<ElementId>,
    parent: Option<ElementId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }
}

/// Element arena rooted at `<html>` with `<head>` and `<body>` children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Element>,
    root: ElementId,
    body: ElementId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        let mut document = Self {
            nodes: Vec::new(),
            root: ElementId(0),
            body: ElementId(0),
        };
        document.root = document.create_element("html");
        let head = document.create_element("head");
        document.body = document.create_element("body");
        document.append_child(document.root, head);
        document.append_child(document.root, document.body);
        document
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        self.nodes.push(Element::new(tag));
        ElementId(self.nodes.len() - 1)
    }

    /// Creates a detached element carrying `class`.
    pub fn create_element_with_class(&mut self, tag: &str, class: &str) -> ElementId {
        let id = self.create_element(tag);
        self.add_class(id, class);
        id
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(id.0)
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0)
    }

    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.element(id).and_then(|e| e.parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.element(id).map(|e| e.children.as_slice()).unwrap_or_default()
    }

    /// Whether the element is reachable from the document root.
    pub fn is_connected(&self, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.root {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Detaches `id` from its parent. The handle stays valid.
    pub fn remove(&mut self, id: ElementId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(parent_node) = self.element_mut(parent) {
            parent_node.children.retain(|child| *child != id);
        }
        if let Some(node) = self.element_mut(id) {
            node.parent = None;
        }
    }

    /// Appends `child` as the last child of `parent`, moving it if attached elsewhere.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.insert_child_at(parent, child, usize::MAX);
    }

    /// Inserts `child` as the first child of `parent`.
    pub fn prepend_child(&mut self, parent: ElementId, child: ElementId) {
        self.insert_child_at(parent, child, 0);
    }

    /// Inserts `child` right after `reference` in its parent. Returns `false`
    /// when `reference` is detached.
    pub fn insert_after(&mut self, reference: ElementId, child: ElementId) -> bool {
        let Some(parent) = self.parent(reference) else {
            return false;
        };
        if reference == child {
            return true;
        }
        self.remove(child);
        let position = self
            .children(parent)
            .iter()
            .position(|c| *c == reference)
            .map(|idx| idx + 1)
            .unwrap_or(usize::MAX);
        self.insert_child_at(parent, child, position);
        true
    }

    fn insert_child_at(&mut self, parent: ElementId, child: ElementId, position: usize) {
        if parent == child || self.element(parent).is_none() || self.element(child).is_none() {
            return;
        }
        self.remove(child);
        if let Some(parent_node) = self.element_mut(parent) {
            let position = position.min(parent_node.children.len());
            parent_node.children.insert(position, child);
        }
        if let Some(node) = self.element_mut(child) {
            node.parent = Some(parent);
        }
    }

    pub fn classes(&self, id: ElementId) -> &[String] {
        self.element(id).map(|e| e.classes.as_slice()).unwrap_or_default()
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.classes(id).iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if class.is_empty() || self.has_class(id, class) {
            return;
        }
        if let Some(node) = self.element_mut(id) {
            node.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(node) = self.element_mut(id) {
            node.classes.retain(|c| c != class);
        }
    }

    /// `classList.toggle(class, force)`.
    pub fn toggle_class(&mut self, id: ElementId, class: &str, force: bool) {
        if force {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.attributes.get(name)).map(String::as_str)
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        if let Some(node) = self.element_mut(id) {
            node.attributes.insert(name.to_string(), value.into());
        }
    }

    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        if let Some(node) = self.element_mut(id) {
            node.attributes.shift_remove(name);
        }
    }

    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.style.get(property)).map(String::as_str)
    }

    pub fn set_style(&mut self, id: ElementId, property: &str, value: impl Into<String>) {
        if let Some(node) = self.element_mut(id) {
            node.style.insert(property.to_string(), value.into());
        }
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.element(id).and_then(|e| e.text.as_deref())
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        if let Some(node) = self.element_mut(id) {
            node.text = Some(text.into());
        }
    }

    /// Descendants of `scope` in document order, excluding `scope` itself.
    pub fn descendants(&self, scope: ElementId) -> Vec<ElementId> {
        let mut found = Vec::new();
        let mut stack: Vec<ElementId> = self.children(scope).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            found.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        found
    }

    /// First descendant of `scope` carrying `class`.
    pub fn find_by_class(&self, scope: ElementId, class: &str) -> Option<ElementId> {
        self.descendants(scope).into_iter().find(|id| self.has_class(*id, class))
    }

    /// First descendant of `scope` with the given tag name.
    pub fn find_by_tag(&self, scope: ElementId, tag: &str) -> Option<ElementId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.tag(*id).is_some_and(|t| t.eq_ignore_ascii_case(tag)))
    }

    /// All descendants of `scope` with the given tag name.
    pub fn find_all_by_tag(&self, scope: ElementId, tag: &str) -> Vec<ElementId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.tag(*id).is_some_and(|t| t.eq_ignore_ascii_case(tag)))
            .collect()
    }

    /// Serializes the subtree rooted at `id`.
    pub fn to_html(&self, id: ElementId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: ElementId, out: &mut String) {
        let Some(node) = self.element(id) else {
            return;
        };
        let _ = write!(out, "<{}", node.tag);
        if !node.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&node.classes.join(" ")));
        }
        for (name, value) in &node.attributes {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        if !node.style.is_empty() {
            let declarations: Vec<String> = node.style.iter().map(|(k, v)| format!("{k}: {v}")).collect();
            let _ = write!(out, " style=\"{}\"", escape(&declarations.join("; ")));
        }
        out.push('>');
        if let Some(text) = &node.text {
            out.push_str(&escape(text));
        }
        for child in &node.children {
            self.write_html(*child, out);
        }
        let _ = write!(out, "</{}>", node.tag);
    }
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Browser location. Assigning performs a full page load, recorded in `assigned`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    pub assigned: Option<String>,
}

impl Location {
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            assigned: None,
        }
    }

    pub fn assign(&mut self, target: impl Into<String>) {
        self.assigned = Some(target.into());
    }
}

/// Viewport and location of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub inner_width: u32,
    pub scroll_y: u32,
    pub location: Location,
}

impl Window {
    pub fn new(pathname: impl Into<String>, inner_width: u32) -> Self {
        Self {
            inner_width,
            scroll_y: 0,
            location: Location::new(pathname),
        }
    }
}

/// Tag of the element hosting the collapsible menu; carries `current-page`.
pub const NAVIGATION_MENU_TAG: &str = "navigation-menu";
/// Tag of the element hosting the prev/next buttons.
pub const NAVIGATION_BUTTONS_TAG: &str = "navigation-buttons";
/// Attribute naming the current page on the navigation element.
pub const CURRENT_PAGE_ATTRIBUTE: &str = "current-page";
/// Class of the element hosting the page header.
pub const CONTAINER_CLASS: &str = "container";

/// A loaded page: document, window and the element references widgets need.
#[derive(Debug, Clone)]
pub struct PageShell {
    pub document: Document,
    pub window: Window,
    /// Navigation element (menu host).
    pub navigation: Option<ElementId>,
    /// Header container.
    pub container: Option<ElementId>,
    /// Prev/next buttons host.
    pub buttons_host: Option<ElementId>,
}

impl PageShell {
    /// Builds the skeleton shared by the site's static pages:
    ///
    /// ```text
    /// body
    /// ├── navigation-menu[current-page]
    /// ├── div.container
    /// │   ├── header > h1   (page's own heading)
    /// │   └── main
    /// └── navigation-buttons
    /// ```
    pub fn standard(pathname: &str, current_page: Option<&str>, inner_width: u32) -> Self {
        let mut document = Document::new();
        let body = document.body();

        let navigation = document.create_element(NAVIGATION_MENU_TAG);
        if let Some(page) = current_page {
            document.set_attribute(navigation, CURRENT_PAGE_ATTRIBUTE, page);
        }
        document.append_child(body, navigation);

        let container = document.create_element_with_class("div", CONTAINER_CLASS);
        document.append_child(body, container);
        let own_header = document.create_element("header");
        let heading = document.create_element("h1");
        document.set_text(heading, "Mapa mental");
        document.append_child(own_header, heading);
        document.append_child(container, own_header);
        let main = document.create_element("main");
        document.append_child(container, main);

        let buttons_host = document.create_element(NAVIGATION_BUTTONS_TAG);
        document.append_child(body, buttons_host);

        Self {
            document,
            window: Window::new(pathname, inner_width),
            navigation: Some(navigation),
            container: Some(container),
            buttons_host: Some(buttons_host),
        }
    }
}
