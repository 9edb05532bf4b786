//! Page session: the event loop tying the widgets of one loaded page together.
//!
//! Responsibilities
//! - Own the page context (document, window, registry, preference store).
//! - Offer every input [`Msg`] to each widget and execute returned [`Effect`]s.
//! - Publish menu toggles on the [`NotificationBus`] and feed them back to
//!   the header as `Msg::MenuToggled`.
//! - Run image lookups and timers as tokio tasks that post their result back
//!   over a channel, so a pending request never blocks input handling.
//!
//! Spawning requires a tokio runtime; create and drive sessions from within one.

use std::collections::VecDeque;
use std::sync::Arc;

use historia_types::{Effect, ElementId, Key, MenuToggleEvent, Msg, SiteConfig};
use historia_util::KeyValueStore;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, info, warn};

use crate::components::{
    CollapsibleMenu, Component, HeaderResolver, ImageSource, MenuMount, PageContext, PrevNextNavigator,
};
use crate::dom::{CURRENT_PAGE_ATTRIBUTE, Document, PageShell, Window};
use crate::notify::NotificationBus;

pub struct PageSession {
    ctx: PageContext,
    menu: CollapsibleMenu,
    navigator: PrevNextNavigator,
    header: HeaderResolver,
    bus: NotificationBus,
    /// The header's subscription to menu toggles.
    header_events: UnboundedReceiver<MenuToggleEvent>,
    image_source: Arc<dyn ImageSource>,
    /// `None` reports a task that ended without a message.
    sender: UnboundedSender<Option<Msg>>,
    receiver: UnboundedReceiver<Option<Msg>>,
    /// Spawned tasks that have not reported back yet.
    in_flight: usize,
}

impl PageSession {
    pub fn new(
        site: Arc<SiteConfig>,
        shell: PageShell,
        store: Arc<dyn KeyValueStore>,
        image_source: Arc<dyn ImageSource>,
    ) -> Self {
        let menu = CollapsibleMenu::new(site.menu.clone(), MenuMount::Render { host: shell.navigation });
        let navigator = PrevNextNavigator::new(site.navigator.clone(), shell.buttons_host);
        let header = HeaderResolver::new(
            site.header.clone(),
            shell.container,
            image_source.provides_attribution(),
        );
        let mut bus = NotificationBus::new();
        let header_events = bus.subscribe();
        let (sender, receiver) = unbounded_channel();
        let ctx = PageContext::new(shell.document, shell.window, site, store, shell.navigation);

        Self {
            ctx,
            menu,
            navigator,
            header,
            bus,
            header_events,
            image_source,
            sender,
            receiver,
            in_flight: 0,
        }
    }

    /// Mounts every widget and runs their initial effects.
    pub fn mount(&mut self) {
        let mut effects = self.menu.mount(&mut self.ctx);
        effects.extend(self.navigator.mount(&mut self.ctx));
        effects.extend(self.header.mount(&mut self.ctx));
        info!(page = %self.ctx.current_page(), "page mounted");

        let mut queue = VecDeque::new();
        self.run_effects(effects, &mut queue);
        self.drain(queue);
    }

    /// Processes `msg` and every message it synchronously causes.
    pub fn dispatch(&mut self, msg: Msg) {
        self.drain(VecDeque::from([msg]));
    }

    pub fn click(&mut self, target: ElementId) {
        self.dispatch(Msg::Click(target));
    }

    pub fn key_down(&mut self, key: Key) {
        self.dispatch(Msg::KeyDown(key));
    }

    pub fn scroll_to(&mut self, y: u32) {
        self.ctx.window.scroll_y = y;
        self.dispatch(Msg::Scroll { y });
    }

    pub fn resize(&mut self, width: u32) {
        self.ctx.window.inner_width = width;
        self.dispatch(Msg::Resize { width });
    }

    /// Updates the navigation element's page attribute and refreshes every
    /// widget that depends on it. Without a navigation element there is no
    /// attribute to carry the id, so the page identity stays as resolved.
    pub fn set_current_page(&mut self, page_id: &str) {
        let Some(navigation) = self.ctx.navigation.filter(|n| self.ctx.document.is_connected(*n)) else {
            warn!(page = page_id, "navigation element not found; current page unchanged");
            return;
        };
        self.ctx.document.set_attribute(navigation, CURRENT_PAGE_ATTRIBUTE, page_id);
        self.dispatch(Msg::SetCurrentPage(page_id.to_string()));
    }

    /// Registers an additional observer of menu toggles.
    pub fn subscribe(&mut self) -> UnboundedReceiver<MenuToggleEvent> {
        self.bus.subscribe()
    }

    /// Waits for one spawned task to report back and processes its message.
    /// Returns `false` when nothing is outstanding.
    pub async fn next_message(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.receiver.recv().await {
            Some(report) => {
                self.in_flight -= 1;
                if let Some(msg) = report {
                    self.dispatch(msg);
                }
                true
            }
            None => false,
        }
    }

    /// Processes spawned results until none are outstanding, including the
    /// fade-in timers scheduled by resolved images.
    pub async fn settle(&mut self) {
        while self.next_message().await {}
    }

    pub fn pending_tasks(&self) -> usize {
        self.in_flight
    }

    pub fn context(&self) -> &PageContext {
        &self.ctx
    }

    pub fn document(&self) -> &Document {
        &self.ctx.document
    }

    pub fn window(&self) -> &Window {
        &self.ctx.window
    }

    pub fn menu(&self) -> &CollapsibleMenu {
        &self.menu
    }

    pub fn navigator(&self) -> &PrevNextNavigator {
        &self.navigator
    }

    pub fn header(&self) -> &HeaderResolver {
        &self.header
    }

    pub fn current_page(&self) -> String {
        self.ctx.current_page()
    }

    /// Serializes the whole document.
    pub fn to_html(&self) -> String {
        self.ctx.document.to_html(self.ctx.document.root())
    }

    fn drain(&mut self, mut queue: VecDeque<Msg>) {
        while let Some(msg) = queue.pop_front() {
            let mut effects = self.menu.handle_message(&mut self.ctx, &msg);
            effects.extend(self.navigator.handle_message(&mut self.ctx, &msg));
            effects.extend(self.header.handle_message(&mut self.ctx, &msg));
            self.run_effects(effects, &mut queue);
        }
    }

    fn run_effects(&mut self, effects: Vec<Effect>, queue: &mut VecDeque<Msg>) {
        for effect in effects {
            match effect {
                Effect::Navigate(file) => {
                    info!(%file, "navigating");
                    self.ctx.window.location.assign(file);
                }
                Effect::Notify(event) => {
                    self.bus.notify(event);
                    while let Ok(event) = self.header_events.try_recv() {
                        queue.push_back(Msg::MenuToggled(event));
                    }
                }
                Effect::ResolveImage {
                    page_id,
                    background,
                    attribution,
                } => {
                    let source = self.image_source.clone();
                    self.spawn(async move {
                        let resolution = source.resolve(&page_id).await;
                        Msg::ImageResolved {
                            background,
                            attribution,
                            resolution,
                        }
                    });
                }
                Effect::Schedule { delay, msg } => {
                    self.spawn(async move {
                        tokio::time::sleep(delay).await;
                        *msg
                    });
                }
            }
        }
    }

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = Msg> + Send + 'static,
    {
        let sender = self.sender.clone();
        self.in_flight += 1;
        let handle = tokio::spawn(task);
        tokio::spawn(async move {
            let report = match handle.await {
                Ok(msg) => Some(msg),
                Err(error) => {
                    warn!(%error, "background task failed");
                    None
                }
            };
            if sender.send(report).is_err() {
                debug!("page session closed before task finished");
            }
        });
    }
}
