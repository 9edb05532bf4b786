use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use historia_types::{MENU_TOGGLE_EVENT, MenuState, MenuToggleEvent, SiteConfig};
use historia_util::{JsonPreferencesStore, KeyValueStore, load_site_config};
use historia_widgets::{NavigationRegistry, PageSession, PageShell, StaticImageSource, image_source_for};
use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Render and inspect the historia site widgets.
#[derive(Parser, Debug)]
#[command(name = "historia", version, about)]
struct Cli {
    /// Site configuration file (.yaml, .yml or .json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Preferences file holding the persisted menu state
    #[arg(long, global = true)]
    preferences: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mount every widget on a page and print the resulting HTML
    Render {
        /// URL path of the page, e.g. /Acadios.html
        pathname: String,
        /// Page id set on the navigation element
        #[arg(long)]
        page: Option<String>,
        /// Viewport width in pixels
        #[arg(long, default_value_t = 1280)]
        width: u32,
        /// Scroll offset to simulate after mounting
        #[arg(long)]
        scroll: Option<u32>,
    },
    /// Print the previous and next pages of a page
    Neighbors {
        /// Page id
        id: String,
    },
    /// Read or change the persisted menu state
    Menu {
        #[arg(value_enum)]
        action: MenuAction,
    },
    /// Print the resolved header for a page as JSON
    Header {
        /// Page id
        id: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum MenuAction {
    Status,
    Toggle,
    Expand,
    Collapse,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let site = Arc::new(load_config(cli.config.as_deref())?);

    match cli.command {
        Command::Render {
            pathname,
            page,
            width,
            scroll,
        } => render(site, open_store(cli.preferences), &pathname, page.as_deref(), width, scroll).await,
        Command::Neighbors { id } => neighbors(&site, &id),
        Command::Menu { action } => menu(site, open_store(cli.preferences), action),
        Command::Header { id } => header(&site, &id).await,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<SiteConfig> {
    load_site_config(path).with_context(|| match path {
        Some(path) => format!("failed to load site config from {}", path.display()),
        None => "invalid built-in site config".to_string(),
    })
}

/// Opens the preferences file, keeping state in memory when it is unusable.
fn open_store(path: Option<PathBuf>) -> Arc<dyn KeyValueStore> {
    match JsonPreferencesStore::open(path) {
        Ok(store) => {
            info!(path = %store.path().display(), "using preferences");
            Arc::new(store)
        }
        Err(error) => {
            warn!(%error, "preferences unavailable; menu state will not persist");
            Arc::new(JsonPreferencesStore::ephemeral())
        }
    }
}

async fn render(
    site: Arc<SiteConfig>,
    store: Arc<dyn KeyValueStore>,
    pathname: &str,
    page: Option<&str>,
    width: u32,
    scroll: Option<u32>,
) -> Result<()> {
    let source = image_source_for(&site);
    let shell = PageShell::standard(pathname, page, width);
    let mut session = PageSession::new(site, shell, store, source);
    let mut events = session.subscribe();
    session.mount();
    if let Some(y) = scroll {
        session.scroll_to(y);
    }
    session.settle().await;
    log_notifications(&mut events);

    if let Some(target) = &session.window().location.assigned {
        info!(%target, "page requested navigation");
    }
    println!("{}", session.to_html());
    Ok(())
}

fn neighbors(site: &SiteConfig, id: &str) -> Result<()> {
    let registry = NavigationRegistry::new(site.pages.clone(), site.default_page.clone());
    let out = json!({
        "current": id,
        "known": registry.find(id).is_some(),
        "previous": registry.previous_of(id),
        "next": registry.next_of(id),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn menu(site: Arc<SiteConfig>, store: Arc<dyn KeyValueStore>, action: MenuAction) -> Result<()> {
    if action == MenuAction::Status {
        let stored = store.get(&site.menu.storage_key).context("failed to read menu state")?;
        let state = stored.as_deref().map(MenuState::from_stored).unwrap_or_default();
        println!("{}", describe(state.collapsed));
        return Ok(());
    }

    // The header image is irrelevant here; keep lookups local.
    let source = Arc::new(StaticImageSource::new(site.header.clone()));
    let shell = PageShell::standard("/", None, 1280);
    let mut session = PageSession::new(site, shell, store, source);
    let mut events = session.subscribe();
    session.mount();

    let collapsed = session.menu().is_collapsed();
    let wanted = match action {
        MenuAction::Toggle => !collapsed,
        MenuAction::Expand => false,
        MenuAction::Collapse => true,
        MenuAction::Status => collapsed,
    };
    if wanted != collapsed {
        let toggle = session.menu().state.toggle.context("menu toggle was not rendered")?;
        session.click(toggle);
    }
    log_notifications(&mut events);
    println!("{}", describe(session.menu().is_collapsed()));
    Ok(())
}

async fn header(site: &SiteConfig, id: &str) -> Result<()> {
    let resolution = image_source_for(site).resolve(id).await;
    let out = json!({
        "page": id,
        "title": site.header.title_for(id),
        "class": site.header.class_for(id),
        "image": resolution.url,
        "attribution": resolution.attribution,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn log_notifications(events: &mut UnboundedReceiver<MenuToggleEvent>) {
    while let Ok(event) = events.try_recv() {
        info!(event = MENU_TOGGLE_EVENT, collapsed = event.collapsed, "notification");
    }
}

fn describe(collapsed: bool) -> &'static str {
    if collapsed { "collapsed" } else { "expanded" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["historia", "render", "/Acadios.html", "--page", "acadios", "--config", "site.yaml"])
            .expect("parse");
        assert_eq!(cli.config.as_deref(), Some(Path::new("site.yaml")));
        match cli.command {
            Command::Render { pathname, page, width, scroll } => {
                assert_eq!(pathname, "/Acadios.html");
                assert_eq!(page.as_deref(), Some("acadios"));
                assert_eq!(width, 1280);
                assert!(scroll.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_menu_actions() {
        let cli = Cli::try_parse_from(["historia", "menu", "collapse"]).expect("parse");
        assert!(matches!(cli.command, Command::Menu { action: MenuAction::Collapse }));
        assert!(Cli::try_parse_from(["historia", "menu", "open"]).is_err());
    }

    #[test]
    fn menu_command_persists_through_store() {
        let site = Arc::new(SiteConfig::default());
        let store: Arc<dyn KeyValueStore> = Arc::new(JsonPreferencesStore::ephemeral());
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let _guard = runtime.enter();

        menu(site.clone(), store.clone(), MenuAction::Collapse).expect("collapse");
        assert_eq!(store.get("navMenuCollapsed").expect("read").as_deref(), Some("true"));
        menu(site.clone(), store.clone(), MenuAction::Collapse).expect("collapse again");
        assert_eq!(store.get("navMenuCollapsed").expect("read").as_deref(), Some("true"));
        menu(site, store.clone(), MenuAction::Toggle).expect("toggle");
        assert_eq!(store.get("navMenuCollapsed").expect("read").as_deref(), Some("false"));
    }

    #[test]
    fn unreadable_preferences_fall_back_to_memory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let site = Arc::new(SiteConfig::default());
        let store = open_store(Some(dir.path().to_path_buf()));
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let _guard = runtime.enter();

        menu(site.clone(), store.clone(), MenuAction::Toggle).expect("toggle");
        assert_eq!(store.get("navMenuCollapsed").expect("read").as_deref(), Some("true"));
        menu(site, store, MenuAction::Status).expect("status");
    }
}
