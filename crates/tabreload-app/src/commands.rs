//! Subcommand handlers

use crate::cli::{ReloadArgs, SetArgs};
use crate::storage::JsonFileStorage;
use anyhow::{bail, Context, Result};
use std::sync::Arc;
use tabreload_background::{Background, ReloadOutcome};
use tabreload_core::menu::MenuItem;
use tabreload_core::types::{TabId, TabInfo, WindowId};
use tabreload_core::{Settings, SettingsStore};
use tabreload_options::OptionsPage;
use tabreload_shell::BrowserShell;
use tokio::task::JoinSet;
use tracing::info;

fn background(shell: &Arc<BrowserShell>, storage: Arc<JsonFileStorage>) -> Background {
    Background::new(shell.clone(), storage, shell.clone())
}

/// Outcome per window, sorted by window, and the tabs reloaded in call order.
struct ReloadRun {
    outcomes: Vec<(WindowId, ReloadOutcome)>,
    order: Vec<TabId>,
}

async fn run_reload(storage: JsonFileStorage, args: ReloadArgs) -> Result<ReloadRun> {
    if args.windows == 0 {
        bail!("--windows must be at least 1");
    }

    let shell = Arc::new(BrowserShell::new());
    let background = background(&shell, Arc::new(storage));
    background.on_startup().await;

    let mut clicks = Vec::new();
    for _ in 0..args.windows {
        let (window_id, tabs) = shell.open_window_with_tabs(args.tabs);
        info!(%window_id, tab_count = tabs.len(), "opened window");
        // An empty window still gets a click, from a tab without an id.
        let clicked = tabs
            .first()
            .and_then(|id| shell.get_tab(*id))
            .unwrap_or(TabInfo {
                id: None,
                window_id,
                url: None,
                title: None,
            });
        clicks.push(clicked);
    }
    for id in &args.fail {
        shell.fail_reload(TabId(*id));
    }

    let mut tasks = JoinSet::new();
    for tab in clicks {
        let background = background.clone();
        tasks.spawn(async move {
            let outcome = background.on_action_clicked(&tab).await;
            (tab.window_id, outcome)
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        results.push(joined.context("reload task panicked")?);
    }
    results.sort_by_key(|(window_id, _)| *window_id);

    Ok(ReloadRun {
        outcomes: results,
        order: shell.reloads(),
    })
}

pub async fn reload(storage: JsonFileStorage, args: ReloadArgs) -> Result<()> {
    let run = run_reload(storage, args).await?;

    for (window_id, outcome) in run.outcomes {
        match outcome {
            ReloadOutcome::Completed(report) => println!(
                "window {}: reloaded {}, failed {}, skipped {}",
                window_id, report.reloaded, report.failed, report.skipped_without_id
            ),
            ReloadOutcome::Skipped => println!("window {}: already reloading", window_id),
            ReloadOutcome::Aborted => println!("window {}: could not list tabs", window_id),
        }
    }

    let order: Vec<String> = run.order.iter().map(ToString::to_string).collect();
    println!("reload order: [{}]", order.join(", "));
    Ok(())
}

pub async fn show_options(storage: JsonFileStorage) -> Result<()> {
    let settings = SettingsStore::load(&storage).await;
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

/// Apply the edits the way the options page does. `None` when nothing changed.
async fn apply_options(storage: &JsonFileStorage, args: SetArgs) -> Result<Option<Settings>> {
    let menus = BrowserShell::new();
    let mut page = OptionsPage::open(storage, &menus).await;

    if let Some(delay) = args.delay {
        page.form.delay = delay;
    }
    if let Some(start) = args.range_start {
        page.form.advanced_delay_range_start = start;
    }
    if let Some(end) = args.range_end {
        page.form.advanced_delay_range_end = end;
    }
    if let Some(advanced) = args.advanced {
        page.form.use_advanced_options = advanced;
    }
    if let Some(page_menu) = args.page_menu {
        page.form.show_page_context_menu_item = page_menu;
    }

    if !page.is_dirty() {
        return Ok(None);
    }

    let result = page.save(storage, &menus).await;
    println!("{}", page.status());
    result.with_context(|| format!("writing {}", storage.path().display()))?;
    Ok(Some(page.saved().clone()))
}

pub async fn set_options(storage: JsonFileStorage, args: SetArgs) -> Result<()> {
    match apply_options(&storage, args).await? {
        Some(saved) => println!("{}", serde_json::to_string_pretty(&saved)?),
        None => println!("No changes."),
    }
    Ok(())
}

async fn registered_menus(storage: JsonFileStorage) -> Vec<MenuItem> {
    let shell = Arc::new(BrowserShell::new());
    background(&shell, Arc::new(storage)).on_startup().await;
    shell.menus()
}

pub async fn menus(storage: JsonFileStorage) -> Result<()> {
    for item in registered_menus(storage).await {
        let contexts: Vec<String> = item
            .contexts
            .iter()
            .map(|c| format!("{:?}", c).to_lowercase())
            .collect();
        println!("{:<36} [{}] {}", item.id, contexts.join(","), item.title);
    }
    Ok(())
}
