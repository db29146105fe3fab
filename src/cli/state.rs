//! `toolbench state`: inspect or clear saved tool inputs.

use anyhow::{Result, bail};

use super::args::StateAction;
use super::common::print_stdout;
use crate::config::ToolbenchConfig;
use crate::log;
use crate::store::StateStore;
use crate::tools::ToolKind;

pub fn run(action: &StateAction, config: &ToolbenchConfig) -> Result<()> {
    let mut store = StateStore::from_config(&config.store);
    if !store.is_enabled() {
        bail!("State persistence is disabled (`[store] enable = false`)");
    }
    execute(action, &mut store)
}

fn execute(action: &StateAction, store: &mut StateStore) -> Result<()> {
    match action {
        StateAction::List => print_stdout(&listing(store)),
        StateAction::Show { key } => {
            let key = storage_key(key);
            let Some(value) = store.get(key) else {
                bail!("Nothing saved under `{key}`");
            };
            print_stdout(&serde_json::to_string_pretty(value)?)
        }
        StateAction::Clear { key: Some(key) } => {
            let key = storage_key(key);
            if store.remove(key)? {
                log!("state"; "cleared {key}");
            } else {
                log!("state"; "nothing saved under {key}");
            }
            Ok(())
        }
        StateAction::Clear { key: None } => {
            let count = store.len();
            store.clear()?;
            log!("state"; "cleared {}", crate::utils::plural_count(count, "saved input"));
            Ok(())
        }
    }
}

/// Accept a tool slug wherever a storage key is expected.
fn storage_key(key: &str) -> &str {
    ToolKind::from_slug(key).map_or(key, |kind| kind.info().storage_key)
}

/// One line per entry: key, then the owning tool's slug when known.
fn listing(store: &StateStore) -> String {
    if store.is_empty() {
        return "(no saved inputs)".to_string();
    }
    store
        .keys()
        .map(|key| {
            let tool = ToolKind::ALL
                .into_iter()
                .find(|kind| kind.info().storage_key == key)
                .map_or("?", ToolKind::slug);
            format!("{key:<24} {tool}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
