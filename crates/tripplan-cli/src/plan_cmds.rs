//! CLI handlers for `tripplan plan` subcommands.
//!
//! Implements:
//! - `tripplan plan show <plan-id>`        -- print a saved plan
//! - `tripplan plan list`                  -- list share URLs of saved plans
//! - `tripplan plan edit <plan-id> <edit>` -- apply an edit, save as new snapshot

use anyhow::{Context, Result, bail};

use tripplan_core::editor::PlanEdit;
use tripplan_store::{KeyValueStore, PlanId, PlanStore, StoreError};

use crate::PlanCommands;
use crate::render;

// -----------------------------------------------------------------------
// Public entry point
// -----------------------------------------------------------------------

/// Dispatch a `PlanCommands` variant to the appropriate handler.
pub fn run_plan_command<S: KeyValueStore>(
    command: PlanCommands,
    store: &mut PlanStore<S>,
    base_url: &str,
) -> Result<()> {
    match command {
        PlanCommands::Show { plan_id, json } => cmd_show(store, &plan_id, json),
        PlanCommands::List => cmd_list(store, base_url),
        PlanCommands::Edit { plan_id, edit } => {
            let url = cmd_edit(store, &plan_id, &edit, base_url)?;
            println!("Saved edited plan: {url}");
            Ok(())
        }
    }
}

fn parse_plan_id(plan_id: &str) -> Result<PlanId> {
    plan_id
        .parse()
        .with_context(|| format!("invalid plan ID: {plan_id}"))
}

fn load<S: KeyValueStore>(store: &PlanStore<S>, id: PlanId) -> Result<tripplan_store::Plan> {
    match store.load_plan(id) {
        Ok(plan) => Ok(plan),
        Err(StoreError::NotFound(_)) => {
            bail!("plan {id} not found; it may have been saved to a different store")
        }
        Err(e) => Err(e).with_context(|| format!("failed to load plan {id}")),
    }
}

// -----------------------------------------------------------------------
// tripplan plan show <plan-id>
// -----------------------------------------------------------------------

fn cmd_show<S: KeyValueStore>(store: &PlanStore<S>, plan_id: &str, json: bool) -> Result<()> {
    let id = parse_plan_id(plan_id)?;
    let plan = load(store, id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        println!("Plan {id} ({}, {} days)", plan.kind(), plan.day_count());
        println!();
        print!("{}", render::plan_text(&plan));
    }
    Ok(())
}

// -----------------------------------------------------------------------
// tripplan plan list
// -----------------------------------------------------------------------

fn cmd_list<S: KeyValueStore>(store: &PlanStore<S>, base_url: &str) -> Result<()> {
    let urls = store
        .list_saved_plan_urls(base_url)
        .context("failed to list saved plans")?;

    if urls.is_empty() {
        println!("No saved plans. Use `tripplan generate --save` to create one.");
        return Ok(());
    }
    for url in urls {
        println!("{url}");
    }
    Ok(())
}

// -----------------------------------------------------------------------
// tripplan plan edit <plan-id> <edit>
// -----------------------------------------------------------------------

/// Apply `edit` (a JSON edit command) to a saved plan and save the result
/// under a new identifier. Returns the new share URL.
///
/// Snapshots are immutable: the original plan stays under its own id.
pub fn cmd_edit<S: KeyValueStore>(
    store: &mut PlanStore<S>,
    plan_id: &str,
    edit: &str,
    base_url: &str,
) -> Result<String> {
    let id = parse_plan_id(plan_id)?;
    let edit: PlanEdit = serde_json::from_str(edit).context(
        "invalid edit; expected JSON such as {\"op\":\"move_day_up\",\"index\":1}",
    )?;

    let plan = load(store, id)?;
    let next = edit
        .apply(&plan)
        .with_context(|| format!("cannot apply {} to plan {id}", edit.name()))?;

    let new_id = store.save_plan(&next).context("failed to save edited plan")?;
    tracing::info!(from = %id, to = %new_id, op = edit.name(), "plan edited");
    Ok(tripplan_store::share_url(base_url, new_id))
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
