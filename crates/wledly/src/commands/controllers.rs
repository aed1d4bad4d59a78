//! Controller registry command handlers.

use chrono::{DateTime, Local};
use futures_util::future::join_all;
use serde::Serialize;
use tabled::Tabled;

use wledly_core::{Controller, Plugin};

use crate::cli::{ControllersArgs, ControllersCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ControllerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Added")]
    added: String,
    #[tabled(rename = "Online")]
    online: String,
}

/// A controller plus its reachability, when probed.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ControllerView {
    #[serde(flatten)]
    controller: Controller,
    #[serde(skip_serializing_if = "Option::is_none")]
    online: Option<bool>,
}

fn added_at(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms).map_or_else(
        || "-".into(),
        |t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
    )
}

fn row(view: &ControllerView, color: bool) -> ControllerRow {
    let c = &view.controller;
    ControllerRow {
        id: c.id.to_string(),
        name: c.display_name.clone(),
        address: c.address.clone(),
        added: added_at(c.added_at),
        online: match view.online {
            Some(true) => output::status(true, "yes", color),
            Some(false) => output::status(false, "no", color),
            None => "-".into(),
        },
    }
}

fn detail(c: &Controller) -> String {
    [
        format!("ID:      {}", c.id),
        format!("Name:    {}", c.display_name),
        format!("Address: {}", c.address),
        format!("Added:   {}", added_at(c.added_at)),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    plugin: &Plugin,
    args: ControllersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let registry = plugin.registry();

    match args.command {
        ControllersCommand::List { probe } => {
            let controllers = registry.list().await;

            let online: Vec<Option<bool>> = if probe {
                let connector = registry.connector();
                join_all(controllers.iter().map(|c| async move {
                    match connector.connect(&c.address) {
                        Ok(client) => Some(client.is_online().await),
                        Err(_) => Some(false),
                    }
                }))
                .await
            } else {
                vec![None; controllers.len()]
            };

            let views: Vec<ControllerView> = controllers
                .into_iter()
                .zip(online)
                .map(|(controller, online)| ControllerView { controller, online })
                .collect();

            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &views,
                |v| row(v, color),
                |v| v.controller.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ControllersCommand::Add { address, name } => {
            let existed = registry.has_address(&address).await;
            let controller = registry.add(&address, name.as_deref()).await?;

            let out = output::render_single(&global.output, &controller, detail, |c| {
                c.id.to_string()
            });
            output::print_output(&out, global.quiet);
            if !global.quiet {
                if existed {
                    eprintln!("Controller already registered");
                } else {
                    eprintln!("Controller added");
                }
            }
            Ok(())
        }

        ControllersCommand::Remove { controller } => {
            let found = util::resolve_controller(registry, &controller).await?;
            let prompt = format!(
                "Remove controller {} ({})?",
                found.display_name, found.address
            );
            if !util::confirm(&prompt, global.yes, "controllers remove")? {
                return Ok(());
            }

            registry.remove(&found.id).await?;
            if !global.quiet {
                eprintln!("Controller removed");
            }
            Ok(())
        }
    }
}
