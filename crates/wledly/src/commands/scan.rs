//! Discovery handler.

use std::collections::HashSet;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Tabled;

use wledly_core::{DiscoveredDevice, Plugin};

use crate::cli::{GlobalOpts, OutputFormat, ScanArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct FoundRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Registered")]
    registered: String,
}

fn spinner(global: &GlobalOpts, budget: Duration) -> Option<ProgressBar> {
    let interactive = matches!(global.output, OutputFormat::Table)
        && !global.quiet
        && std::io::IsTerminal::is_terminal(&std::io::stderr());
    if !interactive {
        return None;
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(format!("Scanning for WLED controllers ({}s)", budget.as_secs()));
    bar.enable_steady_tick(Duration::from_millis(100));
    Some(bar)
}

pub async fn handle(plugin: &Plugin, args: ScanArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let budget = args
        .scan_ms
        .map_or(plugin.config().scan_timeout, Duration::from_millis);

    let bar = spinner(global, budget);
    let found: Vec<DiscoveredDevice> = plugin.scanner().scan(budget).await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let registry = plugin.registry();
    let mut known = HashSet::new();
    for device in &found {
        if registry.has_address(&device.address).await {
            known.insert(device.address.clone());
        }
    }

    let out = output::render_list(
        &global.output,
        &found,
        |d| FoundRow {
            name: d.name.clone(),
            address: d.address.clone(),
            registered: (if known.contains(&d.address) { "yes" } else { "no" }).into(),
        },
        |d| d.address.clone(),
    );
    output::print_output(&out, global.quiet);

    if found.is_empty() && !global.quiet {
        eprintln!("No controllers answered");
    }

    if args.add {
        let added = plugin.adopt(&found).await?;
        if !global.quiet {
            eprintln!("Added {} controller(s)", added.len());
        }
    }
    Ok(())
}
