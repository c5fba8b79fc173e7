//! Pinned-competitor commands. Pins live on the backend, so these need it.

use clap::Subcommand;
use serde::Serialize;
use studiobench_core::{AppConfig, EngineConfig};
use studiobench_engine::dashboard::all_offers;
use studiobench_engine::{rank_competitors, PinSet, Toggle};

use crate::output::{print_json, print_warnings, Output};
use crate::source::{backend_client, load_snapshot};

/// Sub-commands available under `pins`.
#[derive(Debug, Subcommand)]
pub enum PinsCommands {
    /// Show the pinned competitor ids
    List,
    /// Pin a competitor, or unpin it when already pinned
    Toggle {
        /// Competitor id
        id: String,
    },
    /// Pin the top-ranked competitors until the pin limit is reached
    PinTop,
}

#[derive(Debug, Serialize)]
struct PinsOutput<'a> {
    competitor_ids: &'a [String],
    limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    change: Option<String>,
}

/// Dispatch a `pins` sub-command.
///
/// # Errors
///
/// Returns an error when a data directory is configured, when the backend
/// cannot be reached, or when a toggle would exceed the pin limit.
pub(crate) async fn run_pins(
    config: &AppConfig,
    engine: &EngineConfig,
    out: Output,
    command: PinsCommands,
) -> anyhow::Result<()> {
    if let Some(dir) = &config.data_dir {
        anyhow::bail!(
            "pins are stored on the backend; unset --data-dir ({}) to manage them",
            dir.display()
        );
    }

    match command {
        PinsCommands::List => run_pins_list(config, engine, out).await,
        PinsCommands::Toggle { id } => run_pins_toggle(config, engine, out, &id).await,
        PinsCommands::PinTop => run_pins_top(config, engine, out).await,
    }
}

async fn run_pins_list(config: &AppConfig, engine: &EngineConfig, out: Output) -> anyhow::Result<()> {
    let client = backend_client(config)?;
    let pins = PinSet::from_ids(client.fetch_pins().await?, engine.pin_limit);
    emit(out, config, &pins, None)
}

async fn run_pins_toggle(
    config: &AppConfig,
    engine: &EngineConfig,
    out: Output,
    id: &str,
) -> anyhow::Result<()> {
    let client = backend_client(config)?;
    let mut pins = PinSet::from_ids(client.fetch_pins().await?, engine.pin_limit);
    let change = match pins.toggle(id)? {
        Toggle::Pinned => format!("pinned {}", id.trim()),
        Toggle::Unpinned => format!("unpinned {}", id.trim()),
    };

    let stored = client.save_pins(pins.ids()).await?;
    let pins = PinSet::from_ids(stored, engine.pin_limit);
    tracing::info!(change = %change, pinned = pins.len(), "pins updated");
    emit(out, config, &pins, Some(change))
}

async fn run_pins_top(config: &AppConfig, engine: &EngineConfig, out: Output) -> anyhow::Result<()> {
    let loaded = load_snapshot(config).await?;
    if !out.is_json() {
        print_warnings(&loaded.warnings);
    }

    let (own, offers) = all_offers(&loaded.snapshot, engine);
    let ranking = rank_competitors(&loaded.snapshot.competitors, &own, &offers, engine);
    let mut pins = PinSet::from_ids(loaded.snapshot.pinned_ids.iter(), engine.pin_limit);
    let added = pins.pin_all(ranking.pin_worthy_ids.iter());

    let change = if added == 0 {
        "nothing new to pin".to_string()
    } else {
        let client = backend_client(config)?;
        let stored = client.save_pins(pins.ids()).await?;
        pins = PinSet::from_ids(stored, engine.pin_limit);
        format!("pinned {added} top competitors")
    };
    tracing::info!(added, pinned = pins.len(), "pin-top finished");
    emit(out, config, &pins, Some(change))
}

fn emit(
    out: Output,
    config: &AppConfig,
    pins: &PinSet,
    change: Option<String>,
) -> anyhow::Result<()> {
    if out.is_json() {
        let data = PinsOutput {
            competitor_ids: pins.ids(),
            limit: pins.limit(),
            change,
        };
        return print_json(
            "pins",
            &format!("backend {}", config.backend_url),
            &[],
            &data,
        );
    }

    if let Some(change) = change {
        println!("{change}");
    }
    if pins.is_empty() {
        println!("no pinned competitors");
    } else {
        println!("pinned ({}/{}):", pins.len(), pins.limit());
        for id in pins.ids() {
            println!("  {id}");
        }
    }
    Ok(())
}
