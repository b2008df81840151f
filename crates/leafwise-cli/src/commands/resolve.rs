//! Resolve command

use crate::app::{OutputFormat, ResolveArgs};
use anyhow::{bail, Result};
use leafwise_core::{Config, InformationRecord, ResolutionEngine, Variant};

pub async fn run(args: ResolveArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let name = args.name.join(" ");
    if name.trim().is_empty() {
        bail!("condition name must not be empty");
    }

    let image = match &args.image {
        Some(path) => Some(std::fs::read(path)?),
        None => None,
    };

    let mut config = config.clone();
    if args.offline {
        config.use_remote = false;
    }

    let engine = ResolutionEngine::from_config(&config)?;
    let record = engine.resolve(&name, image).await;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        OutputFormat::Cli => print_record(&name, &record),
    }
    Ok(())
}

fn print_record(name: &str, record: &InformationRecord) {
    let variant = if Variant::classify(name).is_healthy() {
        "healthy"
    } else {
        "diseased"
    };
    println!("{} ({})", name, variant);
    println!("Source: {}", record.source);
    println!();
    println!("{}", record.description);

    print_section("Causes", &record.causes);
    print_section("Effects", &record.effects);
    print_section("Solutions", &record.solutions);
    print_section("Prevention", &record.prevention);

    if !record.metadata.is_empty() {
        println!();
        let mut keys: Vec<_> = record.metadata.keys().collect();
        keys.sort();
        for key in keys {
            println!("{}: {}", key, record.metadata[key]);
        }
    }
}

fn print_section(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{}:", title);
    for item in items {
        println!("  - {}", item);
    }
}
