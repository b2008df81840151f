//! Status command

use crate::app::OutputFormat;
use anyhow::Result;
use leafwise_core::{Config, ResolutionEngine};

pub fn run(config: &Config, format: OutputFormat) -> Result<()> {
    let engine = ResolutionEngine::from_config(config)?;
    let providers = engine.provider_names();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "use_remote": config.use_remote,
                "timeout_secs": config.timeout_secs,
                "providers": providers,
                "knowledge_entries": engine.knowledge().len(),
                "credentials": {
                    "gemini": config.credentials.gemini_configured(),
                    "google_search": config.credentials.google_search_configured(),
                    "plantnet": config.credentials.plantnet_configured(),
                },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Cli => {
            println!("Remote lookups:  {}", if config.use_remote { "enabled" } else { "disabled" });
            println!("Timeout:         {}s", config.timeout_secs);
            println!("Local entries:   {}", engine.knowledge().len());
            println!();
            println!("Provider chain:");
            for (i, name) in providers.iter().enumerate() {
                println!("  {}. {}", i + 1, name);
            }
            println!();
            println!("Credentials:");
            println!("  Gemini:        {}", configured(config.credentials.gemini_configured()));
            println!("  Google Search: {}", configured(config.credentials.google_search_configured()));
            println!("  PlantNet:      {}", configured(config.credentials.plantnet_configured()));
        }
    }
    Ok(())
}

fn configured(present: bool) -> &'static str {
    if present {
        "configured"
    } else {
        "not configured"
    }
}
