//! Terms command

use crate::app::{OutputFormat, TermsArgs};
use anyhow::{bail, Result};
use leafwise_core::{QueryTermGenerator, SynonymTable};

pub fn run(args: TermsArgs, format: OutputFormat) -> Result<()> {
    let name = args.name.join(" ");
    if name.trim().is_empty() {
        bail!("condition name must not be empty");
    }

    let generator = QueryTermGenerator::new(SynonymTable::builtin());
    let terms = generator.generate(&name);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&terms)?);
        }
        OutputFormat::Cli => {
            for term in terms {
                println!("{}", term);
            }
        }
    }
    Ok(())
}
