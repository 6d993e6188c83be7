use anyhow::Context;
use taxrisk_config::TaxRiskConfig;
use taxrisk_engine::quarterly::{self, QuarterlyRiskInput};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::QuarterlyArgs;
use crate::commands::shared::parse::read_json;
use crate::output::output;

/// Handle `taxrisk quarterly`.
pub fn handle(args: &QuarterlyArgs, config: &TaxRiskConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let input = input_from_args(args)?;
    let assessment = quarterly::assess(&input, &config.quarterly)?;
    output(&assessment, flags.format)
}

fn input_from_args(args: &QuarterlyArgs) -> anyhow::Result<QuarterlyRiskInput> {
    if let Some(file) = &args.input {
        let value = read_json(file)?;
        return serde_json::from_value(value)
            .with_context(|| format!("{file} is not a quarterly input document"));
    }

    if args.quarter.is_empty() {
        anyhow::bail!("provide --input <file> or --quarter/--penalty/--late series");
    }
    Ok(QuarterlyRiskInput {
        quarters: args.quarter.clone(),
        penalty_per_year: args.penalty.clone(),
        percent_returns_late: args.late.clone(),
    })
}
