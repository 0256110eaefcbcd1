//! Incremental Risk Charge CLI
//!
//! Prepares a portfolio table, runs the Monte-Carlo simulator, and
//! reports 99.9th-percentile IRC, RWA, and (unless suppressed) per-issuer
//! attribution.

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use irc_engine::io::{read_fx_rates, read_position_rows, write_report, FxFormat};
use irc_engine::{quick_irc, CancellationToken, FxRates, IrcConfig, IrcError, ReferenceData};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(name = "irc-engine", version, about = "Monte-Carlo Incremental Risk Charge engine")]
struct Cli {
    /// Path to the portfolio CSV.
    #[arg(long)]
    input: String,

    /// As-of date (YYYY-MM-DD), required when input rows give maturity
    /// dates rather than tenors.
    #[arg(long = "as-of")]
    as_of: Option<String>,

    /// Reference currency all monetary amounts are converted to.
    #[arg(long, default_value = "USD")]
    currency: String,

    /// Path to an FX rates JSON file.
    #[arg(long = "fx-rates")]
    fx_rates: Option<String>,

    /// FX JSON shape: `to_reference` or `market`. Sniffed when omitted.
    #[arg(long = "fx-format")]
    fx_format: Option<String>,

    /// Number of Monte-Carlo paths.
    #[arg(long, default_value_t = 100_000)]
    simulations: usize,

    /// Optional CSV path to write the summary and issuer-attribution blocks to.
    #[arg(long)]
    output: Option<String>,

    /// Skip the per-issuer standalone/marginal attribution pass.
    #[arg(long = "no-issuer-breakdown")]
    no_issuer_breakdown: bool,

    /// Suppress informational console output.
    #[arg(long)]
    quiet: bool,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let as_of_date = cli
        .as_of
        .as_deref()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .transpose()
        .context("invalid --as-of date, expected YYYY-MM-DD")?;

    let rows = read_position_rows(&cli.input).context("reading --input")?;

    let fx = match &cli.fx_rates {
        Some(path) => {
            let format = cli.fx_format.as_deref().and_then(FxFormat::parse);
            read_fx_rates(path, format, &cli.currency).context("reading --fx-rates")?
        }
        None => FxRates::new(),
    };

    let reference_data = ReferenceData::standard().context("loading reference data")?;

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(irc_engine::orchestrator::DEFAULT_SEED);
    if !cli.quiet {
        log::info!("using seed {seed}");
    }

    let config = IrcConfig {
        num_simulations: cli.simulations,
        seed,
        reference_currency: cli.currency.clone(),
        sector_matrix_overrides: HashMap::new(),
        region_matrix_overrides: HashMap::new(),
        compute_attribution: !cli.no_issuer_breakdown,
        attribution_simulations: None,
    };

    let cancellation = CancellationToken::new();
    let run = quick_irc(&rows, as_of_date, &fx, &reference_data, &config, &cancellation)?;

    if !cli.quiet {
        println!("IRC:                    {:.2}", run.result.irc);
        println!("RWA:                    {:.2}", run.result.rwa);
        println!("percentile_95:          {:.2}", run.result.percentile_95);
        println!("percentile_99:          {:.2}", run.result.percentile_99);
        println!("percentile_999:         {:.2}", run.result.percentile_999);
        println!("expected_shortfall_999: {:.2}", run.result.expected_shortfall_999);
        println!("mean_loss:              {:.2}", run.result.mean_loss);
        if let Some(attribution) = &run.attribution {
            println!("diversification_benefit: {:.2}", attribution.diversification_benefit);
            println!("\nIssuer attribution:");
            for row in &attribution.issuers {
                println!(
                    "  {:<16} standalone={:>14.2} marginal={:>14.2} pct_of_total={:>6.2}%",
                    row.issuer,
                    row.standalone_irc,
                    row.marginal_irc,
                    row.pct_of_total * 100.0
                );
            }
        }
        if !run.diagnostics.is_empty() {
            println!("\n{} row(s) dropped during preparation:", run.diagnostics.len());
            for d in &run.diagnostics {
                println!("  row {}: {}", d.row_index, d.reason);
            }
        }
    }

    if let Some(output_path) = &cli.output {
        write_report(output_path, &run.result, run.attribution.as_ref()).context("writing --output")?;
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            if let Some(irc_err) = err.downcast_ref::<IrcError>() {
                if matches!(irc_err, IrcError::Cancelled) {
                    eprintln!("run cancelled");
                    std::process::exit(1);
                }
                eprintln!("error: {err:#}");
                std::process::exit(irc_err.exit_code());
            }
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}
