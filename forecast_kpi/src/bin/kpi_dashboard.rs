use anyhow::Context;
use clap::Parser;
use forecast_kpi::data::DatasetLoader;
use forecast_kpi::export::{export_all, write_json};
use forecast_kpi::render::render_report;
use forecast_kpi::report::Report;
use forecast_kpi::settings::{load_settings, OutputFormat, Settings};
use forecast_kpi::utils::generate_demo_dataset;
use forecast_kpi::ForecastDataset;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const MISSING_INPUT_PROMPT: &str = "Upload the demo_forecast_kpis_completo.xlsx file \
or your own file with the same sheet structure (--input <PATH>), or run with --demo.";

/// Forecast error KPI dashboard for forecast accuracy spreadsheets.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Spreadsheet (.xlsx) or CSV file with forecast records.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Workbook sheet to read (default "Datos y Métricas").
    #[arg(long)]
    sheet: Option<String>,

    /// Number of SKUs in the WMAPE ranking.
    #[arg(long)]
    top_n: Option<usize>,

    /// Group metric shown in the heatmap (MAPE_pct, MAE, RMSE, WMAPE_pct, SMAPE_pct, MASE).
    #[arg(long)]
    heatmap_metric: Option<String>,

    /// Output format written to stdout.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Directory to export report.json, group_kpis.csv and alerts.csv into.
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Settings file (TOML). Defaults to ./kpi_dashboard.toml when present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use a generated demo dataset instead of an input file.
    #[arg(long)]
    demo: bool,

    /// Rows in the demo dataset.
    #[arg(long, default_value_t = 600)]
    demo_rows: usize,

    /// Seed of the demo dataset.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so JSON output on stdout stays clean
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Command-line flags win over file and environment settings
fn apply_overrides(mut settings: Settings, cli: &Cli) -> anyhow::Result<Settings> {
    if let Some(input) = &cli.input {
        settings.input = Some(input.clone());
    }
    if let Some(sheet) = &cli.sheet {
        settings.sheet_name = sheet.clone();
    }
    if let Some(top_n) = cli.top_n {
        settings.top_n = top_n;
    }
    if let Some(metric) = &cli.heatmap_metric {
        settings.heatmap_metric = metric.parse()?;
    }
    if let Some(format) = cli.format {
        settings.output_format = format;
    }
    if let Some(dir) = &cli.export_dir {
        settings.export_dir = Some(dir.clone());
    }

    settings.validate()?;
    Ok(settings)
}

fn load_dataset(cli: &Cli, settings: &Settings) -> anyhow::Result<Option<ForecastDataset>> {
    if cli.demo {
        info!("Using demo dataset ({} rows, seed {})", cli.demo_rows, cli.seed);
        return Ok(Some(generate_demo_dataset(cli.demo_rows, cli.seed)?));
    }

    match &settings.input {
        Some(path) => {
            let dataset = DatasetLoader::from_path(path, Some(&settings.sheet_name))
                .with_context(|| format!("Failed to load {}", path.display()))?;
            Ok(Some(dataset))
        }
        None => Ok(None),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = load_settings(cli.config.as_deref()).context("Failed to load settings")?;
    let settings = apply_overrides(settings, &cli)?;

    let Some(dataset) = load_dataset(&cli, &settings)? else {
        // No input is an expected state, not a failure
        println!("{}", MISSING_INPUT_PROMPT);
        return Ok(());
    };

    let report = Report::generate(&dataset, &settings.report_options());

    match settings.output_format {
        OutputFormat::Table => println!("{}", render_report(&report)),
        OutputFormat::Json => {
            let mut stdout = io::stdout().lock();
            write_json(&report, &mut stdout)?;
            writeln!(stdout)?;
        }
    }

    if let Some(dir) = &settings.export_dir {
        let written = export_all(&report, dir)
            .with_context(|| format!("Failed to export report to {}", dir.display()))?;
        for path in written {
            info!("Wrote {}", path.display());
        }
    }

    Ok(())
}
