use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use listing_insights::presentation::{self, ChartSlots, JsonFileBackend, MetricCards};
use listing_insights::{export, snapshot};
use listing_insights::{Dashboard, Endpoint, Environment, Listing, ListingInsights, Theme};

#[derive(Parser)]
#[command(version, about = "Search marketplace listings and analyze their prices")]
struct Cli {
    /// Directory holding search history and preferences.
    #[arg(long, global = true, value_name = "DIR", env = "LISTING_INSIGHTS_DATA_DIR")]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Search listings and print the dashboard.
    Search(SearchCmd),
    /// Analyze a saved snapshot without touching the network.
    Analyze(AnalyzeCmd),
    /// Show or clear the search history.
    History {
        #[arg(long)]
        clear: bool,
    },
    /// Show or change the chart theme.
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Write chart specs as JSON files into this directory.
    #[arg(long, value_name = "DIR")]
    charts_dir: Option<PathBuf>,
    /// Print the dashboard as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SearchCmd {
    query: String,
    /// Write the results table as CSV (`-` picks a name from the query).
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,
    /// Save the raw listings for later `analyze` runs (`.gz` compresses).
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,
    /// Keep price outliers in the results.
    #[arg(long)]
    keep_outliers: bool,
    /// Send searches to a proxy backend instead of the Browse API.
    #[arg(long, value_name = "URL")]
    proxy: Option<String>,
    /// Use the Browse API sandbox.
    #[arg(long, conflicts_with = "proxy")]
    sandbox: bool,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct AnalyzeCmd {
    snapshot: PathBuf,
    /// Query shown in the dashboard title.
    #[arg(long, default_value = "snapshot")]
    query: String,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeAction {
    Toggle,
    Light,
    Dark,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("listing_insights=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Search(cmd) => {
            let endpoint = match (&cmd.proxy, cmd.sandbox) {
                (Some(url), _) => Endpoint::Proxy(url.clone()),
                (None, true) => Endpoint::Browse(Environment::Sandbox),
                (None, false) => Endpoint::Browse(Environment::Production),
            };
            let insights = open(cli.data_dir, endpoint, !cmd.keep_outliers)?;
            let results = insights.search(&cmd.query)?;

            if let Some(path) = &cmd.csv {
                let path = if path.as_os_str() == "-" {
                    PathBuf::from(results.csv_filename())
                } else {
                    path.clone()
                };
                std::fs::write(&path, results.to_csv()?)
                    .with_context(|| format!("writing {}", path.display()))?;
                eprintln!("CSV written to {}", path.display());
            }
            if let Some(path) = &cmd.snapshot {
                snapshot::save_snapshot(path, &results.listings)?;
            }

            let theme = insights.preferences().theme();
            report(&results.query, &results.listings, theme, &cmd.output)?;
        }
        Cmd::Analyze(cmd) => {
            let insights = open(cli.data_dir, Endpoint::default(), false)?;
            let listings = snapshot::load_snapshot(&cmd.snapshot)
                .with_context(|| format!("loading {}", cmd.snapshot.display()))?;
            if listings.is_empty() {
                anyhow::bail!("snapshot {} has no listings", cmd.snapshot.display());
            }
            let theme = insights.preferences().theme();
            report(&cmd.query, &listings, theme, &cmd.output)?;
        }
        Cmd::History { clear } => {
            let insights = open(cli.data_dir, Endpoint::default(), false)?;
            if clear {
                insights.history().clear()?;
                println!("Search history cleared.");
                return Ok(());
            }
            let entries = insights.history().list();
            if entries.is_empty() {
                println!("No search history yet.");
            }
            for entry in entries {
                println!("{}\t{}", entry.timestamp, entry.query);
            }
        }
        Cmd::Theme { action } => {
            let insights = open(cli.data_dir, Endpoint::default(), false)?;
            let prefs = insights.preferences();
            let theme = match action {
                None => prefs.theme(),
                Some(ThemeAction::Toggle) => prefs.toggle_theme()?,
                Some(ThemeAction::Light) => {
                    prefs.set_theme(Theme::Light)?;
                    Theme::Light
                }
                Some(ThemeAction::Dark) => {
                    prefs.set_theme(Theme::Dark)?;
                    Theme::Dark
                }
            };
            println!("{theme}");
        }
    }

    Ok(())
}

fn open(
    data_dir: Option<PathBuf>,
    endpoint: Endpoint,
    remove_outliers: bool,
) -> Result<ListingInsights> {
    let mut builder = ListingInsights::builder()
        .endpoint(endpoint)
        .remove_outliers(remove_outliers);
    if let Some(dir) = data_dir {
        builder = builder.data_dir(dir);
    }
    Ok(builder.build()?)
}

fn report(query: &str, listings: &[Listing], theme: Theme, output: &OutputArgs) -> Result<()> {
    let dashboard = Dashboard::build(listings);

    if let Some(dir) = &output.charts_dir {
        render_charts(dir, &dashboard, theme)?;
    }

    if output.json {
        let body = json!({
            "title": presentation::dashboard_title(query),
            "metrics": MetricCards::from(&dashboard.statistics),
            "dashboard": dashboard,
            "rows": presentation::table_rows(listings),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let metrics = MetricCards::from(&dashboard.statistics);
    println!("{}", presentation::dashboard_title(query));
    println!("  Total listings: {}", metrics.total_listings);
    println!("  Average price:  {}", metrics.average_price);
    println!("  Median price:   {}", metrics.median_price);
    println!("  Min price:      {}", metrics.min_price);
    println!("  Max price:      {}", metrics.max_price);
    let counts = &dashboard.condition_counts;
    println!(
        "  New / Used / Other: {} / {} / {}",
        counts.new, counts.used, counts.other
    );
    println!();

    for row in presentation::table_rows(listings) {
        println!("{}", row.cells().join("\t"));
    }
    println!();
    println!("Export as {}", export::csv_filename(query));
    Ok(())
}

fn render_charts(dir: &Path, dashboard: &Dashboard, theme: Theme) -> Result<()> {
    let backend = JsonFileBackend::new(dir)?;
    let mut slots = ChartSlots::new(backend);
    let report = slots.render_dashboard(dashboard, theme)?;
    eprintln!(
        "Charts written to {} ({} rendered, {} skipped)",
        dir.display(),
        report.rendered.len(),
        report.skipped.len()
    );
    Ok(())
}
