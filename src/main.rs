//! propdash main entry point

use anyhow::{anyhow, bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use propdash_config::{Config, TimeRange};
use propdash_core::{
    compute_stats, filter_records, flatten, investment_metrics, record_count, search_records, Choice, Domain,
    FilterCriteria, Flow, InvestmentInputs, PropertyDirectory, RecordGroup, RecordStore, TimeContext,
};
use propdash_export::{
    document_columns, expense_columns, payment_columns, transaction_columns, ColumnDef, DirectorySink, ExportContext,
    ExportFormat, Exporter, LogNotifier,
};
use propdash_store::{demo_dataset, Dataset, DefaultFixtureLoader, LoaderRef};
use propdash_utils::parse_iso_date;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;

const DEFAULT_CONFIG: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(name = "propdash")]
#[command(version = "0.1.0")]
#[command(about = "Filter, summarise and export property-management records", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./config.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Ignore fixture files and use the built-in demo dataset
    #[arg(long, global = true)]
    demo: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print dashboard statistics as JSON
    Stats {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// List matching records, one page at a time
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Export matching records to CSV, PDF or XLSX
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// csv, pdf or xlsx
        #[arg(short, long)]
        format: ExportFormat,
        /// Column preset for CSV: documents, transactions, payments, expenses
        #[arg(long, default_value = "transactions")]
        columns: String,
        /// Only export records of this domain
        #[arg(long)]
        domain: Option<Domain>,
        /// Report name used in the CSV filename
        #[arg(long)]
        report: Option<String>,
        /// Output directory (overrides export.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compute rental investment metrics
    Invest(InvestArgs),
    /// Write the default configuration file
    InitConfig {
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        output: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Category, or "All Categories"
    #[arg(long)]
    category: Option<String>,
    /// Property id or name, or "All Properties"
    #[arg(long)]
    property: Option<String>,
    #[arg(long)]
    status: Option<String>,
    /// income or expense
    #[arg(long = "type")]
    record_type: Option<String>,
    #[arg(long)]
    file_type: Option<String>,
    /// Inclusive start date, YYYY-MM-DD
    #[arg(long)]
    from: Option<String>,
    /// Inclusive end date, YYYY-MM-DD
    #[arg(long)]
    to: Option<String>,
    /// month, quarter, year or all (defaults to time_range.default_range)
    #[arg(long)]
    range: Option<TimeRange>,
    /// Free-text search over names, categories, properties and tags
    #[arg(long)]
    search: Option<String>,
}

#[derive(Args, Debug)]
struct InvestArgs {
    #[arg(long)]
    price: f64,
    #[arg(long)]
    down: f64,
    /// Annual interest rate in percent
    #[arg(long)]
    rate: f64,
    #[arg(long, default_value_t = 25)]
    years: u32,
    #[arg(long)]
    rent: f64,
    /// Monthly operating expenses
    #[arg(long, default_value_t = 0.0)]
    expenses: f64,
    #[arg(long, default_value_t = 0.0)]
    closing: f64,
    /// Annual appreciation in percent
    #[arg(long, default_value_t = 0.0)]
    appreciation: f64,
}

/// Put the error's hints under its context line
fn with_hints<E>(err: E, context: String, hints: &[String]) -> anyhow::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    let mut message = context;
    for hint in hints {
        message.push_str("\n  hint: ");
        message.push_str(hint);
    }
    anyhow::Error::new(err).context(message)
}

fn load_config_file(path: &Path) -> anyhow::Result<Config> {
    Config::load(path).map_err(|e| {
        let hints = e.suggestions();
        with_hints(e, format!("Failed to load configuration from {}", path.display()), &hints)
    })
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => load_config_file(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG);
            if default.exists() {
                load_config_file(default)
            } else {
                Ok(Config::default())
            }
        }
    }
}

fn build_store(dataset: Dataset) -> anyhow::Result<RecordStore> {
    dataset.into_store().map_err(|e| {
        let details = e.to_details();
        with_hints(e, "Failed to build record store".to_string(), &details.suggestions)
    })
}

fn init_logging(config: &Config) {
    let env = env_logger::Env::default().default_filter_or(config.logging.level.to_lowercase());
    env_logger::Builder::from_env(env).init();
}

async fn load_dataset(config: &Config, demo: bool) -> anyhow::Result<Dataset> {
    if demo {
        log::info!("Using built-in demo dataset");
        return Ok(demo_dataset());
    }

    let loader: LoaderRef = Arc::new(DefaultFixtureLoader);
    match loader.load_pattern(config.data.path.clone(), &config.data.fixtures).await {
        Ok(dataset) => Ok(dataset),
        Err(e) if e.is_missing_data() && config.data.use_demo_data => {
            log::warn!("{}; falling back to the demo dataset", e);
            Ok(demo_dataset())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load fixtures from {}", config.fixture_pattern().display())),
    }
}

fn parse_date(label: &str, value: Option<&str>) -> anyhow::Result<Option<NaiveDate>> {
    match value {
        None => Ok(None),
        Some(raw) => parse_iso_date(raw)
            .map(Some)
            .ok_or_else(|| anyhow!("--{} must be a YYYY-MM-DD date, got '{}'", label, raw)),
    }
}

fn build_criteria(
    args: &FilterArgs,
    config: &Config,
    properties: &PropertyDirectory,
    today: NaiveDate,
) -> anyhow::Result<FilterCriteria> {
    let mut criteria = FilterCriteria::new();

    if let Some(ref category) = args.category {
        criteria.category = Choice::parse(category).unwrap_or_default();
    }
    if let Some(ref status) = args.status {
        criteria.status = Choice::parse(status).unwrap_or_default();
    }
    if let Some(ref file_type) = args.file_type {
        criteria.file_type = Choice::parse(file_type).unwrap_or_default();
    }
    if let Some(ref record_type) = args.record_type {
        criteria.record_type = Choice::<Flow>::parse(record_type).map_err(anyhow::Error::msg)?;
    }
    if let Some(ref property) = args.property {
        if let Choice::Only(reference) = Choice::<String>::parse(property).unwrap_or_default() {
            let id = properties
                .resolve(&reference)
                .ok_or_else(|| anyhow!("Unknown property '{}'", reference))?;
            criteria.property = Choice::Only(id);
        }
    }

    let from = parse_date("from", args.from.as_deref())?;
    let to = parse_date("to", args.to.as_deref())?;
    let window = if from.is_some() || to.is_some() {
        TimeContext::custom(from, to)
    } else {
        TimeContext::new(args.range.unwrap_or(config.time_range.default_range))
    };
    log::debug!("Time window: {}", window.description());

    Ok(criteria.within(&window, today))
}

/// Filter, then search
fn select(store: &RecordStore, args: &FilterArgs, config: &Config) -> anyhow::Result<(FilterCriteria, Vec<RecordGroup>)> {
    let today = Local::now().date_naive();
    let criteria = build_criteria(args, config, store.properties(), today)?;
    let filtered = filter_records(store.groups(), &criteria);
    let groups = match args.search {
        Some(ref term) => search_records(&filtered, term, store.properties()),
        None => filtered,
    };
    log::info!("{} of {} records match", record_count(&groups), store.len());
    Ok((criteria, groups))
}

fn only_domain(groups: Vec<RecordGroup>, domain: Domain) -> Vec<RecordGroup> {
    groups
        .into_iter()
        .map(|mut group| {
            group.records.retain(|r| r.domain == domain);
            group
        })
        .collect()
}

fn column_preset(name: &str) -> anyhow::Result<(Vec<ColumnDef>, Domain)> {
    match name.to_lowercase().as_str() {
        "documents" => Ok((document_columns(), Domain::Document)),
        "transactions" => Ok((transaction_columns(), Domain::Transaction)),
        "payments" => Ok((payment_columns(), Domain::Payment)),
        "expenses" => Ok((expense_columns(), Domain::Expense)),
        other => bail!("Unknown column preset '{}'", other),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn list(store: &RecordStore, groups: &[RecordGroup], page: usize, per_page: usize, config: &Config) {
    let money = config.currency.money_format();
    let total = record_count(groups);
    let pages = total.div_ceil(per_page).max(1);
    let page = page.clamp(1, pages);
    let start = (page - 1) * per_page;

    for record in flatten(groups).skip(start).take(per_page) {
        let amount = record
            .amount
            .map(|a| propdash_utils::format_currency(a, &money))
            .unwrap_or_default();
        println!(
            "{:<10} {:<10} {:<12} {:<36} {:<16} {:<16} {:>16}",
            record.id(),
            record.date,
            record.domain.to_string(),
            record.name,
            record.category,
            store.properties().name_of(record.property_id).unwrap_or(""),
            amount
        );
    }
    println!("Page {} of {} ({} records)", page, pages, total);
}

fn init_config(output: &PathBuf, force: bool) -> anyhow::Result<()> {
    if output.exists() && !force {
        bail!("{} already exists; pass --force to overwrite", output.display());
    }
    std::fs::write(output, Config::generate_default())
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote default configuration to {}", output.display());
    Ok(())
}

fn invest(args: &InvestArgs) -> anyhow::Result<()> {
    let inputs = InvestmentInputs {
        purchase_price: args.price,
        down_payment: args.down,
        interest_rate: args.rate,
        loan_term_years: args.years,
        monthly_rent: args.rent,
        monthly_expenses: args.expenses,
        closing_costs: args.closing,
        appreciation_rate: args.appreciation,
    };
    inputs.validate()?;
    print_json(&investment_metrics(&inputs))
}

struct ExportArgs {
    format: ExportFormat,
    columns: String,
    domain: Option<Domain>,
    report: Option<String>,
    output: Option<PathBuf>,
}

fn export(store: &mut RecordStore, filters: &FilterArgs, args: ExportArgs, config: &Config) -> anyhow::Result<()> {
    let (criteria, groups) = select(store, filters, config)?;
    let ctx = ExportContext::from_config(config, store.properties().clone());
    let sink = DirectorySink::new(args.output.unwrap_or_else(|| config.export.output_dir.clone()));
    let exporter = Exporter::new(Arc::new(sink)).with_notifier(Arc::new(LogNotifier::new()));

    let receipt = match args.format {
        ExportFormat::Csv => {
            let (columns, preset_domain) = column_preset(&args.columns)?;
            let groups = only_domain(groups, args.domain.unwrap_or(preset_domain));
            let report = args.report.unwrap_or_else(|| format!("{}s", preset_domain));
            exporter.csv(flatten(&groups), &columns, &report, &ctx)
        }
        ExportFormat::Pdf => {
            let groups = only_domain(groups, args.domain.unwrap_or(Domain::Transaction));
            exporter.pdf(&groups, &criteria, &ctx)
        }
        ExportFormat::Xlsx => {
            let groups = only_domain(groups, args.domain.unwrap_or(Domain::Transaction));
            exporter.excel(&groups, &criteria, &ctx)
        }
    }
    .with_context(|| format!("{} export failed", args.format.extension().to_uppercase()))?;

    let counted = store.record_downloads(&receipt.record_ids);
    log::debug!("Download count bumped on {} records", counted);
    println!("{}", receipt.location);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match cli.command {
        Command::InitConfig { ref output, force } => return init_config(output, force),
        _ => load_config(cli.config.as_ref())?,
    };
    init_logging(&config);

    if let Command::Invest(ref args) = cli.command {
        return invest(args);
    }

    let rt = Runtime::new()?;
    let dataset = rt.block_on(load_dataset(&config, cli.demo))?;
    let mut store = build_store(dataset)?;

    match cli.command {
        Command::Stats { filters } => {
            let (_, groups) = select(&store, &filters, &config)?;
            print_json(&compute_stats(flatten(&groups)))?;
        }
        Command::List { filters, page } => {
            let (_, groups) = select(&store, &filters, &config)?;
            list(&store, &groups, page, config.pagination.records_per_page, &config);
        }
        Command::Export {
            filters,
            format,
            columns,
            domain,
            report,
            output,
        } => {
            let args = ExportArgs {
                format,
                columns,
                domain,
                report,
                output,
            };
            export(&mut store, &filters, args, &config)?;
        }
        Command::Invest(_) | Command::InitConfig { .. } => {}
    }

    Ok(())
}
