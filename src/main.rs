use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style, Table, Tabled};
use tracing_subscriber::EnvFilter;

use invoice_desk::api::{parse_date, ReportClient, ReportQuery, ReportSummary};
use invoice_desk::config::{config_dir, init_config, load_config, Config, Feature};
use invoice_desk::currency::rupees;
use invoice_desk::error::{InvoiceError, Result};
use invoice_desk::payment::{settle_selection, CheckoutRequest};
use invoice_desk::report::{InvoiceRow, ReportKind, ReportSession, SelectionSet, ViewMode};
use invoice_desk::settlement::{calculate, prefill_override, SettlementBreakdown, TdsRate};

#[derive(Parser)]
#[command(name = "invoice-desk")]
#[command(version, about = "Invoice and outstanding reports with TDS settlement", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir or ~/.invoice-desk)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ReportFilters {
    /// Start date (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long)]
    from: Option<String>,

    /// End date (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long)]
    to: Option<String>,

    /// Customer name (default: display_name from config)
    #[arg(long)]
    customer: Option<String>,

    /// Restrict to one bill number
    #[arg(long)]
    bill_no: Option<String>,

    /// Unit name (can be repeated)
    #[arg(long = "unit", value_name = "UNIT")]
    units: Vec<String>,

    /// Free-text search over every column
    #[arg(long)]
    search: Option<String>,

    /// Page to show (10 invoices per page)
    #[arg(long, default_value_t = 1)]
    page: usize,
}

#[derive(Args)]
struct SelectArgs {
    /// Select a due invoice for payment (can be repeated)
    #[arg(long = "select", value_name = "BILL_NO")]
    select: Vec<String>,

    /// Select every due invoice in the current view
    #[arg(long)]
    select_all: bool,
}

#[derive(Args)]
struct TdsArgs {
    /// TDS rate in percent (2 or 10; default from config)
    #[arg(long)]
    tds: Option<String>,

    /// Override the TDS amount instead of using the rate
    #[arg(long, value_name = "AMOUNT")]
    tds_amount: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Show configuration and access
    Status,

    /// Fetch the invoice report (paid invoices, or due ones with --due)
    Report {
        #[command(flatten)]
        filters: ReportFilters,

        /// Show due invoices instead of paid ones
        #[arg(long)]
        due: bool,

        #[command(flatten)]
        selection: SelectArgs,

        #[command(flatten)]
        tds: TdsArgs,
    },

    /// Fetch the outstanding (due-only) report
    Outstanding {
        #[command(flatten)]
        filters: ReportFilters,

        #[command(flatten)]
        selection: SelectArgs,

        #[command(flatten)]
        tds: TdsArgs,
    },

    /// Work out the payable amount for a given invoice total
    Pay {
        /// Invoice amount to settle
        #[arg(long)]
        amount: f64,

        #[command(flatten)]
        tds: TdsArgs,

        /// Print the checkout payload as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::Report {
            filters,
            due,
            selection,
            tds,
        } => {
            let mode = if due { ViewMode::Due } else { ViewMode::Report };
            cmd_report(&cfg_dir, ReportKind::Invoice, mode, &filters, &selection, &tds)
        }
        Commands::Outstanding {
            filters,
            selection,
            tds,
        } => cmd_report(
            &cfg_dir,
            ReportKind::Outstanding,
            ViewMode::Outstanding,
            &filters,
            &selection,
            &tds,
        ),
        Commands::Pay { amount, tds, json } => cmd_pay(&cfg_dir, amount, &tds, json),
    }
}

/// Initialize config directory with template file
fn cmd_init(cfg_dir: &PathBuf) -> Result<()> {
    let path = init_config(cfg_dir)?;

    println!("Initialized invoice-desk config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!("  1. Point it at your server:  $EDITOR {}", path.display());
    println!("  2. Fetch your invoices:      invoice-desk report --from <date>");

    Ok(())
}

/// Show configuration and access
fn cmd_status(cfg_dir: &PathBuf) -> Result<()> {
    let config = load_config(cfg_dir)?;

    println!("Invoice Desk Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Server:           {}", config.api.base_url);
    println!("Customer:         {}", config.customer.display_name);
    println!(
        "Invoice report:   {}",
        access_label(&config, Feature::InvoiceReport)
    );
    println!(
        "Outstanding:      {}",
        access_label(&config, Feature::OutstandingReport)
    );
    println!("Payments:         {}", access_label(&config, Feature::Payment));
    println!("Default TDS:      {}%", config.payment.default_tds);

    println!();
    println!("Invoice report endpoints:");
    for path in &config.api.invoice_report_paths {
        println!("  {}", path);
    }
    println!("Outstanding report endpoints:");
    for path in &config.api.outstanding_report_paths {
        println!("  {}", path);
    }

    Ok(())
}

fn access_label(config: &Config, feature: Feature) -> &'static str {
    if config.access.allows(feature) {
        "allowed"
    } else {
        "no access"
    }
}

fn build_query(config: &Config, filters: &ReportFilters) -> Result<ReportQuery> {
    let from_date = filters.from.as_deref().map(parse_date).transpose()?;
    let to_date = filters.to.as_deref().map(parse_date).transpose()?;

    let query = ReportQuery {
        customer_name: filters
            .customer
            .clone()
            .unwrap_or_else(|| config.customer.display_name.clone()),
        bill_no: filters.bill_no.clone().unwrap_or_default(),
        units: filters.units.clone(),
        from_date,
        to_date,
    };
    query.validate()?;
    Ok(query)
}

fn resolve_rate(config: &Config, tds: &TdsArgs) -> Result<TdsRate> {
    tds.tds
        .as_deref()
        .unwrap_or(&config.payment.default_tds)
        .parse()
}

/// Fetch a report and render the requested page
fn cmd_report(
    cfg_dir: &PathBuf,
    kind: ReportKind,
    mode: ViewMode,
    filters: &ReportFilters,
    selection: &SelectArgs,
    tds: &TdsArgs,
) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let feature = match kind {
        ReportKind::Invoice => Feature::InvoiceReport,
        ReportKind::Outstanding => Feature::OutstandingReport,
    };
    config.access.require(feature)?;

    let query = build_query(&config, filters)?;
    let rate = resolve_rate(&config, tds)?;

    let client = ReportClient::from_settings(&config.api);
    let mut session = ReportSession::new(kind, config.api.strict_headers);
    let ticket = session.begin_fetch();
    let response = client.fetch(kind, &query)?;
    session.apply(ticket, response)?;

    session.set_mode(mode);
    if let Some(search) = &filters.search {
        session.set_search(search);
    }
    if filters.page != 1 && !session.set_page(filters.page) {
        eprintln!("Page {} is out of range; showing page 1.", filters.page);
    }

    for bill in &selection.select {
        session.toggle(bill);
    }
    if selection.select_all {
        session.toggle_all();
    }

    let Some(view) = session.view() else {
        return Ok(());
    };

    if view.is_empty() {
        match kind {
            ReportKind::Invoice => println!("No invoices found matching your search criteria."),
            ReportKind::Outstanding => println!("No due invoices found for the selected criteria."),
        }
        return Ok(());
    }

    let title = match view.mode() {
        ViewMode::Report => "Invoice Report (paid)",
        ViewMode::Due => "Invoice Report (due)",
        ViewMode::Outstanding => "Outstanding Report",
    };
    println!("{title}");

    if view.visible_rows().is_empty() {
        println!("No invoices in this view.");
    } else {
        let selectable = view.mode().allows_selection();
        println!("{}", render_rows(view.page_rows(), session.selection(), selectable));
    }
    println!(
        "Page {} of {} ({} invoices)",
        view.current_page(),
        view.display_total_pages(),
        view.visible_rows().len()
    );

    println!();
    print_summary(&view.summary(), kind);

    if session.can_pay() {
        println!();
        println!("Selected Amount: {}", rupees(session.selected_total()));
        let (breakdown, request) = settle_selection(
            &session,
            rate,
            tds.tds_amount.as_deref(),
            &config.customer,
            &config.payment,
        )?;
        print_breakdown(&breakdown);
        println!("Checkout amount: {} paise ({})", request.amount, request.currency);
    }

    Ok(())
}

fn render_rows(rows: &[InvoiceRow], selection: &SelectionSet, selectable: bool) -> String {
    let mut builder = Builder::default();

    let mut header = Vec::new();
    if selectable {
        header.push("SEL".to_string());
    }
    header.extend(
        [
            "#", "BILL NO", "DATE", "UNIT", "ITEMS", "TAX", "INVOICE", "ROUNDOFF",
            "OUTSTANDING", "STATUS",
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    builder.push_record(header);

    for row in rows {
        let mut record = Vec::new();
        if selectable {
            let mark = if selection.contains(&row.bill_number) { "[x]" } else { "[ ]" };
            record.push(mark.to_string());
        }
        record.extend([
            row.serial_number.to_string(),
            row.bill_number.clone(),
            row.invoice_date.clone(),
            row.unit_name.clone(),
            rupees(row.item_amount),
            rupees(row.tax_amount),
            rupees(row.invoice_amount),
            rupees(row.roundoff_amount),
            rupees(row.outstanding_amount),
            row.payment_status.to_string(),
        ]);
        builder.push_record(record);
    }

    builder.build().with(Style::rounded()).to_string()
}

fn print_summary(summary: &ReportSummary, kind: ReportKind) {
    match kind {
        ReportKind::Invoice => {
            println!("Total Item Amount:     {}", rupees(summary.total_invoice_item_amount));
            println!("Total Tax Amount:      {}", rupees(summary.total_tax_amount));
            println!("Total Invoice Amount:  {}", rupees(summary.total_invoice_amount));
            println!("Total Roundoff:        {}", rupees(summary.total_roundoff_amount));
            println!("Total Outstanding:     {}", rupees(summary.total_outstanding_amount));
            println!(
                "Paid / Due invoices:   {} / {}",
                summary.paid_invoices, summary.due_invoices
            );
        }
        ReportKind::Outstanding => {
            println!("Total Outstanding: {}", rupees(summary.total_outstanding_amount));
            println!("Total Invoices:    {}", summary.due_invoices);
        }
    }
}

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "ITEM")]
    item: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

fn print_breakdown(breakdown: &SettlementBreakdown) {
    let rows = vec![
        BreakdownRow {
            item: "Invoice Amount".to_string(),
            amount: rupees(breakdown.total_amount),
        },
        BreakdownRow {
            item: format!("TDS Deducted ({}%)", breakdown.rate),
            amount: format!("- {}", rupees(breakdown.tds_amount)),
        },
        BreakdownRow {
            item: "Transfer Amount".to_string(),
            amount: rupees(breakdown.transfer_amount),
        },
        BreakdownRow {
            item: "Transfer Charge (2%)".to_string(),
            amount: rupees(breakdown.transfer_charge),
        },
        BreakdownRow {
            item: "GST on Transfer Charge (18%)".to_string(),
            amount: rupees(breakdown.gst_on_transfer_charge),
        },
        BreakdownRow {
            item: "Total Payable Amount".to_string(),
            amount: rupees(breakdown.total_transaction),
        },
    ];

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
}

/// Compute the settlement for an amount and show the checkout hand-off
fn cmd_pay(cfg_dir: &PathBuf, amount: f64, tds: &TdsArgs, json: bool) -> Result<()> {
    let config = load_config(cfg_dir)?;
    config.access.require(Feature::Payment)?;

    if !amount.is_finite() || amount < 0.0 {
        return Err(InvoiceError::InvalidPaymentAmount);
    }

    let rate = resolve_rate(&config, tds)?;
    let tds_field = tds
        .tds_amount
        .clone()
        .unwrap_or_else(|| prefill_override(amount, rate));
    let breakdown = calculate(amount, rate, Some(&tds_field));
    let request = CheckoutRequest::build(&breakdown, &config.customer, &config.payment)?;

    if json {
        let payload = serde_json::to_string_pretty(&request)
            .map_err(|e| InvoiceError::MalformedResponse(e.to_string()))?;
        println!("{payload}");
        return Ok(());
    }

    print_breakdown(&breakdown);
    println!(
        "Checkout amount: {} paise ({}) for {}",
        request.amount, request.currency, request.prefill.name
    );

    Ok(())
}
