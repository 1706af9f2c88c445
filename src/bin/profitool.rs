//! Command-line front end for the profit ledger.

use std::io::{self, BufRead, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use owo_colors::OwoColorize;
use profitool::aggregate::{Summary, View};
use profitool::clock::Clock;
use profitool::ledger::Ledger;
use profitool::models::{Amount, DeliveryMethod, DraftInput, NaiveDate, Record, RecordId, YearMonth};
use profitool::storage::{FileStorage, RecordStorage};

/// Currency label shown when none is configured.
const DEFAULT_CURRENCY: &str = "RM";

/// Profitool: record sales and keep track of what they earned.
#[derive(Debug, Parser)]
#[command(name = "profitool", version, about)]
struct Cli {
    /// Override the storage directory (default: XDG data dir).
    #[arg(long, global = true, value_name = "DIR", env = "PROFITOOL_DATA_DIR")]
    data_dir: Option<PathBuf>,
    /// Currency label printed in front of amounts.
    #[arg(long, global = true, env = "PROFITOOL_CURRENCY", default_value = DEFAULT_CURRENCY)]
    currency: String,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Record a sale.
    Add(AddArgs),
    /// List every record with the all-time profit.
    List,
    /// Show the records of a single day (default: today).
    Today {
        /// Day to show (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Show the records of a calendar month (default: this month).
    Monthly {
        /// Month to show (YYYY-MM).
        #[arg(long, value_parser = parse_month)]
        month: Option<YearMonth>,
    },
    /// Delete a record by id.
    Delete {
        /// Id of the record to delete.
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

/// Arguments for the `add` subcommand.
///
/// Everything is optional and taken as typed; malformed numbers fall back
/// to their defaults when the record is committed.
#[derive(Debug, Default, Args)]
struct AddArgs {
    /// Item name.
    #[arg(long)]
    item: Option<String>,
    /// Quantity sold (default 1).
    #[arg(long = "qty", allow_hyphen_values = true)]
    quantity: Option<String>,
    /// Cost per unit.
    #[arg(long = "cost", allow_hyphen_values = true)]
    original_price: Option<String>,
    /// Selling price per unit.
    #[arg(long = "price", allow_hyphen_values = true)]
    selling_price: Option<String>,
    /// Buyer name.
    #[arg(long)]
    buyer: Option<String>,
    /// Delivery method: `cod` or `ship`.
    #[arg(long, value_parser = parse_method)]
    method: Option<DeliveryMethod>,
    /// Shipping cost, only counted for shipped orders.
    #[arg(long = "shipping", allow_hyphen_values = true)]
    shipping_cost: Option<String>,
    /// Free-form note.
    #[arg(long)]
    remark: Option<String>,
    /// Sale date (YYYY-MM-DD, default today).
    #[arg(long)]
    date: Option<String>,
    /// Picture of the item, kept for this session only.
    #[arg(long, value_name = "FILE")]
    image: Option<PathBuf>,
}

impl AddArgs {
    /// Converts the flags into a ledger draft.
    fn into_draft(self) -> DraftInput {
        DraftInput {
            item: self.item.unwrap_or_default(),
            quantity: self.quantity.unwrap_or_default(),
            original_price: self.original_price.unwrap_or_default(),
            selling_price: self.selling_price.unwrap_or_default(),
            buyer: self.buyer.unwrap_or_default(),
            method: self.method.unwrap_or_default(),
            shipping_cost: self.shipping_cost.unwrap_or_default(),
            remark: self.remark.unwrap_or_default(),
            date: self.date.unwrap_or_default(),
            image: self.image,
        }
    }
}

/// Parses a date string in `YYYY-MM-DD` format for clap.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|err| format!("{err}"))
}

/// Parses a `YYYY-MM` month for clap.
fn parse_month(s: &str) -> Result<YearMonth, String> {
    s.parse().map_err(|err| format!("{err}"))
}

/// Parses a delivery method for clap.
fn parse_method(s: &str) -> Result<DeliveryMethod, String> {
    s.parse().map_err(|err| format!("{err}"))
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let storage = match create_storage(cli.data_dir) {
        Ok(storage) => storage,
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} failed to initialize storage: {err}",
                "error:".red().bold()
            )?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut ledger = Ledger::open(storage);
    let mut console = Console {
        out: io::stdout().lock(),
        input: io::stdin().lock(),
        currency: cli.currency,
    };
    dispatch(&mut ledger, cli.command, &mut console)
}

/// Creates the storage backend, using `data_dir` if provided or the
/// default XDG data directory otherwise.
fn create_storage(data_dir: Option<PathBuf>) -> profitool::error::Result<FileStorage> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => FileStorage::default_dir()?,
    };
    FileStorage::new(dir)
}

/// Terminal the commands talk to.
#[derive(Debug)]
struct Console<W, R> {
    /// Destination for regular output.
    out: W,
    /// Source of confirmation answers.
    input: R,
    /// Label printed in front of amounts.
    currency: String,
}

impl<W: io::Write, R: BufRead> Console<W, R> {
    /// Formats an amount with the currency label.
    fn money(&self, amount: &Amount) -> String {
        format!("{} {amount}", self.currency)
    }

    /// Asks a yes/no question. Anything but `y` or `yes` is a no.
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        write!(self.out, "{question} {} ", "[y/N]".dimmed())?;
        self.out.flush()?;
        let mut answer = String::new();
        let _read = self.input.read_line(&mut answer)?;
        let reply = answer.trim();
        Ok(reply.eq_ignore_ascii_case("y") || reply.eq_ignore_ascii_case("yes"))
    }
}

/// Dispatches to the appropriate subcommand handler.
fn dispatch<S, C, W, R>(
    ledger: &mut Ledger<S, C>,
    command: Command,
    console: &mut Console<W, R>,
) -> io::Result<ExitCode>
where
    S: RecordStorage,
    C: Clock,
    W: io::Write,
    R: BufRead,
{
    match command {
        Command::Add(args) => cmd_add(ledger, args, console),
        Command::List => cmd_view(ledger, View::All, console),
        Command::Today { date } => {
            let day = date.unwrap_or_else(|| ledger.today());
            cmd_view(ledger, View::Day(day), console)
        }
        Command::Monthly { month } => {
            let year_month = month.unwrap_or_else(|| ledger.current_month());
            cmd_view(ledger, View::Month(year_month), console)
        }
        Command::Delete { id, yes } => cmd_delete(ledger, RecordId::new(id), yes, console),
    }
}

/// Executes the `add` subcommand: commits a record and prints it.
fn cmd_add<S, C, W, R>(
    ledger: &mut Ledger<S, C>,
    args: AddArgs,
    console: &mut Console<W, R>,
) -> io::Result<ExitCode>
where
    S: RecordStorage,
    C: Clock,
    W: io::Write,
    R: BufRead,
{
    match ledger.commit(args.into_draft()) {
        Ok(record) => {
            print_record(console, &record)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} failed to save record: {err}",
                "error:".red().bold()
            )?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Executes `list`, `today` and `monthly`: prints the records of a view
/// and their total profit.
fn cmd_view<S, C, W, R>(
    ledger: &Ledger<S, C>,
    view: View,
    console: &mut Console<W, R>,
) -> io::Result<ExitCode>
where
    S: RecordStorage,
    C: Clock,
    W: io::Write,
    R: BufRead,
{
    print_summary(console, &ledger.summary(view))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `delete` subcommand, asking first unless `yes` is set.
fn cmd_delete<S, C, W, R>(
    ledger: &mut Ledger<S, C>,
    id: RecordId,
    yes: bool,
    console: &mut Console<W, R>,
) -> io::Result<ExitCode>
where
    S: RecordStorage,
    C: Clock,
    W: io::Write,
    R: BufRead,
{
    let Some(record) = ledger.get(id) else {
        writeln!(console.out, "{}", format_args!("No record with id {id}.").dimmed())?;
        return Ok(ExitCode::FAILURE);
    };

    let question = format!("Delete record {id} ({})?", record.item());
    if !yes && !console.confirm(&question)? {
        writeln!(console.out, "{}", "Cancelled.".dimmed())?;
        return Ok(ExitCode::SUCCESS);
    }

    match ledger.remove(id) {
        Ok(true) => {
            writeln!(console.out, "{} {id}", "Deleted record".green().bold())?;
            Ok(ExitCode::SUCCESS)
        }
        Ok(false) => {
            writeln!(console.out, "{}", format_args!("No record with id {id}.").dimmed())?;
            Ok(ExitCode::FAILURE)
        }
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} failed to delete record: {err}",
                "error:".red().bold()
            )?;
            Ok(ExitCode::FAILURE)
        }
    }
}

// ── Output formatting ────────────────────────────────────────────────

/// Prints a freshly committed record.
fn print_record<W: io::Write, R: BufRead>(
    console: &mut Console<W, R>,
    record: &Record,
) -> io::Result<()> {
    let profit = console.money(record.profit());
    let out = &mut console.out;
    writeln!(
        out,
        "{} {}",
        "Saved record".green().bold(),
        format_args!("(id {})", record.id()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "  {} {}", "Item:".bold(), or_dash(record.item()))?;
    writeln!(out, "  {} {}", "Quantity:".bold(), record.quantity())?;
    writeln!(out, "  {} {}", "Buyer:".bold(), or_dash(record.buyer()))?;
    writeln!(out, "  {} {}", "Method:".bold(), record.method())?;
    writeln!(out, "  {} {}", "Date:".bold(), record.date())?;
    if let Some(remark) = record.remark() {
        writeln!(out, "  {} {remark}", "Remark:".bold())?;
    }
    if let Some(image) = record.image() {
        writeln!(out, "  {} {image}", "Image:".bold())?;
    }
    if record.profit().is_negative() {
        writeln!(out, "  {} {}", "Profit:".bold(), profit.red())?;
    } else {
        writeln!(out, "  {} {}", "Profit:".bold(), profit.green())?;
    }
    Ok(())
}

/// Prints the records of a summary in a table, followed by the total.
fn print_summary<W: io::Write, R: BufRead>(
    console: &mut Console<W, R>,
    summary: &Summary<'_>,
) -> io::Result<()> {
    let title = match summary.view {
        View::All => "All Records".to_owned(),
        View::Day(day) => format!("Records for {day}"),
        View::Month(month) => format!("Records for {month}"),
    };
    let total = console.money(&summary.total);

    if summary.records.is_empty() {
        writeln!(console.out, "{}", "No records found.".dimmed())?;
        writeln!(console.out, "{} {total}", "Total profit:".bold())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Date").fg(Color::Cyan),
        Cell::new("Item").fg(Color::Cyan),
        Cell::new("Qty").fg(Color::Cyan),
        Cell::new("Buyer").fg(Color::Cyan),
        Cell::new("Method").fg(Color::Cyan),
        Cell::new("Cost").fg(Color::Cyan),
        Cell::new("Price").fg(Color::Cyan),
        Cell::new("Shipping").fg(Color::Cyan),
        Cell::new("Profit").fg(Color::Cyan),
        Cell::new("Remark").fg(Color::Cyan),
    ]);

    for record in &summary.records {
        let shipping_cell = if record.method().is_shipped() {
            Cell::new(console.money(record.shipping_cost()))
        } else {
            Cell::new("\u{2014}").fg(Color::DarkGrey)
        };
        let profit_color = if record.profit().is_negative() {
            Color::Red
        } else {
            Color::Green
        };

        _ = table.add_row(vec![
            Cell::new(record.id()),
            Cell::new(record.date()),
            Cell::new(or_dash(record.item())),
            Cell::new(record.quantity()),
            Cell::new(or_dash(record.buyer())),
            Cell::new(record.method()),
            Cell::new(console.money(record.original_price())),
            Cell::new(console.money(record.selling_price())),
            shipping_cell,
            Cell::new(console.money(record.profit())).fg(profit_color),
            Cell::new(record.remark().unwrap_or("")),
        ]);
    }

    let out = &mut console.out;
    writeln!(
        out,
        "{} {}",
        title.green().bold(),
        format_args!("({})", summary.records.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    writeln!(out, "{} {total}", "Total profit:".bold())?;
    Ok(())
}

/// Substitutes a dash for empty text.
fn or_dash(text: &str) -> &str {
    if text.is_empty() { "\u{2014}" } else { text }
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
