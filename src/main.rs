use std::path::PathBuf;

use clap::Parser;
use misc_expense::config::Settings;
use misc_expense::model::ExpenseOrder;
use misc_expense::{ExpenseError, Result, pipeline};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ExpenseError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Process(args) => execute_process(args),
    }
}

fn execute_process(args: ProcessArgs) -> Result<()> {
    let settings = args.resolve_settings()?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| pipeline::default_output_path(&args.input));

    let summary = pipeline::process_file(&args.input, &output, &settings)?;
    println!(
        "{} records, {} categories written to {}",
        summary.records.len(),
        summary.categories_written,
        output.display()
    );
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Add miscellaneous expense totals to billing workbooks."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Fetch and write the expense totals of every record in a workbook.
    Process(ProcessArgs),
}

#[derive(clap::Args)]
struct ProcessArgs {
    /// Workbook to read.
    #[arg(long)]
    input: PathBuf,

    /// Where to save the result. Defaults to `<input>_Processed.xlsx`.
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// SQLite database holding the line items.
    #[arg(long)]
    database: Option<PathBuf>,

    /// 1-based index of the worksheet holding the records.
    #[arg(long)]
    sheet: Option<usize>,

    /// Column holding the record identifiers.
    #[arg(long)]
    id_column: Option<u32>,

    /// First column receiving category/amount pairs.
    #[arg(long)]
    start_column: Option<u32>,

    /// Order of the categories written for each record.
    #[arg(long, value_enum)]
    order: Option<OrderKind>,
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum OrderKind {
    Insertion,
    Category,
}

impl From<OrderKind> for ExpenseOrder {
    fn from(kind: OrderKind) -> Self {
        match kind {
            OrderKind::Insertion => ExpenseOrder::Insertion,
            OrderKind::Category => ExpenseOrder::Category,
        }
    }
}

impl ProcessArgs {
    fn resolve_settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if let Some(database) = &self.database {
            settings.store.path = Some(database.clone());
        }
        if let Some(sheet) = self.sheet {
            settings.sheet_index = sheet;
        }
        if let Some(column) = self.id_column {
            settings.id_column = column;
        }
        if let Some(column) = self.start_column {
            settings.start_column = column;
        }
        if let Some(order) = self.order {
            settings.expense_order = order.into();
        }

        settings.validate()?;
        Ok(settings)
    }
}
