use clap::{Parser, Subcommand};
use colored::Colorize;
use query_parser::cli;
use query_parser::config::CliOverrides;
use query_parser::error::ParserResult;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "query-parser")]
#[command(about = "Extract URL query strings from a CSV column into structured columns.")]
#[command(long_about = "Query Parser - Turn a column of URL query strings into a clean table

Every data row's query string (key1=value1&key2=value2...) is decoded into
its own columns. Numbered item parameters (item1, amt1, qty1, dcnt1, item2...)
are gathered into item columns. Output columns are sorted alphabetically.

COMMANDS:
  parse     - Decode a query-string column and write the normalized table
  columns   - List header columns with their letters

EXAMPLES:
  query-parser columns export.csv
  query-parser parse export.csv --column C
  query-parser parse export.csv -c C --separate-items -o orders.xlsx
  query-parser parse export.csv -c C -o - > parsed.csv")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Decode a query-string column and write the normalized table.

ITEM MODES:
  combined (default)  one 'items' column: item;amt;qty;dcnt for each index
                      e.g. SKU1;10;2;;SKU2;5;1;
  --separate-items    itemSku, itemUnitPrice, itemQuantity columns, plus
                      itemDiscount when any row carries a discount

ROWS THAT FAIL:
  Rows whose cell cannot be decoded (missing cell, spreadsheet error value,
  invalid UTF-8, oversized item index) are left out. The run still succeeds;
  use --verbose or --json to see which rows were skipped.

JOB FILE:
  Settings can be kept in a YAML file and passed with --config:

  column: C
  separate_items: true
  output: orders_parsed.csv
  sheet: Orders

  Command-line flags override job file values; --combined turns off
  separate_items set in the job file.

OUTPUT:
  .csv (default parsed_output.csv), .xlsx, or - for CSV on stdout")]
    /// Decode a query-string column and write the normalized table
    Parse {
        /// Input file (.csv, or .xlsx/.xlsm/.xls/.ods)
        input: PathBuf,

        /// Column letter holding the query strings (e.g. A, C, AA)
        #[arg(short, long)]
        column: Option<String>,

        /// Split item data into itemSku/itemUnitPrice/itemQuantity/itemDiscount
        #[arg(short, long)]
        separate_items: bool,

        /// Force the single `items` column, even if the job file sets separate_items
        #[arg(long, conflicts_with = "separate_items")]
        combined: bool,

        /// Output file (.csv or .xlsx, - for stdout) [default: parsed_output.csv]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Worksheet to read for spreadsheet input (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,

        /// YAML job file with default settings
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the run report as JSON instead of status text
        #[arg(long)]
        json: bool,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List header columns with their letters
    Columns {
        /// Input file (.csv, or .xlsx/.xlsm/.xls/.ods)
        input: PathBuf,

        /// Worksheet to read for spreadsheet input (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> ParserResult<()> {
    match cli.command {
        Commands::Parse {
            input,
            column,
            separate_items,
            combined,
            output,
            sheet,
            config,
            json,
            verbose,
        } => {
            init_tracing(verbose);
            let separate_items = match (separate_items, combined) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let overrides = CliOverrides {
                column,
                separate_items,
                output,
                sheet,
            };
            cli::parse(input, overrides, config, json, verbose).map(|_| ())
        }

        Commands::Columns { input, sheet } => {
            init_tracing(false);
            cli::columns(input, sheet)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "❌ Error:".red().bold(), e);
        std::process::exit(1);
    }
}
