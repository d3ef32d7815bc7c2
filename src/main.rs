use clap::{Parser, Subcommand};
use royalbit_nlformula::error::NlFormulaResult;
use royalbit_nlformula::{cli, logging};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nlformula")]
#[command(about = "Japanese filtering instructions → Excel AND/OR formulas")]
#[command(long_about = "nlformula - Write Excel formulas from Japanese instructions

Load a worksheet, describe a condition in Japanese, and get a formula:
  売上が100以上かつ来店回数が5以上の人  →  =AND(売上高>=100, 来店回数>=5)
  売上が100以上または来店回数が5以上    →  =OR(売上高>=100, 来店回数>=5)

COMMANDS:
  columns      - Show the column titles and first rows at a header row
  generate     - Print the formula for an instruction
  write        - Write the formula into a copy of the workbook
  synonyms     - Show the synonym table used to match column names
  init-config  - Write the default configuration as YAML

EXAMPLES:
  nlformula columns customers.xlsx --header 0
  nlformula generate customers.xlsx \"売上が100以上かつ来店回数が5以上の人\"
  nlformula write customers.xlsx \"売上が100以上\" --cell D2 --rows 10

The original workbook is never modified; `write` saves <name>_with_formula.xlsx.")]
#[command(version)]
struct Cli {
    /// Show debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show column titles and a preview of the data
    Columns {
        /// Path to Excel file (.xlsx)
        file: PathBuf,

        /// 0-based row holding the column titles (0 = first row)
        #[arg(short = 'H', long, default_value = "0")]
        header: usize,

        /// Worksheet name (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Number of data rows to preview
        #[arg(short, long, default_value = "5")]
        rows: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    #[command(long_about = "Print the formula for a Japanese instruction.

Each '<列名>が<数値>以上' becomes '<column>>=<number>'. Column names are
matched through the synonym table and then by similarity (>= 0.6).
If または / もしくは appears anywhere, the conditions are joined with OR,
otherwise with AND.

EXAMPLE:
  nlformula generate customers.xlsx \"売上が100以上かつ来店回数が5以上の人\"
  → =AND(売上高>=100, 来店回数>=5)")]
    /// Print the formula for an instruction
    Generate {
        /// Path to Excel file (.xlsx)
        file: PathBuf,

        /// Instruction, e.g. 売上が100以上かつ来店回数が5以上の人
        instruction: String,

        /// 0-based row holding the column titles
        #[arg(short = 'H', long, default_value = "0")]
        header: usize,

        /// Worksheet name (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Translator config (YAML)
        #[arg(short, long, env = "NLFORMULA_CONFIG")]
        config: Option<PathBuf>,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    #[command(long_about = "Generate the formula and write it into a copy of the workbook.

The same formula text goes into every cell from --cell downwards for --rows
rows (default: one per data row). The copy is saved as
<name>_with_formula.xlsx next to the original unless --output is given.

EXAMPLE:
  nlformula write customers.xlsx \"売上が100以上\" --cell D2 --rows 3")]
    /// Write the formula into a copy of the workbook
    Write {
        /// Path to Excel file (.xlsx)
        file: PathBuf,

        /// Instruction, e.g. 売上が100以上かつ来店回数が5以上の人
        instruction: String,

        /// First cell to write, e.g. C2 (lowercase accepted)
        #[arg(long)]
        cell: String,

        /// Number of rows to fill (default: all data rows)
        #[arg(long)]
        rows: Option<String>,

        /// 0-based row holding the column titles
        #[arg(short = 'H', long, default_value = "0")]
        header: usize,

        /// Worksheet to read and write (default: read the first sheet, write the active one)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Translator config (YAML)
        #[arg(short, long, env = "NLFORMULA_CONFIG")]
        config: Option<PathBuf>,

        /// Output file (default: <name>_with_formula.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the synonym table and keywords in effect
    Synonyms {
        /// Translator config (YAML)
        #[arg(short, long, env = "NLFORMULA_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Write the default configuration as YAML
    InitConfig {
        /// Destination path
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> NlFormulaResult<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Columns {
            file,
            header,
            sheet,
            rows,
            json,
        } => cli::columns(file, header, sheet, rows, json),

        Commands::Generate {
            file,
            instruction,
            header,
            sheet,
            config,
            json,
        } => cli::generate(file, instruction, header, sheet, config, json),

        Commands::Write {
            file,
            instruction,
            cell,
            rows,
            header,
            sheet,
            config,
            output,
        } => cli::write(file, instruction, cell, rows, header, sheet, config, output),

        Commands::Synonyms { config } => cli::synonyms(config),

        Commands::InitConfig { path, force } => cli::init_config(path, force),
    }
}
