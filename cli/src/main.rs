//! xlsx2i18n CLI - XLSX translation sheet to i18n JSON converter
//!
//! Reads one sheet of a language workbook and writes its texts grouped by
//! language.

use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use xlsx2i18n::render::JsonFormat;
use xlsx2i18n::{ErrorKind, ExtractOptions, Extraction};

const AFTER_HELP: &str = "\
Output Format:
  {
    \"en\": {
      \"key1\": \"English text\",
      \"key2\": \"Another text\"
    },
    \"zh-CN\": {
      \"key1\": \"简体中文\",
      \"key2\": \"另一个文本\"
    }
  }

Examples:
  # Basic usage
  xlsx2i18n language.xlsx i18n.json --sheet buff-web --start 275 --end 305

  # Keep full language codes (zh_rCN instead of zh-CN)
  xlsx2i18n input.xlsx output.json --no-abbrev

  # Custom columns
  xlsx2i18n input.xlsx output.json --key-col id --default-col en --default-lang en-US";

/// Convert XLSX language sheets to i18n JSON grouped by language
#[derive(Parser)]
#[command(
    name = "xlsx2i18n",
    author = "iyulab",
    version,
    about = "Convert XLSX language sheets to i18n JSON",
    after_help = AFTER_HELP
)]
struct Cli {
    /// Input workbook (.xlsx)
    input: PathBuf,

    /// Output JSON file
    output: PathBuf,

    /// Sheet name to process (default: first sheet)
    #[arg(long)]
    sheet: Option<String>,

    /// Starting row number (1-based, inclusive)
    #[arg(long = "start", default_value_t = 2)]
    start_row: u32,

    /// Ending row number (1-based, inclusive; default: last row)
    #[arg(long = "end")]
    end_row: Option<u32>,

    /// Column header holding text keys
    #[arg(long = "key-col", default_value = "key")]
    key_column: String,

    /// Column header holding default-language text
    #[arg(long = "default-col", default_value = "default")]
    default_column: String,

    /// Language tag for the default column
    #[arg(long, default_value = "en")]
    default_lang: String,

    /// Header to exclude from language detection (repeatable; replaces the
    /// defaults: 特殊说明, is_android, location)
    #[arg(long = "exclude", value_name = "HEADER")]
    exclude: Vec<String>,

    /// Do not abbreviate language codes (keep zh_rCN format)
    #[arg(long)]
    no_abbrev: bool,

    /// Output compact JSON (no indentation)
    #[arg(long)]
    compact: bool,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn extract_options(&self) -> ExtractOptions {
        let mut options = ExtractOptions::new()
            .with_rows(self.start_row, self.end_row)
            .with_key_column(&self.key_column)
            .with_default_column(&self.default_column)
            .with_default_lang(&self.default_lang)
            .with_abbreviation(!self.no_abbrev);
        if let Some(ref sheet) = self.sheet {
            options = options.with_sheet(sheet);
        }
        if !self.exclude.is_empty() {
            options = options.with_excluded_headers(&self.exclude);
        }
        options
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        match e.kind() {
            ErrorKind::NotFound | ErrorKind::Validation => {
                eprintln!("{}: {}", "Error".red().bold(), e);
            }
            ErrorKind::Unexpected => {
                eprintln!("{}: {}", "Unexpected error".red().bold(), e);
                eprintln!("{:#?}", e);
                let mut source = std::error::Error::source(&e);
                while let Some(cause) = source {
                    eprintln!("  caused by: {}", cause);
                    source = std::error::Error::source(cause);
                }
            }
        }
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> xlsx2i18n::Result<()> {
    let options = cli.extract_options();

    let pb = (!cli.quiet).then(|| create_spinner("Converting workbook..."));
    let format = if cli.compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let extraction =
        xlsx2i18n::convert_file_with_format(&cli.input, &cli.output, &options, format)?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
        print_report(&extraction, &cli.output);
    }

    Ok(())
}

fn print_report(extraction: &Extraction, output: &Path) {
    println!(
        "{}: {}",
        "Shared strings".bold(),
        extraction.shared_string_count
    );
    println!("{}: {}", "Sheet".bold(), extraction.sheet_name);
    println!("{}: {}", "Total rows".bold(), extraction.row_count);

    let shown: Vec<&str> = extraction
        .headers
        .iter()
        .take(10)
        .map(|h| h.name.as_str())
        .collect();
    println!(
        "{} ({} columns): {:?}{}",
        "Headers".bold(),
        extraction.headers.len(),
        shown,
        if extraction.headers.len() > 10 { "..." } else { "" }
    );

    println!(
        "\n{}",
        format!(
            "Detected {} language columns",
            extraction.language_columns.len()
        )
        .cyan()
        .bold()
    );
    for column in &extraction.language_columns {
        println!("  {} -> {}", column.header, column.tag);
    }

    println!(
        "\n{}",
        format!(
            "Extracted translations for {} languages",
            extraction.translations.len()
        )
        .cyan()
        .bold()
    );
    for (tag, texts) in extraction.translations.iter() {
        println!("  {}: {} texts", tag, texts.len());
    }

    println!(
        "\n{} Saved to: {}",
        "✓".green().bold(),
        output.display()
    );

    if !extraction.translations.is_empty() {
        println!("\n{}", "Sample output".cyan().bold());
        for (tag, texts) in extraction.translations.iter().take(2) {
            println!("\n{}:", tag);
            for (key, text) in texts.iter().take(3) {
                println!("  \"{}\": \"{}\"", key, text);
            }
        }
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
