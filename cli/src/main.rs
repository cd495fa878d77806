//! formulario CLI - physics formula-sheet generator

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use formulario::{Formulario, GeneratorConfig, RasterOptions, TextColor};

#[derive(Parser)]
#[command(name = "formulario")]
#[command(version)]
#[command(about = "Generate physics formula-sheet PDFs from section tables", long_about = None)]
struct Cli {
    /// Input text file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PDF file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a formula-sheet PDF from an input file
    #[command(alias = "gen")]
    Generate {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output PDF file (defaults to the input name with .pdf)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Formula font size in points
        #[arg(long, value_name = "PT")]
        font_size: Option<f64>,

        /// Formula rasterization resolution
        #[arg(long, value_name = "DPI")]
        dpi: Option<f64>,

        /// Formula ink color: black, white, or #rrggbb
        #[arg(long, value_name = "COLOR")]
        color: Option<String>,

        /// Settings file (JSON)
        #[arg(short, long, value_name = "FILE", env = "FORMULARIO_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Parse an input file and show the detected sections
    Parse {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the parsed sections as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Rasterize a single formula to a PNG file
    Formula {
        /// Formula text, e.g. "W = \\Delta E_c"
        #[arg(value_name = "FORMULA")]
        formula: String,

        /// Output PNG file
        #[arg(short, long, value_name = "FILE", default_value = "formula.png")]
        output: PathBuf,

        /// Font size in points
        #[arg(long, value_name = "PT")]
        font_size: Option<f64>,

        /// Rasterization resolution
        #[arg(long, value_name = "DPI")]
        dpi: Option<f64>,

        /// Ink color: black, white, or #rrggbb
        #[arg(long, value_name = "COLOR")]
        color: Option<String>,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Generate {
            input,
            output,
            font_size,
            dpi,
            color,
            config,
        }) => cmd_generate(
            &input,
            output.as_deref(),
            font_size,
            dpi,
            color.as_deref(),
            config.as_deref(),
        ),
        Some(Commands::Parse { input, json }) => cmd_parse(&input, json),
        Some(Commands::Formula {
            formula,
            output,
            font_size,
            dpi,
            color,
        }) => cmd_formula(&formula, &output, font_size, dpi, color.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: generate if input is provided
            if let Some(input) = cli.input {
                cmd_generate(&input, cli.output.as_deref(), None, None, None, None)
            } else {
                println!("{}", "Usage: formulario <FILE> [OUTPUT]".yellow());
                println!("       formulario --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_generate(
    input: &Path,
    output: Option<&Path>,
    font_size: Option<f64>,
    dpi: Option<f64>,
    color: Option<&str>,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| input.with_extension("pdf"));

    let mut builder = Formulario::new();
    if let Some(path) = config {
        let config = GeneratorConfig::load_or_default(path)?;
        builder = builder.with_config(&config);
    }
    if let Some(size) = font_size {
        builder = builder.with_formula_font_size(size);
    }
    if let Some(dpi) = dpi {
        builder = builder.with_formula_dpi(dpi);
    }
    if let Some(color) = color {
        builder = builder.with_formula_color(TextColor::parse(color)?);
    }

    let text = fs::read_to_string(input)?;
    println!("{} {}", "Parsing".cyan(), input.display());
    let sheet = builder.parse(&text)?;
    println!("{} {} section(s)", "Found".green(), sheet.section_count());

    println!("{}", "Composing document...".cyan());
    sheet.to_file(&output)?;
    println!("{} {}", "Saved to".green().bold(), output.display());

    Ok(())
}

fn cmd_parse(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(input)?;
    let format = formulario::detect_format(&text);
    let sections = formulario::parse_text(&text);

    if sections.is_empty() {
        return Err(formulario::Error::UnreadableInput.into());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&sections)?);
        return Ok(());
    }

    println!("{}", "Input Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {}", "Sections".bold(), sections.len());
    println!();

    for section in &sections {
        let title = if section.has_title() {
            section.title.as_str()
        } else {
            "(sin título)"
        };
        println!(
            "{} {} ({} rows)",
            "Section".green(),
            title.bold(),
            section.row_count()
        );
        if let Some(first) = section.rows.first() {
            let columns: Vec<&str> = first.columns().collect();
            println!("  {} {}", "columns:".dimmed(), columns.join(", "));
        }
    }

    Ok(())
}

fn cmd_formula(
    formula: &str,
    output: &Path,
    font_size: Option<f64>,
    dpi: Option<f64>,
    color: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = RasterOptions::new();
    if let Some(size) = font_size {
        options = options.with_font_size(size);
    }
    if let Some(dpi) = dpi {
        options = options.with_dpi(dpi);
    }
    if let Some(color) = color {
        options = options.with_color(TextColor::parse(color)?);
    }

    formulario::raster::render_formula_png(formula, &options, output)?;
    println!("{} {}", "Saved to".green().bold(), output.display());

    Ok(())
}

fn cmd_version() {
    println!(
        "{} {}",
        "formulario".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("Physics formula-sheet generator");
    println!();
    println!("License: MIT");
}
