//! jlcfab CLI - JLCPCB BOM and placement files from KiCad boards.

use clap::{Parser, Subcommand, ValueEnum};
use jlcfab::{ExtractOptions, GenerateOptions, GenerateResult, JlcFabCore, RotationTable};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jlcfab")]
#[command(about = "Generate JLCPCB BOM and placement files from KiCad PCBs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write <board>-bom.csv and <board>-cpl.csv for a .kicad_pcb file
    Generate {
        /// Path to .kicad_pcb file
        #[arg(value_name = "BOARD")]
        board: PathBuf,

        /// Rotation correction table (pattern and degrees per line)
        #[arg(short, long, value_name = "FILE")]
        rotations: Option<PathBuf>,

        /// Directory to write the CSV files into
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output_dir: PathBuf,

        /// Footprint property holding the supplier part number
        #[arg(long, value_name = "NAME", default_value = "LCSC")]
        part_field: String,

        /// Summary format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Show the rotation correction a footprint would get
    Rotation {
        /// Footprint identifier, e.g. Package_TO_SOT_SMD:SOT-23
        #[arg(value_name = "FOOTPRINT")]
        footprint: String,

        /// Rotation correction table
        #[arg(short, long, value_name = "FILE")]
        rotations: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    Human,
    /// JSON summary for scripts
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Generate {
            board,
            rotations,
            output_dir,
            part_field,
            format,
        } => handle_generate(&board, rotations, output_dir, part_field, format),
        Commands::Rotation {
            footprint,
            rotations,
        } => handle_rotation(&footprint, &rotations),
    };

    process::exit(exit_code);
}

fn handle_generate(
    board: &Path,
    rotations: Option<PathBuf>,
    output_dir: PathBuf,
    part_field: String,
    format: OutputFormat,
) -> i32 {
    let options = GenerateOptions {
        rotations,
        output_dir,
        extract: ExtractOptions {
            part_number_field: part_field,
        },
    };
    tracing::debug!("Generating assembly files for {}", board.display());

    match JlcFabCore::generate(board, &options) {
        Ok(result) => match format {
            OutputFormat::Human => {
                output_human(&result);
                0
            }
            OutputFormat::Json => output_json(&result),
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn output_human(result: &GenerateResult) {
    println!("\nBoard: {}", result.board.display());
    println!("{}", "─".repeat(60));
    println!("  BOM:       {} ({} lines)", result.bom_file.display(), result.bom_lines);
    println!(
        "  Placement: {} ({} components)",
        result.placement_file.display(),
        result.placed
    );

    if !result.skipped.is_empty() {
        println!("\n  Skipped (no part number):");
        for reference in &result.skipped {
            println!("    - {}", reference);
        }
    }
}

fn output_json(result: &GenerateResult) -> i32 {
    match serde_json::to_string_pretty(result) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_rotation(footprint: &str, rotations: &Path) -> i32 {
    match RotationTable::load(rotations) {
        Ok(table) => {
            println!("{}", table.resolve(footprint));
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}
