//! r4mk CLI - Convert 給与R4 employee exports to the Mykomon layout
//!
//! # Main Commands
//!
//! ```bash
//! r4mk serve                       # Start HTTP server (port 3000)
//! r4mk convert r4.xlsx             # Write processed_data.xlsx
//! r4mk preview r4.xlsx --rows 5    # Converted rows as JSON
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! r4mk inspect r4.xlsx             # Decoded source rows as JSON
//! r4mk columns                     # Destination header
//! r4mk mapping                     # Copy mapping and value translations
//! ```

use clap::{Parser, Subcommand};
use r4mk::{
    convert_file, lookups_description, mapping_description, parse_file_auto, preview_file,
    server, ConvertOptions, ServerConfig, UploadResponse, DESTINATION_COLUMNS,
    DOWNLOAD_FILE_NAME,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "r4mk")]
#[command(about = "Convert 給与R4 employee exports into the Mykomon import layout", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an export and write the Mykomon workbook
    Convert {
        /// Input workbook (xlsx/xls/ods) or CSV
        input: PathBuf,

        /// Output workbook (default: processed_data.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 0-based row holding the column headers
        #[arg(long)]
        header_row: Option<usize>,
    },

    /// Convert an export and print the first rows as JSON
    Preview {
        /// Input workbook or CSV
        input: PathBuf,

        /// Number of rows to include
        #[arg(short, long)]
        rows: Option<usize>,

        /// 0-based row holding the column headers
        #[arg(long)]
        header_row: Option<usize>,
    },

    /// Print the decoded source rows as JSON
    Inspect {
        /// Input workbook or CSV
        input: PathBuf,

        /// 0-based row holding the column headers
        #[arg(long)]
        header_row: Option<usize>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the destination header
    Columns,

    /// Show the copy mapping and value translations
    Mapping,

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// 0-based row holding the column headers
        #[arg(long)]
        header_row: Option<usize>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ServerConfig::from_env();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            header_row,
        } => cmd_convert(&input, output.as_deref(), options(&config, header_row, None)),

        Commands::Preview {
            input,
            rows,
            header_row,
        } => cmd_preview(&input, options(&config, header_row, rows)),

        Commands::Inspect {
            input,
            header_row,
            output,
        } => cmd_inspect(
            &input,
            header_row.unwrap_or(config.header_row),
            output.as_deref(),
        ),

        Commands::Columns => cmd_columns(),

        Commands::Mapping => cmd_mapping(),

        Commands::Serve { port, header_row } => {
            let config = ServerConfig {
                port: port.unwrap_or(config.port),
                header_row: header_row.unwrap_or(config.header_row),
                ..config
            };
            cmd_serve(config).await
        }
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn options(config: &ServerConfig, header_row: Option<usize>, rows: Option<usize>) -> ConvertOptions {
    ConvertOptions {
        header_row: header_row.unwrap_or(config.header_row),
        preview_rows: rows.unwrap_or(config.preview_rows),
    }
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    options: ConvertOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let conversion = convert_file(input, &options)?;
    let output = output.unwrap_or_else(|| Path::new(DOWNLOAD_FILE_NAME));
    fs::write(output, &conversion.workbook)?;

    let preview = &conversion.preview;
    eprintln!("\n⚙️  Converted: {} employees", preview.table.len());
    if !preview.warnings.is_empty() {
        eprintln!("   ⚠️  {} rows with blank address or title fields", preview.warnings.len());
    }
    eprintln!("💾 Output written to: {}", output.display());
    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_preview(input: &Path, options: ConvertOptions) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Previewing: {}", input.display());

    let preview = preview_file(input, &options)?;
    let response = UploadResponse::from(preview);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn cmd_inspect(
    input: &Path,
    header_row: usize,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Reading: {}", input.display());

    let result = parse_file_auto(input, header_row)?;
    eprintln!("   Format: {}", result.format);
    if let Some(ref sheet) = result.sheet_name {
        eprintln!("   Sheet: {}", sheet);
    }
    if let Some(ref encoding) = result.encoding {
        eprintln!("   Encoding: {}", encoding);
    }
    eprintln!("   Columns: {}", result.headers().join(", "));
    eprintln!("✅ Read {} rows", result.row_count());

    let json = serde_json::to_string_pretty(&result.table.to_json_records())?;
    write_output(&json, output)?;
    Ok(())
}

fn cmd_columns() -> Result<(), Box<dyn std::error::Error>> {
    for (i, column) in DESTINATION_COLUMNS.iter().enumerate() {
        println!("{:>2}  {}", i + 1, column);
    }
    Ok(())
}

fn cmd_mapping() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", mapping_description());
    println!("{}", lookups_description());
    Ok(())
}

async fn cmd_serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    server::start_server(config).await
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
