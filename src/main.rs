//! # Pergamino CLI
//!
//! Command-line interface for certificate generation.
//!
//! ## Usage
//!
//! ```bash
//! # List available fonts
//! pergamino fonts --fonts-dir fonts
//!
//! # Render one certificate per data row
//! pergamino render --template template.png --regions regions.json \
//!     --rows rows.json --out certificates/
//!
//! # Render a single certificate from literal region text
//! pergamino render --template template.png --regions regions.json --out .
//!
//! # Start the HTTP server
//! pergamino serve --listen 0.0.0.0:8001 --fonts-dir fonts
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;

use pergamino::{
    PergaminoError,
    certificate::{self, render_certificate},
    fonts::FontRegistry,
    schema::{RegionSpec, RenderRow, sanitize_filename},
    server::{self, ServerConfig},
};

/// Pergamino - certificate generation utility
#[derive(Parser, Debug)]
#[command(name = "pergamino")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Png,
    Jpeg,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8001")]
        listen: String,

        /// Directory holding TTF/OTF fonts
        #[arg(long, default_value = "fonts")]
        fonts_dir: PathBuf,
    },

    /// Render certificates from a template and region definitions
    Render {
        /// Template image file
        #[arg(long)]
        template: PathBuf,

        /// JSON file with the region array
        #[arg(long)]
        regions: PathBuf,

        /// Optional JSON file with data rows (array of field→value maps);
        /// one certificate is rendered per row
        #[arg(long)]
        rows: Option<PathBuf>,

        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "png")]
        format: OutputFormat,

        /// Row field used to name output files (falls back to row index)
        #[arg(long)]
        name_field: Option<String>,

        /// Directory holding TTF/OTF fonts
        #[arg(long, default_value = "fonts")]
        fonts_dir: PathBuf,
    },

    /// List available fonts
    Fonts {
        /// Directory holding TTF/OTF fonts
        #[arg(long, default_value = "fonts")]
        fonts_dir: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pergamino=info,tower_http=info".into()),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), PergaminoError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { listen, fonts_dir } => {
            let config = ServerConfig {
                listen_addr: listen,
                fonts_dir,
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(config))
        }
        Commands::Render {
            template,
            regions,
            rows,
            out,
            format,
            name_field,
            fonts_dir,
        } => render_batch(
            &template, &regions, rows.as_deref(), &out, format, name_field.as_deref(), &fonts_dir,
        ),
        Commands::Fonts { fonts_dir } => {
            let registry = FontRegistry::new(fonts_dir);
            let fonts = registry.list();
            if fonts.is_empty() {
                println!("No fonts found.");
            }
            for font in fonts {
                println!("{}  ({})", font.display_name, font.filename);
            }
            Ok(())
        }
    }
}

fn render_batch(
    template_path: &std::path::Path,
    regions_path: &std::path::Path,
    rows_path: Option<&std::path::Path>,
    out_dir: &std::path::Path,
    format: OutputFormat,
    name_field: Option<&str>,
    fonts_dir: &std::path::Path,
) -> Result<(), PergaminoError> {
    let registry = FontRegistry::new(fonts_dir);

    let template = image::open(template_path)
        .map_err(|e| PergaminoError::Image(format!("Failed to load template: {e}")))?
        .to_rgb8();

    let specs: Vec<RegionSpec> = serde_json::from_str(&fs::read_to_string(regions_path)?)
        .map_err(|e| PergaminoError::InvalidInput(format!("Invalid regions JSON: {e}")))?;

    let rows: Vec<Option<RenderRow>> = match rows_path {
        Some(path) => {
            let parsed: Vec<RenderRow> = serde_json::from_str(&fs::read_to_string(path)?)
                .map_err(|e| PergaminoError::InvalidInput(format!("Invalid rows JSON: {e}")))?;
            parsed.into_iter().map(Some).collect()
        }
        None => vec![None],
    };

    fs::create_dir_all(out_dir)?;

    // Sequential batch: one independent render pass per row.
    for (index, row) in rows.iter().enumerate() {
        let items: Vec<_> = specs.iter().map(|s| s.resolve(row.as_ref())).collect();
        let raster = render_certificate(&registry, &template, &items)?;

        let base = row
            .as_ref()
            .zip(name_field)
            .and_then(|(row, field)| row.get(field))
            .map(|name| sanitize_filename(name))
            .unwrap_or_else(|| format!("certificate_{index}"));

        let (bytes, ext) = match format {
            OutputFormat::Png => (certificate::to_png_bytes(&raster)?, "png"),
            OutputFormat::Jpeg => (certificate::to_jpeg_bytes(&raster)?, "jpg"),
        };

        let out_path = out_dir.join(format!("{base}.{ext}"));
        fs::write(&out_path, bytes)?;
        println!("Wrote {}", out_path.display());
    }

    Ok(())
}
