use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use img2pdf_core::{ConvertOptions, DecodeFailurePolicy, PageSizing, Session};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "img2pdf", about = "Convert JPEG/PNG images into one PDF", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert images into a PDF, one image per page
    Convert {
        /// Input images (JPEG or PNG), in page order
        #[arg(required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Directory the PDF is written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Output file name (default: converted.pdf)
        #[arg(long)]
        output_name: Option<String>,

        /// JSON options file; command-line flags override its values
        #[arg(long)]
        config: Option<PathBuf>,

        /// Compress images before rendering
        #[arg(long)]
        compress: bool,

        /// Size limit per compressed image, in KiB
        #[arg(long, requires = "compress")]
        max_size_kb: Option<usize>,

        /// Longest edge of compressed images, in pixels
        #[arg(long, requires = "compress")]
        max_dimension: Option<u32>,

        /// Maximum number of images per conversion
        #[arg(long)]
        max_files: Option<usize>,

        /// Page width in mm
        #[arg(long)]
        page_width: Option<f32>,

        /// Page sizing
        #[arg(long, value_enum)]
        page_sizing: Option<SizingArg>,

        /// Leave out images that cannot be decoded instead of failing
        #[arg(long)]
        skip_undecodable: bool,
    },

    /// Write the default options as JSON
    Config {
        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Include the compression section
        #[arg(long)]
        compress: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SizingArg {
    Fit,
    A4,
}

impl From<SizingArg> for PageSizing {
    fn from(arg: SizingArg) -> Self {
        match arg {
            SizingArg::Fit => Self::FitImage,
            SizingArg::A4 => Self::A4,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output_dir,
            output_name,
            config,
            compress,
            max_size_kb,
            max_dimension,
            max_files,
            page_width,
            page_sizing,
            skip_undecodable,
        } => {
            let mut options = match &config {
                Some(path) => ConvertOptions::load(path)
                    .await
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => ConvertOptions::default(),
            };

            if compress {
                let compression = options.compression.get_or_insert_with(Default::default);
                if let Some(kb) = max_size_kb {
                    compression.max_size_bytes = kb * 1024;
                }
                if let Some(px) = max_dimension {
                    compression.max_dimension_px = px;
                }
            }
            if let Some(max_files) = max_files {
                options.max_files = max_files;
            }
            if let Some(width) = page_width {
                options.page_width_mm = width;
            }
            if let Some(sizing) = page_sizing {
                options.page_sizing = sizing.into();
            }
            if skip_undecodable {
                options.on_decode_error = DecodeFailurePolicy::Skip;
            }
            if let Some(name) = output_name {
                options.output_file_name = name;
            }
            options.validate()?;

            img2pdf_core::check_selection_size(input.len(), &options)?;

            let mut session = Session::new();
            let selection = img2pdf_core::load_selection(&input).await?;
            session.select(selection, &options)?;

            let files = session.begin_generation()?;
            let result = img2pdf_core::generate(&files, &options, |stage, current, total| {
                log::debug!("{}: {}/{}", stage.label(), current, total);
            })
            .await;

            let document = match result {
                Ok(document) => document,
                Err(e) => {
                    session.finish_generation(false);
                    return Err(e.into());
                }
            };

            let path = img2pdf_core::save_document(&document, &output_dir).await?;
            session.finish_generation(true);

            println!(
                "Converted {} images → {} ({} pages)",
                files.len(),
                path.display(),
                document.page_count()
            );
        }

        Commands::Config { output, compress } => {
            let options = if compress {
                ConvertOptions::with_compression()
            } else {
                ConvertOptions::default()
            };
            options.save(&output).await?;
            println!("Wrote default options → {}", output.display());
        }
    }

    Ok(())
}
