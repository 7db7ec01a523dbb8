use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use laser_datasheet::cli::{self, ConfigOverrides};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "datasheet")]
#[command(about = "Laser-diode datasheet intake: sort raw files, resolve devices, match SKUs.")]
#[command(long_about = "Datasheet - test-station intake for laser-diode datasheets

COMMANDS:
  sort      - Copy raw files into the output folder, sorted into LIV/SMSR/Other
  devices   - Parse LIV plots into Devices.xlsx (Lot_ID, Dev#, SN, SKU)
  repair    - Trim repeated sweeps from text files, write the phrase report
  prepare   - sort + devices + repair, in that order
  parse     - Show the Lot_ID/Dev# parsed from filenames
  match     - Show the SKU chosen for a Lot_ID
  check     - Verify every manifest row has its measurement files

EXAMPLES:
  datasheet prepare --config station.yaml
  datasheet parse 852-DBRL051723C-G2X-25-79_0.1500A_LIV_vs_Temp.jpg
  datasheet match 795-DBRL051525B-G11X --sku 790DBRL --sku 795DBRLITE

Logging goes to stderr; set RUST_LOG=debug for per-file detail.")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// YAML config file (defaults are used when omitted)
    #[arg(short, long, global = true, env = "DATASHEET_CONFIG")]
    config: Option<PathBuf>,

    /// Raw data folder (overrides source_dir)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Output folder (overrides output_dir)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Workbook with the SKU key sheet (overrides catalog.path)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy raw files and sort them into folders
    Sort {
        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Build the device manifest from the LIV folder.

Every .jpg in LIV/ is parsed into (Lot_ID, Dev#). Each unique device gets
one row; the SKU is looked up in the key sheet of the template workbook.

SKU MATCHING:
  Lot 795-DBRL... → wavelength 795, type DBRL
  Candidates: SKUs within ±tolerance nm that contain the type
  Ranking: closest wavelength, then longest type code (DBRLITE > DBRL),
           then shortest SKU

If the key sheet cannot be read the manifest is still written, with the
SKU column blank for manual completion.")]
    /// Build Devices.xlsx from the LIV folder
    Devices {
        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Trim repeated headers from text files in the Other folder
    Repair {
        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run sort, devices and repair in order
    Prepare {
        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Parse filenames into Lot_ID and Dev#
    Parse {
        /// Measurement filenames
        #[arg(required = true)]
        filenames: Vec<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find the best SKU for a Lot_ID
    Match {
        /// Lot identifier, e.g. 795-DBRL051525B-G11X
        lot_id: String,

        /// Candidate SKU (repeatable); replaces the catalog workbook
        #[arg(long = "sku")]
        skus: Vec<String>,
    },

    /// Check that each manifest device has its measurement files
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let global = cli.global;
    let load_config = move || {
        cli::load_config(
            global.config,
            ConfigOverrides {
                source: global.source,
                output: global.output,
                catalog: global.catalog,
            },
        )
        .context("failed to load configuration")
    };

    match cli.command {
        Commands::Parse { filenames, json } => {
            cli::parse(filenames, json)?;
        }
        Commands::Sort { verbose } => {
            cli::sort(&load_config()?, verbose)?;
        }
        Commands::Devices { verbose } => {
            cli::devices(&load_config()?, verbose)?;
        }
        Commands::Repair { verbose } => {
            cli::repair(&load_config()?, verbose)?;
        }
        Commands::Prepare { verbose } => cli::prepare(&load_config()?, verbose)?,
        Commands::Match { lot_id, skus } => {
            cli::match_sku(&load_config()?, lot_id, skus)?;
        }
        Commands::Check => {
            cli::check(&load_config()?)?;
        }
    }

    Ok(())
}
