use std::path::PathBuf;
use std::process::ExitCode;

use avhrr2mitiff::image_pipeline::{
    AvhrrToMitiffPipeline, ConversionConfig, LegacyGridShift, OperatingMode, TiffCompression,
};
use avhrr2mitiff::logger;
use clap::{ArgGroup, Parser};

use tracing::{error, info};

/// Convert an AVHRR level-2 pass into a calibrated 8-bit MITIFF file.
///
/// The output name is built from the acquisition time and area,
/// e.g. n200103150846msn.mitiff.
#[derive(Parser, Debug)]
#[command(name = "avhrr2mitiff", version)]
#[command(group(ArgGroup::new("chain").args(["operational", "experimental"])))]
struct Cli {
    /// Input file, full path and filename
    #[arg(short = 'i', value_name = "INFILE")]
    input: PathBuf,

    /// Output directory (only the path, not the filename)
    #[arg(short = 'p', value_name = "OUTPATH")]
    outpath: PathBuf,

    /// Operational data (8-bit chain)
    #[arg(short = 'o')]
    operational: bool,

    /// Experimental data (16-bit chain, legacy corner reprojection)
    #[arg(short = 'e')]
    experimental: bool,

    /// Eastings offset from the legacy grid to the target grid
    #[arg(long, env = "AVHRR2MITIFF_LEGACY_DE", default_value_t = 0.0, allow_negative_numbers = true)]
    legacy_de: f64,

    /// Northings offset from the legacy grid to the target grid
    #[arg(long, env = "AVHRR2MITIFF_LEGACY_DN", default_value_t = 0.0, allow_negative_numbers = true)]
    legacy_dn: f64,

    /// TIFF compression: none, lzw, deflate-fast, deflate, deflate-best
    #[arg(long, default_value = "none")]
    compression: TiffCompression,

    /// Convert channels one after another instead of in parallel
    #[arg(long)]
    sequential: bool,
}

fn main() -> ExitCode {
    // clap prints usage and exits with status 2 on bad arguments.
    let cli = Cli::parse();
    logger::init();

    let mode = if cli.experimental {
        OperatingMode::Experimental
    } else {
        OperatingMode::Operational
    };

    let config = ConversionConfig::builder()
        .mode(mode)
        .compression(cli.compression)
        .parallel(!cli.sequential)
        .legacy_shift(LegacyGridShift::new(cli.legacy_de, cli.legacy_dn))
        .build();
    let pipeline = AvhrrToMitiffPipeline::new(config);

    info!(
        mode = ?pipeline.config().mode,
        compression = ?pipeline.config().compression,
        "AVHRR to MITIFF pipeline initialized"
    );

    match pipeline.convert_file(&cli.input, &cli.outpath) {
        Ok(path) => {
            info!(output = %path.display(), "Conversion successful");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Conversion failed: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
