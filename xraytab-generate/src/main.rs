//! Builds the compressed table blob read by `xraytab` from the upstream
//! XrayDB `data_sources` text files.

mod chantler;
mod elam;
mod parsers;
mod waasmaier;

use std::path::PathBuf;

use anyhow::{Context, bail, ensure};
use clap::Parser;
use log::info;
use xraytab_data::XrayDatabase;

#[derive(Debug, Parser)]
#[command(version, about = "Build the xraytab table blob from XrayDB data sources")]
struct Args {
    /// XrayDB `data_sources` directory (elam.dat, chantler/, ...)
    #[arg(long, env = "XRAYTAB_SOURCE", default_value = "XrayDB/data_sources")]
    source: PathBuf,

    /// Output file for the postcard + zstd blob
    #[arg(long, short, default_value = "xraydb.bin.zst")]
    output: PathBuf,

    /// zstd compression level
    #[arg(long, default_value_t = 19)]
    level: i32,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let dir = &args.source;
    if !dir.is_dir() {
        bail!(
            "data_sources directory not found at {dir:?}; clone https://github.com/xraypy/XrayDB and pass --source"
        );
    }
    info!("reading X-ray data from {dir:?}");

    let version = parsers::parse_version(&dir.join("Version.dat"))?;
    let elements = parsers::parse_elements(&dir.join("elemental_data.txt"))?;
    info!("{} version records, {} elements", version.len(), elements.len());

    let widths = parsers::parse_core_widths(
        &dir.join("keskirahkonen_krause.dat"),
        &dir.join("krause_oliver1979.dat"),
    )?;
    info!(
        "core-hole widths: {} Keski-Rahkonen/Krause, {} merged",
        widths.keski_rahkonen_krause.len(),
        widths.merged.len()
    );

    let waasmaier = waasmaier::parse_waasmaier(&dir.join("waasmaeir_kirfel.dat"))?;
    info!("{} Waasmaier-Kirfel ions", waasmaier.len());

    let elam = elam::parse_elam(&dir.join("elam.dat"))?;
    info!(
        "Elam: {} edges, {} lines, {} Coster-Kronig, {} photo, {} scatter",
        elam.levels.len(),
        elam.transitions.len(),
        elam.coster_kronig.len(),
        elam.photoabsorption.len(),
        elam.scattering.len(),
    );

    let chantler = chantler::parse_chantler(&dir.join("chantler").join("fine"))?;
    info!("Chantler: {} elements", chantler.len());

    let db = XrayDatabase {
        version,
        elements,
        xray_levels: elam.levels,
        xray_transitions: elam.transitions,
        coster_kronig: elam.coster_kronig,
        photoabsorption: elam.photoabsorption,
        scattering: elam.scattering,
        chantler,
        waasmaier,
        keski_rahkonen_krause: widths.keski_rahkonen_krause,
        corelevel_widths: widths.merged,
    };

    let serialized = postcard::to_allocvec(&db).context("postcard serialization failed")?;
    let compressed =
        zstd::encode_all(&serialized[..], args.level).context("zstd compression failed")?;
    info!(
        "serialized {} bytes, compressed to {} bytes ({:.1}x)",
        serialized.len(),
        compressed.len(),
        serialized.len() as f64 / compressed.len() as f64
    );

    let decompressed = zstd::decode_all(&compressed[..]).context("zstd decompression failed")?;
    ensure!(
        decompressed == serialized,
        "compressed blob does not round-trip"
    );
    let _: XrayDatabase =
        postcard::from_bytes(&decompressed).context("blob does not deserialize")?;

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create output directory {parent:?}"))?;
    }
    std::fs::write(&args.output, &compressed)
        .with_context(|| format!("cannot write {:?}", args.output))?;
    info!("wrote {:?}", args.output);
    Ok(())
}
