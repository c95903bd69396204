//! This example exports a small table of UTM coordinates the way a survey table is usually
//! entered: one row per measured point.
//!
//! Run it with the output file name. The format is selected by the file extension (`.kml`, `.kmz`
//! or `.shp`). Hemisphere and zone are optional and default to `North` and `18`.
//!
//! ```shell
//! cargo run --example export_table -- survey.kmz South 19
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use geoexport::{ExportFormat, FeatureStore, GeometryKind, TableRow, UtmParams};
use log::info;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        return Err(anyhow!(
            "This example must be run with the output file name, optionally followed by hemisphere and zone"
        ));
    };
    let hemisphere = args.next().unwrap_or_else(|| "North".to_string());
    let zone = args.next().unwrap_or_else(|| "18".to_string());

    let format = ExportFormat::from_path(&path)
        .ok_or_else(|| anyhow!("Cannot tell export format from file name {path:?}"))?;
    let params = UtmParams::parse(&hemisphere, &zone)?;

    let rows = [
        TableRow::new(1, 500_000.0, 4_000_000.0),
        TableRow::new(2, 500_250.0, 4_000_120.0),
        TableRow::new(3, 500_410.0, 4_000_390.0),
        TableRow::new(4, 500_180.0, 4_000_520.0),
    ];
    let store = FeatureStore::from_rows(
        params,
        &rows,
        &[
            GeometryKind::Point,
            GeometryKind::Polyline,
            GeometryKind::Polygon,
        ],
    )?;

    let report = store.export(format, &path)?;
    info!(
        "Exported {} features from EPSG:{}, {} skipped",
        report.exported,
        params.epsg(),
        report.skipped_features()
    );
    for file in &report.files {
        println!("{}", file.display());
    }
    for warning in &report.warnings {
        println!("warning: {warning}");
    }

    Ok(())
}
