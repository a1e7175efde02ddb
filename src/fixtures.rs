use log::{debug, info};

use district_votes::*;
use snafu::{prelude::*, Snafu};

use crate::args::Args;

pub mod config_reader;
pub mod io_geojson;
pub mod io_votes;

use crate::fixtures::config_reader::*;
use crate::fixtures::io_geojson::*;
use crate::fixtures::io_votes::*;

#[derive(Debug, Snafu)]
pub enum FixtureError {
    #[snafu(display("Error opening file {path}: {source}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}: {source}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Malformed GeoJSON file {path}: {reason}"))]
    MalformedGeoJson { path: String, reason: String },
    #[snafu(display("No valid identifiers found in {path}"))]
    NoIdentifiers { path: String },
    #[snafu(display("Error generating votes: {source}"))]
    Generation { source: GenerationErrors },
    #[snafu(display("Error writing votes to {path}: {source}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error serializing votes: {source}"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Difference detected between generated votes and reference {path}"))]
    ReferenceMismatch { path: String },
}

type FixtureResult<T> = Result<T, FixtureError>;

/// Reads the identifiers, generates the votes and writes them out.
///
/// Nothing is written when the input yields no identifier or when the
/// generated votes do not match the reference.
pub fn run_generation(args: &Args) -> FixtureResult<()> {
    let settings = resolve_settings(args)?;
    info!("settings: {:?}", settings);

    let districts = load_identifiers(&settings.geojson_path)?;
    ensure!(
        !districts.is_empty(),
        NoIdentifiersSnafu {
            path: settings.geojson_path.clone()
        }
    );
    info!(
        "Found {} identifiers in {}",
        districts.len(),
        settings.geojson_path
    );
    debug!("identifiers: {:?}", districts);

    let records = generate_votes(
        &districts,
        settings.entries,
        &GenerationRules::DEFAULT_RULES,
        settings.seed,
    )
    .context(GenerationSnafu {})?;

    let pretty_js_votes = votes_to_pretty_json(&records)?;

    // The reference, if provided for comparison
    if let Some(reference_p) = &settings.reference_path {
        check_reference(reference_p, &pretty_js_votes)?;
    }

    write_votes(&settings.votes_path, &pretty_js_votes)?;

    let summary = format!(
        "Wrote {} entries for {} identifiers to {}",
        records.len(),
        districts.len(),
        settings.votes_path
    );
    if settings.votes_path == STDOUT {
        info!("{}", summary);
    } else {
        println!("{}", summary);
    }
    Ok(())
}
