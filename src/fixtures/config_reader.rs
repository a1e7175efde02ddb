use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::fixtures::*;

pub const DEFAULT_GEOJSON_PATH: &str = "InShort/Resources/Fixtures/us_states.geojson";
pub const DEFAULT_VOTES_PATH: &str = "InShort/Resources/Fixtures/votes.json";
pub const DEFAULT_ENTRIES: usize = 100000;

/// The content of a configuration file. All the keys are optional.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureConfig {
    #[serde(rename = "geojsonPath")]
    pub geojson_path: Option<String>,
    #[serde(rename = "votesPath")]
    pub votes_path: Option<String>,
    pub entries: Option<usize>,
    pub seed: Option<u64>,
    #[serde(rename = "referencePath")]
    pub reference_path: Option<String>,
}

/// The settings of one run, after merging the command line, the
/// configuration file and the defaults.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FixtureSettings {
    pub geojson_path: String,
    pub votes_path: String,
    pub entries: usize,
    pub seed: Option<u64>,
    pub reference_path: Option<String>,
}

pub fn read_config(path: &str) -> FixtureResult<FixtureConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: FixtureConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

/// Command line flags win over the configuration file, which wins over the defaults.
pub fn resolve_settings(args: &Args) -> FixtureResult<FixtureSettings> {
    let (config, root) = match &args.config {
        Some(config_p) => {
            let config = read_config(config_p)?;
            let root = Path::new(config_p).parent().map(|p| p.to_path_buf());
            (config, root)
        }
        None => (FixtureConfig::default(), None),
    };
    let from_config = |p: Option<String>| p.map(|s| relative_to(root.as_deref(), s));

    Ok(FixtureSettings {
        geojson_path: args
            .input
            .clone()
            .or_else(|| from_config(config.geojson_path.clone()))
            .unwrap_or_else(|| DEFAULT_GEOJSON_PATH.to_string()),
        votes_path: args
            .out
            .clone()
            .or_else(|| from_config(config.votes_path.clone()))
            .unwrap_or_else(|| DEFAULT_VOTES_PATH.to_string()),
        entries: args.entries.or(config.entries).unwrap_or(DEFAULT_ENTRIES),
        seed: args.seed.or(config.seed),
        reference_path: args
            .reference
            .clone()
            .or_else(|| from_config(config.reference_path.clone())),
    })
}

fn relative_to(root: Option<&Path>, path: String) -> String {
    match root {
        Some(r) if path != STDOUT && Path::new(&path).is_relative() => {
            r.join(&path).display().to_string()
        }
        _ => path,
    }
}
