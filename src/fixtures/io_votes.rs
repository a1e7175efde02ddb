// Reading and writing votes files.

use std::fs;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use text_diff::print_diff;

use district_votes::VoteRecord;

use crate::fixtures::*;

/// Output location that sends the votes to the standard output.
pub const STDOUT: &str = "stdout";

/// One entry of a votes file.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct VoteEntry {
    pub district: String,
    pub yes: u64,
    pub no: u64,
}

impl From<&VoteRecord> for VoteEntry {
    fn from(r: &VoteRecord) -> Self {
        VoteEntry {
            district: r.district.clone(),
            yes: r.yes,
            no: r.no,
        }
    }
}

pub fn votes_to_pretty_json(records: &[VoteRecord]) -> FixtureResult<String> {
    let entries: Vec<VoteEntry> = records.iter().map(VoteEntry::from).collect();
    serde_json::to_string_pretty(&entries).context(SerializingJsonSnafu {})
}

pub fn write_votes(path: &str, contents: &str) -> FixtureResult<()> {
    if path == STDOUT {
        println!("{}", contents);
        return Ok(());
    }
    fs::write(path, contents).context(WritingOutputSnafu { path })
}

pub fn read_votes(path: &str) -> FixtureResult<Vec<VoteEntry>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

/// Fails if the votes in `path` are not exactly `pretty_js_votes`.
///
/// The reference goes through the same serializer first, so that only the
/// content is compared and not the formatting.
pub fn check_reference(path: &str, pretty_js_votes: &str) -> FixtureResult<()> {
    let reference = read_votes(path)?;
    let pretty_js_reference =
        serde_json::to_string_pretty(&reference).context(SerializingJsonSnafu {})?;
    if pretty_js_reference != pretty_js_votes {
        warn!("Found differences with the reference file {}", path);
        print_diff(pretty_js_reference.as_str(), pretty_js_votes, "\n");
        return ReferenceMismatchSnafu { path }.fail();
    }
    info!("Generated votes match the reference file {}", path);
    Ok(())
}
