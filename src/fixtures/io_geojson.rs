// Primitives for reading the region identifiers out of GeoJSON files.

use std::collections::BTreeSet;
use std::fs;

use log::{debug, info};
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use snafu::prelude::*;

use crate::fixtures::*;

/// The feature properties that can name a region, by order of preference.
const IDENTIFIER_KEYS: [&str; 3] = ["abbr", "NAME", "STATEFP"];

pub fn load_identifiers(path: &str) -> FixtureResult<Vec<String>> {
    info!("Attempting to read GeoJSON file {:?}", path);
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let geo: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    extract_identifiers(path, &geo)
}

/// The sorted, deduplicated identifiers of all the features.
///
/// For each feature, the first property of `IDENTIFIER_KEYS` holding a
/// non-empty value is selected. The feature is skipped when that value is not a
/// string: a numeric code does not fall through to the next key.
pub fn extract_identifiers(path: &str, geo: &JSValue) -> FixtureResult<Vec<String>> {
    let root = geo.as_object().context(MalformedGeoJsonSnafu {
        path,
        reason: "the top-level value is not an object",
    })?;
    let features: &[JSValue] = match root.get("features") {
        None => &[],
        Some(JSValue::Array(list)) => list.as_slice(),
        Some(_) => {
            return MalformedGeoJsonSnafu {
                path,
                reason: "'features' is not an array",
            }
            .fail()
        }
    };

    let mut ids: BTreeSet<String> = BTreeSet::new();
    let mut skipped: usize = 0;
    for (idx, feature) in features.iter().enumerate() {
        let feature_obj = feature
            .as_object()
            .with_context(|| MalformedGeoJsonSnafu {
                path,
                reason: format!("feature {} is not an object", idx),
            })?;
        let props = match feature_obj.get("properties") {
            None | Some(JSValue::Null) => None,
            Some(JSValue::Object(m)) => Some(m),
            Some(_) => {
                return MalformedGeoJsonSnafu {
                    path,
                    reason: format!("the properties of feature {} are not an object", idx),
                }
                .fail()
            }
        };
        match props.and_then(select_identifier) {
            Some(id) => {
                ids.insert(id.to_string());
            }
            None => {
                debug!("extract_identifiers: feature {}: no usable identifier", idx);
                skipped += 1;
            }
        }
    }
    debug!(
        "extract_identifiers: {} features, {} skipped, {} distinct identifiers",
        features.len(),
        skipped,
        ids.len()
    );
    Ok(ids.into_iter().collect())
}

fn select_identifier(props: &JSMap<String, JSValue>) -> Option<&str> {
    IDENTIFIER_KEYS
        .iter()
        .filter_map(|k| props.get(*k))
        .find(|v| is_filled(v))
        .and_then(|v| v.as_str())
}

// Empty, zero, false and null values do not name anything.
fn is_filled(v: &JSValue) -> bool {
    match v {
        JSValue::Null => false,
        JSValue::Bool(b) => *b,
        JSValue::Number(n) => n.as_f64().map(|x| x != 0.0).unwrap_or(true),
        JSValue::String(s) => !s.is_empty(),
        JSValue::Array(a) => !a.is_empty(),
        JSValue::Object(o) => !o.is_empty(),
    }
}
