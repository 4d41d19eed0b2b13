//! Per-resource convenience methods.
//!
//! Each module shapes caller-supplied parameters into a field mapping and
//! calls [`DojoClient::dispatch`](crate::DojoClient::dispatch) exactly
//! once. Optional fields drop out of the outgoing mapping when unset; the
//! remote schema itself stays unmodeled, payloads are opaque JSON.

use serde_json::Value;

use crate::response::DojoResponse;

mod credentials;
mod engagements;
mod findings;
mod groups;
mod products;
mod roles;
mod scans;
mod settings;
mod technologies;
mod tools;
mod users;

pub use credentials::*;
pub use engagements::*;
pub use findings::*;
pub use groups::*;
pub use products::*;
pub use roles::*;
pub use scans::*;
pub use settings::*;
pub use technologies::*;
pub use tests::*;
pub use tools::*;
pub use users::*;

/// Page size sent with list requests unless the caller overrides it.
pub(crate) const DEFAULT_LIMIT: u32 = 20000;

/// Scan a results array for a record whose `key` equals `expected`,
/// returning its id.
pub(crate) fn find_id(results: &[Value], key: &str, expected: &str) -> Option<u64> {
    results
        .iter()
        .find(|record| record.get(key).and_then(Value::as_str) == Some(expected))?
        .get("id")?
        .as_u64()
}

/// Collect a string field from every record of a list response.
pub(crate) fn collect_strings(response: DojoResponse, key: &str) -> Vec<String> {
    response
        .results()
        .map(|results| {
            results
                .iter()
                .filter_map(|record| record.get(key)?.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
