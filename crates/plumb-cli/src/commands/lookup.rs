use plumb_property::{MockPropertyTable, PropertyLookup, PropertyMatch};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Debug, Serialize)]
struct LookupResponse<'a> {
    address: &'a str,
    #[serde(flatten)]
    found: PropertyMatch,
}

pub async fn handle(address: &str, flags: &GlobalFlags) -> anyhow::Result<()> {
    let found = MockPropertyTable::default().lookup(address).await?;
    if !found.found() {
        tracing::info!(address, "no property record; showing defaults");
    }
    output(
        &LookupResponse {
            address: address.trim(),
            found,
        },
        flags.format,
    )
}
