use anyhow::Result;
use tracing::warn;

use crate::cli::output::{print_json, OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::api::ApiClient;

pub async fn run(
    client: &ApiClient,
    skip: u32,
    limit: u32,
    fetch_all: bool,
    opts: &OutputOptions,
) -> Result<()> {
    let result = if fetch_all {
        client.fetch_all_costs(limit).await
    } else {
        client.fetch_costs(skip, limit).await
    };
    let entries = result.unwrap_or_else(|e| {
        warn!(error = %e, "failed to load costs");
        Vec::new()
    });

    match opts.format {
        OutputFormat::Text => println!("{}", renderer::render_cost_entries(&entries, opts.use_color)),
        OutputFormat::Json => print_json(&entries, opts)?,
    }
    Ok(())
}
