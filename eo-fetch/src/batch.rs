//! Batch driver: persist fetched orders and print a report

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use eo_data::types::display_value;
use eo_data::{order_identifier, save_order_in, ExecutiveOrder};
use tracing::{info, warn};

use crate::registry::{Record, RegistryClient};

/// Fetch details for one listing record and write it to the cache.
///
/// Returns `Ok(None)` when the record carries no identifier.
pub async fn save_executive_order(
    registry: &RegistryClient,
    record: &Record,
    cache_dir: &Path,
) -> Result<Option<PathBuf>> {
    let Some(id) = order_identifier(record) else {
        warn!("no identifier found in executive order data; skipping save");
        return Ok(None);
    };

    let details = registry.fetch_executive_order_details(&id).await;
    let order = ExecutiveOrder::new(record.clone(), details);

    let path = save_order_in(cache_dir, &id, &order)
        .with_context(|| format!("failed to save executive order {}", id))?;
    info!(order = %id, path = %path.display(), "saved executive order");
    Ok(Some(path))
}

/// Save every record and write a one-line summary per order to `out`.
///
/// The first failed save aborts the run.
pub async fn display_executive_orders(
    registry: &RegistryClient,
    records: &[Record],
    cache_dir: &Path,
    out: &mut impl Write,
) -> Result<()> {
    if records.is_empty() {
        info!("no executive orders to display");
        return Ok(());
    }

    info!(count = records.len(), "processing executive orders");
    writeln!(out, "\nEXECUTIVE ORDERS")?;
    writeln!(out, "{}", "=".repeat(80))?;

    for record in records {
        save_executive_order(registry, record, cache_dir).await?;

        let line = report_line(record);
        info!(order = %line, "processed executive order");
        writeln!(out, "{}", line)?;
        writeln!(out, "{}", "-".repeat(80))?;
    }

    info!(total = records.len(), "total executive orders processed");
    writeln!(out, "\nTotal executive orders: {}", records.len())?;
    Ok(())
}

fn report_line(record: &Record) -> String {
    let identifier = order_identifier(record).unwrap_or_else(|| "N/A".to_string());
    let title = display_value(record.get("title"), "No title");
    let pub_date = display_value(record.get("publication_date"), "Unknown date");
    format!("{}: {} (Published: {})", identifier, title, pub_date)
}
