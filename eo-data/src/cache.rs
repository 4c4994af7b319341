//! Flat-file order cache: one `<identifier>.json` per order

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::error::{CacheError, Result};
use crate::types::{ExecutiveOrder, OrderRow, SortKey, SortOrder};

/// Path of the cache file for an order identifier
pub fn order_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{}.json", id))
}

/// An identifier is only usable as a filename stem if it cannot escape the cache directory.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id != "." && id != ".." && !id.contains(['/', '\\'])
}

/// List every parsable cached order in `dir`, ordered by filename.
///
/// A missing directory yields an empty listing. Files that cannot be read or
/// parsed are logged and skipped.
pub fn list_orders_in(dir: &Path) -> Result<Vec<OrderRow>> {
    if !dir.exists() {
        warn!(dir = %dir.display(), "executive orders directory does not exist");
        return Ok(vec![]);
    }

    let entries = fs::read_dir(dir).map_err(|source| CacheError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    paths.sort();

    let mut rows = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        match read_order(&path) {
            Ok(order) => rows.push(OrderRow::from_order(filename, &order)),
            Err(e) => error!(file = %filename, error = %e, "error loading cached order"),
        }
    }

    info!(count = rows.len(), "loaded executive orders from cache");
    Ok(rows)
}

/// Sort listing rows by a date column using plain string comparison.
///
/// The sort is stable in both directions: rows with equal keys keep their
/// relative order.
pub fn sort_rows(rows: &mut [OrderRow], key: SortKey, order: SortOrder) {
    match order {
        SortOrder::Asc => rows.sort_by(|a, b| a.sort_value(key).cmp(b.sort_value(key))),
        SortOrder::Desc => rows.sort_by(|a, b| b.sort_value(key).cmp(a.sort_value(key))),
    }
}

/// Load a single cached order by identifier
pub fn load_order_in(dir: &Path, id: &str) -> Result<ExecutiveOrder> {
    if !is_valid_id(id) {
        return Err(CacheError::NotFound(id.to_string()));
    }
    let path = order_path(dir, id);
    if !path.exists() {
        return Err(CacheError::NotFound(id.to_string()));
    }
    read_order(&path)
}

fn read_order(path: &Path) -> Result<ExecutiveOrder> {
    let content = fs::read_to_string(path).map_err(|source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CacheError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write an order to `<dir>/<id>.json`, replacing any previous copy.
///
/// The file is written to a hidden temp file first and renamed into place, so
/// concurrent readers see either the old or the new contents.
pub fn save_order_in(dir: &Path, id: &str, order: &ExecutiveOrder) -> Result<PathBuf> {
    if !is_valid_id(id) {
        return Err(CacheError::Io {
            path: order_path(dir, id),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid order identifier '{}'", id),
            ),
        });
    }

    fs::create_dir_all(dir).map_err(|source| CacheError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let contents = serde_json::to_string_pretty(order).map_err(|source| CacheError::Serialize {
        id: id.to_string(),
        source,
    })?;

    let path = order_path(dir, id);
    let tmp_path = dir.join(format!(".{}.json.tmp", id));
    let written = fs::write(&tmp_path, contents)
        .map_err(|source| CacheError::Io {
            path: tmp_path.clone(),
            source,
        })
        .and_then(|()| {
            fs::rename(&tmp_path, &path).map_err(|source| CacheError::Io {
                path: path.clone(),
                source,
            })
        });
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    Ok(path)
}
