//! Cache file schema and listing types

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Timestamp format written into cache metadata (microsecond precision, no offset).
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Informational timestamps stored with each cached order. Never read back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub saved_at: String,
    #[serde(default)]
    pub last_updated: String,
}

/// A cached executive order as persisted in `<identifier>.json`.
///
/// `data` is the registry listing record and `content` the registry detail
/// record. Both are kept as opaque maps so unknown keys survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveOrder {
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub content: Map<String, Value>,
}

impl ExecutiveOrder {
    /// Wrap a listing record and its detail record, stamping both timestamps with now.
    pub fn new(data: Map<String, Value>, content: Map<String, Value>) -> Self {
        let now = Local::now().format(TIMESTAMP_FORMAT).to_string();
        Self {
            metadata: Metadata {
                saved_at: now.clone(),
                last_updated: now,
            },
            data,
            content,
        }
    }

    /// Look up a string field in `data`, treating empty strings as absent.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        non_empty_str(self.data.get(key))
    }

    /// Look up a string field in `content`, treating empty strings as absent.
    pub fn content_str(&self, key: &str) -> Option<&str> {
        non_empty_str(self.content.get(key))
    }

    pub fn title(&self) -> String {
        display_value(self.data.get("title"), "No Title")
    }

    pub fn document_number(&self) -> String {
        display_value(self.data.get("document_number"), "Unknown")
    }

    pub fn publication_date(&self) -> String {
        display_value(self.data.get("publication_date"), "N/A")
    }

    pub fn signing_date(&self) -> String {
        display_value(self.content.get("signing_date"), "N/A")
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Render a JSON field for display, falling back when it is absent or null.
pub fn display_value(value: Option<&Value>, fallback: &str) -> String {
    match value {
        None | Some(Value::Null) => fallback.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Resolve the cache identifier for a registry record.
///
/// Prefers `executive_order_number`, falling back to `document_number`.
/// Empty strings, zero and null count as absent.
pub fn order_identifier(record: &Map<String, Value>) -> Option<String> {
    identifier_value(record.get("executive_order_number"))
        .or_else(|| identifier_value(record.get("document_number")))
}

fn identifier_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// One row of the dashboard listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRow {
    /// Cache filename stem, used as the route key.
    pub id: String,
    pub doc_number: String,
    pub title: String,
    pub publication_date: String,
    pub signing_date: String,
    pub filename: String,
}

impl OrderRow {
    pub fn from_order(filename: &str, order: &ExecutiveOrder) -> Self {
        let id = filename
            .strip_suffix(".json")
            .unwrap_or(filename)
            .to_string();
        Self {
            id,
            doc_number: order.document_number(),
            title: order.title(),
            publication_date: order.publication_date(),
            signing_date: order.signing_date(),
            filename: filename.to_string(),
        }
    }

    pub fn sort_value(&self, key: SortKey) -> &str {
        match key {
            SortKey::SigningDate => &self.signing_date,
            SortKey::PublicationDate => &self.publication_date,
        }
    }
}

/// Listing column that can be sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    SigningDate,
    PublicationDate,
}

impl SortKey {
    /// Parse a `sort_by` query value. Unknown values mean "leave unsorted".
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "signing_date" => Some(SortKey::SigningDate),
            "publication_date" => Some(SortKey::PublicationDate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::SigningDate => "signing_date",
            SortKey::PublicationDate => "publication_date",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Only the exact value `desc` selects descending order.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_identifier_prefers_executive_order_number() {
        let record = map(json!({
            "executive_order_number": 14148,
            "document_number": "2025-01189"
        }));
        assert_eq!(order_identifier(&record), Some("14148".to_string()));
    }

    #[test]
    fn test_identifier_falls_back_to_document_number() {
        let record = map(json!({
            "executive_order_number": null,
            "document_number": "2025-01189"
        }));
        assert_eq!(order_identifier(&record), Some("2025-01189".to_string()));

        let record = map(json!({"executive_order_number": "", "document_number": "2025-02000"}));
        assert_eq!(order_identifier(&record), Some("2025-02000".to_string()));
    }

    #[test]
    fn test_identifier_missing() {
        let record = map(json!({"title": "No ids here"}));
        assert_eq!(order_identifier(&record), None);
    }

    #[test]
    fn test_missing_groups_deserialize_empty() {
        let order: ExecutiveOrder =
            serde_json::from_str(r#"{"data": {"title": "Only data"}}"#).unwrap();
        assert_eq!(order.title(), "Only data");
        assert!(order.content.is_empty());
        assert_eq!(order.metadata, Metadata::default());
    }

    #[test]
    fn test_display_fallbacks() {
        let order = ExecutiveOrder::default();
        assert_eq!(order.document_number(), "Unknown");
        assert_eq!(order.title(), "No Title");
        assert_eq!(order.publication_date(), "N/A");
        assert_eq!(order.signing_date(), "N/A");
    }

    #[test]
    fn test_null_field_uses_fallback_and_numbers_render() {
        let order = ExecutiveOrder {
            data: map(json!({"title": null, "document_number": 42})),
            ..Default::default()
        };
        assert_eq!(order.title(), "No Title");
        assert_eq!(order.document_number(), "42");
    }

    #[test]
    fn test_new_stamps_matching_timestamps() {
        let order = ExecutiveOrder::new(Map::new(), Map::new());
        assert!(!order.metadata.saved_at.is_empty());
        assert_eq!(order.metadata.saved_at, order.metadata.last_updated);
        assert!(order.metadata.saved_at.contains('T'));
    }

    #[test]
    fn test_row_id_strips_json_suffix() {
        let order = ExecutiveOrder {
            data: map(json!({"document_number": "2025-01189"})),
            ..Default::default()
        };
        let row = OrderRow::from_order("14148.json", &order);
        assert_eq!(row.id, "14148");
        assert_eq!(row.doc_number, "2025-01189");
        assert_eq!(row.filename, "14148.json");
    }

    #[test]
    fn test_sort_params_parse() {
        assert_eq!(SortKey::parse("signing_date"), Some(SortKey::SigningDate));
        assert_eq!(SortKey::parse("publication_date"), Some(SortKey::PublicationDate));
        assert_eq!(SortKey::parse("title"), None);
        assert_eq!(SortOrder::parse(Some("desc")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(Some("DESC")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(None), SortOrder::Asc);
    }
}
