//! Server-side HTML for the dashboard pages

use std::fmt::Write;

use eo_data::{ExecutiveOrder, OrderRow, SortKey, SortOrder};

const STYLES: &str = r#"
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 960px; color: #222; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #ddd; padding: 0.5rem; text-align: left; vertical-align: top; }
th a { margin-left: 0.25rem; text-decoration: none; }
th a.active { font-weight: bold; }
dl { display: grid; grid-template-columns: max-content 1fr; gap: 0.25rem 1rem; }
dt { font-weight: bold; }
.summary { background: #f6f8fa; border-radius: 6px; padding: 1rem; white-space: pre-wrap; }
.text-muted { color: #6c757d; }
pre { background: #f6f8fa; overflow-x: auto; padding: 1rem; }
"#;

const SUMMARIZE_SCRIPT: &str = r#"
<script>
document.getElementById('summarize-btn').addEventListener('click', function () {
  var out = document.getElementById('summary');
  out.hidden = false;
  out.textContent = 'Summarizing...';
  fetch(this.dataset.url, { headers: { 'X-Requested-With': 'XMLHttpRequest' } })
    .then(function (r) { if (!r.ok) { throw new Error('HTTP ' + r.status); } return r.json(); })
    .then(function (d) { out.innerHTML = d.summary; })
    .catch(function (e) { out.textContent = 'Summarization failed: ' + e.message; });
});
</script>
"#;

/// Escape HTML special characters
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Path of an order's detail page, with the id percent-encoded
fn order_href(id: &str) -> String {
    format!("/order/{}", urlencoding::encode(id))
}

/// Wrap page content in a full HTML document
fn layout(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>{STYLES}</style>
</head>
<body>
{content}
</body>
</html>
"#,
        title = html_escape(title),
    )
}

fn sort_link(key: SortKey, order: SortOrder, current: Option<(SortKey, SortOrder)>) -> String {
    let arrow = match order {
        SortOrder::Asc => "&#9650;",
        SortOrder::Desc => "&#9660;",
    };
    let class = if current == Some((key, order)) {
        r#" class="active""#
    } else {
        ""
    };
    format!(
        r#"<a href="/?sort_by={}&amp;sort_order={}"{}>{}</a>"#,
        key.as_str(),
        order.as_str(),
        class,
        arrow
    )
}

fn sortable_header(label: &str, key: SortKey, current: Option<(SortKey, SortOrder)>) -> String {
    format!(
        "<th>{}{}{}</th>",
        label,
        sort_link(key, SortOrder::Asc, current),
        sort_link(key, SortOrder::Desc, current)
    )
}

/// Listing page with one row per cached order.
pub fn render_index(rows: &[OrderRow], sort_by: Option<SortKey>, sort_order: SortOrder) -> String {
    let current = sort_by.map(|key| (key, sort_order));
    let mut body = String::new();
    body.push_str("<h1>Executive Orders</h1>\n");

    if rows.is_empty() {
        body.push_str(r#"<p class="text-muted">No executive orders cached yet. Run <code>eo-fetch fetch</code> to populate the cache.</p>"#);
        return layout("Executive Orders", &body);
    }

    let _ = writeln!(body, r#"<p class="text-muted">{} orders cached.</p>"#, rows.len());
    body.push_str("<table>\n<thead><tr><th>Document</th><th>Title</th>");
    body.push_str(&sortable_header("Signed", SortKey::SigningDate, current));
    body.push_str(&sortable_header("Published", SortKey::PublicationDate, current));
    body.push_str("</tr></thead>\n<tbody>\n");

    for row in rows {
        let _ = writeln!(
            body,
            r#"<tr><td>{doc}</td><td><a href="{href}">{title}</a></td><td>{signed}</td><td>{published}</td></tr>"#,
            doc = html_escape(&row.doc_number),
            href = html_escape(&order_href(&row.id)),
            title = html_escape(&row.title),
            signed = html_escape(&row.signing_date),
            published = html_escape(&row.publication_date),
        );
    }
    body.push_str("</tbody>\n</table>\n");

    layout("Executive Orders", &body)
}

fn push_field(body: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        let _ = writeln!(body, "<dt>{}</dt><dd>{}</dd>", label, html_escape(value));
    }
}

fn push_link(body: &mut String, label: &str, url: Option<&str>) {
    if let Some(url) = url {
        let url = html_escape(url);
        let _ = writeln!(body, r#"<li><a href="{url}">{label}</a></li>"#);
    }
}

fn order_header(body: &mut String, order: &ExecutiveOrder) {
    let _ = writeln!(body, r#"<p><a href="/">&larr; All orders</a></p>"#);
    let _ = writeln!(body, "<h1>{}</h1>", html_escape(&order.title()));
}

/// Detail page for one cached order.
pub fn render_detail(id: &str, order: &ExecutiveOrder) -> String {
    let mut body = String::new();
    order_header(&mut body, order);

    body.push_str("<dl>\n");
    push_field(&mut body, "Document number", Some(order.document_number().as_str()));
    let eo_number = order
        .data
        .get("executive_order_number")
        .filter(|v| !v.is_null())
        .map(|v| eo_data::types::display_value(Some(v), ""));
    push_field(&mut body, "Executive order", eo_number.as_deref());
    push_field(&mut body, "Signed", Some(order.signing_date().as_str()));
    push_field(&mut body, "Published", Some(order.publication_date().as_str()));
    push_field(
        &mut body,
        "Cached at",
        Some(order.metadata.saved_at.as_str()).filter(|s| !s.is_empty()),
    );
    body.push_str("</dl>\n");

    if let Some(abstract_text) = order.data_str("abstract") {
        let _ = writeln!(body, "<h2>Abstract</h2>\n<p>{}</p>", html_escape(abstract_text));
    }
    if let Some(explanation) = order.content_str("explanation") {
        let _ = writeln!(body, "<h2>Explanation</h2>\n<p>{}</p>", html_escape(explanation));
    }

    body.push_str("<h2>Sources</h2>\n<ul>\n");
    push_link(
        &mut body,
        "Federal Register page",
        order.content_str("html_url").or_else(|| order.data_str("html_url")),
    );
    push_link(
        &mut body,
        "PDF",
        order.content_str("pdf_url").or_else(|| order.data_str("pdf_url")),
    );
    push_link(&mut body, "Raw text", order.content_str("raw_text_url"));
    body.push_str("</ul>\n");

    let _ = writeln!(
        body,
        r#"<h2>Summary</h2>
<p><button id="summarize-btn" data-url="{href}/summarize">Summarize</button>
<a href="{href}/summarize">(open as page)</a></p>
<div id="summary" class="summary" hidden></div>"#,
        href = html_escape(&order_href(id))
    );

    let raw = serde_json::to_string_pretty(order).unwrap_or_default();
    let _ = writeln!(
        body,
        "<details><summary>Cached record</summary>\n<pre>{}</pre>\n</details>",
        html_escape(&raw)
    );
    body.push_str(SUMMARIZE_SCRIPT);

    layout(&order.title(), &body)
}

/// Full-page summary, used when the request did not come from the detail page script.
pub fn render_summary(id: &str, order: &ExecutiveOrder, summary: &str) -> String {
    let mut body = String::new();
    order_header(&mut body, order);
    let _ = writeln!(
        body,
        r#"<p><a href="{}">Order details</a></p>"#,
        html_escape(&order_href(id))
    );
    // The summary already carries its own markup.
    let _ = writeln!(body, "<h2>Summary</h2>\n<div class=\"summary\">{}</div>", summary);
    layout(&format!("Summary: {}", order.title()), &body)
}

/// Error page for 404/500 responses.
pub fn render_error(status: u16, message: &str) -> String {
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"/\">Back to all orders</a></p>",
        status,
        html_escape(message)
    );
    layout(&format!("Error {}", status), &body)
}
