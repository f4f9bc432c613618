//! Server-rendered pages.
//!
//! Every page shares the same chrome: a header linking home, an "Under
//! Construction" banner and the university footer. The map page embeds the
//! map command as JSON for the Leaflet shim.

use serde::Serialize;

use field_common::{FieldSummary, StoredField};
use field_map::{
    escape_html, MapCommand, SelectionState, TableView, TableWindow, ViewMode,
    MOBILE_BREAKPOINT_PX,
};
use ingestion::{accept_attribute, SHAPE_ARCHIVE_EXTENSIONS, SPREADSHEET_EXTENSIONS};

pub const FORM_ERROR_MESSAGE: &str = "An error occurred while submitting the form. Please try again.";
pub const FORM_SUCCESS_MESSAGE: &str = "Form submitted successfully! Redirecting...";

/// Seconds the success page waits before returning to the dashboard.
pub const SUCCESS_REDIRECT_SECS: u32 = 2;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

const STYLE: &str = r#"
body { margin: 0; font-family: sans-serif; display: flex; flex-direction: column; min-height: 100vh; }
header { padding: 0.75rem 1rem; background: #1d4e89; }
header a { color: #fff; font-weight: bold; text-decoration: none; font-size: 1.2rem; }
.banner { background: #f6c343; text-align: center; padding: 0.25rem; font-size: 0.9rem; }
main { flex: 1; padding: 1rem; }
footer { padding: 0.5rem 1rem; background: #eee; text-align: center; font-size: 0.85rem; }
.layout { display: flex; gap: 1rem; }
.pane-list { flex: 1; min-width: 0; }
.pane-map { flex: 2; min-width: 0; }
#map { height: 600px; }
.field-list a.selected { font-weight: bold; }
.table-scroll { height: 350px; overflow-y: auto; }
.table-scroll table { border-collapse: collapse; width: 100%; }
.table-scroll td, .table-scroll th { height: 36px; border-bottom: 1px solid #ddd; padding: 0 0.5rem; white-space: nowrap; }
.back-link { display: none; }
.message-error { color: #b00020; }
.message-success { color: #1b7f3b; }
"#;

/// Narrow screens stack the panes and show only the one the view selects.
fn responsive_style() -> String {
    format!(
        r#"@media (max-width: {max}px) {{
  .layout {{ flex-direction: column; }}
  .view-map .pane-list {{ display: none; }}
  .view-table .pane-map {{ display: none; }}
  .back-link {{ display: inline; }}
}}"#,
        max = MOBILE_BREAKPOINT_PX - 1,
    )
}

const MAP_SHIM: &str = r#"
(function () {
  var el = document.getElementById('map-command');
  if (!el || typeof L === 'undefined') { return; }
  var cmd = JSON.parse(el.textContent);
  var map = L.map('map');
  L.tileLayer(cmd.tile_url, { attribution: cmd.attribution }).addTo(map);
  var vp = cmd.viewport;
  if (vp.bounds) {
    map.fitBounds([
      [vp.bounds.south_west.lat, vp.bounds.south_west.lng],
      [vp.bounds.north_east.lat, vp.bounds.north_east.lng]
    ]);
  } else {
    map.setView([vp.center.lat, vp.center.lng], vp.zoom);
  }
  cmd.overlay.forEach(function (f) {
    if (!f.geometry) { return; }
    var layer = L.geoJSON({ type: 'Feature', geometry: f.geometry, properties: {} });
    if (f.popup) { layer.bindPopup(f.popup); }
    layer.addTo(map);
  });
})();
(function () {
  var box = document.getElementById('table-scroll');
  if (!box) { return; }
  var body = box.querySelector('tbody');
  var pending = false;
  function row(cells) {
    var tr = document.createElement('tr');
    cells.forEach(function (c) {
      var td = document.createElement('td');
      td.textContent = c;
      tr.appendChild(td);
    });
    return tr;
  }
  function spacer(h) {
    var tr = document.createElement('tr');
    tr.style.height = h + 'px';
    return tr;
  }
  function refresh() {
    pending = false;
    var url = '/api/fields/' + box.dataset.field + '/rows?scroll_top=' +
      Math.round(box.scrollTop) + '&viewport_height=' + box.clientHeight;
    fetch(url).then(function (r) { return r.json(); }).then(function (w) {
      body.replaceChildren();
      body.appendChild(spacer(w.top_spacer));
      w.rows.forEach(function (r) { body.appendChild(row(r.cells)); });
      body.appendChild(spacer(w.bottom_spacer));
    });
  }
  box.addEventListener('scroll', function () {
    if (!pending) { pending = true; window.requestAnimationFrame(refresh); }
  });
})();
"#;

/// Serialize a value for a `<script type="application/json">` block.
pub fn embed_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

/// Wrap page content in the shared chrome.
pub fn layout(title: &str, head_extra: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}{responsive}</style>
{head_extra}
</head>
<body>
<header><a href="/">Mekong Project</a></header>
<div class="banner">Under Construction</div>
<main>
{body}
</main>
<footer>Niigata University</footer>
</body>
</html>"#,
        title = escape_html(title),
        responsive = responsive_style(),
    )
}

/// Shown while the initial session check is still running.
pub fn loading_page() -> String {
    layout(
        "Loading",
        r#"<meta http-equiv="refresh" content="1">"#,
        r#"<p class="loading">Loading...</p>"#,
    )
}

/// The selected field prepared for display.
pub struct SelectedField<'a> {
    pub field: &'a StoredField,
    pub table: &'a TableView,
    pub window: &'a TableWindow,
}

fn field_list(fields: &[FieldSummary], selection: &SelectionState) -> String {
    if fields.is_empty() {
        return r#"<p class="empty">No fields yet.</p>"#.to_string();
    }
    let items: String = fields
        .iter()
        .map(|f| {
            let class = if selection.is_selected(f.id) { r#" class="selected""# } else { "" };
            format!(
                r#"<li><a href="/?field={id}&amp;view=map"{class}>{title}</a></li>"#,
                id = f.id,
                title = escape_html(&f.title),
            )
        })
        .collect();
    format!(r#"<ul class="field-list">{}</ul>"#, items)
}

fn table_html(selected: &SelectedField<'_>) -> String {
    if selected.table.headers.is_empty() {
        return String::new();
    }
    let headers: String = selected
        .table
        .headers
        .iter()
        .map(|h| format!("<th>{}</th>", escape_html(h)))
        .collect();
    let rows: String = selected
        .window
        .rows
        .iter()
        .map(|r| {
            let cells: String = r
                .cells
                .iter()
                .map(|c| format!("<td>{}</td>", escape_html(c)))
                .collect();
            format!("<tr>{}</tr>", cells)
        })
        .collect();

    format!(
        r#"<div class="table-scroll" id="table-scroll" data-field="{id}">
<table><thead><tr>{headers}</tr></thead>
<tbody><tr style="height:{top}px"></tr>{rows}<tr style="height:{bottom}px"></tr></tbody></table>
</div>"#,
        id = selected.field.id,
        top = selected.window.top_spacer,
        bottom = selected.window.bottom_spacer,
    )
}

/// Catalog list, selected field table and map.
pub fn map_page(
    fields: &[FieldSummary],
    selection: &SelectionState,
    selected: Option<&SelectedField<'_>>,
    command: &MapCommand,
) -> String {
    let view_class = match selection.view {
        ViewMode::Table => "view-table",
        ViewMode::Map => "view-map",
    };

    let detail = match selected {
        Some(s) => format!(
            r#"<h2>{title}</h2>{table}"#,
            title = escape_html(&s.field.field.title),
            table = table_html(s),
        ),
        None => String::new(),
    };

    let body = format!(
        r#"<div class="layout {view_class}">
<section class="pane-list">
<h1>Fields</h1>
{list}
{detail}
</section>
<section class="pane-map">
<a class="back-link" href="/?view=table">Back</a>
<div id="map"></div>
</section>
</div>
<script type="application/json" id="map-command">{command}</script>
<script src="{LEAFLET_JS}"></script>
<script>{MAP_SHIM}</script>"#,
        list = field_list(fields, selection),
        command = embed_json(command),
    );

    layout(
        "Mekong Project",
        &format!(r#"<link rel="stylesheet" href="{LEAFLET_CSS}">"#),
        &body,
    )
}

/// Guarded admin dashboard.
pub fn admin_page() -> String {
    layout(
        "Admin",
        "",
        r#"<h1>Admin</h1>
<p><a href="/admin/field-creation">Create a new field</a></p>
<form method="post" action="/logout"><button type="submit">Log out</button></form>"#,
    )
}

/// Outcome banner on the creation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMessage {
    Error,
    Success,
}

/// Field creation form, optionally with a submission outcome.
pub fn field_creation_page(message: Option<FormMessage>) -> String {
    let (head, notice) = match message {
        Some(FormMessage::Success) => (
            format!(
                r#"<meta http-equiv="refresh" content="{SUCCESS_REDIRECT_SECS};url=/admin">"#
            ),
            format!(r#"<p class="message-success">{FORM_SUCCESS_MESSAGE}</p>"#),
        ),
        Some(FormMessage::Error) => (
            String::new(),
            format!(r#"<p class="message-error">{FORM_ERROR_MESSAGE}</p>"#),
        ),
        None => (String::new(), String::new()),
    };

    let body = format!(
        r#"<h1>Create Field</h1>
{notice}
<form method="post" action="/admin/field-creation" enctype="multipart/form-data">
<p><label>Title <input type="text" name="title" required></label></p>
<p><label>Shape file <input type="file" name="shapeFile" accept="{shape_accept}" multiple required></label></p>
<p><label>Table file <input type="file" name="tableFile" accept="{table_accept}" required></label></p>
<p><button type="submit">Submit</button></p>
</form>"#,
        shape_accept = accept_attribute(SHAPE_ARCHIVE_EXTENSIONS),
        table_accept = accept_attribute(SPREADSHEET_EXTENSIONS),
    );

    layout("Create Field", &head, &body)
}

/// Token form; `rejected` shows a notice after a mismatching token.
pub fn login_page(rejected: bool) -> String {
    let notice = if rejected {
        r#"<p class="message-error">Invalid token.</p>"#
    } else {
        ""
    };
    layout(
        "Login",
        "",
        &format!(
            r#"<h1>Login</h1>
{notice}
<form method="post" action="/login">
<p><label>Token <input type="password" name="token"></label></p>
<p><button type="submit">Log in</button></p>
</form>"#
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_chrome() {
        let page = layout("T", "", "<p>x</p>");
        assert!(page.contains("Mekong Project"));
        assert!(page.contains("Under Construction"));
        assert!(page.contains("Niigata University"));
    }

    #[test]
    fn test_narrow_layout_follows_breakpoint() {
        let page = layout("T", "", "");
        let query = format!("@media (max-width: {}px)", MOBILE_BREAKPOINT_PX - 1);
        assert!(page.contains(&query));
        assert!(page.contains(".view-map .pane-list { display: none; }"));
    }

    #[test]
    fn test_embed_json_escapes_script_close() {
        let s = embed_json(&serde_json::json!({"popup": "</script><b>"}));
        assert!(!s.contains("</script>"));
        assert!(s.contains("<\\/script>"));
    }

    #[test]
    fn test_success_page_refreshes_to_admin() {
        let page = field_creation_page(Some(FormMessage::Success));
        assert!(page.contains(r#"content="2;url=/admin""#));
        assert!(page.contains(FORM_SUCCESS_MESSAGE));
    }

    #[test]
    fn test_creation_form_accept_lists() {
        let page = field_creation_page(None);
        assert!(page.contains(r#"name="shapeFile""#));
        assert!(page.contains(".zip"));
        assert!(page.contains(".xlsx"));
    }
}
