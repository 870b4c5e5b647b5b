use serde::Serialize;

/// Base look shared by every page.
pub const BASE_STYLE: &str = r#"
body { font-family: Arial, sans-serif; margin: 0; }
h1 { color: #333; margin-bottom: 30px; padding: 0px 20px; }
h2 { color: #444; margin-top: 30px; margin-bottom: 15px; }
.stats { padding: 0px 20px; color: #666; font-size: 14px; }
.message { color: #666; font-size: 16px; padding: 0px 20px; }
.error { color: red; padding: 0px 20px; }
"#;

/// Striped, hoverable data tables with sortable-header cues.
pub const TABLE_STYLE: &str = r#"
table { font-size: 14px; width: 100%; max-width: 1480px; margin: 20px auto; border-collapse: collapse; }
th, td { padding: 12px; text-align: left; vertical-align: top; border: 1px solid #ddd; word-wrap: break-word; }
th { background-color: #f2f2f2; font-weight: bold; cursor: pointer; position: relative; white-space: nowrap; }
th:hover { background-color: #e5e5e5; }
th::after { content: ''; position: absolute; right: 8px; top: 50%; transform: translateY(-50%); }
th.sort-desc::after { content: '\25BC'; }
th.sort-asc::after { content: '\25B2'; }
tr:nth-child(even) { background-color: #f9f9f9; }
tr:hover { background-color: #f0f0f0; }
tr.status-warning { background-color: #fff3cd; }
tr.status-error { background-color: #f8d7da; }
.json-cell { white-space: pre-wrap; word-break: break-all; margin: 0; }
"#;

/// Pagination bar and filter buttons for the log tables.
pub const PAGINATION_STYLE: &str = r#"
.pagination { display: flex; justify-content: center; align-items: center; gap: 5px; margin-top: 20px; }
.page-link { padding: 8px 12px; text-decoration: none; color: #333; border: 1px solid #ddd; border-radius: 4px; cursor: pointer; }
.page-link:hover { background-color: #f5f5f5; }
.page-link.active { background-color: #007bff; color: white; border-color: #007bff; }
.filter-buttons { display: flex; gap: 10px; margin-bottom: 15px; }
.filter-btn { padding: 8px 16px; border: 1px solid #ddd; background: white; border-radius: 4px; cursor: pointer; font-size: 14px; }
.filter-btn:hover { background-color: #f5f5f5; }
.filter-btn.active { background-color: #007bff; color: white; border-color: #007bff; }
"#;

/// Time-range buttons used by the timeseries pages.
pub const TIME_FILTER_STYLE: &str = r#"
.controls { display: flex; gap: 5px; padding: 0px 10px; margin-bottom: 10px; }
.time-filter-btn { padding: 8px 16px; margin: 0 5px; border: 1px solid #ccc; background-color: white; border-radius: 4px; cursor: pointer; font-size: 14px; }
.time-filter-btn:hover { background-color: #f0f0f0; }
.time-filter-btn.active { background-color: #1f77b4; color: white; border-color: #1f77b4; }
"#;

/// Overlay modal used for long values and origin details.
pub const MODAL_STYLE: &str = r#"
.modal { display: none; position: fixed; top: 0; left: 0; width: 100%; height: 100%; background-color: rgba(0,0,0,0.5); z-index: 1000; overflow: auto; }
.modal-content { position: relative; background-color: #fefefe; margin: 5% auto; padding: 20px; border: 1px solid #888; max-width: 80%; max-height: 80vh; overflow-y: auto; border-radius: 5px; }
.close-modal { position: absolute; right: 10px; top: 5px; color: #aaa; font-size: 28px; font-weight: bold; cursor: pointer; }
.close-modal:hover { color: #000; }
.view-object-link { color: #007bff; text-decoration: underline; cursor: pointer; }
.view-object-link:hover { color: #0056b3; }
"#;

pub const PLOTLY_CDN: &str =
    r#"<script src="https://cdn.plot.ly/plotly-latest.min.js"></script>"#;

/// Client-side column sorting for a table. `data-sort` on each header picks
/// string or numeric comparison; `data-value` on a cell overrides its text.
pub fn sortable_script(table_id: &str, default_column: usize, default_dir: &str) -> String {
    format!(
        r#"<script>
document.addEventListener('DOMContentLoaded', function() {{
  const table = document.getElementById('{table_id}');
  if (!table) return;
  const headers = table.querySelectorAll('th');
  const tbody = table.querySelector('tbody');

  sortTable({default_column}, '{default_dir}');

  headers.forEach((header, index) => {{
    header.addEventListener('click', () => {{
      const dir = header.classList.contains('sort-desc') ? 'asc' : 'desc';
      headers.forEach(h => h.classList.remove('sort-desc', 'sort-asc'));
      header.classList.add('sort-' + dir);
      sortTable(index, dir);
    }});
  }});

  function sortTable(columnIndex, direction) {{
    const rows = Array.from(tbody.querySelectorAll('tr'));
    const sortType = headers[columnIndex].getAttribute('data-sort');

    rows.sort((a, b) => {{
      let aValue = a.cells[columnIndex].getAttribute('data-value') || a.cells[columnIndex].textContent.trim();
      let bValue = b.cells[columnIndex].getAttribute('data-value') || b.cells[columnIndex].textContent.trim();
      if (sortType === 'number') {{
        aValue = parseFloat(aValue) || 0;
        bValue = parseFloat(bValue) || 0;
      }}
      if (direction === 'asc') {{
        return aValue > bValue ? 1 : -1;
      }}
      return aValue < bValue ? 1 : -1;
    }});

    tbody.innerHTML = '';
    rows.forEach(row => tbody.appendChild(row));
  }}
}});
</script>"#
    )
}

/// Modal open/close handlers. Links carry their payload in a `data-object`
/// attribute and call `showModalFrom(this)`.
pub const MODAL_SCRIPT: &str = r#"<script>
function showModalFrom(el) {
  const modal = document.getElementById('objectModal');
  const content = document.getElementById('modalContent');
  let text = el.dataset.object;
  try { text = JSON.stringify(JSON.parse(text), null, 2); } catch (e) {}
  content.innerHTML = '<pre></pre>';
  content.firstChild.textContent = text;
  modal.style.display = 'block';
}
function closeModal() {
  document.getElementById('objectModal').style.display = 'none';
}
window.addEventListener('click', function(event) {
  const modal = document.getElementById('objectModal');
  if (event.target === modal) { modal.style.display = 'none'; }
});
document.addEventListener('keydown', function(event) {
  if (event.key === 'Escape') { closeModal(); }
});
</script>"#;

/// The modal container element that [`MODAL_SCRIPT`] drives.
pub const MODAL_MARKUP: &str = r#"<div id="objectModal" class="modal">
  <div class="modal-content">
    <span class="close-modal" onclick="closeModal()">&times;</span>
    <div id="modalContent"></div>
  </div>
</div>"#;

/// Assemble a full HTML document.
pub fn document(title: &str, styles: &[&str], head_extra: &str, body: &str) -> String {
    let style_block = styles.concat();
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <title>{title}</title>
    <style>{style_block}</style>
    {head_extra}
  </head>
  <body>
{body}
  </body>
</html>"#,
        title = escape(title),
    )
}

/// Standard failure document: heading, red message, refresh hint.
pub fn error_page(title: &str, message: &str, hint: &str) -> String {
    document(
        &format!("Error - {title}"),
        &[BASE_STYLE],
        "",
        &format!(
            r#"    <h1>Error Fetching {title}</h1>
    <p class="error">{}</p>
    <p class="message">{}</p>"#,
            escape(message),
            escape(hint),
        ),
    )
}

/// Page with just a heading and an informational message.
pub fn empty_page(title: &str, heading: &str, message: &str) -> String {
    document(
        title,
        &[BASE_STYLE],
        "",
        &format!(
            r#"    <h1>{}</h1>
    <p class="message">{}</p>"#,
            escape(heading),
            escape(message),
        ),
    )
}

/// Escape text for interpolation into HTML content or attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize a value for embedding inside a `<script>` tag. Slashes and
/// angle brackets are escaped so upstream data cannot close the tag.
pub fn script_safe_json<T: Serialize>(value: &T) -> String {
    let json = serde_json::to_string(value).unwrap_or_else(|_| "null".to_string());
    json.replace('/', "\\/")
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn escape_covers_html_metacharacters() {
        assert_eq!(
            escape(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn script_json_cannot_close_the_tag() {
        let value = json!({"k": "</script><script>alert(1)"});
        let embedded = script_safe_json(&value);
        assert!(!embedded.contains("</script>"));
        assert!(!embedded.contains('<'));
        assert!(!embedded.contains('>'));
    }

    #[test]
    fn document_escapes_title() {
        let html = document("A <b> title", &[BASE_STYLE], "", "<p>ok</p>");
        assert!(html.contains("<title>A &lt;b&gt; title</title>"));
        assert!(html.contains("<p>ok</p>"));
    }

    #[test]
    fn error_page_carries_message_and_hint() {
        let html = error_page("Logs", "boom", "Please try refreshing the page.");
        assert!(html.contains("Error Fetching Logs"));
        assert!(html.contains("boom"));
        assert!(html.contains("refreshing"));
    }
}
