#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-badge-ui]";

/// CSS mặc định cho badge khi trang không tải sẵn bộ class của toolkit.
/// Các biến màu có thể ghi đè ở `:root`.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --badge-font-family: system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --badge-radius: 999px;
  --badge-danger: #b42318;
  --badge-warning: #f79009;
  --badge-warning-text: #1f2933;
  --badge-success: #067647;
  --badge-info: #0ba5ec;
  --badge-info-text: #0b1a24;
  --badge-secondary: #667085;
  --badge-dark: #1d2939;
}

.priority-badge,
.status-badge {
  display: inline-flex;
  align-items: center;
  font-family: var(--badge-font-family);
  font-size: 0.75rem;
  font-weight: 600;
  line-height: 1;
  padding: 4px 10px;
  border-radius: var(--badge-radius);
  color: #ffffff;
  text-transform: capitalize;
  white-space: nowrap;
}

.bg-danger { background-color: var(--badge-danger); }
.bg-warning { background-color: var(--badge-warning); color: var(--badge-warning-text); }
.bg-success { background-color: var(--badge-success); }
.bg-info { background-color: var(--badge-info); color: var(--badge-info-text); }
.bg-secondary { background-color: var(--badge-secondary); }
.bg-dark { background-color: var(--badge-dark); }

.incident-badge-table {
  width: 100%;
  border-collapse: collapse;
  font-family: var(--badge-font-family);
}

.incident-badge-table th,
.incident-badge-table td {
  text-align: left;
  padding: 8px 12px;
  border-bottom: 1px solid rgba(148, 163, 184, 0.28);
}

.incident-badge-table th {
  font-size: 0.78rem;
  text-transform: uppercase;
  letter-spacing: 0.04em;
  color: #52606d;
}

.incident-badge-empty {
  color: #52606d;
  font-style: italic;
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document không có thẻ <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-badge-ui", "v1")?;
    style_el.set_text_content(Some(DEFAULT_STYLES));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}
