//! Bridge WASM <-> JavaScript trung lập framework cho bộ phân loại badge.

use badge_core::{BadgeConfig, BadgeElement, BadgeError, BadgeKind, BadgeReport, PageDescription};
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

/// Config từ phía JS: trường nào thiếu thì giữ giá trị mặc định.
#[derive(Debug, Default, Deserialize)]
pub struct JsBadgeConfig {
    #[serde(default)]
    class_prefix: Option<String>,
    #[serde(default)]
    alert_dismiss_ms: Option<u32>,
    #[serde(default)]
    tooltip_selector: Option<String>,
    #[serde(default)]
    alert_selector: Option<String>,
    #[serde(default)]
    inject_styles: Option<bool>,
}

impl From<JsBadgeConfig> for BadgeConfig {
    fn from(cfg: JsBadgeConfig) -> Self {
        let mut base = BadgeConfig::default();
        if let Some(prefix) = cfg.class_prefix {
            base.class_prefix = prefix;
        }
        if let Some(ms) = cfg.alert_dismiss_ms {
            base.alert_dismiss_ms = ms;
        }
        if let Some(selector) = cfg.tooltip_selector {
            base.tooltip_selector = selector;
        }
        if let Some(selector) = cfg.alert_selector {
            base.alert_selector = selector;
        }
        if let Some(inject) = cfg.inject_styles {
            base.inject_styles = inject;
        }
        base
    }
}

/// Đọc config tùy chọn do JS truyền vào.
pub fn read_config(config: Option<JsValue>) -> Result<BadgeConfig, JsValue> {
    match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            let cfg: JsBadgeConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            Ok(BadgeConfig::from(cfg))
        }
        _ => Ok(BadgeConfig::default()),
    }
}

/// Kết quả trả về cho JS sau khi xử lý một trang mô tả.
#[derive(Debug, Serialize)]
pub struct EnhancedPage {
    pub elements: Vec<BadgeElement>,
    pub report: BadgeReport,
}

#[wasm_bindgen(js_name = classifyPriority)]
pub fn classify_priority(value: Option<String>) -> String {
    BadgeKind::Priority.classify(value.as_deref()).to_string()
}

#[wasm_bindgen(js_name = classifyStatus)]
pub fn classify_status(value: Option<String>) -> String {
    BadgeKind::Status.classify(value.as_deref()).to_string()
}

/// Tên class đầy đủ (kèm tiền tố) cho một loại badge.
#[wasm_bindgen(js_name = badgeClassName)]
pub fn badge_class_name(
    kind: &str,
    value: Option<String>,
    config: Option<JsValue>,
) -> Result<String, JsValue> {
    let cfg = read_config(config)?;
    class_name_for(kind, value.as_deref(), &cfg)
        .map_err(|err| JsValue::from_str(&format_badge_error(err)))
}

/// Phân loại các phần tử trong một trang mô tả dạng object JS.
#[wasm_bindgen(js_name = enhanceDescription)]
pub fn enhance_description(page: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let page: PageDescription = from_value(page)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được trang mô tả: {err}")))?;
    let cfg = read_config(config)?;

    to_js(&enhance_page(page, &cfg))
}

/// Serialize sang object JS thuần (map thành object, không phải `Map`).
pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|err| JsValue::from_str(&format!("Không serialize kết quả: {err}")))
}

/// Giống `enhanceDescription` nhưng nhận và trả về chuỗi JSON.
#[wasm_bindgen(js_name = enhanceDescriptionJson)]
pub fn enhance_description_json(
    page_json: &str,
    config: Option<JsValue>,
) -> Result<String, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let cfg = read_config(config)?;
    enhance_page_json(page_json, &cfg).map_err(|err| JsValue::from_str(&format_badge_error(err)))
}

pub fn enhance_page(mut page: PageDescription, config: &BadgeConfig) -> EnhancedPage {
    let report = page.enhance(config);
    EnhancedPage {
        elements: page.elements,
        report,
    }
}

pub fn enhance_page_json(page_json: &str, config: &BadgeConfig) -> Result<String, BadgeError> {
    let page: PageDescription =
        serde_json::from_str(page_json).map_err(|err| BadgeError::Parse(err.to_string()))?;
    serde_json::to_string(&enhance_page(page, config))
        .map_err(|err| BadgeError::Parse(err.to_string()))
}

fn class_name_for(
    kind: &str,
    value: Option<&str>,
    config: &BadgeConfig,
) -> Result<String, BadgeError> {
    let kind: BadgeKind = kind.parse()?;
    Ok(config.class_name(kind.classify(value)))
}

fn format_badge_error(err: BadgeError) -> String {
    format!("Badge error: {err}")
}
