#![cfg(target_arch = "wasm32")]

use badge_ui::enhance_elements;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;
use web_sys::Element;

wasm_bindgen_test_configure!(run_in_browser);

fn badge(marker: &str, attribute: &str, value: &str) -> Element {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .expect("Không có document");
    let element = document.create_element("span").expect("Không tạo được span");
    element.set_class_name(marker);
    element
        .set_attribute(attribute, value)
        .expect("Không gán được thuộc tính");
    element
}

#[wasm_bindgen_test]
fn non_element_values_are_rejected() {
    let result = enhance_elements(vec![JsValue::from_str("span")].into_boxed_slice(), None);
    assert!(result.is_err());
}

#[wasm_bindgen_test]
fn dom_badge_keeps_a_single_class_across_runs() {
    let element = badge("priority-badge", "data-priority", "medium");
    for _ in 0..2 {
        enhance_elements(vec![JsValue::from(element.clone())].into_boxed_slice(), None)
            .expect("Không gắn được badge");
    }
    assert_eq!(element.class_name(), "priority-badge bg-warning");
}

#[wasm_bindgen_test]
fn dom_status_without_known_value_gets_dark() {
    let element = badge("status-badge", "data-status", "pending");
    enhance_elements(vec![JsValue::from(element.clone())].into_boxed_slice(), None)
        .expect("Không gắn được badge");
    assert!(element.class_list().contains("bg-dark"));
}
