#![cfg(target_arch = "wasm32")]

use badge_core::{BadgeError, BadgeTarget};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

/// Bọc một DOM `Element` để bộ phân loại lõi gắn class lên.
pub struct WebBadge(Element);

impl WebBadge {
    pub fn new(element: Element) -> Self {
        Self(element)
    }

    pub fn element(&self) -> &Element {
        &self.0
    }
}

impl BadgeTarget for WebBadge {
    type Error = BadgeError;

    fn data_attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn add_class(&mut self, class: &str) -> Result<(), Self::Error> {
        self.0.class_list().add_1(class).map_err(js_error)
    }
}

pub fn js_error(err: JsValue) -> BadgeError {
    BadgeError::Target(format!("{err:?}"))
}

/// Các phần tử con của `root` khớp `selector`, theo thứ tự tài liệu.
pub fn query_all(root: &Element, selector: &str) -> Result<Vec<Element>, JsValue> {
    let nodes = root.query_selector_all(selector)?;
    let mut elements = Vec::with_capacity(nodes.length() as usize);
    for index in 0..nodes.length() {
        if let Some(element) = nodes.get(index).and_then(|node| node.dyn_into::<Element>().ok()) {
            elements.push(element);
        }
    }
    Ok(elements)
}

pub fn elements_from_values(values: Box<[JsValue]>) -> Result<Vec<Element>, JsValue> {
    values
        .into_vec()
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            value.dyn_into::<Element>().map_err(|_| {
                JsValue::from_str(&format!("Phần tử thứ {index} không phải DOM Element"))
            })
        })
        .collect()
}
