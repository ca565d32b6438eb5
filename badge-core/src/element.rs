//! Phần tử badge trong bộ nhớ, dùng cho CLI, bridge JSON và test.

use std::collections::BTreeMap;
use std::convert::Infallible;

use serde::{Deserialize, Serialize};

use crate::{enhance_badges, BadgeConfig, BadgeReport, BadgeTarget};

/// Mô tả tối thiểu của một phần tử: danh sách class và thuộc tính.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BadgeElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl BadgeElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Thêm class theo ngữ nghĩa tập hợp: class đã có thì bỏ qua.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.has_class(&class) {
            self.classes.push(class);
        }
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

impl BadgeTarget for BadgeElement {
    type Error = Infallible;

    fn data_attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|existing| existing == class)
    }

    fn add_class(&mut self, class: &str) -> Result<(), Self::Error> {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
        Ok(())
    }
}

/// Tài liệu JSON mô tả các phần tử của một trang.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageDescription {
    #[serde(default)]
    pub elements: Vec<BadgeElement>,
}

impl PageDescription {
    /// Gắn class badge cho mọi phần tử của trang. Không thể lỗi.
    pub fn enhance(&mut self, config: &BadgeConfig) -> BadgeReport {
        match enhance_badges(&mut self.elements, config) {
            Ok(report) => report,
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_class_ignores_duplicates() {
        let element = BadgeElement::new().with_class("badge").with_class("badge");
        assert_eq!(element.classes(), ["badge"]);
    }

    #[test]
    fn page_enhance_classifies_every_marked_element() {
        let mut page = PageDescription {
            elements: vec![
                BadgeElement::new()
                    .with_class("priority-badge")
                    .with_attribute("data-priority", "critical"),
                BadgeElement::new().with_class("status-badge"),
                BadgeElement::new().with_class("btn"),
            ],
        };
        let report = page.enhance(&BadgeConfig::default());

        assert_eq!(page.elements[0].classes(), ["priority-badge", "bg-danger"]);
        assert_eq!(page.elements[1].classes(), ["status-badge", "bg-dark"]);
        assert_eq!(page.elements[2].classes(), ["btn"]);
        assert_eq!(report.total(), 2);
    }

    #[test]
    fn page_description_accepts_sparse_elements() {
        let page: PageDescription = serde_json::from_str(
            r#"{"elements": [{"classes": ["status-badge"]}, {"id": "a1", "attributes": {"data-priority": "low"}}]}"#,
        )
        .unwrap();

        assert_eq!(page.elements.len(), 2);
        assert_eq!(page.elements[0].data_attribute("data-status"), None);
        assert_eq!(page.elements[1].id.as_deref(), Some("a1"));
        assert_eq!(
            page.elements[1].data_attribute("data-priority").as_deref(),
            Some("low")
        );
    }
}
