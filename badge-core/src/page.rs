//! Trình tự khởi tạo trang: badge, stylesheet, tooltip, hẹn giờ đóng thông báo.
//!
//! Mọi lỗi từ host được báo qua [`PageHost::report_error`] rồi bỏ qua bước đó,
//! để một toolkit hỏng không làm badge mất class.

use std::fmt;

use serde::Serialize;

use crate::{apply_badge, BadgeConfig, BadgeKind, BadgeReport, BadgeTarget};

/// Bước khởi tạo phát sinh lỗi.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InitStage {
    Badges,
    Styles,
    Tooltips,
    AlertTimer,
    Alerts,
}

impl InitStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Badges => "badges",
            Self::Styles => "styles",
            Self::Tooltips => "tooltips",
            Self::AlertTimer => "alert_timer",
            Self::Alerts => "alerts",
        }
    }
}

impl fmt::Display for InitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Môi trường chứa trang (DOM thật, hoặc bản giả trong test).
///
/// `schedule_alert_dismiss` hẹn đúng một lần gọi [`dismiss_alerts`] sau
/// `config.alert_dismiss_ms`.
pub trait PageHost {
    type Element: BadgeTarget<Error = Self::Error>;
    type Error;

    fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, Self::Error>;

    fn inject_styles(&self) -> Result<(), Self::Error>;

    fn attach_tooltip(&self, element: &Self::Element) -> Result<(), Self::Error>;

    fn close_alert(&self, element: &Self::Element) -> Result<(), Self::Error>;

    fn schedule_alert_dismiss(&self, config: &BadgeConfig) -> Result<(), Self::Error>;

    fn report_error(&self, stage: InitStage, error: Self::Error);
}

/// Kết quả của [`init_page`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageInit {
    pub badges: BadgeReport,
    pub tooltips_attached: usize,
    pub alert_timer_scheduled: bool,
    pub failures: usize,
}

/// Selector gom mọi phần tử mang class đánh dấu badge.
pub fn badge_selector() -> String {
    BadgeKind::ALL
        .iter()
        .map(|kind| format!(".{}", kind.marker_class()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Khởi tạo trang một lần. Badge được gắn đồng bộ trước mọi lời gọi toolkit.
pub fn init_page<H: PageHost>(host: &H, config: &BadgeConfig) -> PageInit {
    let mut outcome = PageInit {
        badges: BadgeReport::new(),
        tooltips_attached: 0,
        alert_timer_scheduled: false,
        failures: 0,
    };

    match host.query_all(&badge_selector()) {
        Ok(mut targets) => {
            for target in targets.iter_mut() {
                for kind in BadgeKind::ALL {
                    if !target.has_class(kind.marker_class()) {
                        continue;
                    }
                    match apply_badge(target, kind, config) {
                        Ok(class) => outcome.badges.record(kind, class),
                        Err(err) => outcome.fail(host, InitStage::Badges, err),
                    }
                }
            }
        }
        Err(err) => outcome.fail(host, InitStage::Badges, err),
    }

    if config.inject_styles {
        if let Err(err) = host.inject_styles() {
            outcome.fail(host, InitStage::Styles, err);
        }
    }

    match host.query_all(&config.tooltip_selector) {
        Ok(triggers) => {
            for trigger in &triggers {
                match host.attach_tooltip(trigger) {
                    Ok(()) => outcome.tooltips_attached += 1,
                    Err(err) => outcome.fail(host, InitStage::Tooltips, err),
                }
            }
        }
        Err(err) => outcome.fail(host, InitStage::Tooltips, err),
    }

    match host.schedule_alert_dismiss(config) {
        Ok(()) => outcome.alert_timer_scheduled = true,
        Err(err) => outcome.fail(host, InitStage::AlertTimer, err),
    }

    outcome
}

/// Đóng các thông báo đang hiển thị tại thời điểm gọi. Trả về số đã đóng.
pub fn dismiss_alerts<H: PageHost>(host: &H, config: &BadgeConfig) -> usize {
    let alerts = match host.query_all(&config.alert_selector) {
        Ok(alerts) => alerts,
        Err(err) => {
            host.report_error(InitStage::Alerts, err);
            return 0;
        }
    };

    let mut closed = 0;
    for alert in &alerts {
        match host.close_alert(alert) {
            Ok(()) => closed += 1,
            Err(err) => host.report_error(InitStage::Alerts, err),
        }
    }
    closed
}

impl PageInit {
    fn fail<H: PageHost>(&mut self, host: &H, stage: InitStage, err: H::Error) {
        self.failures += 1;
        host.report_error(stage, err);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::{BadgeElement, SeverityClass};

    /// Node dùng chung giữa "tài liệu" giả và danh sách kết quả truy vấn.
    #[derive(Clone)]
    struct FakeNode(Rc<RefCell<BadgeElement>>);

    impl FakeNode {
        fn id(&self) -> String {
            self.0.borrow().id.clone().unwrap_or_default()
        }

        fn classes(&self) -> Vec<String> {
            self.0.borrow().classes.clone()
        }
    }

    impl BadgeTarget for FakeNode {
        type Error = String;

        fn data_attribute(&self, name: &str) -> Option<String> {
            self.0.borrow().data_attribute(name)
        }

        fn has_class(&self, class: &str) -> bool {
            self.0.borrow().has_class(class)
        }

        fn add_class(&mut self, class: &str) -> Result<(), String> {
            if self.id() == "locked" {
                return Err("read-only element".to_string());
            }
            self.0.borrow_mut().add_class(class).map_err(|never| match never {})
        }
    }

    #[derive(Default)]
    struct FakePage {
        nodes: RefCell<Vec<FakeNode>>,
        failing_toolkit: bool,
        tooltips: RefCell<Vec<String>>,
        closed: RefCell<Vec<String>>,
        scheduled_ms: Cell<Option<u32>>,
        errors: RefCell<Vec<(InitStage, String)>>,
    }

    impl FakePage {
        fn with(elements: Vec<BadgeElement>) -> Self {
            let page = Self::default();
            for element in elements {
                page.push(element);
            }
            page
        }

        fn push(&self, element: BadgeElement) {
            self.nodes
                .borrow_mut()
                .push(FakeNode(Rc::new(RefCell::new(element))));
        }

        fn node(&self, id: &str) -> FakeNode {
            self.nodes
                .borrow()
                .iter()
                .find(|node| node.id() == id)
                .cloned()
                .expect("node tồn tại")
        }
    }

    /// Hỗ trợ `.class`, `[name="value"]` và danh sách ngăn bởi dấu phẩy.
    fn matches_selector(element: &BadgeElement, selector: &str) -> bool {
        selector.split(',').map(str::trim).any(|part| {
            if let Some(class) = part.strip_prefix('.') {
                element.has_class(class)
            } else if let Some(inner) = part.strip_prefix('[').and_then(|p| p.strip_suffix(']')) {
                match inner.split_once('=') {
                    Some((name, value)) => {
                        element.data_attribute(name).as_deref() == Some(value.trim_matches('"'))
                    }
                    None => element.data_attribute(inner).is_some(),
                }
            } else {
                false
            }
        })
    }

    impl PageHost for FakePage {
        type Element = FakeNode;
        type Error = String;

        fn query_all(&self, selector: &str) -> Result<Vec<FakeNode>, String> {
            Ok(self
                .nodes
                .borrow()
                .iter()
                .filter(|node| matches_selector(&node.0.borrow(), selector))
                .cloned()
                .collect())
        }

        fn inject_styles(&self) -> Result<(), String> {
            Err("no <head>".to_string())
        }

        fn attach_tooltip(&self, element: &FakeNode) -> Result<(), String> {
            if self.failing_toolkit {
                return Err("tooltip threw".to_string());
            }
            self.tooltips.borrow_mut().push(element.id());
            Ok(())
        }

        fn close_alert(&self, element: &FakeNode) -> Result<(), String> {
            if self.failing_toolkit {
                return Err("alert threw".to_string());
            }
            self.closed.borrow_mut().push(element.id());
            Ok(())
        }

        fn schedule_alert_dismiss(&self, config: &BadgeConfig) -> Result<(), String> {
            self.scheduled_ms.set(Some(config.alert_dismiss_ms));
            Ok(())
        }

        fn report_error(&self, stage: InitStage, error: String) {
            self.errors.borrow_mut().push((stage, error));
        }
    }

    fn sample_page(failing_toolkit: bool) -> FakePage {
        let mut page = FakePage::with(vec![
            BadgeElement::new()
                .with_id("help")
                .with_attribute("data-bs-toggle", "tooltip"),
            BadgeElement::new()
                .with_id("info")
                .with_attribute("data-bs-toggle", "tooltip"),
            BadgeElement::new()
                .with_id("p1")
                .with_class("priority-badge")
                .with_attribute("data-priority", "critical"),
            BadgeElement::new().with_id("s1").with_class("status-badge"),
            BadgeElement::new().with_id("flash").with_class("alert"),
        ]);
        page.failing_toolkit = failing_toolkit;
        page
    }

    #[test]
    fn tooltips_attached_once_per_trigger() {
        let page = sample_page(false);
        let outcome = init_page(&page, &BadgeConfig::default());

        assert_eq!(*page.tooltips.borrow(), ["help", "info"]);
        assert_eq!(outcome.tooltips_attached, 2);
        assert_eq!(outcome.failures, 0);
        assert!(outcome.alert_timer_scheduled);
        assert_eq!(page.scheduled_ms.get(), Some(5_000));
    }

    #[test]
    fn throwing_toolkit_still_classifies_badges_and_schedules_timer() {
        let page = sample_page(true);
        let outcome = init_page(&page, &BadgeConfig::default());

        assert!(page.node("p1").has_class("bg-danger"));
        assert!(page.node("s1").has_class("bg-dark"));
        assert_eq!(outcome.badges.total(), 2);
        assert_eq!(outcome.tooltips_attached, 0);
        assert_eq!(outcome.failures, 2);
        assert!(outcome.alert_timer_scheduled);

        let errors = page.errors.borrow();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|(stage, _)| *stage == InitStage::Tooltips));
    }

    #[test]
    fn style_failure_is_reported_and_skipped() {
        let page = sample_page(false);
        let config = BadgeConfig {
            inject_styles: true,
            ..BadgeConfig::default()
        };
        let outcome = init_page(&page, &config);

        assert_eq!(outcome.failures, 1);
        assert_eq!(page.errors.borrow()[0].0, InitStage::Styles);
        assert_eq!(outcome.tooltips_attached, 2);
        assert_eq!(outcome.badges.count(SeverityClass::Danger), 1);
    }

    #[test]
    fn badge_failure_does_not_stop_other_badges() {
        let page = FakePage::with(vec![
            BadgeElement::new()
                .with_id("locked")
                .with_class("priority-badge")
                .with_attribute("data-priority", "high"),
            BadgeElement::new()
                .with_id("p2")
                .with_class("priority-badge")
                .with_attribute("data-priority", "medium"),
        ]);
        let outcome = init_page(&page, &BadgeConfig::default());

        assert_eq!(page.node("locked").classes(), ["priority-badge"]);
        assert!(page.node("p2").has_class("bg-warning"));
        assert_eq!(outcome.failures, 1);
        assert_eq!(outcome.badges.priority_badges, 1);
        assert!(outcome.alert_timer_scheduled);
    }

    #[test]
    fn alerts_are_collected_when_the_timer_fires() {
        let page = sample_page(false);
        let config = BadgeConfig::default();
        init_page(&page, &config);
        assert!(page.closed.borrow().is_empty());

        page.push(BadgeElement::new().with_id("late").with_class("alert"));
        let closed = dismiss_alerts(&page, &config);

        assert_eq!(closed, 2);
        assert_eq!(*page.closed.borrow(), ["flash", "late"]);
    }

    #[test]
    fn failing_close_is_logged_and_remaining_alerts_continue() {
        let page = sample_page(true);
        page.push(BadgeElement::new().with_id("second").with_class("alert"));

        let closed = dismiss_alerts(&page, &BadgeConfig::default());

        assert_eq!(closed, 0);
        let errors = page.errors.borrow();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|(stage, _)| *stage == InitStage::Alerts));
    }

    #[test]
    fn repeated_init_keeps_single_class() {
        let page = sample_page(false);
        let config = BadgeConfig::default();
        init_page(&page, &config);
        init_page(&page, &config);

        assert_eq!(page.node("p1").classes(), ["priority-badge", "bg-danger"]);
    }

    #[test]
    fn badge_selector_lists_both_markers() {
        assert_eq!(badge_selector(), ".priority-badge, .status-badge");
    }
}
