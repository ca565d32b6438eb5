//! Gắn badge, tooltip và tự đóng thông báo cho trang quản lý sự cố (WebAssembly).

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use crate::dom::{self, js_error, WebBadge};
    use crate::styles;
    use badge_core::{
        classify_priority, classify_status, dismiss_alerts, enhance_badges, BadgeConfig,
        BadgeError, BadgeKind, IncidentBadges, InitStage, PageHost, Priority, Status,
    };
    use badge_wasm::{read_config, to_js};
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{console, Document, Element, Window};
    use yew::prelude::*;

    #[wasm_bindgen]
    extern "C" {
        /// Toolkit giao diện do trang cung cấp, ví dụ:
        /// `{ tooltip: el => new bootstrap.Tooltip(el), closeAlert: el => new bootstrap.Alert(el).close() }`.
        #[derive(Debug, Clone)]
        pub type UiToolkit;

        #[wasm_bindgen(method, catch)]
        fn tooltip(this: &UiToolkit, element: &Element) -> Result<JsValue, JsValue>;

        #[wasm_bindgen(method, catch, js_name = closeAlert)]
        fn close_alert(this: &UiToolkit, element: &Element) -> Result<JsValue, JsValue>;
    }

    /// Gắn class badge cho đúng danh sách phần tử được truyền vào.
    #[wasm_bindgen(js_name = enhanceElements)]
    pub fn enhance_elements(
        elements: Box<[JsValue]>,
        config: Option<JsValue>,
    ) -> Result<JsValue, JsValue> {
        let cfg = read_config(config)?;
        let mut targets: Vec<WebBadge> = dom::elements_from_values(elements)?
            .into_iter()
            .map(WebBadge::new)
            .collect();
        let report = enhance_badges(&mut targets, &cfg).map_err(badge_error)?;
        to_js(&report)
    }

    /// Khởi tạo trang dưới `root`: badge, stylesheet, tooltip, hẹn giờ đóng thông báo.
    ///
    /// Trang gọi hàm này một lần sau khi DOM sẵn sàng. Badge được gắn đồng bộ
    /// trước mọi lời gọi toolkit; lỗi toolkit chỉ được ghi ra console.
    #[wasm_bindgen(js_name = initPage)]
    pub fn init_page(
        root: Element,
        toolkit: UiToolkit,
        config: Option<JsValue>,
    ) -> Result<JsValue, JsValue> {
        let cfg = read_config(config)?;
        let page = WebPage { root, toolkit };
        to_js(&badge_core::init_page(&page, &cfg))
    }

    /// Host DOM cho trình tự khởi tạo của `badge_core`.
    #[derive(Clone)]
    struct WebPage {
        root: Element,
        toolkit: UiToolkit,
    }

    impl PageHost for WebPage {
        type Element = WebBadge;
        type Error = BadgeError;

        fn query_all(&self, selector: &str) -> Result<Vec<WebBadge>, BadgeError> {
            let elements = dom::query_all(&self.root, selector).map_err(js_error)?;
            Ok(elements.into_iter().map(WebBadge::new).collect())
        }

        fn inject_styles(&self) -> Result<(), BadgeError> {
            let document: Document = self
                .root
                .owner_document()
                .ok_or_else(|| BadgeError::Target("Element không thuộc document nào".to_string()))?;
            styles::ensure_styles(&document).map_err(js_error)
        }

        fn attach_tooltip(&self, element: &WebBadge) -> Result<(), BadgeError> {
            self.toolkit
                .tooltip(element.element())
                .map(|_| ())
                .map_err(js_error)
        }

        fn close_alert(&self, element: &WebBadge) -> Result<(), BadgeError> {
            self.toolkit
                .close_alert(element.element())
                .map(|_| ())
                .map_err(js_error)
        }

        /// Hẹn một lần đóng các thông báo. Không có đường hủy.
        fn schedule_alert_dismiss(&self, config: &BadgeConfig) -> Result<(), BadgeError> {
            let window: Window = web_sys::window()
                .ok_or_else(|| BadgeError::Target("Không có window".to_string()))?;

            let page = self.clone();
            let cfg = config.clone();
            let callback = Closure::once_into_js(move || {
                dismiss_alerts(&page, &cfg);
            });

            let delay = i32::try_from(config.alert_dismiss_ms).unwrap_or(i32::MAX);
            window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    callback.unchecked_ref(),
                    delay,
                )
                .map(|_| ())
                .map_err(js_error)
        }

        fn report_error(&self, stage: InitStage, error: BadgeError) {
            console::error_1(&JsValue::from_str(&format!("badge-ui [{stage}]: {error}")));
        }
    }

    fn badge_error(err: BadgeError) -> JsValue {
        JsValue::from_str(&format!("Badge error: {err}"))
    }

    #[derive(Properties, PartialEq)]
    pub struct IncidentBadgeTableProps {
        pub incidents: Vec<IncidentBadges>,
        pub class_prefix: String,
    }

    #[function_component(IncidentBadgeTable)]
    fn incident_badge_table(props: &IncidentBadgeTableProps) -> Html {
        use_effect_with((), |_| {
            if let Some(window) = web_sys::window() {
                if let Some(document) = window.document() {
                    if let Err(err) = styles::ensure_styles(&document) {
                        console::error_1(&err);
                    }
                }
            }
            || ()
        });

        html! {
            <table class="incident-badge-table">
                <thead>
                    <tr>
                        <th>{"#"}</th>
                        <th>{"Sự cố"}</th>
                        <th>{"Ưu tiên"}</th>
                        <th>{"Trạng thái"}</th>
                    </tr>
                </thead>
                <tbody>
                    {
                        if props.incidents.is_empty() {
                            html! {
                                <tr><td class="incident-badge-empty" colspan="4">{"Chưa có sự cố nào."}</td></tr>
                            }
                        } else {
                            html! {
                                for props.incidents.iter().map(|incident| render_row(incident, &props.class_prefix))
                            }
                        }
                    }
                </tbody>
            </table>
        }
    }

    fn render_row(incident: &IncidentBadges, prefix: &str) -> Html {
        html! {
            <tr key={incident.id.to_string()}>
                <td>{ incident.id }</td>
                <td>{ incident.title.clone() }</td>
                <td>{ render_priority(incident.priority, prefix) }</td>
                <td>{ render_status(incident.status, prefix) }</td>
            </tr>
        }
    }

    fn render_priority(priority: Priority, prefix: &str) -> Html {
        let class = classify_priority(priority).css_class(prefix);
        html! {
            <span
                class={classes!("badge", BadgeKind::Priority.marker_class(), class)}
                data-priority={priority.as_str()}
            >
                { priority_label(priority) }
            </span>
        }
    }

    fn render_status(status: Status, prefix: &str) -> Html {
        let class = classify_status(status).css_class(prefix);
        html! {
            <span
                class={classes!("badge", BadgeKind::Status.marker_class(), class)}
                data-status={status.as_str()}
            >
                { status_label(status) }
            </span>
        }
    }

    fn priority_label(priority: Priority) -> &'static str {
        match priority {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Unrecognized => "--",
        }
    }

    fn status_label(status: Status) -> &'static str {
        match status {
            Status::Open => "Open",
            Status::InProgress => "In progress",
            Status::Resolved => "Resolved",
            Status::Closed => "Closed",
            Status::Unrecognized => "--",
        }
    }

    /// Hiển thị bảng badge sự cố vào phần tử khớp `selector`.
    #[wasm_bindgen(js_name = mountIncidentBadges)]
    pub fn mount_incident_badges(
        selector: &str,
        incidents: JsValue,
        config: Option<JsValue>,
    ) -> Result<(), JsValue> {
        let window: Window =
            web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;

        let target: Element = document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Selector lỗi: {err:?}")))?
            .ok_or_else(|| JsValue::from_str("Không tìm thấy element theo selector"))?;

        let incidents: Vec<IncidentBadges> = from_value(incidents)?;
        let cfg = read_config(config)?;

        yew::Renderer::<IncidentBadgeTable>::with_root_and_props(
            target,
            IncidentBadgeTableProps {
                incidents,
                class_prefix: cfg.class_prefix,
            },
        )
        .render();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::{enhance_elements, init_page, mount_incident_badges, UiToolkit};

#[cfg(not(target_arch = "wasm32"))]
mod native_stubs {
    use wasm_bindgen::JsValue;

    const WASM_ONLY: &str = "badge-ui chỉ hỗ trợ biên dịch target wasm32";

    pub fn enhance_elements(_: Box<[JsValue]>, _: Option<JsValue>) -> Result<JsValue, JsValue> {
        Err(JsValue::from_str(WASM_ONLY))
    }

    pub fn init_page(_: JsValue, _: JsValue, _: Option<JsValue>) -> Result<JsValue, JsValue> {
        Err(JsValue::from_str(WASM_ONLY))
    }

    pub fn mount_incident_badges(_: &str, _: JsValue, _: Option<JsValue>) -> Result<(), JsValue> {
        Err(JsValue::from_str(WASM_ONLY))
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native_stubs::{enhance_elements, init_page, mount_incident_badges};
