//! Logic lõi phân loại badge mức ưu tiên và trạng thái sự cố.
//!
//! Crate này chỉ chứa chính sách (giá trị nào ra class nào). Cách gắn class
//! vào một phần tử giao diện cụ thể đi qua trait [`BadgeTarget`], để cùng
//! một logic chạy được trên DOM thật, trong CLI và trong test.

mod element;
mod page;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use element::{BadgeElement, PageDescription};
pub use page::{badge_selector, dismiss_alerts, init_page, InitStage, PageHost, PageInit};

/// Cấu hình trang: tiền tố class và các selector cho toolkit giao diện.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BadgeConfig {
    /// Tiền tố ghép trước tên mức hiển thị (`bg-` + `danger`).
    pub class_prefix: String,
    /// Thời gian chờ (ms) trước khi tự đóng các thông báo.
    pub alert_dismiss_ms: u32,
    /// Selector các phần tử kích hoạt tooltip.
    pub tooltip_selector: String,
    /// Selector các thông báo có thể đóng.
    pub alert_selector: String,
    /// Chèn stylesheet mặc định khi trang không có sẵn bộ class `bg-*`.
    pub inject_styles: bool,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            class_prefix: "bg-".to_string(),
            alert_dismiss_ms: 5_000,
            tooltip_selector: r#"[data-bs-toggle="tooltip"]"#.to_string(),
            alert_selector: ".alert".to_string(),
            inject_styles: false,
        }
    }
}

impl BadgeConfig {
    /// Tên class đầy đủ sẽ gắn lên phần tử.
    pub fn class_name(&self, class: SeverityClass) -> String {
        format!("{}{}", self.class_prefix, class.as_str())
    }
}

/// Mức ưu tiên của sự cố, đọc từ `data-priority`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
    /// Thiếu thuộc tính hoặc giá trị không nằm trong danh sách trên.
    #[default]
    #[serde(other)]
    Unrecognized,
}

impl Priority {
    /// So khớp chính xác, phân biệt hoa thường. Không bao giờ lỗi.
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("critical") => Self::Critical,
            Some("high") => Self::High,
            Some("medium") => Self::Medium,
            Some("low") => Self::Low,
            _ => Self::Unrecognized,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// Trạng thái xử lý sự cố, đọc từ `data-status`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Open,
    InProgress,
    Resolved,
    Closed,
    #[default]
    #[serde(other)]
    Unrecognized,
}

impl Status {
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("open") => Self::Open,
            Some("in_progress") => Self::InProgress,
            Some("resolved") => Self::Resolved,
            Some("closed") => Self::Closed,
            _ => Self::Unrecognized,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
            Self::Unrecognized => "unrecognized",
        }
    }
}

/// Mức hiển thị của badge, tương ứng bộ màu ngữ nghĩa của toolkit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SeverityClass {
    Danger,
    Warning,
    Success,
    Info,
    Secondary,
    Dark,
}

impl SeverityClass {
    pub const ALL: [SeverityClass; 6] = [
        SeverityClass::Danger,
        SeverityClass::Warning,
        SeverityClass::Success,
        SeverityClass::Info,
        SeverityClass::Secondary,
        SeverityClass::Dark,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Danger => "danger",
            Self::Warning => "warning",
            Self::Success => "success",
            Self::Info => "info",
            Self::Secondary => "secondary",
            Self::Dark => "dark",
        }
    }

    pub fn css_class(self, prefix: &str) -> String {
        format!("{prefix}{}", self.as_str())
    }
}

impl fmt::Display for SeverityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chọn mức hiển thị cho một mức ưu tiên.
pub fn classify_priority(priority: Priority) -> SeverityClass {
    match priority {
        Priority::Critical | Priority::High => SeverityClass::Danger,
        Priority::Medium => SeverityClass::Warning,
        // Giá trị lạ được hiển thị giống `low`.
        Priority::Low | Priority::Unrecognized => SeverityClass::Success,
    }
}

/// Chọn mức hiển thị cho một trạng thái. `closed` rơi vào nhánh mặc định.
pub fn classify_status(status: Status) -> SeverityClass {
    match status {
        Status::Open => SeverityClass::Secondary,
        Status::InProgress => SeverityClass::Info,
        Status::Resolved => SeverityClass::Success,
        Status::Closed | Status::Unrecognized => SeverityClass::Dark,
    }
}

pub fn classify_priority_attr(value: Option<&str>) -> SeverityClass {
    classify_priority(Priority::from_attribute(value))
}

pub fn classify_status_attr(value: Option<&str>) -> SeverityClass {
    classify_status(Status::from_attribute(value))
}

/// Loại badge, xác định thuộc tính dữ liệu và class đánh dấu tương ứng.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
    Priority,
    Status,
}

impl BadgeKind {
    pub const ALL: [BadgeKind; 2] = [BadgeKind::Priority, BadgeKind::Status];

    /// Thuộc tính chứa giá trị cần phân loại.
    pub fn attribute(self) -> &'static str {
        match self {
            Self::Priority => "data-priority",
            Self::Status => "data-status",
        }
    }

    /// Class đánh dấu phần tử là badge loại này.
    pub fn marker_class(self) -> &'static str {
        match self {
            Self::Priority => "priority-badge",
            Self::Status => "status-badge",
        }
    }

    pub fn classify(self, value: Option<&str>) -> SeverityClass {
        match self {
            Self::Priority => classify_priority_attr(value),
            Self::Status => classify_status_attr(value),
        }
    }
}

impl FromStr for BadgeKind {
    type Err = BadgeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "priority" => Ok(Self::Priority),
            "status" => Ok(Self::Status),
            other => Err(BadgeError::Parse(format!("Loại badge không hợp lệ: {other}"))),
        }
    }
}

/// Phần tử giao diện có thể nhận class badge.
///
/// `add_class` chỉ được gọi khi `has_class` trả về `false`, nên cài đặt
/// không cần tự chống trùng.
pub trait BadgeTarget {
    type Error;

    fn data_attribute(&self, name: &str) -> Option<String>;

    fn has_class(&self, class: &str) -> bool;

    fn add_class(&mut self, class: &str) -> Result<(), Self::Error>;
}

/// Phân loại một phần tử theo `kind` và gắn class tương ứng.
///
/// Gọi lại nhiều lần với cùng giá trị không tạo class trùng.
pub fn apply_badge<T>(
    target: &mut T,
    kind: BadgeKind,
    config: &BadgeConfig,
) -> Result<SeverityClass, T::Error>
where
    T: BadgeTarget + ?Sized,
{
    let value = target.data_attribute(kind.attribute());
    let class = kind.classify(value.as_deref());
    let class_name = config.class_name(class);
    if !target.has_class(&class_name) {
        target.add_class(&class_name)?;
    }
    Ok(class)
}

/// Khởi tạo toàn bộ badge trong danh sách phần tử được truyền vào.
///
/// Phần tử không có class đánh dấu nào bị bỏ qua. Phần tử mang cả hai class
/// đánh dấu được phân loại theo cả hai loại.
pub fn enhance_badges<'a, T, I>(targets: I, config: &BadgeConfig) -> Result<BadgeReport, T::Error>
where
    T: BadgeTarget + 'a,
    I: IntoIterator<Item = &'a mut T>,
{
    let mut report = BadgeReport::new();
    for target in targets {
        for kind in BadgeKind::ALL {
            if target.has_class(kind.marker_class()) {
                let class = apply_badge(target, kind, config)?;
                report.record(kind, class);
            }
        }
    }
    Ok(report)
}

/// Thống kê sau một lần khởi tạo badge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BadgeReport {
    pub generated_at: DateTime<Utc>,
    pub priority_badges: usize,
    pub status_badges: usize,
    #[serde(default)]
    pub classes: BTreeMap<SeverityClass, usize>,
}

impl BadgeReport {
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now(),
            priority_badges: 0,
            status_badges: 0,
            classes: BTreeMap::new(),
        }
    }

    pub(crate) fn record(&mut self, kind: BadgeKind, class: SeverityClass) {
        match kind {
            BadgeKind::Priority => self.priority_badges += 1,
            BadgeKind::Status => self.status_badges += 1,
        }
        *self.classes.entry(class).or_default() += 1;
    }

    pub fn total(&self) -> usize {
        self.priority_badges + self.status_badges
    }

    pub fn count(&self, class: SeverityClass) -> usize {
        self.classes.get(&class).copied().unwrap_or_default()
    }
}

impl Default for BadgeReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Một dòng sự cố tối giản để hiển thị badge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IncidentBadges {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
}

impl IncidentBadges {
    pub fn priority_class(&self) -> SeverityClass {
        classify_priority(self.priority)
    }

    pub fn status_class(&self) -> SeverityClass {
        classify_status(self.status)
    }
}

/// Lỗi chung của các lớp đọc dữ liệu và gắn class.
#[derive(Debug, thiserror::Error)]
pub enum BadgeError {
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
    #[error("Không cập nhật được phần tử: {0}")]
    Target(String),
}
