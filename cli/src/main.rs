use std::path::{Path, PathBuf};

use anyhow::Context;
use badge_core::{BadgeConfig, BadgeKind, PageDescription, SeverityClass};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "badge-cli",
    about = "Gắn class badge ưu tiên/trạng thái cho trang mô tả dạng JSON."
)]
struct Args {
    /// Đường dẫn tới file JSON mô tả các phần tử.
    #[arg(short, long)]
    input: PathBuf,

    /// File JSON cấu hình (tiền tố class, selector...). Trường thiếu giữ mặc định.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// In kết quả dạng JSON thay cho bản tóm tắt.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => BadgeConfig::default(),
    };
    tracing::debug!(prefix = %config.class_prefix, "đã nạp cấu hình");

    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Không đọc được file {:?}", args.input))?;
    let mut page: PageDescription = serde_json::from_str(&data)
        .with_context(|| format!("File {:?} không phải trang mô tả hợp lệ", args.input))?;

    let report = page.enhance(&config);
    tracing::info!(
        elements = page.elements.len(),
        badges = report.total(),
        "đã gắn class badge"
    );

    if args.json {
        let output = serde_json::json!({ "elements": page.elements, "report": report });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for (index, element) in page.elements.iter().enumerate() {
        let label = element
            .id
            .clone()
            .unwrap_or_else(|| format!("#{index}"));
        for kind in BadgeKind::ALL {
            if !element.classes.iter().any(|class| class == kind.marker_class()) {
                continue;
            }
            let value = element.attributes.get(kind.attribute());
            let class = kind.classify(value.map(String::as_str));
            println!(
                "{label}: {}={} -> {}",
                kind.attribute(),
                value.map(String::as_str).unwrap_or("--"),
                config.class_name(class)
            );
        }
    }

    println!(
        "Generated at: {}\nPriority badges: {}\nStatus badges: {}",
        report.generated_at, report.priority_badges, report.status_badges
    );
    for class in SeverityClass::ALL {
        println!("  {:<10} {}", class.as_str(), report.count(class));
    }

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<BadgeConfig> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Không đọc được file cấu hình {path:?}"))?;
    serde_json::from_str(&data).with_context(|| format!("Cấu hình {path:?} không hợp lệ"))
}

fn init_logging() {
    let default_level = "warn";
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
