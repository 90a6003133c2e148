use crate::catalog::Product;

use super::upload::UploadStatus;

/// Name and size of the file staged for upload, for display.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub size: u64,
}

/// Read-only snapshot of the coordinator state, published through a watch
/// channel after every transition. Cheap to clone relative to its refresh
/// rate; shells render from this and nothing else.
#[derive(Debug, Clone, Default)]
pub struct EngineView {
    pub query: String,
    pub items: Vec<Product>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub loading: bool,
    pub suggestions: Vec<String>,
    pub active_filters: Vec<String>,
    pub upload_status: UploadStatus,
    pub upload_message: String,
    pub upload_file: Option<SelectedFile>,
    /// Last search failure, cleared by the next accepted result.
    pub last_error: Option<String>,
}

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable file size: magnitude class by `floor(log1024(bytes))`,
/// value rounded to two decimals with trailing zeros trimmed.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exponent = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let exponent = exponent.min(SIZE_UNITS.len() - 1);
    let value = (bytes as f64 / 1024_f64.powi(exponent as i32) * 100.0).round() / 100.0;
    let mut text = format!("{value:.2}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }
    format!("{} {}", text, SIZE_UNITS[exponent])
}
