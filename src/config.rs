/// Process-wide chart styling, parsed from environment variables.
///
/// The original system toggled a global plotting theme once at startup; here
/// that becomes explicit configuration the caller builds once and treats as
/// immutable. The core itself never mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartTheme {
    /// Render visuals on a dark background.
    pub dark_background: bool,
    /// Watermark text stamped diagonally across every chart.
    pub watermark_text: String,
    /// Watermark opacity, 0.0–1.0.
    pub watermark_alpha: f64,
}

impl ChartTheme {
    pub fn from_env() -> Self {
        Self {
            dark_background: std::env::var("FS_DARK_BACKGROUND")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
            watermark_text: std::env::var("FS_WATERMARK_TEXT")
                .unwrap_or_else(|_| "FORMULA STATS".to_string()),
            watermark_alpha: std::env::var("FS_WATERMARK_ALPHA")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.35),
        }
    }
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            dark_background: true,
            watermark_text: "FORMULA STATS".to_string(),
            watermark_alpha: 0.35,
        }
    }
}
