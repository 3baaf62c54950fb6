use ratatui::style::{Color, Modifier, Style};
use sha2::{Digest, Sha256};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`. Background values
/// 0–6 are considered dark; 7–15 are considered light. Absent or unparseable
/// values give `Unknown`.
pub fn detect_background() -> BackgroundType {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|val| val.split(';').next_back().map(str::to_string))
        .and_then(|bg| bg.parse::<u8>().ok())
        .map(|bg| {
            if bg <= 6 {
                BackgroundType::Dark
            } else {
                BackgroundType::Light
            }
        })
        .unwrap_or(BackgroundType::Unknown)
}

/// Chart series colours, one per symbol slot.
const RGB_PALETTE: [Color; 6] = [
    Color::Rgb(0x88, 0x84, 0xd8),
    Color::Rgb(0x82, 0xca, 0x9d),
    Color::Rgb(0xff, 0xc6, 0x58),
    Color::Rgb(0xff, 0x73, 0x00),
    Color::Rgb(0xd8, 0x4a, 0x8b),
    Color::Rgb(0x41, 0xa3, 0xf1),
];

/// 16-colour fallback for terminals without true colour.
const ANSI_PALETTE: [Color; 6] = [
    Color::Blue,
    Color::Green,
    Color::Yellow,
    Color::Red,
    Color::Magenta,
    Color::Cyan,
];

/// Every style the dashboard components use.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    /// Headline amounts in stat cards.
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,

    // ── Share bars ───────────────────────────────────────────────────────────
    pub bar_empty: Style,
    pub bar_label: Style,

    // ── Chart ────────────────────────────────────────────────────────────────
    pub chart_axis: Style,
    /// Line series when the chart shows per-bucket totals.
    pub chart_total: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_border: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,

    /// Colours assigned to symbols.
    pub palette: [Color; 6],
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Rgb(0x24, 0xab, 0x82)),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::Rgb(0x24, 0xab, 0x82))
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            bar_empty: Style::default().fg(Color::DarkGray),
            bar_label: Style::default().fg(Color::Gray),

            chart_axis: Style::default().fg(Color::Gray),
            chart_total: Style::default().fg(Color::Rgb(0x88, 0x84, 0xd8)),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::DarkGray),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),

            palette: RGB_PALETTE,
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Rgb(0x1a, 0x7f, 0x60)),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            bold: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Rgb(0x1a, 0x7f, 0x60))
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            bar_empty: Style::default().fg(Color::Gray),
            bar_label: Style::default().fg(Color::DarkGray),

            chart_axis: Style::default().fg(Color::DarkGray),
            chart_total: Style::default().fg(Color::Blue),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_border: Style::default().fg(Color::Gray),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),

            palette: RGB_PALETTE,
        }
    }

    /// Plain 16-colour theme without bold modifiers or RGB colours.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_accent: Style::default().fg(Color::Green),
            separator: Style::default().fg(Color::White),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::Gray),
            bold: Style::default().fg(Color::White),
            label: Style::default().fg(Color::White),
            value: Style::default().fg(Color::Green),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            bar_empty: Style::default().fg(Color::White),
            bar_label: Style::default().fg(Color::White),

            chart_axis: Style::default().fg(Color::White),
            chart_total: Style::default().fg(Color::Cyan),

            table_header: Style::default().fg(Color::Cyan),
            table_border: Style::default().fg(Color::White),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::White),
            table_total: Style::default().fg(Color::Yellow),

            palette: ANSI_PALETTE,
        }
    }

    /// Pick light or dark from the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name. Unknown names fall back to `auto_detect`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Stable colour for a symbol.
    ///
    /// Derived from a SHA-256 digest of the symbol so a symbol keeps its
    /// colour when the filter or the set of visible symbols changes.
    pub fn series_color(&self, symbol: &str) -> Color {
        self.palette[palette_index(symbol, self.palette.len())]
    }

    pub fn series_style(&self, symbol: &str) -> Style {
        Style::default().fg(self.series_color(symbol))
    }

    /// Style for a share-of-total percentage: larger shares stand out more.
    pub fn share_style(&self, percentage: f64) -> Style {
        if percentage >= 50.0 {
            self.warning
        } else if percentage >= 20.0 {
            self.info
        } else {
            self.text
        }
    }
}

fn palette_index(symbol: &str, len: usize) -> usize {
    let digest = Sha256::digest(symbol.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) % len as u64) as usize
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Theme construction ───────────────────────────────────────────────────

    #[test]
    fn test_dark_theme_creation() {
        let t = Theme::dark();
        assert_eq!(t.header.fg, Some(Color::Cyan));
        assert_eq!(t.value.fg, Some(Color::Rgb(0x24, 0xab, 0x82)));
        assert_eq!(t.error.fg, Some(Color::Red));
        assert_eq!(t.palette, RGB_PALETTE);
    }

    #[test]
    fn test_light_theme_creation() {
        let t = Theme::light();
        assert_eq!(t.header.fg, Some(Color::Blue));
        assert_eq!(t.text.fg, Some(Color::Black));
        assert_eq!(t.table_row.fg, Some(Color::Black));
    }

    #[test]
    fn test_classic_theme_has_no_bold_or_rgb() {
        let t = Theme::classic();
        assert!(!t.bold.add_modifier.contains(Modifier::BOLD));
        assert!(!t.header.add_modifier.contains(Modifier::BOLD));
        assert!(t
            .palette
            .iter()
            .all(|c| !matches!(c, Color::Rgb(..))));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("dark").header.fg, Some(Color::Cyan));
        assert_eq!(Theme::from_name("light").header.fg, Some(Color::Blue));
        assert_eq!(Theme::from_name("classic").palette, ANSI_PALETTE);
    }

    #[test]
    fn test_from_name_unknown_falls_back() {
        let t = Theme::from_name("does-not-exist");
        assert!(t.header.fg.is_some());
    }

    // ── series_color ─────────────────────────────────────────────────────────

    #[test]
    fn test_series_color_is_deterministic() {
        let t = Theme::dark();
        assert_eq!(t.series_color("INFY"), t.series_color("INFY"));
        assert_eq!(
            t.series_color("INFY"),
            Theme::dark().series_color("INFY")
        );
    }

    #[test]
    fn test_series_color_comes_from_palette() {
        let t = Theme::dark();
        for symbol in ["INFY", "TCS", "ITC", "HDFC", "Others", ""] {
            assert!(t.palette.contains(&t.series_color(symbol)), "{symbol}");
        }
    }

    #[test]
    fn test_series_colors_spread_across_palette() {
        let t = Theme::dark();
        let symbols: Vec<String> = (0..60).map(|i| format!("SYM{i}")).collect();
        let used: std::collections::HashSet<String> = symbols
            .iter()
            .map(|s| format!("{:?}", t.series_color(s)))
            .collect();
        assert!(used.len() > 1);
    }

    // ── share_style ──────────────────────────────────────────────────────────

    #[test]
    fn test_share_style_thresholds() {
        let t = Theme::dark();
        assert_eq!(t.share_style(5.0).fg, Some(Color::White));
        assert_eq!(t.share_style(20.0).fg, Some(Color::Cyan));
        assert_eq!(t.share_style(75.0).fg, Some(Color::Yellow));
    }
}
