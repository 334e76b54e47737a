//! Printer commands and fragment emission
//!
//! Every printer instruction is a [`Command`] variant. Applying a command to
//! the current [`FormatState`] yields exactly one XML fragment and, for the
//! formatting commands, the matching state update — a single transition, so
//! tracked state and emitted XML cannot diverge.

use serde::{Deserialize, Serialize};

/// Built-in printer font.
///
/// Font A is 12 dots wide at size 1; B through E are 9 dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Font {
    #[default]
    A,
    B,
    C,
    D,
    E,
}

impl Font {
    pub fn as_str(&self) -> &'static str {
        match self {
            Font::A => "font_a",
            Font::B => "font_b",
            Font::C => "font_c",
            Font::D => "font_d",
            Font::E => "font_e",
        }
    }

    /// Base character cell width in dots at size width 1
    pub fn base_char_width_dots(&self) -> u32 {
        match self {
            Font::A => 12,
            _ => 9,
        }
    }
}

/// Print color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    None,
    #[default]
    Color1,
    Color2,
    Color3,
    Color4,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::None => "none",
            Color::Color1 => "color_1",
            Color::Color2 => "color_2",
            Color::Color3 => "color_3",
            Color::Color4 => "color_4",
        }
    }
}

/// Horizontal alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_str(&self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

/// Paper cut variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutType {
    NoFeed,
    /// Feed to the cut position, then cut (the usual receipt cut)
    #[default]
    Feed,
    Reserve,
    FullCutNoFeed,
    FullCutFeed,
    FullCutReserve,
}

impl CutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CutType::NoFeed => "no_feed",
            CutType::Feed => "feed",
            CutType::Reserve => "reserve",
            CutType::FullCutNoFeed => "no_feed_fullcut",
            CutType::FullCutFeed => "feed_fullcut",
            CutType::FullCutReserve => "reserve_fullcut",
        }
    }
}

/// Character scaling, applied on top of the base font cell.
///
/// Values are emitted verbatim; the printer defines the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSize {
    pub width: u32,
    pub height: u32,
}

impl Default for TextSize {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
        }
    }
}

impl TextSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Full decoration state carried by every style fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub reverse: bool,
    pub underline: bool,
    pub emphasis: bool,
    pub color: Color,
}

/// Partial style update; unset fields keep their current value
#[derive(Debug, Clone, Copy, Default)]
pub struct StylePatch {
    pub reverse: Option<bool>,
    pub underline: Option<bool>,
    pub emphasis: Option<bool>,
    pub color: Option<Color>,
}

impl StylePatch {
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = Some(reverse);
        self
    }

    pub fn with_underline(mut self, underline: bool) -> Self {
        self.underline = Some(underline);
        self
    }

    pub fn with_emphasis(mut self, emphasis: bool) -> Self {
        self.emphasis = Some(emphasis);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

impl From<TextStyle> for StylePatch {
    fn from(style: TextStyle) -> Self {
        Self {
            reverse: Some(style.reverse),
            underline: Some(style.underline),
            emphasis: Some(style.emphasis),
            color: Some(style.color),
        }
    }
}

/// 2D symbol family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolType {
    QrCode,
    Pdf417,
    Gs1DataBar,
    MaxiCode,
}

impl SymbolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolType::QrCode => "qrcode",
            SymbolType::Pdf417 => "pdf417",
            SymbolType::Gs1DataBar => "gs1_databar",
            SymbolType::MaxiCode => "maxicode",
        }
    }
}

/// Error correction level for 2D symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SymbolLevel {
    #[default]
    Default,
    L,
    M,
    Q,
    H,
}

impl SymbolLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolLevel::Default => "default",
            SymbolLevel::L => "L",
            SymbolLevel::M => "M",
            SymbolLevel::Q => "Q",
            SymbolLevel::H => "H",
        }
    }
}

/// Options for a 2D symbol fragment.
///
/// `width`/`height`/`size` are only emitted when set; valid ranges are
/// type-dependent printer conventions and are not validated here.
#[derive(Debug, Clone, Copy)]
pub struct SymbolOptions {
    pub symbol_type: SymbolType,
    pub level: SymbolLevel,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub size: Option<u32>,
}

impl SymbolOptions {
    pub fn new(symbol_type: SymbolType, level: SymbolLevel) -> Self {
        Self {
            symbol_type,
            level,
            width: None,
            height: None,
            size: None,
        }
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }
}

/// Escape text for use as XML element content.
///
/// Fixed order: `&` first, then the other entities, then newline and tab as
/// numeric character references.
pub fn escape_xml(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
        .replace('\n', "&#10;")
        .replace('\t', "&#9;")
}

/// One printer instruction
#[derive(Debug, Clone)]
pub(crate) enum Command {
    /// Literal text content, escaped on emission
    Text(String),
    /// Alignment padding (spaces and at most one newline), emitted as-is
    Padding(String),
    /// Literal line break
    NewLine,
    SetFont(Font),
    SetStyle(StylePatch),
    SetSize(TextSize),
    SetAlign(Align),
    Feed(u32),
    Cut(CutType),
    Symbol {
        data: String,
        options: SymbolOptions,
    },
}

/// Tracked formatting state of a print buffer
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FormatState {
    pub font: Font,
    pub size: TextSize,
    pub style: TextStyle,
}

impl FormatState {
    /// Apply one command: update state where the command carries formatting,
    /// and return the single XML fragment it emits.
    pub(crate) fn apply(&mut self, command: &Command) -> String {
        match command {
            Command::Text(content) => format!("<text>{}</text>", escape_xml(content)),
            Command::Padding(padding) => format!("<text>{padding}</text>"),
            Command::NewLine => "<text>\n</text>".to_string(),
            Command::SetFont(font) => {
                self.font = *font;
                format!(r#"<text font="{}" />"#, font.as_str())
            }
            Command::SetStyle(patch) => {
                self.style = TextStyle {
                    reverse: patch.reverse.unwrap_or(self.style.reverse),
                    underline: patch.underline.unwrap_or(self.style.underline),
                    emphasis: patch.emphasis.unwrap_or(self.style.emphasis),
                    color: patch.color.unwrap_or(self.style.color),
                };
                format!(
                    r#"<text reverse="{}" ul="{}" em="{}" color="{}" />"#,
                    self.style.reverse,
                    self.style.underline,
                    self.style.emphasis,
                    self.style.color.as_str()
                )
            }
            Command::SetSize(size) => {
                self.size = *size;
                format!(r#"<text width="{}" height="{}" />"#, size.width, size.height)
            }
            Command::SetAlign(align) => format!(r#"<text align="{}" />"#, align.as_str()),
            Command::Feed(lines) => format!(r#"<feed line="{lines}" />"#),
            Command::Cut(cut) => format!(r#"<cut type="{}" />"#, cut.as_str()),
            Command::Symbol { data, options } => {
                let mut attrs = format!(
                    r#"type="{}" level="{}""#,
                    options.symbol_type.as_str(),
                    options.level.as_str()
                );
                if let Some(width) = options.width {
                    attrs.push_str(&format!(r#" width="{width}""#));
                }
                if let Some(height) = options.height {
                    attrs.push_str(&format!(r#" height="{height}""#));
                }
                if let Some(size) = options.size {
                    attrs.push_str(&format!(r#" size="{size}""#));
                }
                format!("<symbol {attrs}>{}</symbol>", escape_xml(data))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_order() {
        assert_eq!(escape_xml("a & b < c"), "a &amp; b &lt; c");
        assert_eq!(escape_xml(r#""q" 'a'"#), "&quot;q&quot; &apos;a&apos;");
        assert_eq!(escape_xml("line\nbreak\ttab"), "line&#10;break&#9;tab");
    }

    #[test]
    fn test_escape_applied_exactly_once() {
        // Escaping an already-escaped string must re-escape the ampersands,
        // proving a single append can never silently double-escape.
        let once = escape_xml("fish & chips");
        let twice = escape_xml(&once);
        assert_ne!(once, twice);
        assert_eq!(twice, "fish &amp;amp; chips");
    }

    #[test]
    fn test_style_fragment_carries_full_state() {
        let mut state = FormatState::default();
        state.apply(&Command::SetStyle(StylePatch::default().with_reverse(true)));
        // A later partial update still emits every field
        let fragment = state.apply(&Command::SetStyle(
            StylePatch::default().with_underline(true),
        ));
        assert_eq!(
            fragment,
            r#"<text reverse="true" ul="true" em="false" color="color_1" />"#
        );
        assert!(state.style.reverse);
        assert!(state.style.underline);
    }

    #[test]
    fn test_font_fragment_updates_state() {
        let mut state = FormatState::default();
        let fragment = state.apply(&Command::SetFont(Font::B));
        assert_eq!(fragment, r#"<text font="font_b" />"#);
        assert_eq!(state.font, Font::B);
    }

    #[test]
    fn test_symbol_omits_absent_attributes() {
        let mut state = FormatState::default();
        let fragment = state.apply(&Command::Symbol {
            data: "https://example.com/?a=1&b=2".to_string(),
            options: SymbolOptions::new(SymbolType::QrCode, SymbolLevel::H),
        });
        assert_eq!(
            fragment,
            r#"<symbol type="qrcode" level="H">https://example.com/?a=1&amp;b=2</symbol>"#
        );

        let fragment = state.apply(&Command::Symbol {
            data: "data".to_string(),
            options: SymbolOptions::new(SymbolType::Pdf417, SymbolLevel::Default)
                .with_width(3)
                .with_height(3)
                .with_size(0),
        });
        assert_eq!(
            fragment,
            r#"<symbol type="pdf417" level="default" width="3" height="3" size="0">data</symbol>"#
        );
    }

    #[test]
    fn test_size_fragment_verbatim() {
        let mut state = FormatState::default();
        let fragment = state.apply(&Command::SetSize(TextSize::new(2, 3)));
        assert_eq!(fragment, r#"<text width="2" height="3" />"#);
        assert_eq!(state.size, TextSize::new(2, 3));
    }
}
