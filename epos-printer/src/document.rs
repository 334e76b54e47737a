//! ePOS-Print document builder
//!
//! [`DocumentBuilder`] accumulates XML command fragments in print order
//! while tracking the cursor column and the active formatting state. All
//! operations are synchronous and total; the buffer must be driven by a
//! single logical writer at a time.

use serde::{Deserialize, Serialize};

use crate::command::{
    Align, Command, CutType, Font, FormatState, StylePatch, SymbolOptions, TextSize, TextStyle,
};
use crate::layout;

pub(crate) const XML_PROLOG: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;
pub(crate) const ENVELOPE_OPEN: &str = "<s:Envelope xmlns:s=\"http://schemas.xmlsoap.org/soap/envelope/\">\n  <s:Body>\n    <epos-print xmlns=\"http://www.epson-pos.com/schemas/2011/03/epos-print\">";
pub(crate) const ENVELOPE_CLOSE: &str = "    </epos-print>\n  </s:Body>\n</s:Envelope>";

/// Supported receipt paper widths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperSize {
    /// 80 mm roll, 576 printable dots
    #[default]
    Mm80,
    /// 58 mm roll, 384 printable dots
    Mm58,
}

impl PaperSize {
    pub fn width_dots(&self) -> u32 {
        match self {
            PaperSize::Mm80 => 576,
            PaperSize::Mm58 => 384,
        }
    }
}

/// Per-append options for [`DocumentBuilder::append_text`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TextOptions {
    /// Characters reserved at the right edge of every wrapped line
    pub right_padding: usize,
    /// Append a newline fragment after the text
    pub add_new_line: bool,
    /// Pad the text flush right before appending it
    pub align_right: bool,
    /// Uppercase and strip diacritics before wrapping
    pub capitalize: bool,
}

impl TextOptions {
    pub fn with_right_padding(mut self, right_padding: usize) -> Self {
        self.right_padding = right_padding;
        self
    }

    pub fn with_new_line(mut self, add_new_line: bool) -> Self {
        self.add_new_line = add_new_line;
        self
    }

    pub fn with_align_right(mut self, align_right: bool) -> Self {
        self.align_right = align_right;
        self
    }

    pub fn with_capitalize(mut self, capitalize: bool) -> Self {
        self.capitalize = capitalize;
        self
    }
}

/// Stateful ePOS-Print XML document builder.
///
/// Fragments are kept in insertion order and serialized into one SOAP
/// envelope by [`serialize`](Self::serialize). Formatting setters both
/// update the tracked state and emit the matching fragment in a single
/// [`FormatState::apply`] transition.
#[derive(Debug)]
pub struct DocumentBuilder {
    paper: PaperSize,
    state: FormatState,
    cursor: usize,
    fragments: Vec<String>,
}

impl DocumentBuilder {
    /// Create an empty buffer with default formatting (font A, 1x1,
    /// no decorations, color 1). No fragments are emitted until the first
    /// operation.
    pub fn new(paper: PaperSize) -> Self {
        Self {
            paper,
            state: FormatState::default(),
            cursor: 0,
            fragments: Vec::new(),
        }
    }

    /// Line capacity for the current paper, font, and size width.
    ///
    /// `floor(paper_width_dots / (base_char_width * size.width))`, recomputed
    /// on every call and clamped to at least 1 so a degenerate combination
    /// can never produce a zero-width grid.
    pub fn characters_per_line(&self) -> usize {
        let cell = self.state.font.base_char_width_dots() * self.state.size.width.max(1);
        ((self.paper.width_dots() / cell) as usize).max(1)
    }

    /// Column of the next character on the current line
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn font(&self) -> Font {
        self.state.font
    }

    pub fn text_size(&self) -> TextSize {
        self.state.size
    }

    pub fn style(&self) -> TextStyle {
        self.state.style
    }

    fn push(&mut self, command: Command) {
        let fragment = self.state.apply(&command);
        self.fragments.push(fragment);
    }

    /// Append wrapped text.
    ///
    /// With `align_right`, a padding fragment computed from the current
    /// cursor and the text's character count is appended first; the wrap
    /// itself still uses the pre-padding cursor. A single-line append
    /// advances the cursor additively; a multi-line append leaves the cursor
    /// at the final line's length (both modulo the line capacity).
    pub fn append_text(&mut self, text: &str, options: &TextOptions) {
        let characters_per_line = self.characters_per_line();

        if options.align_right {
            let padding = layout::right_align_padding(
                self.cursor,
                text.chars().count(),
                characters_per_line,
            );
            self.push(Command::Padding(padding));
        }

        let content = if options.capitalize {
            layout::capitalize_and_strip_accents(text)
        } else {
            text.to_string()
        };
        let wrapped = layout::wrap_text(
            &content,
            characters_per_line,
            options.right_padding,
            self.cursor,
        );

        let wrapped_lines = wrapped.contains('\n');
        let last_line_len = wrapped
            .rsplit('\n')
            .next()
            .unwrap_or("")
            .chars()
            .count();
        self.push(Command::Text(wrapped));

        self.cursor = if wrapped_lines {
            last_line_len % characters_per_line
        } else {
            (self.cursor + last_line_len) % characters_per_line
        };

        if options.add_new_line {
            self.append_new_line();
        }
    }

    /// Append a literal line break and return the cursor to column 0
    pub fn append_new_line(&mut self) {
        self.push(Command::NewLine);
        self.cursor = 0;
    }

    /// Select the printer font; affects the line capacity from here on
    pub fn set_font(&mut self, font: Font) {
        self.push(Command::SetFont(font));
    }

    /// Merge a partial style over the current one and emit the full result
    pub fn set_style(&mut self, patch: StylePatch) {
        self.push(Command::SetStyle(patch));
    }

    /// Replace the character scaling wholesale
    pub fn set_text_size(&mut self, size: TextSize) {
        self.push(Command::SetSize(size));
    }

    /// Set hardware alignment; cursor and line capacity are unaffected
    pub fn set_align(&mut self, align: Align) {
        self.push(Command::SetAlign(align));
    }

    /// Feed the given number of lines; the cursor is unaffected
    pub fn add_feed(&mut self, lines: u32) {
        self.push(Command::Feed(lines));
    }

    pub fn add_cut(&mut self, cut: CutType) {
        self.push(Command::Cut(cut));
    }

    /// Append a 2D symbol; data is escaped, absent attributes are omitted
    pub fn add_symbol(&mut self, data: &str, options: &SymbolOptions) {
        self.push(Command::Symbol {
            data: data.to_string(),
            options: *options,
        });
    }

    /// Render a horizontal rule as a full-width run of underlined spaces,
    /// restoring the prior style afterwards
    pub fn add_horizontal_line(&mut self) {
        self.append_new_line();
        let saved = self.state.style;
        self.set_style(StylePatch::default().with_underline(true));
        let blank = " ".repeat(self.characters_per_line());
        self.append_text(&blank, &TextOptions::default());
        self.append_new_line();
        self.append_new_line();
        self.set_style(StylePatch::from(saved));
    }

    /// Serialize the accumulated fragments into the SOAP envelope.
    ///
    /// Pure with respect to the buffer; fragments stay queued until
    /// [`reset`](Self::reset) or [`import_fragments`](Self::import_fragments).
    pub fn serialize(&self) -> String {
        format!(
            "{XML_PROLOG}\n{ENVELOPE_OPEN}\n{}\n{ENVELOPE_CLOSE}",
            self.fragments.join("\n")
        )
    }

    /// Clear the buffer and re-apply the default formatting state, emitting
    /// the corresponding fragments into the fresh document
    pub fn reset(&mut self) {
        self.fragments.clear();
        self.cursor = 0;
        self.set_font(Font::A);
        self.set_text_size(TextSize::default());
        self.set_style(StylePatch::from(TextStyle::default()));
    }

    /// Snapshot the raw fragment sequence, e.g. for a retry queue
    pub fn export_fragments(&self) -> Vec<String> {
        self.fragments.clone()
    }

    /// Reset, then replace the fragment sequence wholesale.
    ///
    /// Cursor and style tracking restart from defaults; a replayed document
    /// carries its own formatting fragments inline.
    pub fn import_fragments(&mut self, fragments: Vec<String>) {
        self.reset();
        self.fragments = fragments;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Color;

    fn builder() -> DocumentBuilder {
        DocumentBuilder::new(PaperSize::Mm80)
    }

    #[test]
    fn test_characters_per_line_font_a_80mm() {
        let doc = builder();
        assert_eq!(doc.characters_per_line(), 48); // floor(576 / (12 * 1))
    }

    #[test]
    fn test_characters_per_line_tracks_font_and_size() {
        let mut doc = builder();
        doc.set_font(Font::B);
        assert_eq!(doc.characters_per_line(), 64); // floor(576 / 9)
        doc.set_text_size(TextSize::new(2, 2));
        assert_eq!(doc.characters_per_line(), 32); // floor(576 / 18)
    }

    #[test]
    fn test_characters_per_line_58mm() {
        let doc = DocumentBuilder::new(PaperSize::Mm58);
        assert_eq!(doc.characters_per_line(), 32); // floor(384 / 12)
    }

    #[test]
    fn test_append_text_single_fragment_and_cursor() {
        let mut doc = builder();
        doc.append_text("HELLO WORLD", &TextOptions::default());
        assert_eq!(doc.export_fragments(), vec!["<text>HELLO WORLD</text>"]);
        assert_eq!(doc.cursor(), 11);
    }

    #[test]
    fn test_append_text_cursor_accumulates_on_same_line() {
        let mut doc = builder();
        doc.append_text("Total:", &TextOptions::default());
        doc.append_text(" 9.50", &TextOptions::default());
        assert_eq!(doc.cursor(), 11);
    }

    #[test]
    fn test_append_text_escapes_content() {
        let mut doc = builder();
        doc.append_text("R&D <dept>", &TextOptions::default());
        assert_eq!(
            doc.export_fragments(),
            vec!["<text>R&amp;D &lt;dept&gt;</text>"]
        );
    }

    #[test]
    fn test_append_text_wrapped_cursor_uses_last_line() {
        let mut doc = builder();
        // 48 chars per line; 30 + 1 + 30 forces a wrap
        let long = format!("{} {}", "a".repeat(30), "b".repeat(30));
        doc.append_text(&long, &TextOptions::default());
        assert_eq!(doc.cursor(), 30);
        let fragments = doc.export_fragments();
        assert!(fragments[0].contains("&#10;")); // embedded break is escaped
    }

    #[test]
    fn test_append_text_capitalize() {
        let mut doc = builder();
        doc.append_text("café", &TextOptions::default().with_capitalize(true));
        assert_eq!(doc.export_fragments(), vec!["<text>CAFE</text>"]);
        assert_eq!(doc.cursor(), 4);
    }

    #[test]
    fn test_append_text_align_right_pads_current_line() {
        let mut doc = builder();
        doc.append_text("Total", &TextOptions::default());
        doc.append_text(
            "9.50",
            &TextOptions::default().with_align_right(true).with_new_line(true),
        );
        let fragments = doc.export_fragments();
        // padding = 48 - 5 - 4 = 39 spaces, as its own fragment
        assert_eq!(fragments[1], format!("<text>{}</text>", " ".repeat(39)));
        assert_eq!(fragments[2], "<text>9.50</text>");
        assert_eq!(fragments[3], "<text>\n</text>");
        assert_eq!(doc.cursor(), 0);
    }

    #[test]
    fn test_append_new_line_resets_cursor() {
        let mut doc = builder();
        doc.append_text("abc", &TextOptions::default());
        doc.append_new_line();
        assert_eq!(doc.cursor(), 0);
        assert_eq!(doc.export_fragments()[1], "<text>\n</text>");
    }

    #[test]
    fn test_set_style_merges_partials() {
        let mut doc = builder();
        doc.set_style(StylePatch::default().with_emphasis(true));
        doc.set_style(StylePatch::default().with_color(Color::Color2));
        assert!(doc.style().emphasis);
        assert_eq!(doc.style().color, Color::Color2);
        assert_eq!(
            doc.export_fragments()[1],
            r#"<text reverse="false" ul="false" em="true" color="color_2" />"#
        );
    }

    #[test]
    fn test_horizontal_line_restores_style() {
        let mut doc = builder();
        doc.set_style(StylePatch::default().with_emphasis(true));
        doc.add_horizontal_line();
        // underline was only transient
        assert!(!doc.style().underline);
        assert!(doc.style().emphasis);
        let fragments = doc.export_fragments();
        // newline, ul-on, 48 spaces, newline, newline, restore
        assert_eq!(fragments.len(), 7);
        assert_eq!(fragments[2], r#"<text reverse="false" ul="true" em="true" color="color_1" />"#);
        assert_eq!(fragments[3], format!("<text>{}</text>", " ".repeat(48)));
        assert_eq!(
            fragments[6],
            r#"<text reverse="false" ul="false" em="true" color="color_1" />"#
        );
        assert_eq!(doc.cursor(), 0);
    }

    #[test]
    fn test_serialize_envelope_shape() {
        let mut doc = builder();
        doc.append_text("hi", &TextOptions::default());
        let xml = doc.serialize();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<s:Envelope"));
        assert!(xml.contains(
            "<epos-print xmlns=\"http://www.epson-pos.com/schemas/2011/03/epos-print\">\n<text>hi</text>\n"
        ));
        assert!(xml.ends_with("</s:Envelope>"));
    }

    #[test]
    fn test_serialize_does_not_mutate() {
        let mut doc = builder();
        doc.append_text("once", &TextOptions::default());
        let first = doc.serialize();
        let second = doc.serialize();
        assert_eq!(first, second);
        assert_eq!(doc.export_fragments().len(), 1);
    }

    #[test]
    fn test_reset_emits_default_fragments() {
        let mut doc = builder();
        doc.append_text("stale", &TextOptions::default());
        doc.set_font(Font::C);
        doc.reset();
        assert_eq!(doc.cursor(), 0);
        assert_eq!(doc.font(), Font::A);
        assert_eq!(
            doc.export_fragments(),
            vec![
                r#"<text font="font_a" />"#,
                r#"<text width="1" height="1" />"#,
                r#"<text reverse="false" ul="false" em="false" color="color_1" />"#,
            ]
        );
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut doc = builder();
        doc.set_style(StylePatch::default().with_emphasis(true));
        doc.append_text("Receipt #42", &TextOptions::default().with_new_line(true));
        doc.add_cut(CutType::Feed);
        let before = doc.serialize();

        let snapshot = doc.export_fragments();
        let mut replay = builder();
        replay.import_fragments(snapshot);
        assert_eq!(replay.serialize(), before);
        // bookkeeping restarts from defaults
        assert_eq!(replay.cursor(), 0);
        assert!(!replay.style().emphasis);
    }

    #[test]
    fn test_cut_default_type() {
        let mut doc = builder();
        doc.add_cut(CutType::default());
        assert_eq!(doc.export_fragments(), vec![r#"<cut type="feed" />"#]);
    }
}
