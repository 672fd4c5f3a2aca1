//! Report text layout — width measurement, line wrapping and pagination.
//!
//! Widths are in em units relative to the font size. ASCII uses Helvetica's
//! AFM widths; CJK ideographs and full-width punctuation are square (1 em);
//! anything else falls back to an average width. The embedded font's own
//! Latin glyphs may run a little past the estimate; the right margin absorbs that.

/// Points to millimetres.
pub const PT_TO_MM: f32 = 0.352_778;

/// Fallback width for non-ASCII, non-CJK characters.
const AVERAGE_CHAR_WIDTH: f32 = 0.6;

/// Helvetica widths for ASCII 0x20..=0x7E. Index = (char as usize) - 32.
#[rustfmt::skip]
static HELVETICA_WIDTHS: [f32; 95] = [
    // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
    0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
    // 0      1      2      3      4      5      6      7      8      9
    0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
    // :      ;      <      =      >      ?      @
    0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
    // A      B      C      D      E      F      G      H      I      J      K      L      M
    0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
    // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
    0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
    // [      \      ]      ^      _      `
    0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
    // a      b      c      d      e      f      g      h      i      j      k      l      m
    0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
    // n      o      p      q      r      s      t      u      v      w      x      y      z
    0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
    // {      |      }      ~
    0.334, 0.260, 0.334, 0.584,
];

/// Closing punctuation that must not start a line (避头点).
const NO_LINE_START: &[char] = &[
    '，', '。', '、', '；', '：', '！', '？', '）', '》', '」', '』', '”', '’', ',', '.', ';', ':',
    '!', '?', ')',
];

pub fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xA000..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
    )
}

pub fn char_width(c: char) -> f32 {
    let code = c as usize;
    if (32..=126).contains(&code) {
        HELVETICA_WIDTHS[code - 32]
    } else if is_wide(c) {
        1.0
    } else {
        AVERAGE_CHAR_WIDTH
    }
}

/// Measures the rendered width of a string in em units.
pub fn measure_str(s: &str) -> f32 {
    s.chars().map(char_width).sum()
}

/// Splits text into breakable units: ASCII words, single wide characters, and spaces.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    for c in text.chars() {
        if c.is_whitespace() || is_wide(c) {
            if !word.is_empty() {
                tokens.push(std::mem::take(&mut word));
            }
            tokens.push(if c.is_whitespace() { " ".to_string() } else { c.to_string() });
        } else {
            word.push(c);
        }
    }
    if !word.is_empty() {
        tokens.push(word);
    }
    tokens
}

/// Greedy line wrap of a single paragraph at `max_width_em`.
///
/// Words longer than a line are broken by character. Closing punctuation
/// stays on the line it closes even if that overruns the width slightly.
pub fn wrap_paragraph(text: &str, max_width_em: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut width = 0.0_f32;

    for token in tokenize(text) {
        if token == " " && current.is_empty() {
            continue;
        }

        let token_width = measure_str(&token);
        let sticky = token.chars().count() == 1
            && token.chars().all(|c| NO_LINE_START.contains(&c));

        if width + token_width <= max_width_em || sticky {
            current.push_str(&token);
            width += token_width;
            continue;
        }

        if token_width > max_width_em {
            // Overlong word: fill the current line char by char.
            for c in token.chars() {
                let w = char_width(c);
                if width + w > max_width_em && !current.is_empty() {
                    lines.push(current.trim_end().to_string());
                    current.clear();
                    width = 0.0;
                }
                current.push(c);
                width += w;
            }
            continue;
        }

        lines.push(current.trim_end().to_string());
        current.clear();
        width = 0.0;
        if token != " " {
            current.push_str(&token);
            width = token_width;
        }
    }

    let tail = current.trim_end();
    if !tail.is_empty() {
        lines.push(tail.to_string());
    }
    lines
}

// ────────────────────────────────────────────────────────────────────────────
// Pagination
// ────────────────────────────────────────────────────────────────────────────

/// Page geometry in millimetres.
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
    /// Line height as a multiple of the font size.
    pub leading: f32,
}

/// A4 with 20 mm margins.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        width_mm: 210.0,
        height_mm: 297.0,
        margin_mm: 20.0,
        leading: 1.6,
    }
}

impl PageConfig {
    pub fn text_width_mm(&self) -> f32 {
        self.width_mm - 2.0 * self.margin_mm
    }

    /// Usable text width in em units at the given font size.
    pub fn text_width_em(&self, font_size_pt: f32) -> f32 {
        self.text_width_mm() / (font_size_pt * PT_TO_MM)
    }
}

/// A run of text in one style, laid out as one or more paragraphs.
#[derive(Debug, Clone)]
pub struct Block {
    pub text: String,
    pub font_size_pt: f32,
    /// Extra space above the block.
    pub space_before_mm: f32,
}

/// A single line with its baseline position on the page (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub font_size_pt: f32,
    pub x_mm: f32,
    pub y_mm: f32,
}

/// Wraps every block and assigns lines to pages, top to bottom.
pub fn paginate(blocks: &[Block], page: &PageConfig) -> Vec<Vec<PlacedLine>> {
    let top = page.height_mm - page.margin_mm;
    let bottom = page.margin_mm;

    let mut pages: Vec<Vec<PlacedLine>> = vec![Vec::new()];
    let mut cursor = top;

    for block in blocks {
        let line_height = block.font_size_pt * page.leading * PT_TO_MM;
        let max_width = page.text_width_em(block.font_size_pt);

        if cursor < top {
            cursor -= block.space_before_mm;
        }

        for paragraph in block.text.split('\n') {
            let lines = wrap_paragraph(paragraph, max_width);
            if lines.is_empty() {
                // Blank source line keeps half a line of vertical space.
                cursor -= line_height / 2.0;
                continue;
            }
            for text in lines {
                if cursor - line_height < bottom {
                    pages.push(Vec::new());
                    cursor = top;
                }
                cursor -= line_height;
                if let Some(current) = pages.last_mut() {
                    current.push(PlacedLine {
                        text,
                        font_size_pt: block.font_size_pt,
                        x_mm: page.margin_mm,
                        y_mm: cursor,
                    });
                }
            }
        }
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_mixed_text() {
        assert!((measure_str("紫微") - 2.0).abs() < 1e-6);
        assert!((measure_str("ab") - 1.112).abs() < 1e-6);
        assert!((measure_str("é") - AVERAGE_CHAR_WIDTH).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_cjk_by_character() {
        let text = "一二三四五六七八九十";
        let lines = wrap_paragraph(text, 4.0);
        assert_eq!(lines, vec!["一二三四", "五六七八", "九十"]);
    }

    #[test]
    fn test_wrap_latin_by_word() {
        let lines = wrap_paragraph("alpha beta gamma delta", 6.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(!line.starts_with(' '));
            assert!(!line.ends_with(' '));
            assert!(measure_str(line) <= 6.0);
        }
        assert_eq!(lines.join(" "), "alpha beta gamma delta");
    }

    #[test]
    fn test_closing_punctuation_never_starts_a_line() {
        let lines = wrap_paragraph("一二三四。五六", 4.0);
        assert_eq!(lines[0], "一二三四。");
        assert!(!lines[1].starts_with('。'));
    }

    #[test]
    fn test_overlong_word_is_broken() {
        let word = "x".repeat(40);
        let lines = wrap_paragraph(&word, 5.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_paginate_spills_to_new_pages() {
        let page = default_page_config();
        let block = Block {
            text: "命".repeat(5000),
            font_size_pt: 11.0,
            space_before_mm: 0.0,
        };
        let pages = paginate(&[block], &page);
        assert!(pages.len() > 1);
        for p in &pages {
            assert!(!p.is_empty());
            for line in p {
                assert!(line.y_mm >= page.margin_mm);
                assert!(line.y_mm <= page.height_mm - page.margin_mm);
            }
        }
    }

    #[test]
    fn test_paginate_preserves_order() {
        let page = default_page_config();
        let blocks = vec![
            Block { text: "Title".into(), font_size_pt: 18.0, space_before_mm: 0.0 },
            Block { text: "Body".into(), font_size_pt: 11.0, space_before_mm: 4.0 },
        ];
        let pages = paginate(&blocks, &page);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0][0].text, "Title");
        assert_eq!(pages[0][1].text, "Body");
        assert!(pages[0][1].y_mm < pages[0][0].y_mm);
    }
}
