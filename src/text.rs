use cairo::Context as CairoContext;
use pango::{FontDescription, Weight};
use pangocairo::functions as pangocairo;

pub const DEFAULT_FONT_FAMILY: &str = "Liberation Sans";
pub const LINE_HEIGHT: f64 = 14.0;
/// Characters kept from a word that cannot fit on a line by itself.
pub const TRUNCATE_CHARS: usize = 15;
pub const ELLIPSIS: &str = "...";

/// Width of a single line of text in surface pixels.
pub trait TextMeasurer {
    fn measure_width(&self, text: &str) -> f64;
}

/// Measures with a pango layout bound to a live cairo context.
pub struct PangoMeasurer {
    layout: pango::Layout,
}

impl PangoMeasurer {
    pub fn new(ctx: &CairoContext, font: &FontDescription) -> Self {
        let layout = pangocairo::create_layout(ctx);
        layout.set_font_description(Some(font));
        Self { layout }
    }
}

impl TextMeasurer for PangoMeasurer {
    fn measure_width(&self, text: &str) -> f64 {
        self.layout.set_text(text);
        let (width, _) = self.layout.pixel_size();
        width as f64
    }
}

/// Fixed advance per character. Deterministic, no font lookups.
#[derive(Clone, Copy, Debug)]
pub struct MonospaceMeasurer {
    pub advance: f64,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self { advance: 7.0 }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure_width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.advance
    }
}

pub fn font_description(family: &str, font_px: f64, bold: bool) -> FontDescription {
    let mut font_desc = FontDescription::from_string(family);
    font_desc.set_absolute_size(font_px * pango::SCALE as f64);
    if bold {
        font_desc.set_weight(Weight::Bold);
    }
    font_desc
}

/// Greedy word wrap. A word too wide for a line of its own is cut to
/// [`TRUNCATE_CHARS`] characters plus an ellipsis.
pub fn wrap(text: &str, max_width: f64, measurer: &dyn TextMeasurer) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if measurer.measure_width(&candidate) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if measurer.measure_width(word) <= max_width {
            current = word.to_string();
        } else {
            lines.push(truncate_word(word));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn truncate_word(word: &str) -> String {
    let mut cut: String = word.chars().take(TRUNCATE_CHARS).collect();
    cut.push_str(ELLIPSIS);
    cut
}

/// Vertical centers of `line_count` lines stacked around `center_y`.
pub fn line_centers(center_y: f64, line_count: usize) -> Vec<f64> {
    let block_height = line_count as f64 * LINE_HEIGHT;
    let first = center_y - block_height / 2.0 + LINE_HEIGHT / 2.0;
    (0..line_count)
        .map(|i| first + i as f64 * LINE_HEIGHT)
        .collect()
}
