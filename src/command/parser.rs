use std::str::FromStr;

use crate::assets::source::ImageSource;
use crate::foundation::core::{Rgba8, now_millis};
use crate::model::slide::{
    BackgroundKind, GradientDirection, GradientSpec, Layout, LogoLayer, Slide, SlideId, TextField,
};
use crate::render::style::Typography;

/// Per-field typography change requested by `fontsize-<field>` / `color-<field>` lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TypographyOverride {
    /// Layer the change applies to.
    pub field: TextField,
    /// New font size at the reference width.
    pub size: Option<f64>,
    /// New fill color.
    pub color: Option<Rgba8>,
}

/// Result of parsing command text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandScript {
    /// Parsed slides in block order, capped at the parser's limit.
    pub slides: Vec<Slide>,
    /// Typography changes in the order they appeared.
    pub overrides: Vec<TypographyOverride>,
    /// Blocks parsed past the cap and discarded.
    pub dropped: usize,
}

impl CommandScript {
    /// Whether no slide block was found.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Apply every override to `typography`, later lines winning.
    pub fn apply_overrides(&self, typography: &mut Typography) {
        for o in &self.overrides {
            let style = typography.get_mut(o.field);
            if let Some(size) = o.size {
                style.size = size;
            }
            if let Some(color) = o.color {
                style.color = color;
            }
        }
    }
}

/// Line-oriented `## SLIDE` / `key: value` parser.
///
/// Parsing never fails: malformed values are logged and skipped, unknown keys fall back to the
/// first empty text layer, and text without any slide marker yields an empty script.
#[derive(Clone, Copy, Debug)]
pub struct CommandParser {
    max_slides: usize,
    id_base: Option<i64>,
}

impl Default for CommandParser {
    fn default() -> Self {
        Self {
            max_slides: 15,
            id_base: None,
        }
    }
}

impl CommandParser {
    /// Parser keeping at most `max_slides` slides.
    pub fn new(max_slides: usize) -> Self {
        Self {
            max_slides,
            id_base: None,
        }
    }

    /// Number slides `base`, `base + 1`, ... instead of from the clock.
    pub fn with_id_base(mut self, base: i64) -> Self {
        self.id_base = Some(base);
        self
    }

    /// Parse `text` into slides and typography overrides.
    #[tracing::instrument(level = "debug", skip_all, fields(bytes = text.len()))]
    pub fn parse(&self, text: &str) -> CommandScript {
        let mut blocks: Vec<SlideDraft> = Vec::new();
        let mut overrides = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if is_slide_marker(line) {
                blocks.push(SlideDraft::new(blocks.len()));
                continue;
            }
            let Some(draft) = blocks.last_mut() else {
                continue;
            };
            let Some((key, value)) = split_key_value(line) else {
                continue;
            };
            draft.apply(&key, value, line, &mut overrides);
        }

        let total = blocks.len();
        let base = self.id_base.unwrap_or_else(now_millis);
        let slides: Vec<Slide> = blocks
            .into_iter()
            .take(self.max_slides)
            .enumerate()
            .map(|(i, d)| d.finish(SlideId(base.saturating_add(i as i64))))
            .collect();
        let dropped = total - slides.len();
        if dropped > 0 {
            tracing::warn!(dropped, max = self.max_slides, "command text exceeds slide cap");
        }
        tracing::debug!(slides = slides.len(), "parsed command text");

        CommandScript {
            slides,
            overrides,
            dropped,
        }
    }
}

/// Parse `text` with the default cap, numbering slides from the clock.
pub fn parse_commands(text: &str) -> Vec<Slide> {
    CommandParser::default().parse(text).slides
}

/// `## slide`, optionally followed by a number or label. `slide` must end at a word boundary, so
/// `## Slideshow` is not a marker.
fn is_slide_marker(line: &str) -> bool {
    line.strip_prefix("##").is_some_and(|rest| {
        let rest = rest.trim_start();
        let is_word = rest
            .get(..5)
            .is_some_and(|word| word.eq_ignore_ascii_case("slide"));
        is_word && !rest[5..].starts_with(|c: char| c.is_alphabetic())
    })
}

/// `key: value` with the key lower-cased and inner whitespace folded to `-`.
fn split_key_value(line: &str) -> Option<(String, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_ascii_lowercase();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

/// Every `#` followed by 3 to 6 hex digits, in order.
fn hex_tokens(value: &str) -> Vec<&str> {
    let bytes = value.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'#' {
            let digits = bytes[i + 1..]
                .iter()
                .take(6)
                .take_while(|b| b.is_ascii_hexdigit())
                .count();
            if digits >= 3 {
                out.push(&value[i..i + 1 + digits]);
                i += 1 + digits;
                continue;
            }
        }
        i += 1;
    }
    out
}

fn parse_color(key: &str, value: &str) -> Option<Rgba8> {
    match Rgba8::parse(value) {
        Ok(c) => Some(c),
        Err(e) => {
            tracing::warn!(key, value, error = %e, "ignoring malformed color");
            None
        }
    }
}

fn parse_dimension(key: &str, value: &str) -> Option<u32> {
    let digits: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
    match digits.parse::<u32>() {
        Ok(v) if v > 0 => Some(v),
        _ => {
            tracing::warn!(key, value, "ignoring malformed dimension");
            None
        }
    }
}

struct SlideDraft {
    slide: Slide,
    explicit_kind: Option<BackgroundKind>,
    implied_kind: Option<BackgroundKind>,
}

impl SlideDraft {
    fn new(position: usize) -> Self {
        let mut slide = Slide::blank(SlideId(0));
        slide.background.gradient = Slide::sequence_gradient(position);
        Self {
            slide,
            explicit_kind: None,
            implied_kind: None,
        }
    }

    fn apply(
        &mut self,
        key: &str,
        value: &str,
        raw: &str,
        overrides: &mut Vec<TypographyOverride>,
    ) {
        match key {
            "title" | "headline" => self.slide.text.headline = value.to_owned(),
            "description" | "subtext" | "caption" => self.slide.text.subtext = value.to_owned(),
            "cta" => self.slide.text.cta = value.to_owned(),
            "watermark" | "brand" => self.slide.text.watermark = value.to_owned(),
            "layout" => self.slide.layout = Layout::from_name(value),
            "bg" => self.apply_bg(value),
            "bg-type" => match BackgroundKind::from_str(value) {
                Ok(kind) => self.explicit_kind = Some(kind),
                Err(e) => tracing::warn!(error = %e, "ignoring bg-type"),
            },
            "bg-color" => {
                if let Some(c) = parse_color(key, value) {
                    self.slide.background.color = c;
                    self.implied_kind = Some(BackgroundKind::Color);
                }
            }
            "gradient1" => {
                if let Some(c) = parse_color(key, value) {
                    self.slide.background.gradient.color1 = c;
                    self.implied_kind = Some(BackgroundKind::Gradient);
                }
            }
            "gradient2" => {
                if let Some(c) = parse_color(key, value) {
                    self.slide.background.gradient.color2 = c;
                    self.implied_kind = Some(BackgroundKind::Gradient);
                }
            }
            "gradient-dir" => {
                self.slide.background.gradient.direction = GradientDirection::parse(value);
                self.implied_kind = Some(BackgroundKind::Gradient);
            }
            "bg-image" => {
                if !value.is_empty() {
                    self.slide.background.image = Some(ImageSource::new(value));
                    self.implied_kind = Some(BackgroundKind::Image);
                }
            }
            "width" | "w" => {
                if let Some(w) = parse_dimension(key, value) {
                    self.slide.width = Some(w);
                }
            }
            "height" | "h" => {
                if let Some(h) = parse_dimension(key, value) {
                    self.slide.height = Some(h);
                }
            }
            "logo" => {
                if !value.is_empty() {
                    self.slide.logo = Some(LogoLayer::with_source(ImageSource::new(value)));
                }
            }
            _ if key.starts_with("fontsize-") || key.starts_with("color-") => {
                if let Some(o) = typography_override(key, value) {
                    overrides.push(o);
                }
            }
            _ => self.fallback(raw),
        }
    }

    fn apply_bg(&mut self, value: &str) {
        let lower = value.to_ascii_lowercase();
        if lower.starts_with("gradient") {
            let colors: Vec<Rgba8> = hex_tokens(value)
                .into_iter()
                .filter_map(|t| parse_color("bg", t))
                .collect();
            if let [a, b, ..] = colors.as_slice() {
                self.slide.background.gradient = GradientSpec::to_right(*a, *b);
            }
            self.implied_kind = Some(BackgroundKind::Gradient);
            return;
        }
        if let Ok(kind) = BackgroundKind::from_str(&lower) {
            self.explicit_kind = Some(kind);
            return;
        }
        if let Some(c) = parse_color("bg", value) {
            self.slide.background.color = c;
            self.implied_kind = Some(BackgroundKind::Color);
        }
    }

    fn fallback(&mut self, raw: &str) {
        let text = &mut self.slide.text;
        if text.headline.is_empty() {
            text.headline = raw.to_owned();
        } else if text.subtext.is_empty() {
            text.subtext = raw.to_owned();
        } else {
            tracing::debug!(line = raw, "ignoring unrecognized command line");
        }
    }

    fn finish(mut self, id: SlideId) -> Slide {
        self.slide.id = id;
        self.slide.background.kind = self
            .explicit_kind
            .or(self.implied_kind)
            .unwrap_or(BackgroundKind::Gradient);
        self.slide
    }
}

fn typography_override(key: &str, value: &str) -> Option<TypographyOverride> {
    let (field, is_size) = match key.strip_prefix("fontsize-") {
        Some(f) => (f, true),
        None => (key.strip_prefix("color-")?, false),
    };
    let field = match TextField::from_str(field) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring style override");
            return None;
        }
    };
    if is_size {
        let number = value.trim().trim_end_matches("px").trim();
        return match number.parse::<f64>() {
            Ok(size) if size.is_finite() && size > 0.0 => Some(TypographyOverride {
                field,
                size: Some(size),
                color: None,
            }),
            _ => {
                tracing::warn!(key, value, "ignoring malformed font size");
                None
            }
        };
    }
    parse_color(key, value).map(|c| TypographyOverride {
        field,
        size: None,
        color: Some(c),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/command/parser.rs"]
mod tests;
