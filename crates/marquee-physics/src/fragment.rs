use serde::{Deserialize, Serialize};

/// Tape color behind a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TapeColor {
    #[default]
    Yellow,
    Pink,
    Cyan,
    Lime,
    Orange,
}

impl TapeColor {
    /// Parse the `data-tape` attribute; unknown values fall back to yellow.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("pink") => TapeColor::Pink,
            Some("cyan") => TapeColor::Cyan,
            Some("lime") => TapeColor::Lime,
            Some("orange") => TapeColor::Orange,
            _ => TapeColor::Yellow,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            TapeColor::Yellow => "tape-yellow",
            TapeColor::Pink => "tape-pink",
            TapeColor::Cyan => "tape-cyan",
            TapeColor::Lime => "tape-lime",
            TapeColor::Orange => "tape-orange",
        }
    }
}

/// One word or phrase of the effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub tape: TapeColor,
}

impl TextFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: None,
            tape: TapeColor::default(),
        }
    }

    pub fn with_link(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_tape(mut self, tape: TapeColor) -> Self {
        self.tape = tape;
        self
    }

    /// Rough rendered size for hosts that cannot measure the DOM.
    pub fn estimated_size(&self, font_px: f32) -> FragmentSize {
        let chars = self.text.chars().count().max(1) as f32;
        FragmentSize {
            width: chars * font_px * 0.6 + font_px,
            height: font_px * 1.6,
        }
    }
}

/// Rendered box of a fragment in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FragmentSize {
    pub width: f32,
    pub height: f32,
}

impl FragmentSize {
    /// Zero or unmeasurable boxes are bumped to a minimum so every body has
    /// a real collider.
    pub fn sanitized(self, min_px: f32) -> Self {
        let fix = |v: f32| {
            if v.is_finite() && v >= min_px {
                v
            } else {
                min_px
            }
        };
        Self {
            width: fix(self.width),
            height: fix(self.height),
        }
    }
}
