//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use crate::palette::{self, NAMED_COLORS};
use std::iter::Peekable;
use tracing::trace;

/// The complete set of text attributes in effect at a point in the stream.
///
/// `StyleState` is a plain value: every field is always defined, and
/// [`StyleState::default()`] is the reset state that `SGR 0` returns to.
/// Applying SGR parameters produces a new state rather than mutating a shared one.
///
/// # Examples
///
/// ```
/// use ansihtml::{Color, Intensity, StyleState};
///
/// let style = StyleState::default().apply_sgr(b"1;38;5;196");
/// assert_eq!(style.intensity, Intensity::Bold);
/// assert_eq!(style.foreground, Color::Indexed(196));
/// assert!(style.apply_sgr(b"0").is_default());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StyleState {
    /// Intensity of Text
    ///
    /// | Code | Description |
    /// |------|-------------|
    /// | `1`  | Bold        |
    /// | `2`  | Faint       |
    /// | `22` | Normal      |
    pub intensity: Intensity,
    /// Italic or Fraktur rendition.
    ///
    /// | Code | Description |
    /// |------|-------------|
    /// | `3`  | Italic      |
    /// | `20` | Fraktur     |
    /// | `23` | Normal      |
    pub font_style: FontStyle,
    /// Underline.
    ///
    /// | Code | Description      |
    /// |------|------------------|
    /// | `4`  | Underline        |
    /// | `21` | Double Underline |
    /// | `24` | No Underline     |
    pub underline: Underline,
    /// Blink.
    ///
    /// | Code | Description |
    /// |------|-------------|
    /// | `5`  | Slow Blink  |
    /// | `6`  | Rapid Blink |
    /// | `25` | No Blink    |
    pub blink: Blink,
    /// Swapped foreground and background (`7` / `27`).
    pub inverted: bool,
    /// Concealed text (`8` / `28`).
    pub hidden: bool,
    /// Crossed-out text (`9` / `29`).
    pub strikethrough: bool,
    /// Overlined text (`51`, `53` / `55`).
    pub overline: bool,
    /// Primary (`10`) or alternate (`11`-`19`) font.
    pub font: Font,
    /// Proportional spacing (`26` / `50`).
    pub proportional: bool,
    /// Superscript (`73`), subscript (`74`) or neither (`75`).
    pub script: Script,
    /// Foreground color (`30`-`37`, `38`, `39`, `90`-`97`).
    pub foreground: Color,
    /// Background color (`40`-`47`, `48`, `49`, `100`-`107`).
    pub background: Color,
    /// Underline color (`58`, `59`).
    pub underline_color: Color,
}

impl StyleState {
    /// Whether every attribute is at its reset value.
    pub fn is_default(&self) -> bool {
        *self == StyleState::default()
    }

    /// Apply the parameter bytes of an SGR sequence and return the resulting state.
    ///
    /// `params` is split on `;`. Empty tokens, including an entirely empty list and
    /// a trailing `;`, count as `0`. Codes are applied left to right; unknown codes
    /// are ignored without consuming further tokens.
    ///
    /// The extended color codes `38`, `48` and `58` take a selector: `5;N` picks
    /// palette entry `N`, `2;R;G;B` an explicit color. Components are clamped to
    /// 255 and default to 0 when the list ends early. Any other selector leaves
    /// the color unchanged and is consumed together with the code.
    pub fn apply_sgr(mut self, params: &[u8]) -> StyleState {
        let mut tokens = params
            .split(|byte| *byte == b';')
            .map(parse_parameter)
            .peekable();
        while let Some(code) = tokens.next() {
            self.apply_code(code, &mut tokens);
        }
        self
    }

    fn apply_code<I>(&mut self, code: u32, tokens: &mut Peekable<I>)
    where
        I: Iterator<Item = u32>,
    {
        match code {
            // Reset
            0 => *self = StyleState::default(),

            // Intensity
            1 => self.intensity = Intensity::Bold,
            2 => self.intensity = Intensity::Faint,
            22 => self.intensity = Intensity::Normal,

            // Italic / Fraktur
            3 => self.font_style = FontStyle::Italic,
            20 => self.font_style = FontStyle::Fraktur,
            23 => self.font_style = FontStyle::Normal,

            // Underline
            4 => self.underline = Underline::Single,
            21 => self.underline = Underline::Double,
            24 => self.underline = Underline::Disabled,

            // Blink
            5 => self.blink = Blink::Slow,
            6 => self.blink = Blink::Rapid,
            25 => self.blink = Blink::Off,

            // Reverse
            7 => self.inverted = true,
            27 => self.inverted = false,

            // Hidden
            8 => self.hidden = true,
            28 => self.hidden = false,

            // Strike
            9 => self.strikethrough = true,
            29 => self.strikethrough = false,

            // Fonts
            10 => self.font = Font::Primary,
            11..=19 => self.font = Font::Alternate((code - 10) as u8),

            // Spacing
            26 => self.proportional = true,
            50 => self.proportional = false,

            // Overline
            51 | 53 => self.overline = true,
            55 => self.overline = false,

            // Foreground
            30..=37 => self.foreground = Color::Indexed((code - 30) as u8),
            38 => {
                if let Some(color) = extended_color(tokens) {
                    self.foreground = color;
                }
            }
            39 => self.foreground = Color::Default,
            90..=97 => self.foreground = Color::Indexed((code - 90) as u8 + 8),

            // Background
            40..=47 => self.background = Color::Indexed((code - 40) as u8),
            48 => {
                if let Some(color) = extended_color(tokens) {
                    self.background = color;
                }
            }
            49 => self.background = Color::Default,
            100..=107 => self.background = Color::Indexed((code - 100) as u8 + 8),

            // Underline color
            58 => {
                if let Some(color) = extended_color(tokens) {
                    self.underline_color = color;
                }
            }
            59 => self.underline_color = Color::Default,

            // Script
            73 => self.script = Script::Superscript,
            74 => self.script = Script::Subscript,
            75 => self.script = Script::Baseline,

            code => trace!(code, "ignoring unsupported SGR code"),
        }
    }
}

/// Apply `params` to `state`; see [`StyleState::apply_sgr`].
pub fn apply_sgr(params: &[u8], state: StyleState) -> StyleState {
    state.apply_sgr(params)
}

/// Parse one decimal token, saturating at `u32::MAX`.
///
/// An empty token is `0`. A token containing anything but digits has no meaning
/// and parses as `u32::MAX`, which no code matches.
fn parse_parameter(token: &[u8]) -> u32 {
    token
        .iter()
        .try_fold(0u32, |value, byte| {
            byte.is_ascii_digit()
                .then(|| value.saturating_mul(10).saturating_add(u32::from(byte - b'0')))
        })
        .unwrap_or(u32::MAX)
}

/// Clamp a parameter into a color channel or palette index.
fn saturate(value: u32) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

fn extended_color<I>(tokens: &mut Peekable<I>) -> Option<Color>
where
    I: Iterator<Item = u32>,
{
    let selector = tokens.next_if(|selector| matches!(selector, 2 | 5));
    match selector {
        Some(5) => Some(Color::Indexed(saturate(tokens.next().unwrap_or(0)))),
        Some(_) => {
            let mut channel = || saturate(tokens.next().unwrap_or(0));
            let (r, g, b) = (channel(), channel(), channel());
            Some(Color::Rgb(r, g, b))
        }
        None => {
            if let Some(selector) = tokens.next() {
                trace!(selector, "ignoring unsupported extended color selector");
            }
            None
        }
    }
}

/// Intensity (weight) of text. `Bold` and `Faint` are mutually exclusive.
#[derive(Clone, Copy, Debug, PartialOrd, PartialEq, Hash, Eq, Default)]
pub enum Intensity {
    /// Normal text intensity
    #[default]
    Normal,
    /// Increased intensity
    Bold,
    /// Decreased intensity
    Faint,
}

/// Slanted or blackletter rendition. Both occupy the same attribute, so
/// selecting one replaces the other.
#[derive(Clone, Copy, Debug, PartialOrd, PartialEq, Hash, Eq, Default)]
pub enum FontStyle {
    /// Upright text
    #[default]
    Normal,
    /// Italic text
    Italic,
    /// Fraktur (blackletter) text
    Fraktur,
}

/// Underline style.
#[derive(Clone, Copy, Debug, PartialOrd, PartialEq, Hash, Eq, Default)]
pub enum Underline {
    /// No underline
    #[default]
    Disabled,
    /// Single underline
    Single,
    /// Double underline
    Double,
}

/// Blink rate.
#[derive(Clone, Copy, Debug, PartialOrd, PartialEq, Hash, Eq, Default)]
pub enum Blink {
    /// Steady text
    #[default]
    Off,
    /// Fewer than 150 blinks per minute
    Slow,
    /// 150 or more blinks per minute
    Rapid,
}

/// Font selection.
#[derive(Clone, Copy, Debug, PartialOrd, PartialEq, Hash, Eq, Default)]
pub enum Font {
    /// Primary (default) font
    #[default]
    Primary,
    /// Alternate font 1 through 9
    Alternate(u8),
}

/// Vertical position relative to the baseline.
#[derive(Clone, Copy, Debug, PartialOrd, PartialEq, Hash, Eq, Default)]
pub enum Script {
    /// On the baseline
    #[default]
    Baseline,
    /// Raised
    Superscript,
    /// Lowered
    Subscript,
}

/// A foreground, background or underline color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Unset; the renderer's default applies.
    #[default]
    Default,
    /// Entry 0-255 of the 256-color palette. Entries 0-15 are the named colors.
    Indexed(u8),
    /// Explicit 24-bit color.
    Rgb(u8, u8, u8),
}

impl Color {
    /// Whether this color is unset.
    pub fn is_default(&self) -> bool {
        *self == Color::Default
    }

    /// Palette index of a named color (0-15).
    pub fn named_index(&self) -> Option<u8> {
        match *self {
            Color::Indexed(index) if index < NAMED_COLORS => Some(index),
            _ => None,
        }
    }

    /// RGB components, or `None` when unset.
    pub fn to_rgb(&self) -> Option<(u8, u8, u8)> {
        match *self {
            Color::Default => None,
            Color::Indexed(index) => Some(palette::indexed_rgb(index)),
            Color::Rgb(r, g, b) => Some((r, g, b)),
        }
    }

    /// CSS value: a keyword for named colors, `rgb(r,g,b)` otherwise.
    pub fn css_value(&self) -> Option<String> {
        if let Some(name) = self.named_index().and_then(palette::css_name) {
            return Some(name.to_string());
        }
        self.to_rgb().map(|(r, g, b)| format!("rgb({r},{g},{b})"))
    }

    /// Semantic class name (without prefix) for named colors.
    pub fn class_name(&self) -> Option<&'static str> {
        self.named_index().and_then(palette::class_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sgr(params: &str) -> StyleState {
        StyleState::default().apply_sgr(params.as_bytes())
    }

    #[test]
    fn test_default_state() {
        let style = StyleState::default();
        assert!(style.is_default());
        assert_eq!(style.intensity, Intensity::Normal);
        assert_eq!(style.font_style, FontStyle::Normal);
        assert_eq!(style.underline, Underline::Disabled);
        assert_eq!(style.foreground, Color::Default);
    }

    #[test]
    fn test_attribute_set_and_clear() {
        let cases: [(&str, &str, fn(&StyleState) -> bool); 9] = [
            ("1", "22", |s| s.intensity == Intensity::Bold),
            ("2", "22", |s| s.intensity == Intensity::Faint),
            ("3", "23", |s| s.font_style == FontStyle::Italic),
            ("4", "24", |s| s.underline == Underline::Single),
            ("5", "25", |s| s.blink == Blink::Slow),
            ("7", "27", |s| s.inverted),
            ("8", "28", |s| s.hidden),
            ("9", "29", |s| s.strikethrough),
            ("26", "50", |s| s.proportional),
        ];
        for (set, clear, check) in cases {
            let style = sgr(set);
            assert!(check(&style), "set {set}");
            assert!(style.apply_sgr(clear.as_bytes()).is_default(), "clear {clear}");
        }
    }

    #[test]
    fn test_bold_and_faint_replace_each_other() {
        assert_eq!(sgr("1;2").intensity, Intensity::Faint);
        assert_eq!(sgr("2;1").intensity, Intensity::Bold);
    }

    #[test]
    fn test_fraktur_replaces_italic() {
        assert_eq!(sgr("3;20").font_style, FontStyle::Fraktur);
        assert_eq!(sgr("20;3").font_style, FontStyle::Italic);
        assert!(sgr("20;23").is_default());
    }

    #[test]
    fn test_underline_kinds() {
        assert_eq!(sgr("21").underline, Underline::Double);
        assert_eq!(sgr("4;21").underline, Underline::Double);
        assert_eq!(sgr("6").blink, Blink::Rapid);
    }

    #[test]
    fn test_fonts() {
        assert_eq!(sgr("11").font, Font::Alternate(1));
        assert_eq!(sgr("19").font, Font::Alternate(9));
        assert_eq!(sgr("12;10").font, Font::Primary);
    }

    #[test]
    fn test_overline_aliases() {
        assert!(sgr("51").overline);
        assert!(sgr("53").overline);
        assert!(!sgr("53;55").overline);
    }

    #[test]
    fn test_script() {
        assert_eq!(sgr("73").script, Script::Superscript);
        assert_eq!(sgr("74").script, Script::Subscript);
        assert_eq!(sgr("74;75").script, Script::Baseline);
    }

    #[test]
    fn test_basic_colors() {
        assert_eq!(sgr("33").foreground, Color::Indexed(3));
        assert_eq!(sgr("44").background, Color::Indexed(4));
        assert_eq!(sgr("91").foreground, Color::Indexed(9));
        assert_eq!(sgr("107").background, Color::Indexed(15));
        assert!(sgr("31;39").is_default());
        assert!(sgr("41;49").is_default());
    }

    #[test]
    fn test_palette_colors() {
        assert_eq!(sgr("38;5;208").foreground, Color::Indexed(208));
        assert_eq!(sgr("48;5;17").background, Color::Indexed(17));
        assert_eq!(sgr("58;5;1").underline_color, Color::Indexed(1));
    }

    #[test]
    fn test_truecolor() {
        assert_eq!(sgr("38;2;1;2;3").foreground, Color::Rgb(1, 2, 3));
        assert_eq!(sgr("48;2;4;5;6").background, Color::Rgb(4, 5, 6));
        assert_eq!(sgr("58;2;0;255;0").underline_color, Color::Rgb(0, 255, 0));
        assert!(sgr("58;2;0;255;0;59").is_default());
    }

    #[test]
    fn test_extended_color_consumes_its_tokens() {
        // The 1 is a color component, not bold.
        let style = sgr("38;2;1;1;1");
        assert_eq!(style.intensity, Intensity::Normal);
        let style = sgr("38;5;1;1");
        assert_eq!(style.foreground, Color::Indexed(1));
        assert_eq!(style.intensity, Intensity::Bold);
    }

    #[test]
    fn test_component_saturation() {
        assert_eq!(
            sgr("48;2;9999999997;9999999998;9999999999").background,
            Color::Rgb(255, 255, 255)
        );
        assert_eq!(sgr("38;2;233;277;255").foreground, Color::Rgb(233, 255, 255));
        assert_eq!(sgr("38;5;300").foreground, Color::Indexed(255));
    }

    #[test]
    fn test_missing_components_default_to_zero() {
        assert_eq!(sgr("38;2;10").foreground, Color::Rgb(10, 0, 0));
        assert_eq!(sgr("38;2").foreground, Color::Rgb(0, 0, 0));
        assert_eq!(sgr("38;5").foreground, Color::Indexed(0));
        assert_eq!(sgr("58;2;0;255;").underline_color, Color::Rgb(0, 255, 0));
    }

    #[test]
    fn test_unsupported_selector_is_noop() {
        assert!(sgr("38;1").is_default());
        assert!(sgr("48;3;1").intensity == Intensity::Bold);
        assert!(sgr("38").is_default());
        assert!(sgr("31;38;7").foreground == Color::Indexed(1));
    }

    #[test]
    fn test_empty_tokens_reset() {
        let bold = sgr("1");
        assert!(bold.apply_sgr(b"").is_default());
        assert!(sgr("1;").is_default());
        assert_eq!(sgr(";1").intensity, Intensity::Bold);
    }

    #[test]
    fn test_reset_clears_everything() {
        let style = sgr("1;3;4;5;7;8;9;11;26;38;5;255;48;2;1;2;3;51;58;5;2;73");
        assert!(!style.is_default());
        assert!(style.apply_sgr(b"0").is_default());
    }

    #[test]
    fn test_unknown_codes_are_ignored() {
        assert!(sgr("60;65;99;108;4294967295;99999999999").is_default());
        assert_eq!(sgr("1;60;3").font_style, FontStyle::Italic);
    }

    #[test]
    fn test_non_digit_token_is_ignored() {
        assert!(sgr("?1").is_default());
        assert_eq!(sgr("x;1").intensity, Intensity::Bold);
    }

    #[test]
    fn test_free_function_matches_method() {
        let state = sgr("1");
        assert_eq!(apply_sgr(b"31", state), state.apply_sgr(b"31"));
    }

    #[test]
    fn test_color_css_value() {
        assert_eq!(Color::Indexed(3).css_value().as_deref(), Some("olive"));
        assert_eq!(Color::Indexed(0).css_value().as_deref(), Some("black"));
        assert_eq!(
            Color::Indexed(255).css_value().as_deref(),
            Some("rgb(238,238,238)")
        );
        assert_eq!(
            Color::Rgb(233, 21, 255).css_value().as_deref(),
            Some("rgb(233,21,255)")
        );
        assert_eq!(Color::Default.css_value(), None);
    }

    #[test]
    fn test_color_class_name() {
        assert_eq!(Color::Indexed(3).class_name(), Some("yellow"));
        assert_eq!(Color::Indexed(12).class_name(), Some("bright-blue"));
        assert_eq!(Color::Indexed(16).class_name(), None);
        assert_eq!(Color::Rgb(0, 0, 0).class_name(), None);
    }
}
