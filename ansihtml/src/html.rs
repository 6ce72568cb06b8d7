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

use crate::config::{HtmlConfig, StyleMode};
use crate::parser::{EscapeEvent, Perform};
use crate::style::{Blink, Color, Font, FontStyle, Intensity, Script, StyleState, Underline};
use bytes::{Bytes, BytesMut};
use std::borrow::Cow;
use std::convert::Infallible;

/// Literal text together with the style that was active when it was scanned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextRun<'a> {
    /// Unescaped text
    pub text: &'a [u8],
    /// Style in effect for `text`
    pub style: &'a StyleState,
}

impl<'a> TextRun<'a> {
    /// Pair `text` with `style`.
    pub fn new(text: &'a [u8], style: &'a StyleState) -> Self {
        Self { text, style }
    }
}

/// Incremental span writer.
///
/// The renderer tracks the style of the text it last wrote. A span is opened
/// lazily when text arrives under a style that differs from it, so adjacent
/// runs with equal styles share one span and style changes with no text in
/// between leave no trace in the output.
///
/// Output accumulates in an internal buffer; [`take`](HtmlRenderer::take)
/// drains it so callers can stream fragments while the open span carries over.
#[derive(Clone, Debug)]
pub struct HtmlRenderer {
    config: HtmlConfig,
    current: StyleState,
    written: StyleState,
    span_open: bool,
    output: BytesMut,
}

impl HtmlRenderer {
    pub fn new(config: HtmlConfig) -> Self {
        Self {
            config,
            current: StyleState::default(),
            written: StyleState::default(),
            span_open: false,
            output: BytesMut::new(),
        }
    }

    pub fn config(&self) -> &HtmlConfig {
        &self.config
    }

    /// Style that will apply to the next text written.
    pub fn style(&self) -> &StyleState {
        &self.current
    }

    pub fn set_style(&mut self, style: StyleState) {
        self.current = style;
    }

    /// Apply SGR parameter bytes to the current style.
    pub fn apply_sgr(&mut self, params: &[u8]) {
        self.current = self.current.apply_sgr(params);
    }

    /// Write `text` under the current style, escaping `&`, `<` and `>`.
    pub fn write_text(&mut self, text: &[u8]) {
        if text.is_empty() {
            return;
        }
        if self.current != self.written {
            self.close_span();
            self.open_span();
            self.written = self.current;
        }
        write_escaped(&mut self.output, text);
    }

    /// Close any open span.
    ///
    /// The current style is kept, so text written afterwards reopens a span.
    pub fn close(&mut self) {
        self.close_span();
        self.written = StyleState::default();
    }

    /// Drain the rendered output.
    pub fn take(&mut self) -> Bytes {
        self.output.split().freeze()
    }

    /// Rendered output not yet taken.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    fn close_span(&mut self) {
        if self.span_open {
            self.output.extend_from_slice(b"</span>");
            self.span_open = false;
        }
    }

    fn open_span(&mut self) {
        if self.current.is_default() {
            return;
        }
        let (classes, css) = match self.config.style_mode {
            StyleMode::Inline => (String::new(), inline_css(&self.current)),
            StyleMode::Classes => {
                let classes = class_list(&self.current, &self.config.class_prefix);
                let mut css = String::new();
                if !self.config.no_styles {
                    push_colors(&mut css, &self.current, true);
                }
                (classes, css)
            }
        };
        if classes.is_empty() && css.is_empty() {
            return;
        }

        self.output.extend_from_slice(b"<span");
        if !classes.is_empty() {
            self.output.extend_from_slice(b" class=\"");
            self.output.extend_from_slice(&escape_attribute(classes.as_bytes()));
            self.output.extend_from_slice(b"\"");
        }
        if !css.is_empty() {
            self.output.extend_from_slice(b" style=\"");
            self.output.extend_from_slice(css.as_bytes());
            self.output.extend_from_slice(b"\"");
        }
        self.output.extend_from_slice(b">");
        self.span_open = true;
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new(HtmlConfig::default())
    }
}

impl Perform for HtmlRenderer {
    type Error = Infallible;

    fn print(&mut self, text: &[u8]) -> Result<(), Self::Error> {
        self.write_text(text);
        Ok(())
    }

    fn dispatch(&mut self, event: &EscapeEvent<'_>) {
        if event.is_sgr() {
            self.apply_sgr(event.parameters);
        }
    }
}

/// Render a sequence of runs into a complete HTML fragment.
///
/// Adjacent runs with equal styles are coalesced into one span and a trailing
/// span is closed.
pub fn render<'a, I>(runs: I, config: &HtmlConfig) -> Vec<u8>
where
    I: IntoIterator<Item = TextRun<'a>>,
{
    let mut renderer = HtmlRenderer::new(config.clone());
    for run in runs {
        renderer.set_style(*run.style);
        renderer.write_text(run.text);
    }
    renderer.close();
    renderer.take().to_vec()
}

/// Escape `&`, `<` and `>`. All other bytes are copied unchanged.
pub fn escape_html(text: &[u8]) -> Cow<'_, [u8]> {
    if !text.iter().any(|byte| matches!(byte, b'&' | b'<' | b'>')) {
        return Cow::Borrowed(text);
    }
    let mut escaped = BytesMut::with_capacity(text.len() + 16);
    write_escaped(&mut escaped, text);
    Cow::Owned(escaped.to_vec())
}

fn write_escaped(output: &mut BytesMut, text: &[u8]) {
    let mut start = 0;
    for (index, byte) in text.iter().enumerate() {
        let entity: &[u8] = match byte {
            b'&' => b"&amp;",
            b'<' => b"&lt;",
            b'>' => b"&gt;",
            _ => continue,
        };
        output.extend_from_slice(&text[start..index]);
        output.extend_from_slice(entity);
        start = index + 1;
    }
    output.extend_from_slice(&text[start..]);
}

/// Attribute values additionally escape `"`.
fn escape_attribute(value: &[u8]) -> Cow<'_, [u8]> {
    if !value.contains(&b'"') {
        return escape_html(value);
    }
    let mut escaped = Vec::with_capacity(value.len() + 16);
    for (index, part) in value.split(|byte| *byte == b'"').enumerate() {
        if index > 0 {
            escaped.extend_from_slice(b"&quot;");
        }
        escaped.extend_from_slice(&escape_html(part));
    }
    Cow::Owned(escaped)
}

fn push_declaration(css: &mut String, property: &str, value: &str) {
    css.push_str(property);
    css.push(':');
    css.push_str(value);
    css.push(';');
}

/// Inline CSS for every attribute that has a CSS rendition.
fn inline_css(style: &StyleState) -> String {
    let mut css = String::new();
    match style.intensity {
        Intensity::Bold => push_declaration(&mut css, "font-weight", "bold"),
        Intensity::Faint => push_declaration(&mut css, "font-weight", "lighter"),
        Intensity::Normal => {}
    }
    if style.font_style == FontStyle::Italic {
        push_declaration(&mut css, "font-style", "italic");
    }

    let lines: Vec<&str> = [
        (style.underline == Underline::Single, "underline"),
        (style.strikethrough, "line-through"),
        (style.overline, "overline"),
    ]
    .into_iter()
    .filter_map(|(enabled, line)| enabled.then_some(line))
    .collect();
    if !lines.is_empty() {
        push_declaration(&mut css, "text-decoration-line", &lines.join(" "));
    }

    if style.inverted {
        push_declaration(&mut css, "filter", "invert(100%)");
    }
    if style.hidden {
        push_declaration(&mut css, "opacity", "0");
    }
    match style.script {
        Script::Superscript => push_declaration(&mut css, "vertical-align", "super"),
        Script::Subscript => push_declaration(&mut css, "vertical-align", "sub"),
        Script::Baseline => {}
    }
    push_colors(&mut css, style, false);
    css
}

/// Color declarations. With `skip_classed`, colors that have a class name are left out.
fn push_colors(css: &mut String, style: &StyleState, skip_classed: bool) {
    for (property, color) in color_slots(style, "color", "background-color", "text-decoration-color")
    {
        if skip_classed && color.class_name().is_some() {
            continue;
        }
        if let Some(value) = color.css_value() {
            push_declaration(css, property, &value);
        }
    }
}

fn color_slots<'a>(
    style: &StyleState,
    foreground: &'a str,
    background: &'a str,
    underline: &'a str,
) -> [(&'a str, Color); 3] {
    [
        (foreground, style.foreground),
        (background, style.background),
        (underline, style.underline_color),
    ]
}

/// Space separated class tokens, each prefixed with `prefix`.
fn class_list(style: &StyleState, prefix: &str) -> String {
    let mut tokens: Vec<Cow<'static, str>> = Vec::new();
    match style.intensity {
        Intensity::Bold => tokens.push("bold".into()),
        Intensity::Faint => tokens.push("faint".into()),
        Intensity::Normal => {}
    }
    match style.font_style {
        FontStyle::Italic => tokens.push("italic".into()),
        FontStyle::Fraktur => tokens.push("fraktur".into()),
        FontStyle::Normal => {}
    }
    match style.underline {
        Underline::Single => tokens.push("underline".into()),
        Underline::Double => tokens.push("double-underline".into()),
        Underline::Disabled => {}
    }
    if style.strikethrough {
        tokens.push("strikethrough".into());
    }
    if style.overline {
        tokens.push("overline".into());
    }
    match style.blink {
        Blink::Slow => tokens.push("slow-blink".into()),
        Blink::Rapid => tokens.push("fast-blink".into()),
        Blink::Off => {}
    }
    if style.inverted {
        tokens.push("invert".into());
    }
    if style.hidden {
        tokens.push("hide".into());
    }
    if let Font::Alternate(font) = style.font {
        tokens.push(format!("font-{font}").into());
    }
    match style.script {
        Script::Superscript => tokens.push("superscript".into()),
        Script::Subscript => tokens.push("subscript".into()),
        Script::Baseline => {}
    }
    for (kind, color) in color_slots(style, "fg", "bg", "ul") {
        if let Some(name) = color.class_name() {
            tokens.push(format!("{kind}-{name}").into());
        }
    }

    let mut classes = String::new();
    for token in tokens {
        if !classes.is_empty() {
            classes.push(' ');
        }
        classes.push_str(prefix);
        classes.push_str(&token);
    }
    classes
}
