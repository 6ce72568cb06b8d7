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

//! Convert ANSI/VT terminal output into HTML.
//!
//! Bytes flow through three stages in a single pass:
//!
//! 1. [`AnsiParser`] separates literal text from escape sequences, holding any
//!    partial sequence or character across reads.
//! 2. SGR sequences (`CSI … m`) update a running [`StyleState`].
//! 3. [`HtmlRenderer`] escapes the text and wraps it in `<span>` elements,
//!    coalescing neighbouring text with the same style.
//!
//! Every other sequence is recognized and dropped.
//!
//! ```
//! let html = ansihtml::convert(b"\x1b[1;31mfail\x1b[0m ok");
//! assert_eq!(
//!     html,
//!     br#"<span style="font-weight:bold;color:maroon;">fail</span> ok"#
//! );
//!
//! let html = ansihtml::convert_with_classes(b"\x1b[33mYellow", "p-", false);
//! assert_eq!(html, br#"<span class="p-fg-yellow">Yellow</span>"#);
//! ```

mod codec;
mod config;
mod consts;
mod convert;
mod html;
pub mod palette;
mod parser;
mod result;
mod scanner;
mod style;
pub mod utility;

pub use self::codec::AnsiHtmlCodec;
pub use self::config::{HtmlConfig, StyleMode};
pub use self::consts::{DEFAULT_BUFFER_SIZE, MAX_SEQUENCE_LENGTH};
pub use self::convert::{HtmlConverter, convert, convert_with_classes, convert_with_config};
pub use self::html::{HtmlRenderer, TextRun, escape_html, render};
pub use self::parser::{AnsiParser, EscapeEvent, Perform, SequenceKind};
pub use self::result::{AnsiError, AnsiResult};
pub use self::scanner::{Discard, EscapeHandler, Scanner};
pub use self::style::{
    Blink, Color, Font, FontStyle, Intensity, Script, StyleState, Underline, apply_sgr,
};
pub use self::utility::strip_ansi_codes;
