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

use crate::consts::ESC;
use crate::parser::{AnsiParser, EscapeEvent, Perform};
use std::borrow::Cow;
use std::convert::Infallible;

/// Removes ANSI escape sequences from a string.
///
/// Every sequence the scanner recognizes is removed: plain escapes, CSI and OSC,
/// in both their 7-bit (`ESC [`) and C1 (`U+009B`) forms. Malformed sequences are
/// dropped the same way the HTML converters drop them.
///
/// If the input contains no introducer at all, the input is returned borrowed.
///
/// # Examples
///
/// ```
/// use std::borrow::Cow;
/// use ansihtml::strip_ansi_codes;
///
/// assert_eq!(strip_ansi_codes("\x1b[1;31mRed Text\x1b[0m"), "Red Text");
/// assert_eq!(strip_ansi_codes("\x1b]0;title\x07Shell"), "Shell");
/// assert!(matches!(strip_ansi_codes("Plain Text"), Cow::Borrowed(_)));
/// ```
pub fn strip_ansi_codes(str: &str) -> Cow<'_, str> {
    let has_introducer = str
        .chars()
        .any(|ch| ch == char::from(ESC) || ('\u{80}'..='\u{9f}').contains(&ch));
    if !has_introducer {
        return Cow::Borrowed(str);
    }

    let mut parser = AnsiParser::new();
    let mut text = TextOnly(Vec::with_capacity(str.len()));
    let Ok(()) = parser.advance(str.as_bytes(), &mut text);
    let Ok(()) = parser.finish(&mut text);
    // A malformed sequence may swallow the lead byte of a character.
    Cow::Owned(String::from_utf8_lossy(&text.0).into_owned())
}

struct TextOnly(Vec<u8>);

impl Perform for TextOnly {
    type Error = Infallible;

    fn print(&mut self, text: &[u8]) -> Result<(), Self::Error> {
        self.0.extend_from_slice(text);
        Ok(())
    }

    fn dispatch(&mut self, _event: &EscapeEvent<'_>) {}
}
