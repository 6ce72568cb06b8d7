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

//! Byte classes and limits shared by the scanner and the converters.
//!
//! The ranges follow ECMA-48 and are the single source of truth for the
//! escape-intermediate, CSI and OSC states of [`AnsiParser`](crate::AnsiParser).

use std::ops::RangeInclusive;

/// Escape (ESC, 0x1B).
pub const ESC: u8 = 0x1B;

/// Bell (BEL, 0x07). Terminates an OSC string.
pub const BEL: u8 = 0x07;

/// Second byte of the 7-bit String Terminator (`ESC \`).
pub const ST_FINAL: u8 = b'\\';

/// Second byte of the 7-bit Control Sequence Introducer (`ESC [`).
pub const CSI_INTRODUCER: u8 = b'[';

/// Second byte of the 7-bit Operating System Command introducer (`ESC ]`).
pub const OSC_INTRODUCER: u8 = b']';

/// UTF-8 lead byte shared by every code point in U+0080..=U+00BF.
pub const C1_LEAD: u8 = 0xC2;

/// Second UTF-8 byte of the C1 controls U+0080..=U+009F.
pub const C1_CONTROLS: RangeInclusive<u8> = 0x80..=0x9F;

/// Offset between a C1 control and the 7-bit `ESC Fe` byte it stands for.
pub const C1_OFFSET: u8 = 0x40;

/// Intermediate bytes (space through `/`).
pub const INTERMEDIATE_BYTES: RangeInclusive<u8> = 0x20..=0x2F;

/// Parameter bytes (`0` through `?`).
pub const PARAMETER_BYTES: RangeInclusive<u8> = 0x30..=0x3F;

/// Final bytes of a control sequence (`@` through `~`).
pub const FINAL_BYTES: RangeInclusive<u8> = 0x40..=0x7E;

/// Final bytes of a plain escape sequence (`0` through `~`).
pub const ESCAPE_FINAL_BYTES: RangeInclusive<u8> = 0x30..=0x7E;

/// Default size of the read buffer used by [`Scanner::scan`](crate::Scanner::scan).
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Suggested cap for [`AnsiParser::with_max_sequence_length`](crate::AnsiParser::with_max_sequence_length).
///
/// Parsers built with [`AnsiParser::new`](crate::AnsiParser::new) are uncapped. With a
/// cap, sequences exceeding it are consumed up to their terminator and discarded.
pub const MAX_SEQUENCE_LENGTH: usize = 4096;

/// Returns `true` for bytes in the intermediate range.
#[inline]
pub fn is_intermediate(byte: u8) -> bool {
    INTERMEDIATE_BYTES.contains(&byte)
}

/// Returns `true` for bytes in the parameter range.
#[inline]
pub fn is_parameter(byte: u8) -> bool {
    PARAMETER_BYTES.contains(&byte)
}

/// Returns `true` for bytes that terminate a control sequence.
#[inline]
pub fn is_final(byte: u8) -> bool {
    FINAL_BYTES.contains(&byte)
}

/// Returns `true` for bytes that terminate a plain escape sequence.
#[inline]
pub fn is_escape_final(byte: u8) -> bool {
    ESCAPE_FINAL_BYTES.contains(&byte)
}

/// Returns `true` for UTF-8 continuation bytes (`10xxxxxx`).
#[inline]
pub fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Number of bytes in the UTF-8 sequence introduced by `lead`, or `1` when
/// `lead` cannot start a multi-byte sequence.
#[inline]
pub fn utf8_width(lead: u8) -> usize {
    match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}
