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

use crate::consts::{
    BEL, C1_CONTROLS, C1_LEAD, C1_OFFSET, CSI_INTRODUCER, ESC, OSC_INTRODUCER, ST_FINAL,
    is_continuation, is_escape_final, is_final, is_intermediate, is_parameter, utf8_width,
};
use tracing::{debug, trace};

/// The family an [`EscapeEvent`] belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    /// `ESC` followed by optional intermediates and a final byte (e.g. `ESC c`, `ESC ( B`).
    Escape,
    /// Control Sequence Introducer: `ESC [ <params> <intermediates> <final>`.
    Csi,
    /// Operating System Command: `ESC ] <data> BEL` or `ESC ] <data> ESC \`.
    Osc,
}

/// A recognized control sequence.
///
/// The slices borrow the parser's internal buffers and are only valid for the
/// duration of the [`Perform::dispatch`] call.
///
/// | Kind                   | `final_byte`           | `intermediates` | `parameters`                  |
/// |------------------------|------------------------|-----------------|-------------------------------|
/// | [`SequenceKind::Escape`] | the final byte       | 0x20–0x2F bytes | empty                         |
/// | [`SequenceKind::Csi`]    | the final byte       | 0x20–0x2F bytes | 0x30–0x3F bytes               |
/// | [`SequenceKind::Osc`]    | `]`                  | empty           | data including the terminator |
///
/// A CSI's final byte is never part of `parameters`: `ESC [ 0 ; 3 3 m` yields
/// `final_byte = b'm'` and `parameters = b"0;33"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EscapeEvent<'a> {
    /// Which sequence family produced the event
    pub kind: SequenceKind,
    /// Byte that completed the sequence
    pub final_byte: u8,
    /// Intermediate bytes in the order they appeared
    pub intermediates: &'a [u8],
    /// Parameter bytes in the order they appeared
    pub parameters: &'a [u8],
}

impl EscapeEvent<'_> {
    /// Whether this is a Select Graphic Rendition sequence (`CSI <digits and ;> m`).
    ///
    /// Private-marker forms such as `CSI ? 1 m` and sequences with intermediates
    /// are not SGR.
    pub fn is_sgr(&self) -> bool {
        self.kind == SequenceKind::Csi
            && self.final_byte == b'm'
            && self.intermediates.is_empty()
            && self
                .parameters
                .iter()
                .all(|byte| byte.is_ascii_digit() || *byte == b';')
    }
}

/// Receiver for the output of an [`AnsiParser`].
///
/// Literal text and recognized sequences arrive strictly in input order.
pub trait Perform {
    /// Error produced while consuming literal text.
    type Error;

    /// Literal bytes that are not part of any escape sequence.
    ///
    /// Multi-byte UTF-8 characters are never split across calls.
    fn print(&mut self, text: &[u8]) -> Result<(), Self::Error>;

    /// A complete, well-formed escape sequence.
    fn dispatch(&mut self, event: &EscapeEvent<'_>);
}

/// Leading bytes of a UTF-8 character whose tail has not been fed yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct PartialChar {
    bytes: [u8; 4],
    len: usize,
    width: usize,
}

impl PartialChar {
    fn new(head: &[u8]) -> PartialChar {
        let mut partial = PartialChar {
            width: utf8_width(head[0]),
            ..Default::default()
        };
        for byte in head {
            partial.push(*byte);
        }
        partial
    }

    fn push(&mut self, byte: u8) {
        self.bytes[self.len] = byte;
        self.len += 1;
    }

    fn is_complete(&self) -> bool {
        self.len == self.width
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The second byte of a UTF-8 encoded C1 control, if that is what this is.
    fn c1_control(&self) -> Option<u8> {
        match self.as_bytes() {
            [C1_LEAD, control] if C1_CONTROLS.contains(control) => Some(*control),
            _ => None,
        }
    }
}

/// Internal state machine states for the escape sequence scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    /// Literal text. ESC or a UTF-8 encoded C1 control leaves this state.
    Ground,

    /// A UTF-8 character was cut off by the end of the fed chunk.
    ///
    /// It is completed from the next chunk before being classified, so a C1
    /// introducer split across a refill is still recognized.
    Utf8(PartialChar),

    /// After ESC (or the 7-bit translation of a C1 control).
    Escape,

    /// After ESC and one or more intermediate bytes.
    EscapeIntermediate,

    /// Inside a control sequence, collecting parameter bytes.
    Csi,

    /// Inside a control sequence, after the first intermediate byte.
    CsiIntermediate,

    /// An overlong control sequence is being skipped up to its final byte.
    CsiIgnore,

    /// Inside an OSC string. `escaped` is set when the last byte was ESC.
    Osc { escaped: bool },

    /// An overlong OSC string is being skipped up to its terminator.
    OscIgnore { escaped: bool },
}

/// A resumable ECMA-48 escape sequence scanner.
///
/// `AnsiParser` separates literal text from control sequences in a byte stream
/// that may arrive in arbitrarily small pieces. All in-progress state (the
/// current state, accumulated intermediate and parameter bytes, and any partial
/// UTF-8 lead-in) lives in the parser, so feeding the same bytes through any
/// chunking yields identical output.
///
/// Malformed sequences are dropped silently along with the byte that made them
/// invalid, and scanning resumes in the ground state.
///
/// # Examples
///
/// ```
/// use ansihtml::{AnsiParser, EscapeEvent, Perform};
///
/// #[derive(Default)]
/// struct Collect(Vec<u8>, Vec<u8>);
///
/// impl Perform for Collect {
///     type Error = std::convert::Infallible;
///
///     fn print(&mut self, text: &[u8]) -> Result<(), Self::Error> {
///         self.0.extend_from_slice(text);
///         Ok(())
///     }
///     fn dispatch(&mut self, event: &EscapeEvent<'_>) {
///         self.1.push(event.final_byte);
///     }
/// }
///
/// let mut parser = AnsiParser::new();
/// let mut collect = Collect::default();
/// let Ok(()) = parser.advance(b"a\x1b[3", &mut collect);
/// let Ok(()) = parser.advance(b"1mb", &mut collect);
/// assert_eq!(collect.0, b"ab");
/// assert_eq!(collect.1, b"m");
/// ```
#[derive(Clone, Debug)]
pub struct AnsiParser {
    state: State,
    intermediates: Vec<u8>,
    parameters: Vec<u8>,
    max_sequence_length: usize,
}

impl AnsiParser {
    /// Creates a parser in the ground state.
    ///
    /// Sequences of any length are dispatched.
    pub fn new() -> Self {
        Self::with_max_sequence_length(usize::MAX)
    }

    /// Creates a parser that discards sequences longer than `max_sequence_length` bytes.
    ///
    /// Use [`MAX_SEQUENCE_LENGTH`](crate::MAX_SEQUENCE_LENGTH) to bound memory on
    /// untrusted input.
    pub fn with_max_sequence_length(max_sequence_length: usize) -> Self {
        Self {
            state: State::Ground,
            intermediates: Vec::new(),
            parameters: Vec::new(),
            max_sequence_length,
        }
    }

    /// Discards any partially scanned sequence or character and returns to the ground state.
    pub fn clear(&mut self) {
        self.intermediates.clear();
        self.parameters.clear();
        self.state = State::Ground;
    }

    /// Whether the parser is in the middle of a sequence or a split character.
    pub fn is_pending(&self) -> bool {
        self.state != State::Ground
    }

    /// Feed a chunk of input.
    ///
    /// Literal runs are handed to [`Perform::print`] as soon as they are known not to
    /// belong to a sequence. The only error is one returned by `print`, which stops
    /// processing of the chunk immediately.
    pub fn advance<P: Perform>(&mut self, bytes: &[u8], performer: &mut P) -> Result<(), P::Error> {
        let mut offset = 0;
        while offset < bytes.len() {
            let byte = bytes[offset];
            offset += match self.state {
                State::Ground => self.process_ground(&bytes[offset..], performer)?,
                State::Utf8(partial) => self.process_utf8(partial, byte, performer)?,
                State::Escape => {
                    self.process_escape(byte, performer);
                    1
                }
                State::EscapeIntermediate => {
                    self.process_escape_intermediate(byte, performer);
                    1
                }
                State::Csi => {
                    self.process_csi(byte, performer);
                    1
                }
                State::CsiIntermediate => {
                    self.process_csi_intermediate(byte, performer);
                    1
                }
                State::CsiIgnore => {
                    self.process_csi_ignore(byte);
                    1
                }
                State::Osc { escaped } => {
                    self.process_osc(byte, escaped, performer);
                    1
                }
                State::OscIgnore { escaped } => {
                    self.process_osc_ignore(byte, escaped);
                    1
                }
            };
        }
        Ok(())
    }

    /// Signal end of input.
    ///
    /// A character still waiting for its continuation bytes is printed as-is; an
    /// unterminated escape sequence is discarded.
    pub fn finish<P: Perform>(&mut self, performer: &mut P) -> Result<(), P::Error> {
        let state = std::mem::replace(&mut self.state, State::Ground);
        self.intermediates.clear();
        self.parameters.clear();
        match state {
            State::Ground => Ok(()),
            State::Utf8(partial) => performer.print(partial.as_bytes()),
            state => {
                debug!(?state, "discarding unterminated escape sequence");
                Ok(())
            }
        }
    }

    fn process_ground<P: Perform>(
        &mut self,
        bytes: &[u8],
        performer: &mut P,
    ) -> Result<usize, P::Error> {
        let run = literal_run_len(bytes);
        if run > 0 {
            performer.print(&bytes[..run])?;
        }
        match &bytes[run..] {
            [] => Ok(run),
            [ESC, ..] => {
                self.begin(State::Escape);
                Ok(run + 1)
            }
            [C1_LEAD, control, ..] if C1_CONTROLS.contains(control) => {
                self.begin_c1(*control, performer);
                Ok(run + 2)
            }
            tail => {
                // Only an incomplete character stops a literal run at the end of a chunk.
                self.state = State::Utf8(PartialChar::new(tail));
                Ok(bytes.len())
            }
        }
    }

    fn process_utf8<P: Perform>(
        &mut self,
        mut partial: PartialChar,
        byte: u8,
        performer: &mut P,
    ) -> Result<usize, P::Error> {
        self.state = State::Ground;
        if !is_continuation(byte) {
            // Not a valid character after all; pass the head through and rescan `byte`.
            performer.print(partial.as_bytes())?;
            return Ok(0);
        }

        partial.push(byte);
        if !partial.is_complete() {
            self.state = State::Utf8(partial);
        } else if let Some(control) = partial.c1_control() {
            self.begin_c1(control, performer);
        } else {
            performer.print(partial.as_bytes())?;
        }
        Ok(1)
    }

    fn process_escape<P: Perform>(&mut self, byte: u8, performer: &mut P) {
        match byte {
            CSI_INTRODUCER => self.state = State::Csi,
            OSC_INTRODUCER => self.state = State::Osc { escaped: false },
            byte if is_intermediate(byte) => {
                self.collect_intermediate(byte, State::EscapeIntermediate, State::Ground)
            }
            byte if is_escape_final(byte) => self.dispatch(SequenceKind::Escape, byte, performer),
            byte => self.abort(byte),
        }
    }

    fn process_escape_intermediate<P: Perform>(&mut self, byte: u8, performer: &mut P) {
        match byte {
            byte if is_intermediate(byte) => {
                self.collect_intermediate(byte, State::EscapeIntermediate, State::Ground)
            }
            byte if is_escape_final(byte) => self.dispatch(SequenceKind::Escape, byte, performer),
            byte => self.abort(byte),
        }
    }

    fn process_csi<P: Perform>(&mut self, byte: u8, performer: &mut P) {
        match byte {
            byte if is_parameter(byte) => {
                self.collect_parameter(byte, State::Csi, State::CsiIgnore)
            }
            byte if is_intermediate(byte) => {
                self.collect_intermediate(byte, State::CsiIntermediate, State::CsiIgnore)
            }
            byte if is_final(byte) => self.dispatch(SequenceKind::Csi, byte, performer),
            byte => self.abort(byte),
        }
    }

    fn process_csi_intermediate<P: Perform>(&mut self, byte: u8, performer: &mut P) {
        match byte {
            byte if is_intermediate(byte) => {
                self.collect_intermediate(byte, State::CsiIntermediate, State::CsiIgnore)
            }
            byte if is_final(byte) => self.dispatch(SequenceKind::Csi, byte, performer),
            // Parameter bytes may not follow intermediates.
            byte => self.abort(byte),
        }
    }

    fn process_csi_ignore(&mut self, byte: u8) {
        if is_final(byte) {
            self.state = State::Ground;
        } else if !is_parameter(byte) && !is_intermediate(byte) {
            self.abort(byte);
        }
    }

    fn process_osc<P: Perform>(&mut self, byte: u8, escaped: bool, performer: &mut P) {
        if byte == BEL || (escaped && byte == ST_FINAL) {
            self.parameters.push(byte);
            self.dispatch(SequenceKind::Osc, OSC_INTRODUCER, performer);
        } else {
            let escaped = byte == ESC;
            self.collect_parameter(byte, State::Osc { escaped }, State::OscIgnore { escaped });
        }
    }

    fn process_osc_ignore(&mut self, byte: u8, escaped: bool) {
        if byte == BEL || (escaped && byte == ST_FINAL) {
            self.state = State::Ground;
        } else {
            self.state = State::OscIgnore {
                escaped: byte == ESC,
            };
        }
    }

    fn begin(&mut self, state: State) {
        self.intermediates.clear();
        self.parameters.clear();
        self.state = state;
    }

    /// Treat a UTF-8 encoded C1 control as `ESC` followed by its 7-bit equivalent.
    fn begin_c1<P: Perform>(&mut self, control: u8, performer: &mut P) {
        self.begin(State::Escape);
        self.process_escape(control - C1_OFFSET, performer);
    }

    fn sequence_len(&self) -> usize {
        self.intermediates.len() + self.parameters.len()
    }

    fn collect_intermediate(&mut self, byte: u8, next: State, overflow: State) {
        if self.sequence_len() >= self.max_sequence_length {
            self.overflow(overflow);
        } else {
            self.intermediates.push(byte);
            self.state = next;
        }
    }

    fn collect_parameter(&mut self, byte: u8, next: State, overflow: State) {
        if self.sequence_len() >= self.max_sequence_length {
            self.overflow(overflow);
        } else {
            self.parameters.push(byte);
            self.state = next;
        }
    }

    fn overflow(&mut self, state: State) {
        debug!(
            length = self.sequence_len(),
            max = self.max_sequence_length,
            "discarding overlong escape sequence"
        );
        self.begin(state);
    }

    fn abort(&mut self, byte: u8) {
        debug!(byte, state = ?self.state, "aborting malformed escape sequence");
        self.begin(State::Ground);
    }

    fn dispatch<P: Perform>(&mut self, kind: SequenceKind, final_byte: u8, performer: &mut P) {
        let event = EscapeEvent {
            kind,
            final_byte,
            intermediates: &self.intermediates,
            parameters: &self.parameters,
        };
        trace!(?kind, final_byte = %char::from(final_byte), "escape sequence dispatched");
        performer.dispatch(&event);
        self.begin(State::Ground);
    }
}

impl Default for AnsiParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Length of the literal prefix of `bytes`.
///
/// The run stops before ESC, before a UTF-8 encoded C1 control, and before a
/// character that is cut off by the end of `bytes`.
fn literal_run_len(bytes: &[u8]) -> usize {
    let mut index = 0;
    while index < bytes.len() {
        let byte = bytes[index];
        if byte == ESC {
            break;
        }
        let width = utf8_width(byte);
        if width > 1 {
            let end = index + width;
            let tail = &bytes[index + 1..end.min(bytes.len())];
            if tail.iter().all(|b| is_continuation(*b)) {
                if end > bytes.len() {
                    break;
                }
                if byte == C1_LEAD && C1_CONTROLS.contains(&bytes[index + 1]) {
                    break;
                }
                index = end;
                continue;
            }
        }
        index += 1;
    }
    index
}
