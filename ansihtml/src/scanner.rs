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

use crate::consts::DEFAULT_BUFFER_SIZE;
use crate::parser::{AnsiParser, EscapeEvent, Perform};
use crate::result::{AnsiError, AnsiResult};
use std::io::{self, ErrorKind, Read, Write};
use tracing::{debug, instrument};

/// Receives every escape sequence recognized by a [`Scanner`].
pub trait EscapeHandler {
    fn handle(&mut self, event: &EscapeEvent<'_>);
}

impl<F> EscapeHandler for F
where
    F: FnMut(&EscapeEvent<'_>),
{
    fn handle(&mut self, event: &EscapeEvent<'_>) {
        self(event)
    }
}

/// An [`EscapeHandler`] that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct Discard;

impl EscapeHandler for Discard {
    fn handle(&mut self, _event: &EscapeEvent<'_>) {}
}

/// Pulls bytes from a reader, writes literal text to a writer and reports escape
/// sequences to a handler.
///
/// # Examples
///
/// ```
/// use ansihtml::{EscapeEvent, Scanner};
///
/// let mut finals = Vec::new();
/// let mut scanner = Scanner::new(&b"a\x1b[1mb"[..], Vec::new());
/// scanner
///     .scan(|event: &EscapeEvent<'_>| finals.push(event.final_byte))
///     .unwrap();
/// assert_eq!(scanner.into_inner().1, b"ab");
/// assert_eq!(finals, b"m");
/// ```
#[derive(Debug)]
pub struct Scanner<R, W> {
    reader: R,
    writer: W,
    parser: AnsiParser,
}

impl<R: Read, W: Write> Scanner<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_parser(reader, writer, AnsiParser::new())
    }

    /// Creates a scanner around a preconfigured parser.
    pub fn with_parser(reader: R, writer: W, parser: AnsiParser) -> Self {
        Self {
            reader,
            writer,
            parser,
        }
    }

    /// Scan to end of input with a [`DEFAULT_BUFFER_SIZE`] read buffer.
    pub fn scan<H: EscapeHandler>(&mut self, handler: H) -> AnsiResult<()> {
        let mut buffer = vec![0u8; DEFAULT_BUFFER_SIZE];
        self.scan_with_buffer(&mut buffer, handler)
    }

    /// Scan to end of input, reading through `buffer`.
    ///
    /// The buffer size only bounds how much is read at a time; the events and text
    /// produced are the same for any size. Fails with [`AnsiError::EmptyBuffer`]
    /// before reading anything when `buffer` is empty, and stops at the first read
    /// or write failure. Text written before a failure stays written.
    #[instrument(skip_all, fields(buffer_size = buffer.len()))]
    pub fn scan_with_buffer<H: EscapeHandler>(
        &mut self,
        buffer: &mut [u8],
        mut handler: H,
    ) -> AnsiResult<()> {
        if buffer.is_empty() {
            return Err(AnsiError::EmptyBuffer);
        }
        let mut dispatcher = Dispatcher {
            writer: &mut self.writer,
            handler: &mut handler,
        };
        loop {
            let read = read_chunk(&mut self.reader, buffer)?;
            if read == 0 {
                break;
            }
            self.parser
                .advance(&buffer[..read], &mut dispatcher)
                .map_err(AnsiError::SinkWrite)?;
        }
        self.parser
            .finish(&mut dispatcher)
            .map_err(AnsiError::SinkWrite)?;
        self.writer.flush().map_err(AnsiError::SinkWrite)
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consume the scanner, returning the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

/// Read the next chunk into `buffer`, retrying interrupted reads. `0` means end of input.
pub(crate) fn read_chunk<R: Read>(reader: &mut R, buffer: &mut [u8]) -> AnsiResult<usize> {
    loop {
        match reader.read(buffer) {
            Ok(read) => return Ok(read),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => {
                debug!(error = %err, "source read failed");
                return Err(AnsiError::SourceRead(err));
            }
        }
    }
}

/// Adapts a writer and a handler to [`Perform`].
struct Dispatcher<'a, W, H> {
    writer: &'a mut W,
    handler: &'a mut H,
}

impl<W: Write, H: EscapeHandler> Perform for Dispatcher<'_, W, H> {
    type Error = io::Error;

    fn print(&mut self, text: &[u8]) -> io::Result<()> {
        self.writer.write_all(text)
    }

    fn dispatch(&mut self, event: &EscapeEvent<'_>) {
        self.handler.handle(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SequenceKind;

    /// Reader that yields its data one byte per call, interrupting every other call.
    struct Trickle<'a> {
        data: &'a [u8],
        interrupt: bool,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            let Some((first, rest)) = self.data.split_first() else {
                return Ok(0);
            };
            buf[0] = *first;
            self.data = rest;
            Ok(1)
        }
    }

    #[test]
    fn test_scan_writes_literal_text() {
        let mut scanner = Scanner::new(&b"plain <text>"[..], Vec::new());
        scanner.scan(Discard).unwrap();
        assert_eq!(scanner.writer(), b"plain <text>");
    }

    #[test]
    fn test_scan_reports_events() {
        let mut kinds = Vec::new();
        let mut scanner = Scanner::new(&b"\x1bc\x1b[2J\x1b]0;t\x07x"[..], Vec::new());
        scanner
            .scan(|event: &EscapeEvent<'_>| kinds.push((event.kind, event.final_byte)))
            .unwrap();
        assert_eq!(scanner.writer(), b"x");
        assert_eq!(
            kinds,
            vec![
                (SequenceKind::Escape, b'c'),
                (SequenceKind::Csi, b'J'),
                (SequenceKind::Osc, b']'),
            ]
        );
    }

    #[test]
    fn test_empty_buffer_is_rejected() {
        let mut scanner = Scanner::new(&b"abc"[..], Vec::new());
        let err = scanner.scan_with_buffer(&mut [], Discard).unwrap_err();
        assert!(matches!(err, AnsiError::EmptyBuffer));
        assert_eq!(err.to_string(), "buffer must not be empty");
        assert!(scanner.writer().is_empty());
    }

    #[test]
    fn test_interrupted_reads_are_retried() {
        let reader = Trickle {
            data: "a\u{9b}1mb€".as_bytes(),
            interrupt: false,
        };
        let mut count = 0;
        let mut scanner = Scanner::new(reader, Vec::new());
        scanner
            .scan(|_: &EscapeEvent<'_>| count += 1)
            .unwrap();
        assert_eq!(scanner.writer(), "ab€".as_bytes());
        assert_eq!(count, 1);
    }

    #[test]
    fn test_custom_parser_limit() {
        let parser = AnsiParser::with_max_sequence_length(2);
        let mut scanner = Scanner::with_parser(&b"a\x1b[1;2;3mb"[..], Vec::new(), parser);
        let mut count = 0;
        scanner
            .scan(|_: &EscapeEvent<'_>| count += 1)
            .unwrap();
        assert_eq!(scanner.writer(), b"ab");
        assert_eq!(count, 0);
    }
}
