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

use crate::config::HtmlConfig;
use crate::html::HtmlRenderer;
use crate::parser::AnsiParser;
use crate::result::{AnsiError, AnsiResult};
use crate::scanner::read_chunk;
use std::io::{Read, Write};
use tracing::{debug, instrument, trace};

/// Convert `input` to HTML with inline `style` attributes.
///
/// # Examples
///
/// ```
/// let html = ansihtml::convert(b"\x1b[33mYellow\x1b[m");
/// assert_eq!(html, br#"<span style="color:olive;">Yellow</span>"#);
/// ```
pub fn convert(input: &[u8]) -> Vec<u8> {
    convert_with_config(input, &HtmlConfig::inline())
}

/// Convert `input` to HTML with semantic class names prefixed by `class_prefix`.
///
/// Colors without a class name are inlined unless `no_styles` is set, in which
/// case they are dropped.
pub fn convert_with_classes(input: &[u8], class_prefix: &str, no_styles: bool) -> Vec<u8> {
    convert_with_config(input, &HtmlConfig::with_classes(class_prefix, no_styles))
}

/// Convert `input` to HTML according to `config`.
pub fn convert_with_config(input: &[u8], config: &HtmlConfig) -> Vec<u8> {
    let mut parser = AnsiParser::new();
    let mut renderer = HtmlRenderer::new(config.clone());
    let Ok(()) = parser.advance(input, &mut renderer);
    let Ok(()) = parser.finish(&mut renderer);
    renderer.close();
    renderer.take().to_vec()
}

/// Streaming ANSI to HTML conversion from a reader into a writer.
///
/// Input is read [`HtmlConfig::buffer_size`] bytes at a time and the HTML for
/// each chunk is written before the next read, so memory use does not grow
/// with the input.
///
/// ```no_run
/// use ansihtml::{HtmlConfig, HtmlConverter};
/// use std::io;
///
/// let converter = HtmlConverter::new(io::stdin().lock(), io::stdout().lock(), HtmlConfig::default());
/// converter.run()?;
/// # Ok::<(), ansihtml::AnsiError>(())
/// ```
#[derive(Debug)]
pub struct HtmlConverter<R, W> {
    reader: R,
    writer: W,
    parser: AnsiParser,
    renderer: HtmlRenderer,
}

impl<R: Read, W: Write> HtmlConverter<R, W> {
    pub fn new(reader: R, writer: W, config: HtmlConfig) -> Self {
        Self {
            reader,
            writer,
            parser: AnsiParser::new(),
            renderer: HtmlRenderer::new(config),
        }
    }

    /// Convert everything up to end of input and return the writer.
    ///
    /// Any span still open at end of input is closed. On failure, HTML already
    /// written stays written.
    #[instrument(skip_all)]
    pub fn run(mut self) -> AnsiResult<W> {
        let buffer_size = self.renderer.config().buffer_size;
        debug!(buffer_size, "converting stream");
        if buffer_size == 0 {
            return Err(AnsiError::EmptyBuffer);
        }
        let mut buffer = vec![0u8; buffer_size];
        loop {
            let read = read_chunk(&mut self.reader, &mut buffer)?;
            if read == 0 {
                break;
            }
            let Ok(()) = self.parser.advance(&buffer[..read], &mut self.renderer);
            self.flush_rendered()?;
        }
        let Ok(()) = self.parser.finish(&mut self.renderer);
        self.renderer.close();
        self.flush_rendered()?;
        self.writer.flush().map_err(AnsiError::SinkWrite)?;
        Ok(self.writer)
    }

    fn flush_rendered(&mut self) -> AnsiResult<()> {
        let html = self.renderer.take();
        if html.is_empty() {
            return Ok(());
        }
        trace!(len = html.len(), "writing html");
        self.writer.write_all(&html).map_err(AnsiError::SinkWrite)
    }
}
