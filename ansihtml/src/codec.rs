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

use crate::{AnsiError, AnsiParser, AnsiResult, HtmlConfig, HtmlRenderer};
use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{instrument, trace};

/// Codec turning ANSI encoded bytes into HTML fragments.
///
/// As a [`Decoder`] it consumes everything buffered on each call and yields the
/// HTML for it. Parser state and the open span carry over between frames, so the
/// concatenated frames equal [`convert_with_config`](crate::convert_with_config)
/// over the whole stream. The span is closed by `decode_eof`.
///
/// As an [`Encoder`] it appends the HTML for each chunk of ANSI input to the
/// destination; call [`finish`](AnsiHtmlCodec::finish) once the input ends.
#[derive(Clone, Debug, Default)]
pub struct AnsiHtmlCodec {
    parser: AnsiParser,
    renderer: HtmlRenderer,
}

impl AnsiHtmlCodec {
    /// Creates a new codec with the given configuration.
    pub fn new(config: HtmlConfig) -> Self {
        Self {
            parser: AnsiParser::new(),
            renderer: HtmlRenderer::new(config),
        }
    }

    /// Get a reference to the HTML renderer
    pub fn renderer(&self) -> &HtmlRenderer {
        &self.renderer
    }

    /// Flush any partial character and close the open span into `dst`.
    pub fn finish(&mut self, dst: &mut BytesMut) {
        let Ok(()) = self.parser.finish(&mut self.renderer);
        self.renderer.close();
        dst.extend_from_slice(&self.renderer.take());
    }

    fn feed(&mut self, bytes: &[u8]) -> Bytes {
        let Ok(()) = self.parser.advance(bytes, &mut self.renderer);
        self.renderer.take()
    }
}

impl Decoder for AnsiHtmlCodec {
    type Item = Bytes;
    type Error = AnsiError;

    #[instrument(skip_all)]
    fn decode(&mut self, src: &mut BytesMut) -> AnsiResult<Option<Self::Item>> {
        if src.is_empty() {
            return Ok(None);
        }
        let input = src.split();
        let html = self.feed(&input);
        trace!(input = input.len(), output = html.len(), "decoded html fragment");
        Ok((!html.is_empty()).then_some(html))
    }

    #[instrument(skip_all)]
    fn decode_eof(&mut self, src: &mut BytesMut) -> AnsiResult<Option<Self::Item>> {
        let mut html = BytesMut::new();
        if let Some(fragment) = self.decode(src)? {
            html.extend_from_slice(&fragment);
        }
        self.finish(&mut html);
        Ok((!html.is_empty()).then(|| html.freeze()))
    }
}

impl Encoder<&[u8]> for AnsiHtmlCodec {
    type Error = AnsiError;

    fn encode(&mut self, item: &[u8], dst: &mut BytesMut) -> AnsiResult<()> {
        let html = self.feed(item);
        dst.extend_from_slice(&html);
        Ok(())
    }
}

impl Encoder<&str> for AnsiHtmlCodec {
    type Error = AnsiError;

    fn encode(&mut self, item: &str, dst: &mut BytesMut) -> AnsiResult<()> {
        Encoder::<&[u8]>::encode(self, item.as_bytes(), dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_consumes_buffer() {
        let mut codec = AnsiHtmlCodec::default();
        let mut src = BytesMut::from(&b"\x1b[1mbold"[..]);
        let html = codec.decode(&mut src).unwrap().unwrap();
        assert!(src.is_empty());
        assert_eq!(&html[..], b"<span style=\"font-weight:bold;\">bold");
    }

    #[test]
    fn test_decode_without_text_yields_nothing() {
        let mut codec = AnsiHtmlCodec::default();
        let mut src = BytesMut::from(&b"\x1b[31m\x1b[4"[..]);
        assert!(codec.decode(&mut src).unwrap().is_none());
        assert!(codec.decode(&mut src).unwrap().is_none());
    }

    #[test]
    fn test_decode_eof_closes_span() {
        let mut codec = AnsiHtmlCodec::default();
        let mut src = BytesMut::from(&b"\x1b[31mred"[..]);
        let first = codec.decode(&mut src).unwrap().unwrap();
        let last = codec.decode_eof(&mut src).unwrap().unwrap();
        assert_eq!(&first[..], b"<span style=\"color:maroon;\">red");
        assert_eq!(&last[..], b"</span>");
        assert!(codec.decode_eof(&mut src).unwrap().is_none());
    }

    #[test]
    fn test_encode_appends_html() {
        let mut codec = AnsiHtmlCodec::new(HtmlConfig::with_classes("c-", false));
        let mut dst = BytesMut::new();
        codec.encode("\x1b[32mgo", &mut dst).unwrap();
        codec.encode(&b"od\x1b[m!"[..], &mut dst).unwrap();
        codec.finish(&mut dst);
        assert_eq!(&dst[..], b"<span class=\"c-fg-green\">good</span>!");
    }
}
