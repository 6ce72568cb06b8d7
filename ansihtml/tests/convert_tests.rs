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

//! End to end conversion tests

use ansihtml::{
    HtmlConfig, HtmlConverter, StyleState, TextRun, convert, convert_with_classes,
    convert_with_config, render,
};
use proptest::prelude::*;

const EVERY_STYLE: &[u8] = b"\x1b[1;3;4;5;7;8;9;11;26;38;5;255;51;53;58;2;0;255;0mMany styles\
\x1b[2;20;21;6;12;38;2;233;277;255mA few more styles";

const EVERY_CLASS: &[u8] = b"\x1b[1;3;4;5;7;8;9;11;26;38;5;255;51;53;58;2;0;255;mMany classes\
\x1b[2;20;21;6;12;38;2;233;277;255mA few more classes";

fn html(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_no_escapes() {
    assert_eq!(html(convert(b"test")), "test");
}

#[test]
fn test_html_escapes() {
    assert_eq!(html(convert(b"<test>")), "&lt;test&gt;");
    assert_eq!(html(convert(b"a & 'b' \"c\"")), "a &amp; 'b' \"c\"");
}

#[test]
fn test_simple_color_with_reset() {
    assert_eq!(
        html(convert(b"\x1b[33mYellow\x1b[m")),
        r#"<span style="color:olive;">Yellow</span>"#
    );
}

#[test]
fn test_simple_color_with_no_reset() {
    assert_eq!(
        html(convert(b"\x1b[33mYellow")),
        r#"<span style="color:olive;">Yellow</span>"#
    );
}

#[test]
fn test_simple_color_with_classnames() {
    assert_eq!(
        html(convert_with_classes(b"\x1b[33mYellow", "p-", false)),
        r#"<span class="p-fg-yellow">Yellow</span>"#
    );
}

#[test]
fn test_every_style() {
    assert_eq!(
        html(convert(EVERY_STYLE)),
        concat!(
            r#"<span style="font-weight:bold;font-style:italic;text-decoration-line:underline line-through overline;"#,
            r#"filter:invert(100%);opacity:0;color:rgb(238,238,238);text-decoration-color:rgb(0,255,0);">Many styles</span>"#,
            r#"<span style="font-weight:lighter;text-decoration-line:line-through overline;filter:invert(100%);opacity:0;"#,
            r#"color:rgb(233,255,255);text-decoration-color:rgb(0,255,0);">A few more styles</span>"#,
        )
    );
}

#[test]
fn test_every_class() {
    assert_eq!(
        html(convert_with_classes(EVERY_CLASS, "", false)),
        concat!(
            r#"<span class="bold italic underline strikethrough overline slow-blink invert hide font-1" style=""#,
            r#"color:rgb(238,238,238);text-decoration-color:rgb(0,255,0);">Many classes</span><span class="faint fraktur "#,
            r#"double-underline strikethrough overline fast-blink invert hide font-2" style="color:rgb(233,255,255);"#,
            r#"text-decoration-color:rgb(0,255,0);">A few more classes</span>"#,
        )
    );
}

#[test]
fn test_every_class_no_styles() {
    assert_eq!(
        html(convert_with_classes(EVERY_CLASS, "", true)),
        concat!(
            r#"<span class="bold italic underline strikethrough overline slow-blink invert hide font-1">Many classes</span>"#,
            r#"<span class="faint fraktur double-underline strikethrough overline fast-blink invert hide font-2">A few more classes</span>"#,
        )
    );
}

#[test]
fn test_truecolor_saturates() {
    assert_eq!(
        html(convert(
            b"\x1b[30;48;2;9999999997;9999999998;9999999999mblack on white"
        )),
        r#"<span style="color:black;background-color:rgb(255,255,255);">black on white</span>"#
    );
}

#[test]
fn test_unknown_sequences_are_dropped() {
    assert_eq!(html(convert(b"\x1bc\x1b[2J\x1b[?1m\x1b[38;1mtest")), "test");
}

#[test]
fn test_long_sgr_list_is_applied() {
    let input = format!("\x1b[{}31mX", "1;".repeat(2100));
    assert_eq!(
        html(convert(input.as_bytes())),
        r#"<span style="font-weight:bold;color:maroon;">X</span>"#
    );
}

#[test]
fn test_osc_is_dropped() {
    assert_eq!(
        html(convert(b"\x1b]0;title\x07\x1b[1mA\x1b]8;;http://x\x1b\\B")),
        r#"<span style="font-weight:bold;">AB</span>"#
    );
}

#[test]
fn test_reset_between_runs() {
    assert_eq!(
        html(convert(b"\x1b[31mred\x1b[0m plain \x1b[1;4mstrong")),
        concat!(
            r#"<span style="color:maroon;">red</span> plain "#,
            r#"<span style="font-weight:bold;text-decoration-line:underline;">strong</span>"#,
        )
    );
}

#[test]
fn test_redundant_sgr_keeps_span() {
    assert_eq!(
        html(convert(b"\x1b[32ma\x1b[32mb\x1b[1m\x1b[22mc")),
        r#"<span style="color:green;">abc</span>"#
    );
}

#[test]
fn test_c1_csi_styles_text() {
    assert_eq!(
        html(convert("\u{9b}35mm\u{9b}m".as_bytes())),
        r#"<span style="color:purple;">m</span>"#
    );
}

#[test]
fn test_palette_and_bright_colors() {
    assert_eq!(
        html(convert(b"\x1b[92;100mx")),
        r#"<span style="color:lime;background-color:gray;">x</span>"#
    );
    assert_eq!(
        html(convert(b"\x1b[38;5;21;48;5;232mx")),
        r#"<span style="color:rgb(0,0,255);background-color:rgb(8,8,8);">x</span>"#
    );
}

#[test]
fn test_class_prefix_applies_to_every_token() {
    assert_eq!(
        html(convert_with_classes(b"\x1b[1;74;31;42mx", "t-", false)),
        r#"<span class="t-bold t-subscript t-fg-red t-bg-green">x</span>"#
    );
}

#[test]
fn test_streaming_converter_output_matches_convert() {
    let config = HtmlConfig::with_classes("c-", false).buffer_size(3);
    let expected = convert_with_config(EVERY_CLASS, &config);
    let output = HtmlConverter::new(EVERY_CLASS, Vec::new(), config)
        .run()
        .unwrap();
    assert_eq!(html(output), html(expected));
}

#[test]
fn test_render_runs_directly() {
    let bold = StyleState::default().apply_sgr(b"1");
    let plain = StyleState::default();
    let output = render(
        [
            TextRun::new(b"a", &bold),
            TextRun::new(b"b", &bold),
            TextRun::new(b"<c>", &plain),
        ],
        &HtmlConfig::inline(),
    );
    assert_eq!(
        html(output),
        r#"<span style="font-weight:bold;">ab</span>&lt;c&gt;"#
    );
}

fn escape_only(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Text without ESC or C1 controls.
fn literal_text() -> impl Strategy<Value = String> {
    any::<String>().prop_map(|text| {
        text.chars()
            .filter(|ch| *ch != '\x1b' && !('\u{80}'..='\u{9f}').contains(ch))
            .collect()
    })
}

fn sgr_params() -> impl Strategy<Value = String> {
    prop::collection::vec(0u32..120, 0..6).prop_map(|codes| {
        codes
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(";")
    })
}

/// Text interleaved with SGR and other sequences.
fn ansi_stream() -> impl Strategy<Value = Vec<u8>> {
    let piece = prop_oneof![
        literal_text().prop_map(String::into_bytes),
        sgr_params().prop_map(|params| format!("\x1b[{params}m").into_bytes()),
        sgr_params().prop_map(|params| format!("\u{9b}{params}m").into_bytes()),
        Just(b"\x1b]0;title\x07".to_vec()),
        Just(b"\x1b[2J".to_vec()),
        Just(b"\x1bc".to_vec()),
    ];
    prop::collection::vec(piece, 0..12).prop_map(|pieces| pieces.concat())
}

proptest! {
    #[test]
    fn test_literal_text_is_identity(text in literal_text()) {
        prop_assert_eq!(html(convert(text.as_bytes())), escape_only(&text));
    }

    #[test]
    fn test_buffer_boundaries_do_not_matter(input in ansi_stream(), buffer_size in 1usize..16) {
        let config = HtmlConfig::inline().buffer_size(buffer_size);
        let streamed = HtmlConverter::new(&input[..], Vec::new(), config)
            .run()
            .unwrap();
        prop_assert_eq!(streamed, convert(&input));
    }

    #[test]
    fn test_split_runs_coalesce(
        params in sgr_params(),
        text in literal_text(),
        split in 0usize..64,
    ) {
        let style = StyleState::default().apply_sgr(params.as_bytes());
        let bytes = text.as_bytes();
        let split = split.min(bytes.len());
        let config = HtmlConfig::inline();
        let whole = render([TextRun::new(bytes, &style)], &config);
        let parts = render(
            [TextRun::new(&bytes[..split], &style), TextRun::new(&bytes[split..], &style)],
            &config,
        );
        prop_assert_eq!(parts, whole);
    }

    #[test]
    fn test_reset_returns_to_default(params in sgr_params(), text in literal_text()) {
        let input = format!("\x1b[{params}m\x1b[0m{text}");
        prop_assert!(StyleState::default().apply_sgr(params.as_bytes()).apply_sgr(b"0").is_default());
        prop_assert_eq!(html(convert(input.as_bytes())), escape_only(&text));
    }
}
