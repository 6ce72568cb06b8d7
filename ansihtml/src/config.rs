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

/// HTML output settings.
///
/// # Examples
///
/// ```
/// use ansihtml::{HtmlConfig, StyleMode};
///
/// let config = HtmlConfig::with_classes("term-", true).buffer_size(512);
/// assert_eq!(config.style_mode, StyleMode::Classes);
/// assert_eq!(config.class_prefix, "term-");
/// assert_eq!(config.buffer_size, 512);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HtmlConfig {
    /// How span styling is expressed
    pub style_mode: StyleMode,
    /// Prefix prepended to every class token in [`StyleMode::Classes`]
    pub class_prefix: String,
    /// Omit colors without a class instead of inlining them ([`StyleMode::Classes`] only)
    pub no_styles: bool,
    /// Size of the read buffer used when converting from a stream
    pub buffer_size: usize,
}

impl HtmlConfig {
    /// Inline `style` attributes on every span
    pub fn inline() -> HtmlConfig {
        HtmlConfig {
            style_mode: StyleMode::Inline,
            class_prefix: String::new(),
            no_styles: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Semantic `class` attributes, each prefixed by `class_prefix`
    pub fn with_classes(class_prefix: impl Into<String>, no_styles: bool) -> HtmlConfig {
        HtmlConfig {
            style_mode: StyleMode::Classes,
            class_prefix: class_prefix.into(),
            no_styles,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Replace the read buffer size
    pub fn buffer_size(mut self, buffer_size: usize) -> HtmlConfig {
        self.buffer_size = buffer_size;
        self
    }

    /// Whether spans are styled with classes
    pub fn use_classes(&self) -> bool {
        self.style_mode == StyleMode::Classes
    }
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self::inline()
    }
}

/// How a span carries its styling.
///
/// - **Inline**: every active attribute becomes a CSS declaration in a `style` attribute.
/// - **Classes**: attributes become class tokens; colors without a class name fall back to
///   inline declarations unless [`HtmlConfig::no_styles`] is set.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum StyleMode {
    /// `<span style="…">`
    #[default]
    Inline,
    /// `<span class="…">`
    Classes,
}
