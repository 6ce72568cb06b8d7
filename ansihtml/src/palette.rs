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

//! Color tables for the 256-color palette.
//!
//! | Index     | Meaning                                           |
//! |-----------|---------------------------------------------------|
//! | `0-7`     | Standard colors (SGR 30-37 / 40-47)               |
//! | `8-15`    | Bright colors (SGR 90-97 / 100-107)               |
//! | `16-231`  | 6×6×6 color cube, `16 + 36r + 6g + b`             |
//! | `232-255` | 24-step grayscale ramp from `rgb(8,8,8)` upwards  |

/// Number of palette entries that have a CSS keyword and a class name.
pub const NAMED_COLORS: u8 = 16;

/// CSS color keywords for palette entries 0-15.
pub const CSS_COLOR_NAMES: [&str; 16] = [
    "black", "maroon", "green", "olive", "navy", "purple", "teal", "silver", "gray", "red",
    "lime", "yellow", "blue", "fuchsia", "aqua", "white",
];

/// Semantic class names for palette entries 0-15.
pub const CLASS_COLOR_NAMES: [&str; 16] = [
    "black",
    "red",
    "green",
    "yellow",
    "blue",
    "magenta",
    "cyan",
    "white",
    "bright-black",
    "bright-red",
    "bright-green",
    "bright-yellow",
    "bright-blue",
    "bright-magenta",
    "bright-cyan",
    "bright-white",
];

/// RGB values of the CSS keywords in [`CSS_COLOR_NAMES`].
pub const NAMED_RGB: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (128, 0, 0),
    (0, 128, 0),
    (128, 128, 0),
    (0, 0, 128),
    (128, 0, 128),
    (0, 128, 128),
    (192, 192, 192),
    (128, 128, 128),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (0, 0, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

/// Channel intensities of the color cube.
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

const CUBE_START: u8 = 16;
const GRAYSCALE_START: u8 = 232;

/// CSS keyword for a named palette entry.
pub fn css_name(index: u8) -> Option<&'static str> {
    CSS_COLOR_NAMES.get(usize::from(index)).copied()
}

/// Class name (without prefix) for a named palette entry.
pub fn class_name(index: u8) -> Option<&'static str> {
    CLASS_COLOR_NAMES.get(usize::from(index)).copied()
}

/// RGB value of any palette entry.
pub fn indexed_rgb(index: u8) -> (u8, u8, u8) {
    match index {
        0..CUBE_START => NAMED_RGB[usize::from(index)],
        CUBE_START..GRAYSCALE_START => {
            let offset = usize::from(index - CUBE_START);
            (
                CUBE_LEVELS[offset / 36],
                CUBE_LEVELS[(offset / 6) % 6],
                CUBE_LEVELS[offset % 6],
            )
        }
        GRAYSCALE_START..=u8::MAX => {
            let level = 8 + 10 * (index - GRAYSCALE_START);
            (level, level, level)
        }
    }
}
