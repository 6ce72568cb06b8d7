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

//! Error types for the ansihtml crate.
//!
//! Only three conditions are fatal: an unusable working buffer, a failing
//! source and a failing sink. Malformed escape sequences are never errors.

use thiserror::Error;

/// Result type alias for operations that may fail with an [`AnsiError`].
pub type AnsiResult<T> = Result<T, AnsiError>;

/// Errors that can occur while scanning or converting a byte stream.
#[derive(Debug, Error)]
pub enum AnsiError {
    /// The caller supplied a zero-length working buffer.
    #[error("buffer must not be empty")]
    EmptyBuffer,

    /// The underlying source failed while being read.
    #[error("failed to read from source: {0}")]
    SourceRead(#[source] std::io::Error),

    /// The underlying sink failed while literal text or markup was written.
    #[error("failed to write to sink: {0}")]
    SinkWrite(#[source] std::io::Error),
}

impl AnsiError {
    /// Check if the error originated in the underlying source or sink.
    pub fn is_io_error(&self) -> bool {
        matches!(self, AnsiError::SourceRead(_) | AnsiError::SinkWrite(_))
    }
}

impl From<std::io::Error> for AnsiError {
    fn from(error: std::io::Error) -> Self {
        AnsiError::SourceRead(error)
    }
}

impl From<AnsiError> for std::io::Error {
    fn from(error: AnsiError) -> Self {
        match error {
            AnsiError::SourceRead(err) | AnsiError::SinkWrite(err) => err,
            AnsiError::EmptyBuffer => {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, AnsiError::EmptyBuffer)
            }
        }
    }
}
