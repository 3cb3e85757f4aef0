//! In-memory ZIP access for the downloaded FAA bundles.

use anyhow::{Context, Result, anyhow};
use std::borrow::Cow;
use std::io::{BufRead, BufReader, Cursor};
use std::ops::ControlFlow;

/// Character encoding of a member's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Every byte maps to the code point of the same value (NASR files)
    Latin1,
    /// UTF-8 with invalid sequences dropped (obstacle file)
    Utf8Lossy,
}

impl TextEncoding {
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        match self {
            TextEncoding::Latin1 => {
                if bytes.is_ascii() {
                    // ASCII is valid UTF-8, no copy needed
                    Cow::Borrowed(std::str::from_utf8(bytes).unwrap_or_default())
                } else {
                    Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect())
                }
            }
            TextEncoding::Utf8Lossy => match std::str::from_utf8(bytes) {
                Ok(text) => Cow::Borrowed(text),
                Err(_) => Cow::Owned(bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()),
            },
        }
    }
}

/// A ZIP archive opened over a borrowed byte buffer.
pub struct SourceArchive<'a> {
    archive: zip::ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> SourceArchive<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).context("Opening ZIP archive")?;
        Ok(SourceArchive { archive })
    }

    /// Name of the first member whose name ends with `suffix`, ignoring ASCII case.
    pub fn member_with_suffix(&self, suffix: &str) -> Result<String> {
        let suffix = suffix.to_ascii_lowercase();
        self.archive
            .file_names()
            .find(|name| name.to_ascii_lowercase().ends_with(&suffix))
            .map(str::to_string)
            .ok_or_else(|| anyhow!("No archive member ending in '{}'", suffix))
    }

    /// Feed each line of the member ending in `suffix` to `visit`, without its
    /// line terminator. Returning `ControlFlow::Break` stops the scan early.
    pub fn for_each_line<F>(&mut self, suffix: &str, encoding: TextEncoding, mut visit: F) -> Result<()>
    where
        F: FnMut(&str) -> ControlFlow<()>,
    {
        let name = self.member_with_suffix(suffix)?;
        let member = self
            .archive
            .by_name(&name)
            .with_context(|| format!("Opening archive member {}", name))?;
        let mut reader = BufReader::new(member);
        let mut buf = Vec::new();
        let mut lineno = 0usize;

        loop {
            buf.clear();
            lineno += 1;
            let read = reader
                .read_until(b'\n', &mut buf)
                .with_context(|| format!("Reading {} line {}", name, lineno))?;
            if read == 0 {
                break;
            }

            let raw = buf.strip_suffix(b"\n").unwrap_or(&buf);
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let line = encoding.decode(raw);

            if visit(line.as_ref()).is_break() {
                break;
            }
        }

        Ok(())
    }
}
