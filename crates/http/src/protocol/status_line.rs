//! Decomposition of a raw status line into version, code and reason text.

use http::Version;

use crate::ensure;
use crate::protocol::ParseError;

/// A decomposed `HTTP/1.x <code> <text>` status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    version: Version,
    code: u16,
    text: String,
}

impl StatusLine {
    /// Parses the raw text captured before the first line terminator.
    ///
    /// The version marker may be preceded by stray bytes (they are skipped), the code is
    /// one or more ASCII digits and everything after the single separating space is the
    /// reason text, kept verbatim. A missing reason yields an empty text.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let (version, rest) = split_version(line).ok_or_else(|| ParseError::invalid_status_line(line))?;

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        ensure!(digits > 0, ParseError::invalid_status_line(line));

        let code = rest[..digits].parse::<u16>().ok().ok_or_else(|| ParseError::invalid_status_line(line))?;

        let text = match &rest[digits..] {
            "" => "",
            remain => remain.strip_prefix(' ').ok_or_else(|| ParseError::invalid_status_line(line))?,
        };

        Ok(Self { version, code, text: text.to_owned() })
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_parts(self) -> (u16, String) {
        (self.code, self.text)
    }
}

fn split_version(line: &str) -> Option<(Version, &str)> {
    const MARKERS: [(&str, Version); 2] = [("HTTP/1.1 ", Version::HTTP_11), ("HTTP/1.0 ", Version::HTTP_10)];

    MARKERS.iter().find_map(|(marker, version)| line.find(marker).map(|start| (*version, &line[start + marker.len()..])))
}
