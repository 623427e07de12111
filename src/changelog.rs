//! Changelog scanner for "Keep a Changelog" formatted files.
//!
//! Release sections start with a heading of exactly four whitespace-separated
//! tokens:
//!
//! ```text
//! ## [1.0.0] - 2022-10-25
//! ```
//!
//! Everything after a heading, up to the next line that *starts* with a `##`
//! token, is that release's notes. The notes boundary is deliberately looser
//! than the heading rule so informal sections such as `## Unreleased` still
//! end the previous release's notes without being treated as releases.
//!
//! # Usage
//!
//! ```ignore
//! // One release
//! let release = changelog::extract_release("CHANGELOG.md", "v1.0.0")?;
//!
//! // Every release, newest first
//! for release in changelog::extract_all("CHANGELOG.md")? {
//!     let release = release?;
//! }
//! ```

use crate::models::Release;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{debug, instrument, trace};

/// Scanner context: either nothing matched yet, or the last matched heading.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ScanState {
    NoHeading,
    Heading { version: String, date: String },
}

/// Forward-only scanner over the lines of a changelog.
///
/// The underlying reader is owned by the scanner, so a file opened with
/// [`ChangelogScanner::open`] is closed when the scanner is dropped.
#[derive(Debug)]
pub struct ChangelogScanner<R> {
    reader: R,
    /// A line read past the end of a notes section, handed back on the next read.
    pushback: Option<String>,
    state: ScanState,
}

impl ChangelogScanner<BufReader<File>> {
    /// Open a changelog file for scanning.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> ChangelogScanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pushback: None,
            state: ScanState::NoHeading,
        }
    }

    /// Advance to the next release heading.
    ///
    /// # Returns
    ///
    /// `true` if a heading was found; its version and date become the current
    /// context. `false` at end of stream, in which case the context is cleared.
    pub fn advance_to_next_heading(&mut self) -> io::Result<bool> {
        while let Some(line) = self.next_line()? {
            if let Some((version, date)) = parse_heading(&line) {
                trace!(version, date, "Matched release heading");
                self.state = ScanState::Heading {
                    version: version.to_string(),
                    date: date.to_string(),
                };
                return Ok(true);
            }
        }
        self.state = ScanState::NoHeading;
        Ok(false)
    }

    /// Version of the last matched heading, without brackets.
    pub fn current_version(&self) -> Option<&str> {
        match &self.state {
            ScanState::Heading { version, .. } => Some(version),
            ScanState::NoHeading => None,
        }
    }

    /// Date of the last matched heading, verbatim.
    pub fn current_date(&self) -> Option<&str> {
        match &self.state {
            ScanState::Heading { date, .. } => Some(date),
            ScanState::NoHeading => None,
        }
    }

    /// Collect the notes following the current position.
    ///
    /// Reads until end of stream or a line whose first token is `##` and that
    /// has at least one more token. That line is not consumed: the next call
    /// to [`advance_to_next_heading`](Self::advance_to_next_heading) sees it.
    ///
    /// # Returns
    ///
    /// The collected lines joined verbatim, with surrounding whitespace trimmed.
    pub fn take_change_notes(&mut self) -> io::Result<String> {
        let mut changes = String::new();
        while let Some(line) = self.next_line()? {
            if is_section_boundary(&line) {
                self.pushback = Some(line);
                break;
            }
            changes.push_str(&line);
        }
        Ok(changes.trim().to_string())
    }

    /// Next line with its `\r\n` ending normalized to `\n`, or `None` at end of stream.
    fn next_line(&mut self) -> io::Result<Option<String>> {
        if let Some(line) = self.pushback.take() {
            return Ok(Some(line));
        }
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with("\r\n") {
            line.truncate(line.len() - 2);
            line.push('\n');
        }
        Ok(Some(line))
    }
}

/// Match the strict `## [version] - date` heading.
///
/// Empty brackets (`[]`) are rejected.
fn parse_heading(line: &str) -> Option<(&str, &str)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [hashes, bracketed, dash, date] = tokens[..] else {
        return None;
    };
    if hashes != "##" || dash != "-" {
        return None;
    }
    let version = bracketed.strip_prefix('[')?.strip_suffix(']')?;
    if version.is_empty() {
        return None;
    }
    Some((version, date))
}

/// Any `## <something>` line ends a notes section, well-formed heading or not.
fn is_section_boundary(line: &str) -> bool {
    let mut tokens = line.split_whitespace();
    tokens.next() == Some("##") && tokens.next().is_some()
}

/// Extract the release for `tag` from the changelog at `path`.
///
/// The tag's first character (the `v` prefix) is dropped before comparing
/// against heading versions.
///
/// # Returns
///
/// `Ok(None)` if no heading carries the requested version.
///
/// # Errors
///
/// Returns an I/O error if the changelog cannot be opened or read.
#[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display(), %tag))]
pub fn extract_release(path: impl AsRef<Path>, tag: &str) -> io::Result<Option<Release>> {
    let scanner = ChangelogScanner::open(path)?;
    find_release(scanner, tag)
}

/// Scan `scanner` for the release matching `tag`.
pub fn find_release<R: BufRead>(
    mut scanner: ChangelogScanner<R>,
    tag: &str,
) -> io::Result<Option<Release>> {
    let version = strip_tag_prefix(tag);
    while scanner.advance_to_next_heading()? {
        if scanner.current_version() == Some(version) {
            let date = scanner.current_date().unwrap_or_default().to_string();
            let changes = scanner.take_change_notes()?;
            debug!(%tag, %date, notes_len = changes.len(), "Found release in changelog");
            return Ok(Some(Release::new(tag, date, changes)));
        }
    }
    debug!(%tag, "Release not found in changelog");
    Ok(None)
}

/// Lazily extract every release of the changelog at `path`, in document order.
///
/// # Errors
///
/// Opening the file is checked eagerly; read errors surface as items.
pub fn extract_all(path: impl AsRef<Path>) -> io::Result<Releases<BufReader<File>>> {
    Ok(Releases::new(ChangelogScanner::open(path)?))
}

/// Iterator over all releases of a changelog, top to bottom.
///
/// Stops after the first read error.
#[derive(Debug)]
pub struct Releases<R> {
    scanner: ChangelogScanner<R>,
    done: bool,
}

impl<R: BufRead> Releases<R> {
    pub fn new(scanner: ChangelogScanner<R>) -> Self {
        Self {
            scanner,
            done: false,
        }
    }

    fn next_release(&mut self) -> io::Result<Option<Release>> {
        if !self.scanner.advance_to_next_heading()? {
            return Ok(None);
        }
        let tag = format!("v{}", self.scanner.current_version().unwrap_or_default());
        let date = self.scanner.current_date().unwrap_or_default().to_string();
        let changes = self.scanner.take_change_notes()?;
        Ok(Some(Release::new(tag, date, changes)))
    }
}

impl<R: BufRead> Iterator for Releases<R> {
    type Item = io::Result<Release>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_release() {
            Ok(Some(release)) => Some(Ok(release)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn strip_tag_prefix(tag: &str) -> &str {
    let mut chars = tag.chars();
    chars.next();
    chars.as_str()
}
