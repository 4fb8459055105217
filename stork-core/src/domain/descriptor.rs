//! Version descriptors
//!
//! Parses artifact filenames into a structured, comparable form. The accepted
//! grammar is:
//!
//! ```text
//! <name>-<major>.<minor>.<patch>[-SNAPSHOT[<branch>]][.dev<n>][-py<tag>].<egg|jar>
//! ```
//!
//! - `<name>` is any non-empty run of `[A-Za-z0-9._-]`. It is greedy: when
//!   several hyphens are followed by a version triple, the last one that
//!   leaves a valid tail wins.
//! - `<branch>` is a run of `[A-Za-z_.-]` directly after `SNAPSHOT`.
//! - `-py<tag>` is a build toolchain marker and is discarded.
//!
//! Examples that parse:
//!
//! ```
//! use stork_core::{ArtifactKind, VersionDescriptor};
//!
//! let d = VersionDescriptor::parse("new_library-1.0.0-SNAPSHOT-my-branch-py3.6.egg")?;
//! assert_eq!(d.library_name(), "new_library");
//! assert_eq!(d.version(), "1.0.0-SNAPSHOT-my-branch");
//! assert_eq!(d.kind(), ArtifactKind::PythonEgg);
//! # Ok::<(), stork_core::FilenameError>(())
//! ```

use thiserror::Error;

use crate::domain::artifact::ArtifactKind;

const SNAPSHOT: &str = "SNAPSHOT";

/// A filename that does not match the artifact grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "filename '{filename}' does not match <name>-<major>.<minor>.<patch>[-SNAPSHOT[-branch]][.devN][-pyX.Y].<egg|jar>"
)]
pub struct FilenameError {
    /// The offending filename
    pub filename: String,
}

/// Structured form of an artifact filename
///
/// Two descriptors compare equal when every parsed attribute matches; the
/// raw filename and any toolchain suffix are not part of the identity.
#[derive(Debug, Clone)]
pub struct VersionDescriptor {
    filename: String,
    library_name: String,
    /// Major digits as written, e.g. `"01"`
    major_digits: String,
    major_version: u64,
    minor_version: String,
    minor_value: f64,
    pre_release: Option<String>,
    dev: Option<u64>,
    kind: ArtifactKind,
}

/// Version part of a filename, everything between `<name>-` and the suffix
struct VersionTail {
    major_digits: String,
    major_version: u64,
    minor_version: String,
    pre_release: Option<String>,
    dev: Option<u64>,
}

impl VersionDescriptor {
    /// Parse a bare filename (no directories)
    ///
    /// # Errors
    /// Returns [`FilenameError`] if the filename does not match the grammar.
    pub fn parse(filename: &str) -> Result<Self, FilenameError> {
        let error = || FilenameError {
            filename: filename.to_string(),
        };

        let (stem, extension) = filename.rsplit_once('.').ok_or_else(error)?;
        let kind = ArtifactKind::from_extension(extension).ok_or_else(error)?;

        let hyphens: Vec<usize> = stem.match_indices('-').map(|(i, _)| i).collect();
        for &hyphen in hyphens.iter().rev() {
            let name = &stem[..hyphen];
            if !is_valid_name(name) {
                continue;
            }
            let Some(tail) = parse_tail(&stem[hyphen + 1..]) else {
                continue;
            };
            let minor_value = tail.minor_version.parse::<f64>().map_err(|_| error())?;

            return Ok(Self {
                filename: filename.to_string(),
                library_name: name.to_string(),
                major_digits: tail.major_digits,
                major_version: tail.major_version,
                minor_version: tail.minor_version,
                minor_value,
                pre_release: tail.pre_release,
                dev: tail.dev,
                kind,
            });
        }

        Err(error())
    }

    /// Filename this descriptor was parsed from
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn library_name(&self) -> &str {
        &self.library_name
    }

    pub fn major_version(&self) -> u64 {
        self.major_version
    }

    /// Composite `minor.patch` string, e.g. `"0.10"`
    pub fn minor_version(&self) -> &str {
        &self.minor_version
    }

    /// `minor.patch` read as a real number, the value ordering is based on
    pub fn minor_value(&self) -> f64 {
        self.minor_value
    }

    /// Pre-release tag including any branch suffix, e.g. `"SNAPSHOT-my-branch"`
    pub fn pre_release(&self) -> Option<&str> {
        self.pre_release.as_deref()
    }

    /// Development build ordinal (`.devN`)
    pub fn dev(&self) -> Option<u64> {
        self.dev
    }

    pub fn is_dev(&self) -> bool {
        self.dev.is_some()
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Version string as uploaded: `major.minor.patch[-pre][.devN]`
    ///
    /// Digits are rendered as written in the filename.
    pub fn version(&self) -> String {
        let mut version = format!("{}.{}", self.major_digits, self.minor_version);
        if let Some(pre) = &self.pre_release {
            version.push('-');
            version.push_str(pre);
        }
        if let Some(dev) = self.dev {
            version.push_str(&format!(".dev{}", dev));
        }
        version
    }

    /// Name the artifact is registered under in the workspace: `<name>-<version>`
    pub fn display_name(&self) -> String {
        format!("{}-{}", self.library_name, self.version())
    }

    /// Display name plus the kind's extension, without the toolchain suffix
    pub fn canonical_filename(&self) -> String {
        format!("{}.{}", self.display_name(), self.kind.extension())
    }
}

impl PartialEq for VersionDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.library_name == other.library_name
            && self.major_version == other.major_version
            && self.minor_version == other.minor_version
            && self.pre_release == other.pre_release
            && self.dev == other.dev
            && self.kind == other.kind
    }
}

impl std::fmt::Display for VersionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical_filename())
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn is_branch_char(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '-' | '_' | '.')
}

/// Split a leading, non-empty run of ASCII digits off `s`
fn take_digits(s: &str) -> Option<(&str, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    (end > 0).then(|| s.split_at(end))
}

fn parse_tail(s: &str) -> Option<VersionTail> {
    let (major, rest) = take_digits(s)?;
    let (minor, rest) = take_digits(rest.strip_prefix('.')?)?;
    let (patch, rest) = take_digits(rest.strip_prefix('.')?)?;
    let (pre_release, dev) = parse_markers(rest)?;

    Some(VersionTail {
        major_digits: major.to_string(),
        major_version: major.parse().ok()?,
        minor_version: format!("{}.{}", minor, patch),
        pre_release,
        dev,
    })
}

/// Parse `[-SNAPSHOT[<branch>]][.devN][-py<tag>]`, which must consume `s` entirely
fn parse_markers(s: &str) -> Option<(Option<String>, Option<u64>)> {
    let Some(after) = s.strip_prefix('-').and_then(|s| s.strip_prefix(SNAPSHOT)) else {
        return parse_dev_and_toolchain(s).map(|dev| (None, dev));
    };

    // The branch run may swallow the start of `.devN` or `-pyX`, so back off
    // one character at a time until the remainder parses.
    let run = after.find(|c: char| !is_branch_char(c)).unwrap_or(after.len());
    (0..=run).rev().find_map(|len| {
        let dev = parse_dev_and_toolchain(&after[len..])?;
        Some((Some(format!("{}{}", SNAPSHOT, &after[..len])), dev))
    })
}

fn parse_dev_and_toolchain(s: &str) -> Option<Option<u64>> {
    let (dev, rest) = match s.strip_prefix(".dev") {
        Some(after) => {
            let (ordinal, rest) = take_digits(after)?;
            (Some(ordinal.parse().ok()?), rest)
        }
        None => (None, s),
    };

    match rest.strip_prefix("-py") {
        _ if rest.is_empty() => Some(dev),
        Some(tag) if !tag.is_empty() => Some(dev),
        _ => None,
    }
}
