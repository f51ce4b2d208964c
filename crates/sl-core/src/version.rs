//! DAC versions, version patterns, and target version resolution.
//!
//! A [`Version`] has a mandatory major and minor component and optional
//! build and revision components. A [`VersionPattern`] describes how a
//! version is rendered into the name of an artifacts directory, for example
//! `{MAJOR}.{MINOR}.{BUILD}`.

use crate::error::{CoreError, CoreResult};
use std::fmt;
use std::str::FromStr;

/// Keyword replaced by the major version number
pub const MAJOR_KEYWORD: &str = "{MAJOR}";
/// Keyword replaced by the minor version number
pub const MINOR_KEYWORD: &str = "{MINOR}";
/// Keyword replaced by the build number
pub const BUILD_KEYWORD: &str = "{BUILD}";
/// Keyword replaced by the revision number
pub const REVISION_KEYWORD: &str = "{REVISION}";

/// A single component of a [`Version`], ordered by significance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VersionComponent {
    /// Major version number
    Major,
    /// Minor version number
    Minor,
    /// Build number
    Build,
    /// Revision number
    Revision,
}

impl VersionComponent {
    /// All components, most significant first
    pub const ALL: [VersionComponent; 4] = [
        VersionComponent::Major,
        VersionComponent::Minor,
        VersionComponent::Build,
        VersionComponent::Revision,
    ];

    /// The pattern keyword standing for this component
    pub fn keyword(self) -> &'static str {
        match self {
            VersionComponent::Major => MAJOR_KEYWORD,
            VersionComponent::Minor => MINOR_KEYWORD,
            VersionComponent::Build => BUILD_KEYWORD,
            VersionComponent::Revision => REVISION_KEYWORD,
        }
    }

    /// Look up the component for a keyword, if the text is one
    pub fn from_keyword(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.keyword() == text)
    }

    fn label(self) -> &'static str {
        match self {
            VersionComponent::Major => "major",
            VersionComponent::Minor => "minor",
            VersionComponent::Build => "build",
            VersionComponent::Revision => "revision",
        }
    }
}

/// A DAC version with optional build and revision components.
///
/// Ordering is lexicographic over the components; an absent component sorts
/// below any present value, so `1.0 < 1.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    major: u32,
    minor: u32,
    build: Option<u32>,
    revision: Option<u32>,
}

impl Version {
    /// Create a `major.minor` version
    pub const fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            build: None,
            revision: None,
        }
    }

    /// Create a `major.minor.build` version
    pub const fn with_build(major: u32, minor: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            build: Some(build),
            revision: None,
        }
    }

    /// Create a `major.minor.build.revision` version
    pub const fn with_revision(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            build: Some(build),
            revision: Some(revision),
        }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn build(&self) -> Option<u32> {
        self.build
    }

    pub fn revision(&self) -> Option<u32> {
        self.revision
    }

    /// Value of a single component, `None` when absent
    pub fn component(&self, component: VersionComponent) -> Option<u32> {
        match component {
            VersionComponent::Major => Some(self.major),
            VersionComponent::Minor => Some(self.minor),
            VersionComponent::Build => self.build,
            VersionComponent::Revision => self.revision,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(build) = self.build {
            write!(f, ".{}", build)?;
            if let Some(revision) = self.revision {
                write!(f, ".{}", revision)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CoreError::InvalidVersion {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.trim().split('.').collect();
        if !(2..=4).contains(&parts.len()) {
            return Err(invalid("expected 2 to 4 dot-separated numbers"));
        }

        let mut numbers = Vec::with_capacity(parts.len());
        for part in &parts {
            let n = part
                .parse::<u32>()
                .map_err(|_| invalid("components must be non-negative integers"))?;
            numbers.push(n);
        }

        Ok(match numbers.as_slice() {
            [major, minor] => Version::new(*major, *minor),
            [major, minor, build] => Version::with_build(*major, *minor, *build),
            [major, minor, build, revision] => {
                Version::with_revision(*major, *minor, *build, *revision)
            }
            _ => unreachable!("length checked above"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternSegment {
    Literal(String),
    Keyword(VersionComponent),
}

/// A parsed version pattern such as `{MAJOR}.{MINOR}.{BUILD}`.
///
/// The pattern has 2 to 4 dot-separated segments. The segment at position
/// *i* is either a non-negative number or the keyword of the *i*-th
/// component, which rules out duplicated and reordered keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPattern {
    segments: Vec<PatternSegment>,
}

impl VersionPattern {
    /// Parse a pattern, returning every problem found as a message.
    pub fn parse(pattern: &str) -> Result<Self, Vec<String>> {
        if pattern.trim().is_empty() {
            return Err(vec!["Pattern cannot be empty.".to_string()]);
        }

        let parts: Vec<&str> = pattern.split('.').collect();
        let mut errors = Vec::new();
        if parts.len() < 2 {
            errors.push("Pattern doesn't contain enough parts.".to_string());
        }
        if parts.len() > 4 {
            errors.push("Pattern contains too many parts.".to_string());
            return Err(errors);
        }

        let mut segments = Vec::with_capacity(parts.len());
        for (part, expected) in parts.iter().zip(VersionComponent::ALL) {
            match parse_segment(part, expected) {
                Ok(segment) => segments.push(segment),
                Err(message) => errors.push(message),
            }
        }

        if errors.is_empty() {
            Ok(Self { segments })
        } else {
            Err(errors)
        }
    }

    /// Render a version; absent components drop their segment entirely.
    pub fn render(&self, version: &Version) -> String {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                PatternSegment::Literal(text) => Some(text.clone()),
                PatternSegment::Keyword(component) => {
                    version.component(*component).map(|n| n.to_string())
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

fn parse_segment(part: &str, expected: VersionComponent) -> Result<PatternSegment, String> {
    if part == expected.keyword() {
        return Ok(PatternSegment::Keyword(expected));
    }
    if let Some(other) = VersionComponent::from_keyword(part) {
        return Err(format!(
            "Special keyword {} is not allowed at the {} position.",
            other.keyword(),
            expected.label()
        ));
    }
    if part.starts_with('-') && part[1..].parse::<u32>().is_ok() {
        return Err(format!("{} number cannot be negative.", capitalize(expected.label())));
    }
    if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) && part.parse::<u32>().is_ok()
    {
        return Ok(PatternSegment::Literal(part.to_string()));
    }
    Err(format!(
        "Invalid value for {} number: expected a number or {}.",
        expected.label(),
        expected.keyword()
    ))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Outcome of resolving the target version for a generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    /// Version of the freshly built DACPAC
    pub new_version: Version,
    /// `new_version` rendered with the configured pattern
    pub formatted: String,
    /// Previously deployed version, if any
    pub previous_version: Option<Version>,
    /// `previous_version` rendered with the configured pattern
    pub formatted_previous: Option<String>,
}

/// Checks that a version advances and renders it with the configured pattern.
#[derive(Debug, Clone)]
pub struct VersionResolver {
    pattern: VersionPattern,
}

impl VersionResolver {
    /// Create a resolver for a version pattern string
    pub fn new(pattern: &str) -> CoreResult<Self> {
        let pattern =
            VersionPattern::parse(pattern).map_err(|errors| CoreError::InvalidVersionPattern {
                pattern: pattern.to_string(),
                errors,
            })?;
        Ok(Self { pattern })
    }

    /// Fail unless `new` is strictly greater than `previous`.
    pub fn ensure_advances(new: &Version, previous: Option<&Version>) -> CoreResult<()> {
        match previous {
            Some(previous) if new <= previous => Err(CoreError::VersionNotAdvanced {
                new: new.to_string(),
                previous: previous.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Render a version with this resolver's pattern
    pub fn format(&self, version: &Version) -> String {
        self.pattern.render(version)
    }

    /// Validate ordering and render both the new and the previous version.
    pub fn resolve(
        &self,
        new_version: &Version,
        previous_version: Option<&Version>,
    ) -> CoreResult<ResolvedVersion> {
        Self::ensure_advances(new_version, previous_version)?;
        let resolved = ResolvedVersion {
            new_version: *new_version,
            formatted: self.format(new_version),
            previous_version: previous_version.copied(),
            formatted_previous: previous_version.map(|v| self.format(v)),
        };
        log::debug!(
            "Resolved target version {} (previous: {})",
            resolved.formatted,
            resolved.formatted_previous.as_deref().unwrap_or("none")
        );
        Ok(resolved)
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
