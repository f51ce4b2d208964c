//! Field validation rules for [`ConfigurationSettings`].

use super::{ConfigurationField, ConfigurationSettings, SINGLE_PROFILE_KEYWORD};
use crate::version::VersionPattern;
use std::path::Path;

const PUBLISH_PROFILE_SUFFIX: &str = ".publish.xml";

/// A validation rule and the fields whose errors it owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    ArtifactsPath,
    PublishProfilePath,
    SharedDacpacRepositoryPath,
    UnnamedDefaultConstraintDrops,
    VersionPattern,
}

impl ValidationRule {
    pub const ALL: [ValidationRule; 5] = [
        ValidationRule::ArtifactsPath,
        ValidationRule::PublishProfilePath,
        ValidationRule::SharedDacpacRepositoryPath,
        ValidationRule::UnnamedDefaultConstraintDrops,
        ValidationRule::VersionPattern,
    ];

    /// Fields that receive this rule's errors. A rule only reads these fields,
    /// so it is re-run exactly when one of them changes.
    pub fn governed_fields(self) -> &'static [ConfigurationField] {
        match self {
            ValidationRule::ArtifactsPath => &[ConfigurationField::ArtifactsPath],
            ValidationRule::PublishProfilePath => &[ConfigurationField::PublishProfilePath],
            ValidationRule::SharedDacpacRepositoryPath => {
                &[ConfigurationField::SharedDacpacRepositoryPath]
            }
            ValidationRule::UnnamedDefaultConstraintDrops => &[
                ConfigurationField::CommentOutUnnamedDefaultConstraintDrops,
                ConfigurationField::ReplaceUnnamedDefaultConstraintDrops,
            ],
            ValidationRule::VersionPattern => &[ConfigurationField::VersionPattern],
        }
    }

    pub fn depends_on(self, field: ConfigurationField) -> bool {
        self.governed_fields().contains(&field)
    }

    /// Evaluate the rule; an empty list means valid
    pub fn evaluate(self, settings: &ConfigurationSettings) -> Vec<String> {
        match self {
            ValidationRule::ArtifactsPath => validate_artifacts_path(&settings.artifacts_path),
            ValidationRule::PublishProfilePath => {
                validate_publish_profile_path(&settings.publish_profile_path)
            }
            ValidationRule::SharedDacpacRepositoryPath => validate_shared_dacpac_repository_path(
                settings.shared_dacpac_repository_path.as_deref(),
            ),
            ValidationRule::UnnamedDefaultConstraintDrops => {
                validate_unnamed_default_constraint_drops(
                    settings.comment_out_unnamed_default_constraint_drops,
                    settings.replace_unnamed_default_constraint_drops,
                )
            }
            ValidationRule::VersionPattern => {
                VersionPattern::parse(&settings.version_pattern).err().unwrap_or_default()
            }
        }
    }
}

fn validate_artifacts_path(path: &str) -> Vec<String> {
    if path.trim().is_empty() {
        return vec!["Path cannot be empty.".to_string()];
    }
    let mut errors = Vec::new();
    if is_rooted(path) {
        errors.push("Path must be a relative path.".to_string());
    }
    if has_invalid_path_chars(path) {
        errors.push("Path contains invalid characters.".to_string());
    }
    errors
}

fn validate_publish_profile_path(path: &str) -> Vec<String> {
    if path.trim().is_empty() {
        return vec!["Path cannot be empty.".to_string()];
    }
    if path == SINGLE_PROFILE_KEYWORD {
        return Vec::new();
    }
    let mut errors = Vec::new();
    if is_rooted(path) {
        errors.push("Path must be a relative path.".to_string());
    }
    if has_invalid_path_chars(path) {
        errors.push("Path contains invalid characters.".to_string());
    }
    if !path.to_lowercase().ends_with(PUBLISH_PROFILE_SUFFIX) {
        errors.push(format!(
            "Profile file name must end with *{PUBLISH_PROFILE_SUFFIX}."
        ));
    }
    errors
}

fn validate_shared_dacpac_repository_path(path: Option<&str>) -> Vec<String> {
    let Some(path) = path.filter(|p| !p.trim().is_empty()) else {
        return Vec::new();
    };
    let mut errors = Vec::new();
    if !is_absolute(path) {
        errors.push("Path must be an absolute path.".to_string());
    }
    if has_invalid_path_chars(path) {
        errors.push("Path contains invalid characters.".to_string());
    }
    errors
}

fn validate_unnamed_default_constraint_drops(comment_out: bool, replace: bool) -> Vec<String> {
    if comment_out && replace {
        vec!["Behavior for unnamed default constraint drops is ambiguous. Either comment out or replace them, not both.".to_string()]
    } else {
        Vec::new()
    }
}

/// Windows-style paths are accepted on every platform since projects are
/// usually configured on Windows.
fn is_absolute(path: &str) -> bool {
    Path::new(path).is_absolute()
        || path.starts_with('/')
        || path.starts_with("\\\\")
        || has_drive_prefix(path)
}

fn is_rooted(path: &str) -> bool {
    path.starts_with('/') || path.starts_with('\\') || has_drive_prefix(path)
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn has_invalid_path_chars(path: &str) -> bool {
    path.chars()
        .any(|c| matches!(c, '<' | '>' | '"' | '|' | '?' | '*') || c.is_control())
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
