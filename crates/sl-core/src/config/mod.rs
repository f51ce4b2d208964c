//! Project configuration model.
//!
//! [`ConfigurationModel`] wraps the persisted [`ConfigurationSettings`] with
//! field-scoped validation errors and change notifications. Setters are
//! no-ops when the value does not change; otherwise they re-run the
//! validation rules that depend on the field and then notify observers.
//!
//! Validation never fails: an invalid model stays editable and reports its
//! problems through [`ConfigurationModel::errors`].

mod dirty;
mod validation;

pub use dirty::DirtyTracker;
pub use validation::ValidationRule;

use crate::error::{CoreError, CoreResult};
use crate::version::{BUILD_KEYWORD, MAJOR_KEYWORD, MINOR_KEYWORD};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Publish profile path meaning "use the only profile in the project directory"
pub const SINGLE_PROFILE_KEYWORD: &str = "{SINGLE_PROFILE}";

/// Default artifacts path, relative to the project directory
pub const DEFAULT_ARTIFACTS_PATH: &str = "_Deployment";

/// Persisted configuration values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigurationSettings {
    /// Artifacts directory, relative to the project directory
    pub artifacts_path: String,
    /// Publish profile, relative to the project directory, or [`SINGLE_PROFILE_KEYWORD`]
    pub publish_profile_path: String,
    /// Absolute path of a repository shared between projects
    pub shared_dacpac_repository_path: Option<String>,
    pub build_before_script_creation: bool,
    pub create_documentation_with_script_creation: bool,
    pub comment_out_unnamed_default_constraint_drops: bool,
    pub replace_unnamed_default_constraint_drops: bool,
    pub remove_sql_cmd_statements: bool,
    pub delete_refactorlog_after_versioned_script_generation: bool,
    pub delete_latest_after_versioned_script_generation: bool,
    /// Pattern used to name versioned artifacts directories
    pub version_pattern: String,
    /// Record each deployment in `[dbo].[__DacpacVersion]`
    pub track_dacpac_version: bool,
    /// Text prepended to the generated script
    pub custom_header: Option<String>,
    /// Text appended to the generated script
    pub custom_footer: Option<String>,
}

impl Default for ConfigurationSettings {
    fn default() -> Self {
        Self {
            artifacts_path: DEFAULT_ARTIFACTS_PATH.to_string(),
            publish_profile_path: SINGLE_PROFILE_KEYWORD.to_string(),
            shared_dacpac_repository_path: None,
            build_before_script_creation: true,
            create_documentation_with_script_creation: true,
            comment_out_unnamed_default_constraint_drops: false,
            replace_unnamed_default_constraint_drops: false,
            remove_sql_cmd_statements: false,
            delete_refactorlog_after_versioned_script_generation: false,
            delete_latest_after_versioned_script_generation: true,
            version_pattern: format!("{MAJOR_KEYWORD}.{MINOR_KEYWORD}.{BUILD_KEYWORD}"),
            track_dacpac_version: false,
            custom_header: None,
            custom_footer: None,
        }
    }
}

/// Identifies one configuration field in change notifications and errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigurationField {
    ArtifactsPath,
    PublishProfilePath,
    SharedDacpacRepositoryPath,
    BuildBeforeScriptCreation,
    CreateDocumentationWithScriptCreation,
    CommentOutUnnamedDefaultConstraintDrops,
    ReplaceUnnamedDefaultConstraintDrops,
    RemoveSqlCmdStatements,
    DeleteRefactorlogAfterVersionedScriptGeneration,
    DeleteLatestAfterVersionedScriptGeneration,
    VersionPattern,
    TrackDacpacVersion,
    CustomHeader,
    CustomFooter,
}

impl ConfigurationField {
    /// All fields in declaration order
    pub const ALL: [ConfigurationField; 14] = [
        ConfigurationField::ArtifactsPath,
        ConfigurationField::PublishProfilePath,
        ConfigurationField::SharedDacpacRepositoryPath,
        ConfigurationField::BuildBeforeScriptCreation,
        ConfigurationField::CreateDocumentationWithScriptCreation,
        ConfigurationField::CommentOutUnnamedDefaultConstraintDrops,
        ConfigurationField::ReplaceUnnamedDefaultConstraintDrops,
        ConfigurationField::RemoveSqlCmdStatements,
        ConfigurationField::DeleteRefactorlogAfterVersionedScriptGeneration,
        ConfigurationField::DeleteLatestAfterVersionedScriptGeneration,
        ConfigurationField::VersionPattern,
        ConfigurationField::TrackDacpacVersion,
        ConfigurationField::CustomHeader,
        ConfigurationField::CustomFooter,
    ];

    /// Key used in the persisted JSON
    pub fn name(self) -> &'static str {
        match self {
            ConfigurationField::ArtifactsPath => "artifactsPath",
            ConfigurationField::PublishProfilePath => "publishProfilePath",
            ConfigurationField::SharedDacpacRepositoryPath => "sharedDacpacRepositoryPath",
            ConfigurationField::BuildBeforeScriptCreation => "buildBeforeScriptCreation",
            ConfigurationField::CreateDocumentationWithScriptCreation => {
                "createDocumentationWithScriptCreation"
            }
            ConfigurationField::CommentOutUnnamedDefaultConstraintDrops => {
                "commentOutUnnamedDefaultConstraintDrops"
            }
            ConfigurationField::ReplaceUnnamedDefaultConstraintDrops => {
                "replaceUnnamedDefaultConstraintDrops"
            }
            ConfigurationField::RemoveSqlCmdStatements => "removeSqlCmdStatements",
            ConfigurationField::DeleteRefactorlogAfterVersionedScriptGeneration => {
                "deleteRefactorlogAfterVersionedScriptGeneration"
            }
            ConfigurationField::DeleteLatestAfterVersionedScriptGeneration => {
                "deleteLatestAfterVersionedScriptGeneration"
            }
            ConfigurationField::VersionPattern => "versionPattern",
            ConfigurationField::TrackDacpacVersion => "trackDacpacVersion",
            ConfigurationField::CustomHeader => "customHeader",
            ConfigurationField::CustomFooter => "customFooter",
        }
    }
}

impl fmt::Display for ConfigurationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigurationField {
    type Err = CoreError;

    /// Accepts the JSON key in any case, with or without `-`/`_` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|field| field.name().to_lowercase() == wanted)
            .ok_or_else(|| CoreError::InvalidFieldValue {
                field: s.to_string(),
                reason: "unknown configuration field".to_string(),
            })
    }
}

/// Receives a notification after every effective configuration change
pub trait ConfigurationObserver: Send + Sync {
    /// Called after `field` changed and its validations were re-run
    fn configuration_changed(&self, model: &ConfigurationModel, field: ConfigurationField);
}

/// Handle returned by [`ConfigurationModel::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Validated, observable configuration
pub struct ConfigurationModel {
    settings: ConfigurationSettings,
    errors: BTreeMap<ConfigurationField, Vec<String>>,
    observers: Vec<(SubscriptionId, Arc<dyn ConfigurationObserver>)>,
    next_subscription: u64,
}

macro_rules! string_setter {
    ($(#[$meta:meta])* $name:ident, $slot:ident, $field:ident) => {
        $(#[$meta])*
        pub fn $name(&mut self, value: impl Into<String>) {
            let value = value.into();
            if self.settings.$slot == value {
                return;
            }
            self.settings.$slot = value;
            self.on_changed(ConfigurationField::$field);
        }
    };
}

macro_rules! value_setter {
    ($(#[$meta:meta])* $name:ident, $slot:ident, $field:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $name(&mut self, value: $ty) {
            if self.settings.$slot == value {
                return;
            }
            self.settings.$slot = value;
            self.on_changed(ConfigurationField::$field);
        }
    };
}

impl ConfigurationModel {
    /// Build a model from persisted settings, validating every field
    pub fn from_settings(settings: ConfigurationSettings) -> Self {
        let mut model = Self {
            settings,
            errors: BTreeMap::new(),
            observers: Vec::new(),
            next_subscription: 0,
        };
        model.validate_all();
        model
    }

    /// Current values
    pub fn settings(&self) -> &ConfigurationSettings {
        &self.settings
    }

    pub fn artifacts_path(&self) -> &str {
        &self.settings.artifacts_path
    }

    pub fn publish_profile_path(&self) -> &str {
        &self.settings.publish_profile_path
    }

    pub fn shared_dacpac_repository_path(&self) -> Option<&str> {
        self.settings.shared_dacpac_repository_path.as_deref()
    }

    pub fn build_before_script_creation(&self) -> bool {
        self.settings.build_before_script_creation
    }

    pub fn create_documentation_with_script_creation(&self) -> bool {
        self.settings.create_documentation_with_script_creation
    }

    pub fn comment_out_unnamed_default_constraint_drops(&self) -> bool {
        self.settings.comment_out_unnamed_default_constraint_drops
    }

    pub fn replace_unnamed_default_constraint_drops(&self) -> bool {
        self.settings.replace_unnamed_default_constraint_drops
    }

    pub fn remove_sql_cmd_statements(&self) -> bool {
        self.settings.remove_sql_cmd_statements
    }

    pub fn delete_refactorlog_after_versioned_script_generation(&self) -> bool {
        self.settings.delete_refactorlog_after_versioned_script_generation
    }

    pub fn delete_latest_after_versioned_script_generation(&self) -> bool {
        self.settings.delete_latest_after_versioned_script_generation
    }

    pub fn version_pattern(&self) -> &str {
        &self.settings.version_pattern
    }

    pub fn track_dacpac_version(&self) -> bool {
        self.settings.track_dacpac_version
    }

    pub fn custom_header(&self) -> Option<&str> {
        self.settings.custom_header.as_deref()
    }

    pub fn custom_footer(&self) -> Option<&str> {
        self.settings.custom_footer.as_deref()
    }

    /// True when the publish profile should be discovered automatically
    pub fn uses_single_publish_profile(&self) -> bool {
        self.settings.publish_profile_path == SINGLE_PROFILE_KEYWORD
    }

    string_setter!(set_artifacts_path, artifacts_path, ArtifactsPath);
    string_setter!(set_publish_profile_path, publish_profile_path, PublishProfilePath);
    value_setter!(
        set_shared_dacpac_repository_path,
        shared_dacpac_repository_path,
        SharedDacpacRepositoryPath,
        Option<String>
    );
    value_setter!(
        set_build_before_script_creation,
        build_before_script_creation,
        BuildBeforeScriptCreation,
        bool
    );
    value_setter!(
        set_create_documentation_with_script_creation,
        create_documentation_with_script_creation,
        CreateDocumentationWithScriptCreation,
        bool
    );
    value_setter!(
        /// Mutually exclusive with [`set_replace_unnamed_default_constraint_drops`](Self::set_replace_unnamed_default_constraint_drops)
        set_comment_out_unnamed_default_constraint_drops,
        comment_out_unnamed_default_constraint_drops,
        CommentOutUnnamedDefaultConstraintDrops,
        bool
    );
    value_setter!(
        /// Mutually exclusive with [`set_comment_out_unnamed_default_constraint_drops`](Self::set_comment_out_unnamed_default_constraint_drops)
        set_replace_unnamed_default_constraint_drops,
        replace_unnamed_default_constraint_drops,
        ReplaceUnnamedDefaultConstraintDrops,
        bool
    );
    value_setter!(
        set_remove_sql_cmd_statements,
        remove_sql_cmd_statements,
        RemoveSqlCmdStatements,
        bool
    );
    value_setter!(
        set_delete_refactorlog_after_versioned_script_generation,
        delete_refactorlog_after_versioned_script_generation,
        DeleteRefactorlogAfterVersionedScriptGeneration,
        bool
    );
    value_setter!(
        set_delete_latest_after_versioned_script_generation,
        delete_latest_after_versioned_script_generation,
        DeleteLatestAfterVersionedScriptGeneration,
        bool
    );
    string_setter!(set_version_pattern, version_pattern, VersionPattern);
    value_setter!(
        set_track_dacpac_version,
        track_dacpac_version,
        TrackDacpacVersion,
        bool
    );
    value_setter!(set_custom_header, custom_header, CustomHeader, Option<String>);
    value_setter!(set_custom_footer, custom_footer, CustomFooter, Option<String>);

    /// Set a field from user-entered text.
    ///
    /// Flags accept `true`/`false`, optional text treats an empty value as
    /// absent.
    pub fn set_field(&mut self, field: ConfigurationField, value: &str) -> CoreResult<()> {
        let flag = || -> CoreResult<bool> {
            value
                .trim()
                .parse::<bool>()
                .map_err(|_| CoreError::InvalidFieldValue {
                    field: field.name().to_string(),
                    reason: format!("expected true or false, got '{value}'"),
                })
        };
        let optional = || Some(value.to_string()).filter(|v| !v.is_empty());

        match field {
            ConfigurationField::ArtifactsPath => self.set_artifacts_path(value),
            ConfigurationField::PublishProfilePath => self.set_publish_profile_path(value),
            ConfigurationField::SharedDacpacRepositoryPath => {
                self.set_shared_dacpac_repository_path(optional())
            }
            ConfigurationField::BuildBeforeScriptCreation => {
                self.set_build_before_script_creation(flag()?)
            }
            ConfigurationField::CreateDocumentationWithScriptCreation => {
                self.set_create_documentation_with_script_creation(flag()?)
            }
            ConfigurationField::CommentOutUnnamedDefaultConstraintDrops => {
                self.set_comment_out_unnamed_default_constraint_drops(flag()?)
            }
            ConfigurationField::ReplaceUnnamedDefaultConstraintDrops => {
                self.set_replace_unnamed_default_constraint_drops(flag()?)
            }
            ConfigurationField::RemoveSqlCmdStatements => {
                self.set_remove_sql_cmd_statements(flag()?)
            }
            ConfigurationField::DeleteRefactorlogAfterVersionedScriptGeneration => {
                self.set_delete_refactorlog_after_versioned_script_generation(flag()?)
            }
            ConfigurationField::DeleteLatestAfterVersionedScriptGeneration => {
                self.set_delete_latest_after_versioned_script_generation(flag()?)
            }
            ConfigurationField::VersionPattern => self.set_version_pattern(value),
            ConfigurationField::TrackDacpacVersion => self.set_track_dacpac_version(flag()?),
            ConfigurationField::CustomHeader => self.set_custom_header(optional()),
            ConfigurationField::CustomFooter => self.set_custom_footer(optional()),
        }
        Ok(())
    }

    /// Re-run every validation rule and republish all error sets
    pub fn validate_all(&mut self) {
        for rule in ValidationRule::ALL {
            self.apply_rule(rule);
        }
    }

    /// Errors currently attached to a field
    pub fn errors(&self, field: ConfigurationField) -> &[String] {
        self.errors.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    /// All errors, keyed by field
    pub fn all_errors(&self) -> &BTreeMap<ConfigurationField, Vec<String>> {
        &self.errors
    }

    /// True when any field carries at least one error
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Flattened `field: message` list, in field order
    pub fn error_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{field}: {m}")))
            .collect()
    }

    /// Register an observer for change notifications
    pub fn subscribe(&mut self, observer: Arc<dyn ConfigurationObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove an observer; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    fn on_changed(&mut self, field: ConfigurationField) {
        for rule in ValidationRule::ALL {
            if rule.depends_on(field) {
                self.apply_rule(rule);
            }
        }
        for (_, observer) in &self.observers {
            observer.configuration_changed(self, field);
        }
    }

    fn apply_rule(&mut self, rule: ValidationRule) {
        let errors = rule.evaluate(&self.settings);
        for field in rule.governed_fields() {
            if errors.is_empty() {
                self.errors.remove(field);
            } else {
                self.errors.insert(*field, errors.clone());
            }
        }
    }
}

impl Default for ConfigurationModel {
    /// The documented default configuration, free of validation errors
    fn default() -> Self {
        Self::from_settings(ConfigurationSettings::default())
    }
}

impl Clone for ConfigurationModel {
    /// Independent copy: same values, freshly computed errors, no observers
    fn clone(&self) -> Self {
        Self::from_settings(self.settings.clone())
    }
}

impl PartialEq for ConfigurationModel {
    fn eq(&self, other: &Self) -> bool {
        self.settings == other.settings
    }
}

impl Eq for ConfigurationModel {}

impl fmt::Debug for ConfigurationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigurationModel")
            .field("settings", &self.settings)
            .field("errors", &self.errors)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl From<ConfigurationSettings> for ConfigurationModel {
    fn from(settings: ConfigurationSettings) -> Self {
        Self::from_settings(settings)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
