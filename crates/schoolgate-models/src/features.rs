//! Gated features and the actions permitted on them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Internal routing key that must resolve to [`FeatureKey::Profile`].
pub const PROFILE_ALIAS: &str = "__Profile";

/// A top-level console page subject to view/create/edit/delete gating.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum FeatureKey {
    Dashboard,
    Student,
    Teacher,
    Staff,
    Parent,
    Class,
    Subject,
    Attendance,
    Assignment,
    Exam,
    Result,
    Fees,
    Library,
    Notice,
    Timetable,
    Settings,
    Profile,
}

impl FeatureKey {
    /// Every feature, in render order.
    pub const ALL: [FeatureKey; 17] = [
        FeatureKey::Dashboard,
        FeatureKey::Student,
        FeatureKey::Teacher,
        FeatureKey::Staff,
        FeatureKey::Parent,
        FeatureKey::Class,
        FeatureKey::Subject,
        FeatureKey::Attendance,
        FeatureKey::Assignment,
        FeatureKey::Exam,
        FeatureKey::Result,
        FeatureKey::Fees,
        FeatureKey::Library,
        FeatureKey::Notice,
        FeatureKey::Timetable,
        FeatureKey::Settings,
        FeatureKey::Profile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKey::Dashboard => "Dashboard",
            FeatureKey::Student => "Student",
            FeatureKey::Teacher => "Teacher",
            FeatureKey::Staff => "Staff",
            FeatureKey::Parent => "Parent",
            FeatureKey::Class => "Class",
            FeatureKey::Subject => "Subject",
            FeatureKey::Attendance => "Attendance",
            FeatureKey::Assignment => "Assignment",
            FeatureKey::Exam => "Exam",
            FeatureKey::Result => "Result",
            FeatureKey::Fees => "Fees",
            FeatureKey::Library => "Library",
            FeatureKey::Notice => "Notice",
            FeatureKey::Timetable => "Timetable",
            FeatureKey::Settings => "Settings",
            FeatureKey::Profile => "Profile",
        }
    }

    /// Resolve a raw feature key as used by routes and stored payloads.
    ///
    /// The `__Profile` routing alias maps to [`FeatureKey::Profile`]. Anything
    /// outside the catalog yields `None`.
    pub fn normalize(raw: &str) -> Option<FeatureKey> {
        let raw = if raw == PROFILE_ALIAS { "Profile" } else { raw };

        FeatureKey::ALL.into_iter().find(|f| f.as_str() == raw)
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureKey::normalize(s).ok_or_else(|| format!("Unknown feature: {}", s))
    }
}

/// One of the four gated actions on a feature.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::View, Action::Create, Action::Edit, Action::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "view" => Ok(Action::View),
            "create" => Ok(Action::Create),
            "edit" => Ok(Action::Edit),
            "delete" => Ok(Action::Delete),
            _ => Err(format!("Unknown action: {}", s)),
        }
    }
}

/// Four independent flags for one (role, feature) pair.
///
/// No consistency between flags is enforced: `edit` without `view` is
/// representable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct FeaturePermission {
    pub view: bool,
    pub create: bool,
    pub edit: bool,
    pub delete: bool,
}

impl FeaturePermission {
    pub const NONE: FeaturePermission = FeaturePermission::uniform(false);
    pub const FULL: FeaturePermission = FeaturePermission::uniform(true);
    pub const VIEW_ONLY: FeaturePermission = FeaturePermission {
        view: true,
        create: false,
        edit: false,
        delete: false,
    };

    pub const fn uniform(value: bool) -> Self {
        Self {
            view: value,
            create: value,
            edit: value,
            delete: value,
        }
    }

    pub fn get(&self, action: Action) -> bool {
        match action {
            Action::View => self.view,
            Action::Create => self.create,
            Action::Edit => self.edit,
            Action::Delete => self.delete,
        }
    }

    pub fn set(&mut self, action: Action, value: bool) {
        match action {
            Action::View => self.view = value,
            Action::Create => self.create = value,
            Action::Edit => self.edit = value,
            Action::Delete => self.delete = value,
        }
    }

    /// Builder-style variant of [`FeaturePermission::set`].
    pub fn with(mut self, action: Action, value: bool) -> Self {
        self.set(action, value);
        self
    }
}
