//! The shipped default configuration.
//!
//! Used when nothing is stored yet, when a stored part is malformed, as the
//! merge base for registries, and as the target of "restore defaults".

use schoolgate_models::{Action, FeatureKey, FeaturePermission, RegistryName, RoleKey};

use crate::config::{AccessConfig, Registries};
use crate::matrix::PermissionMatrix;

/// Defaults are plain configuration data; hosts and tests may supply their own.
pub type AccessDefaults = AccessConfig;

const TEACHER_VIEW: &[FeatureKey] = &[
    FeatureKey::Student,
    FeatureKey::Class,
    FeatureKey::Subject,
    FeatureKey::Attendance,
    FeatureKey::Assignment,
    FeatureKey::Exam,
    FeatureKey::Result,
    FeatureKey::Notice,
    FeatureKey::Timetable,
];
const TEACHER_WRITE: &[FeatureKey] = &[
    FeatureKey::Attendance,
    FeatureKey::Assignment,
    FeatureKey::Exam,
    FeatureKey::Result,
];

const STUDENT_VIEW: &[FeatureKey] = &[
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
];

const PARENT_VIEW: &[FeatureKey] = &[
    FeatureKey::Student,
    FeatureKey::Attendance,
    FeatureKey::Assignment,
    FeatureKey::Exam,
    FeatureKey::Result,
    FeatureKey::Fees,
    FeatureKey::Notice,
    FeatureKey::Timetable,
];

const STAFF_VIEW: &[FeatureKey] = &[
    FeatureKey::Student,
    FeatureKey::Teacher,
    FeatureKey::Staff,
    FeatureKey::Parent,
    FeatureKey::Class,
    FeatureKey::Attendance,
    FeatureKey::Fees,
    FeatureKey::Notice,
    FeatureKey::Timetable,
];
const STAFF_WRITE: &[FeatureKey] = &[FeatureKey::Attendance, FeatureKey::Notice];

const LIBRARIAN_VIEW: &[FeatureKey] = &[FeatureKey::Notice, FeatureKey::Timetable];

/// Roles that do not manage the school and so do not see management chrome.
const NON_MANAGING: &[RoleKey] = &[RoleKey::Student, RoleKey::Parent, RoleKey::Librarian];

const STUDENT_MANAGEMENT_KEYS: &[&str] =
    &["addStudent", "importStudents", "bulkActions", "promoteStudents"];

fn grant(matrix: &mut PermissionMatrix, role: RoleKey, features: &[FeatureKey], actions: &[Action]) {
    for feature in features {
        for action in actions {
            matrix.set(role, *feature, *action, true);
        }
    }
}

/// The shipped permission matrix.
pub fn permissions() -> PermissionMatrix {
    let mut matrix = PermissionMatrix::new();

    matrix.set_all_for_role(RoleKey::SuperAdmin, true);
    matrix.set_all_for_role(RoleKey::Admin, true);

    grant(&mut matrix, RoleKey::Teacher, TEACHER_VIEW, &[Action::View]);
    grant(&mut matrix, RoleKey::Teacher, TEACHER_WRITE, &[Action::Create, Action::Edit]);

    grant(&mut matrix, RoleKey::Student, STUDENT_VIEW, &[Action::View]);
    grant(&mut matrix, RoleKey::Parent, PARENT_VIEW, &[Action::View]);

    grant(&mut matrix, RoleKey::Staff, STAFF_VIEW, &[Action::View]);
    grant(&mut matrix, RoleKey::Staff, STAFF_WRITE, &[Action::Create, Action::Edit]);

    matrix.set_permission(RoleKey::Librarian, FeatureKey::Library, FeaturePermission::FULL);
    grant(&mut matrix, RoleKey::Librarian, LIBRARIAN_VIEW, &[Action::View]);

    for role in RoleKey::ALL {
        grant(
            &mut matrix,
            role,
            &[FeatureKey::Dashboard, FeatureKey::Profile],
            &[Action::View],
        );
    }

    matrix
}

/// The shipped registries: everything visible except management chrome for
/// roles that do not manage.
pub fn registries() -> Registries {
    let mut registries = Registries::all_visible();

    for role in NON_MANAGING {
        for key in Registries::catalog(RegistryName::SettingsControls, *role) {
            registries.set(RegistryName::SettingsControls, *role, key, false);
        }
    }

    for role in [RoleKey::Teacher, RoleKey::Staff] {
        for key in ["rolePermissions", "backupRestore"] {
            registries.set(RegistryName::SettingsControls, role, key, false);
        }
    }

    for role in [RoleKey::Student, RoleKey::Parent] {
        for key in STUDENT_MANAGEMENT_KEYS {
            registries.set(RegistryName::StudentsControls, role, key, false);
        }
    }

    for role in RoleKey::ALL {
        if !role.can_administer_access() {
            registries.set(RegistryName::TeachersControls, role, "salaryDetails", false);
        }
    }

    registries
}

/// The complete shipped configuration.
pub fn shipped() -> AccessDefaults {
    AccessConfig::new(permissions(), registries())
}
