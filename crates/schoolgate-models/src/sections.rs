//! Section-visibility registries and their key catalogs.
//!
//! A section is a UI fragment inside a page (a dashboard panel, an "Add"
//! button) that is only ever shown or hidden. Sections are grouped into five
//! named registries; each registry has its own closed key enum implementing
//! [`SectionKey`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::roles::RoleKey;

/// The five section-visibility registries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum RegistryName {
    DashboardControls,
    SettingsControls,
    StudentsControls,
    TeachersControls,
    AssignmentsControls,
}

impl RegistryName {
    pub const ALL: [RegistryName; 5] = [
        RegistryName::DashboardControls,
        RegistryName::SettingsControls,
        RegistryName::StudentsControls,
        RegistryName::TeachersControls,
        RegistryName::AssignmentsControls,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryName::DashboardControls => "dashboardControls",
            RegistryName::SettingsControls => "settingsControls",
            RegistryName::StudentsControls => "studentsControls",
            RegistryName::TeachersControls => "teachersControls",
            RegistryName::AssignmentsControls => "assignmentsControls",
        }
    }
}

impl fmt::Display for RegistryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistryName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RegistryName::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("Unknown registry: {}", s))
    }
}

/// A key inside one registry's catalog.
pub trait SectionKey:
    Copy + Ord + Hash + fmt::Debug + Serialize + Send + Sync + 'static
{
    /// The registry this key type belongs to.
    const REGISTRY: RegistryName;

    /// Wire name of the key (`"feesTracking"`).
    fn as_str(&self) -> &'static str;

    /// Resolve a wire name; `None` for keys outside the catalog.
    fn parse(raw: &str) -> Option<Self>;

    /// The keys `role` can toggle in this registry.
    fn catalog_for(role: RoleKey) -> &'static [Self];
}

/// Declares a section key enum with its wire names.
macro_rules! section_keys {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $key:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
            ToSchema,
        )]
        pub enum $name {
            $(
                #[serde(rename = $key)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            fn key_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }

            fn from_key(raw: &str) -> Option<Self> {
                match raw {
                    $($key => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

section_keys! {
    /// Dashboard panels. The catalog differs per role.
    DashboardSection {
        StudentCount => "studentCount",
        TeacherCount => "teacherCount",
        StaffCount => "staffCount",
        ParentCount => "parentCount",
        FeesTracking => "feesTracking",
        AttendanceChart => "attendanceChart",
        NoticeBoard => "noticeBoard",
        UpcomingExams => "upcomingExams",
        RecentAdmissions => "recentAdmissions",
        Calendar => "calendar",
        MyClasses => "myClasses",
        AssignmentsDue => "assignmentsDue",
        MyAttendance => "myAttendance",
        MyResults => "myResults",
        FeesStatus => "feesStatus",
        LibraryStats => "libraryStats",
        OverdueBooks => "overdueBooks",
        ChildAttendance => "childAttendance",
        ChildResults => "childResults",
    }
}

section_keys! {
    /// Panels of the settings page.
    SettingsSection {
        GeneralSettings => "generalSettings",
        SchoolProfile => "schoolProfile",
        AcademicYear => "academicYear",
        GradingSystem => "gradingSystem",
        FeeStructure => "feeStructure",
        NotificationSettings => "notificationSettings",
        RolePermissions => "rolePermissions",
        BackupRestore => "backupRestore",
        ThemeSettings => "themeSettings",
        LanguageSettings => "languageSettings",
    }
}

section_keys! {
    /// Controls on the students page.
    StudentsSection {
        AddStudent => "addStudent",
        ImportStudents => "importStudents",
        ExportStudents => "exportStudents",
        StudentFilters => "studentFilters",
        BulkActions => "bulkActions",
        PromoteStudents => "promoteStudents",
        PrintIdCard => "printIdCard",
        StudentQrCode => "studentQrCode",
    }
}

section_keys! {
    /// Controls on the teachers page.
    TeachersSection {
        AddTeacher => "addTeacher",
        ImportTeachers => "importTeachers",
        ExportTeachers => "exportTeachers",
        TeacherFilters => "teacherFilters",
        AssignClasses => "assignClasses",
        SalaryDetails => "salaryDetails",
    }
}

section_keys! {
    /// Controls on the assignments page.
    AssignmentsSection {
        CreateAssignment => "createAssignment",
        Submissions => "submissions",
        Grading => "grading",
        Attachments => "attachments",
        DueDateReminders => "dueDateReminders",
        ExportAssignments => "exportAssignments",
    }
}

const ADMIN_DASHBOARD: &[DashboardSection] = &[
    DashboardSection::StudentCount,
    DashboardSection::TeacherCount,
    DashboardSection::StaffCount,
    DashboardSection::ParentCount,
    DashboardSection::FeesTracking,
    DashboardSection::AttendanceChart,
    DashboardSection::NoticeBoard,
    DashboardSection::UpcomingExams,
    DashboardSection::RecentAdmissions,
    DashboardSection::Calendar,
];

const TEACHER_DASHBOARD: &[DashboardSection] = &[
    DashboardSection::MyClasses,
    DashboardSection::AttendanceChart,
    DashboardSection::AssignmentsDue,
    DashboardSection::UpcomingExams,
    DashboardSection::NoticeBoard,
    DashboardSection::Calendar,
];

const STUDENT_DASHBOARD: &[DashboardSection] = &[
    DashboardSection::MyAttendance,
    DashboardSection::AssignmentsDue,
    DashboardSection::UpcomingExams,
    DashboardSection::MyResults,
    DashboardSection::FeesStatus,
    DashboardSection::NoticeBoard,
    DashboardSection::Calendar,
];

const STAFF_DASHBOARD: &[DashboardSection] = &[
    DashboardSection::StaffCount,
    DashboardSection::AttendanceChart,
    DashboardSection::NoticeBoard,
    DashboardSection::Calendar,
];

const LIBRARIAN_DASHBOARD: &[DashboardSection] = &[
    DashboardSection::LibraryStats,
    DashboardSection::OverdueBooks,
    DashboardSection::NoticeBoard,
    DashboardSection::Calendar,
];

const PARENT_DASHBOARD: &[DashboardSection] = &[
    DashboardSection::ChildAttendance,
    DashboardSection::ChildResults,
    DashboardSection::FeesStatus,
    DashboardSection::NoticeBoard,
    DashboardSection::Calendar,
];

impl SectionKey for DashboardSection {
    const REGISTRY: RegistryName = RegistryName::DashboardControls;

    fn as_str(&self) -> &'static str {
        self.key_str()
    }

    fn parse(raw: &str) -> Option<Self> {
        Self::from_key(raw)
    }

    fn catalog_for(role: RoleKey) -> &'static [Self] {
        match role {
            RoleKey::SuperAdmin | RoleKey::Admin => ADMIN_DASHBOARD,
            RoleKey::Teacher => TEACHER_DASHBOARD,
            RoleKey::Student => STUDENT_DASHBOARD,
            RoleKey::Staff => STAFF_DASHBOARD,
            RoleKey::Librarian => LIBRARIAN_DASHBOARD,
            RoleKey::Parent => PARENT_DASHBOARD,
        }
    }
}

impl SectionKey for SettingsSection {
    const REGISTRY: RegistryName = RegistryName::SettingsControls;

    fn as_str(&self) -> &'static str {
        self.key_str()
    }

    fn parse(raw: &str) -> Option<Self> {
        Self::from_key(raw)
    }

    fn catalog_for(_role: RoleKey) -> &'static [Self] {
        Self::ALL
    }
}

impl SectionKey for StudentsSection {
    const REGISTRY: RegistryName = RegistryName::StudentsControls;

    fn as_str(&self) -> &'static str {
        self.key_str()
    }

    fn parse(raw: &str) -> Option<Self> {
        Self::from_key(raw)
    }

    fn catalog_for(_role: RoleKey) -> &'static [Self] {
        Self::ALL
    }
}

impl SectionKey for TeachersSection {
    const REGISTRY: RegistryName = RegistryName::TeachersControls;

    fn as_str(&self) -> &'static str {
        self.key_str()
    }

    fn parse(raw: &str) -> Option<Self> {
        Self::from_key(raw)
    }

    fn catalog_for(_role: RoleKey) -> &'static [Self] {
        Self::ALL
    }
}

impl SectionKey for AssignmentsSection {
    const REGISTRY: RegistryName = RegistryName::AssignmentsControls;

    fn as_str(&self) -> &'static str {
        self.key_str()
    }

    fn parse(raw: &str) -> Option<Self> {
        Self::from_key(raw)
    }

    fn catalog_for(_role: RoleKey) -> &'static [Self] {
        Self::ALL
    }
}
