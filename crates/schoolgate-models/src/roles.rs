//! Console roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// The closed set of roles a console user can hold.
///
/// Serialized with the variant name (`"SuperAdmin"`, `"Librarian"`, ...).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum RoleKey {
    SuperAdmin,
    Admin,
    Teacher,
    Student,
    Staff,
    Librarian,
    Parent,
}

impl RoleKey {
    /// Every role, in the order the administrative screen lists them.
    pub const ALL: [RoleKey; 7] = [
        RoleKey::SuperAdmin,
        RoleKey::Admin,
        RoleKey::Teacher,
        RoleKey::Student,
        RoleKey::Staff,
        RoleKey::Librarian,
        RoleKey::Parent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKey::SuperAdmin => "SuperAdmin",
            RoleKey::Admin => "Admin",
            RoleKey::Teacher => "Teacher",
            RoleKey::Student => "Student",
            RoleKey::Staff => "Staff",
            RoleKey::Librarian => "Librarian",
            RoleKey::Parent => "Parent",
        }
    }

    /// Whether this role may open an edit session over the access configuration.
    pub fn can_administer_access(&self) -> bool {
        matches!(self, RoleKey::SuperAdmin | RoleKey::Admin)
    }
}

impl fmt::Display for RoleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses both the wire form (`SuperAdmin`) and the snake_case form
/// (`super_admin`) used in tokens and CLI arguments.
impl FromStr for RoleKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match folded.as_str() {
            "superadmin" => Ok(RoleKey::SuperAdmin),
            "admin" => Ok(RoleKey::Admin),
            "teacher" => Ok(RoleKey::Teacher),
            "student" => Ok(RoleKey::Student),
            "staff" => Ok(RoleKey::Staff),
            "librarian" => Ok(RoleKey::Librarian),
            "parent" => Ok(RoleKey::Parent),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role_forms() {
        assert_eq!("SuperAdmin".parse::<RoleKey>(), Ok(RoleKey::SuperAdmin));
        assert_eq!("super_admin".parse::<RoleKey>(), Ok(RoleKey::SuperAdmin));
        assert_eq!("librarian".parse::<RoleKey>(), Ok(RoleKey::Librarian));
        assert!("principal".parse::<RoleKey>().is_err());
    }

    #[test]
    fn test_round_trip_through_display() {
        for role in RoleKey::ALL {
            assert_eq!(role.to_string().parse::<RoleKey>(), Ok(role));
        }
    }

    #[test]
    fn test_only_admins_administer_access() {
        let admins: Vec<RoleKey> = RoleKey::ALL
            .into_iter()
            .filter(RoleKey::can_administer_access)
            .collect();
        assert_eq!(admins, vec![RoleKey::SuperAdmin, RoleKey::Admin]);
    }

    #[test]
    fn test_serializes_with_variant_name() {
        let json = serde_json::to_string(&RoleKey::Parent).unwrap();
        assert_eq!(json, r#""Parent""#);
    }
}
