//! Static RBAC permission table and evaluator.
//!
//! This module centralizes the role/permission grammar used by every
//! privileged endpoint. Keeping the checks in one place avoids
//! privilege-escalation drift across handlers.
//!
//! # Key invariants and assumptions
//! - The table is a compile-time constant; role assignments cannot change at
//!   runtime.
//! - `Permission` is a closed enumeration, so unknown permission tokens are
//!   unrepresentable and every lookup is total: evaluation returns a bool and
//!   never fails.
use crate::model::Role;

/// Action a role may be allowed to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    IdeasCreate,
    IdeasRead,
    IdeasUpdate,
    IdeasDelete,
    IdeasModerate,
    InterestsCreate,
    InterestsRead,
    InterestsDelete,
    UsersRead,
    UsersUpdate,
    UsersDelete,
    UsersManage,
    AdminAccess,
    AdminManageUsers,
    AdminModerateContent,
}

/// Baseline grants shared by Student, Alumni, Mentor, and Investor.
const MEMBER_PERMISSIONS: &[Permission] = &[
    Permission::IdeasCreate,
    Permission::IdeasRead,
    Permission::IdeasUpdate,
    Permission::InterestsCreate,
    Permission::InterestsRead,
    Permission::InterestsDelete,
    Permission::UsersRead,
];

const PROFESSOR_PERMISSIONS: &[Permission] = &[
    Permission::IdeasCreate,
    Permission::IdeasRead,
    Permission::IdeasUpdate,
    Permission::IdeasModerate,
    Permission::InterestsCreate,
    Permission::InterestsRead,
    Permission::InterestsDelete,
    Permission::UsersRead,
];

const EXTERNAL_PERMISSIONS: &[Permission] = &[
    Permission::IdeasRead,
    Permission::InterestsCreate,
    Permission::InterestsRead,
    Permission::UsersRead,
];

const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::IdeasCreate,
    Permission::IdeasRead,
    Permission::IdeasUpdate,
    Permission::IdeasDelete,
    Permission::IdeasModerate,
    Permission::InterestsCreate,
    Permission::InterestsRead,
    Permission::InterestsDelete,
    Permission::UsersRead,
    Permission::UsersUpdate,
    Permission::UsersDelete,
    Permission::UsersManage,
    Permission::AdminAccess,
    Permission::AdminManageUsers,
    Permission::AdminModerateContent,
];

/// Grants for one role.
pub fn role_permissions(role: Role) -> &'static [Permission] {
    match role {
        Role::Student | Role::Alumni | Role::Mentor | Role::Investor => MEMBER_PERMISSIONS,
        Role::Professor => PROFESSOR_PERMISSIONS,
        Role::External => EXTERNAL_PERMISSIONS,
        Role::Admin => ADMIN_PERMISSIONS,
    }
}

pub fn can(role: Role, permission: Permission) -> bool {
    role_permissions(role).contains(&permission)
}

pub fn can_any(role: Role, permissions: &[Permission]) -> bool {
    permissions.iter().any(|permission| can(role, *permission))
}

pub fn can_all(role: Role, permissions: &[Permission]) -> bool {
    permissions.iter().all(|permission| can(role, *permission))
}

pub fn is_admin(role: Role) -> bool {
    role == Role::Admin
}

pub fn can_moderate(role: Role) -> bool {
    can(role, Permission::IdeasModerate) || is_admin(role)
}

pub fn can_manage_users(role: Role) -> bool {
    can(role, Permission::UsersManage) || is_admin(role)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_PERMISSIONS: [Permission; 15] = [
        Permission::IdeasCreate,
        Permission::IdeasRead,
        Permission::IdeasUpdate,
        Permission::IdeasDelete,
        Permission::IdeasModerate,
        Permission::InterestsCreate,
        Permission::InterestsRead,
        Permission::InterestsDelete,
        Permission::UsersRead,
        Permission::UsersUpdate,
        Permission::UsersDelete,
        Permission::UsersManage,
        Permission::AdminAccess,
        Permission::AdminManageUsers,
        Permission::AdminModerateContent,
    ];

    fn expected(role: Role, permission: Permission) -> bool {
        use Permission::*;
        match role {
            Role::Student | Role::Alumni | Role::Mentor | Role::Investor => matches!(
                permission,
                IdeasCreate
                    | IdeasRead
                    | IdeasUpdate
                    | InterestsCreate
                    | InterestsRead
                    | InterestsDelete
                    | UsersRead
            ),
            Role::Professor => matches!(
                permission,
                IdeasCreate
                    | IdeasRead
                    | IdeasUpdate
                    | IdeasModerate
                    | InterestsCreate
                    | InterestsRead
                    | InterestsDelete
                    | UsersRead
            ),
            Role::External => matches!(
                permission,
                IdeasRead | InterestsCreate | InterestsRead | UsersRead
            ),
            Role::Admin => true,
        }
    }

    #[test]
    fn full_role_permission_matrix() {
        for role in Role::ALL {
            for permission in ALL_PERMISSIONS {
                assert_eq!(
                    can(role, permission),
                    expected(role, permission),
                    "role {:?} permission {:?}",
                    role,
                    permission
                );
            }
        }
    }

    #[test]
    fn can_any_and_can_all_combine_lookups() {
        assert!(can_any(
            Role::External,
            &[Permission::IdeasCreate, Permission::IdeasRead]
        ));
        assert!(!can_any(
            Role::External,
            &[Permission::IdeasCreate, Permission::IdeasUpdate]
        ));
        assert!(can_all(
            Role::Student,
            &[Permission::IdeasCreate, Permission::InterestsCreate]
        ));
        assert!(!can_all(
            Role::Student,
            &[Permission::IdeasCreate, Permission::IdeasModerate]
        ));
        assert!(can_any(Role::Admin, &[]) == false);
        assert!(can_all(Role::External, &[]));
    }

    #[test]
    fn derived_helpers() {
        assert!(is_admin(Role::Admin));
        assert!(!is_admin(Role::Professor));

        // Professors moderate through the table; admins through the override.
        assert!(can_moderate(Role::Professor));
        assert!(can_moderate(Role::Admin));
        assert!(!can_moderate(Role::Student));
        assert!(!can_moderate(Role::External));

        assert!(can_manage_users(Role::Admin));
        for role in Role::ALL {
            if role != Role::Admin {
                assert!(!can_manage_users(role));
            }
        }
    }
}
