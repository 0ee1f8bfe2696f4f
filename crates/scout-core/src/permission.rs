//! # Permission Checks
//!
//! Access checks and the per-action permission echo, expressed over the
//! [`PermissionGate`] collaborator. The gate itself lives at the edge
//! (the app builds one per request); this module only asks questions.

use crate::catalog::PermissionGate;
use crate::types::{Action, Permissions, Principal};

/// Whether the caller may use the product-search surface at all.
///
/// Guests are always denied; everyone else needs read access to products.
pub fn has_app_access(gate: &dyn PermissionGate) -> bool {
    if gate.principal().is_guest() {
        return false;
    }
    gate.can(Action::Read)
}

/// The caller's per-action permission echo, as reported by the
/// permissions endpoint.
pub fn user_permissions(gate: &dyn PermissionGate) -> Permissions {
    Permissions {
        can_read_products: gate.can(Action::Read),
        can_write_products: gate.can(Action::Write),
        can_create_products: gate.can(Action::Create),
        can_delete_products: gate.can(Action::Delete),
    }
}

/// The caller's identity, for logging and the permissions endpoint.
pub fn current_principal(gate: &dyn PermissionGate) -> Principal {
    gate.principal()
}
