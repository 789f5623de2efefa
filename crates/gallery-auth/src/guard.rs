//! Ownership gate for mutations.

use uuid::Uuid;

use gallery_core::error::AppError;

/// Decides whether an identity may mutate a resource.
///
/// Callers must confirm the resource exists (reporting `NotFound`
/// otherwise) before asking the guard, so a missing resource is never
/// reported as `Forbidden`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnershipGuard;

impl OwnershipGuard {
    /// True iff the acting identity owns the resource.
    pub fn can_mutate(acting_user: Uuid, owner: Uuid) -> bool {
        acting_user == owner
    }

    /// `Forbidden` unless the acting identity owns the resource.
    pub fn ensure_owner(acting_user: Uuid, owner: Uuid, resource: &str) -> Result<(), AppError> {
        if Self::can_mutate(acting_user, owner) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "You do not have permission to modify this {resource}"
            )))
        }
    }
}
