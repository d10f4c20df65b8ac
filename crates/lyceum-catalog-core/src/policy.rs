//! Authorization policy
//!
//! Two non-exclusive capabilities: owner (created the resource) and
//! moderator (elevated role). Per action:
//! - create: moderators forbidden, any other authenticated user allowed
//! - read/update: moderator OR owner
//! - delete: owner only, moderators explicitly excluded

use uuid::Uuid;

use lyceum_types::Actor;

use crate::CatalogError;

fn is_owner(actor: &Actor, owner_id: Option<Uuid>) -> bool {
    owner_id == Some(actor.user_id.0)
}

/// Moderators may not create catalog resources
pub fn ensure_can_create(actor: &Actor) -> Result<(), CatalogError> {
    if actor.is_moderator() {
        return Err(CatalogError::Forbidden("moderators may not create"));
    }
    Ok(())
}

/// Reading a single resource requires moderator or owner
pub fn ensure_can_view(actor: &Actor, owner_id: Option<Uuid>) -> Result<(), CatalogError> {
    if actor.is_moderator() || is_owner(actor, owner_id) {
        return Ok(());
    }
    Err(CatalogError::Forbidden("moderator or owner required"))
}

/// Updating requires moderator or owner
pub fn ensure_can_update(actor: &Actor, owner_id: Option<Uuid>) -> Result<(), CatalogError> {
    ensure_can_view(actor, owner_id)
}

/// Deleting requires the owner; moderators are excluded
pub fn ensure_can_delete(actor: &Actor, owner_id: Option<Uuid>) -> Result<(), CatalogError> {
    if is_owner(actor, owner_id) {
        return Ok(());
    }
    Err(CatalogError::Forbidden("owner required"))
}
