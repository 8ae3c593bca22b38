//! The two ways entities are read back from the ledger.
//!
//! - [`strict_get`] is used for single-entity lookups. Absent, undecodable
//!   and husk records (those failing [`Entity::resolves_as`]) all surface as
//!   `NotFound`.
//! - [`tolerant_scan`] is used for bulk listings. Records that fail to decode
//!   are skipped and the scan carries on; only ledger failures abort it.

use roster_store::LedgerState;
use roster_types::{Entity, KeyRange};

use crate::error::{RegistryError, RegistryResult};

/// Fetch and decode one entity, requiring it to be present.
pub fn strict_get<E: Entity, S: LedgerState + ?Sized>(state: &S, id: &str) -> RegistryResult<E> {
    let bytes = state
        .get(id)?
        .ok_or_else(|| RegistryError::not_found(E::KIND, id))?;

    let entity = match E::from_bytes(&bytes) {
        Ok(entity) => entity,
        Err(e) => {
            tracing::debug!(kind = E::KIND.as_str(), id, error = %e, "record does not decode");
            return Err(RegistryError::not_found(E::KIND, id));
        }
    };

    if !entity.resolves_as(id) {
        return Err(RegistryError::not_found(E::KIND, id));
    }
    Ok(entity)
}

/// Returns `true` if `id` currently resolves to an entity of kind `E`.
pub fn exists<E: Entity, S: LedgerState + ?Sized>(state: &S, id: &str) -> RegistryResult<bool> {
    match strict_get::<E, S>(state, id) {
        Ok(_) => Ok(true),
        Err(RegistryError::NotFound { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Decode every record in `range`, skipping those that fail to decode.
pub fn tolerant_scan<E: Entity, S: LedgerState + ?Sized>(
    state: &S,
    range: &KeyRange,
) -> RegistryResult<Vec<E>> {
    let mut entities = Vec::new();
    for row in state.range_scan(&range.start, &range.end)? {
        let row = row?;
        match E::from_bytes(&row.value) {
            Ok(entity) => entities.push(entity),
            Err(e) => {
                tracing::debug!(
                    kind = E::KIND.as_str(),
                    key = %row.key,
                    error = %e,
                    "skipping record"
                );
            }
        }
    }
    Ok(entities)
}
