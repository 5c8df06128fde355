//! Resolving which vault secret belongs to which identity

use crate::core::{IdentityId, Result, RotationError, SecretRecord};
use std::collections::BTreeSet;
use tracing::debug;

/// Find the single secret tagged for the given identity
///
/// Zero matches is not an error: the caller treats it as a skip, since the
/// vault may simply not have a secret provisioned for the identity yet. Two
/// or more matches mean ambiguous ownership and abort the rotation for this
/// identity; the engine never guesses which secret to rotate.
pub fn find_by_identity<'a>(
    id: &IdentityId,
    secrets: &'a [SecretRecord],
) -> Result<Option<&'a SecretRecord>> {
    let matches: Vec<&SecretRecord> = secrets.iter().filter(|s| s.is_tagged_for(id)).collect();

    match matches.as_slice() {
        [] => {
            debug!(object_id = %id, "no secret carries the identity's linkage tag");
            Ok(None)
        }
        [secret] => {
            debug!(object_id = %id, secret = %secret.name, "resolved owning secret");
            Ok(Some(secret))
        }
        many => Err(RotationError::AmbiguousOwnership {
            object_id: id.to_string(),
            secret_names: many.iter().map(|s| s.name.clone()).collect(),
        }),
    }
}

/// All distinct object ids claimed by linkage tags across the given secrets
///
/// Raw tag values, deduplicated and ordered; validation happens at the
/// caller so invalid values can still be reported per entry.
pub fn tagged_identity_ids(secrets: &[SecretRecord]) -> BTreeSet<String> {
    secrets
        .iter()
        .filter_map(|s| s.application_object_id())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{APPLICATION_OBJECT_ID_TAG, SecretValue};

    fn secret(name: &str, owner: Option<&str>) -> SecretRecord {
        let mut tags = std::collections::BTreeMap::new();
        if let Some(owner) = owner {
            tags.insert(APPLICATION_OBJECT_ID_TAG.to_string(), owner.to_string());
        }
        SecretRecord {
            name: name.to_string(),
            value: SecretValue::new("opaque"),
            tags,
        }
    }

    #[test]
    fn zero_matches_is_none() {
        let id = IdentityId::new("app-1").unwrap();
        let secrets = [secret("sec-1", Some("app-2")), secret("sec-2", None)];
        assert!(find_by_identity(&id, &secrets).unwrap().is_none());
    }

    #[test]
    fn exactly_one_match_resolves() {
        let id = IdentityId::new("app-1").unwrap();
        let secrets = [secret("sec-1", Some("app-1")), secret("sec-2", Some("app-2"))];
        let found = find_by_identity(&id, &secrets).unwrap().unwrap();
        assert_eq!(found.name, "sec-1");
    }

    #[test]
    fn two_matches_is_ambiguous() {
        let id = IdentityId::new("app-1").unwrap();
        let secrets = [secret("sec-1", Some("app-1")), secret("sec-2", Some("app-1"))];
        let err = find_by_identity(&id, &secrets).unwrap_err();
        match err {
            RotationError::AmbiguousOwnership { secret_names, .. } => {
                assert_eq!(secret_names, ["sec-1", "sec-2"]);
            }
            other => panic!("expected ambiguous ownership, got {other}"),
        }
    }

    #[test]
    fn tagged_ids_are_deduplicated_and_ordered() {
        let secrets = [
            secret("sec-1", Some("app-b")),
            secret("sec-2", Some("app-a")),
            secret("sec-3", Some("app-b")),
            secret("sec-4", None),
        ];
        let ids: Vec<String> = tagged_identity_ids(&secrets).into_iter().collect();
        assert_eq!(ids, ["app-a", "app-b"]);
    }
}
