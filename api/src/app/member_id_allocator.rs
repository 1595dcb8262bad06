//! Member ID allocation
//!
//! Issues the next sequential ID in a namespace by scanning the record files
//! already stored there. Nothing here locks: callers that need distinct IDs
//! under concurrency must serialize allocation and the write that follows.

use crate::app::fee_config::{MEMBER_ID_WIDTH, RECORD_EXTENSION};
use crate::domain::entities::MemberId;
use crate::domain::ports::{BlobEntry, BlobStore};
use crate::error::{DomainError, StorageError};

/// Sequence number of a record file named `<prefix><digits>.txt`
fn record_sequence(name: &str, prefix: &str) -> Option<u64> {
    MemberId::from(name.strip_suffix(RECORD_EXTENSION)?).sequence(prefix)
}

/// The ID after the highest one present in `entries`
///
/// Entries that are not record files for `prefix` are ignored. `None` when
/// the highest sequence has no successor.
pub fn next_member_id_from(entries: &[BlobEntry], prefix: &str) -> Option<MemberId> {
    let next = match entries
        .iter()
        .filter(|entry| entry.is_file())
        .filter_map(|entry| record_sequence(&entry.name, prefix))
        .max()
    {
        Some(highest) => highest.checked_add(1)?,
        None => 1,
    };

    Some(MemberId::from_sequence(prefix, next, MEMBER_ID_WIDTH))
}

/// Allocate the next member ID in `namespace`, creating it if missing
pub async fn allocate_member_id<BS>(
    store: &BS,
    namespace: &str,
    prefix: &str,
) -> Result<MemberId, DomainError>
where
    BS: BlobStore + ?Sized,
{
    match store.list(namespace).await {
        Ok(entries) => next_member_id_from(&entries, prefix)
            .ok_or_else(|| DomainError::MemberIdsExhausted(prefix.to_string())),
        Err(StorageError::NamespaceNotFound(_)) => {
            tracing::info!(namespace = %namespace, "Member namespace missing, creating it");
            store.create_namespace(namespace).await?;
            Ok(MemberId::from_sequence(prefix, 1, MEMBER_ID_WIDTH))
        }
        Err(e) => Err(e.into()),
    }
}
