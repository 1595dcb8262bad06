//! Ledger service
//!
//! Member enrollment, payment recording and dues reporting over a blob store.
//! Every operation is one read-modify-write of a member's record file.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::app::fee_config::{MAX_NAME_LENGTH, MONTHLY_FEE, RECORD_EXTENSION};
use crate::app::member_id_allocator::allocate_member_id;
use crate::domain::entities::{
    compute_due, format_record, parse_record, DueRoster, DueStatus, MemberRecord, Month,
};
use crate::domain::ports::{blob_path, BlobStore};
use crate::error::{AppError, DomainError, StorageError};

/// Where and how member records are kept
#[derive(Debug, Clone)]
pub struct LedgerSettings {
    pub namespace: String,
    pub id_prefix: String,
    pub monthly_fee: u64,
}

/// A recorded payment and the record it produced
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub amount: u64,
    pub months_credited: u64,
    pub member: MemberRecord,
}

/// A member's record together with what they owe
#[derive(Debug, Clone, Serialize)]
pub struct MemberAccount {
    pub member: MemberRecord,
    pub reference_month: Month,
    pub due: DueStatus,
}

/// Service for the club ledger
///
/// Mutating operations run one at a time per service instance, so requests
/// served by one process cannot hand out the same member ID or lose a
/// payment. Separate processes writing to the same store are not
/// coordinated.
pub struct LedgerService<BS>
where
    BS: BlobStore + ?Sized,
{
    store: Arc<BS>,
    settings: LedgerSettings,
    write_lock: Mutex<()>,
}

impl<BS> LedgerService<BS>
where
    BS: BlobStore + ?Sized,
{
    pub fn new(store: Arc<BS>, settings: LedgerSettings) -> Self {
        Self {
            store,
            settings,
            write_lock: Mutex::new(()),
        }
    }

    pub fn monthly_fee(&self) -> u64 {
        self.settings.monthly_fee
    }

    /// Enroll a new member and return their record
    pub async fn add_member(&self, name: &str) -> Result<MemberRecord, AppError> {
        let name = validate_name(name)?;

        let _guard = self.write_lock.lock().await;

        let member_id = allocate_member_id(
            self.store.as_ref(),
            &self.settings.namespace,
            &self.settings.id_prefix,
        )
        .await?;

        let member = MemberRecord::new(member_id, name);
        self.save(&member).await?;

        tracing::info!(member_id = %member.member_id, name = %member.name, "Member added");
        Ok(member)
    }

    /// Record `amount` paid by a member during `current`
    pub async fn record_payment(
        &self,
        member_id: &str,
        amount: u64,
        current: Month,
    ) -> Result<PaymentReceipt, AppError> {
        let _guard = self.write_lock.lock().await;

        let mut member = self
            .find_member(member_id)
            .await?
            .ok_or_else(|| DomainError::MemberNotFound(member_id.to_string()))?;

        let outcome = member.apply_payment(amount, current, self.settings.monthly_fee)?;
        self.save(&member).await?;

        tracing::info!(
            member_id = %member.member_id,
            amount,
            months = outcome.months_credited,
            valid_upto = %outcome.valid_upto,
            "Payment recorded"
        );

        Ok(PaymentReceipt {
            amount,
            months_credited: outcome.months_credited,
            member,
        })
    }

    /// Find a member by ID
    pub async fn find_member(&self, member_id: &str) -> Result<Option<MemberRecord>, AppError> {
        self.load(member_id).await
    }

    /// A member's record and dues as of `reference`
    pub async fn member_account(
        &self,
        member_id: &str,
        reference: Month,
    ) -> Result<MemberAccount, AppError> {
        let member = self
            .find_member(member_id)
            .await?
            .ok_or_else(|| DomainError::MemberNotFound(member_id.to_string()))?;

        let due = compute_due(&member, reference, self.settings.monthly_fee);
        Ok(MemberAccount {
            member,
            reference_month: reference,
            due,
        })
    }

    /// All readable member records, ordered by member ID
    ///
    /// A missing namespace means an empty ledger. Records that cannot be
    /// parsed are logged and left out.
    pub async fn list_members(&self) -> Result<Vec<MemberRecord>, AppError> {
        let namespace = &self.settings.namespace;
        let entries = match self.store.list(namespace).await {
            Ok(entries) => entries,
            Err(StorageError::NamespaceNotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut members = Vec::new();
        for entry in entries
            .iter()
            .filter(|e| e.is_file() && e.name.ends_with(RECORD_EXTENSION))
        {
            let path = blob_path(namespace, &entry.name);
            let bytes = match self.store.read(&path).await {
                Ok(bytes) => bytes,
                Err(StorageError::NotFound(_)) => continue,
                Err(e) => return Err(e.into()),
            };
            match decode_record(&path, &bytes) {
                Ok(member) => members.push(member),
                Err(e) => tracing::warn!("Skipping unreadable record: {}", e),
            }
        }

        members.sort_by(|a, b| a.member_id.cmp(&b.member_id));
        Ok(members)
    }

    /// Members owing dues as of `reference`, with totals
    pub async fn due_roster(&self, reference: Month) -> Result<DueRoster, AppError> {
        let members = self.list_members().await?;
        let roster = DueRoster::build(&members, reference, self.settings.monthly_fee);

        tracing::debug!(
            reference = %reference,
            members = members.len(),
            owing = roster.entries.len(),
            "Built due roster"
        );
        Ok(roster)
    }

    fn record_path(&self, member_id: &str) -> Result<String, AppError> {
        if member_id.is_empty() || !member_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::BadRequest(format!(
                "Invalid member ID: {}",
                member_id
            )));
        }
        Ok(blob_path(
            &self.settings.namespace,
            &format!("{}{}", member_id, RECORD_EXTENSION),
        ))
    }

    /// Read `<member_id>.txt`; the stored Member ID must name the same file
    async fn load(&self, member_id: &str) -> Result<Option<MemberRecord>, AppError> {
        let path = self.record_path(member_id)?;
        let bytes = match self.store.read(&path).await {
            Ok(bytes) => bytes,
            Err(StorageError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let member = decode_record(&path, &bytes)?;
        if member.member_id.as_str() != member_id {
            return Err(DomainError::CorruptRecord {
                path,
                reason: format!("holds Member ID {}", member.member_id),
            }
            .into());
        }
        Ok(Some(member))
    }

    async fn save(&self, member: &MemberRecord) -> Result<(), AppError> {
        let path = self.record_path(member.member_id.as_str())?;
        self.store
            .write(&path, format_record(member).as_bytes())
            .await?;
        Ok(())
    }
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            namespace: crate::app::fee_config::DEFAULT_MEMBER_NAMESPACE.to_string(),
            id_prefix: crate::app::fee_config::DEFAULT_MEMBER_ID_PREFIX.to_string(),
            monthly_fee: MONTHLY_FEE,
        }
    }
}

fn validate_name(name: &str) -> Result<&str, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::Validation("Please enter the name".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::Validation(format!(
            "Name must be at most {} characters",
            MAX_NAME_LENGTH
        )));
    }
    if name.contains(|c| c == '\n' || c == '\r') {
        return Err(DomainError::Validation(
            "Name must be a single line".to_string(),
        ));
    }
    Ok(name)
}

fn decode_record(path: &str, bytes: &[u8]) -> Result<MemberRecord, DomainError> {
    let text = std::str::from_utf8(bytes).map_err(|e| DomainError::CorruptRecord {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    parse_record(text).map_err(|reason| DomainError::CorruptRecord {
        path: path.to_string(),
        reason,
    })
}
