//! Create, read, update, patch and delete on the in-memory ledger.
//!
//! Every operation is generic over a [`Stored`] record type. Queries route
//! through [`CriteriaEvaluator`] and [`QueryExecutor`] over the record
//! table, which is the consistent snapshot both `list` and `count` see.

use fleetbooks_criteria::{Criteria, CriteriaEvaluator, Entity, Page, QueryExecutor, QueryRequest};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{LedgerError, Result};
use crate::Ledger;

/// A record type that lives in one table of the [`Ledger`].
pub trait Stored: Entity + Clone + Serialize + DeserializeOwned {
    /// The record id, `None` until the record is created.
    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: i64);

    /// The table holding records of this type.
    fn table(ledger: &Ledger) -> &Vec<Self>;

    fn table_mut(ledger: &mut Ledger) -> &mut Vec<Self>;
}

impl Ledger {
    /// Returns every record of type `R` in insertion order.
    pub fn all<R: Stored>(&self) -> &[R] {
        R::table(self)
    }

    /// Stores a new record and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// - `LedgerError::IdAlreadyAssigned` if the record already has an id.
    /// - `LedgerError::IdSequenceExhausted` if no id is left to assign.
    pub fn create<R: Stored>(&mut self, mut record: R) -> Result<R> {
        if let Some(id) = record.id() {
            return Err(LedgerError::IdAlreadyAssigned { entity: R::NAME, id });
        }

        let id = self.allocate_id()?;
        record.set_id(id);
        R::table_mut(self).push(record.clone());
        self.touch();
        debug!(entity = R::NAME, id, "created record");
        Ok(record)
    }

    /// Looks up one record by id.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::RecordNotFound` if no record has this id.
    pub fn find<R: Stored>(&self, id: i64) -> Result<&R> {
        R::table(self)
            .iter()
            .find(|r| r.id() == Some(id))
            .ok_or(LedgerError::RecordNotFound { entity: R::NAME, id })
    }

    /// Replaces the record with id `id`.
    ///
    /// # Errors
    ///
    /// - `LedgerError::MissingId` if `record` has no id.
    /// - `LedgerError::IdMismatch` if its id is not `id`.
    /// - `LedgerError::RecordNotFound` if nothing is stored under `id`.
    pub fn update<R: Stored>(&mut self, id: i64, record: R) -> Result<R> {
        match record.id() {
            None => return Err(LedgerError::MissingId { entity: R::NAME }),
            Some(found) if found != id => {
                return Err(LedgerError::IdMismatch {
                    entity: R::NAME,
                    expected: id,
                    found,
                })
            }
            Some(_) => {}
        }

        let slot = self.position::<R>(id)?;
        R::table_mut(self)[slot] = record.clone();
        self.touch();
        debug!(entity = R::NAME, id, "updated record");
        Ok(record)
    }

    /// Applies a partial update to the record with id `id`.
    ///
    /// `patch` must be a JSON object. Its non-null members replace the stored
    /// values. Null and absent members keep them, so a patch cannot clear an
    /// optional field; use [`Ledger::update`] for that.
    ///
    /// # Errors
    ///
    /// - `LedgerError::RecordNotFound` if nothing is stored under `id`.
    /// - `LedgerError::IdMismatch` if the patch carries a different id.
    /// - `LedgerError::InvalidPatch` if `patch` is not an object or the merged
    ///   record is not a valid `R`.
    pub fn patch<R: Stored>(&mut self, id: i64, patch: &serde_json::Value) -> Result<R> {
        let members = patch.as_object().ok_or_else(|| LedgerError::InvalidPatch {
            entity: R::NAME,
            reason: "expected a JSON object".to_string(),
        })?;

        if let Some(patch_id) = members.get("id").filter(|v| !v.is_null()) {
            match patch_id.as_i64() {
                Some(found) if found == id => {}
                Some(found) => {
                    return Err(LedgerError::IdMismatch {
                        entity: R::NAME,
                        expected: id,
                        found,
                    })
                }
                None => {
                    return Err(LedgerError::InvalidPatch {
                        entity: R::NAME,
                        reason: format!("id must be an integer, got {patch_id}"),
                    })
                }
            }
        }

        let slot = self.position::<R>(id)?;
        let mut merged = serde_json::to_value(&R::table(self)[slot])?;
        if let Some(target) = merged.as_object_mut() {
            for (key, value) in members.iter().filter(|(_, v)| !v.is_null()) {
                target.insert(key.clone(), value.clone());
            }
        }

        let mut record: R = serde_json::from_value(merged).map_err(|e| LedgerError::InvalidPatch {
            entity: R::NAME,
            reason: e.to_string(),
        })?;
        record.set_id(id);

        R::table_mut(self)[slot] = record.clone();
        self.touch();
        debug!(entity = R::NAME, id, fields = members.len(), "patched record");
        Ok(record)
    }

    /// Removes the record with id `id` and returns it.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::RecordNotFound` if no record has this id.
    pub fn delete<R: Stored>(&mut self, id: i64) -> Result<R> {
        let slot = self.position::<R>(id)?;
        let removed = R::table_mut(self).remove(slot);
        self.touch();
        debug!(entity = R::NAME, id, "deleted record");
        Ok(removed)
    }

    /// Runs a filtered, sorted, paged query over records of type `R`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Filter` if the criteria or sort name an unknown
    /// field or apply an operator the field's type does not support.
    pub fn query<R: Stored>(&self, request: &QueryRequest) -> Result<Page<'_, R>> {
        let evaluator = CriteriaEvaluator::new(R::descriptors(), &request.criteria)?;
        let page = QueryExecutor::new(R::table(self)).page(
            evaluator.predicate(),
            &request.sort,
            &request.page,
        )?;
        Ok(page)
    }

    /// Counts records of type `R` matching `criteria`, ignoring paging.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Filter` for criteria the descriptors reject.
    pub fn count<R: Stored>(&self, criteria: &Criteria) -> Result<usize> {
        let evaluator = CriteriaEvaluator::new(R::descriptors(), criteria)?;
        Ok(QueryExecutor::new(R::table(self)).count(evaluator.predicate()))
    }

    fn position<R: Stored>(&self, id: i64) -> Result<usize> {
        R::table(self)
            .iter()
            .position(|r| r.id() == Some(id))
            .ok_or(LedgerError::RecordNotFound { entity: R::NAME, id })
    }
}
