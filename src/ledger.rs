//! The ledger store: owns the record collection and keeps storage in step.
//!
//! A [`Ledger`] is opened from a [`RecordStorage`] backend, restoring
//! whatever was persisted before. Every successful [`Ledger::commit`] and
//! [`Ledger::remove`] writes the whole collection back before returning,
//! so a later [`restore`] observes exactly the in-memory state.

use crate::aggregate::{self, Summary, View};
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::models::{DraftInput, NaiveDate, Record, RecordId, YearMonth};
use crate::storage::RecordStorage;

/// Loads the persisted record collection, newest first.
///
/// Never fails: a backend error or malformed data is logged and treated
/// as an empty ledger.
#[tracing::instrument(skip_all)]
pub fn restore<S: RecordStorage>(storage: &S) -> Vec<Record> {
    match storage.load() {
        Ok(records) => {
            tracing::debug!(count = records.len(), "restored records");
            records
        }
        Err(err) => {
            tracing::warn!(error = %err, "could not restore records, starting empty");
            Vec::new()
        }
    }
}

/// Record collection backed by a storage backend.
///
/// Records are kept newest first. The collection only changes through
/// [`Ledger::commit`] and [`Ledger::remove`]; both persist before they
/// return and leave memory untouched when the write fails.
#[derive(Debug)]
pub struct Ledger<S: RecordStorage, C: Clock = SystemClock> {
    /// Persistence backend.
    storage: S,
    /// Source of ids and default dates.
    clock: C,
    /// Records, newest first.
    records: Vec<Record>,
    /// Highest id issued or restored so far.
    last_id: Option<RecordId>,
}

impl<S: RecordStorage> Ledger<S> {
    /// Opens a ledger on `storage` using the system clock.
    #[inline]
    #[must_use]
    pub fn open(storage: S) -> Self {
        Self::with_clock(storage, SystemClock)
    }
}

impl<S: RecordStorage, C: Clock> Ledger<S, C> {
    /// Opens a ledger on `storage` with a custom clock.
    #[must_use]
    pub fn with_clock(storage: S, clock: C) -> Self {
        let records = restore(&storage);
        let last_id = records.iter().map(Record::id).max();
        tracing::info!(count = records.len(), "opened ledger");
        Self {
            storage,
            clock,
            records,
            last_id,
        }
    }

    /// Turns a draft into a record, stores it at the front and persists
    /// the collection.
    ///
    /// Numeric fields are resolved leniently (see [`DraftInput`]), the
    /// profit is computed once, and the record gets an id greater than
    /// every id issued before.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be written. The ledger is
    /// left as it was before the call.
    #[tracing::instrument(skip_all, fields(item = %draft.item))]
    pub fn commit(&mut self, draft: DraftInput) -> Result<Record> {
        let id = self.next_id();
        let record = draft.into_record(id, self.clock.today());
        self.records.insert(0, record.clone());

        if let Err(err) = self.storage.save(&self.records) {
            let _unsaved = self.records.remove(0);
            tracing::warn!(id = %id, error = %err, "failed to persist new record");
            return Err(err);
        }

        self.last_id = Some(id);
        tracing::info!(id = %id, profit = %record.profit(), date = %record.date(), "committed record");
        Ok(record)
    }

    /// Deletes the record with `id` and persists the collection.
    ///
    /// Returns `Ok(false)` without writing anything if no record has that
    /// id. Confirming the deletion with the user is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be written. The record is
    /// put back at its old position.
    #[tracing::instrument(skip_all, fields(id = %id))]
    pub fn remove(&mut self, id: RecordId) -> Result<bool> {
        let Some(index) = self.records.iter().position(|record| record.id() == id) else {
            tracing::debug!("no record with this id");
            return Ok(false);
        };
        let removed = self.records.remove(index);

        if let Err(err) = self.storage.save(&self.records) {
            self.records.insert(index, removed);
            tracing::warn!(error = %err, "failed to persist removal");
            return Err(err);
        }

        tracing::info!("removed record");
        Ok(true)
    }

    /// Returns all records, newest first.
    #[inline]
    #[must_use]
    pub fn list(&self) -> &[Record] {
        &self.records
    }

    /// Returns the record with `id`, if present.
    #[inline]
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Returns the number of records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the ledger holds no records.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the clock's current date.
    #[inline]
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Returns the month containing the clock's current date.
    #[inline]
    #[must_use]
    pub fn current_month(&self) -> YearMonth {
        YearMonth::of(self.clock.today())
    }

    /// Filters the collection through `view` and totals the result.
    #[inline]
    #[must_use]
    pub fn summary(&self, view: View) -> Summary<'_> {
        aggregate::summarize(&self.records, view)
    }

    /// Returns the storage backend.
    #[inline]
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Picks the next id: the clock's milliseconds, bumped past the last
    /// issued id when the clock has not moved on.
    fn next_id(&self) -> RecordId {
        let now = self.clock.now_millis();
        match self.last_id {
            Some(last) if now <= last.into_inner() => {
                RecordId::new(last.into_inner().saturating_add(1))
            }
            Some(_) | None => RecordId::new(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::LedgerError;
    use crate::models::{Amount, DeliveryMethod, test_record};
    use crate::storage::InMemoryStorage;

    const NOW_MILLIS: i64 = 1_710_460_800_000;

    fn clock() -> FixedClock {
        FixedClock::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), NOW_MILLIS)
    }

    fn open_ledger(storage: &InMemoryStorage) -> Ledger<&InMemoryStorage, FixedClock> {
        Ledger::with_clock(storage, clock())
    }

    fn mug() -> DraftInput {
        DraftInput::new()
            .item("Mug")
            .quantity("2")
            .original_price("5")
            .selling_price("12")
    }

    fn lamp() -> DraftInput {
        DraftInput::new()
            .item("Lamp")
            .quantity("1")
            .original_price("20")
            .selling_price("35")
            .method(DeliveryMethod::Shipped)
            .shipping_cost("5")
    }

    #[test]
    fn commit_computes_profit_and_persists() {
        let storage = InMemoryStorage::new();
        let mut ledger = open_ledger(&storage);

        let record = ledger.commit(mug()).unwrap();

        assert_eq!(record.profit().to_string(), "14.00");
        assert_eq!(record.date(), clock().today());
        assert_eq!(record.id(), RecordId::new(NOW_MILLIS));
        assert_eq!(ledger.list(), &[record.clone()]);
        assert_eq!(storage.load().unwrap(), vec![record]);
        assert_eq!(storage.save_count().unwrap(), 1);
    }

    #[test]
    fn commit_inserts_newest_first() {
        let storage = InMemoryStorage::new();
        let mut ledger = open_ledger(&storage);

        let first = ledger.commit(mug()).unwrap();
        let second = ledger.commit(lamp()).unwrap();

        let items: Vec<&str> = ledger.list().iter().map(Record::item).collect();
        assert_eq!(items, vec!["Lamp", "Mug"]);
        assert!(second.id() > first.id());
    }

    #[test]
    fn ids_increase_even_with_a_frozen_clock() {
        let storage = InMemoryStorage::new();
        let mut ledger = open_ledger(&storage);

        let ids: Vec<RecordId> = (0..5)
            .map(|_| ledger.commit(DraftInput::new()).unwrap().id())
            .collect();

        for pair in ids.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert_eq!(ids[4], RecordId::new(NOW_MILLIS + 4));
    }

    #[test]
    fn ids_stay_above_restored_ids() {
        let future_id = NOW_MILLIS + 1_000;
        let storage =
            InMemoryStorage::with_records(vec![test_record(future_id, "2024-03-14", "1.00")]);
        let mut ledger = open_ledger(&storage);

        let record = ledger.commit(mug()).unwrap();
        assert_eq!(record.id(), RecordId::new(future_id + 1));
    }

    #[test]
    fn commit_failure_leaves_ledger_unchanged() {
        let storage = InMemoryStorage::new();
        let mut ledger = open_ledger(&storage);
        let kept = ledger.commit(mug()).unwrap();
        storage.set_fail_saves(true).unwrap();

        let err = ledger.commit(lamp()).unwrap_err();

        assert!(matches!(err, LedgerError::Storage(_)));
        assert_eq!(ledger.list(), &[kept.clone()]);
        assert_eq!(storage.load().unwrap(), vec![kept]);
    }

    #[test]
    fn remove_existing_record() {
        let storage = InMemoryStorage::new();
        let mut ledger = open_ledger(&storage);
        let record = ledger.commit(mug()).unwrap();

        assert!(ledger.remove(record.id()).unwrap());

        assert!(ledger.is_empty());
        assert!(ledger.get(record.id()).is_none());
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn remove_unknown_id_is_false_and_writes_nothing() {
        let storage = InMemoryStorage::new();
        let mut ledger = open_ledger(&storage);
        let record = ledger.commit(mug()).unwrap();
        let saves_before = storage.save_count().unwrap();

        assert!(!ledger.remove(RecordId::new(42)).unwrap());

        assert_eq!(ledger.list(), &[record]);
        assert_eq!(storage.save_count().unwrap(), saves_before);
    }

    #[test]
    fn remove_failure_restores_position() {
        let storage = InMemoryStorage::new();
        let mut ledger = open_ledger(&storage);
        let _oldest = ledger.commit(mug()).unwrap();
        let middle = ledger.commit(lamp()).unwrap();
        let _newest = ledger.commit(DraftInput::new().item("Vase")).unwrap();
        let before = ledger.list().to_vec();
        storage.set_fail_saves(true).unwrap();

        assert!(ledger.remove(middle.id()).is_err());

        assert_eq!(ledger.list(), before.as_slice());
    }

    #[test]
    fn reopening_restores_committed_state() {
        let storage = InMemoryStorage::new();
        let expected = {
            let mut ledger = open_ledger(&storage);
            let mug_record = ledger.commit(mug()).unwrap();
            let _lamp_record = ledger.commit(lamp()).unwrap();
            let _vase_record = ledger.commit(DraftInput::new().item("Vase")).unwrap();
            assert!(ledger.remove(mug_record.id()).unwrap());
            ledger.list().to_vec()
        };

        let reopened = open_ledger(&storage);
        assert_eq!(reopened.list(), expected.as_slice());
    }

    #[test]
    fn restore_fails_soft() {
        #[derive(Debug)]
        struct Broken;

        impl RecordStorage for Broken {
            fn load(&self) -> Result<Vec<Record>> {
                Err(LedgerError::Storage("disk on fire".into()))
            }

            fn save(&self, _records: &[Record]) -> Result<()> {
                Ok(())
            }
        }

        assert!(restore(&Broken).is_empty());
        let ledger = Ledger::with_clock(Broken, clock());
        assert!(ledger.is_empty());
    }

    #[test]
    fn image_is_attached_to_the_committed_record() {
        let storage = InMemoryStorage::new();
        let mut ledger = open_ledger(&storage);
        let record = ledger.commit(mug().image("mug.jpg")).unwrap();

        let image = ledger.get(record.id()).unwrap().image().unwrap();
        assert_eq!(image.as_str(), "mug.jpg");
    }

    #[test]
    fn summaries_for_today_and_month() {
        let storage = InMemoryStorage::new();
        let mut ledger = open_ledger(&storage);
        let _mug = ledger.commit(mug()).unwrap();
        let _lamp = ledger.commit(lamp()).unwrap();
        let _earlier = ledger
            .commit(mug().date("2024-03-01"))
            .unwrap();
        let _last_year = ledger
            .commit(lamp().date("2023-03-15"))
            .unwrap();

        let today = ledger.summary(View::Day(ledger.today()));
        assert_eq!(today.records.len(), 2);
        assert_eq!(today.total.to_string(), "24.00");

        let month = ledger.summary(View::Month(ledger.current_month()));
        assert_eq!(month.records.len(), 3);
        assert_eq!(month.total.to_string(), "38.00");

        let all = ledger.summary(View::All);
        assert_eq!(all.records.len(), 4);
        assert_eq!(all.total.to_string(), "48.00");
    }

    #[test]
    fn defaulted_fields_through_the_ledger() {
        let storage = InMemoryStorage::new();
        let mut ledger = open_ledger(&storage);
        let record = ledger
            .commit(DraftInput::new().quantity("").selling_price("abc"))
            .unwrap();
        assert_eq!(record.quantity(), 1);
        assert_eq!(record.profit(), &Amount::zero());
    }
}
