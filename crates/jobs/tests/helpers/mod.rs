#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::RwLock;
use tally_dns_application::ports::{Clock, UnitStore};
use tally_dns_domain::{DomainError, UnitRecord};

pub struct ManualClock {
    secs: AtomicU64,
}

impl ManualClock {
    pub fn new(secs: u64) -> Self {
        Self {
            secs: AtomicU64::new(secs),
        }
    }

    pub fn advance(&self, secs: u64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_unix(&self) -> u64 {
        self.secs.load(Ordering::SeqCst)
    }
}

pub struct MockUnitStore {
    records: RwLock<HashMap<u64, UnitRecord>>,
    put_count: AtomicUsize,
}

impl MockUnitStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            put_count: AtomicUsize::new(0),
        }
    }

    pub fn insert(&self, hour: u64, record: UnitRecord) {
        self.records.write().unwrap().insert(hour, record);
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn put_count(&self) -> usize {
        self.put_count.load(Ordering::SeqCst)
    }

    pub fn contains(&self, hour: u64) -> bool {
        self.records.read().unwrap().contains_key(&hour)
    }
}

impl Default for MockUnitStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UnitStore for MockUnitStore {
    async fn put(&self, hour: u64, record: &UnitRecord) -> Result<(), DomainError> {
        self.put_count.fetch_add(1, Ordering::SeqCst);
        self.records.write().unwrap().insert(hour, record.clone());
        Ok(())
    }

    async fn get(&self, hour: u64) -> Result<Option<UnitRecord>, DomainError> {
        Ok(self.records.read().unwrap().get(&hour).cloned())
    }

    async fn delete_all(&self) -> Result<(), DomainError> {
        self.records.write().unwrap().clear();
        Ok(())
    }

    async fn delete_older_than(&self, hour: u64) -> Result<u64, DomainError> {
        let mut records = self.records.write().unwrap();
        let before = records.len();
        records.retain(|h, _| *h >= hour);
        Ok((before - records.len()) as u64)
    }
}
