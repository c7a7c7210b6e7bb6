#![allow(dead_code)]

use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, OpCode};
use hickory_proto::rr::rdata::PTR;
use hickory_proto::rr::{Name, RData, Record};
use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};
use tally_dns_application::ports::{Clock, ClientRegistry, UnitStore, UpstreamQueryExecutor};
use tally_dns_domain::{ClientSource, DomainError, UnitRecord};

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
    should_fail: AtomicBool,
    put_count: AtomicUsize,
}

impl MockUnitStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            should_fail: AtomicBool::new(false),
            put_count: AtomicUsize::new(0),
        }
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    pub fn insert(&self, hour: u64, record: UnitRecord) {
        self.records.write().unwrap().insert(hour, record);
    }

    pub fn record(&self, hour: u64) -> Option<UnitRecord> {
        self.records.read().unwrap().get(&hour).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn put_count(&self) -> usize {
        self.put_count.load(Ordering::SeqCst)
    }

    fn check_fail(&self) -> Result<(), DomainError> {
        if self.should_fail.load(Ordering::SeqCst) {
            Err(DomainError::DatabaseError("mock store failure".to_string()))
        } else {
            Ok(())
        }
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
        self.check_fail()?;
        self.put_count.fetch_add(1, Ordering::SeqCst);
        self.records.write().unwrap().insert(hour, record.clone());
        Ok(())
    }

    async fn get(&self, hour: u64) -> Result<Option<UnitRecord>, DomainError> {
        self.check_fail()?;
        Ok(self.records.read().unwrap().get(&hour).cloned())
    }

    async fn delete_all(&self) -> Result<(), DomainError> {
        self.check_fail()?;
        self.records.write().unwrap().clear();
        Ok(())
    }

    async fn delete_older_than(&self, hour: u64) -> Result<u64, DomainError> {
        self.check_fail()?;
        let mut records = self.records.write().unwrap();
        let before = records.len();
        records.retain(|h, _| *h >= hour);
        Ok((before - records.len()) as u64)
    }
}

pub struct MockClientRegistry {
    known: RwLock<HashSet<IpAddr>>,
    hosts: Mutex<Vec<(IpAddr, String, ClientSource)>>,
}

impl MockClientRegistry {
    pub fn new() -> Self {
        Self {
            known: RwLock::new(HashSet::new()),
            hosts: Mutex::new(Vec::new()),
        }
    }

    pub fn insert_known(&self, ip: IpAddr) {
        self.known.write().unwrap().insert(ip);
    }

    pub fn hosts(&self) -> Vec<(IpAddr, String, ClientSource)> {
        self.hosts.lock().unwrap().clone()
    }
}

impl Default for MockClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClientRegistry for MockClientRegistry {
    fn exists(&self, ip: IpAddr) -> bool {
        self.known.read().unwrap().contains(&ip)
    }

    async fn add_host(
        &self,
        ip: IpAddr,
        hostname: &str,
        source: ClientSource,
    ) -> Result<bool, DomainError> {
        self.known.write().unwrap().insert(ip);
        self.hosts
            .lock()
            .unwrap()
            .push((ip, hostname.to_string(), source));
        Ok(true)
    }
}

/// Canned upstream replies keyed by the query's reverse name.
#[derive(Clone)]
pub enum MockReply {
    Ptr(String),
    NoAnswers,
    MultipleAnswers,
    WrongType,
    Error,
}

pub struct MockUpstreamExecutor {
    replies: Mutex<HashMap<String, MockReply>>,
    default_reply: Mutex<MockReply>,
    calls: Mutex<Vec<String>>,
}

impl MockUpstreamExecutor {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(HashMap::new()),
            default_reply: Mutex::new(MockReply::NoAnswers),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_reply(&self, reverse_name: &str, reply: MockReply) {
        self.replies
            .lock()
            .unwrap()
            .insert(reverse_name.to_string(), reply);
    }

    pub fn set_default_reply(&self, reply: MockReply) {
        *self.default_reply.lock().unwrap() = reply;
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn ptr_record(owner: Name, hostname: &str) -> Record {
        let target = Name::from_utf8(hostname).unwrap();
        Record::from_rdata(owner, 300, RData::PTR(PTR(target)))
    }
}

impl Default for MockUpstreamExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpstreamQueryExecutor for MockUpstreamExecutor {
    async fn exchange(&self, query: &Message) -> Result<Message, DomainError> {
        let q = query
            .queries()
            .first()
            .expect("query message without question")
            .clone();
        let name = q.name().to_utf8();
        self.calls.lock().unwrap().push(name.clone());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&name)
            .cloned()
            .unwrap_or_else(|| self.default_reply.lock().unwrap().clone());

        let mut response = Message::new(query.id(), MessageType::Response, OpCode::Query);
        response.add_query(q.clone());

        match reply {
            MockReply::Ptr(hostname) => {
                response.add_answer(Self::ptr_record(q.name().clone(), &hostname));
            }
            MockReply::NoAnswers => {}
            MockReply::MultipleAnswers => {
                response.add_answer(Self::ptr_record(q.name().clone(), "one.lan."));
                response.add_answer(Self::ptr_record(q.name().clone(), "two.lan."));
            }
            MockReply::WrongType => {
                let rdata = RData::A(std::net::Ipv4Addr::new(10, 0, 0, 1).into());
                response.add_answer(Record::from_rdata(q.name().clone(), 300, rdata));
            }
            MockReply::Error => {
                return Err(DomainError::UpstreamError(
                    "mock upstream failure".to_string(),
                ));
            }
        }
        Ok(response)
    }
}
