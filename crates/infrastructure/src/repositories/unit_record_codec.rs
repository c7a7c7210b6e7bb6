//! Compact binary encoding for persisted unit records.
//!
//! Schema history: v1 persisted only the scalar counters; v2 added the
//! three top-N lists. Decoding accepts both so buckets written before
//! the lists existed still load (missing lists read as empty). All
//! integers are big-endian.

use bytes::{Buf, BufMut};
use tally_dns_domain::{DomainError, FilterResult, TopItem, UnitRecord};

const SCHEMA_V1: u8 = 1;
const SCHEMA_V2: u8 = 2;

/// Upper bound on a decoded list length; anything larger means a
/// corrupt record.
const MAX_LIST_LEN: u32 = 10_000;

pub fn encode_record(record: &UnitRecord) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128);
    buf.put_u8(SCHEMA_V2);
    buf.put_u64(record.total_queries);
    buf.put_u8(FilterResult::COUNT as u8);
    for count in &record.counts_by_result {
        buf.put_u64(*count);
    }
    buf.put_u64(record.avg_time_micros);
    put_list(&mut buf, &record.top_domains);
    put_list(&mut buf, &record.top_blocked_domains);
    put_list(&mut buf, &record.top_clients);
    buf
}

pub fn decode_record(bytes: &[u8]) -> Result<UnitRecord, DomainError> {
    let mut buf = bytes;
    let version = get_u8(&mut buf)?;
    if version != SCHEMA_V1 && version != SCHEMA_V2 {
        return Err(DomainError::EncodingError(format!(
            "unknown record schema version: {}",
            version
        )));
    }

    let mut record = UnitRecord {
        total_queries: get_u64(&mut buf)?,
        ..Default::default()
    };

    // The counter array may grow in future schemas; surplus counters
    // are skipped, missing ones stay zero.
    let kinds = get_u8(&mut buf)? as usize;
    for i in 0..kinds {
        let count = get_u64(&mut buf)?;
        if i < FilterResult::COUNT {
            record.counts_by_result[i] = count;
        }
    }
    record.avg_time_micros = get_u64(&mut buf)?;

    if version >= SCHEMA_V2 {
        record.top_domains = get_list(&mut buf)?;
        record.top_blocked_domains = get_list(&mut buf)?;
        record.top_clients = get_list(&mut buf)?;
    }

    Ok(record)
}

fn put_list(buf: &mut Vec<u8>, items: &[TopItem]) {
    buf.put_u32(items.len() as u32);
    for item in items {
        buf.put_u32(item.name.len() as u32);
        buf.put_slice(item.name.as_bytes());
        buf.put_u64(item.count);
    }
}

fn get_list(buf: &mut &[u8]) -> Result<Vec<TopItem>, DomainError> {
    let len = get_u32(buf)?;
    if len > MAX_LIST_LEN {
        return Err(DomainError::EncodingError(format!(
            "list length {} exceeds limit",
            len
        )));
    }
    let mut items = Vec::with_capacity(len as usize);
    for _ in 0..len {
        let name_len = get_u32(buf)? as usize;
        if buf.remaining() < name_len {
            return Err(truncated());
        }
        let name = std::str::from_utf8(&buf[..name_len])
            .map_err(|e| DomainError::EncodingError(format!("invalid UTF-8 in name: {}", e)))?
            .to_string();
        buf.advance(name_len);
        let count = get_u64(buf)?;
        items.push(TopItem { name, count });
    }
    Ok(items)
}

fn get_u8(buf: &mut &[u8]) -> Result<u8, DomainError> {
    if buf.remaining() < 1 {
        return Err(truncated());
    }
    Ok(buf.get_u8())
}

fn get_u32(buf: &mut &[u8]) -> Result<u32, DomainError> {
    if buf.remaining() < 4 {
        return Err(truncated());
    }
    Ok(buf.get_u32())
}

fn get_u64(buf: &mut &[u8]) -> Result<u64, DomainError> {
    if buf.remaining() < 8 {
        return Err(truncated());
    }
    Ok(buf.get_u64())
}

fn truncated() -> DomainError {
    DomainError::EncodingError("truncated record".to_string())
}
