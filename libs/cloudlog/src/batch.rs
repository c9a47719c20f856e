use std::io::Write;

use crate::encoder::EventEncoder;
use crate::error::{EncodeError, MarshalError};
use crate::event::Event;
use crate::record::{CLIENT_TYPE_FIELD, Record, SOURCE_HOST_FIELD, TIMESTAMP_FIELD};
use crate::timestamp;
use crate::value::Value;

/// Ordered records produced by one push call, one per input event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    records: Vec<Record>,
}

impl Batch {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Bulk wire form: `{"records":[<record>,...]}`.
    pub fn to_json_body(&self) -> Result<Vec<u8>, MarshalError> {
        let mut body = b"{\"records\":[".to_vec();
        for (i, record) in self.records.iter().enumerate() {
            if i > 0 {
                body.push(b',');
            }
            write_record(&mut body, record)?;
        }
        body.extend_from_slice(b"]}");
        Ok(body)
    }

    /// Message-queue wire form: one JSON object per record, in batch order.
    pub fn to_json_messages(&self) -> Result<Vec<Vec<u8>>, MarshalError> {
        self.records
            .iter()
            .map(|record| {
                let mut payload = Vec::new();
                write_record(&mut payload, record)?;
                Ok(payload)
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn write_record<W: Write>(out: W, record: &Record) -> Result<(), MarshalError> {
    serde_json::to_writer(out, record).map_err(|source| MarshalError {
        record: record.clone(),
        source,
    })
}

/// Turns raw events into a transport-ready [`Batch`].
///
/// Per event, in input order:
/// 1. encode; the first failure aborts the whole batch;
/// 2. a missing `timestamp` is set to the instant captured once per build,
///    an existing one is normalized to epoch millis;
/// 3. provenance fields are written, replacing caller values.
///
/// A single argument that is itself a sequence is flattened first.
pub struct RecordBuilder<'a> {
    encoder: &'a dyn EventEncoder,
    source_host: &'a str,
    client_type: &'a str,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(encoder: &'a dyn EventEncoder, source_host: &'a str, client_type: &'a str) -> Self {
        Self {
            encoder,
            source_host,
            client_type,
        }
    }

    pub fn build(&self, events: Vec<Event>) -> Result<Batch, EncodeError> {
        if events.is_empty() {
            return Ok(Batch::default());
        }
        self.build_at(events, timestamp::now_millis())
    }

    /// Build with an explicit capture instant (UTC epoch millis).
    pub fn build_at(&self, events: Vec<Event>, now_ms: i64) -> Result<Batch, EncodeError> {
        let events = flatten(events);
        let mut records = Vec::with_capacity(events.len());
        for event in &events {
            let mut record = self.encoder.encode_event(event)?;

            let ts = match record.remove(TIMESTAMP_FIELD) {
                Some(existing) => timestamp::normalize(existing),
                None => Value::Int(now_ms),
            };
            record.insert(TIMESTAMP_FIELD, ts);
            record.insert(SOURCE_HOST_FIELD, self.source_host);
            record.insert(CLIENT_TYPE_FIELD, self.client_type);

            records.push(record);
        }
        Ok(Batch::new(records))
    }
}

/// A lone sequence argument stands for its elements.
fn flatten(events: Vec<Event>) -> Vec<Event> {
    match <[Event; 1]>::try_from(events) {
        Ok([Event::Sequence(items)]) => items,
        Ok([single]) => vec![single],
        Err(events) => events,
    }
}
