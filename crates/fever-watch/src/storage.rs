//! .ftw reading-log file format reader/writer.
//!
//! Layout: a 64-byte little-endian header followed by a JSON payload holding
//! readings, thresholds and alerts.

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

use crate::alerts::FeverAlert;
use crate::types::{FeverError, FeverResult, ReadingStore, TemperatureReading, ThresholdSetting};

/// Magic bytes: "FEVR"
const FTW_MAGIC: u32 = 0x46455652;

/// Current format version.
const FORMAT_VERSION: u16 = 1;

/// Header size in bytes.
const HEADER_SIZE: usize = 64;

/// Writer for .ftw files.
pub struct ReadingLogWriter;

/// Reader for .ftw files.
pub struct ReadingLogReader;

impl ReadingLogWriter {
    /// Write a reading store to a file, creating parent directories.
    pub fn write_to_file(store: &ReadingStore, path: &Path) -> FeverResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = std::fs::File::create(path)?;
        Self::write_to(store, &mut file)
    }

    /// Write a reading store to any writer.
    pub fn write_to<W: Write>(store: &ReadingStore, writer: &mut W) -> FeverResult<()> {
        let payload = serde_json::to_vec(&SerializedStore {
            readings: &store.readings,
            thresholds: &store.thresholds,
            alerts: &store.alerts,
            next_id: store.next_id,
        })
        .map_err(|e| FeverError::Storage(format!("Serialization failed: {e}")))?;

        let mut header = [0u8; HEADER_SIZE];
        write_u32(&mut header[0..4], FTW_MAGIC);
        write_u16(&mut header[4..6], FORMAT_VERSION);
        write_u16(&mut header[6..8], 0); // flags
        write_u64(&mut header[8..16], store.readings.len() as u64);
        write_u32(&mut header[16..20], store.thresholds.len() as u32);
        write_u32(&mut header[20..24], store.alerts.len() as u32);
        write_u64(&mut header[24..32], store.created_at);
        write_u64(&mut header[32..40], store.updated_at);
        write_u64(&mut header[40..48], payload.len() as u64);

        writer.write_all(&header)?;
        writer.write_all(&payload)?;

        Ok(())
    }
}

impl ReadingLogReader {
    /// Read a reading store from a file.
    pub fn read_from_file(path: &Path) -> FeverResult<ReadingStore> {
        let mut file = std::fs::File::open(path)?;
        Self::read_from(&mut file)
    }

    /// Read a reading store from any reader.
    pub fn read_from<R: Read>(reader: &mut R) -> FeverResult<ReadingStore> {
        let mut header = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header)?;

        let magic = read_u32(&header[0..4]);
        if magic != FTW_MAGIC {
            return Err(FeverError::Storage(format!(
                "Invalid magic: expected 0x{FTW_MAGIC:08X}, got 0x{magic:08X}"
            )));
        }

        let version = read_u16(&header[4..6]);
        if version != FORMAT_VERSION {
            return Err(FeverError::Storage(format!(
                "Unsupported version: {version}"
            )));
        }

        let reading_count = read_u64(&header[8..16]);
        let created_at = read_u64(&header[24..32]);
        let updated_at = read_u64(&header[32..40]);
        let payload_len = read_u64(&header[40..48]);

        // The header is untrusted; the buffer only grows as bytes arrive.
        let mut payload = Vec::new();
        reader.take(payload_len).read_to_end(&mut payload)?;
        if payload.len() as u64 != payload_len {
            return Err(FeverError::Storage(format!(
                "Header declares a {payload_len}-byte payload, file has {}",
                payload.len()
            )));
        }

        let serialized: DeserializedStore = serde_json::from_slice(&payload)
            .map_err(|e| FeverError::Storage(format!("Deserialization failed: {e}")))?;

        if serialized.readings.len() as u64 != reading_count {
            return Err(FeverError::Storage(format!(
                "Header declares {reading_count} readings, payload has {}",
                serialized.readings.len()
            )));
        }

        Ok(ReadingStore {
            readings: serialized.readings,
            thresholds: serialized.thresholds,
            alerts: serialized.alerts,
            next_id: serialized.next_id,
            created_at,
            updated_at,
        })
    }
}

#[derive(serde::Serialize)]
struct SerializedStore<'a> {
    readings: &'a [TemperatureReading],
    thresholds: &'a BTreeMap<String, ThresholdSetting>,
    alerts: &'a [FeverAlert],
    next_id: u64,
}

#[derive(serde::Deserialize)]
struct DeserializedStore {
    readings: Vec<TemperatureReading>,
    #[serde(default)]
    thresholds: BTreeMap<String, ThresholdSetting>,
    #[serde(default)]
    alerts: Vec<FeverAlert>,
    next_id: u64,
}

// Little-endian byte helpers
fn write_u16(buf: &mut [u8], val: u16) {
    buf[..2].copy_from_slice(&val.to_le_bytes());
}
fn write_u32(buf: &mut [u8], val: u32) {
    buf[..4].copy_from_slice(&val.to_le_bytes());
}
fn write_u64(buf: &mut [u8], val: u64) {
    buf[..8].copy_from_slice(&val.to_le_bytes());
}
fn read_u16(buf: &[u8]) -> u16 {
    u16::from_le_bytes([buf[0], buf[1]])
}
fn read_u32(buf: &[u8]) -> u32 {
    u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])
}
fn read_u64(buf: &[u8]) -> u64 {
    u64::from_le_bytes([buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated_store() -> ReadingStore {
        let mut store = ReadingStore::new();
        store.add_reading("piZero01", 37.1, "20250822T040135293").unwrap();
        store.add_reading("piZero01", 38.6, "20250822T050135293").unwrap();
        store
            .set_threshold("piZero01", 38.2, "2025-08-22T05:30:00Z")
            .unwrap();
        store
    }

    #[test]
    fn test_empty_store_persists() {
        let store = ReadingStore::new();
        let mut buf = Vec::new();
        ReadingLogWriter::write_to(&store, &mut buf).unwrap();

        let loaded = ReadingLogReader::read_from(&mut &buf[..]).unwrap();
        assert_eq!(loaded.count(), 0);
        assert_eq!(loaded.next_id, 1);
        assert_eq!(loaded.created_at, store.created_at);
    }

    #[test]
    fn test_readings_thresholds_alerts_persist() {
        let store = populated_store();
        let mut buf = Vec::new();
        ReadingLogWriter::write_to(&store, &mut buf).unwrap();

        let loaded = ReadingLogReader::read_from(&mut &buf[..]).unwrap();
        assert_eq!(loaded.count(), 2);
        assert_eq!(loaded.next_id, 3);
        assert_eq!(loaded.threshold("piZero01"), 38.2);
        assert_eq!(loaded.alerts.len(), 1);
        assert_eq!(loaded.alerts[0].temperature_c, 38.6);
    }

    #[test]
    fn test_invalid_magic() {
        let mut buf = [0u8; HEADER_SIZE + 10];
        buf[0..4].copy_from_slice(b"NOPE");
        let result = ReadingLogReader::read_from(&mut &buf[..]);
        assert!(matches!(result, Err(FeverError::Storage(_))));
    }

    #[test]
    fn test_truncated_payload() {
        let store = populated_store();
        let mut buf = Vec::new();
        ReadingLogWriter::write_to(&store, &mut buf).unwrap();
        buf.truncate(buf.len() - 5);
        assert!(matches!(
            ReadingLogReader::read_from(&mut &buf[..]),
            Err(FeverError::Storage(_))
        ));
    }

    #[test]
    fn test_oversized_payload_length() {
        let mut buf = Vec::new();
        ReadingLogWriter::write_to(&populated_store(), &mut buf).unwrap();
        buf[40..48].copy_from_slice(&u64::MAX.to_le_bytes());

        let result = ReadingLogReader::read_from(&mut &buf[..]);
        assert!(matches!(result, Err(FeverError::Storage(msg)) if msg.contains("payload")));
    }

    #[test]
    fn test_truncated_header() {
        let buf = [0u8; HEADER_SIZE / 2];
        assert!(matches!(
            ReadingLogReader::read_from(&mut &buf[..]),
            Err(FeverError::Io(_))
        ));
    }

    #[test]
    fn test_file_persists_in_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("readings.ftw");

        ReadingLogWriter::write_to_file(&populated_store(), &path).unwrap();
        let loaded = ReadingLogReader::read_from_file(&path).unwrap();
        assert_eq!(loaded.latest("piZero01").unwrap().temperature_c, 38.6);
    }
}
