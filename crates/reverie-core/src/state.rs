//! Fixed-size binary state record.
//!
//! # Layout (version 1, 32 bytes, little-endian)
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 4 | magic `b"RVRB"` |
//! | 4 | 2 | format version |
//! | 6 | 2 | reserved, zero |
//! | 8 | 4 | wet `f32` |
//! | 12 | 4 | dry `f32` |
//! | 16 | 4 | room size `f32` |
//! | 20 | 4 | damping `f32` |
//! | 24 | 4 | width `f32` |
//! | 28 | 4 | freeze `u32` (0 or 1) |
//!
//! Loading is all-or-nothing: a short stream, an unknown header, or a
//! non-finite value fails before the store is touched.

use std::io::{ErrorKind, Read, Write};

use reverie_dsp::ReverbParameters;

use crate::error::StateError;
use crate::store::ParamStore;

/// Record magic.
pub const STATE_MAGIC: [u8; 4] = *b"RVRB";

/// Current record version.
pub const STATE_VERSION: u16 = 1;

/// Size of one record in bytes.
pub const RECORD_SIZE: usize = 32;

const FIELDS: [&str; 5] = ["wet", "dry", "room_size", "damping", "width"];

/// Serialize a snapshot into one record.
pub fn encode(params: &ReverbParameters) -> [u8; RECORD_SIZE] {
    let mut record = [0u8; RECORD_SIZE];
    record[0..4].copy_from_slice(&STATE_MAGIC);
    record[4..6].copy_from_slice(&STATE_VERSION.to_le_bytes());

    let values = [
        params.wet_level,
        params.dry_level,
        params.room_size,
        params.damping,
        params.width,
    ];
    for (i, value) in values.iter().enumerate() {
        let offset = 8 + i * 4;
        record[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }
    record[28..32].copy_from_slice(&u32::from(params.freeze).to_le_bytes());
    record
}

/// Deserialize one record.
///
/// Finite values outside `[0.0, 1.0]` are clamped.
pub fn decode(record: &[u8; RECORD_SIZE]) -> Result<ReverbParameters, StateError> {
    let magic = [record[0], record[1], record[2], record[3]];
    let version = u16::from_le_bytes([record[4], record[5]]);
    if magic != STATE_MAGIC || version != STATE_VERSION {
        return Err(StateError::UnknownFormat { magic, version });
    }

    let mut values = [0.0f32; 5];
    for (i, value) in values.iter_mut().enumerate() {
        let offset = 8 + i * 4;
        let v = f32::from_le_bytes([
            record[offset],
            record[offset + 1],
            record[offset + 2],
            record[offset + 3],
        ]);
        if !v.is_finite() {
            return Err(StateError::InvalidValue { field: FIELDS[i] });
        }
        *value = v;
    }
    let freeze = u32::from_le_bytes([record[28], record[29], record[30], record[31]]) != 0;

    let [wet_level, dry_level, room_size, damping, width] = values;
    Ok(ReverbParameters {
        room_size,
        damping,
        wet_level,
        dry_level,
        width,
        freeze,
    }
    .clamped())
}

/// Write the store's current snapshot to `output`.
///
/// Fails with [`StateError::ShortWrite`] if the stream stops accepting bytes
/// before the whole record is written.
pub fn save<W: Write + ?Sized>(store: &ParamStore, output: &mut W) -> Result<(), StateError> {
    let record = encode(&store.snapshot());

    let mut written = 0;
    while written < RECORD_SIZE {
        match output.write(&record[written..]) {
            Ok(0) => {
                return Err(StateError::ShortWrite {
                    written,
                    expected: RECORD_SIZE,
                });
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    output.flush()?;
    Ok(())
}

/// Read one record from `input` and install it in the store.
///
/// On any failure the store is left unchanged. On success returns the
/// snapshot now in the store so callers can reflect it to a GUI.
pub fn load<R: Read + ?Sized>(
    store: &ParamStore,
    input: &mut R,
) -> Result<ReverbParameters, StateError> {
    let mut record = [0u8; RECORD_SIZE];

    let mut read = 0;
    while read < RECORD_SIZE {
        match input.read(&mut record[read..]) {
            Ok(0) => {
                return Err(StateError::ShortRead {
                    read,
                    expected: RECORD_SIZE,
                });
            }
            Ok(n) => read += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }

    let params = decode(&record)?;
    store.replace(params);
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::ParamId;

    /// A writer that accepts at most `limit` bytes in total.
    struct LimitedWriter {
        buf: Vec<u8>,
        limit: usize,
    }

    impl Write for LimitedWriter {
        fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
            let n = data.len().min(self.limit - self.buf.len());
            self.buf.extend_from_slice(&data[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// A reader that hands out one byte per call.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.0.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.0[0];
            self.0 = &self.0[1..];
            Ok(1)
        }
    }

    #[test]
    fn record_layout() {
        let record = encode(&ReverbParameters::default());
        assert_eq!(&record[0..4], b"RVRB");
        assert_eq!(&record[4..6], &[1, 0]);
        assert_eq!(&record[6..8], &[0, 0]);
        assert_eq!(&record[8..12], &0.33f32.to_le_bytes());
        assert_eq!(&record[24..28], &1.0f32.to_le_bytes());
        assert_eq!(&record[28..32], &[0, 0, 0, 0]);
    }

    #[test]
    fn save_load_round_trip() {
        let store = ParamStore::default();
        store.set(ParamId::Wet, 0.61);
        store.set(ParamId::Damping, 0.12);
        store.set_freeze(true);

        let mut bytes = Vec::new();
        save(&store, &mut bytes).unwrap();
        assert_eq!(bytes.len(), RECORD_SIZE);

        let restored = ParamStore::default();
        let loaded = load(&restored, &mut bytes.as_slice()).unwrap();
        assert_eq!(loaded, store.snapshot());
        assert_eq!(restored.snapshot(), store.snapshot());
    }

    #[test]
    fn short_write_fails() {
        let store = ParamStore::default();
        let mut out = LimitedWriter {
            buf: Vec::new(),
            limit: 10,
        };
        let err = save(&store, &mut out).unwrap_err();
        assert!(matches!(
            err,
            StateError::ShortWrite {
                written: 10,
                expected: RECORD_SIZE
            }
        ));
    }

    #[test]
    fn truncated_load_leaves_state_unchanged() {
        let source = ParamStore::default();
        source.set(ParamId::Width, 0.0);
        let mut bytes = Vec::new();
        save(&source, &mut bytes).unwrap();

        let target = ParamStore::default();
        target.set(ParamId::RoomSize, 0.9);
        let before = target.snapshot_with_generation();

        for len in 0..RECORD_SIZE {
            let err = load(&target, &mut &bytes[..len]).unwrap_err();
            assert!(matches!(err, StateError::ShortRead { read, .. } if read == len));
            assert_eq!(target.snapshot_with_generation(), before);
        }
    }

    #[test]
    fn load_from_trickling_stream() {
        let store = ParamStore::default();
        store.set(ParamId::Dry, 0.05);
        let bytes = encode(&store.snapshot());

        let restored = ParamStore::default();
        load(&restored, &mut Trickle(&bytes)).unwrap();
        assert_eq!(restored.get(ParamId::Dry), 0.05);
    }

    #[test]
    fn unknown_version_rejected() {
        let mut record = encode(&ReverbParameters::default());
        record[4] = 2;

        let store = ParamStore::default();
        let err = load(&store, &mut record.as_slice()).unwrap_err();
        assert!(matches!(err, StateError::UnknownFormat { version: 2, .. }));
        assert_eq!(store.generation(), 0);
    }

    #[test]
    fn bad_magic_rejected() {
        let mut record = encode(&ReverbParameters::default());
        record[0] = b'X';
        assert!(matches!(
            decode(&record),
            Err(StateError::UnknownFormat { .. })
        ));
    }

    #[test]
    fn non_finite_value_rejected() {
        let mut record = encode(&ReverbParameters::default());
        record[16..20].copy_from_slice(&f32::NAN.to_le_bytes());
        assert!(matches!(
            decode(&record),
            Err(StateError::InvalidValue { field: "room_size" })
        ));
    }

    #[test]
    fn out_of_range_values_clamped() {
        let mut record = encode(&ReverbParameters::default());
        record[12..16].copy_from_slice(&4.0f32.to_le_bytes());
        assert_eq!(decode(&record).unwrap().dry_level, 1.0);
    }

    #[test]
    fn extra_trailing_bytes_not_consumed() {
        let mut bytes = encode(&ReverbParameters::default()).to_vec();
        bytes.extend_from_slice(b"tail");

        let store = ParamStore::default();
        let mut cursor = bytes.as_slice();
        load(&store, &mut cursor).unwrap();
        assert_eq!(cursor, b"tail");
    }
}
