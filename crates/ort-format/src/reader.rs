// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Zero-copy reader over a finished buffer.
//!
//! Nothing is decoded eagerly: a [`Table`] is a bounds-checked window onto
//! the buffer, and each accessor reads (and validates) one field when
//! called. Every reference must point strictly before the object holding
//! it, so a well-formed buffer is acyclic and any descent through it
//! terminates.

use crate::schema::TableKind;
use crate::{FormatError, FORMAT_VERSION, HEADER_SIZE, MAGIC, MAX_SLOTS, TABLE_HEADER_SIZE};
use std::fmt;
use std::marker::PhantomData;

// ── Primitive reads ────────────────────────────────────────────────

fn slice(buf: &[u8], offset: usize, needed: usize) -> Result<&[u8], FormatError> {
    offset
        .checked_add(needed)
        .and_then(|end| buf.get(offset..end))
        .ok_or(FormatError::OutOfBounds {
            offset,
            needed,
            len: buf.len(),
        })
}

fn read_u32(buf: &[u8], offset: usize) -> Result<u32, FormatError> {
    let b = slice(buf, offset, 4)?;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

fn read_u64(buf: &[u8], offset: usize) -> Result<u64, FormatError> {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(slice(buf, offset, 8)?);
    Ok(u64::from_le_bytes(bytes))
}

/// Turns a stored offset into a position, checking it points backward.
fn resolve(buf: &[u8], from: usize, raw: u32) -> Result<Option<usize>, FormatError> {
    if raw == 0 {
        return Ok(None);
    }
    let target = raw as usize;
    if target < HEADER_SIZE || target >= from || target >= buf.len() {
        return Err(FormatError::BadReference { from, target });
    }
    Ok(Some(target))
}

/// Length-prefixed run of `width`-byte elements.
fn read_run(buf: &[u8], pos: usize, width: usize) -> Result<&[u8], FormatError> {
    let count = read_u32(buf, pos)? as usize;
    let needed = count.checked_mul(width).ok_or(FormatError::OutOfBounds {
        offset: pos,
        needed: usize::MAX,
        len: buf.len(),
    })?;
    slice(buf, pos + 4, needed)
}

fn read_str(buf: &[u8], pos: usize) -> Result<&str, FormatError> {
    let bytes = read_run(buf, pos, 1)?;
    std::str::from_utf8(bytes).map_err(|_| FormatError::InvalidUtf8 { offset: pos })
}

fn read_i64s(buf: &[u8], pos: usize) -> Result<Vec<i64>, FormatError> {
    let data = read_run(buf, pos, 8)?;
    Ok(data
        .chunks_exact(8)
        .map(|c| {
            let mut b = [0u8; 8];
            b.copy_from_slice(c);
            i64::from_le_bytes(b)
        })
        .collect())
}

fn read_f32s(buf: &[u8], pos: usize) -> Result<Vec<f32>, FormatError> {
    let data = read_run(buf, pos, 4)?;
    Ok(data
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

// ── Header ─────────────────────────────────────────────────────────

/// The fixed-size prefix of every buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u16,
    /// [`TableKind::ID`] of the root table.
    pub root_kind: u16,
    pub root_offset: u32,
}

/// Reads and validates the header without touching the root table.
pub fn read_header(buf: &[u8]) -> Result<Header, FormatError> {
    let head = slice(buf, 0, HEADER_SIZE)?;
    let found = [head[0], head[1], head[2], head[3]];
    if found != MAGIC {
        return Err(FormatError::BadMagic {
            expected: MAGIC,
            found,
        });
    }
    let version = u16::from_le_bytes([head[4], head[5]]);
    if version != FORMAT_VERSION {
        return Err(FormatError::UnsupportedVersion {
            found: version,
            supported: FORMAT_VERSION,
        });
    }
    Ok(Header {
        version,
        root_kind: u16::from_le_bytes([head[6], head[7]]),
        root_offset: read_u32(buf, 8)?,
    })
}

/// Opens the root table of `buf`, which must be of kind `K`.
pub fn root<K: TableKind>(buf: &[u8]) -> Result<Table<'_, K>, FormatError> {
    let header = read_header(buf)?;
    if header.root_kind != K::ID {
        return Err(FormatError::RootKindMismatch {
            expected: K::ID,
            expected_name: K::TYPE_NAME,
            found: header.root_kind,
        });
    }
    // The root is the only reference allowed to point anywhere past the
    // header; the buffer end plays the role of the referencing position.
    match resolve(buf, buf.len(), header.root_offset)? {
        Some(pos) => Table::at(buf, pos),
        None => Err(FormatError::BadReference {
            from: 8,
            target: 0,
        }),
    }
}

// ── Table ──────────────────────────────────────────────────────────

/// A read-only view of one table of kind `K`.
///
/// Per-kind field accessors live next to the kind definitions in
/// [`crate::schema`].
pub struct Table<'a, K> {
    buf: &'a [u8],
    pos: usize,
    slot_count: usize,
    mask: u32,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Clone for Table<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Table<'_, K> {}

impl<K: TableKind> fmt::Debug for Table<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", K::TYPE_NAME, self.pos)
    }
}

impl<'a, K: TableKind> Table<'a, K> {
    pub(crate) fn at(buf: &'a [u8], pos: usize) -> Result<Self, FormatError> {
        let head = slice(buf, pos, TABLE_HEADER_SIZE)?;
        let slot_count = head[0] as usize;
        if slot_count > MAX_SLOTS {
            return Err(FormatError::TooManySlots {
                offset: pos,
                slots: slot_count,
                max: MAX_SLOTS,
            });
        }
        let mask = u32::from_le_bytes([head[1], head[2], head[3], head[4]]);
        slice(buf, pos + TABLE_HEADER_SIZE, slot_count * 8)?;
        Ok(Self {
            buf,
            pos,
            slot_count,
            mask,
            _kind: PhantomData,
        })
    }

    /// Absolute position of the table in the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Whether `slot` was written. Slots beyond what the writer knew about
    /// read as absent.
    pub fn is_present(&self, slot: usize) -> bool {
        slot < self.slot_count && self.mask & (1 << slot) != 0
    }

    fn slot(&self, slot: usize) -> Result<Option<u64>, FormatError> {
        if !self.is_present(slot) {
            return Ok(None);
        }
        read_u64(self.buf, self.pos + TABLE_HEADER_SIZE + slot * 8).map(Some)
    }

    pub(crate) fn scalar_i64(&self, slot: usize) -> Result<i64, FormatError> {
        Ok(self.slot(slot)?.map_or(0, |bits| bits as i64))
    }

    pub(crate) fn scalar_i32(&self, slot: usize, field: &'static str) -> Result<i32, FormatError> {
        let value = self.scalar_i64(slot)?;
        i32::try_from(value).map_err(|_| FormatError::ScalarOverflow { field, value })
    }

    pub(crate) fn scalar_u32(&self, slot: usize, field: &'static str) -> Result<u32, FormatError> {
        let value = self.scalar_i64(slot)?;
        u32::try_from(value).map_err(|_| FormatError::ScalarOverflow { field, value })
    }

    pub(crate) fn scalar_u8(&self, slot: usize, field: &'static str) -> Result<u8, FormatError> {
        let value = self.scalar_i64(slot)?;
        u8::try_from(value).map_err(|_| FormatError::ScalarOverflow { field, value })
    }

    pub(crate) fn scalar_f32(&self, slot: usize, field: &'static str) -> Result<f32, FormatError> {
        self.scalar_u32(slot, field).map(f32::from_bits)
    }

    fn reference(&self, slot: usize) -> Result<Option<usize>, FormatError> {
        let Some(bits) = self.slot(slot)? else {
            return Ok(None);
        };
        let raw = u32::try_from(bits).map_err(|_| FormatError::BadReference {
            from: self.pos,
            target: bits as usize,
        })?;
        resolve(self.buf, self.pos, raw)
    }

    pub(crate) fn str_field(&self, slot: usize) -> Result<Option<&'a str>, FormatError> {
        self.reference(slot)?
            .map(|pos| read_str(self.buf, pos))
            .transpose()
    }

    pub(crate) fn bytes_field(&self, slot: usize) -> Result<Option<&'a [u8]>, FormatError> {
        self.reference(slot)?
            .map(|pos| read_run(self.buf, pos, 1))
            .transpose()
    }

    pub(crate) fn i64_vector_field(&self, slot: usize) -> Result<Option<Vec<i64>>, FormatError> {
        self.reference(slot)?
            .map(|pos| read_i64s(self.buf, pos))
            .transpose()
    }

    pub(crate) fn f32_vector_field(&self, slot: usize) -> Result<Option<Vec<f32>>, FormatError> {
        self.reference(slot)?
            .map(|pos| read_f32s(self.buf, pos))
            .transpose()
    }

    pub(crate) fn str_vector_field(&self, slot: usize) -> Result<Option<StrVector<'a>>, FormatError> {
        self.reference(slot)?
            .map(|pos| OffsetList::at(self.buf, pos).map(|list| StrVector { list }))
            .transpose()
    }

    pub(crate) fn table_field<C: TableKind>(
        &self,
        slot: usize,
    ) -> Result<Option<Table<'a, C>>, FormatError> {
        self.reference(slot)?
            .map(|pos| Table::at(self.buf, pos))
            .transpose()
    }

    pub(crate) fn table_vector_field<C: TableKind>(
        &self,
        slot: usize,
    ) -> Result<Option<TableVector<'a, C>>, FormatError> {
        self.reference(slot)?
            .map(|pos| {
                OffsetList::at(self.buf, pos).map(|list| TableVector {
                    list,
                    _kind: PhantomData,
                })
            })
            .transpose()
    }
}

// ── Offset vectors ─────────────────────────────────────────────────

#[derive(Clone, Copy)]
struct OffsetList<'a> {
    buf: &'a [u8],
    pos: usize,
    len: usize,
}

impl<'a> OffsetList<'a> {
    fn at(buf: &'a [u8], pos: usize) -> Result<Self, FormatError> {
        let len = read_run(buf, pos, 4)?.len() / 4;
        Ok(Self { buf, pos, len })
    }

    fn element(&self, index: usize) -> Result<Option<usize>, FormatError> {
        let offset = self.pos + 4 + index * 4;
        if index >= self.len {
            return Err(FormatError::OutOfBounds {
                offset,
                needed: 4,
                len: self.pos + 4 + self.len * 4,
            });
        }
        let raw = read_u32(self.buf, offset)?;
        resolve(self.buf, self.pos, raw)
    }
}

/// A vector of strings. Elements may be null.
#[derive(Clone, Copy)]
pub struct StrVector<'a> {
    list: OffsetList<'a>,
}

impl<'a> StrVector<'a> {
    pub fn len(&self) -> usize {
        self.list.len
    }

    pub fn is_empty(&self) -> bool {
        self.list.len == 0
    }

    pub fn get(&self, index: usize) -> Result<Option<&'a str>, FormatError> {
        let buf = self.list.buf;
        self.list
            .element(index)?
            .map(|pos| read_str(buf, pos))
            .transpose()
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<Option<&'a str>, FormatError>> + 'a {
        let this = *self;
        (0..this.len()).map(move |i| this.get(i))
    }
}

/// A vector of tables of kind `K`. Elements may be null.
pub struct TableVector<'a, K> {
    list: OffsetList<'a>,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Clone for TableVector<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for TableVector<'_, K> {}

impl<'a, K: TableKind> TableVector<'a, K> {
    pub fn len(&self) -> usize {
        self.list.len
    }

    pub fn is_empty(&self) -> bool {
        self.list.len == 0
    }

    pub fn get(&self, index: usize) -> Result<Option<Table<'a, K>>, FormatError> {
        let buf = self.list.buf;
        self.list
            .element(index)?
            .map(|pos| Table::at(buf, pos))
            .transpose()
    }

    pub fn iter(&self) -> impl Iterator<Item = Result<Option<Table<'a, K>>, FormatError>> + 'a {
        let this = *self;
        (0..this.len()).map(move |i| this.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Dimension, DimensionValue, OperatorSetId, Shape};
    use crate::{Offset, OrtBuilder, TableVec};

    fn opset_buffer() -> Vec<u8> {
        let mut b = OrtBuilder::new();
        let domain = b.create_string("com.microsoft");
        let mut t = b.start_table::<OperatorSetId>();
        t.add_offset(OperatorSetId::DOMAIN, domain);
        t.add_i64(OperatorSetId::VERSION, 1);
        let root = t.finish();
        b.finish(root).unwrap()
    }

    #[test]
    fn test_root_roundtrip() {
        let buf = opset_buffer();
        let t = root::<OperatorSetId>(&buf).unwrap();
        assert_eq!(t.domain().unwrap(), Some("com.microsoft"));
        assert_eq!(t.version().unwrap(), 1);
    }

    #[test]
    fn test_header_checks() {
        let buf = opset_buffer();

        let mut bad = buf.clone();
        bad[0] = b'X';
        assert!(matches!(root::<OperatorSetId>(&bad), Err(FormatError::BadMagic { .. })));

        let mut bad = buf.clone();
        bad[4] = 9;
        assert!(matches!(
            root::<OperatorSetId>(&bad),
            Err(FormatError::UnsupportedVersion { found: 9, .. })
        ));

        assert!(matches!(
            root::<Shape>(&buf),
            Err(FormatError::RootKindMismatch { .. })
        ));

        assert!(matches!(
            root::<OperatorSetId>(&buf[..6]),
            Err(FormatError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_truncated_table() {
        let buf = opset_buffer();
        let truncated = &buf[..buf.len() - 3];
        assert!(matches!(
            root::<OperatorSetId>(truncated),
            Err(FormatError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_forward_reference_rejected() {
        let mut buf = opset_buffer();
        let pos = read_header(&buf).unwrap().root_offset as usize;
        // Point the domain slot at the table itself.
        let slot = pos + TABLE_HEADER_SIZE + OperatorSetId::DOMAIN * 8;
        buf[slot..slot + 4].copy_from_slice(&(pos as u32).to_le_bytes());
        let t = root::<OperatorSetId>(&buf).unwrap();
        assert!(matches!(t.domain(), Err(FormatError::BadReference { .. })));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut buf = opset_buffer();
        buf[HEADER_SIZE + 4] = 0xff;
        let t = root::<OperatorSetId>(&buf).unwrap();
        assert!(matches!(t.domain(), Err(FormatError::InvalidUtf8 { .. })));
    }

    #[test]
    fn test_absent_vs_zero() {
        let mut b = OrtBuilder::new();
        let mut t = b.start_table::<DimensionValue>();
        t.add_i64(DimensionValue::DIM_VALUE, 0);
        let value = t.finish();
        let mut t = b.start_table::<Dimension>();
        t.add_offset(Dimension::VALUE, value);
        let dim = t.finish();
        let buf = b.finish(dim).unwrap();

        let d = root::<Dimension>(&buf).unwrap();
        assert!(d.denotation().unwrap().is_none());
        let v = d.value().unwrap().unwrap();
        assert!(v.is_present(DimensionValue::DIM_VALUE));
        assert!(!v.is_present(DimensionValue::DIM_PARAM));
        assert_eq!(v.dim_value().unwrap(), 0);
    }

    #[test]
    fn test_vector_with_null_element() {
        let mut b = OrtBuilder::new();
        let d = b.start_table::<Dimension>().finish();
        let dims: Offset<TableVec<Dimension>> = b.push_offsets(&[0, d.value()]);
        let mut t = b.start_table::<Shape>();
        t.add_offset(Shape::DIM, dims);
        let root_off = t.finish();
        let buf = b.finish(root_off).unwrap();

        let shape = root::<Shape>(&buf).unwrap();
        let dims = shape.dim().unwrap().unwrap();
        assert_eq!(dims.len(), 2);
        assert!(dims.get(0).unwrap().is_none());
        assert!(dims.get(1).unwrap().is_some());
        assert!(dims.get(2).is_err());
        assert_eq!(dims.iter().filter_map(|d| d.unwrap()).count(), 1);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn read_all(buf: &[u8]) -> Result<(), FormatError> {
            let shape = root::<Shape>(buf)?;
            if let Some(dims) = shape.dim()? {
                for dim in dims.iter() {
                    if let Some(dim) = dim? {
                        dim.denotation()?;
                        if let Some(value) = dim.value()? {
                            value.dim_type()?;
                            value.dim_value()?;
                            value.dim_param()?;
                        }
                    }
                }
            }
            Ok(())
        }

        fn shape_buffer() -> Vec<u8> {
            let mut b = OrtBuilder::new();
            let param = b.create_string("batch");
            let mut v = b.start_table::<DimensionValue>();
            v.add_u8(DimensionValue::DIM_TYPE, 2);
            v.add_offset(DimensionValue::DIM_PARAM, param);
            let value = v.finish();
            let mut d = b.start_table::<Dimension>();
            d.add_offset(Dimension::VALUE, value);
            let dim = d.finish();
            let dims = b.create_vector_of_tables(&[dim]);
            let mut t = b.start_table::<Shape>();
            t.add_offset(Shape::DIM, dims);
            let root_off = t.finish();
            b.finish(root_off).unwrap()
        }

        proptest! {
            #[test]
            fn prop_corrupted_byte_never_panics(index in any::<usize>(), byte in any::<u8>()) {
                let mut buf = shape_buffer();
                let i = index % buf.len();
                buf[i] = byte;
                let _ = read_all(&buf);
            }

            #[test]
            fn prop_arbitrary_body_never_panics(body in proptest::collection::vec(any::<u8>(), 0..256)) {
                let mut buf = shape_buffer()[..HEADER_SIZE].to_vec();
                buf.extend_from_slice(&body);
                let _ = read_all(&buf);
            }
        }
    }
}
