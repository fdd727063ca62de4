// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Append-only buffer builder.
//!
//! Objects are written children-first: a table can only reference offsets
//! that already exist when it is finished. [`TableWriter`] holds the builder
//! mutably, so the borrow checker rejects any attempt to create a child
//! while its parent table is open.
//!
//! ```text
//! OrtBuilder::new()          [header placeholder]
//!   create_string("x")       [header][len "x"]
//!   start_table::<ValueInfo>()
//!     add_offset(NAME, x)
//!   finish()                 [header][len "x"][table ─▶ "x"]
//! finish(root)               header filled in, buffer returned
//! ```

use crate::schema::TableKind;
use crate::{FormatError, FORMAT_VERSION, HEADER_SIZE, MAGIC, MAX_SLOTS};
use std::fmt;
use std::marker::PhantomData;

// ── Offsets ────────────────────────────────────────────────────────

/// A typed handle to an object already written into an [`OrtBuilder`].
///
/// The type parameter records what the offset points at, so a string
/// offset cannot be stored in a slot that expects a table.
pub struct Offset<T> {
    pos: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Offset<T> {
    pub(crate) fn new(pos: u32) -> Self {
        Self {
            pos,
            _marker: PhantomData,
        }
    }

    /// Absolute position in the buffer.
    pub fn value(self) -> u32 {
        self.pos
    }
}

impl<T> Clone for Offset<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Offset<T> {}

impl<T> PartialEq for Offset<T> {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl<T> Eq for Offset<T> {}

impl<T> fmt::Debug for Offset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Offset({})", self.pos)
    }
}

/// Marker: a UTF-8 string.
pub enum Str {}
/// Marker: a byte vector.
pub enum ByteVec {}
/// Marker: a vector of `i64`.
pub enum I64Vec {}
/// Marker: a vector of `f32`.
pub enum F32Vec {}
/// Marker: a vector of string offsets.
pub enum StrVec {}
/// Marker: a vector of offsets to tables of kind `K`.
pub struct TableVec<K>(PhantomData<fn() -> K>);

// ── OrtBuilder ─────────────────────────────────────────────────────

/// Single-owner, append-only builder for one ORT format buffer.
///
/// One builder is threaded through an entire save by `&mut`; on error the
/// caller drops it, since a half-built buffer is not a valid state.
pub struct OrtBuilder {
    buf: Vec<u8>,
}

impl Default for OrtBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OrtBuilder {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Creates a builder with room for `capacity` bytes before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = Vec::with_capacity(capacity.max(HEADER_SIZE));
        buf.resize(HEADER_SIZE, 0);
        Self { buf }
    }

    /// Bytes written so far, header included.
    pub fn size(&self) -> usize {
        self.buf.len()
    }

    // Positions beyond the u32 range saturate; `finish` rejects the buffer.
    fn position(&self) -> u32 {
        u32::try_from(self.buf.len()).unwrap_or(u32::MAX)
    }

    fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    fn put_len(&mut self, len: usize) {
        self.put_u32(u32::try_from(len).unwrap_or(u32::MAX));
    }

    fn push_blob<T>(&mut self, data: &[u8]) -> Offset<T> {
        let pos = self.position();
        self.put_len(data.len());
        self.buf.extend_from_slice(data);
        Offset::new(pos)
    }

    pub(crate) fn push_offsets<T>(&mut self, offsets: &[u32]) -> Offset<T> {
        let pos = self.position();
        self.put_len(offsets.len());
        for &o in offsets {
            self.put_u32(o);
        }
        Offset::new(pos)
    }

    pub fn create_string(&mut self, s: &str) -> Offset<Str> {
        self.push_blob(s.as_bytes())
    }

    pub fn create_bytes(&mut self, data: &[u8]) -> Offset<ByteVec> {
        self.push_blob(data)
    }

    pub fn create_i64_vector(&mut self, values: &[i64]) -> Offset<I64Vec> {
        let pos = self.position();
        self.put_len(values.len());
        for v in values {
            self.buf.extend_from_slice(&v.to_le_bytes());
        }
        Offset::new(pos)
    }

    pub fn create_f32_vector(&mut self, values: &[f32]) -> Offset<F32Vec> {
        let pos = self.position();
        self.put_len(values.len());
        for v in values {
            self.buf.extend_from_slice(&v.to_le_bytes());
        }
        Offset::new(pos)
    }

    /// Writes every string, then the vector referencing them.
    pub fn create_vector_of_strings<S: AsRef<str>>(&mut self, items: &[S]) -> Offset<StrVec> {
        let offsets: Vec<u32> = items
            .iter()
            .map(|s| self.create_string(s.as_ref()).value())
            .collect();
        self.push_offsets(&offsets)
    }

    pub fn create_vector_of_tables<K: TableKind>(&mut self, items: &[Offset<K>]) -> Offset<TableVec<K>> {
        let offsets: Vec<u32> = items.iter().map(|o| o.value()).collect();
        self.push_offsets(&offsets)
    }

    /// Opens a table of kind `K`. Nothing else can be written until the
    /// returned writer is finished.
    pub fn start_table<K: TableKind>(&mut self) -> TableWriter<'_, K> {
        TableWriter {
            builder: self,
            mask: 0,
            slots: [0; MAX_SLOTS],
            _kind: PhantomData,
        }
    }

    /// Fills in the header with `root` and returns the finished buffer.
    pub fn finish<K: TableKind>(mut self, root: Offset<K>) -> Result<Vec<u8>, FormatError> {
        let size = self.buf.len();
        if u32::try_from(size).is_err() {
            return Err(FormatError::BufferTooLarge { size });
        }
        self.buf[0..4].copy_from_slice(&MAGIC);
        self.buf[4..6].copy_from_slice(&FORMAT_VERSION.to_le_bytes());
        self.buf[6..8].copy_from_slice(&K::ID.to_le_bytes());
        self.buf[8..12].copy_from_slice(&root.value().to_le_bytes());
        Ok(self.buf)
    }
}

// ── TableWriter ────────────────────────────────────────────────────

/// An open table. Slots left unset are written as absent.
pub struct TableWriter<'b, K: TableKind> {
    builder: &'b mut OrtBuilder,
    mask: u32,
    slots: [u64; MAX_SLOTS],
    _kind: PhantomData<fn() -> K>,
}

impl<'b, K: TableKind> TableWriter<'b, K> {
    fn set(&mut self, slot: usize, bits: u64) {
        debug_assert!(slot < K::SLOT_COUNT, "{} has no slot {slot}", K::TYPE_NAME);
        self.mask |= 1 << slot;
        self.slots[slot] = bits;
    }

    pub fn add_i64(&mut self, slot: usize, value: i64) {
        self.set(slot, value as u64);
    }

    /// Stored sign-extended, so the reader can detect values that were
    /// written wider than the field allows.
    pub fn add_i32(&mut self, slot: usize, value: i32) {
        self.set(slot, i64::from(value) as u64);
    }

    pub fn add_u32(&mut self, slot: usize, value: u32) {
        self.set(slot, u64::from(value));
    }

    pub fn add_u8(&mut self, slot: usize, value: u8) {
        self.set(slot, u64::from(value));
    }

    pub fn add_f32(&mut self, slot: usize, value: f32) {
        self.set(slot, u64::from(value.to_bits()));
    }

    pub fn add_offset<T>(&mut self, slot: usize, offset: Offset<T>) {
        self.set(slot, u64::from(offset.value()));
    }

    /// Writes the table and returns its offset.
    pub fn finish(self) -> Offset<K> {
        let pos = self.builder.position();
        let buf = &mut self.builder.buf;
        buf.push(K::SLOT_COUNT as u8);
        buf.extend_from_slice(&self.mask.to_le_bytes());
        for bits in &self.slots[..K::SLOT_COUNT] {
            buf.extend_from_slice(&bits.to_le_bytes());
        }
        Offset::new(pos)
    }
}
