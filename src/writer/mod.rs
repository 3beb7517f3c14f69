//! Writes the class file model back to bytes.
//!
//! Everything that can appear in a class file implements `Serialize`. Counts are never stored
//! in the model, so they are derived here from the length of the sequence they count; a
//! sequence longer than its count field allows fails with `Error::LengthOverflow`.

pub mod attributes;
pub mod class_file;

use byteorder::{BigEndian, WriteBytesExt};

use crate::error::{Error, Result};
use crate::model::class_file::{u1, u2, u4};

pub trait Serialize {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()>;
}

impl Serialize for u1 {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(*self)?;
        Ok(())
    }
}

impl Serialize for u2 {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        writer.write_u16::<BigEndian>(*self)?;
        Ok(())
    }
}

impl Serialize for u4 {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<BigEndian>(*self)?;
        Ok(())
    }
}

/// Writes `length` as a `u1` count.
pub fn write_u1_length<W: WriteBytesExt>(writer: &mut W, length: usize, what: &'static str)
                                         -> Result<()> {
    if length > u1::MAX as usize {
        return Err(Error::LengthOverflow { what: what, length: length });
    }
    (length as u1).serialize(writer)
}

/// Writes `length` as a `u2` count.
pub fn write_u2_length<W: WriteBytesExt>(writer: &mut W, length: usize, what: &'static str)
                                         -> Result<()> {
    if length > u2::MAX as usize {
        return Err(Error::LengthOverflow { what: what, length: length });
    }
    (length as u2).serialize(writer)
}

/// Writes `length` as a `u4` length.
pub fn write_u4_length<W: WriteBytesExt>(writer: &mut W, length: usize, what: &'static str)
                                         -> Result<()> {
    if length > u4::MAX as usize {
        return Err(Error::LengthOverflow { what: what, length: length });
    }
    (length as u4).serialize(writer)
}

/// Writes a `u2` count followed by each item.
pub fn write_u2_list<W, T>(writer: &mut W, items: &[T], what: &'static str) -> Result<()>
    where W: WriteBytesExt, T: Serialize
{
    write_u2_length(writer, items.len(), what)?;
    for item in items {
        item.serialize(writer)?;
    }
    Ok(())
}

/// Writes a `u1` count followed by each item.
pub fn write_u1_list<W, T>(writer: &mut W, items: &[T], what: &'static str) -> Result<()>
    where W: WriteBytesExt, T: Serialize
{
    write_u1_length(writer, items.len(), what)?;
    for item in items {
        item.serialize(writer)?;
    }
    Ok(())
}
