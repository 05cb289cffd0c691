// src/format/byte_stream.rs

//! Little-endian read/write helpers for the level byte file.
//!
//! Every field of the file is a 4-byte `i32` or `f32`. Reads that run past the
//! end of the input report which field was missing, which is more useful than
//! a bare `UnexpectedEof` when a level file has been cut short.

use crate::utils::error::{LevelError, Result};
use bytemuck::{Pod, Zeroable, cast_slice};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

fn field_error(field: &str, err: io::Error) -> LevelError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        LevelError::Format(format!("truncated level file while reading {field}"))
    } else {
        LevelError::Io(err)
    }
}

/// Reading side of the level byte stream.
pub trait ByteReader: Read {
    fn read_i32_le(&mut self, field: &str) -> Result<i32> {
        ReadBytesExt::read_i32::<LittleEndian>(self).map_err(|e| field_error(field, e))
    }

    fn read_f32_le(&mut self, field: &str) -> Result<f32> {
        ReadBytesExt::read_f32::<LittleEndian>(self).map_err(|e| field_error(field, e))
    }

    /// Reads a count field and rejects negative values.
    fn read_count(&mut self, field: &str) -> Result<usize> {
        let value = self.read_i32_le(field)?;
        usize::try_from(value).map_err(|_| LevelError::Format(format!("negative {field}: {value}")))
    }

    /// Reads `count` consecutive `i32` values.
    fn read_i32_slice(&mut self, count: usize, field: &str) -> Result<Vec<i32>> {
        let mut buffer = vec![0u8; count * 4];
        self.read_exact(&mut buffer).map_err(|e| field_error(field, e))?;
        let values: &[LeI32] = cast_slice(&buffer);
        Ok(values.iter().map(|&v| v.into()).collect())
    }
}

impl<T: Read + ?Sized> ByteReader for T {}

/// Writing side of the level byte stream.
pub trait ByteWriter: Write {
    fn write_i32_le(&mut self, value: i32) -> Result<()> {
        Ok(WriteBytesExt::write_i32::<LittleEndian>(self, value)?)
    }

    fn write_f32_le(&mut self, value: f32) -> Result<()> {
        Ok(WriteBytesExt::write_f32::<LittleEndian>(self, value)?)
    }

    /// Writes a length as an `i32` count field.
    fn write_count(&mut self, count: usize) -> Result<()> {
        let value = i32::try_from(count)
            .map_err(|_| LevelError::InvalidArg(format!("count {count} does not fit in an i32 field")))?;
        self.write_i32_le(value)
    }

    /// Writes a slice of `i32` values in one call.
    fn write_i32_slice(&mut self, values: &[i32]) -> Result<()> {
        let le_values: Vec<LeI32> = values.iter().map(|&v| v.into()).collect();
        self.write_all(cast_slice(&le_values))?;
        Ok(())
    }
}

impl<T: Write + ?Sized> ByteWriter for T {}

/// Little-endian i32 that can be safely cast to/from bytes
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct LeI32([u8; 4]);

impl From<i32> for LeI32 {
    fn from(value: i32) -> Self {
        LeI32(value.to_le_bytes())
    }
}

impl From<LeI32> for i32 {
    fn from(value: LeI32) -> Self {
        i32::from_le_bytes(value.0)
    }
}
