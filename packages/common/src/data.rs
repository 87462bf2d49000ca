use crate::error::DataError;
use crate::result::DataResult;

/// Read access to a byte document addressed by 64-bit positions
pub trait BinaryData {
    /// Number of bytes in the document
    fn size(&self) -> u64;

    /// Read a single byte
    fn get_byte(&self, position: u64) -> DataResult<u8>;

    /// Snapshot `length` bytes starting at `position` into an owned buffer
    fn copy(&self, position: u64, length: u64) -> DataResult<ByteArrayData>;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Copy the whole document
    fn to_vec(&self) -> DataResult<Vec<u8>> {
        self.copy(0, self.size()).map(ByteArrayData::into_inner)
    }
}

/// Mutation access to a byte document
pub trait EditableBinaryData: BinaryData {
    /// Insert `data` so that its first byte ends up at `position`
    fn insert(&mut self, position: u64, data: &[u8]) -> DataResult<()>;

    /// Remove `length` bytes starting at `position`
    fn remove(&mut self, position: u64, length: u64) -> DataResult<()>;

    /// Overwrite bytes starting at `position`; the range must already exist
    fn replace(&mut self, position: u64, data: &[u8]) -> DataResult<()>;

    fn set_byte(&mut self, position: u64, value: u8) -> DataResult<()> {
        self.replace(position, &[value])
    }
}

/// In-memory document backed by a `Vec<u8>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteArrayData {
    bytes: Vec<u8>,
}

impl ByteArrayData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.bytes
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    fn index(&self, position: u64) -> DataResult<usize> {
        usize::try_from(position).map_err(|_| DataError::Overflow)
    }

    fn check_range(&self, position: u64, length: u64) -> DataResult<(usize, usize)> {
        let size = self.size();
        let end = position.checked_add(length).ok_or(DataError::Overflow)?;
        if end > size {
            return Err(DataError::RangeOutOfBounds {
                position,
                length,
                size,
            });
        }
        Ok((self.index(position)?, self.index(end)?))
    }
}

impl From<Vec<u8>> for ByteArrayData {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl From<&[u8]> for ByteArrayData {
    fn from(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }
}

impl BinaryData for ByteArrayData {
    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn get_byte(&self, position: u64) -> DataResult<u8> {
        self.bytes
            .get(self.index(position)?)
            .copied()
            .ok_or(DataError::OutOfBounds {
                position,
                size: self.size(),
            })
    }

    fn copy(&self, position: u64, length: u64) -> DataResult<ByteArrayData> {
        let (start, end) = self.check_range(position, length)?;
        Ok(ByteArrayData::from(&self.bytes[start..end]))
    }

    fn to_vec(&self) -> DataResult<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

impl EditableBinaryData for ByteArrayData {
    fn insert(&mut self, position: u64, data: &[u8]) -> DataResult<()> {
        if position > self.size() {
            return Err(DataError::OutOfBounds {
                position,
                size: self.size(),
            });
        }
        let at = self.index(position)?;
        self.bytes.splice(at..at, data.iter().copied());
        Ok(())
    }

    fn remove(&mut self, position: u64, length: u64) -> DataResult<()> {
        let (start, end) = self.check_range(position, length)?;
        self.bytes.drain(start..end);
        Ok(())
    }

    fn replace(&mut self, position: u64, data: &[u8]) -> DataResult<()> {
        let (start, end) = self.check_range(position, data.len() as u64)?;
        self.bytes[start..end].copy_from_slice(data);
        Ok(())
    }
}
