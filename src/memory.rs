use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Text encodings understood by [`ByteSource::read_string`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Charset {
    #[default]
    Ascii,
    Latin1,
    Utf8,
}

/// Read-only, addressable view of the memory instructions are decoded from.
///
/// Byte order is the source's decision; decoders only ask for 32-bit words.
pub trait ByteSource {
    fn read_u8(&self, addr: u32) -> Result<u8>;
    fn read_u32(&self, addr: u32) -> Result<u32>;

    /// Reads a null-terminated string starting at `addr`.
    fn read_string(&self, addr: u32, charset: Charset) -> Result<String> {
        let mut bytes = Vec::new();
        let mut at = addr;
        loop {
            let b = self.read_u8(at)?;
            if b == 0 {
                break;
            }
            bytes.push(b);
            at = at.wrapping_add(1);
        }
        Ok(match charset {
            Charset::Ascii => bytes
                .into_iter()
                .map(|b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
                .collect(),
            Charset::Latin1 => bytes.into_iter().map(char::from).collect(),
            Charset::Utf8 => String::from_utf8(bytes)?,
        })
    }
}

/// Flat memory image mapped at `base`.
#[derive(Clone, Serialize, Deserialize)]
pub struct MemoryImage {
    pub mem: Vec<u8>,
    pub base: u32,
    pub little_endian: bool,
}

impl MemoryImage {
    pub fn new(mem: Vec<u8>) -> Self {
        Self { mem, base: 0, little_endian: true }
    }

    pub fn with_base(mut self, base: u32) -> Self {
        self.base = base;
        self
    }

    pub fn big_endian(mut self) -> Self {
        self.little_endian = false;
        self
    }

    /// Builds a little-endian image from instruction words, handy for decoding
    /// hand-encoded sequences.
    pub fn from_words(words: &[u32]) -> Self {
        Self::new(words.iter().flat_map(|w| w.to_le_bytes()).collect())
    }

    pub fn end(&self) -> u32 {
        self.base.wrapping_add(self.mem.len() as u32)
    }

    fn offset(&self, addr: u32, len: usize) -> Result<usize> {
        let Some(off) = addr.checked_sub(self.base) else {
            bail!("read below image base: {addr:#010x}")
        };
        let off = off as usize;
        if off.checked_add(len).map_or(true, |end| end > self.mem.len()) {
            bail!("read out of bounds: {addr:#010x}");
        }
        Ok(off)
    }
}

impl ByteSource for MemoryImage {
    fn read_u8(&self, addr: u32) -> Result<u8> {
        let off = self.offset(addr, 1)?;
        Ok(self.mem[off])
    }

    fn read_u32(&self, addr: u32) -> Result<u32> {
        let off = self.offset(addr, 4)?;
        let bytes = [self.mem[off], self.mem[off + 1], self.mem[off + 2], self.mem[off + 3]];
        Ok(if self.little_endian {
            u32::from_le_bytes(bytes)
        } else {
            u32::from_be_bytes(bytes)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_words_in_configured_order() {
        let img = MemoryImage::new(vec![0x01, 0x02, 0x03, 0x04]);
        assert_eq!(img.read_u32(0).unwrap(), 0x0403_0201);
        let img = img.big_endian();
        assert_eq!(img.read_u32(0).unwrap(), 0x0102_0304);
    }

    #[test]
    fn honors_base_and_bounds() {
        let img = MemoryImage::from_words(&[0xdead_beef]).with_base(0x8800_0000);
        assert_eq!(img.read_u32(0x8800_0000).unwrap(), 0xdead_beef);
        assert_eq!(img.end(), 0x8800_0004);
        assert!(img.read_u32(0x8800_0002).is_err());
        assert!(img.read_u8(0x87ff_ffff).is_err());
    }

    #[test]
    fn reads_null_terminated_strings() {
        let img = MemoryImage::new(b"ab\0c\xe9\0".to_vec());
        assert_eq!(img.read_string(0, Charset::Ascii).unwrap(), "ab");
        assert_eq!(img.read_string(3, Charset::Latin1).unwrap(), "c\u{e9}");
        assert_eq!(img.read_string(3, Charset::Ascii).unwrap(), "c\u{fffd}");
        assert!(img.read_string(3, Charset::Utf8).is_err());
    }

    #[test]
    fn unterminated_string_fails() {
        let img = MemoryImage::new(b"abc".to_vec());
        assert!(img.read_string(0, Charset::Ascii).is_err());
    }
}
