//! ByteKiller decompression.
//!
//! All compressed bank payloads use the ByteKiller codec, a back-to-front
//! LZ scheme popular in Amiga demo tooling. The packed blob ends with a
//! 12-byte trailer: unpacked size, checksum, and the initial bit buffer,
//! each a big-endian u32. Bits are consumed from 32-bit words walking
//! backward through the input while output bytes are written backward from
//! `unpacked_size - 1`, which allows decompression in place: the packed
//! data sits at the front of a buffer sized for the unpacked data.

use byteorder::{BE, ByteOrder};

/// Errors produced while unpacking a ByteKiller stream.
#[derive(Debug, PartialEq, Eq)]
pub enum UnpackError {
    /// Trailer size field does not match the destination buffer.
    SizeMismatch { expected: usize, actual: usize },

    /// Input too short to contain the 12-byte trailer, or a refill or
    /// back-reference ran off the buffer.
    Truncated,

    /// Output cursor caught up with the input cursor mid-stream.
    Overlap,

    /// XOR checksum was non-zero after the last output byte.
    Checksum,
}

impl std::fmt::Display for UnpackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "unpacked size {actual} does not match trailer {expected}")
            }
            Self::Truncated => write!(f, "packed stream truncated"),
            Self::Overlap => write!(f, "packed stream overlaps its output"),
            Self::Checksum => write!(f, "packed stream checksum mismatch"),
        }
    }
}

impl std::error::Error for UnpackError {}

/// Decompress a ByteKiller stream in place.
///
/// `data` must be sized for the unpacked output, with the packed bytes
/// occupying `data[..packed_len]`. On success the whole of `data` holds
/// the unpacked payload.
pub fn unpack_in_place(data: &mut [u8], packed_len: usize) -> Result<(), UnpackError> {
    if packed_len < 12 || packed_len > data.len() {
        return Err(UnpackError::Truncated);
    }

    let unpacked_size = BE::read_u32(&data[packed_len - 4..]) as usize;
    if unpacked_size != data.len() {
        return Err(UnpackError::SizeMismatch {
            expected: unpacked_size,
            actual: data.len(),
        });
    }

    let crc = BE::read_u32(&data[packed_len - 8..]);
    let chk = BE::read_u32(&data[packed_len - 12..]);

    let mut ctx = UnpackContext {
        data,
        crc: crc ^ chk,
        chk,
        in_pos: packed_len - 12,
        out_pos: unpacked_size,
    };
    ctx.run()
}

/// Cursor state for one in-place unpack. `in_pos` walks backward through
/// the packed words, `out_pos` backward through the output bytes; the two
/// never cross in a well-formed stream.
struct UnpackContext<'a> {
    data: &'a mut [u8],
    crc: u32,
    chk: u32,
    in_pos: usize,
    out_pos: usize,
}

impl UnpackContext<'_> {
    fn run(&mut self) -> Result<(), UnpackError> {
        while self.out_pos > 0 {
            if self.next_bit()? {
                match self.get_code(2)? {
                    // 8-bit count, literal run of count + 9
                    3 => self.literal_run(8, 9)?,
                    // 9- or 10-bit offset, back-reference of 3 or 4 bytes
                    c @ 0..=1 => self.back_reference((c + 9) as u8, c as usize + 3)?,
                    // 8-bit count then 12-bit offset, back-reference of count + 1
                    _ => {
                        let count = self.get_code(8)? as usize;
                        self.back_reference(12, count + 1)?;
                    }
                }
            } else if self.next_bit()? {
                // 8-bit offset, 2-byte back-reference
                self.back_reference(8, 2)?;
            } else {
                // 3-bit count, literal run of count + 1
                self.literal_run(3, 1)?;
            }
        }

        match self.crc {
            0 => Ok(()),
            _ => Err(UnpackError::Checksum),
        }
    }

    /// Shift the next bit out of the rotating buffer, refilling from the
    /// preceding input word when the buffer empties. The refill plants a
    /// marker in the top bit so exhaustion is detectable without a counter.
    fn next_bit(&mut self) -> Result<bool, UnpackError> {
        let bit = self.chk & 1 == 1;
        self.chk >>= 1;
        if self.chk != 0 {
            return Ok(bit);
        }

        if self.in_pos < 4 {
            return Err(UnpackError::Truncated);
        }
        self.in_pos -= 4;
        let word = BE::read_u32(&self.data[self.in_pos..self.in_pos + 4]);
        self.crc ^= word;

        let bit = word & 1 == 1;
        self.chk = (word >> 1) | 0x8000_0000;
        Ok(bit)
    }

    /// Read `count` bits, most significant first.
    fn get_code(&mut self, count: u8) -> Result<u16, UnpackError> {
        let mut value = 0u16;
        for _ in 0..count {
            value = (value << 1) | self.next_bit()? as u16;
        }
        Ok(value)
    }

    fn emit(&mut self, byte: u8) -> Result<(), UnpackError> {
        if self.out_pos <= self.in_pos {
            return Err(UnpackError::Overlap);
        }
        self.out_pos -= 1;
        self.data[self.out_pos] = byte;
        Ok(())
    }

    fn literal_run(&mut self, count_bits: u8, base: u16) -> Result<(), UnpackError> {
        let count = self.get_code(count_bits)? + base;
        for _ in 0..count {
            let byte = self.get_code(8)? as u8;
            self.emit(byte)?;
        }
        Ok(())
    }

    fn back_reference(&mut self, offset_bits: u8, count: usize) -> Result<(), UnpackError> {
        let offset = self.get_code(offset_bits)? as usize;
        for _ in 0..count {
            if self.out_pos + offset > self.data.len() {
                return Err(UnpackError::Truncated);
            }
            let byte = self.data[self.out_pos + offset - 1];
            self.emit(byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{BE, ByteOrder};

    /// Builds a packed stream bit-by-bit in decoder consumption order,
    /// then lays the words out the way `unpack_in_place` walks them.
    struct Packer {
        bits: Vec<bool>,
    }

    impl Packer {
        fn new() -> Self {
            Self { bits: Vec::new() }
        }

        fn push_bits(&mut self, value: u32, count: u8) {
            for i in (0..count).rev() {
                self.bits.push(value >> i & 1 == 1);
            }
        }

        fn literal_run(&mut self, bytes: &[u8]) {
            assert!((1..=8).contains(&bytes.len()));
            self.push_bits(0b00, 2);
            self.push_bits(bytes.len() as u32 - 1, 3);
            for &b in bytes {
                self.push_bits(b as u32, 8);
            }
        }

        fn long_copy(&mut self, offset: u16, count: u16) {
            self.push_bits(0b110, 3);
            self.push_bits(count as u32 - 1, 8);
            self.push_bits(offset as u32, 12);
        }

        fn finish(self, unpacked_size: usize) -> Vec<u8> {
            // First-consumed bits go in the trailer word (with a marker bit
            // above them); each following group of 32 fills a data word,
            // last-consumed word first in the file.
            let leftover = self.bits.len() % 32;
            let mut iter = self.bits.into_iter();

            let mut chk = 1u32 << leftover;
            for i in 0..leftover {
                if iter.next().unwrap() {
                    chk |= 1 << i;
                }
            }

            let mut words = Vec::new();
            while let Some(bit) = iter.next() {
                let mut word = bit as u32;
                for i in 1..32 {
                    if iter.next().unwrap() {
                        word |= 1 << i;
                    }
                }
                words.push(word);
            }
            // Consumption refills backward from the end of the data area.
            words.reverse();

            let crc = words.iter().fold(chk, |acc, w| acc ^ w);

            let mut out = Vec::new();
            let mut scratch = [0u8; 4];
            for w in words {
                BE::write_u32(&mut scratch, w);
                out.extend_from_slice(&scratch);
            }
            for w in [chk, crc, unpacked_size as u32] {
                BE::write_u32(&mut scratch, w);
                out.extend_from_slice(&scratch);
            }
            out
        }
    }

    #[test]
    fn literal_and_copy_round_trip() {
        // Output is written back-to-front: the literal run fills the tail
        // of the buffer, then 56 single-byte back-references propagate the
        // last literal down to the front.
        let mut p = Packer::new();
        p.literal_run(&[8, 7, 6, 5, 4, 3, 2, 1]);
        p.long_copy(1, 56);
        let packed = p.finish(64);
        let packed_len = packed.len();

        let mut buf = vec![0u8; 64];
        buf[..packed_len].copy_from_slice(&packed);
        unpack_in_place(&mut buf, packed_len).unwrap();

        assert_eq!(&buf[56..], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(buf[..56].iter().all(|&b| b == 1));
    }

    #[test]
    fn corrupt_checksum_rejected() {
        let mut p = Packer::new();
        p.literal_run(&[0xAA; 8]);
        p.long_copy(1, 56);
        let mut packed = p.finish(64);
        let packed_len = packed.len();
        // Flip a payload bit; the XOR accumulator must catch it.
        packed[0] ^= 0x40;

        let mut buf = vec![0u8; 64];
        buf[..packed_len].copy_from_slice(&packed);
        let err = unpack_in_place(&mut buf, packed_len).unwrap_err();
        assert_eq!(err, UnpackError::Checksum);
    }

    #[test]
    fn trailer_size_must_match_buffer() {
        let mut p = Packer::new();
        p.literal_run(&[1]);
        let packed = p.finish(64);
        let packed_len = packed.len();

        let mut buf = vec![0u8; 128];
        buf[..packed_len].copy_from_slice(&packed);
        assert!(matches!(
            unpack_in_place(&mut buf, packed_len),
            Err(UnpackError::SizeMismatch { expected: 64, actual: 128 })
        ));
    }

    #[test]
    fn short_input_rejected() {
        let mut buf = [0u8; 8];
        assert_eq!(unpack_in_place(&mut buf, 8), Err(UnpackError::Truncated));
    }
}
