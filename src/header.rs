//! Decoding of 512-byte tar header blocks.
//!
//! Fields are read at fixed byte offsets into owned values; nothing here
//! depends on the in-memory layout of a struct.
//!
//! | Offset | Size | Field     |
//! |--------|------|-----------|
//! | 0      | 100  | name      |
//! | 100    | 8    | mode      |
//! | 108    | 8    | uid       |
//! | 116    | 8    | gid       |
//! | 124    | 12   | size      |
//! | 136    | 12   | mtime     |
//! | 148    | 8    | checksum  |
//! | 156    | 1    | typeflag  |
//! | 157    | 100  | linkname  |
//! | 257    | 6    | magic     |
//! | 263    | 2    | version   |
//! | 265    | 32   | uname     |
//! | 297    | 32   | gname     |
//! | 329    | 8    | devmajor  |
//! | 337    | 8    | devminor  |
//! | 345    | 155  | prefix    |
//!
//! Only GNU-style headers (`"ustar "` magic, `" \0"` version) describing
//! regular files are accepted.

use std::ops::Range;

use crate::error::FormatError;
use crate::octal::{decode_octal, octal_field};

/// Size of every block in the archive, headers and payload alike.
pub const BLOCK_SIZE: usize = 512;

/// The combined magic and version fields of a GNU tar header.
pub const GNU_SIGNATURE: &[u8; 8] = b"ustar  \0";

/// Type code of a regular file.
pub const REGTYPE: u8 = b'0';

const NAME: Range<usize> = 0..100;
const MODE: Range<usize> = 100..108;
const UID: Range<usize> = 108..116;
const GID: Range<usize> = 116..124;
const SIZE: Range<usize> = 124..136;
const MTIME: Range<usize> = 136..148;
const TYPEFLAG: usize = 156;
const LINKNAME: Range<usize> = 157..257;
const SIGNATURE: Range<usize> = 257..265;
const UNAME: Range<usize> = 265..297;
const GNAME: Range<usize> = 297..329;
const PREFIX: Range<usize> = 345..500;

/// Decoded view of one header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRecord {
    /// Entry path, exactly as stored in the name field.
    pub name: String,
    pub mode: u64,
    pub uid: u64,
    pub gid: u64,
    /// Payload length in bytes.
    pub size: u64,
    pub mtime: u64,
    pub typeflag: u8,
    pub link_name: String,
    pub uname: String,
    pub gname: String,
    /// Decoded but never joined with `name`.
    pub prefix: String,
}

impl HeaderRecord {
    /// Validates and decodes a header block.
    ///
    /// The signature is checked before the type code, so a block that is not
    /// a tar header at all is always reported as such.
    pub fn decode(block: &[u8; BLOCK_SIZE]) -> Result<Self, FormatError> {
        if &block[SIGNATURE] != GNU_SIGNATURE {
            return Err(FormatError::NotATarArchive);
        }

        let typeflag = block[TYPEFLAG];
        if typeflag != REGTYPE {
            return Err(FormatError::UnsupportedEntryType(typeflag));
        }

        Ok(Self {
            name: text_field(&block[NAME]),
            mode: numeric_field(&block[MODE]),
            uid: numeric_field(&block[UID]),
            gid: numeric_field(&block[GID]),
            size: numeric_field(&block[SIZE]),
            mtime: numeric_field(&block[MTIME]),
            typeflag,
            link_name: text_field(&block[LINKNAME]),
            uname: text_field(&block[UNAME]),
            gname: text_field(&block[GNAME]),
            prefix: text_field(&block[PREFIX]),
        })
    }

    /// Number of payload blocks following the header.
    pub fn block_count(&self) -> u64 {
        self.size.div_ceil(BLOCK_SIZE as u64)
    }

    /// Bytes of payload stored in the final block; `BLOCK_SIZE` when the size
    /// is an exact multiple. Meaningless for empty entries.
    pub fn tail_len(&self) -> usize {
        match (self.size % BLOCK_SIZE as u64) as usize {
            0 => BLOCK_SIZE,
            rem => rem,
        }
    }
}

/// Returns true if every byte of the block is zero.
pub fn is_zero_block(block: &[u8; BLOCK_SIZE]) -> bool {
    block.iter().all(|&b| b == 0)
}

fn truncate_null(field: &[u8]) -> &[u8] {
    match field.iter().position(|&b| b == 0) {
        Some(pos) => &field[..pos],
        None => field,
    }
}

fn text_field(field: &[u8]) -> String {
    String::from_utf8_lossy(truncate_null(field)).into_owned()
}

fn numeric_field(field: &[u8]) -> u64 {
    decode_octal(octal_field(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::HeaderBuilder;

    #[test]
    fn decodes_regular_file() {
        let block = HeaderBuilder::new("dir/a.txt", 10)
            .mode(0o644)
            .owner(1000, 100)
            .mtime(1234567890)
            .build();
        let header = HeaderRecord::decode(&block).unwrap();

        assert_eq!(header.name, "dir/a.txt");
        assert_eq!(header.size, 10);
        assert_eq!(header.mode, 0o644);
        assert_eq!(header.uid, 1000);
        assert_eq!(header.gid, 100);
        assert_eq!(header.mtime, 1234567890);
        assert_eq!(header.typeflag, REGTYPE);
        assert_eq!(header.link_name, "");
        assert_eq!(header.uname, "user");
        assert_eq!(header.gname, "group");
        assert_eq!(header.prefix, "");
    }

    #[test]
    fn full_width_mode_field() {
        // eight digits, no terminator, followed directly by the uid field
        let block = HeaderBuilder::new("a", 0).raw(100, b"77777777").build();
        let header = HeaderRecord::decode(&block).unwrap();
        assert_eq!(header.mode, 0o77777777);
    }

    #[test]
    fn name_uses_whole_field_without_terminator() {
        let name = "n".repeat(100);
        let block = HeaderBuilder::new(&name, 0).build();
        let header = HeaderRecord::decode(&block).unwrap();
        assert_eq!(header.name, name);
    }

    #[test]
    fn prefix_is_not_joined() {
        let block = HeaderBuilder::new("file", 0).prefix("some/dir").build();
        let header = HeaderRecord::decode(&block).unwrap();
        assert_eq!(header.name, "file");
        assert_eq!(header.prefix, "some/dir");
    }

    #[test]
    fn rejects_posix_ustar_magic() {
        let block = HeaderBuilder::new("a", 0).signature(*b"ustar\x0000").build();
        assert_eq!(
            HeaderRecord::decode(&block),
            Err(FormatError::NotATarArchive)
        );
    }

    #[test]
    fn signature_checked_before_type() {
        let block = HeaderBuilder::new("a", 0)
            .typeflag(b'5')
            .signature(*b"garbage!")
            .build();
        assert_eq!(
            HeaderRecord::decode(&block),
            Err(FormatError::NotATarArchive)
        );
    }

    #[test]
    fn rejects_non_regular_types() {
        for code in [b'1', b'2', b'5', b'L', b'x', b'\0'] {
            let block = HeaderBuilder::new("a", 0).typeflag(code).build();
            assert_eq!(
                HeaderRecord::decode(&block),
                Err(FormatError::UnsupportedEntryType(code))
            );
        }
    }

    #[test]
    fn block_arithmetic() {
        let header = |size| {
            let block = HeaderBuilder::new("a", size).build();
            HeaderRecord::decode(&block).unwrap()
        };

        assert_eq!(header(0).block_count(), 0);
        assert_eq!(header(1).block_count(), 1);
        assert_eq!(header(1).tail_len(), 1);
        assert_eq!(header(512).block_count(), 1);
        assert_eq!(header(512).tail_len(), 512);
        assert_eq!(header(513).block_count(), 2);
        assert_eq!(header(513).tail_len(), 1);
        assert_eq!(header(1000).tail_len(), 488);
    }

    #[test]
    fn zero_block_detection() {
        assert!(is_zero_block(&[0u8; BLOCK_SIZE]));
        let mut block = [0u8; BLOCK_SIZE];
        block[511] = 1;
        assert!(!is_zero_block(&block));
    }
}
