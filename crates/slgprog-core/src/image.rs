//! Fixed-width HEX image decoding and encoding
//!
//! Images are Intel-HEX text as exported by the vendor's designer tool: one
//! 44-byte record per page (`:10AAAA00` + 32 hex digits + checksum + `\n`).
//! The decoder trusts that layout and only looks at the data digits of each
//! record, which start 9 bytes into the record. Record type, address and
//! checksum are not checked, so any file with valid hex digits at those
//! positions decodes.

use core::fmt;

use crate::device::{pages, PageBuffer, PAGE_COUNT, PAGE_SIZE};
use crate::error::{ImageError, Result};

/// Width of one record including the line terminator
pub const RECORD_LEN: usize = 44;

/// Position of the first data digit within a record
pub const PAYLOAD_OFFSET: usize = 9;

/// Shortest image that holds every data digit
pub const MIN_IMAGE_LEN: usize = (PAGE_COUNT - 1) * RECORD_LEN + PAYLOAD_OFFSET + 2 * PAGE_SIZE;

/// Record emitted after the data records by [`encode`]
pub const EOF_RECORD: &str = ":00000001FF\n";

/// Length of an image produced by [`encode`]
pub const ENCODED_LEN: usize = PAGE_COUNT * RECORD_LEN + EOF_RECORD.len();

/// Data record type
const RECORD_DATA: u8 = 0x00;

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Position of the first digit of `offset` in page `page`'s record
pub const fn field_position(page: u8, offset: u8) -> usize {
    page as usize * RECORD_LEN + PAYLOAD_OFFSET + 2 * offset as usize
}

/// Decode a HEX image into the page matrix to be written
///
/// The image is not modified. Fails with [`Error::MalformedImage`] when the
/// image is shorter than [`MIN_IMAGE_LEN`] or a data field is not two hex
/// digits.
///
/// [`Error::MalformedImage`]: crate::Error::MalformedImage
pub fn decode(image: &[u8]) -> Result<PageBuffer> {
    if image.len() < MIN_IMAGE_LEN {
        return Err(ImageError::TooShort {
            len: image.len(),
            required: MIN_IMAGE_LEN,
        }
        .into());
    }

    let mut buf = PageBuffer::default();
    for page in pages() {
        for (offset, byte) in (0u8..).zip(buf.page_mut(page).iter_mut()) {
            let position = field_position(page, offset);
            let hi = hex_digit(image[position]);
            let lo = hex_digit(image[position + 1]);
            *byte = match (hi, lo) {
                (Some(hi), Some(lo)) => (hi << 4) | lo,
                _ => {
                    return Err(ImageError::InvalidHex {
                        page,
                        offset,
                        position,
                    }
                    .into())
                }
            };
        }
    }

    log::debug!("Decoded {} byte image into {} pages", image.len(), PAGE_COUNT);
    Ok(buf)
}

/// Render `pages` as a HEX image that [`decode`] reads back unchanged
///
/// Emits one 16-byte data record per page followed by [`EOF_RECORD`].
pub fn encode<W: fmt::Write>(pages: &PageBuffer, out: &mut W) -> fmt::Result {
    for (page, data) in pages.iter() {
        let addr = u16::from(page) * PAGE_SIZE as u16;
        let [addr_hi, addr_lo] = addr.to_be_bytes();

        let mut sum = (PAGE_SIZE as u8)
            .wrapping_add(addr_hi)
            .wrapping_add(addr_lo)
            .wrapping_add(RECORD_DATA);

        write!(out, ":{:02X}{:04X}{:02X}", PAGE_SIZE, addr, RECORD_DATA)?;
        for &b in data {
            write!(out, "{:02X}", b)?;
            sum = sum.wrapping_add(b);
        }
        writeln!(out, "{:02X}", sum.wrapping_neg())?;
    }
    out.write_str(EOF_RECORD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::protocol::write_command;
    use std::string::String;
    use std::vec::Vec;

    fn encoded(pages: &PageBuffer) -> String {
        let mut out = String::new();
        encode(pages, &mut out).unwrap();
        out
    }

    fn counting_pattern() -> PageBuffer {
        let mut buf = PageBuffer::default();
        for page in 0..PAGE_COUNT as u8 {
            for (offset, b) in buf.page_mut(page).iter_mut().enumerate() {
                *b = page.wrapping_mul(31).wrapping_add(offset as u8 * 7);
            }
        }
        buf
    }

    #[test]
    fn test_decode_all_aa() {
        let image = encoded(&PageBuffer::filled(0xAA));
        let pages = decode(image.as_bytes()).unwrap();
        assert_eq!(pages, PageBuffer::filled(0xAA));
    }

    #[test]
    fn test_record_layout() {
        let image = encoded(&PageBuffer::filled(0xAA));
        assert_eq!(image.len(), ENCODED_LEN);
        let mut first = String::from(":10000000");
        for _ in 0..PAGE_SIZE {
            first.push_str("AA");
        }
        // 0x10 + 16 * 0xAA = 0xAB0 -> two's complement of 0xB0
        first.push_str("50\n");
        assert_eq!(&image[..RECORD_LEN], first);
        assert!(image[RECORD_LEN..].starts_with(":10001000"));
        assert!(image.ends_with(EOF_RECORD));
    }

    #[test]
    fn test_checksum() {
        let image = encoded(&PageBuffer::default());
        // 0x10 + 0x00 + 0x10 + 0x00 = 0x20 -> two's complement 0xE0
        let second = &image[RECORD_LEN..2 * RECORD_LEN];
        assert_eq!(&second[41..43], "E0");
    }

    #[test]
    fn test_decode_ignores_bytes_outside_fields() {
        let mut image = encoded(&counting_pattern()).into_bytes();
        for page in 0..PAGE_COUNT {
            let record = page * RECORD_LEN;
            for b in &mut image[record..record + PAYLOAD_OFFSET] {
                *b = b'?';
            }
            for b in &mut image[record + PAYLOAD_OFFSET + 32..record + RECORD_LEN] {
                *b = b'#';
            }
        }
        assert_eq!(decode(&image).unwrap(), counting_pattern());
    }

    #[test]
    fn test_decode_lowercase_digits() {
        let image = encoded(&PageBuffer::filled(0xBE)).to_lowercase();
        assert_eq!(decode(image.as_bytes()).unwrap(), PageBuffer::filled(0xBE));
    }

    #[test]
    fn test_decode_to_write_payloads_preserves_order() {
        let expected = counting_pattern();
        let pages = decode(encoded(&expected).as_bytes()).unwrap();

        let mut stream = Vec::new();
        for (page, data) in pages.iter() {
            let cmd = write_command(page, data);
            assert_eq!(cmd[0], page << 4);
            stream.extend_from_slice(&cmd[1..]);
        }
        assert_eq!(stream.len(), 256);
        assert!(stream.iter().copied().eq(expected.bytes()));
    }

    #[test]
    fn test_decode_too_short() {
        let image = [b'0'; 100];
        assert_eq!(
            decode(&image),
            Err(Error::MalformedImage(ImageError::TooShort {
                len: 100,
                required: MIN_IMAGE_LEN,
            }))
        );
    }

    #[test]
    fn test_decode_minimum_length() {
        let image = encoded(&PageBuffer::filled(0x5A));
        assert!(decode(&image.as_bytes()[..MIN_IMAGE_LEN]).is_ok());
        assert!(decode(&image.as_bytes()[..MIN_IMAGE_LEN - 1]).is_err());
    }

    #[test]
    fn test_decode_invalid_hex() {
        let mut image = encoded(&PageBuffer::filled(0x11)).into_bytes();
        let position = field_position(4, 9);
        image[position + 1] = b'G';
        assert_eq!(
            decode(&image),
            Err(Error::MalformedImage(ImageError::InvalidHex {
                page: 4,
                offset: 9,
                position,
            }))
        );
    }
}
