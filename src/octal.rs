//! ASCII octal numbers as found in tar header fields.

/// Decodes a run of ASCII octal digits, most significant digit first.
///
/// There is no overflow check: a field with more digits than fit in a `u64`
/// silently wraps. An empty run decodes to 0. Bytes that are not octal digits
/// produce an unspecified value, but never panic.
pub fn decode_octal(digits: &[u8]) -> u64 {
    digits.iter().fold(0u64, |value, &digit| {
        value
            .wrapping_mul(8)
            .wrapping_add(u64::from(digit.wrapping_sub(b'0')))
    })
}

/// Returns the digit run of a fixed-width numeric header field.
///
/// The field ends at the first NUL byte; spaces used as padding on either
/// side of the digits are dropped.
pub fn octal_field(field: &[u8]) -> &[u8] {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    field[..end].trim_ascii()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_size_fields() {
        assert_eq!(decode_octal(b"0000000001000"), 512);
        assert_eq!(decode_octal(b"0000000000144"), 100);
        assert_eq!(decode_octal(b"7"), 7);
        assert_eq!(decode_octal(b"777"), 0o777);
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(decode_octal(b""), 0);
    }

    #[test]
    fn oversized_input_wraps() {
        // 22 sevens is 66 bits worth of ones; only the low 64 survive
        let digits = [b'7'; 22];
        assert_eq!(decode_octal(&digits), u64::MAX);
    }

    #[test]
    fn field_extraction() {
        assert_eq!(octal_field(b"00000000012\0"), b"00000000012");
        assert_eq!(octal_field(b"     12 \0\0\0\0"), b"12");
        assert_eq!(octal_field(b"\0\0\0\0"), b"");
        assert_eq!(octal_field(b"0000644"), b"0000644");
    }
}
