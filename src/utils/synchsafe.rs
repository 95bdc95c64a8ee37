// Synchsafe integers (7 bits per byte)

/// Largest value a synchsafe integer can carry (28 bits)
pub const MAX: u32 = 0x0FFF_FFFF;

/// Decode a synchsafe integer from 4 bytes, most significant first.
///
/// The high bit of each byte is ignored, so malformed input still decodes.
pub fn decode(bytes: [u8; 4]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |acc, &b| (acc << 7) | u32::from(b & 0x7F))
}

/// Same as [`decode`], for a value that was read as a big-endian `u32`
pub fn decode_u32(raw: u32) -> u32 {
    decode(raw.to_be_bytes())
}

/// Encode the low 28 bits of `value` as a synchsafe integer
pub fn encode(value: u32) -> [u8; 4] {
    [
        ((value >> 21) & 0x7F) as u8,
        ((value >> 14) & 0x7F) as u8,
        ((value >> 7) & 0x7F) as u8,
        (value & 0x7F) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_values() {
        assert_eq!(decode([0x00, 0x00, 0x02, 0x01]), 257);
        assert_eq!(decode([0x00, 0x00, 0x01, 0x7F]), 255);
        assert_eq!(decode([0x7F, 0x7F, 0x7F, 0x7F]), MAX);
        assert_eq!(decode([0, 0, 0, 0]), 0);
    }

    #[test]
    fn test_high_bits_are_discarded() {
        assert_eq!(decode([0x80, 0x80, 0x80, 0x81]), 1);
        assert_eq!(decode([0xFF, 0xFF, 0xFF, 0xFF]), MAX);
        assert_eq!(decode_u32(0x0000_0201), 257);
    }

    #[test]
    fn test_round_trip_over_clean_inputs() {
        for value in [0u32, 1, 127, 128, 255, 16_383, 16_384, 1_000_000, MAX] {
            let bytes = encode(value);
            assert!(bytes.iter().all(|b| b & 0x80 == 0));
            assert_eq!(decode(bytes), value);
        }

        // and the other way around, starting from bytes with high bits clear
        for bytes in [[0x01, 0x02, 0x03, 0x04], [0x7F, 0x00, 0x7F, 0x00], [0, 0, 0, 0x10]] {
            assert_eq!(encode(decode(bytes)), bytes);
        }
    }
}
