/// Decode a UTF-16LE byte slice, replacing unpaired surrogates with U+FFFD.
///
/// A trailing odd byte is ignored.
pub(crate) fn decode_utf16le_lossy(bytes: &[u8]) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]));

    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn utf16le(s: &str) -> Vec<u8> {
        s.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    #[test]
    fn test_decodes_ascii_and_keeps_nuls() {
        assert_eq!(decode_utf16le_lossy(&utf16le("GDI+\0pic\0")), "GDI+\0pic\0");
    }

    #[test]
    fn test_decodes_non_ascii() {
        assert_eq!(decode_utf16le_lossy(&utf16le("Größe 図")), "Größe 図");
    }

    #[test]
    fn test_replaces_unpaired_surrogates_and_ignores_odd_tail() {
        let bytes = [0x00, 0xd8, 0x41, 0x00, 0x42];
        assert_eq!(decode_utf16le_lossy(&bytes), "\u{fffd}A");
    }
}
