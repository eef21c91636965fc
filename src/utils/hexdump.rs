use std::fmt::Write;

/// Renders `data` in canonical hex display: the address (`offset` + position) in hexadecimal,
/// sixteen space-separated two-column hex bytes, then the same bytes as ASCII with control
/// characters replaced by dots.
pub(crate) fn hexdump(data: &[u8], offset: usize) -> String {
    let mut out = String::with_capacity((data.len() / 16 + 1) * 78);

    for (i, line) in data.chunks(16).enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{:08x}:", offset + i * 16);

        for b in line {
            let _ = write!(out, " {:02x}", b);
        }
        // align
        for _ in line.len()..16 {
            out.push_str("   ");
        }

        out.push_str("  ");
        for &b in line {
            let c = b as char;
            if c.is_ascii_graphic() || c == ' ' {
                out.push(c);
            } else {
                out.push('.');
            }
        }
    }

    out
}
