pub(super) fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'-') && bytes.get(idx + 1) == Some(&b'-')
}

pub(super) fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'/') && bytes.get(idx + 1) == Some(&b'*')
}

pub(super) fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'*') && bytes.get(idx + 1) == Some(&b'/')
}

pub(super) fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Scan a parameter name (`:name`, `@name`, `$name`) starting after the sigil.
pub(super) fn scan_name(bytes: &[u8], start: usize) -> Option<(usize, &[u8])> {
    let mut idx = start;
    while idx < bytes.len() && is_name_byte(bytes[idx]) {
        idx += 1;
    }
    if idx == start {
        None
    } else {
        Some((idx, &bytes[start..idx]))
    }
}
