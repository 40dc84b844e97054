//! Name normalization: turn a catalog name like `CRC-16/KERMIT` into the
//! symbol prefix `crc16kermit` a generated Rust module can use.

/// Lowercase `raw_name`, strip a leading `crc[-0-9]*/` (most catalog names
/// repeat the width there), replace every remaining non-alphanumeric
/// character with `_`, and prefix the result with `crc<width>` so the
/// symbol is always a valid Rust identifier even for names that are pure
/// punctuation after stripping. A leading `_` is inserted before the tail
/// when it would otherwise start with a digit (e.g. a name of the form
/// `CRC-n/<digits>`), since `crc16` immediately followed by more digits
/// would otherwise read as one ambiguous number run.
pub fn normalize_name(width: u32, raw_name: &str) -> String {
    let lower = raw_name.to_lowercase();
    let stripped = strip_crc_prefix(&lower);

    let mut tail = String::with_capacity(stripped.len());
    for c in stripped.chars() {
        if c.is_ascii_alphanumeric() {
            tail.push(c);
        } else {
            tail.push('_');
        }
    }

    if tail.starts_with(|c: char| c.is_ascii_digit()) {
        tail.insert(0, '_');
    }

    format!("crc{width}{tail}")
}

fn strip_crc_prefix(name: &str) -> &str {
    let Some(rest) = name.strip_prefix("crc") else {
        return name;
    };
    let mut idx = 0;
    for c in rest.chars() {
        if c == '-' || c.is_ascii_digit() {
            idx += c.len_utf8();
        } else {
            break;
        }
    }
    if rest[idx..].starts_with('/') {
        &rest[idx + 1..]
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_crc_width_prefix() {
        assert_eq!(normalize_name(16, "CRC-16/KERMIT"), "crc16kermit");
    }

    #[test]
    fn keeps_names_without_the_prefix_pattern() {
        assert_eq!(normalize_name(32, "JAMCRC"), "crc32jamcrc");
    }

    #[test]
    fn punctuation_becomes_underscores() {
        assert_eq!(normalize_name(82, "CRC-82/DARC"), "crc82darc");
        assert_eq!(normalize_name(8, "DOW-CRC"), "crc8dow_crc");
    }

    #[test]
    fn digit_leading_suffix_gets_an_underscore() {
        assert_eq!(normalize_name(16, "CRC-16/21"), "crc16_21");
    }
}
