// src/protocol/fields.rs
//! Space-delimited records with optional double-quoted fields.
//!
//! Quoting follows the usual CSV rules with a space as the separator: a
//! quoted field may hold spaces, `""` inside quotes is a literal quote, and
//! a quote anywhere else makes the record invalid.

/// Splits one line into fields. Returns `None` for a malformed record.
pub fn split_record(line: &[u8]) -> Option<Vec<Vec<u8>>> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let mut fields = Vec::new();
    let mut pos = 0;

    loop {
        let mut field = Vec::new();

        if line.get(pos) == Some(&b'"') {
            pos += 1;
            loop {
                match line.get(pos) {
                    Some(b'"') if line.get(pos + 1) == Some(&b'"') => {
                        field.push(b'"');
                        pos += 2;
                    }
                    Some(b'"') => {
                        pos += 1;
                        break;
                    }
                    Some(&byte) => {
                        field.push(byte);
                        pos += 1;
                    }
                    // unterminated quote
                    None => return None,
                }
            }

            match line.get(pos) {
                None => {
                    fields.push(field);
                    return Some(fields);
                }
                Some(b' ') => pos += 1,
                Some(_) => return None,
            }
        } else {
            loop {
                match line.get(pos) {
                    None => {
                        fields.push(field);
                        return Some(fields);
                    }
                    Some(b' ') => {
                        pos += 1;
                        break;
                    }
                    Some(b'"') => return None,
                    Some(&byte) => {
                        field.push(byte);
                        pos += 1;
                    }
                }
            }
        }

        fields.push(field);
    }
}
