// big-endian word helpers shared by both codec directions

#[inline]
pub fn push_word(buf: &mut Vec<u8>, word: u16) {
    buf.extend_from_slice(&word.to_be_bytes());
}

// overwrites a word that was reserved earlier, eg a length prefix
#[inline]
pub fn patch_word(buf: &mut [u8], index: usize, word: u16) {
    buf[index..index + 2].copy_from_slice(&word.to_be_bytes());
}

#[cfg(test)]
pub fn words_to_bytes<I: IntoIterator<Item = u16>>(words: I) -> impl Iterator<Item = u8> {
    words.into_iter().flat_map(|w| w.to_be_bytes())
}

// 1-based line and column of a byte offset, for error reporting.
// CR, LF and CRLF each count as one line break.
pub fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let (mut line, mut column) = (1, 1);
    let mut chars = text[..offset].chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => (),
            '\r' | '\n' => {
                line += 1;
                column = 1;
            }
            _ => column += 1,
        }
    }
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_word() {
        let mut buf = Vec::new();
        push_word(&mut buf, 0x1234);
        push_word(&mut buf, 0x0045);
        assert_eq!(buf, vec![0x12, 0x34, 0x00, 0x45]);
    }

    #[test]
    fn test_patch_word() {
        let mut buf = vec![0, 0, 0xaa, 0xbb];
        patch_word(&mut buf, 0, 2);
        assert_eq!(buf, vec![0x00, 0x02, 0xaa, 0xbb]);
    }

    #[test]
    fn test_words_to_bytes() {
        let bytes = words_to_bytes(vec![0x004a, 0x0105]).collect::<Vec<u8>>();
        assert_eq!(bytes, vec![0x00, 0x4a, 0x01, 0x05]);
    }

    #[test]
    fn test_line_col() {
        let text = "ab\ncdé\nf";
        assert_eq!(line_col(text, 0), (1, 1));
        assert_eq!(line_col(text, 1), (1, 2));
        assert_eq!(line_col(text, 3), (2, 1));
        // é is two bytes but one column
        assert_eq!(line_col(text, 8), (3, 1));
        assert_eq!(line_col(text, 7), (2, 4));
        assert_eq!(line_col("a\r\nb\rc", 5), (3, 1));
    }
}
