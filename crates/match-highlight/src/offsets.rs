//! Byte/char offset conversion for regex haystacks.
//!
//! `regex` reports byte offsets while the public API speaks in chars. Pure-ASCII haystacks
//! (the common case) skip the table entirely.

#[derive(Debug, Clone)]
pub(crate) struct CharIndex {
    /// `char_to_byte[i]` is the byte offset of char `i`; the last entry is the text length.
    /// `None` when the text is pure ASCII and offsets coincide.
    char_to_byte: Option<Vec<usize>>,
    text_len: usize,
}

impl CharIndex {
    pub(crate) fn new(text: &str) -> Self {
        let char_to_byte = if text.is_ascii() {
            None
        } else {
            let mut table: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
            table.push(text.len());
            Some(table)
        };
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    pub(crate) fn char_count(&self) -> usize {
        match &self.char_to_byte {
            Some(table) => table.len() - 1,
            None => self.text_len,
        }
    }

    /// Byte offset of char `char_offset`, or `None` past the end of the text.
    pub(crate) fn char_to_byte(&self, char_offset: usize) -> Option<usize> {
        match &self.char_to_byte {
            Some(table) => table.get(char_offset).copied(),
            None => (char_offset <= self.text_len).then_some(char_offset),
        }
    }

    pub(crate) fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.text_len);
        match &self.char_to_byte {
            Some(table) => match table.binary_search(&clamped) {
                Ok(idx) => idx,
                Err(idx) => idx,
            },
            None => clamped,
        }
    }
}
