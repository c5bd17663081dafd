//! Byte-level word tokenizer
//!
//! Scans a byte stream for runs of ASCII letters. Everything else, including
//! non-ASCII bytes, separates words. Each tokenizer owns its reader and
//! cursor, so any number of them can run concurrently over different sources.
//!
//! A read failure ends the word sequence as if end-of-stream was reached.
//! The error is kept and can be retrieved with [`Tokenizer::take_error`]
//! once iteration stops, so callers can report the truncation.

use std::io::{self, BufRead, BufReader, ErrorKind, Read};

/// Shortest word kept by [`normalize`]
pub const MIN_WORD_LEN: usize = 2;

/// Lazy, finite, non-restartable sequence of alphabetic words
pub struct Tokenizer<R> {
    reader: BufReader<R>,
    bytes_read: u64,
    finished: bool,
    error: Option<io::Error>,
}

impl<R: Read> Tokenizer<R> {
    /// Create a tokenizer over a raw reader
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            bytes_read: 0,
            finished: false,
            error: None,
        }
    }

    /// Next alphabetic run, or `None` at end-of-stream or after a read failure
    pub fn next_word(&mut self) -> Option<String> {
        if self.finished {
            return None;
        }

        let mut word = String::new();
        loop {
            let buf = match self.reader.fill_buf() {
                Ok([]) => {
                    self.finished = true;
                    break;
                }
                Ok(buf) => buf,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.error = Some(e);
                    self.finished = true;
                    break;
                }
            };

            let mut consumed = 0;
            let mut complete = false;
            for &b in buf {
                consumed += 1;
                if b.is_ascii_alphabetic() {
                    word.push(b as char);
                } else if !word.is_empty() {
                    complete = true;
                    break;
                }
            }

            self.reader.consume(consumed);
            self.bytes_read += consumed as u64;

            if complete {
                break;
            }
        }

        if word.is_empty() {
            None
        } else {
            Some(word)
        }
    }

    /// Total bytes consumed from the underlying reader
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Whether the sequence has ended
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Take the read error that ended the sequence early, if any
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    /// Release the underlying reader
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}

impl<R: Read> Iterator for Tokenizer<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.next_word()
    }
}

/// Apply the word policy: drop words shorter than [`MIN_WORD_LEN`], fold case
pub fn normalize(word: &str) -> Option<String> {
    if word.len() < MIN_WORD_LEN {
        None
    } else {
        Some(word.to_ascii_lowercase())
    }
}

/// Iterator over the normalized words of a stream
///
/// Counts the raw words the policy dropped.
pub struct Words<R> {
    tokenizer: Tokenizer<R>,
    skipped: u64,
}

impl<R: Read> Words<R> {
    pub fn new(reader: R) -> Self {
        Self {
            tokenizer: Tokenizer::new(reader),
            skipped: 0,
        }
    }

    /// Words dropped for being too short
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn tokenizer(&self) -> &Tokenizer<R> {
        &self.tokenizer
    }

    pub fn tokenizer_mut(&mut self) -> &mut Tokenizer<R> {
        &mut self.tokenizer
    }
}

impl<R: Read> Iterator for Words<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let word = self.tokenizer.next_word()?;
            match normalize(&word) {
                Some(word) => return Some(word),
                None => self.skipped += 1,
            }
        }
    }
}
