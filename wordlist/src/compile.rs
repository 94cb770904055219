//! Word-set compiler.
//!
//! Turns a plain word list (one word per line) into the `fst` set the
//! backend loads. Words are NFC-normalized and lowercased here, once,
//! so the runtime side can fold case with a plain `to_lowercase`.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufWriter};
use std::path::Path;

use fst::SetBuilder;

use chatspell_core::utils::normalize;
use chatspell_core::BackendError;

use crate::storage_error;

/// Compile `reader` into an fst set at `out`. Returns the number of
/// distinct words written.
pub fn compile_wordlist<R: BufRead>(reader: R, out: &Path) -> Result<usize, BackendError> {
    let mut words: BTreeSet<String> = BTreeSet::new();
    for line in reader.lines() {
        let line = line?;
        let word = normalize(&line).to_lowercase();
        if word.is_empty() {
            continue;
        }
        words.insert(word);
    }

    if let Some(parent) = out.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let writer = BufWriter::new(File::create(out)?);
    let mut builder = SetBuilder::new(writer).map_err(storage_error)?;
    for word in &words {
        builder.insert(word).map_err(storage_error)?;
    }
    builder.finish().map_err(storage_error)?;
    tracing::debug!("compiled {} words into `{}`", words.len(), out.display());
    Ok(words.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn scratch_fst(label: &str) -> PathBuf {
        let stamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("chatspell_compile_{label}_{stamp}.fst"))
    }

    #[test]
    fn test_dedup_blank_lines_and_case() {
        let path = scratch_fst("dedup");
        let input = Cursor::new("Hello\n\nworld\nhello\n   \nHELLO\n");
        let count = compile_wordlist(input, &path).unwrap();
        assert_eq!(count, 2);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_words_are_nfc_normalized() {
        let path = scratch_fst("nfc");
        // combining acute on 'e' collapses to the composed form
        let input = Cursor::new("cafe\u{0301}\ncaf\u{00e9}\n");
        let count = compile_wordlist(input, &path).unwrap();
        assert_eq!(count, 1);
        let _ = std::fs::remove_file(&path);
    }
}
