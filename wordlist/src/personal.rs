//! Personal dictionary persisted with `redb`.
//!
//! One database per language tag, a single table mapping word to a
//! u64 count. Adds are insert-if-absent so repeating an add neither
//! errors nor resets the stored count.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use redb::ReadableTable;

/// Redb-backed store of user-added words.
#[derive(Debug)]
pub struct PersonalDict {
    db: redb::Database,
    #[allow(dead_code)]
    path: PathBuf,
}

impl PersonalDict {
    /// Table of personal words. Keys are the words, values a count.
    const TABLE_DEF: redb::TableDefinition<'static, &'static str, u64> =
        redb::TableDefinition::new("personal_words");

    /// Create or open a personal dictionary at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, redb::Error> {
        if let Some(parent) = path.as_ref().parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let db = redb::Database::create(path.as_ref())?;
        // make sure the table exists so reads never race the first add
        let txn = db.begin_write()?;
        {
            let _ = txn.open_table(Self::TABLE_DEF)?;
        }
        txn.commit()?;
        Ok(PersonalDict {
            db,
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Whether `word` has been added.
    pub fn contains(&self, word: &str) -> Result<bool, redb::Error> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(Self::TABLE_DEF)?;
        Ok(table.get(word)?.is_some())
    }

    /// Insert `word` unless it is already present. Returns whether the
    /// word was actually inserted.
    pub fn add(&self, word: &str) -> Result<bool, redb::Error> {
        let txn = self.db.begin_write()?;
        let inserted = {
            let mut table = txn.open_table(Self::TABLE_DEF)?;
            if table.get(word)?.is_some() {
                false
            } else {
                table.insert(word, &1u64)?;
                true
            }
        };
        txn.commit()?;
        Ok(inserted)
    }

    /// Stored count for `word`, zero when absent.
    pub fn count(&self, word: &str) -> Result<u64, redb::Error> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(Self::TABLE_DEF)?;
        match table.get(word)? {
            Some(val) => Ok(val.value()),
            None => Ok(0),
        }
    }

    /// Snapshot full contents into a HashMap.
    pub fn snapshot(&self) -> Result<HashMap<String, u64>, redb::Error> {
        let mut out = HashMap::new();
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(Self::TABLE_DEF)?;
        for item in table.iter()? {
            let (k, v) = item?;
            out.insert(k.value().to_string(), v.value());
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_db(label: &str) -> PathBuf {
        let stamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("chatspell_personal_{label}_{stamp}.redb"))
    }

    #[test]
    fn test_add_and_contains() {
        let path = scratch_db("add");
        let dict = PersonalDict::open(&path).unwrap();
        assert!(!dict.contains("zorp").unwrap());
        assert!(dict.add("zorp").unwrap());
        assert!(dict.contains("zorp").unwrap());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_second_add_is_a_noop() {
        let path = scratch_db("noop");
        let dict = PersonalDict::open(&path).unwrap();
        assert!(dict.add("zorp").unwrap());
        assert!(!dict.add("zorp").unwrap());
        assert_eq!(dict.count("zorp").unwrap(), 1);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_words_survive_reopen() {
        let path = scratch_db("reopen");
        {
            let dict = PersonalDict::open(&path).unwrap();
            dict.add("zorp").unwrap();
        }
        let dict = PersonalDict::open(&path).unwrap();
        assert!(dict.contains("zorp").unwrap());
        let snap = dict.snapshot().unwrap();
        assert_eq!(snap.get("zorp"), Some(&1));
        let _ = std::fs::remove_file(&path);
    }
}
