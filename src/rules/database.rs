//! The rule database: the three tables a build produces and a conversion consumes.
//!
//! Stored as one JSON object. Each table is an array of `[pattern, replacement, placeholder]`
//! triples in priority order. The long keys written by older tooling are accepted on read.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::RuleTable;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDatabase {
    /// Whole-word and stem rules, highest priority first.
    #[serde(alias = "全域替换用のリスト(列表)型配列(replacements_final_list)")]
    pub global: RuleTable,
    /// Two-letter roots anchored to a placeholder edge or standing between spaces.
    #[serde(alias = "二文字词根替换用のリスト(列表)型配列(replacements_list_for_2char)")]
    pub two_char: RuleTable,
    /// Rules applied only inside localized `@...@` spans.
    #[serde(alias = "局部文字替换用のリスト(列表)型配列(replacements_list_for_localized_string)")]
    pub local: RuleTable,
}

impl RuleDatabase {
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| Error::io(path, err))?;
        let database = Self::from_reader(BufReader::new(file))?;
        log::debug!(
            "loaded {}: {} global, {} two-char, {} local rules",
            path.display(),
            database.global.len(),
            database.two_char.len(),
            database.local.len()
        );
        Ok(database)
    }

    pub fn to_writer(&self, writer: impl Write) -> Result<()> {
        Ok(serde_json::to_writer(writer, self)?)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|err| Error::io(path, err))?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush().map_err(|err| Error::io(path, err))
    }

    pub fn total_rules(&self) -> usize {
        self.global.len() + self.two_char.len() + self.local.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rule;

    #[test]
    fn long_keys_are_accepted() {
        let json = r#"{
            "全域替换用のリスト(列表)型配列(replacements_final_list)": [["amo", "am(愛)o", "$20987$"]],
            "二文字词根替换用のリスト(列表)型配列(replacements_list_for_2char)": [],
            "局部文字替换用のリスト(列表)型配列(replacements_list_for_localized_string)": [["am", "am(愛)", "@20374@"]]
        }"#;
        let db = RuleDatabase::from_reader(json.as_bytes()).unwrap();
        assert_eq!(db.global.rules(), &[Rule::new("amo", "am(愛)o", "$20987$")]);
        assert!(db.two_char.is_empty());
        assert_eq!(db.total_rules(), 2);
    }

    #[test]
    fn written_database_reads_back() {
        let db = RuleDatabase {
            global: RuleTable::new(vec![Rule::new("amo", "am(愛)o", "$20987$")]),
            two_char: RuleTable::new(vec![Rule::new(" la ", " la ", " $15267$ ")]),
            local: RuleTable::default(),
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        db.write(&path).unwrap();
        assert_eq!(RuleDatabase::read(&path).unwrap(), db);
    }

    #[test]
    fn missing_table_is_an_error() {
        let err = RuleDatabase::from_reader(r#"{"global": []}"#.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
