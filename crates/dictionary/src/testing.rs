//! In-memory store and seeding helpers for tests.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::Dictionary;

/// A word to insert, with its senses, examples and optional level.
#[derive(Debug, Clone)]
pub struct SeedWord<'a> {
    word: &'a str,
    senses: Vec<(&'a str, &'a str)>,
    examples: Vec<&'a str>,
    level: Option<(&'a str, Option<&'a str>, Option<&'a str>)>,
}

impl<'a> SeedWord<'a> {
    pub fn new(word: &'a str) -> Self {
        Self {
            word,
            senses: Vec::new(),
            examples: Vec::new(),
            level: None,
        }
    }

    pub fn sense(mut self, part_of_speech: &'a str, definition: &'a str) -> Self {
        self.senses.push((part_of_speech, definition));
        self
    }

    pub fn example(mut self, example: &'a str) -> Self {
        self.examples.push(example);
        self
    }

    pub fn level(mut self, level: &'a str, phonetics: Option<&'a str>, voice: Option<&'a str>) -> Self {
        self.level = Some((level, phonetics, voice));
        self
    }
}

/// A migrated, empty dictionary backed by a single in-memory connection.
pub async fn memory_dictionary() -> Dictionary {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("parse in-memory url")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("open in-memory sqlite");
    Dictionary::from_pool(pool, Duration::from_secs(5))
        .await
        .expect("migrate in-memory sqlite")
}

pub async fn seed(dictionary: &Dictionary, words: &[SeedWord<'_>]) {
    let pool = dictionary.storage().pool();
    for entry in words {
        let word_id = sqlx::query("INSERT INTO Words (Word) VALUES (?)")
            .bind(entry.word)
            .execute(pool)
            .await
            .expect("insert word")
            .last_insert_rowid();
        for (part_of_speech, definition) in &entry.senses {
            sqlx::query("INSERT INTO WordInfo (partOfSpeech, definition, wordId) VALUES (?, ?, ?)")
                .bind(*part_of_speech)
                .bind(*definition)
                .bind(word_id)
                .execute(pool)
                .await
                .expect("insert word info");
        }
        for example in &entry.examples {
            sqlx::query("INSERT INTO Examples (example, wordId) VALUES (?, ?)")
                .bind(*example)
                .bind(word_id)
                .execute(pool)
                .await
                .expect("insert example");
        }
        if let Some((level, phonetics, voice)) = entry.level {
            sqlx::query("INSERT INTO CEFR (Level, Phonetics, Voice, wordId) VALUES (?, ?, ?, ?)")
                .bind(level)
                .bind(phonetics)
                .bind(voice)
                .bind(word_id)
                .execute(pool)
                .await
                .expect("insert level");
        }
    }
}

/// Drops a table so later queries against it fail inside the store.
pub async fn drop_table(dictionary: &Dictionary, table: &str) {
    sqlx::query(&format!("DROP TABLE {table}"))
        .execute(dictionary.storage().pool())
        .await
        .expect("drop table");
}
