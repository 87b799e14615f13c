use std::time::Duration;

use chrono::NaiveDate;
use sqlx::SqlitePool;

use daily::word_of_the_day;
use levels::{get_level_page, get_level_selection};
use lookup::{get_recommendations, get_word_details};
use random_word::get_random_word;
use storage::Storage;

mod assemble;
mod daily;
mod dictionary;
mod error;
mod levels;
mod lookup;
mod random_word;
mod storage;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use daily::{daily_rank, days_since_epoch};
pub use dictionary::{Cefr, LevelPage, LevelSelection, LevelWord, PageRequest, VoicedWord, Word, WordSense};
pub use error::DictionaryError;
pub use storage::{StorageOptions, DEFAULT_DB_URL};

/// Read-only access to the word store.
pub struct Dictionary {
    storage: Storage,
}

impl Dictionary {
    pub async fn connect(options: &StorageOptions) -> Result<Self, DictionaryError> {
        Ok(Self {
            storage: Storage::initialize(options).await?,
        })
    }

    /// Uses an existing pool; pending migrations are applied first.
    pub async fn from_pool(pool: SqlitePool, query_timeout: Duration) -> Result<Self, DictionaryError> {
        Ok(Self {
            storage: Storage::with_pool(pool, query_timeout).await?,
        })
    }

    #[cfg(any(test, feature = "testing"))]
    pub(crate) fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Words starting with `prefix`, ignoring case.
    pub async fn recommendations(&self, prefix: &str) -> Result<Vec<String>, DictionaryError> {
        let prefix = normalize(prefix, "word")?;
        get_recommendations(&self.storage, &prefix).await
    }

    pub async fn word_info(&self, word: &str) -> Result<Word, DictionaryError> {
        let word = normalize(word, "word")?;
        get_word_details(&self.storage, &word).await
    }

    pub async fn random_word(&self) -> Result<Word, DictionaryError> {
        get_random_word(&self.storage).await
    }

    pub async fn word_of_the_day(&self, date: NaiveDate) -> Result<Word, DictionaryError> {
        word_of_the_day(&self.storage, date).await
    }

    pub async fn words_by_level(&self, level: &str, page: PageRequest) -> Result<LevelPage, DictionaryError> {
        let normalized = normalize(level, "level")?;
        get_level_page(&self.storage, level.trim(), &normalized, page).await
    }

    /// Voiced words across a comma separated list of levels.
    pub async fn words_by_levels(
        &self,
        levels: &str,
        limit: Option<usize>,
    ) -> Result<LevelSelection, DictionaryError> {
        get_level_selection(&self.storage, levels, limit).await
    }
}

/// Trims and folds ASCII case, the same folding SQLite's `LOWER` and `LIKE` apply.
fn normalize(input: &str, name: &str) -> Result<String, DictionaryError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DictionaryError::bad_request(format!("{name} parameter is required")));
    }
    Ok(trimmed.to_ascii_lowercase())
}
