use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{query_as, query_scalar, FromRow, Pool, QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::{DictionaryError, LevelWord, VoicedWord};

pub const DEFAULT_DB_URL: &str = "sqlite://dictionary.db";

/// Connection settings for the backing store.
#[derive(Debug, Clone)]
pub struct StorageOptions {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub query_timeout: Duration,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            url: DEFAULT_DB_URL.to_string(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(5),
            query_timeout: Duration::from_secs(5),
        }
    }
}

/// One row of the word/info/example/level fan-out join.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct DetailRow {
    pub id: i64,
    pub word: String,
    pub part_of_speech: Option<String>,
    pub definition: Option<String>,
    pub example: Option<String>,
    pub level: Option<String>,
    pub phonetics: Option<String>,
    pub voice: Option<String>,
}

/// The pools random word selections draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Candidates {
    /// Words with at least one definition and a level.
    Described,
    /// Described words longer than five characters, shortest first.
    Daily,
}

impl Candidates {
    fn filter(self) -> &'static str {
        match self {
            Candidates::Described => {
                "EXISTS (SELECT 1 FROM WordInfo i WHERE i.wordId = w.Id)
                 AND EXISTS (SELECT 1 FROM CEFR c WHERE c.wordId = w.Id)"
            }
            Candidates::Daily => {
                "LENGTH(w.Word) > 5
                 AND EXISTS (SELECT 1 FROM WordInfo i WHERE i.wordId = w.Id)
                 AND EXISTS (SELECT 1 FROM CEFR c WHERE c.wordId = w.Id)"
            }
        }
    }

    fn order(self) -> &'static str {
        match self {
            Candidates::Described => "w.Id",
            Candidates::Daily => "LENGTH(w.Word), w.Id",
        }
    }
}

const DETAIL_BY_WORD_FILTER: &str = "WHERE LOWER(w.Word) = ? ORDER BY w.Id, i.id, e.id";

const DETAIL_SELECT: &str = "
    SELECT w.Id AS id, w.Word AS word,
           i.partOfSpeech AS part_of_speech, i.definition AS definition,
           e.example AS example,
           c.Level AS level, c.Phonetics AS phonetics, c.Voice AS voice
    FROM Words w
    LEFT JOIN WordInfo i ON i.wordId = w.Id
    LEFT JOIN Examples e ON e.wordId = w.Id
    LEFT JOIN CEFR c ON c.wordId = w.Id";

pub struct Storage {
    pool: Pool<Sqlite>,
    query_timeout: Duration,
}

impl Storage {
    pub async fn initialize(options: &StorageOptions) -> Result<Self, DictionaryError> {
        let connect_options = SqliteConnectOptions::from_str(&options.url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(options.max_connections)
            .acquire_timeout(options.acquire_timeout)
            .connect_with(connect_options)
            .await?;
        info!(url = %options.url, max_connections = options.max_connections, "connected to dictionary store");
        Self::with_pool(pool, options.query_timeout).await
    }

    /// Wraps an existing pool, applying any pending schema migrations.
    pub async fn with_pool(pool: SqlitePool, query_timeout: Duration) -> Result<Self, DictionaryError> {
        sqlx::migrate!().run(&pool).await?;
        Ok(Self {
            pool,
            query_timeout,
        })
    }

    #[cfg(any(test, feature = "testing"))]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn timed<T, F>(&self, query: F) -> Result<T, DictionaryError>
    where
        F: Future<Output = sqlx::Result<T>>,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => result.map_err(DictionaryError::from),
            Err(_) => Err(DictionaryError::Timeout(self.query_timeout)),
        }
    }
}

impl Storage {
    pub async fn find_words_with_prefix(&self, prefix: &str) -> Result<Vec<String>, DictionaryError> {
        let pattern = format!("{}%", escape_like(prefix));
        debug!(%pattern, "prefix search");
        self.timed(
            query_scalar::<_, String>("SELECT Word FROM Words WHERE LOWER(Word) LIKE ? ESCAPE '\\'")
                .bind(pattern)
                .fetch_all(&self.pool),
        )
        .await
    }

    pub(crate) async fn detail_rows_by_word(&self, word: &str) -> Result<Vec<DetailRow>, DictionaryError> {
        let sql = format!("{DETAIL_SELECT} {DETAIL_BY_WORD_FILTER}");
        self.timed(query_as::<_, DetailRow>(&sql).bind(word).fetch_all(&self.pool)).await
    }

    pub(crate) async fn detail_rows_by_id(&self, id: i64) -> Result<Vec<DetailRow>, DictionaryError> {
        let sql = format!("{DETAIL_SELECT} WHERE w.Id = ? ORDER BY i.id, e.id");
        self.timed(query_as::<_, DetailRow>(&sql).bind(id).fetch_all(&self.pool)).await
    }

    pub(crate) async fn count_candidates(&self, candidates: Candidates) -> Result<u64, DictionaryError> {
        let sql = format!("SELECT COUNT(*) FROM Words w WHERE {}", candidates.filter());
        let count: i64 = self.timed(query_scalar::<_, i64>(&sql).fetch_one(&self.pool)).await?;
        Ok(count.max(0) as u64)
    }

    /// Id of the candidate at a 0-based position in the pool's ordering.
    pub(crate) async fn candidate_at(
        &self,
        candidates: Candidates,
        offset: u64,
    ) -> Result<Option<i64>, DictionaryError> {
        let sql = format!(
            "SELECT w.Id FROM Words w WHERE {} ORDER BY {} LIMIT 1 OFFSET ?",
            candidates.filter(),
            candidates.order()
        );
        debug!(?candidates, offset, "candidate lookup");
        self.timed(query_scalar::<_, i64>(&sql).bind(offset as i64).fetch_optional(&self.pool))
            .await
    }

    pub(crate) async fn count_level_words(&self, level: &str) -> Result<u64, DictionaryError> {
        let count: i64 = self
            .timed(
                query_scalar::<_, i64>(
                    "SELECT COUNT(DISTINCT w.Id) FROM Words w
                     JOIN CEFR c ON c.wordId = w.Id
                     WHERE LOWER(c.Level) = ?",
                )
                .bind(level)
                .fetch_one(&self.pool),
            )
            .await?;
        Ok(count.max(0) as u64)
    }

    pub(crate) async fn level_words(
        &self,
        level: &str,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<LevelWord>, DictionaryError> {
        debug!(level, limit, offset, "level page");
        self.timed(
            query_as::<_, LevelWord>(
                "SELECT w.Word AS word, MIN(c.Voice) AS voice, MIN(c.Phonetics) AS phonetics
                 FROM Words w
                 JOIN CEFR c ON c.wordId = w.Id
                 WHERE LOWER(c.Level) = ?
                 GROUP BY w.Id, w.Word
                 ORDER BY w.Word, w.Id
                 LIMIT ? OFFSET ?",
            )
            .bind(level)
            .bind(i64::from(limit))
            .bind(offset as i64)
            .fetch_all(&self.pool),
        )
        .await
    }

    /// Distinct voiced (word, definition) tuples across the given levels.
    pub(crate) async fn voiced_words(&self, levels: &[String]) -> Result<Vec<VoicedWord>, DictionaryError> {
        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT DISTINCT w.Word AS word, i.definition AS definition,
                    c.Voice AS voice, c.Phonetics AS phonetics
             FROM Words w
             JOIN CEFR c ON c.wordId = w.Id
             JOIN WordInfo i ON i.wordId = w.Id
             WHERE c.Voice IS NOT NULL AND LOWER(c.Level) IN (",
        );
        {
            let mut separated = builder.separated(", ");
            for level in levels {
                separated.push_bind(level.as_str());
            }
            separated.push_unseparated(")");
        }
        debug!(?levels, "voiced words");
        self.timed(builder.build_query_as::<VoicedWord>().fetch_all(&self.pool))
            .await
    }
}

/// Escapes `LIKE` metacharacters so the input matches literally under `ESCAPE '\'`.
pub(crate) fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
