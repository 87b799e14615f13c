use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::assemble::assemble_word;
use crate::storage::{Candidates, Storage};
use crate::{DictionaryError, VoicedWord, Word};

/// Picks one described word uniformly at random.
pub(crate) async fn get_random_word(storage: &Storage) -> Result<Word, DictionaryError> {
    let count = storage.count_candidates(Candidates::Described).await?;
    if count == 0 {
        return Err(DictionaryError::not_found("Unable to generate random word"));
    }
    let offset = rand::thread_rng().gen_range(0..count);
    debug!(count, offset, "random word");

    let id = storage
        .candidate_at(Candidates::Described, offset)
        .await?
        .ok_or_else(|| DictionaryError::not_found("Unable to generate random word"))?;
    let rows = storage.detail_rows_by_id(id).await?;
    assemble_word(rows).ok_or_else(|| DictionaryError::not_found("Unable to generate random word"))
}

/// Voiced words from the given levels, shuffled, capped at `max` when set.
pub(crate) async fn get_random_voiced_words(
    storage: &Storage,
    levels: &[String],
    max: Option<usize>,
) -> Result<Vec<VoicedWord>, DictionaryError> {
    let mut words = storage.voiced_words(levels).await?;
    words.shuffle(&mut rand::thread_rng());
    if let Some(max) = max {
        words.truncate(max);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::testing::{memory_dictionary, seed, SeedWord};

    #[tokio::test]
    async fn random_word_comes_from_described_pool() {
        let dictionary = memory_dictionary().await;
        seed(
            &dictionary,
            &[
                SeedWord::new("cat")
                    .sense("noun", "a small domesticated animal")
                    .level("A1", None, None),
                SeedWord::new("car").sense("noun", "a road vehicle"),
                SeedWord::new("cap").level("A2", None, None),
            ],
        )
        .await;

        for _ in 0..20 {
            let word = dictionary.random_word().await.unwrap();
            assert_eq!(word.word, "cat");
            assert!(word.cefr.is_some());
        }
    }

    #[tokio::test]
    async fn random_word_eventually_covers_the_pool() {
        let dictionary = memory_dictionary().await;
        let pool = ["alpha", "bravo", "charlie"];
        let seeds: Vec<_> = pool
            .iter()
            .map(|&word| SeedWord::new(word).sense("noun", "letter").level("A1", None, None))
            .collect();
        seed(&dictionary, &seeds).await;

        let mut seen = HashSet::new();
        for _ in 0..200 {
            seen.insert(dictionary.random_word().await.unwrap().word);
        }
        assert_eq!(seen.len(), pool.len());
    }

    #[tokio::test]
    async fn no_described_words_is_not_found() {
        let dictionary = memory_dictionary().await;
        seed(&dictionary, &[SeedWord::new("car").sense("noun", "a road vehicle")]).await;

        let error = dictionary.random_word().await.unwrap_err();
        assert!(matches!(error, DictionaryError::NotFound(_)));
    }
}
