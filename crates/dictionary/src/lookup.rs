use tracing::debug;

use crate::assemble::assemble_words;
use crate::storage::Storage;
use crate::{DictionaryError, Word};

pub(crate) async fn get_recommendations(storage: &Storage, prefix: &str) -> Result<Vec<String>, DictionaryError> {
    let words = storage.find_words_with_prefix(prefix).await?;
    debug!(prefix, matches = words.len(), "recommendations");
    if words.is_empty() {
        return Err(DictionaryError::not_found(format!(
            "No recommendations found for: {prefix}"
        )));
    }
    Ok(words)
}

pub(crate) async fn get_word_details(storage: &Storage, word: &str) -> Result<Word, DictionaryError> {
    let rows = storage.detail_rows_by_word(word).await?;
    assemble_words(rows)
        .into_iter()
        .next()
        .ok_or_else(|| DictionaryError::not_found(format!("Word not found: {word}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::testing::{drop_table, memory_dictionary, seed, SeedWord};
    use crate::{Cefr, WordSense};
    use pretty_assertions::assert_eq;

    async fn cat_and_car() -> crate::Dictionary {
        let dictionary = memory_dictionary().await;
        seed(
            &dictionary,
            &[
                SeedWord::new("cat")
                    .sense("noun", "a small domesticated animal")
                    .example("The cat sat on the mat.")
                    .example("The cat sat on the mat.")
                    .level("A1", Some("/kæt/"), Some("cat.mp3")),
                SeedWord::new("car").sense("noun", "a road vehicle"),
                SeedWord::new("dog").sense("noun", "a domesticated canine"),
            ],
        )
        .await;
        dictionary
    }

    #[tokio::test]
    async fn prefix_matches_every_word_and_only_those() {
        let dictionary = cat_and_car().await;
        let words: HashSet<String> = dictionary.recommendations("ca").await.unwrap().into_iter().collect();
        assert_eq!(words, HashSet::from(["cat".to_string(), "car".to_string()]));
    }

    #[tokio::test]
    async fn prefix_is_case_insensitive() {
        let dictionary = cat_and_car().await;
        let words = dictionary.recommendations("CA").await.unwrap();
        assert_eq!(words.len(), 2);
        assert!(words.iter().all(|word| word.starts_with("ca")));
    }

    #[tokio::test]
    async fn prefix_wildcards_are_literal() {
        let dictionary = cat_and_car().await;
        let error = dictionary.recommendations("c_t").await.unwrap_err();
        assert!(matches!(error, DictionaryError::NotFound(_)));
        let error = dictionary.recommendations("%").await.unwrap_err();
        assert!(matches!(error, DictionaryError::NotFound(_)));
    }

    #[tokio::test]
    async fn no_prefix_match_is_not_found() {
        let dictionary = cat_and_car().await;
        let error = dictionary.recommendations("zz").await.unwrap_err();
        assert_eq!(error.to_string(), "No recommendations found for: zz");
    }

    #[tokio::test]
    async fn blank_prefix_is_rejected() {
        let dictionary = cat_and_car().await;
        let error = dictionary.recommendations("  ").await.unwrap_err();
        assert!(matches!(error, DictionaryError::BadRequest(_)));
    }

    #[tokio::test]
    async fn details_of_a_levelled_word() {
        let dictionary = cat_and_car().await;
        let word = dictionary.word_info("Cat").await.unwrap();
        assert_eq!(
            word,
            Word {
                word: "cat".to_string(),
                pos: vec![WordSense {
                    pos: "noun".to_string(),
                    definition: "a small domesticated animal".to_string(),
                }],
                examples: vec!["The cat sat on the mat.".to_string()],
                cefr: Some(Cefr {
                    level: "A1".to_string(),
                    phonetics: Some("/kæt/".to_string()),
                    voice: Some("cat.mp3".to_string()),
                }),
            }
        );
    }

    #[tokio::test]
    async fn details_without_level_have_null_cefr() {
        let dictionary = cat_and_car().await;
        let word = dictionary.word_info("car").await.unwrap();
        assert_eq!(word.cefr, None);
        assert_eq!(word.examples, Vec::<String>::new());
    }

    #[tokio::test]
    async fn words_with_non_ascii_capitals_stay_reachable() {
        let dictionary = memory_dictionary().await;
        seed(
            &dictionary,
            &[SeedWord::new("Éclair").sense("noun", "a glazed pastry")],
        )
        .await;

        for input in ["Éclair", "ÉCLAIR", "Éclair "] {
            let word = dictionary.word_info(input).await.unwrap();
            assert_eq!(word.word, "Éclair");
        }
        assert_eq!(dictionary.recommendations("Éc").await.unwrap(), vec!["Éclair"]);
        assert_eq!(dictionary.recommendations("ÉC").await.unwrap(), vec!["Éclair"]);
    }

    #[tokio::test]
    async fn missing_table_is_a_storage_failure() {
        let dictionary = cat_and_car().await;
        drop_table(&dictionary, "WordInfo").await;
        let error = dictionary.word_info("cat").await.unwrap_err();
        assert!(matches!(error, DictionaryError::Storage(_)), "{error:?}");
        assert!(error.to_string().starts_with("Query failed: "));
    }

    #[tokio::test]
    async fn details_require_an_exact_word() {
        let dictionary = cat_and_car().await;
        let error = dictionary.word_info("ca").await.unwrap_err();
        assert_eq!(error.to_string(), "Word not found: ca");
        let error = dictionary.word_info("dogs").await.unwrap_err();
        assert!(matches!(error, DictionaryError::NotFound(_)));
    }
}
