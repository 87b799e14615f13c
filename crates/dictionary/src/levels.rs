use futures::try_join;
use tracing::debug;

use crate::assemble::total_pages;
use crate::random_word::get_random_voiced_words;
use crate::storage::Storage;
use crate::{DictionaryError, LevelPage, LevelSelection, PageRequest};

pub(crate) async fn get_level_page(
    storage: &Storage,
    level: &str,
    normalized: &str,
    page: PageRequest,
) -> Result<LevelPage, DictionaryError> {
    if page.page == 0 || page.page_size == 0 {
        return Err(DictionaryError::bad_request(
            "page and pageSize must be positive integers",
        ));
    }

    let (total_words, words) = try_join!(
        storage.count_level_words(normalized),
        storage.level_words(normalized, page.page_size, page.offset()),
    )?;
    if total_words == 0 {
        return Err(DictionaryError::not_found(format!(
            "No words found for level: {level}"
        )));
    }
    debug!(level, total_words, returned = words.len(), "level page");

    Ok(LevelPage {
        level: level.to_string(),
        words,
        total_words,
        page: page.page,
        page_size: page.page_size,
        total_pages: total_pages(total_words, page.page_size),
    })
}

/// Splits a comma separated level list, dropping blanks.
pub(crate) fn split_levels(levels: &str) -> Vec<String> {
    levels
        .split(',')
        .map(str::trim)
        .filter(|level| !level.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) async fn get_level_selection(
    storage: &Storage,
    levels: &str,
    limit: Option<usize>,
) -> Result<LevelSelection, DictionaryError> {
    let levels = split_levels(levels);
    if levels.is_empty() {
        return Err(DictionaryError::bad_request("levels parameter is required"));
    }
    let normalized: Vec<String> = levels.iter().map(|level| level.to_ascii_lowercase()).collect();
    let words = get_random_voiced_words(storage, &normalized, limit).await?;
    debug!(?levels, ?limit, returned = words.len(), "level selection");
    Ok(LevelSelection { levels, words })
}
