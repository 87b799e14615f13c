//! Reshapes flat join rows into nested [`Word`] records.
//!
//! The detail join multiplies every definition by every example, so the same
//! sense or example shows up once per row of the other side. Assembly keeps the
//! first occurrence of each and preserves row order otherwise.

use std::collections::HashSet;

use crate::storage::DetailRow;
use crate::{Cefr, Word, WordSense};

/// Groups rows by word id, in order of first appearance, and assembles each group.
pub(crate) fn assemble_words(rows: Vec<DetailRow>) -> Vec<Word> {
    let mut groups: Vec<(i64, Vec<DetailRow>)> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|(id, _)| *id == row.id) {
            Some((_, group)) => group.push(row),
            None => groups.push((row.id, vec![row])),
        }
    }
    groups
        .into_iter()
        .filter_map(|(_, group)| assemble_word(group))
        .collect()
}

/// Assembles rows that all belong to one word. Returns `None` for no rows.
pub(crate) fn assemble_word(rows: Vec<DetailRow>) -> Option<Word> {
    let word = rows.first()?.word.clone();
    let mut pos = Vec::new();
    let mut seen_senses = HashSet::new();
    let mut examples = Vec::new();
    let mut seen_examples = HashSet::new();
    let mut cefr = None;

    for row in rows {
        if let (Some(part_of_speech), Some(definition)) = (row.part_of_speech, row.definition) {
            let sense = WordSense {
                pos: part_of_speech,
                definition,
            };
            if seen_senses.insert(sense.clone()) {
                pos.push(sense);
            }
        }
        if let Some(example) = row.example {
            if seen_examples.insert(example.clone()) {
                examples.push(example);
            }
        }
        if cefr.is_none() {
            if let Some(level) = row.level {
                cefr = Some(Cefr {
                    level,
                    phonetics: row.phonetics,
                    voice: row.voice,
                });
            }
        }
    }

    Some(Word {
        word,
        pos,
        examples,
        cefr,
    })
}

/// Number of pages needed for `total` items; zero items need zero pages.
pub(crate) fn total_pages(total: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(page_size))
}
