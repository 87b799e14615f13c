use serde::Serialize;

/// A fully assembled dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Word {
    pub word: String,
    pub pos: Vec<WordSense>,
    pub examples: Vec<String>,
    pub cefr: Option<Cefr>,
}

/// One part of speech together with the definition it carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WordSense {
    pub pos: String,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cefr {
    pub level: String,
    pub phonetics: Option<String>,
    pub voice: Option<String>,
}

/// A page of words sharing a single proficiency level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelPage {
    pub level: String,
    pub words: Vec<LevelWord>,
    pub total_words: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct LevelWord {
    pub word: String,
    pub voice: Option<String>,
    pub phonetics: Option<String>,
}

/// Voiced words drawn from several levels, in random order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelSelection {
    pub levels: Vec<String>,
    pub words: Vec<VoicedWord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, sqlx::FromRow)]
pub struct VoicedWord {
    pub word: String,
    pub definition: String,
    pub voice: String,
    pub phonetics: Option<String>,
}

/// 1-based page coordinates for level listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    pub(crate) fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_PAGE_SIZE)
    }
}
