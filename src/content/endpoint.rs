/// Upstream content endpoints served through the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEndpoint {
    Recitations,
    Tafsirs,
    Chapters,
    Chapter { surah_id: u32 },
    ChapterInfo { surah_id: u32 },
    VersesByChapter { surah_id: u32, reciter_id: u32 },
    RandomVerse { surah_id: u32, reciter_id: u32, tafsir_id: u32 },
}

impl ContentEndpoint {
    /// Stable label for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            ContentEndpoint::Recitations => "recitations",
            ContentEndpoint::Tafsirs => "tafsirs",
            ContentEndpoint::Chapters => "chapters",
            ContentEndpoint::Chapter { .. } => "chapter",
            ContentEndpoint::ChapterInfo { .. } => "chapter_info",
            ContentEndpoint::VersesByChapter { .. } => "verses_by_chapter",
            ContentEndpoint::RandomVerse { .. } => "random_verse",
        }
    }

    pub fn surah_id(&self) -> Option<u32> {
        match *self {
            ContentEndpoint::Chapter { surah_id }
            | ContentEndpoint::ChapterInfo { surah_id }
            | ContentEndpoint::VersesByChapter { surah_id, .. }
            | ContentEndpoint::RandomVerse { surah_id, .. } => Some(surah_id),
            _ => None,
        }
    }

    /// Path relative to the content base url.
    pub fn path(&self) -> String {
        match self {
            ContentEndpoint::Recitations => "/resources/recitations".to_owned(),
            ContentEndpoint::Tafsirs => "/resources/tafsirs".to_owned(),
            ContentEndpoint::Chapters => "/chapters".to_owned(),
            ContentEndpoint::Chapter { surah_id } => format!("/chapters/{}", surah_id),
            ContentEndpoint::ChapterInfo { surah_id } => format!("/chapters/{}/info", surah_id),
            ContentEndpoint::VersesByChapter { surah_id, .. } => format!("/verses/by_chapter/{}", surah_id),
            ContentEndpoint::RandomVerse { .. } => "/verses/random".to_owned(),
        }
    }

    pub fn query(&self, translations: &str) -> Vec<(&'static str, String)> {
        match *self {
            ContentEndpoint::VersesByChapter { reciter_id, .. } => vec![
                ("words", "true".to_owned()),
                ("translations", translations.to_owned()),
                ("audio", reciter_id.to_string()),
            ],
            ContentEndpoint::RandomVerse { surah_id, reciter_id, tafsir_id } => vec![
                ("chapter_number", surah_id.to_string()),
                ("audio", reciter_id.to_string()),
                ("tafsirs", tafsir_id.to_string()),
                ("fields", "text_uthmani,image_url".to_owned()),
                ("word_fields", "text_uthmani".to_owned()),
                ("translations", translations.to_owned()),
            ],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_follow_upstream_layout() {
        assert_eq!(ContentEndpoint::Recitations.path(), "/resources/recitations");
        assert_eq!(ContentEndpoint::Tafsirs.path(), "/resources/tafsirs");
        assert_eq!(ContentEndpoint::Chapters.path(), "/chapters");
        assert_eq!(ContentEndpoint::Chapter { surah_id: 2 }.path(), "/chapters/2");
        assert_eq!(ContentEndpoint::ChapterInfo { surah_id: 2 }.path(), "/chapters/2/info");
        assert_eq!(
            ContentEndpoint::VersesByChapter { surah_id: 36, reciter_id: 7 }.path(),
            "/verses/by_chapter/36"
        );
        assert_eq!(
            ContentEndpoint::RandomVerse { surah_id: 36, reciter_id: 7, tafsir_id: 169 }.path(),
            "/verses/random"
        );
    }

    #[test]
    fn random_verse_query_carries_all_fields() {
        let query = ContentEndpoint::RandomVerse { surah_id: 36, reciter_id: 7, tafsir_id: 169 }.query("85");
        assert_eq!(
            query,
            vec![
                ("chapter_number", "36".to_owned()),
                ("audio", "7".to_owned()),
                ("tafsirs", "169".to_owned()),
                ("fields", "text_uthmani,image_url".to_owned()),
                ("word_fields", "text_uthmani".to_owned()),
                ("translations", "85".to_owned()),
            ]
        );
    }

    #[test]
    fn listing_endpoints_have_no_query() {
        assert!(ContentEndpoint::Chapters.query("85").is_empty());
        assert_eq!(ContentEndpoint::Chapters.surah_id(), None);
        assert_eq!(ContentEndpoint::ChapterInfo { surah_id: 9 }.surah_id(), Some(9));
    }
}
