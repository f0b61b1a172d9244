//! Localized user-facing strings.
//!
//! English and Indonesian are built in. Any other search language falls
//! back to English for the interface while still searching that wiki.

use wikifind_search::Language;

/// Interface locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    /// English.
    En,
    /// Bahasa Indonesia.
    Id,
}

impl Locale {
    /// The interface locale used while searching `language`.
    pub fn for_language(language: &Language) -> Self {
        match language.as_str() {
            "id" => Self::Id,
            _ => Self::En,
        }
    }
}

/// Message catalogue for one locale.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    /// Catalogue for `locale`.
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Catalogue for the interface locale of `language`.
    pub fn for_language(language: &Language) -> Self {
        Self::new(Locale::for_language(language))
    }

    pub fn title(&self) -> &'static str {
        match self.locale {
            Locale::En => "Search Algorithm",
            Locale::Id => "Algoritma Pencarian",
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self.locale {
            Locale::En => "Search Wikipedia articles...",
            Locale::Id => "Cari artikel Wikipedia...",
        }
    }

    pub fn no_results(&self) -> &'static str {
        match self.locale {
            Locale::En => "No results found. Try another search term.",
            Locale::Id => "Tidak ada hasil ditemukan. Coba istilah pencarian lain.",
        }
    }

    pub fn failed_search(&self) -> &'static str {
        match self.locale {
            Locale::En => "Failed to search. Please try again.",
            Locale::Id => "Gagal mencari. Silakan coba lagi.",
        }
    }

    pub fn timeout_warning(&self) -> &'static str {
        match self.locale {
            Locale::En => "The search is taking too long. Type :retry to try again.",
            Locale::Id => "Pencarian memakan waktu terlalu lama. Ketik :retry untuk mencoba lagi.",
        }
    }

    /// Header above ranked results. `exact` selects the plain form over the
    /// "or similar" form. Timing is shown with millisecond precision.
    pub fn results_header(&self, query: &str, secs: f64, exact: bool) -> String {
        match (self.locale, exact) {
            (Locale::En, true) => format!("Result for \"{query}\" in {secs:.3} seconds"),
            (Locale::En, false) => {
                format!("Result for \"{query}\" or similar in {secs:.3} seconds")
            }
            (Locale::Id, true) => format!("Hasil untuk \"{query}\" dalam {secs:.3} detik"),
            (Locale::Id, false) => {
                format!("Hasil untuk \"{query}\" atau yang mirip dalam {secs:.3} detik")
            }
        }
    }

    pub fn recommend(&self, term: &str) -> String {
        match self.locale {
            Locale::En => format!("Did you mean to search for \"{term}\"? (:accept)"),
            Locale::Id => format!("Apakah Anda ingin mencari \"{term}\"? (:accept)"),
        }
    }

    pub fn suggestions_heading(&self) -> &'static str {
        match self.locale {
            Locale::En => "Suggestions (:down / :up, then :pick):",
            Locale::Id => "Saran (:down / :up, lalu :pick):",
        }
    }

    pub fn language_changed(&self, language: &Language) -> String {
        match self.locale {
            Locale::En => format!("Searching the {language} Wikipedia."),
            Locale::Id => format!("Mencari di Wikipedia {language}."),
        }
    }
}
