//! Keyword tables for emotion, topic and cultural register classification

use std::collections::HashSet;

/// A named set of lowercased keywords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCategory {
    /// Category tag (e.g. `joy`, `family`, `religious`)
    pub name: String,

    /// Lowercased keywords
    pub keywords: HashSet<String>,
}

impl KeywordCategory {
    /// Create a category, lowercasing every keyword
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            keywords: keywords
                .into_iter()
                .map(|kw| kw.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Number of tokens that appear in this category
    pub fn count_matches(&self, tokens: &HashSet<String>) -> usize {
        tokens.intersection(&self.keywords).count()
    }
}

/// Immutable classification tables
///
/// Category order matters: when two categories match the same number of
/// tokens, the one defined first wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    /// Emotion categories
    pub emotions: Vec<KeywordCategory>,

    /// Topic categories
    pub topics: Vec<KeywordCategory>,

    /// Cultural register categories
    pub cultural: Vec<KeywordCategory>,
}

impl Lexicon {
    /// Create a lexicon from explicit tables
    pub fn new(
        emotions: Vec<KeywordCategory>,
        topics: Vec<KeywordCategory>,
        cultural: Vec<KeywordCategory>,
    ) -> Self {
        Self {
            emotions,
            topics,
            cultural,
        }
    }

    /// An empty lexicon; every text classifies as neutral/general
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new())
    }
}

impl Default for Lexicon {
    /// Saudi-dialect tables
    fn default() -> Self {
        let emotions = vec![
            KeywordCategory::new(
                "joy",
                ["فرحان", "مبسوط", "سعيد", "مستانس", "فرحة", "سعادة", "بهجة"],
            ),
            KeywordCategory::new(
                "sadness",
                ["حزين", "زعلان", "متضايق", "حزن", "ضيق", "كآبة", "أسى"],
            ),
            KeywordCategory::new(
                "fear",
                ["خايف", "قلقان", "متوتر", "خوف", "قلق", "توتر", "رعب"],
            ),
            KeywordCategory::new(
                "anger",
                ["زعلان", "غضبان", "متنرفز", "غضب", "زعل", "انفعال", "حنق"],
            ),
            KeywordCategory::new("love", ["محب", "أحب", "عاشق", "حب", "عشق", "غرام", "هيام"]),
            KeywordCategory::new(
                "excitement",
                ["متحمس", "متشوق", "حماس", "شوق", "نشاط", "حيوية"],
            ),
            KeywordCategory::new(
                "calmness",
                ["هادي", "مرتاح", "ساكن", "هدوء", "راحة", "سكينة", "طمأنينة"],
            ),
            KeywordCategory::new("gratitude", ["شكر", "امتنان", "تقدير", "شاكر", "ممتن", "مقدر"]),
        ];

        let topics = vec![
            KeywordCategory::new(
                "family",
                ["أهل", "عائلة", "والدين", "اخوان", "أخوات", "أطفال", "بيت", "منزل"],
            ),
            KeywordCategory::new(
                "work",
                ["شغل", "عمل", "وظيفة", "مدير", "زميل", "راتب", "دوام", "مكتب"],
            ),
            KeywordCategory::new(
                "education",
                ["دراسة", "جامعة", "مدرسة", "طالب", "امتحان", "درجات", "تعليم"],
            ),
            KeywordCategory::new(
                "health",
                ["صحة", "مرض", "مستشفى", "دكتور", "دواء", "علاج", "فحص"],
            ),
            KeywordCategory::new(
                "food",
                ["أكل", "طعام", "طبخ", "مطعم", "وجبة", "إفطار", "غدا", "عشا"],
            ),
            KeywordCategory::new(
                "travel",
                ["سفر", "رحلة", "مطار", "فندق", "سياحة", "إجازة", "بلد"],
            ),
            KeywordCategory::new(
                "technology",
                ["جوال", "كمبيوتر", "إنترنت", "تقنية", "برنامج", "تطبيق"],
            ),
            KeywordCategory::new(
                "sports",
                ["رياضة", "كرة", "فريق", "لاعب", "مباراة", "نادي", "تمرين"],
            ),
            KeywordCategory::new("weather", ["طقس", "مطر", "شمس", "برد", "حر", "غيوم", "رياح"]),
            KeywordCategory::new(
                "shopping",
                ["تسوق", "شراء", "مول", "سوق", "سعر", "خصم", "متجر"],
            ),
        ];

        let cultural = vec![
            KeywordCategory::new(
                "religious",
                [
                    "الله",
                    "الحمدلله",
                    "ان شاء الله",
                    "ما شاء الله",
                    "بإذن الله",
                    "استغفر الله",
                    "بسم الله",
                    "صلى الله عليه وسلم",
                    "رحمه الله",
                    "جزاك الله خير",
                    "بارك الله فيك",
                    "هداك الله",
                    "الله يعطيك العافية",
                    "اللهم",
                ],
            ),
            KeywordCategory::new(
                "greetings",
                [
                    "السلام عليكم",
                    "أهلا وسهلا",
                    "مرحبا",
                    "حياك الله",
                    "أهلين",
                    "يا هلا",
                    "نورت",
                    "تشرفنا",
                    "منور",
                    "عساك بخير",
                ],
            ),
            KeywordCategory::new(
                "hospitality",
                [
                    "تفضل", "اتفضل", "بيتك", "أهل وسهل", "كرامة", "شرفتنا", "قهوة", "عشا", "غدا",
                    "ضيف", "كريم", "عزيز",
                ],
            ),
            KeywordCategory::new(
                "respect",
                [
                    "أستاذ", "أبو", "أم", "عمي", "خالي", "عمتي", "خالتي", "حضرتك", "الكريم",
                    "المحترم", "الفاضل", "المكرم",
                ],
            ),
            KeywordCategory::new(
                "emotions",
                [
                    "فرحان", "مبسوط", "سعيد", "حزين", "متضايق", "خايف", "قلقان", "مرتاح", "متحمس",
                    "زعلان", "مستانس",
                ],
            ),
        ];

        Self::new(emotions, topics, cultural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_lowercased() {
        let category = KeywordCategory::new("greeting", ["Hello", "WORLD"]);
        assert!(category.keywords.contains("hello"));
        assert!(category.keywords.contains("world"));
        assert!(!category.keywords.contains("Hello"));
    }

    #[test]
    fn test_default_lexicon_order() {
        let lexicon = Lexicon::default();
        let emotions: Vec<&str> = lexicon.emotions.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(emotions[..4], ["joy", "sadness", "fear", "anger"]);
        assert_eq!(lexicon.topics.len(), 10);
        assert_eq!(lexicon.cultural[0].name, "religious");
    }
}
