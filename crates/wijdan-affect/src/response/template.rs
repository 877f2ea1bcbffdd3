//! Response templates, the empathy phrase book and default replies

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reply used when an emotion has neither a template nor a default reply
pub const FALLBACK_RESPONSE: &str = "أفهم مشاعرك وأنا معك";

/// Phrase pools for one emotion and intensity band
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseTemplate {
    /// Template name, e.g. `joy_high`
    pub key: String,

    /// Emotion that selects this template
    pub emotion_trigger: String,

    /// Inclusive intensity band
    pub intensity_range: (f64, f64),

    /// Opening phrases
    pub response_patterns: Vec<String>,

    /// Extra phrases keyed by cultural context tag
    pub cultural_adaptation: HashMap<String, Vec<String>>,

    /// Empathy level reported in reply metadata
    pub empathy_level: String,

    /// Follow-up questions for intense emotions
    pub follow_up_questions: Vec<String>,
}

impl ResponseTemplate {
    /// Whether `intensity` falls in the band
    pub fn covers(&self, intensity: f64) -> bool {
        let (lo, hi) = self.intensity_range;
        lo <= intensity && intensity <= hi
    }

    /// Distance from `intensity` to the band's midpoint
    pub fn distance(&self, intensity: f64) -> f64 {
        let (lo, hi) = self.intensity_range;
        (intensity - (lo + hi) / 2.0).abs()
    }
}

/// Kinds of empathy phrases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmpathyCategory {
    /// Feelings are legitimate
    Validation,
    /// The companion is there
    Support,
    /// Things will improve
    Hope,
    /// Let's solve it
    Practical,
}

/// Empathy phrases per category
#[derive(Debug, Clone, PartialEq)]
pub struct EmpathyDatabase {
    phrases: HashMap<EmpathyCategory, Vec<String>>,
}

impl EmpathyDatabase {
    /// Create from explicit pools
    pub fn new(phrases: HashMap<EmpathyCategory, Vec<String>>) -> Self {
        Self { phrases }
    }

    /// Phrases of a category, empty when none are configured
    pub fn phrases(&self, category: EmpathyCategory) -> &[String] {
        self.phrases
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for EmpathyDatabase {
    fn default() -> Self {
        Self::new(HashMap::from([
            (
                EmpathyCategory::Validation,
                strings(&[
                    "مشاعرك طبيعية ومفهومة",
                    "أي حد مكانك بيحس نفس الشي",
                    "ما تلوم نفسك على اللي تحسه",
                    "من حقك تحس كذا",
                ]),
            ),
            (
                EmpathyCategory::Support,
                strings(&[
                    "أنا هنا لو تحتاج أي شي",
                    "ما راح نخليك وحدك",
                    "معك في الضيق قبل السعة",
                    "كلنا نحبك ونسندك",
                ]),
            ),
            (
                EmpathyCategory::Hope,
                strings(&[
                    "الأيام الصعبة بتمر بإذن الله",
                    "كل ضيقة وراها فرج",
                    "أنت أقوى مما تتخيل",
                    "الخير جاي ان شاء الله",
                ]),
            ),
            (
                EmpathyCategory::Practical,
                strings(&[
                    "نقدر نشوف حلول عملية سوا",
                    "خطوة بخطوة وبنوصل",
                    "المهم نبدا من مكان ما",
                    "كل مشكلة ولها حل",
                ]),
            ),
        ]))
    }
}

/// Immutable reply tables
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateCatalog {
    /// Templates in definition order
    pub templates: Vec<ResponseTemplate>,

    /// Empathy phrase book
    pub empathy: EmpathyDatabase,

    /// Default reply per emotion
    pub default_responses: HashMap<String, String>,
}

impl TemplateCatalog {
    /// Default reply for `emotion`
    pub fn default_response(&self, emotion: &str) -> &str {
        self.default_responses
            .get(emotion)
            .map(String::as_str)
            .unwrap_or(FALLBACK_RESPONSE)
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        let templates = vec![
            ResponseTemplate {
                key: "joy_high".to_string(),
                emotion_trigger: "joy".to_string(),
                intensity_range: (0.7, 1.0),
                response_patterns: strings(&[
                    "يا الله! فرحتنا بفرحتك والله! 🎉",
                    "هذا يستحق الاحتفال! مبروك من كل القلب! 🥳",
                    "الله يديم عليك السعادة دايماً! ما أحلى الأخبار! ✨",
                    "والله إن فرحتك أفرحتني! تستاهل كل خير! 🌟",
                ]),
                cultural_adaptation: HashMap::from([
                    (
                        "religious".to_string(),
                        strings(&["الحمدلله رب العالمين!", "الله يبارك لك!", "من بركات الله عليك!"]),
                    ),
                    (
                        "family".to_string(),
                        strings(&["الأهل بيفرحوا لك!", "عقبال أحبابك!", "فرحة لكل العائلة!"]),
                    ),
                ]),
                empathy_level: "high".to_string(),
                follow_up_questions: strings(&[
                    "قول لي تفاصيل أكثر، ودي أفرح معك!",
                    "كيف بتحتفل بهالخبر الحلو؟",
                    "مين أول شخص بشرته بالخبر؟",
                ]),
            },
            ResponseTemplate {
                key: "sadness_high".to_string(),
                emotion_trigger: "sadness".to_string(),
                intensity_range: (0.7, 1.0),
                response_patterns: strings(&[
                    "حبيبي، قلبي معك في هالوقت الصعب 💙",
                    "الله يصبرك ويقويك، وأنا هنا لو تحتاج أي شي",
                    "ما عليك، الأيام الصعبة بتمر بإذن الله",
                    "معك في الحزن قبل الفرح، وكلنا نحبك",
                ]),
                cultural_adaptation: HashMap::from([
                    (
                        "religious".to_string(),
                        strings(&["الله يصبرك ويأجرك", "لا حول ولا قوة إلا بالله", "البقية في حياتك"]),
                    ),
                    (
                        "family".to_string(),
                        strings(&["الأهل كلهم معك", "العائلة سندك", "ما نخليك وحدك"]),
                    ),
                ]),
                empathy_level: "very_high".to_string(),
                follow_up_questions: strings(&[
                    "تبي تتكلم عن اللي صار؟",
                    "كيف أقدر أساعدك أو أخفف عنك؟",
                    "عندك حد تتكلم معه؟",
                ]),
            },
            ResponseTemplate {
                key: "fear_medium".to_string(),
                emotion_trigger: "fear".to_string(),
                intensity_range: (0.4, 0.7),
                response_patterns: strings(&[
                    "لا تخاف، الله معك دايماً 🤲",
                    "هالشعور طبيعي، بس بتقدر تتجاوزه بإذن الله",
                    "خذ نفس عميق، وفكر في الأشياء الإيجابية",
                    "أنا معك، وكل شي بيعدي على خير",
                ]),
                cultural_adaptation: HashMap::from([
                    (
                        "religious".to_string(),
                        strings(&["توكل على الله", "ادع وتوكل", "الله يكفيك شر اللي تخافه"]),
                    ),
                    (
                        "practical".to_string(),
                        strings(&["خذ احتياطاتك وتوكل", "خطط كويس بتقل مخاوفك"]),
                    ),
                ]),
                empathy_level: "medium".to_string(),
                follow_up_questions: strings(&[
                    "إيش اللي يخوفك بالتحديد؟",
                    "جربت تفكر في حلول عملية؟",
                    "كيف تتعامل عادة مع مخاوفك؟",
                ]),
            },
        ];

        let default_responses = [
            ("neutral", "أفهم شعورك، وأنا هنا لو تحتاج أتكلم عن أي شي"),
            ("joy", "فرحتنا بفرحتك! الله يديم عليك السعادة"),
            ("sadness", "قلبي معك في هالوقت، والله يصبرك ويقويك"),
            ("fear", "لا تخاف، الله معك وكل شي بيعدي على خير"),
            ("anger", "أفهم غضبك، وهالشعور طبيعي في موقف زي كذا"),
            ("love", "ما أحلى هالمشاعر! الحب شي جميل"),
        ]
        .into_iter()
        .map(|(emotion, text)| (emotion.to_string(), text.to_string()))
        .collect();

        Self {
            templates,
            empathy: EmpathyDatabase::default(),
            default_responses,
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
