//! Input router: decides whether a turn needs retrieval at all
//!
//! Classification is substring matching on the lower-cased text with a fixed
//! precedence: product keywords, then greetings, then small talk, then a bare
//! category number. Anything else goes to retrieval.
//!
//! Matching is deliberately loose ("ac" matches inside "each", "hi" inside
//! "this"); callers rely on that behavior staying stable.

/// Any of these routes the turn to retrieval, even if it also greets.
const PRODUCT_KEYWORDS: &[&str] = &[
    "model",
    "models",
    "available",
    "list",
    "show",
    "warranty",
    "coverage",
    "panasonic",
    "voltas",
    "blue star",
    "washing",
    "ac",
    "refrigerator",
    "microwave",
    "tv",
    "cooler",
];

const GREETING_PHRASES: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
];

const SMALL_TALK_PHRASES: &[&str] = &[
    "how are you",
    "how's it going",
    "who are you",
    "what is your name",
    "are you there",
    "are you listening",
];

/// Product category picked from the numbered menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    AirCooler,
    AirConditioner,
    CommercialRefrigerator,
    VisiCoolerOrWaterDispenser,
    MicrowaveOven,
    WashingMachine,
    Refrigerator,
    Television,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::AirCooler,
        Category::AirConditioner,
        Category::CommercialRefrigerator,
        Category::VisiCoolerOrWaterDispenser,
        Category::MicrowaveOven,
        Category::WashingMachine,
        Category::Refrigerator,
        Category::Television,
    ];

    /// Parse a menu number, "1" through "8".
    pub fn from_menu_number(s: &str) -> Option<Self> {
        match s {
            "1" => Some(Category::AirCooler),
            "2" => Some(Category::AirConditioner),
            "3" => Some(Category::CommercialRefrigerator),
            "4" => Some(Category::VisiCoolerOrWaterDispenser),
            "5" => Some(Category::MicrowaveOven),
            "6" => Some(Category::WashingMachine),
            "7" => Some(Category::Refrigerator),
            "8" => Some(Category::Television),
            _ => None,
        }
    }

    /// Singular label used in the selection reply.
    pub fn label(&self) -> &'static str {
        match self {
            Category::AirCooler => "Air Cooler",
            Category::AirConditioner => "Air Conditioner",
            Category::CommercialRefrigerator => "Commercial Refrigerator",
            Category::VisiCoolerOrWaterDispenser => "Visi Cooler or Water Dispenser",
            Category::MicrowaveOven => "Microwave Oven",
            Category::WashingMachine => "Washing Machine",
            Category::Refrigerator => "Refrigerator",
            Category::Television => "Television",
        }
    }

    /// Plural label shown in the greeting menu.
    pub fn menu_label(&self) -> &'static str {
        match self {
            Category::AirCooler => "Air Coolers",
            Category::AirConditioner => "Air Conditioners",
            Category::CommercialRefrigerator => "Commercial Refrigerators",
            Category::VisiCoolerOrWaterDispenser => "Visi Coolers & Water Dispensers",
            Category::MicrowaveOven => "Microwave Ovens",
            Category::WashingMachine => "Washing Machines",
            Category::Refrigerator => "Refrigerators",
            Category::Television => "Televisions",
        }
    }

    fn menu_marker(&self) -> &'static str {
        match self {
            Category::AirCooler => "1️⃣",
            Category::AirConditioner => "2️⃣",
            Category::CommercialRefrigerator => "3️⃣",
            Category::VisiCoolerOrWaterDispenser => "4️⃣",
            Category::MicrowaveOven => "5️⃣",
            Category::WashingMachine => "6️⃣",
            Category::Refrigerator => "7️⃣",
            Category::Television => "8️⃣",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Greeting,
    SmallTalk,
    CategorySelection(Category),
    RetrievalNeeded,
}

impl Classification {
    /// Short name for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Classification::Greeting => "greeting",
            Classification::SmallTalk => "small_talk",
            Classification::CategorySelection(_) => "category_selection",
            Classification::RetrievalNeeded => "retrieval",
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

pub fn classify(text: &str) -> Classification {
    let lowered = text.to_lowercase();

    if contains_any(&lowered, PRODUCT_KEYWORDS) {
        return Classification::RetrievalNeeded;
    }
    if contains_any(&lowered, GREETING_PHRASES) {
        return Classification::Greeting;
    }
    if contains_any(&lowered, SMALL_TALK_PHRASES) {
        return Classification::SmallTalk;
    }
    if let Some(category) = Category::from_menu_number(text.trim()) {
        return Classification::CategorySelection(category);
    }
    Classification::RetrievalNeeded
}

/// Fixed reply for non-retrieval turns. `None` for `RetrievalNeeded`.
pub fn canned_response(
    classification: Classification,
    text: &str,
    display_name: &str,
) -> Option<String> {
    match classification {
        Classification::Greeting => Some(greeting(display_name)),
        Classification::SmallTalk => Some(small_talk(text, display_name)),
        Classification::CategorySelection(category) => Some(category_prompt(category)),
        Classification::RetrievalNeeded => None,
    }
}

fn greeting(display_name: &str) -> String {
    let menu: Vec<String> = Category::ALL
        .iter()
        .map(|c| format!("{} {}", c.menu_marker(), c.menu_label()))
        .collect();

    format!(
        "👋 Hi {display_name}! I can help you check your product warranty. Please select a product category:\n\n{}\n\nPlease reply with the number of your product category (e.g., \"1\" for Air Coolers).",
        menu.join("\n")
    )
}

fn small_talk(text: &str, display_name: &str) -> String {
    let lowered = text.to_lowercase();
    if lowered.contains("who are you") || lowered.contains("what is your name") {
        format!(
            "🤖 I'm your Warranty Assistant, {display_name}! I'm here to help you check product warranty eligibility. Please select a product category by typing 1-8."
        )
    } else {
        format!(
            "😊 I'm just a bot, but I'm ready to help you, {display_name}! Please select a product category by typing 1-8."
        )
    }
}

fn category_prompt(category: Category) -> String {
    format!(
        "Great! You've selected {}. Please provide the following details:\n\n1. Brand name\n2. Year of purchase\n3. Issue you're facing\n\nFor example: \"Samsung, Model, 2022, Not cooling properly\"",
        category.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Precedence
    // ========================================================================

    #[test]
    fn test_product_keyword_beats_greeting() {
        assert_eq!(
            classify("hello, what Voltas AC models exist"),
            Classification::RetrievalNeeded
        );
    }

    #[test]
    fn test_plain_greeting() {
        assert_eq!(classify("hello"), Classification::Greeting);
        assert_eq!(classify("Good Evening!"), Classification::Greeting);
    }

    #[test]
    fn test_small_talk() {
        assert_eq!(classify("how are you"), Classification::SmallTalk);
        assert_eq!(classify("Who are you?"), Classification::SmallTalk);
    }

    #[test]
    fn test_greeting_beats_small_talk() {
        assert_eq!(classify("hey, how are you"), Classification::Greeting);
    }

    #[test]
    fn test_category_numbers() {
        assert_eq!(
            classify("3"),
            Classification::CategorySelection(Category::CommercialRefrigerator)
        );
        assert_eq!(
            classify("  8 "),
            Classification::CategorySelection(Category::Television)
        );
        assert_eq!(classify("9"), Classification::RetrievalNeeded);
        assert_eq!(classify("12"), Classification::RetrievalNeeded);
    }

    #[test]
    fn test_unknown_text_needs_retrieval() {
        assert_eq!(classify("asdkjalksd"), Classification::RetrievalNeeded);
        assert_eq!(
            classify("My compressor failed after 3 years"),
            Classification::RetrievalNeeded
        );
    }

    #[test]
    fn test_substring_matching_is_loose() {
        // "ac" inside "each" is a product keyword hit
        assert_eq!(classify("each one"), Classification::RetrievalNeeded);
        // "hi" inside "this"
        assert_eq!(classify("this"), Classification::Greeting);
    }

    // ========================================================================
    // Canned responses
    // ========================================================================

    #[test]
    fn test_category_labels() {
        let labels: Vec<&str> = (1..=8)
            .map(|n| Category::from_menu_number(&n.to_string()).unwrap().label())
            .collect();
        assert_eq!(
            labels,
            vec![
                "Air Cooler",
                "Air Conditioner",
                "Commercial Refrigerator",
                "Visi Cooler or Water Dispenser",
                "Microwave Oven",
                "Washing Machine",
                "Refrigerator",
                "Television",
            ]
        );
    }

    #[test]
    fn test_greeting_lists_menu_and_names_user() {
        let reply = canned_response(Classification::Greeting, "hi", "Alice").unwrap();
        assert!(reply.starts_with("👋 Hi Alice!"));
        assert!(reply.contains("1️⃣ Air Coolers"));
        assert!(reply.contains("4️⃣ Visi Coolers & Water Dispensers"));
        assert!(reply.contains("8️⃣ Televisions"));
        assert!(reply.ends_with("(e.g., \"1\" for Air Coolers)."));
    }

    #[test]
    fn test_small_talk_variants() {
        let identity = canned_response(Classification::SmallTalk, "What is your name?", "Bob").unwrap();
        assert!(identity.starts_with("🤖 I'm your Warranty Assistant, Bob!"));

        let bot = canned_response(Classification::SmallTalk, "are you there", "Bob").unwrap();
        assert!(bot.starts_with("😊 I'm just a bot"));
        assert!(bot.contains("Bob"));
    }

    #[test]
    fn test_category_selection_reply() {
        let reply = canned_response(
            Classification::CategorySelection(Category::WashingMachine),
            "6",
            "Carol",
        )
        .unwrap();
        assert!(reply.starts_with("Great! You've selected Washing Machine."));
        assert!(reply.contains("1. Brand name\n2. Year of purchase\n3. Issue you're facing"));
    }

    #[test]
    fn test_retrieval_has_no_canned_response() {
        assert!(canned_response(Classification::RetrievalNeeded, "x", "Dan").is_none());
    }
}
