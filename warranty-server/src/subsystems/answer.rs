//! Answer generator: prompt assembly, one model call, post-processing
//!
//! The prompt is a fixed instruction block followed by the retrieved context,
//! an optional replay of the most recent turns, and the customer question.
//! Answers are trimmed and capped at `MAX_ANSWER_CHARS` characters.

use std::sync::Arc;

use warranty_core::generation::{GenerationError, GenerativeModel};
use warranty_core::models::ChatMessage;

/// Hard cap on returned answers, counted in Unicode scalar values.
pub const MAX_ANSWER_CHARS: usize = 500;

const TRUNCATION_MARKER: &str = "...";

/// Prior messages replayed into the prompt.
pub const HISTORY_WINDOW: usize = 5;

pub const SYSTEM_PROMPT: &str = r#"## System Prompt

You are a product warranty assistant for consumer electronics and appliances. Your job is to help customers understand product models, warranty coverage, and whether they can file a complaint or claim under the product warranty based on their specific issue.

### Product Information Structure
Each product has the following information:
1. Brand and Category
2. Available Models with PIDs (optional for warranty claims)
3. Warranty Coverage
4. Common Issues Covered
5. Common Exclusions

### Communication Guidelines
- Be clear, professional, and helpful
- When asked about models, list all available models with their PIDs
- When asked about warranty, explain coverage and conditions
- When asked about issues, explain if they're covered and why
- Make intelligent decisions based on available information
- Only ask for more information if absolutely necessary (like purchase date or brand)
- If the issue isn't covered, explain politely and suggest checking with the brand
- Base your decision on the warranty database context provided below

### Response Format
- For model listings: Start with "Here are the available models:"
- For warranty info: Start with "Warranty Coverage:"
- For issue coverage: Start with "✅ Yes" or "❌ No"
- For unclear cases: Start with "ℹ️ More info needed"
- Keep your answer under 500 characters if possible

### Example Responses:
1. "What are the available models and warranty coverage?"
   "Here's a comprehensive overview by brand and category:

   Voltas:
   - ACs: 1.0-2.0 Ton models with 1 year standard + 10 year compressor warranty
   - Air Coolers: Desert & Personal series with 1 year warranty
   - Refrigerators: Commercial & Voltas Beko with 1 year product + 10 year compressor
   - Visi Coolers & Water Dispensers: 1 year standard warranty

   Blue Star:
   - ACs: 1.0-2.0 Ton with 1 year standard + 5 year compressor warranty
   - All models available in Standard, Pro, and Elite variants

   Panasonic:
   - ACs: 1.0-2.0 Ton with 1 year standard + 5 year compressor warranty
   - Microwaves: 1 year standard + 5 year magnetron warranty
   - Washing Machines: 2 year standard + 10 year motor warranty
   - TVs: 1 year standard + 3 year panel warranty"

2. "My AC compressor stopped working after 3 years"
   "✅ Yes. If it's an inverter AC with a 10-year compressor warranty and registered on time, you're eligible."

3. "My microwave plate broke due to a fall"
   "❌ No. Physical damage like a fall is excluded from standard warranty coverage."

4. "My BlueStar AC is on extended warranty and its motor is not working it been 1 year since purchase"
   "✅ Yes. Since your Blue Star AC is on extended warranty and the motor issue occurred within the warranty period, this is covered. The extended warranty includes motor coverage. Please contact the nearest service center with your purchase receipt."

5. "Voltas AC not cooling after 2 years"
   "❌ No. The standard warranty covers manufacturing defects for 1 year. Since it's been 2 years, this issue is not covered under standard warranty. However, if you have extended warranty or if it's an inverter model with a 10-year compressor warranty, please provide your purchase date to verify coverage."

6. "Panasonic washing machine making noise"
   "ℹ️ More info needed. Please provide your purchase date to check warranty coverage. The standard warranty covers manufacturing defects for 2 years, and motor issues for 10 years on select models."

7. "Voltas Beko refrigerator not cooling"
   "ℹ️ More info needed. Please provide your purchase date. The standard warranty covers 1 year on product and 10 years on compressor (parts only)."

8. "Panasonic TV screen flickering"
   "ℹ️ More info needed. Please provide your purchase date. The standard warranty covers 1 year comprehensive, and panel issues for 3 years on select models."

9. "Blue Star AC water leakage"
   "ℹ️ More info needed. Please provide your purchase date. Water leakage can be covered if it's due to manufacturing defects and within the 1-year standard warranty period."

10. "Voltas air cooler not working"
    "ℹ️ More info needed. Please provide your purchase date. The standard warranty covers manufacturing defects for 1 year, and regular cleaning is required to maintain warranty coverage."
"#;

/// Assemble the full model prompt.
///
/// `history` is replayed oldest first; only its last `HISTORY_WINDOW`
/// entries are used, and the section is omitted when empty.
pub fn build_prompt(snippets: &[String], question: &str, history: &[ChatMessage]) -> String {
    let mut prompt = String::with_capacity(SYSTEM_PROMPT.len() + 1024);
    prompt.push_str(SYSTEM_PROMPT);

    prompt.push_str("\n### Warranty Database Context:\n");
    prompt.push_str(&snippets.join("\n\n"));
    prompt.push_str("\n\n");

    let start = history.len().saturating_sub(HISTORY_WINDOW);
    let history = &history[start..];
    if !history.is_empty() {
        prompt.push_str("### Previous Conversation:\n");
        for message in history {
            prompt.push_str(message.role.speaker());
            prompt.push_str(": ");
            prompt.push_str(&message.content);
            prompt.push('\n');
        }
        prompt.push('\n');
    }

    prompt.push_str("### Customer Question:\n");
    prompt.push_str(question);
    prompt.push('\n');
    prompt
}

/// Trim and cap a raw model answer at `MAX_ANSWER_CHARS` characters.
pub fn finalize_answer(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= MAX_ANSWER_CHARS {
        return trimmed.to_string();
    }

    let keep = MAX_ANSWER_CHARS - TRUNCATION_MARKER.chars().count();
    let mut answer: String = trimmed.chars().take(keep).collect();
    answer.push_str(TRUNCATION_MARKER);
    answer
}

#[derive(Clone)]
pub struct AnswerGenerator {
    model: Arc<dyn GenerativeModel>,
}

impl AnswerGenerator {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Compose a grounded answer. Exactly one model call; errors propagate.
    pub async fn generate(
        &self,
        snippets: &[String],
        question: &str,
        history: &[ChatMessage],
    ) -> Result<String, GenerationError> {
        let prompt = build_prompt(snippets, question, history);
        tracing::debug!(
            model = self.model.name(),
            snippets = snippets.len(),
            history = history.len().min(HISTORY_WINDOW),
            prompt_chars = prompt.len(),
            "Generating answer"
        );

        let raw = self.model.complete(&prompt).await?;
        Ok(finalize_answer(&raw))
    }
}
