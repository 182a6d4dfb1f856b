//! Prompt template sent to the generation backend.

/// Explanation the model is told to give when the text needs no correction.
pub const PERFECT_TEXT_PHRASE: &str = "Congratulations, your English is perfect!";

/// Instruction that keeps the model from wrapping the JSON in prose.
pub const JSON_ONLY_INSTRUCTION: &str =
    "Respond with ONLY the JSON object, without any extra text before or after it.";

/// Natural-language name of a dialect code. Only `en-US` is American.
pub fn dialect_name(dialect_code: &str) -> &'static str {
    if dialect_code == "en-US" {
        "American"
    } else {
        "British"
    }
}

/// Builds the correction prompt. `text` is embedded exactly as given.
pub fn build_prompt(text: &str, dialect_code: &str) -> String {
    let dialect = dialect_name(dialect_code);

    format!(
        r#"You are an English teacher who specialises in the {dialect} dialect.
The user provided the following text for analysis:
"{text}"

Provide a three-part analysis in JSON format. {JSON_ONLY_INSTRUCTION}
The JSON object must have exactly these three keys:
{{
  "score": <a number from 0 to 100, where 100 is perfect>,
  "corrected": "<the text corrected to sound 100% natural in the {dialect} dialect. If it is already perfect, repeat the original text.>",
  "explanation": "<a short explanation (1-2 sentences) of the main mistake and how to fix it. If it is perfect, say '{PERFECT_TEXT_PHRASE}'>"
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_name() {
        assert_eq!(dialect_name("en-US"), "American");
        assert_eq!(dialect_name("en-GB"), "British");
        assert_eq!(dialect_name("en-AU"), "British");
        assert_eq!(dialect_name(""), "British");
        assert_eq!(dialect_name("en-us"), "British");
    }

    #[test]
    fn test_prompt_names_dialect() {
        let american = build_prompt("I has a cat", "en-US");
        assert!(american.contains("American dialect"));
        assert!(!american.contains("British"));

        let british = build_prompt("I has a cat", "en-GB");
        assert!(british.contains("British dialect"));
        assert!(!british.contains("American"));
    }

    #[test]
    fn test_prompt_embeds_text_verbatim() {
        let text = "He said \"hi\" {twice}\nand left \\ early & <fast>";
        let prompt = build_prompt(text, "en-US");
        assert!(prompt.contains(text));
    }

    #[test]
    fn test_prompt_requests_json_only() {
        let prompt = build_prompt("anything", "en-GB");
        assert!(prompt.contains(JSON_ONLY_INSTRUCTION));
        assert!(prompt.contains(r#""score""#));
        assert!(prompt.contains(r#""corrected""#));
        assert!(prompt.contains(r#""explanation""#));
        assert!(prompt.contains(PERFECT_TEXT_PHRASE));
    }
}
