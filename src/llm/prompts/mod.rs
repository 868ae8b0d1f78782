// ABOUTME: Prompt templates for the coaching, review and journal flows, loaded at compile time
// ABOUTME: Provides placeholder rendering and the JSON-output system instruction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

//! # Prompt Templates
//!
//! Prompts live in Markdown files next to this module so they can be edited
//! without touching code. Placeholders use `{{name}}` syntax and are filled
//! by [`render`].

use serde_json::Value;

/// Conversational coaching prompt
pub const COACH_TIPS_PROMPT: &str = include_str!("coach_tips.md");

/// Weekly/monthly habit review prompt
pub const HABIT_INSIGHTS_PROMPT: &str = include_str!("habit_insights.md");

/// Journal reflection prompt
pub const JOURNAL_ANALYSIS_PROMPT: &str = include_str!("journal_analysis.md");

/// Replace every `{{key}}` placeholder with its value
///
/// The template is scanned once: inserted values are never searched for
/// placeholders, so user text containing `{{...}}` is emitted as-is. Unknown
/// placeholders are left untouched.
#[must_use]
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        let (literal, tail) = rest.split_at(open);
        rendered.push_str(literal);
        let after_open = &tail[2..];

        let Some(close) = after_open.find("}}") else {
            rendered.push_str(tail);
            return rendered;
        };
        let key = &after_open[..close];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => rendered.push_str(value),
            None => rendered.push_str(&tail[..close + 4]),
        }
        rest = &after_open[close + 2..];
    }

    rendered.push_str(rest);
    rendered
}

/// System instruction asking for a single JSON object matching `schema`
#[must_use]
pub fn json_output_instruction(schema: &Value) -> String {
    format!(
        "Respond only with a single JSON object that matches this JSON schema, \
         with no surrounding commentary:\n{schema}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_replaces_all_occurrences() {
        let rendered = render(
            "{{a}} and {{a}} then {{b}} {{missing}}",
            &[("a", "x"), ("b", "y")],
        );
        assert_eq!(rendered, "x and x then y {{missing}}");
    }

    #[test]
    fn test_render_does_not_expand_inserted_values() {
        let rendered = render(
            "first={{a}} second={{b}}",
            &[("a", "literal {{b}}"), ("b", "B")],
        );
        assert_eq!(rendered, "first=literal {{b}} second=B");
    }

    #[test]
    fn test_render_keeps_unterminated_braces() {
        assert_eq!(render("x {{a}} y {{open", &[("a", "1")]), "x 1 y {{open");
    }

    #[test]
    fn test_templates_expose_placeholders() {
        assert!(COACH_TIPS_PROMPT.contains("{{current_input}}"));
        assert!(COACH_TIPS_PROMPT.contains("{{history}}"));
        assert!(HABIT_INSIGHTS_PROMPT.contains("{{period_logs}}"));
        assert!(JOURNAL_ANALYSIS_PROMPT.contains("{{journal_text}}"));
    }

    #[test]
    fn test_json_instruction_embeds_schema() {
        let instruction = json_output_instruction(&json!({ "type": "object" }));
        assert!(instruction.contains("JSON"));
        assert!(instruction.contains(r#""type":"object""#));
    }
}
