//! Prompt assembly for one missing proposition.
//!
//! The context window (neighboring passages, two nearby briefs, three fixed
//! style examples) is a prompt-quality heuristic, not a contract; the
//! constants live here so they can change without touching the batch loop.

use lesart_core::{Corpus, Explanation, ExplanationMap, Proposition};

/// Propositions whose existing explanations serve as style examples.
pub const EXAMPLE_NUMBERS: [&str; 5] = ["1", "7", "11", "55", "65"];

/// At most this many style examples are included.
const MAX_EXAMPLES: usize = 3;

/// At most this many nearby briefs are included.
const MAX_NEARBY: usize = 2;

/// Example comprehensives are excerpted to this many characters.
const EXAMPLE_EXCERPT_CHARS: usize = 300;

/// Everything the prompt for one proposition draws on.
#[derive(Debug)]
pub struct PromptContext<'a> {
    pub proposition: &'a Proposition,
    pub prev: Option<&'a Proposition>,
    pub next: Option<&'a Proposition>,
    /// Formatted "Proposition N (Brief): …" lines for nearby existing
    /// explanations, newline-joined. Empty when none exist.
    pub nearby: String,
}

/// Build the fixed style-example block from whichever of the example
/// explanations already exist, capped at [`MAX_EXAMPLES`].
pub fn example_block(explanations: &ExplanationMap) -> String {
    EXAMPLE_NUMBERS
        .iter()
        .filter_map(|num| explanations.get(num).map(|e| (num, e)))
        .take(MAX_EXAMPLES)
        .map(|(num, exp)| {
            format!(
                "Proposition {}:\nBrief: {}\nComprehensive: {}...",
                num,
                exp.brief,
                excerpt(&exp.comprehensive, EXAMPLE_EXCERPT_CHARS),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Gather the context for `number`, or None when the proposition is not in
/// the corpus (the per-key not-found failure).
pub fn context_for<'a>(
    number: &str,
    corpus: &'a Corpus,
    explanations: &ExplanationMap,
) -> Option<PromptContext<'a>> {
    let index = corpus.index_of(number)?;
    let proposition = corpus.get(index)?;
    let (prev, next) = corpus.neighbors(index);

    let nearby = nearby_briefs(number, explanations);

    Some(PromptContext {
        proposition,
        prev,
        next,
        nearby,
    })
}

/// Briefs of explanations at numbers ±2/±1 that already exist, first
/// [`MAX_NEARBY`], for style continuity.
fn nearby_briefs(number: &str, explanations: &ExplanationMap) -> String {
    let Ok(n) = number.parse::<i64>() else {
        return String::new();
    };
    [n - 2, n - 1, n + 1, n + 2]
        .iter()
        .map(|m| m.to_string())
        .filter_map(|m| explanations.get(&m).map(|e| (m, e.brief.clone())))
        .take(MAX_NEARBY)
        .map(|(m, brief)| format!("Proposition {} (Brief): {}", m, brief))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the full request prompt for one proposition.
pub fn build_prompt(context: &PromptContext<'_>, examples: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are writing reader's explanations for numbered propositions of \
         Wittgenstein's Philosophical Investigations. Each explanation should \
         be insightful yet accessible, and consistent in voice with the \
         examples below.\n\n",
    );

    if !examples.is_empty() {
        prompt.push_str("STYLE EXAMPLES:\n");
        prompt.push_str(examples);
        prompt.push_str("\n\n");
    }

    prompt.push_str("NOW EXPLAIN:\n");
    prompt.push_str(&format!(
        "Proposition {}: \"{}\"\n",
        context.proposition.number, context.proposition.text,
    ));

    if let Some(prev) = context.prev {
        prompt.push_str(&format!("Previous ({}): \"{}\"\n", prev.number, prev.text));
    }
    if let Some(next) = context.next {
        prompt.push_str(&format!("Next ({}): \"{}\"\n", next.number, next.text));
    }

    if !context.nearby.is_empty() {
        prompt.push_str("\nNEARBY EXPLANATIONS:\n");
        prompt.push_str(&context.nearby);
        prompt.push('\n');
    }

    prompt.push_str(
        "\nWrite:\n\
         1. A brief explanation (2-3 sentences, for general readers).\n\
         2. A comprehensive explanation in markdown, with **bold** section \
         headers, concrete examples where helpful, and connections to \
         related propositions.\n\n\
         Reply with a JSON object:\n\
         {\n  \"brief\": \"...\",\n  \"comprehensive\": \"...\"\n}",
    );

    prompt
}

fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Parse the model's reply: a JSON object with string fields `brief` and
/// `comprehensive`, possibly embedded in surrounding free text.
pub fn parse_reply(text: &str) -> Result<Explanation, String> {
    let start = text
        .find('{')
        .ok_or_else(|| "reply contains no JSON object".to_string())?;
    let end = text
        .rfind('}')
        .ok_or_else(|| "reply contains no JSON object".to_string())?;
    if end < start {
        return Err("reply contains no JSON object".to_string());
    }

    let value: serde_json::Value = serde_json::from_str(&text[start..=end])
        .map_err(|e| format!("reply is not valid JSON: {}", e))?;

    let brief = value["brief"]
        .as_str()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "reply missing 'brief' field".to_string())?;
    let comprehensive = value["comprehensive"]
        .as_str()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "reply missing 'comprehensive' field".to_string())?;

    Ok(Explanation {
        brief: brief.to_string(),
        comprehensive: comprehensive.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prop(number: &str, text: &str) -> Proposition {
        Proposition {
            number: number.to_string(),
            text: text.to_string(),
            section: String::new(),
        }
    }

    fn corpus() -> Corpus {
        Corpus::new(vec![
            prop("1", "first passage"),
            prop("2", "second passage"),
            prop("3", "third passage"),
        ])
    }

    fn expl(brief: &str, comprehensive: &str) -> Explanation {
        Explanation {
            brief: brief.to_string(),
            comprehensive: comprehensive.to_string(),
        }
    }

    #[test]
    fn context_includes_neighbors() {
        let map = ExplanationMap::default();
        let corpus = corpus();
        let ctx = context_for("2", &corpus, &map).unwrap();
        assert_eq!(ctx.proposition.number, "2");
        assert_eq!(ctx.prev.unwrap().number, "1");
        assert_eq!(ctx.next.unwrap().number, "3");
    }

    #[test]
    fn context_at_bounds_has_one_neighbor() {
        let map = ExplanationMap::default();
        let corpus = corpus();
        let ctx = context_for("1", &corpus, &map).unwrap();
        assert!(ctx.prev.is_none());
        assert_eq!(ctx.next.unwrap().number, "2");

        let ctx = context_for("3", &corpus, &map).unwrap();
        assert_eq!(ctx.prev.unwrap().number, "2");
        assert!(ctx.next.is_none());
    }

    #[test]
    fn unknown_number_has_no_context() {
        let map = ExplanationMap::default();
        assert!(context_for("99", &corpus(), &map).is_none());
    }

    #[test]
    fn nearby_briefs_take_first_two_existing() {
        let mut map = ExplanationMap::default();
        map.insert("3".to_string(), expl("brief three", "c"));
        map.insert("4".to_string(), expl("brief four", "c"));
        map.insert("7".to_string(), expl("brief seven", "c"));

        // For 5: candidates 3,4,6,7 -> 3 and 4 exist and come first
        let nearby = nearby_briefs("5", &map);
        assert!(nearby.contains("Proposition 3 (Brief): brief three"));
        assert!(nearby.contains("Proposition 4 (Brief): brief four"));
        assert!(!nearby.contains("seven"));
    }

    #[test]
    fn example_block_caps_at_three() {
        let mut map = ExplanationMap::default();
        for num in EXAMPLE_NUMBERS {
            map.insert(num.to_string(), expl(&format!("brief {}", num), &"x".repeat(400)));
        }
        let block = example_block(&map);
        assert!(block.contains("Proposition 1:"));
        assert!(block.contains("Proposition 7:"));
        assert!(block.contains("Proposition 11:"));
        assert!(!block.contains("Proposition 55:"));
        // Comprehensive excerpted to 300 chars
        assert!(block.contains(&format!("{}...", "x".repeat(300))));
        assert!(!block.contains(&"x".repeat(301)));
    }

    #[test]
    fn prompt_names_target_and_neighbors() {
        let mut map = ExplanationMap::default();
        map.insert("1".to_string(), expl("brief one", "comp one"));
        let corpus = corpus();
        let ctx = context_for("2", &corpus, &map).unwrap();
        let prompt = build_prompt(&ctx, &example_block(&map));

        assert!(prompt.contains("Proposition 2: \"second passage\""));
        assert!(prompt.contains("Previous (1): \"first passage\""));
        assert!(prompt.contains("Next (3): \"third passage\""));
        assert!(prompt.contains("NEARBY EXPLANATIONS:"));
        assert!(prompt.contains("Proposition 1 (Brief): brief one"));
    }

    #[test]
    fn parse_reply_plain_object() {
        let reply = r#"{"brief": "short", "comprehensive": "**Long**"}"#;
        let exp = parse_reply(reply).unwrap();
        assert_eq!(exp.brief, "short");
        assert_eq!(exp.comprehensive, "**Long**");
    }

    #[test]
    fn parse_reply_embedded_in_prose() {
        let reply = "Here is the explanation you asked for:\n\n\
                     {\"brief\": \"short\", \"comprehensive\": \"long {with} braces\"}\n\n\
                     Let me know if you need anything else.";
        let exp = parse_reply(reply).unwrap();
        assert_eq!(exp.brief, "short");
        assert_eq!(exp.comprehensive, "long {with} braces");
    }

    #[test]
    fn parse_reply_missing_field() {
        let err = parse_reply(r#"{"brief": "only"}"#).unwrap_err();
        assert!(err.contains("comprehensive"), "err: {}", err);

        let err = parse_reply(r#"{"brief": "", "comprehensive": "x"}"#).unwrap_err();
        assert!(err.contains("brief"), "err: {}", err);
    }

    #[test]
    fn parse_reply_no_json() {
        assert!(parse_reply("I cannot produce that.").is_err());
        assert!(parse_reply("} backwards {").is_err());
        assert!(parse_reply("{not json}").is_err());
    }
}
