use crate::action::{ActionCall, parse_actions};
use serde::Serialize;

/// What a model reply to the exemplar prompt contained
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResponseActions {
    /// The reply started with a refusal prefix
    Refused { prefix: String },
    /// New calls, plus calls dropped because they were issued before
    Actions {
        actions: Vec<ActionCall>,
        duplicates: Vec<ActionCall>,
    },
    NoActions,
}

/// Body of the first fenced block in `text`, ignoring any language tag.
/// Fences only count at the start of a line.
pub fn first_code_block(text: &str) -> Option<&str> {
    let mut offset = 0;
    let mut body_start = None;
    for line in text.split_inclusive('\n') {
        if line.trim_start().starts_with("```") {
            match body_start {
                None => body_start = Some(offset + line.len()),
                Some(start) => return Some(&text[start..offset]),
            }
        }
        offset += line.len();
    }
    None
}

/// Read the actions out of a model reply, skipping calls already in `past`
pub fn read_response(text: &str, past: &[ActionCall], refusal_prefixes: &[String]) -> ResponseActions {
    let trimmed = text.trim_start();
    if let Some(prefix) = refusal_prefixes.iter().find(|p| trimmed.starts_with(p.as_str())) {
        log::warn!("Model refused to answer: {}", trimmed.lines().next().unwrap_or_default());
        return ResponseActions::Refused { prefix: prefix.clone() };
    }

    let block_actions = first_code_block(text).map(parse_actions).unwrap_or_default();
    let parsed = if block_actions.is_empty() {
        log::debug!("No actions in the first code block, scanning the whole reply");
        parse_actions(text)
    } else {
        block_actions
    };

    let mut actions: Vec<ActionCall> = Vec::new();
    let mut duplicates = Vec::new();
    for call in parsed {
        if past.contains(&call) || actions.contains(&call) {
            log::info!("Duplicate action: {}", call);
            duplicates.push(call);
        } else {
            actions.push(call);
        }
    }

    if actions.is_empty() && duplicates.is_empty() {
        ResponseActions::NoActions
    } else {
        ResponseActions::Actions { actions, duplicates }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResponseConfig;

    fn prefixes() -> Vec<String> {
        ResponseConfig::default().refusal_prefixes
    }

    #[test]
    fn test_first_code_block_ignores_language() {
        let text = "Here you go:\n```python\nwiki_dump_lookup(\"Berlin\")\n```\nDone.";
        assert_eq!(first_code_block(text), Some("wiki_dump_lookup(\"Berlin\")\n"));
    }

    #[test]
    fn test_first_code_block_missing_or_open() {
        assert_eq!(first_code_block("no fences"), None);
        assert_eq!(first_code_block("```\nnever closed"), None);
    }

    #[test]
    fn test_read_response_from_block() {
        let text = "## Reasoning\nWe need the population.\n\n## Actions\n```\nwiki_dump_lookup(\"Germany\")\nweb_search(\"Germany population 2024\")\n```\n";
        match read_response(text, &[], &prefixes()) {
            ResponseActions::Actions { actions, duplicates } => {
                assert_eq!(actions.len(), 2);
                assert_eq!(actions[1], ActionCall::new("web_search", "Germany population 2024"));
                assert!(duplicates.is_empty());
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_read_response_without_block() {
        let text = "I would run:\nwiki_dump_lookup(\"Germany\")\n";
        match read_response(text, &[], &prefixes()) {
            ResponseActions::Actions { actions, .. } => assert_eq!(actions.len(), 1),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_first_code_block_skips_inline_backticks() {
        let text = "Use the ```tool(\"x\")``` syntax.\n```\nwiki_dump_lookup(\"Germany\")\n```\n";
        assert_eq!(first_code_block(text), Some("wiki_dump_lookup(\"Germany\")\n"));
    }

    #[test]
    fn test_read_response_empty_block_falls_back_to_whole_reply() {
        let text = "```\n```\nwiki_dump_lookup(\"Germany\")\n";
        match read_response(text, &[], &prefixes()) {
            ResponseActions::Actions { actions, .. } => {
                assert_eq!(actions, vec![ActionCall::new("wiki_dump_lookup", "Germany")]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_read_response_inline_code_before_block() {
        let text = "Use the ```tool(\"x\")``` syntax.\n```\nwiki_dump_lookup(\"Germany\")\n```\n";
        match read_response(text, &[], &prefixes()) {
            ResponseActions::Actions { actions, .. } => {
                assert_eq!(actions, vec![ActionCall::new("wiki_dump_lookup", "Germany")]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_read_response_refusal() {
        let text = "  I'm sorry, but I can't help with that.";
        assert_eq!(
            read_response(text, &[], &prefixes()),
            ResponseActions::Refused {
                prefix: "I'm sorry".to_string()
            }
        );
    }

    #[test]
    fn test_read_response_drops_past_and_repeated_calls() {
        let past = vec![ActionCall::new("wiki_dump_lookup", "Germany")];
        let text = "```\nwiki_dump_lookup(\"Germany\")\nwiki_dump_lookup(\"EU\")\nwiki_dump_lookup(\"EU\")\n```";
        match read_response(text, &past, &prefixes()) {
            ResponseActions::Actions { actions, duplicates } => {
                assert_eq!(actions, vec![ActionCall::new("wiki_dump_lookup", "EU")]);
                assert_eq!(duplicates.len(), 2);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_read_response_no_actions() {
        assert_eq!(read_response("The claim is true.", &[], &prefixes()), ResponseActions::NoActions);
    }

    #[test]
    fn test_serializes_with_status_tag() {
        let json = serde_json::to_value(ResponseActions::NoActions).unwrap();
        assert_eq!(json["status"], "no_actions");
    }
}
