/// Default PROMPT.md template content
pub const PROMPT_TEMPLATE: &str = r#"# Claim Verification Plan

You are checking whether a claim is true. You do NOT answer the claim yourself.
Instead, break the claim into the questions that must be answered to verify it,
then list the lookups that would answer those questions.

## Valid Actions

{{#each tools}}
- `{{name}}("...")`: {{description}}
{{/each}}

Use ONLY the actions listed above. Put every action on its own line inside a
single fenced code block under `## Actions`. Do not run the actions.

---

{{#each exemplars}}
{{this}}

{{/each}}
---

# Example
## Claim:
{{claim}}

## Reasoning
"#;
