use crate::config::ToolSpec;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*([A-Za-z_][A-Za-z0-9_]*)\("((?:[^"\\]|\\.)*)"\)\s*$"#).expect("call pattern is valid")
});

/// A single `tool("argument")` line from an exemplar or a model response
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionCall {
    pub tool: String,
    pub argument: String,
}

impl ActionCall {
    pub fn new(tool: impl Into<String>, argument: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            argument: argument.into(),
        }
    }

    /// Parse one line, returning None when it is not a call
    pub fn parse_line(line: &str) -> Option<Self> {
        let caps = CALL_RE.captures(line)?;
        Some(Self::new(&caps[1], unescape(&caps[2])))
    }
}

impl fmt::Display for ActionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let escaped = self.argument.replace('\\', "\\\\").replace('"', "\\\"");
        write!(f, "{}(\"{}\")", self.tool, escaped)
    }
}

/// Only `\"` and `\\` are escapes; any other backslash is kept as written
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(&next) = chars.peek()
            && (next == '"' || next == '\\')
        {
            out.push(next);
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

/// Every call found in `text`, one per line, in order
pub fn parse_actions(text: &str) -> Vec<ActionCall> {
    text.lines().filter_map(ActionCall::parse_line).collect()
}

#[derive(Debug, thiserror::Error)]
#[error("No tool available for action '{action}'")]
pub struct UnknownTool {
    pub action: ActionCall,
}

/// Known tools, keyed by the name used in calls
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolSpec>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<ToolSpec>) -> Self {
        Self { tools }
    }

    pub fn resolve(&self, action: &ActionCall) -> Result<&ToolSpec, UnknownTool> {
        self.tools
            .iter()
            .find(|t| t.name == action.tool)
            .ok_or_else(|| UnknownTool { action: action.clone() })
    }

    pub fn tools(&self) -> &[ToolSpec] {
        &self.tools
    }

    /// Calls in `actions` whose tool is not registered
    pub fn unknown<'a>(&self, actions: &'a [ActionCall]) -> Vec<&'a ActionCall> {
        actions.iter().filter(|a| self.resolve(a).is_err()).collect()
    }
}
