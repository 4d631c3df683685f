use crate::action::ActionCall;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// The four headings every exemplar carries, in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Section {
    Example,
    Claim,
    Reasoning,
    Actions,
}

impl Section {
    pub const ORDER: [Section; 4] = [Section::Example, Section::Claim, Section::Reasoning, Section::Actions];

    pub fn heading(&self) -> &'static str {
        match self {
            Section::Example => "# Example",
            Section::Claim => "## Claim:",
            Section::Reasoning => "## Reasoning",
            Section::Actions => "## Actions",
        }
    }

    /// Classify a line outside any fence. Returns the section and any text
    /// following the heading on the same line.
    fn classify(line: &str) -> Option<(Section, &str)> {
        // Markdown allows up to three spaces before an ATX heading
        let indent = line.len() - line.trim_start_matches(' ').len();
        if indent > 3 {
            return None;
        }
        let line = line[indent..].trim_end();
        if line == "# Example" {
            return Some((Section::Example, ""));
        }
        if let Some(rest) = line.strip_prefix("## Claim:") {
            return Some((Section::Claim, rest));
        }
        match line {
            "## Reasoning" | "## Reasoning:" => Some((Section::Reasoning, "")),
            "## Actions" | "## Actions:" => Some((Section::Actions, "")),
            _ => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExemplarError {
    #[error("Missing heading '{0}'")]
    MissingHeading(Section),

    #[error("Heading '{section}' appears more than once (again at line {line})")]
    DuplicateHeading { section: Section, line: usize },

    #[error("Expected '{expected}' but found '{found}' at line {line}")]
    OutOfOrder {
        expected: Section,
        found: Section,
        line: usize,
    },

    #[error("Section '{0}' is empty")]
    EmptySection(Section),

    #[error("Section '## Actions' has no fenced code block")]
    NoActionBlock,

    #[error("Code fence opened at line {0} is never closed")]
    UnterminatedFence(usize),

    #[error("Action block at line {0} contains no tool(\"...\") calls")]
    NoActions(usize),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8", .0.display())]
    NotUtf8(PathBuf),
}

/// A non-blank line inside the action fence that is not a call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrayLine {
    pub line: usize,
    pub text: String,
}

/// A parsed exemplar. The original text is kept so it can be emitted unchanged.
#[derive(Debug, Clone, Serialize)]
pub struct Exemplar {
    pub name: String,
    pub claim: String,
    pub reasoning: String,
    pub actions: Vec<ActionCall>,
    pub stray_lines: Vec<StrayLine>,
    #[serde(skip)]
    source: String,
}

struct Heading<'a> {
    section: Section,
    index: usize,
    inline: &'a str,
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

impl Exemplar {
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self, ExemplarError> {
        let lines: Vec<&str> = text.lines().collect();
        let headings = collect_headings(&lines)?;

        for section in Section::ORDER {
            let mut found = headings.iter().filter(|h| h.section == section);
            if found.next().is_none() {
                return Err(ExemplarError::MissingHeading(section));
            }
            if let Some(again) = found.next() {
                return Err(ExemplarError::DuplicateHeading {
                    section,
                    line: again.index + 1,
                });
            }
        }

        for (heading, expected) in headings.iter().zip(Section::ORDER) {
            if heading.section != expected {
                return Err(ExemplarError::OutOfOrder {
                    expected,
                    found: heading.section,
                    line: heading.index + 1,
                });
            }
        }

        let body = |i: usize| section_body(&lines, &headings, i);

        let mut claim = headings[1].inline.trim().to_string();
        let claim_rest = body(1).join("\n");
        if !claim_rest.trim().is_empty() {
            if !claim.is_empty() {
                claim.push('\n');
            }
            claim.push_str(claim_rest.trim());
        }
        if claim.is_empty() {
            return Err(ExemplarError::EmptySection(Section::Claim));
        }

        let reasoning = body(2).join("\n").trim().to_string();
        if reasoning.is_empty() {
            return Err(ExemplarError::EmptySection(Section::Reasoning));
        }

        let (actions, stray_lines) = parse_action_block(body(3), headings[3].index + 2)?;

        Ok(Self {
            name: name.into(),
            claim,
            reasoning,
            actions,
            stray_lines,
            source: text.to_string(),
        })
    }

    /// Read and parse an exemplar file, named after its file stem
    pub fn load(path: &Path) -> Result<Self, ExemplarError> {
        let bytes = fs::read(path).map_err(|source| ExemplarError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|_| ExemplarError::NotUtf8(path.to_path_buf()))?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        log::debug!("Parsing exemplar '{}' from {}", name, path.display());
        Self::parse(name, &text)
    }

    /// The exact text this exemplar was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Distinct tool names in order of first use
    pub fn tools(&self) -> Vec<&str> {
        let mut tools: Vec<&str> = Vec::new();
        for action in &self.actions {
            if !tools.contains(&action.tool.as_str()) {
                tools.push(&action.tool);
            }
        }
        tools
    }

    /// Calls that repeat an earlier call verbatim
    pub fn duplicate_actions(&self) -> Vec<&ActionCall> {
        self.actions
            .iter()
            .enumerate()
            .filter(|(i, a)| self.actions[..*i].contains(*a))
            .map(|(_, a)| a)
            .collect()
    }
}

impl fmt::Display for Exemplar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn section_body<'a>(lines: &'a [&'a str], headings: &[Heading<'_>], i: usize) -> &'a [&'a str] {
    let start = headings[i].index + 1;
    let end = headings.get(i + 1).map(|h| h.index).unwrap_or(lines.len());
    &lines[start..end]
}

fn collect_headings<'a>(lines: &[&'a str]) -> Result<Vec<Heading<'a>>, ExemplarError> {
    let mut headings = Vec::new();
    let mut open_fence: Option<usize> = None;

    for (index, line) in lines.iter().enumerate() {
        if is_fence(line) {
            open_fence = match open_fence {
                Some(_) => None,
                None => Some(index),
            };
            continue;
        }
        if open_fence.is_some() {
            continue;
        }
        if let Some((section, inline)) = Section::classify(*line) {
            headings.push(Heading { section, index, inline });
        }
    }

    if let Some(index) = open_fence {
        return Err(ExemplarError::UnterminatedFence(index + 1));
    }
    Ok(headings)
}

/// Parse the first fenced block of the actions section. `first_line` is the
/// 1-based line number of `body[0]`.
fn parse_action_block(body: &[&str], first_line: usize) -> Result<(Vec<ActionCall>, Vec<StrayLine>), ExemplarError> {
    let open = body.iter().position(|l| is_fence(l)).ok_or(ExemplarError::NoActionBlock)?;
    // Fences are already known to be balanced
    let close = body[open + 1..]
        .iter()
        .position(|l| is_fence(l))
        .map(|p| open + 1 + p)
        .ok_or(ExemplarError::UnterminatedFence(first_line + open))?;

    let mut actions = Vec::new();
    let mut stray = Vec::new();
    for (offset, line) in body[open + 1..close].iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match ActionCall::parse_line(line) {
            Some(call) => actions.push(call),
            None => stray.push(StrayLine {
                line: first_line + open + 1 + offset,
                text: line.to_string(),
            }),
        }
    }

    if actions.is_empty() {
        return Err(ExemplarError::NoActions(first_line + open));
    }
    Ok((actions, stray))
}
