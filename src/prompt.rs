use crate::config::{PromptConfig, ToolSpec};
use crate::exemplar::Exemplar;
use crate::templates::PROMPT_TEMPLATE;
use eyre::{Context, Result};
use handlebars::Handlebars;
use serde::Serialize;
use std::fs;

#[derive(Serialize)]
struct PromptData<'a> {
    claim: &'a str,
    tools: &'a [ToolSpec],
    exemplars: Vec<&'a str>,
}

/// Renders a claim and a set of exemplars into a few-shot prompt
pub struct PromptBuilder {
    handlebars: Handlebars<'static>,
    max_exemplars: usize,
}

impl PromptBuilder {
    pub fn new(template: &str, max_exemplars: usize) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        // Exemplars contain quotes and backticks that must reach the model unchanged
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars
            .register_template_string("prompt", template)
            .context("Failed to register prompt template")?;

        Ok(Self {
            handlebars,
            max_exemplars,
        })
    }

    /// Use the template file from config, or the built-in template
    pub fn from_config(config: &PromptConfig) -> Result<Self> {
        match &config.template {
            Some(path) => {
                let template = fs::read_to_string(path)
                    .context(format!("Failed to read prompt template {}", path.display()))?;
                log::info!("Using prompt template from {}", path.display());
                Self::new(&template, config.max_exemplars)
            }
            None => Self::new(PROMPT_TEMPLATE, config.max_exemplars),
        }
    }

    pub fn render(&self, claim: &str, exemplars: &[&Exemplar], tools: &[ToolSpec]) -> Result<String> {
        if exemplars.len() > self.max_exemplars {
            log::debug!(
                "Using {} of {} exemplars",
                self.max_exemplars,
                exemplars.len()
            );
        }

        let data = PromptData {
            claim: claim.trim(),
            tools,
            exemplars: exemplars
                .iter()
                .take(self.max_exemplars)
                .map(|e| e.source().trim_end())
                .collect(),
        };

        let prompt = self
            .handlebars
            .render("prompt", &data)
            .context("Failed to render prompt template")?;

        Ok(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::library::Library;
    use tempfile::tempdir;

    #[test]
    fn test_render_includes_exemplar_verbatim() {
        let library = Library::builtin().unwrap();
        let wiki = &library.get("wiki_dump").unwrap().exemplar;
        let config = Config::default();

        let builder = PromptBuilder::from_config(&config.prompt).unwrap();
        let prompt = builder
            .render("The Moon is made of cheese.", &[wiki], &config.tools)
            .unwrap();

        assert!(prompt.contains(wiki.source().trim_end()));
        assert!(prompt.contains("The Moon is made of cheese."));
        assert!(prompt.contains("`wiki_dump_lookup(\"...\")`"));
        assert!(prompt.contains("`web_search(\"...\")`"));
        assert!(!prompt.contains("&quot;"));
    }

    #[test]
    fn test_render_caps_exemplars() {
        let library = Library::builtin().unwrap();
        let all: Vec<&Exemplar> = library.iter().map(|e| &e.exemplar).collect();
        assert!(all.len() >= 2);

        let builder = PromptBuilder::new("{{#each exemplars}}[{{this}}]{{/each}}", 1).unwrap();
        let prompt = builder.render("claim", &all, &[]).unwrap();
        assert_eq!(prompt.matches("# Example").count(), 1);
        assert!(prompt.contains(all[0].source().trim_end()));
    }

    #[test]
    fn test_custom_template_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("PROMPT.md");
        fs::write(&path, "CLAIM={{claim}}").unwrap();

        let config = PromptConfig {
            template: Some(path),
            max_exemplars: 2,
        };
        let builder = PromptBuilder::from_config(&config).unwrap();
        assert_eq!(builder.render("  x & y  ", &[], &[]).unwrap(), "CLAIM=x & y");
    }

    #[test]
    fn test_invalid_template_is_an_error() {
        assert!(PromptBuilder::new("{{#each tools}}", 1).is_err());
    }
}
