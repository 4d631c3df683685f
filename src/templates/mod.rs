pub mod exemplars;
pub mod prompt;

pub use prompt::PROMPT_TEMPLATE;
