// Built-in exemplars, embedded verbatim from the adjacent exemplars/ directory

pub const WIKI_DUMP: &str = include_str!("exemplars/wiki_dump.md");
pub const WEB_SEARCH: &str = include_str!("exemplars/web_search.md");

/// (name, content) for every built-in exemplar
pub const BUILTIN: &[(&str, &str)] = &[("wiki_dump", WIKI_DUMP), ("web_search", WEB_SEARCH)];
