use crate::config::ExemplarConfig;
use crate::exemplar::{Exemplar, ExemplarError};
use crate::templates::exemplars::BUILTIN;
use eyre::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Where an exemplar in the library came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Builtin,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub exemplar: Exemplar,
    pub origin: Origin,
}

/// Named exemplars, ordered by name
#[derive(Debug, Default)]
pub struct Library {
    entries: BTreeMap<String, Entry>,
}

impl Library {
    pub fn builtin() -> Result<Self> {
        let mut library = Self::default();
        for (name, text) in BUILTIN {
            let exemplar = Exemplar::parse(*name, text).context(format!("Built-in exemplar '{}' is malformed", name))?;
            library.insert(exemplar, Origin::Builtin);
        }
        Ok(library)
    }

    /// Built-ins (if enabled) plus every exemplar file in the configured directory
    pub fn load(config: &ExemplarConfig) -> Result<Self> {
        let mut library = if config.include_builtin {
            Self::builtin()?
        } else {
            Self::default()
        };

        if let Some(dir) = &config.dir {
            for (path, result) in Self::scan(dir)? {
                let exemplar = result.context(format!("Failed to load exemplar {}", path.display()))?;
                if library.entries.contains_key(&exemplar.name) {
                    log::info!("{} overrides exemplar '{}'", path.display(), exemplar.name);
                }
                library.insert(exemplar, Origin::File(path));
            }
        }

        log::debug!("Exemplar library holds {} entries", library.len());
        Ok(library)
    }

    /// Parse every `*.md` file in `dir`, sorted by file name, keeping failures
    pub fn scan(dir: &Path) -> Result<Vec<(PathBuf, Result<Exemplar, ExemplarError>)>> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .context(format!("Failed to read exemplar directory {}", dir.display()))?
            .filter_map(|entry| match entry {
                Ok(e) => Some(e.path()),
                Err(e) => {
                    log::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    None
                }
            })
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "md"))
            .collect();
        paths.sort();

        Ok(paths
            .into_iter()
            .map(|path| {
                let result = Exemplar::load(&path);
                (path, result)
            })
            .collect())
    }

    fn insert(&mut self, exemplar: Exemplar, origin: Origin) {
        self.entries.insert(exemplar.name.clone(), Entry { exemplar, origin });
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
