use crate::entry::{PlatformEntry, builtin};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::path::Path;

/// An immutable, pre-sorted list of [`PlatformEntry`] values.
///
/// Entries are ordered by canonical name length (longest first), then by
/// descending [`priority`](PlatformEntry::priority), then by the order they
/// were supplied in. The [`Resolver`](crate::Resolver) walks the table in
/// this order and only replaces its best match on a strictly greater weight,
/// so on ties the more specific name wins, and after that the explicit
/// priority, and only then the input order.
#[derive(Debug, Clone)]
pub struct PlatformTable {
    entries: Vec<PlatformEntry>,
}

impl Default for PlatformTable {
    fn default() -> Self {
        Self::new(builtin())
    }
}

impl PlatformTable {
    pub fn new(entries: impl IntoIterator<Item = PlatformEntry>) -> Self {
        let mut entries: Vec<_> = entries.into_iter().collect();
        // `sort_by` is stable, which keeps input order as the final tie-break.
        entries.sort_by(|a, b| {
            b.name.chars().count().cmp(&a.name.chars().count()).then_with(|| b.priority.cmp(&a.priority))
        });
        Self { entries }
    }

    /// Parse a platform list: one platform per line, optionally followed by
    /// `|` and a comma-separated list of aliases.
    ///
    /// ```text
    /// # comments and blank lines are ignored
    /// Sony Playstation 2 | ps2, playstation2
    /// Nintendo Switch
    /// ```
    pub fn from_lines(text: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (name, aliases) = match line.split_once('|') {
                Some((name, aliases)) => (name.trim(), aliases.split(',').map(str::trim).filter(|a| !a.is_empty()).collect()),
                None => (line, Vec::new()),
            };
            if name.is_empty() {
                exn::bail!(ErrorKind::InvalidEntry(index + 1));
            }
            entries.push(PlatformEntry::new(name).with_aliases(aliases));
        }
        Ok(Self::new(entries))
    }

    /// Load a platform list file (see [`from_lines`](Self::from_lines)).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
        let table = Self::from_lines(&text)?;
        tracing::debug!(path = %path.display(), platforms = table.len(), "Loaded platform list");
        Ok(table)
    }

    /// Merge extra entries into this table. Entries whose name already exists
    /// (case-insensitively) extend the existing entry's aliases instead.
    pub fn extend(self, extra: impl IntoIterator<Item = PlatformEntry>) -> Self {
        let mut entries = self.entries;
        for new in extra {
            match entries.iter_mut().find(|e| e.name.eq_ignore_ascii_case(&new.name)) {
                Some(existing) => {
                    existing.aliases.extend(new.aliases);
                    existing.priority = existing.priority.max(new.priority);
                },
                None => entries.push(new),
            }
        }
        Self::new(entries)
    }

    /// Look up an entry by canonical name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&PlatformEntry> {
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlatformEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
