//! Placeholder pools.
//!
//! Every multi-stage rewrite in this crate hides already-processed text behind sentinel tokens that
//! can never occur in ordinary Esperanto prose. Each token family lives in its own numeric range and
//! uses its own delimiter so tokens of different families never contain one another:
//!
//! ```text
//! kind        token        first    standard size
//! skip        %1854%       1854     3081
//! capture     @5134@       5134     4595
//! global      $20987$      20987    479013
//! two-char    $13246$      13246    6589
//! local       @20374@      20374    77275
//! ```
//!
//! Pools are handed out strictly by index. Running out is a configuration error
//! ([`Error::PlaceholdersExhausted`]); tokens are never recycled.

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::io::BufRead;
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    /// Protects `%...%` spans from every later stage.
    Skip,
    /// Captures the rewritten content of `@...@` spans.
    Capture,
    /// One per global rule.
    Global,
    /// One per two-character rule.
    TwoChar,
    /// One per local rule.
    Local,
}

impl PoolKind {
    pub const ALL: [PoolKind; 5] =
        [PoolKind::Skip, PoolKind::Capture, PoolKind::Global, PoolKind::TwoChar, PoolKind::Local];

    pub fn delimiter(self) -> char {
        match self {
            PoolKind::Skip => '%',
            PoolKind::Capture | PoolKind::Local => '@',
            PoolKind::Global | PoolKind::TwoChar => '$',
        }
    }

    pub fn first_number(self) -> usize {
        match self {
            PoolKind::Skip => 1854,
            PoolKind::Capture => 5134,
            PoolKind::Global => 20987,
            PoolKind::TwoChar => 13246,
            PoolKind::Local => 20374,
        }
    }

    /// Size of the standard pool. Generated pools never grow past it, which keeps the numeric ranges
    /// of kinds sharing a delimiter disjoint.
    pub fn standard_len(self) -> usize {
        match self {
            PoolKind::Skip => 3081,
            PoolKind::Capture => 4595,
            PoolKind::Global => 479013,
            PoolKind::TwoChar => 6589,
            PoolKind::Local => 77275,
        }
    }

    /// File name looked up by [`Placeholders::from_dir`].
    pub fn file_name(self) -> &'static str {
        match self {
            PoolKind::Skip => "skip.txt",
            PoolKind::Capture => "capture.txt",
            PoolKind::Global => "global.txt",
            PoolKind::TwoChar => "two_char.txt",
            PoolKind::Local => "local.txt",
        }
    }

    fn slot(self) -> usize {
        match self {
            PoolKind::Skip => 0,
            PoolKind::Capture => 1,
            PoolKind::Global => 2,
            PoolKind::TwoChar => 3,
            PoolKind::Local => 4,
        }
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PoolKind::Skip => "skip",
            PoolKind::Capture => "capture",
            PoolKind::Global => "global",
            PoolKind::TwoChar => "two-char",
            PoolKind::Local => "local",
        };
        f.write_str(name)
    }
}

/// Read one token per line. Blank lines are skipped and surrounding whitespace trimmed.
pub fn import_placeholders(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|err| Error::io(path, err))?;
    let mut tokens = Vec::new();
    for line in std::io::BufReader::new(file).lines() {
        let line = line.map_err(|err| Error::io(path, err))?;
        let token = line.trim();
        if !token.is_empty() {
            tokens.push(token.to_string());
        }
    }
    Ok(tokens)
}

/// An ordered, finite pool of tokens of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderPool {
    kind: PoolKind,
    tokens: Vec<String>,
}

impl PlaceholderPool {
    pub fn new(kind: PoolKind, tokens: Vec<String>) -> Self {
        Self { kind, tokens }
    }

    pub fn import(kind: PoolKind, path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(kind, import_placeholders(path)?))
    }

    /// The first `count` tokens of the standard numbered family.
    pub fn generate(kind: PoolKind, count: usize) -> Result<Self> {
        if count > kind.standard_len() {
            return Err(Error::PlaceholdersExhausted { kind, needed: count, available: kind.standard_len() });
        }
        let d = kind.delimiter();
        let first = kind.first_number();
        let tokens = (first..first + count).map(|n| format!("{d}{n}{d}")).collect();
        Ok(Self { kind, tokens })
    }

    pub fn standard(kind: PoolKind) -> Self {
        let d = kind.delimiter();
        let first = kind.first_number();
        let tokens = (first..first + kind.standard_len()).map(|n| format!("{d}{n}{d}")).collect();
        Self { kind, tokens }
    }

    pub fn kind(&self) -> PoolKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&str> {
        self.tokens.get(index).map(String::as_str).ok_or(Error::PlaceholdersExhausted {
            kind: self.kind,
            needed: index + 1,
            available: self.tokens.len(),
        })
    }

    /// Fail up front when fewer than `needed` tokens are available.
    pub fn ensure(&self, needed: usize) -> Result<()> {
        if needed > self.tokens.len() {
            return Err(Error::PlaceholdersExhausted { kind: self.kind, needed, available: self.tokens.len() });
        }
        Ok(())
    }
}

/// User-supplied pools, one optional slot per kind. Kinds without a pool fall back to the standard
/// numbered family.
#[derive(Debug, Clone, Default)]
pub struct Placeholders {
    pools: [Option<PlaceholderPool>; 5],
}

impl Placeholders {
    pub fn with_pool(mut self, pool: PlaceholderPool) -> Self {
        let slot = pool.kind().slot();
        self.pools[slot] = Some(pool);
        self
    }

    /// Load `skip.txt`, `capture.txt`, `global.txt`, `two_char.txt` and `local.txt` from `dir`,
    /// whichever exist.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut out = Self::default();
        for kind in PoolKind::ALL {
            let path = dir.join(kind.file_name());
            if path.is_file() {
                let pool = PlaceholderPool::import(kind, &path)?;
                log::debug!("loaded {} {kind} placeholders from {}", pool.len(), path.display());
                out = out.with_pool(pool);
            }
        }
        Ok(out)
    }

    pub fn user_pool(&self, kind: PoolKind) -> Option<&PlaceholderPool> {
        self.pools[kind.slot()].as_ref()
    }

    /// A pool of `kind` holding at least `needed` tokens.
    pub fn pool(&self, kind: PoolKind, needed: usize) -> Result<Cow<'_, PlaceholderPool>> {
        match self.user_pool(kind) {
            Some(pool) => {
                pool.ensure(needed)?;
                Ok(Cow::Borrowed(pool))
            }
            None => Ok(Cow::Owned(PlaceholderPool::generate(kind, needed)?)),
        }
    }

    /// The full pool of `kind`, used by the converter for the span-masking kinds.
    pub fn full_pool(&self, kind: PoolKind) -> PlaceholderPool {
        self.user_pool(kind).cloned().unwrap_or_else(|| PlaceholderPool::standard(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn generated_families_start_at_their_first_number() {
        let skip = PlaceholderPool::generate(PoolKind::Skip, 2).unwrap();
        assert_eq!(skip.get(0).unwrap(), "%1854%");
        assert_eq!(skip.get(1).unwrap(), "%1855%");

        let global = PlaceholderPool::generate(PoolKind::Global, 1).unwrap();
        assert_eq!(global.get(0).unwrap(), "$20987$");

        let local = PlaceholderPool::standard(PoolKind::Local);
        assert_eq!(local.len(), 77275);
        assert_eq!(local.get(77274).unwrap(), "@97648@");
    }

    #[test]
    fn exhaustion_is_reported_not_recycled() {
        let pool = PlaceholderPool::generate(PoolKind::Capture, 3).unwrap();
        match pool.get(3) {
            Err(Error::PlaceholdersExhausted { kind, needed, available }) => {
                assert_eq!(kind, PoolKind::Capture);
                assert_eq!(needed, 4);
                assert_eq!(available, 3);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(pool.ensure(4).is_err());
        assert!(PlaceholderPool::generate(PoolKind::TwoChar, 7000).is_err());
    }

    #[test]
    fn import_skips_blank_lines_and_trims() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  %1%  \n\n%2%\r\n   \n%3%").unwrap();
        let tokens = import_placeholders(file.path()).unwrap();
        assert_eq!(tokens, vec!["%1%", "%2%", "%3%"]);
    }

    #[test]
    fn missing_file_names_its_path() {
        let err = import_placeholders("/definitely/not/here.txt").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }

    #[test]
    fn bundle_prefers_user_pools() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("skip.txt"), "<<a>>\n<<b>>\n").unwrap();
        let bundle = Placeholders::from_dir(dir.path()).unwrap();

        let skip = bundle.pool(PoolKind::Skip, 2).unwrap();
        assert_eq!(skip.get(1).unwrap(), "<<b>>");
        assert!(bundle.pool(PoolKind::Skip, 3).is_err());

        let capture = bundle.pool(PoolKind::Capture, 10).unwrap();
        assert_eq!(capture.get(0).unwrap(), "@5134@");
        assert_eq!(bundle.full_pool(PoolKind::Capture).len(), 4595);
    }
}
