//! Domain descriptors and the traversal order a request walks them in.

use serde::Deserialize;
use std::sync::Arc;

/// One searchable identity namespace, part of a trust topology.
///
/// Read-only to the engine; built by the embedder from its topology
/// configuration, in traversal order (own domain first, then sub-domains).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DomainInfo {
    pub name: String,
    /// Whether name lookups in this domain are case-sensitive.
    #[serde(default)]
    pub case_sensitive: bool,
    /// Whether names from this domain must always carry a domain qualifier.
    #[serde(default)]
    pub fully_qualified_names: bool,
    /// Whether this domain supports enumeration requests.
    #[serde(default = "default_enumerable")]
    pub enumerable: bool,
}

fn default_enumerable() -> bool {
    true
}

impl DomainInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            case_sensitive: false,
            fully_qualified_names: false,
            enumerable: true,
        }
    }

    pub fn case_sensitive(mut self, value: bool) -> Self {
        self.case_sensitive = value;
        self
    }

    pub fn fully_qualified_names(mut self, value: bool) -> Self {
        self.fully_qualified_names = value;
        self
    }

    pub fn enumerable(mut self, value: bool) -> Self {
        self.enumerable = value;
        self
    }
}

/// Traversal restrictions a plugin imposes on domain selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomainFlags {
    /// Only yield domains that support enumeration.
    pub enumerable_only: bool,
}

impl DomainFlags {
    pub fn allows(&self, domain: &DomainInfo) -> bool {
        !self.enumerable_only || domain.enumerable
    }
}

/// The ordered set of candidate domains for this process.
#[derive(Debug, Clone, Default)]
pub struct DomainSet {
    domains: Vec<Arc<DomainInfo>>,
}

impl DomainSet {
    /// Builds a set from descriptors already in traversal order.
    pub fn new(domains: Vec<DomainInfo>) -> Self {
        Self {
            domains: domains.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Finds a domain by name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<Arc<DomainInfo>> {
        self.domains
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.domains.iter().map(|d| d.name.as_str()).collect()
    }

    /// Produces a fresh, finite iteration: the pinned domain alone when a
    /// pin is given, otherwise all domains in traversal order, in both cases
    /// restricted by `flags`. Restart by calling again.
    pub fn iterator(&self, pin: Option<&str>, flags: DomainFlags) -> DomainIterator {
        let candidates: Vec<Arc<DomainInfo>> = match pin {
            Some(name) => self.get(name).into_iter().collect(),
            None => self.domains.clone(),
        };
        DomainIterator {
            candidates: candidates
                .into_iter()
                .filter(|d| flags.allows(d))
                .collect(),
            pos: 0,
        }
    }
}

/// Lazy, finite walk over candidate domains.
#[derive(Debug)]
pub struct DomainIterator {
    candidates: Vec<Arc<DomainInfo>>,
    pos: usize,
}

impl Iterator for DomainIterator {
    type Item = Arc<DomainInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        let domain = self.candidates.get(self.pos).cloned()?;
        self.pos += 1;
        Some(domain)
    }
}
