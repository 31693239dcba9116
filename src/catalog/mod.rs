//! Tool catalog: the locally cached list of known AI tools.
//!
//! - `tool`: the `Tool` record and catalog document parsing
//! - `source`: where the remote document comes from
//! - `store`: the on-disk cache and its daily refresh

mod source;
mod store;
mod tool;

pub use source::{CatalogSource, HttpCatalogSource, StaticCatalogSource};
pub use store::CatalogStore;
pub use tool::{parse_catalog, Rating, Tool, UNKNOWN};

/// Snapshot of the catalog, in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    tools: Vec<Tool>,
}

impl Catalog {
    pub fn new(tools: Vec<Tool>) -> Self {
        Self { tools }
    }

    /// Exact-name lookup
    pub fn find(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Look up several names, keeping request order and skipping unknown names
    pub fn find_many<S: AsRef<str>>(&self, names: &[S]) -> Vec<&Tool> {
        names.iter().filter_map(|n| self.find(n.as_ref())).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Tool names in document order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tool> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
