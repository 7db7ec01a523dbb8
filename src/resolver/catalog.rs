use std::collections::BTreeMap;

/// A catalog row: the SKU plus every other column of its sheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub sku: String,
    /// Column header → cell text. Opaque to matching.
    pub row: BTreeMap<String, String>,
}

impl CatalogEntry {
    pub fn new(sku: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            row: BTreeMap::new(),
        }
    }
}

/// SKU catalog in sheet order.
///
/// Order matters: when two SKUs rank equally the earlier one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkuCatalog {
    entries: Vec<CatalogEntry>,
}

impl SkuCatalog {
    /// The catalog used when none could be loaded. Every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_skus<I, S>(skus: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: skus.into_iter().map(CatalogEntry::new).collect(),
        }
    }

    pub fn push(&mut self, entry: CatalogEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn skus(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.sku.as_str())
    }

    /// First entry carrying `sku`.
    pub fn get(&self, sku: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.sku == sku)
    }
}

impl FromIterator<CatalogEntry> for SkuCatalog {
    fn from_iter<T: IntoIterator<Item = CatalogEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_skus_keeps_order() {
        let catalog = SkuCatalog::from_skus(["852DBRL", "795DBRL", "852DBRL"]);
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.skus().collect::<Vec<_>>(),
            vec!["852DBRL", "795DBRL", "852DBRL"]
        );
    }

    #[test]
    fn test_get_returns_first_entry() {
        let mut first = CatalogEntry::new("795DBRL");
        first.row.insert("Power".to_string(), "10mW".to_string());
        let mut catalog: SkuCatalog = vec![first.clone()].into_iter().collect();
        catalog.push(CatalogEntry::new("795DBRL"));

        assert_eq!(catalog.get("795DBRL"), Some(&first));
        assert!(catalog.get("780DBRL").is_none());
    }

    #[test]
    fn test_empty_catalog() {
        assert!(SkuCatalog::empty().is_empty());
    }
}
