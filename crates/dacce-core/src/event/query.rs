//! Namespace-bound element lookups.

use tracing::trace;

use super::xml::XmlElement;

/// Descendant search bound to the namespace of one document.
///
/// Built once per document from the root element's namespace, so field
/// lookups name only the local tag regardless of the schema version in use.
/// Every lookup accepts an optional starting node: an absent subtree simply
/// yields nothing.
#[derive(Debug, Clone)]
pub struct NamespaceQuery {
    namespace: String,
}

impl NamespaceQuery {
    /// Bind to the namespace declared on `root`'s tag.
    pub fn for_root(root: &XmlElement) -> Self {
        Self::new(root.namespace())
    }

    /// Bind to an explicit namespace URI; empty means unqualified.
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
        }
    }

    /// The bound namespace URI.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Tag of `local` in the bound namespace, in Clark notation.
    pub fn qualify(&self, local: &str) -> String {
        if self.namespace.is_empty() {
            local.to_string()
        } else {
            format!("{{{}}}{}", self.namespace, local)
        }
    }

    /// First descendant of `node` named `tag`, in document order.
    pub fn find_first<'a>(&self, node: Option<&'a XmlElement>, tag: &str) -> Option<&'a XmlElement> {
        let qualified = self.qualify(tag);
        node?.descendants().find(|element| element.tag == qualified)
    }

    /// First of several candidate tags that is present below `node`.
    pub fn find_any<'a>(&self, node: Option<&'a XmlElement>, tags: &[&str]) -> Option<&'a XmlElement> {
        tags.iter().find_map(|tag| self.find_first(node, tag))
    }

    /// Text of the first descendant named `tag`, or empty when absent.
    pub fn find_text(&self, node: Option<&XmlElement>, tag: &str) -> String {
        match self.find_first(node, tag) {
            Some(element) => element.text.trim().to_string(),
            None => {
                trace!("<{}> not found, using empty text", tag);
                String::new()
            }
        }
    }
}
