//! Structured correction entries of transport-document events.
//!
//! CT-e correction events do not carry a single free-text correction.
//! Instead they list `infCorrecao` entries inside an `evCCeCTe` group, each
//! naming the altered group, field, new value and, for repeated groups, the
//! item number. Prefixes on these elements vary between emitters, so they
//! are matched by local name only.

use crate::event::xml::{local_name, XmlElement};

const CORRECTION_GROUP: &str = "evCCeCTe";
const CORRECTION_ENTRY: &str = "infCorrecao";
const ALTERED_GROUP: &str = "grupoAlterado";
const ALTERED_FIELD: &str = "campoAlterado";
const ALTERED_VALUE: &str = "valorAlterado";
const ALTERED_ITEM: &str = "nroItemAlterado";

/// One structured correction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrectionEntry {
    pub group: String,
    pub field: String,
    pub value: String,
    pub item: String,
}

impl CorrectionEntry {
    /// Read an entry's sub-fields; missing ones are empty.
    pub fn from_element(entry: &XmlElement) -> Self {
        Self {
            group: child_text(entry, ALTERED_GROUP),
            field: child_text(entry, ALTERED_FIELD),
            value: child_text(entry, ALTERED_VALUE),
            item: child_text(entry, ALTERED_ITEM),
        }
    }

    /// Display line: `Field: f | Value: v`, plus group and item when set.
    pub fn to_line(&self) -> String {
        let mut line = format!("Field: {} | Value: {}", self.field, self.value);
        if !self.group.is_empty() {
            line.push_str(&format!(" | Group: {}", self.group));
        }
        if !self.item.is_empty() {
            line.push_str(&format!(" | Item: {}", self.item));
        }
        line
    }
}

/// Collect the correction entries found under `det_event`.
pub fn collect_structured_corrections(det_event: Option<&XmlElement>) -> Vec<CorrectionEntry> {
    let Some(group) = det_event.and_then(|det| find_local(det, CORRECTION_GROUP)) else {
        return Vec::new();
    };

    group
        .descendants()
        .filter(|element| local_name(&element.tag) == CORRECTION_ENTRY)
        .map(CorrectionEntry::from_element)
        .collect()
}

/// One line per entry, newline separated.
pub fn join_corrections(entries: &[CorrectionEntry]) -> String {
    entries
        .iter()
        .map(CorrectionEntry::to_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn find_local<'a>(node: &'a XmlElement, name: &str) -> Option<&'a XmlElement> {
    node.descendants().find(|element| local_name(&element.tag) == name)
}

fn child_text(node: &XmlElement, name: &str) -> String {
    find_local(node, name)
        .map(|element| element.text.trim().to_string())
        .unwrap_or_default()
}
