//! Fixed wording printed on every correction letter.

use crate::models::record::{DocumentKind, ResolvedRecord};

pub const TITLE: &str = "Graphic Representation of CC-e";

pub const ADVISORY_NOTICE: &str = "In accordance with the legal provisions in force, we hereby \
    inform you that the fiscal document referenced below contains irregularities, which are \
    highlighted together with their respective corrections. Please apply these corrections \
    when recording your tax entries.";

pub const CORRECTIONS_HEADER: &str = "CORRECTIONS TO BE CONSIDERED";

pub const FOOTER: &str = "This document is a graphic representation of the CC-e, printed for \
    your information only, and has no fiscal validity.\nThe CC-e must be received and kept as \
    an electronic XML file and can be looked up on the SEFAZ portals.";

pub fn subtitle(kind: DocumentKind) -> String {
    format!("(Correction notice for {})", kind.description())
}

pub fn event_id_line(record: &ResolvedRecord) -> String {
    format!("Event ID: {}", record.event_id)
}

pub fn created_at_line(record: &ResolvedRecord) -> String {
    format!("Created at: {}", record.created_at)
}

/// `None` unless both the protocol number and registration time are known.
pub fn protocol_line(record: &ResolvedRecord) -> Option<String> {
    record.has_protocol().then(|| {
        format!(
            "Protocol: {} - Registered with SEFAZ at: {}",
            record.protocol_number, record.registered_at
        )
    })
}

pub fn party_line(record: &ResolvedRecord) -> String {
    format!(
        "{}: {}",
        record.recipient_or_author_label, record.recipient_or_author_id
    )
}

pub fn document_line(record: &ResolvedRecord) -> String {
    format!(
        "{}: {} - Series: {}",
        record.document_label(),
        record.document_number,
        record.document_series
    )
}
