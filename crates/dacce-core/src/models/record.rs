//! Resolved correction-event record and caller-supplied issuer data.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which fiscal document the correction refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Electronic invoice (NF-e).
    Invoice,
    /// Electronic transport document (CT-e).
    #[default]
    Transport,
}

impl DocumentKind {
    /// Classify by the document's namespace URI.
    pub fn from_namespace(namespace: &str) -> Self {
        if namespace.to_lowercase().contains("nfe") {
            Self::Invoice
        } else {
            Self::Transport
        }
    }

    /// Tag holding the access key of the referenced document.
    pub fn access_key_tag(self) -> &'static str {
        match self {
            Self::Invoice => "chNFe",
            Self::Transport => "chCTe",
        }
    }

    /// Tags of the registration (return) group, in lookup order.
    pub fn registration_tags(self) -> &'static [&'static str] {
        match self {
            Self::Invoice => &["retEvento"],
            Self::Transport => &["retEvento", "retEventoCTe"],
        }
    }

    /// Label printed before the recipient or author id.
    pub fn party_label(self) -> &'static str {
        match self {
            Self::Invoice => "Recipient Tax ID",
            Self::Transport => "Event Author",
        }
    }

    /// Short name of the referenced document.
    pub fn document_label(self) -> &'static str {
        match self {
            Self::Invoice => "Invoice",
            Self::Transport => "Transport Document",
        }
    }

    /// Lowercase description used in the page subtitle.
    pub fn description(self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Transport => "transport document",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Date and time already converted to the issuer's wall clock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalDateTime {
    /// `dd/mm/yyyy`
    pub date: String,
    /// `HH:MM:SS`
    pub time: String,
}

impl LocalDateTime {
    pub fn is_empty(&self) -> bool {
        self.date.is_empty() && self.time.is_empty()
    }
}

impl fmt::Display for LocalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time)
    }
}

/// Display-ready fields of one correction event.
///
/// Every field is resolved independently: anything missing from the source
/// document is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRecord {
    pub document_kind: DocumentKind,

    /// Event id without its `ID` prefix.
    pub event_id: String,

    pub created_at: LocalDateTime,

    pub protocol_number: String,

    pub registered_at: LocalDateTime,

    /// Raw 44-digit access key.
    pub access_key: String,

    /// Access key in groups of four for printing.
    pub access_key_display: String,

    /// Referenced document number, `000.000.000` format.
    pub document_number: String,

    pub document_series: String,

    pub recipient_or_author_label: String,

    /// Punctuated CNPJ/CPF.
    pub recipient_or_author_id: String,

    pub condition_of_use_text: String,

    /// Free-text correction, or one line per structured correction.
    pub correction_text: String,
}

impl ResolvedRecord {
    /// Whether the protocol/registration line has everything it needs.
    pub fn has_protocol(&self) -> bool {
        !self.protocol_number.is_empty() && !self.registered_at.is_empty()
    }

    /// Short name of the referenced document.
    pub fn document_label(&self) -> &'static str {
        self.document_kind.document_label()
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Issuer identification printed in the page header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuerInfo {
    pub name: String,
    pub street: String,
    pub district: String,
    pub city: String,
    /// Two-letter state code.
    pub state: String,
    pub phone: String,
}

impl IssuerInfo {
    /// Address lines under the issuer name.
    pub fn address_block(&self) -> String {
        format!(
            "{}\n{}\n{} - {} {}",
            self.street, self.district, self.city, self.state, self.phone
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_namespace() {
        assert_eq!(
            DocumentKind::from_namespace("http://www.portalfiscal.inf.br/nfe"),
            DocumentKind::Invoice
        );
        assert_eq!(
            DocumentKind::from_namespace("http://www.portalfiscal.inf.br/NFe"),
            DocumentKind::Invoice
        );
        assert_eq!(
            DocumentKind::from_namespace("http://www.portalfiscal.inf.br/cte"),
            DocumentKind::Transport
        );
        assert_eq!(DocumentKind::from_namespace(""), DocumentKind::Transport);
    }

    #[test]
    fn test_has_protocol_needs_both_parts() {
        let mut record = ResolvedRecord {
            protocol_number: "135240000123456".to_string(),
            ..Default::default()
        };
        assert!(!record.has_protocol());

        record.registered_at = LocalDateTime {
            date: "15/01/2024".to_string(),
            time: "10:31:05".to_string(),
        };
        assert!(record.has_protocol());

        record.protocol_number.clear();
        assert!(!record.has_protocol());
    }

    #[test]
    fn test_address_block() {
        let issuer = IssuerInfo {
            name: "ACME LTDA".to_string(),
            street: "Rua A, 100".to_string(),
            district: "Centro".to_string(),
            city: "Sao Paulo".to_string(),
            state: "SP".to_string(),
            phone: "(11) 5555-0000".to_string(),
        };
        assert_eq!(
            issuer.address_block(),
            "Rua A, 100\nCentro\nSao Paulo - SP (11) 5555-0000"
        );
    }

    #[test]
    fn test_record_json_uses_snake_case_kind() {
        let record = ResolvedRecord {
            document_kind: DocumentKind::Invoice,
            ..Default::default()
        };
        let json = record.to_json().unwrap();
        assert!(json.contains("\"document_kind\": \"invoice\""));
    }
}
