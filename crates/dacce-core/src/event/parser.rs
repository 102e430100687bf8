//! Correction-event parser producing a [`ResolvedRecord`].

use tracing::{debug, info};

use crate::models::record::{DocumentKind, ResolvedRecord};

use super::query::NamespaceQuery;
use super::rules::{
    collect_structured_corrections, format_tax_id, group_access_key, join_corrections,
    split_access_key, to_local_date_time,
};
use super::xml::{self, XmlElement};
use super::{EventExtractor, Result};

const DETAIL: &str = "detEvento";
const EVENT_INFO: &str = "infEvento";
const EVENT_TIME: &str = "dhEvento";
const REGISTRATION_TIME: &str = "dhRegEvento";
const PROTOCOL: &str = "nProt";
const RECIPIENT_TAX_ID: &str = "CNPJDest";
const TAX_ID: &str = "CNPJ";
const INDIVIDUAL_ID: &str = "CPF";
const CONDITION_OF_USE: &str = "xCondUso";
const CORRECTION: &str = "xCorrecao";

/// Length of the fixed prefix on the `Id` attribute of `infEvento`.
const EVENT_ID_PREFIX_LEN: usize = 2;

/// Sub-trees of an event document the fields are read from.
///
/// Any of them may be missing; lookups below an absent one yield empty text.
struct EventParts<'a> {
    detail: Option<&'a XmlElement>,
    info: Option<&'a XmlElement>,
    registration: Option<&'a XmlElement>,
}

impl<'a> EventParts<'a> {
    fn locate(query: &NamespaceQuery, root: &'a XmlElement, kind: DocumentKind) -> Self {
        let detail = query.find_first(Some(root), DETAIL);
        let info = query.find_first(Some(root), EVENT_INFO);
        let ret = query.find_any(Some(root), kind.registration_tags());
        let registration = query.find_first(ret, EVENT_INFO);

        if detail.is_none() {
            debug!("<{}> not found", DETAIL);
        }
        if info.is_none() {
            debug!("<{}> not found", EVENT_INFO);
        }
        if registration.is_none() {
            debug!("Registration info not found, protocol fields will be empty");
        }

        Self {
            detail,
            info,
            registration,
        }
    }
}

/// Field extractor for NF-e and CT-e correction events.
///
/// Lookups are bound to the namespace of the document root, so the same
/// parser handles every schema version of both document types.
#[derive(Debug, Clone, Default)]
pub struct CorrectionEventParser;

impl CorrectionEventParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Resolve all fields from an already parsed document.
    pub fn resolve(&self, root: &XmlElement) -> ResolvedRecord {
        let query = NamespaceQuery::for_root(root);
        let kind = DocumentKind::from_namespace(query.namespace());
        debug!("Namespace {:?} classified as {}", query.namespace(), kind);

        let parts = EventParts::locate(&query, root, kind);

        let access_key = query.find_text(parts.info, kind.access_key_tag());
        let key_parts = split_access_key(&access_key).unwrap_or_default();
        let (label, party_id) = self.extract_party(&query, &parts, kind);

        let record = ResolvedRecord {
            document_kind: kind,
            event_id: self.extract_event_id(parts.info),
            created_at: to_local_date_time(&query.find_text(parts.info, EVENT_TIME)),
            protocol_number: query.find_text(parts.registration, PROTOCOL),
            registered_at: to_local_date_time(
                &query.find_text(parts.registration, REGISTRATION_TIME),
            ),
            access_key_display: group_access_key(&access_key),
            access_key,
            document_number: key_parts.number,
            document_series: key_parts.series,
            recipient_or_author_label: label.to_string(),
            recipient_or_author_id: format_tax_id(&party_id),
            condition_of_use_text: query.find_text(parts.detail, CONDITION_OF_USE),
            correction_text: self.extract_corrections(&query, parts.detail),
        };

        info!(
            "Resolved {} correction event {:?}",
            record.document_kind, record.event_id
        );
        record
    }

    fn extract_event_id(&self, info: Option<&XmlElement>) -> String {
        let id = info.and_then(|info| info.attribute("Id")).unwrap_or("");
        match id.get(EVENT_ID_PREFIX_LEN..) {
            Some(rest) => rest.to_string(),
            None => {
                debug!("Event Id attribute missing or too short: {:?}", id);
                String::new()
            }
        }
    }

    /// Label and raw id of the recipient (invoices) or author (transport).
    fn extract_party(
        &self,
        query: &NamespaceQuery,
        parts: &EventParts<'_>,
        kind: DocumentKind,
    ) -> (&'static str, String) {
        let (node, preferred, fallback) = match kind {
            DocumentKind::Invoice => (parts.registration, RECIPIENT_TAX_ID, TAX_ID),
            DocumentKind::Transport => (parts.info, TAX_ID, INDIVIDUAL_ID),
        };

        let mut id = query.find_text(node, preferred);
        if id.is_empty() {
            id = query.find_text(node, fallback);
        }
        (kind.party_label(), id)
    }

    fn extract_corrections(&self, query: &NamespaceQuery, detail: Option<&XmlElement>) -> String {
        let direct = query.find_text(detail, CORRECTION);
        if !direct.is_empty() {
            return direct;
        }

        let entries = collect_structured_corrections(detail);
        debug!("Using {} structured correction entries", entries.len());
        join_corrections(&entries)
    }
}

impl EventExtractor for CorrectionEventParser {
    fn extract(&self, xml: &[u8]) -> Result<ResolvedRecord> {
        let root = xml::parse(xml)?;
        Ok(self.resolve(&root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::XmlError;
    use crate::models::record::LocalDateTime;
    use pretty_assertions::assert_eq;

    const NFE_EVENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<procEventoNFe xmlns="http://www.portalfiscal.inf.br/nfe" versao="1.00">
  <evento versao="1.00">
    <infEvento Id="ID1101103524011234567800019055001000004567100004567001">
      <cOrgao>35</cOrgao>
      <tpAmb>1</tpAmb>
      <CNPJ>12345678000190</CNPJ>
      <chNFe>35240112345678000190550010000045671000045670</chNFe>
      <dhEvento>2024-01-15T10:30:00-03:00</dhEvento>
      <tpEvento>110110</tpEvento>
      <nSeqEvento>1</nSeqEvento>
      <detEvento versao="1.00">
        <descEvento>Carta de Correcao</descEvento>
        <xCorrecao>Peso bruto correto: 12,500 kg</xCorrecao>
        <xCondUso>A Carta de Correcao e disciplinada pelo paragrafo 1o-A do art. 7o do Convenio S/N.</xCondUso>
      </detEvento>
    </infEvento>
  </evento>
  <retEvento versao="1.00">
    <infEvento>
      <tpAmb>1</tpAmb>
      <cStat>135</cStat>
      <chNFe>35240112345678000190550010000045671000045670</chNFe>
      <CNPJDest>98765432000110</CNPJDest>
      <dhRegEvento>2024-01-15T10:31:05-03:00</dhRegEvento>
      <nProt>135240000123456</nProt>
    </infEvento>
  </retEvento>
</procEventoNFe>"#;

    const CTE_EVENT: &str = r#"<procEventoCTe xmlns="http://www.portalfiscal.inf.br/cte" versao="3.00">
  <eventoCTe versao="3.00">
    <infEvento Id="ID1101103524021122233300018157001000000123100000123801">
      <cOrgao>35</cOrgao>
      <CNPJ>11222333000181</CNPJ>
      <chCTe>35240211222333000181570010000001231000001238</chCTe>
      <dhEvento>2024-02-20T08:00:00-03:00</dhEvento>
      <detEvento versaoEvento="3.00">
        <evCCeCTe>
          <descEvento>Carta de Correcao</descEvento>
          <infCorrecao>
            <grupoAlterado>ide</grupoAlterado>
            <campoAlterado>natOp</campoAlterado>
            <valorAlterado>Prestacao de servico</valorAlterado>
          </infCorrecao>
          <infCorrecao>
            <grupoAlterado>infQ</grupoAlterado>
            <campoAlterado>qCarga</campoAlterado>
            <valorAlterado>100.00</valorAlterado>
            <nroItemAlterado>2</nroItemAlterado>
          </infCorrecao>
          <xCondUso>A Carta de Correcao e disciplinada pelo Art. 58-B do CONVENIO/SINIEF 06/89.</xCondUso>
        </evCCeCTe>
      </detEvento>
    </infEvento>
  </eventoCTe>
  <retEventoCTe versao="3.00">
    <infEvento>
      <cStat>135</cStat>
      <dhRegEvento>2024-02-20T08:01:10-03:00</dhRegEvento>
      <nProt>135240000987654</nProt>
    </infEvento>
  </retEventoCTe>
</procEventoCTe>"#;

    fn extract(xml: &str) -> Result<ResolvedRecord> {
        CorrectionEventParser::new().extract(xml.as_bytes())
    }

    #[test]
    fn test_extract_invoice_event() {
        let record = extract(NFE_EVENT).unwrap();

        assert_eq!(record.document_kind, DocumentKind::Invoice);
        assert_eq!(
            record.event_id,
            "1101103524011234567800019055001000004567100004567001"
        );
        assert_eq!(
            record.created_at,
            LocalDateTime {
                date: "15/01/2024".to_string(),
                time: "10:30:00".to_string(),
            }
        );
        assert_eq!(record.protocol_number, "135240000123456");
        assert_eq!(record.registered_at.time, "10:31:05");
        assert_eq!(record.access_key, "35240112345678000190550010000045671000045670");
        assert_eq!(
            record.access_key_display,
            "3524 0112 3456 7800 0190 5500 1000 0045 6710 0004 5670"
        );
        assert_eq!(record.document_series, "001");
        assert_eq!(record.document_number, "000.004.567");
        assert_eq!(record.recipient_or_author_label, "Recipient Tax ID");
        assert_eq!(record.recipient_or_author_id, "98.765.432/0001-10");
        assert_eq!(record.correction_text, "Peso bruto correto: 12,500 kg");
        assert!(record.condition_of_use_text.starts_with("A Carta de Correcao"));
        assert!(record.has_protocol());
    }

    #[test]
    fn test_invoice_recipient_falls_back_to_tax_id() {
        let xml = NFE_EVENT.replace(
            "<CNPJDest>98765432000110</CNPJDest>",
            "<CNPJ>55666777000122</CNPJ>",
        );
        let record = extract(&xml).unwrap();
        assert_eq!(record.recipient_or_author_id, "55.666.777/0001-22");
    }

    #[test]
    fn test_extract_transport_event() {
        let record = extract(CTE_EVENT).unwrap();

        assert_eq!(record.document_kind, DocumentKind::Transport);
        assert_eq!(record.access_key, "35240211222333000181570010000001231000001238");
        assert_eq!(record.document_series, "001");
        assert_eq!(record.document_number, "000.000.123");
        assert_eq!(record.recipient_or_author_label, "Event Author");
        assert_eq!(record.recipient_or_author_id, "11.222.333/0001-81");
        assert_eq!(record.protocol_number, "135240000987654");
        assert_eq!(record.registered_at.date, "20/02/2024");
        assert_eq!(
            record.correction_text,
            "Field: natOp | Value: Prestacao de servico | Group: ide\n\
             Field: qCarga | Value: 100.00 | Group: infQ | Item: 2"
        );
        assert!(record.condition_of_use_text.contains("CONVENIO/SINIEF"));
    }

    #[test]
    fn test_transport_author_falls_back_to_individual_id() {
        let xml = CTE_EVENT.replace("<CNPJ>11222333000181</CNPJ>", "<CPF>12345678901</CPF>");
        let record = extract(&xml).unwrap();
        assert_eq!(record.recipient_or_author_label, "Event Author");
        assert_eq!(record.recipient_or_author_id, "123.456.789-01");
    }

    #[test]
    fn test_non_ascii_digit_key_degrades() {
        let key = "\u{0661}".repeat(44);
        let xml = NFE_EVENT.replacen(
            "<chNFe>35240112345678000190550010000045671000045670</chNFe>",
            &format!("<chNFe>{key}</chNFe>"),
            1,
        );

        let record = extract(&xml).unwrap();
        assert_eq!(record.access_key, key);
        assert_eq!(record.document_number, "");
        assert_eq!(record.document_series, "");
    }

    #[test]
    fn test_non_ascii_digit_tax_id_degrades() {
        let xml = CTE_EVENT.replace(
            "<CNPJ>11222333000181</CNPJ>",
            &format!("<CNPJ>{}</CNPJ>", "\u{0661}".repeat(7)),
        );

        let record = extract(&xml).unwrap();
        assert_eq!(record.recipient_or_author_id, "");
        assert_eq!(record.document_series, "001");
    }

    #[test]
    fn test_latin1_document() {
        let xml = NFE_EVENT
            .replace("encoding=\"UTF-8\"", "encoding=\"ISO-8859-1\"")
            .replace("Peso bruto correto", "Correção do peso");
        let bytes: Vec<u8> = xml.chars().map(|c| c as u8).collect();

        let record = CorrectionEventParser::new().extract(&bytes).unwrap();
        assert_eq!(record.correction_text, "Correção do peso: 12,500 kg");
        assert_eq!(record.document_number, "000.004.567");
    }

    #[test]
    fn test_direct_correction_wins_over_structured() {
        let xml = CTE_EVENT.replace(
            "<evCCeCTe>",
            "<xCorrecao>Texto livre</xCorrecao><evCCeCTe>",
        );
        let record = extract(&xml).unwrap();
        assert_eq!(record.correction_text, "Texto livre");
    }

    #[test]
    fn test_partial_document_degrades_to_empty_fields() {
        let xml = r#"<evento xmlns="http://www.portalfiscal.inf.br/nfe">
            <infEvento Id="I"><chNFe>123</chNFe></infEvento>
        </evento>"#;

        let record = extract(xml).unwrap();
        assert_eq!(record.document_kind, DocumentKind::Invoice);
        assert_eq!(record.event_id, "");
        assert_eq!(record.access_key, "123");
        assert_eq!(record.access_key_display, "123");
        assert_eq!(record.document_number, "");
        assert_eq!(record.document_series, "");
        assert_eq!(record.protocol_number, "");
        assert!(record.registered_at.is_empty());
        assert!(record.created_at.is_empty());
        assert_eq!(record.recipient_or_author_id, "");
        assert_eq!(record.correction_text, "");
        assert!(!record.has_protocol());
    }

    #[test]
    fn test_empty_root_resolves_defaults() {
        let record = extract("<root/>").unwrap();
        assert_eq!(record.document_kind, DocumentKind::Transport);
        assert_eq!(record.recipient_or_author_label, "Event Author");
        assert_eq!(record.event_id, "");
    }

    #[test]
    fn test_foreign_namespace_fields_are_ignored() {
        let xml = r#"<evento xmlns="http://www.portalfiscal.inf.br/cte">
            <x:infEvento xmlns:x="urn:other" Id="ID999"><x:chCTe>1</x:chCTe></x:infEvento>
        </evento>"#;
        let record = extract(xml).unwrap();
        assert_eq!(record.event_id, "");
        assert_eq!(record.access_key, "");
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let result = extract("<procEventoNFe><evento></procEventoNFe>");
        assert!(matches!(result, Err(XmlError::Syntax(_))));
        assert!(extract("").is_err());
    }

    #[test]
    fn test_free_function_extract() {
        let record = crate::event::extract(NFE_EVENT.as_bytes()).unwrap();
        assert_eq!(record.document_kind, DocumentKind::Invoice);
    }
}
