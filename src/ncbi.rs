use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Endpoint;
use crate::error::CymolError;
use crate::formats::{FlatFileParser, RecordParser};
use crate::normalize::{SequencePayload, is_unavailable, normalize_sequences};
use crate::transport::{Request, Transport};

pub const EFETCH_PATH: &str = "/entrez/eutils/efetch.fcgi";
pub const DEFAULT_RETURN_TYPE: &str = "asn1";
pub const DEFAULT_RETURN_MODE: &str = "text";

/// An efetch call as callers describe it. `database` and `ids` are required;
/// the return type and mode fall back to `asn1` / `text`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    #[serde(default, alias = "db")]
    pub database: Option<String>,
    #[serde(default, alias = "id")]
    pub ids: Option<Vec<String>>,
    #[serde(default, alias = "rettype")]
    pub return_type: Option<String>,
    #[serde(default, alias = "retmode")]
    pub return_mode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFetch {
    pub database: String,
    pub ids: Vec<String>,
    pub return_type: String,
    pub return_mode: String,
}

impl FetchRequest {
    pub fn resolve(self) -> Result<ResolvedFetch, CymolError> {
        let database = self
            .database
            .filter(|db| !db.trim().is_empty())
            .ok_or(CymolError::MissingDatabase)?;
        let ids = self
            .ids
            .filter(|ids| !ids.is_empty())
            .ok_or(CymolError::MissingIds)?;
        Ok(ResolvedFetch {
            database,
            ids,
            return_type: self
                .return_type
                .unwrap_or_else(|| DEFAULT_RETURN_TYPE.to_string()),
            return_mode: self
                .return_mode
                .unwrap_or_else(|| DEFAULT_RETURN_MODE.to_string()),
        })
    }
}

impl ResolvedFetch {
    pub fn path(&self) -> String {
        let ids = self
            .ids
            .iter()
            .map(|id| urlencoding::encode(id))
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{EFETCH_PATH}?db={}&id={ids}&rettype={}&retmode={}",
            urlencoding::encode(&self.database),
            urlencoding::encode(&self.return_type),
            urlencoding::encode(&self.return_mode)
        )
    }
}

pub struct EutilsService<T, P = FlatFileParser> {
    transport: T,
    parser: P,
    endpoint: Endpoint,
}

impl<T: Transport> EutilsService<T> {
    pub fn new(transport: T, endpoint: Endpoint) -> Self {
        Self::with_parser(transport, FlatFileParser, endpoint)
    }
}

impl<T: Transport, P: RecordParser> EutilsService<T, P> {
    pub fn with_parser(transport: T, parser: P, endpoint: Endpoint) -> Self {
        Self {
            transport,
            parser,
            endpoint,
        }
    }

    pub async fn fetch(
        &self,
        request: FetchRequest,
        cancel: &CancellationToken,
    ) -> Result<SequencePayload, CymolError> {
        let fetch = request.resolve()?;
        let reply = self
            .transport
            .execute(Request::get(&self.endpoint, fetch.path()), cancel)
            .await?;
        let text = reply.text();
        if !is_unavailable(&text) {
            reply.require_success(&self.endpoint.host)?;
        }
        let payload = normalize_sequences(
            &self.parser,
            &fetch.database,
            &fetch.return_type,
            &fetch.ids.join(","),
            &text,
        )?;
        info!(db = %fetch.database, rettype = %fetch.return_type, "efetch complete");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn defaults_apply() {
        let resolved = FetchRequest {
            database: Some("nucleotide".to_string()),
            ids: Some(vec!["NR_004430".to_string()]),
            ..Default::default()
        }
        .resolve()
        .unwrap();
        assert_eq!(resolved.return_type, "asn1");
        assert_eq!(resolved.return_mode, "text");
    }

    #[test]
    fn path_joins_ids_with_commas() {
        let resolved = ResolvedFetch {
            database: "nucleotide".to_string(),
            ids: vec!["NR_004430".to_string(), "NR_004394.1".to_string()],
            return_type: "fasta".to_string(),
            return_mode: "text".to_string(),
        };
        assert_eq!(
            resolved.path(),
            "/entrez/eutils/efetch.fcgi?db=nucleotide&id=NR_004430,NR_004394.1&rettype=fasta&retmode=text"
        );
    }

    #[test]
    fn empty_id_list_is_missing() {
        let err = FetchRequest {
            database: Some("nucleotide".to_string()),
            ids: Some(Vec::new()),
            ..Default::default()
        }
        .resolve()
        .unwrap_err();
        assert_matches!(err, CymolError::MissingIds);
    }

    #[test]
    fn accepts_eutils_parameter_names() {
        let request: FetchRequest =
            serde_json::from_str(r#"{"db": "nucleotide", "id": ["X1"], "rettype": "gb"}"#).unwrap();
        assert_eq!(request.database.as_deref(), Some("nucleotide"));
        assert_eq!(request.return_type.as_deref(), Some("gb"));
    }
}
