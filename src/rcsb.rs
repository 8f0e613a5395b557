use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::Endpoint;
use crate::domain::StructureId;
use crate::error::CymolError;
use crate::formats::{FlatFileParser, RecordParser, TertiaryStructure};
use crate::header::{HeaderRecord, extract_header};
use crate::normalize::normalize_structures;
use crate::query::{SearchResult, SearchSpec, compile, parse_hits};
use crate::transport::{Request, Transport};

pub const SEARCH_PATH: &str = "/pdb/rest/search";
pub const SEARCH_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

pub fn entry_path(id: &StructureId) -> String {
    format!(
        "/pdb/download/downloadFile.do?fileFormat=pdb&compression=NO&structureId={}",
        id.as_str()
    )
}

pub fn header_path(id: &StructureId) -> String {
    format!("/pdb/files/{}.pdb?headerOnly=YES", id.as_str())
}

#[derive(Debug, Clone)]
pub struct LoadedEntry {
    pub id: StructureId,
    pub raw: String,
    pub structures: Vec<TertiaryStructure>,
}

impl LoadedEntry {
    pub fn chain_names(&self) -> Vec<String> {
        self.structures
            .iter()
            .map(|structure| structure.chain.clone())
            .collect()
    }
}

pub struct RcsbService<T, P = FlatFileParser> {
    transport: T,
    parser: P,
    endpoint: Endpoint,
}

impl<T: Transport> RcsbService<T> {
    pub fn new(transport: T, endpoint: Endpoint) -> Self {
        Self::with_parser(transport, FlatFileParser, endpoint)
    }
}

impl<T: Transport, P: RecordParser> RcsbService<T, P> {
    pub fn with_parser(transport: T, parser: P, endpoint: Endpoint) -> Self {
        Self {
            transport,
            parser,
            endpoint,
        }
    }

    /// Downloads and parses a full coordinate entry; every structure is tagged
    /// with `db:structure:<id>`.
    pub async fn fetch_entry(
        &self,
        id: &StructureId,
        cancel: &CancellationToken,
    ) -> Result<Vec<TertiaryStructure>, CymolError> {
        Ok(self.load_entry(id, cancel).await?.structures)
    }

    pub async fn load_entry(
        &self,
        id: &StructureId,
        cancel: &CancellationToken,
    ) -> Result<LoadedEntry, CymolError> {
        let request = Request::get(&self.endpoint, entry_path(id));
        let reply = self
            .transport
            .execute(request, cancel)
            .await?
            .require_success(&self.endpoint.host)?;
        let raw = reply.text();
        let structures = normalize_structures(&self.parser, id.as_str(), &raw)?;
        info!(id = %id, chains = structures.len(), "structure entry parsed");
        Ok(LoadedEntry {
            id: id.clone(),
            raw,
            structures,
        })
    }

    pub async fn fetch_header(
        &self,
        id: &StructureId,
        cancel: &CancellationToken,
    ) -> Result<HeaderRecord, CymolError> {
        let request = Request::get(&self.endpoint, header_path(id));
        let reply = self
            .transport
            .execute(request, cancel)
            .await?
            .require_success(&self.endpoint.host)?;
        Ok(extract_header(id.as_str(), &reply.text()))
    }

    pub async fn search(
        &self,
        spec: SearchSpec,
        cancel: &CancellationToken,
    ) -> Result<SearchResult, CymolError> {
        let document = compile(&spec).to_document();
        debug!(bytes = document.len(), "posting composite query");
        let request = Request::post(&self.endpoint, SEARCH_PATH, document, SEARCH_CONTENT_TYPE);
        let reply = self
            .transport
            .execute(request, cancel)
            .await?
            .require_success(&self.endpoint.host)?;
        let hits = parse_hits(&reply.text());
        info!(hits = hits.len(), "search complete");
        Ok(spec.with_hits(hits))
    }
}
