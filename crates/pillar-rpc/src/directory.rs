//! Producer directories: the live JSON-RPC node and offline snapshots.
//!
//! The node exposes `embedded.pillar.getAll(pageIndex, pageSize)`, returning
//! `{count, list}` where each entry reports reward percentages on a 0–100
//! scale and weight in base units. Records are converted to
//! [`ProducerRecord`]s with fractional shares here, so the core never sees
//! the wire format.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ArrayParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use pillar_core::error::DirectoryError;
use pillar_core::traits::ProducerDirectory;
use pillar_core::types::ProducerRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// RPC method listing pillars.
pub const GET_ALL_PILLARS: &str = "embedded.pillar.getAll";

/// Weight as reported by the node: a JSON number or a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireWeight {
    Number(u64),
    Text(String),
}

impl WireWeight {
    fn value(&self) -> Result<u64, DirectoryError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s
                .parse()
                .map_err(|_| DirectoryError::Malformed(format!("weight is not an integer: {s:?}"))),
        }
    }
}

/// Production statistics for the current epoch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PillarStats {
    pub produced_momentums: u64,
    pub expected_momentums: u64,
}

/// One pillar as returned by `embedded.pillar.getAll`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PillarInfo {
    pub name: String,
    pub give_momentum_reward_percentage: f64,
    pub give_delegate_reward_percentage: f64,
    /// Missing for pillars that have not been scheduled yet.
    #[serde(default)]
    pub current_stats: Option<PillarStats>,
    pub weight: WireWeight,
}

impl TryFrom<PillarInfo> for ProducerRecord {
    type Error = DirectoryError;

    fn try_from(info: PillarInfo) -> Result<Self, Self::Error> {
        let momentum = percentage_to_fraction(&info.name, info.give_momentum_reward_percentage)?;
        let delegate = percentage_to_fraction(&info.name, info.give_delegate_reward_percentage)?;
        let stats = info.current_stats.unwrap_or_default();
        Ok(ProducerRecord {
            momentum_reward_share: momentum,
            delegate_reward_share: delegate,
            produced_momentums: stats.produced_momentums,
            expected_momentums: stats.expected_momentums,
            raw_weight: info.weight.value()?,
            name: info.name,
        })
    }
}

fn percentage_to_fraction(name: &str, pct: f64) -> Result<f64, DirectoryError> {
    if !(0.0..=100.0).contains(&pct) {
        return Err(DirectoryError::Malformed(format!(
            "{name}: reward percentage {pct} outside 0..=100"
        )));
    }
    Ok(pct / 100.0)
}

/// One page of `embedded.pillar.getAll`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarPage {
    pub count: u64,
    pub list: Vec<PillarInfo>,
}

/// Convert wire records, failing on the first malformed entry.
pub fn into_records(list: Vec<PillarInfo>) -> Result<Vec<ProducerRecord>, DirectoryError> {
    list.into_iter().map(ProducerRecord::try_from).collect()
}

/// Directory backed by a node's HTTP JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct JsonRpcDirectory {
    client: HttpClient,
    endpoint: String,
    page_size: u32,
}

impl JsonRpcDirectory {
    pub fn new(endpoint: &str, page_size: u32, timeout: Duration) -> Result<Self, DirectoryError> {
        let client = HttpClientBuilder::default()
            .request_timeout(timeout)
            .build(endpoint)
            .map_err(|e| DirectoryError::Transport(format!("{endpoint}: {e}")))?;
        Ok(Self { client, endpoint: endpoint.to_string(), page_size: page_size.max(1) })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_page(&self, page_index: u32) -> Result<PillarPage, DirectoryError> {
        let mut params = ArrayParams::new();
        params.insert(page_index).map_err(|e| DirectoryError::Transport(e.to_string()))?;
        params.insert(self.page_size).map_err(|e| DirectoryError::Transport(e.to_string()))?;

        self.client
            .request(GET_ALL_PILLARS, params)
            .await
            .map_err(|e| match e {
                jsonrpsee::core::client::Error::ParseError(e) => {
                    DirectoryError::Malformed(e.to_string())
                }
                other => DirectoryError::Transport(format!(
                    "{GET_ALL_PILLARS} on {}: {other}",
                    self.endpoint
                )),
            })
    }
}

#[async_trait]
impl ProducerDirectory for JsonRpcDirectory {
    async fn fetch_all(&self) -> Result<Vec<ProducerRecord>, DirectoryError> {
        let mut list = Vec::new();
        let mut page_index = 0u32;

        loop {
            let page = self.fetch_page(page_index).await?;
            let received = page.list.len();
            debug!(page_index, received, count = page.count, "fetched pillar page");
            list.extend(page.list);

            if received == 0 || list.len() as u64 >= page.count {
                break;
            }
            page_index += 1;
        }

        info!(pillars = list.len(), endpoint = %self.endpoint, "fetched pillar directory");
        into_records(list)
    }
}

/// Fixed, in-memory directory: test fixtures and saved snapshots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticDirectory {
    records: Vec<ProducerRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Snapshot {
    Page(PillarPage),
    List(Vec<PillarInfo>),
}

impl StaticDirectory {
    pub fn new(records: Vec<ProducerRecord>) -> Self {
        Self { records }
    }

    /// Load a snapshot saved from the node: either a full `{count, list}`
    /// page or a bare list of pillar entries.
    pub fn from_json_file(path: &Path) -> Result<Self, DirectoryError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DirectoryError::Snapshot(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, DirectoryError> {
        let snapshot: Snapshot =
            serde_json::from_str(text).map_err(|e| DirectoryError::Snapshot(e.to_string()))?;
        let list = match snapshot {
            Snapshot::Page(page) => page.list,
            Snapshot::List(list) => list,
        };
        Ok(Self::new(into_records(list)?))
    }

    pub fn records(&self) -> &[ProducerRecord] {
        &self.records
    }
}

#[async_trait]
impl ProducerDirectory for StaticDirectory {
    async fn fetch_all(&self) -> Result<Vec<ProducerRecord>, DirectoryError> {
        Ok(self.records.clone())
    }
}
