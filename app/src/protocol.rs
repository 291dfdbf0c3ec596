//! Request and response types for the six lifecycle calls.
//!
//! These carry the semantic content of each call the consensus engine
//! makes. On the TCP transport they travel as JSON, one object per line,
//! with raw byte fields encoded as standard base64 strings:
//!
//! ```text
//! → {"method":"check_tx","params":{"tx":"eyJ0eXBlIjoi..."}}
//! ← {"method":"check_tx","result":{"code":0,"log":""}}
//! ```

use layer0_primitives::{BlockHeight, TxResult};
use serde::{Deserialize, Serialize};

/// Result code for a query on an unknown path.
pub const QUERY_UNKNOWN_PATH: u32 = 1;

/// Query path returning an account balance.
pub const PATH_BALANCE: &str = "/balance";
/// Query path returning the treasury counter.
pub const PATH_TREASURY: &str = "/treasury";
/// Query path returning a delegated amount for `"delegator|validator"`.
pub const PATH_DELEGATION: &str = "/delegation";
/// Query path returning the chain params as JSON.
pub const PATH_PARAMS: &str = "/params";

/// Inbound call from the consensus engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "snake_case")]
pub enum Request {
    Info,
    InitChain(InitChainRequest),
    CheckTx(CheckTxRequest),
    FinalizeBlock(FinalizeBlockRequest),
    Commit,
    Query(QueryRequest),
}

impl Request {
    /// Lowercase method name, for logging.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::InitChain(_) => "init_chain",
            Self::CheckTx(_) => "check_tx",
            Self::FinalizeBlock(_) => "finalize_block",
            Self::Commit => "commit",
            Self::Query(_) => "query",
        }
    }
}

/// Reply to a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "result", rename_all = "snake_case")]
pub enum Response {
    Info(InfoResponse),
    InitChain(InitChainResponse),
    CheckTx(CheckTxResponse),
    FinalizeBlock(FinalizeBlockResponse),
    Commit(CommitResponse),
    Query(QueryResponse),
    /// The call could not be completed (bad request line, failed persistence).
    Error(ErrorResponse),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoResponse {
    pub data: String,
    pub version: String,
    pub last_block_height: BlockHeight,
    #[serde(with = "base64_bytes")]
    pub last_block_app_hash: Vec<u8>,
}

/// A genesis validator as supplied by the consensus engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorUpdate {
    pub pub_key: String,
    pub power: i64,
}

/// Genesis payload from the consensus engine. Observed for logging only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InitChainRequest {
    pub chain_id: String,
    pub initial_height: BlockHeight,
    pub validators: Vec<ValidatorUpdate>,
    #[serde(with = "base64_bytes")]
    pub app_state_bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InitChainResponse {}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckTxRequest {
    #[serde(with = "base64_bytes")]
    pub tx: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckTxResponse {
    pub code: u32,
    #[serde(default)]
    pub log: String,
}

impl From<TxResult> for CheckTxResponse {
    fn from(r: TxResult) -> Self {
        Self {
            code: r.code,
            log: r.log,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FinalizeBlockRequest {
    pub height: BlockHeight,
    #[serde(default, with = "base64_bytes_list")]
    pub txs: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeBlockResponse {
    pub tx_results: Vec<TxResult>,
    #[serde(with = "base64_bytes")]
    pub app_hash: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommitResponse {
    pub retain_height: BlockHeight,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    pub path: String,
    #[serde(default, with = "base64_bytes")]
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    pub code: u32,
    #[serde(default)]
    pub log: String,
    #[serde(default, with = "base64_bytes")]
    pub value: Vec<u8>,
    pub height: BlockHeight,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(d)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

mod base64_bytes_list {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(list: &[Vec<u8>], s: S) -> Result<S::Ok, S::Error> {
        let mut seq = s.serialize_seq(Some(list.len()))?;
        for bytes in list {
            seq.serialize_element(&STANDARD.encode(bytes))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Vec<u8>>, D::Error> {
        Vec::<String>::deserialize(d)?
            .into_iter()
            .map(|encoded| {
                STANDARD
                    .decode(encoded.as_bytes())
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}
