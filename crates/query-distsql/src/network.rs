//! Flow message shapes
//!
//! Specs and metadata exchanged between the gateway and the nodes running
//! flow fragments, plus the JSON encoding used for them.

use crate::envelope::RemoteError;
use crate::error::{DistributedError, Result};
use crate::ordering::{convert_to_column_ordering, OrderingSpec};
use query_core::ColumnOrdering;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowId(pub Uuid);

impl FlowId {
    /// Create a new random flow ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FlowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flow-{}", &self.0.to_string()[..8])
    }
}

/// Where a stream comes from or goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamEndpointType {
    /// Stream between processors on the same node
    Local,
    /// Stream to or from another node
    Remote,
    /// Final results, returned in the response to the gateway
    SyncResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamEndpointSpec {
    pub endpoint_type: StreamEndpointType,
    pub stream_id: u32,
    /// Address of the other end, only for remote streams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_addr: Option<String>,
}

impl StreamEndpointSpec {
    pub fn local(stream_id: u32) -> Self {
        Self {
            endpoint_type: StreamEndpointType::Local,
            stream_id,
            target_addr: None,
        }
    }

    pub fn remote(stream_id: u32, target_addr: impl Into<String>) -> Self {
        Self {
            endpoint_type: StreamEndpointType::Remote,
            stream_id,
            target_addr: Some(target_addr.into()),
        }
    }
}

/// How rows from several input streams are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncType {
    /// Rows are passed on in arrival order
    Unordered,
    /// Streams are merged according to the ordering
    Ordered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSyncSpec {
    pub sync_type: SyncType,
    /// Only meaningful for ordered syncs
    #[serde(default)]
    pub ordering: OrderingSpec,
    pub streams: Vec<StreamEndpointSpec>,
}

impl InputSyncSpec {
    pub fn unordered(streams: Vec<StreamEndpointSpec>) -> Self {
        Self {
            sync_type: SyncType::Unordered,
            ordering: OrderingSpec::default(),
            streams,
        }
    }

    pub fn ordered(ordering: OrderingSpec, streams: Vec<StreamEndpointSpec>) -> Self {
        Self {
            sync_type: SyncType::Ordered,
            ordering,
            streams,
        }
    }

    /// The merge ordering in planner form
    pub fn column_ordering(&self) -> ColumnOrdering {
        convert_to_column_ordering(&self.ordering)
    }
}

/// Trailing metadata a producer sends after its rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducerMetadata {
    pub flow_id: FlowId,
    #[serde(default)]
    pub error: Option<RemoteError>,
}

impl ProducerMetadata {
    pub fn success(flow_id: FlowId) -> Self {
        Self {
            flow_id,
            error: None,
        }
    }

    pub fn failure(flow_id: FlowId, err: &(dyn StdError + 'static)) -> Self {
        tracing::info!("Flow {} failed: {}", flow_id, err);
        Self {
            flow_id,
            error: Some(RemoteError::new(err)),
        }
    }

    /// Decodes metadata, rejecting error envelopes that are empty or carry an
    /// unknown detail kind.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut value: serde_json::Value = serde_json::from_slice(bytes)?;
        let error = match value.get_mut("error").map(serde_json::Value::take) {
            Some(serde_json::Value::Null) | None => None,
            Some(envelope) => Some(RemoteError::from_json_value(envelope)?),
        };
        let flow_id = value
            .get("flow_id")
            .cloned()
            .ok_or_else(|| DistributedError::SerializationError("missing flow_id".to_string()))?;
        Ok(Self {
            flow_id: serde_json::from_value(flow_id)?,
            error,
        })
    }
}

/// Encodes a message for the wire
pub fn encode<T: Serialize>(msg: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(msg)?)
}

/// Decodes a message from the wire
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}
