//! Serializable summary of a finished frame

use crate::{
    error::Result,
    execution_context::FrameState,
    frame_ref::Address,
    gas::Gas,
};
use serde::{Deserialize, Serialize};

/// What a frame did with its budget and what it produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameReceipt {
    /// Address the frame ran as
    pub address: Address,
    /// Call depth of the frame
    pub depth: usize,
    /// State the frame was in when the receipt was taken
    pub status: FrameState,
    /// Gas consumed by the frame
    pub gas_used: Gas,
    /// Gas left in the frame; returned to the caller unless aborted
    pub gas_remaining: Gas,
    /// Output bytes
    pub output: Vec<u8>,
}

impl FrameReceipt {
    /// Encode with bincode
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a receipt produced by [`FrameReceipt::encode`]
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}
