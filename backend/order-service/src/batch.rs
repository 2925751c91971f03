//! Shipment consolidation for `ProcessOrders`
//!
//! A [`ShipmentBatcher`] accumulates one placeholder shipment per order id
//! and flushes when it holds `batch_size` entries or the input ends. One
//! batcher belongs to exactly one call.
//!
//! ```text
//! Accumulating --push, len == batch_size--> Flushing --emit all, reset--> Accumulating
//! Accumulating --finish, len > 0----------> Flushing
//! ```

use crate::grpc::ecommerce::CombinedShipment;
use std::num::NonZeroUsize;
use tracing::debug;

pub const SHIPMENT_STATUS: &str = "PROCESSED";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Accumulating,
    Flushing,
}

/// Shipments emitted by one flush, in insertion order
#[derive(Debug, Clone, PartialEq)]
pub struct Flush {
    /// 1-based flush ordinal within the call
    pub seq: u64,
    pub shipments: Vec<CombinedShipment>,
}

#[derive(Debug)]
pub struct ShipmentBatcher {
    batch_size: NonZeroUsize,
    state: BatchState,
    pending: Vec<CombinedShipment>,
    flushes: u64,
}

impl ShipmentBatcher {
    pub fn new(batch_size: NonZeroUsize) -> Self {
        Self {
            batch_size,
            state: BatchState::Accumulating,
            pending: Vec::new(),
            flushes: 0,
        }
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Entries waiting for the next flush
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Flushes performed so far
    pub fn flushes(&self) -> u64 {
        self.flushes
    }

    /// Add the placeholder for `order_id`; returns a flush once the batch is full
    pub fn push(&mut self, order_id: String) -> Option<Flush> {
        self.pending.push(CombinedShipment {
            id: format!("cmb-{order_id}"),
            status: SHIPMENT_STATUS.to_string(),
            order_ids: vec![order_id],
            batch: 0,
        });

        // threshold is checked after insertion
        if self.pending.len() >= self.batch_size.get() {
            self.state = BatchState::Flushing;
        }
        self.take_flush()
    }

    /// End of input: flush whatever is left
    pub fn finish(&mut self) -> Option<Flush> {
        if !self.pending.is_empty() {
            self.state = BatchState::Flushing;
        }
        self.take_flush()
    }

    fn take_flush(&mut self) -> Option<Flush> {
        match self.state {
            BatchState::Accumulating => None,
            BatchState::Flushing => {
                self.flushes += 1;
                let seq = self.flushes;
                let mut shipments = std::mem::take(&mut self.pending);
                for shipment in &mut shipments {
                    shipment.batch = seq;
                }
                self.state = BatchState::Accumulating;

                debug!(seq, size = shipments.len(), "Shipment batch flushed");
                Some(Flush { seq, shipments })
            }
        }
    }
}
