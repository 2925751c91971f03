use super::ecommerce::order_management_server::OrderManagement;
use super::ecommerce::{CombinedShipment, Order, OrderId, SearchQuery, UpdateSummary};
use super::{OrderServiceServer, PROCESS_ORDERS, SEARCH_ORDERS, UPDATE_ORDERS};
use crate::batch::{Flush, ShipmentBatcher};
use crate::error::OrderError;
use futures::{Stream, StreamExt};
use grpc_rbac::{AuthClaimsExt, ObservedStream};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status, Streaming};
use tracing::{debug, info, warn};

type OutboundStream<T> = ObservedStream<ReceiverStream<Result<T, Status>>>;

/// Shipments buffered ahead of a slow `ProcessOrders` client
const SHIPMENT_CHANNEL_CAPACITY: usize = 16;

/// Orders with at least one item containing `query`
fn matches_query(order: &Order, query: &str) -> bool {
    order.items.iter().any(|item| item.contains(query))
}

#[tonic::async_trait]
impl OrderManagement for OrderServiceServer {
    type SearchOrdersStream = OutboundStream<Order>;
    type ProcessOrdersStream = OutboundStream<CombinedShipment>;

    async fn create_order(&self, request: Request<Order>) -> Result<Response<OrderId>, Status> {
        let caller = request.caller().to_string();
        let order = request.into_inner();

        let id = self.orders.insert(order).await?;
        info!(order_id = %id, caller = %caller, "Order created");

        Ok(Response::new(OrderId { value: id }))
    }

    async fn get_order(&self, request: Request<OrderId>) -> Result<Response<Order>, Status> {
        let id = request.into_inner().value;
        if id.is_empty() {
            return Err(OrderError::InvalidArgument("order id must not be empty".into()).into());
        }

        let order = self
            .orders
            .get(&id)
            .await
            .ok_or(OrderError::OrderNotFound(id))?;

        Ok(Response::new(order))
    }

    /// Stream every order with an item matching the query
    ///
    /// Matches come from a snapshot taken when the call starts; the bounded
    /// channel paces the producer to the client.
    async fn search_orders(
        &self,
        request: Request<SearchQuery>,
    ) -> Result<Response<Self::SearchOrdersStream>, Status> {
        let caller = request.caller().to_string();
        let query = request.into_inner().value;
        let snapshot = self.orders.snapshot().await;
        let (tx, rx) = mpsc::channel(self.settings.search_buffer);

        tokio::spawn(async move {
            let mut matched = 0usize;
            for order in snapshot.into_iter().filter(|o| matches_query(o, &query)) {
                if tx.send(Ok(order)).await.is_err() {
                    debug!(query = %query, "Search client went away");
                    return;
                }
                matched += 1;
            }
            info!(query = %query, matched, caller = %caller, "Search completed");
        });

        Ok(Response::new(ObservedStream::outbound(
            ReceiverStream::new(rx),
            SEARCH_ORDERS,
        )))
    }

    /// Upsert every received order, then answer once with the ids seen
    ///
    /// Orders are staged and committed together at end of input, so a call
    /// that fails or is cancelled half way writes nothing.
    async fn update_orders(
        &self,
        request: Request<Streaming<Order>>,
    ) -> Result<Response<UpdateSummary>, Status> {
        let caller = request.caller().to_string();
        let mut inbound = std::pin::pin!(ObservedStream::inbound(
            request.into_inner(),
            UPDATE_ORDERS
        ));

        let mut staged = Vec::new();
        while let Some(order) = inbound.next().await {
            let order = order?;
            if order.id.is_empty() {
                warn!(
                    caller = %caller,
                    received = staged.len(),
                    "Rejected update without order id"
                );
                return Err(OrderError::InvalidArgument("order id must not be empty".into()).into());
            }
            staged.push(order);
        }

        let order_ids: Vec<String> = staged.iter().map(|o| o.id.clone()).collect();
        self.orders.upsert_all(staged).await;
        info!(count = order_ids.len(), caller = %caller, "Orders updated");

        Ok(Response::new(UpdateSummary {
            message: format!("Orders processed: {}", order_ids.join(", ")),
            order_ids,
        }))
    }

    /// Consolidate incoming order ids into batched shipments
    async fn process_orders(
        &self,
        request: Request<Streaming<OrderId>>,
    ) -> Result<Response<Self::ProcessOrdersStream>, Status> {
        let caller = request.caller().to_string();
        let inbound = ObservedStream::inbound(request.into_inner(), PROCESS_ORDERS);
        let batch_size = self.settings.batch_size;
        let (tx, rx) = mpsc::channel(SHIPMENT_CHANNEL_CAPACITY);

        tokio::spawn(async move {
            let batcher = ShipmentBatcher::new(batch_size);
            let flushes = consolidate(inbound, batcher, tx).await;
            info!(flushes, caller = %caller, "Order processing finished");
        });

        Ok(Response::new(ObservedStream::outbound(
            ReceiverStream::new(rx),
            PROCESS_ORDERS,
        )))
    }
}

/// Drive `batcher` from `inbound` until end of input, a stream error, or the
/// client going away. Returns the number of flushes emitted.
async fn consolidate<S>(
    inbound: S,
    mut batcher: ShipmentBatcher,
    tx: mpsc::Sender<Result<CombinedShipment, Status>>,
) -> u64
where
    S: Stream<Item = Result<OrderId, Status>>,
{
    let mut inbound = std::pin::pin!(inbound);

    while let Some(next) = inbound.next().await {
        let order_id = match next {
            Ok(order_id) if order_id.value.is_empty() => {
                let status = Status::from(OrderError::InvalidArgument(
                    "order id must not be empty".into(),
                ));
                forward_error(&tx, status).await;
                return batcher.flushes();
            }
            Ok(order_id) => order_id.value,
            Err(status) => {
                forward_error(&tx, status).await;
                return batcher.flushes();
            }
        };

        if let Some(flush) = batcher.push(order_id) {
            if emit(&tx, flush).await.is_err() {
                debug!("Process client went away");
                return batcher.flushes();
            }
        }
    }

    if let Some(flush) = batcher.finish() {
        if emit(&tx, flush).await.is_err() {
            debug!("Process client went away before final flush");
        }
    }
    batcher.flushes()
}

async fn emit(
    tx: &mpsc::Sender<Result<CombinedShipment, Status>>,
    flush: Flush,
) -> Result<(), mpsc::error::SendError<Result<CombinedShipment, Status>>> {
    for shipment in flush.shipments {
        tx.send(Ok(shipment)).await?;
    }
    Ok(())
}

async fn forward_error(tx: &mpsc::Sender<Result<CombinedShipment, Status>>, status: Status) {
    warn!(code = ?status.code(), reason = status.message(), "Order processing aborted");
    if tx.send(Err(status)).await.is_err() {
        debug!("Process client went away before error could be delivered");
    }
}
