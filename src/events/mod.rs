use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use crate::entities::inventory_movement::MovementKind;
use crate::entities::supplier_return::ReturnStatus;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

// The events emitted after each committed ledger or workflow operation.
// Consumers observe them; nothing here can alter what was committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    MovementRegistered {
        movement_id: i64,
        component_id: Uuid,
        kind: MovementKind,
        quantity: Decimal,
    },
    TransferCompleted {
        transfer_id: Uuid,
        component_id: Uuid,
        quantity: Decimal,
        origin_location_id: Uuid,
        destination_location_id: Uuid,
    },
    RemissionCreated {
        remission_id: Uuid,
        number: String,
        line_count: usize,
    },
    RemissionClosed(Uuid),
    RemissionCancelled {
        remission_id: Uuid,
        motive: String,
    },
    SupplierReturnRequested {
        return_id: Uuid,
        number: String,
    },
    SupplierReturnProcessed {
        return_id: Uuid,
        status: ReturnStatus,
    },
}

// Function to process incoming events. The ledger has no outbound
// integrations; processing is structured logging for observers and tests.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::MovementRegistered {
                movement_id,
                component_id,
                kind,
                quantity,
            } => {
                info!(
                    movement_id = %movement_id,
                    component_id = %component_id,
                    kind = %kind,
                    quantity = %quantity,
                    "Movement registered"
                );
            }
            Event::TransferCompleted {
                transfer_id,
                component_id,
                quantity,
                origin_location_id,
                destination_location_id,
            } => {
                info!(
                    transfer_id = %transfer_id,
                    component_id = %component_id,
                    quantity = %quantity,
                    origin_location_id = %origin_location_id,
                    destination_location_id = %destination_location_id,
                    "Transfer completed"
                );
            }
            Event::RemissionCreated {
                remission_id,
                number,
                line_count,
            } => {
                info!(
                    remission_id = %remission_id,
                    number = %number,
                    line_count = %line_count,
                    "Remission created"
                );
            }
            Event::RemissionClosed(remission_id) => {
                info!(remission_id = %remission_id, "Remission closed");
            }
            Event::RemissionCancelled {
                remission_id,
                motive,
            } => {
                info!(
                    remission_id = %remission_id,
                    motive = %motive,
                    "Remission cancelled"
                );
            }
            Event::SupplierReturnRequested { return_id, number } => {
                info!(
                    return_id = %return_id,
                    number = %number,
                    "Supplier return requested"
                );
            }
            Event::SupplierReturnProcessed { return_id, status } => {
                info!(
                    return_id = %return_id,
                    status = %status,
                    "Supplier return processed"
                );
            }
        }
    }

    info!("Event processing loop stopped");
}
