use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, Encoder, Histogram, IntCounter, TextEncoder,
};

lazy_static! {
    // Ledger metrics
    pub static ref MOVEMENTS_REGISTERED: IntCounter = register_int_counter!(
        "ledger_movements_registered_total",
        "Total number of movements appended to the ledger"
    ).unwrap();

    pub static ref INSUFFICIENT_STOCK_REJECTIONS: IntCounter = register_int_counter!(
        "ledger_insufficient_stock_rejections_total",
        "Total number of outbound movements rejected by the stock check"
    ).unwrap();

    pub static ref STOCK_FOLD_DURATION: Histogram = register_histogram!(
        "ledger_stock_fold_duration_seconds",
        "Time spent folding movement history into stock figures"
    ).unwrap();

    // Compound operation metrics
    pub static ref TRANSFERS_COMPLETED: IntCounter = register_int_counter!(
        "transfers_completed_total",
        "Total number of completed inter-location transfers"
    ).unwrap();

    pub static ref REMISSIONS_CREATED: IntCounter = register_int_counter!(
        "remissions_created_total",
        "Total number of remissions created"
    ).unwrap();

    pub static ref REMISSIONS_CLOSED: IntCounter = register_int_counter!(
        "remissions_closed_total",
        "Total number of remissions closed"
    ).unwrap();

    pub static ref REMISSIONS_CANCELLED: IntCounter = register_int_counter!(
        "remissions_cancelled_total",
        "Total number of remissions cancelled with stock reversal"
    ).unwrap();

    pub static ref SUPPLIER_RETURNS_REQUESTED: IntCounter = register_int_counter!(
        "supplier_returns_requested_total",
        "Total number of supplier returns requested"
    ).unwrap();

    pub static ref SUPPLIER_RETURNS_PROCESSED: IntCounter = register_int_counter!(
        "supplier_returns_processed_total",
        "Total number of supplier returns approved or credited"
    ).unwrap();
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        MOVEMENTS_REGISTERED.inc();
        assert!(MOVEMENTS_REGISTERED.get() > 0);

        let text = gather_metrics().unwrap();
        assert!(text.contains("ledger_movements_registered_total"));
    }
}
