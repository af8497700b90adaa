//! Customer lookup.
//!
//! Maps a customer id and query scope to a `LookupOutcome`. Errors
//! never cross the boundary as faults: a malformed id, a missing row,
//! and a store failure all come back as inspectable `Failed` values
//! that downstream prompting can still carry as context.

use std::sync::Arc;
use tracing::{info, warn};

use desk_common::customer::CUSTOMER_ID_PREFIX;
use desk_common::{LookupError, LookupOutcome, QueryScope};

use crate::store::SupportStore;

pub struct CustomerLookup<S> {
    store: Arc<S>,
}

impl<S: SupportStore> CustomerLookup<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn lookup(&self, customer_id: &str, scope: QueryScope) -> LookupOutcome {
        if customer_id.is_empty() || !customer_id.starts_with(CUSTOMER_ID_PREFIX) {
            return LookupOutcome::failed(LookupError::invalid_format(customer_id));
        }

        info!("Querying customer {} (scope: {})", customer_id, scope);

        match self.store.fetch_customer(customer_id, scope).await {
            Ok(Some(record)) => {
                info!("Retrieved data for: {}", record.name);
                LookupOutcome::Found(record)
            }
            Ok(None) => {
                warn!("Customer {} not found", customer_id);
                LookupOutcome::failed(LookupError::not_found(customer_id))
            }
            Err(e) => {
                warn!("Customer query failed: {}", e);
                LookupOutcome::failed(LookupError::store_unavailable(format!(
                    "Customer query failed: {e}"
                )))
            }
        }
    }
}
