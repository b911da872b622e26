use std::sync::Arc;

use service::customer::repository::{memory::InMemoryCustomerRepository, CustomerRepository};
use service::customer::CustomerService;

/// Shared handler state; cloning only bumps the service refcount.
#[derive(Clone)]
pub struct ServerState {
    pub customers: Arc<CustomerService<dyn CustomerRepository>>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn CustomerRepository>) -> Self {
        Self { customers: Arc::new(CustomerService::new(repo)) }
    }

    /// State backed by a process-local store; nothing is persisted.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryCustomerRepository::new()))
    }
}
