use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::domain::{Customer, CustomerInput, UniqueField};

/// Failures reported by a storage backend.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The store's own uniqueness guarantee rejected a write.
    #[error("unique constraint violated on {field}: {value}")]
    UniqueViolation { field: UniqueField, value: String },
    #[error("customer {0} does not exist")]
    NotFound(Uuid),
    #[error("storage error: {0}")]
    Backend(String),
}

/// Storage collaborator for customer records.
///
/// Implementations must enforce tax id and email uniqueness on `insert` and
/// `update` themselves; the service's existence checks are not atomic with
/// the write that follows them.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn exists_by_tax_id(&self, tax_id: &str) -> Result<bool, RepositoryError>;
    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, RepositoryError>;
    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Customer>, RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError>;
    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError>;
    /// Persist a new record, assigning `id`, `created_at` and `updated_at`.
    async fn insert(&self, input: CustomerInput) -> Result<Customer, RepositoryError>;
    /// Persist every mutable field of `customer` and refresh `updated_at`.
    async fn update(&self, customer: Customer) -> Result<Customer, RepositoryError>;
    async fn exists(&self, id: Uuid) -> Result<bool, RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

/// In-memory store for tests, doc examples and local runs.
pub mod memory {
    use std::collections::HashMap;

    use chrono::Utc;
    use tokio::sync::RwLock;

    use super::*;

    #[derive(Default)]
    pub struct InMemoryCustomerRepository {
        rows: RwLock<HashMap<Uuid, Customer>>, // key: customer id
    }

    impl InMemoryCustomerRepository {
        pub fn new() -> Self { Self::default() }

        pub async fn len(&self) -> usize { self.rows.read().await.len() }

        pub async fn is_empty(&self) -> bool { self.rows.read().await.is_empty() }
    }

    /// Mirror of the database unique indexes: reject a value held by any row
    /// other than `own_id`.
    fn check_unique(
        rows: &HashMap<Uuid, Customer>,
        own_id: Option<Uuid>,
        tax_id: &str,
        email: &str,
    ) -> Result<(), RepositoryError> {
        let others: Vec<&Customer> = rows.values().filter(|c| Some(c.id) != own_id).collect();
        // tax id is reported first, matching the service's pre-check order
        if others.iter().any(|c| c.tax_id == tax_id) {
            return Err(RepositoryError::UniqueViolation { field: UniqueField::TaxId, value: tax_id.to_string() });
        }
        if others.iter().any(|c| c.email == email) {
            return Err(RepositoryError::UniqueViolation { field: UniqueField::Email, value: email.to_string() });
        }
        Ok(())
    }

    #[async_trait]
    impl CustomerRepository for InMemoryCustomerRepository {
        async fn exists_by_tax_id(&self, tax_id: &str) -> Result<bool, RepositoryError> {
            Ok(self.rows.read().await.values().any(|c| c.tax_id == tax_id))
        }

        async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
            Ok(self.rows.read().await.values().any(|c| c.email == email))
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, RepositoryError> {
            Ok(self.rows.read().await.get(&id).cloned())
        }

        async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Customer>, RepositoryError> {
            Ok(self.rows.read().await.values().find(|c| c.tax_id == tax_id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError> {
            Ok(self.rows.read().await.values().find(|c| c.email == email).cloned())
        }

        async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
            let mut all: Vec<Customer> = self.rows.read().await.values().cloned().collect();
            all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
            Ok(all)
        }

        async fn insert(&self, input: CustomerInput) -> Result<Customer, RepositoryError> {
            let mut rows = self.rows.write().await;
            check_unique(&rows, None, &input.tax_id, &input.email)?;
            let customer = Customer::from_input(Uuid::new_v4(), input, Utc::now());
            rows.insert(customer.id, customer.clone());
            Ok(customer)
        }

        async fn update(&self, mut customer: Customer) -> Result<Customer, RepositoryError> {
            let mut rows = self.rows.write().await;
            let Some(stored) = rows.get(&customer.id) else {
                return Err(RepositoryError::NotFound(customer.id));
            };
            check_unique(&rows, Some(customer.id), &customer.tax_id, &customer.email)?;
            customer.created_at = stored.created_at;
            customer.updated_at = Utc::now().max(stored.created_at);
            rows.insert(customer.id, customer.clone());
            Ok(customer)
        }

        async fn exists(&self, id: Uuid) -> Result<bool, RepositoryError> {
            Ok(self.rows.read().await.contains_key(&id))
        }

        async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
            match self.rows.write().await.remove(&id) {
                Some(_) => Ok(()),
                None => Err(RepositoryError::NotFound(id)),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        fn input(tax_id: &str, email: &str) -> CustomerInput {
            CustomerInput::new(
                "Juan", "Pérez", "JP Servicios SRL", tax_id,
                NaiveDate::from_ymd_opt(1985, 6, 15).unwrap(), "1165874210", email,
            )
        }

        #[tokio::test]
        async fn insert_assigns_identity_and_equal_timestamps() {
            let repo = InMemoryCustomerRepository::new();
            let c = repo.insert(input("20-12345678-9", "a@x.com")).await.unwrap();
            assert_eq!(c.created_at, c.updated_at);
            assert!(repo.exists(c.id).await.unwrap());
            assert_eq!(repo.find_by_email("a@x.com").await.unwrap(), Some(c));
        }

        #[tokio::test]
        async fn insert_enforces_uniqueness_without_precheck() {
            let repo = InMemoryCustomerRepository::new();
            repo.insert(input("20-12345678-9", "a@x.com")).await.unwrap();

            let err = repo.insert(input("20-12345678-9", "b@x.com")).await.unwrap_err();
            assert!(matches!(err, RepositoryError::UniqueViolation { field: UniqueField::TaxId, .. }));
            let err = repo.insert(input("20-99999999-9", "a@x.com")).await.unwrap_err();
            assert!(matches!(err, RepositoryError::UniqueViolation { field: UniqueField::Email, .. }));
            assert_eq!(repo.len().await, 1);
        }

        #[tokio::test]
        async fn update_ignores_own_values_and_keeps_created_at() {
            let repo = InMemoryCustomerRepository::new();
            let c = repo.insert(input("20-12345678-9", "a@x.com")).await.unwrap();
            let mut changed = c.clone();
            changed.first_name = "Juana".into();
            changed.created_at = Utc::now() + chrono::Duration::days(1);

            let saved = repo.update(changed).await.unwrap();
            assert_eq!(saved.created_at, c.created_at);
            assert!(saved.updated_at >= saved.created_at);
            assert_eq!(saved.first_name, "Juana");
        }

        #[tokio::test]
        async fn tax_id_clash_wins_over_email_clash_on_other_rows() {
            let repo = InMemoryCustomerRepository::new();
            for i in 0..20 {
                repo.insert(input(&format!("20-{:08}-9", i), &format!("u{i}@x.com"))).await.unwrap();
            }
            for i in 0..20 {
                let clash = input(&format!("20-{:08}-9", i), &format!("u{}@x.com", 19 - i));
                let err = repo.insert(clash).await.unwrap_err();
                assert!(matches!(err, RepositoryError::UniqueViolation { field: UniqueField::TaxId, .. }), "row {i}");
            }
        }

        #[tokio::test]
        async fn find_all_orders_by_creation_time() {
            let repo = InMemoryCustomerRepository::new();
            let mut ids = Vec::new();
            for (tax_id, email) in [("20-00000003-9", "c@x.com"), ("20-00000001-9", "a@x.com"), ("20-00000002-9", "b@x.com")] {
                ids.push(repo.insert(input(tax_id, email)).await.unwrap().id);
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            }

            let all = repo.find_all().await.unwrap();
            assert_eq!(all.iter().map(|c| c.id).collect::<Vec<_>>(), ids);
            assert!(all.windows(2).all(|w| w[0].created_at < w[1].created_at));
        }

        #[tokio::test]
        async fn update_and_delete_of_unknown_id_fail() {
            let repo = InMemoryCustomerRepository::new();
            let ghost = Customer::from_input(Uuid::new_v4(), input("20-12345678-9", "a@x.com"), Utc::now());
            assert!(matches!(repo.update(ghost.clone()).await, Err(RepositoryError::NotFound(id)) if id == ghost.id));
            assert!(matches!(repo.delete(ghost.id).await, Err(RepositoryError::NotFound(_))));
        }
    }
}
