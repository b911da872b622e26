use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::domain::{Customer, CustomerInput, UniqueField};
use super::repository::CustomerRepository;
use crate::errors::ServiceError;

/// Customer business service independent of web framework.
///
/// Inputs are expected to have passed [`super::validation::validate`]; this
/// layer only enforces the tax id / email uniqueness invariants and maps
/// absence into [`ServiceError::NotFound`].
pub struct CustomerService<R: CustomerRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: CustomerRepository + ?Sized> CustomerService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create a customer after checking that neither its tax id nor its email
    /// is already taken.
    ///
    /// # Examples
    /// ```
    /// use service::customer::{CustomerService, domain::CustomerInput, repository::memory::InMemoryCustomerRepository};
    /// use std::sync::Arc;
    /// let svc = CustomerService::new(Arc::new(InMemoryCustomerRepository::new()));
    /// let birth = chrono::NaiveDate::from_ymd_opt(1985, 6, 15).unwrap();
    /// let input = CustomerInput::new("Juan", "Pérez", "JP Servicios SRL", "20-12345678-9", birth, "1165874210", "juan@example.com");
    /// let created = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(created.tax_id, "20-12345678-9");
    /// assert_eq!(created.created_at, created.updated_at);
    /// ```
    #[instrument(skip(self, input), fields(tax_id = %input.tax_id, email = %input.email))]
    pub async fn create(&self, input: CustomerInput) -> Result<Customer, ServiceError> {
        if self.repo.exists_by_tax_id(&input.tax_id).await? {
            warn!(field = "taxId", "customer_create_conflict");
            return Err(ServiceError::conflict(UniqueField::TaxId, input.tax_id));
        }
        if self.repo.exists_by_email(&input.email).await? {
            warn!(field = "email", "customer_create_conflict");
            return Err(ServiceError::conflict(UniqueField::Email, input.email));
        }

        // A concurrent writer can still win the race; the store's own
        // constraint surfaces that as the same Conflict.
        let created = self.repo.insert(input).await.map_err(ServiceError::from)?;
        info!(id = %created.id, "customer_created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Customer, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found_by("id", id))
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Customer>, ServiceError> {
        let all = self.repo.find_all().await?;
        debug!(count = all.len(), "customers_listed");
        Ok(all)
    }

    /// Replace every mutable field of customer `id`.
    ///
    /// A unique value equal to the record's own current value is not
    /// re-checked, so an update that keeps its tax id or email never
    /// conflicts with itself.
    #[instrument(skip(self, input), fields(tax_id = %input.tax_id, email = %input.email))]
    pub async fn update(&self, id: Uuid, input: CustomerInput) -> Result<Customer, ServiceError> {
        let mut existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found_by("id", id))?;

        if existing.tax_id != input.tax_id && self.repo.exists_by_tax_id(&input.tax_id).await? {
            warn!(field = "taxId", "customer_update_conflict");
            return Err(ServiceError::conflict(UniqueField::TaxId, input.tax_id));
        }
        if existing.email != input.email && self.repo.exists_by_email(&input.email).await? {
            warn!(field = "email", "customer_update_conflict");
            return Err(ServiceError::conflict(UniqueField::Email, input.email));
        }

        existing.apply(input);
        let updated = self.repo.update(existing).await?;
        info!(id = %updated.id, "customer_updated");
        Ok(updated)
    }

    /// Hard delete.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.repo.exists(id).await? {
            return Err(ServiceError::not_found_by("id", id));
        }
        self.repo.delete(id).await?;
        info!(id = %id, "customer_deleted");
        Ok(())
    }

    /// Exact match; no normalization is applied to `tax_id`.
    #[instrument(skip(self))]
    pub async fn find_by_tax_id(&self, tax_id: &str) -> Result<Customer, ServiceError> {
        self.repo
            .find_by_tax_id(tax_id)
            .await?
            .ok_or_else(|| ServiceError::not_found_by("tax id", tax_id))
    }

    /// Exact match; emails are not case-folded.
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Customer, ServiceError> {
        self.repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| ServiceError::not_found_by("email", email))
    }
}
