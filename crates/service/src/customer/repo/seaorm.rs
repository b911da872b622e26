use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::{NotSet, Set, Unchanged}, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, SqlErr,
};
use uuid::Uuid;

use models::customer;

use crate::customer::domain::{Customer, CustomerInput, UniqueField};
use crate::customer::repository::{CustomerRepository, RepositoryError};

/// PostgreSQL-backed store. Uniqueness is enforced by the
/// `uq_customer_tax_id` / `uq_customer_email` indexes.
pub struct SeaOrmCustomerRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmCustomerRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn to_domain(m: customer::Model) -> Customer {
    Customer {
        id: m.id,
        first_name: m.first_name,
        last_name: m.last_name,
        legal_name: m.legal_name,
        tax_id: m.tax_id,
        birth_date: m.birth_date,
        mobile_phone: m.mobile_phone,
        email: m.email,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

/// Translate a write failure, naming the attempted value when the database
/// reports a duplicate key.
fn write_err(e: DbErr, tax_id: &str, email: &str) -> RepositoryError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => {
            if msg.contains(migration::UQ_CUSTOMER_EMAIL) {
                RepositoryError::UniqueViolation { field: UniqueField::Email, value: email.to_string() }
            } else if msg.contains(migration::UQ_CUSTOMER_TAX_ID) {
                RepositoryError::UniqueViolation { field: UniqueField::TaxId, value: tax_id.to_string() }
            } else {
                RepositoryError::Backend(msg)
            }
        }
        _ => read_err(e),
    }
}

fn read_err(e: DbErr) -> RepositoryError {
    RepositoryError::Backend(e.to_string())
}

#[async_trait::async_trait]
impl CustomerRepository for SeaOrmCustomerRepository {
    async fn exists_by_tax_id(&self, tax_id: &str) -> Result<bool, RepositoryError> {
        let n = customer::Entity::find()
            .filter(customer::Column::TaxId.eq(tax_id))
            .count(&self.db)
            .await
            .map_err(read_err)?;
        Ok(n > 0)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        let n = customer::Entity::find()
            .filter(customer::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(read_err)?;
        Ok(n > 0)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, RepositoryError> {
        let found = customer::Entity::find_by_id(id).one(&self.db).await.map_err(read_err)?;
        Ok(found.map(to_domain))
    }

    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Customer>, RepositoryError> {
        let found = customer::Entity::find()
            .filter(customer::Column::TaxId.eq(tax_id))
            .one(&self.db)
            .await
            .map_err(read_err)?;
        Ok(found.map(to_domain))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError> {
        let found = customer::Entity::find()
            .filter(customer::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(read_err)?;
        Ok(found.map(to_domain))
    }

    async fn find_all(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = customer::Entity::find()
            .order_by_asc(customer::Column::CreatedAt)
            .order_by_asc(customer::Column::Id)
            .all(&self.db)
            .await
            .map_err(read_err)?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn insert(&self, input: CustomerInput) -> Result<Customer, RepositoryError> {
        let now = Utc::now();
        let (tax_id, email) = (input.tax_id.clone(), input.email.clone());
        let am = customer::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            legal_name: Set(input.legal_name),
            tax_id: Set(input.tax_id),
            birth_date: Set(input.birth_date),
            mobile_phone: Set(input.mobile_phone),
            email: Set(input.email),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        let created = am.insert(&self.db).await.map_err(|e| write_err(e, &tax_id, &email))?;
        Ok(to_domain(created))
    }

    async fn update(&self, c: Customer) -> Result<Customer, RepositoryError> {
        let id = c.id;
        let (tax_id, email) = (c.tax_id.clone(), c.email.clone());
        let am = customer::ActiveModel {
            id: Unchanged(c.id),
            first_name: Set(c.first_name),
            last_name: Set(c.last_name),
            legal_name: Set(c.legal_name),
            tax_id: Set(c.tax_id),
            birth_date: Set(c.birth_date),
            mobile_phone: Set(c.mobile_phone),
            email: Set(c.email),
            // created_at is write-once
            created_at: NotSet,
            updated_at: Set(Utc::now().max(c.created_at).into()),
        };
        match am.update(&self.db).await {
            Ok(m) => Ok(to_domain(m)),
            Err(DbErr::RecordNotUpdated) => Err(RepositoryError::NotFound(id)),
            Err(e) => Err(write_err(e, &tax_id, &email)),
        }
    }

    async fn exists(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let n = customer::Entity::find_by_id(id).count(&self.db).await.map_err(read_err)?;
        Ok(n > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let res = customer::Entity::delete_by_id(id).exec(&self.db).await.map_err(read_err)?;
        if res.rows_affected == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }
}
