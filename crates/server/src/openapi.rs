use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequestDoc {
    #[schema(example = "Juan", max_length = 100)]
    pub first_name: String,
    #[schema(example = "Pérez", max_length = 100)]
    pub last_name: String,
    #[schema(example = "JP Servicios SRL", max_length = 150)]
    pub legal_name: String,
    #[schema(example = "20-12345678-9", pattern = r"^[0-9]{2}-[0-9]{8}-[0-9]$")]
    pub tax_id: String,
    #[schema(example = "1985-06-15")]
    pub birth_date: NaiveDate,
    #[schema(example = "1165874210", pattern = r"^[0-9]{10}$")]
    pub mobile_phone: String,
    #[schema(example = "juan.perez@example.com", max_length = 150)]
    pub email: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDoc {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub legal_name: String,
    pub tax_id: String,
    pub birth_date: NaiveDate,
    pub mobile_phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(ToSchema)]
pub struct FieldErrorDoc { pub field: String, pub message: String }

#[derive(ToSchema)]
pub struct ErrorDoc {
    #[schema(example = 404)]
    pub status: u16,
    #[schema(example = "Not Found")]
    pub error: String,
    pub message: String,
    /// Present only for validation failures.
    pub errors: Option<Vec<FieldErrorDoc>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::customers::create,
        crate::routes::customers::list,
        crate::routes::customers::get_by_id,
        crate::routes::customers::update,
        crate::routes::customers::delete,
        crate::routes::customers::by_tax_id,
        crate::routes::customers::by_email,
    ),
    components(
        schemas(
            HealthResponse,
            CustomerRequestDoc,
            CustomerDoc,
            FieldErrorDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "customers", description = "Customer registry with unique tax id and email")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_customer_path() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for p in [
            "/health",
            "/api/customers",
            "/api/customers/{id}",
            "/api/customers/tax-id/{taxId}",
            "/api/customers/email/{email}",
        ] {
            assert!(paths.iter().any(|k| k.as_str() == p), "missing {p}");
        }
    }
}
