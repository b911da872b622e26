use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const NAME_MAX_LEN: usize = 100;
pub const LEGAL_NAME_MAX_LEN: usize = 150;
pub const EMAIL_MAX_LEN: usize = 150;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub legal_name: String,
    #[sea_orm(unique)]
    pub tax_id: String,
    pub birth_date: Date,
    pub mobile_phone: String,
    #[sea_orm(unique)]
    pub email: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
