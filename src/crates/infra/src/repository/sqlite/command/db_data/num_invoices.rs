//! `SeaORM` Entity for num_invoices table

use domain::report::CountryInvoiceCount;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "num_invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "countryName")]
    pub country_name: String,
    #[sea_orm(column_name = "invSaleAmount")]
    pub inv_sale_amount: i64,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No relations defined for NumInvoices")
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CountryInvoiceCount {
    fn from(model: Model) -> Self {
        CountryInvoiceCount {
            country: model.country_name,
            count: u64::try_from(model.inv_sale_amount).unwrap_or(0),
        }
    }
}

impl From<&CountryInvoiceCount> for ActiveModel {
    fn from(value: &CountryInvoiceCount) -> Self {
        Self {
            country_name: Set(value.country.clone()),
            inv_sale_amount: Set(value.count as i64),
        }
    }
}
