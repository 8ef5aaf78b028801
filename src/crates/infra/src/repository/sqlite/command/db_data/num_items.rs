//! `SeaORM` Entity for num_items table

use domain::report::CountryItemCount;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "num_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_name = "countryName")]
    pub country_name: String,
    #[sea_orm(column_name = "ItemSaleAmount")]
    pub item_sale_amount: i64,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No relations defined for NumItems")
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CountryItemCount {
    fn from(model: Model) -> Self {
        CountryItemCount {
            country: model.country_name,
            count: u64::try_from(model.item_sale_amount).unwrap_or(0),
        }
    }
}

impl From<&CountryItemCount> for ActiveModel {
    fn from(value: &CountryItemCount) -> Self {
        Self {
            country_name: Set(value.country.clone()),
            item_sale_amount: Set(value.count as i64),
        }
    }
}
