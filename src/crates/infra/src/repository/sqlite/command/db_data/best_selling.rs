//! `SeaORM` Entity for best_selling table

use domain::report::BestSellingTrack;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

/// 唯一键 (countryName, year)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "best_selling")]
pub struct Model {
    #[sea_orm(column_name = "trackName")]
    pub track_name: String,
    #[sea_orm(primary_key, auto_increment = false, column_name = "countryName")]
    pub country_name: String,
    #[sea_orm(column_name = "saleAmount")]
    pub sale_amount: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub year: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No relations defined for BestSelling")
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for BestSellingTrack {
    fn from(model: Model) -> Self {
        BestSellingTrack {
            name: model.track_name,
            country: model.country_name,
            amount: u64::try_from(model.sale_amount).unwrap_or(0),
            year: model.year,
        }
    }
}

impl From<&BestSellingTrack> for ActiveModel {
    fn from(track: &BestSellingTrack) -> Self {
        Self {
            track_name: Set(track.name.clone()),
            country_name: Set(track.country.clone()),
            sale_amount: Set(track.amount as i64),
            year: Set(track.year.clone()),
        }
    }
}
