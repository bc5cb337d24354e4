use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "shows")]
pub struct Model {
    /// Upstream catalog id, never generated locally.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub name: String,
    pub language: Option<String>,
    pub network_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::networks::Entity",
        from = "Column::NetworkId",
        to = "super::networks::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Networks,
    #[sea_orm(has_one = "super::ratings::Entity")]
    Ratings,
    #[sea_orm(has_one = "super::externals::Entity")]
    Externals,
    #[sea_orm(has_many = "super::show_genres::Entity")]
    ShowGenres,
}

impl Related<super::networks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Networks.def()
    }
}

impl Related<super::ratings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl Related<super::externals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Externals.def()
    }
}

impl Related<super::genres::Entity> for Entity {
    fn to() -> RelationDef {
        super::show_genres::Relation::Genre.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::show_genres::Relation::Show.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
