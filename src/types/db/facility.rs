use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "facilities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub user_id: String,
    pub legal_name: String,
    pub industry: String,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub phone_e164: Option<String>,
    pub company_size_min: Option<i32>,
    pub company_size_max: Option<i32>,
    pub founded_year: Option<i32>,
    pub hq_address_line1: Option<String>,
    pub hq_address_line2: Option<String>,
    pub hq_city: Option<String>,
    pub hq_state_province: Option<String>,
    pub hq_postal_code: Option<String>,
    pub hq_country: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
