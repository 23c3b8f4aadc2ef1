use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// user | business_owner | event_organizer | professional
    pub role: Option<String>,
}

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct CategoryInputDoc {
    pub name: Option<String>,
    pub description: Option<String>,
    /// business | event | both
    pub category_type: Option<String>,
    pub image: Option<String>,
}

#[derive(ToSchema)]
pub struct BusinessFormDoc {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub category_id: Uuid,
    pub website: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

#[derive(ToSchema)]
pub struct BusinessPatchDoc {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
}

#[derive(ToSchema)]
pub struct EventFormDoc {
    pub name: String,
    /// RFC 3339
    pub start_date: String,
    /// RFC 3339
    pub end_date: String,
    pub category_id: Uuid,
    pub description: Option<String>,
    pub location: Option<String>,
    /// jpg, jpeg, png or gif
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

#[derive(ToSchema)]
pub struct ProfessionInputDoc {
    pub name: String,
    /// doctor | lawyer | engineer | teacher | accountant | other
    pub profession_type: String,
    pub biography: Option<String>,
    pub location: Option<String>,
    pub contact: Option<String>,
    pub specialties: Option<Vec<String>>,
    pub image: Option<String>,
}

#[derive(ToSchema)]
pub struct ReviewInputDoc {
    pub business_id: Uuid,
    /// 1 to 5
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::categories::list,
        crate::routes::categories::create,
        crate::routes::categories::get_one,
        crate::routes::categories::update,
        crate::routes::categories::remove,
        crate::routes::businesses::create,
        crate::routes::businesses::list,
        crate::routes::businesses::get_one,
        crate::routes::businesses::update,
        crate::routes::businesses::remove,
        crate::routes::businesses::by_owner,
        crate::routes::businesses::by_category,
        crate::routes::events::create,
        crate::routes::events::list,
        crate::routes::events::get_one,
        crate::routes::events::update,
        crate::routes::events::remove,
        crate::routes::events::by_organizer,
        crate::routes::events::by_category,
        crate::routes::professions::create,
        crate::routes::professions::list,
        crate::routes::professions::get_one,
        crate::routes::professions::update,
        crate::routes::professions::remove,
        crate::routes::professions::by_user,
        crate::routes::professions::by_location,
        crate::routes::professions::by_specialty,
        crate::routes::reviews::create,
        crate::routes::reviews::for_business,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            CategoryInputDoc,
            BusinessFormDoc,
            BusinessPatchDoc,
            EventFormDoc,
            ProfessionInputDoc,
            ReviewInputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "categories"),
        (name = "businesses"),
        (name = "events"),
        (name = "professions"),
        (name = "reviews")
    )
)]
pub struct ApiDoc;
