use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::web::middlewares::AUTH_TOKEN;

pub struct CookieAuthModifier;

impl Modify for CookieAuthModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(schema) = openapi.components.as_mut() {
            schema.add_security_scheme(
                "cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    AUTH_TOKEN,
                    "Session JWT of the signed in account",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::routes::index::index_handler,
        crate::web::routes::account::login_handler,
        crate::web::routes::account::logout_handler,
        crate::web::routes::signup::signup_choices_handler,
        crate::web::routes::signup::signup_choose_handler,
        crate::web::routes::signup::signup_form_handler,
        crate::web::routes::signup::signup_handler,
        crate::web::routes::courses::course_list_handler,
        crate::web::routes::courses::course_detail_handler,
        crate::web::routes::teachers::teacher_list_handler,
        crate::web::routes::teachers::teacher_detail_handler,
        crate::web::routes::students::student_list_handler,
        crate::web::routes::students::student_detail_handler,
        crate::web::routes::mentors::mentor_list_handler,
        crate::web::routes::mentors::mentor_detail_handler,
        crate::web::routes::lessons::lesson_list_handler,
        crate::web::routes::lessons::lesson_detail_handler,
        crate::web::routes::lessons::lesson_create_handler,
        crate::web::routes::lessons::lesson_delete_handler,
        crate::web::routes::grades::grade_list_handler,
        crate::web::routes::grades::grade_update_handler,
    ),
    modifiers(&CookieAuthModifier),
)]
pub struct ApiDoc;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn document_lists_every_view() {
        let doc = ApiDoc::openapi();
        for path in ["/", "/signup/{role}/", "/lessons/create", "/grades/{id}/update"] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing");
        }
    }
}
