mod common;
use axum::http::StatusCode;
use onlineschool::{
    Config,
    auth::{UserClaims, generate_token, hash_password},
    model::entity::{Account, AccountCreate, ProfileCreate},
    web::{middlewares::AUTH_TOKEN, routes::signup::signup_conflict},
};
use serde_json::json;
use tower_cookies::{Cookie, cookie::SameSite};

use crate::common::{Action, Flow, json_body, login_action, setup_server, setup_test_db, signup_action};

#[tokio::test]
async fn signup_creates_one_profile_per_role() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;
    let course = db.course("Rust").await;

    Flow::new()
        .step(
            signup_action("student", "ann", Some(course.id()))
                .with_clear_cookies(true)
                .assert_cookie(AUTH_TOKEN, |cookie| {
                    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
                    assert_eq!(cookie.path(), Some("/"));
                    assert_eq!(cookie.http_only(), Some(true));
                })
                .assert_body(|body| {
                    let body = json_body(body);
                    assert_eq!(body["num_courses"], 1);
                    assert_eq!(body["num_students"], 1);
                    assert_eq!(body["num_teachers"], 0);
                }),
        )
        .step(
            signup_action("teacher", "bob", Some(course.id()))
                .with_clear_cookies(true)
                .assert_cookie(AUTH_TOKEN, |cookie| assert!(!cookie.value().is_empty()))
                .assert_body(|body| assert_eq!(json_body(body)["num_teachers"], 1)),
        )
        .step(
            signup_action("mentor", "cid", None)
                .with_clear_cookies(true)
                .assert_cookie(AUTH_TOKEN, |cookie| assert!(!cookie.value().is_empty())),
        )
        .run(&mut server, &db)
        .await;

    assert_eq!(db.count("users").await, 3);
    assert_eq!(db.count("students").await, 1);
    assert_eq!(db.count("teachers").await, 1);
    assert_eq!(db.count("mentors").await, 1);

    let roles: Vec<(String, String)> =
        sqlx::query_as("SELECT username, role FROM users ORDER BY username")
            .fetch_all(db.pool())
            .await
            .unwrap();
    assert_eq!(
        roles,
        [
            ("ann".to_string(), "student".to_string()),
            ("bob".to_string(), "teacher".to_string()),
            ("cid".to_string(), "mentor".to_string()),
        ]
    );

    let enrolled: Option<uuid::Uuid> = sqlx::query_scalar("SELECT course_id FROM students")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(enrolled, Some(course.id()));
}

#[tokio::test]
async fn invalid_signup_writes_nothing() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(
            Action::new("empty form", "POST", "/signup/student/")
                .with_body(json!({}))
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| {
                    let body = json_body(body);
                    assert!(body["errors"]["username"].is_array());
                    assert!(body["errors"]["password1"].is_array());
                }),
        )
        .step(
            Action::new("passwords differ", "POST", "/signup/mentor/")
                .with_body(json!({
                    "username": "dan",
                    "password1": "s3cret-pass",
                    "password2": "another-pass",
                }))
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| assert!(json_body(body)["errors"]["password1"].is_array())),
        )
        .step(
            signup_action("teacher", "eve", Some(uuid::Uuid::new_v4()))
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| assert!(json_body(body)["errors"]["course_id"].is_array())),
        )
        .run(&mut server, &db)
        .await;

    assert_eq!(db.count("users").await, 0);
    assert_eq!(db.count("teachers").await, 0);
    assert_eq!(db.count("mentors").await, 0);
}

#[tokio::test]
async fn duplicate_username_is_a_field_error() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(signup_action("mentor", "fay", None).with_save_cookies(false))
        .step(
            signup_action("student", "fay", None)
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| {
                    let errors = &json_body(body)["errors"]["username"];
                    assert_eq!(errors[0], "A user with that username already exists.");
                }),
        )
        .run(&mut server, &db)
        .await;

    assert_eq!(db.count("users").await, 1);
    assert_eq!(db.count("students").await, 0);
}

#[tokio::test]
async fn role_chooser_leads_to_role_forms() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(Action::new("choices", "GET", "/signup/").assert_body(|body| {
            let body = json_body(body);
            let urls: Vec<_> = body["choices"]
                .as_array()
                .unwrap()
                .iter()
                .map(|c| c["url"].as_str().unwrap().to_string())
                .collect();
            assert_eq!(urls, ["/signup/student/", "/signup/teacher/", "/signup/mentor/"]);
        }))
        .step(
            Action::new("choose teacher", "POST", "/signup/")
                .with_body(json!({ "role": "teacher" }))
                .redirects_to("/signup/teacher/"),
        )
        .step(
            Action::new("choose nonsense", "POST", "/signup/")
                .with_body(json!({ "role": "admin" }))
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            Action::new("teacher form", "GET", "/signup/teacher/").assert_body(|body| {
                let body = json_body(body);
                assert_eq!(body["user_type"], "teacher");
                assert!(body["fields"].as_array().unwrap().contains(&json!("bio")));
            }),
        )
        .step(Action::new("unknown form", "GET", "/signup/admin/").with_expect(StatusCode::NOT_FOUND))
        .step(
            signup_action("unspecified", "gus", None).with_expect(StatusCode::NOT_FOUND),
        )
        .run(&mut server, &db)
        .await;

    assert_eq!(db.count("users").await, 0);
}

#[tokio::test]
async fn login_and_logout() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;
    db.account("hal", onlineschool::model::entity::ProfileCreate::Mentor { about: String::new() })
        .await;

    Flow::new()
        .step(
            Action::new("wrong password", "POST", "/login/")
                .with_body(json!({ "username": "hal", "password": "nope-nope" }))
                .with_expect(StatusCode::UNAUTHORIZED)
                .assert_body(|body| assert!(body.contains("Authentication error"))),
        )
        .step(
            Action::new("unknown user", "POST", "/login/")
                .with_body(json!({ "username": "ivy", "password": "whatever1" }))
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        .step(
            login_action("hal")
                .assert_cookie(AUTH_TOKEN, |cookie| assert_eq!(cookie.http_only(), Some(true)))
                .assert_body(|body| {
                    let body = json_body(body);
                    assert_eq!(body["username"], "hal");
                    assert_eq!(body["role"], "mentor");
                    assert!(body.get("password_hash").is_none());
                }),
        )
        .step(Action::new("mentor list", "GET", "/mentors/"))
        .step(
            Action::new("logout", "POST", "/logout/")
                .redirects_to("/")
                .assert_cookie(AUTH_TOKEN, |cookie| assert_eq!(cookie.value(), "")),
        )
        .run(&mut server, &db)
        .await;
}

#[tokio::test]
async fn blank_email_is_accepted() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(
            Action::new("blank email", "POST", "/signup/student/").with_body(json!({
                "username": "ann",
                "password1": "s3cret-pass",
                "password2": "s3cret-pass",
                "email": "",
            })),
        )
        .run(&mut server, &db)
        .await;

    let email: String = sqlx::query_scalar("SELECT email FROM users WHERE username = 'ann'")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(email, "");
    assert_eq!(db.count("students").await, 1);
}

fn account_data(username: &str) -> AccountCreate {
    AccountCreate {
        username: username.to_string(),
        password_hash: hash_password("s3cret-pass").unwrap(),
        first_name: String::new(),
        last_name: String::new(),
        email: String::new(),
    }
}

#[tokio::test]
async fn failed_profile_insert_leaves_no_account() {
    let db = setup_test_db().await;
    let mm = db.model();

    let error = Account::create_with_profile(
        &mm,
        account_data("jon"),
        ProfileCreate::Student { course_id: Some(uuid::Uuid::new_v4()) },
    )
    .await
    .unwrap_err();

    assert!(error.is_foreign_key_violation());
    assert_eq!(db.count("users").await, 0);
    assert_eq!(db.count("students").await, 0);

    let mapped = signup_conflict(error).unwrap();
    assert_eq!(mapped.status_code(), StatusCode::BAD_REQUEST);
    assert!(mapped.field_errors().unwrap().get("course_id").is_some());
}

#[tokio::test]
async fn concurrent_duplicate_username_maps_to_field_error() {
    let db = setup_test_db().await;
    let mm = db.model();

    Account::create_with_profile(&mm, account_data("kim"), ProfileCreate::Mentor { about: String::new() })
        .await
        .unwrap();
    let error = Account::create_with_profile(
        &mm,
        account_data("kim"),
        ProfileCreate::Mentor { about: String::new() },
    )
    .await
    .unwrap_err();

    assert!(error.unique_violation().is_some());
    assert_eq!(db.count("users").await, 1);
    assert_eq!(db.count("mentors").await, 1);

    let mapped = signup_conflict(error).unwrap();
    assert_eq!(
        mapped.field_errors().unwrap().get("username").unwrap(),
        ["A user with that username already exists."]
    );
}

#[tokio::test]
async fn stale_session_cookie_falls_back_to_anonymous() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;
    server.do_not_save_cookies();
    let account = db
        .account("lea", ProfileCreate::Mentor { about: String::new() })
        .await;

    let jwt = Config::get_or_init(true).await.app().jwt();
    let expired = generate_token(UserClaims::for_user(account.id(), -2), jwt).unwrap();

    for token in [expired.as_str(), "garbage"] {
        let resp = server
            .get("/")
            .add_cookie(Cookie::new(AUTH_TOKEN, token.to_string()))
            .await;
        resp.assert_status_ok();
        assert_eq!(resp.cookie(AUTH_TOKEN).value(), "");

        let resp = server
            .get("/lessons/")
            .add_cookie(Cookie::new(AUTH_TOKEN, token.to_string()))
            .await;
        resp.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get("location").unwrap(), "/login/?next=/lessons/");

        let resp = server
            .post("/login/")
            .add_cookie(Cookie::new(AUTH_TOKEN, token.to_string()))
            .json(&json!({ "username": "lea", "password": common::PASSWORD }))
            .await;
        resp.assert_status_ok();
        assert!(!resp.cookie(AUTH_TOKEN).value().is_empty());
    }
}

#[tokio::test]
async fn session_cookie_expires_with_the_token() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(signup_action("mentor", "max", None).assert_cookie(AUTH_TOKEN, |cookie| {
            let hours = cookie.max_age().unwrap().whole_hours();
            assert_eq!(hours, 24);
        }))
        .run(&mut server, &db)
        .await;
}
