use actix_web::http::{header::ContentType, StatusCode};
use actix_web::{test, web, App};
use config::{Config, File, FileFormat};
use infra::config::{AppConfigImpl, DatabaseConfig};
use infra::repository::postgres::schema::create_artist_table;
use serde_json::{json, Value};
use server::AppState;
use std::time::Duration;

macro_rules! app {
    ($state:expr) => {
        App::new()
            .app_data($state.clone())
            .configure(server::native_api::configure_service)
            .default_service(web::route().to(server::error::page_not_found))
    };
}

async fn state() -> web::Data<AppState> {
    let app_cfg = AppConfigImpl::from_config(
        Config::builder()
            .add_source(File::from_str(
                "[database]\nurl = \"sqlite::memory:\"",
                FileFormat::Toml,
            ))
            .build()
            .unwrap(),
    )
    .unwrap();

    let db_cfg = DatabaseConfig {
        max_connections: 1,
        min_connections: 1,
        connect_timeout: Duration::from_secs(5),
        ..app_cfg.database()
    };
    let db = AppState::init_db(&db_cfg).await.unwrap();
    create_artist_table(&db).await.unwrap();
    web::Data::new(AppState::new(db, app_cfg))
}

async fn seed(state: &web::Data<AppState>, usernames: &[&str]) {
    for (i, username) in usernames.iter().enumerate() {
        state
            .artist_service
            .create(&json!({
                "username": username,
                "artist_name": format!("{} name", username),
                "artist_genre": "Rock",
                "album_recorded": i + 1,
            }))
            .await
            .unwrap();
    }
}

fn patrick() -> Value {
    json!({
        "username": "Patrick",
        "artist_name": "Patrick Star",
        "artist_genre": "Heavy Metal",
        "album_recorded": 2,
    })
}

#[actix_web::test]
async fn test_list_returns_every_artist() {
    let state = state().await;
    seed(&state, &["squidward", "patrick", "sandy"]).await;
    let app = test::init_service(app!(state)).await;

    let req = test::TestRequest::get().uri("/artists").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["patrick", "sandy", "squidward"]);
}

#[actix_web::test]
async fn test_list_empty() {
    let state = state().await;
    let app = test::init_service(app!(state)).await;

    let req = test::TestRequest::get().uri("/artists").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"data": []}));
}

#[actix_web::test]
async fn test_list_paging() {
    let state = state().await;
    seed(
        &state,
        &["u1", "u2", "u3", "u4", "u5", "u6", "u7", "u8", "u9"],
    )
    .await;
    let app = test::init_service(app!(state)).await;

    let req = test::TestRequest::get()
        .uri("/artists/page/1?limit=2")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["username"], "u1");
    assert_eq!(
        body["paging"],
        json!({"page": 1, "total_item": 9, "total_page": 5, "item_per_page": 2})
    );

    let req = test::TestRequest::get()
        .uri("/artists/page/5?limit=2&sort=desc")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["username"], "u9");
}

#[actix_web::test]
async fn test_list_paging_default_limit() {
    let state = state().await;
    seed(&state, &["a", "b", "c", "d", "e", "f", "g"]).await;
    let app = test::init_service(app!(state)).await;

    let req = test::TestRequest::get().uri("/artists/page/2").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["paging"],
        json!({"page": 2, "total_item": 7, "total_page": 2, "item_per_page": 5})
    );
}

#[actix_web::test]
async fn test_list_paging_rejects_invalid_params() {
    let state = state().await;
    let app = test::init_service(app!(state)).await;

    let req = test::TestRequest::get()
        .uri("/artists/page/abc?limit=0")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({"error": "\"page\" must be a number. \"limit\" must be a positive number"})
    );
}

#[actix_web::test]
async fn test_create() {
    let state = state().await;
    let app = test::init_service(app!(state)).await;

    let req = test::TestRequest::post()
        .uri("/artists")
        .set_json(patrick())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"data": patrick()}));
}

#[actix_web::test]
async fn test_create_with_username_only() {
    let state = state().await;
    let app = test::init_service(app!(state)).await;

    let req = test::TestRequest::post()
        .uri("/artists")
        .set_json(json!({"username": "gary"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["data"],
        json!({
            "username": "gary",
            "artist_name": null,
            "artist_genre": null,
            "album_recorded": null,
        })
    );
}

#[actix_web::test]
async fn test_create_duplicate_username() {
    let state = state().await;
    let app = test::init_service(app!(state)).await;

    let req = test::TestRequest::post()
        .uri("/artists")
        .set_json(patrick())
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::post()
        .uri("/artists")
        .set_json(patrick())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Username Patrick already exists"}));
}

#[actix_web::test]
async fn test_create_missing_username() {
    let state = state().await;
    let app = test::init_service(app!(state)).await;

    let req = test::TestRequest::post()
        .uri("/artists")
        .set_json(json!({"artist_name": "Patrick Star"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "\"username\" is required"}));

    let req = test::TestRequest::get().uri("/artists").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"data": []}));
}

#[actix_web::test]
async fn test_create_malformed_json() {
    let state = state().await;
    let app = test::init_service(app!(state)).await;

    let req = test::TestRequest::post()
        .uri("/artists")
        .insert_header(ContentType::json())
        .set_payload("{\"username\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn test_get() {
    let state = state().await;
    seed(&state, &["Patrick"]).await;
    let app = test::init_service(app!(state)).await;

    let req = test::TestRequest::get().uri("/artists/patrick").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["username"], "Patrick");
    assert_eq!(body["data"]["artist_name"], "Patrick name");
}

#[actix_web::test]
async fn test_get_unknown() {
    let state = state().await;
    let app = test::init_service(app!(state)).await;

    let req = test::TestRequest::get().uri("/artists/nobody").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Artist not found"}));
}

#[actix_web::test]
async fn test_update() {
    let state = state().await;
    seed(&state, &["patrick"]).await;
    let app = test::init_service(app!(state)).await;

    let changes = json!({
        "artist_name": "Patrick si bintang",
        "artist_genre": "Pop",
        "album_recorded": 4,
    });
    for _ in 0..2 {
        let req = test::TestRequest::patch()
            .uri("/artists/patrick")
            .set_json(changes.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body["data"],
            json!({
                "username": "patrick",
                "artist_name": "Patrick si bintang",
                "artist_genre": "Pop",
                "album_recorded": 4,
            })
        );
    }
}

#[actix_web::test]
async fn test_update_ignores_extra_body_fields() {
    let state = state().await;
    seed(&state, &["patrick"]).await;
    let app = test::init_service(app!(state)).await;

    let req = test::TestRequest::patch()
        .uri("/artists/patrick")
        .set_json(json!({
            "username": "spongebob",
            "artist_name": "Patrick si bintang",
            "artist_genre": "Pop",
            "album_recorded": "4",
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["username"], "patrick");
    assert_eq!(body["data"]["album_recorded"], 4);
}

#[actix_web::test]
async fn test_update_partial_payload() {
    let state = state().await;
    seed(&state, &["patrick"]).await;
    let app = test::init_service(app!(state)).await;

    let req = test::TestRequest::patch()
        .uri("/artists/patrick")
        .set_json(json!({"artist_name": "Patrick si bintang"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({"error": "\"artist_genre\" is required. \"album_recorded\" is required"})
    );

    let req = test::TestRequest::get().uri("/artists/patrick").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["artist_name"], "patrick name");
}

#[actix_web::test]
async fn test_update_unknown() {
    let state = state().await;
    let app = test::init_service(app!(state)).await;

    let req = test::TestRequest::patch()
        .uri("/artists/nobody")
        .set_json(json!({
            "artist_name": "Nobody",
            "artist_genre": "None",
            "album_recorded": 1,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Username not found"}));
}

#[actix_web::test]
async fn test_remove_then_get() {
    let state = state().await;
    seed(&state, &["patrick"]).await;
    let app = test::init_service(app!(state)).await;

    let req = test::TestRequest::delete().uri("/artists/patrick").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"data": "OK"}));

    let req = test::TestRequest::get().uri("/artists/patrick").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::delete().uri("/artists/patrick").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Artist not found"}));
}

#[actix_web::test]
async fn test_unknown_route() {
    let state = state().await;
    seed(&state, &["patrick"]).await;
    let app = test::init_service(app!(state)).await;

    let requests = [
        test::TestRequest::get().uri("/"),
        test::TestRequest::get().uri("/songs"),
        test::TestRequest::get().uri("/artists/patrick/albums"),
        test::TestRequest::put().uri("/artists/patrick"),
        test::TestRequest::post().uri("/artists/patrick"),
        test::TestRequest::delete().uri("/artists"),
        test::TestRequest::patch().uri("/artists"),
        test::TestRequest::post().uri("/artists/page/1"),
        test::TestRequest::delete().uri("/artists/page/1"),
    ];
    for req in requests {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"error": "Page not found"}));
    }

    let req = test::TestRequest::get().uri("/artists/patrick").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_non_ascii_username() {
    let state = state().await;
    let app = test::init_service(app!(state)).await;

    let req = test::TestRequest::post()
        .uri("/artists")
        .set_json(json!({"username": "Émile"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["username"], "Émile");

    let req = test::TestRequest::get()
        .uri("/artists/%C3%89mile")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["username"], "Émile");

    let req = test::TestRequest::patch()
        .uri("/artists/%C3%89mile")
        .set_json(json!({
            "artist_name": "Émile",
            "artist_genre": "Chanson",
            "album_recorded": 3,
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri("/artists/%C3%89mile")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_create_username_differing_only_in_case() {
    let state = state().await;
    seed(&state, &["Patrick"]).await;
    let app = test::init_service(app!(state)).await;

    let req = test::TestRequest::post()
        .uri("/artists")
        .set_json(json!({"username": "patrick"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Username patrick already exists"}));

    for uri in ["/artists/patrick", "/artists/Patrick"] {
        let req = test::TestRequest::patch()
            .uri(uri)
            .set_json(json!({
                "artist_name": "Patrick si bintang",
                "artist_genre": "Pop",
                "album_recorded": 4,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["username"], "Patrick");
    }

    let req = test::TestRequest::delete().uri("/artists/patrick").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}
