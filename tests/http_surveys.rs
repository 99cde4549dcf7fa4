mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    admin_json, admin_request, create_option, create_survey, get_option, read_json, test_app,
    ADMIN_TOKEN,
};
use tower::ServiceExt;

#[tokio::test]
async fn create_then_retrieve_survey() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(admin_json(
            "POST",
            "/survey/",
            serde_json::json!({ "name": "Name", "description": "Description" }),
        ))
        .await
        .expect("create");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json(response).await;
    let id = created["id"].as_i64().expect("id");
    assert_eq!(created["name"], "Name");

    let response = app
        .clone()
        .oneshot(admin_request("GET", &format!("/survey/{id}")))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    assert_eq!(
        payload,
        serde_json::json!({ "id": id, "name": "Name", "description": "Description" })
    );
}

#[tokio::test]
async fn list_returns_every_survey() {
    let app = test_app();
    create_survey(&app, "first", "one").await;
    create_survey(&app, "second", "two").await;

    let response = app
        .clone()
        .oneshot(admin_request("GET", "/survey/"))
        .await
        .expect("list");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json(response).await;
    let names: Vec<&str> = payload
        .as_array()
        .expect("array")
        .iter()
        .map(|s| s["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[tokio::test]
async fn create_accepts_form_bodies() {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/survey/")
        .header("authorization", format!("Bearer {ADMIN_TOKEN}"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("name=Name&description=Some+Description"))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("create");
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(read_json(response).await["description"], "Some Description");
}

fn multipart_request(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let boundary = "survey-test-boundary";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {ADMIN_TOKEN}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .expect("request")
}

#[tokio::test]
async fn create_accepts_multipart_bodies() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(multipart_request(
            "/survey/",
            &[("name", "Name & Co"), ("description", "Description")],
        ))
        .await
        .expect("create survey");
    assert_eq!(response.status(), StatusCode::CREATED);
    let survey = read_json(response).await;
    assert_eq!(survey["name"], "Name & Co");
    let survey_id = survey["id"].as_i64().expect("id").to_string();

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/option/",
            &[
                ("survey", survey_id.as_str()),
                ("description", "Yes"),
                ("position", "2"),
            ],
        ))
        .await
        .expect("create option");
    assert_eq!(response.status(), StatusCode::CREATED);
    let option = read_json(response).await;
    assert_eq!(option["position"], 2);
    assert_eq!(option["votes"], 0);

    let response = app
        .clone()
        .oneshot(multipart_request("/survey/", &[("name", "Name")]))
        .await
        .expect("create survey");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["message"], "description is required");
}

#[tokio::test]
async fn create_rejects_nul_characters() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(admin_json(
            "POST",
            "/survey/",
            serde_json::json!({ "name": "a\u{0000}b", "description": "Description" }),
        ))
        .await
        .expect("create");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["code"], "validation_error");
    assert_eq!(payload["message"], "name may not contain NUL characters");

    let response = app
        .clone()
        .oneshot(admin_request("GET", "/survey/"))
        .await
        .expect("list");
    assert_eq!(read_json(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn create_rejects_missing_or_blank_fields() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(admin_json(
            "POST",
            "/survey/",
            serde_json::json!({ "name": "Name" }),
        ))
        .await
        .expect("create");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json(response).await;
    assert_eq!(payload["code"], "validation_error");
    assert_eq!(payload["message"], "description is required");

    let response = app
        .clone()
        .oneshot(admin_json(
            "POST",
            "/survey/",
            serde_json::json!({ "name": " ", "description": "Description" }),
        ))
        .await
        .expect("create");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_rejects_malformed_and_unsupported_bodies() {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/survey/")
        .header("authorization", format!("Bearer {ADMIN_TOKEN}"))
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("create");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method("POST")
        .uri("/survey/")
        .header("authorization", format!("Bearer {ADMIN_TOKEN}"))
        .header("content-type", "text/plain")
        .body(Body::from("name=Name"))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("create");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["code"], "validation_error");
}

#[tokio::test]
async fn update_replaces_name_and_description() {
    let app = test_app();
    let id = create_survey(&app, "Name", "Description").await;

    // Clients commonly send the whole record back, id included.
    let response = app
        .clone()
        .oneshot(admin_json(
            "PUT",
            &format!("/survey/{id}"),
            serde_json::json!({
                "id": id,
                "name": "Other Name",
                "description": "Other Description"
            }),
        ))
        .await
        .expect("update");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(admin_request("GET", &format!("/survey/{id}")))
        .await
        .expect("get");
    let payload = read_json(response).await;
    assert_eq!(payload["name"], "Other Name");
    assert_eq!(payload["description"], "Other Description");
}

#[tokio::test]
async fn update_requires_both_fields() {
    let app = test_app();
    let id = create_survey(&app, "Name", "Description").await;
    let response = app
        .clone()
        .oneshot(admin_json(
            "PUT",
            &format!("/survey/{id}"),
            serde_json::json!({ "name": "Only Name" }),
        ))
        .await
        .expect("update");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(admin_request("GET", &format!("/survey/{id}")))
        .await
        .expect("get");
    assert_eq!(read_json(response).await["name"], "Name");
}

#[tokio::test]
async fn missing_surveys_are_not_found() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(admin_request("GET", "/survey/999"))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json(response).await["code"], "not_found");

    let response = app
        .clone()
        .oneshot(admin_json(
            "PUT",
            "/survey/999",
            serde_json::json!({ "name": "Name", "description": "Description" }),
        ))
        .await
        .expect("update");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(admin_request("DELETE", "/survey/999"))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_id_is_a_validation_error() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(admin_request("GET", "/survey/abc"))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["code"], "validation_error");
}

#[tokio::test]
async fn delete_removes_survey_and_its_options() {
    let app = test_app();
    let id = create_survey(&app, "Name", "Description").await;
    let option_id = create_option(&app, id, "Description", 1).await;

    let response = app
        .clone()
        .oneshot(admin_request("DELETE", &format!("/survey/{id}")))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(admin_request("GET", &format!("/survey/{id}")))
        .await
        .expect("get");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_option(&app, option_id).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
