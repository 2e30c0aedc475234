//! Request dispatch tests.
//!
//! Uses wiremock to stand in for the REST API and checks the method, URL and
//! body of every terminal operation.

use rqbuilder::{Client, Config, Method, ResourceConfig, RqError, SortDirection};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn no_api() -> ResourceConfig {
    ResourceConfig::append_api_to_request(false)
}

fn client(server: &MockServer) -> Client {
    Client::install(Config::new(server.uri(), true)).unwrap()
}

#[tokio::test]
async fn test_get_executes_a_get_request() {
    let server = MockServer::start().await;
    let res_data = json!({"data": ["id"]});

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&res_data))
        .expect(1)
        .mount(&server)
        .await;

    let builder = client(&server).make_with("users", no_api()).get().await.unwrap();

    let response = builder.response().unwrap();
    assert_eq!(response.method, Method::Get);
    assert_eq!(response.url, format!("{}/users?", server.uri()));
    assert_eq!(builder.data(), Some(&res_data));
}

#[tokio::test]
async fn test_find_requests_a_single_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let builder = client(&server).make_with("users", no_api()).find(1).await.unwrap();

    let response = builder.response().unwrap();
    assert_eq!(response.method, Method::Get);
    assert_eq!(response.url, format!("{}/users/1?", server.uri()));
}

#[tokio::test]
async fn test_all_ignores_every_facet() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": ["id"]})))
        .expect(1)
        .mount(&server)
        .await;

    let builder = client(&server)
        .make_with("users", no_api())
        .with(["sa"])
        .unwrap()
        .filter("role", "admin")
        .unwrap()
        .page(3)
        .all()
        .await
        .unwrap();

    let response = builder.response().unwrap();
    assert_eq!(response.method, Method::Get);
    assert_eq!(response.url, format!("{}/users", server.uri()));
}

#[tokio::test]
async fn test_get_sends_the_composed_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("search", "searchkey"))
        .and(query_param("include", "posts,items"))
        .and(query_param("sort", "-created_at"))
        .and(query_param("filter[username]", "ahmed"))
        .and(query_param("filter[conversation_id]", "2,3"))
        .and(query_param("page", "2"))
        .and(query_param("perPage", "5"))
        .and(query_param("limit", "4"))
        .and(query_param("offset", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .make("users")
        .filter("username", "ahmed")
        .unwrap()
        .filter_in("conversation_id", [2, 3])
        .unwrap()
        .order_by("created_at", SortDirection::Desc)
        .offset(5)
        .unwrap()
        .per_page(5)
        .page(2)
        .append("search", "searchkey")
        .with(["posts", "items"])
        .unwrap()
        .limit(4)
        .unwrap()
        .get()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_posts_the_body() {
    let server = MockServer::start().await;
    let data = json!({"name": "ds"});

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(&data))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": ["id"]})))
        .expect(1)
        .mount(&server)
        .await;

    let builder = client(&server)
        .make_with("users", no_api())
        .create(&data)
        .await
        .unwrap();

    let response = builder.response().unwrap();
    assert_eq!(response.method, Method::Post);
    assert_eq!(response.url, format!("{}/users?", server.uri()));
    assert_eq!(response.body, Some(data));
}

#[tokio::test]
async fn test_update_puts_the_body() {
    let server = MockServer::start().await;
    let data = json!({"name": "ds"});

    Mock::given(method("PUT"))
        .and(path("/users/1"))
        .and(body_json(&data))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": ["id"]})))
        .expect(1)
        .mount(&server)
        .await;

    let builder = client(&server)
        .make_with("users", no_api())
        .update(1, &data)
        .await
        .unwrap();

    let response = builder.response().unwrap();
    assert_eq!(response.method, Method::Put);
    assert_eq!(response.url, format!("{}/users/1?", server.uri()));
    assert_eq!(response.body, Some(data));
}

#[tokio::test]
async fn test_delete_sends_a_delete_request() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let builder = client(&server)
        .make_with("users", no_api())
        .delete(1)
        .await
        .unwrap();

    let response = builder.response().unwrap();
    assert_eq!(response.method, Method::Delete);
    assert_eq!(response.status, 204);
    assert_eq!(response.url, format!("{}/users/1?", server.uri()));
    assert!(response.data.is_null());
}

#[tokio::test]
async fn test_nested_resource_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/1/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 7}])))
        .expect(1)
        .mount(&server)
        .await;

    let posts = client(&server)
        .make_raw("posts")
        .from("users", 1)
        .get()
        .await
        .unwrap();

    assert_eq!(posts, json!([{"id": 7}]));
}

#[tokio::test]
async fn test_path_helpers() {
    let server = MockServer::start().await;
    let data = json!({"name": "ds"});

    for verb in ["GET", "POST", "PUT", "DELETE"] {
        Mock::given(method(verb))
            .and(path("/admin/sanitize"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": ["id"]})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client(&server);
    let full_path = format!("{}/admin/sanitize", server.uri());

    let res = client.get_path("admin/sanitize").await.unwrap();
    assert_eq!(res.method, Method::Get);
    assert_eq!(res.url, full_path);

    let res = client.post_path("admin/sanitize", &data).await.unwrap();
    assert_eq!(res.method, Method::Post);
    assert_eq!(res.body.as_ref(), Some(&data));
    assert_eq!(res.url, full_path);

    let res = client.put_path("admin/sanitize", &data).await.unwrap();
    assert_eq!(res.method, Method::Put);
    assert_eq!(res.body.as_ref(), Some(&data));

    let res = client.delete_path("admin/sanitize").await.unwrap();
    assert_eq!(res.method, Method::Delete);
    assert_eq!(res.url, full_path);
}

#[tokio::test]
async fn test_server_error_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/9"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "User not found"})),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .make_with("users", no_api())
        .find(9)
        .await
        .unwrap_err();

    assert!(err.is_transport());
    match err {
        RqError::ApiError {
            message,
            status_code,
        } => {
            assert_eq!(message, "User not found");
            assert_eq!(status_code, Some(404));
        }
        other => panic!("Expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let err = client(&server)
        .make_with("users", no_api())
        .get()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RqError::RateLimited {
            retry_after_secs: Some(30)
        }
    ));
}

#[tokio::test]
async fn test_installed_hooks_see_every_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [1, 2]})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = Config::new(server.uri(), false)
        .on_success(|mut response| {
            response.data = response.data["data"].take();
            Ok(response)
        })
        .on_error(|err| match err.status_code() {
            Some(500) => Err(RqError::ApiError {
                message: "server unavailable".to_string(),
                status_code: Some(503),
            }),
            _ => Err(err),
        });
    let client = Client::install(config).unwrap();

    let users = client.make("users").get().await.unwrap();
    assert_eq!(users.data(), Some(&json!([1, 2])));

    let err = client.get_path("broken").await.unwrap_err();
    assert_eq!(err.status_code(), Some(503));
}
