//! Integration tests for cmsgraph_sdk against a mock Graph endpoint.

use cmsgraph_schema::{BaseType, ContentTypeDefinition, PropertyDefinition, SchemaRegistry};
use cmsgraph_sdk::{ClientConfig, ErrorCode, GraphClient, GraphError, PreviewParams};
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GRAPH_PATH: &str = "/content/v2";

fn registry() -> SchemaRegistry {
    SchemaRegistry::with_content_types([
        ContentTypeDefinition::new("Article", BaseType::Page)
            .property("title", PropertyDefinition::string())
            .property("image", PropertyDefinition::content_reference()),
        ContentTypeDefinition::new("Hero", BaseType::Component)
            .property("heading", PropertyDefinition::string()),
    ])
    .unwrap()
}

fn client(server: &MockServer) -> GraphClient {
    let config = ClientConfig::new(format!("{}{GRAPH_PATH}", server.uri()), "single-key");
    GraphClient::new(config, registry()).unwrap()
}

fn probe(types: Value, dam: bool) -> Value {
    let item = if types.is_null() {
        Value::Null
    } else {
        json!({ "_metadata": { "types": types } })
    };
    let dam_asset_type = if dam {
        json!({ "__typename": "__Type" })
    } else {
        Value::Null
    };
    json!({
        "data": {
            "_Content": { "item": item },
            "damAssetType": dam_asset_type
        }
    })
}

async fn mount_probe(server: &MockServer, types: Value, dam: bool) {
    Mock::given(method("POST"))
        .and(path(GRAPH_PATH))
        .and(body_string_contains("GetContentMetadata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(probe(types, dam)))
        .mount(server)
        .await;
}

fn article_items() -> Value {
    json!({
        "data": {
            "_Content": {
                "items": [{
                    "__typename": "Article",
                    "_id": "a1",
                    "Article__title": "Hello",
                    "image": { "key": "img", "url": { "default": "/img.png" } }
                }]
            }
        }
    })
}

#[tokio::test]
async fn test_content_by_path() {
    let server = MockServer::start().await;
    mount_probe(&server, json!(["Article", "_Page", "_Content"]), false).await;
    Mock::given(method("POST"))
        .and(path(GRAPH_PATH))
        .and(query_param("auth", "single-key"))
        .and(body_string_contains("ListContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(article_items()))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server);
    let with_slash = client.get_content_by_path("/en/news/", None).await.unwrap();
    let without_slash = client.get_content_by_path("/en/news", None).await.unwrap();

    assert_eq!(with_slash, without_slash);
    assert_eq!(with_slash.len(), 1);
    assert_eq!(with_slash[0]["title"], "Hello");
    assert!(with_slash[0].get("Article__title").is_none());
}

#[tokio::test]
async fn test_path_filter_is_sent_as_variables() {
    let server = MockServer::start().await;
    mount_probe(&server, Value::Null, false).await;

    client(&server)
        .get_content_by_path("/en/news/", Some("https://example.com"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let alternatives = &body["variables"]["where"]["_and"][0]["_or"];
    assert_eq!(alternatives[0]["_metadata"]["url"]["default"]["eq"], "/en/news");
    assert_eq!(alternatives[1]["_metadata"]["url"]["default"]["eq"], "/en/news/");
}

#[tokio::test]
async fn test_content_by_path_not_found_is_empty() {
    let server = MockServer::start().await;
    mount_probe(&server, Value::Null, false).await;
    Mock::given(method("POST"))
        .and(path(GRAPH_PATH))
        .and(body_string_contains("ListContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(article_items()))
        .expect(0)
        .mount(&server)
        .await;

    let items = client(&server)
        .get_content_by_path("/missing", None)
        .await
        .unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_dam_probe_controls_asset_fragments() {
    let server = MockServer::start().await;
    mount_probe(&server, json!(["Article"]), true).await;
    Mock::given(method("POST"))
        .and(path(GRAPH_PATH))
        .and(body_string_contains("ListContent"))
        .and(body_string_contains("fragment PublicImageAsset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(article_items()))
        .expect(1)
        .mount(&server)
        .await;

    let items = client(&server).get_content_by_path("/", None).await.unwrap();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn test_preview_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPH_PATH))
        .and(header("authorization", "Bearer preview-token"))
        .and(body_string_contains("GetContentMetadata"))
        .respond_with(ResponseTemplate::new(200).set_body_json(probe(json!(["Article"]), false)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPH_PATH))
        .and(header("authorization", "Bearer preview-token"))
        .and(body_string_contains("GetContent("))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "_Content": {
                    "item": {
                        "__typename": "Article",
                        "_id": "a1",
                        "Article__title": "Draft",
                        "hero": { "__typename": "HeroProperty", "HeroProperty__heading": "Hi" }
                    }
                }
            }
        })))
        .mount(&server)
        .await;

    let params = PreviewParams::new("preview-token", "a1").ctx("edit").ver("4");
    let item = client(&server).get_preview_content(&params).await.unwrap();

    let context = json!({ "edit": true, "preview_token": "preview-token" });
    assert_eq!(item["title"], "Draft");
    assert_eq!(item["__context"], context);
    assert_eq!(item["hero"]["heading"], "Hi");
    assert_eq!(item["hero"]["__context"], context);
}

#[tokio::test]
async fn test_preview_not_found_is_error() {
    let server = MockServer::start().await;
    mount_probe(&server, Value::Null, false).await;

    let err = client(&server)
        .get_preview_content(&PreviewParams::new("tok", "missing"))
        .await
        .unwrap_err();

    assert!(matches!(err, GraphError::NoContentForKey { ref key } if key == "missing"));
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn test_http_error_keeps_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPH_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_content_by_path("/", None)
        .await
        .unwrap_err();

    match &err {
        GraphError::HttpResponse { status, body, request } => {
            assert_eq!(*status, 502);
            assert_eq!(body, "Bad Gateway");
            assert!(request.query.contains("GetContentMetadata"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_status_with_graphql_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPH_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [{ "message": "Unknown type \"Nope\"" }]
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_content_by_path("/", None)
        .await
        .unwrap_err();

    match &err {
        GraphError::ContentResponse { status, errors, .. } => {
            assert_eq!(*status, 400);
            assert_eq!(errors[0].message, "Unknown type \"Nope\"");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let variables = &err.request().unwrap().variables;
    assert_eq!(
        variables["where"]["_or"][0]["_metadata"]["url"]["default"]["eq"],
        "/"
    );
}

#[tokio::test]
async fn test_success_status_with_graphql_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "Syntax Error", "locations": [{ "line": 1, "column": 1 }] }]
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_content_by_path("/", None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ContentResponse);
    assert_eq!(err.status(), Some(200));
}

#[tokio::test]
async fn test_missing_data_is_unexpected_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_content_by_path("/", None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::UnexpectedShape);
    assert!(err.to_string().contains("contact support"));
}

#[tokio::test]
async fn test_non_string_content_type_is_unexpected_shape() {
    for types in [json!([42]), json!("Article")] {
        let server = MockServer::start().await;
        mount_probe(&server, types, false).await;
        Mock::given(method("POST"))
            .and(path(GRAPH_PATH))
            .and(body_string_contains("ListContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(article_items()))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server)
            .get_content_by_path("/en/", None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnexpectedShape);
        assert!(err.to_string().contains("contact support"));
        assert!(err.request().is_some());
    }
}

#[tokio::test]
async fn test_unreachable_graph() {
    let config = ClientConfig::new("http://127.0.0.1:1/content/v2", "key");
    let client = GraphClient::new(config, registry()).unwrap();

    let err = client.get_content_by_path("/", None).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::GraphUnreachable);
    assert!(err.request().is_some());
}

#[tokio::test]
async fn test_unregistered_type_is_schema_error() {
    let server = MockServer::start().await;
    mount_probe(&server, json!(["Unknown"]), false).await;

    let err = client(&server)
        .get_content_by_path("/", None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::SchemaError);
}

fn link(key: &str, hierarchical: &str, sort_order: Option<i64>) -> Value {
    json!({
        "_metadata": {
            "key": key,
            "displayName": key,
            "locale": "en",
            "types": ["StandardPage", "_Page"],
            "sortOrder": sort_order,
            "url": {
                "base": "https://example.com",
                "hierarchical": hierarchical,
                "default": hierarchical
            }
        }
    })
}

fn links_response(items: Vec<Value>) -> Value {
    json!({
        "data": {
            "_Content": {
                "item": { "_id": "root", "_link": { "_Page": { "items": items } } }
            }
        }
    })
}

#[tokio::test]
async fn test_ancestor_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPH_PATH))
        .and(body_string_contains("GetAncestorPath"))
        .respond_with(ResponseTemplate::new(200).set_body_json(links_response(vec![
            link("news", "/en/news/", None),
            json!({ "_metadata": null }),
            link("home", "/en/", None),
        ])))
        .mount(&server)
        .await;

    let ancestors = client(&server)
        .get_ancestor_path("/en/news/article", None)
        .await
        .unwrap()
        .unwrap();

    let keys: Vec<_> = ancestors.iter().map(|l| l.key.as_deref().unwrap()).collect();
    assert_eq!(keys, ["home", "news"]);
}

#[tokio::test]
async fn test_child_items() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPH_PATH))
        .and(body_string_contains("GetChildItems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(links_response(vec![
            link("b", "/en/b/", Some(200)),
            link("unsorted", "/en/u/", None),
            link("a", "/en/a/", Some(100)),
        ])))
        .mount(&server)
        .await;

    let client = client(&server);
    let children = client.get_child_items("/en/", None).await.unwrap().unwrap();
    let keys: Vec<_> = children.iter().map(|l| l.key.as_deref().unwrap()).collect();
    assert_eq!(keys, ["a", "b", "unsorted"]);

    let all = client
        .get_child_items_for(&["/en/", "/sv/"], None)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|children| children.as_ref().unwrap().len() == 3));
}

#[tokio::test]
async fn test_links_for_missing_item() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "_Content": { "item": { "_id": null, "_link": null } } }
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(client.get_ancestor_path("/gone", None).await.unwrap().is_none());
    assert!(client.get_child_items("/gone", None).await.unwrap().is_none());
}
