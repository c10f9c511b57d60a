use super::*;

const STORE: &str = "7d3c1a52-0a4e-4c8f-9d7e-2f1b6c9a8e01";

fn test_client(base_url: &str) -> CatalogClient {
    CatalogClient::with_base_url(
        base_url,
        "anon-key",
        Uuid::parse_str(STORE).expect("valid store id"),
        30,
        "storefront-test/0.1",
    )
    .expect("client construction should not fail")
}

#[test]
fn build_url_appends_table_and_query_pairs() {
    let client = test_client("https://example.supabase.co/rest/v1");
    let url = client.build_url(&Query::table("collection_products").eq("collection_id", "c1"));
    assert_eq!(
        url.as_str(),
        "https://example.supabase.co/rest/v1/collection_products?select=*&collection_id=eq.c1"
    );
}

#[test]
fn scoped_query_filters_by_store() {
    let client = test_client("https://example.supabase.co/rest/v1");
    let url = client.build_url(&client.scoped("products").eq("slug", "storage-box"));
    assert_eq!(
        url.as_str(),
        format!(
            "https://example.supabase.co/rest/v1/products?select=*&store_id=eq.{STORE}&slug=eq.storage-box"
        )
    );
}

#[test]
fn build_url_tolerates_trailing_slash() {
    let client = test_client("https://example.supabase.co/rest/v1/");
    let url = client.build_url(&Query::table("collections"));
    assert_eq!(url.path(), "/rest/v1/collections");
}

#[test]
fn build_url_encodes_list_syntax() {
    let client = test_client("https://example.supabase.co/rest/v1");
    let url = client.build_url(&Query::table("products").in_list("id", &["a", "b"]));
    let id = url
        .query_pairs()
        .find(|(k, _)| k == "id")
        .map(|(_, v)| v.into_owned());
    assert_eq!(id.as_deref(), Some("in.(a,b)"));
}

#[test]
fn with_base_url_rejects_garbage() {
    let result = CatalogClient::with_base_url("not a url", "k", Uuid::nil(), 30, "ua");
    assert!(matches!(result, Err(CatalogError::InvalidBaseUrl { .. })));
}

#[test]
fn session_debug_redacts_token() {
    let session = Session {
        user_id: Uuid::nil(),
        access_token: "secret-jwt".to_owned(),
    };
    let rendered = format!("{session:?}");
    assert!(!rendered.contains("secret-jwt"));
    assert!(rendered.contains("[redacted]"));
}
