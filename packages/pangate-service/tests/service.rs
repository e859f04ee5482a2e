use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
};

use axum::{
	Router,
	body::Body,
	extract::Query,
	http::{
		HeaderMap, HeaderName, StatusCode,
		header::{ACCEPT, CONTENT_TYPE, REFERER, USER_AGENT},
	},
	response::Response,
	routing::get,
};
use serde_json::json;

use pangate_domain::{RawInput, SourceType};
use pangate_providers::{
	BROWSER_USER_AGENT, PROVIDER_REFERER,
	catalog::JSON_ACCEPT,
	image::{IMAGE_ACCEPT, ImageRelay},
};
use pangate_service::{Error, GatewayService};
use pangate_testkit::{StubEngine, UpstreamServer, stub_providers, test_config};

const IMAGE_HOST: &str = "img3.doubanio.com";

fn header(headers: &HeaderMap, name: HeaderName) -> Option<&str> {
	headers.get(name).and_then(|value| value.to_str().ok())
}

fn service_with_images(upstream: &UpstreamServer) -> GatewayService {
	let client = upstream.resolving_client(IMAGE_HOST).expect("Failed to build client.");
	let mut service =
		GatewayService::with_providers(test_config(), stub_providers(StubEngine::returning(json!({})), &[]))
			.expect("Failed to build service.");

	service.images = ImageRelay::new(client);

	service
}

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
	pairs.iter().map(|(key, value)| (key.to_string(), value.to_string())).collect()
}

#[tokio::test]
async fn search_dispatches_canonical_request() {
	let engine = StubEngine::returning(json!({ "total": 1 }));
	let service = GatewayService::with_providers(test_config(), stub_providers(engine.clone(), &[]))
		.expect("Failed to build service.");
	let query = params(&[("kw", "dune"), ("src", "tg"), ("plugins", "labi")]);
	let result = service.search(RawInput::Query(&query)).await.expect("search failed");

	assert_eq!(result, json!({ "total": 1 }));

	let call = engine.last_call().expect("engine was not called");

	assert_eq!(call.keyword, "dune");
	assert_eq!(call.source_type, SourceType::Telegram);
	assert_eq!(call.plugins, None);
	assert_eq!(
		call.channels,
		Some(vec!["tgsearchers3".to_string(), "Aliyun_4K_Movies".to_string()])
	);
}

#[tokio::test]
async fn invalid_input_never_reaches_engine() {
	let engine = StubEngine::returning(json!({}));
	let service = GatewayService::with_providers(test_config(), stub_providers(engine.clone(), &[]))
		.expect("Failed to build service.");
	let query = params(&[("kw", "dune"), ("ext", "{bad")]);
	let err = service.search(RawInput::Query(&query)).await.expect_err("expected rejection");

	assert!(matches!(err, Error::InvalidRequest(_)));
	assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn engine_failure_is_wrapped() {
	let engine = StubEngine::failing("all channels timed out");
	let service = GatewayService::with_providers(test_config(), stub_providers(engine, &[]))
		.expect("Failed to build service.");
	let err = service
		.search(RawInput::Body(br#"{"kw":"dune"}"#))
		.await
		.expect_err("expected engine failure");

	assert!(matches!(err, Error::Engine { .. }));
	assert_eq!(err.to_string(), "Search failed: all channels timed out");
}

#[test]
fn health_discloses_plugins_only_when_enabled() {
	let engine = StubEngine::returning(json!({}));
	let service =
		GatewayService::with_providers(test_config(), stub_providers(engine.clone(), &["labi", "zhizhen"]))
			.expect("Failed to build service.");
	let report = service.health();

	assert_eq!(report.channels_count, 2);
	assert_eq!(report.plugin_count, Some(2));
	assert_eq!(report.plugins, Some(vec!["labi".to_string(), "zhizhen".to_string()]));

	let mut cfg = test_config();

	cfg.search.plugins_enabled = false;

	let service = GatewayService::with_providers(cfg, stub_providers(engine, &["labi"]))
		.expect("Failed to build service.");
	let value = serde_json::to_value(service.health()).expect("Failed to encode report.");
	let object = value.as_object().expect("report must be an object");

	assert_eq!(value["plugins_enabled"], false);
	assert!(!object.contains_key("plugin_count"));
	assert!(!object.contains_key("plugins"));
}

#[tokio::test]
async fn catalog_forwarding_passes_body_through() {
	let seen = Arc::new(Mutex::new(Vec::<(HashMap<String, String>, HeaderMap)>::new()));
	let recorder = seen.clone();
	let router = Router::new().route(
		"/j/search_subjects",
		get(move |headers: HeaderMap, Query(query): Query<HashMap<String, String>>| {
			let recorder = recorder.clone();

			async move {
				recorder.lock().unwrap_or_else(|err| err.into_inner()).push((query, headers));

				"{\"subjects\": [ {\"title\":\"繁花\"} ]}"
			}
		}),
	);
	let upstream = UpstreamServer::spawn(router).await.expect("Failed to spawn upstream.");
	let mut cfg = test_config();

	cfg.upstream.catalog_base = upstream.base_url();

	let service =
		GatewayService::with_providers(cfg, stub_providers(StubEngine::returning(json!({})), &[]))
			.expect("Failed to build service.");
	let body = service
		.forward_catalog(&params(&[("cat", "tv")]))
		.await
		.expect("catalog forwarding failed");

	assert_eq!(&body[..], "{\"subjects\": [ {\"title\":\"繁花\"} ]}".as_bytes());

	let recorded = seen.lock().unwrap_or_else(|err| err.into_inner()).clone();

	assert_eq!(recorded.len(), 1);

	let (query, headers) = &recorded[0];

	assert_eq!(query.get("type").map(String::as_str), Some("tv"));
	assert_eq!(query.get("tag").map(String::as_str), Some("热门"));
	assert_eq!(query.get("page_limit").map(String::as_str), Some("20"));
	assert_eq!(header(headers, USER_AGENT), Some(BROWSER_USER_AGENT));
	assert_eq!(header(headers, REFERER), Some(PROVIDER_REFERER));
	assert_eq!(header(headers, ACCEPT), Some(JSON_ACCEPT));
}

#[tokio::test]
async fn catalog_non_ok_status_is_an_upstream_error() {
	let router = Router::new()
		.route("/j/subject_suggest", get(|| async { (StatusCode::FORBIDDEN, "blocked") }));
	let upstream = UpstreamServer::spawn(router).await.expect("Failed to spawn upstream.");
	let mut cfg = test_config();

	cfg.upstream.catalog_base = upstream.base_url();

	let service =
		GatewayService::with_providers(cfg, stub_providers(StubEngine::returning(json!({})), &[]))
			.expect("Failed to build service.");
	let err = service
		.forward_catalog(&params(&[("suggest", "1"), ("q", "dune")]))
		.await
		.expect_err("expected upstream failure");

	match err {
		Error::Upstream(inner) => {
			assert!(inner.is_upstream());
			assert!(inner.to_string().contains("403 Forbidden"), "unexpected error: {inner}");
		},
		other => panic!("unexpected error: {other:?}"),
	}
}

#[tokio::test]
async fn image_relay_fetches_with_browser_headers() {
	let seen = Arc::new(Mutex::new(Vec::<HeaderMap>::new()));
	let recorder = seen.clone();
	let router = Router::new().route(
		"/view/photo/p1.png",
		get(move |headers: HeaderMap| {
			let recorder = recorder.clone();

			async move {
				recorder.lock().unwrap_or_else(|err| err.into_inner()).push(headers);

				Response::new(Body::from(vec![1_u8, 2, 3]))
			}
		}),
	);
	let upstream = UpstreamServer::spawn(router).await.expect("Failed to spawn upstream.");
	let service = service_with_images(&upstream);
	let target = format!("http://{IMAGE_HOST}/view/photo/p1.png");
	let relayed = service
		.relay_image(&params(&[("u", target.as_str())]))
		.await
		.expect("image relay failed");

	assert_eq!(relayed.content_type, "image/png");

	let body = relayed.response.bytes().await.expect("Failed to read image body.");

	assert_eq!(&body[..], &[1_u8, 2, 3]);

	let recorded = seen.lock().unwrap_or_else(|err| err.into_inner()).clone();

	assert_eq!(recorded.len(), 1);
	assert_eq!(header(&recorded[0], USER_AGENT), Some(BROWSER_USER_AGENT));
	assert_eq!(header(&recorded[0], REFERER), Some(PROVIDER_REFERER));
	assert_eq!(header(&recorded[0], ACCEPT), Some(IMAGE_ACCEPT));
}

#[tokio::test]
async fn image_content_type_prefers_upstream_header_then_falls_back_to_jpeg() {
	let router = Router::new()
		.route("/view/photo/p2.png", get(|| async { ([(CONTENT_TYPE, "image/webp")], vec![9_u8]) }))
		.route("/view/photo/raw", get(|| async { Response::new(Body::from(vec![7_u8])) }));
	let upstream = UpstreamServer::spawn(router).await.expect("Failed to spawn upstream.");
	let service = service_with_images(&upstream);
	let cases = [("/view/photo/p2.png", "image/webp"), ("/view/photo/raw", "image/jpeg")];

	for (path, expected) in cases {
		let target = format!("http://{IMAGE_HOST}{path}");
		let relayed =
			service.relay_image(&params(&[("url", target.as_str())])).await.expect("image relay failed");

		assert_eq!(relayed.content_type, expected, "{path}");
	}
}

#[tokio::test]
async fn image_non_ok_status_is_an_upstream_error() {
	let upstream = UpstreamServer::spawn(Router::new()).await.expect("Failed to spawn upstream.");
	let service = service_with_images(&upstream);
	let target = format!("http://{IMAGE_HOST}/view/photo/missing.jpg");
	let err = service
		.relay_image(&params(&[("u", target.as_str())]))
		.await
		.expect_err("expected upstream failure");

	match err {
		Error::Upstream(inner) => {
			assert!(inner.is_upstream());
			assert!(inner.to_string().contains("404 Not Found"), "unexpected error: {inner}");
		},
		other => panic!("unexpected error: {other:?}"),
	}
}
