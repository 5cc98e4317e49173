#![allow(clippy::unwrap_used, clippy::expect_used)]

//! The three adapters agree on validation, on what reaches the use case and
//! on results.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{Behavior, MockTranslation, json_request, module, send};
use tonic::{Code, Request};
use translation::InMemoryTranslation;
use translation::api::amqp_rpc::{Delivery, RpcErrorCode};
use translation::api::grpc::TranslationGrpcService;
use translation_sdk::proto::DoTranslateRequest;
use translation_sdk::{TranslationClient, TranslationGrpc, TranslationRequest};

struct Outcome {
    http: (StatusCode, serde_json::Value),
    grpc: Result<(String, String, String), (Code, String)>,
    rpc: Result<serde_json::Value, (RpcErrorCode, String)>,
}

/// Send the same do-translate input over HTTP, gRPC and RPC, all bound to `client`.
async fn run_everywhere(
    client: Arc<dyn TranslationClient>,
    requester: &str,
    input: &TranslationRequest,
) -> Outcome {
    let module = module(client);

    let body = serde_json::json!({
        "text": input.text,
        "sourceLang": input.source_lang,
        "targetLang": input.target_lang,
    })
    .to_string();

    let mut req = json_request("POST", "/v1/translation/do-translate", &body);
    req.headers_mut()
        .insert("x-requester-id", requester.parse().unwrap());
    let http = send(&module.http_router(), req).await;

    let mut req = Request::new(DoTranslateRequest {
        text: input.text.clone(),
        source_lang: input.source_lang.clone(),
        target_lang: input.target_lang.clone(),
    });
    req.metadata_mut()
        .insert("x-requester-id", requester.parse().unwrap());
    let grpc = TranslationGrpcService::new(module.invoker())
        .do_translate(req)
        .await
        .map(|r| {
            let r = r.into_inner();
            (r.text, r.source_lang, r.target_lang)
        })
        .map_err(|s| (s.code(), s.message().to_owned()));

    let server = module.rpc_server().unwrap();
    let (delivery, reply) = Delivery::new("v1.doTranslate", "x", body);
    server.handle(delivery.with_requester(requester)).await;
    let reply = reply.await.unwrap();
    let rpc = match reply.error() {
        Some(err) => Err((err.code, err.message)),
        None => Ok(serde_json::from_slice(&reply.body).unwrap()),
    };

    Outcome { http, grpc, rpc }
}

#[tokio::test]
async fn invalid_inputs_are_rejected_identically_before_the_use_case() {
    let cases = [
        ("", "en", "vi"),
        ("   ", "en", "vi"),
        ("hi", "", "vi"),
        ("hi", "english", "vi"),
        ("hi", "en", "VI"),
        ("hi", "en", "zh_CN"),
    ];

    let mock = MockTranslation::new(Behavior::Succeed);
    for (text, source, target) in cases {
        let input = TranslationRequest::new(text, source, target);
        let out = run_everywhere(mock.clone(), "erin", &input).await;

        assert_eq!(out.http.0, StatusCode::BAD_REQUEST, "{input:?}");
        let message = out.http.1["error"].as_str().unwrap().to_owned();

        let (code, grpc_message) = out.grpc.unwrap_err();
        assert_eq!(code, Code::InvalidArgument);
        assert_eq!(grpc_message, message);

        let (code, rpc_message) = out.rpc.unwrap_err();
        assert_eq!(code, RpcErrorCode::InvalidArgument);
        assert_eq!(rpc_message, message);

        assert_eq!(mock.calls(), 0, "use case reached for {input:?}");
    }
    assert!(mock.seen().is_empty());
}

#[tokio::test]
async fn overlong_text_is_rejected_identically() {
    let mock = MockTranslation::new(Behavior::Succeed);
    let input = TranslationRequest::new("a".repeat(5001), "en", "vi");
    let out = run_everywhere(mock.clone(), "erin", &input).await;

    assert_eq!(out.http.0, StatusCode::BAD_REQUEST);
    assert_eq!(out.http.1["error"], "text: must be at most 5000 characters");
    assert_eq!(out.grpc.unwrap_err().1, "text: must be at most 5000 characters");
    assert_eq!(out.rpc.unwrap_err().1, "text: must be at most 5000 characters");
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn use_case_receives_identical_arguments_from_every_adapter() {
    let mock = MockTranslation::new(Behavior::Succeed);
    let input = TranslationRequest::new("good morning", "en", "zh-CN");
    let out = run_everywhere(mock.clone(), "erin", &input).await;

    assert_eq!(out.http.0, StatusCode::OK);
    let seen = mock.seen();
    assert_eq!(seen.len(), 3);
    for (requester, request) in &seen {
        assert_eq!(requester, "erin");
        assert_eq!(request, &input);
    }
    assert_eq!(mock.calls(), 3);
}

#[tokio::test]
async fn valid_input_yields_the_same_result() {
    let out = run_everywhere(
        MockTranslation::new(Behavior::Succeed),
        "erin",
        &TranslationRequest::new("hello", "en", "de"),
    )
    .await;

    assert_eq!(out.http.0, StatusCode::OK);
    let expected = serde_json::json!({ "text": "de:hello", "sourceLang": "en", "targetLang": "de" });
    assert_eq!(out.http.1, expected);
    assert_eq!(out.rpc.unwrap(), expected);
    assert_eq!(
        out.grpc.unwrap(),
        ("de:hello".to_owned(), "en".to_owned(), "de".to_owned())
    );
}

#[tokio::test]
async fn tagged_translation_is_identical_on_every_transport() {
    let out = run_everywhere(
        Arc::new(InMemoryTranslation::new()),
        "erin",
        &TranslationRequest::new("hello", "en", "vi"),
    )
    .await;

    let expected =
        serde_json::json!({ "text": "[vi] hello", "sourceLang": "en", "targetLang": "vi" });
    assert_eq!(out.http, (StatusCode::OK, expected.clone()));
    assert_eq!(out.rpc.unwrap(), expected);
    assert_eq!(
        out.grpc.unwrap(),
        ("[vi] hello".to_owned(), "en".to_owned(), "vi".to_owned())
    );
}
