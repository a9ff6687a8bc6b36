//! Group 2: security headers and input handling.

use probe_domain::testing::Assertion;
use probe_domain::{CheckCase, CheckGroup, LoadProfile, ProbeConfig, Step, Target};
use serde_json::json;

use super::{json_content, within};
use crate::clients::JsonPlaceholderApi;

const SQL_PAYLOADS: [&str; 4] = [
    "1'; DROP TABLE users; --",
    "1' OR '1'='1",
    "1 UNION SELECT * FROM users",
    "'; DELETE FROM posts; --",
];

const LEAK_TERMS: [&str; 6] = ["sql", "mysql", "database", "table", "error", "syntax"];

const XSS_PAYLOADS: [&str; 4] = [
    "<script>alert('XSS')</script>",
    "javascript:alert('XSS')",
    "<img src=x onerror=alert('XSS')>",
    "';alert('XSS');//",
];

const LARGE_BODY_SIZES: [usize; 3] = [1_000, 10_000, 50_000];

pub(super) fn group(api: &JsonPlaceholderApi, config: &ProbeConfig) -> CheckGroup {
    let user_id = config.fixtures.post.user_id;

    let sql_steps = SQL_PAYLOADS.iter().map(|payload| {
        Step::new(api.get_all_posts().with_query("userId", *payload))
            .named(format!("userId={payload}"))
            .expect_all([
                Assertion::status_in(&[200, 400, 404]),
                Assertion::BodyNotContains {
                    terms: LEAK_TERMS.iter().map(ToString::to_string).collect(),
                    ignore_case: true,
                },
            ])
            .tolerating_timeouts()
    });

    let xss_steps = XSS_PAYLOADS.iter().map(|payload| {
        let post = json!({
            "title": payload,
            "body": format!("Test body with {payload}"),
            "userId": user_id,
        });
        Step::new(api.create_post(&post)).expect_all([
            Assertion::status(201),
            Assertion::json_eq("$.title", json!(payload)),
            json_content(),
        ])
    });

    let length_inputs = [
        json!({"title": "A".repeat(10_000), "body": "Normal body", "userId": user_id}),
        json!({"title": "Normal title", "body": "B".repeat(100_000), "userId": user_id}),
        json!({"title": "", "body": "", "userId": user_id}),
    ];
    let length_steps = length_inputs.iter().map(|post| {
        Step::new(api.create_post(post))
            .expect_all([Assertion::status_in(&[200, 201, 400, 413]), within(5000)])
    });

    let large_steps = LARGE_BODY_SIZES.iter().map(|size| {
        let post = json!({"title": "Large Payload Test", "body": "X".repeat(*size), "userId": user_id});
        Step::new(api.create_post(&post))
            .named(format!("{size} byte body"))
            .expect_all([
                Assertion::status_in(&[200, 201, 400, 413, 414]),
                within(10_000),
            ])
            .tolerating_transport_errors()
    });

    CheckGroup::new(2, "Security & Input Handling", Target::JsonPlaceholder)
        .case(
            CheckCase::new("2.1", "HTTPS and security headers")
                .described("The API is served over HTTPS with CORS and Content-Type headers")
                .step(Step::new(api.get_all_posts()).expect_all([
                    Assertion::status(200),
                    Assertion::UrlScheme {
                        scheme: "https".to_string(),
                    },
                    Assertion::HeaderPrefix {
                        prefix: "access-control".to_string(),
                    },
                    Assertion::HeaderExists {
                        name: "content-type".to_string(),
                        value: None,
                    },
                ])),
        )
        .case(
            CheckCase::new("2.2", "CORS policy")
                .described("A cross-origin request is allowed")
                .step(
                    Step::new(
                        api.get_all_posts()
                            .with_header("Origin", "https://example.com")
                            .with_header("Access-Control-Request-Method", "GET"),
                    )
                    .expect_all([
                        Assertion::status(200),
                        Assertion::HeaderMatches {
                            name: "access-control-allow-origin".to_string(),
                            pattern: r"^\*$|example\.com".to_string(),
                        },
                    ]),
                ),
        )
        .case(
            CheckCase::new("2.3", "Content-Type declares charset")
                .described("JSON responses name their character set")
                .step(Step::new(api.get_all_posts()).expect_all([
                    Assertion::status(200),
                    json_content(),
                    Assertion::HeaderMatches {
                        name: "content-type".to_string(),
                        pattern: "(?i)charset=".to_string(),
                    },
                ])),
        )
        .case(
            CheckCase::new("2.4", "SQL injection in query")
                .described("Injection payloads are handled without leaking database details")
                .steps(sql_steps),
        )
        .case(
            CheckCase::new("2.5", "XSS payloads stored as text")
                .described("Script payloads are echoed back verbatim inside JSON")
                .steps(xss_steps),
        )
        .case(
            CheckCase::new("2.6", "Input length boundaries")
                .described("Very long and empty fields are accepted or rejected cleanly")
                .steps(length_steps),
        )
        .case(
            CheckCase::new("2.7", "Rapid sequential requests")
                .described("20 back-to-back requests mostly succeed")
                .step(
                    Step::new(api.get_post(1))
                        .expect(Assertion::status(200))
                        .under_load(LoadProfile::sequential(20).with_min_success_rate(0.8)),
                ),
        )
        .case(
            CheckCase::new("2.8", "Large payloads")
                .described("Bodies up to 50 KB are handled within 10 s")
                .steps(large_steps),
        )
}
