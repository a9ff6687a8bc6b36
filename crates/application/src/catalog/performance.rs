//! Group 5: performance and advanced HTTP features.

use probe_domain::testing::{Assertion, JsonKind};
use probe_domain::{Capture, CheckCase, CheckGroup, LoadProfile, Step, Target};
use serde_json::{Value, json};

use super::within;
use crate::clients::JsonPlaceholderApi;

const BENCHMARK_SAMPLES: usize = 5;

const CONCURRENCY_LEVELS: [usize; 3] = [5, 10, 20];

const ACCEPT_VARIANTS: [&str; 4] = [
    "application/json",
    "application/*",
    "*/*",
    "text/html,application/json;q=0.9",
];

fn is_kind(path: &str, kind: JsonKind) -> Assertion {
    Assertion::JsonType {
        path: path.to_string(),
        kind,
    }
}

fn json_ish() -> Assertion {
    Assertion::ContentType {
        expected: "json".to_string(),
    }
}

pub(super) fn group(api: &JsonPlaceholderApi) -> CheckGroup {
    let benchmarks = [
        (api.get_all_posts(), 2000),
        (api.get_post(1), 1500),
        (api.get_users(), 2000),
        (api.get_user(1), 1500),
        (api.get_comments_by_post(1), 2000),
        (api.get_post_comments(1), 2000),
    ]
    .into_iter()
    .map(|(request, max_avg_ms)| {
        Step::new(request).expect(Assertion::status(200)).under_load(
            LoadProfile::sequential(BENCHMARK_SAMPLES).with_max_avg_ms(max_avg_ms),
        )
    });

    let concurrency_steps = CONCURRENCY_LEVELS.iter().map(|level| {
        Step::new(api.get_all_posts())
            .named(format!("{level} concurrent requests"))
            .expect(Assertion::status(200))
            .under_load(
                LoadProfile::concurrent(*level, *level)
                    .with_min_success_rate(0.8)
                    .with_max_avg_ms(5000)
                    .with_max_single_ms(10_000),
            )
    });

    let volume_steps = [
        (api.get_all_posts().with_query("_limit", "1"), 1, 2000),
        (api.get_all_posts().with_query("_limit", "10"), 10, 2000),
        (api.get_all_posts().with_query("_limit", "50"), 50, 3000),
        (api.get_all_posts(), 100, 3000),
        (api.get("/comments"), 500, 5000),
        (api.get("/photos").with_query("_limit", "100"), 100, 3000),
    ]
    .into_iter()
    .map(|(request, count, max_ms)| {
        Step::new(request).expect_all([
            Assertion::status(200),
            Assertion::json_len("$", count),
            within(max_ms),
        ])
    });

    let patch_steps = [
        json!({"title": "Updated Title Only"}),
        json!({"body": "Updated body content only"}),
        json!({"userId": 2}),
        json!({"title": "New Title", "body": "New Body"}),
        json!({"extraField": "Should be ignored or added"}),
    ]
    .into_iter()
    .map(|fields| {
        let echoed = fields
            .as_object()
            .into_iter()
            .flatten()
            .filter(|(name, _)| matches!(name.as_str(), "title" | "body" | "userId"))
            .map(|(name, value)| Assertion::json_eq(format!("$.{name}"), value.clone()));
        Step::new(api.patch_post(1, &fields))
            .expect(Assertion::status_in(&[200, 404, 405]))
            .expect_all(echoed.collect::<Vec<_>>())
            .expect(Assertion::json_eq("$.id", Value::from("{{original_id}}")))
    });

    let accept_steps = ACCEPT_VARIANTS.iter().map(|accept| {
        Step::new(api.get_post(1).with_header("Accept", *accept))
            .named(format!("Accept: {accept}"))
            .expect_all([Assertion::status(200), json_ish()])
    });

    let custom_headers = api
        .get_post(1)
        .with_header("User-Agent", "API-Testing-Framework/1.0")
        .with_header("Accept-Language", "en-US,en;q=0.9")
        .with_header("Cache-Control", "no-cache")
        .with_header("X-Custom-Header", "TestValue123");

    let consistency_steps = [
        (api.get_post(1), JsonKind::Object),
        (api.get_user(1), JsonKind::Object),
        (api.get("/comments/1"), JsonKind::Object),
        (api.get_all_posts(), JsonKind::Array),
        (api.get_users(), JsonKind::Array),
        (api.get_post_comments(1), JsonKind::Array),
        (api.get_user_albums(1), JsonKind::Array),
    ]
    .into_iter()
    .map(|(request, kind)| {
        let step = Step::new(request).expect_all([Assertion::status(200), json_ish(), is_kind("$", kind)]);
        if kind == JsonKind::Object {
            step.expect(is_kind("$.id", JsonKind::Integer))
        } else {
            step
        }
    });

    CheckGroup::new(5, "Performance & Advanced Features", Target::JsonPlaceholder)
        .case(
            CheckCase::new("5.1", "Response time benchmarks")
                .described("Five samples per endpoint stay under its average bound")
                .steps(benchmarks),
        )
        .case(
            CheckCase::new("5.2", "Concurrent load")
                .described("5, 10 and 20 parallel requests mostly succeed in time")
                .steps(concurrency_steps),
        )
        .case(
            CheckCase::new("5.3", "Data volume")
                .described("Larger collections are served within their bound")
                .steps(volume_steps),
        )
        .case(
            CheckCase::new("5.4", "PATCH partial updates")
                .described("PATCH changes only the given fields and keeps the id")
                .step(
                    Step::new(api.get_post(1))
                        .expect(Assertion::status(200))
                        .capture(Capture::value("original_id", "$.id")),
                )
                .steps(patch_steps),
        )
        .case(
            CheckCase::new("5.5", "Headers, caching and negotiation")
                .described("Custom headers, conditional requests and Accept variants")
                .step(Step::new(custom_headers).expect_all([
                    Assertion::status(200),
                    Assertion::HeaderExists {
                        name: "content-type".to_string(),
                        value: None,
                    },
                    Assertion::HeaderExists {
                        name: "date".to_string(),
                        value: None,
                    },
                    Assertion::AnyHeader {
                        names: vec!["content-length".to_string(), "transfer-encoding".to_string()],
                    },
                ]))
                .step(
                    Step::new(api.get_post(1))
                        .expect(Assertion::status(200))
                        .capture(Capture::header("etag", "ETag")),
                )
                .step(
                    Step::new(api.get_post(1).with_header("If-None-Match", "{{etag}}"))
                        .expect(Assertion::status_in(&[200, 304])),
                )
                .steps(accept_steps),
        )
        .case(
            CheckCase::new("5.6", "API consistency")
                .described("Resources are objects with integer ids, collections are arrays")
                .steps(consistency_steps),
        )
}
