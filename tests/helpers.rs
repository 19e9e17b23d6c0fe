/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

#[allow(dead_code)]
pub(crate) const SESSION_COOKIE: &str = "PHPSESSID=s3ss10n";
#[allow(dead_code)]
pub(crate) const AUTH_TOKEN: &str = "f00dcafe1234";

#[allow(dead_code)]
pub(crate) fn landing_page(token: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><script>
PF.obj.config.base_url = "https://gifyu.com";
PF.obj.config.auth_token = "{token}";
PF.obj.config.json_api = "https://gifyu.com/json";
</script></head><body>Upload images</body></html>"#
    )
}

/// Every value sent for the multipart field `name`
#[allow(dead_code)]
pub(crate) fn form_values(body: &[u8], name: &str) -> Vec<String> {
    let text = String::from_utf8_lossy(body);
    let needle = format!("name=\"{name}\"");
    text.split(needle.as_str())
        .skip(1)
        .filter_map(|part| {
            let start = part.find("\r\n\r\n")? + 4;
            let rest = &part[start..];
            let end = rest.find("\r\n").unwrap_or(rest.len());
            Some(rest[..end].to_string())
        })
        .collect()
}

/// Answers uploads like the site does. Sources containing `broken` are rejected.
#[allow(dead_code)]
struct UploadResponder {
    base: String,
}

impl Respond for UploadResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let source = form_values(&request.body, "source")
            .pop()
            .unwrap_or_default();
        if source.contains("broken") {
            return ResponseTemplate::new(400).set_body_json(json!({
                "status_code": 400,
                "error": {"message": "Invalid image source", "code": 101}
            }));
        }

        let id = source
            .rsplit('/')
            .next()
            .and_then(|name| name.split('.').next())
            .unwrap_or("img")
            .to_string();
        ResponseTemplate::new(200).set_body_json(json!({
            "status_code": 200,
            "success": {"message": "image uploaded", "code": 100},
            "image": {
                "name": id,
                "url_viewer": format!("{}/image/{}", self.base, id),
            },
            "request": {"action": "upload", "type": "url"},
            "status_txt": "OK"
        }))
    }
}

/// Answers every upload after `delay`, recording the most requests seen at once.
///
/// A request counts as in flight until `delay` has passed since it arrived.
#[allow(dead_code)]
struct InFlightResponder {
    delay: Duration,
    arrivals: Mutex<Vec<Instant>>,
    peak: Arc<AtomicUsize>,
}

impl Respond for InFlightResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let now = Instant::now();
        let in_flight = {
            let mut arrivals = self.arrivals.lock().unwrap();
            arrivals.push(now);
            arrivals
                .iter()
                .filter(|t| now.duration_since(**t) < self.delay)
                .count()
        };
        self.peak.fetch_max(in_flight, Ordering::SeqCst);

        let source = form_values(&request.body, "source")
            .pop()
            .unwrap_or_default();
        ResponseTemplate::new(200)
            .set_body_json(json!({
                "status_code": 200,
                "image": {"url_viewer": format!("https://gifyu.com/image/{source}")},
                "request": {"action": "upload", "type": "url"}
            }))
            .set_delay(self.delay)
    }
}

/// Site whose uploads each take `delay`, with a counter of the peak number in flight
#[allow(dead_code)]
pub(crate) async fn slow_site(delay: Duration) -> (MockServer, Arc<AtomicUsize>) {
    let server = MockServer::start().await;
    mount_landing_page(&server, &landing_page(AUTH_TOKEN)).await;

    let peak = Arc::new(AtomicUsize::new(0));
    Mock::given(method("POST"))
        .and(path("/json"))
        .respond_with(InFlightResponder {
            delay,
            arrivals: Mutex::new(Vec::new()),
            peak: peak.clone(),
        })
        .mount(&server)
        .await;

    (server, peak)
}

/// Local stand-in for the site: landing page, uploads and album creation
#[allow(dead_code)]
pub(crate) async fn fake_site() -> MockServer {
    let server = MockServer::start().await;
    mount_landing_page(&server, &landing_page(AUTH_TOKEN)).await;

    Mock::given(method("POST"))
        .and(path("/json"))
        .and(body_string_contains("create-album"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status_code": 200,
            "album": {"id_encoded": "AlB1", "url": format!("{}/album/AlB1", server.uri())}
        })))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/json"))
        .respond_with(UploadResponder { base: server.uri() })
        .mount(&server)
        .await;

    server
}

#[allow(dead_code)]
pub(crate) async fn mount_landing_page(server: &MockServer, html: &str) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", format!("{SESSION_COOKIE}; path=/; HttpOnly"))
                .set_body_string(html),
        )
        .mount(server)
        .await;
}

/// Bodies of every POST to `/json` whose action matches
#[allow(dead_code)]
pub(crate) async fn posted_forms(server: &MockServer, action: &str) -> Vec<Vec<u8>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == "POST")
        .filter(|r| form_values(&r.body, "action").iter().any(|a| a == action))
        .map(|r| r.body)
        .collect()
}

#[allow(dead_code)]
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
