//! Read-only HTTP API over the roster.
//!
//! Hand-rolled on `std::net`: GET only, JSON bodies, permissive CORS so a
//! map page served from anywhere can call it. State reloads per request,
//! so CLI edits land without restarting the server.

use crate::{JsonlRosterBackend, RosterBackend, RosterQuery, RosterQueryError, RosterService};
use chrono::{Local, NaiveDate};
use rollbook_records::DataDir;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub bind: SocketAddr,
    pub data_dir: DataDir,
}

#[derive(Debug, Error)]
pub enum HttpServeError {
    #[error("bind failed: {0}")]
    Bind(std::io::Error),
    #[error("accept failed: {0}")]
    Accept(std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HttpResponse {
    status: u16,
    body: Value,
}

#[derive(Debug, Clone, PartialEq)]
enum Route {
    Index,
    Healthz,
    Summary,
    Members { q: Option<String> },
    Member(String),
    Households,
    Families,
    Reminders { date: Option<NaiveDate> },
    Plots,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
enum RouteError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
}

/// Serve the roster API until the process is killed.
pub fn serve_roster_api(config: HttpServerConfig) -> Result<(), HttpServeError> {
    serve_with_limit(config, None)
}

/// Serve at most `max_requests` requests, then return. `None` serves
/// forever.
pub fn serve_with_limit(
    config: HttpServerConfig,
    max_requests: Option<usize>,
) -> Result<(), HttpServeError> {
    let listener = TcpListener::bind(config.bind).map_err(HttpServeError::Bind)?;
    let mut served = 0usize;

    for stream in listener.incoming() {
        if let Some(limit) = max_requests
            && served >= limit
        {
            break;
        }

        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&mut stream, &config.data_dir) {
                    let _ = write_json_response(
                        &mut stream,
                        HttpResponse {
                            status: 500,
                            body: json!({ "error": format!("internal server error: {err}") }),
                        },
                    );
                }
                served += 1;
            }
            Err(err) => return Err(HttpServeError::Accept(err)),
        }
    }

    Ok(())
}

fn handle_connection(stream: &mut TcpStream, data_dir: &DataDir) -> Result<(), String> {
    let (method, target) = read_request_line(stream).map_err(|e| e.to_string())?;

    if method != "GET" {
        return write_json_response(
            stream,
            HttpResponse {
                status: 405,
                body: json!({ "error": "method not allowed; use GET" }),
            },
        )
        .map_err(|e| e.to_string());
    }

    let route = match parse_route_target(&target) {
        Ok(route) => route,
        Err(RouteError::BadRequest(msg)) => {
            return write_json_response(
                stream,
                HttpResponse {
                    status: 400,
                    body: json!({ "error": msg }),
                },
            )
            .map_err(|e| e.to_string());
        }
        Err(RouteError::NotFound(msg)) => {
            return write_json_response(
                stream,
                HttpResponse {
                    status: 404,
                    body: json!({ "error": msg, "routes": route_list() }),
                },
            )
            .map_err(|e| e.to_string());
        }
    };

    let backend = JsonlRosterBackend::load(data_dir).map_err(|e| e.to_string())?;
    let service = RosterService::new(backend);
    let response = execute_route(&service, route);
    write_json_response(stream, response).map_err(|e| e.to_string())
}

fn read_request_line(stream: &mut TcpStream) -> Result<(String, String), RouteError> {
    let mut buf = [0u8; 8192];
    let n = stream
        .read(&mut buf)
        .map_err(|e| RouteError::BadRequest(format!("failed to read request: {e}")))?;
    if n == 0 {
        return Err(RouteError::BadRequest("empty request".to_string()));
    }
    let req = String::from_utf8_lossy(&buf[..n]);
    let line = req
        .lines()
        .next()
        .ok_or_else(|| RouteError::BadRequest("missing request line".to_string()))?;
    parse_request_line(line)
}

fn parse_request_line(line: &str) -> Result<(String, String), RouteError> {
    let mut parts = line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| RouteError::BadRequest("missing method".to_string()))?;
    let target = parts
        .next()
        .ok_or_else(|| RouteError::BadRequest("missing target".to_string()))?;
    Ok((method.to_string(), target.to_string()))
}

fn route_list() -> Value {
    json!([
        "/healthz",
        "/summary",
        "/members?q=<term>",
        "/members/<id>",
        "/households",
        "/families",
        "/reminders/today?date=<YYYY-MM-DD>",
        "/plots"
    ])
}

fn parse_route_target(target: &str) -> Result<Route, RouteError> {
    let (path, query) = split_target(target);
    let params = parse_query_params(query);

    match path {
        "/" => Ok(Route::Index),
        "/healthz" => Ok(Route::Healthz),
        "/summary" => Ok(Route::Summary),
        "/members" => Ok(Route::Members {
            q: params.get("q").cloned(),
        }),
        "/households" => Ok(Route::Households),
        "/families" => Ok(Route::Families),
        "/reminders/today" => {
            let date = match params.get("date") {
                Some(raw) => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                    RouteError::BadRequest(format!("invalid date: {raw} (use YYYY-MM-DD)"))
                })?),
                None => None,
            };
            Ok(Route::Reminders { date })
        }
        "/plots" => Ok(Route::Plots),
        _ => {
            if let Some(rest) = path.strip_prefix("/members/") {
                let id = percent_decode(rest);
                if id.is_empty() {
                    return Err(RouteError::BadRequest(
                        "missing member id (use /members/<id>)".to_string(),
                    ));
                }
                return Ok(Route::Member(id));
            }
            Err(RouteError::NotFound(format!("unknown route: {path}")))
        }
    }
}

fn split_target(target: &str) -> (&str, &str) {
    match target.split_once('?') {
        Some((path, query)) => (path, query),
        None => (target, ""),
    }
}

fn parse_query_params(query: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (k, v) = match pair.split_once('=') {
            Some((k, v)) => (k, v),
            None => (pair, ""),
        };
        let key = percent_decode(k);
        if key.is_empty() {
            continue;
        }
        out.insert(key, percent_decode(v));
    }
    out
}

fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                if let (Some(h), Some(l)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                    out.push((h * 16 + l) as char);
                    i += 3;
                } else {
                    out.push('%');
                    i += 1;
                }
            }
            ch => {
                out.push(ch as char);
                i += 1;
            }
        }
    }
    out
}

fn hex_val(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        _ => None,
    }
}

fn execute_route<B: RosterBackend>(service: &RosterService<B>, route: Route) -> HttpResponse {
    match route {
        Route::Healthz => HttpResponse {
            status: 200,
            body: json!({ "ok": true }),
        },
        Route::Index => HttpResponse {
            status: 200,
            body: json!({
                "service": "rollbook.roster.v1",
                "routes": route_list(),
            }),
        },
        Route::Summary => respond(service, RosterQuery::Summary),
        Route::Members { q } => respond(service, RosterQuery::Members { q }),
        Route::Member(id) => respond(service, RosterQuery::Member { id }),
        Route::Households => respond(service, RosterQuery::Households),
        Route::Families => respond(service, RosterQuery::Families),
        Route::Reminders { date } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            respond(service, RosterQuery::Reminders { date })
        }
        Route::Plots => respond(service, RosterQuery::Plots),
    }
}

fn respond<B: RosterBackend>(service: &RosterService<B>, query: RosterQuery) -> HttpResponse {
    match service.query_json(query) {
        Ok(body) => HttpResponse { status: 200, body },
        Err(err) => query_error_response(err),
    }
}

fn query_error_response(err: RosterQueryError) -> HttpResponse {
    match err {
        RosterQueryError::MemberNotFound(id) => HttpResponse {
            status: 404,
            body: json!({ "error": format!("member not found: {id}") }),
        },
        RosterQueryError::Serialization(msg) => HttpResponse {
            status: 500,
            body: json!({ "error": msg }),
        },
    }
}

fn write_json_response(stream: &mut TcpStream, response: HttpResponse) -> std::io::Result<()> {
    let body = serde_json::to_vec_pretty(&response.body)?;
    let status_text = reason_phrase(response.status);
    let header = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nAccess-Control-Allow-Origin: *\r\nAccess-Control-Allow-Methods: GET\r\nConnection: close\r\n\r\n",
        response.status,
        status_text,
        body.len()
    );
    stream.write_all(header.as_bytes())?;
    stream.write_all(&body)?;
    stream.flush()
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollbook_records::{Family, Member, PlotLocation, RecordStore};

    struct MockBackend {
        members: RecordStore<Member>,
        families: RecordStore<Family>,
        plots: RecordStore<PlotLocation>,
    }

    impl MockBackend {
        fn with_one_member() -> Self {
            let mut ada = Member::new("mbr-1", "Lee, Ada", "Lee, Ada");
            ada.age = 41;
            Self {
                members: RecordStore::from_records(vec![ada]),
                families: RecordStore::default(),
                plots: RecordStore::default(),
            }
        }
    }

    impl RosterBackend for MockBackend {
        fn members(&self) -> &RecordStore<Member> {
            &self.members
        }

        fn families(&self) -> &RecordStore<Family> {
            &self.families
        }

        fn plots(&self) -> &RecordStore<PlotLocation> {
            &self.plots
        }
    }

    #[test]
    fn route_parsing_handles_query_params() {
        let route = parse_route_target("/members?q=smith").expect("route should parse");
        assert_eq!(
            route,
            Route::Members {
                q: Some("smith".to_string())
            }
        );

        let route = parse_route_target("/members/mbr-1").expect("route should parse");
        assert_eq!(route, Route::Member("mbr-1".to_string()));

        let route = parse_route_target("/reminders/today?date=2026-03-05")
            .expect("route should parse");
        let expected = NaiveDate::from_ymd_opt(2026, 3, 5).expect("date should build");
        assert_eq!(
            route,
            Route::Reminders {
                date: Some(expected)
            }
        );
    }

    #[test]
    fn route_parsing_rejects_bad_dates() {
        let err =
            parse_route_target("/reminders/today?date=tomorrow").expect_err("route should fail");
        assert!(matches!(err, RouteError::BadRequest(_)));
    }

    #[test]
    fn route_parsing_reports_unknown_paths() {
        let err = parse_route_target("/nope").expect_err("route should fail");
        assert!(matches!(err, RouteError::NotFound(_)));
    }

    #[test]
    fn execute_route_maps_missing_member_to_404() {
        let service = RosterService::new(MockBackend::with_one_member());
        let response = execute_route(&service, Route::Member("missing".to_string()));
        assert_eq!(response.status, 404);

        let response = execute_route(&service, Route::Member("mbr-1".to_string()));
        assert_eq!(response.status, 200);
        assert_eq!(response.body["preferred_name"], "Lee, Ada");
    }

    #[test]
    fn percent_decode_works_for_common_forms() {
        assert_eq!(percent_decode("mbr%2D1"), "mbr-1");
        assert_eq!(percent_decode("lee+ada"), "lee ada");
    }
}
