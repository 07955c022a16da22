//! HTTP control surface
//!
//! Only the pieces the relay panel needs: the request line is parsed, the
//! path is routed and the handlers produce a [`Response`] the network task
//! writes back before closing the connection.
//!
//! | Path          | Handler                                  |
//! |---------------|------------------------------------------|
//! | `/`           | `index.html` from the asset store        |
//! | `/style.css`  | stylesheet from the asset store          |
//! | `/script.js`  | script from the asset store              |
//! | `/relay`      | `relay=<id>&state=<on\|off>` control      |
//! | `/status`     | JSON map of `relay<i>` to its state      |

use core::fmt::Write as _;

use embedded_hal::digital::OutputPin;
use heapless::String;
use log::{debug, warn};

use crate::error::{Error, Result};
use crate::state::DeviceState;

/// Capacity of dynamically generated response bodies.
pub const RESPONSE_BODY_LEN: usize = 192;

/// Capacity of the serialized status line and headers.
pub const RESPONSE_HEAD_LEN: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    BadRequest,
    NotFound,
    MethodNotAllowed,
}

impl StatusCode {
    pub const fn code(self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
        }
    }

    pub const fn reason(self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
        }
    }
}

/// Parsed request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    pub method: &'a str,
    pub path: &'a str,
    pub query: QueryParams<'a>,
}

impl<'a> Request<'a> {
    /// Parse `METHOD /path?query HTTP/1.x` from the start of a request.
    pub fn parse(raw: &'a str) -> Result<Self> {
        let line = raw.lines().next().ok_or(Error::InvalidParameter("request line"))?;
        let mut parts = line.split_ascii_whitespace();
        let method = parts.next().ok_or(Error::InvalidParameter("method"))?;
        let target = parts.next().ok_or(Error::InvalidParameter("path"))?;

        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        Ok(Self {
            method,
            path,
            query: QueryParams::new(query),
        })
    }
}

/// `key=value&key=value` query string, looked up without allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryParams<'a> {
    raw: &'a str,
}

impl<'a> QueryParams<'a> {
    pub const fn new(raw: &'a str) -> Self {
        Self { raw }
    }

    /// First value for `name`; a bare `name` without `=` yields `""`.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.raw
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

/// A file served verbatim from persistent storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asset {
    pub content_type: &'static str,
    pub data: &'static [u8],
}

/// Static files reachable from the control surface.
pub trait AssetStore {
    fn asset(&self, path: &str) -> Option<Asset>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Text(String<RESPONSE_BODY_LEN>),
    Static(&'static [u8]),
}

impl Body {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Text(text) => text.as_bytes(),
            Body::Static(data) => data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: Body,
}

impl Response {
    pub fn text(status: StatusCode, message: &str) -> Self {
        let mut body = String::new();
        for ch in message.chars() {
            if body.push(ch).is_err() {
                break;
            }
        }
        Self {
            status,
            content_type: "text/plain",
            body: Body::Text(body),
        }
    }

    pub fn from_error(error: Error) -> Self {
        let mut body: String<RESPONSE_BODY_LEN> = String::new();
        let _ = write!(body, "{}", error);
        Self {
            status: StatusCode::BadRequest,
            content_type: "text/plain",
            body: Body::Text(body),
        }
    }

    /// Status line and headers, terminated by the blank line.
    pub fn head(&self) -> String<RESPONSE_HEAD_LEN> {
        let mut head = String::new();
        let _ = write!(
            head,
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.status.code(),
            self.status.reason(),
            self.content_type,
            self.body.as_bytes().len()
        );
        head
    }
}

/// Route a parsed request to its handler.
pub fn handle<P, const N: usize, A>(
    request: &Request<'_>,
    device: &mut DeviceState<P, N>,
    assets: &A,
) -> Response
where
    P: OutputPin,
    A: AssetStore + ?Sized,
{
    debug!("HTTP {} {}", request.method, request.path);
    if request.method != "GET" {
        return Response::text(StatusCode::MethodNotAllowed, "Only GET is supported");
    }

    match request.path {
        "/relay" => handle_relay_control(&request.query, device),
        "/status" => handle_relay_status(device),
        path => serve_asset(path, assets),
    }
}

/// `GET /relay?relay=<id>&state=<on|off>`
pub fn handle_relay_control<P, const N: usize>(
    query: &QueryParams<'_>,
    device: &mut DeviceState<P, N>,
) -> Response
where
    P: OutputPin,
{
    let result = parse_relay_command(query).and_then(|(id, on)| device.set_relay(id, on));
    match result {
        Ok(()) => Response::text(StatusCode::Ok, "OK"),
        Err(e) => {
            warn!("Rejected relay request: {}", e);
            Response::from_error(e)
        }
    }
}

/// `GET /status`
pub fn handle_relay_status<P, const N: usize>(device: &DeviceState<P, N>) -> Response
where
    P: OutputPin,
{
    let mut body: String<RESPONSE_BODY_LEN> = String::new();
    let _ = body.push('{');
    for (id, on) in device.relays.states().iter().enumerate() {
        if id > 0 {
            let _ = body.push(',');
        }
        let _ = write!(body, "\"relay{}\":{}", id, on);
    }
    let _ = body.push('}');

    Response {
        status: StatusCode::Ok,
        content_type: "application/json",
        body: Body::Text(body),
    }
}

fn serve_asset<A: AssetStore + ?Sized>(path: &str, assets: &A) -> Response {
    match assets.asset(path) {
        Some(asset) => Response {
            status: StatusCode::Ok,
            content_type: asset.content_type,
            body: Body::Static(asset.data),
        },
        None => Response::text(StatusCode::NotFound, "File not found"),
    }
}

fn parse_relay_command(query: &QueryParams<'_>) -> Result<(usize, bool)> {
    let relay = query.get("relay").ok_or(Error::InvalidParameter("relay"))?;
    let state = query.get("state").ok_or(Error::InvalidParameter("state"))?;

    // Decimal digits only, no sign.
    if relay.is_empty() || !relay.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidParameter("relay"));
    }
    let id = relay
        .parse::<usize>()
        .map_err(|_| Error::InvalidParameter("relay"))?;
    let on = match state {
        "on" => true,
        "off" => false,
        _ => return Err(Error::InvalidParameter("state")),
    };
    Ok((id, on))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::tests::MockPin;

    struct Assets;

    impl AssetStore for Assets {
        fn asset(&self, path: &str) -> Option<Asset> {
            match path {
                "/" => Some(Asset {
                    content_type: "text/html",
                    data: b"<html></html>",
                }),
                _ => None,
            }
        }
    }

    fn device() -> DeviceState<MockPin, 7> {
        DeviceState::new(Default::default())
    }

    fn get(raw: &str, device: &mut DeviceState<MockPin, 7>) -> Response {
        let request = Request::parse(raw).unwrap();
        handle(&request, device, &Assets)
    }

    #[test]
    fn test_parse_request_line() {
        let request = Request::parse("GET /relay?relay=2&state=on HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/relay");
        assert_eq!(request.query.get("relay"), Some("2"));
        assert_eq!(request.query.get("state"), Some("on"));
        assert_eq!(request.query.get("missing"), None);
    }

    #[test]
    fn test_parse_rejects_empty_request() {
        assert!(Request::parse("").is_err());
        assert!(Request::parse("GET").is_err());
    }

    #[test]
    fn test_relay_control_sets_relay() {
        let mut device = device();
        let response = get("GET /relay?relay=2&state=on HTTP/1.1", &mut device);

        assert_eq!(response.status, StatusCode::Ok);
        assert!(device.relays.get(2).unwrap());
        assert_eq!(device.log.latest(), "Relay 3: on");
    }

    #[test]
    fn test_relay_control_validation() {
        let cases = [
            ("GET /relay?state=on HTTP/1.1", "Invalid parameter: relay"),
            ("GET /relay?relay=1 HTTP/1.1", "Invalid parameter: state"),
            ("GET /relay?relay=x&state=on HTTP/1.1", "Invalid parameter: relay"),
            ("GET /relay?relay=-1&state=on HTTP/1.1", "Invalid parameter: relay"),
            ("GET /relay?relay=+2&state=on HTTP/1.1", "Invalid parameter: relay"),
            ("GET /relay?relay=&state=on HTTP/1.1", "Invalid parameter: relay"),
            ("GET /relay?relay=%202&state=on HTTP/1.1", "Invalid parameter: relay"),
            ("GET /relay?relay=1&state=maybe HTTP/1.1", "Invalid parameter: state"),
            ("GET /relay?relay=7&state=on HTTP/1.1", "Relay index 7 out of range"),
        ];

        for (raw, reason) in cases {
            let mut device = device();
            let response = get(raw, &mut device);
            assert_eq!(response.status, StatusCode::BadRequest, "{raw}");
            assert_eq!(response.body.as_bytes(), reason.as_bytes(), "{raw}");
            assert_eq!(device.relays.count_on(), 0);
        }
    }

    #[test]
    fn test_status_reports_every_relay() {
        let mut device = device();
        device.set_relay(2, true).unwrap();
        let response = get("GET /status HTTP/1.1", &mut device);

        assert_eq!(response.status, StatusCode::Ok);
        assert_eq!(response.content_type, "application/json");
        assert_eq!(
            response.body.as_bytes(),
            br#"{"relay0":false,"relay1":false,"relay2":true,"relay3":false,"relay4":false,"relay5":false,"relay6":false}"#
        );
    }

    #[test]
    fn test_assets_and_not_found() {
        let mut device = device();
        let index = get("GET / HTTP/1.1", &mut device);
        assert_eq!(index.status, StatusCode::Ok);
        assert_eq!(index.body, Body::Static(b"<html></html>"));

        let missing = get("GET /script.js HTTP/1.1", &mut device);
        assert_eq!(missing.status, StatusCode::NotFound);
    }

    #[test]
    fn test_non_get_is_rejected() {
        let mut device = device();
        let response = get("POST /relay?relay=1&state=on HTTP/1.1", &mut device);
        assert_eq!(response.status, StatusCode::MethodNotAllowed);
        assert_eq!(device.relays.count_on(), 0);
    }

    #[test]
    fn test_response_head() {
        let response = Response::text(StatusCode::Ok, "OK");
        assert_eq!(
            response.head().as_str(),
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 2\r\nConnection: close\r\n\r\n"
        );
    }
}
