//! Access log lines
//!
//! One [`AccessLogEntry`] is opened when a request arrives and completed once
//! the response is built. Rendering follows the configured format: `combined`
//! (common plus matched route and user agent), `common`, `json`, or a
//! pattern with `$variables`.

use std::net::SocketAddr;
use std::time::Instant;

use chrono::{DateTime, Local};
use hyper::{Request, Response};

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Access log format selected by `logging.access_log_format`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessFormat {
    Combined,
    Common,
    Json,
    Pattern(String),
}

impl AccessFormat {
    pub fn parse(name: &str) -> Self {
        match name {
            "combined" => Self::Combined,
            "common" => Self::Common,
            "json" => Self::Json,
            pattern => Self::Pattern(pattern.to_string()),
        }
    }
}

/// Access log entry for one handled request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// `1.1`, `1.0`, ...
    pub http_version: String,
    pub user_agent: Option<String>,
    pub status: u16,
    pub body_bytes: usize,
    /// Id of the deepest matched route, if any
    pub route: Option<&'static str>,
    pub request_time_us: u64,
    started: Instant,
}

impl AccessLogEntry {
    /// Open an entry for `req` arriving from `peer`
    pub fn start<B>(req: &Request<B>, peer: SocketAddr) -> Self {
        let version = format!("{:?}", req.version());
        Self {
            remote_addr: peer.ip().to_string(),
            time: Local::now(),
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(ToString::to_string),
            http_version: version.trim_start_matches("HTTP/").to_string(),
            user_agent: req
                .headers()
                .get(hyper::header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string),
            status: 0,
            body_bytes: 0,
            route: None,
            request_time_us: 0,
            started: Instant::now(),
        }
    }

    /// Record the response and the elapsed time
    pub fn finish<B>(&mut self, response: &Response<B>, route: Option<&'static str>) {
        self.status = response.status().as_u16();
        self.body_bytes = response
            .headers()
            .get(hyper::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        self.route = route;
        self.request_time_us =
            u64::try_from(self.started.elapsed().as_micros()).unwrap_or(u64::MAX);
    }

    pub fn render(&self, format: &AccessFormat) -> String {
        match format {
            AccessFormat::Combined => format!(
                "{} \"{}\" \"{}\"",
                self.common_line(),
                self.route.unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            AccessFormat::Common => self.common_line(),
            AccessFormat::Json => self.json_line(),
            AccessFormat::Pattern(pattern) => self.expand(pattern),
        }
    }

    fn target(&self) -> String {
        self.query
            .as_ref()
            .map_or_else(|| self.path.clone(), |q| format!("{}?{q}", self.path))
    }

    fn request_line(&self) -> String {
        format!("{} {} HTTP/{}", self.method, self.target(), self.http_version)
    }

    fn common_line(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    fn json_line(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "route": self.route,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Substitute `$remote_addr`, `$time_local`, `$time_iso8601`, `$request`,
    /// `$request_method`, `$request_uri`, `$request_time` (seconds),
    /// `$status`, `$body_bytes_sent`, `$route` and `$http_user_agent`.
    fn expand(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let seconds = self.request_time_us as f64 / 1_000_000.0;

        // Longer `$request_*` names go before `$request`
        let substitutions = [
            ("$remote_addr", self.remote_addr.clone()),
            ("$time_local", self.time.format(CLF_TIME).to_string()),
            ("$time_iso8601", self.time.to_rfc3339()),
            ("$request_time", format!("{seconds:.3}")),
            ("$request_method", self.method.clone()),
            ("$request_uri", self.target()),
            ("$request", self.request_line()),
            ("$status", self.status.to_string()),
            ("$body_bytes_sent", self.body_bytes.to_string()),
            ("$route", self.route.unwrap_or("-").to_string()),
            (
                "$http_user_agent",
                self.user_agent.clone().unwrap_or_else(|| "-".to_string()),
            ),
        ];
        substitutions
            .iter()
            .fold(pattern.to_string(), |line, (var, value)| line.replace(var, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> AccessLogEntry {
        let req = Request::get("/demos/loader?q=alice")
            .header("User-Agent", "Mozilla/5.0")
            .body(())
            .unwrap();
        let mut entry = AccessLogEntry::start(&req, "192.168.1.1:40000".parse().unwrap());
        let response = Response::builder()
            .status(200)
            .header("Content-Length", "1234")
            .body(())
            .unwrap();
        entry.finish(&response, Some("routes/demos/loader"));
        entry.request_time_us = 12_345;
        entry
    }

    #[test]
    fn test_start_and_finish() {
        let entry = entry();
        assert_eq!(entry.remote_addr, "192.168.1.1");
        assert_eq!(entry.path, "/demos/loader");
        assert_eq!(entry.query.as_deref(), Some("q=alice"));
        assert_eq!(entry.http_version, "1.1");
        assert_eq!(entry.status, 200);
        assert_eq!(entry.body_bytes, 1234);
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(AccessFormat::parse("json"), AccessFormat::Json);
        assert_eq!(AccessFormat::parse("$status"), AccessFormat::Pattern("$status".to_string()));
    }

    #[test]
    fn test_combined() {
        let log = entry().render(&AccessFormat::Combined);
        assert!(log.starts_with("192.168.1.1 - - ["));
        assert!(log.contains("\"GET /demos/loader?q=alice HTTP/1.1\" 200 1234"));
        assert!(log.ends_with("\"routes/demos/loader\" \"Mozilla/5.0\""));
    }

    #[test]
    fn test_common_has_no_agent() {
        let log = entry().render(&AccessFormat::Common);
        assert!(log.ends_with("200 1234"));
        assert!(!log.contains("Mozilla/5.0"));
    }

    #[test]
    fn test_json() {
        let log = entry().render(&AccessFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["remote_addr"], "192.168.1.1");
        assert_eq!(value["route"], "routes/demos/loader");
        assert_eq!(value["query"], "q=alice");
    }

    #[test]
    fn test_pattern() {
        let log = entry().render(&AccessFormat::Pattern(
            "$request_method $route $status $request_time".to_string(),
        ));
        assert_eq!(log, "GET routes/demos/loader 200 0.012");

        let mut bare = entry();
        bare.query = None;
        bare.route = None;
        assert_eq!(
            bare.render(&AccessFormat::Pattern("[$request] $route".to_string())),
            "[GET /demos/loader HTTP/1.1] -"
        );
    }
}
