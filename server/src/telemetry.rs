//! Logging setup and the per-request trace span.
//!
//! Console logging is always on. When `OTEL_EXPORTER_OTLP_ENDPOINT` points at a
//! collector that accepts connections, traces and logs are exported there too.

use axum::{
    body::Body,
    extract::{ConnectInfo, MatchedPath},
    http::{header, Request, Response},
};
use opentelemetry::trace::TracerProvider;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::env;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;
use tower_http::classify::ServerErrorsFailureClass;
use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::auth::ClientIp;

const DEFAULT_SERVICE_NAME: &str = "nfg-server";
const DEFAULT_FILTER: &str = "info,tower_http=info";
const MAX_USER_AGENT: usize = 120;

/// Paths that would drown the log if every hit produced an info span.
const QUIET_PATHS: &[&str] = &["/health", "/healthz", "/static"];

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn collector_reachable(endpoint: &str) -> bool {
    let host_port = endpoint
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .trim_end_matches('/');

    host_port
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .map(|addr| TcpStream::connect_timeout(&addr, Duration::from_millis(100)).is_ok())
        .unwrap_or(false)
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_telemetry() {
    let fmt_layer = tracing_subscriber::fmt::layer();

    let Some(endpoint) = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok() else {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt_layer)
            .init();
        tracing::debug!("OTEL_EXPORTER_OTLP_ENDPOINT not set, using console logging only");
        return;
    };

    if !collector_reachable(&endpoint) {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt_layer)
            .init();
        tracing::info!(
            "OpenTelemetry endpoint {} not reachable, using console logging only",
            endpoint
        );
        return;
    }

    let service_name =
        env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string());
    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(service_name.clone())
        .build();

    let trace_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build();
    let log_exporter = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build();

    let (trace_exporter, log_exporter) = match (trace_exporter, log_exporter) {
        (Ok(traces), Ok(logs)) => (traces, logs),
        (Err(e), _) | (_, Err(e)) => {
            tracing_subscriber::registry()
                .with(env_filter())
                .with(fmt_layer)
                .init();
            tracing::warn!("Failed to create OTLP exporter ({e}), using console logging only");
            return;
        }
    };

    let trace_provider = SdkTracerProvider::builder()
        .with_batch_exporter(trace_exporter)
        .with_resource(resource.clone())
        .build();
    let tracer = trace_provider.tracer(DEFAULT_SERVICE_NAME);
    opentelemetry::global::set_tracer_provider(trace_provider);

    let log_provider = SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource)
        .build();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .with(OpenTelemetryTracingBridge::new(&log_provider))
        .init();

    tracing::info!(
        "OpenTelemetry enabled, exporting traces and logs to {} as {}",
        endpoint,
        service_name
    );
}

fn is_quiet(path: &str) -> bool {
    QUIET_PATHS
        .iter()
        .any(|quiet| path == *quiet || path.starts_with(&format!("{quiet}/")))
}

fn truncated_user_agent(request: &Request<Body>) -> String {
    request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .chars()
        .take(MAX_USER_AGENT)
        .collect()
}

/// Span for one HTTP request: method, route, client address and user agent.
pub fn make_span(request: &Request<Body>) -> Span {
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or(request.uri().path());

    if is_quiet(request.uri().path()) {
        return tracing::trace_span!("http_request", path = %path);
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let ClientIp(ip) = ClientIp::resolve(request.headers(), peer);

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %path,
        ip = %ip,
        user_agent = %truncated_user_agent(request),
    )
}

pub fn on_response(response: &Response<Body>, latency: Duration, span: &Span) {
    if span.metadata().map(|m| m.level()) == Some(&tracing::Level::TRACE) {
        return;
    }
    let status = response.status().as_u16();
    if status >= 500 {
        tracing::error!(
            status = %status,
            latency_ms = %latency.as_millis(),
            "request failed with server error"
        );
    } else {
        tracing::info!(
            status = %status,
            latency_ms = %latency.as_millis(),
            "request completed"
        );
    }
}

pub fn on_failure(error: ServerErrorsFailureClass, latency: Duration, _span: &Span) {
    tracing::error!(
        error = %error,
        latency_ms = %latency.as_millis(),
        "request failed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_paths() {
        assert!(is_quiet("/health"));
        assert!(is_quiet("/healthz"));
        assert!(is_quiet("/static/css/site.css"));
        assert!(!is_quiet("/staticky"));
        assert!(!is_quiet("/workouts"));
    }

    #[test]
    fn test_user_agent_truncated() {
        let long = "x".repeat(500);
        let request = Request::builder()
            .header(header::USER_AGENT, long.as_str())
            .body(Body::empty())
            .unwrap();
        assert_eq!(truncated_user_agent(&request).len(), MAX_USER_AGENT);

        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(truncated_user_agent(&request), "-");
    }

    #[test]
    fn test_collector_unreachable_for_bad_endpoint() {
        assert!(!collector_reachable("http://not a host"));
    }
}
