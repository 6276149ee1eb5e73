use std::{future::IntoFuture as _, io, pin::pin, sync::OnceLock, time};

use application::{
    config::{self, Backend},
    router, Args, Config, Service,
};
use axum::extract::MatchedPath;
use axum_client_ip::InsecureClientIp;
use futures::{future, TryFutureExt as _};
use service::infra::{Content, Memory, Sanity};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

/// Levels of events written to stderr rather than stdout.
const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main]
async fn main() {
    init_logging();

    _ = start().await;
}

/// Installs compact `stdout` and `stderr` log layers, both filtered by the
/// configured [`LOG_LEVEL`].
fn init_logging() {
    let enabled = |stderr: bool| {
        move |meta: &log::Metadata<'_>| {
            meta.is_span()
                || STDERR_LEVELS.contains(meta.level()) == stderr
                    && LOG_LEVEL.get().copied().unwrap_or(log::Level::INFO)
                        >= *meta.level()
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(enabled(false))),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(enabled(true))),
        )
        .init();
}

async fn start() -> Result<(), ()> {
    let Args { config, port } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let Config {
        mut server,
        site,
        cms,
        service,
        log,
    } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    if let Some(port) = port {
        server.port = port;
    }

    let (service, background) =
        Service::new(service.into(), content(cms).await?);

    let app = router(service, site)
        .layer(cors(&server.cors)?)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|r: &http::Request<_>| {
                    tracing::info_span!(
                        "HTTP request",
                        http.client_ip = InsecureClientIp::from(
                            r.headers(),
                            r.extensions()
                        )
                            .map(|ip| ip.0.to_string())
                            .ok(),
                        http.method = r.method().as_str(),
                        http.route = r
                            .extensions()
                            .get::<MatchedPath>()
                            .map(MatchedPath::as_str),
                        http.target = r
                            .uri()
                            .path_and_query()
                            .map(http::uri::PathAndQuery::as_str),
                        http.user_agent = r
                            .headers()
                            .get(http::header::USER_AGENT)
                            .and_then(|h| h.to_str().ok()),
                        http.status_code = tracing::field::Empty,
                        http.cache = tracing::field::Empty,
                    )
                })
                .on_response(
                    |r: &http::Response<_>,
                     dur: time::Duration,
                     span: &tracing::Span| {
                        _ = span
                            .record(
                                "http.status_code",
                                tracing::field::display(r.status().as_u16()),
                            )
                            .record(
                                "http.cache",
                                r.headers()
                                    .get("x-cache")
                                    .and_then(|h| h.to_str().ok()),
                            );

                        let duration = format!("{}ms", dur.as_millis());
                        if r.status().is_server_error() {
                            tracing::error!(duration = duration.as_str());
                        } else if r.status().is_client_error() {
                            tracing::warn!(duration = duration.as_str());
                        } else {
                            tracing::info!(duration = duration.as_str());
                        }
                    },
                ),
        );

    let listener = TcpListener::bind((server.host.clone(), server.port))
        .await
        .map_err(|e| {
            log::error!(
                "failed to listen on `{}:{}`: {e}",
                server.host,
                server.port,
            );
        })?;

    log::info!("listening on `{}:{}`", server.host, server.port);

    let serve = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("failed to listen for shutdown signal: {e}");
                future::pending::<()>().await;
            }
            log::info!("shutting down");
        })
        .into_future()
        .map_err(|e| log::error!("webserver failed: {e}"));
    let background = background.into_future().map_err(|e| {
        log::error!("background task failed: {e}");
    });

    future::try_select(pin!(serve), pin!(background))
        .await
        .map(drop)
        .map_err(drop)
}

/// Connects to the configured content backend.
async fn content(cms: config::Cms) -> Result<Content, ()> {
    let config::Cms {
        backend,
        fixtures,
        sanity,
    } = cms;

    let content = match backend {
        Backend::Memory => Memory::load(&fixtures)
            .await
            .map(Content::from)
            .map_err(|e| {
                log::error!("failed to load fixtures from `{fixtures}`: {e}");
            })?,
        Backend::Sanity => Sanity::new(&sanity.into())
            .map(Content::from)
            .map_err(|e| {
                log::error!("failed to initialize `Sanity` client: {e}");
            })?,
    };
    log::info!("serving content from `{backend:?}` backend");

    Ok(content)
}

/// Builds the [`CorsLayer`] letting the configured origins call the API.
fn cors(config: &config::Cors) -> Result<CorsLayer, ()> {
    let cors = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::OPTIONS,
            http::Method::POST,
        ])
        .allow_headers([
            http::header::AUTHORIZATION,
            http::header::CONTENT_TYPE,
        ]);

    if config.origins.iter().any(|o| o == "*") {
        return Ok(cors.allow_origin(AllowOrigin::any()));
    }
    let origins = config
        .origins
        .iter()
        .map(|origin| {
            origin.parse::<http::header::HeaderValue>().map_err(|e| {
                log::error!("`{origin}` is not correct CORS origin: {e}");
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(cors.allow_origin(AllowOrigin::list(origins)))
}
