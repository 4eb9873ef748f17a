use anyhow::Result;
use hostmetrics::*;
use tikv_jemallocator::Jemalloc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout belongs to the CGI response; logs go to stderr (the web server's error log).
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let app_config = config::AppConfig::load()?;
    let metrics_repo = metrics_repo::MetricsRepo::system(app_config.sampler_settings());

    if cgi::is_cgi_invocation() {
        return serve_cgi(&metrics_repo).await;
    }

    let app = routes::app(metrics_repo.clone());
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        platform = %metrics_repo.platform(),
        cpu_metric = ?metrics_repo.settings().cpu_metric,
        "{} listening on http://{}",
        version::banner(),
        addr
    );

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
        }
    }

    Ok(())
}

/// One request, one snapshot, then exit.
async fn serve_cgi(metrics_repo: &metrics_repo::MetricsRepo) -> Result<()> {
    let snapshot = metrics_repo.collect().await;
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = cgi::write_response(&mut stdout, &snapshot) {
        tracing::error!(error = %e, "failed to write CGI response");
        cgi::write_error_response(&mut stdout, "failed to write metrics")?;
    }
    Ok(())
}
