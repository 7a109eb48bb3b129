use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "8081".to_string());
    let context_path = std::env::var("CONTEXT_PATH").unwrap_or_else(|_| "/sgu-api".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, %context_path, "listening");
    mock_server::run(listener, &context_path).await
}
