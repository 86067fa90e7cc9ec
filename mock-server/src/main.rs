use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!(
        "mock PayWhirl API on http://{addr} (api_key={}, api_secret={})",
        mock_server::MOCK_API_KEY,
        mock_server::MOCK_API_SECRET
    );
    mock_server::run(listener).await
}
