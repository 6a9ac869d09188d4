mod client;
mod server;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server = tokio::spawn(server::start(listener));

    println!("=== httproc Integration Tests ({addr}) ===");
    let cases = client::run_cases(&format!("http://{addr}")).await;

    server.abort();

    let total = cases.len();
    let mut passed = 0;
    for case in &cases {
        match &case.error {
            None => {
                println!("  PASS  {}", case.name);
                passed += 1;
            }
            Some(e) => println!("  FAIL  {}: {e}", case.name),
        }
    }

    println!();
    println!("{passed}/{total} passed");

    if passed < total {
        anyhow::bail!("{} test(s) failed", total - passed);
    }
    Ok(())
}
