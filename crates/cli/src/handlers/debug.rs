//! `probe debug reqres`.

use probe_domain::ProbeConfig;

use crate::bootstrap;
use crate::presentation::render_exchange;

/// Sends the diagnostic requests and prints each exchange.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be created. Failed requests
/// are printed, not returned.
pub async fn execute(config: &ProbeConfig) -> anyhow::Result<()> {
    let diagnostic = bootstrap::debug_reqres(bootstrap::http_client(config)?, config);

    println!("REQRES DIAGNOSTIC ({})", config.targets.reqres);
    println!("{}", "=".repeat(50));
    let exchanges = diagnostic.execute(&config.fixtures.user).await;
    for (index, exchange) in exchanges.iter().enumerate() {
        print!("{}", render_exchange(index + 1, exchange));
    }
    println!("\n{}", "=".repeat(50));

    let failed = exchanges
        .iter()
        .filter(|e| match &e.result {
            Ok(response) => response.is_client_error() || response.is_server_error(),
            Err(_) => true,
        })
        .count();
    println!("{}/{} requests answered without error", exchanges.len() - failed, exchanges.len());
    Ok(())
}
