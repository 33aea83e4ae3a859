use anyhow::Result;

pub fn check_endpoint(host: &str, port: u16, reconnect_ms: u64) -> Result<()> {
    anyhow::ensure!(!host.trim().is_empty(), "link.host is empty");
    anyhow::ensure!(!host.contains('/'), "link.host must be a bare host, not a URL: {}", host);
    anyhow::ensure!(port != 0, "link.port must be non-zero");
    anyhow::ensure!(reconnect_ms >= 250, "link.reconnect_ms too small; use >= 250ms");
    Ok(())
}
