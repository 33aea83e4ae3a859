use anyhow::Result;
use crate::HelmConfig;

pub fn check_helm(cfg: &HelmConfig) -> Result<()> {
    anyhow::ensure!(cfg.hold_period_ms >= 20, "helm.hold_period_ms too small; servo would be flooded");
    anyhow::ensure!(cfg.first_step >= 1 && cfg.repeat_step >= 1 && cfg.key_step >= 1, "helm steps must be >= 1");
    anyhow::ensure!(cfg.default_pump_secs >= 1 && cfg.default_pump_secs <= 120, "helm.default_pump_secs should be 1..120");
    anyhow::ensure!(!cfg.pumps.is_empty(), "helm.pumps is empty");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass() {
        assert!(check_helm(&HelmConfig::default()).is_ok());
        let cfg = HelmConfig { hold_period_ms: 5, ..HelmConfig::default() };
        assert!(check_helm(&cfg).is_err());
    }
}
