use anyhow::Result;

use crate::{MapConfig, SamplesConfig};

pub fn check_view(map: &MapConfig, samples: &SamplesConfig) -> Result<()> {
    anyhow::ensure!((1..=19).contains(&map.follow_zoom), "map.follow_zoom should be 1..19");
    anyhow::ensure!(samples.list_limit >= 1, "samples.list_limit must be >= 1");
    anyhow::ensure!(samples.notice_ttl_ms >= 500, "samples.notice_ttl_ms too short to read");
    if let Some(min) = samples.utc_offset_minutes {
        anyhow::ensure!((-1080..=1080).contains(&min), "samples.utc_offset_minutes should be within +/-18h");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_and_list_limits() {
        assert!(check_view(&MapConfig::default(), &SamplesConfig::default()).is_ok());
        assert!(check_view(&MapConfig { follow_zoom: 0 }, &SamplesConfig::default()).is_err());
        let samples = SamplesConfig { list_limit: 0, ..SamplesConfig::default() };
        assert!(check_view(&MapConfig::default(), &samples).is_err());
        let samples = SamplesConfig { utc_offset_minutes: Some(-1500), ..SamplesConfig::default() };
        assert!(check_view(&MapConfig::default(), &samples).is_err());
    }
}
