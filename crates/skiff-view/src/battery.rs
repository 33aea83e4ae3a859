#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BatteryTier {
    Empty,
    Quarter,
    Half,
    ThreeQuarters,
    Full,
}

impl BatteryTier {
    pub fn from_percentage(p: f64) -> Self {
        if p >= 75.0 {
            BatteryTier::Full
        } else if p >= 50.0 {
            BatteryTier::ThreeQuarters
        } else if p >= 25.0 {
            BatteryTier::Half
        } else if p >= 10.0 {
            BatteryTier::Quarter
        } else {
            BatteryTier::Empty
        }
    }

    pub fn icon_class(self) -> &'static str {
        match self {
            BatteryTier::Full => "fas fa-battery-full",
            BatteryTier::ThreeQuarters => "fas fa-battery-three-quarters",
            BatteryTier::Half => "fas fa-battery-half",
            BatteryTier::Quarter => "fas fa-battery-quarter",
            BatteryTier::Empty => "fas fa-battery-empty",
        }
    }
}

/// Visual state keyed by the vessel's status label.
pub fn status_class(status: &str) -> String {
    format!("status-item battery-{}", status.to_lowercase())
}
