use skiff_proto::LatLon;

/// Positions the boat has reported, oldest first. Never trimmed.
#[derive(Debug, Clone, Default)]
pub struct Track {
    points: Vec<LatLon>,
}

impl Track {
    /// Appends a point; true when it is the first one.
    pub fn push(&mut self, p: LatLon) -> bool {
        self.points.push(p);
        self.points.len() == 1
    }

    pub fn points(&self) -> &[LatLon] {
        &self.points
    }

    pub fn last(&self) -> Option<LatLon> {
        self.points.last().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
