use serde::Serialize;

/// Percentage price changes over rolling windows.
///
/// Each window is clamped to `[-99.99, 999.99]` or `None` when there is not
/// enough trade data. `None` is never a stand-in for zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChangeWindow {
    pub change_24h: Option<f64>,
    pub change_7d: Option<f64>,
    pub change_30d: Option<f64>,
    pub change_all: Option<f64>,
}

impl PriceChangeWindow {
    /// No data for any window.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.change_24h.is_none()
            && self.change_7d.is_none()
            && self.change_30d.is_none()
            && self.change_all.is_none()
    }
}
