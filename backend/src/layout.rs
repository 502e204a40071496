use console_shared::DashboardLayout;
use std::path::PathBuf;

const DEFAULT_LAYOUT_PATH: &str = "layout/layout.json";

pub fn layout_path() -> PathBuf {
    if let Ok(path) = std::env::var("CONSOLE_LAYOUT_PATH") {
        return PathBuf::from(path);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_LAYOUT_PATH)
}

pub fn load_layout() -> Result<DashboardLayout, String> {
    let path = layout_path();
    let raw = std::fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read layout file {path:?}: {e}"))?;
    serde_json::from_str(&raw).map_err(|e| format!("Invalid layout JSON: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_shared::{PanelKind, CHART_COUNT, SERIES_PER_CHART};

    #[test]
    fn layout_json_is_valid() {
        let layout = load_layout().expect("layout should parse");
        assert!(layout.version >= 1);
        assert!(layout.has_panel(PanelKind::Charts));
        assert!(layout.has_panel(PanelKind::Fleet));
        assert!(layout.has_panel(PanelKind::PitchZero));
        assert_eq!(layout.charts.len(), CHART_COUNT);
        for chart in &layout.charts {
            assert_eq!(chart.labels.len(), SERIES_PER_CHART);
            assert!(chart.axis.min < chart.axis.max);
            assert!(chart.max_points > 0);
        }
    }
}
