// frontend/src/telemetry_dashboard/svg_chart.rs
//
// Chart engine that renders into SVG polyline strings. Each sink keeps its
// last rendered picture in a shared cell the UI reads while drawing.

use std::cell::RefCell;
use std::rc::Rc;

use console_shared::{ChartSpec, SERIES_PER_CHART};

use super::chart_feed::{ChartEngine, ChartFrame, ChartSink, SeriesStyle};
use super::ring_buffer::RingBuffer;

pub const VIEW_W: f64 = 600.0;
pub const VIEW_H: f64 = 220.0;
pub const PLOT_LEFT: f64 = 48.0;
pub const PLOT_RIGHT: f64 = VIEW_W - 12.0;
pub const PLOT_TOP: f64 = 12.0;
pub const PLOT_BOTTOM: f64 = VIEW_H - 20.0;

/// Last rendered state of one chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartPicture {
    pub polylines: [String; SERIES_PER_CHART],
    pub labels: [String; SERIES_PER_CHART],
    pub y_min: f64,
    pub y_max: f64,
    pub y_title: String,
}

pub type SharedPicture = Rc<RefCell<ChartPicture>>;

/// Hands out one picture per chart. Disabled charts get no sink.
#[derive(Default)]
pub struct SvgChartEngine {
    pictures: Vec<Option<SharedPicture>>,
}

impl SvgChartEngine {
    /// Picture cells indexed by chart; `None` for charts without a renderer.
    pub fn into_pictures(self) -> Vec<Option<SharedPicture>> {
        self.pictures
    }
}

impl ChartEngine for SvgChartEngine {
    fn create(
        &mut self,
        index: usize,
        spec: &ChartSpec,
        _styles: &[SeriesStyle; SERIES_PER_CHART],
    ) -> Option<Box<dyn ChartSink>> {
        if self.pictures.len() <= index {
            self.pictures.resize(index + 1, None);
        }
        if !spec.enabled {
            return None;
        }

        let picture = Rc::new(RefCell::new(ChartPicture {
            y_min: spec.axis.min,
            y_max: spec.axis.max,
            y_title: spec.axis.title.clone(),
            ..ChartPicture::default()
        }));
        self.pictures[index] = Some(picture.clone());
        Some(Box::new(SvgSink { picture }))
    }
}

struct SvgSink {
    picture: SharedPicture,
}

impl ChartSink for SvgSink {
    // Points are picked up from the series buffers on the next redraw.
    fn append_point(&mut self, _series: usize, _value: f64) {}

    fn set_label(&mut self, series: usize, label: &str) {
        if let Some(slot) = self.picture.borrow_mut().labels.get_mut(series) {
            *slot = label.to_string();
        }
    }

    fn redraw(&mut self, frame: ChartFrame<'_>) {
        let mut picture = self.picture.borrow_mut();
        for (out, series) in picture.polylines.iter_mut().zip(frame.series.iter()) {
            *out = polyline_points(series, frame.axis.min, frame.axis.max);
        }
        picture.labels = frame.labels.clone();
        picture.y_min = frame.axis.min;
        picture.y_max = frame.axis.max;
        picture.y_title = frame.axis.title.clone();
    }
}

/// `"x,y x,y ..."` for an SVG `<polyline>`, oldest sample on the left.
/// Values outside `[min, max]` are pinned to the plot edge.
pub fn polyline_points(series: &RingBuffer<f64>, min: f64, max: f64) -> String {
    let n = series.len();
    if n == 0 {
        return String::new();
    }

    let span = if (max - min).abs() < f64::EPSILON { 1.0 } else { max - min };
    let plot_w = PLOT_RIGHT - PLOT_LEFT;
    let plot_h = PLOT_BOTTOM - PLOT_TOP;
    let step = if n > 1 { plot_w / (n - 1) as f64 } else { 0.0 };

    let mut out = String::with_capacity(n * 14);
    for (i, &v) in series.iter().enumerate() {
        let v = if v.is_finite() { v.clamp(min.min(max), max.max(min)) } else { min };
        let x = PLOT_LEFT + step * i as f64;
        let y = PLOT_BOTTOM - ((v - min) / span) * plot_h;
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!("{x:.1},{y:.1}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry_dashboard::chart_feed::ChartFeed;

    #[test]
    fn polyline_spans_plot_and_pins_out_of_range_values() {
        let mut rb = RingBuffer::seeded(3, 0.0);
        rb.push(-15.0);
        rb.push(0.0);
        rb.push(99.0);
        let pts = polyline_points(&rb, -15.0, 15.0);
        let coords: Vec<&str> = pts.split(' ').collect();
        assert_eq!(coords.len(), 3);
        assert_eq!(coords[0], format!("{PLOT_LEFT:.1},{PLOT_BOTTOM:.1}"));
        assert_eq!(coords[1], format!("{:.1},{:.1}", (PLOT_LEFT + PLOT_RIGHT) / 2.0, (PLOT_TOP + PLOT_BOTTOM) / 2.0));
        assert_eq!(coords[2], format!("{PLOT_RIGHT:.1},{PLOT_TOP:.1}"));
    }

    #[test]
    fn disabled_chart_gets_no_picture() {
        let mut specs = ChartSpec::defaults();
        specs[1].enabled = false;
        let mut engine = SvgChartEngine::default();
        let mut log = Vec::new();
        let mut feed = ChartFeed::initialize(specs, &mut engine, &mut log);
        feed.feed_sample(&[1.0; 9]);

        let pictures = engine.into_pictures();
        assert_eq!(pictures.len(), 3);
        assert!(pictures[1].is_none());

        let first = pictures[0].as_ref().unwrap().borrow();
        assert_eq!(first.labels[0], "target");
        assert_eq!(first.polylines[0].split(' ').count(), 100);
        assert_eq!(first.y_title, "Angle (°)");
    }
}
