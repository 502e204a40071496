// frontend/src/telemetry_dashboard/chart_feed.rs
//
// Three rolling line charts, three series each. Every series is a seeded
// fixed-capacity ring buffer; the drawing itself sits behind `ChartSink` so the
// feed can run against the SVG renderer, a test recorder, or nothing at all.

use console_shared::{AxisConfig, ChartConfig, ChartSpec, CHART_COUNT, SERIES_PER_CHART};

use super::ring_buffer::RingBuffer;
use super::transport::LogSink;

/// Drawing surface for one chart.
pub trait ChartSink {
    fn append_point(&mut self, series: usize, value: f64);
    fn set_label(&mut self, series: usize, label: &str);
    /// Redraw without animation: the chart shows exactly what was appended.
    fn redraw(&mut self, frame: ChartFrame<'_>);
}

/// Builds sinks. `None` means no rendering engine is available for that chart.
pub trait ChartEngine {
    fn create(&mut self, index: usize, spec: &ChartSpec, styles: &[SeriesStyle; SERIES_PER_CHART])
        -> Option<Box<dyn ChartSink>>;
}

/// Read-only view handed to `ChartSink::redraw`.
#[derive(Clone, Copy)]
pub struct ChartFrame<'a> {
    pub axis: &'a AxisConfig,
    pub labels: &'a [String; SERIES_PER_CHART],
    pub styles: &'a [SeriesStyle; SERIES_PER_CHART],
    pub series: &'a [RingBuffer<f64>; SERIES_PER_CHART],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesStyle {
    pub color: &'static str,
    pub fill: &'static str,
    /// The first series of every chart is the reference (target) value.
    pub dashed: bool,
}

const SERIES_COLORS: [(&str, &str); SERIES_PER_CHART] = [
    ("rgba(255, 99, 132, 0.9)", "rgba(255, 99, 132, 0.1)"),
    ("rgba(54, 162, 235, 1)", "rgba(54, 162, 235, 0.1)"),
    ("rgba(255, 206, 86, 1)", "rgba(255, 206, 86, 0.1)"),
];

pub fn series_style(series: usize) -> SeriesStyle {
    let (color, fill) = SERIES_COLORS[series % SERIES_PER_CHART];
    SeriesStyle {
        color,
        fill,
        dashed: series == 0,
    }
}

pub struct LiveChart {
    title: String,
    axis: AxisConfig,
    labels: [String; SERIES_PER_CHART],
    styles: [SeriesStyle; SERIES_PER_CHART],
    series: [RingBuffer<f64>; SERIES_PER_CHART],
    sink: Box<dyn ChartSink>,
}

impl LiveChart {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn labels(&self) -> &[String; SERIES_PER_CHART] {
        &self.labels
    }

    pub fn series(&self, series: usize) -> Option<&RingBuffer<f64>> {
        self.series.get(series)
    }

    fn redraw(&mut self) {
        self.sink.redraw(ChartFrame {
            axis: &self.axis,
            labels: &self.labels,
            styles: &self.styles,
            series: &self.series,
        });
    }

    fn push(&mut self, values: &[f64]) {
        for (i, &value) in values.iter().enumerate().take(SERIES_PER_CHART) {
            self.series[i].push(value);
            self.sink.append_point(i, value);
        }
        self.redraw();
    }

    fn relabel(&mut self, legends: &[String]) {
        for (i, name) in legends.iter().enumerate().take(SERIES_PER_CHART) {
            self.labels[i] = name.clone();
            self.sink.set_label(i, name);
        }
        self.redraw();
    }
}

pub enum ChartSlot {
    Live(LiveChart),
    /// No engine: the region shows a static placeholder and ignores updates.
    Unavailable { title: String },
}

impl ChartSlot {
    pub fn title(&self) -> &str {
        match self {
            ChartSlot::Live(chart) => chart.title(),
            ChartSlot::Unavailable { title } => title,
        }
    }

    fn set_title(&mut self, new_title: &str) {
        match self {
            ChartSlot::Live(chart) => chart.title = new_title.to_string(),
            ChartSlot::Unavailable { title } => *title = new_title.to_string(),
        }
    }

    pub fn live(&self) -> Option<&LiveChart> {
        match self {
            ChartSlot::Live(chart) => Some(chart),
            ChartSlot::Unavailable { .. } => None,
        }
    }
}

pub const UNAVAILABLE_TEXT: &str = "Chart renderer not loaded, chart unavailable";

pub struct ChartFeed {
    slots: [ChartSlot; CHART_COUNT],
}

impl ChartFeed {
    pub fn initialize(
        specs: [ChartSpec; CHART_COUNT],
        engine: &mut dyn ChartEngine,
        log: &mut dyn LogSink,
    ) -> Self {
        let mut specs = specs.into_iter();
        let slots = std::array::from_fn(|index| {
            // from_fn visits every index exactly once, in order.
            let spec = specs.next().unwrap_or_else(|| ChartSpec::defaults()[index].clone());
            build_slot(index, spec, engine)
        });

        log.append_log("[INIT] charts ready".to_string());
        Self { slots }
    }

    pub fn slots(&self) -> &[ChartSlot; CHART_COUNT] {
        &self.slots
    }

    pub fn slot(&self, chart: usize) -> Option<&ChartSlot> {
        self.slots.get(chart)
    }

    /// Snapshot of one series, oldest sample first.
    pub fn series(&self, chart: usize, series: usize) -> Option<Vec<f64>> {
        self.slot(chart)?.live()?.series(series).map(RingBuffer::to_vec)
    }

    /// Applies device-provided titles and legend names. Entries past the
    /// third chart are ignored; series data is left untouched.
    pub fn apply_configuration(&mut self, configs: &[ChartConfig]) {
        for (slot, config) in self.slots.iter_mut().zip(configs) {
            if let Some(title) = config.title.as_deref().filter(|t| !t.is_empty()) {
                slot.set_title(title);
            }
            if let (ChartSlot::Live(chart), Some(legends)) = (&mut *slot, config.legends.as_deref()) {
                chart.relabel(legends);
            }
        }
    }

    /// Splits one sample 3/3/3 across the charts. Short samples only update
    /// the series they cover.
    pub fn feed_sample(&mut self, values: &[f64]) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let ChartSlot::Live(chart) = slot else {
                continue;
            };
            let start = (index * SERIES_PER_CHART).min(values.len());
            let end = (start + SERIES_PER_CHART).min(values.len());
            chart.push(&values[start..end]);
        }
    }
}

fn build_slot(index: usize, spec: ChartSpec, engine: &mut dyn ChartEngine) -> ChartSlot {
    let styles: [SeriesStyle; SERIES_PER_CHART] = std::array::from_fn(series_style);

    let Some(mut sink) = engine.create(index, &spec, &styles) else {
        tracing::warn!("[CHART] chart {} has no renderer, showing placeholder", index + 1);
        return ChartSlot::Unavailable { title: spec.title };
    };

    let labels: [String; SERIES_PER_CHART] =
        std::array::from_fn(|i| spec.labels.get(i).cloned().unwrap_or_default());
    for (i, label) in labels.iter().enumerate() {
        sink.set_label(i, label);
    }

    let capacity = spec.max_points.max(1);
    ChartSlot::Live(LiveChart {
        title: spec.title,
        axis: spec.axis,
        labels,
        styles,
        series: std::array::from_fn(|_| RingBuffer::seeded(capacity, 0.0)),
        sink,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Append { chart: usize, series: usize, value: f64 },
        Label { chart: usize, series: usize, label: String },
        Redraw { chart: usize, label: String, last: Option<f64> },
    }

    type Events = Rc<RefCell<Vec<Event>>>;

    struct RecordingSink {
        chart: usize,
        events: Events,
    }

    impl ChartSink for RecordingSink {
        fn append_point(&mut self, series: usize, value: f64) {
            self.events.borrow_mut().push(Event::Append {
                chart: self.chart,
                series,
                value,
            });
        }

        fn set_label(&mut self, series: usize, label: &str) {
            self.events.borrow_mut().push(Event::Label {
                chart: self.chart,
                series,
                label: label.to_string(),
            });
        }

        fn redraw(&mut self, frame: ChartFrame<'_>) {
            self.events.borrow_mut().push(Event::Redraw {
                chart: self.chart,
                label: frame.labels[0].clone(),
                last: frame.series[2].iter().next_back().copied(),
            });
        }
    }

    struct RecordingEngine {
        events: Events,
        unavailable: Vec<usize>,
        dashed: Vec<bool>,
    }

    impl RecordingEngine {
        fn new() -> Self {
            Self {
                events: Rc::default(),
                unavailable: Vec::new(),
                dashed: Vec::new(),
            }
        }
    }

    impl ChartEngine for RecordingEngine {
        fn create(
            &mut self,
            index: usize,
            _spec: &ChartSpec,
            styles: &[SeriesStyle; SERIES_PER_CHART],
        ) -> Option<Box<dyn ChartSink>> {
            self.dashed.extend(styles.iter().map(|s| s.dashed));
            if self.unavailable.contains(&index) {
                return None;
            }
            Some(Box::new(RecordingSink {
                chart: index,
                events: self.events.clone(),
            }))
        }
    }

    fn specs_with_capacity(max_points: usize) -> [ChartSpec; CHART_COUNT] {
        let mut specs = ChartSpec::defaults();
        for spec in specs.iter_mut() {
            spec.max_points = max_points;
        }
        specs
    }

    fn feed(engine: &mut RecordingEngine, max_points: usize) -> ChartFeed {
        let mut log = Vec::new();
        let feed = ChartFeed::initialize(specs_with_capacity(max_points), engine, &mut log);
        assert_eq!(log, vec!["[INIT] charts ready".to_string()]);
        engine.events.borrow_mut().clear();
        feed
    }

    const SAMPLE: [f64; 9] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];

    #[test]
    fn buffers_stay_at_capacity() {
        let mut engine = RecordingEngine::new();
        let mut feed = feed(&mut engine, 5);
        for n in 0..40 {
            feed.feed_sample(&[n as f64; 9]);
            for chart in 0..CHART_COUNT {
                for series in 0..SERIES_PER_CHART {
                    assert_eq!(feed.series(chart, series).unwrap().len(), 5);
                }
            }
        }
        assert_eq!(feed.series(1, 2).unwrap(), vec![35.0, 36.0, 37.0, 38.0, 39.0]);
    }

    #[test]
    fn seeded_zeros_are_evicted_first() {
        let mut engine = RecordingEngine::new();
        let mut feed = feed(&mut engine, 5);
        feed.feed_sample(&SAMPLE);
        feed.feed_sample(&SAMPLE);
        assert_eq!(feed.series(0, 0).unwrap(), vec![0.0, 0.0, 0.0, 1.0, 1.0]);
        assert_eq!(feed.series(2, 2).unwrap(), vec![0.0, 0.0, 0.0, 9.0, 9.0]);
    }

    #[test]
    fn sample_is_split_three_ways_in_order() {
        let mut engine = RecordingEngine::new();
        let mut feed = feed(&mut engine, 10);
        feed.feed_sample(&SAMPLE);

        let events = engine.events.borrow();
        let appends: Vec<(usize, usize, f64)> = events
            .iter()
            .filter_map(|e| match e {
                Event::Append { chart, series, value } => Some((*chart, *series, *value)),
                _ => None,
            })
            .collect();
        let expected: Vec<(usize, usize, f64)> = (0..9).map(|i| (i / 3, i % 3, SAMPLE[i])).collect();
        assert_eq!(appends, expected);

        let redraws = events.iter().filter(|e| matches!(e, Event::Redraw { .. })).count();
        assert_eq!(redraws, CHART_COUNT);
    }

    #[test]
    fn short_sample_updates_only_covered_series() {
        let mut engine = RecordingEngine::new();
        let mut feed = feed(&mut engine, 4);
        feed.feed_sample(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(feed.series(0, 2).unwrap(), vec![0.0, 0.0, 0.0, 3.0]);
        assert_eq!(feed.series(1, 0).unwrap(), vec![0.0, 0.0, 0.0, 4.0]);
        assert_eq!(feed.series(1, 1).unwrap(), vec![0.0; 4]);
        assert_eq!(feed.series(2, 0).unwrap(), vec![0.0; 4]);
    }

    #[test]
    fn unavailable_chart_is_a_silent_no_op() {
        let mut engine = RecordingEngine::new();
        engine.unavailable.push(1);
        let mut feed = feed(&mut engine, 5);

        assert!(matches!(feed.slot(1), Some(ChartSlot::Unavailable { .. })));
        feed.feed_sample(&SAMPLE);
        feed.apply_configuration(&[
            ChartConfig::default(),
            ChartConfig {
                title: Some("Torque".into()),
                legends: Some(vec!["a".into()]),
            },
        ]);

        assert!(engine.events.borrow().iter().all(|e| match e {
            Event::Append { chart, .. } | Event::Label { chart, .. } | Event::Redraw { chart, .. } =>
                *chart != 1,
        }));
        assert!(feed.series(1, 0).is_none());
        assert_eq!(feed.slot(1).unwrap().title(), "Torque");
        assert_eq!(feed.series(0, 0).unwrap().last(), Some(&1.0));
    }

    #[test]
    fn redraw_shows_current_labels_and_data() {
        let mut engine = RecordingEngine::new();
        let mut feed = feed(&mut engine, 5);
        feed.feed_sample(&SAMPLE);
        feed.apply_configuration(&[ChartConfig {
            title: None,
            legends: Some(vec!["tar".into()]),
        }]);

        let events = engine.events.borrow();
        let redraws: Vec<&Event> = events
            .iter()
            .filter(|e| matches!(e, Event::Redraw { chart: 0, .. }))
            .collect();
        let first_label = ChartSpec::defaults()[0].labels[0].clone();
        assert_eq!(
            redraws,
            vec![
                &Event::Redraw { chart: 0, label: first_label, last: Some(3.0) },
                &Event::Redraw { chart: 0, label: "tar".into(), last: Some(3.0) },
            ]
        );
    }

    #[test]
    fn first_series_is_dashed() {
        let mut engine = RecordingEngine::new();
        let _feed = feed(&mut engine, 5);
        assert_eq!(engine.dashed, vec![true, false, false, true, false, false, true, false, false]);
    }

    #[test]
    fn configuration_relabels_without_touching_data() {
        let mut engine = RecordingEngine::new();
        let mut feed = feed(&mut engine, 5);
        feed.feed_sample(&SAMPLE);
        let before = feed.series(0, 1).unwrap();

        feed.apply_configuration(&[
            ChartConfig {
                title: Some("Pitch loop".into()),
                legends: Some(vec!["tar".into(), "cur".into(), "e".into(), "extra".into()]),
            },
            ChartConfig {
                title: Some(String::new()),
                legends: None,
            },
            ChartConfig::default(),
            ChartConfig {
                title: Some("ignored".into()),
                legends: None,
            },
        ]);

        let chart = feed.slot(0).unwrap().live().unwrap();
        assert_eq!(chart.title(), "Pitch loop");
        assert_eq!(chart.labels(), &["tar".to_string(), "cur".to_string(), "e".to_string()]);
        assert_eq!(feed.series(0, 1).unwrap(), before);
        assert_eq!(feed.slot(1).unwrap().title(), "Torque output");
        assert_eq!(feed.slot(2).unwrap().title(), "Speed tracking");
    }
}
