// frontend/src/telemetry_dashboard/charts_tab.rs

use dioxus::prelude::*;

use super::chart_feed::{series_style, ChartSlot, UNAVAILABLE_TEXT};
use super::console::Console;
use super::svg_chart::{
    ChartPicture, SharedPicture, PLOT_BOTTOM, PLOT_LEFT, PLOT_RIGHT, PLOT_TOP, VIEW_H, VIEW_W,
};

const CARD_STYLE: &str = "width:100%; background:#020617; border-radius:14px; border:1px solid #334155; \
                          padding:12px; display:flex; flex-direction:column; gap:8px;";

#[component]
pub fn ChartsTab(
    console: Signal<Option<Console>>,
    pictures: Signal<Vec<Option<SharedPicture>>>,
) -> Element {
    let guard = console.read();
    let Some(feed) = guard.as_ref().and_then(|c| c.charts.as_ref()) else {
        return rsx! {};
    };

    // Snapshot titles and pictures so nothing stays borrowed across the markup.
    let charts: Vec<(usize, String, Option<ChartPicture>)> = feed
        .slots()
        .iter()
        .enumerate()
        .map(|(i, slot)| {
            let picture = match slot {
                ChartSlot::Live(_) => pictures
                    .read()
                    .get(i)
                    .and_then(|p| p.as_ref())
                    .map(|p| p.borrow().clone()),
                ChartSlot::Unavailable { .. } => None,
            };
            (i, slot.title().to_string(), picture)
        })
        .collect();

    rsx! {
        div { style: "display:grid; grid-template-columns: repeat(auto-fit, minmax(420px, 1fr)); gap:12px;",
            for (i, title, picture) in charts.into_iter() {
                div { key: "{i}", style: CARD_STYLE,
                    div { style: "color:#94a3b8; font-size:12px;", "{title}" }
                    if let Some(picture) = picture {
                        ChartSvg { picture }
                    } else {
                        div {
                            style: "height:180px; display:flex; align-items:center; justify-content:center; color:#64748b; font-size:13px; border:1px dashed #334155; border-radius:10px;",
                            "{UNAVAILABLE_TEXT}"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ChartSvg(picture: ChartPicture) -> Element {
    let grid_y_step = (PLOT_BOTTOM - PLOT_TOP) / 4.0;
    let y_mid = (picture.y_min + picture.y_max) * 0.5;

    // (points, color, dash pattern) per series
    let lines: Vec<(String, &'static str, &'static str)> = picture
        .polylines
        .iter()
        .enumerate()
        .filter(|(_, pts)| !pts.is_empty())
        .map(|(i, pts)| {
            let style = series_style(i);
            (pts.clone(), style.color, if style.dashed { "6 4" } else { "none" })
        })
        .collect();
    let legend: Vec<(String, &'static str, &'static str)> = picture
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let style = series_style(i);
            (label.clone(), style.color, if style.dashed { "4 3" } else { "none" })
        })
        .collect();

    rsx! {
        svg {
            style: "width:100%; height:auto; display:block;",
            view_box: "0 0 {VIEW_W} {VIEW_H}",

            for i in 1..=3 {
                line {
                    x1: "{PLOT_LEFT}", y1: "{PLOT_TOP + grid_y_step * (i as f64)}",
                    x2: "{PLOT_RIGHT}", y2: "{PLOT_TOP + grid_y_step * (i as f64)}",
                    stroke: "#1f2937", "stroke-width": "1"
                }
            }
            line { x1: "{PLOT_LEFT}", y1: "{PLOT_TOP}", x2: "{PLOT_LEFT}", y2: "{PLOT_BOTTOM}", stroke: "#334155", stroke_width: "1" }
            line { x1: "{PLOT_LEFT}", y1: "{PLOT_BOTTOM}", x2: "{PLOT_RIGHT}", y2: "{PLOT_BOTTOM}", stroke: "#334155", stroke_width: "1" }

            text { x: "6", y: "{PLOT_TOP + 4.0}", fill: "#94a3b8", "font-size": "10", {format!("{:.0}", picture.y_max)} }
            text { x: "6", y: "{(PLOT_TOP + PLOT_BOTTOM) / 2.0 + 4.0}", fill: "#94a3b8", "font-size": "10", {format!("{:.0}", y_mid)} }
            text { x: "6", y: "{PLOT_BOTTOM + 4.0}", fill: "#94a3b8", "font-size": "10", {format!("{:.0}", picture.y_min)} }
            text { x: "{PLOT_LEFT}", y: "{VIEW_H - 4.0}", fill: "#64748b", "font-size": "10", "{picture.y_title}" }

            for (pts, color, dash) in lines.iter() {
                polyline {
                    points: "{pts}",
                    fill: "none",
                    stroke: "{color}",
                    stroke_width: "2",
                    "stroke-dasharray": "{dash}",
                    stroke_linejoin: "round",
                    stroke_linecap: "round",
                }
            }
        }

        div { style: "display:flex; flex-wrap:wrap; gap:8px; padding:6px 10px; background:rgba(2,6,23,0.75); border:1px solid #1f2937; border-radius:10px;",
            for (label, color, dash) in legend.iter() {
                div { style: "display:flex; align-items:center; gap:6px; font-size:12px; color:#cbd5f5;",
                    svg { width: "26", height: "8", view_box: "0 0 26 8",
                        line {
                            x1: "1", y1: "4", x2: "25", y2: "4",
                            stroke: "{color}",
                            stroke_width: "2",
                            "stroke-dasharray": "{dash}",
                            stroke_linecap: "round",
                        }
                    }
                    "{label}"
                }
            }
        }
    }
}
