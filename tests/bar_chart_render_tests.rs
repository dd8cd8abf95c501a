use std::f64::consts::FRAC_PI_2;

use approx::assert_relative_eq;
use barchart_rs::api::{BarChart, BarStyle, ChartOptions, ManualScheduler};
use barchart_rs::content::{BarText, Content, Label, LegendEntry};
use barchart_rs::core::Sample;
use barchart_rs::render::{Color, DrawCommand, RecordingSurface};
use serde_json::json;

fn build_chart(options: ChartOptions) -> BarChart<RecordingSurface, ManualScheduler> {
    BarChart::new(
        RecordingSurface::new(600, 400),
        options,
        ManualScheduler::default(),
    )
    .expect("chart init")
}

fn render_fresh(chart: &mut BarChart<RecordingSurface, ManualScheduler>) {
    chart.surface_mut().clear_commands();
    chart.render().expect("render");
}

#[test]
fn pass_starts_with_clear_and_background_and_stays_balanced() {
    let mut chart = build_chart(ChartOptions::default());
    chart
        .update_json(&json!({
            "labels": ["a", "b"],
            "data": [1, 2],
            "title": "Totals",
            "xAxis": "group",
            "yAxis": "count"
        }))
        .expect("update");
    render_fresh(&mut chart);

    let commands = chart.surface().commands();
    let bounds = chart.surface().commands()[0].clone();
    assert!(matches!(bounds, DrawCommand::ClearRect(rect) if rect.width == 600.0 && rect.height == 400.0));
    let background = ChartOptions::default().background_color.expect("default background");
    assert!(matches!(&commands[1], DrawCommand::FillRect { color, .. } if *color == background));
    assert_eq!(chart.surface().save_depth(), 0);

    let texts: Vec<&str> = chart.surface().texts().collect();
    let title = texts.iter().position(|text| *text == "Totals").expect("title");
    let x_axis = texts.iter().position(|text| *text == "group").expect("x axis");
    let y_axis = texts.iter().position(|text| *text == "count").expect("y axis");
    assert!(title < x_axis && x_axis < y_axis);
}

#[test]
fn transparent_background_skips_fill() {
    let mut chart = build_chart(ChartOptions::default().with_background_color(None));
    chart
        .update(Content::new(vec![Label::from("a")], vec![Sample::Scalar(1.0)]))
        .expect("update");
    render_fresh(&mut chart);

    assert!(matches!(chart.surface().commands()[0], DrawCommand::ClearRect(_)));
    assert!(!matches!(chart.surface().commands()[1], DrawCommand::FillRect { .. }));
}

#[test]
fn stacked_segments_split_at_cumulative_boundaries() {
    let options = ChartOptions::default()
        .with_bar_style(BarStyle::Stacked)
        .with_max_value_padding(0.0);
    let mut chart = build_chart(options);
    chart
        .update(
            Content::new(vec![Label::from("a")], vec![Sample::group([3.0, 5.0, 2.0])]).with_hints(
                vec![Some(BarText::Segments(vec![
                    Some("three".to_owned()),
                    Some("five".to_owned()),
                    Some("two".to_owned()),
                ]))],
            ),
        )
        .expect("update");
    render_fresh(&mut chart);

    let layout = chart.layout().expect("layout").clone();
    assert_relative_eq!(layout.ticks.end, 10.0);
    let bottom = layout.plot.bottom();

    let regions = chart.hit_regions();
    assert_eq!(regions.len(), 3);
    for (region, (segment, cumulative)) in regions.iter().zip([(0, 3.0), (1, 8.0), (2, 10.0)]) {
        assert_eq!(region.index, 0);
        assert_eq!(region.segment, Some(segment));
        assert_relative_eq!(region.rect.y, bottom - layout.bar_height(cumulative));
    }
    assert_relative_eq!(regions[2].rect.y, layout.plot.y);
    assert_eq!(regions[1].lines, vec!["five"]);
}

#[test]
fn thin_segments_merge_into_the_next_drawn_segment() {
    let options = ChartOptions::default()
        .with_bar_style(BarStyle::Stacked)
        .with_stacked_min_gap_px(3.0);
    let mut chart = build_chart(options);
    chart
        .update(
            Content::new(vec![Label::from("a")], vec![Sample::group([100.0, 0.1, 50.0])])
                .with_hints(vec![Some(BarText::Bar("stack".to_owned()))]),
        )
        .expect("update");
    render_fresh(&mut chart);

    let layout = chart.layout().expect("layout").clone();
    let segments: Vec<Option<usize>> = chart.hit_regions().iter().map(|region| region.segment).collect();
    assert_eq!(segments, vec![Some(0), Some(2)]);

    let top = &chart.hit_regions()[1];
    assert_relative_eq!(
        top.rect.bottom(),
        layout.plot.bottom() - layout.bar_height(100.0)
    );
}

#[test]
fn error_mode_draws_whiskers_at_standard_error() {
    let options = ChartOptions::default().with_bar_style(BarStyle::Error);
    let mut chart = build_chart(options);
    chart
        .update(Content::new(
            vec![Label::from("a")],
            vec![Sample::group([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0])],
        ))
        .expect("update");
    render_fresh(&mut chart);

    let stat = chart.stats()[0];
    let layout = chart.layout().expect("layout").clone();
    assert!(layout.max_chart_value >= stat.mean + stat.std_error);

    let (left, right) = layout.bar_span(0);
    let center = (left + right) / 2.0;
    let high = layout.value_to_y(stat.mean + stat.std_error);
    let low = layout.value_to_y(stat.mean - stat.std_error);
    let commands = chart.surface().commands();
    assert!(commands.contains(&DrawCommand::MoveTo { x: center, y: low }));
    assert!(commands.contains(&DrawCommand::LineTo { x: center, y: high }));
}

#[test]
fn wide_labels_are_drawn_rotated() {
    let mut chart = build_chart(ChartOptions::default());
    let long = "an unusually long category name";
    chart
        .update(Content::new(
            vec![Label::from(long); 6],
            vec![Sample::Scalar(1.0); 6],
        ))
        .expect("update");
    render_fresh(&mut chart);

    let rotations = chart
        .surface()
        .commands()
        .iter()
        .filter(|command| matches!(command, DrawCommand::Rotate { radians } if *radians == -FRAC_PI_2))
        .count();
    assert_eq!(rotations, 6);
    assert_eq!(chart.surface().save_depth(), 0);
}

#[test]
fn multi_line_labels_draw_every_line() {
    let mut chart = build_chart(ChartOptions::default());
    chart
        .update_json(&json!({
            "labels": [["Q1", "2024"], "Q2"],
            "data": [1, 2]
        }))
        .expect("update");
    render_fresh(&mut chart);

    let texts: Vec<&str> = chart.surface().texts().collect();
    for expected in ["Q1", "2024", "Q2"] {
        assert!(texts.contains(&expected), "missing label line {expected}");
    }
    assert_eq!(chart.layout().expect("layout").label_lines, 2);
}

#[test]
fn legend_tooltips_and_tags_are_drawn() {
    let red = Color::rgb(1.0, 0.0, 0.0);
    let mut chart = build_chart(ChartOptions::default());
    chart
        .update(
            Content::new(
                vec![Label::from("a"), Label::from("b")],
                vec![Sample::Scalar(10.0), Sample::Scalar(20.0)],
            )
            .with_legend(vec![LegendEntry::new("series", red)])
            .with_bar_tooltips(vec![None, Some("n=20".to_owned())])
            .with_data_tags(vec![Some(BarText::Bar("ten".to_owned())), None]),
        )
        .expect("update");
    render_fresh(&mut chart);

    let texts: Vec<&str> = chart.surface().texts().collect();
    assert!(texts.contains(&"series"));
    assert!(texts.contains(&"n=20"));
    assert!(texts.contains(&"ten"));
    assert_eq!(chart.surface().filled_rects_with(red).count(), 1);
}

#[test]
fn per_bar_fill_colors_override_default() {
    let blue = Color::rgb(0.0, 0.0, 1.0);
    let mut chart = build_chart(ChartOptions::default());
    chart
        .update_json(&json!({
            "labels": ["a", "b"],
            "data": [1, 2],
            "fillColor": [null, "#0000ff"]
        }))
        .expect("update");
    render_fresh(&mut chart);

    let fills: Vec<Color> = chart
        .surface()
        .commands()
        .iter()
        .filter_map(|command| match command {
            DrawCommand::FillPath { color } => Some(*color),
            _ => None,
        })
        .collect();
    assert_eq!(fills, vec![ChartOptions::default().bar_fill_color, blue]);
}

#[test]
fn hint_box_stays_on_surface() {
    let options = ChartOptions::default();
    let mut chart = build_chart(options.clone());
    chart
        .update(
            Content::new(
                vec![Label::from("a"), Label::from("b")],
                vec![Sample::Scalar(5.0), Sample::Scalar(9.0)],
            )
            .with_hints(vec![None, Some(BarText::Bar("nine\nsamples".to_owned()))]),
        )
        .expect("update");
    render_fresh(&mut chart);

    let rect = chart.hit_regions()[0].rect;
    chart.pointer_move(rect.center_x(), rect.center_y());
    render_fresh(&mut chart);

    let boxes: Vec<_> = chart
        .surface()
        .filled_rects_with(options.hint_background_color)
        .collect();
    assert_eq!(boxes.len(), 1);
    let hint_box = boxes[0];
    assert!(hint_box.x >= 0.0 && hint_box.right() <= 600.0);
    assert!(hint_box.y >= 0.0 && hint_box.bottom() <= 400.0);
    // Right-most bar: the box flips to the left of the region.
    assert!(hint_box.right() <= rect.x);

    let texts: Vec<&str> = chart.surface().texts().collect();
    assert_eq!(&texts[texts.len() - 2..], &["nine", "samples"]);
}

#[test]
fn stack_tags_are_centered_in_segments_tall_enough_to_hold_them() {
    let options = ChartOptions::default().with_bar_style(BarStyle::Stacked);
    let tag_font = options.font_size_data_tags;
    let mut chart = build_chart(options);
    let segments = || {
        Some(BarText::Segments(vec![
            Some("tall".to_owned()),
            Some("short".to_owned()),
        ]))
    };
    chart
        .update(
            Content::new(vec![Label::from("a")], vec![Sample::group([9.0, 0.3])])
                .with_hints(vec![segments()])
                .with_data_tags(vec![segments()]),
        )
        .expect("update");
    render_fresh(&mut chart);

    let regions = chart.hit_regions();
    assert_eq!(regions.len(), 2);
    let (tall, short) = (regions[0].rect, regions[1].rect);
    assert!(tall.height >= tag_font * 1.25);
    assert!(short.height > 0.0 && short.height < tag_font * 1.25);

    let tags: Vec<(&str, f64, f64)> = chart
        .surface()
        .commands()
        .iter()
        .filter_map(|command| match command {
            DrawCommand::FillText { text, x, y, .. } => Some((text.as_str(), *x, *y)),
            _ => None,
        })
        .filter(|(text, ..)| matches!(*text, "tall" | "short"))
        .collect();
    assert_eq!(tags.len(), 1);
    let (text, x, y) = tags[0];
    assert_eq!(text, "tall");
    assert_relative_eq!(x, tall.center_x());
    assert_relative_eq!(y, tall.center_y());
}
