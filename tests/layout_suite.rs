use mscgen_layout::layout::{Shape, TextAnchor};
use mscgen_layout::{
    compute_layout, Arc, Chart, ChartLayout, CharMetrics, Entity, LayoutConfig, LayoutError,
    Options, Theme,
};

fn chart_with(entities: &[&str], rows: Vec<Vec<Arc>>) -> Chart {
    let mut chart = Chart::new();
    chart.entities = entities.iter().map(|n| Entity::named(n)).collect();
    chart.rows = rows;
    chart
}

fn layout(chart: &Chart) -> ChartLayout {
    compute_layout(chart, &Theme::default(), &LayoutConfig::default(), &CharMetrics)
        .expect("layout failed")
}

fn entity_center(layout: &ChartLayout, index: usize) -> f32 {
    match layout.entities[index].elements[0].shape {
        Shape::Rect { x, width, .. } => x + width / 2.0,
        ref other => panic!("entity {index} is not a rect: {other:?}"),
    }
}

fn texts(layout: &ChartLayout) -> Vec<(f32, String)> {
    layout
        .sequence
        .iter()
        .flat_map(|p| &p.group.elements)
        .filter_map(|e| match &e.shape {
            Shape::Text { x, text, .. } => Some((*x, text.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn entity_columns_are_evenly_spaced() {
    let chart = chart_with(&["a", "b", "c", "d"], vec![]);
    let laid = layout(&chart);
    let centers: Vec<f32> = (0..4).map(|i| entity_center(&laid, i)).collect();
    for pair in centers.windows(2) {
        assert!(pair[1] > pair[0]);
        assert_eq!(pair[1] - pair[0], 160.0);
    }
}

#[test]
fn row_bands_descend_and_never_shrink_below_base() {
    let tall_note = Arc::between("note", "a", "b")
        .labelled("a note with a reasonably long text that wraps into several lines of output");
    let chart = chart_with(
        &["a", "b"],
        vec![
            vec![Arc::between("->", "a", "b")],
            vec![tall_note],
            vec![Arc::between("<-", "a", "b")],
        ],
    );
    let laid = layout(&chart);
    // lifelines[0] is the band above the first row
    let rows = &laid.lifelines[1..];
    assert_eq!(rows.len(), 3);
    let mut last_y = f32::NEG_INFINITY;
    for band in rows {
        assert!(band.y > last_y);
        assert!(band.height >= 38.0);
        last_y = band.y;
    }
    assert!(rows[1].height > 38.0, "note row should have grown");
}

#[test]
fn self_reference_loops_hang_off_a_single_column() {
    let chart = chart_with(
        &["a", "b"],
        vec![vec![Arc::between("->", "a", "a").labelled("tick")]],
    );
    let laid = layout(&chart);
    let center = entity_center(&laid, 0);
    let turns: Vec<f32> = laid
        .sequence
        .iter()
        .flat_map(|p| &p.group.elements)
        .filter_map(|e| match e.shape {
            Shape::UTurn { x, .. } => Some(x),
            _ => None,
        })
        .collect();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0], center);
}

#[test]
fn double_line_self_reference_nests_two_turns() {
    let chart = chart_with(&["a"], vec![vec![Arc::between(":>", "a", "a")]]);
    let laid = layout(&chart);
    let turns = laid
        .sequence
        .iter()
        .flat_map(|p| &p.group.elements)
        .filter(|e| matches!(e.shape, Shape::UTurn { .. }))
        .count();
    assert_eq!(turns, 2);
}

#[test]
fn broadcast_fans_out_to_every_other_entity() {
    let chart = chart_with(
        &["a", "b", "c", "d"],
        vec![vec![Arc::between("->", "a", "*").labelled("hello all")]],
    );
    let laid = layout(&chart);
    let from = entity_center(&laid, 0);
    let segments: Vec<(f32, f32)> = laid
        .sequence
        .iter()
        .flat_map(|p| &p.group.elements)
        .filter_map(|e| match e.shape {
            Shape::Line { x1, x2, .. } => Some((x1, x2)),
            _ => None,
        })
        .collect();
    assert_eq!(segments.len(), 3);
    for (x1, _) in &segments {
        assert_eq!(*x1, from);
    }
    // the label is emitted once, not per segment
    let labels = texts(&laid)
        .into_iter()
        .filter(|(_, t)| t == "hello all")
        .count();
    assert_eq!(labels, 1);
}

#[test]
fn inline_expression_box_spans_exactly_its_rows() {
    let mut frame = Arc::between("loop", "a", "b").labelled("three times");
    frame.numberofrows = Some(1);
    let chart = chart_with(
        &["a", "b"],
        vec![
            vec![frame],
            vec![Arc::between("->", "a", "b")],
            vec![Arc::between("<-", "a", "b")],
        ],
    );
    let laid = layout(&chart);
    assert_eq!(laid.spans.len(), 1);
    // lifelines[r + 1] mirrors row r
    let expected = laid.lifelines[3].y - laid.lifelines[1].y;
    match laid.spans[0].group.elements[0].shape {
        Shape::Rect { height, .. } => assert_eq!(height, expected),
        ref other => panic!("span box is not a rect: {other:?}"),
    }
    assert_eq!(laid.spans[0].y, laid.lifelines[1].y);
}

#[test]
fn span_declared_past_the_last_row_errors() {
    let mut frame = Arc::between("opt", "a", "b");
    frame.numberofrows = Some(5);
    let chart = chart_with(&["a", "b"], vec![vec![frame], vec![Arc::between("->", "a", "b")]]);
    let err = compute_layout(&chart, &Theme::default(), &LayoutConfig::default(), &CharMetrics)
        .unwrap_err();
    assert!(matches!(err, LayoutError::SpanPastEnd { row: 0, .. }));
}

#[test]
fn simple_message_runs_left_to_right_with_a_midpoint_label() {
    let chart = chart_with(
        &["A", "B"],
        vec![vec![Arc::between("->", "A", "B").labelled("hi")]],
    );
    let laid = layout(&chart);
    let (xa, xb) = (entity_center(&laid, 0), entity_center(&laid, 1));
    assert!(xa < xb);

    let lines: Vec<(f32, f32)> = laid
        .sequence
        .iter()
        .flat_map(|p| &p.group.elements)
        .filter_map(|e| match e.shape {
            Shape::Line { x1, x2, .. } => Some((x1, x2)),
            _ => None,
        })
        .collect();
    assert_eq!(lines, vec![(xa, xb)]);

    let labels: Vec<(f32, String)> = texts(&laid)
        .into_iter()
        .filter(|(_, t)| t == "hi")
        .collect();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].0, (xa + xb) / 2.0);
}

#[test]
fn lost_message_stops_three_quarters_of_the_way() {
    let chart = chart_with(&["a", "b"], vec![vec![Arc::between("-x", "a", "b")]]);
    let laid = layout(&chart);
    let (xa, xb) = (entity_center(&laid, 0), entity_center(&laid, 1));
    let line = laid
        .sequence
        .iter()
        .flat_map(|p| &p.group.elements)
        .find_map(|e| match e.shape {
            Shape::Line { x1, x2, .. } => Some((x1, x2)),
            _ => None,
        })
        .expect("no line found");
    assert_eq!(line.0, xa);
    assert_eq!(line.1, xa + (xb - xa) * 0.75);
}

#[test]
fn arcskip_drops_the_arrow_end_by_rows() {
    let mut skipping = Arc::between("->", "a", "b").labelled("later");
    skipping.arcskip = Some(1.5);
    let chart = chart_with(
        &["a", "b"],
        vec![vec![skipping], vec![Arc::between("->", "a", "b")]],
    );
    let laid = layout(&chart);
    let ends: Vec<(f32, f32)> = laid
        .sequence
        .iter()
        .flat_map(|p| &p.group.elements)
        .filter_map(|e| match e.shape {
            Shape::Line { y1, y2, .. } => Some((y1, y2)),
            _ => None,
        })
        .collect();
    assert_eq!(ends.len(), 2);
    assert_eq!(ends[0], (0.0, 1.5 * 38.0));
    assert_eq!(ends[1], (0.0, 0.0), "plain arcs stay level");
}

#[test]
fn arcgradient_slopes_every_regular_arc() {
    let mut chart = chart_with(
        &["a", "b"],
        vec![vec![Arc::between("->", "a", "b").labelled("down")]],
    );
    chart.options = Options {
        arcgradient: Some(10.0),
        ..Options::default()
    };
    let laid = layout(&chart);
    let line = laid
        .sequence
        .iter()
        .flat_map(|p| &p.group.elements)
        .find_map(|e| match e.shape {
            Shape::Line { y1, y2, .. } => Some((y1, y2)),
            _ => None,
        })
        .expect("no line found");
    assert_eq!(line, (0.0, 10.0));
    // the widened rows carry the slope
    assert_eq!(laid.lifelines[1].height, 48.0);
}

#[test]
fn hscale_doubles_spacing_and_canvas_width() {
    let mut chart = chart_with(&["a", "b"], vec![vec![Arc::between("->", "a", "b")]]);
    let plain = layout(&chart);
    chart.options = Options {
        hscale: Some(2.0),
        ..Options::default()
    };
    let scaled = layout(&chart);

    let plain_gap = entity_center(&plain, 1) - entity_center(&plain, 0);
    let scaled_gap = entity_center(&scaled, 1) - entity_center(&scaled, 0);
    assert_eq!(scaled_gap, 2.0 * plain_gap);
    assert_eq!(scaled.canvas.width, 2.0 * plain.canvas.width);
}

#[test]
fn fixed_width_scales_uniformly() {
    let mut chart = chart_with(
        &["a", "b", "c"],
        vec![vec![Arc::between("->", "a", "c").labelled("x")]],
    );
    let plain = layout(&chart);
    chart.options = Options {
        width: Some(500.0),
        ..Options::default()
    };
    let fixed = layout(&chart);
    assert_eq!(fixed.canvas.width, 500.0);
    let plain_aspect = plain.canvas.height / plain.canvas.width;
    let fixed_aspect = fixed.canvas.height / fixed.canvas.width;
    assert!((plain_aspect - fixed_aspect).abs() < 1e-5);
    assert!((fixed.canvas.scale - 500.0 / plain.canvas.width).abs() < 1e-5);
}

#[test]
fn ellipsis_rows_break_the_lifelines() {
    let chart = chart_with(
        &["a", "b"],
        vec![
            vec![Arc::new("...").labelled("some time passes")],
            vec![Arc::new("|||")],
            vec![Arc::between("->", "a", "b")],
        ],
    );
    let laid = layout(&chart);
    assert!(laid.lifelines[1].omitted);
    assert!(!laid.lifelines[2].omitted, "||| keeps solid lifelines");
    assert!(!laid.lifelines[3].omitted);
}

#[test]
fn comment_between_entities_is_striped() {
    let chart = chart_with(
        &["a", "b"],
        vec![vec![Arc::between("---", "a", "b").labelled("setup done")]],
    );
    let laid = layout(&chart);
    let line = laid
        .sequence
        .iter()
        .flat_map(|p| &p.group.elements)
        .find(|e| matches!(e.shape, Shape::Line { .. }))
        .expect("no comment line");
    assert_eq!(line.class, "striped");
}

#[test]
fn full_width_comment_is_dotted() {
    let chart = chart_with(&["a", "b"], vec![vec![Arc::new("---")]]);
    let laid = layout(&chart);
    let line = laid
        .sequence
        .iter()
        .flat_map(|p| &p.group.elements)
        .find(|e| matches!(e.shape, Shape::Line { .. }))
        .expect("no comment line");
    assert_eq!(line.class, "dotted");
}

#[test]
fn note_gets_a_fold_and_rbox_rounded_corners() {
    let chart = chart_with(
        &["a", "b"],
        vec![
            vec![Arc::between("note", "a", "a").labelled("n")],
            vec![Arc::between("rbox", "b", "b").labelled("r")],
        ],
    );
    let laid = layout(&chart);
    assert!(laid
        .notes
        .iter()
        .flat_map(|p| &p.group.elements)
        .any(|e| matches!(e.shape, Shape::Note { fold, .. } if fold == 9.0)));
    assert!(laid
        .notes
        .iter()
        .flat_map(|p| &p.group.elements)
        .any(|e| matches!(e.shape, Shape::Rect { rx, .. } if rx == 6.0)));
}

#[test]
fn inline_expression_tag_leads_with_its_kind() {
    let mut frame = Arc::between("alt", "a", "b").labelled("x > 0");
    frame.numberofrows = Some(0);
    let chart = chart_with(
        &["a", "b"],
        vec![vec![frame], vec![Arc::between("->", "a", "b")]],
    );
    let laid = layout(&chart);
    let tag_text = laid
        .notes
        .iter()
        .flat_map(|p| &p.group.elements)
        .find_map(|e| match &e.shape {
            Shape::Text { text, anchor, .. } => Some((text.clone(), *anchor)),
            _ => None,
        })
        .expect("no tag text");
    assert_eq!(tag_text.0, "alt: x > 0");
    assert_eq!(tag_text.1, TextAnchor::Start);
    assert!(laid
        .notes
        .iter()
        .flat_map(|p| &p.group.elements)
        .any(|e| matches!(e.shape, Shape::EdgeRemark { .. })));
}

#[test]
fn watermark_sits_in_the_canvas_center() {
    let mut chart = chart_with(&["a", "b"], vec![vec![Arc::between("->", "a", "b")]]);
    chart.options.watermark = Some("draft".to_owned());
    let laid = layout(&chart);
    let mark = laid.canvas.watermark.expect("watermark missing");
    assert_eq!(mark.x, laid.canvas.width / 2.0);
    assert_eq!(mark.y, laid.canvas.height / 2.0);
    assert!(mark.angle < 0.0 && mark.angle > -90.0);
}

#[test]
fn duplicate_entities_are_rejected() {
    let chart = chart_with(&["a", "a"], vec![]);
    let err = compute_layout(&chart, &Theme::default(), &LayoutConfig::default(), &CharMetrics)
        .unwrap_err();
    assert!(matches!(err, LayoutError::Ast(_)));
}

#[test]
fn unknown_entity_reference_is_reported() {
    let chart = chart_with(&["a"], vec![vec![Arc::between("->", "a", "ghost")]]);
    let err = compute_layout(&chart, &Theme::default(), &LayoutConfig::default(), &CharMetrics)
        .unwrap_err();
    assert!(matches!(err, LayoutError::UnknownEntity { .. }));
}

#[test]
fn arc_colors_inherit_from_the_sending_entity() {
    let mut chart = chart_with(&["a", "b"], vec![vec![Arc::between("->", "a", "b")]]);
    chart.entities[0].arclinecolor = Some("green".to_owned());
    let laid = layout(&chart);
    let line = laid
        .sequence
        .iter()
        .flat_map(|p| &p.group.elements)
        .find(|e| matches!(e.shape, Shape::Line { .. }))
        .expect("no line");
    assert_eq!(line.style.line_color.as_deref(), Some("green"));
}

#[test]
fn empty_chart_still_produces_a_canvas() {
    let chart = chart_with(&["a"], vec![]);
    let laid = layout(&chart);
    assert!(laid.canvas.width > 0.0);
    assert!(laid.canvas.height > 0.0);
    assert_eq!(laid.lifelines.len(), 1);
    assert!(laid.sequence.is_empty());
}
