use crate::core::{ChartLayout, LinearScale, format_money_tick, linear_ticks};
use crate::join::{AxisPosition, AxisState, AxisTick, MarkAttributes};
use crate::render::{
    CirclePrimitive, Color, LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive,
};

pub(super) const HEADER_FONT_PX: f64 = 16.0;
pub(super) const SUBHEADER_FONT_PX: f64 = 12.8;
pub(super) const TICK_FONT_PX: f64 = 10.0;
const TICK_LABEL_GAP_PX: f64 = 9.0;
const GRID_STROKE_PX: f64 = 1.0;

/// Money-formatted ticks for a continuous value axis.
pub(super) fn money_ticks(scale: LinearScale, count: usize) -> Vec<AxisTick> {
    let (start, end) = scale.domain();
    linear_ticks(start, end, count)
        .into_iter()
        .map(|value| AxisTick::new(format_money_tick(value), scale.map(value)))
        .collect()
}

fn faded(color: Color, opacity: f64) -> Color {
    Color {
        alpha: (color.alpha * opacity).clamp(0.0, 1.0),
        ..color
    }
}

pub(super) fn push_rect_mark(
    frame: &mut RenderFrame,
    layout: ChartLayout,
    key: &str,
    attributes: &MarkAttributes,
) {
    frame.rects.push(RectPrimitive::new(
        key,
        layout.margins.left + attributes.x,
        layout.margins.top + attributes.y,
        attributes.width.max(0.0),
        attributes.height.max(0.0),
        faded(attributes.fill, attributes.opacity),
    ));
}

pub(super) fn push_circle_mark(
    frame: &mut RenderFrame,
    layout: ChartLayout,
    key: &str,
    attributes: &MarkAttributes,
) {
    frame.circles.push(CirclePrimitive::new(
        key,
        layout.margins.left + attributes.x,
        layout.margins.top + attributes.y,
        attributes.radius.max(0.0),
        faded(attributes.fill, attributes.opacity),
    ));
}

/// Draws tick labels and, when `grid_length_px` is set, grid lines across the plot.
pub(super) fn push_axis(
    frame: &mut RenderFrame,
    layout: ChartLayout,
    axis: &AxisState,
    grid_length_px: Option<f64>,
) {
    let left = layout.margins.left;
    let top = layout.margins.top;
    let bottom = top + layout.inner_height();
    let right = left + layout.inner_width();

    for tick in axis.ticks() {
        if tick.label.is_empty() {
            continue;
        }
        let (label_x, label_y, align) = match axis.position() {
            AxisPosition::Top => (left + tick.position, top - TICK_LABEL_GAP_PX, TextHAlign::Center),
            AxisPosition::Bottom => (
                left + tick.position,
                bottom + TICK_LABEL_GAP_PX + TICK_FONT_PX,
                TextHAlign::Center,
            ),
            AxisPosition::Left => (left - TICK_LABEL_GAP_PX, top + tick.position, TextHAlign::Right),
            AxisPosition::Right => (right + TICK_LABEL_GAP_PX, top + tick.position, TextHAlign::Left),
        };
        frame.texts.push(TextPrimitive::new(
            tick.label.as_str(),
            label_x,
            label_y,
            TICK_FONT_PX,
            faded(Color::LABEL_GREY, tick.opacity),
            align,
        ));

        let Some(length) = grid_length_px else {
            continue;
        };
        let grid = faded(Color::GRID_GREY, tick.opacity);
        let line = match axis.position() {
            AxisPosition::Top => {
                let x = left + tick.position;
                LinePrimitive::new(x, top, x, top + length, GRID_STROKE_PX, grid)
            }
            AxisPosition::Bottom => {
                let x = left + tick.position;
                LinePrimitive::new(x, bottom, x, bottom - length, GRID_STROKE_PX, grid)
            }
            AxisPosition::Left => {
                let y = top + tick.position;
                LinePrimitive::new(left, y, left + length, y, GRID_STROKE_PX, grid)
            }
            AxisPosition::Right => {
                let y = top + tick.position;
                LinePrimitive::new(right, y, right - length, y, GRID_STROKE_PX, grid)
            }
        };
        frame.lines.push(line);
    }
}

/// Header text, with an optional smaller second line.
pub(super) fn push_header(
    frame: &mut RenderFrame,
    layout: ChartLayout,
    offset_ratio: f64,
    header: &str,
    subheader: Option<&str>,
) {
    let y = layout.margins.top * (1.0 - offset_ratio);
    frame.texts.push(TextPrimitive::new(
        header,
        layout.margins.left,
        y,
        HEADER_FONT_PX,
        Color::BLACK,
        TextHAlign::Left,
    ));
    if let Some(subheader) = subheader {
        frame.texts.push(TextPrimitive::new(
            subheader,
            layout.margins.left,
            y + HEADER_FONT_PX * 1.5,
            SUBHEADER_FONT_PX,
            Color::LABEL_GREY,
            TextHAlign::Left,
        ));
    }
}
