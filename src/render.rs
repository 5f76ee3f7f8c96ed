use cairo::{Context as CairoContext, Format, ImageSurface, LineCap};
use pangocairo::functions as pangocairo;

use crate::connector::{self, Connector, ConnectorPath, CONNECTOR_LINE_WIDTH};
use crate::error::Result;
use crate::geometry::{PixelRect, Point};
use crate::layout::{self, PositionedNode};
use crate::model::{NodeKind, Workflow};
use crate::style::{
    self, Rgb, Shape, BACKGROUND_COLOR, BADGE_RGBA, CONNECTOR_COLOR, SHADOW_RGBA,
    STEP_NUMBER_COLOR, SUMMARY_TEXT_COLOR, TITLE_COLOR,
};
use crate::text::{self, PangoMeasurer, TextMeasurer, DEFAULT_FONT_FAMILY};

pub const CANVAS_WIDTH: i32 = 2000;
pub const CANVAS_HEIGHT: i32 = 1200;

const NODE_LINE_WIDTH: f64 = 3.0;
const SHADOW_OFFSET: f64 = 3.0;
const LABEL_FONT_PX: f64 = 12.0;
const LABEL_PADDING: f64 = 20.0;
const STEP_FONT_PX: f64 = 14.0;
const STEP_INSET: f64 = 8.0;
const BADGE_WIDTH: f64 = 55.0;
const BADGE_HEIGHT: f64 = 20.0;
const BADGE_RIGHT_INSET: f64 = 60.0;
const BADGE_TOP_INSET: f64 = 5.0;
const BADGE_RADIUS: f64 = 4.0;
const BADGE_FONT_PX: f64 = 10.0;
const TITLE_FONT_PX: f64 = 24.0;
const TITLE_BASELINE_Y: f64 = 40.0;
const LEGEND_FONT_PX: f64 = 14.0;
const LEGEND_SWATCH: (f64, f64) = (32.0, 24.0);
const LEGEND_SPACING: f64 = 160.0;
const LEGEND_MARGIN: f64 = 50.0;
const SUMMARY_FONT_PX: f64 = 14.0;
const SUMMARY_LINE_HEIGHT: f64 = 20.0;
const SUMMARY_MARGIN: f64 = 50.0;

/// Knobs that sit outside the fixed diagram contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    pub font_family: String,
    /// Paint a shape/color legend along the bottom-left edge.
    pub legend: bool,
    /// Paint workflow type, node count and generation time along the bottom-right edge.
    pub summary: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            legend: false,
            summary: false,
        }
    }
}

/// Layout and routing for one workflow, before any pixels are touched.
#[derive(Debug)]
pub struct Scene<'a> {
    pub nodes: Vec<PositionedNode<'a>>,
    pub connectors: Vec<Connector>,
    pub skipped_connections: usize,
}

impl<'a> Scene<'a> {
    pub fn build(workflow: &'a Workflow) -> Self {
        let nodes = layout::assign(&workflow.workflow_nodes);
        let (connectors, skipped_connections) = connector::route_all(&nodes);
        Self {
            nodes,
            connectors,
            skipped_connections,
        }
    }
}

/// Owned copy of a finished cairo ARGB32 surface (premultiplied, native endian).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

impl Raster {
    fn from_surface(surface: &mut ImageSurface) -> Result<Self> {
        surface.flush();
        let width = surface.width() as u32;
        let height = surface.height() as u32;
        let stride = surface.stride() as usize;
        let data = surface.data()?.to_vec();
        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Straight (non-premultiplied) RGBA at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = y as usize * self.stride + x as usize * 4;
        let bytes: [u8; 4] = self.data.get(offset..offset + 4)?.try_into().ok()?;
        Some(argb_to_rgba(u32::from_ne_bytes(bytes)))
    }

    /// Rebuild a cairo surface over a copy of the pixels.
    pub(crate) fn to_surface(&self) -> Result<ImageSurface> {
        Ok(ImageSurface::create_for_data(
            self.data.clone(),
            Format::ARgb32,
            self.width as i32,
            self.height as i32,
            self.stride as i32,
        )?)
    }

    /// Straight RGB triples, row by row, with alpha dropped.
    pub(crate) fn to_rgb8(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for row in self.data.chunks_exact(self.stride).take(self.height as usize) {
            for px in row[..self.width as usize * 4].chunks_exact(4) {
                let [r, g, b, _] = argb_to_rgba(u32::from_ne_bytes([px[0], px[1], px[2], px[3]]));
                rgb.extend_from_slice(&[r, g, b]);
            }
        }
        rgb
    }
}

fn argb_to_rgba(pixel: u32) -> [u8; 4] {
    let a = (pixel >> 24) as u8;
    let unpremultiply = |channel: u32| -> u8 {
        let channel = channel & 0xff;
        match a {
            0 => 0,
            255 => channel as u8,
            _ => ((channel * 255 + a as u32 / 2) / a as u32).min(255) as u8,
        }
    };
    [
        unpremultiply(pixel >> 16),
        unpremultiply(pixel >> 8),
        unpremultiply(pixel),
        a,
    ]
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub nodes: usize,
    pub connectors: usize,
    pub skipped_connections: usize,
}

#[derive(Clone, Debug)]
pub struct RenderedDiagram {
    pub raster: Raster,
    pub stats: RenderStats,
}

/// Paint `workflow` onto a fresh canvas and hand back the pixels.
pub fn render(workflow: &Workflow, options: &RenderOptions) -> Result<RenderedDiagram> {
    let scene = Scene::build(workflow);
    let mut surface = ImageSurface::create(Format::ARgb32, CANVAS_WIDTH, CANVAS_HEIGHT)?;
    {
        let ctx = CairoContext::new(&surface)?;
        paint_scene(&ctx, workflow, &scene, options)?;
    }
    let raster = Raster::from_surface(&mut surface)?;
    let stats = RenderStats {
        nodes: scene.nodes.len(),
        connectors: scene.connectors.len(),
        skipped_connections: scene.skipped_connections,
    };
    tracing::debug!(
        workflow_type = %workflow.workflow_type,
        nodes = stats.nodes,
        connectors = stats.connectors,
        skipped_connections = stats.skipped_connections,
        "rendered workflow diagram"
    );
    Ok(RenderedDiagram { raster, stats })
}

fn paint_scene(
    ctx: &CairoContext,
    workflow: &Workflow,
    scene: &Scene<'_>,
    options: &RenderOptions,
) -> Result<()> {
    setup_context(ctx)?;

    // Connectors go down first so nodes cover their own line ends.
    for connector in &scene.connectors {
        draw_connector(ctx, connector)?;
    }

    let label_font = text::font_description(&options.font_family, LABEL_FONT_PX, true);
    let measurer = PangoMeasurer::new(ctx, &label_font);
    for node in &scene.nodes {
        draw_node(ctx, node, &measurer, &options.font_family)?;
    }

    draw_title(ctx, &workflow.title(), &options.font_family)?;

    if options.legend {
        draw_legend(ctx, &options.font_family)?;
    }
    if options.summary {
        draw_summary(ctx, &workflow.summary_lines(), &options.font_family)?;
    }
    Ok(())
}

fn setup_context(ctx: &CairoContext) -> Result<()> {
    set_source(ctx, BACKGROUND_COLOR);
    ctx.paint()?;
    ctx.set_line_cap(LineCap::Butt);
    Ok(())
}

fn set_source(ctx: &CairoContext, color: Rgb) {
    let (r, g, b) = color.components();
    ctx.set_source_rgb(r, g, b);
}

fn draw_connector(ctx: &CairoContext, connector: &Connector) -> Result<()> {
    set_source(ctx, CONNECTOR_COLOR);
    ctx.set_line_width(CONNECTOR_LINE_WIDTH);
    ctx.new_path();
    ctx.move_to(connector.start.x, connector.start.y);
    match connector.path {
        ConnectorPath::Straight => ctx.line_to(connector.end.x, connector.end.y),
        ConnectorPath::Curve { control1, control2 } => ctx.curve_to(
            control1.x,
            control1.y,
            control2.x,
            control2.y,
            connector.end.x,
            connector.end.y,
        ),
    }
    ctx.stroke()?;

    let head = connector.arrowhead;
    ctx.new_path();
    ctx.move_to(head.tip.x, head.tip.y);
    ctx.line_to(head.left.x, head.left.y);
    ctx.line_to(head.right.x, head.right.y);
    ctx.close_path();
    ctx.fill()?;
    Ok(())
}

fn draw_node(
    ctx: &CairoContext,
    node: &PositionedNode<'_>,
    measurer: &dyn TextMeasurer,
    font_family: &str,
) -> Result<()> {
    let style = style::resolve(node.node.kind);
    let rect = node.rect;

    path_shape(ctx, style.shape, rect.offset(SHADOW_OFFSET, SHADOW_OFFSET))?;
    ctx.set_source_rgba(SHADOW_RGBA.0, SHADOW_RGBA.1, SHADOW_RGBA.2, SHADOW_RGBA.3);
    ctx.fill()?;

    path_shape(ctx, style.shape, rect)?;
    set_source(ctx, style.fill);
    ctx.fill_preserve()?;
    set_source(ctx, style.stroke);
    ctx.set_line_width(NODE_LINE_WIDTH);
    ctx.stroke()?;

    let step = node.step_number().to_string();
    let layout = text_layout(ctx, &step, font_family, STEP_FONT_PX, true);
    fill_layout(
        ctx,
        &layout,
        rect.x0 + STEP_INSET,
        rect.y0 + STEP_INSET,
        STEP_NUMBER_COLOR,
    )?;

    draw_badge(ctx, rect, &node.node.badge_text(), style.text, font_family)?;

    let lines = text::wrap(&node.node.label, rect.width - LABEL_PADDING, measurer);
    for (line, center_y) in lines.iter().zip(text::line_centers(rect.center.y, lines.len())) {
        draw_text_centered(
            ctx,
            Point::new(rect.center.x, center_y),
            line,
            font_family,
            LABEL_FONT_PX,
            true,
            style.text,
        )?;
    }
    Ok(())
}

fn draw_badge(
    ctx: &CairoContext,
    rect: PixelRect,
    text: &str,
    color: Rgb,
    font_family: &str,
) -> Result<()> {
    let badge = PixelRect::new(
        rect.x0 + rect.width - BADGE_RIGHT_INSET,
        rect.y0 + BADGE_TOP_INSET,
        BADGE_WIDTH,
        BADGE_HEIGHT,
    );
    path_round_rect(ctx, badge, BADGE_RADIUS)?;
    ctx.set_source_rgba(BADGE_RGBA.0, BADGE_RGBA.1, BADGE_RGBA.2, BADGE_RGBA.3);
    ctx.fill()?;

    // Text center sits 32px in from the right edge, slightly right of the box center.
    let center = Point::new(rect.x0 + rect.width - 32.0, rect.y0 + 15.0);
    draw_text_centered(
        ctx,
        center,
        text,
        font_family,
        BADGE_FONT_PX,
        false,
        color,
    )
}

fn draw_title(ctx: &CairoContext, title: &str, font_family: &str) -> Result<()> {
    let layout = text_layout(ctx, title, font_family, TITLE_FONT_PX, true);
    let (width, _) = layout.pixel_size();
    let baseline = layout.baseline() as f64 / pango::SCALE as f64;
    let x = CANVAS_WIDTH as f64 / 2.0 - width as f64 / 2.0;
    fill_layout(ctx, &layout, x, TITLE_BASELINE_Y - baseline, TITLE_COLOR)
}

fn draw_legend(ctx: &CairoContext, font_family: &str) -> Result<()> {
    let (swatch_w, swatch_h) = LEGEND_SWATCH;
    let top = CANVAS_HEIGHT as f64 - LEGEND_MARGIN - swatch_h;
    let entries = [
        (Some(NodeKind::Start), "Start/End"),
        (Some(NodeKind::Process), "Process"),
        (Some(NodeKind::Decision), "Decision"),
        (None, "Flow"),
    ];

    for (i, (kind, label)) in entries.into_iter().enumerate() {
        let x = LEGEND_MARGIN + i as f64 * LEGEND_SPACING;
        match kind {
            Some(kind) => {
                let style = style::resolve(kind);
                let swatch = match style.shape {
                    Shape::Diamond => {
                        PixelRect::new(x + (swatch_w - swatch_h) / 2.0, top, swatch_h, swatch_h)
                    }
                    _ => PixelRect::new(x, top, swatch_w, swatch_h),
                };
                path_shape(ctx, style.shape, swatch)?;
                set_source(ctx, style.fill);
                ctx.fill_preserve()?;
                set_source(ctx, style.stroke);
                ctx.set_line_width(1.0);
                ctx.stroke()?;
            }
            None => {
                path_rect(ctx, PixelRect::new(x, top + swatch_h / 2.0 - 2.0, swatch_w, 4.0))?;
                set_source(ctx, CONNECTOR_COLOR);
                ctx.fill()?;
            }
        }

        let layout = text_layout(ctx, label, font_family, LEGEND_FONT_PX, false);
        let (_, height) = layout.pixel_size();
        fill_layout(
            ctx,
            &layout,
            x + swatch_w + 10.0,
            top + swatch_h / 2.0 - height as f64 / 2.0,
            SUMMARY_TEXT_COLOR,
        )?;
    }
    Ok(())
}

fn draw_summary(ctx: &CairoContext, lines: &[String], font_family: &str) -> Result<()> {
    let right = CANVAS_WIDTH as f64 - SUMMARY_MARGIN;
    let top = CANVAS_HEIGHT as f64 - SUMMARY_MARGIN - lines.len() as f64 * SUMMARY_LINE_HEIGHT;
    for (i, line) in lines.iter().enumerate() {
        let layout = text_layout(ctx, line, font_family, SUMMARY_FONT_PX, false);
        let (width, _) = layout.pixel_size();
        fill_layout(
            ctx,
            &layout,
            right - width as f64,
            top + i as f64 * SUMMARY_LINE_HEIGHT,
            SUMMARY_TEXT_COLOR,
        )?;
    }
    Ok(())
}

fn text_layout(
    ctx: &CairoContext,
    text: &str,
    font_family: &str,
    font_px: f64,
    bold: bool,
) -> pango::Layout {
    let layout = pangocairo::create_layout(ctx);
    let font_desc = text::font_description(font_family, font_px, bold);
    layout.set_font_description(Some(&font_desc));
    layout.set_text(text);
    layout
}

fn draw_text_centered(
    ctx: &CairoContext,
    center: Point,
    text: &str,
    font_family: &str,
    font_px: f64,
    bold: bool,
    color: Rgb,
) -> Result<()> {
    if text.trim().is_empty() {
        return Ok(());
    }
    let layout = text_layout(ctx, text, font_family, font_px, bold);
    let (width, height) = layout.pixel_size();
    let x = center.x - width as f64 / 2.0;
    let y = center.y - height as f64 / 2.0;
    fill_layout(ctx, &layout, x, y, color)
}

/// Fill a laid-out block of text with its top-left corner at `(x, y)`.
fn fill_layout(ctx: &CairoContext, layout: &pango::Layout, x: f64, y: f64, color: Rgb) -> Result<()> {
    ctx.new_path();
    ctx.move_to(x, y);
    pangocairo::layout_path(ctx, layout);
    set_source(ctx, color);
    ctx.fill()?;
    Ok(())
}

fn path_shape(ctx: &CairoContext, shape: Shape, rect: PixelRect) -> Result<()> {
    match shape {
        Shape::Oval => path_ellipse(ctx, rect),
        Shape::Diamond => path_diamond(ctx, rect),
        Shape::Rectangle => path_rect(ctx, rect),
    }
}

fn path_rect(ctx: &CairoContext, rect: PixelRect) -> Result<()> {
    ctx.new_path();
    ctx.rectangle(rect.x0, rect.y0, rect.width, rect.height);
    Ok(())
}

fn path_ellipse(ctx: &CairoContext, rect: PixelRect) -> Result<()> {
    let radius_x = (rect.width / 2.0).max(1.0);
    let radius_y = (rect.height / 2.0).max(1.0);
    ctx.save()?;
    ctx.new_path();
    ctx.translate(rect.center.x, rect.center.y);
    ctx.scale(radius_x, radius_y);
    ctx.arc(0.0, 0.0, 1.0, 0.0, std::f64::consts::TAU);
    ctx.restore()?;
    Ok(())
}

fn path_diamond(ctx: &CairoContext, rect: PixelRect) -> Result<()> {
    ctx.new_path();
    ctx.move_to(rect.center.x, rect.y0);
    ctx.line_to(rect.x0 + rect.width, rect.center.y);
    ctx.line_to(rect.center.x, rect.y0 + rect.height);
    ctx.line_to(rect.x0, rect.center.y);
    ctx.close_path();
    Ok(())
}

fn path_round_rect(ctx: &CairoContext, rect: PixelRect, radius: f64) -> Result<()> {
    use std::f64::consts::{FRAC_PI_2, PI};

    let radius = radius.min(rect.width / 2.0).min(rect.height / 2.0);
    let (x, y) = (rect.x0, rect.y0);
    let right = x + rect.width;
    let bottom = y + rect.height;

    ctx.new_path();
    ctx.move_to(x + radius, y);
    ctx.line_to(right - radius, y);
    ctx.arc(right - radius, y + radius, radius, -FRAC_PI_2, 0.0);
    ctx.line_to(right, bottom - radius);
    ctx.arc(right - radius, bottom - radius, radius, 0.0, FRAC_PI_2);
    ctx.line_to(x + radius, bottom);
    ctx.arc(x + radius, bottom - radius, radius, FRAC_PI_2, PI);
    ctx.line_to(x, y + radius);
    ctx.arc(x + radius, y + radius, radius, PI, FRAC_PI_2 * 3.0);
    ctx.close_path();
    Ok(())
}
