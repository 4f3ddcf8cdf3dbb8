//! SVG export of a drawn frame.

use std::fmt::Write;

use canvas::{Layer, Paint, RadialGradient, Surface};
use foundation::math::Vec2;

/// A [`Surface`] that writes SVG elements. Each layer becomes a `<g>`.
#[derive(Debug, Default)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    defs: String,
    body: String,
    gradients: usize,
    layer_open: bool,
    stroke: String,
    fill: String,
    line_width: f64,
    dash: Vec<f64>,
}

fn num(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            stroke: "none".to_string(),
            fill: "none".to_string(),
            line_width: 1.0,
            ..Self::default()
        }
    }

    fn close_layer(&mut self) {
        if self.layer_open {
            self.body.push_str("</g>\n");
            self.layer_open = false;
        }
    }

    fn gradient(&mut self, g: &RadialGradient) -> String {
        let id = format!("g{}", self.gradients);
        self.gradients += 1;
        let _ = write!(
            self.defs,
            "<radialGradient id=\"{id}\" gradientUnits=\"userSpaceOnUse\" cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\" fr=\"{fr}\">",
            cx = num(g.center.x),
            cy = num(g.center.y),
            r = num(g.outer_radius),
            fr = num(g.inner_radius),
        );
        for (offset, color) in &g.stops {
            let _ = write!(
                self.defs,
                "<stop offset=\"{}\" stop-color=\"{}\"/>",
                num(offset.clamp(0.0, 1.0)),
                color.css()
            );
        }
        self.defs.push_str("</radialGradient>\n");
        format!("url(#{id})")
    }

    fn paint(&mut self, paint: &Paint) -> String {
        match paint {
            Paint::Solid(color) => color.css(),
            Paint::Radial(g) => self.gradient(g),
        }
    }

    fn stroke_attrs(&self) -> String {
        let mut attrs = format!(
            "stroke=\"{}\" stroke-width=\"{}\"",
            self.stroke,
            num(self.line_width)
        );
        if !self.dash.is_empty() {
            let pattern: Vec<String> = self.dash.iter().map(|d| num(*d)).collect();
            let _ = write!(attrs, " stroke-dasharray=\"{}\"", pattern.join(" "));
        }
        attrs
    }

    /// The complete document.
    pub fn finish(mut self) -> String {
        self.close_layer();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
            w = num(self.width),
            h = num(self.height),
        );
        if !self.defs.is_empty() {
            let _ = write!(out, "<defs>\n{}</defs>\n", self.defs);
        }
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }
}

impl Surface for SvgSurface {
    fn begin_layer(&mut self, layer: Layer) {
        self.close_layer();
        let _ = writeln!(self.body, "<g id=\"{}\">", layer.as_str());
        self.layer_open = true;
    }

    /// Drops everything drawn so far.
    fn clear(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.defs.clear();
        self.body.clear();
        self.gradients = 0;
        self.layer_open = false;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let _ = writeln!(
            self.body,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
            num(x),
            num(y),
            num(width),
            num(height),
            self.fill
        );
    }

    fn set_stroke(&mut self, paint: &Paint) {
        self.stroke = self.paint(paint);
    }

    fn set_fill(&mut self, paint: &Paint) {
        self.fill = self.paint(paint);
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn set_line_dash(&mut self, pattern: &[f64]) {
        self.dash = pattern.to_vec();
    }

    fn line(&mut self, from: Vec2, to: Vec2) {
        let attrs = self.stroke_attrs();
        let _ = writeln!(
            self.body,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" {attrs}/>",
            num(from.x),
            num(from.y),
            num(to.x),
            num(to.y),
        );
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f64) {
        let attrs = self.stroke_attrs();
        let _ = writeln!(
            self.body,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"none\" {attrs}/>",
            num(center.x),
            num(center.y),
            num(radius),
        );
    }

    fn fill_circle(&mut self, center: Vec2, radius: f64) {
        let _ = writeln!(
            self.body,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>",
            num(center.x),
            num(center.y),
            num(radius),
            self.fill
        );
    }
}
