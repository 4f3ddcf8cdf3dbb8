use foundation::math::Vec2;

use crate::surface::{Layer, Paint, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BeginLayer(Layer),
    Clear { width: f64, height: f64 },
    FillRect { x: f64, y: f64, width: f64, height: f64 },
    SetStroke(Paint),
    SetFill(Paint),
    SetLineWidth(f64),
    SetLineDash(Vec<f64>),
    Line { from: Vec2, to: Vec2 },
    StrokeCircle { center: Vec2, radius: f64 },
    FillCircle { center: Vec2, radius: f64 },
}

impl DrawCommand {
    /// True for commands that put pixels on the surface.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            DrawCommand::FillRect { .. }
                | DrawCommand::Line { .. }
                | DrawCommand::StrokeCircle { .. }
                | DrawCommand::FillCircle { .. }
        )
    }
}

/// A [`Surface`] that records calls for later inspection or replay.
///
/// Like a real surface, `clear` wipes what came before, so after drawing
/// several frames only the last one remains.
#[derive(Debug, Default)]
pub struct Recorder {
    commands: Vec<DrawCommand>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Layers in the order they were started.
    pub fn layers(&self) -> Vec<Layer> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::BeginLayer(layer) => Some(*layer),
                _ => None,
            })
            .collect()
    }

    /// Draw commands issued inside `layer`.
    pub fn draws_in(&self, layer: Layer) -> usize {
        let mut current = None;
        let mut count = 0;
        for c in &self.commands {
            match c {
                DrawCommand::BeginLayer(l) => current = Some(*l),
                c if c.is_draw() && current == Some(layer) => count += 1,
                _ => {}
            }
        }
        count
    }

    /// Replays the recording onto another surface.
    pub fn replay<S: Surface + ?Sized>(&self, target: &mut S) {
        for c in &self.commands {
            match c {
                DrawCommand::BeginLayer(layer) => target.begin_layer(*layer),
                DrawCommand::Clear { width, height } => target.clear(*width, *height),
                DrawCommand::FillRect {
                    x,
                    y,
                    width,
                    height,
                } => target.fill_rect(*x, *y, *width, *height),
                DrawCommand::SetStroke(paint) => target.set_stroke(paint),
                DrawCommand::SetFill(paint) => target.set_fill(paint),
                DrawCommand::SetLineWidth(w) => target.set_line_width(*w),
                DrawCommand::SetLineDash(pattern) => target.set_line_dash(pattern),
                DrawCommand::Line { from, to } => target.line(*from, *to),
                DrawCommand::StrokeCircle { center, radius } => {
                    target.stroke_circle(*center, *radius)
                }
                DrawCommand::FillCircle { center, radius } => target.fill_circle(*center, *radius),
            }
        }
    }
}

impl Surface for Recorder {
    fn begin_layer(&mut self, layer: Layer) {
        self.commands.push(DrawCommand::BeginLayer(layer));
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    fn set_stroke(&mut self, paint: &Paint) {
        self.commands.push(DrawCommand::SetStroke(paint.clone()));
    }

    fn set_fill(&mut self, paint: &Paint) {
        self.commands.push(DrawCommand::SetFill(paint.clone()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::SetLineWidth(width));
    }

    fn set_line_dash(&mut self, pattern: &[f64]) {
        self.commands.push(DrawCommand::SetLineDash(pattern.to_vec()));
    }

    fn line(&mut self, from: Vec2, to: Vec2) {
        self.commands.push(DrawCommand::Line { from, to });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f64) {
        self.commands
            .push(DrawCommand::StrokeCircle { center, radius });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f64) {
        self.commands.push(DrawCommand::FillCircle { center, radius });
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawCommand, Recorder};
    use crate::surface::{Layer, Surface};
    use foundation::math::Vec2;

    #[test]
    fn counts_draws_per_layer() {
        let mut rec = Recorder::new();
        rec.begin_layer(Layer::Rings);
        rec.set_line_width(1.0);
        rec.line(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        rec.begin_layer(Layer::Nodes);
        rec.fill_circle(Vec2::new(0.0, 0.0), 2.0);
        rec.fill_circle(Vec2::new(1.0, 0.0), 2.0);

        assert_eq!(rec.layers(), vec![Layer::Rings, Layer::Nodes]);
        assert_eq!(rec.draws_in(Layer::Rings), 1);
        assert_eq!(rec.draws_in(Layer::Nodes), 2);
        assert_eq!(rec.draws_in(Layer::Pulse), 0);
    }

    #[test]
    fn clear_starts_a_new_frame() {
        let mut rec = Recorder::new();
        rec.clear(10.0, 10.0);
        rec.fill_circle(Vec2::new(1.0, 1.0), 1.0);
        rec.clear(20.0, 20.0);
        rec.line(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0));

        assert_eq!(
            rec.commands(),
            &[
                DrawCommand::Clear {
                    width: 20.0,
                    height: 20.0
                },
                DrawCommand::Line {
                    from: Vec2::new(0.0, 0.0),
                    to: Vec2::new(2.0, 2.0)
                },
            ]
        );
    }

    #[test]
    fn replay_reproduces_commands() {
        let mut rec = Recorder::new();
        rec.clear(10.0, 10.0);
        rec.set_line_dash(&[2.0, 4.0]);
        rec.stroke_circle(Vec2::new(5.0, 5.0), 3.0);

        let mut copy = Recorder::new();
        rec.replay(&mut copy);
        assert_eq!(copy.commands(), rec.commands());
        assert!(matches!(copy.take()[0], DrawCommand::Clear { .. }));
        assert!(copy.commands().is_empty());
    }
}
