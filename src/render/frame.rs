use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{CirclePrimitive, LinePrimitive, RectPrimitive, TextPrimitive};

/// Draw layers in occlusion order; later layers paint over earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartLayerKind {
    Background,
    Axis,
    Bars,
    Connectors,
    Points,
    Probe,
    Legend,
}

impl ChartLayerKind {
    /// Canonical layer stack, bottom to top.
    #[must_use]
    pub const fn canonical_stack() -> [Self; 7] {
        [
            Self::Background,
            Self::Axis,
            Self::Bars,
            Self::Connectors,
            Self::Points,
            Self::Probe,
            Self::Legend,
        ]
    }
}

/// Primitives collected for one layer.
///
/// Within a layer, backends draw rects, then lines, then circles, then texts.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerPrimitives {
    pub kind: ChartLayerKind,
    pub rects: Vec<RectPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub circles: Vec<CirclePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl LayerPrimitives {
    #[must_use]
    pub fn new(kind: ChartLayerKind) -> Self {
        Self {
            kind,
            rects: Vec::new(),
            lines: Vec::new(),
            circles: Vec::new(),
            texts: Vec::new(),
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        for rect in &self.rects {
            rect.validate()?;
        }
        for line in &self.lines {
            line.validate()?;
        }
        for circle in &self.circles {
            circle.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
            && self.lines.is_empty()
            && self.circles.is_empty()
            && self.texts.is_empty()
    }
}

/// Backend-agnostic scene for one chart draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    layers: Vec<LayerPrimitives>,
}

impl RenderFrame {
    /// Creates an empty frame carrying the canonical layer stack.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            layers: ChartLayerKind::canonical_stack()
                .into_iter()
                .map(LayerPrimitives::new)
                .collect(),
        }
    }

    #[must_use]
    pub fn layers(&self) -> &[LayerPrimitives] {
        &self.layers
    }

    #[must_use]
    pub fn layer(&self, kind: ChartLayerKind) -> Option<&LayerPrimitives> {
        self.layers.iter().find(|layer| layer.kind == kind)
    }

    pub fn push_rect(&mut self, kind: ChartLayerKind, rect: RectPrimitive) {
        if let Some(layer) = self.layer_mut(kind) {
            layer.rects.push(rect);
        }
    }

    pub fn push_line(&mut self, kind: ChartLayerKind, line: LinePrimitive) {
        if let Some(layer) = self.layer_mut(kind) {
            layer.lines.push(line);
        }
    }

    pub fn push_circle(&mut self, kind: ChartLayerKind, circle: CirclePrimitive) {
        if let Some(layer) = self.layer_mut(kind) {
            layer.circles.push(circle);
        }
    }

    pub fn push_text(&mut self, kind: ChartLayerKind, text: TextPrimitive) {
        if let Some(layer) = self.layer_mut(kind) {
            layer.texts.push(text);
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        for layer in &self.layers {
            layer.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(LayerPrimitives::is_empty)
    }

    fn layer_mut(&mut self, kind: ChartLayerKind) -> Option<&mut LayerPrimitives> {
        self.layers.iter_mut().find(|layer| layer.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartLayerKind, RenderFrame};
    use crate::core::Viewport;
    use crate::render::{Color, LinePrimitive};

    #[test]
    fn frame_keeps_canonical_layer_order() {
        let mut frame = RenderFrame::new(Viewport::new(100, 50));
        frame.push_line(
            ChartLayerKind::Probe,
            LinePrimitive::new(1.0, 0.0, 1.0, 10.0, 1.0, Color::rgb(0.2, 0.2, 0.2)),
        );
        frame.push_line(
            ChartLayerKind::Axis,
            LinePrimitive::new(0.0, 5.0, 9.0, 5.0, 1.0, Color::rgb(0.2, 0.2, 0.2)),
        );

        let kinds: Vec<ChartLayerKind> = frame.layers().iter().map(|layer| layer.kind).collect();
        assert_eq!(kinds, ChartLayerKind::canonical_stack().to_vec());
        // Axis sits below Probe even though it was pushed second.
        let axis_index = kinds
            .iter()
            .position(|kind| *kind == ChartLayerKind::Axis)
            .expect("axis layer");
        let probe_index = kinds
            .iter()
            .position(|kind| *kind == ChartLayerKind::Probe)
            .expect("probe layer");
        assert!(axis_index < probe_index);
    }
}
