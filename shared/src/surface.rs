use crate::Point;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    pub fn as_str(self) -> &'static str {
        match self {
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub fn as_str(self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

/// A single straight line between two consecutive positions of one stroke.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub line_width: f64,
    pub line_join: LineJoin,
    pub line_cap: LineCap,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    pub line_width: f64,
    /// Not applied by the stroke paths yet; the toolbar sets the color on the
    /// surface directly.
    pub color: Option<String>,
}

/// Where strokes end up. Drawing is immediate and assumed to succeed.
pub trait DrawingSurface {
    fn draw_segment(&mut self, segment: &Segment);
    fn clear(&mut self);
}

/// The current style, read again for every segment.
pub trait StyleSource {
    fn stroke_style(&self) -> StrokeStyle;
}

impl<T: StyleSource + ?Sized> StyleSource for std::rc::Rc<T> {
    fn stroke_style(&self) -> StrokeStyle {
        (**self).stroke_style()
    }
}
