//! Compound paths built from coded coastline vertices.

use crate::{BoundingBox, CoastlineVertex};

/// Drawing command attached to a coastline vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathCommand {
    /// Start a new sub-path at the vertex.
    MoveTo,
    /// Straight edge from the previous vertex.
    LineTo,
    /// Close the current sub-path back to its start. The vertex is ignored.
    Close,
}

impl PathCommand {
    pub const MOVE_TO_CODE: i32 = 1;
    pub const LINE_TO_CODE: i32 = 2;
    pub const CLOSE_CODE: i32 = 79;

    /// Decode a coastline file command code. Unknown codes yield `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            Self::MOVE_TO_CODE => Some(Self::MoveTo),
            Self::LINE_TO_CODE => Some(Self::LineTo),
            Self::CLOSE_CODE => Some(Self::Close),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Self::MoveTo => Self::MOVE_TO_CODE,
            Self::LineTo => Self::LINE_TO_CODE,
            Self::Close => Self::CLOSE_CODE,
        }
    }
}

/// One connected run of vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct SubPath {
    vertices: Vec<(f64, f64)>,
    closed: bool,
}

impl SubPath {
    fn start(vertex: (f64, f64)) -> Self {
        Self {
            vertices: vec![vertex],
            closed: false,
        }
    }

    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of straight edges, counting the closing edge.
    pub fn edge_count(&self) -> usize {
        match self.vertices.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }
}

/// A shape made of any number of disjoint sub-paths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompoundPath {
    subpaths: Vec<SubPath>,
    skipped: usize,
}

impl CompoundPath {
    /// Build a path from coded vertices in file order.
    pub fn from_vertices(vertices: &[CoastlineVertex]) -> Self {
        let mut builder = CompoundPathBuilder::new();
        for vertex in vertices {
            builder.push_code(vertex.code, (vertex.x, vertex.y));
        }
        builder.finish()
    }

    pub fn subpaths(&self) -> &[SubPath] {
        &self.subpaths
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    /// Vertices dropped because their command code was not recognised.
    pub fn skipped_vertices(&self) -> usize {
        self.skipped
    }

    pub fn vertex_count(&self) -> usize {
        self.subpaths.iter().map(|s| s.vertices.len()).sum()
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        let mut points = self.subpaths.iter().flat_map(|s| s.vertices.iter());
        let &(x, y) = points.next()?;
        let mut bbox = BoundingBox::new(x, y, x, y);
        for &(x, y) in points {
            bbox.include_point(x, y);
        }
        Some(bbox)
    }
}

/// Incremental builder for [`CompoundPath`].
#[derive(Debug, Default)]
pub struct CompoundPathBuilder {
    finished: Vec<SubPath>,
    current: Option<SubPath>,
    skipped: usize,
    pushed: usize,
}

impl CompoundPathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one command.
    ///
    /// A `LineTo` with no open sub-path starts one at its vertex; a `Close`
    /// with no open sub-path is a no-op.
    pub fn push(&mut self, command: PathCommand, vertex: (f64, f64)) {
        self.pushed += 1;
        match command {
            PathCommand::MoveTo => {
                self.flush();
                self.current = Some(SubPath::start(vertex));
            }
            PathCommand::LineTo => match self.current.as_mut() {
                Some(subpath) => subpath.vertices.push(vertex),
                None => self.current = Some(SubPath::start(vertex)),
            },
            PathCommand::Close => {
                if let Some(mut subpath) = self.current.take() {
                    subpath.closed = true;
                    self.finished.push(subpath);
                }
            }
        }
    }

    /// Apply a raw command code. Returns false if the code was unknown and
    /// the vertex dropped.
    pub fn push_code(&mut self, code: i32, vertex: (f64, f64)) -> bool {
        match PathCommand::from_code(code) {
            Some(command) => {
                self.push(command, vertex);
                true
            }
            None => {
                self.skipped += 1;
                tracing::warn!(
                    code,
                    index = self.pushed + self.skipped - 1,
                    x = vertex.0,
                    y = vertex.1,
                    "Unrecognised path command code, vertex dropped"
                );
                false
            }
        }
    }

    pub fn finish(mut self) -> CompoundPath {
        self.flush();
        CompoundPath {
            subpaths: self.finished,
            skipped: self.skipped,
        }
    }

    fn flush(&mut self) {
        if let Some(subpath) = self.current.take() {
            self.finished.push(subpath);
        }
    }
}
