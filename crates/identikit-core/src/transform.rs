//! Layer placement geometry
//!
//! A placed layer is a rectangle whose top-left corner sits at the layer
//! position before rotation, rotated about its own center. Artboard space
//! has its origin at the top-left with y pointing down, so positive angles
//! turn clockwise on screen.

use crate::layer::Layer;

/// Axis-aligned bounds in artboard space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Grow the bounds by `amount` on every side
    pub fn inflate(self, amount: f64) -> Self {
        Self {
            min_x: self.min_x - amount,
            min_y: self.min_y - amount,
            max_x: self.max_x + amount,
            max_y: self.max_y + amount,
        }
    }

    /// Width of the bounds
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounds
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// A rotated rectangle in artboard space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Rectangle center
    pub center: [f64; 2],
    /// Unrotated width and height
    pub size: [f64; 2],
    /// Rotation in radians
    pub rotation: f64,
}

impl Placement {
    /// Axis-aligned rectangle with its top-left corner at `origin`
    pub fn axis_aligned(origin: [f64; 2], size: [f64; 2]) -> Self {
        Self {
            center: [origin[0] + size[0] / 2.0, origin[1] + size[1] / 2.0],
            size,
            rotation: 0.0,
        }
    }

    /// Placement of a layer whose asset has the given intrinsic pixel size
    ///
    /// The rendered width is the layer width; the height follows the
    /// intrinsic aspect ratio. A degenerate asset (zero width) renders square.
    pub fn for_layer(layer: &Layer, intrinsic: (u32, u32)) -> Self {
        let width = layer.width;
        let height = if intrinsic.0 == 0 {
            width
        } else {
            width * intrinsic.1 as f64 / intrinsic.0 as f64
        };

        Self {
            center: [
                layer.position[0] + width / 2.0,
                layer.position[1] + height / 2.0,
            ],
            size: [width, height],
            rotation: layer.rotation.to_radians(),
        }
    }

    /// Map an artboard point into the rectangle's local space
    ///
    /// Local coordinates run from `(0, 0)` at the unrotated top-left corner
    /// to `size` at the bottom-right.
    pub fn to_local(&self, point: [f64; 2]) -> [f64; 2] {
        let dx = point[0] - self.center[0];
        let dy = point[1] - self.center[1];
        let (sin, cos) = self.rotation.sin_cos();

        // Inverse rotation
        let lx = dx * cos + dy * sin;
        let ly = -dx * sin + dy * cos;

        [lx + self.size[0] / 2.0, ly + self.size[1] / 2.0]
    }

    /// Map a local point back into artboard space
    pub fn from_local(&self, local: [f64; 2]) -> [f64; 2] {
        let lx = local[0] - self.size[0] / 2.0;
        let ly = local[1] - self.size[1] / 2.0;
        let (sin, cos) = self.rotation.sin_cos();

        [
            self.center[0] + lx * cos - ly * sin,
            self.center[1] + lx * sin + ly * cos,
        ]
    }

    /// Whether an artboard point falls inside the rectangle
    pub fn contains(&self, point: [f64; 2]) -> bool {
        let [x, y] = self.to_local(point);
        x >= 0.0 && y >= 0.0 && x < self.size[0] && y < self.size[1]
    }

    /// Corners in artboard space: top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> [[f64; 2]; 4] {
        let [w, h] = self.size;
        [
            self.from_local([0.0, 0.0]),
            self.from_local([w, 0.0]),
            self.from_local([w, h]),
            self.from_local([0.0, h]),
        ]
    }

    /// Axis-aligned bounds of the rotated rectangle
    pub fn bounds(&self) -> Bounds {
        let corners = self.corners();
        let mut bounds = Bounds {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        };

        for [x, y] in corners {
            bounds.min_x = bounds.min_x.min(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_x = bounds.max_x.max(x);
            bounds.max_y = bounds.max_y.max(y);
        }

        bounds
    }

    /// Largest placement of `intrinsic` that fits inside `container`, centered
    pub fn contain(intrinsic: (u32, u32), container: (u32, u32)) -> Self {
        let (cw, ch) = (container.0 as f64, container.1 as f64);
        if intrinsic.0 == 0 || intrinsic.1 == 0 {
            return Self::axis_aligned([0.0, 0.0], [cw, ch]);
        }

        let (iw, ih) = (intrinsic.0 as f64, intrinsic.1 as f64);
        let scale = (cw / iw).min(ch / ih);
        let size = [iw * scale, ih * scale];

        Self::axis_aligned([(cw - size[0]) / 2.0, (ch - size[1]) / 2.0], size)
    }
}
