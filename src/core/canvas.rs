/// RGBA color
pub type Rgba = [u8; 4];

/// 2D drawing operations for canvas
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Fill entire canvas with color
    Clear(Rgba),

    /// Draw pixel at (x, y)
    Pixel { x: i32, y: i32, color: Rgba },

    /// Draw filled rectangle
    Rect { x: i32, y: i32, width: u32, height: u32, color: Rgba },

    /// Draw filled circle at (cx, cy)
    FilledCircle { cx: i32, cy: i32, radius: u32, color: Rgba },

    /// Draw line between sub-pixel endpoints, clipped to the canvas
    Line { x1: f32, y1: f32, x2: f32, y2: f32, color: Rgba },
}

/// Canvas state - pixel buffer with draw operations
#[derive(Clone)]
pub struct Canvas {
    pixels: Vec<Rgba>,
    /// Pending draw operations
    operations: Vec<DrawOp>,
    width: u32,
    height: u32,
}

impl Canvas {
    /// Create new canvas with dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![[0; 4]; (width * height) as usize],
            operations: Vec::new(),
            width,
            height,
        }
    }

    /// Add draw operation - functional style
    pub fn draw(mut self, op: DrawOp) -> Self {
        self.operations.push(op);
        self
    }

    /// Queue a draw operation in place
    pub fn push(&mut self, op: DrawOp) {
        self.operations.push(op);
    }

    /// Execute all pending operations
    pub fn execute_ops(mut self) -> Self {
        self.flush();
        self
    }

    /// Execute all pending operations in place
    pub fn flush(&mut self) {
        let operations = std::mem::take(&mut self.operations);
        for op in &operations {
            self.execute_op(op);
        }
    }

    /// Drop the buffer and start over at a new size
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    fn execute_op(&mut self, op: &DrawOp) {
        match *op {
            DrawOp::Clear(color) => self.pixels.fill(color),
            DrawOp::Pixel { x, y, color } => self.set_pixel(x, y, color),
            DrawOp::Rect { x, y, width, height, color } => {
                self.draw_rect(x, y, width, height, color)
            }
            DrawOp::FilledCircle { cx, cy, radius, color } => {
                self.draw_filled_circle(cx, cy, radius, color)
            }
            DrawOp::Line { x1, y1, x2, y2, color } => self.draw_line(x1, y1, x2, y2, color),
        }
    }

    /// Set single pixel, ignoring anything off-canvas
    fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }

        let idx = (y as u32 * self.width + x as u32) as usize;
        self.pixels[idx] = color;
    }

    fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width as i32).min(self.width as i32);
        let y1 = (y + height as i32).min(self.height as i32);

        for py in y0..y1 {
            for px in x0..x1 {
                self.set_pixel(px, py, color);
            }
        }
    }

    fn draw_filled_circle(&mut self, cx: i32, cy: i32, radius: u32, color: Rgba) {
        let r = radius as i32;
        let r_sq = r * r;

        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r_sq {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Clip with Liang-Barsky, then rasterize with Bresenham
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgba) {
        let max_x = self.width as f32 - 1.0;
        let max_y = self.height as f32 - 1.0;
        let Some((x1, y1, x2, y2)) = clip_segment(x1, y1, x2, y2, max_x, max_y) else {
            return;
        };

        let (mut x, mut y) = (x1.round() as i32, y1.round() as i32);
        let (x2, y2) = (x2.round() as i32, y2.round() as i32);

        let dx = (x2 - x).abs();
        let dy = -(y2 - y).abs();
        let sx = if x < x2 { 1 } else { -1 };
        let sy = if y < y2 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set_pixel(x, y, color);

            if x == x2 && y == y2 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Raw RGBA bytes, row-major
    pub fn pixels(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn clip_segment(
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    max_x: f32,
    max_y: f32,
) -> Option<(f32, f32, f32, f32)> {
    if !(x1.is_finite() && y1.is_finite() && x2.is_finite() && y2.is_finite()) {
        return None;
    }

    let dx = x2 - x1;
    let dy = y2 - y1;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;

    let edges = [
        (-dx, x1),
        (dx, max_x - x1),
        (-dy, y1),
        (dy, max_y - y1),
    ];

    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }

        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }

    Some((x1 + t0 * dx, y1 + t0 * dy, x1 + t1 * dx, y1 + t1 * dy))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [255, 0, 0, 255];
    const GREEN: Rgba = [0, 255, 0, 255];

    #[test]
    fn canvas_creation() {
        let canvas = Canvas::new(100, 100);
        assert_eq!(canvas.dimensions(), (100, 100));
        assert_eq!(canvas.pixels().len(), 100 * 100 * 4);
    }

    #[test]
    fn canvas_clear() {
        let canvas = Canvas::new(10, 10).draw(DrawOp::Clear(RED)).execute_ops();

        assert_eq!(&canvas.pixels()[0..4], &RED);
        let last_idx = 10 * 10 * 4 - 4;
        assert_eq!(&canvas.pixels()[last_idx..last_idx + 4], &RED);
    }

    #[test]
    fn canvas_set_pixel() {
        let canvas = Canvas::new(10, 10)
            .draw(DrawOp::Pixel { x: 5, y: 5, color: [100, 150, 200, 128] })
            .execute_ops();

        assert_eq!(canvas.pixel(5, 5), [100, 150, 200, 128]);
    }

    #[test]
    fn canvas_rect_is_clipped() {
        let canvas = Canvas::new(10, 10)
            .draw(DrawOp::Rect { x: -2, y: 8, width: 4, height: 5, color: GREEN })
            .execute_ops();

        assert_eq!(canvas.pixel(0, 8), GREEN);
        assert_eq!(canvas.pixel(1, 9), GREEN);
        assert_eq!(canvas.pixel(2, 9), [0; 4]);
    }

    #[test]
    fn canvas_filled_circle() {
        let canvas = Canvas::new(50, 50)
            .draw(DrawOp::FilledCircle { cx: 25, cy: 25, radius: 5, color: GREEN })
            .execute_ops();

        assert_eq!(canvas.pixel(25, 25), GREEN);
        assert_eq!(canvas.pixel(25, 23), GREEN);
        assert_eq!(canvas.pixel(25, 35), [0; 4]);
    }

    #[test]
    fn canvas_line() {
        let canvas = Canvas::new(50, 50)
            .draw(DrawOp::Line { x1: 10.0, y1: 10.0, x2: 20.0, y2: 20.0, color: RED })
            .execute_ops();

        assert_eq!(canvas.pixel(10, 10), RED);
        assert_eq!(canvas.pixel(15, 15), RED);
        assert_eq!(canvas.pixel(20, 20), RED);
    }

    #[test]
    fn canvas_line_far_off_screen_is_clipped() {
        let canvas = Canvas::new(20, 20)
            .draw(DrawOp::Line { x1: -1.0e4, y1: 10.0, x2: 1.0e4, y2: 10.0, color: RED })
            .execute_ops();

        assert_eq!(canvas.pixel(0, 10), RED);
        assert_eq!(canvas.pixel(19, 10), RED);
        assert_eq!(canvas.pixel(10, 9), [0; 4]);
    }

    #[test]
    fn canvas_line_outside_is_dropped() {
        let canvas = Canvas::new(20, 20)
            .draw(DrawOp::Line { x1: -5.0, y1: -5.0, x2: -1.0, y2: 30.0, color: RED })
            .draw(DrawOp::Line { x1: 0.0, y1: 0.0, x2: f32::NAN, y2: 3.0, color: RED })
            .execute_ops();

        assert!(canvas.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn canvas_bounds_checking() {
        let canvas = Canvas::new(10, 10)
            .draw(DrawOp::Pixel { x: 100, y: -3, color: RED })
            .execute_ops();

        assert_eq!(canvas.pixels().len(), 10 * 10 * 4);
        assert!(canvas.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn canvas_resize_clears() {
        let mut canvas = Canvas::new(4, 4).draw(DrawOp::Clear(RED)).execute_ops();
        canvas.resize(8, 2);
        assert_eq!(canvas.dimensions(), (8, 2));
        assert_eq!(canvas.pixel(7, 1), [0; 4]);
    }
}
