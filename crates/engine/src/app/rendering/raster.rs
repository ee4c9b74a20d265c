/// Borrowed RGBA8 framebuffer with clipped drawing primitives.
pub(crate) struct Canvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn clear(&mut self, color: [u8; 4]) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let pixel = (y as usize)
            .checked_mul(self.width as usize)?
            .checked_add(x as usize)?;
        let byte = pixel.checked_mul(4)?;
        (byte + 4 <= self.frame.len()).then_some(byte)
    }

    #[cfg(test)]
    pub(crate) fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let at = self.offset(x, y)?;
        let mut out = [0; 4];
        out.copy_from_slice(&self.frame[at..at + 4]);
        Some(out)
    }

    /// Alpha-blends `color` over the existing pixel; alpha 255 overwrites.
    pub(crate) fn put(&mut self, x: i32, y: i32, color: [u8; 4]) {
        let Some(at) = self.offset(x, y) else {
            return;
        };
        let dst = &mut self.frame[at..at + 4];
        if color[3] == 255 {
            dst.copy_from_slice(&color);
            return;
        }
        let alpha = color[3] as u32;
        for channel in 0..3 {
            let blended = (color[channel] as u32 * alpha + dst[channel] as u32 * (255 - alpha)) / 255;
            dst[channel] = blended as u8;
        }
        dst[3] = 255;
    }

    pub(crate) fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: [u8; 4]) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w).min(self.width as i32);
        let y1 = y.saturating_add(h).min(self.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.put(px, py, color);
            }
        }
    }

    pub(crate) fn outline_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: [u8; 4]) {
        if w <= 1 || h <= 1 {
            return;
        }
        self.fill_rect(x, y, w, 1, color);
        self.fill_rect(x, y + h - 1, w, 1, color);
        self.fill_rect(x, y, 1, h, color);
        self.fill_rect(x + w - 1, y, 1, h, color);
    }

    /// Bresenham line. Endpoints far off screen are walked but never written.
    pub(crate) fn line(&mut self, from: (i32, i32), to: (i32, i32), color: [u8; 4]) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put(x, y, color);
            if x == to.0 && y == to.1 {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_outside_bounds_are_ignored() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut canvas = Canvas::new(&mut frame, 4, 4);
        canvas.put(-1, 0, [255; 4]);
        canvas.put(4, 0, [255; 4]);
        canvas.fill_rect(-10, -10, 100, 1, [255; 4]);
        assert!(frame.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn translucent_put_blends_over_existing() {
        let mut frame = vec![0u8; 4];
        let mut canvas = Canvas::new(&mut frame, 1, 1);
        canvas.clear([0, 0, 0, 255]);
        canvas.put(0, 0, [255, 255, 255, 128]);
        let pixel = canvas.pixel(0, 0).expect("pixel");
        assert_eq!(pixel[0], 128);
        assert_eq!(pixel[3], 255);
    }

    #[test]
    fn line_hits_both_endpoints() {
        let mut frame = vec![0u8; 8 * 8 * 4];
        let mut canvas = Canvas::new(&mut frame, 8, 8);
        canvas.line((1, 6), (6, 2), [9, 9, 9, 255]);
        assert_eq!(canvas.pixel(1, 6), Some([9, 9, 9, 255]));
        assert_eq!(canvas.pixel(6, 2), Some([9, 9, 9, 255]));
    }

    #[test]
    fn zero_sized_canvas_is_safe() {
        let mut frame = Vec::new();
        let mut canvas = Canvas::new(&mut frame, 0, 0);
        canvas.clear([1; 4]);
        canvas.outline_rect(0, 0, 5, 5, [1; 4]);
        canvas.line((0, 0), (3, 3), [1; 4]);
        assert_eq!(canvas.pixel(0, 0), None);
    }
}
