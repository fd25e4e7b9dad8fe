use image::GrayImage;
use nanorand::{Rng, WyRand};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// Canvas occupancy kept as a summed-area table.
///
/// The table carries one leading row and column of zeros, so the entry at
/// `(x, y)` is the number of occupied pixels strictly above and to the left
/// of that coordinate.
///
/// https://blog.demofox.org/2018/04/16/prefix-sums-and-summed-area-tables/
pub struct OccupancyMap {
    table: Vec<u32>,
    width: u32,
    height: u32,
}

impl OccupancyMap {
    pub fn new(width: u32, height: u32) -> Self {
        let cells = (width as usize + 1) * (height as usize + 1);
        OccupancyMap {
            table: vec![0; cells],
            width,
            height,
        }
    }

    fn stride(&self) -> usize {
        self.width as usize + 1
    }

    fn at(&self, x: u32, y: u32) -> u64 {
        u64::from(self.table[y as usize * self.stride() + x as usize])
    }

    pub fn region_is_empty(&self, x: u32, y: u32, rect: &Rect) -> bool {
        let (right, bottom) = (x + rect.width, y + rect.height);

        self.at(x, y) + self.at(right, bottom) == self.at(right, y) + self.at(x, bottom)
    }

    /// 在图片寻找位置写字
    ///
    /// Every free top-left corner is equally likely.
    pub fn find_space_for_rect(&self, rect: &Rect, rng: &mut WyRand) -> Option<Point> {
        if rect.width > self.width || rect.height > self.height {
            return None;
        }

        let max_x = self.width - rect.width;
        let max_y = self.height - rect.height;

        let mut available_points: u32 = 0;
        for y in 0..=max_y {
            for x in 0..=max_x {
                if self.region_is_empty(x, y, rect) {
                    available_points += 1;
                }
            }
        }

        if available_points == 0 {
            return None;
        }

        let mut remaining = rng.generate_range(0..available_points);
        for y in 0..=max_y {
            for x in 0..=max_x {
                if self.region_is_empty(x, y, rect) {
                    if remaining == 0 {
                        return Some(Point { x, y });
                    }
                    remaining -= 1;
                }
            }
        }

        None
    }

    /// Recomputes the table from `image` for every row from `start_row` down.
    /// Rows above `start_row` must not have changed since the last update.
    pub fn update(&mut self, image: &GrayImage, start_row: u32) {
        let stride = self.stride();
        let rows = self.height.min(image.height());
        let columns = self.width.min(image.width());

        for y in start_row..rows {
            let mut row_sum = 0;
            for x in 0..columns {
                row_sum += u32::from(image.get_pixel(x, y).0[0] > 0);
                let above = self.table[y as usize * stride + x as usize + 1];
                self.table[(y as usize + 1) * stride + x as usize + 1] = above + row_sum;
            }
        }
    }
}
