//! Tiling scroll engine.
//!
//! Maps a scroll offset onto an infinite grid of square cells. The image in a
//! cell depends only on its absolute row and column, so the grid reads as one
//! continuous tiling no matter how many ticks have passed. The offset is kept
//! bounded by removing whole cycles (rows after which the row/column to image
//! mapping repeats), which changes nothing on screen.

use crate::settings::Settings;
use crate::types::Rect;

/// One visible grid cell for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub column: usize,
    /// Row on screen, 0 = topmost (partially hidden overscan row)
    pub row: usize,
    /// Row in the infinite grid
    pub absolute_row: usize,
    pub image_index: usize,
    pub rect: Rect,
}

/// Greatest common divisor (Euclid). `gcd(a, 0) == a`.
pub fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Rows after which the image pattern lines up with row 0 again.
/// Requires `image_count > 0`.
pub fn cycle_rows(columns: usize, image_count: usize) -> usize {
    image_count / gcd(columns, image_count)
}

/// Image shown at (absolute_row, column). Requires `image_count > 0`.
#[inline]
pub fn image_index(absolute_row: usize, column: usize, columns: usize, image_count: usize) -> usize {
    (absolute_row * columns + column) % image_count
}

#[derive(Debug, Clone)]
pub struct TilingEngine {
    scroll_offset: f64,
    settings: Settings,
    image_count: usize,
}

impl TilingEngine {
    pub fn new(settings: Settings, image_count: usize) -> Self {
        Self { scroll_offset: 0.0, settings, image_count }
    }

    #[inline]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Jump to an offset. Negative and non-finite values reset to 0.
    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll_offset = if offset.is_finite() { offset.max(0.0) } else { 0.0 };
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.settings.set_speed(speed);
    }

    pub fn set_columns(&mut self, columns: usize) {
        self.settings.set_columns(columns);
    }

    pub fn image_count(&self) -> usize {
        self.image_count
    }

    pub fn set_image_count(&mut self, image_count: usize) {
        self.image_count = image_count;
    }

    /// Side of one square cell for a viewport of this width.
    #[inline]
    pub fn cell_size(&self, viewport_width: f64) -> f64 {
        viewport_width / self.settings.columns() as f64
    }

    /// Height of one full pattern cycle, or None when there is nothing to cycle.
    pub fn cycle_height(&self, viewport_width: f64) -> Option<f64> {
        if self.image_count == 0 || viewport_width <= 0.0 {
            return None;
        }
        let rows = cycle_rows(self.settings.columns(), self.image_count);
        Some(self.cell_size(viewport_width) * rows as f64)
    }

    /// Move the grid by one tick's worth of scrolling.
    pub fn advance_tick(&mut self, viewport_width: f64) {
        self.scroll_offset += self.settings.speed();

        // A column or size change can shrink the cycle below the current
        // offset, so drop every whole cycle rather than just one.
        if let Some(cycle_height) = self.cycle_height(viewport_width) {
            if self.scroll_offset >= cycle_height {
                self.scroll_offset %= cycle_height;
            }
        }
    }

    /// Every cell needed to cover the viewport, plus one overscan row above
    /// and below. Yields nothing when there are no images.
    pub fn visible_cells(&self, viewport_width: f64, viewport_height: f64) -> VisibleCells {
        let columns = self.settings.columns();
        let cell_size = self.cell_size(viewport_width);

        let usable = self.image_count > 0
            && cell_size.is_finite()
            && cell_size > 0.0
            && viewport_height >= 0.0;

        let rows = if usable {
            (viewport_height / cell_size).ceil() as usize + 2
        } else {
            0
        };

        let (pixel_offset, base_row) = if usable {
            (
                self.scroll_offset % cell_size,
                (self.scroll_offset / cell_size).floor() as usize,
            )
        } else {
            (0.0, 0)
        };

        VisibleCells {
            cell_size,
            pixel_offset,
            base_row,
            columns,
            image_count: self.image_count,
            total: rows * columns,
            next: 0,
        }
    }
}

/// Lazy iterator over the cells of one frame, row-major from the top.
#[derive(Debug, Clone)]
pub struct VisibleCells {
    cell_size: f64,
    pixel_offset: f64,
    base_row: usize,
    columns: usize,
    image_count: usize,
    total: usize,
    next: usize,
}

impl VisibleCells {
    /// Offset of the grid within its top cell, in [0, cell_size).
    pub fn pixel_offset(&self) -> f64 {
        self.pixel_offset
    }

    pub fn base_row(&self) -> usize {
        self.base_row
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }
}

impl Iterator for VisibleCells {
    type Item = GridCell;

    fn next(&mut self) -> Option<GridCell> {
        if self.next >= self.total {
            return None;
        }
        let row = self.next / self.columns;
        let column = self.next % self.columns;
        self.next += 1;

        let absolute_row = self.base_row + row;
        let y = row as f64 * self.cell_size - self.pixel_offset;

        Some(GridCell {
            column,
            row,
            absolute_row,
            image_index: image_index(absolute_row, column, self.columns, self.image_count),
            rect: Rect::new(column as f64 * self.cell_size, y, self.cell_size, self.cell_size),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for VisibleCells {}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(columns: usize, image_count: usize, speed: f64) -> TilingEngine {
        TilingEngine::new(Settings::new(speed, columns), image_count)
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(4, 6), 2);
        assert_eq!(gcd(6, 4), 2);
        assert_eq!(gcd(5, 7), 1);
        assert_eq!(gcd(8, 16), 8);
        assert_eq!(gcd(4, 0), 4);
    }

    #[test]
    fn test_cycle_rows() {
        assert_eq!(cycle_rows(4, 6), 3);
        assert_eq!(cycle_rows(4, 8), 2);
        assert_eq!(cycle_rows(5, 7), 7);
        assert_eq!(cycle_rows(4, 2), 1);
    }

    #[test]
    fn image_index_is_pure() {
        for columns in 4..=8 {
            for count in 1..=13 {
                for row in 0..20 {
                    for col in 0..columns {
                        let a = image_index(row, col, columns, count);
                        let b = image_index(row, col, columns, count);
                        assert_eq!(a, b);
                        assert!(a < count);
                    }
                }
            }
        }
    }

    #[test]
    fn mapping_repeats_every_cycle() {
        for columns in 4..=8 {
            for count in 1..=13 {
                let cycle = cycle_rows(columns, count);
                for row in 0..10 {
                    for col in 0..columns {
                        assert_eq!(
                            image_index(row, col, columns, count),
                            image_index(row + cycle, col, columns, count),
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn layout_example() {
        let mut e = engine(4, 6, 0.5);
        e.set_scroll_offset(250.0);
        let cells = e.visible_cells(800.0, 600.0);
        assert_eq!(cells.cell_size(), 200.0);
        assert_eq!(cells.pixel_offset(), 50.0);
        assert_eq!(cells.base_row(), 1);

        // ceil(600 / 200) + 2 = 5 rows of 4
        assert_eq!(cells.len(), 20);

        let first: Vec<GridCell> = cells.take(5).collect();
        assert_eq!(first[0].rect, Rect::new(0.0, -50.0, 200.0, 200.0));
        assert_eq!(first[0].absolute_row, 1);
        assert_eq!(first[0].image_index, 4); // (1 * 4 + 0) % 6
        assert_eq!(first[3].rect.x, 600.0);
        assert_eq!(first[4].row, 1);
        assert_eq!(first[4].rect.y, 150.0);
        assert_eq!(first[4].image_index, 2); // (2 * 4 + 0) % 6
    }

    #[test]
    fn cells_scroll_up_as_offset_grows() {
        let mut e = engine(4, 6, 0.5);
        e.set_scroll_offset(10.0);
        let before = e.visible_cells(800.0, 600.0).next().unwrap();
        e.set_scroll_offset(20.0);
        let after = e.visible_cells(800.0, 600.0).next().unwrap();
        assert!(after.rect.y < before.rect.y);
        assert_eq!(after.image_index, before.image_index);
    }

    #[test]
    fn wrap_is_visually_lossless() {
        let mut e = engine(4, 6, 0.5);
        let cycle = e.cycle_height(800.0).unwrap();
        assert_eq!(cycle, 600.0);

        e.set_scroll_offset(750.0);
        let high: Vec<GridCell> = e.visible_cells(800.0, 600.0).collect();
        e.set_scroll_offset(750.0 - cycle);
        let low: Vec<GridCell> = e.visible_cells(800.0, 600.0).collect();

        assert_eq!(high.len(), low.len());
        for (h, l) in high.iter().zip(&low) {
            assert_eq!(h.image_index, l.image_index);
            assert_eq!(h.rect, l.rect);
        }
    }

    #[test]
    fn advance_tick_wraps_at_cycle_height() {
        let mut e = engine(4, 6, 2.0);
        e.set_scroll_offset(599.0);
        e.advance_tick(800.0);
        assert_eq!(e.scroll_offset(), 1.0);

        e.advance_tick(800.0);
        assert_eq!(e.scroll_offset(), 3.0);
    }

    #[test]
    fn advance_tick_without_images_keeps_growing() {
        let mut e = engine(4, 0, 1.5);
        for _ in 0..1000 {
            e.advance_tick(800.0);
        }
        assert_eq!(e.scroll_offset(), 1500.0);
    }

    #[test]
    fn offset_stays_bounded_over_long_runs() {
        let mut e = engine(5, 7, 1.7);
        let cycle = e.cycle_height(1000.0).unwrap();
        for _ in 0..100_000 {
            e.advance_tick(1000.0);
            assert!(e.scroll_offset() < cycle);
        }
    }

    #[test]
    fn shrinking_cycle_drops_whole_cycles() {
        let mut e = engine(4, 6, 0.5);
        e.set_scroll_offset(590.0);
        // 8 columns over 800px: cell 100, cycle_rows(8, 6) = 3, cycle 300
        e.set_columns(8);
        e.advance_tick(800.0);
        assert_eq!(e.scroll_offset(), 290.5);
    }

    #[test]
    fn empty_image_set_yields_no_cells() {
        let e = engine(4, 0, 0.5);
        assert_eq!(e.visible_cells(800.0, 600.0).count(), 0);
    }

    #[test]
    fn degenerate_viewport_yields_no_cells() {
        let e = engine(4, 6, 0.5);
        assert_eq!(e.visible_cells(0.0, 600.0).count(), 0);
        assert_eq!(e.visible_cells(-10.0, 600.0).count(), 0);
    }

    #[test]
    fn setters_feed_layout() {
        let mut e = engine(4, 6, 0.5);
        e.set_columns(6);
        let cells = e.visible_cells(600.0, 100.0);
        assert_eq!(cells.cell_size(), 100.0);
        assert_eq!(cells.len(), 3 * 6);
        e.set_speed(9.0);
        assert_eq!(e.settings().speed(), 2.0);
    }
}
