use image::{GrayImage, Luma};

const PANEL_WIDTH: u32 = 512;
const PANEL_HEIGHT: u32 = 64;
const PANEL_GAP: u32 = 4;

/// Stack one grayscale panel per feature array, top to bottom. Each panel is
/// min-max normalized independently; an empty array leaves its panel black.
pub(super) fn compose(panels: &[Vec<Vec<f32>>]) -> GrayImage {
    let count = panels.len().max(1) as u32;
    let height = count * PANEL_HEIGHT + (count - 1) * PANEL_GAP;
    let mut img = GrayImage::new(PANEL_WIDTH, height);

    for (i, panel) in panels.iter().enumerate() {
        let y0 = i as u32 * (PANEL_HEIGHT + PANEL_GAP);
        draw_panel(&mut img, y0, panel);
    }
    img
}

/// Turn a frames-major grid into feature-major rows so time runs horizontally.
pub(super) fn transpose(frames: &[Vec<f32>]) -> Vec<Vec<f32>> {
    let Some(first) = frames.first() else {
        return Vec::new();
    };
    (0..first.len())
        .map(|col| frames.iter().map(|frame| frame.get(col).copied().unwrap_or(0.0)).collect())
        .collect()
}

fn draw_panel(img: &mut GrayImage, y0: u32, rows: &[Vec<f32>]) {
    let cols = rows.first().map_or(0, |r| r.len());
    if rows.is_empty() || cols == 0 {
        return;
    }

    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in rows.iter().flatten() {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    let range = if max > min { max - min } else { 1.0 };

    for y in 0..PANEL_HEIGHT {
        let row = &rows[(y as usize * rows.len()) / PANEL_HEIGHT as usize];
        for x in 0..PANEL_WIDTH {
            let v = row[(x as usize * cols) / PANEL_WIDTH as usize];
            let level = if v.is_finite() {
                (((v - min) / range) * 255.0).clamp(0.0, 255.0) as u8
            } else {
                0
            };
            img.put_pixel(x, y0 + y, Luma([level]));
        }
    }
}
