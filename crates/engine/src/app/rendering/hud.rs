use crate::app::{HudData, HudLine, HudTone};

use super::raster::Canvas;

const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;
const BODY_SCALE: i32 = 2;
const BANNER_SCALE: i32 = 3;
const PANEL_MARGIN: i32 = 16;
const PANEL_INSET: i32 = 10;
const PROGRESS_DOT: i32 = 12;
const PROGRESS_GAP: i32 = 6;

const PANEL_BG: [u8; 4] = [0, 0, 0, 178];
const PANEL_BORDER: [u8; 4] = [255, 215, 0, 255];
const MODAL_SHADE: [u8; 4] = [0, 0, 0, 204];
const DOT_DONE: [u8; 4] = [255, 215, 0, 255];
const DOT_OPEN: [u8; 4] = [68, 68, 68, 255];

pub(crate) fn glyph_advance(scale: i32) -> i32 {
    (GLYPH_WIDTH + 1) * scale
}

pub(crate) fn line_advance(scale: i32) -> i32 {
    (GLYPH_HEIGHT + 2) * scale
}

pub(crate) fn text_width(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * glyph_advance(scale)
}

fn tone_color(tone: HudTone) -> [u8; 4] {
    match tone {
        HudTone::Title => [255, 215, 0, 255],
        HudTone::Body => [240, 232, 214, 255],
        HudTone::Accent => [255, 170, 70, 255],
        HudTone::Dim => [150, 150, 150, 255],
        HudTone::Success => [120, 230, 140, 255],
    }
}

/// Maps a character onto the uppercase glyph set. Accented Latin letters lose
/// the accent and a few symbols get a close stand-in.
pub(crate) fn fold_char(ch: char) -> char {
    match ch {
        'à' | 'á' | 'â' | 'À' | 'Á' => 'A',
        'è' | 'é' | 'ê' | 'È' | 'É' => 'E',
        'ì' | 'í' | 'Ì' | 'Í' => 'I',
        'ò' | 'ó' | 'Ò' | 'Ó' => 'O',
        'ù' | 'ú' | 'Ù' | 'Ú' => 'U',
        '✓' => '^',
        '❌' => 'X',
        '✨' => '*',
        '→' => '>',
        '’' => '\'',
        other => other.to_ascii_uppercase(),
    }
}

const FONT: &[(char, [u8; 5])] = &[
    ('A', [0b010, 0b101, 0b111, 0b101, 0b101]),
    ('B', [0b110, 0b101, 0b110, 0b101, 0b110]),
    ('C', [0b011, 0b100, 0b100, 0b100, 0b011]),
    ('D', [0b110, 0b101, 0b101, 0b101, 0b110]),
    ('E', [0b111, 0b100, 0b110, 0b100, 0b111]),
    ('F', [0b111, 0b100, 0b110, 0b100, 0b100]),
    ('G', [0b011, 0b100, 0b101, 0b101, 0b011]),
    ('H', [0b101, 0b101, 0b111, 0b101, 0b101]),
    ('I', [0b111, 0b010, 0b010, 0b010, 0b111]),
    ('J', [0b001, 0b001, 0b001, 0b101, 0b010]),
    ('K', [0b101, 0b101, 0b110, 0b101, 0b101]),
    ('L', [0b100, 0b100, 0b100, 0b100, 0b111]),
    ('M', [0b101, 0b111, 0b111, 0b101, 0b101]),
    ('N', [0b110, 0b101, 0b101, 0b101, 0b101]),
    ('O', [0b010, 0b101, 0b101, 0b101, 0b010]),
    ('P', [0b110, 0b101, 0b110, 0b100, 0b100]),
    ('Q', [0b010, 0b101, 0b101, 0b110, 0b011]),
    ('R', [0b110, 0b101, 0b110, 0b101, 0b101]),
    ('S', [0b011, 0b100, 0b010, 0b001, 0b110]),
    ('T', [0b111, 0b010, 0b010, 0b010, 0b010]),
    ('U', [0b101, 0b101, 0b101, 0b101, 0b111]),
    ('V', [0b101, 0b101, 0b101, 0b101, 0b010]),
    ('W', [0b101, 0b101, 0b111, 0b111, 0b101]),
    ('X', [0b101, 0b101, 0b010, 0b101, 0b101]),
    ('Y', [0b101, 0b101, 0b010, 0b010, 0b010]),
    ('Z', [0b111, 0b001, 0b010, 0b100, 0b111]),
    ('0', [0b111, 0b101, 0b101, 0b101, 0b111]),
    ('1', [0b010, 0b110, 0b010, 0b010, 0b111]),
    ('2', [0b110, 0b001, 0b010, 0b100, 0b111]),
    ('3', [0b110, 0b001, 0b010, 0b001, 0b110]),
    ('4', [0b101, 0b101, 0b111, 0b001, 0b001]),
    ('5', [0b111, 0b100, 0b110, 0b001, 0b110]),
    ('6', [0b011, 0b100, 0b111, 0b101, 0b111]),
    ('7', [0b111, 0b001, 0b010, 0b010, 0b010]),
    ('8', [0b111, 0b101, 0b111, 0b101, 0b111]),
    ('9', [0b111, 0b101, 0b111, 0b001, 0b110]),
    ('!', [0b010, 0b010, 0b010, 0b000, 0b010]),
    ('?', [0b110, 0b001, 0b010, 0b000, 0b010]),
    ('.', [0b000, 0b000, 0b000, 0b000, 0b010]),
    (',', [0b000, 0b000, 0b000, 0b010, 0b100]),
    (':', [0b000, 0b010, 0b000, 0b010, 0b000]),
    ('\'', [0b010, 0b010, 0b000, 0b000, 0b000]),
    ('-', [0b000, 0b000, 0b111, 0b000, 0b000]),
    ('_', [0b000, 0b000, 0b000, 0b000, 0b111]),
    ('/', [0b001, 0b001, 0b010, 0b100, 0b100]),
    ('(', [0b001, 0b010, 0b010, 0b010, 0b001]),
    (')', [0b100, 0b010, 0b010, 0b010, 0b100]),
    ('>', [0b100, 0b010, 0b001, 0b010, 0b100]),
    ('*', [0b101, 0b010, 0b111, 0b010, 0b101]),
    ('^', [0b000, 0b001, 0b001, 0b101, 0b010]),
    (' ', [0b000; 5]),
];

const UNKNOWN_GLYPH: [u8; 5] = [0b111, 0b101, 0b101, 0b101, 0b111];

pub(crate) fn glyph(ch: char) -> [u8; 5] {
    let folded = fold_char(ch);
    FONT.iter()
        .find(|(key, _)| *key == folded)
        .map(|(_, rows)| *rows)
        .unwrap_or(UNKNOWN_GLYPH)
}

pub(crate) fn draw_text(canvas: &mut Canvas<'_>, x: i32, y: i32, text: &str, scale: i32, color: [u8; 4]) {
    let mut pen_x = x;
    for ch in text.chars() {
        let rows = glyph(ch);
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                canvas.fill_rect(
                    pen_x + col * scale,
                    y + row as i32 * scale,
                    scale,
                    scale,
                    color,
                );
            }
        }
        pen_x += glyph_advance(scale);
    }
}

fn panel_size(lines: &[HudLine], scale: i32) -> (i32, i32) {
    let widest = lines
        .iter()
        .map(|line| text_width(&line.text, scale))
        .max()
        .unwrap_or(0);
    (
        widest + PANEL_INSET * 2,
        lines.len() as i32 * line_advance(scale) + PANEL_INSET * 2,
    )
}

fn draw_panel(canvas: &mut Canvas<'_>, left: i32, top: i32, lines: &[HudLine], scale: i32) {
    if lines.is_empty() {
        return;
    }
    let (w, h) = panel_size(lines, scale);
    canvas.fill_rect(left, top, w, h, PANEL_BG);
    canvas.outline_rect(left, top, w, h, PANEL_BORDER);
    let mut y = top + PANEL_INSET;
    for line in lines {
        draw_text(canvas, left + PANEL_INSET, y, &line.text, scale, tone_color(line.tone));
        y += line_advance(scale);
    }
}

fn draw_progress(canvas: &mut Canvas<'_>, progress: &[bool]) {
    if progress.is_empty() {
        return;
    }
    let count = progress.len() as i32;
    let total = count * PROGRESS_DOT + (count - 1) * PROGRESS_GAP;
    let mut x = (canvas.width() as i32 - total) / 2;
    let y = canvas.height() as i32 - PANEL_MARGIN - PROGRESS_DOT;
    for done in progress {
        let color = if *done { DOT_DONE } else { DOT_OPEN };
        canvas.fill_rect(x, y, PROGRESS_DOT, PROGRESS_DOT, color);
        x += PROGRESS_DOT + PROGRESS_GAP;
    }
}

fn draw_banner(canvas: &mut Canvas<'_>, text: &str) {
    let line = [HudLine::new(text, HudTone::Title)];
    let (w, _) = panel_size(&line, BANNER_SCALE);
    let left = (canvas.width() as i32 - w) / 2;
    let top = canvas.height() as i32 / 2 + line_advance(BANNER_SCALE) * 3;
    draw_panel(canvas, left, top, &line, BANNER_SCALE);
}

fn draw_modal(canvas: &mut Canvas<'_>, lines: &[HudLine]) {
    canvas.fill_rect(0, 0, canvas.width() as i32, canvas.height() as i32, MODAL_SHADE);
    let (w, h) = panel_size(lines, BODY_SCALE);
    let left = (canvas.width() as i32 - w) / 2;
    let top = (canvas.height() as i32 - h) / 2;
    draw_panel(canvas, left, top, lines, BODY_SCALE);
}

pub(crate) fn draw_hud(canvas: &mut Canvas<'_>, hud: &HudData) {
    if canvas.width() == 0 || canvas.height() == 0 {
        return;
    }
    draw_panel(canvas, PANEL_MARGIN, PANEL_MARGIN, &hud.top_left, BODY_SCALE);
    let (right_w, _) = panel_size(&hud.top_right, BODY_SCALE);
    draw_panel(
        canvas,
        canvas.width() as i32 - PANEL_MARGIN - right_w,
        PANEL_MARGIN,
        &hud.top_right,
        BODY_SCALE,
    );
    draw_progress(canvas, &hud.progress);
    if let Some(banner) = &hud.banner {
        draw_banner(canvas, banner);
    }
    if !hud.modal.is_empty() {
        draw_modal(canvas, &hud.modal);
    }
}
