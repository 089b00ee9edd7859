//! Software-rendered presentation window using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┬────────────┐
//! │  Slide 3/12                                          │  TRACKER   │
//! │                                                      │  PREVIEW   │
//! │                                                      │ ─threshold─│
//! │            [slide image + strokes + pointer]         └────────────┤
//! │                                                                   │
//! │  status bar / key legend                                          │
//! └───────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;

use anyhow::{anyhow, Result};
use gesture_core::{Dimensions, FrameOutput, HandObservation, Point, Stroke};
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use crate::slides::SlideImage;
use crate::tracker::{SimInput, SimPose};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const PREVIEW_W:       usize = 213;
const PREVIEW_H:       usize = 120;
const STATUS_H:        usize = 36;
const STROKE_RADIUS:   i32   = 6;   // 12 px wide strokes
const POINTER_RADIUS:  i32   = 12;
const LABEL_SCALE:     usize = 4;
const BG_COLOR:        u32   = 0xFF1A1A2E;
const PREVIEW_BG:      u32   = 0xFF16213E;
const TEXT_BG:         u32   = 0xFF0F3460;
const STROKE_COLOR:    u32   = 0xFFC80000;  // dark red
const POINTER_COLOR:   u32   = 0xFFFF0000;
const THRESHOLD_COLOR: u32   = 0xFF00FF00;
const LANDMARK_COLOR:  u32   = 0xFFFFD700;  // gold

// ════════════════════════════════════════════════════════════════════════════
// Controls: non-gesture input gathered each frame
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Jump {
    First,
    Last,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub quit: bool,
    /// Threshold slider movement in steps; negative moves the line up.
    pub threshold_steps: i32,
    pub jump: Option<Jump>,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
    width:  usize,
    height: usize,
    /// Camera frame size, for the tracker preview.
    frame:  Dimensions,
    /// Present in simulation mode: the window doubles as the hand tracker.
    sim_tx: Option<Sender<SimInput>>,
}

impl Visualizer {
    pub fn new(canvas: Dimensions, frame: Dimensions, sim_tx: Option<Sender<SimInput>>) -> Result<Self> {
        let width = canvas.width as usize;
        let height = canvas.height as usize;
        let mut window = Window::new(
            "Slide Control — hands-free presenter",
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| anyhow!("opening presentation window: {}", e))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; width * height],
            width,
            height,
            frame,
            sim_tx,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Read the keyboard and mouse.  In simulation mode this also feeds the
    /// simulated tracker one frame of input.
    pub fn poll_input(&mut self) -> Controls {
        let mut controls = Controls::default();
        if !self.window.is_open() {
            controls.quit = true;
            return controls;
        }

        // Keys that trigger on first press only
        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        // Keys that repeat while held
        let held     = |k: Key| self.window.is_key_pressed(k, KeyRepeat::Yes);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            controls.quit = true;
        }
        if held(Key::Up)   { controls.threshold_steps -= 1; }
        if held(Key::Down) { controls.threshold_steps += 1; }
        if one_shot(Key::Home) {
            controls.jump = Some(Jump::First);
        } else if one_shot(Key::End) {
            controls.jump = Some(Jump::Last);
        }

        if let Some(tx) = &self.sim_tx {
            if controls.quit {
                let _ = tx.send(SimInput::Quit);
            } else {
                let down = |k: Key| self.window.is_key_down(k);
                let pose = if down(Key::Key1) {
                    SimPose::Draw
                } else if down(Key::Key2) {
                    SimPose::Pointer
                } else if down(Key::Key3) {
                    SimPose::Erase
                } else if down(Key::Left) {
                    SimPose::ThumbOut
                } else if down(Key::Right) {
                    SimPose::PinkyOut
                } else {
                    SimPose::Fist
                };
                let cursor = self
                    .window
                    .get_mouse_pos(MouseMode::Discard)
                    .map(|(x, y)| Point::new(x as i32, y as i32));
                let _ = tx.send(SimInput::Frame { pose, cursor });
            }
        }

        controls
    }

    /// Render one frame.
    pub fn render(
        &mut self,
        slide:  Option<&SlideImage>,
        out:    &FrameOutput,
        hand:   Option<&HandObservation>,
        status: &str,
    ) {
        // ── Slide ─────────────────────────────────────────────────────────
        match slide {
            Some(img) if img.width == self.width && img.height == self.height => {
                self.buf.copy_from_slice(&img.pixels);
            }
            _ => self.buf.fill(BG_COLOR),
        }

        // ── Annotations, oldest first ─────────────────────────────────────
        for stroke in &out.strokes {
            self.draw_stroke(stroke);
        }

        // ── Pointer ───────────────────────────────────────────────────────
        if let Some(p) = out.pointer {
            self.fill_circle(p.x, p.y, POINTER_RADIUS, POINTER_COLOR);
        }

        // ── Slide counter ─────────────────────────────────────────────────
        let counter = format!("Slide {}/{}", out.slide_index + 1, out.slide_count);
        self.draw_label(&counter, 10, 30, 0xFFFFFFFF, LABEL_SCALE);

        // ── Tracker preview ───────────────────────────────────────────────
        self.draw_preview(out, hand);

        // ── Status bar ────────────────────────────────────────────────────
        let status_y = self.height.saturating_sub(STATUS_H);
        self.fill_rect(0, status_y, self.width, STATUS_H, TEXT_BG);
        self.draw_label(status, 10, status_y + 8, 0xFFEEEEEE, 2);

        // ── Key legend ────────────────────────────────────────────────────
        let legend = if self.sim_tx.is_some() {
            "mouse=finger  1=draw  2=pointer  3=erase  left/right=swipe  up/down=threshold  home/end  q=quit"
        } else {
            "up/down=threshold  home/end=first/last  q=quit"
        };
        self.draw_label(legend, 10, self.height.saturating_sub(12), 0xFF888888, 1);

        self.window.update_with_buffer(&self.buf, self.width, self.height).ok();
    }

    // ── Strokes ───────────────────────────────────────────────────────────

    fn draw_stroke(&mut self, stroke: &Stroke) {
        if let [only] = stroke.points() {
            self.fill_circle(only.x, only.y, STROKE_RADIUS, STROKE_COLOR);
            return;
        }
        for (a, b) in stroke.segments() {
            self.draw_thick_line(a, b, STROKE_RADIUS, STROKE_COLOR);
        }
    }

    // ── Tracker preview ───────────────────────────────────────────────────

    fn draw_preview(&mut self, out: &FrameOutput, hand: Option<&HandObservation>) {
        let x0 = self.width.saturating_sub(PREVIEW_W);
        self.fill_rect(x0, 0, PREVIEW_W, PREVIEW_H, PREVIEW_BG);

        let fw = self.frame.width.max(1) as f32;
        let fh = self.frame.height.max(1) as f32;
        let to_preview = |x: f32, y: f32| {
            (
                x0 as i32 + (x / fw * PREVIEW_W as f32) as i32,
                (y / fh * PREVIEW_H as f32) as i32,
            )
        };

        // Threshold line, translucent like a slider guide.
        let (_, ty) = to_preview(0.0, out.threshold as f32);
        for dy in -1..=1 {
            let y = ty + dy;
            if y < 0 || y as usize >= PREVIEW_H { continue; }
            for x in x0..(x0 + PREVIEW_W).min(self.width) {
                self.blend_pixel(x, y as usize, THRESHOLD_COLOR, 0.3);
            }
        }

        if let Some(hand) = hand {
            for lm in &hand.landmarks {
                let (px, py) = to_preview(lm.x, lm.y);
                if px >= x0 as i32 && py >= 0 && (py as usize) < PREVIEW_H {
                    self.fill_rect(px as usize, py as usize, 2, 2, LANDMARK_COLOR);
                }
            }
            let (cx, cy) = to_preview(hand.center.0, hand.center.1);
            if cx >= x0 as i32 && cy >= 0 && (cy as usize) < PREVIEW_H {
                self.fill_rect(cx as usize, cy as usize, 3, 3, THRESHOLD_COLOR);
            }
        }

        let caption = match out.fingers {
            Some(f) => format!("{} {}  t={}", out.gesture.as_str(), f, out.threshold),
            None => format!("no hand  t={}", out.threshold),
        };
        self.fill_rect(x0, PREVIEW_H, PREVIEW_W, 12, TEXT_BG);
        self.draw_label(&caption, x0 + 4, PREVIEW_H + 3, 0xFFEEEEEE, 1);
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(self.height) {
            for col in x..(x+w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buf[y as usize * self.width + x as usize] = color;
        }
    }

    fn blend_pixel(&mut self, x: usize, y: usize, color: u32, t: f32) {
        if x < self.width && y < self.height {
            let i = y * self.width + x;
            self.buf[i] = blend(self.buf[i], color, t);
        }
    }

    fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx*dx + dy*dy <= r*r {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Bresenham walk, stamping a disc at every step.
    fn draw_thick_line(&mut self, a: Point, b: Point, r: i32, color: u32) {
        let (mut x, mut y) = (a.x, a.y);
        let dx = (b.x - a.x).abs();
        let dy = -(b.y - a.y).abs();
        let sx = if a.x < b.x { 1 } else { -1 };
        let sy = if a.y < b.y { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.fill_circle(x, y, r, color);
            if x == b.x && y == b.y { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    /// Minimal bitmap font: 3×5 glyphs, magnified by `scale`.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32, scale: usize) {
        let scale = scale.max(1);
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx + 4 * scale > self.width { break; }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 0.0), 0xFF000000);
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 1.0), 0xFFFFFFFF);
    }

    #[test]
    fn blend_is_opaque() {
        assert_eq!(blend(0x00123456, 0x00654321, 0.3) >> 24, 0xFF);
    }

    #[test]
    fn legend_characters_have_glyphs() {
        let fallback = char_glyph('~');
        for c in "slide q=quit 0123456789/".chars().filter(|c| *c != ' ') {
            assert_ne!(char_glyph(c), fallback, "{:?} missing", c);
        }
    }

    #[test]
    fn status_lines_have_glyphs() {
        let fallback = char_glyph('~');
        for c in "Stroke erased (2 left), Threshold 300, Already at the last slide"
            .chars()
            .filter(|c| *c != ' ')
        {
            assert_ne!(char_glyph(c), fallback, "{:?} missing", c);
        }
    }
}
