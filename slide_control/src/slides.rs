//! Slide images on disk.
//!
//! A deck is a folder of exported PNG slides.  Slides are ordered by the
//! number in their file name (`slide2.png` before `slide10.png`).  A staged
//! deck is a private per-session copy, renamed `1.png..N.png`, which
//! [`SlideDeck::cleanup`] deletes when the presentation ends.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use gesture_core::Dimensions;
use image::imageops::FilterType;
use tracing::{debug, info};
use uuid::Uuid;

/// A decoded slide, scaled to the canvas, packed `0xAARRGGBB`.
#[derive(Clone, Debug)]
pub struct SlideImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

#[derive(Debug)]
pub struct SlideDeck {
    dir: PathBuf,
    files: Vec<PathBuf>,
    staged: bool,
}

impl SlideDeck {
    /// Use `dir` in place.  [`cleanup`](Self::cleanup) leaves it untouched.
    pub fn open(dir: &Path) -> Result<Self> {
        let deck = SlideDeck { dir: dir.to_path_buf(), files: list_slides(dir)?, staged: false };
        if deck.is_empty() {
            bail!("no PNG slides found in {}", dir.display());
        }
        info!(dir = %dir.display(), slides = deck.len(), "slide deck opened");
        Ok(deck)
    }

    /// Copy the slides of `source` into a fresh folder under `output_root`.
    pub fn stage(source: &Path, output_root: &Path) -> Result<Self> {
        let originals = list_slides(source)?;
        if originals.is_empty() {
            bail!("no PNG slides found in {}", source.display());
        }

        fs::create_dir_all(output_root)
            .with_context(|| format!("creating output folder {}", output_root.display()))?;
        // Never share a folder with another deck: cleanup would delete both.
        let dir = output_root.join(Uuid::new_v4().to_string());
        fs::create_dir(&dir)
            .with_context(|| format!("creating slide folder {}", dir.display()))?;

        let mut files = Vec::with_capacity(originals.len());
        for (i, original) in originals.iter().enumerate() {
            let target = dir.join(format!("{}.png", i + 1));
            if let Err(e) = fs::copy(original, &target) {
                // Leave nothing half-staged behind.
                let _ = fs::remove_dir_all(&dir);
                return Err(e).with_context(|| {
                    format!("copying {} to {}", original.display(), target.display())
                });
            }
            files.push(target);
        }

        info!(dir = %dir.display(), slides = files.len(), "slides staged");
        Ok(SlideDeck { dir, files, staged: true })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_staged(&self) -> bool {
        self.staged
    }

    /// Decode slide `index` and scale it to `canvas`.
    pub fn load(&self, index: usize, canvas: Dimensions) -> Result<SlideImage> {
        let path = self
            .files
            .get(index)
            .with_context(|| format!("slide {} out of range (deck has {})", index + 1, self.len()))?;
        let img = image::open(path)
            .with_context(|| format!("decoding slide {}", path.display()))?
            .resize_exact(canvas.width, canvas.height, FilterType::Triangle)
            .to_rgba8();

        let pixels = img
            .pixels()
            .map(|p| {
                let [r, g, b, _] = p.0;
                0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
            })
            .collect();
        debug!(slide = index + 1, path = %path.display(), "slide decoded");

        Ok(SlideImage {
            width: canvas.width as usize,
            height: canvas.height as usize,
            pixels,
        })
    }

    pub fn load_all(&self, canvas: Dimensions) -> Result<Vec<SlideImage>> {
        (0..self.len()).map(|i| self.load(i, canvas)).collect()
    }

    /// Release the deck.  Removes the folder of a staged deck.
    pub fn cleanup(self) -> Result<()> {
        if self.staged && self.dir.exists() {
            fs::remove_dir_all(&self.dir)
                .with_context(|| format!("removing slide folder {}", self.dir.display()))?;
            info!(dir = %self.dir.display(), "staged slides removed");
        }
        Ok(())
    }
}

/// PNG files of `dir`, in slide order.
pub fn list_slides(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("reading slide folder {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_png = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if is_png && path.is_file() {
            files.push(path);
        }
    }

    // Numbered slides first, by number; the rest by name.
    files.sort_by_key(|p| {
        let stem = p.file_stem().and_then(|s| s.to_str()).unwrap_or_default().to_string();
        (slide_number(&stem).map_or((1, 0), |n| (0, n)), stem)
    });
    Ok(files)
}

/// Last run of ASCII digits in a file stem: `slide12` → 12.
fn slide_number(stem: &str) -> Option<u64> {
    let reversed: String = stem
        .chars()
        .rev()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if reversed.is_empty() {
        return None;
    }
    reversed.chars().rev().collect::<String>().parse().ok()
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
