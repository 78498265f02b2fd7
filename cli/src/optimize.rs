//! `nfg optimize-images`: re-encode large images on disk in place.

use anyhow::Result;
use nfg_core::image::{optimize_image, Optimized, OPTIMIZE_MIN_BYTES};
use std::fs;
use std::io::Write;
use std::path::Path;
use walkdir::WalkDir;

/// Formats the optimizer re-encodes. WebP and GIF are left alone.
const EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub optimized: usize,
    pub skipped: usize,
    pub bytes_saved: u64,
}

fn is_candidate(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Walk `dir` and shrink every candidate image bigger than the threshold.
///
/// One line per file is written to `out`. Files that fail to decode are
/// reported and skipped rather than aborting the walk.
pub fn optimize_dir(dir: &Path, out: &mut impl Write) -> Result<Summary> {
    let mut summary = Summary::default();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_candidate(path) {
            continue;
        }
        if entry.metadata()?.len() <= OPTIMIZE_MIN_BYTES as u64 {
            continue;
        }

        let data = fs::read(path)?;
        match optimize_image(&data) {
            Ok(Optimized::Smaller(bytes)) => {
                fs::write(path, &bytes)?;
                let saved = (data.len() - bytes.len()) as u64;
                summary.optimized += 1;
                summary.bytes_saved += saved;
                writeln!(out, "optimized: {} (-{saved} bytes)", path.display())?;
            }
            Ok(Optimized::Unchanged) => {
                summary.skipped += 1;
                writeln!(out, "skip: {}", path.display())?;
            }
            Err(e) => {
                summary.skipped += 1;
                writeln!(out, "skip: {} ({e})", path.display())?;
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn noisy_png(size: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(size, size, |x, y| {
            image::Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x ^ y) % 256) as u8])
        });
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_is_candidate() {
        assert!(is_candidate(Path::new("a/b.JPG")));
        assert!(is_candidate(Path::new("b.png")));
        assert!(!is_candidate(Path::new("b.webp")));
        assert!(!is_candidate(Path::new("b.gif")));
        assert!(!is_candidate(Path::new("README")));
    }

    #[test]
    fn test_small_and_foreign_files_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), vec![b'x'; 20_000]).unwrap();
        fs::write(dir.path().join("tiny.png"), noisy_png(4)).unwrap();

        let mut out = Vec::new();
        let summary = optimize_dir(dir.path(), &mut out).unwrap();
        assert_eq!(summary, Summary::default());
        assert!(out.is_empty());
    }

    #[test]
    fn test_undecodable_image_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.jpg"), vec![0u8; 20_000]).unwrap();

        let mut out = Vec::new();
        let summary = optimize_dir(dir.path(), &mut out).unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.optimized, 0);
        assert!(String::from_utf8(out).unwrap().starts_with("skip: "));
    }
}
