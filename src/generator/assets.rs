//! Verbatim file copies into the output directory.
//!
//! `static/` and `assets/` are mirrored as `public/static/` and
//! `public/assets/`; note assets collected during the notes walk land in
//! `public/notes/`. A file that fails to copy is logged and skipped.

use jwalk::{Parallelism, WalkDir};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{config::SitePaths, debug, log};

/// Copy counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    pub copied: usize,
    pub failed: usize,
}

impl CopyStats {
    fn record(&mut self, src: &Path, dest: &Path, result: io::Result<()>) {
        match result {
            Ok(()) => {
                debug!("assets"; "{}", dest.display());
                self.copied += 1;
            }
            Err(e) => {
                log!("assets"; "failed to copy {}: {}", src.display(), e);
                self.failed += 1;
            }
        }
    }
}

/// Copy the static directories and the collected note assets.
pub fn copy_all(paths: &SitePaths, note_assets: &[PathBuf]) -> CopyStats {
    let mut stats = CopyStats::default();

    for (src_dir, name) in paths.static_dirs() {
        copy_dir(&src_dir, &paths.output_join(name), &mut stats);
    }

    let notes_dir = paths.notes_dir();
    let notes_out = paths.output_join("notes");
    for rel in note_assets {
        let (src, dest) = (notes_dir.join(rel), notes_out.join(rel));
        stats.record(&src, &dest, copy_file(&src, &dest));
    }

    if stats.copied > 0 || stats.failed > 0 {
        log!("assets"; "copied {} files, {} failed", stats.copied, stats.failed);
    }
    stats
}

/// Mirror every file below `src` into `dest`, following symlinks. A missing
/// `src` copies nothing.
fn copy_dir(src: &Path, dest: &Path, stats: &mut CopyStats) {
    if !src.is_dir() {
        return;
    }

    let files: Vec<PathBuf> = WalkDir::new(src)
        .parallelism(Parallelism::Serial)
        .sort(true)
        .follow_links(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .collect();

    for file in files {
        let Ok(rel) = file.strip_prefix(src) else {
            continue;
        };
        let target = dest.join(rel);
        stats.record(&file, &target, copy_file(&file, &target));
    }
}

fn copy_file(src: &Path, dest: &Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dest).map(|_| ())
}
