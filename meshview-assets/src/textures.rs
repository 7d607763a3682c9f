//! Diffuse texture discovery by naming convention

use meshview_core::{Error, Result, TextureImage};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Filename suffixes tried after each base name, in order
pub const TEXTURE_SUFFIXES: [&str; 7] = ["_a", "_A", "_d", "_D", "_diff", "_DIFF", ""];

/// Accepted image extensions, highest priority first
pub const TEXTURE_EXTENSIONS: [&str; 5] = ["dds", "png", "tga", "jpg", "bmp"];

/// A texture file located on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureMatch {
    /// File name with its on-disk case
    pub file_name: String,
    pub path: PathBuf,
    /// Set when the file sits in a subdirectory of a search location
    pub found_in_subdir: Option<PathBuf>,
}

/// Base names to probe for a material: the name itself, then the name
/// without trailing digits (`avtank03` also tries `avtank`).
pub fn candidate_bases(material_name: &str) -> Vec<String> {
    let mut bases = Vec::with_capacity(2);
    for base in [material_name, material_name.trim_end_matches(|c: char| c.is_ascii_digit())] {
        if !base.is_empty() && !bases.iter().any(|b: &String| b == base) {
            bases.push(base.to_string());
        }
    }
    bases
}

fn extension_rank(ext: &str) -> Option<usize> {
    TEXTURE_EXTENSIONS
        .iter()
        .position(|known| known.eq_ignore_ascii_case(ext))
}

/// Extension rank of `path` if its stem is `stem` and its extension is accepted
fn texture_rank(path: &Path, stem: &str) -> Option<usize> {
    let file_stem = path.file_stem().and_then(|s| s.to_str())?;
    let ext = path.extension().and_then(|s| s.to_str())?;
    if !file_stem.eq_ignore_ascii_case(stem) {
        return None;
    }
    extension_rank(ext)
}

/// Lowest extension rank wins, then the lexically first file name
#[derive(Debug)]
struct Candidate {
    rank: usize,
    file_name: String,
    path: PathBuf,
}

fn keep_best(best: &mut Option<Candidate>, candidate: Candidate) {
    let better = match best {
        None => true,
        Some(current) => (candidate.rank, &candidate.file_name) < (current.rank, &current.file_name),
    };
    if better {
        *best = Some(candidate);
    }
}

/// Search one location: its own files first, then each immediate
/// subdirectory in name order.
fn search_location(location: &Path, stem: &str) -> Option<TextureMatch> {
    let mut direct: Option<Candidate> = None;
    let mut nested: Vec<(PathBuf, Option<Candidate>)> = Vec::new();

    let files = WalkDir::new(location)
        .min_depth(1)
        .max_depth(2)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file());

    for entry in files {
        let Some(rank) = texture_rank(entry.path(), stem) else {
            continue;
        };
        let candidate = Candidate {
            rank,
            file_name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path().to_path_buf(),
        };
        if entry.depth() == 1 {
            keep_best(&mut direct, candidate);
            continue;
        }
        let Some(subdir) = entry.path().parent() else {
            continue;
        };
        // The walk is sorted and depth-first, so one subdirectory's files are contiguous
        if nested.last().map(|(dir, _)| dir.as_path()) != Some(subdir) {
            nested.push((subdir.to_path_buf(), None));
        }
        if let Some((_, best)) = nested.last_mut() {
            keep_best(best, candidate);
        }
    }

    if let Some(found) = direct {
        return Some(TextureMatch {
            file_name: found.file_name,
            path: found.path,
            found_in_subdir: None,
        });
    }
    nested.into_iter().find_map(|(subdir, best)| {
        best.map(|found| TextureMatch {
            file_name: found.file_name,
            path: found.path,
            found_in_subdir: Some(subdir),
        })
    })
}

/// Find a texture named `stem` with any accepted extension.
///
/// Each location is scanned, then its immediate subdirectories, before
/// moving to the next location. The first hit wins.
pub fn find_texture(stem: &str, locations: &[PathBuf]) -> Option<TextureMatch> {
    locations
        .iter()
        .find_map(|location| search_location(location, stem))
}

/// Probe every base name and suffix convention for a material's diffuse map
pub fn find_diffuse_texture(material_name: &str, locations: &[PathBuf]) -> Option<TextureMatch> {
    for base in candidate_bases(material_name) {
        for suffix in TEXTURE_SUFFIXES {
            let stem = format!("{}{}", base, suffix);
            if let Some(found) = find_texture(&stem, locations) {
                return Some(found);
            }
        }
    }
    None
}

/// Decode an image file into RGBA8 pixels
pub fn decode_texture(path: &Path, name: &str) -> Result<TextureImage> {
    let image = image::open(path)
        .map_err(|e| Error::InvalidData(format!("cannot decode texture {}: {}", path.display(), e)))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::InvalidData(format!(
            "texture {} has no pixels",
            path.display()
        )));
    }

    Ok(TextureImage {
        name: name.to_string(),
        width,
        height,
        rgba: image.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_candidate_bases_strip_trailing_digits() {
        assert_eq!(candidate_bases("avtank03"), vec!["avtank03", "avtank"]);
        assert_eq!(candidate_bases("hull"), vec!["hull"]);
        assert_eq!(candidate_bases("0042"), vec!["0042"]);
        assert!(candidate_bases("").is_empty());
    }

    #[test]
    fn test_numbered_material_finds_shared_diffuse_map() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("textures/avtank_d.dds"));
        let locations = vec![tmp.path().to_path_buf(), tmp.path().join("textures")];

        let found = find_diffuse_texture("avtank03", &locations).unwrap();
        assert_eq!(found.file_name, "avtank_d.dds");
    }

    #[test]
    fn test_suffix_order_prefers_a_over_d() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("hull_d.png"));
        touch(&tmp.path().join("hull_a.tga"));
        let locations = vec![tmp.path().to_path_buf()];

        let found = find_diffuse_texture("hull", &locations).unwrap();
        assert_eq!(found.file_name, "hull_a.tga");
    }

    #[test]
    fn test_extension_priority_and_case() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("Rock_D.PNG"));
        touch(&tmp.path().join("rock_d.DDS"));
        touch(&tmp.path().join("rock_d.txt"));
        let locations = vec![tmp.path().to_path_buf()];

        let found = find_texture("ROCK_D", &locations).unwrap();
        assert_eq!(found.file_name, "rock_d.DDS");
        assert!(found.found_in_subdir.is_none());
    }

    #[test]
    fn test_subdirectory_match_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("DIFF/crate.bmp"));
        let locations = vec![tmp.path().to_path_buf()];

        let found = find_texture("crate", &locations).unwrap();
        assert_eq!(found.found_in_subdir, Some(tmp.path().join("DIFF")));
    }

    #[test]
    fn test_location_files_beat_subdirectories() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("a_first/panel.dds"));
        touch(&tmp.path().join("b_second/panel.dds"));
        touch(&tmp.path().join("panel.bmp"));
        let locations = vec![tmp.path().to_path_buf()];

        let found = find_texture("panel", &locations).unwrap();
        assert_eq!(found.path, tmp.path().join("panel.bmp"));

        fs::remove_file(tmp.path().join("panel.bmp")).unwrap();
        let found = find_texture("panel", &locations).unwrap();
        assert_eq!(found.found_in_subdir, Some(tmp.path().join("a_first")));
    }

    #[test]
    fn test_two_levels_down_is_out_of_reach() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("sub/deeper/bolt.png"));
        assert!(find_texture("bolt", &[tmp.path().to_path_buf()]).is_none());
    }

    #[test]
    fn test_earlier_location_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        touch(&first.path().join("deep/wall.png"));
        touch(&second.path().join("wall.dds"));
        let locations = vec![first.path().to_path_buf(), second.path().to_path_buf()];

        let found = find_texture("wall", &locations).unwrap();
        assert_eq!(found.path, first.path().join("deep/wall.png"));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.png");
        fs::write(&path, b"not a png").unwrap();
        assert!(decode_texture(&path, "broken.png").is_err());
    }
}
