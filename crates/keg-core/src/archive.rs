//! Release asset unpacking.
//!
//! Release assets are either gzip-compressed tarballs or the bare binary.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarGz,
    /// The asset is the executable itself.
    Raw,
}

impl ArchiveKind {
    pub fn from_asset_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            ArchiveKind::TarGz
        } else {
            ArchiveKind::Raw
        }
    }
}

/// Extract a `.tar.gz` into `dest`. Entries escaping `dest` are skipped by `tar`.
pub fn unpack_tar_gz(archive: &Path, dest: &Path) -> io::Result<()> {
    let file = File::open(archive)?;
    let mut tar = tar::Archive::new(GzDecoder::new(file));
    tar.set_preserve_permissions(true);
    tar.set_overwrite(true);
    tar.unpack(dest)
}

/// Find a regular file named `name` under `root`, shallowest match first.
///
/// Release tarballs put the binary either at the top level or inside a single
/// `<tool>-<target>/` directory.
pub fn find_binary(root: &Path, name: &str) -> Option<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .max_depth(4)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && e.file_name() == name)
        .min_by_key(|e| e.depth())
        .map(|e| e.into_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::fs;

    fn write_tar_gz(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        for (name, body) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(body.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, name, *body).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn kind_from_asset_name() {
        assert_eq!(
            ArchiveKind::from_asset_name("ghdl-x86_64-unknown-linux-gnu.tar.gz"),
            ArchiveKind::TarGz
        );
        assert_eq!(ArchiveKind::from_asset_name("tool.TGZ"), ArchiveKind::TarGz);
        assert_eq!(ArchiveKind::from_asset_name("ghdl"), ArchiveKind::Raw);
    }

    #[test]
    fn unpack_and_find_top_level_binary() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("ghdl.tar.gz");
        write_tar_gz(&archive, &[("ghdl", &b"#!/bin/sh\n"[..]), ("README.md", &b"docs"[..])]);

        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        unpack_tar_gz(&archive, &out).unwrap();
        let found = find_binary(&out, "ghdl").unwrap();
        assert_eq!(found, out.join("ghdl"));
        assert!(find_binary(&out, "quickctx").is_none());
    }

    #[test]
    fn prefers_shallowest_match() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("shelltape.tar.gz");
        write_tar_gz(
            &archive,
            &[
                ("shelltape-x86_64-apple-darwin/shelltape", &b"nested"[..]),
                ("shelltape-x86_64-apple-darwin/completions/shelltape", &b"deeper"[..]),
            ],
        );
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        unpack_tar_gz(&archive, &out).unwrap();
        let found = find_binary(&out, "shelltape").unwrap();
        assert_eq!(fs::read(found).unwrap(), b"nested");
    }

    #[test]
    fn corrupt_archive_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("bad.tar.gz");
        fs::write(&archive, b"definitely not gzip").unwrap();
        assert!(unpack_tar_gz(&archive, dir.path()).is_err());
    }
}
