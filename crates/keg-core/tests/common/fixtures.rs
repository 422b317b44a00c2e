//! Release artifact fixtures: tarballs holding a shell-script "binary".

use flate2::write::GzEncoder;
use flate2::Compression;
use sha2::{Digest, Sha256};

/// Shell script that prints `<name> <version>` for any arguments.
pub fn version_script(name: &str, version: &str) -> Vec<u8> {
    format!("#!/bin/sh\necho \"{name} {version}\"\n").into_bytes()
}

/// A `.tar.gz` with each entry stored as an executable.
pub fn tar_gz(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, body) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(body.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, path, *body).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Manifest with a single linux/x86_64 artifact.
pub fn linux_manifest(name: &str, version: &str, url: &str, sha256: &str) -> String {
    format!(
        r#"
name = "{name}"
desc = "test fixture"
homepage = "https://github.com/CaddyGlow/{name}"
version = "{version}"
license = "MIT"

[[artifact]]
os = "linux"
arch = "x86_64"
url = "{url}"
sha256 = "{sha256}"
"#
    )
}
