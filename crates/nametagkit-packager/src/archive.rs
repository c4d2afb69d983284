//! Zip packaging of generated tags.

use crate::error::{PackagerError, PackagerResult};
use crate::templates::{
    render_batch_script, render_instructions, ReadmeInfo, ScadTemplate, BATCH_SCRIPT_FILE_NAME,
    README_FILE_NAME, SCAD_FILE_NAME,
};
use chrono::{DateTime, Utc};
use nametagkit_core::NameString;
use std::collections::HashSet;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// In-memory zip writer.
///
/// Entries keep the order they were added in. Every entry is deflated at
/// level 9 and stamped with the same fixed timestamp, so the bytes depend
/// only on the entries.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    entries: Vec<String>,
    names: HashSet<String>,
}

impl std::fmt::Debug for ArchiveBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveBuilder")
            .field("entries", &self.entries)
            .finish()
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            entries: Vec::new(),
            names: HashSet::new(),
        }
    }

    fn options() -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(9))
            .last_modified_time(zip::DateTime::default())
            .unix_permissions(0o644)
    }

    pub fn add_file(&mut self, name: &str, contents: &[u8]) -> PackagerResult<()> {
        if !self.names.insert(name.to_string()) {
            return Err(PackagerError::DuplicateEntry(name.to_string()));
        }
        self.writer.start_file(name, Self::options())?;
        self.writer.write_all(contents)?;
        self.entries.push(name.to_string());
        Ok(())
    }

    /// Entry names in archive order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn finish(self) -> PackagerResult<Vec<u8>> {
        let cursor = self.writer.finish()?;
        Ok(cursor.into_inner())
    }
}

/// One generated tag ready for packaging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagArtifact {
    pub name: NameString,
    pub stl: Vec<u8>,
}

impl TagArtifact {
    pub fn new(name: NameString, stl: Vec<u8>) -> Self {
        Self { name, stl }
    }
}

/// Hands out file stems that are unique within one batch.
///
/// The first `ALICE` keeps its stem; later ones get `ALICE_2`, `ALICE_3`.
/// A suffixed stem that is already taken (e.g. by the name `ALICE 2`) is
/// skipped.
#[derive(Debug, Clone, Default)]
pub struct UniqueStems {
    used: HashSet<String>,
}

impl UniqueStems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, name: &NameString) -> String {
        let stem = name.file_stem();
        let mut candidate = stem.clone();
        let mut n = 2;
        while !self.used.insert(candidate.clone()) {
            candidate = format!("{}_{}", stem, n);
            n += 1;
        }
        candidate
    }
}

/// `<STEM>_tag.stl`
pub fn stl_file_name(stem: &str) -> String {
    format!("{}_tag.stl", stem)
}

pub fn scad_file_name(stem: &str) -> String {
    format!("{}_tag.scad", stem)
}

/// How [`package_tags`] lays out the archive.
#[derive(Debug, Clone)]
pub struct PackageOptions {
    /// When set, per-name `.scad` files, the template and the batch script are added
    pub sources: Option<ScadTemplate>,
    /// Shown in the README
    pub generator: String,
    pub generated_at: DateTime<Utc>,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            sources: None,
            generator: format!("NameTagKit {}", env!("CARGO_PKG_VERSION")),
            generated_at: Utc::now(),
        }
    }
}

/// Build the downloadable archive.
///
/// Layout: one `<STEM>_tag.stl` per tag in input order, then with sources
/// one `<STEM>_tag.scad` per tag, the template and the batch script, and
/// finally `README.txt`. Repeated names get numbered stems (see
/// [`UniqueStems`]).
pub fn package_tags(artifacts: &[TagArtifact], options: &PackageOptions) -> PackagerResult<Vec<u8>> {
    let mut unique = UniqueStems::new();
    let stems: Vec<String> = artifacts.iter().map(|a| unique.claim(&a.name)).collect();

    let mut archive = ArchiveBuilder::new();
    for (artifact, stem) in artifacts.iter().zip(&stems) {
        archive.add_file(&stl_file_name(stem), &artifact.stl)?;
    }

    if let Some(template) = &options.sources {
        for (artifact, stem) in artifacts.iter().zip(&stems) {
            archive.add_file(
                &scad_file_name(stem),
                template.render(&artifact.name).as_bytes(),
            )?;
        }
        archive.add_file(SCAD_FILE_NAME, template.source().as_bytes())?;
        let names: Vec<NameString> = artifacts.iter().map(|a| a.name.clone()).collect();
        archive.add_file(BATCH_SCRIPT_FILE_NAME, render_batch_script(&names)?.as_bytes())?;
    }

    let files = archive.entries().to_vec();
    let readme = render_instructions(&ReadmeInfo {
        tag_count: artifacts.len(),
        files: &files,
        includes_sources: options.sources.is_some(),
        generator: &options.generator,
        generated_at: options.generated_at,
    })?;
    archive.add_file(README_FILE_NAME, readme.as_bytes())?;

    debug!(
        "Packaged {} tags into {} entries",
        artifacts.len(),
        archive.entries().len()
    );
    archive.finish()
}
