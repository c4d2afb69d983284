//! Text templates shipped inside the archive.
//!
//! - `nametag.scad`: OpenSCAD model with a `name = "...";` slot, rendered
//!   from the tag dimensions and the glyph width table
//! - `generate_names.py`: batch script that renders every name locally
//! - `README.txt`: archive contents and print settings

use crate::error::{PackagerError, PackagerResult};
use chrono::{DateTime, Utc};
use nametagkit_core::NameString;
use nametagkit_designer::clip::clip_outline;
use nametagkit_designer::glyphs::{
    CAP_HEIGHT, NARROW_CHARS, NARROW_WIDTH, REGULAR_WIDTH, WIDE_CHARS, WIDE_WIDTH,
};
use nametagkit_designer::TagDimensions;
use regex::{NoExpand, Regex};
use std::sync::OnceLock;

const SCAD_TEMPLATE: &str = include_str!("templates/nametag.scad");
const BATCH_SCRIPT_TEMPLATE: &str = include_str!("templates/generate_names.py");
const README_TEMPLATE: &str = include_str!("templates/README.txt");

/// File name of the model template inside the archive
pub const SCAD_FILE_NAME: &str = "nametag.scad";
/// File name of the batch script inside the archive
pub const BATCH_SCRIPT_FILE_NAME: &str = "generate_names.py";
pub const README_FILE_NAME: &str = "README.txt";

fn name_slot() -> &'static Regex {
    static NAME_SLOT: OnceLock<Regex> = OnceLock::new();
    NAME_SLOT.get_or_init(|| Regex::new(r#"name = "[^"]*";"#).expect("invalid name slot regex"))
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| Regex::new(r"\{\{[A-Z_]+\}\}").expect("invalid placeholder regex"))
}

/// Substitute `{{KEY}}` placeholders; every placeholder must be covered.
fn fill(template: &str, values: &[(&str, String)]) -> PackagerResult<String> {
    let mut out = template.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{{{}}}}}", key), value);
    }
    if let Some(left) = placeholder().find(&out) {
        return Err(PackagerError::Template(format!(
            "unfilled placeholder {}",
            left.as_str()
        )));
    }
    Ok(out)
}

fn scad_number(value: f64) -> String {
    let text = format!("{:.4}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn clip_polygon() -> (String, String) {
    let clip = clip_outline();
    let mut points = String::from("[");
    let mut paths = String::from("[");
    let mut index = 0;
    for (ring_no, ring) in clip.rings().enumerate() {
        if ring_no > 0 {
            paths.push_str(", ");
        }
        paths.push('[');
        for (i, p) in ring.iter().enumerate() {
            if index > 0 {
                points.push_str(", ");
            }
            if i > 0 {
                paths.push_str(", ");
            }
            points.push_str(&format!("[{}, {}]", scad_number(p.x), scad_number(p.y)));
            paths.push_str(&index.to_string());
            index += 1;
        }
        paths.push(']');
    }
    points.push(']');
    paths.push(']');
    (points, paths)
}

/// The OpenSCAD model for one set of tag dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScadTemplate {
    source: String,
}

impl ScadTemplate {
    pub fn new(dims: &TagDimensions) -> PackagerResult<Self> {
        let chars = |set: &[char]| set.iter().collect::<String>();
        let (clip_points, clip_paths) = clip_polygon();
        let source = fill(
            SCAD_TEMPLATE,
            &[
                ("FONT_SIZE", scad_number(dims.font_size)),
                ("CAP_HEIGHT", scad_number(CAP_HEIGHT)),
                ("SPACING", scad_number(dims.spacing_factor)),
                ("NARROW_CHARS", chars(NARROW_CHARS)),
                ("WIDE_CHARS", chars(WIDE_CHARS)),
                ("NARROW_WIDTH", scad_number(NARROW_WIDTH)),
                ("REGULAR_WIDTH", scad_number(REGULAR_WIDTH)),
                ("WIDE_WIDTH", scad_number(WIDE_WIDTH)),
                ("UNDERLINE_FACTOR", scad_number(dims.underline_width_factor)),
                ("UNDERLINE_THICKNESS", scad_number(dims.underline_thickness)),
                ("UNDERLINE_GAP", scad_number(dims.underline_gap)),
                ("CLIP_THICKNESS", scad_number(dims.clip_thickness)),
                ("TEXT_THICKNESS", scad_number(dims.text_thickness)),
                ("TEXT_OFFSET_X", scad_number(dims.text_offset_x)),
                ("TEXT_OFFSET_Y", scad_number(dims.text_offset_y)),
                ("CLIP_POINTS", clip_points),
                ("CLIP_PATHS", clip_paths),
            ],
        )?;
        if !name_slot().is_match(&source) {
            return Err(PackagerError::Template("name slot missing".into()));
        }
        Ok(Self { source })
    }

    /// Template text with the placeholder name.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Model for `name`: the first name slot replaced.
    pub fn render(&self, name: &NameString) -> String {
        self.render_text(name.as_str())
    }

    pub(crate) fn render_text(&self, text: &str) -> String {
        let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
        let slot = format!(r#"name = "{}";"#, escaped);
        name_slot()
            .replacen(&self.source, 1, NoExpand(&slot))
            .into_owned()
    }
}

/// Batch script listing `names`.
pub fn render_batch_script(names: &[NameString]) -> PackagerResult<String> {
    let list = names
        .iter()
        .map(|n| format!("    \"{}\"", n))
        .collect::<Vec<_>>()
        .join(",\n");
    fill(BATCH_SCRIPT_TEMPLATE, &[("NAMES_LIST", list)])
}

/// What the README describes.
#[derive(Debug, Clone)]
pub struct ReadmeInfo<'a> {
    pub tag_count: usize,
    /// Every file in the archive other than the README
    pub files: &'a [String],
    pub includes_sources: bool,
    /// Exporter that produced the STL files
    pub generator: &'a str,
    pub generated_at: DateTime<Utc>,
}

pub fn render_instructions(info: &ReadmeInfo<'_>) -> PackagerResult<String> {
    let file_list = if info.files.is_empty() {
        "- (none)".to_string()
    } else {
        info.files
            .iter()
            .map(|f| format!("- {}", f))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let sources_note = if info.includes_sources {
        format!(
            "\nTo re-render locally, install OpenSCAD and run: python3 {}\n",
            BATCH_SCRIPT_FILE_NAME
        )
    } else {
        String::new()
    };
    fill(
        README_TEMPLATE,
        &[
            ("TAG_COUNT", info.tag_count.to_string()),
            ("FILE_LIST", file_list),
            ("SOURCES_NOTE", sources_note),
            ("GENERATOR", info.generator.to_string()),
            (
                "GENERATED_AT",
                info.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            ),
        ],
    )
}
