use std::collections::BTreeMap;
use std::path::Path;

use crate::foundation::error::{AnnotateError, AnnotateResult};
use crate::pipeline::config::OutputSetting;
use crate::pipeline::frame::FrameOutputState;

/// Caller-supplied token values; they win over frame-state values.
pub type FormatOverrides = BTreeMap<String, String>;

const FRAME_NUMBER_TOKENS: [&str; 4] = [
    "{frame_number}",
    "{frame_number_shot}",
    "{frame_number_rel}",
    "{frame_number_shot_rel}",
];

/// Which tokens a template must contain to produce unique file names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValidationFlags {
    /// More than one standalone pass is written per frame.
    pub include_render_pass: bool,
    /// The frame carries data from several cameras.
    pub include_camera_name: bool,
    /// Every frame gets its own file.
    pub test_frame_number: bool,
}

/// Fail with a configuration error if `template` lacks a required token.
pub fn validate_format_string(template: &str, flags: ValidationFlags) -> AnnotateResult<()> {
    if flags.include_render_pass && !template.contains("{render_pass}") {
        return Err(AnnotateError::config(format!(
            "file name format '{template}' must contain {{render_pass}} when several passes are written"
        )));
    }
    if flags.include_camera_name && !template.contains("{camera_name}") {
        return Err(AnnotateError::config(format!(
            "file name format '{template}' must contain {{camera_name}} when several cameras are rendered"
        )));
    }
    if flags.test_frame_number && !FRAME_NUMBER_TOKENS.iter().any(|t| template.contains(t)) {
        return Err(AnnotateError::config(format!(
            "file name format '{template}' must contain a {{frame_number}} token"
        )));
    }
    Ok(())
}

/// Strip every frame-number token from `template`, merging the dots left behind.
pub fn remove_frame_number_tokens(template: &str) -> String {
    let mut out = template.to_owned();
    for token in FRAME_NUMBER_TOKENS {
        out = out.replace(token, "");
    }
    while out.contains("..") {
        out = out.replace("..", ".");
    }
    out
}

/// Replace `{name}` tokens found in `args`; unknown tokens are kept verbatim.
pub fn expand_tokens(template: &str, args: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match args.get(key) {
                    Some(v) => out.push_str(v),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Forward slashes, duplicate separators collapsed, absolute against the working directory.
pub fn normalize_path(path: &str) -> AnnotateResult<String> {
    let mut p = path.replace('\\', "/");
    if Path::new(&p).is_relative() && !is_windows_absolute(&p) {
        let cwd = std::env::current_dir()
            .map_err(|e| AnnotateError::config(format!("cannot read working directory: {e}")))?;
        let cwd = cwd.to_string_lossy().replace('\\', "/");
        p = format!("{cwd}/{p}");
    }
    Ok(collapse_slashes(&p))
}

fn is_windows_absolute(p: &str) -> bool {
    let b = p.as_bytes();
    b.len() >= 3 && b[0].is_ascii_alphabetic() && b[1] == b':' && b[2] == b'/'
}

fn collapse_slashes(p: &str) -> String {
    let mut out = String::with_capacity(p.len());
    let mut prev_slash = false;
    for c in p.chars() {
        if c == '/' {
            if !prev_slash {
                out.push(c);
            }
            prev_slash = true;
        } else {
            out.push(c);
            prev_slash = false;
        }
    }
    out
}

/// Expands the host's output template into file paths.
#[derive(Clone, Debug)]
pub struct FilenameResolver {
    output_directory: String,
    file_name_format: String,
    zero_pad: usize,
    frame_number_offset: i32,
    static_args: BTreeMap<String, String>,
}

impl FilenameResolver {
    /// Build from the host's output setting and the names of the rendered sequence and level.
    pub fn new(output: &OutputSetting, sequence_name: &str, level_name: &str) -> Self {
        let res = output.output_resolution;
        let mut static_args = BTreeMap::new();
        static_args.insert("sequence_name".to_owned(), sequence_name.to_owned());
        static_args.insert("level_name".to_owned(), level_name.to_owned());
        static_args.insert("output_width".to_owned(), res.width.to_string());
        static_args.insert("output_height".to_owned(), res.height.to_string());
        static_args.insert(
            "output_resolution".to_owned(),
            format!("{}_{}", res.width, res.height),
        );
        static_args.insert("frame_rate".to_owned(), format_frame_rate(output.frame_rate));
        static_args.insert("version".to_owned(), format!("v{:03}", output.version_number));
        Self {
            output_directory: output.output_directory.clone(),
            file_name_format: output.file_name_format.clone(),
            zero_pad: output.zero_pad_frame_numbers,
            frame_number_offset: output.frame_number_offset,
            static_args,
        }
    }

    /// Output root, absolute and normalised.
    pub fn output_root(&self) -> AnnotateResult<String> {
        normalize_path(&self.output_directory)
    }

    /// `output_directory/file_name_format`; the template every check and expansion uses.
    pub fn joined_template(&self) -> String {
        format!("{}/{}", self.output_directory, self.file_name_format)
    }

    /// Validate the joined template.
    pub fn validate(&self, flags: ValidationFlags) -> AnnotateResult<()> {
        validate_format_string(&self.joined_template(), flags)
    }

    /// Token values for one frame, overrides applied last.
    pub fn format_args(
        &self,
        overrides: &FormatOverrides,
        state: &FrameOutputState,
        frame_offset: i32,
    ) -> BTreeMap<String, String> {
        let mut args = self.static_args.clone();
        let offset = self.frame_number_offset.saturating_add(frame_offset);
        let frames = [
            ("frame_number", state.source_frame_number),
            ("frame_number_shot", state.shot_source_frame_number),
            ("frame_number_rel", state.frame_index),
            ("frame_number_shot_rel", state.shot_output_frame_number),
        ];
        for (key, n) in frames {
            args.insert(key.to_owned(), n.offset(offset).padded(self.zero_pad));
        }
        args.insert("camera_name".to_owned(), state.camera_name.clone());
        args.insert("shot_name".to_owned(), state.shot_name.clone());
        for (k, v) in overrides {
            args.insert(k.clone(), v.clone());
        }
        args
    }

    /// Absolute image path for one pass of one frame.
    pub fn resolve_image_path(
        &self,
        overrides: &FormatOverrides,
        state: &FrameOutputState,
    ) -> AnnotateResult<String> {
        let expanded = expand_tokens(&self.joined_template(), &self.format_args(overrides, state, 0));
        normalize_path(&expanded)
    }

    /// Image-sequence file name: frame numbers are relative to the shot's first frame.
    pub fn image_sequence_file_name(
        &self,
        overrides: &FormatOverrides,
        state: &FrameOutputState,
    ) -> String {
        let offset = -state.shot_output_frame_number.0;
        collapse_slashes(&expand_tokens(
            &self.joined_template(),
            &self.format_args(overrides, state, offset),
        ))
    }

    /// Frame-independent clip identifier shared by all frames of a shot.
    pub fn clip_name(&self, overrides: &FormatOverrides, state: &FrameOutputState) -> String {
        let template = remove_frame_number_tokens(&self.joined_template());
        let mut name = collapse_slashes(&expand_tokens(
            &template,
            &self.format_args(overrides, state, 0),
        ));
        if let Some(ext) = overrides.get("ext")
            && let Some(stripped) = name.strip_suffix(ext.as_str())
        {
            name.truncate(stripped.len());
        }
        if name.ends_with('.') {
            name.pop();
        }
        name
    }
}

fn format_frame_rate(fps: f64) -> String {
    if fps.fract() == 0.0 {
        format!("{}", fps as i64)
    } else {
        format!("{fps:.2}")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/naming/filename.rs"]
mod tests;
