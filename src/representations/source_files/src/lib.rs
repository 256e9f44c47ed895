use line_column::{Location, LocationIndex};
use std::path::{Path, PathBuf};

/// A source file loaded for one parse. Immutable once created; the
/// preprocessor only ever appends new files, so indices into its file list
/// stay valid for the life of the parse.
#[derive(Debug)]
pub struct SourceFile {
    abs_path: PathBuf,
    contents: String,
    location_index: LocationIndex,
}

impl SourceFile {
    pub fn new(abs_path: PathBuf, contents: String) -> Self {
        let location_index = LocationIndex::build(&contents);

        Self {
            abs_path,
            contents,
            location_index,
        }
    }

    pub fn filename(&self) -> &str {
        self.abs_path.to_str().unwrap_or("<invalid unicode filename>")
    }

    pub fn filepath(&self) -> &Path {
        &self.abs_path
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn location_of(&self, byte_offset: u32) -> Location {
        self.location_index.resolve(byte_offset, &self.contents)
    }
}
