mod directive;

pub use directive::Directive;
use line_column::Location;
use source_files::SourceFile;
use std::collections::HashMap;
use std::path::PathBuf;

/// A physical source of token text: a loaded file or a macro's expansion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputSource {
    File(u32),
    Expansion(u32),
}

impl InputSource {
    pub fn is_macro_expansion(&self) -> bool {
        matches!(self, InputSource::Expansion(_))
    }
}

/// One contiguous span of the logical input-offset space, mapping it back to
/// the physical source that produced it.
///
/// The log is append-only: entries are never edited or removed, so range
/// indices stay valid for the life of the parse. For any logical offset O,
/// the governing range is the one with the greatest `input_offset <= O`;
/// consecutive ranges partition the offset space with no gaps or overlaps.
///
/// For a range whose `source_offset` is 0, the enclosing include directive or
/// macro invocation is found through `parent_range`: the range that was
/// current in the parent when this one was opened.
#[derive(Clone, Debug)]
pub struct InputRange {
    pub input_offset: u32,
    pub source: InputSource,
    pub source_offset: u32,
    pub parent_range: Option<u32>,
}

/// An object-like `#define`. Macros are only ever appended; redefinition
/// appends a new entry and repoints the name map, so input ranges referring
/// to an older definition keep resolving against its original text.
#[derive(Clone, Debug)]
pub struct Macro {
    pub name: String,
    pub expansion: String,
    /// Input offset of the defining directive; `None` for predefined
    /// definitions supplied by the embedder.
    pub defined_at: Option<u32>,
}

/// A compiler-supplied definition applied before parsing begins, like `-D`
/// on a compiler command line.
#[derive(Clone, Debug)]
pub struct PreprocessorDefinition {
    pub name: String,
    pub expansion: String,
}

/// Resolved physical position of a logical input offset, with macro
/// provenance already chased back to the originating file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileLocation {
    pub abs_path: String,
    pub line: u32,
    pub column: u32,
}

// The include stack also holds macro expansions while they are being read.
#[derive(Clone, Debug)]
struct IncludedItem {
    input_range_index: u32,
    source: InputSource,
    pos: usize,
}

/// Preprocessing state for one parse: the loaded files, the append-only
/// input-range log, the macro table, and the stack of active input sources.
#[derive(Default)]
pub struct Preprocessor {
    files: Vec<SourceFile>,
    input_ranges: Vec<InputRange>,
    include_stack: Vec<IncludedItem>,
    macros: Vec<Macro>,
    macro_map: HashMap<String, u32>,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the top-level file. The preprocessor reads from it until an
    /// `#include` or macro invocation pushes a nested source.
    pub fn set_input(&mut self, abs_path: &str, contents: String) {
        let file_index = self.files.len() as u32;
        self.files
            .push(SourceFile::new(PathBuf::from(abs_path), contents));

        let range_index = self.input_ranges.len() as u32;
        self.input_ranges.push(InputRange {
            input_offset: 0,
            source: InputSource::File(file_index),
            source_offset: 0,
            parent_range: None,
        });

        self.include_stack.push(IncludedItem {
            input_range_index: range_index,
            source: InputSource::File(file_index),
            pos: 0,
        });
    }

    pub fn apply_definitions(&mut self, defs: &[PreprocessorDefinition]) {
        for def in defs {
            // Defining the same name twice up front is probably a mistake.
            debug_assert!(!self.macro_map.contains_key(&def.name));
            self.define_macro(def.name.clone(), def.expansion.clone(), None);
        }
    }

    pub fn define_macro(&mut self, name: String, expansion: String, defined_at: Option<u32>) {
        let index = self.macros.len() as u32;
        self.macros.push(Macro {
            name: name.clone(),
            expansion,
            defined_at,
        });
        self.macro_map.insert(name, index);
    }

    pub fn find_macro(&self, name: &str) -> Option<u32> {
        self.macro_map.get(name).copied()
    }

    pub fn stack_depth(&self) -> usize {
        self.include_stack.len()
    }

    /// The active source and the physical position to resume reading at.
    pub fn cursor_state(&self) -> (InputSource, usize) {
        let top = self.include_stack.last().expect("no input was set");
        (top.source, top.pos)
    }

    pub fn set_cursor_pos(&mut self, pos: usize) {
        self.include_stack.last_mut().expect("no input was set").pos = pos;
    }

    pub fn source_text(&self, source: InputSource) -> &str {
        match source {
            InputSource::File(index) => self.files[index as usize].contents(),
            InputSource::Expansion(index) => &self.macros[index as usize].expansion,
        }
    }

    /// Begins reading a macro expansion in place of its invocation token.
    ///
    /// The expansion is transparent in the logical offset space: its range
    /// starts at the invocation's own offset, so the invocation token itself
    /// never occupies logical space.
    pub fn push_macro_expansion(&mut self, macro_index: u32, input_offset: u32) {
        let parent_range = self.current_range_index();

        self.include_stack.push(IncludedItem {
            input_range_index: self.input_ranges.len() as u32,
            source: InputSource::Expansion(macro_index),
            pos: 0,
        });

        self.input_ranges.push(InputRange {
            input_offset,
            source: InputSource::Expansion(macro_index),
            source_offset: 0,
            parent_range: Some(parent_range),
        });
    }

    /// Resolves an include operand against the search paths (first match
    /// wins) and pushes the file. Returns false when no path contains the
    /// file, in which case the directive is dropped with no entry added.
    pub fn push_include(
        &mut self,
        include_paths: &[PathBuf],
        filename: &str,
        input_offset: u32,
    ) -> bool {
        for include_path in include_paths {
            let full_path = include_path.join(filename);
            let Ok(bytes) = std::fs::read(&full_path) else {
                continue;
            };
            let contents = String::from_utf8_lossy(&bytes).into_owned();

            let file_index = self.files.len() as u32;
            self.files.push(SourceFile::new(full_path, contents));

            let parent_range = self.current_range_index();
            self.include_stack.push(IncludedItem {
                input_range_index: self.input_ranges.len() as u32,
                source: InputSource::File(file_index),
                pos: 0,
            });

            self.input_ranges.push(InputRange {
                input_offset,
                source: InputSource::File(file_index),
                source_offset: 0,
                parent_range: Some(parent_range),
            });
            return true;
        }
        false
    }

    /// Pops a finished nested source and opens the range that resumes its
    /// parent at the parent's current physical position. Finishing a nested
    /// include or macro only ends that one physical source, never the
    /// logical offset stream.
    pub fn pop_finished(&mut self, input_offset: u32) {
        assert!(self.include_stack.len() > 1);

        let ending_range = &self.input_ranges[self.current_range_index() as usize];
        let parent_range_index = ending_range
            .parent_range
            .expect("nested input range must have a parent");

        let parent_item = &self.include_stack[self.include_stack.len() - 2];
        debug_assert_eq!(parent_range_index, parent_item.input_range_index);

        let parent_range = &self.input_ranges[parent_range_index as usize];
        let resumed = InputRange {
            input_offset,
            source: parent_range.source,
            source_offset: parent_item.pos as u32,
            parent_range: parent_range.parent_range,
        };

        self.input_ranges.push(resumed);
        self.include_stack.pop();
        self.include_stack
            .last_mut()
            .expect("include stack underflow")
            .input_range_index = (self.input_ranges.len() - 1) as u32;
    }

    fn current_range_index(&self) -> u32 {
        self.include_stack
            .last()
            .expect("no input was set")
            .input_range_index
    }

    fn range_index_for(&self, input_offset: u32) -> usize {
        let index = self
            .input_ranges
            .partition_point(|range| range.input_offset <= input_offset);
        assert!(index > 0, "offset precedes all input ranges");
        index - 1
    }

    /// Maps a logical offset back to the physical file, line and column that
    /// produced it, chasing macro expansions up to their invocation sites so
    /// that diagnostics report the originating file.
    pub fn file_location(&self, input_offset: u32) -> FileLocation {
        let mut index = self.range_index_for(input_offset);
        let mut offset = input_offset;

        while self.input_ranges[index].source.is_macro_expansion() {
            let parent = self.input_ranges[index].parent_range.expect("macro range has a parent")
                as usize;
            // The parent's segment ends exactly where the nested range
            // begins, which is the invocation site.
            offset = self.input_ranges[parent + 1].input_offset;
            index = parent;
        }

        let range = &self.input_ranges[index];
        let InputSource::File(file_index) = range.source else {
            unreachable!("non-macro range refers to a file");
        };
        let file = &self.files[file_index as usize];
        let location = file.location_of(offset - range.input_offset + range.source_offset);

        FileLocation {
            abs_path: file.filename().to_string(),
            line: location.line,
            column: location.column,
        }
    }

    pub fn location_string(&self, input_offset: u32) -> (String, Location) {
        let resolved = self.file_location(input_offset);
        (
            resolved.abs_path,
            Location {
                line: resolved.line,
                column: resolved.column,
            },
        )
    }

    /// Recovers the verbatim text at a logical offset. Unlike
    /// `file_location`, this deliberately does not chase macro parents: text
    /// inside an expansion is read from the macro's own expansion string.
    pub fn text_at(&self, input_offset: u32, len: u32) -> &str {
        let range = &self.input_ranges[self.range_index_for(input_offset)];
        let physical = (input_offset - range.input_offset + range.source_offset) as usize;
        &self.source_text(range.source)[physical..physical + len as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redefinition_shadows_but_keeps_old_entry() {
        let mut pp = Preprocessor::new();
        pp.define_macro("N".into(), "1".into(), Some(0));
        let first = pp.find_macro("N").unwrap();
        pp.define_macro("N".into(), "2".into(), Some(10));
        let second = pp.find_macro("N").unwrap();

        assert_ne!(first, second);
        assert_eq!(pp.source_text(InputSource::Expansion(first)), "1");
        assert_eq!(pp.source_text(InputSource::Expansion(second)), "2");
    }

    #[test]
    fn top_level_locations() {
        let mut pp = Preprocessor::new();
        pp.set_input("/tmp/a.cpp", "int x;\nint y;\n".into());

        let loc = pp.file_location(7);
        assert_eq!(loc.abs_path, "/tmp/a.cpp");
        assert_eq!((loc.line, loc.column), (2, 1));
    }

    #[test]
    fn macro_range_chases_to_invocation_site() {
        let mut pp = Preprocessor::new();
        pp.set_input("/tmp/a.cpp", "AA bb\n".into());
        pp.define_macro("AA".into(), "xyz".into(), None);

        // Simulate the pump: the invocation token `AA` sits at offset 0, the
        // expansion replaces it, and the parent resumes afterwards.
        pp.set_cursor_pos(2);
        pp.push_macro_expansion(0, 0);
        pp.set_cursor_pos(3);
        pp.pop_finished(3);

        // Offsets inside the expansion report the invocation site.
        let loc = pp.file_location(1);
        assert_eq!((loc.line, loc.column), (1, 1));

        // But the raw text is recovered from the expansion itself.
        assert_eq!(pp.text_at(1, 2), "yz");

        // Offsets after the expansion resolve into the resumed parent.
        let loc = pp.file_location(4);
        assert_eq!((loc.line, loc.column), (1, 4));
        assert_eq!(pp.text_at(4, 2), "bb");
    }
}
