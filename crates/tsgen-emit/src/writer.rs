//! Indentation-aware output buffer backing the artifact emitters.

const INDENT: &str = "    ";

/// Accumulates emitted TypeScript text line by line.
#[derive(Debug, Default)]
pub struct ArtifactWriter {
    out: String,
    indent_level: u32,
}

impl ArtifactWriter {
    pub fn new() -> ArtifactWriter {
        ArtifactWriter {
            out: String::with_capacity(1024),
            indent_level: 0,
        }
    }

    /// Write text to output.
    pub fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Write a newline.
    pub fn write_line(&mut self) {
        self.out.push('\n');
    }

    /// Write the current indentation.
    pub fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.out.push_str(INDENT);
        }
    }

    pub fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Clear the buffer for the next artifact.
    pub fn reset(&mut self) {
        self.out.clear();
        self.indent_level = 0;
    }

    /// Take the accumulated output, leaving the writer empty.
    pub fn take_output(&mut self) -> String {
        self.indent_level = 0;
        std::mem::take(&mut self.out)
    }
}
