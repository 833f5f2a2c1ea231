//! Indented text writer for generated source.

const INDENT: &str = "    ";

/// Accumulates generated lines at the current indentation.
#[derive(Debug, Default)]
pub struct Printer {
    buffer: String,
    indent: usize,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one line at the current indentation. Empty lines carry no indent.
    pub fn print_line(&mut self, line: impl AsRef<str>) -> &mut Self {
        let line = line.as_ref();
        if !line.is_empty() {
            for _ in 0..self.indent {
                self.buffer.push_str(INDENT);
            }
            self.buffer.push_str(line);
        }
        self.buffer.push('\n');
        self
    }

    pub fn print_empty_line(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    /// Write every line of a multi-line block, indenting each.
    pub fn print_block(&mut self, block: &str) -> &mut Self {
        for line in block.lines() {
            self.print_line(line);
        }
        self
    }

    /// `{` then one level deeper.
    pub fn open_scope(&mut self) -> &mut Self {
        self.print_line("{");
        self.indent += 1;
        self
    }

    /// One level shallower then `}`.
    pub fn close_scope(&mut self) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        self.print_line("}")
    }

    /// Like [`Printer::close_scope`] with a suffix such as `;`.
    pub fn close_scope_with(&mut self, suffix: &str) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        self.print_line(format!("}}{suffix}"))
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}
