//! Host framing around component text
//!
//! The host exports a component wrapped in boilerplate: a `VERSION` line,
//! `BEGIN`/`END` designer blocks and `Attribute` lines. The editor copy keeps
//! the code and the `Attribute VB_Name` line only. [`strip`] removes the
//! framing, [`restore`] puts back what the host needs to import the text.
//!
//! Framing is only recognized before the first code line. After that a bare
//! `End` is a statement, and `Begin...` may be an identifier. `Attribute`
//! lines are never code, so they are removed wherever they appear.

use std::sync::LazyLock;

use regex::Regex;
use vbsync_fs::ComponentKind;

static NAME_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^\s*Attribute\s+VB_Name\s*=\s*"([^"]*)"\s*$"#).unwrap()
});

static ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*Attribute\s+[A-Za-z_][\w.]*\s*=").unwrap());

static VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*VERSION\s+\d+(\.\d+)?(\s+CLASS)?\s*$").unwrap());

static BLOCK_BEGIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(BEGIN\s*$|Begin\s+\{|Begin\s+[A-Za-z_]\w*\.\w+|BeginProperty\b)")
        .unwrap()
});

static BLOCK_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(END|EndProperty)\s*$").unwrap());

/// Routine inserted into otherwise empty components.
const PLACEHOLDER: [&str; 2] = ["Private Sub Placeholder()", "End Sub"];

const CLASS_BLOCK: [&str; 4] = ["VERSION 1.0 CLASS", "BEGIN", "  MultiUse = -1  'True", "END"];

const CLASS_ATTRIBUTES: [&str; 4] = [
    "Attribute VB_GlobalNameSpace = False",
    "Attribute VB_Creatable = False",
    "Attribute VB_PredeclaredId = False",
    "Attribute VB_Exposed = False",
];

/// What a single line looks like, without context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineClass {
    Blank,
    Name,
    Attribute,
    Version,
    BlockBegin,
    BlockEnd,
    Code,
}

/// Lines without terminators. A lone trailing `\r` is dropped too.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(|line| line.trim_end_matches('\r'))
}

fn classify(line: &str) -> LineClass {
    if line.trim().is_empty() {
        LineClass::Blank
    } else if NAME_ATTRIBUTE.is_match(line) {
        LineClass::Name
    } else if ATTRIBUTE.is_match(line) {
        LineClass::Attribute
    } else if VERSION.is_match(line) {
        LineClass::Version
    } else if BLOCK_BEGIN.is_match(line) {
        LineClass::BlockBegin
    } else if BLOCK_END.is_match(line) {
        LineClass::BlockEnd
    } else {
        LineClass::Code
    }
}

/// What a line means in context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// Leading blank line
    Blank,
    /// `VERSION` line or any line of a designer block
    Block,
    /// `Attribute` line other than the name
    Attribute,
    /// `Attribute VB_Name` line
    Name,
    /// Everything from the first code line on
    Body,
}

struct Scan<'a> {
    lines: Vec<(&'a str, LineClass, Role)>,
    /// Index of the first code line, or `lines.len()`
    body_start: usize,
    /// False when a designer block is still open at the end of the header
    balanced: bool,
}

impl<'a> Scan<'a> {
    fn new(text: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut started = false;
        let mut depth = 0usize;
        let mut body_start = None;

        for (idx, line) in split_lines(text).enumerate() {
            let class = classify(line);
            let role = if started {
                match class {
                    LineClass::Attribute => Role::Attribute,
                    LineClass::Name => Role::Name,
                    _ => Role::Body,
                }
            } else if depth > 0 {
                match class {
                    LineClass::BlockBegin => depth += 1,
                    LineClass::BlockEnd => depth -= 1,
                    _ => {}
                }
                if class == LineClass::Name {
                    Role::Name
                } else {
                    Role::Block
                }
            } else {
                match class {
                    LineClass::Blank => Role::Blank,
                    LineClass::Version | LineClass::BlockEnd => Role::Block,
                    LineClass::BlockBegin => {
                        depth = 1;
                        Role::Block
                    }
                    LineClass::Attribute => Role::Attribute,
                    LineClass::Name => Role::Name,
                    LineClass::Code => {
                        started = true;
                        body_start = Some(idx);
                        Role::Body
                    }
                }
            };
            lines.push((line, class, role));
        }

        let body_start = body_start.unwrap_or(lines.len());
        Self {
            lines,
            body_start,
            balanced: started || depth == 0,
        }
    }

    fn header(&self) -> &[(&'a str, LineClass, Role)] {
        if self.balanced {
            &self.lines[..self.body_start]
        } else {
            &[]
        }
    }

    fn header_lines(&self, role: Role) -> Vec<&'a str> {
        self.header()
            .iter()
            .filter(|(_, _, r)| *r == role)
            .map(|(line, _, _)| *line)
            .collect()
    }

    fn has_version(&self) -> bool {
        self.header()
            .iter()
            .any(|(_, class, _)| *class == LineClass::Version)
    }

    /// Code lines with trailing blank lines removed.
    fn code(&self) -> Vec<&'a str> {
        let mut code: Vec<&str> = self
            .lines
            .iter()
            .filter(|(_, _, role)| *role == Role::Body)
            .map(|(line, _, _)| *line)
            .collect();
        while code.last().is_some_and(|line| line.trim().is_empty()) {
            code.pop();
        }
        code
    }
}

fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line.as_ref());
        out.push('\n');
    }
    out
}

/// The `Attribute VB_Name` line for `name`.
pub fn name_attribute(name: &str) -> String {
    format!("Attribute VB_Name = \"{}\"", name)
}

/// The name declared by the first `Attribute VB_Name` line, if any.
pub fn declared_name(text: &str) -> Option<String> {
    Scan::new(text)
        .lines
        .iter()
        .find(|(_, _, role)| *role == Role::Name)
        .and_then(|(line, _, _)| NAME_ATTRIBUTE.captures(line))
        .map(|caps| caps[1].to_string())
}

/// True when the text carries a `VERSION ... CLASS` header.
pub fn declares_class(text: &str) -> bool {
    Scan::new(text).header().iter().any(|(line, class, _)| {
        *class == LineClass::Version && line.to_ascii_uppercase().contains("CLASS")
    })
}

/// Remove host framing from exported text.
///
/// Keeps comments, code, blank lines after the first code line and the
/// `Attribute VB_Name` line. Line terminators are normalized to `\n`.
pub fn strip(raw: &str) -> String {
    let kept: Vec<&str> = Scan::new(raw)
        .lines
        .into_iter()
        .filter(|(_, _, role)| matches!(role, Role::Name | Role::Body))
        .map(|(line, _, _)| line)
        .collect();
    join_lines(&kept)
}

/// Strip according to the component kind.
///
/// A form's designer block describes its controls, so form text is only
/// normalized to `\n` line endings.
pub fn strip_for(kind: ComponentKind, raw: &str) -> String {
    match kind {
        ComponentKind::Form => join_lines(&split_lines(raw).collect::<Vec<_>>()),
        _ => strip(raw),
    }
}

/// Prepare editor text for import into the host.
///
/// Writes `Attribute VB_Name = "<name>"` after any designer header, keeps
/// the header's other attributes, and ends the text with exactly one
/// newline. A component without code gets a placeholder routine so the host
/// never receives an empty module.
pub fn restore(body: &str, name: &str) -> String {
    assemble(&Scan::new(body), name, false)
}

/// Restore according to the component kind.
///
/// A class without a `VERSION` header would be imported as a standard
/// module, so the standard class header is synthesized for it.
pub fn restore_for(kind: ComponentKind, body: &str, name: &str) -> String {
    let scan = Scan::new(body);
    let synthesize_class = kind == ComponentKind::Class && !scan.has_version();
    assemble(&scan, name, synthesize_class)
}

fn assemble(scan: &Scan<'_>, name: &str, synthesize_class: bool) -> String {
    let mut out: Vec<String> = Vec::new();
    let attributes = scan.header_lines(Role::Attribute);

    if synthesize_class {
        out.extend(CLASS_BLOCK.iter().map(|s| s.to_string()));
    } else {
        out.extend(scan.header_lines(Role::Block).iter().map(|s| s.to_string()));
    }

    out.push(name_attribute(name));

    if synthesize_class && attributes.is_empty() {
        out.extend(CLASS_ATTRIBUTES.iter().map(|s| s.to_string()));
    } else {
        out.extend(attributes.iter().map(|s| s.to_string()));
    }

    let code = scan.code();
    if code.is_empty() {
        tracing::debug!(component = name, "no code in component, adding placeholder routine");
        out.extend(PLACEHOLDER.iter().map(|s| s.to_string()));
    } else {
        out.extend(code.iter().map(|s| s.to_string()));
    }

    join_lines(&out)
}

/// Code lines only: framing and every `Attribute VB_Name` line removed.
///
/// This is what the host keeps in a component's code pane, and what gets
/// written in place into document modules.
pub fn code_body(text: &str) -> String {
    join_lines(&Scan::new(text).code())
}

/// Split exported text into its header (everything before the first code
/// line) and the code that follows.
pub fn split_framing(raw: &str) -> (String, String) {
    let scan = Scan::new(raw);
    let (head, tail) = scan.lines.split_at(scan.body_start);
    let head: Vec<&str> = head.iter().map(|(line, _, _)| *line).collect();
    let tail: Vec<&str> = tail.iter().map(|(line, _, _)| *line).collect();
    (join_lines(&head), join_lines(&tail))
}

/// Canonical text form: `\n` line endings, no leading or trailing blank
/// lines, exactly one trailing newline (or empty).
///
/// For code `b` free of framing, `strip(restore(b, n))` equals
/// `name_attribute(n) + "\n" + canonicalize(b)`.
pub fn canonicalize(text: &str) -> String {
    let lines: Vec<&str> = split_lines(text).collect();
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(start, |idx| idx + 1);
    join_lines(&lines[start..end])
}
