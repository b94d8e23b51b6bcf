use std::fmt;

/// Insertion points a partial template may contain.
///
/// Every marker except [`Marker::PublicSection`] is a `__lowerCamelCase__`
/// token. `PublicSection` is the line that reads exactly `public:`; the
/// generated member declarations are appended right after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Marker {
    StartNamespace,
    ClassDeclaration,
    PublicSection,
    EndNamespace,
    VariableDeclarations,
    VariableConfiguration,
}

impl Marker {
    pub const ALL: [Marker; 6] = [
        Marker::StartNamespace,
        Marker::ClassDeclaration,
        Marker::PublicSection,
        Marker::EndNamespace,
        Marker::VariableDeclarations,
        Marker::VariableConfiguration,
    ];

    /// Text that identifies the marker in a template.
    pub fn token(self) -> &'static str {
        match self {
            Marker::StartNamespace => "__startNamespace__",
            Marker::ClassDeclaration => "__classDeclaration__",
            Marker::PublicSection => "public:",
            Marker::EndNamespace => "__endNamespace__",
            Marker::VariableDeclarations => "__variableDeclarationList__",
            Marker::VariableConfiguration => "__variableConfiguration__",
        }
    }

    /// Map a `__token__` back to its marker.
    pub fn from_token(token: &str) -> Option<Marker> {
        Marker::ALL
            .into_iter()
            .find(|m| !m.is_line_marker() && m.token() == token)
    }

    /// Line markers are matched by whole (trimmed) line, not by token scan.
    pub fn is_line_marker(self) -> bool {
        matches!(self, Marker::PublicSection)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.token())
    }
}

/// Which file a template produces; decides the marker set it must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// `<name>._hpp` → `<name>.hpp`
    Header,
    /// `<name>._cpp` → `<name>.cpp`
    Source,
    /// `variable._hpp` → `variable.hpp`
    VariableHeader,
}

impl TemplateKind {
    /// Markers that must appear exactly once.
    pub fn required(self) -> &'static [Marker] {
        match self {
            TemplateKind::Header => &[
                Marker::StartNamespace,
                Marker::ClassDeclaration,
                Marker::PublicSection,
                Marker::EndNamespace,
            ],
            TemplateKind::Source => &[Marker::EndNamespace],
            TemplateKind::VariableHeader => &[Marker::VariableDeclarations],
        }
    }

    /// Markers that may appear at most once.
    pub fn optional(self) -> &'static [Marker] {
        match self {
            TemplateKind::Header => &[],
            TemplateKind::Source => &[Marker::StartNamespace],
            TemplateKind::VariableHeader => &[Marker::VariableConfiguration],
        }
    }

    pub fn allows(self, marker: Marker) -> bool {
        self.required().contains(&marker) || self.optional().contains(&marker)
    }

    pub fn is_required(self, marker: Marker) -> bool {
        self.required().contains(&marker)
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TemplateKind::Header => "header",
            TemplateKind::Source => "source",
            TemplateKind::VariableHeader => "variable header",
        };
        f.write_str(label)
    }
}
