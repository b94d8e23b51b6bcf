use serde_json::Value;

use crate::error::EmissionError;
use crate::settings::GeneratorSettings;

/// Closed set of C++ types a `.config` entry may declare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CppType {
    Bool,
    Int,
    SizeT,
    Double,
    Float,
    String,
    Vector(Box<CppType>),
    /// The configured JSON type
    Json,
    /// `std::function<...>`, stored as the engine's function index
    Function,
    /// Pointer to another module, built through the module factory
    ModulePointer(String),
}

impl CppType {
    /// Map a declared type string to its tag.
    ///
    /// Returns `None` for anything outside the closed set, including vectors
    /// of module pointers.
    pub fn parse(declared: &str, settings: &GeneratorSettings) -> Option<CppType> {
        let t = declared.trim();
        let scalar = match t {
            "bool" => Some(CppType::Bool),
            "int" => Some(CppType::Int),
            "size_t" | "std::size_t" => Some(CppType::SizeT),
            "double" => Some(CppType::Double),
            "float" => Some(CppType::Float),
            "std::string" => Some(CppType::String),
            _ => None,
        };
        if scalar.is_some() {
            return scalar;
        }
        if settings.is_json_type(t) {
            return Some(CppType::Json);
        }
        if let Some(inner) = t
            .strip_prefix("std::vector<")
            .and_then(|rest| rest.strip_suffix('>'))
        {
            return match CppType::parse(inner, settings)? {
                CppType::ModulePointer(_) => None,
                inner => Some(CppType::Vector(Box::new(inner))),
            };
        }
        if t.starts_with("std::function<") && t.ends_with('>') {
            return Some(CppType::Function);
        }
        if let Some(class) = t.strip_suffix('*').map(str::trim) {
            if is_qualified_identifier(class) {
                return Some(CppType::ModulePointer(class.to_string()));
            }
        }
        None
    }

    /// Resolve the tag for `item`, or fail with [`EmissionError::UnknownType`].
    pub fn resolve(
        item: &str,
        declared: &str,
        settings: &GeneratorSettings,
    ) -> Result<CppType, EmissionError> {
        CppType::parse(declared, settings).ok_or_else(|| EmissionError::UnknownType {
            item: item.to_string(),
            declared: declared.to_string(),
        })
    }

    /// C++ type of the generated member.
    pub fn storage(&self, settings: &GeneratorSettings) -> String {
        match self {
            CppType::Bool => "bool".to_string(),
            CppType::Int => "int".to_string(),
            CppType::SizeT => "size_t".to_string(),
            CppType::Double => "double".to_string(),
            CppType::Float => "float".to_string(),
            CppType::String => "std::string".to_string(),
            CppType::Vector(inner) => format!("std::vector<{}>", inner.storage(settings)),
            CppType::Json => settings.json_type.clone(),
            CppType::Function => "std::uint64_t".to_string(),
            CppType::ModulePointer(class) => format!("{class}*"),
        }
    }

    pub fn is_module_pointer(&self) -> bool {
        matches!(self, CppType::ModulePointer(_))
    }

    /// C++ expression of this type holding `value`.
    ///
    /// Returns `None` when the JSON value does not fit the type.
    pub fn default_expr(&self, value: &Value, settings: &GeneratorSettings) -> Option<String> {
        match (self, value) {
            (CppType::Bool, Value::Bool(b)) => Some(b.to_string()),
            (CppType::Int, Value::Number(n)) => n
                .as_i64()
                .filter(|v| i32::try_from(*v).is_ok())
                .map(|v| v.to_string()),
            (CppType::SizeT | CppType::Function, Value::Number(n)) => {
                n.as_u64().map(|v| v.to_string())
            }
            (CppType::Function, Value::Null) => Some("0".to_string()),
            (CppType::Double, Value::Number(n)) | (CppType::Float, Value::Number(n)) => {
                Some(n.to_string())
            }
            (CppType::Double, Value::String(s)) => special_float(s, "double"),
            (CppType::Float, Value::String(s)) => special_float(s, "float"),
            (CppType::String, Value::String(s)) => Some(cpp_string_literal(s)),
            (CppType::Vector(inner), Value::Array(items)) => {
                let elems = items
                    .iter()
                    .map(|v| inner.default_expr(v, settings))
                    .collect::<Option<Vec<_>>>()?;
                Some(format!("{}{{{}}}", self.storage(settings), elems.join(", ")))
            }
            (CppType::Json, Value::Null) => Some(format!("{}()", settings.json_type)),
            (CppType::Json, v) => Some(json_parse_expr(v, settings)),
            (CppType::ModulePointer(_), Value::Null) => Some("NULL".to_string()),
            (CppType::ModulePointer(_), v @ Value::Object(_)) => {
                Some(self.read_expr(&json_parse_expr(v, settings), settings))
            }
            _ => None,
        }
    }

    /// Expression converting the JSON node `access` into a member value.
    pub fn read_expr(&self, access: &str, settings: &GeneratorSettings) -> String {
        match self {
            CppType::Json => access.to_string(),
            CppType::ModulePointer(class) => format!(
                "dynamic_cast<{class}*>({}({access}, {}))",
                settings.module_factory, settings.engine_handle
            ),
            other => format!("{access}.get<{}>()", other.storage(settings)),
        }
    }

    /// Statement writing `member` back into the JSON node `access`.
    pub fn write_stmt(&self, member: &str, access: &str) -> String {
        match self {
            CppType::ModulePointer(_) => {
                format!("if({member} != NULL) {member}->getConfiguration({access});")
            }
            _ => format!("{access} = {member};"),
        }
    }

    /// `std::string` expression rendering `member` for a human message.
    ///
    /// Module pointers have no printable value.
    pub fn display_expr(&self, member: &str, settings: &GeneratorSettings) -> Option<String> {
        match self {
            CppType::Bool => Some(format!("std::string({member} ? \"true\" : \"false\")")),
            CppType::Int
            | CppType::SizeT
            | CppType::Double
            | CppType::Float
            | CppType::Function => Some(format!("std::to_string({member})")),
            CppType::String => Some(member.to_string()),
            CppType::Json => Some(format!("{member}.dump()")),
            CppType::Vector(_) => Some(format!("{}({member}).dump()", settings.json_type)),
            CppType::ModulePointer(_) => None,
        }
    }
}

fn special_float(s: &str, ty: &str) -> Option<String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "inf" | "+inf" | "infinity" | "+infinity" => {
            Some(format!("std::numeric_limits<{ty}>::infinity()"))
        }
        "-inf" | "-infinity" => Some(format!("-std::numeric_limits<{ty}>::infinity()")),
        "nan" => Some(format!("std::numeric_limits<{ty}>::quiet_NaN()")),
        _ => None,
    }
}

fn is_qualified_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.split("::").all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

/// C++ expression building a JSON value: literals for scalars, `parse` for
/// arrays and objects.
pub fn json_value_expr(value: &Value, settings: &GeneratorSettings) -> String {
    match value {
        Value::Null => "nullptr".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => cpp_string_literal(s),
        Value::Array(_) | Value::Object(_) => json_parse_expr(value, settings),
    }
}

fn json_parse_expr(value: &Value, settings: &GeneratorSettings) -> String {
    format!(
        "{}::parse({})",
        settings.json_type,
        cpp_string_literal(&value.to_string())
    )
}

/// Quote `s` as a C++ string literal.
///
/// Control characters are written as three-digit octal escapes so that a
/// following digit can never extend the escape.
pub fn cpp_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\{:03o}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// `js["A"]["B"]` access chain for a key path.
pub fn json_access(root: &str, segments: &[String]) -> String {
    let mut out = root.to_string();
    for segment in segments {
        out.push('[');
        out.push_str(&cpp_string_literal(segment));
        out.push(']');
    }
    out
}

/// `"A", "B"` argument list for the variadic `isDefined` helper.
pub fn key_args(segments: &[String]) -> String {
    segments
        .iter()
        .map(|s| cpp_string_literal(s))
        .collect::<Vec<_>>()
        .join(", ")
}
