use tracing::debug;

use super::accessors::{get_configuration, set_configuration};
use super::context::ModuleContext;
use super::declarations::{class_declaration, public_section};
use super::defaults::{apply_module_defaults, apply_variable_defaults};
use super::operations::run_operation;
use super::properties::property_pointer;
use super::termination::check_termination;
use super::types::CppType;
use crate::error::{EmissionError, ModuleError};
use crate::template::{expand, Marker, ValidatedTemplate};

/// Expanded header and source text for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    pub header_text: String,
    pub source_text: String,
}

/// `namespace a\n{\nnamespace b\n{`
pub fn namespace_open(namespace: &[String]) -> String {
    namespace
        .iter()
        .map(|ns| format!("namespace {ns}\n{{"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `} //b\n} //a`
pub fn namespace_close(namespace: &[String]) -> String {
    namespace
        .iter()
        .rev()
        .map(|ns| format!("}} //{ns}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Method definitions placed in the source, in a fixed order.
pub fn method_definitions(ctx: &ModuleContext<'_>) -> Result<Vec<String>, EmissionError> {
    let mut out = vec![
        set_configuration(ctx)?,
        get_configuration(ctx)?,
        apply_module_defaults(ctx)?,
        apply_variable_defaults(ctx)?,
    ];
    out.extend(check_termination(ctx)?);
    out.extend(run_operation(ctx)?);
    out.extend(property_pointer(ctx)?);
    Ok(out)
}

/// Variable items feed the aggregate header; their types are checked here
/// so that a bad entry fails its own module.
fn check_variable_items(ctx: &ModuleContext<'_>) -> Result<(), EmissionError> {
    for item in &ctx.module.variable_items {
        CppType::resolve(&item.name.label(), &item.declared_type, ctx.settings)?;
    }
    Ok(())
}

/// Run every emitter for one module and expand both templates.
///
/// Fragments are computed in a fixed order and each marker is replaced once,
/// so identical inputs always give identical text.
pub fn generate_module(
    ctx: &ModuleContext<'_>,
    header: &ValidatedTemplate,
    source: &ValidatedTemplate,
) -> Result<GeneratedCode, ModuleError> {
    check_variable_items(ctx)?;

    let open = namespace_open(&ctx.module.namespace);
    let close = namespace_close(&ctx.module.namespace);

    let header_fragments = vec![
        (Marker::StartNamespace, open.clone()),
        (Marker::ClassDeclaration, class_declaration(ctx)?),
        (Marker::PublicSection, public_section(ctx)?),
        (Marker::EndNamespace, close.clone()),
    ];

    // Without its opening marker the source carries no namespace blocks to close.
    let definitions = method_definitions(ctx)?.join("\n\n");
    let source_end = if source.contains(Marker::StartNamespace) {
        format!("{definitions}\n\n{close}")
    } else {
        definitions
    };
    let source_fragments = vec![
        (Marker::StartNamespace, open),
        (Marker::EndNamespace, source_end),
    ];

    let header_text = expand(header, &header_fragments)?;
    let source_text = expand(source, &source_fragments)?;
    debug!(
        module = %ctx.module.name,
        header_bytes = header_text.len(),
        source_bytes = source_text.len(),
        "module expanded"
    );
    Ok(GeneratedCode {
        header_text,
        source_text,
    })
}
