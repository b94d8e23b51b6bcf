use askama::Template;

use super::context::ModuleContext;
use super::doxygen::doc_block;
use super::properties::property_type;
use super::types::CppType;
use crate::error::EmissionError;

/// One documented line of the class's public section.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub doc: String,
    pub declaration: String,
}

#[derive(Template)]
#[template(path = "public_section.txt", escape = "none")]
struct PublicSectionTemplate {
    members: Vec<Declaration>,
}

const INDENT: &str = "  ";

/// Member variables, in declaration order: configuration settings,
/// termination criteria, internal settings, conditional variables.
pub fn member_declarations(ctx: &ModuleContext<'_>) -> Result<Vec<Declaration>, EmissionError> {
    let module = ctx.module;
    let settings = ctx.settings;
    let mut out = Vec::new();

    let entries = module
        .configurable_items
        .iter()
        .map(|i| (&i.name, &i.declared_type, &i.description))
        .chain(
            module
                .termination_criteria
                .iter()
                .map(|c| (&c.name, &c.declared_type, &c.description)),
        )
        .chain(
            module
                .internal_settings
                .iter()
                .map(|i| (&i.name, &i.declared_type, &i.description)),
        )
        .chain(
            module
                .conditional_variables
                .iter()
                .map(|v| (&v.name, &v.declared_type, &v.description)),
        );

    for (name, declared, description) in entries {
        let ty = CppType::resolve(&name.label(), declared, settings)?;
        let brief = if description.trim().is_empty() {
            name.label()
        } else {
            description.clone()
        };
        out.push(Declaration {
            doc: doc_block(INDENT, &brief, &[])?,
            declaration: format!("{} {};", ty.storage(settings), name.member_identifier()),
        });
    }
    Ok(out)
}

/// Prototypes of the methods the source fragment defines.
pub fn method_prototypes(ctx: &ModuleContext<'_>) -> Result<Vec<Declaration>, EmissionError> {
    let module = ctx.module;
    let json = ctx.json_type();
    let ov = ctx.override_suffix();
    let mut out = Vec::new();

    if !module.termination_criteria.is_empty() {
        out.push(Declaration {
            doc: doc_block(
                INDENT,
                "Determines whether the module can trigger termination of an experiment run.",
                &["@return True, if it should trigger termination; false, otherwise.".to_string()],
            )?,
            declaration: format!("bool checkTermination(){ov};"),
        });
    }

    out.push(Declaration {
        doc: doc_block(
            INDENT,
            "Obtains the entire current state and configuration of the module.",
            &["@param js JSON object onto which to save the serialized state of the module.".to_string()],
        )?,
        declaration: format!("void getConfiguration({json}& js){ov};"),
    });
    out.push(Declaration {
        doc: doc_block(
            INDENT,
            "Sets the entire state and configuration of the module, given a JSON object.",
            &["@param js JSON object from which to deserialize the state of the module.".to_string()],
        )?,
        declaration: format!("void setConfiguration({json}& js){ov};"),
    });
    out.push(Declaration {
        doc: doc_block(
            INDENT,
            "Applies the module's default configuration upon its creation.",
            &["@param js JSON object containing user configuration. The defaults will not override any currently defined settings.".to_string()],
        )?,
        declaration: format!("void applyModuleDefaults({json}& js){ov};"),
    });
    out.push(Declaration {
        doc: doc_block(
            INDENT,
            "Applies the module's default variable configuration to each variable in the Experiment upon creation.",
            &["@param js JSON object of one variable. The defaults will not override any currently defined settings.".to_string()],
        )?,
        declaration: format!("void applyVariableDefaults({json}& js){ov};"),
    });

    if !module.available_operations.is_empty() {
        out.push(Declaration {
            doc: doc_block(
                INDENT,
                "Runs the operation specified on the given sample. It checks recursively whether the function was found by the current module or its parents.",
                &[
                    "@param sample Sample to operate on. Should contain in the 'Operation' field an operation accepted by this module or its parents.".to_string(),
                    "@param operation Should specify an operation type accepted by this module or its parents.".to_string(),
                    "@return True, if operation found and executed; false, otherwise.".to_string(),
                ],
            )?,
            declaration: format!(
                "bool runOperation(std::string operation, {}& sample){ov};",
                ctx.settings.sample_type
            ),
        });
    }

    if let Some(value_type) = property_type(ctx)? {
        out.push(Declaration {
            doc: doc_block(
                INDENT,
                "Retrieves the pointer of a conditional value of a distribution property.",
                &[
                    "@param property Name of the property to find.".to_string(),
                    "@return The pointer to the property.".to_string(),
                ],
            )?,
            declaration: format!(
                "{value_type}* getPropertyPointer(const std::string& property){ov};"
            ),
        });
    }

    Ok(out)
}

/// Replacement for the header's `public:` line: the access specifier
/// followed by every generated member and prototype.
pub fn public_section(ctx: &ModuleContext<'_>) -> Result<String, EmissionError> {
    let mut members = member_declarations(ctx)?;
    members.extend(method_prototypes(ctx)?);
    let rendered = PublicSectionTemplate { members }.render()?;
    Ok(rendered.trim_end().to_string())
}

/// `class Foo : public Base`, preceded by the class documentation block.
pub fn class_declaration(ctx: &ModuleContext<'_>) -> Result<String, EmissionError> {
    let doc = super::doxygen::class_doc(ctx)?;
    let head = match ctx.base_class() {
        Some(base) => format!("class {} : public {}", ctx.class_name(), base),
        None => format!("class {}", ctx.class_name()),
    };
    Ok(format!("{doc}\n{head}"))
}
