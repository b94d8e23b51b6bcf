use anyhow::Context;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::discover::{discover_modules, output_path_for, ModuleSources};
use super::state::{ModuleOutcome, ModuleState};
use super::write::{write_file_atomic, write_pair, WriteOutcome};
use crate::error::{AggregateError, ModuleError, SchemaError};
use crate::generator::{generate_module, ModuleContext, VariableAggregate};
use crate::schema::{load_module_config_as, ModuleConfig, ModuleIndex};
use crate::settings::GeneratorSettings;
use crate::template::{load_template, TemplateKind};

/// Inputs of one generator run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Validate and render everything, write nothing
    pub dry_run: bool,
    /// Worker threads; falls back to `settings.jobs`, then rayon's default
    pub jobs: Option<usize>,
    /// Explicit aggregate template. When `None` the template configured in
    /// `settings` is used if it exists.
    pub variable_template: Option<PathBuf>,
    pub settings: GeneratorSettings,
}

impl RunOptions {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            dry_run: false,
            jobs: None,
            variable_template: None,
            settings: GeneratorSettings::default(),
        }
    }
}

/// What happened to the aggregate variable header.
#[derive(Debug)]
pub enum AggregateOutcome {
    /// No variable template was found
    Skipped,
    Written {
        path: PathBuf,
        fields: usize,
        unchanged: bool,
    },
    /// Rendered in check mode
    Checked { path: PathBuf, fields: usize },
    Failed(AggregateError),
}

/// Per-module outcomes in discovery order, plus the aggregate pass.
#[derive(Debug)]
pub struct RunReport {
    pub outcomes: Vec<ModuleOutcome>,
    pub aggregate: AggregateOutcome,
    pub dry_run: bool,
}

impl RunReport {
    pub fn failed(&self) -> impl Iterator<Item = &ModuleOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }

    /// Modules whose outputs were written (or would be, in check mode).
    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| is_generated(o, self.dry_run)).count()
    }

    pub fn unchanged_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.unchanged).count()
    }

    /// 2 when the aggregate pass failed, 1 when any module failed, else 0.
    pub fn exit_code(&self) -> u8 {
        if matches!(self.aggregate, AggregateOutcome::Failed(_)) {
            2
        } else if self.failed_count() > 0 {
            1
        } else {
            0
        }
    }
}

fn is_generated(outcome: &ModuleOutcome, dry_run: bool) -> bool {
    let done = if dry_run {
        ModuleState::Expanded
    } else {
        ModuleState::Written
    };
    outcome.state == done
}

/// Run the whole pipeline over `options.source`.
///
/// 1. Discover and parse every `.config`.
/// 2. Index modules by name and resolve parents.
/// 3. Validate templates, emit and write each module on a rayon pool,
///    parents before children.
/// 4. Build the aggregate variable header from the modules that made it.
///
/// Module failures are recorded in the report and never stop the batch.
/// Only a failure to start (missing source tree, thread pool) is an `Err`.
pub fn run_generation(options: &RunOptions) -> anyhow::Result<RunReport> {
    let started = Instant::now();
    let sources = discover_modules(&options.source)?;
    info!(
        source = %options.source.display(),
        destination = %options.destination.display(),
        modules = sources.len(),
        dry_run = options.dry_run,
        "starting module generation"
    );

    let workers = options.jobs.or(options.settings.jobs).unwrap_or(0);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("modgen-worker-{i}"))
        .build()
        .context("Failed to build worker pool")?;

    let mut outcomes: Vec<ModuleOutcome> = sources
        .iter()
        .map(|s| ModuleOutcome::discovered(s.label()))
        .collect();

    // Parse every config before resolving any parent.
    let parsed: Vec<_> = pool.install(|| {
        sources
            .par_iter()
            .map(|s| load_module_config_as(&s.config_path, &s.label()))
            .collect()
    });
    let mut configs: Vec<Option<ModuleConfig>> = Vec::with_capacity(parsed.len());
    for (outcome, result) in outcomes.iter_mut().zip(parsed) {
        match result {
            Ok(config) => {
                outcome.module = Some(config.name.clone());
                outcome.advance(ModuleState::ConfigParsed);
                configs.push(Some(config));
            }
            Err(e) => {
                warn!(module = %outcome.label, error = %e, "config rejected");
                outcome.fail(e);
                configs.push(None);
            }
        }
    }

    let parsed_refs: Vec<(usize, &ModuleConfig)> = configs
        .iter()
        .enumerate()
        .filter_map(|(i, c)| c.as_ref().map(|c| (i, c)))
        .collect();
    let config_refs: Vec<&ModuleConfig> = parsed_refs.iter().map(|(_, c)| *c).collect();
    let (index, link_errors) = ModuleIndex::build(&config_refs);
    for (pos, error) in link_errors {
        let outcome = &mut outcomes[parsed_refs[pos].0];
        warn!(module = %outcome.label, error = %error, "module cannot be linked");
        outcome.fail(error);
    }
    let mut ref_pos = vec![None; sources.len()];
    for (pos, (i, _)) in parsed_refs.iter().enumerate() {
        ref_pos[*i] = Some(pos);
    }

    // Parents are generated one depth level ahead of their children, so a
    // parent that fails takes its descendants down with it.
    let depths: Vec<Option<usize>> = outcomes
        .iter()
        .zip(&ref_pos)
        .map(|(outcome, pos)| match pos {
            Some(pos) if !outcome.is_failed() => Some(index.depth(*pos)),
            _ => None,
        })
        .collect();
    let max_depth = depths.iter().flatten().copied().max().unwrap_or(0);

    for depth in 0..=max_depth {
        for i in 0..outcomes.len() {
            if depths[i] != Some(depth) || outcomes[i].is_failed() {
                continue;
            }
            let Some(pos) = ref_pos[i] else {
                continue;
            };
            let Some(parent_pos) = index.parent_of(pos) else {
                continue;
            };
            if outcomes[parsed_refs[parent_pos].0].is_failed() {
                let error = SchemaError::ParentFailed {
                    module: config_refs[pos].name.clone(),
                    parent: config_refs[parent_pos].name.clone(),
                };
                warn!(module = %outcomes[i].label, error = %error, "parent module failed");
                outcomes[i].fail(error);
            }
        }

        pool.install(|| {
            outcomes
                .par_iter_mut()
                .zip(sources.par_iter())
                .enumerate()
                .filter(|(i, _)| depths[*i] == Some(depth))
                .for_each(|(i, (outcome, module_sources))| {
                    if outcome.is_failed() {
                        return;
                    }
                    let (Some(config), Some(pos)) = (configs[i].as_ref(), ref_pos[i]) else {
                        return;
                    };
                    let parent = index.parent_of(pos).map(|p| config_refs[p]);
                    let ctx = ModuleContext::new(config, parent, &options.settings);
                    if let Err(e) = process_module(outcome, module_sources, &ctx, options) {
                        warn!(
                            module = %outcome.label,
                            category = e.category(),
                            error = %e,
                            "module generation failed"
                        );
                        outcome.fail(e);
                    }
                });
        });
    }

    let included: Vec<&ModuleConfig> = outcomes
        .iter()
        .zip(&configs)
        .filter(|(o, _)| is_generated(o, options.dry_run))
        .filter_map(|(_, c)| c.as_ref())
        .collect();
    for (outcome, config) in outcomes.iter().zip(&configs) {
        if let (true, Some(config)) = (outcome.is_failed(), config) {
            warn!(
                module = %config.name,
                "module excluded from the aggregate variable header"
            );
        }
    }

    let aggregate = match build_aggregate(&included, options) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(error = %e, "aggregate variable header failed");
            AggregateOutcome::Failed(e)
        }
    };

    let report = RunReport {
        outcomes,
        aggregate,
        dry_run: options.dry_run,
    };
    info!(
        generated = report.succeeded_count(),
        unchanged = report.unchanged_count(),
        failed = report.failed_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "module generation finished"
    );
    Ok(report)
}

/// Templates, emitters and outputs for one parsed and linked module.
fn process_module(
    outcome: &mut ModuleOutcome,
    sources: &ModuleSources,
    ctx: &ModuleContext<'_>,
    options: &RunOptions,
) -> Result<(), ModuleError> {
    let header = load_template(&sources.header_template, TemplateKind::Header)?;
    let source = load_template(&sources.source_template, TemplateKind::Source)?;
    outcome.advance(ModuleState::TemplateValidated);

    let code = generate_module(ctx, &header, &source)?;
    outcome.advance(ModuleState::Expanded);
    if options.dry_run {
        return Ok(());
    }

    let header_path = sources.header_output(&options.destination);
    let source_path = sources.source_output(&options.destination);
    let written = write_pair(
        &header_path,
        &code.header_text,
        &source_path,
        &code.source_text,
    )?;
    outcome.unchanged = written.is_unchanged();
    outcome.advance(ModuleState::Written);
    debug!(
        module = %ctx.module.name,
        header = %header_path.display(),
        unchanged = outcome.unchanged,
        "module written"
    );
    Ok(())
}

fn variable_template_path(options: &RunOptions) -> (PathBuf, bool) {
    match &options.variable_template {
        Some(path) => (path.clone(), true),
        None => (options.source.join(&options.settings.variable_template), false),
    }
}

fn build_aggregate(
    modules: &[&ModuleConfig],
    options: &RunOptions,
) -> Result<AggregateOutcome, AggregateError> {
    let (template_path, explicit) = variable_template_path(options);
    if !template_path.is_file() {
        if explicit {
            return Err(AggregateError::MissingTemplate {
                path: template_path,
            });
        }
        info!(
            template = %template_path.display(),
            "no variable template, skipping aggregate header"
        );
        return Ok(AggregateOutcome::Skipped);
    }

    let template = load_template(&template_path, TemplateKind::VariableHeader).map_err(
        |source| AggregateError::Template {
            path: template_path.clone(),
            source,
        },
    )?;
    let aggregate = VariableAggregate::build(modules.iter().copied(), &options.settings)?;
    let text = aggregate.render(&template, &template_path, &options.settings)?;
    let output = aggregate_output_path(&template_path, options);
    let fields = aggregate.fields().len();

    if options.dry_run {
        return Ok(AggregateOutcome::Checked {
            path: output,
            fields,
        });
    }
    let written = write_file_atomic(&output, &text)?;
    info!(path = %output.display(), fields, "aggregate variable header ready");
    Ok(AggregateOutcome::Written {
        path: output,
        fields,
        unchanged: written == WriteOutcome::Unchanged,
    })
}

fn aggregate_output_path(template: &Path, options: &RunOptions) -> PathBuf {
    output_path_for(template, &options.source, &options.destination)
}
