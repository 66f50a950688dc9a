use std::error::Error;

use nodepatch::{PatchContext, SuffixResolver, apply_all, config::load_from_path};

use crate::cli::{
    ApplyArgs,
    query::{load_document, print_node, read_from_stdin},
};

pub fn handle_apply_command(args: ApplyArgs) -> Result<(), Box<dyn Error>> {
    let config = load_from_path(&args.patches)?;

    let mut doc = match &args.file {
        Some(file_path) => load_document(file_path)?,
        None => read_from_stdin()?,
    };
    let source = match &args.source {
        Some(source_path) => Some(load_document(source_path)?),
        None => None,
    };

    let mut resolver = SuffixResolver::new(args.namespace);
    if let Some(suffix) = args.suffix {
        resolver = resolver.with_suffix(suffix);
    }
    if let Some(target_namespace) = args.target_namespace {
        resolver = resolver.with_target_namespace(target_namespace);
    }

    let mut ctx = PatchContext::new().with_resolver(&resolver);
    if let Some(source) = &source {
        ctx = ctx.with_source(source);
    }

    log::debug!(target: "nodepatch::cli", "applying {} patches", config.patches.len());
    apply_all(&mut doc, &config.patches, &ctx)?;

    print_node(&doc, args.output)
}
