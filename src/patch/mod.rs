mod add;
mod copy;
mod error;
mod primitives;
mod remove;
mod replace;
mod rewrite;
mod synth;

pub use add::add;
pub use copy::copy_from_object;
pub use error::{ApplyError, PatchError};
pub use primitives::{add_node, remove_node, replace_node};
pub use remove::remove;
pub use replace::replace;
pub use rewrite::{rewrite_label_expressions_selector, rewrite_label_selector, rewrite_name};
pub use synth::create_path;

use crate::{
    condition::validate_all,
    config::{Patch, Verb},
    node::Node,
    path::Spath,
    resolver::NameResolver,
};

/// What a patch may need besides the document it edits.
#[derive(Default, Clone, Copy)]
pub struct PatchContext<'a> {
    /// Document `copyFromObject` reads from.
    pub source: Option<&'a Node>,
    /// Required by the rewrite verbs.
    pub resolver: Option<&'a dyn NameResolver>,
}

impl<'a> PatchContext<'a> {
    pub fn new() -> Self {
        PatchContext::default()
    }

    pub fn with_source(mut self, source: &'a Node) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_resolver(mut self, resolver: &'a dyn NameResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    fn require_resolver(&self, verb: Verb) -> Result<&'a dyn NameResolver, PatchError> {
        self.resolver.ok_or(PatchError::MissingResolver { verb })
    }
}

/// Applies one patch to `doc` in place.
pub fn apply(doc: &mut Node, patch: &Patch, ctx: &PatchContext<'_>) -> Result<(), PatchError> {
    log::debug!(target: "nodepatch::patch", "applying {} at '{}'", patch.op, patch.path);

    match patch.op {
        Verb::Add => add(doc, patch),
        Verb::Remove => remove(doc, patch),
        Verb::Replace => replace(doc, patch),
        Verb::CopyFromObject => copy_from_object(doc, ctx.source, patch),
        Verb::RewriteName => rewrite_name(doc, patch, ctx.require_resolver(patch.op)?),
        Verb::RewriteLabelSelector => {
            rewrite_label_selector(doc, patch, ctx.require_resolver(patch.op)?)
        }
        Verb::RewriteLabelExpressionsSelector => {
            rewrite_label_expressions_selector(doc, patch, ctx.require_resolver(patch.op)?)
        }
    }
}

/// Applies `patches` in order and stops at the first failure.
///
/// Patches applied before the failing one stay applied.
pub fn apply_all(
    doc: &mut Node,
    patches: &[Patch],
    ctx: &PatchContext<'_>,
) -> Result<(), ApplyError> {
    for (index, patch) in patches.iter().enumerate() {
        apply(doc, patch, ctx).map_err(|source| ApplyError {
            index,
            verb: patch.op,
            path: patch.path.clone(),
            source,
        })?;
    }
    Ok(())
}

/// Evaluates the patch conditions with the node at `location` as candidate.
fn conditions_hold(doc: &Node, location: &Spath, patch: &Patch) -> Result<bool, PatchError> {
    let holds = validate_all(doc, doc.get(location), &patch.conditions)?;
    if !holds {
        log::debug!(target: "nodepatch::patch", "conditions not met at '{location}', skipping");
    }
    Ok(holds)
}
