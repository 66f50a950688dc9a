use crate::{
    config::Patch,
    node::Node,
    patch::{conditions_hold, error::PatchError, primitives::replace_node},
    resolve::resolve,
};

/// The "replace" verb substitutes every match of `path` whose conditions
/// hold with the patch value. Nothing is created when `path` matches
/// nothing.
pub fn replace(doc: &mut Node, patch: &Patch) -> Result<(), PatchError> {
    let value = patch.value_node()?;

    for location in &resolve(doc, &patch.path)? {
        if conditions_hold(doc, location, patch)? {
            replace_node(doc, location, value.clone())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;
    use crate::{
        condition::{Condition, ConditionPath},
        config::Verb,
    };

    fn doc(yaml: &str) -> Node {
        Node::from_yaml_str(yaml).unwrap()
    }

    fn patch(path: &str, value: impl Into<serde_yaml::Value>) -> Patch {
        Patch::new(Verb::Replace, path.try_into().unwrap()).with_value(value)
    }

    #[test]
    fn replace_scalar() {
        let mut doc = doc("spec:\n  replicas: 1\n");

        replace(&mut doc, &patch("spec.replicas", 3)).unwrap();

        check!(doc == self::doc("spec:\n  replicas: 3\n"));
    }

    #[test]
    fn replace_is_idempotent() {
        let mut once = doc("spec:\n  image: a\n");
        replace(&mut once, &patch("spec.image", "b")).unwrap();
        let mut twice = once.clone();
        replace(&mut twice, &patch("spec.image", "b")).unwrap();

        check!(once == twice);
    }

    #[test]
    fn replace_does_not_create_paths() {
        let mut doc = doc("a: 1\n");

        replace(&mut doc, &patch("b", 2)).unwrap();

        check!(doc == self::doc("a: 1\n"));
    }

    #[test]
    fn replace_whole_document() {
        let mut doc = doc("a: 1\n");

        let value: serde_yaml::Value = serde_yaml::from_str("b: 2").unwrap();
        replace(&mut doc, &patch("", value)).unwrap();

        check!(doc == self::doc("b: 2\n"));
    }

    #[test]
    fn replace_skips_when_condition_fails() {
        let mut doc = doc("spec:\n  replicas: 1\n");
        let unchanged = Condition::new(ConditionPath::default()).equal(2);
        let patch = patch("spec.replicas", 5).with_condition(unchanged);

        replace(&mut doc, &patch).unwrap();

        check!(doc == self::doc("spec:\n  replicas: 1\n"));
    }
}
